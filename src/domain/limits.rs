// src/domain/limits.rs

/// Inclusive plausible range for one monetary field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountRange {
    pub min: i64,
    pub max: i64,
}

impl AmountRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Returns `value` if plausible, otherwise 0 ("not found").
    pub fn clamp_or_zero(&self, value: i64) -> i64 {
        if self.contains(value) {
            value
        } else {
            0
        }
    }
}

/// Threshold table for the three monthly amounts.
///
/// The floors are empirical: a rent under R$100 is almost always a
/// parse of something else (a room count, a listing id fragment).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountLimits {
    pub rent: AmountRange,
    pub condo: AmountRange,
    pub iptu: AmountRange,
}

impl Default for AmountLimits {
    fn default() -> Self {
        Self {
            rent: AmountRange::new(100, 100_000),
            condo: AmountRange::new(10, 100_000),
            iptu: AmountRange::new(10, 100_000),
        }
    }
}

impl AmountLimits {
    pub fn range_for(&self, kind: AmountKind) -> AmountRange {
        match kind {
            AmountKind::Rent => self.rent,
            AmountKind::Condo => self.condo,
            AmountKind::Iptu => self.iptu,
        }
    }
}

/// Which monthly amount a label refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountKind {
    Rent,
    Condo,
    Iptu,
}

impl AmountKind {
    /// Classifies a price label by keyword ("aluguel", "condom", "iptu").
    /// "expensas" is how some ImovelWeb pages label the condo fee.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        if label.contains("aluguel") {
            Some(Self::Rent)
        } else if label.contains("condom") || label.contains("expensas") {
            Some(Self::Condo)
        } else if label.contains("iptu") {
            Some(Self::Iptu)
        } else {
            None
        }
    }
}
