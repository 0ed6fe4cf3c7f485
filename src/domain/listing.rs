// src/domain/listing.rs

use crate::domain::limits::AmountLimits;
use serde::Serialize;

/// Most images kept on a single listing.
pub const MAX_IMAGES: usize = 10;

/// Site-agnostic listing produced by one extraction call.
///
/// Amounts are whole currency units (BRL). Zero means "not found".
/// Optional fields are skipped when serializing, so the caller never
/// sees `null` keys it would have to strip before persisting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRecord {
    pub title: String,
    pub address: String,
    pub neighborhood: String,
    pub rent: i64,
    pub condo: i64,
    pub iptu: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub images: Vec<String>,
    pub url: String,
}

impl ListingRecord {
    /// Empty record for `url`, every field at its "not found" value.
    pub fn new(url: &str) -> Self {
        Self {
            title: String::new(),
            address: String::new(),
            neighborhood: String::new(),
            rent: 0,
            condo: 0,
            iptu: 0,
            insurance: None,
            notes: None,
            images: Vec::new(),
            url: url.to_string(),
        }
    }

    /// Appends an image unless it is already present or the list is full.
    /// Returns `false` once the cap is reached.
    pub fn push_image(&mut self, src: impl Into<String>) -> bool {
        if self.images.len() >= MAX_IMAGES {
            return false;
        }
        let src = src.into();
        if !src.is_empty() && !self.images.contains(&src) {
            self.images.push(src);
        }
        self.images.len() < MAX_IMAGES
    }

    pub fn extend_images<I, S>(&mut self, sources: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for src in sources {
            if !self.push_image(src) {
                break;
            }
        }
    }

    /// A record is worth returning when it names the listing or where it is.
    pub fn is_usable(&self) -> bool {
        !self.title.is_empty() || !self.address.is_empty()
    }

    /// Zeroes any amount that falls outside the configured plausible range.
    pub fn enforce_limits(&mut self, limits: &AmountLimits) {
        self.rent = limits.rent.clamp_or_zero(self.rent);
        self.condo = limits.condo.clamp_or_zero(self.condo);
        self.iptu = limits.iptu.clamp_or_zero(self.iptu);
        self.insurance = self.insurance.filter(|v| *v > 0);
        self.images.truncate(MAX_IMAGES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_keep_first_seen_order_without_duplicates() {
        let mut record = ListingRecord::new("https://example.com/a");
        record.extend_images([
            "https://img/1.jpg",
            "https://img/2.jpg",
            "https://img/1.jpg",
            "https://img/3.jpg",
            "https://img/2.jpg",
        ]);

        assert_eq!(
            record.images,
            vec!["https://img/1.jpg", "https://img/2.jpg", "https://img/3.jpg"]
        );
    }

    #[test]
    fn images_are_capped_at_ten() {
        let mut record = ListingRecord::new("https://example.com/a");
        record.extend_images((0..25).map(|i| format!("https://img/{i}.jpg")));

        assert_eq!(record.images.len(), MAX_IMAGES);
        assert_eq!(record.images[0], "https://img/0.jpg");
        assert_eq!(record.images[9], "https://img/9.jpg");
    }

    #[test]
    fn enforce_limits_zeroes_implausible_amounts() {
        let mut record = ListingRecord::new("u");
        record.rent = 50; // below the rent floor
        record.condo = 123_456;
        record.iptu = 98;

        record.enforce_limits(&AmountLimits::default());

        assert_eq!(record.rent, 0);
        assert_eq!(record.condo, 0);
        assert_eq!(record.iptu, 98);
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let record = ListingRecord::new("https://example.com/a");
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("insurance").is_none());
        assert!(json.get("notes").is_none());
        assert_eq!(json["images"], serde_json::json!([]));
        assert_eq!(json["url"], "https://example.com/a");
    }

    #[test]
    fn usable_needs_title_or_address() {
        let mut record = ListingRecord::new("u");
        assert!(!record.is_usable());
        record.address = "Rua X".into();
        assert!(record.is_usable());
    }
}
