// scraper/sites/mod.rs
//! One extraction strategy per supported listing site.
//!
//! Adding a source means writing a [`SiteExtractor`] and registering it in
//! [`SiteRegistry::with_limits`]; the orchestrator never names sites.

mod chavesnamao;
mod imovelweb;
mod quintoandar;
mod vivareal;

pub use chavesnamao::ChavesNaMao;
pub use imovelweb::ImovelWeb;
pub use quintoandar::QuintoAndar;
pub use vivareal::VivaReal;

use crate::domain::limits::{AmountKind, AmountLimits};
use crate::domain::listing::ListingRecord;
use crate::scraper::normalize::parse_amount;
use crate::scraper::ScraperError;
use regex::Regex;
use scraper::Html;
use tracing::warn;

pub trait SiteExtractor: Send + Sync {
    /// Display name, used in logs and "supported sites" messages.
    fn name(&self) -> &'static str;

    /// Host fragment identifying the site, e.g. "vivareal.com.br".
    fn domain(&self) -> &'static str;

    /// Sites that block plain HTTP clients and must be rendered in a browser.
    fn requires_rendering(&self) -> bool {
        false
    }

    /// Best-effort extraction. Selector misses leave fields empty; only a
    /// broken selector or pattern surfaces as an error.
    fn scrape(&self, doc: &Html, url: &str) -> Result<ListingRecord, ScraperError>;

    fn matches(&self, url: &str) -> bool {
        url.to_lowercase().contains(self.domain())
    }

    /// `scrape` with failures folded into "no data".
    fn extract(&self, html: &str, url: &str) -> Option<ListingRecord> {
        let doc = Html::parse_document(html);
        match self.scrape(&doc, url) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(site = self.name(), "site extractor failed: {e}");
                None
            }
        }
    }
}

/// Host lookup table over the registered extractors.
pub struct SiteRegistry {
    sites: Vec<Box<dyn SiteExtractor>>,
}

impl SiteRegistry {
    pub fn with_limits(limits: AmountLimits) -> Self {
        Self {
            sites: vec![
                Box::new(ImovelWeb::new(limits)),
                Box::new(VivaReal::new(limits)),
                Box::new(QuintoAndar::new(limits)),
                Box::new(ChavesNaMao::new(limits)),
            ],
        }
    }

    /// First extractor whose domain appears in `url`.
    pub fn find(&self, url: &str) -> Option<&dyn SiteExtractor> {
        self.sites
            .iter()
            .find(|s| s.matches(url))
            .map(|s| s.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.sites.iter().map(|s| s.name()).collect()
    }

    pub fn rendered_names(&self) -> Vec<&'static str> {
        self.sites
            .iter()
            .filter(|s| s.requires_rendering())
            .map(|s| s.name())
            .collect()
    }
}

/// Rent/condo/IPTU accumulator: the first plausible value per field wins,
/// later offers for a field that is already set are ignored.
#[derive(Debug, Clone, Copy)]
pub struct Amounts {
    limits: AmountLimits,
    pub rent: i64,
    pub condo: i64,
    pub iptu: i64,
}

impl Amounts {
    pub fn new(limits: AmountLimits) -> Self {
        Self {
            limits,
            rent: 0,
            condo: 0,
            iptu: 0,
        }
    }

    fn slot(&mut self, kind: AmountKind) -> &mut i64 {
        match kind {
            AmountKind::Rent => &mut self.rent,
            AmountKind::Condo => &mut self.condo,
            AmountKind::Iptu => &mut self.iptu,
        }
    }

    pub fn is_set(&self, kind: AmountKind) -> bool {
        match kind {
            AmountKind::Rent => self.rent != 0,
            AmountKind::Condo => self.condo != 0,
            AmountKind::Iptu => self.iptu != 0,
        }
    }

    /// Offers an already-parsed value. Returns whether it was taken.
    pub fn offer(&mut self, kind: AmountKind, value: i64) -> bool {
        let value = self.limits.range_for(kind).clamp_or_zero(value);
        let slot = self.slot(kind);
        if *slot == 0 && value != 0 {
            *slot = value;
            true
        } else {
            false
        }
    }

    /// Parses the first amount in `text` for `kind` and offers it.
    pub fn offer_text(&mut self, kind: AmountKind, text: &str) -> bool {
        let value = parse_amount(text, self.limits.range_for(kind));
        self.offer(kind, value)
    }

    /// Runs a labelled pattern (capture group 1 is the amount) over body text.
    pub fn offer_pattern(&mut self, kind: AmountKind, pattern: &Regex, body: &str) {
        if self.is_set(kind) {
            return;
        }
        if let Some(caps) = pattern.captures(body) {
            if let Some(m) = caps.get(1) {
                self.offer_text(kind, m.as_str());
            }
        }
    }

    pub fn apply(self, record: &mut ListingRecord) {
        record.rent = self.rent;
        record.condo = self.condo;
        record.iptu = self.iptu;
    }
}
