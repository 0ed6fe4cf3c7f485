// scraper/sites/quintoandar.rs
use crate::domain::limits::{AmountKind, AmountLimits};
use crate::domain::listing::ListingRecord;
use crate::scraper::dom::{body_text, collect_images, element_text, first_text, selector, ImagePolicy};
use crate::scraper::normalize::{neighborhood_with_fallback, DashSegment};
use crate::scraper::sites::{Amounts, SiteExtractor};
use crate::scraper::ScraperError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

/// A cost label followed closely by its amount: "Condomínio R$ 480".
static LABELLED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(aluguel|condom[íi]nio|iptu)\D{0,24}?(\d[\d.,]*)").expect("static regex")
});
static RENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)aluguel[:\s]+r?\$?\s*([\d.,]+)").expect("static regex"));

const IMAGES: ImagePolicy = ImagePolicy {
    gallery: r#"[class*="gallery"], [class*="carousel"], [class*="slider"]"#,
    min_width: 99,
    check_height: true,
    hosts: &["quintoandar", "cloudfront"],
    prefer_data_src: false,
};

pub struct QuintoAndar {
    limits: AmountLimits,
}

impl QuintoAndar {
    pub fn new(limits: AmountLimits) -> Self {
        Self { limits }
    }
}

impl SiteExtractor for QuintoAndar {
    fn name(&self) -> &'static str {
        "QuintoAndar"
    }

    fn domain(&self) -> &'static str {
        "quintoandar.com.br"
    }

    fn scrape(&self, doc: &Html, url: &str) -> Result<ListingRecord, ScraperError> {
        let mut record = ListingRecord::new(url);

        record.title = first_text(
            doc,
            &[r#"h1[data-testid="listing-title"]"#, "h1.title", "h1"],
        )?;
        record.address = first_text(
            doc,
            &[
                r#"[data-testid="listing-address"]"#,
                ".address",
                r#"[class*="address"]"#,
            ],
        )?;
        record.neighborhood = neighborhood_with_fallback(&record.address, DashSegment::First);

        let mut amounts = Amounts::new(self.limits);
        let cost_blocks = selector(
            r#"[data-testid="price-info"], [class*="price"], .price-details, [class*="cost"]"#,
        )?;
        for block in doc.select(&cost_blocks) {
            let text = element_text(&block);
            for caps in LABELLED.captures_iter(&text) {
                if let Some(kind) = AmountKind::from_label(&caps[1]) {
                    amounts.offer_text(kind, &caps[2]);
                }
            }
        }
        amounts.offer_pattern(AmountKind::Rent, &RENT, &body_text(doc));
        amounts.apply(&mut record);

        collect_images(doc, url, &IMAGES, &mut record)?;
        Ok(record)
    }
}
