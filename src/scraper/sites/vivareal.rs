// scraper/sites/vivareal.rs
use crate::domain::limits::{AmountKind, AmountLimits};
use crate::domain::listing::ListingRecord;
use crate::scraper::dom::{body_text, collect_images, element_text, first_text, selector, ImagePolicy};
use crate::scraper::normalize::{neighborhood_with_fallback, parse_amounts, DashSegment};
use crate::scraper::sites::{Amounts, SiteExtractor};
use crate::scraper::ScraperError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static RENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)aluguel\s+R\$\s*([\d.,]+)").expect("static regex"));
static CURRENCY: Lazy<Regex> = Lazy::new(|| Regex::new(r"R\$\s*([\d.,]+)").expect("static regex"));

const IMAGES: ImagePolicy = ImagePolicy {
    gallery: r#"[class*="gallery"], [class*="carousel"], [class*="slider"], picture"#,
    min_width: 200,
    check_height: false,
    hosts: &[],
    prefer_data_src: false,
};

pub struct VivaReal {
    limits: AmountLimits,
}

impl VivaReal {
    pub fn new(limits: AmountLimits) -> Self {
        Self { limits }
    }

    /// Every "R$ n" inside a price block, attributed by the block's label.
    fn price_blocks(&self, doc: &Html, amounts: &mut Amounts) -> Result<(), ScraperError> {
        let rows = selector(".price__list-value")?;
        let value = selector(".js-price")?;
        for row in doc.select(&rows) {
            let Some(kind) = AmountKind::from_label(&element_text(&row)) else {
                continue;
            };
            if let Some(v) = row.select(&value).next() {
                amounts.offer_text(kind, &element_text(&v));
            }
        }

        let blocks = selector(r#"[class*="price"]"#)?;
        for block in doc.select(&blocks) {
            let text = element_text(&block);
            let Some(kind) = AmountKind::from_label(&text) else {
                continue;
            };
            let range = self.limits.range_for(kind);
            for caps in CURRENCY.captures_iter(&text) {
                if let Some(v) = parse_amounts(&caps[1], range).first() {
                    amounts.offer(kind, *v);
                }
            }
        }
        Ok(())
    }
}

impl SiteExtractor for VivaReal {
    fn name(&self) -> &'static str {
        "VivaReal"
    }

    fn domain(&self) -> &'static str {
        "vivareal.com.br"
    }

    fn requires_rendering(&self) -> bool {
        true
    }

    fn scrape(&self, doc: &Html, url: &str) -> Result<ListingRecord, ScraperError> {
        let mut record = ListingRecord::new(url);

        record.title = first_text(
            doc,
            &["h1.property-card__title", r#"[data-type="title"]"#, "h1"],
        )?;
        record.address = first_text(
            doc,
            &[
                ".property-card__address",
                r#"[data-type="address"]"#,
                ".property-location__address",
                r#"[class*="address"] [class*="text"]"#,
            ],
        )?;
        record.neighborhood = neighborhood_with_fallback(&record.address, DashSegment::Second);

        let mut amounts = Amounts::new(self.limits);
        self.price_blocks(doc, &mut amounts)?;
        amounts.offer_pattern(AmountKind::Rent, &RENT, &body_text(doc));
        amounts.apply(&mut record);

        collect_images(doc, url, &IMAGES, &mut record)?;
        Ok(record)
    }
}
