// scraper/sites/chavesnamao.rs
use crate::domain::limits::{AmountKind, AmountLimits};
use crate::domain::listing::ListingRecord;
use crate::scraper::dom::{body_text, collect_images, first_text, ImagePolicy};
use crate::scraper::normalize::{neighborhood_with_fallback, DashSegment};
use crate::scraper::sites::{Amounts, SiteExtractor};
use crate::scraper::ScraperError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

// "Aluguel R$ 2.200/mês", "Aluguel\nR$ 2.200/mês"
static RENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Aluguel\s*R?\$?\s*([\d.,]+)").expect("static regex"));
static CONDO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Condom[ií]nio\s*R?\$?\s*([\d.,]+)").expect("static regex"));
static IPTU: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)IPTU\s*R?\$?\s*([\d.,]+)").expect("static regex"));

const IMAGES: ImagePolicy = ImagePolicy {
    gallery: r#"[class*="gallery"], [class*="carousel"], [class*="slider"], [class*="photo"]"#,
    min_width: 99,
    check_height: false,
    hosts: &["chavesnamao"],
    prefer_data_src: false,
};

pub struct ChavesNaMao {
    limits: AmountLimits,
}

impl ChavesNaMao {
    pub fn new(limits: AmountLimits) -> Self {
        Self { limits }
    }
}

impl SiteExtractor for ChavesNaMao {
    fn name(&self) -> &'static str {
        "ChavesNaMao"
    }

    fn domain(&self) -> &'static str {
        "chavesnamao.com.br"
    }

    fn scrape(&self, doc: &Html, url: &str) -> Result<ListingRecord, ScraperError> {
        let mut record = ListingRecord::new(url);

        record.title = first_text(
            doc,
            &[
                "h1.property-title",
                ".title-section h1",
                r#"h1[class*="title"]"#,
                "h1",
            ],
        )?;
        record.address = first_text(
            doc,
            &[".property-address", ".address-text", r#"[class*="address"]"#],
        )?;
        // "Rua - Bairro - Cidade"
        record.neighborhood = neighborhood_with_fallback(&record.address, DashSegment::Second);

        let body = body_text(doc);
        let mut amounts = Amounts::new(self.limits);
        amounts.offer_pattern(AmountKind::Rent, &RENT, &body);
        amounts.offer_pattern(AmountKind::Condo, &CONDO, &body);
        amounts.offer_pattern(AmountKind::Iptu, &IPTU, &body);
        amounts.apply(&mut record);

        collect_images(doc, url, &IMAGES, &mut record)?;
        Ok(record)
    }
}
