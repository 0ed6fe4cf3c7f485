// scraper/sites/imovelweb.rs
use crate::domain::limits::{AmountKind, AmountLimits};
use crate::domain::listing::ListingRecord;
use crate::scraper::dom::{body_text, collect_images, element_text, first_text, selector, ImagePolicy};
use crate::scraper::normalize::{neighborhood_with_fallback, DashSegment};
use crate::scraper::sites::{Amounts, SiteExtractor};
use crate::scraper::ScraperError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

// "aluguel ... R$ 2.000" with anything but an R in between
static RENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)aluguel[^R]*R\$\s*([\d.,]+)").expect("static regex"));
static CONDO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:condom[íi]nio|expensas)\s*R\$\s*([\d.,]+)").expect("static regex"));
static IPTU: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)IPTU\s*R\$\s*([\d.,]+)").expect("static regex"));

const IMAGES: ImagePolicy = ImagePolicy {
    gallery: r#"[class*="gallery"], [class*="carousel"]"#,
    min_width: 200,
    check_height: false,
    hosts: &[],
    prefer_data_src: true,
};

pub struct ImovelWeb {
    limits: AmountLimits,
}

impl ImovelWeb {
    pub fn new(limits: AmountLimits) -> Self {
        Self { limits }
    }
}

impl SiteExtractor for ImovelWeb {
    fn name(&self) -> &'static str {
        "ImovelWeb"
    }

    fn domain(&self) -> &'static str {
        "imovelweb.com.br"
    }

    fn requires_rendering(&self) -> bool {
        true
    }

    fn scrape(&self, doc: &Html, url: &str) -> Result<ListingRecord, ScraperError> {
        let mut record = ListingRecord::new(url);

        record.title = first_text(
            doc,
            &[
                "h1.property-title",
                r#"[data-qa="POSTING_CARD_DESCRIPTION"]"#,
                "h1",
            ],
        )?;
        record.address = first_text(
            doc,
            &[".location-address", r#"[data-qa="POSTING_CARD_LOCATION"]"#],
        )?;
        // ImovelWeb prints "Bairro - Cidade" when there is no street line
        record.neighborhood = neighborhood_with_fallback(&record.address, DashSegment::First);

        let mut amounts = Amounts::new(self.limits);

        let rows = selector(".price-items .price-item")?;
        let label = selector(".price-item-label")?;
        let value = selector(".price-item-value")?;
        for row in doc.select(&rows) {
            let kind = row
                .select(&label)
                .next()
                .and_then(|l| AmountKind::from_label(&element_text(&l)));
            let amount = row.select(&value).next().map(|v| element_text(&v));
            if let (Some(kind), Some(amount)) = (kind, amount) {
                amounts.offer_text(kind, &amount);
            }
        }

        let body = body_text(doc);
        amounts.offer_pattern(AmountKind::Rent, &RENT, &body);
        amounts.offer_pattern(AmountKind::Condo, &CONDO, &body);
        amounts.offer_pattern(AmountKind::Iptu, &IPTU, &body);
        amounts.apply(&mut record);

        collect_images(doc, url, &IMAGES, &mut record)?;
        Ok(record)
    }
}
