// scraper/structured.rs
//! Listing data from embedded JSON-LD blocks.
//!
//! Two shapes are understood: schema.org residence/listing types, and the
//! `Product` + `offers.price` shape VivaReal renders, which carries no
//! address and needs the page's meta description and fee widgets.

use crate::domain::limits::AmountLimits;
use crate::domain::listing::ListingRecord;
use crate::scraper::dom::{attr_of, selector, text_of};
use crate::scraper::normalize::{
    digits_to_int, extract_neighborhood, neighborhood_with_fallback, parse_amount, DashSegment,
};
use crate::scraper::ScraperError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use serde_json::{Map, Value};
use tracing::debug;

const LISTING_TYPES: &[&str] = &[
    "Apartment",
    "House",
    "SingleFamilyResidence",
    "Residence",
    "RealEstateListing",
];

/// "...na Rua Samuel Cézar, 1197 - Água Verde - Curitiba - PR."
static META_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"na (.+?) - (.+?) - (.+?) - (.+?)\.").expect("static regex"));

/// Runs the structured-data pass over a whole page.
///
/// `None` means "nothing recognisable here" and is the caller's cue to
/// fall back to a site extractor; it is never an error.
pub fn extract(html: &str, url: &str, limits: &AmountLimits) -> Option<ListingRecord> {
    let doc = Html::parse_document(html);
    extract_from_document(&doc, url, limits).unwrap_or_else(|e| {
        debug!("structured data pass aborted: {e}");
        None
    })
}

pub fn extract_from_document(
    doc: &Html,
    url: &str,
    limits: &AmountLimits,
) -> Result<Option<ListingRecord>, ScraperError> {
    let scripts = selector(r#"script[type="application/ld+json"]"#)?;

    for script in doc.select(&scripts) {
        let raw = script.text().collect::<String>();
        if raw.trim().is_empty() {
            continue;
        }
        let value: Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                debug!("skipping malformed ld+json block: {e}");
                continue;
            }
        };

        for node in flatten(&value) {
            if let Some(record) = match_node(node, doc, url, limits)? {
                return Ok(Some(record));
            }
        }
    }

    Ok(None)
}

/// Top-level arrays and `@graph` containers hold several nodes each.
fn flatten(value: &Value) -> Vec<&Map<String, Value>> {
    let mut out = Vec::new();
    let mut stack = vec![value];
    while let Some(v) = stack.pop() {
        match v {
            Value::Array(items) => stack.extend(items.iter().rev()),
            Value::Object(map) => {
                out.push(map);
                if let Some(graph) = map.get("@graph") {
                    stack.push(graph);
                }
            }
            _ => {}
        }
    }
    out
}

fn match_node(
    node: &Map<String, Value>,
    doc: &Html,
    url: &str,
    limits: &AmountLimits,
) -> Result<Option<ListingRecord>, ScraperError> {
    if has_type(node, LISTING_TYPES) {
        let record = map_listing(node, url, limits);
        return Ok(record.is_usable().then_some(record));
    }
    if has_type(node, &["Product"]) && offer_price(node).is_some() {
        return map_product(node, doc, url, limits);
    }
    Ok(None)
}

fn has_type(node: &Map<String, Value>, wanted: &[&str]) -> bool {
    match node.get("@type") {
        Some(Value::String(t)) => wanted.contains(&t.as_str()),
        Some(Value::Array(ts)) => ts
            .iter()
            .filter_map(Value::as_str)
            .any(|t| wanted.contains(&t)),
        _ => false,
    }
}

fn str_field<'a>(node: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    node.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn map_listing(node: &Map<String, Value>, url: &str, limits: &AmountLimits) -> ListingRecord {
    let mut record = ListingRecord::new(url);

    record.title = str_field(node, "name")
        .or_else(|| str_field(node, "headline"))
        .unwrap_or_default()
        .to_string();

    match node.get("address") {
        Some(Value::String(address)) => {
            record.address = address.trim().to_string();
            // dash form only when there is no comma structure at all
            record.neighborhood = if record.address.contains(',') {
                extract_neighborhood(&record.address)
            } else {
                neighborhood_with_fallback(&record.address, DashSegment::Last)
            };
        }
        Some(Value::Object(postal)) => {
            let locality = str_field(postal, "addressLocality");
            record.address = [
                str_field(postal, "streetAddress"),
                locality,
                str_field(postal, "addressRegion"),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");
            record.neighborhood = locality.unwrap_or_default().to_string();
        }
        _ => {}
    }

    let price = node
        .get("potentialAction")
        .and_then(|a| a.get("price"))
        .filter(|p| has_price(p))
        .or_else(|| offer_price(node))
        .or_else(|| node.get("price"));
    record.rent = price
        .and_then(price_value)
        .map(|v| limits.rent.clamp_or_zero(v))
        .unwrap_or(0);

    record.extend_images(image_urls(node.get("image")));
    record.extend_images(image_urls(node.get("photo")));
    record
}

fn map_product(
    node: &Map<String, Value>,
    doc: &Html,
    url: &str,
    limits: &AmountLimits,
) -> Result<Option<ListingRecord>, ScraperError> {
    let description = attr_of(doc, r#"meta[name="description"]"#, "content")?.unwrap_or_default();
    let Some(caps) = META_ADDRESS.captures(&description) else {
        debug!("Product schema without a parsable meta description, ignoring it");
        return Ok(None);
    };

    let mut record = ListingRecord::new(url);
    record.title = str_field(node, "name").unwrap_or_default().to_string();
    record.address = caps[1].trim().to_string();
    record.neighborhood = caps[2].trim().to_string();
    if record.neighborhood.is_empty() {
        record.neighborhood = extract_neighborhood(&record.address);
    }
    record.rent = offer_price(node)
        .and_then(price_value)
        .map(|v| limits.rent.clamp_or_zero(v))
        .unwrap_or(0);
    record.extend_images(image_urls(node.get("image")));

    if let Some(text) = text_of(doc, r#"[data-testid="condoFee"]"#)? {
        record.condo = parse_amount(&text, limits.condo);
    }
    if let Some(text) = text_of(doc, r#"[data-testid="iptu"]"#)? {
        record.iptu = parse_amount(&text, limits.iptu);
    }

    Ok(record.is_usable().then_some(record))
}

fn offer_price(node: &Map<String, Value>) -> Option<&Value> {
    let price = match node.get("offers")? {
        Value::Array(offers) => offers.iter().find_map(|o| o.get("price")),
        offers => offers.get("price"),
    };
    price.filter(|p| has_price(p))
}

/// Null, zero and blank prices count as missing.
fn has_price(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// JSON numbers keep their integral part; strings go through digit stripping.
fn price_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => digits_to_int(s),
        _ => None,
    }
}

/// `image` / `photo` may be a URL, an ImageObject, or an array of either.
fn image_urls(value: Option<&Value>) -> Vec<String> {
    let single = |v: &Value| -> Option<String> {
        match v {
            Value::String(s) if s.contains("http") => Some(s.trim().to_string()),
            Value::Object(obj) => obj
                .get("url")
                .or_else(|| obj.get("contentUrl"))
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string()),
            _ => None,
        }
    };

    match value {
        Some(Value::Array(items)) => items.iter().filter_map(single).collect(),
        Some(v) => single(v).into_iter().collect(),
        None => Vec::new(),
    }
}
