// scraper/normalize.rs
use crate::domain::limits::AmountRange;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// First digit-bearing run, e.g. "2.000,00" out of "R$ 2.000,00/mês".
static AMOUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d[\d.,]*").expect("static regex"));
static ONLY_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("static regex"));
static POSTAL_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5}-?\d{3}$").expect("static regex"));

/// Keeps only ASCII digits and parses them. Separators of either style
/// are dropped, so "2.000" and "2,000" both give 2000 and cents are
/// folded into the integer ("1.234,56" -> 123456).
pub fn digits_to_int(text: &str) -> Option<i64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Parses the first amount found in `text`; 0 when there is none or it
/// falls outside `range`.
pub fn parse_amount(text: &str, range: AmountRange) -> i64 {
    AMOUNT
        .find(text)
        .and_then(|m| digits_to_int(m.as_str()))
        .map(|v| range.clamp_or_zero(v))
        .unwrap_or(0)
}

/// Same as [`parse_amount`] but for every amount in `text`, in order.
pub fn parse_amounts(text: &str, range: AmountRange) -> Vec<i64> {
    AMOUNT
        .find_iter(text)
        .filter_map(|m| digits_to_int(m.as_str()))
        .filter(|v| range.contains(*v))
        .collect()
}

/// Pulls the sub-locality out of a comma separated address.
///
/// Walks the parts from the end, never considering the first one (the
/// street), and skips "City/UF", bare numbers and CEPs.
pub fn extract_neighborhood(address: &str) -> String {
    let parts: Vec<&str> = address.split(',').map(str::trim).collect();

    parts
        .iter()
        .enumerate()
        .skip(1)
        .rev()
        .map(|(_, part)| *part)
        .find(|part| !is_locality_noise(part))
        .unwrap_or_default()
        .to_string()
}

fn is_locality_noise(part: &str) -> bool {
    part.is_empty() || part.contains('/') || ONLY_DIGITS.is_match(part) || POSTAL_CODE.is_match(part)
}

/// Which segment of a dash separated address holds the neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashSegment {
    /// "Bairro - Cidade"
    First,
    /// "Rua - Bairro - Cidade"
    Second,
    /// "Rua X - Bairro"
    Last,
}

/// Comma rules first; when they find nothing, falls back to `segment` of
/// the dash separated form.
pub fn neighborhood_with_fallback(address: &str, segment: DashSegment) -> String {
    let found = extract_neighborhood(address);
    if !found.is_empty() || !address.contains('-') {
        return found;
    }

    let dashed: Vec<&str> = address.split('-').map(str::trim).collect();
    let picked = match segment {
        DashSegment::First => dashed.first(),
        DashSegment::Second if dashed.len() >= 2 => dashed.get(1),
        DashSegment::Last if dashed.len() >= 2 => dashed.last(),
        _ => None,
    };
    picked
        .filter(|s| !is_locality_noise(s))
        .map(|s| s.to_string())
        .unwrap_or_default()
}

/// Collapses runs of whitespace left over from nested inline elements.
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolves `src` against the page it came from so stored images are absolute.
/// Data URIs and unresolvable values come back as `None`.
pub fn absolutize(src: &str, page_url: &str) -> Option<String> {
    let src = src.trim();
    if src.is_empty() || src.starts_with("data:") {
        return None;
    }
    if let Ok(abs) = Url::parse(src) {
        return Some(abs.to_string());
    }
    if let Some(rest) = src.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    Url::parse(page_url)
        .and_then(|base| base.join(src))
        .ok()
        .map(|u| u.to_string())
}

/// Logos, icons and vector art are never listing photos.
pub fn is_content_image(src: &str) -> bool {
    let lower = src.to_lowercase();
    lower.contains("http")
        && !lower.contains("logo")
        && !lower.contains("icon")
        && !lower.ends_with(".svg")
}
