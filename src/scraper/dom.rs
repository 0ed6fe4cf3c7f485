// scraper/dom.rs
use crate::domain::listing::ListingRecord;
use crate::scraper::normalize::{absolutize, is_content_image, squash_whitespace};
use crate::scraper::ScraperError;
use scraper::{ElementRef, Html, Selector};

pub fn selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::HtmlParse(format!("{css}: {e}")))
}

/// Trimmed, whitespace-collapsed text of an element.
pub fn element_text(el: &ElementRef) -> String {
    squash_whitespace(&el.text().collect::<String>())
}

/// Text of the first element matching `css`, if non-empty.
pub fn text_of(doc: &Html, css: &str) -> Result<Option<String>, ScraperError> {
    let sel = selector(css)?;
    Ok(doc
        .select(&sel)
        .next()
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty()))
}

/// Ordered attempts: the first selector yielding non-empty text wins.
pub fn first_text(doc: &Html, attempts: &[&str]) -> Result<String, ScraperError> {
    for css in attempts {
        if let Some(text) = text_of(doc, css)? {
            return Ok(text);
        }
    }
    Ok(String::new())
}

pub fn attr_of(doc: &Html, css: &str, attr: &str) -> Result<Option<String>, ScraperError> {
    let sel = selector(css)?;
    Ok(doc
        .select(&sel)
        .find_map(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

/// Whole-page text, used by the body-regex price strategies.
/// Element boundaries become spaces so labels don't fuse with values.
pub fn body_text(doc: &Html) -> String {
    let root = match Selector::parse("body") {
        Ok(sel) => doc.select(&sel).next(),
        Err(_) => None,
    };
    let texts: Vec<&str> = match root {
        Some(body) => body.text().collect(),
        None => doc.root_element().text().collect(),
    };
    texts.join(" ")
}

/// Per-site rules for which `<img>` elements count as listing photos.
#[derive(Debug, Clone)]
pub struct ImagePolicy {
    /// Images inside an ancestor matching this are always kept.
    pub gallery: &'static str,
    /// Images without a gallery ancestor must be wider than this
    /// (an absent width attribute counts as wide).
    pub min_width: u32,
    /// Also reject by the height attribute.
    pub check_height: bool,
    /// When set, the URL must contain one of these fragments (site CDNs).
    pub hosts: &'static [&'static str],
    /// Read `data-src` before `src`; lazy loaders put the real photo there.
    pub prefer_data_src: bool,
}

impl ImagePolicy {
    fn is_small(&self, el: &ElementRef) -> bool {
        let below = |name: &str| {
            el.value()
                .attr(name)
                .and_then(|v| v.trim().trim_end_matches("px").parse::<u32>().ok())
                .is_some_and(|v| v <= self.min_width)
        };
        below("width") || (self.check_height && below("height"))
    }

    fn source<'a>(&self, el: &'a ElementRef) -> Option<&'a str> {
        let value = el.value();
        let (first, second) = if self.prefer_data_src {
            (value.attr("data-src"), value.attr("src"))
        } else {
            (value.attr("src"), value.attr("data-src"))
        };
        first.filter(|s| !s.trim().is_empty()).or(second)
    }
}

/// Collects listing photos into `record` following `policy`, in document order.
pub fn collect_images(
    doc: &Html,
    page_url: &str,
    policy: &ImagePolicy,
    record: &mut ListingRecord,
) -> Result<(), ScraperError> {
    let imgs = selector("img[src], img[data-src]")?;
    let gallery = selector(policy.gallery)?;

    for el in doc.select(&imgs) {
        let Some(src) = policy.source(&el).and_then(|s| absolutize(s, page_url)) else {
            continue;
        };
        if !is_content_image(&src) {
            continue;
        }
        if !policy.hosts.is_empty() && !policy.hosts.iter().any(|h| src.contains(h)) {
            continue;
        }

        let in_gallery = el
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|a| gallery.matches(&a));

        if (in_gallery || !policy.is_small(&el)) && !record.push_image(src) {
            break;
        }
    }
    Ok(())
}
