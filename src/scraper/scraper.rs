// scraper.rs
use crate::config::AppConfig;
use crate::domain::limits::AmountLimits;
use crate::domain::listing::ListingRecord;
use crate::scraper::browser::{ChromeRenderer, PageRenderer};
use crate::scraper::fetcher::{HttpFetcher, PageFetcher};
use crate::scraper::sites::{SiteExtractor, SiteRegistry};
use crate::scraper::structured;
use crate::scraper::ScraperError;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info};
use url::Url;

/// Placeholder URL recorded when only literal HTML was supplied.
pub const UNKNOWN_URL: &str = "unknown";

/// Body of a direct-fetch extraction request. At least one field is required.
#[derive(Debug, Default, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
}

/// Body of a browser-rendered extraction request.
#[derive(Debug, Default, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Where the HTML for one extraction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Literal,
    Fetched,
    Rendered,
}

/// Turns a URL or a pasted page into a [`ListingRecord`].
///
/// Immutable once built, so a single instance is shared by every server
/// worker. Fetching and rendering sit behind traits so tests can swap in
/// canned pages.
pub struct ListingScraper {
    fetcher: Box<dyn PageFetcher>,
    renderer: Box<dyn PageRenderer>,
    sites: SiteRegistry,
    limits: AmountLimits,
}

impl ListingScraper {
    pub fn new(config: &AppConfig) -> Result<Self, ScraperError> {
        let fetcher = HttpFetcher::new(config.fetch_timeout)?;
        let renderer = ChromeRenderer::new(config.browser.clone());
        Ok(Self::with_backends(
            Box::new(fetcher),
            Box::new(renderer),
            config.limits,
        ))
    }

    pub fn with_backends(
        fetcher: Box<dyn PageFetcher>,
        renderer: Box<dyn PageRenderer>,
        limits: AmountLimits,
    ) -> Self {
        Self {
            fetcher,
            renderer,
            sites: SiteRegistry::with_limits(limits),
            limits,
        }
    }

    pub fn supported_sites(&self) -> Vec<&'static str> {
        self.sites.names()
    }

    pub fn rendered_sites(&self) -> Vec<&'static str> {
        self.sites.rendered_names()
    }

    /// Direct-fetch extraction. Literal HTML wins over fetching; sites that
    /// block plain clients are rendered in the browser instead.
    pub fn scrape(&self, req: &ExtractRequest) -> Result<ListingRecord, ScraperError> {
        let start = Instant::now();
        let url = non_empty(&req.url);
        let html = non_empty(&req.html);

        if url.is_none() && html.is_none() {
            return Err(ScraperError::InvalidRequest(
                "URL or HTML is required".into(),
            ));
        }
        let url = url.unwrap_or(UNKNOWN_URL);
        let site = self.sites.find(url);

        let (page, source) = match html {
            Some(html) => (html.to_string(), Source::Literal),
            None => {
                validate_url(url)?;
                match site {
                    Some(s) if s.requires_rendering() => {
                        info!(%url, site = s.name(), "site blocks plain clients, rendering");
                        (self.renderer.render(url)?, Source::Rendered)
                    }
                    _ => (self.fetcher.fetch(url)?, Source::Fetched),
                }
            }
        };

        let record = self.extract(&page, url, site, source)?;
        info!(%url, ?source, title = %record.title, elapsed = ?start.elapsed(), "listing extracted");
        Ok(record)
    }

    /// Browser-rendered extraction, limited to the sites that need it.
    /// The check happens before a browser is launched.
    pub fn scrape_rendered(&self, req: &RenderRequest) -> Result<ListingRecord, ScraperError> {
        let start = Instant::now();
        let url = non_empty(&req.url)
            .ok_or_else(|| ScraperError::InvalidRequest("URL is required".into()))?;
        validate_url(url)?;

        let site = self
            .sites
            .find(url)
            .filter(|s| s.requires_rendering())
            .ok_or_else(|| ScraperError::UnsupportedSite {
                url: url.to_string(),
                rendered: true,
                supported: self.sites.rendered_names(),
            })?;

        let page = self.renderer.render(url)?;
        let record = self.extract(&page, url, Some(site), Source::Rendered)?;
        info!(%url, site = site.name(), elapsed = ?start.elapsed(), "rendered listing extracted");
        Ok(record)
    }

    /// Structured data first, the site extractor when that finds nothing
    /// titled, then the final range check and usability gate.
    fn extract(
        &self,
        page: &str,
        url: &str,
        site: Option<&dyn SiteExtractor>,
        source: Source,
    ) -> Result<ListingRecord, ScraperError> {
        let mut record = structured::extract(page, url, &self.limits);

        if record.as_ref().map_or(true, |r| r.title.is_empty()) {
            match site {
                Some(site) => {
                    debug!(%url, site = site.name(), "falling back to site extractor");
                    // an empty site result never displaces an address-only record
                    record = match site.extract(page, url) {
                        Some(found) if found.is_usable() || record.is_none() => Some(found),
                        _ => record,
                    };
                }
                None if source != Source::Literal => {
                    return Err(ScraperError::UnsupportedSite {
                        url: url.to_string(),
                        rendered: false,
                        supported: self.sites.names(),
                    });
                }
                None => {}
            }
        }

        let mut record = record.ok_or(ScraperError::NoData)?;
        record.enforce_limits(&self.limits);
        if !record.is_usable() {
            return Err(ScraperError::NoData);
        }
        Ok(record)
    }
}

/// The field as sent, when it holds more than whitespace.
fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

fn validate_url(url: &str) -> Result<(), ScraperError> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ScraperError::InvalidRequest(format!("not a valid URL: {url}"))),
    }
}
