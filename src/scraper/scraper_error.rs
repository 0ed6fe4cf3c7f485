use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No extractor is registered for the URL's host. `supported` lists
    /// the sites the route would have accepted.
    #[error("Unsupported site: {url}")]
    UnsupportedSite {
        url: String,
        rendered: bool,
        supported: Vec<&'static str>,
    },

    /// The site answered with a non-success status, almost always an
    /// anti-bot wall rather than a missing page.
    #[error("Blocked by site: HTTP {status}")]
    Blocked { status: u16, reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Browser rendering error: {0}")]
    Render(String),

    #[error("HTML parse error: {0}")]
    HtmlParse(String),

    /// Every strategy ran but nothing usable came out.
    #[error("No listing data found")]
    NoData,
}
