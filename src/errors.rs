// errors.rs
use crate::scraper::ScraperError;
use astra::Response;
use thiserror::Error;

/// What a route handler can fail with, already phrased for the caller.
///
/// Each variant maps to one status code; `Blocked` additionally sets the
/// `blocked` flag in the JSON body so the UI can offer manual entry.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Blocked(String),

    #[error("{0}")]
    Internal(String),
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) | ServerError::Blocked(_) => 400,
            ServerError::Internal(_) => 500,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, ServerError::Blocked(_))
    }
}

impl From<ScraperError> for ServerError {
    fn from(err: ScraperError) -> Self {
        match err {
            ScraperError::InvalidRequest(msg) => ServerError::BadRequest(msg),
            ScraperError::UnsupportedSite {
                rendered: false,
                supported,
                ..
            } => ServerError::BadRequest(format!(
                "Site not supported yet. Supported sites: {}",
                supported.join(", ")
            )),
            ScraperError::UnsupportedSite {
                rendered: true,
                supported,
                ..
            } => ServerError::BadRequest(format!(
                "Browser extraction only supports {}. Use the regular extraction for other sites",
                supported.join(", ")
            )),
            ScraperError::Blocked { status, .. } => ServerError::Blocked(format!(
                "The site refused the request (HTTP {status}), it is probably blocking \
                 automated access. Please fill in the listing manually"
            )),
            ScraperError::Render(msg) => ServerError::Internal(format!(
                "Browser scraping error: {msg}. Try again or fill in the listing manually"
            )),
            ScraperError::NoData => ServerError::Internal(
                "Could not extract data from this page. Try manual entry".into(),
            ),
            ScraperError::Network(msg) | ScraperError::HtmlParse(msg) => {
                ServerError::Internal(format!("Scraping error: {msg}"))
            }
        }
    }
}
