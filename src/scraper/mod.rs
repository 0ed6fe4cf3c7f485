pub mod browser;
pub mod dom;
pub mod fetcher;
pub mod normalize;
mod scraper;
mod scraper_error;
pub mod sites;
pub mod structured;

pub use scraper::{ExtractRequest, ListingScraper, RenderRequest};
pub use scraper_error::ScraperError;
