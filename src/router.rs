use crate::errors::{ResultResp, ServerError};
use crate::responses::json_response;
use crate::scraper::{ExtractRequest, ListingScraper, RenderRequest};
use astra::Request;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Read;
use tracing::info;

#[derive(Serialize)]
struct Health {
    status: &'static str,
    sources: Vec<&'static str>,
    /// Sources that go through the browser.
    rendered: Vec<&'static str>,
}

pub fn handle(mut req: Request, scraper: &ListingScraper) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    info!(%method, %path, "request");

    match (method.as_str(), path.as_str()) {
        ("GET", "/health") => json_response(&Health {
            status: "ok",
            sources: scraper.supported_sites(),
            rendered: scraper.rendered_sites(),
        }),

        ("POST", "/api/scrape") => {
            let body: ExtractRequest = parse_json(&mut req)?;
            let record = scraper.scrape(&body)?;
            json_response(&record)
        }

        ("POST", "/api/scrape-browser") => {
            let body: RenderRequest = parse_json(&mut req)?;
            let record = scraper.scrape_rendered(&body)?;
            json_response(&record)
        }

        _ => Err(ServerError::NotFound),
    }
}

fn parse_json<T: DeserializeOwned>(req: &mut Request) -> Result<T, ServerError> {
    let mut raw = String::new();
    req.body_mut()
        .reader()
        .read_to_string(&mut raw)
        .map_err(|e| ServerError::BadRequest(format!("Failed to read body: {e}")))?;

    serde_json::from_str(&raw).map_err(|e| ServerError::BadRequest(format!("Invalid JSON body: {e}")))
}
