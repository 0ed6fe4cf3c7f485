use crate::domain::limits::AmountLimits;
use crate::errors::ServerError;
use crate::router::handle;
use crate::scraper::browser::PageRenderer;
use crate::scraper::fetcher::PageFetcher;
use crate::scraper::{ListingScraper, ScraperError};
use astra::{Body, Response};
use http::{Method, Request};
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// What a fake backend answers with.
#[derive(Clone)]
pub enum Canned {
    Page(String),
    Status(u16),
    Crash(&'static str),
}

/// Stands in for both the HTTP fetcher and the browser, counting calls.
#[derive(Clone)]
pub struct FakeBackend {
    answer: Canned,
    calls: Arc<AtomicUsize>,
}

impl FakeBackend {
    pub fn new(answer: Canned) -> Self {
        Self {
            answer,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn page(html: &str) -> Self {
        Self::new(Canned::Page(html.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer(&self, is_browser: bool) -> Result<String, ScraperError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Canned::Page(html) => Ok(html.clone()),
            Canned::Status(status) => Err(ScraperError::Blocked {
                status: *status,
                reason: String::new(),
            }),
            Canned::Crash(msg) if is_browser => Err(ScraperError::Render(msg.to_string())),
            Canned::Crash(msg) => Err(ScraperError::Network(msg.to_string())),
        }
    }
}

impl PageFetcher for FakeBackend {
    fn fetch(&self, _url: &str) -> Result<String, ScraperError> {
        self.answer(false)
    }
}

impl PageRenderer for FakeBackend {
    fn render(&self, _url: &str) -> Result<String, ScraperError> {
        self.answer(true)
    }
}

pub fn test_scraper(fetcher: &FakeBackend, renderer: &FakeBackend) -> ListingScraper {
    ListingScraper::with_backends(
        Box::new(fetcher.clone()),
        Box::new(renderer.clone()),
        AmountLimits::default(),
    )
}

/// A scraper whose backends fail loudly if a test reaches them.
pub fn offline_scraper() -> ListingScraper {
    let unreachable = FakeBackend::new(Canned::Crash("network disabled in tests"));
    test_scraper(&unreachable, &unreachable)
}

pub fn post_json(uri: &str, json: &str) -> astra::Request {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(json.as_bytes().to_vec()))
        .unwrap()
}

pub fn get(uri: &str) -> astra::Request {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn body_json(resp: Response) -> serde_json::Value {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    serde_json::from_str(&body).unwrap_or_else(|e| panic!("not JSON ({e}): {body}"))
}

/// Runs the request through the router and renders errors the way the
/// server does, returning status and parsed body.
pub fn call(req: astra::Request, scraper: &ListingScraper) -> (u16, serde_json::Value) {
    let resp = match handle(req, scraper) {
        Ok(resp) => resp,
        Err(err) => crate::responses::json_error_response(err),
    };
    let status = resp.status().as_u16();
    (status, body_json(resp))
}

pub fn expect_err(req: astra::Request, scraper: &ListingScraper) -> ServerError {
    match handle(req, scraper) {
        Ok(resp) => panic!("expected an error, got {}", resp.status()),
        Err(err) => err,
    }
}
