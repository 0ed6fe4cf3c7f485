// scraper/browser.rs
//! Headless Chrome rendering for sites that wall off plain HTTP clients.

use crate::scraper::fetcher::{ACCEPT_LANGUAGE_PT_BR, USER_AGENT};
use crate::scraper::ScraperError;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Flags for running inside containers and other constrained hosts.
const LAUNCH_FLAGS: &[&str] = &[
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-accelerated-2d-canvas",
    "--disable-gpu",
];

/// "render(url) -> fully-rendered HTML"
pub trait PageRenderer: Send + Sync {
    fn render(&self, url: &str) -> Result<String, ScraperError>;
}

#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub chrome_path: Option<PathBuf>,
    pub viewport: (u32, u32),
    pub nav_timeout: Duration,
    /// Fixed wait after navigation for deferred/async content.
    pub settle: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            viewport: (1920, 1080),
            nav_timeout: Duration::from_secs(60),
            settle: Duration::from_secs(3),
        }
    }
}

/// One browser process per render call, never shared between requests.
pub struct ChromeRenderer {
    config: BrowserConfig,
}

impl ChromeRenderer {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    fn launch_options(&self) -> Result<LaunchOptions<'static>, ScraperError> {
        let args: Vec<&'static OsStr> = LAUNCH_FLAGS.iter().map(|f| OsStr::new(*f)).collect();

        LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .window_size(Some(self.config.viewport))
            .path(self.config.chrome_path.clone())
            // the browser must outlive navigation plus the settle wait
            .idle_browser_timeout(self.config.nav_timeout + self.config.settle + Duration::from_secs(30))
            .args(args)
            .build()
            .map_err(|e| ScraperError::Render(format!("launch options: {e}")))
    }

    fn capture(&self, session: &BrowserSession, url: &str) -> Result<String, ScraperError> {
        let tab = session.tab()?;
        tab.set_default_timeout(self.config.nav_timeout);
        tab.set_user_agent(USER_AGENT, Some(ACCEPT_LANGUAGE_PT_BR), None)
            .map_err(|e| ScraperError::Render(format!("set user agent: {e}")))?;

        // A slow page is not a failure; whatever loaded is still worth parsing.
        if let Err(e) = tab.navigate_to(url).and_then(|t| t.wait_until_navigated()) {
            warn!(%url, "navigation did not finish ({e}), continuing with available content");
        }

        std::thread::sleep(self.config.settle);

        tab.get_content()
            .map_err(|e| ScraperError::Render(format!("read content: {e}")))
    }
}

impl PageRenderer for ChromeRenderer {
    fn render(&self, url: &str) -> Result<String, ScraperError> {
        let start = Instant::now();
        info!(%url, "launching browser");

        let mut session = BrowserSession::launch(self.launch_options()?)?;
        let result = self.capture(&session, url);
        session.close();

        match &result {
            Ok(html) => info!(%url, bytes = html.len(), elapsed = ?start.elapsed(), "page rendered"),
            Err(e) => warn!(%url, "browser scraping error: {e}"),
        }
        result
    }
}

/// Browser process and its tab. `close` empties both slots, so the
/// explicit close on the happy path and the one in `Drop` never overlap.
struct BrowserSession {
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
}

impl BrowserSession {
    fn launch(options: LaunchOptions<'static>) -> Result<Self, ScraperError> {
        let browser = Browser::new(options)
            .map_err(|e| ScraperError::Render(format!("launch: {e}")))?;

        let mut session = Self {
            browser: Some(browser),
            tab: None,
        };
        let tab = session
            .browser
            .as_ref()
            .ok_or_else(|| ScraperError::Render("browser closed".into()))?
            .new_tab()
            .map_err(|e| ScraperError::Render(format!("new tab: {e}")))?;
        session.tab = Some(tab);
        Ok(session)
    }

    fn tab(&self) -> Result<&Arc<Tab>, ScraperError> {
        self.tab
            .as_ref()
            .ok_or_else(|| ScraperError::Render("no open tab".into()))
    }

    fn is_open(&self) -> bool {
        self.browser.is_some() || self.tab.is_some()
    }

    fn close(&mut self) {
        if let Some(tab) = self.tab.take() {
            if let Err(e) = tab.close(false) {
                debug!("tab close failed: {e}");
            }
        }
        // dropping the handle kills the child process
        if self.browser.take().is_some() {
            debug!("browser session closed");
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if self.is_open() {
            self.close();
        }
    }
}
