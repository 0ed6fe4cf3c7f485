mod health_tests;
mod scrape_browser_tests;
mod scrape_tests;
