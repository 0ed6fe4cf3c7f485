use crate::config::AppConfig;
use crate::responses::json_error_response;
use crate::router::handle;
use astra::Server;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod domain;
mod errors;
mod responses;
mod router;
mod scraper;

#[cfg(test)]
mod tests;

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rental_scraper=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let listings = match crate::scraper::ListingScraper::new(&config) {
        Ok(s) => s,
        Err(e) => {
            error!("scraper init failed: {e}");
            std::process::exit(1);
        }
    };

    let addr = config.bind_addr;
    info!(%addr, workers = config.max_workers, sources = ?listings.supported_sites(), "starting server");

    let server = Server::bind(&addr).max_workers(config.max_workers);

    let result = server.serve(move |req, _info| match handle(req, &listings) {
        Ok(resp) => resp,
        Err(err) => json_error_response(err),
    });

    if let Err(e) = result {
        error!("server ended with error: {e}");
    }

    info!("server shut down");
}
