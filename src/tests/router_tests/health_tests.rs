use crate::tests::utils::{call, get, offline_scraper, post_json};

#[test]
fn health_lists_sources() {
    let (status, body) = call(get("/health"), &offline_scraper());

    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(
        body["sources"],
        serde_json::json!(["ImovelWeb", "VivaReal", "QuintoAndar", "ChavesNaMao"])
    );
    assert_eq!(body["rendered"], serde_json::json!(["ImovelWeb", "VivaReal"]));
}

#[test]
fn unknown_route_is_json_404() {
    let (status, body) = call(get("/api/listings"), &offline_scraper());

    assert_eq!(status, 404);
    assert_eq!(body["error"], "Not Found");
    assert!(body.get("blocked").is_none());
}

#[test]
fn scrape_route_only_accepts_post() {
    let (status, _) = call(get("/api/scrape"), &offline_scraper());
    assert_eq!(status, 404);

    let (status, _) = call(post_json("/health", "{}"), &offline_scraper());
    assert_eq!(status, 404);
}
