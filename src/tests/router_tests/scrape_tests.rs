use crate::errors::ServerError;
use crate::tests::utils::{
    call, expect_err, offline_scraper, post_json, test_scraper, Canned, FakeBackend,
};
use serde_json::json;

const STUDIO: &str = r#"<html><head><script type="application/ld+json">{"@type":"Apartment","name":"Studio Central","address":"Rua X, 10, Centro, Curitiba/PR"}</script></head><body></body></html>"#;

#[test]
fn literal_html_with_structured_data() {
    let body = json!({ "html": STUDIO }).to_string();
    let (status, record) = call(post_json("/api/scrape", &body), &offline_scraper());

    assert_eq!(status, 200);
    assert_eq!(
        record,
        json!({
            "title": "Studio Central",
            "address": "Rua X, 10, Centro, Curitiba/PR",
            "neighborhood": "Centro",
            "rent": 0,
            "condo": 0,
            "iptu": 0,
            "images": [],
            "url": "unknown"
        })
    );
}

#[test]
fn blocked_fetch_sets_blocked_flag() {
    let fetcher = FakeBackend::new(Canned::Status(403));
    let renderer = FakeBackend::new(Canned::Crash("not used"));
    let scraper = test_scraper(&fetcher, &renderer);

    let body = json!({ "url": "https://www.quintoandar.com.br/imovel/893712345/alugar" }).to_string();
    let (status, error) = call(post_json("/api/scrape", &body), &scraper);

    assert_eq!(status, 400);
    assert_eq!(error["blocked"], true);
    assert!(error["error"].as_str().unwrap().contains("403"));
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(renderer.calls(), 0);
}

#[test]
fn missing_url_and_html_is_bad_request() {
    let err = expect_err(post_json("/api/scrape", "{}"), &offline_scraper());
    assert!(matches!(err, ServerError::BadRequest(_)));
    assert_eq!(err.status(), 400);
}

#[test]
fn malformed_body_is_bad_request() {
    let (status, error) = call(post_json("/api/scrape", "url=abc"), &offline_scraper());
    assert_eq!(status, 400);
    assert!(error["error"].as_str().unwrap().starts_with("Invalid JSON body"));
}

#[test]
fn unsupported_site_lists_supported_sources() {
    let fetcher = FakeBackend::page("<html><body><h1>Apartamento</h1></body></html>");
    let scraper = test_scraper(&fetcher, &fetcher);

    let body = json!({ "url": "https://www.olx.com.br/imoveis/123" }).to_string();
    let (status, error) = call(post_json("/api/scrape", &body), &scraper);

    assert_eq!(status, 400);
    assert!(error["error"].as_str().unwrap().contains("ChavesNaMao"));
    assert!(error.get("blocked").is_none());
}

#[test]
fn site_extractor_fills_in_when_structured_data_is_missing() {
    let page = r#"<html><body>
        <div class="title-section"><h1>Sobrado 3 quartos</h1></div>
        <p class="address-text">Rua Chile - Rebouças - Curitiba</p>
        <p>Aluguel R$ 3.900/mês</p>
        <p>Condomínio R$ 1.234,56</p>
    </body></html>"#;
    let fetcher = FakeBackend::page(page);
    let scraper = test_scraper(&fetcher, &FakeBackend::new(Canned::Crash("not used")));

    let url = "https://www.chavesnamao.com.br/imovel/sobrado-3-quartos/id-42/";
    let body = json!({ "url": url }).to_string();
    let (status, record) = call(post_json("/api/scrape", &body), &scraper);

    assert_eq!(status, 200);
    assert_eq!(record["title"], "Sobrado 3 quartos");
    assert_eq!(record["neighborhood"], "Rebouças");
    assert_eq!(record["rent"], 3900);
    // 1.234,56 strips to 123456, above the condo ceiling
    assert_eq!(record["condo"], 0);
    assert_eq!(record["url"], url);
}

#[test]
fn empty_page_suggests_manual_entry() {
    let fetcher = FakeBackend::page("<html><body><p>Anúncio removido</p></body></html>");
    let scraper = test_scraper(&fetcher, &fetcher);

    let body = json!({ "url": "https://www.quintoandar.com.br/imovel/1" }).to_string();
    let (status, error) = call(post_json("/api/scrape", &body), &scraper);

    assert_eq!(status, 500);
    assert!(error["error"].as_str().unwrap().contains("manual entry"));
}

#[test]
fn network_failure_is_internal_error() {
    let fetcher = FakeBackend::new(Canned::Crash("connection reset"));
    let scraper = test_scraper(&fetcher, &fetcher);

    let body = json!({ "url": "https://www.chavesnamao.com.br/imovel/1/" }).to_string();
    let (status, error) = call(post_json("/api/scrape", &body), &scraper);

    assert_eq!(status, 500);
    assert!(error["error"].as_str().unwrap().contains("connection reset"));
}

#[test]
fn untitled_structured_data_on_unknown_site_is_unsupported() {
    let page = r#"<script type="application/ld+json">{"@type":"Apartment","address":"Rua X, 10, Centro, Curitiba/PR"}</script>"#;
    let fetcher = FakeBackend::page(page);
    let scraper = test_scraper(&fetcher, &fetcher);

    let body = json!({ "url": "https://www.olx.com.br/imovel/1" }).to_string();
    let (status, error) = call(post_json("/api/scrape", &body), &scraper);

    assert_eq!(status, 400);
    assert!(error["error"].as_str().unwrap().starts_with("Site not supported yet"));
}
