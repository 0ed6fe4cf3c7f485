use crate::tests::utils::{call, offline_scraper, post_json, test_scraper, Canned, FakeBackend};
use serde_json::json;

/// What a listing looks like when navigation timed out half way: the
/// header rendered, the price widgets did not.
const PARTIAL_IMOVELWEB: &str = r#"<html><body>
    <h1>Apartamento 2 quartos com sacada no Bigorrilho</h1>
    <div class="loading-spinner"></div>
</body></html>"#;

#[test]
fn partial_render_still_returns_title() {
    let renderer = FakeBackend::page(PARTIAL_IMOVELWEB);
    let fetcher = FakeBackend::new(Canned::Crash("not used"));
    let scraper = test_scraper(&fetcher, &renderer);

    let url = "https://www.imovelweb.com.br/propriedades/apartamento-2-quartos-2990011.html";
    let body = json!({ "url": url }).to_string();
    let (status, record) = call(post_json("/api/scrape-browser", &body), &scraper);

    assert_eq!(status, 200);
    assert_eq!(record["title"], "Apartamento 2 quartos com sacada no Bigorrilho");
    assert_eq!(record["rent"], 0);
    assert_eq!(record["condo"], 0);
    assert_eq!(record["iptu"], 0);
    assert_eq!(record["images"], json!([]));
    assert_eq!(renderer.calls(), 1);
    assert_eq!(fetcher.calls(), 0);
}

#[test]
fn product_schema_from_rendered_vivareal() {
    let page = r#"<html><head>
        <meta name="description" content="Apartamento para alugar na Rua Samuel Cézar, 1197 - Água Verde - Curitiba - PR.">
        <script type="application/ld+json">
            {"@type":"Product","name":"Apartamento 1 quarto","offers":{"price":2100},
             "image":["https://resizedimgs.vivareal.com/a.jpg"]}
        </script></head>
        <body>
            <span data-testid="condoFee">R$ 450</span>
            <span data-testid="iptu">R$ 60</span>
        </body></html>"#;
    let renderer = FakeBackend::page(page);
    let scraper = test_scraper(&FakeBackend::new(Canned::Crash("not used")), &renderer);

    let body = json!({ "url": "https://www.vivareal.com.br/imovel/apartamento-1-quartos-agua-verde-id-1/" })
        .to_string();
    let (status, record) = call(post_json("/api/scrape-browser", &body), &scraper);

    assert_eq!(status, 200);
    assert_eq!(record["title"], "Apartamento 1 quarto");
    assert_eq!(record["address"], "Rua Samuel Cézar, 1197");
    assert_eq!(record["neighborhood"], "Água Verde");
    assert_eq!((record["rent"].as_i64(), record["condo"].as_i64(), record["iptu"].as_i64()),
        (Some(2100), Some(450), Some(60)));
    assert_eq!(record["images"], json!(["https://resizedimgs.vivareal.com/a.jpg"]));
}

#[test]
fn direct_fetch_sites_are_refused_without_launching() {
    let renderer = FakeBackend::page(PARTIAL_IMOVELWEB);
    let scraper = test_scraper(&renderer, &renderer);

    let body = json!({ "url": "https://www.quintoandar.com.br/imovel/1" }).to_string();
    let (status, error) = call(post_json("/api/scrape-browser", &body), &scraper);

    assert_eq!(status, 400);
    assert!(error["error"]
        .as_str()
        .unwrap()
        .contains("only supports ImovelWeb, VivaReal"));
    assert_eq!(renderer.calls(), 0);
}

#[test]
fn url_is_required() {
    let body = json!({ "html": PARTIAL_IMOVELWEB }).to_string();
    let (status, error) = call(post_json("/api/scrape-browser", &body), &offline_scraper());

    assert_eq!(status, 400);
    assert!(error["error"].as_str().unwrap().contains("URL"));
}

#[test]
fn browser_crash_is_internal_error() {
    let renderer = FakeBackend::new(Canned::Crash("chrome exited"));
    let scraper = test_scraper(&renderer, &renderer);

    let body = json!({ "url": "https://www.vivareal.com.br/imovel/1/" }).to_string();
    let (status, error) = call(post_json("/api/scrape-browser", &body), &scraper);

    assert_eq!(status, 500);
    assert!(error["error"].as_str().unwrap().starts_with("Browser scraping error"));
    assert!(error.get("blocked").is_none());
}
