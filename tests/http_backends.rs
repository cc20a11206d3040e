//! End-to-end runs against mock article and inference servers.

use precis::api::{handle_health, handle_summarize, SummarizeRequest};
use precis::{Config, Error, Pipeline};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn article_html() -> String {
    let body = vec!["sentence"; 80].join(" ");
    format!(
        "<html><head><title>Mock Article</title></head><body>\
         <h1>Overview</h1><p>{body}</p>\
         <h2>Footnote</h2><p>Too short to matter.</p>\
         </body></html>"
    )
}

fn config_for(inference: &MockServer) -> Config {
    let mut config = Config::default();
    config.agent.endpoint = inference.uri();
    config.agent.model = "facebook/bart-large-cnn".to_string();
    config
}

#[tokio::test]
async fn summarises_article_over_http() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_html()))
        .expect(1)
        .mount(&site)
        .await;

    let inference = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/facebook/bart-large-cnn"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{"summary_text": "An overview."}])),
        )
        .expect(1)
        .mount(&inference)
        .await;

    let pipeline = Pipeline::from_config(&config_for(&inference)).unwrap();
    let url = format!("{}/post", site.uri());

    let request = SummarizeRequest {
        url: Some(url.clone()),
    };
    let result = handle_summarize(&pipeline, &request).await.unwrap();
    assert_eq!(result.title, "Mock Article");
    assert_eq!(result.summaries.len(), 1);
    assert_eq!(result.summaries[0].heading, "Overview");
    assert_eq!(result.summaries[0].summary, "An overview.");

    // served from cache; the mocks' expect(1) verifies no second round trip
    let again = handle_summarize(&pipeline, &request).await.unwrap();
    assert_eq!(again, result);
}

#[tokio::test]
async fn missing_page_is_a_fetch_failure() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&site)
        .await;
    let inference = MockServer::start().await;

    let pipeline = Pipeline::from_config(&config_for(&inference)).unwrap();
    let err = pipeline.summarize(&site.uri()).await.unwrap_err();
    assert!(matches!(err, Error::Fetch(_)));
}

#[tokio::test]
async fn loading_model_yields_no_summaries() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_html()))
        .mount(&site)
        .await;
    let inference = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&inference)
        .await;

    let pipeline = Pipeline::from_config(&config_for(&inference)).unwrap();
    let err = pipeline.summarize(&site.uri()).await.unwrap_err();
    assert!(matches!(err, Error::NoSummaries));
}

#[test]
fn health_reports_configured_backend() {
    let pipeline = Pipeline::from_config(&Config::default()).unwrap();
    let health = handle_health(&pipeline);

    assert_eq!(health.status, "ok");
    assert_eq!(health.provider, "huggingface");
    assert_eq!(health.model, "facebook/bart-large-cnn");
}
