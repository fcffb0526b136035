use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kaapav::config::AiConfig;
use kaapav::services::ad_copy::AdCopyService;

fn openai_config(base_url: String) -> AiConfig {
    AiConfig {
        provider: "openai".to_string(),
        api_key: Some("test-key".to_string()),
        base_url,
        model: "gpt-4o-mini".to_string(),
        cache_ttl: Duration::from_secs(60),
    }
}

#[tokio::test]
async fn identical_prompts_within_ttl_hit_provider_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Shimmering saris for Diwali nights."}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = AdCopyService::new(openai_config(server.uri()));

    let first = service.generate("Diwali sari campaign").await;
    let second = service.generate("Diwali sari campaign").await;

    assert_eq!(first, "Shimmering saris for Diwali nights.");
    assert_eq!(first, second);
}

#[tokio::test]
async fn provider_failure_yields_cached_fallback() {
    let server = MockServer::start().await;
    // One attempt per cache miss: the failure is cached, so the second
    // generate call must not reach the provider at all
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let service = AdCopyService::new(openai_config(server.uri()));

    let first = service.generate("Wedding lehenga retargeting").await;
    let second = service.generate("Wedding lehenga retargeting").await;

    assert!(first.contains("Fallback Ad Copy"));
    assert!(first.contains("Wedding lehenga retargeting"));
    assert_eq!(first, second);
}

#[tokio::test]
async fn distinct_prompts_each_reach_the_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "Copy."}}]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let service = AdCopyService::new(openai_config(server.uri()));

    service.generate("Kurti clearance").await;
    service.generate("Jewellery festive drop").await;
}

#[tokio::test]
async fn missing_api_key_falls_back_without_calling_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = openai_config(server.uri());
    config.api_key = None;
    let service = AdCopyService::new(config);

    let text = service.generate("Sari spotlight").await;
    assert!(text.contains("Sari spotlight"));
}
