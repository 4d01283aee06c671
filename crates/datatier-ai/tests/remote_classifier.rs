//! Remote classifier behaviour against a simulated chat-completion service.

use std::time::Duration;

use datatier_ai::{ClassificationEngine, InvalidLabelPolicy, RemoteConfig, ResponseFormat};
use datatier_core::{ClassificationRequest, HeuristicClassifier, Label};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> RemoteConfig {
    RemoteConfig {
        api_key: Some("sk-test".to_string()),
        base_url: Url::parse(&format!("{}/v1", server.uri())).unwrap(),
        timeout: Duration::from_secs(5),
        ..RemoteConfig::default()
    }
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "gen-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    }))
}

fn request(column: &str, samples: &[&str]) -> ClassificationRequest {
    ClassificationRequest::new(column, samples.iter().map(|s| s.to_string()).collect()).unwrap()
}

async fn mount(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn valid_json_reply_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4",
            "messages": [
                { "role": "system" },
                { "role": "user", "content": "Column name: contact\nSample values: ['name@example.com']" }
            ]
        })))
        .respond_with(completion(
            r#"{"column":"contact","classification":"Confidential","justification":"contains email"}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let engine = ClassificationEngine::new(config_for(&server));
    assert_eq!(engine.strategy_name(), "remote");

    let result = engine.classify(&request("contact", &["name@example.com"])).await;
    assert_eq!(result.label, Label::Confidential);
    assert_eq!(result.justification, "contains email");
    assert_eq!(result.column_name, "contact");
    assert_eq!(result.source_name, "contact");
    assert_eq!(result.source_type, "uploaded file");
}

#[tokio::test]
async fn unrecognized_label_is_coerced_to_public() {
    let server = MockServer::start().await;
    let content = r#"{"column":"contact","classification":"Maybe","justification":"unclear"}"#;
    mount(&server, completion(content)).await;

    let engine = ClassificationEngine::new(config_for(&server));
    // The heuristic would say Top Secret here; the coerced result must not.
    let result = engine.classify(&request("contact", &["passport P123"])).await;
    assert_eq!(result.label, Label::Public);
    assert_eq!(result.justification, content);
}

#[tokio::test]
async fn unrecognized_label_can_use_heuristic() {
    let server = MockServer::start().await;
    mount(
        &server,
        completion(r#"{"classification":"secret-ish","justification":"?"}"#),
    )
    .await;

    let config = RemoteConfig {
        invalid_label_policy: InvalidLabelPolicy::Heuristic,
        ..config_for(&server)
    };
    let engine = ClassificationEngine::new(config);
    let req = request("contact", &["passport P123"]);
    let result = engine.classify(&req).await;
    assert_eq!(result, HeuristicClassifier::new().classify_sync(&req));
    assert_eq!(result.label, Label::TopSecret);
}

#[tokio::test]
async fn lowercase_label_is_unrecognized() {
    let server = MockServer::start().await;
    mount(
        &server,
        completion(r#"{"classification":"confidential","justification":"email"}"#),
    )
    .await;

    let engine = ClassificationEngine::new(config_for(&server));
    let result = engine.classify(&request("contact", &["x"])).await;
    assert_eq!(result.label, Label::Public);
}

#[tokio::test]
async fn internal_alias_maps_to_restricted() {
    let server = MockServer::start().await;
    mount(
        &server,
        completion(r#"{"classification":"Internal","justification":"staff titles"}"#),
    )
    .await;

    let engine = ClassificationEngine::new(config_for(&server));
    let result = engine.classify(&request("title", &["Manager"])).await;
    assert_eq!(result.label, Label::Restricted);
    assert_eq!(result.justification, "staff titles");
}

#[tokio::test]
async fn server_error_falls_back_to_heuristic() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(500).set_body_string("upstream down")).await;

    let engine = ClassificationEngine::new(config_for(&server));
    let req = request("contact", &["phone 0555 123"]);
    let result = engine.classify(&req).await;
    assert_eq!(result, HeuristicClassifier::new().classify_sync(&req));
}

#[tokio::test]
async fn unauthorized_falls_back_to_heuristic() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(401)).await;

    let engine = ClassificationEngine::new(config_for(&server));
    let req = request("amount", &["12", "13"]);
    let result = engine.classify(&req).await;
    assert_eq!(result.label, Label::Public);
    assert_eq!(result.justification, "No sensitive patterns detected");
}

#[tokio::test]
async fn timeout_falls_back_to_heuristic() {
    let server = MockServer::start().await;
    mount(
        &server,
        completion(r#"{"classification":"Public","justification":"late"}"#)
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let config = RemoteConfig {
        timeout: Duration::from_millis(200),
        ..config_for(&server)
    };
    let engine = ClassificationEngine::new(config);
    let req = request("contact", &["iqama 99"]);
    let result = engine.classify(&req).await;
    assert_eq!(result, HeuristicClassifier::new().classify_sync(&req));
    assert_eq!(result.label, Label::TopSecret);
}

#[tokio::test]
async fn connection_refused_falls_back_to_heuristic() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    drop(server);

    let engine = ClassificationEngine::new(config);
    let req = request("contact", &["bank account"]);
    let result = engine.classify(&req).await;
    assert_eq!(result, HeuristicClassifier::new().classify_sync(&req));
}

#[tokio::test]
async fn non_json_content_falls_back_to_heuristic() {
    let server = MockServer::start().await;
    mount(&server, completion("Confidential: contains email")).await;

    let engine = ClassificationEngine::new(config_for(&server));
    let req = request("contact", &["department"]);
    let result = engine.classify(&req).await;
    assert_eq!(result, HeuristicClassifier::new().classify_sync(&req));
    assert_eq!(result.label, Label::Restricted);
}

#[tokio::test]
async fn missing_justification_falls_back_to_heuristic() {
    let server = MockServer::start().await;
    mount(&server, completion(r#"{"classification":"Confidential"}"#)).await;

    let engine = ClassificationEngine::new(config_for(&server));
    let req = request("contact", &["plain"]);
    let result = engine.classify(&req).await;
    assert_eq!(result.justification, "No sensitive patterns detected");
}

#[tokio::test]
async fn empty_choices_falls_back_to_heuristic() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })),
    )
    .await;

    let engine = ClassificationEngine::new(config_for(&server));
    let req = request("contact", &["email"]);
    let result = engine.classify(&req).await;
    assert_eq!(result, HeuristicClassifier::new().classify_sync(&req));
}

#[tokio::test]
async fn garbage_envelope_falls_back_to_heuristic() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;

    let engine = ClassificationEngine::new(config_for(&server));
    let req = request("contact", &["ssn 1"]);
    let result = engine.classify(&req).await;
    assert_eq!(result, HeuristicClassifier::new().classify_sync(&req));
}

#[tokio::test]
async fn delimited_reply_is_split_on_first_colon() {
    let server = MockServer::start().await;
    mount(&server, completion("Top Secret: national ids: Saudi PDPL")).await;

    let config = RemoteConfig {
        response_format: ResponseFormat::Delimited,
        ..config_for(&server)
    };
    let engine = ClassificationEngine::new(config);
    let result = engine.classify(&request("nid", &["1029384756"])).await;
    assert_eq!(result.label, Label::TopSecret);
    assert_eq!(result.justification, "national ids: Saudi PDPL");
}

#[tokio::test]
async fn delimited_reply_without_separator_is_label_only() {
    let server = MockServer::start().await;
    mount(&server, completion("Confidential")).await;

    let config = RemoteConfig {
        response_format: ResponseFormat::Delimited,
        ..config_for(&server)
    };
    let engine = ClassificationEngine::new(config);
    let result = engine.classify(&request("salary", &["1000"])).await;
    assert_eq!(result.label, Label::Confidential);
    assert_eq!(result.justification, "");
}

#[tokio::test]
async fn delimited_unrecognized_label_keeps_text() {
    let server = MockServer::start().await;
    mount(&server, completion("Not sure about this one")).await;

    let config = RemoteConfig {
        response_format: ResponseFormat::Delimited,
        ..config_for(&server)
    };
    let engine = ClassificationEngine::new(config);
    let result = engine.classify(&request("misc", &["email"])).await;
    assert_eq!(result.label, Label::Public);
    assert_eq!(result.justification, "Not sure about this one");
}

#[tokio::test]
async fn batch_order_is_preserved_under_uneven_latency() {
    let server = MockServer::start().await;
    let delays = [("first", 400), ("second", 200), ("third", 0)];
    for (column, delay_ms) in delays {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_string_contains(format!("Column name: {}", column)))
            .respond_with(
                completion(&format!(
                    r#"{{"classification":"Restricted","justification":"{}"}}"#,
                    column
                ))
                .set_delay(Duration::from_millis(delay_ms)),
            )
            .mount(&server)
            .await;
    }

    let engine = ClassificationEngine::new(config_for(&server));
    let requests = vec![
        request("first", &["a"]),
        request("second", &["b"]),
        request("third", &["c"]),
    ];
    let results = engine.classify_all(&requests).await;

    let columns: Vec<&str> = results.iter().map(|r| r.column_name.as_str()).collect();
    assert_eq!(columns, vec!["first", "second", "third"]);
    let justifications: Vec<&str> = results.iter().map(|r| r.justification.as_str()).collect();
    assert_eq!(justifications, vec!["first", "second", "third"]);
    assert!(results.iter().all(|r| r.label == Label::Restricted));
}

#[tokio::test]
async fn no_credential_never_calls_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("Top Secret: nope"))
        .expect(0)
        .mount(&server)
        .await;

    let config = RemoteConfig {
        api_key: None,
        ..config_for(&server)
    };
    let engine = ClassificationEngine::new(config);
    assert_eq!(engine.strategy_name(), "heuristic");

    let req = request("contact", &["mobile"]);
    let result = engine.classify(&req).await;
    assert_eq!(result, HeuristicClassifier::new().classify_sync(&req));
}
