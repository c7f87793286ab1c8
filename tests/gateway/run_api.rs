use crate::workflow_harness::{Harness, MockProvider, harness};
use postcraft::gateway::run_gateway_with_listener;
use postcraft::llm::ProviderResponse;
use serde_json::{Value, json};
use std::sync::Arc;

async fn serve(h: Harness) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let controller = Arc::new(h.controller);
    tokio::spawn(async move {
        let _ = run_gateway_with_listener(listener, controller).await;
    });
    base
}

#[tokio::test]
async fn run_lifecycle_over_http() {
    let provider = MockProvider::new(
        "Refined topic",
        vec![
            ProviderResponse::text_only("first draft".into()),
            ProviderResponse::text_only("second draft".into()),
        ],
    );
    let base = serve(harness(provider, "")).await;
    let client = reqwest::Client::new();

    let health = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(health.status(), 200);

    let started: Value = client
        .post(format!("{base}/runs"))
        .json(&json!({"topic": "rust in production"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(started["draft"], "first draft");
    let run_id = started["run_id"].as_str().unwrap().to_string();

    let run: Value = client
        .get(format!("{base}/runs/{run_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(run["stage"], "await_review");
    assert_eq!(run["state"]["topic"], "Refined topic");

    let revised: Value = client
        .post(format!("{base}/runs/{run_id}/feedback"))
        .json(&json!({"feedback": "more concrete"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(revised["status"], "draft");
    assert_eq!(revised["draft"], "second draft");

    let listed: Value = client
        .get(format!("{base}/runs"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let published: Value = client
        .post(format!("{base}/runs/{run_id}/approve"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(published["status"], "published");
    assert_eq!(published["result"]["success"], true);

    let gone = client
        .get(format!("{base}/runs/{run_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(gone.status(), 404);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let base = serve(harness(MockProvider::new("t", vec![]), "")).await;
    let topic = "x".repeat(70_000);

    let response = reqwest::Client::new()
        .post(format!("{base}/runs"))
        .json(&json!({ "topic": topic }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 413);
}

#[tokio::test]
async fn blank_topic_is_a_bad_request() {
    let base = serve(harness(MockProvider::new("t", vec![]), "")).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/runs"))
        .json(&json!({"topic": "   "}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}
