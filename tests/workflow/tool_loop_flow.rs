use crate::workflow_harness::{MockProvider, harness, harness_with_cap};
use postcraft::enrich::EnrichMode;
use postcraft::llm::ProviderResponse;
use postcraft::workflow::{HistoryEntry, StartRequest};
use serde_json::json;

#[tokio::test]
async fn search_result_feeds_the_final_draft() {
    let provider = MockProvider::new(
        "Edge caching in 2026",
        vec![
            ProviderResponse::tool_call("call_1", "web_search", json!({"topic": "edge caching"})),
            ProviderResponse::text_only("Draft grounded in search".into()),
        ],
    );
    let h = harness(provider, "1. CDN report: hit rates up");

    let started = h
        .controller
        .start(StartRequest {
            topic: "edge caching".into(),
            ..StartRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(started.draft, "Draft grounded in search");
    assert_eq!(
        h.enricher.queries(),
        vec![("edge caching".to_string(), EnrichMode::Search)]
    );
    assert!(started.logs.iter().any(|line| line.contains("web_search")));

    // Tools are offered on the first call and withheld once the cap is spent.
    assert_eq!(h.provider.seen_tool_counts(), vec![2, 0]);
    let prompts = h.provider.seen_prompts();
    assert!(prompts[1].contains("1. CDN report: hit rates up"));

    let run = h.controller.current(&started.run_id).unwrap().unwrap();
    assert_eq!(run.state.context_results, "1. CDN report: hit rates up");
    assert_eq!(run.tool_calls_this_cycle, 1);
    assert!(run.state.conversation_history.iter().any(|entry| matches!(
        entry,
        HistoryEntry::ToolResult { tool, .. } if tool == "web_search"
    )));
}

#[tokio::test]
async fn higher_cap_allows_a_second_tool_call() {
    let provider = MockProvider::new(
        "topic",
        vec![
            ProviderResponse::tool_call("call_1", "web_search", json!({"topic": "a"})),
            ProviderResponse::tool_call("call_2", "fetch_url", json!({"url": "https://example.com/a"})),
            ProviderResponse::text_only("final".into()),
        ],
    );
    let h = harness_with_cap(provider, "page text", 2);

    let started = h
        .controller
        .start(StartRequest {
            topic: "topic".into(),
            ..StartRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(started.draft, "final");
    assert_eq!(h.provider.seen_tool_counts(), vec![2, 2, 0]);
    assert_eq!(
        h.enricher.queries(),
        vec![
            ("a".to_string(), EnrichMode::Search),
            ("https://example.com/a".to_string(), EnrichMode::Fetch),
        ]
    );
}

#[tokio::test]
async fn revision_resets_the_tool_budget() {
    let provider = MockProvider::new(
        "topic",
        vec![
            ProviderResponse::tool_call("call_1", "web_search", json!({"topic": "first"})),
            ProviderResponse::text_only("draft one".into()),
            ProviderResponse::tool_call("call_2", "web_search", json!({"topic": "second"})),
            ProviderResponse::text_only("draft two".into()),
        ],
    );
    let h = harness(provider, "results");

    let started = h
        .controller
        .start(StartRequest {
            topic: "topic".into(),
            ..StartRequest::default()
        })
        .await
        .unwrap();
    h.controller
        .submit_feedback(&started.run_id, "dig deeper")
        .await
        .unwrap();

    assert_eq!(h.provider.seen_tool_counts(), vec![2, 0, 2, 0]);
    assert_eq!(h.enricher.queries().len(), 2);
}

#[tokio::test]
async fn explicit_source_url_is_fetched_before_drafting() {
    let provider = MockProvider::new("topic", vec![ProviderResponse::text_only("draft".into())]);
    let h = harness(provider, "Article title\nArticle body");

    let started = h
        .controller
        .start(StartRequest {
            topic: "write about this".into(),
            url: Some("https://blog.example.com/post".into()),
            temperature: Some(0.3),
        })
        .await
        .unwrap();

    assert_eq!(
        h.enricher.queries(),
        vec![("https://blog.example.com/post".to_string(), EnrichMode::Fetch)]
    );
    assert!(h.provider.seen_prompts()[0].contains("Article body"));

    let run = h.controller.current(&started.run_id).unwrap().unwrap();
    assert!((run.settings.temperature - 0.3).abs() < f64::EPSILON);
    assert_eq!(
        run.settings.source_url.as_deref(),
        Some("https://blog.example.com/post")
    );
}
