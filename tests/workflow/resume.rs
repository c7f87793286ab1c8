use crate::workflow_harness::{MockProvider, file_harness};
use postcraft::llm::ProviderResponse;
use postcraft::workflow::{FeedbackOutcome, Stage, StartRequest};

#[tokio::test]
async fn suspended_run_survives_a_new_controller() {
    let dir = tempfile::tempdir().unwrap();

    let first = file_harness(
        MockProvider::new("topic", vec![ProviderResponse::text_only("draft one".into())]),
        dir.path(),
    );
    let started = first
        .controller
        .start(StartRequest {
            topic: "persisted topic".into(),
            ..StartRequest::default()
        })
        .await
        .unwrap();
    drop(first);

    let second = file_harness(
        MockProvider::new("unused", vec![ProviderResponse::text_only("draft two".into())]),
        dir.path(),
    );
    let run = second.controller.current(&started.run_id).unwrap().unwrap();
    assert_eq!(run.stage, Stage::AwaitReview);
    assert_eq!(run.state.draft_post, "draft one");
    assert_eq!(run.state.topic, "topic");

    let outcome = second
        .controller
        .submit_feedback(&started.run_id, "tighten the intro")
        .await
        .unwrap();
    assert!(matches!(outcome, FeedbackOutcome::Draft { ref draft, .. } if draft == "draft two"));

    let third = file_harness(MockProvider::new("unused", vec![]), dir.path());
    let outcome = third.controller.approve(&started.run_id).await.unwrap();
    assert!(matches!(outcome, FeedbackOutcome::Published { ref result } if result.success));
    assert_eq!(third.publisher.texts(), vec!["draft two"]);
    assert!(third.controller.list().unwrap().is_empty());
}

#[tokio::test]
async fn list_returns_every_suspended_run() {
    let dir = tempfile::tempdir().unwrap();
    let h = file_harness(MockProvider::new("topic", vec![]), dir.path());

    let a = h
        .controller
        .start(StartRequest {
            topic: "first".into(),
            ..StartRequest::default()
        })
        .await
        .unwrap();
    let b = h
        .controller
        .start(StartRequest {
            topic: "second".into(),
            ..StartRequest::default()
        })
        .await
        .unwrap();

    let ids: Vec<String> = h
        .controller
        .list()
        .unwrap()
        .into_iter()
        .map(|run| run.run_id)
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&a.run_id));
    assert!(ids.contains(&b.run_id));
}
