use crate::workflow_harness::{MockProvider, harness};
use postcraft::PostcraftError;
use postcraft::error::{RunError, WorkflowError};
use postcraft::llm::ProviderResponse;
use postcraft::workflow::{FeedbackOutcome, Stage, StartRequest};

fn request(topic: &str) -> StartRequest {
    StartRequest {
        topic: topic.to_string(),
        ..StartRequest::default()
    }
}

#[tokio::test]
async fn approve_publishes_the_reviewed_draft() {
    let provider = MockProvider::new(
        "Rust async runtimes compared",
        vec![ProviderResponse::text_only("Tokio vs smol: a field report".into())],
    );
    let h = harness(provider, "");

    let started = h.controller.start(request("rust async")).await.unwrap();
    assert_eq!(started.draft, "Tokio vs smol: a field report");

    let outcome = h.controller.approve(&started.run_id).await.unwrap();
    match outcome {
        FeedbackOutcome::Published { result } => {
            assert!(result.success);
            assert_eq!(result.post_id.as_deref(), Some("urn:li:share:100"));
        }
        other => panic!("expected published, got {other:?}"),
    }

    assert_eq!(h.publisher.texts(), vec!["Tokio vs smol: a field report"]);
    assert!(h.controller.current(&started.run_id).unwrap().is_none());
}

#[tokio::test]
async fn revision_feedback_reaches_the_next_prompt() {
    let provider = MockProvider::new(
        "Rust async runtimes compared",
        vec![
            ProviderResponse::text_only("A long first draft about runtimes".into()),
            ProviderResponse::text_only("Short draft".into()),
        ],
    );
    let h = harness(provider, "");

    let started = h.controller.start(request("rust async")).await.unwrap();
    let outcome = h
        .controller
        .submit_feedback(&started.run_id, "make it shorter")
        .await
        .unwrap();

    assert_eq!(
        outcome,
        FeedbackOutcome::Draft {
            run_id: started.run_id.clone(),
            draft: "Short draft".into(),
        }
    );

    let prompts = h.provider.seen_prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].contains("Previous Human Feedback for revision: make it shorter"));
    assert!(prompts[1].contains("User's Topic: Rust async runtimes compared"));

    let run = h.controller.current(&started.run_id).unwrap().unwrap();
    assert_eq!(run.stage, Stage::AwaitReview);
    assert_eq!(run.state.draft_post, "Short draft");
    assert!(!run.state.approved);
    assert_eq!(h.publisher.calls(), 0);
}

#[tokio::test]
async fn exit_ends_without_publishing() {
    let provider = MockProvider::new("topic", vec![ProviderResponse::text_only("draft".into())]);
    let h = harness(provider, "");

    let started = h.controller.start(request("anything")).await.unwrap();
    let outcome = h
        .controller
        .submit_feedback(&started.run_id, "Please EXIT now")
        .await
        .unwrap();

    assert_eq!(outcome, FeedbackOutcome::Ended);
    assert_eq!(h.publisher.calls(), 0);
    assert!(h.controller.current(&started.run_id).unwrap().is_none());
}

#[tokio::test]
async fn exit_after_a_revision_ends_without_publishing() {
    let provider = MockProvider::new(
        "topic",
        vec![
            ProviderResponse::text_only("first draft".into()),
            ProviderResponse::text_only("revised draft".into()),
        ],
    );
    let h = harness(provider, "");

    let started = h.controller.start(request("anything")).await.unwrap();
    let revised = h
        .controller
        .submit_feedback(&started.run_id, "make it shorter")
        .await
        .unwrap();
    assert!(matches!(revised, FeedbackOutcome::Draft { ref draft, .. } if draft == "revised draft"));

    let outcome = h
        .controller
        .submit_feedback(&started.run_id, "exit")
        .await
        .unwrap();

    assert_eq!(outcome, FeedbackOutcome::Ended);
    assert_eq!(h.publisher.calls(), 0);
    assert_eq!(h.provider.seen_prompts().len(), 2);
    assert!(h.controller.current(&started.run_id).unwrap().is_none());
}

#[tokio::test]
async fn approving_an_empty_draft_reports_failure() {
    let provider = MockProvider::new("topic", vec![ProviderResponse::text_only("   ".into())]);
    let h = harness(provider, "");

    let started = h.controller.start(request("anything")).await.unwrap();
    assert_eq!(started.draft, postcraft::workflow::NO_CONTENT);

    let outcome = h.controller.approve(&started.run_id).await.unwrap();
    match outcome {
        FeedbackOutcome::Published { result } => {
            assert!(!result.success);
            assert!(result.error.unwrap_or_default().contains("empty"));
        }
        other => panic!("expected failed publish, got {other:?}"),
    }
    assert_eq!(h.publisher.texts(), vec![String::new()]);
}

#[tokio::test]
async fn approve_wins_when_feedback_mentions_both_keywords() {
    let provider = MockProvider::new("topic", vec![ProviderResponse::text_only("draft".into())]);
    let h = harness(provider, "");

    let started = h.controller.start(request("anything")).await.unwrap();
    let outcome = h
        .controller
        .submit_feedback(&started.run_id, "exit? no, I approve")
        .await
        .unwrap();

    assert!(matches!(outcome, FeedbackOutcome::Published { .. }));
    assert_eq!(h.publisher.calls(), 1);
}

#[tokio::test]
async fn unknown_run_is_reported() {
    let h = harness(MockProvider::new("topic", vec![]), "");

    let err = h
        .controller
        .submit_feedback("no-such-run", "approve")
        .await
        .unwrap_err();
    assert!(matches!(err, PostcraftError::Run(RunError::NotFound(_))));
}

#[tokio::test]
async fn failed_revision_keeps_the_run_resumable() {
    let provider = MockProvider::new("topic", vec![ProviderResponse::text_only("first".into())]);
    let h = harness(provider, "");

    let started = h.controller.start(request("anything")).await.unwrap();
    h.provider.push_error("upstream unavailable");

    let err = h
        .controller
        .submit_feedback(&started.run_id, "add an example")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PostcraftError::Workflow(WorkflowError::Generation(_))
    ));

    let run = h.controller.current(&started.run_id).unwrap().unwrap();
    assert_eq!(run.stage, Stage::AwaitReview);
    assert_eq!(run.state.draft_post, "first");

    h.provider
        .push(ProviderResponse::text_only("second".into()));
    let outcome = h
        .controller
        .submit_feedback(&started.run_id, "add an example")
        .await
        .unwrap();
    assert!(matches!(outcome, FeedbackOutcome::Draft { draft, .. } if draft == "second"));
}

#[tokio::test]
async fn same_input_produces_the_same_prompt() {
    let provider = MockProvider::new(
        "Refined",
        vec![
            ProviderResponse::text_only("one".into()),
            ProviderResponse::text_only("two".into()),
        ],
    );
    let h = harness(provider, "");

    h.controller.start(request("topic")).await.unwrap();
    h.controller.start(request("topic")).await.unwrap();

    let prompts = h.provider.seen_prompts();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0], prompts[1]);
}
