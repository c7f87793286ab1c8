use anyhow::Result;
use dialoguer::Input;

use crate::error::{PostcraftError, WorkflowError};
use crate::publish::PublishResult;
use crate::ui::style as ui;
use crate::workflow::{FeedbackOutcome, StartRequest, WorkflowController};

const FEEDBACK_PROMPT: &str = "Feedback (approve / exit / what to change)";

pub fn print_draft(run_id: &str, draft: &str) {
    println!();
    println!("{} {}", ui::header("Draft"), ui::dim(format!("(run {run_id})")));
    println!("{}", ui::dim("─".repeat(60)));
    println!("{draft}");
    println!("{}", ui::dim("─".repeat(60)));
}

pub fn print_publish_result(result: &PublishResult) {
    if result.success {
        match &result.post_id {
            Some(id) => println!("{} Published as {}", ui::success("✓"), ui::value(id)),
            None => println!("{} Published", ui::success("✓")),
        }
    } else {
        println!(
            "{} Publish failed: {}",
            ui::failure("✗"),
            result.error.as_deref().unwrap_or("unknown error")
        );
        if let Some(details) = &result.details {
            println!("  {}", ui::dim(details));
        }
    }
}

pub fn print_outcome(outcome: &FeedbackOutcome) {
    match outcome {
        FeedbackOutcome::Draft { run_id, draft } => {
            print_draft(run_id, draft);
            println!(
                "Resume with {}",
                ui::yellow(format!("postcraft resume {run_id} \"<feedback>\""))
            );
        }
        FeedbackOutcome::Published { result } => print_publish_result(result),
        FeedbackOutcome::Ended => println!("Run ended without publishing."),
    }
}

fn read_feedback() -> Result<String> {
    let feedback: String = Input::new()
        .with_prompt(FEEDBACK_PROMPT)
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("feedback cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(feedback)
}

/// Draft, then loop on reviewer feedback until the run publishes or ends.
pub async fn run_interactive(controller: &WorkflowController, request: StartRequest) -> Result<()> {
    let mut request = request;
    if request.topic.trim().is_empty() {
        request.topic = Input::new()
            .with_prompt("What should the post be about?")
            .interact_text()?;
    }

    let outcome = controller.start(request).await?;
    for line in &outcome.logs {
        println!("  {}", ui::dim(line));
    }
    let run_id = outcome.run_id;
    let mut draft = outcome.draft;

    loop {
        print_draft(&run_id, &draft);
        let feedback = read_feedback()?;

        match controller.submit_feedback(&run_id, &feedback).await {
            Ok(FeedbackOutcome::Draft { draft: next, .. }) => draft = next,
            Ok(outcome) => {
                print_outcome(&outcome);
                return Ok(());
            }
            Err(PostcraftError::Workflow(WorkflowError::Generation(message))) => {
                // The run is back at review with its previous draft.
                println!("{} {message}", ui::failure("Generation failed:"));
            }
            Err(e) => return Err(e.into()),
        }
    }
}
