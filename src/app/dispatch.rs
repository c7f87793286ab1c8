use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use std::sync::Arc;
use tracing::info;

use crate::Config;
use crate::app::review::{print_draft, print_outcome, print_publish_result, run_interactive};
use crate::app::status::render_runs;
use crate::config::RunStoreKind;
use crate::enrich::{ContentEnricher, Summarizer};
use crate::llm::{OpenAiProvider, Provider};
use crate::prompt::PromptBuilder;
use crate::publish::{LinkedInPublisher, Publisher};
use crate::runs::create_run_store;
use crate::ui::style as ui;
use crate::workflow::{DraftGenerator, StartRequest, WorkflowController};

/// Wire the production provider, enricher, publisher and run store.
pub fn build_controller(config: &Config) -> Result<WorkflowController> {
    let provider: Arc<dyn Provider> = Arc::new(OpenAiProvider::new(
        &config.base_url,
        config.api_key.as_deref(),
    ));
    let prompts = Arc::new(PromptBuilder::new()?);
    let summarizer = Summarizer::new(Arc::clone(&provider), Arc::clone(&prompts), config.model());
    let enricher = Arc::new(ContentEnricher::new(
        config.enrichment.clone(),
        Some(summarizer),
    ));
    let publisher = Arc::new(LinkedInPublisher::new(&config.linkedin));
    let store = create_run_store(config)?;

    Ok(WorkflowController::new(
        DraftGenerator::new(provider, prompts, config.model()),
        enricher,
        publisher,
        store,
        config,
    ))
}

/// Commands that outlive one process keep runs on disk.
fn with_file_store(mut config: Config) -> Config {
    config.workflow.run_store = RunStoreKind::File;
    config
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Draft {
            topic,
            url,
            temperature,
        } => {
            let controller = build_controller(&config)?;
            run_interactive(
                &controller,
                StartRequest {
                    topic: topic.unwrap_or_default(),
                    url,
                    temperature,
                },
            )
            .await
        }

        Commands::Start {
            topic,
            url,
            temperature,
        } => {
            let config = with_file_store(config);
            let controller = build_controller(&config)?;
            let outcome = controller
                .start(StartRequest {
                    topic,
                    url,
                    temperature,
                })
                .await?;
            for line in &outcome.logs {
                println!("  {}", ui::dim(line));
            }
            print_draft(&outcome.run_id, &outcome.draft);
            println!(
                "Resume with {}",
                ui::yellow(format!(
                    "postcraft resume {} \"<feedback>\"",
                    outcome.run_id
                ))
            );
            Ok(())
        }

        Commands::Resume { run_id, feedback } => {
            let config = with_file_store(config);
            let controller = build_controller(&config)?;
            let outcome = controller.submit_feedback(&run_id, &feedback).await?;
            print_outcome(&outcome);
            Ok(())
        }

        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            let port = port.unwrap_or(config.gateway.port);
            let controller = Arc::new(build_controller(&config)?);
            info!(host = %host, port, store = %config.workflow.run_store, "starting gateway");
            crate::gateway::run_gateway(&host, port, &config, controller).await
        }

        Commands::Publish { text } => {
            let publisher = LinkedInPublisher::new(&config.linkedin);
            publisher.credentials()?;
            let result = publisher.publish(&text).await;
            print_publish_result(&result);
            if !result.success {
                bail!(
                    "publish failed: {}",
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            Ok(())
        }

        Commands::Runs => {
            let config = with_file_store(config);
            let controller = build_controller(&config)?;
            println!("{}", render_runs(&config, &controller.list()?));
            Ok(())
        }
    }
}
