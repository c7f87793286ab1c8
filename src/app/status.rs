use crate::config::Config;
use crate::ui::style as ui;
use crate::workflow::RunSnapshot;

const TOPIC_PREVIEW_CHARS: usize = 48;

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(TOPIC_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

/// Config summary followed by one line per suspended run.
pub fn render_runs(config: &Config, runs: &[RunSnapshot]) -> String {
    let mut lines = vec![
        format!("◆ {}", ui::header("postcraft runs")),
        String::new(),
        format!("  store      {}", ui::value(config.workflow.run_store)),
        format!("  location   {}", config.runs_dir().display()),
        format!("  model      {}", config.model()),
        String::new(),
    ];

    if runs.is_empty() {
        lines.push(format!("  {}", ui::dim("No suspended runs.")));
        return lines.join("\n");
    }

    for run in runs {
        lines.push(format!(
            "  {}  {}  {}  {}",
            ui::accent(&run.run_id),
            ui::dim(run.updated_at.format("%Y-%m-%d %H:%M")),
            run.stage,
            preview(&run.state.topic)
        ));
    }
    lines.join("\n")
}
