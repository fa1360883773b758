use crate::core::{Pipeline, PipelineEvent};
use crate::errors::Error;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::info;

/// Spinner shown while the crew works
pub fn new_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(120));
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner} [{elapsed_precise}] {msg}")
    {
        spinner.set_style(style);
    }
    spinner
}

/// Updates the spinner with the task about to run
pub fn announce_next(spinner: &ProgressBar, pipeline: &Pipeline) {
    if let Some(task) = pipeline.next_task() {
        let message = format!("{} is working on '{}'...", task.agent_role, task.id);
        info!("{}", message);
        spinner.set_message(message);
    }
}

/// One line per completed task
pub fn render_event(event: &PipelineEvent) -> String {
    format!(
        "{} [{}/{}] {} finished by {} in {:.1}s",
        "✓".green(),
        event.completed,
        event.total,
        event.task_id.to_string().bold(),
        event.agent_role,
        event.elapsed.as_secs_f64()
    )
}

/// Names the tasks an aborted run never reached, if any
pub fn render_skipped(pipeline: &Pipeline) -> Option<String> {
    let skipped: Vec<String> = pipeline
        .tasks()
        .iter()
        .filter(|t| {
            pipeline
                .state(&t.id)
                .map_or(true, |state| !state.is_terminal())
        })
        .map(|t| t.id.to_string())
        .collect();
    if skipped.is_empty() {
        return None;
    }
    Some(
        format!("Skipped tasks: {}", skipped.join(", "))
            .dimmed()
            .to_string(),
    )
}

/// User-facing rendering of a failed run
pub fn render_error(error: &Error) -> String {
    if error.is_extraction() {
        format!(
            "{} The crew finished but its answer is not a usable bid request: {}",
            "⚠".yellow(),
            error
        )
    } else {
        format!("{} Generation failed: {}", "✗".red(), error)
    }
}
