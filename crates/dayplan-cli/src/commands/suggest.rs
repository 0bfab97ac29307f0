use anyhow::Result;
use dayplan_core::suggest::{GeminiSuggester, SubtaskSuggester};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::app::App;
use crate::cli::SuggestCommand;

pub async fn suggest(app: &App, command: SuggestCommand) -> Result<()> {
    let suggester = GeminiSuggester::new(app.config.suggestions.clone())?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("Breaking down \"{}\"...", command.title));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = suggester.suggest_subtasks(&command.title).await;
    spinner.finish_and_clear();

    let subtasks = result?;
    if subtasks.is_empty() {
        println!("No suggestions came back for \"{}\".", command.title);
        return Ok(());
    }

    println!("{} Suggested sub-tasks for {}:", "✨".bold(), command.title.bold());
    for subtask in &subtasks {
        println!("  {} {}", "•".bright_black(), subtask);
    }
    println!(
        "\n{} Add one with `dayplan add \"<sub-task>\"`",
        "💡".bright_black()
    );
    Ok(())
}
