use anyhow::{anyhow, Result};
use dayplan_core::gamification::CompletionChange;
use dayplan_core::recurrence::occurs_on;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::cli::DoCommand;
use crate::parser::parse_date;

pub async fn do_task(app: &App, command: DoCommand) -> Result<()> {
    let task = app.planner.resolve_task(&command.id).await?;
    let day = match command.date.as_deref() {
        Some(input) => parse_date(input, app.today())?,
        None if task.repeat.is_recurring() => app.today(),
        None => task.anchor_day(),
    };
    if !occurs_on(&task, day) {
        return Err(anyhow!(
            "'{}' has no occurrence on {}",
            task.title,
            day.format("%Y-%m-%d")
        ));
    }

    let outcome = app.planner.toggle_completion(task.id, day).await?;
    match outcome.change {
        CompletionChange::Completed { points } => {
            println!(
                "{} Completed '{}' for {}",
                "✓".green().bold(),
                outcome.task.title,
                day.format("%Y-%m-%d")
            );
            println!(
                "  {} +{} points (total {}), streak {} day{}",
                "→".blue(),
                points.to_string().yellow(),
                outcome.profile.points,
                outcome.profile.streak,
                if outcome.profile.streak == 1 { "" } else { "s" }
            );
        }
        CompletionChange::Uncompleted => {
            println!(
                "{} Marked '{}' as not done for {}",
                "↺".yellow(),
                outcome.task.title,
                day.format("%Y-%m-%d")
            );
        }
    }
    Ok(())
}
