use anyhow::Result;
use dayplan_core::drag::Reschedule;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::cli::MoveCommand;
use crate::parser::parse_time;

/// Keyboard counterpart of dragging a block: the time is snapped to the
/// timeline grid and only the time of day changes.
pub async fn move_task(app: &App, command: MoveCommand) -> Result<()> {
    let task = app.planner.resolve_task(&command.id).await?;
    let requested = parse_time(&command.at)?;
    let time = app.config.timeline.snap_time(requested, task.duration);

    let moved = app
        .planner
        .reschedule(Reschedule {
            task_id: task.id,
            time,
        })
        .await?;

    println!(
        "{} Moved '{}' to {}",
        "✓".green().bold(),
        moved.title,
        moved.time_of_day().format("%H:%M").to_string().cyan()
    );
    if time != requested {
        println!(
            "  {} snapped from {} to the {}-minute grid",
            "→".blue(),
            requested.format("%H:%M"),
            app.config.timeline.snap_minutes
        );
    }
    Ok(())
}
