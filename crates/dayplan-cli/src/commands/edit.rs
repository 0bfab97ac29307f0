use anyhow::Result;
use dayplan_core::models::UpdateTaskData;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::cli::EditCommand;
use crate::parser::parse_due;
use crate::util::short_id;

pub async fn edit_task(app: &App, command: EditCommand) -> Result<()> {
    let task = app.planner.resolve_task(&command.id).await?;

    let description = if command.description_clear {
        Some(None)
    } else {
        command.description.map(Some)
    };

    let reminder = if command.reminder_clear {
        Some(None)
    } else {
        command.reminder.map(Some)
    };

    let due_at = command
        .due
        .as_deref()
        .map(|due| parse_due(due, app.local_now()))
        .transpose()?;

    let update = UpdateTaskData {
        title: command.title,
        description,
        category: command.category,
        due_at,
        duration: command.duration,
        criticality: command.criticality,
        repeat: command.repeat,
        reminder,
    };

    if update.is_empty() {
        println!("Nothing to change. See `dayplan edit --help` for the editable fields.");
        return Ok(());
    }

    let updated = app.planner.update_task(task.id, update).await?;
    println!(
        "{} Updated task {}: {}",
        "✓".green().bold(),
        short_id(&updated.id).yellow(),
        updated.title.bold()
    );
    Ok(())
}
