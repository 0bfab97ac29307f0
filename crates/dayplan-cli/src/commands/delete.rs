use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::cli::DeleteCommand;

pub async fn delete_task(app: &App, command: DeleteCommand) -> Result<()> {
    let task = app.planner.resolve_task(&command.id).await?;

    if !command.force {
        let confirmation = Confirm::new()
            .with_prompt(format!("Are you sure you want to delete task '{}'?", task.title))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    let removed = app.planner.delete_task(task.id).await?;
    println!("{} Deleted task: {}", "✓".green().bold(), removed.title);
    Ok(())
}
