use anyhow::Result;
use dayplan_core::models::NewTaskData;
use owo_colors::{OwoColorize, Style};

use crate::app::App;
use crate::cli::AddCommand;
use crate::parser::{next_full_hour, parse_due};
use crate::util::{format_duration, short_id};

pub async fn add_task(app: &App, command: AddCommand) -> Result<()> {
    let now = app.local_now();
    let due_at = match command.due.as_deref() {
        Some(due) => parse_due(due, now)?,
        None => next_full_hour(now),
    };

    let task = app
        .planner
        .add_task(NewTaskData {
            title: command.title,
            description: command.description,
            category: command.category,
            due_at,
            duration: command.duration,
            criticality: command.criticality,
            repeat: command.repeat,
            reminder: command.reminder,
        })
        .await?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();
    let subtle_style = Style::new().bright_black();

    let kind = if task.repeat.is_recurring() {
        format!("{} task", task.repeat)
    } else {
        "task".to_string()
    };
    println!(
        "{} Created {}: {}",
        "✓".style(success_style),
        kind,
        task.title.bright_white().bold()
    );
    println!("  {} Task ID: {}", "→".style(info_style), short_id(&task.id).yellow());
    println!(
        "  {} Starts: {} ({})",
        "→".style(info_style),
        task.due_at.format("%a %Y-%m-%d %H:%M").to_string().cyan(),
        format_duration(task.duration)
    );
    if let Some(minutes) = task.reminder_minutes() {
        println!(
            "  {} Reminder {} minutes before",
            "→".style(info_style),
            minutes
        );
    }

    println!("\n{} Quick actions:", "💡".style(subtle_style));
    println!(
        "   {} Mark complete: dayplan do {}",
        "•".style(subtle_style),
        short_id(&task.id).yellow()
    );
    println!(
        "   {} Break it down: dayplan suggest \"{}\"",
        "•".style(subtle_style),
        task.title
    );

    Ok(())
}
