use anyhow::Result;
use dayplan_core::planning::{is_day_planned, tasks_to_plan, PlanActions};
use dialoguer::Select;
use owo_colors::{OwoColorize, Style};

use crate::app::App;
use crate::cli::PlanCommand;
use crate::util::{format_duration, short_id};

const CHOICES: [&str; 4] = ["Commit to today", "Snooze to tomorrow", "Delete", "Skip"];

pub async fn plan_day(app: &App, command: PlanCommand) -> Result<()> {
    let today = app.today();
    let tasks = app.planner.tasks().await?;
    let candidates = tasks_to_plan(&tasks, today);

    let plan = app.planner.daily_plan().await?;
    let profile = app.planner.profile().await?;
    if is_day_planned(&plan, &profile, today) {
        println!(
            "{}",
            "Today is already planned; this replaces the current plan.".bright_black()
        );
    }

    let mut actions = PlanActions::default();
    if candidates.is_empty() {
        println!("Nothing due today. Enjoy the free time!");
    }

    for (index, task) in candidates.iter().enumerate() {
        if command.yes {
            actions.commit(task);
            continue;
        }

        let overdue = task.anchor_day() < today;
        println!(
            "\n[{}/{}] {} {}",
            index + 1,
            candidates.len(),
            task.title.bold(),
            if overdue { "(overdue)".red().to_string() } else { String::new() }
        );
        println!(
            "  {} · {} · {} at {} for {}",
            short_id(&task.id).yellow(),
            task.category,
            task.criticality,
            task.due_at.format("%a %d %b"),
            format_duration(task.duration)
        );
        if let Some(description) = &task.description {
            println!("  {}", description.bright_black());
        }

        let choice = Select::new()
            .with_prompt("What should happen to it?")
            .items(&CHOICES)
            .default(0)
            .interact()?;
        match choice {
            0 => actions.commit(task),
            1 => actions.snooze(task, today),
            2 => actions.delete(task),
            _ => {}
        }
    }

    let plan = app.planner.finish_planning(&actions, today).await?;

    let success_style = Style::new().green().bold();
    println!(
        "\n{} Day planned: {} committed, {} snoozed, {} deleted",
        "✓".style(success_style),
        plan.task_ids.len(),
        actions.snoozed.len(),
        actions.deleted.len()
    );
    if !plan.task_ids.is_empty() {
        println!("  {} See them with `dayplan list`", "→".blue());
    }
    Ok(())
}
