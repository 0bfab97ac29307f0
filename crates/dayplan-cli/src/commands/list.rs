use anyhow::Result;
use dayplan_core::models::Occurrence;
use dayplan_core::planning::dashboard;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::cli::ListCommand;
use crate::views::table::display_occurrences;

pub async fn list_tasks(app: &App, command: ListCommand) -> Result<()> {
    let tasks = app.planner.tasks().await?;
    let plan = app.planner.daily_plan().await?;
    let profile = app.planner.profile().await?;
    let today = app.today();
    let now = app.local_now();

    let board = dashboard(&tasks, &plan, &profile, today, command.category);
    if board.is_empty() {
        println!("No tasks found. Add one with `dayplan add <title>`.");
        return Ok(());
    }

    if board.planned {
        section("My Day", &board.my_day, now);
    } else {
        println!(
            "{}",
            "You haven't planned today yet. Run `dayplan plan`.".bright_black()
        );
    }
    section("Overdue", &board.overdue, now);
    section("Today", &board.today, now);
    section("Upcoming", &board.upcoming, now);

    Ok(())
}

fn section(title: &str, occurrences: &[Occurrence], now: chrono::NaiveDateTime) {
    if occurrences.is_empty() {
        return;
    }
    println!("\n{} ({})", title.bold().underline(), occurrences.len());
    display_occurrences(occurrences, now);
}
