use anyhow::Result;
use chrono::Datelike;
use dayplan_core::calendar::month_grid;

use crate::app::App;
use crate::cli::MonthCommand;
use crate::parser::parse_month;
use crate::views::calendar::display_month;

pub async fn show_month(app: &App, command: MonthCommand) -> Result<()> {
    let today = app.today();
    let (year, month) = match command.month.as_deref() {
        Some(input) => parse_month(input)?,
        None => (today.year(), today.month()),
    };

    let tasks = app.planner.tasks().await?;
    let grid = month_grid(&tasks, year, month)?;
    display_month(&grid, today);
    Ok(())
}
