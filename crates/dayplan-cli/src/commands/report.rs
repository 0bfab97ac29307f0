use anyhow::Result;
use chrono::Datelike;
use dayplan_core::reports::CompletionReport;

use crate::app::App;
use crate::cli::ReportCommand;
use crate::parser::parse_month;
use crate::views::table::display_report;

pub async fn show_report(app: &App, command: ReportCommand) -> Result<()> {
    let (year, month) = match command.month.as_deref() {
        Some(input) => parse_month(input)?,
        None => {
            let today = app.today();
            (today.year(), today.month())
        }
    };

    let tasks = app.planner.tasks().await?;
    let report = CompletionReport::build(&tasks, year, month)?;
    display_report(&report, year, month);
    Ok(())
}
