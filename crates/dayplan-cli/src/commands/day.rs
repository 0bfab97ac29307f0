use anyhow::Result;
use dayplan_core::layout::DayTimeline;
use dayplan_core::recurrence::occurrences_on;

use crate::app::App;
use crate::cli::DayCommand;
use crate::parser::parse_date;
use crate::views::timeline::display_timeline;

pub async fn show_day(app: &App, command: DayCommand) -> Result<()> {
    let today = app.today();
    let day = match command.date.as_deref() {
        Some(input) => parse_date(input, today)?,
        None => today,
    };

    let tasks = app.planner.tasks().await?;
    let timeline = DayTimeline::build(day, occurrences_on(&tasks, day), app.config.timeline);
    display_timeline(&timeline, app.local_now());
    Ok(())
}
