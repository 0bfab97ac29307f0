use anyhow::Result;
use dayplan_core::gamification::{total_completions, unlocked_badges};
use owo_colors::OwoColorize;

use crate::app::App;
use crate::cli::ProfileCommand;
use crate::views::table::display_badges;

pub async fn show_profile(app: &App, command: ProfileCommand) -> Result<()> {
    let profile = match command.name {
        Some(name) => app.planner.set_name(&name).await?,
        None => app.planner.profile().await?,
    };
    let tasks = app.planner.tasks().await?;

    let name = if profile.name.is_empty() {
        "(no name set)".to_string()
    } else {
        profile.name.clone()
    };
    println!("{}", name.bold());
    println!("  Points:      {}", profile.points.to_string().yellow().bold());
    println!("  Streak:      {} day(s)", profile.streak);
    println!("  Completions: {}", total_completions(&tasks));
    if let Some(last) = profile.last_completed_date {
        println!("  Last done:   {}", last.format("%Y-%m-%d"));
    }
    println!("  Timezone:    {}", app.tz);
    println!();

    display_badges(&unlocked_badges(&tasks, &profile));
    Ok(())
}
