use anyhow::Result;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::cli::{RewardCommand, RewardSubcommand};
use crate::util::short_id;
use crate::views::table::display_rewards;

pub async fn reward_command(app: &App, command: RewardCommand) -> Result<()> {
    match command.command {
        RewardSubcommand::Add(add) => {
            let reward = app.planner.add_reward(&add.name, add.cost).await?;
            println!(
                "{} Added reward {} ({} points), ID {}",
                "✓".green().bold(),
                reward.name.bold(),
                reward.cost,
                short_id(&reward.id).yellow()
            );
        }
        RewardSubcommand::List => {
            let profile = app.planner.profile().await?;
            println!("You have {} points.", profile.points.to_string().yellow().bold());
            display_rewards(&app.planner.rewards().await?, profile.points);
        }
        RewardSubcommand::Redeem(redeem) => {
            let reward = app.planner.resolve_reward(&redeem.id).await?;
            let (reward, profile) = app.planner.redeem_reward(reward.id).await?;
            println!(
                "{} Enjoy your {}! {} points left.",
                "🎉".bold(),
                reward.name.bold(),
                profile.points.to_string().yellow()
            );
        }
    }
    Ok(())
}
