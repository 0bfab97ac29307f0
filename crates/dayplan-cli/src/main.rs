use clap::Parser;
use dayplan_core::error::CoreError;
use dayplan_core::suggest::SuggestionError;
use owo_colors::{OwoColorize, Style};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod commands;
mod config;
mod parser;
mod timezone;
mod util;
mod views;

use app::App;
use cli::Commands;

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = cli::Cli::parse();

    let config = match config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Invalid configuration: {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let app = match App::open(config).await {
        Ok(app) => app,
        Err(e) => {
            handle_error(e);
            std::process::exit(1);
        }
    };

    // Streak decay runs before anything else reads the profile.
    if let Err(e) = app.planner.refresh_streak(app.today()).await {
        handle_error(e.into());
        std::process::exit(1);
    }

    if let Err(e) = run(&app, cli.command).await {
        handle_error(e);
        std::process::exit(1);
    }
}

async fn run(app: &App, command: Commands) -> anyhow::Result<()> {
    debug!(?command, "dispatching");
    match command {
        Commands::Add(command) => commands::add::add_task(app, command).await,
        Commands::List(command) => commands::list::list_tasks(app, command).await,
        Commands::Day(command) => commands::day::show_day(app, command).await,
        Commands::Month(command) => commands::month::show_month(app, command).await,
        Commands::Do(command) => commands::r#do::do_task(app, command).await,
        Commands::Edit(command) => commands::edit::edit_task(app, command).await,
        Commands::Move(command) => commands::r#move::move_task(app, command).await,
        Commands::Delete(command) => commands::delete::delete_task(app, command).await,
        Commands::Plan(command) => commands::plan::plan_day(app, command).await,
        Commands::Report(command) => commands::report::show_report(app, command).await,
        Commands::Reward(command) => commands::reward::reward_command(app, command).await,
        Commands::Note(command) => commands::note::note_command(app, command).await,
        Commands::Profile(command) => commands::profile::show_profile(app, command).await,
        Commands::Suggest(command) => commands::suggest::suggest(app, command).await,
        Commands::Remind(command) => commands::remind::remind(app, command).await,
    }
}

/// Logs go to stderr so command output stays clean. `DAYPLAN_LOG` takes
/// the usual filter directives, e.g. `DAYPLAN_LOG=dayplan_core=debug`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("DAYPLAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::AmbiguousId(candidates) => {
                eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
                eprintln!("Did you mean one of these?");
                for (id, title) in candidates {
                    eprintln!("  {} ({})", id.yellow(), title);
                }
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::InvalidTimezone(s) => {
                eprintln!("{} Invalid timezone: {}", "Error:".style(error_style), s);
                let suggestions = timezone::suggest_timezone(s);
                if !suggestions.is_empty() {
                    eprintln!("Did you mean: {}", suggestions.join(", ").yellow());
                }
                eprintln!("Set `timezone` in dayplan.toml or DAYPLAN_TIMEZONE to an IANA name.");
            }
            CoreError::InsufficientPoints { cost, available } => {
                eprintln!(
                    "{} This reward costs {} points but you only have {}.",
                    "Error:".style(error_style),
                    cost.to_string().yellow(),
                    available.to_string().yellow()
                );
                eprintln!("Complete more tasks to earn points.");
            }
            CoreError::Database(e) => {
                eprintln!("{} Database error: {}", "Error:".style(error_style), e);
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else if let Some(suggestion_error) = err.downcast_ref::<SuggestionError>() {
        eprintln!("{} {}", "Error:".style(error_style), suggestion_error);
        if matches!(
            suggestion_error,
            SuggestionError::MissingCredential | SuggestionError::InvalidCredential
        ) {
            eprintln!("Set GEMINI_API_KEY or `suggestions.api_key` in dayplan.toml.");
        }
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
}
