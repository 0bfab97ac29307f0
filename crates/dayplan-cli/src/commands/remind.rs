use anyhow::Result;
use chrono::Utc;
use dayplan_core::reminders::{
    upcoming_reminders, Notification, NotificationSink, ReminderScheduler, TokioTimers,
};
use dayplan_core::timezone::{to_local, zone_abbreviation};
use owo_colors::OwoColorize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::app::App;
use crate::cli::RemindCommand;
use crate::util::short_id;

/// Prints fired reminders to the terminal and rings the bell.
struct TerminalSink;

impl NotificationSink for TerminalSink {
    fn deliver(&self, notification: &Notification) {
        println!(
            "\x07{} {} {}",
            "🔔".bold(),
            Utc::now().format("%H:%M").to_string().bright_black(),
            notification.body.bold()
        );
    }
}

pub async fn remind(app: &App, command: RemindCommand) -> Result<()> {
    if command.once {
        let tasks = app.planner.tasks().await?;
        let pending = upcoming_reminders(&tasks, app.now(), app.tz, &app.config.reminders);
        if pending.is_empty() {
            println!("No reminders pending.");
        }
        for notification in &pending {
            let fire_at = format!(
                "{} {}",
                to_local(notification.fire_at, app.tz).format("%a %H:%M"),
                zone_abbreviation(app.tz, notification.fire_at)
            );
            println!(
                "{} {}  {}",
                fire_at.cyan(),
                short_id(&notification.key.task_id).yellow(),
                notification.body
            );
        }
        return Ok(());
    }

    let (timers, mut fired_rx) = TokioTimers::new(Arc::new(TerminalSink));
    let mut scheduler = ReminderScheduler::new(timers);
    let mut armed_set: Option<Vec<Notification>> = None;
    let mut poll = tokio::time::interval(Duration::from_secs(
        app.config.reminders.poll_interval_secs.max(1),
    ));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    println!(
        "{} Watching for reminders (Ctrl-C to stop)...",
        "→".blue()
    );
    loop {
        tokio::select! {
            _ = poll.tick() => {
                let tasks = match app.planner.tasks().await {
                    Ok(tasks) => tasks,
                    Err(e) => {
                        warn!(error = %e, "could not reload tasks; keeping current reminders");
                        continue;
                    }
                };
                let pending = upcoming_reminders(&tasks, app.now(), app.tz, &app.config.reminders);
                if armed_set.as_ref() != Some(&pending) {
                    let armed = scheduler.reschedule(pending.clone());
                    println!("{} {} reminder(s) armed", "→".blue(), armed);
                    armed_set = Some(pending);
                } else {
                    debug!("task list unchanged; reminders left as they are");
                }
            }
            Some(key) = fired_rx.recv() => {
                scheduler.fired(&key);
            }
            _ = &mut ctrl_c => {
                break;
            }
        }
    }

    scheduler.cancel_all();
    println!("Stopped.");
    Ok(())
}
