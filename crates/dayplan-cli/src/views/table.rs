use chrono::NaiveDateTime;
use chrono_humanize::HumanTime;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use dayplan_core::gamification::Badge;
use dayplan_core::models::{Category, Criticality, CustomReward, Note, Occurrence};
use dayplan_core::reports::CompletionReport;

use crate::util::{format_duration, short_id};

pub fn criticality_color(criticality: Criticality) -> Color {
    match criticality {
        Criticality::Urgent => Color::Red,
        Criticality::High => Color::DarkYellow,
        Criticality::Medium => Color::Yellow,
        Criticality::Low => Color::Green,
    }
}

fn category_cell(category: Category) -> Cell {
    let color = match category {
        Category::Work => Color::Blue,
        Category::Home => Color::Magenta,
        Category::Life => Color::Cyan,
    };
    Cell::new(category.to_string()).fg(color)
}

/// Occurrence table; "When" is relative to the local wall clock `now`.
pub fn display_occurrences(occurrences: &[Occurrence], now: NaiveDateTime) {
    if occurrences.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Category", "Priority", "Starts", "Duration", "When"]);

    for occurrence in occurrences {
        let task = &occurrence.task;
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(&task.id)));

        let mut title = String::new();
        if task.repeat.is_recurring() {
            title.push_str("↻ ");
        }
        title.push_str(&task.title);
        if task.reminder_minutes().is_some() {
            title.push_str(" 🔔");
        }
        let title_cell = if occurrence.completed {
            Cell::new(title)
                .add_attribute(Attribute::CrossedOut)
                .fg(Color::DarkGrey)
        } else {
            match task.criticality {
                Criticality::Urgent => Cell::new(title).fg(Color::Red).add_attribute(Attribute::Bold),
                other => Cell::new(title).fg(criticality_color(other)),
            }
        };
        row.add_cell(title_cell);
        row.add_cell(category_cell(task.category));
        row.add_cell(Cell::new(task.criticality.to_string()).fg(criticality_color(task.criticality)));
        row.add_cell(Cell::new(occurrence.starts_at.format("%a %d %b %H:%M").to_string()));
        row.add_cell(Cell::new(format_duration(task.duration)));

        let when = HumanTime::from(occurrence.starts_at - now).to_string();
        let when_cell = if occurrence.completed {
            Cell::new("done").fg(Color::Green)
        } else if occurrence.starts_at < now {
            Cell::new(when).fg(Color::Red)
        } else if occurrence.date() == now.date() {
            Cell::new(when).fg(Color::Yellow)
        } else {
            Cell::new(when)
        };
        row.add_cell(when_cell);
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_notes(notes: &[Note]) {
    if notes.is_empty() {
        println!("No notes yet.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Content", "Created"]);
    for note in notes {
        let mut preview: String = note.content.lines().next().unwrap_or("").chars().take(48).collect();
        if preview.chars().count() < note.content.chars().count() {
            preview.push('…');
        }
        table.add_row(vec![
            Cell::new(short_id(&note.id)),
            Cell::new(&note.title).add_attribute(Attribute::Bold),
            Cell::new(preview),
            Cell::new(note.created_at.format("%Y-%m-%d %H:%M").to_string()).fg(Color::DarkGrey),
        ]);
    }
    println!("{table}");
}

pub fn display_rewards(rewards: &[CustomReward], points: u32) {
    if rewards.is_empty() {
        println!("No rewards yet. Add one with `dayplan reward add <name> <cost>`.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Reward", "Cost", "Affordable"]);
    for reward in rewards {
        let affordable = reward.cost <= points;
        table.add_row(vec![
            Cell::new(short_id(&reward.id)),
            Cell::new(&reward.name),
            Cell::new(reward.cost),
            if affordable {
                Cell::new("yes").fg(Color::Green)
            } else {
                Cell::new(format!("need {}", reward.cost - points)).fg(Color::DarkGrey)
            },
        ]);
    }
    println!("{table}");
}

pub fn display_badges(unlocked: &[Badge]) {
    let mut table = Table::new();
    table.set_header(vec!["", "Badge", "How to earn"]);
    for badge in Badge::ALL {
        let earned = unlocked.contains(&badge);
        let (mark, color) = if earned {
            ("★", Color::Yellow)
        } else {
            ("☆", Color::DarkGrey)
        };
        table.add_row(vec![
            Cell::new(mark).fg(color),
            Cell::new(badge.name()).fg(color),
            Cell::new(badge.description()),
        ]);
    }
    println!("{table}");
}

pub fn display_report(report: &CompletionReport, year: i32, month: u32) {
    let mut summary = Table::new();
    summary.set_header(vec!["Total tasks", "Total completions"]);
    summary.add_row(vec![
        Cell::new(report.total_tasks),
        Cell::new(report.total_completions).fg(Color::Green),
    ]);
    println!("{summary}");

    if report.by_category.is_empty() {
        println!("No completions yet.");
    } else {
        let mut categories = Table::new();
        categories.set_header(vec!["Category", "Completions"]);
        for (category, count) in &report.by_category {
            categories.add_row(vec![category_cell(*category), Cell::new(count)]);
        }
        println!("{categories}");
    }

    println!("Completions per day, {}-{:02}:", year, month);
    let peak = report.busiest_day().map_or(0, |d| d.completions);
    for day in &report.by_day {
        let bar_len = if peak == 0 { 0 } else { day.completions * 30 / peak };
        println!(
            "  {} {:>3} {}",
            day.date.format("%d %a"),
            day.completions,
            "█".repeat(bar_len)
        );
    }
}
