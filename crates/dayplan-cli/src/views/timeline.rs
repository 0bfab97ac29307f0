use chrono::NaiveDateTime;
use dayplan_core::layout::{minutes_to_time, DayTimeline, PlacedOccurrence};
use owo_colors::OwoColorize;

use crate::util::short_id;

/// Characters available to the lanes of one collision group.
pub const LANE_WIDTH: usize = 48;

/// One text line per block. Each block sits in its column, scaled from the
/// percentage geometry of the layout to `width` characters.
pub fn render_lanes(timeline: &DayTimeline, width: usize) -> Vec<String> {
    timeline
        .blocks
        .iter()
        .map(|block| {
            let left = (block.left() / 100.0 * width as f32).round() as usize;
            let span = ((block.width() / 100.0 * width as f32).round() as usize).max(3);
            format!(
                "{}-{} │{}{}",
                minutes_to_time(block.interval.start).format("%H:%M"),
                minutes_to_time(block.interval.end).format("%H:%M"),
                " ".repeat(left),
                boxed(&block.occurrence.task.title, span)
            )
        })
        .collect()
}

fn boxed(title: &str, span: usize) -> String {
    let inner = span.saturating_sub(2);
    let mut text: String = title.chars().take(inner).collect();
    let pad = inner.saturating_sub(text.chars().count());
    text.push_str(&" ".repeat(pad));
    format!("[{}]", text)
}

fn describe(block: &PlacedOccurrence) -> String {
    let mut parts = vec![
        short_id(&block.occurrence.task.id),
        block.occurrence.task.category.to_string(),
        block.occurrence.task.criticality.to_string(),
    ];
    if block.slot.columns > 1 {
        parts.push(format!("lane {}/{}", block.slot.column + 1, block.slot.columns));
    }
    parts.join(" · ")
}

pub fn display_timeline(timeline: &DayTimeline, now: NaiveDateTime) {
    println!("{}", timeline.date.format("%A, %d %B %Y").bold());
    if timeline.blocks.is_empty() {
        println!("Nothing scheduled.");
        return;
    }

    for (line, block) in render_lanes(timeline, LANE_WIDTH).into_iter().zip(&timeline.blocks) {
        let finished = block.occurrence.completed;
        let running = !finished
            && block.occurrence.starts_at <= now
            && now.date() == timeline.date
            && (now - block.occurrence.starts_at).num_minutes() < i64::from(block.occurrence.task.duration);
        let detail = describe(block);
        if finished {
            println!("{}  {}", line.strikethrough().bright_black(), "✓".green());
        } else if running {
            println!("{}  {}", line.yellow().bold(), detail.bright_black());
        } else {
            println!("{}  {}", line, detail.bright_black());
        }
    }

    let columns = timeline.max_columns();
    if columns > 1 {
        println!(
            "{}",
            format!("{} overlapping tasks at the busiest point", columns).bright_black()
        );
    }
}
