use chrono::NaiveDate;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};
use dayplan_core::calendar::{DayCell, MonthGrid};

use super::table::criticality_color;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const TITLE_WIDTH: usize = 12;

/// Text of one month cell: the day number, up to the preview limit of
/// titles, then "+N more".
pub fn cell_lines(cell: &DayCell) -> Vec<String> {
    let mut lines = vec![cell.date.format("%e").to_string().trim().to_string()];
    for occurrence in cell.preview() {
        let mark = if occurrence.completed { "✓" } else { "•" };
        let title: String = occurrence.task.title.chars().take(TITLE_WIDTH).collect();
        lines.push(format!("{} {}", mark, title));
    }
    if cell.hidden_count() > 0 {
        lines.push(format!("+{} more", cell.hidden_count()));
    }
    lines
}

pub fn display_month(grid: &MonthGrid, today: NaiveDate) {
    let title = NaiveDate::from_ymd_opt(grid.year, grid.month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_default();
    println!("{}", title);

    let mut table = Table::new();
    table.set_header(
        WEEKDAYS
            .iter()
            .map(|d| Cell::new(d).set_alignment(CellAlignment::Center))
            .collect::<Vec<_>>(),
    );

    for week in grid.weeks() {
        let row: Vec<Cell> = week
            .into_iter()
            .map(|slot| match slot {
                None => Cell::new(""),
                Some(cell) => {
                    let mut rendered = Cell::new(cell_lines(cell).join("\n"));
                    if cell.date == today {
                        rendered = rendered.add_attribute(Attribute::Bold).fg(Color::Cyan);
                    } else if let Some(first) = cell.preview().iter().find(|o| !o.completed) {
                        rendered = rendered.fg(criticality_color(first.task.criticality));
                    }
                    rendered
                }
            })
            .collect();
        table.add_row(row);
    }

    println!("{table}");
    println!("{} occurrences this month", grid.occurrence_count());
}

#[cfg(test)]
mod tests {
    use super::*;
    use dayplan_core::calendar::month_grid;
    use dayplan_core::models::{Category, Criticality, Repeat, Task};
    use std::collections::BTreeSet;
    use uuid::Uuid;

    fn task(title: &str, repeat: Repeat, hour: u32) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            category: Category::Home,
            due_at: NaiveDate::from_ymd_opt(2024, 2, 1)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            duration: 30,
            criticality: Criticality::Low,
            repeat,
            completed_dates: BTreeSet::new(),
            reminder: None,
        }
    }

    #[test]
    fn test_busy_cell_collapses_into_more() {
        let tasks: Vec<Task> = (0..5)
            .map(|i| task(&format!("Chore {}", i), Repeat::Daily, 8 + i))
            .collect();
        let grid = month_grid(&tasks, 2024, 2).unwrap();
        let lines = cell_lines(grid.cell(14).unwrap());
        assert_eq!(
            lines,
            vec!["14", "• Chore 0", "• Chore 1", "• Chore 2", "+2 more"]
        );
    }

    #[test]
    fn test_quiet_cell_shows_only_the_day() {
        let tasks = vec![task("Dentist", Repeat::None, 10)];
        let grid = month_grid(&tasks, 2024, 2).unwrap();
        assert_eq!(cell_lines(grid.cell(1).unwrap()), vec!["1", "• Dentist"]);
        assert_eq!(cell_lines(grid.cell(2).unwrap()), vec!["2"]);
    }
}
