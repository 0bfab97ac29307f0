use chrono::{Datelike, NaiveDate};

use crate::error::CoreError;
use crate::models::{Occurrence, Task};
use crate::recurrence::expand_all;

/// Titles shown in a month cell before collapsing into "+N more".
pub const CELL_PREVIEW_LIMIT: usize = 3;

#[derive(Debug, Clone)]
pub struct DayCell {
    pub date: NaiveDate,
    pub occurrences: Vec<Occurrence>,
}

impl DayCell {
    pub fn preview(&self) -> &[Occurrence] {
        let shown = self.occurrences.len().min(CELL_PREVIEW_LIMIT);
        &self.occurrences[..shown]
    }

    pub fn hidden_count(&self) -> usize {
        self.occurrences.len().saturating_sub(CELL_PREVIEW_LIMIT)
    }
}

/// A Sunday-first month grid.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st so that it lands under its weekday.
    pub leading_blanks: usize,
    pub days: Vec<DayCell>,
}

impl MonthGrid {
    pub fn first_day(&self) -> Option<NaiveDate> {
        self.days.first().map(|cell| cell.date)
    }

    pub fn cell(&self, day_of_month: u32) -> Option<&DayCell> {
        self.days.get(day_of_month.checked_sub(1)? as usize)
    }

    /// Grid rows of seven cells; `None` pads before the 1st and after the last day.
    pub fn weeks(&self) -> Vec<Vec<Option<&DayCell>>> {
        let mut cells: Vec<Option<&DayCell>> = std::iter::repeat(None)
            .take(self.leading_blanks)
            .chain(self.days.iter().map(Some))
            .collect();
        while cells.len() % 7 != 0 {
            cells.push(None);
        }
        cells.chunks(7).map(|week| week.to_vec()).collect()
    }

    pub fn occurrence_count(&self) -> usize {
        self.days.iter().map(|cell| cell.occurrences.len()).sum()
    }
}

/// Last day of a month.
pub fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate, CoreError> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| CoreError::InvalidInput(format!("Invalid month: {}-{:02}", year, month)))
}

/// Lays out every occurrence of `tasks` in the given month.
pub fn month_grid(tasks: &[Task], year: i32, month: u32) -> Result<MonthGrid, CoreError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CoreError::InvalidInput(format!("Invalid month: {}-{:02}", year, month)))?;
    let last = last_day_of_month(year, month)?;

    let mut days: Vec<DayCell> = first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|date| DayCell {
            date,
            occurrences: Vec::new(),
        })
        .collect();

    for occurrence in expand_all(tasks, first, last) {
        let index = occurrence.date().day0() as usize;
        if let Some(cell) = days.get_mut(index) {
            cell.occurrences.push(occurrence);
        }
    }

    Ok(MonthGrid {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_sunday() as usize,
        days,
    })
}
