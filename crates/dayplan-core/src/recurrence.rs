//! Occurrence resolver.
//!
//! Expands a task's recurrence rule into concrete calendar days. Every rule is
//! phased by the task's anchor day (the calendar day of `Task::due_at`) and
//! never produces a day before it.
//!
//! Monthly rules match the anchor's day-of-month literally: a task anchored on
//! the 31st has no occurrence in months with fewer days. Those months are
//! skipped, never shifted to the last day.

use chrono::{Datelike, Days, NaiveDate};

use crate::models::{Occurrence, Repeat, Task};

/// Upper bound on months scanned to find one containing a given day-of-month.
/// Any day 1..=31 appears at least once in 13 consecutive months.
const MONTH_SCAN_LIMIT: u32 = 13;

impl Repeat {
    /// Whether a rule anchored on `anchor` produces `day`.
    pub fn matches(&self, anchor: NaiveDate, day: NaiveDate) -> bool {
        if anchor > day {
            return false;
        }
        match self {
            Repeat::None => anchor == day,
            Repeat::Daily => true,
            Repeat::Weekly => anchor.weekday() == day.weekday(),
            Repeat::Monthly => anchor.day() == day.day(),
            Repeat::Unsupported => false,
        }
    }

    /// First produced day that is on or after `from`.
    pub fn first_on_or_after(&self, anchor: NaiveDate, from: NaiveDate) -> Option<NaiveDate> {
        let from = from.max(anchor);
        match self {
            Repeat::None => (anchor >= from).then_some(anchor),
            Repeat::Daily => Some(from),
            Repeat::Weekly => {
                let offset = from.signed_duration_since(anchor).num_days() as u64;
                let weeks = offset.div_ceil(7);
                anchor.checked_add_days(Days::new(weeks * 7))
            }
            Repeat::Monthly => monthly_on_or_after(anchor.day(), from),
            Repeat::Unsupported => None,
        }
    }

    /// Day produced right after `current`, which must itself be produced.
    pub fn step(&self, anchor: NaiveDate, current: NaiveDate) -> Option<NaiveDate> {
        match self {
            Repeat::None | Repeat::Unsupported => None,
            Repeat::Daily => current.succ_opt(),
            Repeat::Weekly => current.checked_add_days(Days::new(7)),
            Repeat::Monthly => {
                let (year, month) = next_month(current.year(), current.month());
                let first = NaiveDate::from_ymd_opt(year, month, 1)?;
                monthly_on_or_after(anchor.day(), first)
            }
        }
    }
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn monthly_on_or_after(day_of_month: u32, from: NaiveDate) -> Option<NaiveDate> {
    let (mut year, mut month) = (from.year(), from.month());
    for _ in 0..MONTH_SCAN_LIMIT {
        if let Some(candidate) = NaiveDate::from_ymd_opt(year, month, day_of_month) {
            if candidate >= from {
                return Some(candidate);
            }
        }
        (year, month) = next_month(year, month);
    }
    None
}

/// Iterator over the days a task occupies within an inclusive range.
#[derive(Debug, Clone)]
pub struct OccurrenceDays {
    repeat: Repeat,
    anchor: NaiveDate,
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl OccurrenceDays {
    pub fn new(task: &Task, start: NaiveDate, end: NaiveDate) -> Self {
        let anchor = task.anchor_day();
        let next = if start > end {
            None
        } else {
            task.repeat.first_on_or_after(anchor, start)
        };
        Self {
            repeat: task.repeat,
            anchor,
            next,
            end,
        }
    }
}

impl Iterator for OccurrenceDays {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|day| *day <= self.end)?;
        self.next = self.repeat.step(self.anchor, current);
        Some(current)
    }
}

/// Whether `task` has an occurrence on `day`.
pub fn occurs_on(task: &Task, day: NaiveDate) -> bool {
    task.repeat.matches(task.anchor_day(), day)
}

/// All occurrences of `task` between `start` and `end` (both inclusive), in
/// chronological order.
pub fn expand(task: &Task, start: NaiveDate, end: NaiveDate) -> Vec<Occurrence> {
    OccurrenceDays::new(task, start, end)
        .map(|day| Occurrence::new(task, day))
        .collect()
}

/// Occurrences of every task between `start` and `end`, ordered by start time.
pub fn expand_all(tasks: &[Task], start: NaiveDate, end: NaiveDate) -> Vec<Occurrence> {
    let mut occurrences: Vec<Occurrence> = tasks
        .iter()
        .flat_map(|task| expand(task, start, end))
        .collect();
    occurrences.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
    occurrences
}

/// Every occurrence on a single day, ordered by start time.
pub fn occurrences_on(tasks: &[Task], day: NaiveDate) -> Vec<Occurrence> {
    let mut occurrences: Vec<Occurrence> = tasks
        .iter()
        .filter(|task| occurs_on(task, day))
        .map(|task| Occurrence::new(task, day))
        .collect();
    occurrences.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
    occurrences
}
