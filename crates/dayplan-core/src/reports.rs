use chrono::{Datelike, NaiveDate};

use crate::calendar::last_day_of_month;
use crate::error::CoreError;
use crate::models::{Category, Task};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub completions: usize,
}

/// Completion statistics over the whole task list, with a per-day breakdown
/// for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReport {
    pub total_tasks: usize,
    pub total_completions: usize,
    /// Only categories with at least one completion, in `Category::ALL` order.
    pub by_category: Vec<(Category, usize)>,
    /// One entry per day of the month, zero-filled.
    pub by_day: Vec<DailyCount>,
}

impl CompletionReport {
    pub fn build(tasks: &[Task], year: i32, month: u32) -> Result<Self, CoreError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| CoreError::InvalidInput(format!("Invalid month: {}-{:02}", year, month)))?;
        let last = last_day_of_month(year, month)?;

        let mut by_day: Vec<DailyCount> = first
            .iter_days()
            .take_while(|d| *d <= last)
            .map(|date| DailyCount {
                date,
                completions: 0,
            })
            .collect();

        let mut per_category = [0usize; Category::ALL.len()];
        let mut total_completions = 0;

        for task in tasks {
            let slot = Category::ALL
                .iter()
                .position(|c| *c == task.category)
                .unwrap_or_default();
            for day in &task.completed_dates {
                total_completions += 1;
                per_category[slot] += 1;
                if day.year() == year && day.month() == month {
                    by_day[day.day0() as usize].completions += 1;
                }
            }
        }

        let by_category = Category::ALL
            .into_iter()
            .zip(per_category)
            .filter(|(_, count)| *count > 0)
            .collect();

        Ok(Self {
            total_tasks: tasks.len(),
            total_completions,
            by_category,
            by_day,
        })
    }

    pub fn busiest_day(&self) -> Option<&DailyCount> {
        self.by_day
            .iter()
            .filter(|d| d.completions > 0)
            .max_by_key(|d| (d.completions, std::cmp::Reverse(d.date)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Criticality, Repeat};
    use std::collections::BTreeSet;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(category: Category, done: &[NaiveDate]) -> Task {
        Task {
            id: Uuid::now_v7(),
            title: "Task".to_string(),
            description: None,
            category,
            due_at: date(2024, 1, 1).and_hms_opt(8, 0, 0).unwrap(),
            duration: 30,
            criticality: Criticality::Low,
            repeat: Repeat::Daily,
            completed_dates: done.iter().copied().collect::<BTreeSet<_>>(),
            reminder: None,
        }
    }

    #[test]
    fn test_report_counts() {
        let tasks = vec![
            task(Category::Work, &[date(2024, 2, 3), date(2024, 2, 4), date(2024, 1, 31)]),
            task(Category::Life, &[date(2024, 2, 3)]),
            task(Category::Home, &[]),
        ];
        let report = CompletionReport::build(&tasks, 2024, 2).unwrap();

        assert_eq!(report.total_tasks, 3);
        assert_eq!(report.total_completions, 4);
        assert_eq!(
            report.by_category,
            vec![(Category::Work, 3), (Category::Life, 1)]
        );
        assert_eq!(report.by_day.len(), 29);
        assert_eq!(report.by_day[2].completions, 2);
        assert_eq!(report.by_day[3].completions, 1);
        assert_eq!(report.by_day.iter().map(|d| d.completions).sum::<usize>(), 3);
        assert_eq!(report.busiest_day().unwrap().date, date(2024, 2, 3));
    }

    #[test]
    fn test_empty_report() {
        let report = CompletionReport::build(&[], 2023, 4).unwrap();
        assert_eq!(report.total_completions, 0);
        assert!(report.by_category.is_empty());
        assert_eq!(report.by_day.len(), 30);
        assert!(report.busiest_day().is_none());
    }
}
