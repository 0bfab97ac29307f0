//! "Plan my day" selection and the dashboard buckets.

use chrono::{Duration, NaiveDate};
use std::collections::HashSet;
use uuid::Uuid;

use crate::models::{Category, DailyPlan, Occurrence, Repeat, Task, UserProfile};
use crate::recurrence::occurs_on;

/// Tasks offered by the planning flow for `today`, overdue first, then by
/// criticality.
pub fn tasks_to_plan(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    let mut candidates: Vec<Task> = tasks
        .iter()
        .filter(|task| {
            if task.is_completed_on(today) && task.repeat != Repeat::Daily {
                return false;
            }
            if task.is_finished() {
                return false;
            }
            if task.repeat == Repeat::None {
                task.anchor_day() <= today
            } else {
                occurs_on(task, today)
            }
        })
        .cloned()
        .collect();

    candidates.sort_by(|a, b| {
        a.anchor_day()
            .cmp(&b.anchor_day())
            .then(a.criticality.cmp(&b.criticality))
    });
    candidates
}

/// Same task, due tomorrow at the same time of day.
pub fn snooze(task: &Task, today: NaiveDate) -> Task {
    let tomorrow = today + Duration::days(1);
    Task {
        due_at: tomorrow.and_time(task.time_of_day()),
        ..task.clone()
    }
}

/// Decisions collected while walking through [`tasks_to_plan`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanActions {
    pub committed: Vec<Uuid>,
    pub snoozed: Vec<Task>,
    pub deleted: Vec<Uuid>,
}

impl PlanActions {
    pub fn commit(&mut self, task: &Task) {
        self.committed.push(task.id);
    }

    pub fn snooze(&mut self, task: &Task, today: NaiveDate) {
        self.snoozed.push(snooze(task, today));
    }

    pub fn delete(&mut self, task: &Task) {
        self.deleted.push(task.id);
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty() && self.snoozed.is_empty() && self.deleted.is_empty()
    }

    /// The task list after deletions and snoozes.
    pub fn apply(&self, tasks: Vec<Task>) -> Vec<Task> {
        let deleted: HashSet<Uuid> = self.deleted.iter().copied().collect();
        tasks
            .into_iter()
            .filter(|task| !deleted.contains(&task.id))
            .map(|task| {
                self.snoozed
                    .iter()
                    .find(|snoozed| snoozed.id == task.id)
                    .cloned()
                    .unwrap_or(task)
            })
            .collect()
    }
}

/// A plan counts only on the day it was made.
pub fn is_day_planned(plan: &DailyPlan, profile: &UserProfile, today: NaiveDate) -> bool {
    plan.date == Some(today) && profile.last_planned_date == Some(today)
}

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub planned: bool,
    pub my_day: Vec<Occurrence>,
    pub overdue: Vec<Occurrence>,
    pub today: Vec<Occurrence>,
    pub upcoming: Vec<Occurrence>,
}

impl Dashboard {
    pub fn is_empty(&self) -> bool {
        self.my_day.is_empty()
            && self.overdue.is_empty()
            && self.today.is_empty()
            && self.upcoming.is_empty()
    }
}

/// The occurrence a task is filed under on the dashboard. One-off tasks use
/// their due day; recurring tasks their next occurrence from today on.
fn dashboard_occurrence(task: &Task, today: NaiveDate) -> Option<Occurrence> {
    let day = match task.repeat {
        Repeat::None => task.anchor_day(),
        rule => rule.first_on_or_after(task.anchor_day(), today)?,
    };
    Some(Occurrence::new(task, day))
}

/// Groups tasks into overdue, today and upcoming. When the day has been
/// planned, committed tasks are pulled out of overdue and today into `my_day`.
pub fn dashboard(
    tasks: &[Task],
    plan: &DailyPlan,
    profile: &UserProfile,
    today: NaiveDate,
    category: Option<Category>,
) -> Dashboard {
    let mut entries: Vec<Occurrence> = tasks
        .iter()
        .filter(|task| category.map_or(true, |c| task.category == c))
        .filter(|task| !task.is_finished())
        .filter_map(|task| dashboard_occurrence(task, today))
        .collect();
    entries.sort_by_key(|occurrence| occurrence.starts_at);

    let planned = is_day_planned(plan, profile, today);
    let committed: HashSet<Uuid> = if planned {
        plan.task_ids.iter().copied().collect()
    } else {
        HashSet::new()
    };

    let mut board = Dashboard {
        planned,
        ..Dashboard::default()
    };
    for occurrence in entries {
        let day = occurrence.date();
        if day > today {
            board.upcoming.push(occurrence);
        } else if committed.contains(&occurrence.task.id) {
            board.my_day.push(occurrence);
        } else if day < today {
            board.overdue.push(occurrence);
        } else {
            board.today.push(occurrence);
        }
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Criticality;
    use chrono::NaiveTime;
    use std::collections::BTreeSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(title: &str, repeat: Repeat, due: NaiveDate, criticality: Criticality) -> Task {
        Task {
            id: Uuid::now_v7(),
            title: title.to_string(),
            description: None,
            category: Category::Home,
            due_at: due.and_hms_opt(10, 30, 0).unwrap(),
            duration: 45,
            criticality,
            repeat,
            completed_dates: BTreeSet::new(),
            reminder: None,
        }
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    fn occurrence_titles(occurrences: &[Occurrence]) -> Vec<&str> {
        occurrences.iter().map(|o| o.task.title.as_str()).collect()
    }

    #[test]
    fn test_tasks_to_plan_selection() {
        let today = date(2024, 1, 10);
        let mut done_weekly = task("Done weekly", Repeat::Weekly, date(2024, 1, 3), Criticality::Low);
        done_weekly.completed_dates.insert(today);
        let mut done_daily = task("Done daily", Repeat::Daily, date(2024, 1, 1), Criticality::Low);
        done_daily.completed_dates.insert(today);
        let mut finished = task("Finished", Repeat::None, date(2024, 1, 5), Criticality::Urgent);
        finished.completed_dates.insert(date(2024, 1, 5));

        let tasks = vec![
            task("Future", Repeat::None, date(2024, 1, 11), Criticality::Urgent),
            task("Overdue", Repeat::None, date(2024, 1, 2), Criticality::Low),
            task("Wrong weekday", Repeat::Weekly, date(2024, 1, 4), Criticality::High),
            task("Today low", Repeat::None, today, Criticality::Low),
            task("Today urgent", Repeat::None, today, Criticality::Urgent),
            done_weekly,
            done_daily,
            finished,
        ];

        assert_eq!(
            titles(&tasks_to_plan(&tasks, today)),
            vec!["Done daily", "Overdue", "Today urgent", "Today low"]
        );
    }

    #[test]
    fn test_snooze_moves_to_tomorrow_keeping_time() {
        let original = task("Call", Repeat::None, date(2024, 1, 2), Criticality::Medium);
        let snoozed = snooze(&original, date(2024, 1, 10));
        assert_eq!(snoozed.anchor_day(), date(2024, 1, 11));
        assert_eq!(snoozed.time_of_day(), NaiveTime::from_hms_opt(10, 30, 0).unwrap());
        assert_eq!(snoozed.id, original.id);
    }

    #[test]
    fn test_plan_actions_apply() {
        let today = date(2024, 1, 10);
        let keep = task("Keep", Repeat::None, today, Criticality::Low);
        let gone = task("Gone", Repeat::None, today, Criticality::Low);
        let later = task("Later", Repeat::None, today, Criticality::Low);

        let mut actions = PlanActions::default();
        actions.commit(&keep);
        actions.delete(&gone);
        actions.snooze(&later, today);

        let result = actions.apply(vec![keep.clone(), gone, later]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0], keep);
        assert_eq!(result[1].anchor_day(), date(2024, 1, 11));
    }

    #[test]
    fn test_is_day_planned_requires_both_dates() {
        let today = date(2024, 1, 10);
        let plan = DailyPlan {
            date: Some(today),
            task_ids: vec![],
        };
        let mut profile = UserProfile::default();
        assert!(!is_day_planned(&plan, &profile, today));
        profile.last_planned_date = Some(today);
        assert!(is_day_planned(&plan, &profile, today));
        assert!(!is_day_planned(&plan, &profile, date(2024, 1, 11)));
    }

    #[test]
    fn test_dashboard_buckets() {
        let today = date(2024, 1, 10);
        let overdue = task("Overdue", Repeat::None, date(2024, 1, 2), Criticality::Low);
        let due_today = task("Today", Repeat::None, today, Criticality::Low);
        let upcoming = task("Upcoming", Repeat::None, date(2024, 1, 12), Criticality::Low);
        let weekly = task("Weekly", Repeat::Weekly, date(2024, 1, 4), Criticality::Low);
        let mut finished = task("Finished", Repeat::None, today, Criticality::Low);
        finished.completed_dates.insert(today);
        let mut work = task("Work", Repeat::None, today, Criticality::Low);
        work.category = Category::Work;

        let tasks = vec![overdue, due_today, upcoming, weekly, finished, work];
        let board = dashboard(
            &tasks,
            &DailyPlan::default(),
            &UserProfile::default(),
            today,
            Some(Category::Home),
        );

        assert!(!board.planned);
        assert!(board.my_day.is_empty());
        assert_eq!(occurrence_titles(&board.overdue), vec!["Overdue"]);
        assert_eq!(occurrence_titles(&board.today), vec!["Today"]);
        assert_eq!(occurrence_titles(&board.upcoming), vec!["Weekly", "Upcoming"]);
        assert_eq!(board.upcoming[0].date(), date(2024, 1, 11));
    }

    #[test]
    fn test_dashboard_moves_committed_into_my_day() {
        let today = date(2024, 1, 10);
        let overdue = task("Overdue", Repeat::None, date(2024, 1, 2), Criticality::Low);
        let due_today = task("Today", Repeat::None, today, Criticality::Low);
        let other = task("Other", Repeat::None, today, Criticality::Low);
        let plan = DailyPlan {
            date: Some(today),
            task_ids: vec![overdue.id, due_today.id],
        };
        let profile = UserProfile {
            last_planned_date: Some(today),
            ..UserProfile::default()
        };

        let board = dashboard(&[overdue, due_today, other], &plan, &profile, today, None);

        assert!(board.planned);
        assert_eq!(occurrence_titles(&board.my_day), vec!["Overdue", "Today"]);
        assert!(board.overdue.is_empty());
        assert_eq!(occurrence_titles(&board.today), vec!["Other"]);
    }
}
