use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Format of a calendar-day key (`YYYY-MM-DD`).
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Longest task a single day can hold, in minutes.
pub const MAX_DURATION_MINUTES: u32 = 24 * 60;

/// Renders the calendar-day key used for completion and streak tracking.
pub fn day_key(day: NaiveDate) -> String {
    day.format(DAY_KEY_FORMAT).to_string()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Work,
    Home,
    Life,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Work, Category::Home, Category::Life];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Work => write!(f, "Work"),
            Category::Home => write!(f, "Home"),
            Category::Life => write!(f, "Life"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid category: {0} (expected work, home or life)")]
pub struct ParseCategoryError(String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "work" => Ok(Category::Work),
            "home" => Ok(Category::Home),
            "life" => Ok(Category::Life),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

/// Declaration order is urgency order, so sorting ascending puts urgent first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    Urgent,
    High,
    Medium,
    Low,
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criticality::Urgent => write!(f, "urgent"),
            Criticality::High => write!(f, "high"),
            Criticality::Medium => write!(f, "medium"),
            Criticality::Low => write!(f, "low"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid criticality: {0} (expected urgent, high, medium or low)")]
pub struct ParseCriticalityError(String);

impl FromStr for Criticality {
    type Err = ParseCriticalityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "urgent" => Ok(Criticality::Urgent),
            "high" => Ok(Criticality::High),
            "medium" => Ok(Criticality::Medium),
            "low" => Ok(Criticality::Low),
            _ => Err(ParseCriticalityError(s.to_string())),
        }
    }
}

/// Recurrence rule of a task. The anchor is the calendar day of `Task::due_at`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    /// A stored rule this build does not understand. Never occurs.
    #[serde(other)]
    Unsupported,
}

impl Repeat {
    pub fn is_recurring(&self) -> bool {
        matches!(self, Repeat::Daily | Repeat::Weekly | Repeat::Monthly)
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repeat::None => write!(f, "none"),
            Repeat::Daily => write!(f, "daily"),
            Repeat::Weekly => write!(f, "weekly"),
            Repeat::Monthly => write!(f, "monthly"),
            Repeat::Unsupported => write!(f, "unsupported"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid repeat rule: {0} (expected none, daily, weekly or monthly)")]
pub struct ParseRepeatError(String);

impl FromStr for Repeat {
    type Err = ParseRepeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "once" => Ok(Repeat::None),
            "daily" => Ok(Repeat::Daily),
            "weekly" => Ok(Repeat::Weekly),
            "monthly" => Ok(Repeat::Monthly),
            _ => Err(ParseRepeatError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Category,
    /// Anchor occurrence in local wall-clock time. Its time-of-day is the
    /// template for every recurring occurrence.
    pub due_at: NaiveDateTime,
    /// Minutes, at least 1.
    pub duration: u32,
    pub criticality: Criticality,
    #[serde(default)]
    pub repeat: Repeat,
    #[serde(default)]
    pub completed_dates: BTreeSet<NaiveDate>,
    /// Minutes before the occurrence; 0 or absent disables the reminder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<u32>,
}

impl Task {
    pub fn anchor_day(&self) -> NaiveDate {
        self.due_at.date()
    }

    pub fn time_of_day(&self) -> NaiveTime {
        self.due_at.time()
    }

    /// Minutes since midnight of the template time-of-day.
    pub fn start_minutes(&self) -> u32 {
        let t = self.time_of_day();
        t.hour() * 60 + t.minute()
    }

    pub fn is_completed_on(&self, day: NaiveDate) -> bool {
        self.completed_dates.contains(&day)
    }

    /// A one-off task with any completion is permanently done.
    pub fn is_finished(&self) -> bool {
        self.repeat == Repeat::None && !self.completed_dates.is_empty()
    }

    /// Reminder offset if one is enabled.
    pub fn reminder_minutes(&self) -> Option<u32> {
        self.reminder.filter(|m| *m > 0)
    }

    /// Same task with the anchor's time-of-day replaced; the anchor day is kept
    /// so recurring tasks keep their cadence.
    pub fn with_time_of_day(&self, time: NaiveTime) -> Task {
        Task {
            due_at: self.anchor_day().and_time(time),
            ..self.clone()
        }
    }
}

/// Identity of one occurrence for layout, reminders and completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OccurrenceKey {
    pub task_id: Uuid,
    pub date: NaiveDate,
}

impl fmt::Display for OccurrenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.task_id, day_key(self.date))
    }
}

/// One concrete calendar realization of a task. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub task: Task,
    /// The anchor rewritten to this occurrence's day, time-of-day preserved.
    pub starts_at: NaiveDateTime,
    pub completed: bool,
}

impl Occurrence {
    pub fn new(task: &Task, date: NaiveDate) -> Self {
        Self {
            starts_at: date.and_time(task.time_of_day()),
            completed: task.is_completed_on(date),
            task: task.clone(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.starts_at.date()
    }

    pub fn key(&self) -> OccurrenceKey {
        OccurrenceKey {
            task_id: self.task.id,
            date: self.date(),
        }
    }

    /// Composite identifier distinguishing occurrences of the same task.
    pub fn id(&self) -> String {
        format!(
            "{}-{}",
            self.task.id,
            self.starts_at.and_utc().timestamp_millis()
        )
    }

    pub fn start_minutes(&self) -> u32 {
        self.starts_at.hour() * 60 + self.starts_at.minute()
    }

    pub fn end_minutes(&self) -> u32 {
        self.start_minutes().saturating_add(self.task.duration)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UserProfile {
    pub name: String,
    pub points: u32,
    pub streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_planned_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DailyPlan {
    pub date: Option<NaiveDate>,
    pub task_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomReward {
    pub id: Uuid,
    pub name: String,
    pub cost: u32,
}

#[derive(Debug, Clone)]
pub struct NewTaskData {
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub due_at: NaiveDateTime,
    pub duration: u32,
    pub criticality: Criticality,
    pub repeat: Repeat,
    pub reminder: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTaskData {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<Category>,
    pub due_at: Option<NaiveDateTime>,
    pub duration: Option<u32>,
    pub criticality: Option<Criticality>,
    pub repeat: Option<Repeat>,
    pub reminder: Option<Option<u32>>,
}

impl UpdateTaskData {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.due_at.is_none()
            && self.duration.is_none()
            && self.criticality.is_none()
            && self.repeat.is_none()
            && self.reminder.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("work", Category::Work)]
    #[case("HOME", Category::Home)]
    #[case("Life", Category::Life)]
    fn test_parse_category(#[case] input: &str, #[case] expected: Category) {
        assert_eq!(input.parse::<Category>().unwrap(), expected);
    }

    #[test]
    fn test_parse_invalid_values() {
        assert!("office".parse::<Category>().is_err());
        assert!("critical".parse::<Criticality>().is_err());
        assert!("yearly".parse::<Repeat>().is_err());
    }

    #[test]
    fn test_criticality_orders_urgent_first() {
        let mut levels = vec![
            Criticality::Low,
            Criticality::Urgent,
            Criticality::Medium,
            Criticality::High,
        ];
        levels.sort();
        assert_eq!(
            levels,
            vec![
                Criticality::Urgent,
                Criticality::High,
                Criticality::Medium,
                Criticality::Low
            ]
        );
    }

    #[test]
    fn test_unknown_repeat_deserializes_as_unsupported() {
        let repeat: Repeat = serde_json::from_str("\"yearly\"").unwrap();
        assert_eq!(repeat, Repeat::Unsupported);
        let repeat: Repeat = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(repeat, Repeat::Weekly);
    }

    #[test]
    fn test_completed_dates_serialize_as_day_keys() {
        let task = Task {
            id: Uuid::nil(),
            title: "Yoga".to_string(),
            description: None,
            category: Category::Life,
            due_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(7, 30, 0)
                .unwrap(),
            duration: 30,
            criticality: Criticality::Low,
            repeat: Repeat::Daily,
            completed_dates: [NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()].into(),
            reminder: None,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["completed_dates"][0], "2024-01-02");
        assert_eq!(json["repeat"], "daily");
        assert!(json.get("reminder").is_none());
    }

    #[test]
    fn test_with_time_of_day_keeps_anchor_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let task = Task {
            id: Uuid::nil(),
            title: "Standup".to_string(),
            description: None,
            category: Category::Work,
            due_at: day.and_hms_opt(9, 0, 0).unwrap(),
            duration: 15,
            criticality: Criticality::Medium,
            repeat: Repeat::Weekly,
            completed_dates: BTreeSet::new(),
            reminder: Some(0),
        };
        let moved = task.with_time_of_day(NaiveTime::from_hms_opt(14, 45, 0).unwrap());
        assert_eq!(moved.anchor_day(), day);
        assert_eq!(moved.start_minutes(), 14 * 60 + 45);
        assert_eq!(task.reminder_minutes(), None);
    }

    #[test]
    fn test_occurrence_key_display() {
        let key = OccurrenceKey {
            task_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
        };
        assert_eq!(
            key.to_string(),
            "00000000-0000-0000-0000-000000000000-2024-01-08"
        );
    }
}
