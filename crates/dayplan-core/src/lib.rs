//! # Dayplan Core Library
//!
//! Personal day planning: recurring tasks, a collision-free daily timeline,
//! completion streaks and points, and reminders.
//!
//! ## Core Modules
//!
//! - [`models`]: Tasks, occurrences, profile, notes and rewards
//! - [`recurrence`]: Expands `none|daily|weekly|monthly` rules into occurrences
//! - [`calendar`]: Month grid built from occurrences
//! - [`layout`]: Column assignment and vertical geometry of the daily timeline
//! - [`drag`]: Drag-to-reschedule state machine with guaranteed pointer release
//! - [`gamification`]: Completion toggling, points, streaks, rewards and badges
//! - [`planning`]: "Plan my day" candidates and dashboard buckets
//! - [`reports`]: Completion statistics
//! - [`reminders`]: Reminder fire times and the timer scheduler
//! - [`store`]: Key-value record store (SQLite or in-memory)
//! - [`repository`]: `Planner`, the owning store for every collection
//! - [`suggest`]: AI sub-task suggestions
//! - [`timezone`]: Local wall-clock to instant conversion
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use dayplan_core::{
//!     layout::{DayTimeline, TimelineGeometry},
//!     models::{Category, Criticality, NewTaskData, Repeat},
//!     recurrence::occurrences_on,
//!     repository::Planner,
//!     store::SqliteStore,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let planner = Planner::new(SqliteStore::connect("dayplan.db").await?);
//!
//!     let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!     planner
//!         .add_task(NewTaskData {
//!             title: "Weekly review".to_string(),
//!             description: None,
//!             category: Category::Work,
//!             due_at: start.and_hms_opt(9, 0, 0).unwrap(),
//!             duration: 60,
//!             criticality: Criticality::High,
//!             repeat: Repeat::Weekly,
//!             reminder: Some(15),
//!         })
//!         .await?;
//!
//!     let day = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
//!     let tasks = planner.tasks().await?;
//!     let timeline = DayTimeline::build(day, occurrences_on(&tasks, day), TimelineGeometry::default());
//!     for block in &timeline.blocks {
//!         println!("{} at {:.0}px, {:.0}% wide", block.occurrence.task.title, block.top, block.width());
//!     }
//!     Ok(())
//! }
//! ```

pub mod calendar;
pub mod drag;
pub mod error;
pub mod gamification;
pub mod layout;
pub mod models;
pub mod planning;
pub mod recurrence;
pub mod reminders;
pub mod reports;
pub mod repository;
pub mod store;
pub mod suggest;
pub mod timezone;
