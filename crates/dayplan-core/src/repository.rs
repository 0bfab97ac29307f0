//! The owning store for every persisted collection.
//!
//! `Planner` reads a whole collection, applies one mutation and writes the
//! whole collection back. Mutations are serialized through a single lock so
//! that two of them can never interleave their read and write.

use chrono::{NaiveDate, NaiveTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::drag::Reschedule;
use crate::error::CoreError;
use crate::gamification::{self, CompletionOutcome};
use crate::models::{
    CustomReward, DailyPlan, NewTaskData, Note, Task, UpdateTaskData, UserProfile,
    MAX_DURATION_MINUTES,
};
use crate::planning::PlanActions;
use crate::store::{Collection, RecordStore};

/// Shortest accepted id prefix.
pub const MIN_PREFIX_LEN: usize = 2;

fn resolve_by_prefix<'a, T>(
    items: &'a [T],
    input: &str,
    kind: &str,
    id_of: impl Fn(&T) -> Uuid,
    label_of: impl Fn(&T) -> &str,
) -> Result<&'a T, CoreError> {
    let input = input.trim().to_lowercase();
    if let Ok(id) = Uuid::parse_str(&input) {
        return items
            .iter()
            .find(|item| id_of(*item) == id)
            .ok_or_else(|| CoreError::NotFound(format!("No {} with ID '{}'", kind, input)));
    }
    if input.len() < MIN_PREFIX_LEN {
        return Err(CoreError::InvalidInput(format!(
            "Short ID must be at least {} characters long.",
            MIN_PREFIX_LEN
        )));
    }

    let matches: Vec<&T> = items
        .iter()
        .filter(|item| id_of(*item).to_string().starts_with(&input))
        .collect();
    match matches.as_slice() {
        [] => Err(CoreError::NotFound(format!(
            "No {} found with ID prefix '{}'",
            kind, input
        ))),
        [single] => Ok(*single),
        many => Err(CoreError::AmbiguousId(
            many.iter()
                .map(|item| (id_of(*item).to_string(), label_of(*item).to_string()))
                .collect(),
        )),
    }
}

fn record<T: Serialize>(collection: Collection, value: &T) -> Result<(Collection, String), CoreError> {
    Ok((collection, serde_json::to_string(value)?))
}

fn validate_task_fields(title: &str, duration: u32) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::InvalidInput("Task title cannot be empty.".to_string()));
    }
    if !(1..=MAX_DURATION_MINUTES).contains(&duration) {
        return Err(CoreError::InvalidInput(format!(
            "Task duration must be between 1 and {} minutes.",
            MAX_DURATION_MINUTES
        )));
    }
    Ok(())
}

pub struct Planner<S: RecordStore> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: RecordStore> Planner<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn load<T: DeserializeOwned + Default>(&self, collection: Collection) -> Result<T, CoreError> {
        match self.store.load(collection).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(T::default()),
        }
    }

    async fn save<T: Serialize>(&self, collection: Collection, value: &T) -> Result<(), CoreError> {
        let json = serde_json::to_string(value)?;
        self.store.save(collection, json).await
    }


    // Tasks

    pub async fn tasks(&self) -> Result<Vec<Task>, CoreError> {
        self.load(Collection::Tasks).await
    }

    pub async fn add_task(&self, data: NewTaskData) -> Result<Task, CoreError> {
        validate_task_fields(&data.title, data.duration)?;
        let _guard = self.write_lock.lock().await;

        let task = Task {
            id: Uuid::new_v4(),
            title: data.title.trim().to_string(),
            description: data.description.filter(|d| !d.trim().is_empty()),
            category: data.category,
            due_at: data.due_at,
            duration: data.duration,
            criticality: data.criticality,
            repeat: data.repeat,
            completed_dates: Default::default(),
            reminder: data.reminder,
        };

        let mut tasks = self.tasks().await?;
        tasks.push(task.clone());
        self.save(Collection::Tasks, &tasks).await?;
        info!(task = %task.id, title = %task.title, "task added");
        Ok(task)
    }

    pub async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, CoreError> {
        Ok(self.tasks().await?.into_iter().find(|t| t.id == id))
    }

    /// Resolves a full id or a unique id prefix.
    pub async fn resolve_task(&self, input: &str) -> Result<Task, CoreError> {
        let tasks = self.tasks().await?;
        resolve_by_prefix(&tasks, input, "task", |t| t.id, |t| t.title.as_str()).cloned()
    }

    pub async fn update_task(&self, id: Uuid, data: UpdateTaskData) -> Result<Task, CoreError> {
        let _guard = self.write_lock.lock().await;
        let mut tasks = self.tasks().await?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        if let Some(title) = data.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = data.description {
            task.description = description.filter(|d| !d.trim().is_empty());
        }
        if let Some(category) = data.category {
            task.category = category;
        }
        if let Some(due_at) = data.due_at {
            task.due_at = due_at;
        }
        if let Some(duration) = data.duration {
            task.duration = duration;
        }
        if let Some(criticality) = data.criticality {
            task.criticality = criticality;
        }
        if let Some(repeat) = data.repeat {
            task.repeat = repeat;
        }
        if let Some(reminder) = data.reminder {
            task.reminder = reminder;
        }
        validate_task_fields(&task.title, task.duration)?;

        let updated = task.clone();
        self.save(Collection::Tasks, &tasks).await?;
        debug!(task = %id, "task updated");
        Ok(updated)
    }

    /// Removes a task and returns it.
    pub async fn delete_task(&self, id: Uuid) -> Result<Task, CoreError> {
        let _guard = self.write_lock.lock().await;
        let mut tasks = self.tasks().await?;
        let index = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        let removed = tasks.remove(index);
        self.save(Collection::Tasks, &tasks).await?;
        info!(task = %id, "task deleted");
        Ok(removed)
    }

    /// Toggles completion of the occurrence of task `id` on `day` and persists
    /// both the task and the profile.
    pub async fn toggle_completion(&self, id: Uuid, day: NaiveDate) -> Result<CompletionOutcome, CoreError> {
        let _guard = self.write_lock.lock().await;
        let mut tasks = self.tasks().await?;
        let profile: UserProfile = self.load(Collection::UserProfile).await?;

        let slot = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        let outcome = gamification::complete(slot, &profile, day);
        *slot = outcome.task.clone();

        self.store
            .save_all(vec![
                record(Collection::Tasks, &tasks)?,
                record(Collection::UserProfile, &outcome.profile)?,
            ])
            .await?;
        Ok(outcome)
    }

    /// Moves the anchor of a task to a new time of day, keeping its date.
    pub async fn reschedule(&self, reschedule: Reschedule) -> Result<Task, CoreError> {
        let _guard = self.write_lock.lock().await;
        let mut tasks = self.tasks().await?;
        let slot = tasks
            .iter_mut()
            .find(|t| t.id == reschedule.task_id)
            .ok_or_else(|| CoreError::NotFound(reschedule.task_id.to_string()))?;
        *slot = reschedule.apply(slot);
        let updated = slot.clone();

        self.save(Collection::Tasks, &tasks).await?;
        info!(task = %updated.id, time = %reschedule.time, "task rescheduled");
        Ok(updated)
    }

    pub async fn reschedule_to(&self, id: Uuid, time: NaiveTime) -> Result<Task, CoreError> {
        self.reschedule(Reschedule { task_id: id, time }).await
    }

    // Profile

    pub async fn profile(&self) -> Result<UserProfile, CoreError> {
        self.load(Collection::UserProfile).await
    }

    /// Applies passive streak decay for `today`, saving only when it changed.
    pub async fn refresh_streak(&self, today: NaiveDate) -> Result<UserProfile, CoreError> {
        let _guard = self.write_lock.lock().await;
        let mut profile = self.profile().await?;
        if gamification::refresh_streak(&mut profile, today) {
            self.save(Collection::UserProfile, &profile).await?;
        }
        Ok(profile)
    }

    pub async fn set_name(&self, name: &str) -> Result<UserProfile, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidInput("Name cannot be empty.".to_string()));
        }
        let _guard = self.write_lock.lock().await;
        let mut profile = self.profile().await?;
        profile.name = name.to_string();
        self.save(Collection::UserProfile, &profile).await?;
        Ok(profile)
    }

    // Notes

    /// Notes, newest first.
    pub async fn notes(&self) -> Result<Vec<Note>, CoreError> {
        let mut notes: Vec<Note> = self.load(Collection::Notes).await?;
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }

    pub async fn add_note(&self, title: &str, content: &str) -> Result<Note, CoreError> {
        if title.trim().is_empty() {
            return Err(CoreError::InvalidInput("Note title cannot be empty.".to_string()));
        }
        let _guard = self.write_lock.lock().await;
        let note = Note {
            id: Uuid::new_v4(),
            title: title.trim().to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        let mut notes = self.notes().await?;
        notes.insert(0, note.clone());
        self.save(Collection::Notes, &notes).await?;
        Ok(note)
    }

    pub async fn resolve_note(&self, input: &str) -> Result<Note, CoreError> {
        let notes = self.notes().await?;
        resolve_by_prefix(&notes, input, "note", |n| n.id, |n| n.title.as_str()).cloned()
    }

    pub async fn update_note(
        &self,
        id: Uuid,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Note, CoreError> {
        let _guard = self.write_lock.lock().await;
        let mut notes = self.notes().await?;
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        if let Some(title) = title {
            if title.trim().is_empty() {
                return Err(CoreError::InvalidInput("Note title cannot be empty.".to_string()));
            }
            note.title = title.trim().to_string();
        }
        if let Some(content) = content {
            note.content = content;
        }
        let updated = note.clone();
        self.save(Collection::Notes, &notes).await?;
        Ok(updated)
    }

    pub async fn delete_note(&self, id: Uuid) -> Result<Note, CoreError> {
        let _guard = self.write_lock.lock().await;
        let mut notes = self.notes().await?;
        let index = notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        let removed = notes.remove(index);
        self.save(Collection::Notes, &notes).await?;
        Ok(removed)
    }

    // Rewards

    pub async fn rewards(&self) -> Result<Vec<CustomReward>, CoreError> {
        self.load(Collection::CustomRewards).await
    }

    pub async fn add_reward(&self, name: &str, cost: u32) -> Result<CustomReward, CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::InvalidInput("Reward name cannot be empty.".to_string()));
        }
        if cost == 0 {
            return Err(CoreError::InvalidInput(
                "Reward cost must be greater than zero.".to_string(),
            ));
        }
        let _guard = self.write_lock.lock().await;
        let reward = CustomReward {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            cost,
        };
        let mut rewards = self.rewards().await?;
        rewards.push(reward.clone());
        self.save(Collection::CustomRewards, &rewards).await?;
        Ok(reward)
    }

    pub async fn resolve_reward(&self, input: &str) -> Result<CustomReward, CoreError> {
        let rewards = self.rewards().await?;
        resolve_by_prefix(&rewards, input, "reward", |r| r.id, |r| r.name.as_str()).cloned()
    }

    /// Spends the reward's cost and removes the reward.
    pub async fn redeem_reward(&self, id: Uuid) -> Result<(CustomReward, UserProfile), CoreError> {
        let _guard = self.write_lock.lock().await;
        let mut rewards = self.rewards().await?;
        let index = rewards
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        let profile = gamification::redeem_reward(&self.profile().await?, &rewards[index])?;
        let reward = rewards.remove(index);

        self.store
            .save_all(vec![
                record(Collection::UserProfile, &profile)?,
                record(Collection::CustomRewards, &rewards)?,
            ])
            .await?;
        info!(reward = %reward.name, cost = reward.cost, points = profile.points, "reward redeemed");
        Ok((reward, profile))
    }

    // Planning

    pub async fn daily_plan(&self) -> Result<DailyPlan, CoreError> {
        self.load(Collection::DailyPlan).await
    }

    /// Applies deletions and snoozes, overwrites the daily plan and marks the
    /// day as planned.
    pub async fn finish_planning(&self, actions: &PlanActions, today: NaiveDate) -> Result<DailyPlan, CoreError> {
        let _guard = self.write_lock.lock().await;
        let tasks = actions.apply(self.tasks().await?);
        let plan = DailyPlan {
            date: Some(today),
            task_ids: actions.committed.clone(),
        };
        let mut profile = self.profile().await?;
        profile.last_planned_date = Some(today);

        self.store
            .save_all(vec![
                record(Collection::Tasks, &tasks)?,
                record(Collection::DailyPlan, &plan)?,
                record(Collection::UserProfile, &profile)?,
            ])
            .await?;
        info!(
            %today,
            committed = actions.committed.len(),
            snoozed = actions.snoozed.len(),
            deleted = actions.deleted.len(),
            "day planned"
        );
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        id: Uuid,
        name: &'static str,
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                id: Uuid::parse_str("a1b2c3d4-0000-4000-8000-000000000001").unwrap(),
                name: "first",
            },
            Item {
                id: Uuid::parse_str("a1b2ffff-0000-4000-8000-000000000002").unwrap(),
                name: "second",
            },
        ]
    }

    fn resolve<'a>(items: &'a [Item], input: &str) -> Result<&'a Item, CoreError> {
        resolve_by_prefix(items, input, "item", |i| i.id, |i| i.name)
    }

    #[test]
    fn test_unique_prefix_resolves() {
        let items = items();
        assert_eq!(resolve(&items, "a1b2c").unwrap().name, "first");
        assert_eq!(resolve(&items, "A1B2F").unwrap().name, "second");
    }

    #[test]
    fn test_full_id_resolves() {
        let items = items();
        let found = resolve(&items, "a1b2ffff-0000-4000-8000-000000000002").unwrap();
        assert_eq!(found.name, "second");
    }

    #[test]
    fn test_ambiguous_prefix_lists_candidates() {
        let items = items();
        match resolve(&items, "a1b2") {
            Err(CoreError::AmbiguousId(candidates)) => {
                assert_eq!(candidates.len(), 2);
                assert_eq!(candidates[0].1, "first");
            }
            other => panic!("expected ambiguity, got {:?}", other.map(|i| i.name)),
        }
    }

    #[test]
    fn test_short_and_unknown_prefixes() {
        let items = items();
        assert!(matches!(resolve(&items, "a"), Err(CoreError::InvalidInput(_))));
        assert!(matches!(resolve(&items, "ff"), Err(CoreError::NotFound(_))));
    }
}
