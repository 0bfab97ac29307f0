//! Completion toggling, points, streaks, rewards and badges.
//!
//! Completion state is keyed by the occurrence's calendar day. Un-completing
//! only removes the day key: points and streak already awarded stay as they
//! are.

use chrono::NaiveDate;
use tracing::info;

use crate::error::CoreError;
use crate::models::{Criticality, CustomReward, Task, UserProfile};

pub const BASE_POINTS: u32 = 10;

pub fn criticality_bonus(criticality: Criticality) -> u32 {
    match criticality {
        Criticality::Urgent => 15,
        Criticality::High => 10,
        Criticality::Medium => 5,
        Criticality::Low => 0,
    }
}

/// Points earned by completing one occurrence.
pub fn points_for(criticality: Criticality) -> u32 {
    BASE_POINTS + criticality_bonus(criticality)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionChange {
    Completed { points: u32 },
    Uncompleted,
}

/// The mutation intent produced by a completion toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub task: Task,
    pub profile: UserProfile,
    pub change: CompletionChange,
}

impl CompletionOutcome {
    pub fn points_awarded(&self) -> u32 {
        match self.change {
            CompletionChange::Completed { points } => points,
            CompletionChange::Uncompleted => 0,
        }
    }
}

/// Streak after a completion on `day`.
///
/// A completion on a later day than the last one extends the streak when the
/// last one was exactly the day before, and restarts it at 1 otherwise.
/// Completions on or before the last completed day leave it alone.
fn next_streak(profile: &UserProfile, day: NaiveDate) -> u32 {
    match profile.last_completed_date {
        Some(last) if last >= day => profile.streak,
        Some(last) if day.pred_opt() == Some(last) => profile.streak + 1,
        _ => 1,
    }
}

/// Completes the occurrence of `task` on `day`, or un-completes it if it is
/// already done.
pub fn complete(task: &Task, profile: &UserProfile, day: NaiveDate) -> CompletionOutcome {
    if task.is_completed_on(day) {
        return uncomplete(task, profile, day);
    }

    let mut updated = task.clone();
    updated.completed_dates.insert(day);

    let points = points_for(task.criticality);
    let profile = UserProfile {
        points: profile.points.saturating_add(points),
        streak: next_streak(profile, day),
        last_completed_date: Some(day),
        ..profile.clone()
    };
    info!(task = %task.id, %day, points, streak = profile.streak, "occurrence completed");

    CompletionOutcome {
        task: updated,
        profile,
        change: CompletionChange::Completed { points },
    }
}

/// Removes the completion of `task` on `day`. The profile is returned unchanged.
pub fn uncomplete(task: &Task, profile: &UserProfile, day: NaiveDate) -> CompletionOutcome {
    let mut updated = task.clone();
    updated.completed_dates.remove(&day);
    info!(task = %task.id, %day, "occurrence un-completed");

    CompletionOutcome {
        task: updated,
        profile: profile.clone(),
        change: CompletionChange::Uncompleted,
    }
}

/// Passive streak decay. Returns true when the streak was reset.
pub fn refresh_streak(profile: &mut UserProfile, today: NaiveDate) -> bool {
    let Some(last) = profile.last_completed_date else {
        return false;
    };
    let Some(yesterday) = today.pred_opt() else {
        return false;
    };
    if last < yesterday && profile.streak != 0 {
        info!(%last, %today, streak = profile.streak, "streak expired");
        profile.streak = 0;
        return true;
    }
    false
}

/// Spends points on a reward.
pub fn redeem_reward(profile: &UserProfile, reward: &CustomReward) -> Result<UserProfile, CoreError> {
    if profile.points < reward.cost {
        return Err(CoreError::InsufficientPoints {
            cost: reward.cost,
            available: profile.points,
        });
    }
    Ok(UserProfile {
        points: profile.points - reward.cost,
        ..profile.clone()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
    TaskStarter,
    OnFire,
    WeekWarrior,
    ProductivityPro,
    GoalGetter,
    PlannerExtraordinaire,
}

impl Badge {
    pub const ALL: [Badge; 6] = [
        Badge::TaskStarter,
        Badge::OnFire,
        Badge::WeekWarrior,
        Badge::ProductivityPro,
        Badge::GoalGetter,
        Badge::PlannerExtraordinaire,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Badge::TaskStarter => "Task Starter",
            Badge::OnFire => "On Fire",
            Badge::WeekWarrior => "Week Warrior",
            Badge::ProductivityPro => "Productivity Pro",
            Badge::GoalGetter => "Goal Getter",
            Badge::PlannerExtraordinaire => "Planner Extraordinaire",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Badge::TaskStarter => "Complete your first task.",
            Badge::OnFire => "Maintain a 3-day streak.",
            Badge::WeekWarrior => "Maintain a 7-day streak.",
            Badge::ProductivityPro => "Complete 25 tasks.",
            Badge::GoalGetter => "Earn 1000 points.",
            Badge::PlannerExtraordinaire => "Plan tasks for a full month.",
        }
    }

    pub fn is_unlocked(&self, tasks: &[Task], profile: &UserProfile) -> bool {
        match self {
            Badge::TaskStarter => tasks.iter().any(|t| !t.completed_dates.is_empty()),
            Badge::OnFire => profile.streak >= 3,
            Badge::WeekWarrior => profile.streak >= 7,
            Badge::ProductivityPro => total_completions(tasks) >= 25,
            Badge::GoalGetter => profile.points >= 1000,
            // Unlocked by having any task at all, not by coverage of a month.
            Badge::PlannerExtraordinaire => !tasks.is_empty(),
        }
    }
}

pub fn total_completions(tasks: &[Task]) -> usize {
    tasks.iter().map(|t| t.completed_dates.len()).sum()
}

pub fn unlocked_badges(tasks: &[Task], profile: &UserProfile) -> Vec<Badge> {
    Badge::ALL
        .into_iter()
        .filter(|badge| badge.is_unlocked(tasks, profile))
        .collect()
}
