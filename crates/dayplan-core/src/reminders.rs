//! Reminder scheduling.
//!
//! `upcoming_reminders` is a pure function from the task list to the set of
//! notifications that should be armed right now. `ReminderScheduler` owns the
//! armed timers and always replaces the whole set: every pass cancels what is
//! armed before arming the new set.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::models::{OccurrenceKey, Task};
use crate::recurrence::expand;
use crate::timezone::{local_to_utc, local_today};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReminderConfig {
    /// Calendar days scanned, starting today. 2 means today and tomorrow.
    pub lookahead_days: u32,
    pub poll_interval_secs: u64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            lookahead_days: 2,
            poll_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub key: OccurrenceKey,
    pub title: String,
    pub body: String,
    pub fire_at: DateTime<Utc>,
}

impl Notification {
    fn for_occurrence(task: &Task, key: OccurrenceKey, minutes: u32, fire_at: DateTime<Utc>) -> Self {
        Self {
            key,
            title: task.title.clone(),
            body: format!(
                "Reminder: \"{}\" is scheduled to start in {} minutes.",
                task.title, minutes
            ),
            fire_at,
        }
    }
}

/// Notifications due to be armed at `now`, ordered by fire time.
///
/// Occurrences already completed for their day, or whose fire time has passed,
/// are left out.
pub fn upcoming_reminders(
    tasks: &[Task],
    now: DateTime<Utc>,
    tz: Tz,
    config: &ReminderConfig,
) -> Vec<Notification> {
    let today = local_today(now, tz);
    let span = config.lookahead_days.saturating_sub(1);
    let end = today + Duration::days(i64::from(span));

    let mut notifications: Vec<Notification> = tasks
        .iter()
        .filter(|task| !task.is_finished())
        .filter_map(|task| task.reminder_minutes().map(|minutes| (task, minutes)))
        .flat_map(|(task, minutes)| {
            expand(task, today, end)
                .into_iter()
                .filter(|occurrence| !occurrence.completed)
                .filter_map(move |occurrence| {
                    let fire_at =
                        local_to_utc(occurrence.starts_at, tz) - Duration::minutes(i64::from(minutes));
                    (fire_at > now).then(|| {
                        Notification::for_occurrence(task, occurrence.key(), minutes, fire_at)
                    })
                })
        })
        .collect();

    notifications.sort_by_key(|n| (n.fire_at, n.key));
    notifications
}

/// Where fired reminders end up (desktop notification, terminal, ...).
pub trait NotificationSink {
    fn deliver(&self, notification: &Notification);
}

/// Arms and cancels one-shot timers.
pub trait TimerBackend {
    type Handle;

    fn arm(&mut self, notification: Notification) -> Self::Handle;
    fn cancel(&mut self, handle: Self::Handle);
}

/// Owns every outstanding reminder timer for the session.
pub struct ReminderScheduler<B: TimerBackend> {
    backend: B,
    armed: HashMap<OccurrenceKey, B::Handle>,
}

impl<B: TimerBackend> ReminderScheduler<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            armed: HashMap::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn len(&self) -> usize {
        self.armed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.armed.is_empty()
    }

    pub fn is_armed(&self, key: &OccurrenceKey) -> bool {
        self.armed.contains_key(key)
    }

    /// Cancels everything, then arms `notifications`. A key that appears more
    /// than once is armed once. Returns the number of armed timers.
    pub fn reschedule(&mut self, notifications: Vec<Notification>) -> usize {
        self.cancel_all();
        for notification in notifications {
            if self.armed.contains_key(&notification.key) {
                continue;
            }
            let key = notification.key;
            debug!(occurrence = %key, fire_at = %notification.fire_at, "arming reminder");
            let handle = self.backend.arm(notification);
            self.armed.insert(key, handle);
        }
        info!(armed = self.armed.len(), "reminders rescheduled");
        self.armed.len()
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.armed.drain() {
            self.backend.cancel(handle);
        }
    }

    /// Releases the key of a timer that has fired. Returns false for keys that
    /// were not armed (for example, cancelled just before firing).
    pub fn fired(&mut self, key: &OccurrenceKey) -> bool {
        let released = self.armed.remove(key).is_some();
        if released {
            info!(occurrence = %key, "reminder fired");
        }
        released
    }
}

impl<B: TimerBackend> Drop for ReminderScheduler<B> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// Timers backed by `tokio::time::sleep`.
///
/// Each fired reminder is delivered to the sink and its key is sent on the
/// channel returned by [`TokioTimers::new`], so the owner can call
/// [`ReminderScheduler::fired`].
pub struct TokioTimers<S> {
    sink: Arc<S>,
    fired_tx: mpsc::UnboundedSender<OccurrenceKey>,
}

impl<S> TokioTimers<S>
where
    S: NotificationSink + Send + Sync + 'static,
{
    pub fn new(sink: Arc<S>) -> (Self, mpsc::UnboundedReceiver<OccurrenceKey>) {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        (Self { sink, fired_tx }, fired_rx)
    }
}

impl<S> TimerBackend for TokioTimers<S>
where
    S: NotificationSink + Send + Sync + 'static,
{
    type Handle = JoinHandle<()>;

    fn arm(&mut self, notification: Notification) -> JoinHandle<()> {
        let delay = (notification.fire_at - Utc::now())
            .to_std()
            .unwrap_or(std::time::Duration::ZERO);
        let sink = Arc::clone(&self.sink);
        let fired_tx = self.fired_tx.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            sink.deliver(&notification);
            // The receiver is gone once the scheduler loop has stopped.
            let _ = fired_tx.send(notification.key);
        })
    }

    fn cancel(&mut self, handle: JoinHandle<()>) {
        handle.abort();
    }
}
