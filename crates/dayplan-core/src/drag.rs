//! Drag-to-reschedule on the daily timeline.
//!
//! `DragController` is an explicit state machine: `Idle -> Dragging ->
//! Committing -> Idle`. Starting a drag grabs the pointer and hands back a
//! `DragSession` that borrows the controller mutably, so only one drag can be
//! live. The pointer is released on every exit path: `release`, `abort`, or the
//! session simply being dropped (pointer left the window, early return, panic).

use chrono::NaiveTime;
use tracing::debug;
use uuid::Uuid;

use crate::layout::{minutes_to_time, PlacedOccurrence, TimelineGeometry};
use crate::models::{OccurrenceKey, Task};

/// Exclusive pointer capture for the duration of a drag.
pub trait PointerCapture {
    fn grab(&mut self);
    fn release(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { key: OccurrenceKey, top: f32 },
    Committing { key: OccurrenceKey, top: f32 },
}

/// The committed result of a drag: a new time-of-day for the task's anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reschedule {
    pub task_id: Uuid,
    pub time: NaiveTime,
}

impl Reschedule {
    /// Rewrites the time-of-day of the anchor; the anchor's date is preserved.
    pub fn apply(&self, task: &Task) -> Task {
        task.with_time_of_day(self.time)
    }
}

#[derive(Debug)]
pub struct DragController<C: PointerCapture> {
    capture: C,
    geometry: TimelineGeometry,
    state: DragState,
}

impl<C: PointerCapture> DragController<C> {
    pub fn new(capture: C, geometry: TimelineGeometry) -> Self {
        Self {
            capture,
            geometry,
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn capture(&self) -> &C {
        &self.capture
    }

    /// Starts dragging `block` from the pointer position `pointer_y`.
    pub fn begin(&mut self, block: &PlacedOccurrence, pointer_y: f32) -> DragSession<'_, C> {
        let key = block.occurrence.key();
        self.capture.grab();
        self.state = DragState::Dragging {
            key,
            top: block.top,
        };
        debug!(occurrence = %key, "drag started");
        DragSession {
            key,
            origin_top: block.top,
            origin_y: pointer_y,
            top: block.top,
            duration: block.occurrence.task.duration,
            finished: false,
            controller: self,
        }
    }

    fn finish(&mut self) {
        self.capture.release();
        self.state = DragState::Idle;
    }
}

/// A live drag. Dropping it without calling `release` aborts the drag.
#[derive(Debug)]
pub struct DragSession<'a, C: PointerCapture> {
    controller: &'a mut DragController<C>,
    key: OccurrenceKey,
    origin_top: f32,
    origin_y: f32,
    top: f32,
    duration: u32,
    finished: bool,
}

impl<C: PointerCapture> DragSession<'_, C> {
    pub fn key(&self) -> OccurrenceKey {
        self.key
    }

    /// Current snapped top of the dragged block.
    pub fn top(&self) -> f32 {
        self.top
    }

    /// Time-of-day the block would commit to right now.
    pub fn preview_time(&self) -> NaiveTime {
        minutes_to_time(self.controller.geometry.minutes_at(self.top))
    }

    /// Follows the pointer; returns the new snapped, clamped top.
    pub fn pointer_moved(&mut self, pointer_y: f32) -> f32 {
        let raw = self.origin_top + (pointer_y - self.origin_y);
        self.top = self.controller.geometry.snap_top(raw, self.duration);
        self.controller.state = DragState::Dragging {
            key: self.key,
            top: self.top,
        };
        self.top
    }

    /// Ends the drag. Returns a reschedule only if the block actually moved.
    pub fn release(mut self) -> Option<Reschedule> {
        self.controller.state = DragState::Committing {
            key: self.key,
            top: self.top,
        };
        let moved = self.top != self.origin_top;
        let outcome = moved.then(|| Reschedule {
            task_id: self.key.task_id,
            time: self.preview_time(),
        });
        self.finished = true;
        self.controller.finish();
        debug!(occurrence = %self.key, moved, "drag released");
        outcome
    }

    /// Cancels the drag without committing anything.
    pub fn abort(self) {
        // Drop performs the release.
    }
}

impl<C: PointerCapture> Drop for DragSession<'_, C> {
    fn drop(&mut self) {
        if !self.finished {
            self.controller.finish();
            debug!(occurrence = %self.key, "drag aborted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::DayTimeline;
    use crate::models::{Category, Criticality, Occurrence, Repeat};
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    #[derive(Debug, Default)]
    struct RecordingCapture {
        grabbed: bool,
        grabs: usize,
        releases: usize,
    }

    impl PointerCapture for RecordingCapture {
        fn grab(&mut self) {
            self.grabbed = true;
            self.grabs += 1;
        }

        fn release(&mut self) {
            self.grabbed = false;
            self.releases += 1;
        }
    }

    fn weekly_task() -> Task {
        Task {
            id: Uuid::now_v7(),
            title: "Review".to_string(),
            description: None,
            category: Category::Work,
            due_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            duration: 60,
            criticality: Criticality::High,
            repeat: Repeat::Weekly,
            completed_dates: BTreeSet::new(),
            reminder: None,
        }
    }

    fn block_for(task: &Task, day: NaiveDate) -> PlacedOccurrence {
        let timeline = DayTimeline::build(
            day,
            vec![Occurrence::new(task, day)],
            TimelineGeometry::default(),
        );
        timeline.blocks[0].clone()
    }

    #[test]
    fn test_release_commits_snapped_time_and_keeps_anchor_date() {
        let task = weekly_task();
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let block = block_for(&task, day);
        let mut controller = DragController::new(RecordingCapture::default(), TimelineGeometry::default());

        let mut session = controller.begin(&block, 100.0);
        // 95px down at 80px/h is ~71 minutes; snaps to 75.
        assert_eq!(session.pointer_moved(195.0), 820.0);
        let reschedule = session.release().expect("block moved");

        assert_eq!(reschedule.time, NaiveTime::from_hms_opt(10, 15, 0).unwrap());
        let updated = reschedule.apply(&task);
        assert_eq!(updated.anchor_day(), task.anchor_day());
        assert_eq!(updated.due_at.time(), reschedule.time);
        assert_eq!(controller.state(), DragState::Idle);
        assert!(!controller.capture().grabbed);
        assert_eq!(controller.capture().releases, 1);
    }

    #[test]
    fn test_release_without_movement_commits_nothing() {
        let task = weekly_task();
        let block = block_for(&task, task.anchor_day());
        let mut controller = DragController::new(RecordingCapture::default(), TimelineGeometry::default());

        let mut session = controller.begin(&block, 50.0);
        session.pointer_moved(53.0);
        assert!(session.release().is_none());
        assert!(!controller.capture().grabbed);
    }

    #[test]
    fn test_dropping_session_releases_pointer() {
        let task = weekly_task();
        let block = block_for(&task, task.anchor_day());
        let mut controller = DragController::new(RecordingCapture::default(), TimelineGeometry::default());

        {
            let mut session = controller.begin(&block, 0.0);
            session.pointer_moved(400.0);
        }

        assert_eq!(controller.state(), DragState::Idle);
        assert!(!controller.capture().grabbed);
        assert_eq!(controller.capture().grabs, 1);
        assert_eq!(controller.capture().releases, 1);
    }

    #[test]
    fn test_drag_clamped_to_visible_day() {
        let task = weekly_task();
        let block = block_for(&task, task.anchor_day());
        let mut controller = DragController::new(RecordingCapture::default(), TimelineGeometry::default());

        let mut session = controller.begin(&block, 0.0);
        assert_eq!(session.pointer_moved(-5000.0), 0.0);
        // A 60 minute block can start no later than 23:00.
        assert_eq!(session.pointer_moved(5000.0), 1840.0);
        assert_eq!(session.preview_time(), NaiveTime::from_hms_opt(23, 0, 0).unwrap());
        session.abort();
        assert!(!controller.capture().grabbed);
    }
}
