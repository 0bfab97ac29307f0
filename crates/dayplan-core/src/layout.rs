//! Daily timeline layout.
//!
//! Same-day occurrences are packed into side-by-side columns so that no two
//! overlapping blocks share a column. Overlap is half-open: a block ending at
//! 09:30 does not collide with one starting at 09:30.
//!
//! The conflict graph is split into connected components ("collision groups")
//! first, and each group is partitioned greedily after sorting by start time.
//! Greedy partitioning of a sorted interval set is optimal, so a group gets as
//! many columns as its largest set of mutually overlapping blocks, and an
//! unrelated busy cluster elsewhere in the day never narrows a lone block.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::Occurrence;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A half-open `[start, end)` span in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Column assignment of one interval within its collision group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSlot {
    pub group: usize,
    pub column: usize,
    pub columns: usize,
}

impl ColumnSlot {
    /// Width as a percentage of the available horizontal space.
    pub fn width(&self) -> f32 {
        100.0 / self.columns as f32
    }

    /// Left offset as a percentage of the available horizontal space.
    pub fn left(&self) -> f32 {
        self.column as f32 * self.width()
    }
}

fn collision_groups(intervals: &[Interval]) -> Vec<Vec<usize>> {
    let adjacency: Vec<Vec<usize>> = intervals
        .iter()
        .enumerate()
        .map(|(i, a)| {
            intervals
                .iter()
                .enumerate()
                .filter(|(j, b)| i != *j && a.overlaps(b))
                .map(|(j, _)| j)
                .collect()
        })
        .collect();

    let mut visited = vec![false; intervals.len()];
    let mut groups = Vec::new();
    for root in 0..intervals.len() {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        let mut group = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            group.push(node);
            for &next in &adjacency[node] {
                if !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }
        groups.push(group);
    }
    groups
}

/// Assigns every interval a column; the result is parallel to `intervals`.
pub fn assign_columns(intervals: &[Interval]) -> Vec<ColumnSlot> {
    let mut slots = vec![
        ColumnSlot {
            group: 0,
            column: 0,
            columns: 1,
        };
        intervals.len()
    ];

    for (group_index, mut group) in collision_groups(intervals).into_iter().enumerate() {
        // Start ascending, longer first on ties, input order last.
        group.sort_by(|&a, &b| {
            let (ia, ib) = (&intervals[a], &intervals[b]);
            ia.start
                .cmp(&ib.start)
                .then(ib.duration().cmp(&ia.duration()))
                .then(a.cmp(&b))
        });

        // End of the last block placed in each column.
        let mut column_ends: Vec<u32> = Vec::new();
        let mut columns_of: Vec<(usize, usize)> = Vec::with_capacity(group.len());
        for &index in &group {
            let interval = intervals[index];
            let column = match column_ends.iter().position(|&end| end <= interval.start) {
                Some(column) => {
                    column_ends[column] = interval.end;
                    column
                }
                None => {
                    column_ends.push(interval.end);
                    column_ends.len() - 1
                }
            };
            columns_of.push((index, column));
        }

        let columns = column_ends.len().max(1);
        for (index, column) in columns_of {
            slots[index] = ColumnSlot {
                group: group_index,
                column,
                columns,
            };
        }
    }

    slots
}

/// Vertical scale of the daily timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineGeometry {
    /// Pixels per hour.
    pub hour_height: f32,
    /// Rendered height floor so very short tasks stay visible.
    pub min_block_height: f32,
    /// Drag snapping granularity in minutes.
    pub snap_minutes: u32,
}

impl Default for TimelineGeometry {
    fn default() -> Self {
        Self {
            hour_height: 80.0,
            min_block_height: 20.0,
            snap_minutes: 15,
        }
    }
}

impl TimelineGeometry {
    pub fn day_height(&self) -> f32 {
        24.0 * self.hour_height
    }

    pub fn top_for(&self, start_minutes: u32) -> f32 {
        start_minutes as f32 / 60.0 * self.hour_height
    }

    /// Unfloored height; used for drag clamping.
    pub fn span_for(&self, duration: u32) -> f32 {
        duration as f32 / 60.0 * self.hour_height
    }

    pub fn height_for(&self, duration: u32) -> f32 {
        self.span_for(duration).max(self.min_block_height)
    }

    pub fn snap_height(&self) -> f32 {
        self.span_for(self.snap_minutes.max(1))
    }

    /// Minutes since midnight represented by a vertical offset.
    pub fn minutes_at(&self, top: f32) -> u32 {
        if self.hour_height <= 0.0 {
            return 0;
        }
        (top / self.hour_height * 60.0).round().max(0.0) as u32
    }

    /// Clamps a block top to the visible day, then snaps it to the grid.
    pub fn snap_top(&self, top: f32, duration: u32) -> f32 {
        let max_top = (self.day_height() - self.span_for(duration)).max(0.0);
        let clamped = top.clamp(0.0, max_top);
        let step = self.snap_height();
        let mut snapped = (clamped / step).round() * step;
        if snapped > max_top {
            snapped -= step;
        }
        snapped.max(0.0)
    }

    /// Snaps a start time to the grid, keeping the block inside the day.
    pub fn snap_time(&self, time: NaiveTime, duration: u32) -> NaiveTime {
        use chrono::Timelike;
        let minutes = time.hour() * 60 + time.minute();
        let top = self.snap_top(self.top_for(minutes), duration);
        minutes_to_time(self.minutes_at(top))
    }
}

/// Converts minutes since midnight into a wall-clock time, saturating at 23:59.
pub fn minutes_to_time(minutes: u32) -> NaiveTime {
    let minutes = minutes.min(MINUTES_PER_DAY - 1);
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or(NaiveTime::MIN)
}

/// An occurrence with its timeline geometry.
#[derive(Debug, Clone)]
pub struct PlacedOccurrence {
    pub occurrence: Occurrence,
    pub interval: Interval,
    pub slot: ColumnSlot,
    pub top: f32,
    pub height: f32,
}

impl PlacedOccurrence {
    pub fn width(&self) -> f32 {
        self.slot.width()
    }

    pub fn left(&self) -> f32 {
        self.slot.left()
    }
}

/// Laid-out blocks for one calendar day, ordered top to bottom.
#[derive(Debug, Clone)]
pub struct DayTimeline {
    pub date: NaiveDate,
    pub geometry: TimelineGeometry,
    pub blocks: Vec<PlacedOccurrence>,
}

impl DayTimeline {
    /// Lays out occurrences that all fall on `date`; others are ignored.
    pub fn build(date: NaiveDate, occurrences: Vec<Occurrence>, geometry: TimelineGeometry) -> Self {
        let occurrences: Vec<Occurrence> = occurrences
            .into_iter()
            .filter(|o| o.date() == date)
            .collect();
        let intervals: Vec<Interval> = occurrences
            .iter()
            .map(|o| Interval::new(o.start_minutes(), o.end_minutes()))
            .collect();
        let slots = assign_columns(&intervals);

        let mut blocks: Vec<PlacedOccurrence> = occurrences
            .into_iter()
            .zip(intervals)
            .zip(slots)
            .map(|((occurrence, interval), slot)| PlacedOccurrence {
                top: geometry.top_for(interval.start),
                height: geometry.height_for(occurrence.task.duration),
                occurrence,
                interval,
                slot,
            })
            .collect();
        blocks.sort_by(|a, b| a.interval.start.cmp(&b.interval.start));

        Self {
            date,
            geometry,
            blocks,
        }
    }

    /// Largest number of columns any collision group needed.
    pub fn max_columns(&self) -> usize {
        self.blocks.iter().map(|b| b.slot.columns).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hm(h: u32, m: u32) -> u32 {
        h * 60 + m
    }

    #[test]
    fn test_three_mutually_overlapping_need_three_columns() {
        let intervals = [
            Interval::new(hm(9, 0), hm(10, 0)),
            Interval::new(hm(9, 20), hm(10, 20)),
            Interval::new(hm(9, 40), hm(10, 40)),
        ];
        let slots = assign_columns(&intervals);
        let columns: Vec<usize> = slots.iter().map(|s| s.column).collect();
        assert_eq!(columns, vec![0, 1, 2]);
        assert!(slots.iter().all(|s| s.columns == 3));
        assert!((slots[2].left() - 200.0 / 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_back_to_back_share_column() {
        let intervals = [
            Interval::new(hm(9, 0), hm(9, 30)),
            Interval::new(hm(9, 30), hm(10, 0)),
        ];
        let slots = assign_columns(&intervals);
        assert_eq!(slots[0].column, 0);
        assert_eq!(slots[1].column, 0);
        assert_eq!(slots[0].width(), 100.0);
        assert_eq!(slots[1].left(), 0.0);
    }

    #[test]
    fn test_unrelated_cluster_does_not_narrow_lone_block() {
        let intervals = [
            Interval::new(hm(9, 0), hm(10, 0)),
            Interval::new(hm(9, 15), hm(10, 0)),
            Interval::new(hm(9, 30), hm(10, 0)),
            Interval::new(hm(14, 0), hm(15, 0)),
        ];
        let slots = assign_columns(&intervals);
        assert_eq!(slots[3].columns, 1);
        assert_eq!(slots[3].width(), 100.0);
        assert_ne!(slots[0].group, slots[3].group);
    }

    #[test]
    fn test_chain_reuses_freed_column() {
        // A overlaps B, B overlaps C, A and C do not overlap.
        let intervals = [
            Interval::new(hm(8, 0), hm(9, 0)),
            Interval::new(hm(8, 30), hm(9, 30)),
            Interval::new(hm(9, 0), hm(10, 0)),
        ];
        let slots = assign_columns(&intervals);
        assert!(slots.iter().all(|s| s.columns == 2));
        assert_eq!(slots[0].column, slots[2].column);
        assert_ne!(slots[0].column, slots[1].column);
    }

    #[test]
    fn test_equal_start_longer_goes_first() {
        let intervals = [
            Interval::new(hm(9, 0), hm(9, 30)),
            Interval::new(hm(9, 0), hm(11, 0)),
        ];
        let slots = assign_columns(&intervals);
        assert_eq!(slots[1].column, 0);
        assert_eq!(slots[0].column, 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(assign_columns(&[]).is_empty());
    }

    #[test]
    fn test_geometry_positions() {
        let geometry = TimelineGeometry::default();
        assert_eq!(geometry.top_for(hm(9, 30)), 760.0);
        assert_eq!(geometry.height_for(60), 80.0);
        assert_eq!(geometry.height_for(5), 20.0);
        assert_eq!(geometry.minutes_at(760.0), hm(9, 30));
    }

    #[test]
    fn test_snap_time_rounds_to_quarter_hours() {
        let geometry = TimelineGeometry::default();
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(geometry.snap_time(t(9, 7), 30), t(9, 0));
        assert_eq!(geometry.snap_time(t(9, 8), 30), t(9, 15));
        assert_eq!(geometry.snap_time(t(23, 50), 60), t(23, 0));
    }

    fn any_intervals() -> impl Strategy<Value = Vec<Interval>> {
        prop::collection::vec(
            (0u32..MINUTES_PER_DAY, 1u32..240).prop_map(|(s, d)| Interval::new(s, s + d)),
            0..40,
        )
    }

    fn max_clique(intervals: &[Interval], group: &[usize]) -> usize {
        // For intervals the largest clique is the deepest point, found at some start.
        group
            .iter()
            .map(|&i| {
                let point = intervals[i].start;
                group
                    .iter()
                    .filter(|&&j| intervals[j].start <= point && point < intervals[j].end)
                    .count()
            })
            .max()
            .unwrap_or(0)
    }

    proptest! {
        #[test]
        fn prop_same_column_never_overlaps(intervals in any_intervals()) {
            let slots = assign_columns(&intervals);
            for i in 0..intervals.len() {
                for j in (i + 1)..intervals.len() {
                    if slots[i].group == slots[j].group && slots[i].column == slots[j].column {
                        prop_assert!(!intervals[i].overlaps(&intervals[j]));
                    }
                }
            }
        }

        #[test]
        fn prop_column_count_is_chromatic_number(intervals in any_intervals()) {
            let slots = assign_columns(&intervals);
            let group_count = slots.iter().map(|s| s.group + 1).max().unwrap_or(0);
            for group in 0..group_count {
                let members: Vec<usize> = (0..intervals.len()).filter(|&i| slots[i].group == group).collect();
                let columns = slots[members[0]].columns;
                prop_assert_eq!(columns, max_clique(&intervals, &members));
                prop_assert!(members.iter().all(|&i| slots[i].column < columns));
            }
        }

        #[test]
        fn prop_isolated_blocks_are_full_width(intervals in any_intervals()) {
            let slots = assign_columns(&intervals);
            for i in 0..intervals.len() {
                let alone = intervals.iter().enumerate().all(|(j, other)| i == j || !intervals[i].overlaps(other));
                if alone {
                    prop_assert_eq!(slots[i].width(), 100.0);
                    prop_assert_eq!(slots[i].left(), 0.0);
                }
            }
        }
    }
}
