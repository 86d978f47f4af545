#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Date, Duration};
use uuid::Uuid;

/// Errors from schedule mutations.
///
/// These indicate a stale or inconsistent snapshot (e.g. a drag resolved
/// against an allocation the server has since removed); callers recover by
/// re-fetching rather than retrying.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("unknown allocation {0}")]
    UnknownAllocation(Uuid),
    #[error("unknown lane {0}")]
    UnknownLane(Uuid),
}

/// A crop as referenced by an allocation: base kind plus optional variety.
///
/// The crop-kind limit counts base kinds only, so "Lettuce (Butterhead)"
/// and "Lettuce (Oakleaf)" are one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRef {
    pub id: Uuid,
    pub kind: String,
    pub variety: Option<String>,
}

impl CropRef {
    /// Human-readable name, e.g. `Lettuce (Butterhead)`.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.variety {
            Some(v) => format!("{} ({v})", self.kind),
            None => self.kind.clone(),
        }
    }
}

/// Server-computed economics for one allocation. Opaque to the engine;
/// carried through for display only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
}

/// A growing area (bed/field). Ordinal position on the chart is its index
/// in [`Schedule::lanes`]; the id is stable across re-renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub id: Uuid,
    pub name: String,
    pub area_sq_m: f64,
}

/// One crop occupying one lane over an inclusive date interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub id: Uuid,
    pub lane_id: Uuid,
    pub crop: CropRef,
    pub start: Date,
    pub end: Date,
    pub outcome: AllocationOutcome,
}

impl Allocation {
    /// Whole days from start to end.
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).whole_days()
    }
}

/// A lane paired with its allocations, for rendering. Empty lanes are
/// included so they stay visible as drop targets.
#[derive(Debug)]
pub struct LaneGroup<'a> {
    pub lane: &'a Lane,
    pub allocations: Vec<&'a Allocation>,
}

/// One cultivation plan's schedule: the value the whole view derives from.
///
/// Mutations are snapshots: `with_move` / `with_remove` return a new
/// `Schedule` and leave `self` untouched, so an optimistic state and the
/// last confirmed state can coexist and be compared with `==`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub plan_start: Date,
    pub plan_end: Date,
    pub lanes: Vec<Lane>,
    pub allocations: Vec<Allocation>,
}

impl Schedule {
    #[must_use]
    pub fn allocation(&self, id: Uuid) -> Option<&Allocation> {
        self.allocations.iter().find(|a| a.id == id)
    }

    #[must_use]
    pub fn lane(&self, id: Uuid) -> Option<&Lane> {
        self.lanes.iter().find(|l| l.id == id)
    }

    /// Ordinal row index of a lane.
    #[must_use]
    pub fn lane_index(&self, id: Uuid) -> Option<usize> {
        self.lanes.iter().position(|l| l.id == id)
    }

    #[must_use]
    pub fn lane_at(&self, index: usize) -> Option<&Lane> {
        self.lanes.get(index)
    }

    /// True when no allocation references the lane.
    #[must_use]
    pub fn lane_is_empty(&self, lane_id: Uuid) -> bool {
        !self.allocations.iter().any(|a| a.lane_id == lane_id)
    }

    /// Per-lane grouping in chart order. Every lane appears, even with zero
    /// allocations; within a lane, allocations sort by start date.
    #[must_use]
    pub fn lane_groups(&self) -> Vec<LaneGroup<'_>> {
        self.lanes
            .iter()
            .map(|lane| {
                let mut allocations: Vec<&Allocation> =
                    self.allocations.iter().filter(|a| a.lane_id == lane.id).collect();
                allocations.sort_by_key(|a| a.start);
                LaneGroup { lane, allocations }
            })
            .collect()
    }

    /// Number of distinct base crop kinds currently scheduled.
    #[must_use]
    pub fn distinct_crop_kinds(&self) -> usize {
        let mut kinds: Vec<&str> = self.allocations.iter().map(|a| a.crop.kind.as_str()).collect();
        kinds.sort_unstable();
        kinds.dedup();
        kinds.len()
    }

    /// Whether a base crop kind is already present on the schedule.
    #[must_use]
    pub fn has_crop_kind(&self, kind: &str) -> bool {
        self.allocations.iter().any(|a| a.crop.kind == kind)
    }

    /// Snapshot with one allocation moved to a lane and start date.
    ///
    /// Duration is preserved exactly (`new_end = new_start + duration`); the
    /// authoritative push later overwrites both dates wholesale.
    pub fn with_move(
        &self,
        allocation_id: Uuid,
        target_lane_id: Uuid,
        new_start: Date,
    ) -> Result<Schedule, ScheduleError> {
        if self.lane(target_lane_id).is_none() {
            return Err(ScheduleError::UnknownLane(target_lane_id));
        }
        let mut next = self.clone();
        let alloc = next
            .allocations
            .iter_mut()
            .find(|a| a.id == allocation_id)
            .ok_or(ScheduleError::UnknownAllocation(allocation_id))?;
        let duration = Duration::days(alloc.duration_days());
        alloc.lane_id = target_lane_id;
        alloc.start = new_start;
        alloc.end = new_start + duration;
        Ok(next)
    }

    /// Snapshot with one allocation removed.
    pub fn with_remove(&self, allocation_id: Uuid) -> Result<Schedule, ScheduleError> {
        if self.allocation(allocation_id).is_none() {
            return Err(ScheduleError::UnknownAllocation(allocation_id));
        }
        let mut next = self.clone();
        next.allocations.retain(|a| a.id != allocation_id);
        Ok(next)
    }
}
