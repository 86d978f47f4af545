//! Click-vs-drag resolution for allocation bars.
//!
//! LIFECYCLE
//!
//! A session starts on pointer-down over a bar and is resolved by a global
//! pointer-up (the pointer may leave the bar, the canvas, or the window mid
//! drag). Between those, every pointer-move feeds [`DragSession::update`]:
//!
//! - Below [`DRAG_THRESHOLD_PX`] the session stays `Armed` and the release
//!   is a click (open the detail view).
//! - Past the threshold it becomes `Dragging` and never goes back, even if
//!   the pointer returns to the grab point. The bar follows the pointer as
//!   raw coordinates; no animation.
//!
//! On release, a drag is submitted only when it is *significant*: the lane
//! changed, or the start date shifted by more than
//! [`SIGNIFICANT_MOVE_DAYS`] relative to the bar's own pre-drag start.
//! Anything less snaps back silently.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use time::Date;
use uuid::Uuid;

use crate::consts::*;
use crate::geometry::{GridGeometry, Point};

/// Result of feeding one pointer-move into the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragUpdate {
    /// Still armed; below the threshold. Nothing to draw.
    Pending,
    /// The bar is in motion. `bar_x`/`bar_y` are the bar's top-left in
    /// canvas coordinates; `highlight_lane` is set only when the candidate
    /// target lane differs from the origin lane.
    Moved {
        bar_x: f64,
        bar_y: f64,
        highlight_lane: Option<usize>,
    },
}

/// Resolution of a session on pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Never crossed the threshold: treat the press as a click.
    Click,
    /// Dragged, but not significantly. Snap back; no request.
    SnapBack,
    /// A significant move to `target_lane` starting at `new_start`.
    Move { target_lane: usize, new_start: Date },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Armed,
    Dragging,
}

/// One in-progress press/drag on an allocation bar.
#[derive(Debug, Clone)]
pub struct DragSession {
    allocation_id: Uuid,
    origin_lane: usize,
    origin_start: Date,
    /// Canvas point of the initial pointer-down.
    grab: Point,
    /// Pointer offset from the bar's top-left at grab time, so the bar
    /// doesn't jump under the cursor when the drag starts.
    grab_offset: Point,
    last: Point,
    state: SessionState,
}

impl DragSession {
    /// Start a session from a pointer-down at canvas point `grab` over a bar
    /// whose top-left is `bar_origin`.
    #[must_use]
    pub fn begin(
        allocation_id: Uuid,
        origin_lane: usize,
        origin_start: Date,
        bar_origin: Point,
        grab: Point,
    ) -> Self {
        Self {
            allocation_id,
            origin_lane,
            origin_start,
            grab,
            grab_offset: Point::new(grab.x - bar_origin.x, grab.y - bar_origin.y),
            last: grab,
            state: SessionState::Armed,
        }
    }

    #[must_use]
    pub fn allocation_id(&self) -> Uuid {
        self.allocation_id
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.state == SessionState::Dragging
    }

    /// Feed a pointer-move (already converted to canvas coordinates).
    pub fn update(&mut self, geometry: &GridGeometry, p: Point) -> DragUpdate {
        self.last = p;
        if self.state == SessionState::Armed {
            if self.grab.dist(p) <= DRAG_THRESHOLD_PX {
                return DragUpdate::Pending;
            }
            self.state = SessionState::Dragging;
        }
        let candidate = self.candidate_lane(geometry);
        DragUpdate::Moved {
            bar_x: p.x - self.grab_offset.x,
            bar_y: p.y - self.grab_offset.y,
            highlight_lane: (candidate != self.origin_lane).then_some(candidate),
        }
    }

    /// Resolve the session on pointer-up.
    #[must_use]
    pub fn release(&self, geometry: &GridGeometry) -> DragOutcome {
        if self.state == SessionState::Armed {
            return DragOutcome::Click;
        }
        let target_lane = self.candidate_lane(geometry);
        let new_start = geometry.x_to_date(self.last.x - self.grab_offset.x);
        let shift = (new_start - self.origin_start).whole_days().abs();
        if target_lane == self.origin_lane && shift <= SIGNIFICANT_MOVE_DAYS {
            return DragOutcome::SnapBack;
        }
        DragOutcome::Move { target_lane, new_start }
    }

    /// Target lane from vertical displacement, clamped to the chart.
    ///
    /// Row-relative (pointer displacement over `ROW_HEIGHT`) rather than
    /// absolute, so a bar grabbed near a row edge doesn't change lanes from
    /// a one-pixel wobble.
    fn candidate_lane(&self, geometry: &GridGeometry) -> usize {
        let lanes = geometry.lane_count();
        if lanes == 0 {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation)]
        let offset = ((self.last.y - self.grab.y) / ROW_HEIGHT).round() as i64;
        #[allow(clippy::cast_possible_wrap)]
        let clamped = (self.origin_lane as i64 + offset).clamp(0, lanes as i64 - 1);
        #[allow(clippy::cast_sign_loss)]
        {
            clamped as usize
        }
    }
}
