//! The per-view schedule controller.
//!
//! DESIGN
//!
//! One `ScheduleController` is instantiated per open schedule view and owns
//! everything that was previously scattered: the schedule snapshot, the drag
//! session, the pending change set, the reconciliation cycle state, and the
//! fallback-timer generation. The host feeds it events (pointer activity,
//! HTTP results, push messages) and executes the [`Action`]s it returns; the
//! controller itself never touches the DOM, the network, or a clock.
//!
//! RECONCILIATION
//!
//! One cycle runs `Idle → Sending → AwaitingPush → Idle`. At most one
//! request is outstanding; a change completed while a cycle is in flight is
//! queued into the pending set and submitted as the next request when the
//! cycle reconciles. Rollback is always "re-derive truth from source": clear
//! the speculative state and re-fetch, never an in-memory undo.
//!
//! TIMERS
//!
//! Every submission arms a fallback timer tagged with a generation number.
//! The generation is bumped whenever the cycle resolves, so a stale timer
//! firing after its cycle already reconciled is ignored instead of forcing
//! a spurious reload.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use time::Date;
use uuid::Uuid;

use crate::changes::PendingChangeSet;
use crate::consts::BAR_PADDING;
use crate::geometry::{GridGeometry, Point, ViewTransform};
use crate::input::{DragOutcome, DragSession, DragUpdate};
use crate::model::Schedule;
use crate::palette::{CatalogItem, PaletteSession};
use crate::render::{self, DragOverride, Ghost, Overlay, Scene};
use crate::wire::{
    AcceptResponse, AdjustRequest, ChangeOp, CreateAllocationRequest, CreateLaneRequest,
    PushMessage, PushStatus,
};

/// Side effects for the host to execute, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Re-derive the scene and redraw.
    Render,
    /// POST the change set to the adjust endpoint.
    SubmitChanges(AdjustRequest),
    /// POST a palette drop to the allocation-creation endpoint.
    CreateAllocation(CreateAllocationRequest),
    /// POST to the lane-creation endpoint.
    AddLane(CreateLaneRequest),
    /// DELETE the lane.
    RemoveLane { lane_id: Uuid },
    /// GET the authoritative schedule snapshot.
    FetchSchedule,
    /// Open the allocation detail view.
    OpenDetail { allocation_id: Uuid },
    /// Start (or restart) the fallback timer for this generation.
    ArmFallbackTimer { generation: u64 },
    /// Cancel any armed fallback timer.
    CancelFallbackTimer,
    /// Give up on the push channel and reload the whole view.
    ForceReload,
    /// Surface a message to the user.
    Notify { message: String },
}

/// Where the current reconciliation cycle stands. The terminal states of
/// the protocol (reconciled, rolled back, timed out) resolve synchronously
/// back to `Idle`, so only the waiting states are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CyclePhase {
    Idle,
    Sending,
    AwaitingPush,
}

/// Controller for one schedule view. See the module docs for the shape of
/// the host contract.
#[derive(Debug)]
pub struct ScheduleController {
    attached: bool,
    schedule: Option<Schedule>,
    geometry: Option<GridGeometry>,
    transform: ViewTransform,
    drag: Option<DragSession>,
    palette: Option<PaletteSession>,
    overlay: Overlay,
    pending: PendingChangeSet,
    in_flight: Vec<ChangeOp>,
    phase: CyclePhase,
    timer_generation: u64,
}

impl Default for ScheduleController {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            attached: false,
            schedule: None,
            geometry: None,
            transform: ViewTransform::default(),
            drag: None,
            palette: None,
            overlay: Overlay::default(),
            pending: PendingChangeSet::new(),
            in_flight: Vec::new(),
            phase: CyclePhase::Idle,
            timer_generation: 0,
        }
    }

    // === Lifecycle ==================================================

    /// Bind the controller to a mounted view. Idempotent: a second call
    /// without an intervening [`detach`](Self::detach) is a no-op, so a
    /// re-rendering host can't double-subscribe.
    pub fn attach(&mut self) -> Vec<Action> {
        if self.attached {
            return Vec::new();
        }
        self.attached = true;
        vec![Action::FetchSchedule]
    }

    /// Tear down: drop sessions and speculative state, invalidate timers.
    pub fn detach(&mut self) -> Vec<Action> {
        self.attached = false;
        self.drag = None;
        self.palette = None;
        self.overlay = Overlay::default();
        self.pending.clear();
        self.in_flight.clear();
        self.phase = CyclePhase::Idle;
        self.timer_generation += 1;
        vec![Action::CancelFallbackTimer]
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// True while a reconciliation cycle is in flight. Blocks new drags,
    /// clicks, palette drops, and lane operations for this schedule.
    #[must_use]
    pub fn busy(&self) -> bool {
        self.phase != CyclePhase::Idle
    }

    #[must_use]
    pub fn schedule(&self) -> Option<&Schedule> {
        self.schedule.as_ref()
    }

    /// Update the screen-to-canvas mapping after a canvas resize.
    pub fn set_view_transform(&mut self, transform: ViewTransform) {
        self.transform = transform;
    }

    /// Adopt a freshly fetched snapshot as the new truth.
    pub fn schedule_loaded(&mut self, schedule: Schedule) -> Vec<Action> {
        self.schedule_loaded_internal(schedule);
        vec![Action::Render]
    }

    /// Derive the current scene. `None` until the first snapshot arrives.
    #[must_use]
    pub fn scene(&self) -> Option<Scene> {
        let schedule = self.schedule.as_ref()?;
        let geometry = self.geometry.as_ref()?;
        Some(render::scene(schedule, geometry, &self.overlay))
    }

    // === Bar drags ==================================================

    /// Pointer-down over an allocation bar.
    pub fn pointer_down(&mut self, allocation_id: Uuid, screen: Point) -> Vec<Action> {
        if self.busy() || self.drag.is_some() || self.palette.is_some() {
            return Vec::new();
        }
        let (Some(schedule), Some(geometry)) = (&self.schedule, &self.geometry) else {
            return Vec::new();
        };
        let Some(alloc) = schedule.allocation(allocation_id) else {
            return Vec::new();
        };
        let Some(lane_index) = schedule.lane_index(alloc.lane_id) else {
            return Vec::new();
        };
        let bar_origin = Point::new(
            geometry.date_to_x(alloc.start),
            geometry.lane_index_to_y(lane_index) + BAR_PADDING,
        );
        let grab = self.transform.to_canvas(screen);
        self.drag = Some(DragSession::begin(
            allocation_id,
            lane_index,
            alloc.start,
            bar_origin,
            grab,
        ));
        Vec::new()
    }

    /// Pointer-move anywhere (the bar may be gone; the listener is global).
    pub fn pointer_move(&mut self, screen: Point) -> Vec<Action> {
        let p = self.transform.to_canvas(screen);
        if let Some(session) = &mut self.palette {
            let at = session.update(p);
            self.overlay.ghost = Some(Ghost {
                x: at.x,
                y: at.y,
                label: session.item().kind.clone(),
            });
            return vec![Action::Render];
        }
        let Some(geometry) = &self.geometry else {
            return Vec::new();
        };
        let Some(session) = &mut self.drag else {
            return Vec::new();
        };
        match session.update(geometry, p) {
            DragUpdate::Pending => Vec::new(),
            DragUpdate::Moved { bar_x, bar_y, highlight_lane } => {
                self.overlay.drag = Some(DragOverride {
                    allocation_id: session.allocation_id(),
                    position: Point::new(bar_x, bar_y),
                });
                self.overlay.highlight_lane = highlight_lane;
                vec![Action::Render]
            }
        }
    }

    /// Global pointer-up: resolves whichever session is live.
    pub fn pointer_up(&mut self, screen: Point) -> Vec<Action> {
        if self.palette.is_some() {
            return self.finish_palette_drop(screen);
        }
        let Some(session) = self.drag.take() else {
            return Vec::new();
        };
        self.overlay.drag = None;
        self.overlay.highlight_lane = None;
        let Some(geometry) = &self.geometry else {
            return vec![Action::Render];
        };
        match session.release(geometry) {
            DragOutcome::Click => {
                if self.busy() {
                    vec![Action::Render]
                } else {
                    vec![Action::OpenDetail { allocation_id: session.allocation_id() }]
                }
            }
            DragOutcome::SnapBack => vec![Action::Render],
            DragOutcome::Move { target_lane, new_start } => {
                self.complete_move(session.allocation_id(), target_lane, new_start)
            }
        }
    }

    /// Remove an allocation (from the detail view). Optimistic, batched
    /// with moves.
    pub fn remove_allocation(&mut self, allocation_id: Uuid) -> Vec<Action> {
        let Some(schedule) = &self.schedule else {
            return Vec::new();
        };
        match schedule.with_remove(allocation_id) {
            Ok(next) => {
                self.schedule = Some(next);
                self.pending.record(ChangeOp::Remove { allocation_id });
                self.flush_or_queue()
            }
            // stale id: the snapshot has drifted, re-derive truth
            Err(err) => {
                log::warn!("remove failed: {err}");
                vec![Action::FetchSchedule]
            }
        }
    }

    fn complete_move(
        &mut self,
        allocation_id: Uuid,
        target_lane: usize,
        new_start: Date,
    ) -> Vec<Action> {
        let Some(schedule) = &self.schedule else {
            return vec![Action::Render];
        };
        let Some(lane) = schedule.lane_at(target_lane) else {
            return vec![Action::Render];
        };
        let target_lane_id = lane.id;
        match schedule.with_move(allocation_id, target_lane_id, new_start) {
            Ok(next) => {
                self.schedule = Some(next);
                self.pending.record(ChangeOp::Move {
                    allocation_id,
                    target_lane_id,
                    new_start,
                });
                self.flush_or_queue()
            }
            Err(err) => {
                log::warn!("move failed: {err}");
                vec![Action::Render, Action::FetchSchedule]
            }
        }
    }

    /// Submit the pending set now if no request is outstanding; otherwise
    /// leave it queued for the next request (single-flight).
    fn flush_or_queue(&mut self) -> Vec<Action> {
        if self.phase != CyclePhase::Idle || self.pending.is_empty() {
            return vec![Action::Render];
        }
        self.in_flight = self.pending.take_all();
        self.phase = CyclePhase::Sending;
        self.timer_generation += 1;
        vec![
            Action::Render,
            Action::SubmitChanges(AdjustRequest { moves: self.in_flight.clone() }),
            Action::ArmFallbackTimer { generation: self.timer_generation },
        ]
    }

    // === Palette drags ==============================================

    /// Pointer-down on a palette card.
    pub fn palette_down(&mut self, item: CatalogItem, screen: Point) -> Vec<Action> {
        if self.busy() || self.drag.is_some() || self.palette.is_some() {
            return Vec::new();
        }
        let p = self.transform.to_canvas(screen);
        self.overlay.ghost = Some(Ghost { x: p.x, y: p.y, label: item.kind.clone() });
        self.palette = Some(PaletteSession::begin(item, p));
        vec![Action::Render]
    }

    fn finish_palette_drop(&mut self, screen: Point) -> Vec<Action> {
        let Some(mut session) = self.palette.take() else {
            return Vec::new();
        };
        // ghost disappears whatever the outcome
        self.overlay.ghost = None;
        let p = self.transform.to_canvas(screen);
        session.update(p);
        let (Some(schedule), Some(geometry)) = (&self.schedule, &self.geometry) else {
            return vec![Action::Render];
        };
        match session.release(geometry, schedule) {
            Ok(slot) => {
                let Some(lane) = schedule.lane_at(slot.lane_index) else {
                    return vec![Action::Render];
                };
                let request = CreateAllocationRequest {
                    catalog_item_id: session.item().id,
                    lane_id: lane.id,
                    date: slot.date,
                };
                self.phase = CyclePhase::Sending;
                self.timer_generation += 1;
                vec![
                    Action::Render,
                    Action::CreateAllocation(request),
                    Action::ArmFallbackTimer { generation: self.timer_generation },
                ]
            }
            Err(err) => vec![Action::Render, Action::Notify { message: err.to_string() }],
        }
    }

    // === Lane lifecycle =============================================

    /// Add a lane. Name and a positive area are validated here, before any
    /// network traffic.
    pub fn add_lane(&mut self, name: &str, area_sq_m: f64) -> Vec<Action> {
        if self.busy() {
            return Vec::new();
        }
        let name = name.trim();
        if name.is_empty() {
            return vec![Action::Notify { message: "lane name is required".into() }];
        }
        if !area_sq_m.is_finite() || area_sq_m <= 0.0 {
            return vec![Action::Notify { message: "lane area must be a positive number".into() }];
        }
        self.phase = CyclePhase::Sending;
        self.timer_generation += 1;
        vec![
            Action::AddLane(CreateLaneRequest { name: name.to_string(), area_sq_m }),
            Action::ArmFallbackTimer { generation: self.timer_generation },
        ]
    }

    /// Remove an empty lane. The host has already asked the user to
    /// confirm; lanes holding allocations are refused here regardless.
    pub fn remove_lane(&mut self, lane_id: Uuid) -> Vec<Action> {
        if self.busy() {
            return Vec::new();
        }
        let Some(schedule) = &self.schedule else {
            return Vec::new();
        };
        if schedule.lane(lane_id).is_none() || !schedule.lane_is_empty(lane_id) {
            return Vec::new();
        }
        self.phase = CyclePhase::Sending;
        self.timer_generation += 1;
        vec![
            Action::RemoveLane { lane_id },
            Action::ArmFallbackTimer { generation: self.timer_generation },
        ]
    }

    // === Reconciliation =============================================

    /// HTTP response for the outstanding request. Acceptance only moves
    /// the cycle to `AwaitingPush`; the schedule arrives on the channel.
    pub fn request_resolved(&mut self, response: &AcceptResponse) -> Vec<Action> {
        if self.phase != CyclePhase::Sending {
            return Vec::new();
        }
        if response.accepted {
            self.phase = CyclePhase::AwaitingPush;
            return Vec::new();
        }
        let mut actions = self.rollback();
        let message = response
            .error_message
            .clone()
            .unwrap_or_else(|| "change was rejected".to_string());
        actions.push(Action::Notify { message });
        actions
    }

    /// HTTP-level failure (network error, non-2xx, unparseable body).
    pub fn request_failed(&mut self, message: &str) -> Vec<Action> {
        if self.phase != CyclePhase::Sending {
            return Vec::new();
        }
        let mut actions = self.rollback();
        actions.push(Action::Notify { message: message.to_string() });
        actions
    }

    /// A message from the push channel. Messages for another schedule are
    /// ignored outright.
    pub fn on_push(&mut self, message: PushMessage) -> Vec<Action> {
        if let Some(schedule) = &self.schedule {
            if message.schedule_id != schedule.id {
                return Vec::new();
            }
        }
        if !message.status.is_terminal() {
            return Vec::new();
        }
        match message.status {
            PushStatus::Completed => match message.schedule {
                Some(schedule) => self.reconcile(schedule),
                // terminal message without a payload: treat as failure
                None => self.rollback(),
            },
            PushStatus::Failed => {
                let mut actions = self.rollback();
                if let Some(message) = message.message {
                    actions.push(Action::Notify { message });
                }
                actions
            }
            PushStatus::LaneAdded | PushStatus::LaneRemoved => {
                self.end_cycle();
                vec![Action::CancelFallbackTimer, Action::FetchSchedule]
            }
            PushStatus::Queued | PushStatus::Processing => Vec::new(),
        }
    }

    /// The push channel delivered something undecodable. The lost message
    /// could have been the terminal one, so an in-flight cycle rolls back
    /// right away instead of waiting out the fallback timer.
    pub fn push_malformed(&mut self) -> Vec<Action> {
        if self.phase == CyclePhase::Idle {
            return Vec::new();
        }
        log::warn!("undecodable push message, rolling back");
        self.rollback()
    }

    /// The fallback timer fired. Only the generation armed for the current
    /// cycle may force a reload; stale timers are ignored.
    pub fn fallback_fired(&mut self, generation: u64) -> Vec<Action> {
        if generation != self.timer_generation || self.phase == CyclePhase::Idle {
            return Vec::new();
        }
        log::warn!("no terminal push within the fallback window, forcing reload");
        self.end_cycle();
        self.pending.clear();
        self.in_flight.clear();
        vec![Action::ForceReload]
    }

    /// Adopt the authoritative schedule and flush anything queued while
    /// the cycle was in flight.
    fn reconcile(&mut self, authoritative: Schedule) -> Vec<Action> {
        self.in_flight.clear();
        self.end_cycle();
        let mut actions = vec![Action::CancelFallbackTimer];
        let mut adopted = authoritative;
        // re-apply changes queued mid-cycle on top of the new truth, then
        // submit them as the next request
        let queued = self.pending.take_all();
        for op in &queued {
            adopted = match op {
                ChangeOp::Move { allocation_id, target_lane_id, new_start } => adopted
                    .with_move(*allocation_id, *target_lane_id, *new_start)
                    .unwrap_or(adopted),
                ChangeOp::Remove { allocation_id } => {
                    adopted.with_remove(*allocation_id).unwrap_or(adopted)
                }
            };
        }
        let mut follow_up = Vec::new();
        if !queued.is_empty() {
            self.in_flight = queued;
            self.phase = CyclePhase::Sending;
            self.timer_generation += 1;
            follow_up.push(Action::SubmitChanges(AdjustRequest {
                moves: self.in_flight.clone(),
            }));
            follow_up.push(Action::ArmFallbackTimer { generation: self.timer_generation });
        }
        self.schedule_loaded_internal(adopted);
        actions.push(Action::Render);
        actions.extend(follow_up);
        actions
    }

    fn schedule_loaded_internal(&mut self, schedule: Schedule) {
        self.geometry = Some(GridGeometry::new(
            schedule.plan_start,
            schedule.plan_end,
            schedule.lanes.len(),
        ));
        self.schedule = Some(schedule);
    }

    /// Discard speculative state and re-derive truth from the server.
    fn rollback(&mut self) -> Vec<Action> {
        self.pending.clear();
        self.in_flight.clear();
        self.overlay = Overlay::default();
        self.drag = None;
        self.palette = None;
        self.end_cycle();
        vec![Action::CancelFallbackTimer, Action::FetchSchedule]
    }

    fn end_cycle(&mut self) {
        self.phase = CyclePhase::Idle;
        self.timer_generation += 1;
    }
}
