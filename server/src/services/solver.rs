//! Schedule solver: applies requested changes and verifies feasibility.
//!
//! DESIGN
//! ======
//! Mutations are accepted over HTTP after cheap validation, then resolved by
//! an async job that runs the solver and broadcasts the outcome on the push
//! channel. The solver itself applies the ops verbatim and then checks the
//! arrangement: every planting inside the plan window, and within each bed a
//! fallow gap between consecutive plantings. Unplaceable requests fail the
//! whole job; the clients roll back by re-fetching.

#[cfg(test)]
#[path = "solver_test.rs"]
mod solver_test;

use async_trait::async_trait;
use gantt::model::{Allocation, AllocationOutcome, Schedule, ScheduleError};
use gantt::palette::check_kind_limit;
use gantt::wire::{ChangeOp, CreateAllocationRequest, PushMessage, PushStatus};
use thiserror::Error;
use time::Duration;
use uuid::Uuid;

use crate::state::AppState;

/// Minimum days a bed rests between the end of one planting and the start
/// of the next.
pub const FALLOW_DAYS: i64 = 28;

/// Grow duration assigned to a planting created from the palette. The
/// catalog carries no per-crop agronomy yet, so every new planting gets the
/// same window.
pub const DEFAULT_GROW_DAYS: i64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    #[error("unknown allocation {0}")]
    UnknownAllocation(Uuid),
    #[error("unknown bed {0}")]
    UnknownLane(Uuid),
    #[error("no feasible arrangement: {0}")]
    Infeasible(String),
}

impl From<ScheduleError> for SolveError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::UnknownAllocation(id) => SolveError::UnknownAllocation(id),
            ScheduleError::UnknownLane(id) => SolveError::UnknownLane(id),
        }
    }
}

/// A strategy for resolving a batch of change ops against a schedule.
#[async_trait]
pub trait Solve: Send + Sync {
    async fn solve(&self, schedule: &Schedule, ops: &[ChangeOp]) -> Result<Schedule, SolveError>;
}

/// Applies ops exactly as requested and verifies the result. Never
/// rearranges other plantings to make room.
pub struct NaiveSolver;

#[async_trait]
impl Solve for NaiveSolver {
    async fn solve(&self, schedule: &Schedule, ops: &[ChangeOp]) -> Result<Schedule, SolveError> {
        let mut next = schedule.clone();
        for op in ops {
            next = match op {
                ChangeOp::Move { allocation_id, target_lane_id, new_start } => {
                    next.with_move(*allocation_id, *target_lane_id, *new_start)?
                }
                ChangeOp::Remove { allocation_id } => next.with_remove(*allocation_id)?,
            };
        }
        verify(&next)?;
        Ok(next)
    }
}

/// Check plan-window bounds and per-bed fallow gaps.
pub fn verify(schedule: &Schedule) -> Result<(), SolveError> {
    for alloc in &schedule.allocations {
        if alloc.start < schedule.plan_start || alloc.end > schedule.plan_end {
            return Err(SolveError::Infeasible(format!(
                "{} falls outside the plan window",
                alloc.crop.display_name()
            )));
        }
    }
    for group in schedule.lane_groups() {
        for pair in group.allocations.windows(2) {
            let gap = (pair[1].start - pair[0].end).whole_days();
            if gap < FALLOW_DAYS {
                return Err(SolveError::Infeasible(format!(
                    "{} needs {FALLOW_DAYS} fallow days in {} before {}",
                    pair[0].crop.display_name(),
                    group.lane.name,
                    pair[1].crop.display_name()
                )));
            }
        }
    }
    Ok(())
}

/// Revenue/cost estimate for a planting. Deliberately crude: linear in bed
/// area and grow duration.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn estimate_outcome(area_sq_m: f64, days: i64) -> AllocationOutcome {
    let revenue = area_sq_m * days as f64 * 0.35;
    let cost = area_sq_m * days as f64 * 0.15;
    AllocationOutcome { revenue, cost, profit: revenue - cost }
}

fn status_message(schedule_id: Uuid, status: PushStatus) -> PushMessage {
    PushMessage { schedule_id, status, schedule: None, message: None }
}

async fn snapshot(state: &AppState, plan_id: Uuid) -> Option<Schedule> {
    let plans = state.plans.read().await;
    plans.get(&plan_id).map(|p| p.schedule.clone())
}

async fn commit(state: &AppState, plan_id: Uuid, schedule: Schedule) {
    let mut plans = state.plans.write().await;
    if let Some(plan) = plans.get_mut(&plan_id) {
        plan.schedule = schedule;
    }
}

/// Solver job for an adjust request. Broadcasts the status progression and
/// either the committed schedule or the failure.
pub async fn run_adjust(state: AppState, plan_id: Uuid, ops: Vec<ChangeOp>) {
    let Some(schedule) = snapshot(&state, plan_id).await else {
        return;
    };
    let schedule_id = schedule.id;
    state
        .broadcast(plan_id, &status_message(schedule_id, PushStatus::Queued))
        .await;
    state
        .broadcast(plan_id, &status_message(schedule_id, PushStatus::Processing))
        .await;

    match NaiveSolver.solve(&schedule, &ops).await {
        Ok(next) => {
            commit(&state, plan_id, next.clone()).await;
            tracing::info!(%plan_id, ops = ops.len(), "adjust committed");
            state
                .broadcast(plan_id, &PushMessage {
                    schedule_id,
                    status: PushStatus::Completed,
                    schedule: Some(next),
                    message: None,
                })
                .await;
        }
        Err(err) => {
            tracing::warn!(%plan_id, error = %err, "adjust rejected");
            state
                .broadcast(plan_id, &PushMessage {
                    schedule_id,
                    status: PushStatus::Failed,
                    schedule: None,
                    message: Some(err.to_string()),
                })
                .await;
        }
    }
}

/// Solver job for a palette drop. Builds the new planting, re-verifies the
/// arrangement, and commits or fails like an adjust.
pub async fn run_create(state: AppState, plan_id: Uuid, request: CreateAllocationRequest) {
    let Some(schedule) = snapshot(&state, plan_id).await else {
        return;
    };
    let schedule_id = schedule.id;
    state
        .broadcast(plan_id, &status_message(schedule_id, PushStatus::Queued))
        .await;
    state
        .broadcast(plan_id, &status_message(schedule_id, PushStatus::Processing))
        .await;

    match build_allocation(&state, plan_id, &schedule, &request).await {
        Ok(alloc) => {
            let mut next = schedule;
            next.allocations.push(alloc);
            match verify(&next) {
                Ok(()) => {
                    commit(&state, plan_id, next.clone()).await;
                    tracing::info!(%plan_id, "planting committed");
                    state
                        .broadcast(plan_id, &PushMessage {
                            schedule_id,
                            status: PushStatus::Completed,
                            schedule: Some(next),
                            message: None,
                        })
                        .await;
                }
                Err(err) => {
                    tracing::warn!(%plan_id, error = %err, "planting rejected");
                    state
                        .broadcast(plan_id, &PushMessage {
                            schedule_id,
                            status: PushStatus::Failed,
                            schedule: None,
                            message: Some(err.to_string()),
                        })
                        .await;
                }
            }
        }
        Err(message) => {
            state
                .broadcast(plan_id, &PushMessage {
                    schedule_id,
                    status: PushStatus::Failed,
                    schedule: None,
                    message: Some(message),
                })
                .await;
        }
    }
}

async fn build_allocation(
    state: &AppState,
    plan_id: Uuid,
    schedule: &Schedule,
    request: &CreateAllocationRequest,
) -> Result<Allocation, String> {
    let item = {
        let plans = state.plans.read().await;
        plans
            .get(&plan_id)
            .and_then(|p| p.catalog.iter().find(|i| i.id == request.catalog_item_id).cloned())
            .ok_or_else(|| "unknown catalog item".to_string())?
    };
    check_kind_limit(schedule, &item.kind).map_err(|e| e.to_string())?;
    let lane = schedule
        .lane(request.lane_id)
        .ok_or_else(|| format!("unknown bed {}", request.lane_id))?;
    let end = request.date + Duration::days(DEFAULT_GROW_DAYS);
    Ok(Allocation {
        id: Uuid::new_v4(),
        lane_id: lane.id,
        crop: gantt::model::CropRef {
            id: item.id,
            kind: item.kind,
            variety: item.variety,
        },
        start: request.date,
        end,
        outcome: estimate_outcome(lane.area_sq_m, DEFAULT_GROW_DAYS),
    })
}
