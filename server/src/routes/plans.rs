//! Plan and schedule routes.
//!
//! Mutating endpoints follow one contract: domain-level rejections come back
//! as HTTP 200 with `accepted: false` and a message the client can surface;
//! only an unknown plan is a 404. An accepted mutation is resolved later by
//! a solver job broadcasting on the push channel, except lane changes, which
//! apply synchronously and broadcast a refetch hint.

#[cfg(test)]
#[path = "plans_test.rs"]
mod plans_test;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use gantt::model::{Allocation, Lane, Schedule};
use gantt::palette::{CatalogItem, check_kind_limit};
use gantt::wire::{
    AcceptResponse, AdjustRequest, ChangeOp, CreateAllocationRequest, CreateLaneRequest,
    CreateLaneResponse, PlanSummary, PushMessage, PushStatus,
};
use uuid::Uuid;

use crate::services::solver;
use crate::state::AppState;

fn accepted() -> AcceptResponse {
    AcceptResponse { accepted: true, error_message: None }
}

fn rejected(message: impl Into<String>) -> AcceptResponse {
    AcceptResponse { accepted: false, error_message: Some(message.into()) }
}

/// `GET /api/plans` — list plans for the home page.
pub async fn list_plans(State(state): State<AppState>) -> Json<Vec<PlanSummary>> {
    let plans = state.plans.read().await;
    let mut summaries: Vec<PlanSummary> = plans
        .iter()
        .map(|(id, plan)| PlanSummary { id: *id, name: plan.name.clone() })
        .collect();
    summaries.sort_by(|a, b| a.name.cmp(&b.name));
    Json(summaries)
}

/// `GET /api/plans/:id/schedule` — the authoritative snapshot.
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<Schedule>, StatusCode> {
    let plans = state.plans.read().await;
    plans
        .get(&plan_id)
        .map(|p| Json(p.schedule.clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

/// `GET /api/plans/:id/catalog` — crops available in the palette.
pub async fn get_catalog(
    State(state): State<AppState>,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<Vec<CatalogItem>>, StatusCode> {
    let plans = state.plans.read().await;
    plans
        .get(&plan_id)
        .map(|p| Json(p.catalog.clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

/// `GET /api/plans/:id/allocations/:allocation_id` — detail view payload.
pub async fn get_allocation(
    State(state): State<AppState>,
    Path((plan_id, allocation_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Allocation>, StatusCode> {
    let plans = state.plans.read().await;
    plans
        .get(&plan_id)
        .and_then(|p| p.schedule.allocation(allocation_id).cloned())
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// `POST /api/plans/:id/adjust` — submit a batch of moves/removes.
pub async fn adjust(
    State(state): State<AppState>,
    Path(plan_id): Path<Uuid>,
    Json(request): Json<AdjustRequest>,
) -> Result<Json<AcceptResponse>, StatusCode> {
    {
        let plans = state.plans.read().await;
        let plan = plans.get(&plan_id).ok_or(StatusCode::NOT_FOUND)?;
        if request.moves.is_empty() {
            return Ok(Json(rejected("empty change set")));
        }
        // cheap validation against the current snapshot; the solver job
        // re-validates against whatever is current when it runs
        for op in &request.moves {
            if plan.schedule.allocation(op.allocation_id()).is_none() {
                return Ok(Json(rejected(format!(
                    "unknown allocation {}",
                    op.allocation_id()
                ))));
            }
            if let ChangeOp::Move { target_lane_id, .. } = op {
                if plan.schedule.lane(*target_lane_id).is_none() {
                    return Ok(Json(rejected(format!("unknown bed {target_lane_id}"))));
                }
            }
        }
    }
    tokio::spawn(solver::run_adjust(state, plan_id, request.moves));
    Ok(Json(accepted()))
}

/// `POST /api/plans/:id/allocations` — create a planting from a palette drop.
pub async fn create_allocation(
    State(state): State<AppState>,
    Path(plan_id): Path<Uuid>,
    Json(request): Json<CreateAllocationRequest>,
) -> Result<Json<AcceptResponse>, StatusCode> {
    {
        let plans = state.plans.read().await;
        let plan = plans.get(&plan_id).ok_or(StatusCode::NOT_FOUND)?;
        let Some(item) = plan.catalog.iter().find(|i| i.id == request.catalog_item_id) else {
            return Ok(Json(rejected("unknown catalog item")));
        };
        if plan.schedule.lane(request.lane_id).is_none() {
            return Ok(Json(rejected(format!("unknown bed {}", request.lane_id))));
        }
        if request.date < plan.schedule.plan_start || request.date > plan.schedule.plan_end {
            return Ok(Json(rejected("date falls outside the plan window")));
        }
        if let Err(err) = check_kind_limit(&plan.schedule, &item.kind) {
            return Ok(Json(rejected(err.to_string())));
        }
    }
    tokio::spawn(solver::run_create(state, plan_id, request));
    Ok(Json(accepted()))
}

fn lane_rejected(message: impl Into<String>) -> CreateLaneResponse {
    CreateLaneResponse {
        accepted: false,
        lane_id: None,
        error_message: Some(message.into()),
    }
}

/// `POST /api/plans/:id/lanes` — add a bed. Applies synchronously,
/// answers with the created lane's id, and broadcasts `lane_added`;
/// subscribers refetch.
pub async fn create_lane(
    State(state): State<AppState>,
    Path(plan_id): Path<Uuid>,
    Json(request): Json<CreateLaneRequest>,
) -> Result<Json<CreateLaneResponse>, StatusCode> {
    let name = request.name.trim();
    if name.is_empty() {
        return Ok(Json(lane_rejected("bed name is required")));
    }
    if !request.area_sq_m.is_finite() || request.area_sq_m <= 0.0 {
        return Ok(Json(lane_rejected("bed area must be a positive number")));
    }
    let lane_id = Uuid::new_v4();
    let schedule_id = {
        let mut plans = state.plans.write().await;
        let plan = plans.get_mut(&plan_id).ok_or(StatusCode::NOT_FOUND)?;
        plan.schedule.lanes.push(Lane {
            id: lane_id,
            name: name.to_owned(),
            area_sq_m: request.area_sq_m,
        });
        plan.schedule.id
    };
    tracing::info!(%plan_id, %lane_id, name, "bed added");
    state
        .broadcast(plan_id, &PushMessage {
            schedule_id,
            status: PushStatus::LaneAdded,
            schedule: None,
            message: None,
        })
        .await;
    Ok(Json(CreateLaneResponse {
        accepted: true,
        lane_id: Some(lane_id),
        error_message: None,
    }))
}

/// `DELETE /api/plans/:id/lanes/:lane_id` — remove an empty bed.
pub async fn delete_lane(
    State(state): State<AppState>,
    Path((plan_id, lane_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AcceptResponse>, StatusCode> {
    let schedule_id = {
        let mut plans = state.plans.write().await;
        let plan = plans.get_mut(&plan_id).ok_or(StatusCode::NOT_FOUND)?;
        if plan.schedule.lane(lane_id).is_none() {
            return Ok(Json(rejected(format!("unknown bed {lane_id}"))));
        }
        if !plan.schedule.lane_is_empty(lane_id) {
            return Ok(Json(rejected("bed still has plantings")));
        }
        plan.schedule.lanes.retain(|l| l.id != lane_id);
        plan.schedule.id
    };
    tracing::info!(%plan_id, %lane_id, "bed removed");
    state
        .broadcast(plan_id, &PushMessage {
            schedule_id,
            status: PushStatus::LaneRemoved,
            schedule: None,
            message: None,
        })
        .await;
    Ok(Json(accepted()))
}
