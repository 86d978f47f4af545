//! Serde types shared between the engine, the leptos client, and the axum
//! backend. Everything here is plain data; the engine never performs I/O.

#[cfg(test)]
#[path = "wire_test.rs"]
mod wire_test;

use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::model::Schedule;

/// A plan as listed on the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub id: Uuid,
    pub name: String,
}

/// One requested change to the schedule, as sent to the adjust endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ChangeOp {
    Move {
        allocation_id: Uuid,
        target_lane_id: Uuid,
        new_start: Date,
    },
    Remove {
        allocation_id: Uuid,
    },
}

impl ChangeOp {
    /// The allocation this op targets. A later op for the same allocation
    /// supersedes an earlier one in the pending set.
    #[must_use]
    pub fn allocation_id(&self) -> Uuid {
        match self {
            ChangeOp::Move { allocation_id, .. } | ChangeOp::Remove { allocation_id } => {
                *allocation_id
            }
        }
    }
}

/// Body of `POST /api/plans/{id}/adjust`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustRequest {
    pub moves: Vec<ChangeOp>,
}

/// Body of `POST /api/plans/{id}/allocations` (palette drop).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAllocationRequest {
    pub catalog_item_id: Uuid,
    pub lane_id: Uuid,
    pub date: Date,
}

/// Body of `POST /api/plans/{id}/lanes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateLaneRequest {
    pub name: String,
    pub area_sq_m: f64,
}

/// Response to every mutating request. Acceptance only: the adjusted
/// schedule arrives later on the push channel, never in this body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptResponse {
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Response to `POST /api/plans/{id}/lanes`. Lane creation applies
/// synchronously, so unlike the solver-backed endpoints the created lane's
/// id comes back in the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLaneResponse {
    pub accepted: bool,
    /// Present when `accepted`: the id of the lane that was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lane_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl CreateLaneResponse {
    /// The plain acceptance view, for callers that reconcile through the
    /// push channel and never use the id directly.
    #[must_use]
    pub fn acceptance(&self) -> AcceptResponse {
        AcceptResponse {
            accepted: self.accepted,
            error_message: self.error_message.clone(),
        }
    }
}

/// Solver lifecycle statuses broadcast on the push channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    LaneAdded,
    LaneRemoved,
}

impl PushStatus {
    /// Whether this status ends a reconciliation cycle. Non-terminal
    /// statuses are progress notes and leave the fallback timer armed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PushStatus::Queued | PushStatus::Processing)
    }
}

/// A message from the per-schedule push channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    pub schedule_id: Uuid,
    pub status: PushStatus,
    /// Present on `completed`: the authoritative schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
    /// Present on `failed`: the reason, surfaced verbatim to the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
