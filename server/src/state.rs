//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the live plans in memory: each plan carries its schedule (the single
//! source of truth the clients reconcile against), its crop catalog, and the
//! push subscribers for its channel. Solver jobs mutate the schedule here and
//! broadcast the result; there is no other write path.

use std::collections::HashMap;
use std::sync::Arc;

use gantt::model::Schedule;
use gantt::palette::CatalogItem;
use gantt::wire::PushMessage;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

/// Per-plan live state.
pub struct PlanState {
    pub name: String,
    pub schedule: Schedule,
    pub catalog: Vec<CatalogItem>,
    /// Connected push clients: subscriber id -> outgoing message channel.
    pub subscribers: HashMap<Uuid, mpsc::Sender<PushMessage>>,
}

impl PlanState {
    #[must_use]
    pub fn new(name: impl Into<String>, schedule: Schedule, catalog: Vec<CatalogItem>) -> Self {
        Self {
            name: name.into(),
            schedule,
            catalog,
            subscribers: HashMap::new(),
        }
    }
}

/// Shared application state. Clone is required by Axum; all inner fields are
/// Arc-wrapped.
#[derive(Clone, Default)]
pub struct AppState {
    pub plans: Arc<RwLock<HashMap<Uuid, PlanState>>>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Send a push message to every subscriber of a plan. Slow or gone
    /// subscribers are skipped, not awaited; the client's fallback timer
    /// covers a dropped terminal message.
    pub async fn broadcast(&self, plan_id: Uuid, message: &PushMessage) {
        let plans = self.plans.read().await;
        let Some(plan) = plans.get(&plan_id) else {
            return;
        };
        for tx in plan.subscribers.values() {
            if tx.try_send(message.clone()).is_err() {
                tracing::warn!(%plan_id, "push subscriber channel full, dropping message");
            }
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use gantt::model::{Allocation, AllocationOutcome, CropRef, Lane};
    use time::macros::date;

    use super::*;

    /// An `AppState` with one seeded plan; returns the state and plan id.
    pub async fn test_state_with_plan() -> (AppState, Uuid) {
        let state = AppState::new();
        let plan_id = Uuid::new_v4();
        let schedule = test_schedule();
        let catalog = test_catalog();
        state
            .plans
            .write()
            .await
            .insert(plan_id, PlanState::new("Test plan", schedule, catalog));
        (state, plan_id)
    }

    /// Two lanes, one lettuce allocation in the first.
    #[must_use]
    pub fn test_schedule() -> Schedule {
        Schedule {
            id: Uuid::from_u128(42),
            plan_start: date!(2024 - 04 - 01),
            plan_end: date!(2025 - 03 - 27),
            lanes: vec![
                Lane {
                    id: Uuid::from_u128(100),
                    name: "North bed".into(),
                    area_sq_m: 24.0,
                },
                Lane {
                    id: Uuid::from_u128(101),
                    name: "South bed".into(),
                    area_sq_m: 18.0,
                },
            ],
            allocations: vec![Allocation {
                id: Uuid::from_u128(1),
                lane_id: Uuid::from_u128(100),
                crop: CropRef {
                    id: Uuid::from_u128(201),
                    kind: "Lettuce".into(),
                    variety: Some("Butterhead".into()),
                },
                start: date!(2024 - 04 - 11),
                end: date!(2024 - 05 - 21),
                outcome: AllocationOutcome::default(),
            }],
        }
    }

    #[must_use]
    pub fn test_catalog() -> Vec<CatalogItem> {
        vec![
            CatalogItem {
                id: Uuid::from_u128(201),
                kind: "Lettuce".into(),
                variety: Some("Butterhead".into()),
            },
            CatalogItem {
                id: Uuid::from_u128(202),
                kind: "Carrot".into(),
                variety: None,
            },
        ]
    }
}
