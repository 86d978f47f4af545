//! Executes [`gantt::engine::Action`]s against the browser.
//!
//! The engine is pure: every event handler returns a list of side effects
//! for the host to run. This module is that host. HTTP outcomes and timer
//! expiries are fed back into the controller, whose returned actions are
//! dispatched again, so a whole reconciliation cycle is driven by this one
//! loop.
//!
//! There is no timer handle to cancel: `CancelFallbackTimer` is satisfied
//! by the engine's generation counter — a stale expiry calls
//! `fallback_fired` with an old generation and is ignored.

use gantt::engine::{Action, ScheduleController};
use leptos::prelude::*;
use uuid::Uuid;

use crate::state::plan::PlanUi;

/// Run a batch of engine actions. Safe to call re-entrantly: async results
/// dispatch their follow-up actions through this same function.
#[cfg(feature = "hydrate")]
pub fn run_actions(
    plan_id: Uuid,
    actions: Vec<Action>,
    controller: RwSignal<ScheduleController>,
    ui: RwSignal<PlanUi>,
) {
    use leptos::task::spawn_local;

    use crate::net::api;

    for action in actions {
        match action {
            // rendering is reactive (the controller signal already
            // notified); timer cancellation is the generation counter
            Action::Render | Action::CancelFallbackTimer => {}
            Action::FetchSchedule => {
                spawn_local(async move {
                    match api::fetch_schedule(plan_id).await {
                        Some(schedule) => {
                            let next = controller
                                .try_update(|c| c.schedule_loaded(schedule))
                                .unwrap_or_default();
                            run_actions(plan_id, next, controller, ui);
                        }
                        None => ui.update(|u| u.set_notice("failed to load the schedule")),
                    }
                });
            }
            Action::SubmitChanges(request) => {
                spawn_local(async move {
                    let result = api::post_adjust(plan_id, &request).await;
                    resolve_request(plan_id, result, controller, ui);
                });
            }
            Action::CreateAllocation(request) => {
                spawn_local(async move {
                    let result = api::post_allocation(plan_id, &request).await;
                    resolve_request(plan_id, result, controller, ui);
                });
            }
            Action::AddLane(request) => {
                spawn_local(async move {
                    // the created id is never used directly; the lane_added
                    // push triggers a refetch that carries it
                    let result = api::post_lane(plan_id, &request).await;
                    resolve_request(plan_id, result.map(|r| r.acceptance()), controller, ui);
                });
            }
            Action::RemoveLane { lane_id } => {
                spawn_local(async move {
                    let result = api::delete_lane(plan_id, lane_id).await;
                    resolve_request(plan_id, result, controller, ui);
                });
            }
            Action::OpenDetail { allocation_id } => {
                spawn_local(async move {
                    match api::fetch_allocation(plan_id, allocation_id).await {
                        Some(allocation) => ui.update(|u| u.detail = Some(allocation)),
                        None => ui.update(|u| u.set_notice("allocation no longer exists")),
                    }
                });
            }
            Action::ArmFallbackTimer { generation } => {
                spawn_local(async move {
                    let secs = gantt::consts::FALLBACK_TIMEOUT_SECS;
                    gloo_timers::future::sleep(std::time::Duration::from_secs(secs)).await;
                    let next = controller
                        .try_update(|c| c.fallback_fired(generation))
                        .unwrap_or_default();
                    run_actions(plan_id, next, controller, ui);
                });
            }
            Action::ForceReload => {
                if let Some(window) = web_sys::window() {
                    let _ = window.location().reload();
                }
            }
            Action::Notify { message } => ui.update(|u| u.set_notice(message)),
        }
    }
}

#[cfg(feature = "hydrate")]
fn resolve_request(
    plan_id: Uuid,
    result: Result<gantt::wire::AcceptResponse, String>,
    controller: RwSignal<ScheduleController>,
    ui: RwSignal<PlanUi>,
) {
    let next = match result {
        Ok(response) => controller
            .try_update(|c| c.request_resolved(&response))
            .unwrap_or_default(),
        Err(message) => controller
            .try_update(|c| c.request_failed(&message))
            .unwrap_or_default(),
    };
    run_actions(plan_id, next, controller, ui);
}

/// SSR stub: actions are only executable in the browser.
#[cfg(not(feature = "hydrate"))]
pub fn run_actions(
    plan_id: Uuid,
    actions: Vec<Action>,
    controller: RwSignal<ScheduleController>,
    ui: RwSignal<PlanUi>,
) {
    let _ = (plan_id, actions, controller, ui);
}
