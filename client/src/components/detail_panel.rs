//! Allocation detail panel, opened by clicking a bar.

use leptos::prelude::*;

use gantt::engine::ScheduleController;

#[cfg(feature = "hydrate")]
use super::dispatch_for_plan;
use crate::state::plan::PlanUi;

/// Detail view for the allocation in `PlanUi::detail`. Rendered only while
/// one is open (the page wraps it in a `Show`).
#[component]
pub fn DetailPanel() -> impl IntoView {
    let controller = expect_context::<RwSignal<ScheduleController>>();
    let ui = expect_context::<RwSignal<PlanUi>>();

    let on_close = move |_ev: leptos::ev::MouseEvent| {
        ui.update(PlanUi::close_detail);
    };

    let on_remove = move |_ev: leptos::ev::MouseEvent| {
        let Some(allocation_id) = ui.read_untracked().detail.as_ref().map(|a| a.id) else {
            return;
        };
        ui.update(PlanUi::close_detail);
        #[cfg(feature = "hydrate")]
        {
            let actions = controller
                .try_update(|c| c.remove_allocation(allocation_id))
                .unwrap_or_default();
            dispatch_for_plan(actions, controller, ui);
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = allocation_id;
        }
    };

    view! {
        <div class="detail-panel">
            {move || {
                ui.read()
                    .detail
                    .as_ref()
                    .map(|alloc| {
                        let lane_name = controller
                            .read()
                            .schedule()
                            .and_then(|s| s.lane(alloc.lane_id))
                            .map_or_else(|| "unknown bed".to_owned(), |lane| lane.name.clone());
                        let period = format!(
                            "{} \u{2192} {} ({} days)",
                            alloc.start,
                            alloc.end,
                            alloc.duration_days()
                        );
                        view! {
                            <h2 class="detail-panel__title">{alloc.crop.display_name()}</h2>
                            <dl class="detail-panel__facts">
                                <dt>"Bed"</dt>
                                <dd>{lane_name}</dd>
                                <dt>"Period"</dt>
                                <dd>{period}</dd>
                                <dt>"Revenue"</dt>
                                <dd>{format!("{:.2}", alloc.outcome.revenue)}</dd>
                                <dt>"Cost"</dt>
                                <dd>{format!("{:.2}", alloc.outcome.cost)}</dd>
                                <dt>"Profit"</dt>
                                <dd>{format!("{:.2}", alloc.outcome.profit)}</dd>
                            </dl>
                        }
                    })
            }}
            <div class="detail-panel__actions">
                <button class="detail-panel__remove" on:click=on_remove>
                    "Remove planting"
                </button>
                <button class="detail-panel__close" on:click=on_close>
                    "Close"
                </button>
            </div>
        </div>
    }
}
