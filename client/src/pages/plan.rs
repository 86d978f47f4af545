//! Plan page — the schedule board layout.
//!
//! Owns the two signals the whole page shares: the engine controller and the
//! chrome state. On mount it attaches the controller (which triggers the
//! initial schedule fetch), loads the crop catalog, and starts the push
//! client; on unmount it detaches and stops the push loop.

use leptos::prelude::*;

use gantt::engine::ScheduleController;

use crate::components::detail_panel::DetailPanel;
use crate::components::palette_panel::PalettePanel;
use crate::components::schedule_canvas::ScheduleCanvas;
use crate::components::status_bar::StatusBar;
use crate::state::plan::PlanUi;

/// Plan page — composes the palette, the schedule canvas, the detail panel,
/// and the status bar. Reads the plan ID from the route parameter.
#[component]
pub fn PlanPage() -> impl IntoView {
    let controller = RwSignal::new(ScheduleController::default());
    let ui = RwSignal::new(PlanUi::default());
    // Shared with the palette so drags started over a card map into the
    // chart's coordinate space.
    let canvas_host = NodeRef::<leptos::html::Div>::new();
    provide_context(controller);
    provide_context(ui);
    provide_context(canvas_host);

    #[cfg(feature = "hydrate")]
    {
        use std::cell::Cell;
        use std::rc::Rc;

        use leptos::task::spawn_local;
        use leptos_router::hooks::use_params_map;
        use uuid::Uuid;

        use crate::net::{api, dispatch, push};

        let params = use_params_map();
        let plan_id = Memo::new(move |_| {
            params
                .read()
                .get("id")
                .and_then(|raw| Uuid::parse_str(&raw).ok())
        });

        let push_alive = StoredValue::new_local(None::<Rc<Cell<bool>>>);

        // Start (or restart) everything tied to the routed plan.
        Effect::new(move || {
            let Some(id) = plan_id.get() else {
                return;
            };
            if ui.read_untracked().plan_id == Some(id) {
                return;
            }

            ui.update(|u| u.reset_for_plan(id));
            let actions = controller
                .try_update(|c| {
                    *c = ScheduleController::default();
                    c.attach()
                })
                .unwrap_or_default();
            dispatch::run_actions(id, actions, controller, ui);

            spawn_local(async move {
                if let Some(catalog) = api::fetch_catalog(id).await {
                    ui.update(|u| u.catalog = catalog);
                }
            });

            if let Some(previous) = push_alive.get_value() {
                previous.set(false);
            }
            push_alive.set_value(Some(push::spawn_push_client(id, controller, ui)));
        });

        on_cleanup(move || {
            if let Some(alive) = push_alive.get_value() {
                alive.set(false);
            }
            // Detach returns only a timer cancellation, which the generation
            // counter already covers.
            let _ = controller.try_update(ScheduleController::detach);
        });
    }

    view! {
        <div class="plan-page">
            <div class="plan-page__palette">
                <PalettePanel/>
            </div>
            <div class="plan-page__canvas">
                <ScheduleCanvas/>
            </div>
            <Show when=move || ui.read().detail.is_some()>
                <DetailPanel/>
            </Show>
            <div class="plan-page__status-bar">
                <StatusBar/>
            </div>
        </div>
    }
}
