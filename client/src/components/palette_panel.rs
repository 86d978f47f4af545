//! The crop palette and the add-lane form.
//!
//! Dragging a card onto the chart creates an allocation; the card itself
//! never moves, the engine renders a ghost on the canvas instead.

use leptos::prelude::*;

use gantt::engine::ScheduleController;
use gantt::palette::CatalogItem;

#[cfg(feature = "hydrate")]
use super::{canvas_screen_point, dispatch_for_plan};
use crate::state::plan::PlanUi;

/// Palette of catalog crops plus the add-lane form.
#[component]
pub fn PalettePanel() -> impl IntoView {
    let controller = expect_context::<RwSignal<ScheduleController>>();
    let ui = expect_context::<RwSignal<PlanUi>>();
    #[cfg(feature = "hydrate")]
    let canvas_host = expect_context::<NodeRef<leptos::html::Div>>();

    let name_ref = NodeRef::<leptos::html::Input>::new();
    let area_ref = NodeRef::<leptos::html::Input>::new();

    let on_card_down = {
        #[cfg(feature = "hydrate")]
        {
            move |item: CatalogItem, ev: leptos::ev::PointerEvent| {
                ev.prevent_default();
                let Some(host) = canvas_host.get_untracked() else {
                    return;
                };
                let p = canvas_screen_point(&ev, &host, controller);
                let actions = controller
                    .try_update(|c| c.palette_down(item, p))
                    .unwrap_or_default();
                dispatch_for_plan(actions, controller, ui);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_item: CatalogItem, _ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_submit_lane = move |_ev: leptos::ev::MouseEvent| {
        let name = name_ref.get().map(|i| i.value()).unwrap_or_default();
        let area = area_ref
            .get()
            .and_then(|i| i.value().parse::<f64>().ok())
            .unwrap_or(f64::NAN);
        #[cfg(feature = "hydrate")]
        {
            let actions = controller
                .try_update(|c| c.add_lane(&name, area))
                .unwrap_or_default();
            // validation failures keep the form open, with the notice shown
            if actions
                .iter()
                .any(|a| matches!(a, gantt::engine::Action::AddLane(_)))
            {
                ui.update(|u| u.show_add_lane = false);
            }
            dispatch_for_plan(actions, controller, ui);
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (name, area, controller);
        }
    };

    let on_cancel_lane = move |_ev: leptos::ev::MouseEvent| {
        ui.update(|u| u.show_add_lane = false);
    };

    view! {
        <aside class="palette-panel">
            <h2 class="palette-panel__title">"Crops"</h2>
            <ul class="palette-panel__cards">
                {move || {
                    ui.get()
                        .catalog
                        .into_iter()
                        .map(|item| {
                            let label = item.display_name();
                            view! {
                                <li
                                    class="palette-panel__card"
                                    on:pointerdown=move |ev| on_card_down(item.clone(), ev)
                                >
                                    {label}
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
            <Show when=move || ui.read().show_add_lane>
                <div class="palette-panel__add-lane">
                    <label>
                        "Bed name"
                        <input type="text" node_ref=name_ref placeholder="North bed"/>
                    </label>
                    <label>
                        "Area (m²)"
                        <input type="number" node_ref=area_ref min="1" step="1"/>
                    </label>
                    <div class="palette-panel__add-lane-actions">
                        <button on:click=on_submit_lane>"Add bed"</button>
                        <button class="palette-panel__cancel" on:click=on_cancel_lane>
                            "Cancel"
                        </button>
                    </div>
                </div>
            </Show>
        </aside>
    }
}
