//! The schedule canvas: an SVG projection of the engine's scene.
//!
//! The engine hands back a [`gantt::render::Scene`] of plain draw items and
//! this component maps them 1:1 onto SVG nodes. Pointer move/up listeners are
//! registered on the window, not the SVG, so drags keep tracking when the
//! pointer leaves the chart and palette drags can end over it.

use leptos::prelude::*;
use uuid::Uuid;

use gantt::consts::{AXIS_ORIGIN_X, FOOTER_HEIGHT, HEADER_HEIGHT, ROW_HEIGHT};
use gantt::engine::ScheduleController;

#[cfg(feature = "hydrate")]
use super::{canvas_screen_point, dispatch_for_plan};
use crate::state::plan::PlanUi;

/// The chart surface. Bars are draggable, lane rows expose the remove
/// affordance, and the footer carries the add-lane button.
#[component]
pub fn ScheduleCanvas() -> impl IntoView {
    let controller = expect_context::<RwSignal<ScheduleController>>();
    let ui = expect_context::<RwSignal<PlanUi>>();
    let host_ref = expect_context::<NodeRef<leptos::html::Div>>();

    let scene = Memo::new(move |_| controller.read().scene());

    // Global listeners: a drag session must resolve even when the pointer
    // is released outside the chart.
    #[cfg(feature = "hydrate")]
    {
        window_event_listener(leptos::ev::pointermove, move |ev| {
            let Some(host) = host_ref.get_untracked() else {
                return;
            };
            let p = canvas_screen_point(&ev, &host, controller);
            let actions = controller
                .try_update(|c| c.pointer_move(p))
                .unwrap_or_default();
            dispatch_for_plan(actions, controller, ui);
        });
        window_event_listener(leptos::ev::pointerup, move |ev| {
            let Some(host) = host_ref.get_untracked() else {
                return;
            };
            let p = canvas_screen_point(&ev, &host, controller);
            let actions = controller
                .try_update(|c| c.pointer_up(p))
                .unwrap_or_default();
            dispatch_for_plan(actions, controller, ui);
        });
    }

    let on_bar_down = {
        #[cfg(feature = "hydrate")]
        {
            move |allocation_id: Uuid, ev: leptos::ev::PointerEvent| {
                ev.prevent_default();
                ev.stop_propagation();
                let Some(host) = host_ref.get_untracked() else {
                    return;
                };
                let p = canvas_screen_point(&ev, &host, controller);
                let actions = controller
                    .try_update(|c| c.pointer_down(allocation_id, p))
                    .unwrap_or_default();
                dispatch_for_plan(actions, controller, ui);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_allocation_id: Uuid, _ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_remove_lane = {
        #[cfg(feature = "hydrate")]
        {
            move |lane_id: Uuid, ev: leptos::ev::MouseEvent| {
                ev.stop_propagation();
                let confirmed = web_sys::window()
                    .and_then(|w| w.confirm_with_message("Remove this bed?").ok())
                    .unwrap_or(false);
                if !confirmed {
                    return;
                }
                let actions = controller
                    .try_update(|c| c.remove_lane(lane_id))
                    .unwrap_or_default();
                dispatch_for_plan(actions, controller, ui);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_lane_id: Uuid, _ev: leptos::ev::MouseEvent| {}
        }
    };

    let on_add_lane = move |_ev: leptos::ev::MouseEvent| {
        ui.update(|u| u.show_add_lane = true);
    };

    view! {
        <div class="schedule-canvas" node_ref=host_ref>
            {move || match scene.get() {
                None => view! { <p class="schedule-canvas__loading">"Loading schedule…"</p> }
                    .into_any(),
                Some(s) => {
                    let grid_bottom = s.height - FOOTER_HEIGHT;
                    let view_box = format!("0 0 {} {}", s.width, s.height);

                    let months = s
                        .month_labels
                        .iter()
                        .map(|m| {
                            let label_x = m.x + 4.0;
                            let label_y = HEADER_HEIGHT - 12.0;
                            view! {
                                <g class="schedule-canvas__month">
                                    <line x1=m.x y1=HEADER_HEIGHT x2=m.x y2=grid_bottom/>
                                    <text x=label_x y=label_y>{m.label.clone()}</text>
                                </g>
                            }
                        })
                        .collect_view();

                    let lanes = s
                        .lane_rows
                        .iter()
                        .map(|row| {
                            let lane_id = row.lane_id;
                            let removable = row.removable;
                            let row_class = if row.highlighted {
                                "schedule-canvas__lane schedule-canvas__lane--highlighted"
                            } else {
                                "schedule-canvas__lane"
                            };
                            let remove_class = if removable {
                                "schedule-canvas__lane-remove"
                            } else {
                                "schedule-canvas__lane-remove schedule-canvas__lane-remove--disabled"
                            };
                            let name_y = row.y + ROW_HEIGHT / 2.0;
                            let remove_x = AXIS_ORIGIN_X - 16.0;
                            view! {
                                <g class=row_class>
                                    <rect x=0 y=row.y width=s.width height=ROW_HEIGHT/>
                                    <text class="schedule-canvas__lane-name" x=8 y=name_y>
                                        {row.name.clone()}
                                    </text>
                                    <g
                                        class=remove_class
                                        on:click=move |ev| {
                                            if removable {
                                                on_remove_lane(lane_id, ev);
                                            }
                                        }
                                    >
                                        <text x=remove_x y=name_y>"\u{2212}"</text>
                                    </g>
                                </g>
                            }
                        })
                        .collect_view();

                    let bars = s
                        .bars
                        .iter()
                        .map(|bar| {
                            let id = bar.allocation_id;
                            let class = if bar.dragged {
                                "schedule-canvas__bar schedule-canvas__bar--dragged"
                            } else {
                                "schedule-canvas__bar"
                            };
                            let label_x = bar.x + 6.0;
                            let label_y = bar.y + bar.height / 2.0 + 4.0;
                            view! {
                                <g class=class on:pointerdown=move |ev| on_bar_down(id, ev)>
                                    <rect
                                        x=bar.x
                                        y=bar.y
                                        width=bar.width
                                        height=bar.height
                                        rx=6
                                        fill=bar.color
                                    />
                                    <text x=label_x y=label_y>{bar.label.clone()}</text>
                                </g>
                            }
                        })
                        .collect_view();

                    let ghost = s.ghost.as_ref().map(|g| {
                        let box_x = g.x - 60.0;
                        let box_y = g.y - 20.0;
                        let text_y = g.y + 4.0;
                        view! {
                            <g class="schedule-canvas__ghost">
                                <rect x=box_x y=box_y width=120 height=40 rx=6/>
                                <text x=g.x y=text_y text-anchor="middle">{g.label.clone()}</text>
                            </g>
                        }
                    });

                    let add = &s.add_lane;
                    let add_text_x = add.x + add.width / 2.0;
                    let add_text_y = add.y + add.height / 2.0 + 4.0;
                    let add_lane = view! {
                        <g class="schedule-canvas__add-lane" on:click=on_add_lane>
                            <rect x=add.x y=add.y width=add.width height=add.height rx=6/>
                            <text x=add_text_x y=add_text_y text-anchor="middle">"+ Add bed"</text>
                        </g>
                    };

                    view! {
                        <svg
                            class="schedule-canvas__svg"
                            viewBox=view_box
                            preserveAspectRatio="xMinYMin meet"
                        >
                            {months}
                            {lanes}
                            {bars}
                            {add_lane}
                            {ghost}
                        </svg>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}
