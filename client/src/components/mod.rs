//! UI components for the schedule board.

pub mod detail_panel;
pub mod palette_panel;
pub mod schedule_canvas;
pub mod status_bar;

#[cfg(feature = "hydrate")]
use gantt::engine::{Action, ScheduleController};
#[cfg(feature = "hydrate")]
use gantt::geometry::{Point, ViewTransform};
#[cfg(feature = "hydrate")]
use leptos::prelude::{ReadUntracked, RwSignal, UpdateUntracked};

#[cfg(feature = "hydrate")]
use crate::state::plan::PlanUi;

/// Pointer position relative to the canvas host, mapped into canvas
/// coordinates. Refreshes the controller's view transform from the host's
/// current CSS width on every call, so resizes never need their own
/// listener.
#[cfg(feature = "hydrate")]
pub(crate) fn canvas_screen_point(
    ev: &web_sys::PointerEvent,
    host: &web_sys::HtmlDivElement,
    controller: RwSignal<ScheduleController>,
) -> Point {
    let rect = host.get_bounding_client_rect();
    // transform changes don't affect the scene, only input mapping
    controller.update_untracked(|c| {
        c.set_view_transform(ViewTransform::for_css_width(rect.width()));
    });
    Point::new(
        f64::from(ev.client_x()) - rect.left(),
        f64::from(ev.client_y()) - rect.top(),
    )
}

/// Run engine actions for the plan currently on screen.
#[cfg(feature = "hydrate")]
pub(crate) fn dispatch_for_plan(
    actions: Vec<Action>,
    controller: RwSignal<ScheduleController>,
    ui: RwSignal<PlanUi>,
) {
    if actions.is_empty() {
        return;
    }
    let Some(plan_id) = ui.read_untracked().plan_id else {
        return;
    };
    crate::net::dispatch::run_actions(plan_id, actions, controller, ui);
}
