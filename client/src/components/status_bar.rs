//! Bottom status bar: push-channel state, sync indicator, notices.

use leptos::prelude::*;

use gantt::engine::ScheduleController;

use crate::state::plan::{ConnectionStatus, PlanUi};

/// Status bar at the bottom of the plan page.
#[component]
pub fn StatusBar() -> impl IntoView {
    let controller = expect_context::<RwSignal<ScheduleController>>();
    let ui = expect_context::<RwSignal<PlanUi>>();

    let status_class = move || match ui.read().connection {
        ConnectionStatus::Connected => "status-bar__dot status-bar__dot--connected",
        ConnectionStatus::Connecting => "status-bar__dot status-bar__dot--connecting",
        ConnectionStatus::Disconnected => "status-bar__dot status-bar__dot--disconnected",
    };

    let status_label = move || match ui.read().connection {
        ConnectionStatus::Connected => "Connected",
        ConnectionStatus::Connecting => "Connecting...",
        ConnectionStatus::Disconnected => "Disconnected",
    };

    let busy = move || controller.read().busy();

    let on_notice_click = move |_ev: leptos::ev::MouseEvent| {
        ui.update(PlanUi::clear_notice);
    };

    view! {
        <div class="status-bar">
            <span class="status-bar__connection">
                <span class=status_class></span>
                {status_label}
            </span>
            <Show when=busy>
                <span class="status-bar__divider">"|"</span>
                <span class="status-bar__syncing">"Syncing\u{2026}"</span>
            </Show>
            {move || {
                ui.read().notice.clone().map(|notice| {
                    view! {
                        <span class="status-bar__spacer"></span>
                        <span class="status-bar__notice" on:click=on_notice_click>
                            {notice}
                        </span>
                    }
                })
            }}
        </div>
    }
}
