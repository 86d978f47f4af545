//! Push-channel client for solver status messages.
//!
//! The server broadcasts a [`gantt::wire::PushMessage`] per plan whenever a
//! solver job changes state. This client owns the WebSocket lifecycle:
//! connect, reconnect with exponential backoff, parse, and feed each message
//! into the schedule controller. The channel is receive-only; all mutations
//! go over REST.
//!
//! Gated behind `#[cfg(feature = "hydrate")]` since it needs a browser.

#[cfg(feature = "hydrate")]
use std::cell::Cell;
#[cfg(feature = "hydrate")]
use std::rc::Rc;

#[cfg(feature = "hydrate")]
use gantt::engine::ScheduleController;
#[cfg(feature = "hydrate")]
use gantt::wire::PushMessage;
#[cfg(feature = "hydrate")]
use leptos::prelude::{RwSignal, Update};
#[cfg(feature = "hydrate")]
use uuid::Uuid;

#[cfg(feature = "hydrate")]
use crate::state::plan::{ConnectionStatus, PlanUi};

/// Spawn the push client loop for one plan.
///
/// Returns an alive flag; set it to `false` (from `on_cleanup`) and the loop
/// exits after the current connection drops instead of reconnecting.
#[cfg(feature = "hydrate")]
pub fn spawn_push_client(
    plan_id: Uuid,
    controller: RwSignal<ScheduleController>,
    ui: RwSignal<PlanUi>,
) -> Rc<Cell<bool>> {
    let alive = Rc::new(Cell::new(true));
    leptos::task::spawn_local(push_client_loop(plan_id, controller, ui, Rc::clone(&alive)));
    alive
}

/// Main connection loop with reconnect logic.
#[cfg(feature = "hydrate")]
async fn push_client_loop(
    plan_id: Uuid,
    controller: RwSignal<ScheduleController>,
    ui: RwSignal<PlanUi>,
    alive: Rc<Cell<bool>>,
) {
    let mut backoff_ms: u32 = 1000;
    let max_backoff_ms: u32 = 10_000;

    while alive.get() {
        ui.update(|u| u.connection = ConnectionStatus::Connecting);

        let location = web_sys::window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default();
        let ws_proto = if location.starts_with("https") { "wss" } else { "ws" };
        let host = web_sys::window()
            .and_then(|w| w.location().host().ok())
            .unwrap_or_else(|| "localhost:3000".to_owned());
        let ws_url = format!("{ws_proto}://{host}/api/ws?plan={plan_id}");

        match connect_and_run(&ws_url, plan_id, controller, ui, &alive).await {
            Ok(()) => {
                leptos::logging::log!("push channel closed");
                backoff_ms = 1000;
            }
            Err(e) => {
                leptos::logging::warn!("push channel error: {e}");
            }
        }

        if !alive.get() {
            break;
        }
        ui.update(|u| u.connection = ConnectionStatus::Disconnected);

        gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(backoff_ms))).await;
        backoff_ms = (backoff_ms * 2).min(max_backoff_ms);
    }
}

/// Connect and process messages until the socket drops or the page unmounts.
#[cfg(feature = "hydrate")]
async fn connect_and_run(
    url: &str,
    plan_id: Uuid,
    controller: RwSignal<ScheduleController>,
    ui: RwSignal<PlanUi>,
    alive: &Rc<Cell<bool>>,
) -> Result<(), String> {
    use futures::StreamExt;
    use gloo_net::websocket::Message;
    use gloo_net::websocket::futures::WebSocket;

    let mut ws = WebSocket::open(url).map_err(|e| e.to_string())?;

    ui.update(|u| u.connection = ConnectionStatus::Connected);

    while let Some(msg) = ws.next().await {
        if !alive.get() {
            return Ok(());
        }
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<PushMessage>(&text) {
                Ok(push) => {
                    let next = controller
                        .try_update(|c| c.on_push(push))
                        .unwrap_or_default();
                    crate::net::dispatch::run_actions(plan_id, next, controller, ui);
                }
                Err(e) => {
                    // an undecodable message may have been the terminal one;
                    // let the controller roll back rather than time out
                    leptos::logging::warn!("push parse error: {e}");
                    let next = controller
                        .try_update(ScheduleController::push_malformed)
                        .unwrap_or_default();
                    crate::net::dispatch::run_actions(plan_id, next, controller, ui);
                }
            },
            Ok(Message::Bytes(_)) => {}
            Err(e) => {
                return Err(e.to_string());
            }
        }
    }

    Ok(())
}
