//! Push-channel websocket — server-to-client solver status relay.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade with `?plan={id}` → subscriber registered on the plan
//! 2. Solver jobs and lane routes broadcast `PushMessage`s → forwarded
//! 3. Close (or send failure) → subscriber removed
//!
//! The channel is strictly one-way; anything a client sends is ignored.

use std::collections::HashMap;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use gantt::wire::PushMessage;

use crate::state::AppState;

pub async fn handle_ws(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(plan_id) = params.get("plan").and_then(|p| Uuid::parse_str(p).ok()) else {
        return (StatusCode::BAD_REQUEST, "plan query parameter required").into_response();
    };
    if !state.plans.read().await.contains_key(&plan_id) {
        return (StatusCode::NOT_FOUND, "unknown plan").into_response();
    }
    ws.on_upgrade(move |socket| run_ws(socket, state, plan_id))
}

async fn run_ws(mut socket: WebSocket, state: AppState, plan_id: Uuid) {
    let subscriber_id = Uuid::new_v4();
    let (tx, mut rx) = mpsc::channel::<PushMessage>(64);

    {
        let mut plans = state.plans.write().await;
        let Some(plan) = plans.get_mut(&plan_id) else {
            return;
        };
        plan.subscribers.insert(subscriber_id, tx);
    }
    info!(%subscriber_id, %plan_id, "push: client subscribed");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    None | Some(Err(_)) | Some(Ok(Message::Close(_))) => break,
                    // one-way channel: drop anything else the client sends
                    Some(Ok(_)) => {}
                }
            }
            push = rx.recv() => {
                let Some(push) = push else { break };
                let Ok(json) = serde_json::to_string(&push) else { continue };
                if socket.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    let mut plans = state.plans.write().await;
    if let Some(plan) = plans.get_mut(&plan_id) {
        plan.subscribers.remove(&subscriber_id);
    }
    info!(%subscriber_id, "push: client disconnected");
}
