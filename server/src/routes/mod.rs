//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the schedule REST API and the push-channel websocket,
//! and stitches them with Leptos SSR rendering under a single Axum router.
//! The Leptos app serves the plan pages; `/pkg` carries the compiled WASM
//! and CSS.

pub mod plans;
pub mod ws;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::state::AppState;

/// REST + websocket API routes.
fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/plans", get(plans::list_plans))
        .route("/api/plans/{id}/schedule", get(plans::get_schedule))
        .route("/api/plans/{id}/catalog", get(plans::get_catalog))
        .route("/api/plans/{id}/adjust", post(plans::adjust))
        .route(
            "/api/plans/{id}/allocations",
            post(plans::create_allocation),
        )
        .route(
            "/api/plans/{id}/allocations/{allocation_id}",
            get(plans::get_allocation),
        )
        .route("/api/plans/{id}/lanes", post(plans::create_lane))
        .route("/api/plans/{id}/lanes/{lane_id}", delete(plans::delete_lane))
        .route("/api/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

/// Full application router: API + Leptos SSR + static assets.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded.
pub fn app(state: AppState) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(api_routes(state)
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg"))))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
