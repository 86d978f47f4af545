//! # client
//!
//! Leptos + WASM frontend for the cultivation schedule board. Hosts the
//! pure `gantt` engine: DOM pointer events are converted to engine calls,
//! and the engine's returned actions are executed here (HTTP, the push
//! channel, timers, navigation).

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;

/// WASM entry point for hydration.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
