//! Scheduling and drag engine for the cultivation plan board.
//!
//! This crate is compiled to WebAssembly and runs in the browser, but holds
//! no browser types: pointer input, the canvas transform, and the rendered
//! scene are all expressed as plain data so every behavior is testable with
//! `cargo test` on the host. The leptos client is responsible only for wiring
//! DOM events into the [`engine::ScheduleController`] and executing the
//! [`engine::Action`]s it returns (HTTP calls, timers, re-render).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | The per-view controller and its reconciliation protocol |
//! | [`model`] | Lanes, allocations, and snapshot-style schedule mutations |
//! | [`geometry`] | Date/lane ⇄ pixel mapping and the screen transform |
//! | [`input`] | Click-vs-drag state machine for bars and palette items |
//! | [`palette`] | Catalog items and the crop-kind limit guard |
//! | [`changes`] | The pending (not yet server-confirmed) change set |
//! | [`render`] | Pure scene derivation: `scene(model) -> view` |
//! | [`wire`] | Serde types shared with the backend |
//! | [`consts`] | Named design constants (thresholds, grid metrics) |

pub mod changes;
pub mod consts;
pub mod engine;
pub mod geometry;
pub mod input;
pub mod model;
pub mod palette;
pub mod render;
pub mod wire;
