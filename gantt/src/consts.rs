//! Named design constants for the schedule board.
//!
//! The thresholds and limits here mirror runtime configuration of unclear
//! provenance (business rule vs. UI heuristic); hosts should treat them as
//! configurable defaults, not invariants.

// ── Interaction ─────────────────────────────────────────────────

/// Euclidean pointer displacement (CSS pixels) past which a pressed bar
/// switches from "click candidate" to "drag".
pub const DRAG_THRESHOLD_PX: f64 = 5.0;

/// A completed drag is only submitted to the solver when the lane changed or
/// the start date shifted by more than this many days.
pub const SIGNIFICANT_MOVE_DAYS: i64 = 2;

/// Maximum number of distinct crop kinds (base names, varieties excluded)
/// allowed on one schedule. Placing more of an already-present kind is fine.
pub const MAX_CROP_KINDS: usize = 5;

/// Seconds to wait for a terminal push message after a request was accepted
/// before forcing a full reload.
pub const FALLBACK_TIMEOUT_SECS: u64 = 30;

// ── Grid geometry ───────────────────────────────────────────────

/// Total canvas content width in canvas units.
pub const CONTENT_WIDTH: f64 = 1200.0;

/// X coordinate of the time-axis origin (left edge of day zero).
pub const AXIS_ORIGIN_X: f64 = 80.0;

/// Right margin beyond the last day column.
pub const MARGIN_RIGHT: f64 = 40.0;

/// Height of the month/year header band above the first lane row.
pub const HEADER_HEIGHT: f64 = 60.0;

/// Height of one lane row.
pub const ROW_HEIGHT: f64 = 70.0;

/// Height of an allocation bar within its row.
pub const BAR_HEIGHT: f64 = 50.0;

/// Vertical padding between the row top and the bar top.
pub const BAR_PADDING: f64 = 10.0;

/// Bottom margin below the last lane row.
pub const MARGIN_BOTTOM: f64 = 20.0;

/// Height reserved under the lanes for the add-lane button.
pub const FOOTER_HEIGHT: f64 = 48.0;
