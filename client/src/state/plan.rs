//! View state for one open plan page.
//!
//! The schedule itself (and all drag/reconciliation state) lives inside
//! `gantt::engine::ScheduleController`, held in its own signal. This state
//! carries only what the chrome around the canvas needs: the catalog, the
//! push-channel status, the current notice, and the open detail view.

#[cfg(test)]
#[path = "plan_test.rs"]
mod plan_test;

use gantt::model::Allocation;
use gantt::palette::CatalogItem;
use uuid::Uuid;

/// Push-channel connection status, shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Disconnected,
}

/// State for the plan page chrome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanUi {
    pub plan_id: Option<Uuid>,
    pub catalog: Vec<CatalogItem>,
    pub connection: ConnectionStatus,
    /// Transient user-facing message (validation errors, solver rejections).
    pub notice: Option<String>,
    /// Allocation open in the detail panel.
    pub detail: Option<Allocation>,
    pub show_add_lane: bool,
}

impl PlanUi {
    pub fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// Reset everything tied to a specific plan when the route changes.
    pub fn reset_for_plan(&mut self, plan_id: Uuid) {
        self.plan_id = Some(plan_id);
        self.catalog.clear();
        self.connection = ConnectionStatus::Connecting;
        self.notice = None;
        self.detail = None;
        self.show_add_lane = false;
    }
}
