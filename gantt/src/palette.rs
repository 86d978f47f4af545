//! The crop palette: catalog items that can be dragged onto the chart to
//! create new allocations.
//!
//! A palette drag is simpler than a bar drag: there is no click-vs-drag
//! ambiguity (the card is not clickable) and no snap-back, so the session is
//! just a ghost following the pointer until release. The drop is validated
//! here, before any network call: it must land on the grid, and it must not
//! push the schedule past the distinct crop-kind limit.

#[cfg(test)]
#[path = "palette_test.rs"]
mod palette_test;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::consts::MAX_CROP_KINDS;
use crate::geometry::{GridGeometry, GridSlot, Point};
use crate::model::Schedule;

/// A crop available for planting, as listed in the palette panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: Uuid,
    pub kind: String,
    pub variety: Option<String>,
}

impl CatalogItem {
    /// Label shown on the palette card, `"Kind (Variety)"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.variety {
            Some(variety) => format!("{} ({variety})", self.kind),
            None => self.kind.clone(),
        }
    }
}

/// Why a palette drop was rejected client-side.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DropError {
    #[error("drop outside the schedule grid")]
    OutsideGrid,
    #[error("a plan can grow at most {MAX_CROP_KINDS} different crops; {kind} would be a new one")]
    TooManyKinds { kind: String },
}

/// Reject a drop that would introduce a crop kind past the limit.
///
/// Kinds already on the schedule always pass, however many allocations they
/// have; only a *new* base kind counts against [`MAX_CROP_KINDS`].
pub fn check_kind_limit(schedule: &Schedule, kind: &str) -> Result<(), DropError> {
    if schedule.has_crop_kind(kind) {
        return Ok(());
    }
    if schedule.distinct_crop_kinds() >= MAX_CROP_KINDS {
        return Err(DropError::TooManyKinds { kind: kind.to_string() });
    }
    Ok(())
}

/// One in-progress drag of a catalog item over the chart.
#[derive(Debug, Clone)]
pub struct PaletteSession {
    item: CatalogItem,
    last: Point,
}

impl PaletteSession {
    #[must_use]
    pub fn begin(item: CatalogItem, start: Point) -> Self {
        Self { item, last: start }
    }

    #[must_use]
    pub fn item(&self) -> &CatalogItem {
        &self.item
    }

    /// Move the ghost. Returns the pointer position; the host centers the
    /// ghost card on it.
    pub fn update(&mut self, p: Point) -> Point {
        self.last = p;
        p
    }

    /// Resolve the drop. The ghost is removed by the host regardless of
    /// the result.
    pub fn release(
        &self,
        geometry: &GridGeometry,
        schedule: &Schedule,
    ) -> Result<GridSlot, DropError> {
        let slot = geometry.locate(self.last).ok_or(DropError::OutsideGrid)?;
        check_kind_limit(schedule, &self.item.kind)?;
        Ok(slot)
    }
}
