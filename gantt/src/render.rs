//! Pure scene derivation: `scene(schedule, geometry, overlay) -> Scene`.
//!
//! The scene is plain data the client maps 1:1 onto SVG nodes. Deriving it
//! from scratch on every state change (rather than patching a retained
//! drawing) keeps the view trivially consistent with the model: optimistic
//! updates, rollbacks, and authoritative pushes all go through the same
//! path.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use time::{Date, Month};
use uuid::Uuid;

use crate::consts::*;
use crate::geometry::{GridGeometry, Point};
use crate::model::Schedule;

/// Fill colors assigned to crop kinds by first appearance in the schedule.
/// Kinds past the palette wrap around.
pub const CROP_COLORS: [&str; 10] = [
    "#4e79a7", "#f28e2b", "#59a14f", "#e15759", "#76b7b2", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ac",
];

/// A month tick on the header axis.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthLabel {
    pub x: f64,
    pub label: String,
}

/// One lane row: background stripe, name label, and remove affordance.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneRow {
    pub lane_id: Uuid,
    pub y: f64,
    pub name: String,
    /// Remove is enabled only for empty lanes; the button renders disabled
    /// otherwise, never hidden.
    pub removable: bool,
    pub highlighted: bool,
}

/// One allocation bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub allocation_id: Uuid,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: &'static str,
    pub label: String,
    /// True while this bar is the one being dragged; it renders on top
    /// with reduced opacity.
    pub dragged: bool,
}

/// Ghost card following the pointer during a palette drag.
#[derive(Debug, Clone, PartialEq)]
pub struct Ghost {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

/// The add-lane button under the last row.
#[derive(Debug, Clone, PartialEq)]
pub struct AddLaneButton {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Transient view state layered over the model: the dragged bar's free
/// position, the target-lane highlight, and the palette ghost.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub drag: Option<DragOverride>,
    pub highlight_lane: Option<usize>,
    pub ghost: Option<Ghost>,
}

/// Free-floating position for the bar under drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOverride {
    pub allocation_id: Uuid,
    pub position: Point,
}

/// Everything the canvas draws, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub month_labels: Vec<MonthLabel>,
    pub lane_rows: Vec<LaneRow>,
    pub bars: Vec<Bar>,
    pub ghost: Option<Ghost>,
    pub add_lane: AddLaneButton,
}

/// Derive the full scene for one schedule.
#[must_use]
pub fn scene(schedule: &Schedule, geometry: &GridGeometry, overlay: &Overlay) -> Scene {
    let mut bars = Vec::with_capacity(schedule.allocations.len());
    for (index, group) in schedule.lane_groups().iter().enumerate() {
        for alloc in &group.allocations {
            let color = color_for_kind(schedule, &alloc.crop.kind);
            let x = geometry.date_to_x(alloc.start);
            let width = (geometry.date_to_x(alloc.end) - x).max(2.0);
            let mut bar = Bar {
                allocation_id: alloc.id,
                x,
                y: geometry.lane_index_to_y(index) + BAR_PADDING,
                width,
                height: BAR_HEIGHT,
                color,
                label: alloc.crop.display_name(),
                dragged: false,
            };
            if let Some(drag) = &overlay.drag {
                if drag.allocation_id == alloc.id {
                    bar.x = drag.position.x;
                    bar.y = drag.position.y;
                    bar.dragged = true;
                }
            }
            bars.push(bar);
        }
    }
    // dragged bar last so it draws on top
    bars.sort_by_key(Bar::is_dragged);

    let lane_rows = schedule
        .lanes
        .iter()
        .enumerate()
        .map(|(index, lane)| LaneRow {
            lane_id: lane.id,
            y: geometry.lane_index_to_y(index),
            name: lane.name.clone(),
            removable: schedule.lane_is_empty(lane.id),
            highlighted: overlay.highlight_lane == Some(index),
        })
        .collect();

    Scene {
        width: CONTENT_WIDTH,
        height: geometry.content_height(),
        month_labels: month_labels(geometry),
        lane_rows,
        bars,
        ghost: overlay.ghost.clone(),
        add_lane: AddLaneButton {
            x: AXIS_ORIGIN_X,
            y: geometry.footer_y() + 8.0,
            width: 160.0,
            height: FOOTER_HEIGHT - 16.0,
        },
    }
}

impl Bar {
    fn is_dragged(&self) -> bool {
        self.dragged
    }
}

/// Color for a base crop kind, assigned by first appearance in the
/// allocation list so colors stay stable while bars move.
#[must_use]
pub fn color_for_kind(schedule: &Schedule, kind: &str) -> &'static str {
    let mut seen: Vec<&str> = Vec::new();
    for alloc in &schedule.allocations {
        let k = alloc.crop.kind.as_str();
        if !seen.contains(&k) {
            seen.push(k);
        }
        if k == kind {
            break;
        }
    }
    let index = seen.iter().position(|k| *k == kind).unwrap_or(seen.len());
    CROP_COLORS[index % CROP_COLORS.len()]
}

/// Header ticks at each first-of-month inside the visible range.
fn month_labels(geometry: &GridGeometry) -> Vec<MonthLabel> {
    let mut labels = Vec::new();
    let mut d = match first_of_month(geometry.range_start()) {
        Some(d) if d >= geometry.range_start() => d,
        Some(d) => match first_of_next_month(d) {
            Some(next) => next,
            None => return labels,
        },
        None => return labels,
    };
    while d <= geometry.range_end() {
        labels.push(MonthLabel {
            x: geometry.date_to_x(d),
            label: format!("{} {}", month_abbrev(d.month()), d.year()),
        });
        match first_of_next_month(d) {
            Some(next) => d = next,
            None => break,
        }
    }
    labels
}

fn first_of_month(d: Date) -> Option<Date> {
    Date::from_calendar_date(d.year(), d.month(), 1).ok()
}

fn first_of_next_month(d: Date) -> Option<Date> {
    let (year, month) = if d.month() == Month::December {
        (d.year() + 1, Month::January)
    } else {
        (d.year(), d.month().next())
    };
    Date::from_calendar_date(year, month, 1).ok()
}

fn month_abbrev(m: Month) -> &'static str {
    match m {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
