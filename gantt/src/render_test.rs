#![allow(clippy::float_cmp)]

use super::*;
use crate::consts::*;
use crate::geometry::{GridGeometry, Point};
use crate::model::{Allocation, AllocationOutcome, CropRef, Lane, Schedule};
use time::Date;
use time::macros::date;
use uuid::Uuid;

fn alloc(lane_id: Uuid, kind: &str, start: Date, end: Date) -> Allocation {
    Allocation {
        id: Uuid::new_v4(),
        lane_id,
        crop: CropRef { id: Uuid::new_v4(), kind: kind.to_string(), variety: None },
        start,
        end,
        outcome: AllocationOutcome::default(),
    }
}

/// Two lanes over a 360-day range (day_width 3.0); lane 0 holds a lettuce
/// bar 10 days in, lane 1 is empty.
fn fixture() -> (Schedule, GridGeometry) {
    let lane_a = Lane { id: Uuid::new_v4(), name: "Bed A".into(), area_sq_m: 120.0 };
    let lane_b = Lane { id: Uuid::new_v4(), name: "Bed B".into(), area_sq_m: 80.0 };
    let schedule = Schedule {
        id: Uuid::new_v4(),
        plan_start: date!(2024 - 04 - 01),
        plan_end: date!(2025 - 03 - 27),
        lanes: vec![lane_a.clone(), lane_b],
        allocations: vec![alloc(
            lane_a.id,
            "Lettuce",
            date!(2024 - 04 - 11),
            date!(2024 - 05 - 21),
        )],
    };
    let geometry = GridGeometry::new(schedule.plan_start, schedule.plan_end, schedule.lanes.len());
    (schedule, geometry)
}

// --- Bars ---

#[test]
fn bar_position_follows_grid_geometry() {
    let (s, g) = fixture();
    let scene = scene(&s, &g, &Overlay::default());
    assert_eq!(scene.bars.len(), 1);
    let bar = &scene.bars[0];
    assert_eq!(bar.x, AXIS_ORIGIN_X + 30.0);
    assert_eq!(bar.y, HEADER_HEIGHT + BAR_PADDING);
    assert_eq!(bar.width, 120.0);
    assert_eq!(bar.height, BAR_HEIGHT);
}

#[test]
fn bar_label_is_the_crop_name() {
    let (s, g) = fixture();
    let scene = scene(&s, &g, &Overlay::default());
    assert_eq!(scene.bars[0].label, "Lettuce");
}

#[test]
fn zero_duration_bar_keeps_minimum_width() {
    let (mut s, g) = fixture();
    s.allocations[0].end = s.allocations[0].start;
    let scene = scene(&s, &g, &Overlay::default());
    assert_eq!(scene.bars[0].width, 2.0);
}

#[test]
fn drag_override_moves_the_bar_and_marks_it() {
    let (s, g) = fixture();
    let overlay = Overlay {
        drag: Some(DragOverride {
            allocation_id: s.allocations[0].id,
            position: Point::new(400.0, 200.0),
        }),
        ..Overlay::default()
    };
    let scene = scene(&s, &g, &overlay);
    let bar = &scene.bars[0];
    assert!(bar.dragged);
    assert_eq!(bar.x, 400.0);
    assert_eq!(bar.y, 200.0);
}

#[test]
fn drag_override_for_other_allocation_changes_nothing() {
    let (s, g) = fixture();
    let overlay = Overlay {
        drag: Some(DragOverride {
            allocation_id: Uuid::new_v4(),
            position: Point::new(400.0, 200.0),
        }),
        ..Overlay::default()
    };
    let scene = scene(&s, &g, &overlay);
    assert!(!scene.bars[0].dragged);
}

#[test]
fn dragged_bar_draws_last() {
    let (mut s, g) = fixture();
    let lane = s.lanes[0].id;
    s.allocations.push(alloc(lane, "Carrot", date!(2024 - 07 - 01), date!(2024 - 08 - 01)));
    let dragged_id = s.allocations[0].id;
    let overlay = Overlay {
        drag: Some(DragOverride { allocation_id: dragged_id, position: Point::new(0.0, 0.0) }),
        ..Overlay::default()
    };
    let scene = scene(&s, &g, &overlay);
    assert_eq!(scene.bars.last().map(|b| b.allocation_id), Some(dragged_id));
}

// --- Colors ---

#[test]
fn colors_assigned_by_first_appearance() {
    let (mut s, _) = fixture();
    let lane = s.lanes[0].id;
    s.allocations.push(alloc(lane, "Carrot", date!(2024 - 07 - 01), date!(2024 - 08 - 01)));
    assert_eq!(color_for_kind(&s, "Lettuce"), CROP_COLORS[0]);
    assert_eq!(color_for_kind(&s, "Carrot"), CROP_COLORS[1]);
}

#[test]
fn color_is_stable_per_kind_across_varieties() {
    let (mut s, _) = fixture();
    let lane = s.lanes[0].id;
    let mut second = alloc(lane, "Lettuce", date!(2024 - 08 - 01), date!(2024 - 09 - 01));
    second.crop.variety = Some("Oakleaf".into());
    s.allocations.push(second);
    assert_eq!(color_for_kind(&s, "Lettuce"), CROP_COLORS[0]);
}

// --- Lane rows ---

#[test]
fn lane_rows_cover_all_lanes() {
    let (s, g) = fixture();
    let scene = scene(&s, &g, &Overlay::default());
    assert_eq!(scene.lane_rows.len(), 2);
    assert_eq!(scene.lane_rows[0].y, HEADER_HEIGHT);
    assert_eq!(scene.lane_rows[1].y, HEADER_HEIGHT + ROW_HEIGHT);
}

#[test]
fn only_empty_lanes_are_removable() {
    let (s, g) = fixture();
    let scene = scene(&s, &g, &Overlay::default());
    assert!(!scene.lane_rows[0].removable);
    assert!(scene.lane_rows[1].removable);
}

#[test]
fn highlight_overlay_marks_one_row() {
    let (s, g) = fixture();
    let overlay = Overlay { highlight_lane: Some(1), ..Overlay::default() };
    let scene = scene(&s, &g, &overlay);
    assert!(!scene.lane_rows[0].highlighted);
    assert!(scene.lane_rows[1].highlighted);
}

// --- Month labels ---

#[test]
fn month_labels_start_at_the_range_start_month() {
    let (s, g) = fixture();
    let scene = scene(&s, &g, &Overlay::default());
    let first = &scene.month_labels[0];
    assert_eq!(first.label, "Apr 2024");
    assert_eq!(first.x, AXIS_ORIGIN_X);
}

#[test]
fn month_labels_span_the_range() {
    let (s, g) = fixture();
    let scene = scene(&s, &g, &Overlay::default());
    // Apr 2024 through Mar 2025 inclusive
    assert_eq!(scene.month_labels.len(), 12);
    assert_eq!(scene.month_labels.last().map(|l| l.label.as_str()), Some("Mar 2025"));
}

#[test]
fn mid_month_range_start_skips_to_next_first() {
    let g = GridGeometry::new(date!(2024 - 04 - 15), date!(2024 - 08 - 15), 1);
    let s = Schedule {
        id: Uuid::new_v4(),
        plan_start: date!(2024 - 04 - 15),
        plan_end: date!(2024 - 08 - 15),
        lanes: vec![],
        allocations: vec![],
    };
    let scene = scene(&s, &g, &Overlay::default());
    assert_eq!(scene.month_labels[0].label, "May 2024");
}

// --- Frame ---

#[test]
fn scene_dimensions_match_geometry() {
    let (s, g) = fixture();
    let scene = scene(&s, &g, &Overlay::default());
    assert_eq!(scene.width, CONTENT_WIDTH);
    assert_eq!(scene.height, g.content_height());
}

#[test]
fn ghost_passes_through_from_overlay() {
    let (s, g) = fixture();
    let overlay = Overlay {
        ghost: Some(Ghost { x: 300.0, y: 150.0, label: "Tomato".into() }),
        ..Overlay::default()
    };
    let scene = scene(&s, &g, &overlay);
    assert_eq!(scene.ghost.as_ref().map(|g| g.label.as_str()), Some("Tomato"));
}

#[test]
fn add_lane_button_sits_below_the_last_row() {
    let (s, g) = fixture();
    let scene = scene(&s, &g, &Overlay::default());
    assert!(scene.add_lane.y > g.lane_index_to_y(1));
}
