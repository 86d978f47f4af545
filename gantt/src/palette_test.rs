use super::*;
use crate::consts::{AXIS_ORIGIN_X, HEADER_HEIGHT};
use crate::geometry::{GridGeometry, Point};
use crate::model::{Allocation, AllocationOutcome, CropRef, Lane, Schedule};
use time::Date;
use time::macros::date;
use uuid::Uuid;

fn item(kind: &str) -> CatalogItem {
    CatalogItem { id: Uuid::new_v4(), kind: kind.to_string(), variety: None }
}

fn alloc(lane_id: Uuid, kind: &str, start: Date) -> Allocation {
    Allocation {
        id: Uuid::new_v4(),
        lane_id,
        crop: CropRef { id: Uuid::new_v4(), kind: kind.to_string(), variety: None },
        start,
        end: start + time::Duration::days(30),
        outcome: AllocationOutcome::default(),
    }
}

/// Schedule with `kinds.len()` distinct crop kinds on one lane.
fn schedule_with_kinds(kinds: &[&str]) -> Schedule {
    let lane = Lane { id: Uuid::new_v4(), name: "Bed A".into(), area_sq_m: 100.0 };
    let allocations = kinds
        .iter()
        .map(|k| alloc(lane.id, k, date!(2024 - 05 - 01)))
        .collect();
    Schedule {
        id: Uuid::new_v4(),
        plan_start: date!(2024 - 04 - 01),
        plan_end: date!(2025 - 03 - 27),
        lanes: vec![lane],
        allocations,
    }
}

fn grid() -> GridGeometry {
    GridGeometry::new(date!(2024 - 04 - 01), date!(2025 - 03 - 27), 1)
}

// --- Kind limit ---

#[test]
fn new_kind_under_the_limit_passes() {
    let s = schedule_with_kinds(&["Lettuce", "Carrot"]);
    assert_eq!(check_kind_limit(&s, "Tomato"), Ok(()));
}

#[test]
fn existing_kind_at_the_limit_passes() {
    let s = schedule_with_kinds(&["Lettuce", "Carrot", "Tomato", "Kale", "Leek"]);
    assert_eq!(check_kind_limit(&s, "Kale"), Ok(()));
}

#[test]
fn new_kind_at_the_limit_is_rejected() {
    let s = schedule_with_kinds(&["Lettuce", "Carrot", "Tomato", "Kale", "Leek"]);
    assert_eq!(
        check_kind_limit(&s, "Radish"),
        Err(DropError::TooManyKinds { kind: "Radish".into() })
    );
}

#[test]
fn rejection_message_names_the_crop() {
    let err = DropError::TooManyKinds { kind: "Radish".into() };
    let msg = err.to_string();
    assert!(msg.contains("Radish"));
    assert!(msg.contains('5'));
}

#[test]
fn empty_schedule_accepts_any_kind() {
    let s = schedule_with_kinds(&[]);
    assert_eq!(check_kind_limit(&s, "Lettuce"), Ok(()));
}

// --- Session ---

#[test]
fn ghost_tracks_the_pointer() {
    let mut session = PaletteSession::begin(item("Lettuce"), Point::new(10.0, 10.0));
    let p = session.update(Point::new(300.0, 120.0));
    assert_eq!(p, Point::new(300.0, 120.0));
}

#[test]
fn drop_on_grid_resolves_lane_and_date() {
    let s = schedule_with_kinds(&["Lettuce"]);
    let g = grid();
    let mut session = PaletteSession::begin(item("Carrot"), Point::new(0.0, 0.0));
    session.update(Point::new(AXIS_ORIGIN_X + 30.0, HEADER_HEIGHT + 10.0));
    let slot = session.release(&g, &s).unwrap();
    assert_eq!(slot.lane_index, 0);
    assert_eq!(slot.date, date!(2024 - 04 - 11));
}

#[test]
fn drop_in_header_is_rejected() {
    let s = schedule_with_kinds(&["Lettuce"]);
    let g = grid();
    let mut session = PaletteSession::begin(item("Carrot"), Point::new(0.0, 0.0));
    session.update(Point::new(400.0, HEADER_HEIGHT - 5.0));
    assert_eq!(session.release(&g, &s), Err(DropError::OutsideGrid));
}

#[test]
fn drop_left_of_axis_is_rejected() {
    let s = schedule_with_kinds(&["Lettuce"]);
    let g = grid();
    let mut session = PaletteSession::begin(item("Carrot"), Point::new(0.0, 0.0));
    session.update(Point::new(AXIS_ORIGIN_X - 10.0, HEADER_HEIGHT + 10.0));
    assert_eq!(session.release(&g, &s), Err(DropError::OutsideGrid));
}

#[test]
fn kind_limit_applies_on_release() {
    let s = schedule_with_kinds(&["Lettuce", "Carrot", "Tomato", "Kale", "Leek"]);
    let g = grid();
    let mut session = PaletteSession::begin(item("Radish"), Point::new(0.0, 0.0));
    session.update(Point::new(AXIS_ORIGIN_X + 30.0, HEADER_HEIGHT + 10.0));
    assert_eq!(
        session.release(&g, &s),
        Err(DropError::TooManyKinds { kind: "Radish".into() })
    );
}
