#![allow(clippy::float_cmp)]

use super::*;
use crate::consts::*;
use time::macros::date;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// 360-day range: day_width = 1080 / 360 = 3.0 canvas units.
fn grid() -> GridGeometry {
    GridGeometry::new(date!(2024 - 04 - 01), date!(2025 - 03 - 27), 4)
}

// --- Point ---

#[test]
fn point_dist_pythagorean() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(3.0, 4.0);
    assert!(approx_eq(a.dist(b), 5.0));
}

#[test]
fn point_dist_is_symmetric() {
    let a = Point::new(-2.0, 7.0);
    let b = Point::new(5.0, 1.0);
    assert!(approx_eq(a.dist(b), b.dist(a)));
}

#[test]
fn point_dist_zero_for_same_point() {
    let p = Point::new(9.0, 9.0);
    assert_eq!(p.dist(p), 0.0);
}

// --- ViewTransform ---

#[test]
fn view_transform_default_is_identity() {
    let t = ViewTransform::default();
    let p = t.to_canvas(Point::new(50.0, 75.0));
    assert_eq!(p, Point::new(50.0, 75.0));
}

#[test]
fn view_transform_scales_from_css_width() {
    // element displayed at 600px, content width 1200 -> scale 2.0
    let t = ViewTransform::for_css_width(600.0);
    let p = t.to_canvas(Point::new(100.0, 40.0));
    assert!(approx_eq(p.x, 200.0));
    assert!(approx_eq(p.y, 80.0));
}

#[test]
fn view_transform_zero_width_falls_back_to_identity() {
    let t = ViewTransform::for_css_width(0.0);
    assert_eq!(t.scale, 1.0);
}

// --- Range handling ---

#[test]
fn degenerate_range_falls_back_to_one_year() {
    let g = GridGeometry::new(date!(2024 - 04 - 01), date!(2024 - 04 - 01), 2);
    assert_eq!(g.total_days(), 365);
    assert_eq!(g.range_end(), date!(2025 - 04 - 01));
}

#[test]
fn inverted_range_falls_back_to_one_year() {
    let g = GridGeometry::new(date!(2024 - 04 - 01), date!(2023 - 01 - 01), 2);
    assert_eq!(g.range_end(), date!(2025 - 04 - 01));
}

#[test]
fn total_days_for_valid_range() {
    assert_eq!(grid().total_days(), 360);
}

// --- Widths and heights ---

#[test]
fn chart_width_excludes_margins() {
    assert!(approx_eq(grid().chart_width(), 1080.0));
}

#[test]
fn day_width_divides_chart_evenly() {
    assert!(approx_eq(grid().day_width(), 3.0));
}

#[test]
fn content_height_includes_header_lanes_and_footer() {
    let g = grid();
    let expected = HEADER_HEIGHT + 4.0 * ROW_HEIGHT + FOOTER_HEIGHT + MARGIN_BOTTOM;
    assert!(approx_eq(g.content_height(), expected));
}

// --- date_to_x ---

#[test]
fn date_to_x_at_range_start_is_axis_origin() {
    let g = grid();
    assert!(approx_eq(g.date_to_x(date!(2024 - 04 - 01)), AXIS_ORIGIN_X));
}

#[test]
fn date_to_x_ten_days_in() {
    let g = grid();
    assert!(approx_eq(g.date_to_x(date!(2024 - 04 - 11)), AXIS_ORIGIN_X + 30.0));
}

#[test]
fn date_to_x_clamps_before_range() {
    let g = grid();
    assert!(approx_eq(g.date_to_x(date!(2020 - 01 - 01)), AXIS_ORIGIN_X));
}

#[test]
fn date_to_x_clamps_after_range() {
    let g = grid();
    let right_edge = AXIS_ORIGIN_X + g.chart_width();
    assert!(approx_eq(g.date_to_x(date!(2030 - 01 - 01)), right_edge));
}

// --- lane_index_to_y ---

#[test]
fn lane_zero_starts_below_header() {
    assert!(approx_eq(grid().lane_index_to_y(0), HEADER_HEIGHT));
}

#[test]
fn lane_rows_stack_by_row_height() {
    let g = grid();
    assert!(approx_eq(g.lane_index_to_y(3), HEADER_HEIGHT + 3.0 * ROW_HEIGHT));
}

#[test]
fn footer_sits_after_last_lane() {
    let g = grid();
    assert!(approx_eq(g.footer_y(), HEADER_HEIGHT + 4.0 * ROW_HEIGHT));
}

// --- x_to_day_offset / x_to_date ---

#[test]
fn x_at_axis_origin_is_day_zero() {
    let g = grid();
    assert_eq!(g.x_to_day_offset(AXIS_ORIGIN_X), 0);
    assert_eq!(g.x_to_date(AXIS_ORIGIN_X), date!(2024 - 04 - 01));
}

#[test]
fn x_rounds_to_nearest_day() {
    let g = grid();
    // 1.6 days in rounds to day 2
    assert_eq!(g.x_to_day_offset(AXIS_ORIGIN_X + 4.8), 2);
    // 1.4 days in rounds to day 1
    assert_eq!(g.x_to_day_offset(AXIS_ORIGIN_X + 4.2), 1);
}

#[test]
fn x_left_of_axis_clamps_to_day_zero() {
    let g = grid();
    assert_eq!(g.x_to_day_offset(0.0), 0);
}

#[test]
fn x_past_right_edge_clamps_to_last_day() {
    let g = grid();
    assert_eq!(g.x_to_day_offset(5000.0), 360);
    assert_eq!(g.x_to_date(5000.0), date!(2025 - 03 - 27));
}

#[test]
fn date_to_x_and_back_round_trips() {
    let g = grid();
    let d = date!(2024 - 09 - 15);
    assert_eq!(g.x_to_date(g.date_to_x(d)), d);
}

// --- y_to_lane_index ---

#[test]
fn y_in_header_is_no_lane() {
    assert_eq!(grid().y_to_lane_index(HEADER_HEIGHT - 1.0), None);
}

#[test]
fn y_at_header_boundary_is_first_lane() {
    assert_eq!(grid().y_to_lane_index(HEADER_HEIGHT), Some(0));
}

#[test]
fn y_mid_second_row() {
    let g = grid();
    assert_eq!(g.y_to_lane_index(HEADER_HEIGHT + ROW_HEIGHT + 35.0), Some(1));
}

#[test]
fn y_below_all_rows_clamps_to_last_lane() {
    assert_eq!(grid().y_to_lane_index(10_000.0), Some(3));
}

#[test]
fn y_to_lane_index_without_lanes_is_none() {
    let g = GridGeometry::new(date!(2024 - 04 - 01), date!(2025 - 04 - 01), 0);
    assert_eq!(g.y_to_lane_index(HEADER_HEIGHT + 10.0), None);
}

// --- locate ---

#[test]
fn locate_resolves_lane_and_date() {
    let g = grid();
    let p = Point::new(AXIS_ORIGIN_X + 30.0, HEADER_HEIGHT + ROW_HEIGHT + 5.0);
    let slot = g.locate(p);
    assert_eq!(slot, Some(GridSlot { lane_index: 1, date: date!(2024 - 04 - 11) }));
}

#[test]
fn locate_rejects_header_band() {
    let g = grid();
    assert_eq!(g.locate(Point::new(500.0, 10.0)), None);
}

#[test]
fn locate_rejects_left_of_axis() {
    let g = grid();
    assert_eq!(g.locate(Point::new(AXIS_ORIGIN_X - 5.0, HEADER_HEIGHT + 5.0)), None);
}

#[test]
fn locate_rejects_footer_region() {
    let g = grid();
    assert_eq!(g.locate(Point::new(500.0, g.footer_y() + 5.0)), None);
}

// --- hits_footer ---

#[test]
fn footer_hit_inside_button_row() {
    let g = grid();
    assert!(g.hits_footer(Point::new(500.0, g.footer_y() + 10.0)));
}

#[test]
fn footer_miss_in_lane_rows() {
    let g = grid();
    assert!(!g.hits_footer(Point::new(500.0, HEADER_HEIGHT + 10.0)));
}

#[test]
fn footer_miss_below_button_row() {
    let g = grid();
    assert!(!g.hits_footer(Point::new(500.0, g.footer_y() + FOOTER_HEIGHT + 1.0)));
}
