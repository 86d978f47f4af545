#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use time::{Date, Duration};

use crate::consts::*;

/// A point in either screen or canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn dist(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Maps raw pointer coordinates (CSS pixels relative to the canvas element)
/// into the fixed canvas coordinate space.
///
/// The canvas has a fixed logical width regardless of how the element is
/// sized on the page, so a single scale factor covers both axes.
#[derive(Debug, Clone, Copy)]
pub struct ViewTransform {
    /// Logical canvas units per CSS pixel.
    pub scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl ViewTransform {
    /// Transform for a canvas element displayed at `css_width` CSS pixels.
    #[must_use]
    pub fn for_css_width(css_width: f64) -> Self {
        if css_width > 0.0 {
            Self { scale: CONTENT_WIDTH / css_width }
        } else {
            Self { scale: 1.0 }
        }
    }

    /// Convert a pointer position (CSS pixels) to canvas coordinates.
    #[must_use]
    pub fn to_canvas(&self, screen: Point) -> Point {
        Point { x: screen.x * self.scale, y: screen.y * self.scale }
    }
}

/// A position on the schedule grid: a lane row plus a day along the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSlot {
    pub lane_index: usize,
    pub date: Date,
}

/// Date/lane ⇄ canvas-coordinate mapping for one schedule.
///
/// All date math is closed over `[range_start, range_end]`: positions map
/// linearly by day offset, and lookups clamp rather than extrapolate, so a
/// drag can never produce a date or lane outside the chart.
#[derive(Debug, Clone, Copy)]
pub struct GridGeometry {
    range_start: Date,
    range_end: Date,
    lane_count: usize,
}

impl GridGeometry {
    /// Build the geometry for a date range and lane count.
    ///
    /// A degenerate range (`end <= start`) is replaced with one year from
    /// `start` so the chart stays drawable; the caller's data is suspect at
    /// that point, not the geometry.
    #[must_use]
    pub fn new(range_start: Date, range_end: Date, lane_count: usize) -> Self {
        let range_end = if range_end > range_start {
            range_end
        } else {
            log::warn!(
                "degenerate date range {range_start} ..= {range_end}, falling back to one year"
            );
            range_start + Duration::days(365)
        };
        Self { range_start, range_end, lane_count }
    }

    #[must_use]
    pub fn range_start(&self) -> Date {
        self.range_start
    }

    #[must_use]
    pub fn range_end(&self) -> Date {
        self.range_end
    }

    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    /// Number of days spanned by the chart, always >= 1.
    #[must_use]
    pub fn total_days(&self) -> i64 {
        (self.range_end - self.range_start).whole_days()
    }

    /// Width of the plottable area between the axis origin and the right margin.
    #[must_use]
    pub fn chart_width(&self) -> f64 {
        CONTENT_WIDTH - AXIS_ORIGIN_X - MARGIN_RIGHT
    }

    /// Width of a single day column.
    #[must_use]
    pub fn day_width(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let days = self.total_days() as f64;
        self.chart_width() / days
    }

    /// Total canvas height: header, lane rows, add-lane footer, margin.
    #[must_use]
    pub fn content_height(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let lanes = self.lane_count as f64;
        HEADER_HEIGHT + lanes * ROW_HEIGHT + FOOTER_HEIGHT + MARGIN_BOTTOM
    }

    /// X coordinate of the left edge of `date`'s day column.
    ///
    /// Dates outside the range clamp to the chart edges.
    #[must_use]
    pub fn date_to_x(&self, date: Date) -> f64 {
        let offset = (date - self.range_start).whole_days().clamp(0, self.total_days());
        #[allow(clippy::cast_precision_loss)]
        let offset = offset as f64;
        AXIS_ORIGIN_X + offset * self.day_width()
    }

    /// Y coordinate of the top of lane row `index`.
    #[must_use]
    pub fn lane_index_to_y(&self, index: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let index = index as f64;
        HEADER_HEIGHT + index * ROW_HEIGHT
    }

    /// Y coordinate of the top of the add-lane button row.
    #[must_use]
    pub fn footer_y(&self) -> f64 {
        self.lane_index_to_y(self.lane_count)
    }

    /// Nearest day offset for a canvas X coordinate, clamped to the range.
    #[must_use]
    pub fn x_to_day_offset(&self, x: f64) -> i64 {
        let raw = (x - AXIS_ORIGIN_X) / self.day_width();
        #[allow(clippy::cast_possible_truncation)]
        let offset = raw.round() as i64;
        offset.clamp(0, self.total_days())
    }

    /// Date for a canvas X coordinate, clamped to the range.
    #[must_use]
    pub fn x_to_date(&self, x: f64) -> Date {
        self.range_start + Duration::days(self.x_to_day_offset(x))
    }

    /// Lane row index for a canvas Y coordinate, clamped to the last lane.
    ///
    /// Returns `None` when there are no lanes or `y` is above the first row.
    #[must_use]
    pub fn y_to_lane_index(&self, y: f64) -> Option<usize> {
        if self.lane_count == 0 || y < HEADER_HEIGHT {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = ((y - HEADER_HEIGHT) / ROW_HEIGHT).floor() as usize;
        Some(index.min(self.lane_count - 1))
    }

    /// Resolve a canvas point to a grid slot.
    ///
    /// Points in the header band or left of the axis origin resolve to
    /// nothing; they are chrome, not droppable grid.
    #[must_use]
    pub fn locate(&self, p: Point) -> Option<GridSlot> {
        if p.x < AXIS_ORIGIN_X {
            return None;
        }
        let lane_index = self.y_to_lane_index(p.y)?;
        if p.y >= self.footer_y() {
            return None;
        }
        Some(GridSlot { lane_index, date: self.x_to_date(p.x) })
    }

    /// Whether a canvas point falls on the add-lane button row.
    #[must_use]
    pub fn hits_footer(&self, p: Point) -> bool {
        p.y >= self.footer_y() && p.y < self.footer_y() + FOOTER_HEIGHT
    }
}
