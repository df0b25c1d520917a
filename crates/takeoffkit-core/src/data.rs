//! Data models for points, viewports, calibrations, and measurements
//!
//! This module provides:
//! - Normalized document-space points that survive zoom and rotation
//! - Viewport descriptors for the currently displayed page
//! - Calibration records pairing a scale factor with its base dimensions
//! - Measurement and cutout records with net value bookkeeping

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::units::Unit;

/// A point in document space: normalized to `[0,1]` on both axes, expressed
/// relative to the page's base orientation (rotation 0, scale 1).
///
/// Once created a document point is never mutated; when the viewport changes
/// it is reinterpreted through the coordinate transform instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocumentPoint {
    pub x: f64,
    pub y: f64,
}

impl DocumentPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point in normalized coordinates.
    ///
    /// Note this is aspect-distorted for non-square pages; measurement math
    /// goes through [`CalibrationRecord::pixel_distance`] instead.
    pub fn distance_to(&self, other: &DocumentPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Page rotation in quarter turns. The only rotations a sheet can display at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    /// Base orientation (0°).
    R0,
    /// 90° clockwise.
    R90,
    /// 180°.
    R180,
    /// 270° clockwise.
    R270,
}

impl Rotation {
    /// Normalizes a raw degree value into the canonical set.
    ///
    /// The value is reduced modulo 360 (negatives shifted into `[0,360)`),
    /// then rounded to the nearest multiple of 90. This is the single
    /// canonical rotation used everywhere else.
    pub fn normalize(raw_degrees: i32) -> Self {
        let shifted = raw_degrees.rem_euclid(360);
        let quarter = ((shifted as f64 / 90.0).round() as i32).rem_euclid(4);
        match quarter {
            0 => Rotation::R0,
            1 => Rotation::R90,
            2 => Rotation::R180,
            _ => Rotation::R270,
        }
    }

    /// The rotation in degrees.
    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    /// Whether this rotation displays the page with swapped aspect
    /// (width and height exchanged relative to the base orientation).
    pub fn swaps_axes(&self) -> bool {
        matches!(self, Rotation::R90 | Rotation::R270)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::R0
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// The viewport a page is currently displayed in.
///
/// Ephemeral: recomputed whenever zoom, rotation, or page changes. For
/// quarter-swapped rotations the width/height are the base page's exchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportDescriptor {
    /// Displayed width in pixels at the current scale and rotation.
    pub width: f64,
    /// Displayed height in pixels at the current scale and rotation.
    pub height: f64,
    /// Zoom level (1.0 = 100%).
    pub scale: f64,
    /// Rotation the page is displayed at.
    pub rotation: Rotation,
}

impl ViewportDescriptor {
    pub fn new(width: f64, height: f64, scale: f64, rotation: Rotation) -> Self {
        Self {
            width,
            height,
            scale,
            rotation,
        }
    }
}

impl fmt::Display for ViewportDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.0}x{:.0} @ {:.2}x {}",
            self.width, self.height, self.scale, self.rotation
        )
    }
}

/// Where a calibration applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalibrationScope {
    /// Applies to a single page, overriding any document-wide calibration.
    Page,
    /// Applies to every page without a page-scoped calibration.
    Document,
}

/// A completed calibration: real-world units per pixel of the base viewport.
///
/// The scale factor is meaningless without its paired base dimensions.
/// Consumers must recompute pixel distances from `base_width`/`base_height`,
/// never from whatever viewport happens to be displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    /// Real-world units per pixel of the base (scale = 1) viewport.
    pub scale_factor: f64,
    /// The real-world unit the scale factor is expressed in.
    pub unit: Unit,
    /// Width of the base viewport the factor was derived against.
    pub base_width: f64,
    /// Height of the base viewport the factor was derived against.
    pub base_height: f64,
    /// Rotation the page was displayed at when calibrated.
    pub rotation_at_calibration: Rotation,
    /// Page or document scope.
    pub scope: CalibrationScope,
}

impl CalibrationRecord {
    /// Distance between two document points in base-viewport pixels.
    ///
    /// Always uses the stored base dimensions so the result is identical at
    /// every zoom level and rotation.
    pub fn pixel_distance(&self, a: &DocumentPoint, b: &DocumentPoint) -> f64 {
        let dx = (b.x - a.x) * self.base_width;
        let dy = (b.y - a.y) * self.base_height;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns a copy of this record rescaled to express distances in
    /// `target` instead of the stored unit.
    pub fn converted_to(&self, target: Unit) -> Self {
        Self {
            scale_factor: Unit::convert(self.scale_factor, self.unit, target),
            unit: target,
            ..self.clone()
        }
    }
}

/// The kind of value a measurement produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementKind {
    /// Polyline length.
    Linear,
    /// Polygon area.
    Area,
    /// Polygon area times a depth.
    Volume,
    /// A single tally mark.
    Count,
}

impl MeasurementKind {
    /// Minimum number of points a measurement of this kind requires.
    pub fn min_points(&self) -> usize {
        match self {
            MeasurementKind::Linear => 2,
            MeasurementKind::Area | MeasurementKind::Volume => 3,
            MeasurementKind::Count => 1,
        }
    }

    /// Whether this kind closes its point set into a polygon.
    pub fn is_closed(&self) -> bool {
        matches!(self, MeasurementKind::Area | MeasurementKind::Volume)
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementKind::Linear => write!(f, "linear"),
            MeasurementKind::Area => write!(f, "area"),
            MeasurementKind::Volume => write!(f, "volume"),
            MeasurementKind::Count => write!(f, "count"),
        }
    }
}

/// A hole subtracted from a parent area or volume measurement.
///
/// Owned by exactly one measurement; never shared between measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cutout {
    pub id: Uuid,
    pub points: Vec<DocumentPoint>,
    /// Value computed with the parent's formula family.
    pub calculated_value: f64,
}

/// A finished measurement, created when a drawing session completes.
///
/// Mutated only by cutout attachment/removal or deleted outright; the
/// captured points and gross value are otherwise immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: Uuid,
    /// Page index the measurement belongs to.
    pub page: u32,
    pub kind: MeasurementKind,
    /// Captured points in document space.
    pub points: Vec<DocumentPoint>,
    /// Gross value before cutouts.
    pub calculated_value: f64,
    pub unit: Unit,
    /// Closed-loop perimeter, when the session asked for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perimeter_value: Option<f64>,
    /// Extrusion depth for volume measurements, in `unit`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
    #[serde(default)]
    pub cutouts: Vec<Cutout>,
    /// Gross value minus the sum of cutouts; `None` while no cutouts exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_calculated_value: Option<f64>,
    pub created: DateTime<Utc>,
}

impl Measurement {
    /// The value a consumer should display: net when cutouts exist,
    /// gross otherwise.
    pub fn effective_value(&self) -> f64 {
        self.net_calculated_value.unwrap_or(self.calculated_value)
    }

    /// Axis-aligned bounding box of the captured points in document space,
    /// as `(min_x, min_y, max_x, max_y)`. Empty point sets yield a zero box.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        point_bounds(&self.points)
    }
}

/// Bounding box of a point slice as `(min_x, min_y, max_x, max_y)`.
pub fn point_bounds(points: &[DocumentPoint]) -> (f64, f64, f64, f64) {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    if points.is_empty() {
        (0.0, 0.0, 0.0, 0.0)
    } else {
        (min_x, min_y, max_x, max_y)
    }
}
