//! Measurement calculations over document-space points.
//!
//! Pure functions: a point set plus a calibration record in, a real-world
//! value out. All pixel math goes through the calibration's stored base
//! dimensions so results are identical at every zoom and rotation.

use takeoffkit_core::constants::GEOMETRY_EPSILON;
use takeoffkit_core::{
    CalibrationRecord, DocumentPoint, MeasurementError, MeasurementKind, MeasurementWarning,
};

/// Total polyline length in the calibration's unit.
///
/// Sums consecutive edge lengths in base-viewport pixel space, then applies
/// the scale factor once.
pub fn linear_distance(points: &[DocumentPoint], calib: &CalibrationRecord) -> f64 {
    debug_assert!(points.len() >= 2, "linear distance needs at least 2 points");
    let total_pixels: f64 = points
        .windows(2)
        .map(|pair| calib.pixel_distance(&pair[0], &pair[1]))
        .sum();
    total_pixels * calib.scale_factor
}

/// Polygon area in the calibration's unit squared.
///
/// Shoelace formula on pixel-scaled coordinates; area scales with the
/// square of the linear scale factor.
pub fn polygon_area(points: &[DocumentPoint], calib: &CalibrationRecord) -> f64 {
    debug_assert!(points.len() >= 3, "polygon area needs at least 3 points");
    let signed = signed_pixel_area(points, calib);
    signed.abs() * calib.scale_factor * calib.scale_factor
}

/// Closed-loop perimeter in the calibration's unit.
pub fn perimeter(points: &[DocumentPoint], calib: &CalibrationRecord) -> f64 {
    debug_assert!(points.len() >= 3, "perimeter needs at least 3 points");
    let mut total_pixels = linear_distance(points, calib) / calib.scale_factor;
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        total_pixels += calib.pixel_distance(last, first);
    }
    total_pixels * calib.scale_factor
}

/// Extruded polygon volume: area times depth, in the calibration's unit
/// cubed (depth given in the same unit).
pub fn volume(points: &[DocumentPoint], calib: &CalibrationRecord, depth: f64) -> f64 {
    polygon_area(points, calib) * depth
}

/// Value of a count measurement: each placed point tallies one.
pub fn count_value() -> f64 {
    1.0
}

/// Signed shoelace area in base-viewport pixels squared. Positive for
/// counter-clockwise winding in screen coordinates.
fn signed_pixel_area(points: &[DocumentPoint], calib: &CalibrationRecord) -> f64 {
    let mut sum = 0.0;
    for i in 0..points.len() {
        let a = &points[i];
        let b = &points[(i + 1) % points.len()];
        sum += (a.x * calib.base_width) * (b.y * calib.base_height)
            - (b.x * calib.base_width) * (a.y * calib.base_height);
    }
    0.5 * sum
}

/// Type-specific inputs for [`evaluate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluateOptions {
    /// Extrusion depth for volume measurements, in the calibration's unit.
    pub depth: Option<f64>,
    /// Also compute the closed-loop perimeter (area measurements).
    pub include_perimeter: bool,
}

/// A computed measurement value plus any non-blocking findings.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub value: f64,
    pub perimeter: Option<f64>,
    pub warnings: Vec<MeasurementWarning>,
}

/// Computes the value for a point set, enforcing the per-kind point minimum
/// before any math runs.
///
/// Degenerate geometry (collinear polygon, zero-length polyline) is not an
/// error: the value computes to ~0 and a warning is attached for the host
/// to display.
pub fn evaluate(
    kind: MeasurementKind,
    points: &[DocumentPoint],
    calib: &CalibrationRecord,
    opts: &EvaluateOptions,
) -> Result<Evaluation, MeasurementError> {
    let required = kind.min_points();
    if points.len() < required {
        return Err(MeasurementError::InsufficientPoints {
            kind,
            required,
            actual: points.len(),
        });
    }

    let mut warnings = Vec::new();
    let mut perimeter_value = None;

    let value = match kind {
        MeasurementKind::Linear => {
            let value = linear_distance(points, calib);
            if value / calib.scale_factor < GEOMETRY_EPSILON {
                warnings.push(MeasurementWarning::DegenerateGeometry);
            }
            value
        }
        MeasurementKind::Area | MeasurementKind::Volume => {
            let area = polygon_area(points, calib);
            let pixel_area = area / (calib.scale_factor * calib.scale_factor);
            if pixel_area < GEOMETRY_EPSILON {
                tracing::warn!(kind = %kind, points = points.len(), "degenerate polygon, value ~0");
                warnings.push(MeasurementWarning::DegenerateGeometry);
            }
            if opts.include_perimeter {
                perimeter_value = Some(perimeter(points, calib));
            }
            if kind == MeasurementKind::Volume {
                let depth = opts.depth.ok_or(MeasurementError::MissingDepth)?;
                area * depth
            } else {
                area
            }
        }
        MeasurementKind::Count => count_value(),
    };

    Ok(Evaluation {
        value,
        perimeter: perimeter_value,
        warnings,
    })
}
