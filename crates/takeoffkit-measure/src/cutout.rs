//! Cutouts: holes subtracted from an area or volume measurement.
//!
//! A cutout (a door opening in a wall area, a shaft through a slab volume)
//! is a polygon valued with the parent's formula family and subtracted from
//! the parent's gross value. Cutouts accumulate; the net value is maintained
//! from the full remaining set on every change.

use takeoffkit_core::constants::GEOMETRY_EPSILON;
use takeoffkit_core::{
    point_bounds, CalibrationRecord, Cutout, DocumentPoint, Measurement, MeasurementError,
    MeasurementKind, MeasurementWarning,
};
use uuid::Uuid;

use crate::calculator;

/// What to do when accumulated cutouts exceed the gross value.
///
/// The source behavior lets the net go negative, which surfaces
/// over-subtraction to the estimator; hosts that want a floor opt into
/// clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegativeNetPolicy {
    #[default]
    Allow,
    ClampToZero,
}

/// Result of attaching a cutout.
#[derive(Debug, Clone, PartialEq)]
pub struct CutoutOutcome {
    /// Id of the new cutout, usable with [`CutoutEngine::remove_cutout`].
    pub id: Uuid,
    pub warnings: Vec<MeasurementWarning>,
}

/// Attaches and removes cutouts, keeping the parent's net value consistent.
#[derive(Debug, Clone, Default)]
pub struct CutoutEngine {
    policy: NegativeNetPolicy,
}

impl CutoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: NegativeNetPolicy) -> Self {
        Self { policy }
    }

    /// Subtracts a polygon from `measurement`.
    ///
    /// The cutout value uses the parent's formula family: plain area for
    /// area measurements, area times the parent's depth for volumes.
    /// Containment is not validated; a cutout reaching outside the parent's
    /// extent is flagged as a warning, never rejected.
    pub fn add_cutout(
        &self,
        measurement: &mut Measurement,
        points: Vec<DocumentPoint>,
        calib: &CalibrationRecord,
    ) -> Result<CutoutOutcome, MeasurementError> {
        if !matches!(
            measurement.kind,
            MeasurementKind::Area | MeasurementKind::Volume
        ) {
            return Err(MeasurementError::CutoutUnsupported {
                kind: measurement.kind,
            });
        }
        if points.len() < 3 {
            return Err(MeasurementError::InsufficientPoints {
                kind: measurement.kind,
                required: 3,
                actual: points.len(),
            });
        }
        debug_assert_eq!(
            calib.unit, measurement.unit,
            "cutout calibration unit must match the parent measurement"
        );

        let area = calculator::polygon_area(&points, calib);
        let value = match measurement.kind {
            MeasurementKind::Volume => {
                let depth = measurement.depth.ok_or(MeasurementError::MissingDepth)?;
                area * depth
            }
            _ => area,
        };

        let mut warnings = Vec::new();
        if !bounds_contain(&measurement.points, &points) {
            tracing::warn!(
                measurement = %measurement.id,
                "cutout extends outside the parent measurement's bounds"
            );
            warnings.push(MeasurementWarning::CutoutOutsideParent);
        }

        let id = Uuid::new_v4();
        measurement.cutouts.push(Cutout {
            id,
            points,
            calculated_value: value,
        });
        self.recompute_net(measurement);

        Ok(CutoutOutcome { id, warnings })
    }

    /// Removes a cutout and recomputes the net value from the remaining set.
    pub fn remove_cutout(
        &self,
        measurement: &mut Measurement,
        id: Uuid,
    ) -> Result<(), MeasurementError> {
        let before = measurement.cutouts.len();
        measurement.cutouts.retain(|c| c.id != id);
        if measurement.cutouts.len() == before {
            return Err(MeasurementError::CutoutNotFound { id });
        }
        self.recompute_net(measurement);
        Ok(())
    }

    /// `net = gross − Σ cutouts` while cutouts exist, `None` otherwise.
    fn recompute_net(&self, measurement: &mut Measurement) {
        if measurement.cutouts.is_empty() {
            measurement.net_calculated_value = None;
            return;
        }
        let subtracted: f64 = measurement
            .cutouts
            .iter()
            .map(|c| c.calculated_value)
            .sum();
        let net = measurement.calculated_value - subtracted;
        measurement.net_calculated_value = Some(match self.policy {
            NegativeNetPolicy::Allow => net,
            NegativeNetPolicy::ClampToZero => net.max(0.0),
        });
    }
}

/// Whether `inner`'s bounding box lies within `outer`'s, with a small
/// tolerance for points placed on the boundary.
fn bounds_contain(outer: &[DocumentPoint], inner: &[DocumentPoint]) -> bool {
    let (o_min_x, o_min_y, o_max_x, o_max_y) = point_bounds(outer);
    let (i_min_x, i_min_y, i_max_x, i_max_y) = point_bounds(inner);
    i_min_x >= o_min_x - GEOMETRY_EPSILON
        && i_min_y >= o_min_y - GEOMETRY_EPSILON
        && i_max_x <= o_max_x + GEOMETRY_EPSILON
        && i_max_y <= o_max_y + GEOMETRY_EPSILON
}
