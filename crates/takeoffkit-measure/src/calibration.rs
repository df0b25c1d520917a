//! Two-point calibration against a known real-world distance.
//!
//! The user enters a distance they know (a dimension string, a scale bar, a
//! door width), then picks its two endpoints on the sheet. The engine derives
//! the units-per-pixel scale factor against the base viewport at the live
//! rotation and validates it before emitting a [`CalibrationRecord`].

use std::fmt;

use takeoffkit_core::constants::{
    CALIBRATION_MAX_RELATIVE_ERROR, CALIBRATION_WARN_ACCURACY, GEOMETRY_EPSILON, SCALE_FACTOR_MAX,
    SCALE_FACTOR_MIN, TYPICAL_SCALE_FACTOR_MAX, TYPICAL_SCALE_FACTOR_MIN,
};
use takeoffkit_core::{
    CalibrationError, CalibrationRecord, CalibrationScope, CalibrationWarning, DocumentPoint,
    PageGeometryProvider, Rotation, Unit,
};

/// Where a calibration attempt currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationState {
    /// No attempt in progress, or armed and waiting for the first point.
    Idle,
    /// One reference point captured; the next point finalizes.
    AwaitingSecondPoint,
    /// A record was produced and can be retrieved.
    Complete,
}

impl fmt::Display for CalibrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationState::Idle => write!(f, "idle"),
            CalibrationState::AwaitingSecondPoint => write!(f, "awaiting second point"),
            CalibrationState::Complete => write!(f, "complete"),
        }
    }
}

/// A successful calibration: the record plus non-blocking findings the host
/// may surface for confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationOutcome {
    pub record: CalibrationRecord,
    pub warnings: Vec<CalibrationWarning>,
}

/// Interactive calibration state machine: `Idle → AwaitingSecondPoint →
/// Complete`.
///
/// One engine instance exists per active page. Fatal validation errors reset
/// the attempt to `Idle`; nothing partial survives.
#[derive(Debug, Clone)]
pub struct CalibrationEngine {
    state: CalibrationState,
    known_distance: Option<f64>,
    unit: Unit,
    scope: CalibrationScope,
    points: Vec<DocumentPoint>,
    outcome: Option<CalibrationOutcome>,
}

impl CalibrationEngine {
    pub fn new() -> Self {
        Self {
            state: CalibrationState::Idle,
            known_distance: None,
            unit: Unit::default(),
            scope: CalibrationScope::Document,
            points: Vec::new(),
            outcome: None,
        }
    }

    pub fn state(&self) -> CalibrationState {
        self.state
    }

    /// Captured reference points so far.
    pub fn points(&self) -> &[DocumentPoint] {
        &self.points
    }

    /// The outcome of the last completed attempt, while in `Complete`.
    pub fn outcome(&self) -> Option<&CalibrationOutcome> {
        self.outcome.as_ref()
    }

    /// Arms the engine with the known real-world distance and resets any
    /// previous attempt.
    ///
    /// Page scope overrides a document-wide calibration for that page only;
    /// document scope is the fallback default.
    pub fn begin(
        &mut self,
        known_distance: f64,
        unit: Unit,
        scope: CalibrationScope,
    ) -> Result<(), CalibrationError> {
        if !known_distance.is_finite() || known_distance <= 0.0 {
            return Err(CalibrationError::InvalidKnownDistance {
                value: known_distance,
            });
        }
        self.state = CalibrationState::Idle;
        self.known_distance = Some(known_distance);
        self.unit = unit;
        self.scope = scope;
        self.points.clear();
        self.outcome = None;
        Ok(())
    }

    /// Abandons the current attempt.
    pub fn cancel(&mut self) {
        self.state = CalibrationState::Idle;
        self.known_distance = None;
        self.points.clear();
        self.outcome = None;
    }

    /// Appends a reference point; the second point triggers finalization.
    ///
    /// `rotation` is the live page rotation and `provider` supplies the base
    /// viewport for it. Returns the outcome when this point completed the
    /// calibration, `None` while more points are needed.
    ///
    /// Hosts conventionally apply [`crate::snap::ortho_snap`] to the second
    /// point before passing it in, so scale bars measure square.
    pub fn add_point(
        &mut self,
        point: DocumentPoint,
        rotation: Rotation,
        provider: &dyn PageGeometryProvider,
    ) -> Result<Option<&CalibrationOutcome>, CalibrationError> {
        let known_distance = match (self.state, self.known_distance) {
            (CalibrationState::Complete, _) | (_, None) => {
                return Err(CalibrationError::InvalidState {
                    current: self.state.to_string(),
                });
            }
            (_, Some(d)) => d,
        };

        self.points.push(point);
        if self.points.len() < 2 {
            self.state = CalibrationState::AwaitingSecondPoint;
            return Ok(None);
        }

        match self.finalize(known_distance, rotation, provider) {
            Ok(outcome) => {
                self.state = CalibrationState::Complete;
                self.outcome = Some(outcome);
                Ok(self.outcome.as_ref())
            }
            Err(err) => {
                // Fatal: reset the attempt entirely, surface to the user.
                self.cancel();
                Err(err)
            }
        }
    }

    fn finalize(
        &self,
        known_distance: f64,
        rotation: Rotation,
        provider: &dyn PageGeometryProvider,
    ) -> Result<CalibrationOutcome, CalibrationError> {
        let base = provider.get_viewport(1.0, rotation);
        if base.width <= 0.0 || base.height <= 0.0 {
            return Err(CalibrationError::InvalidBaseViewport {
                width: base.width,
                height: base.height,
            });
        }

        let dx = (self.points[1].x - self.points[0].x) * base.width;
        let dy = (self.points[1].y - self.points[0].y) * base.height;
        let pixel_distance = (dx * dx + dy * dy).sqrt();
        if pixel_distance <= GEOMETRY_EPSILON {
            return Err(CalibrationError::CoincidentPoints);
        }

        let scale_factor = known_distance / pixel_distance;
        if !scale_factor.is_finite()
            || scale_factor < SCALE_FACTOR_MIN
            || scale_factor > SCALE_FACTOR_MAX
        {
            return Err(CalibrationError::OutOfRange { scale_factor });
        }

        // Re-derive the entered distance from the factor. Equal by
        // construction for exact arithmetic; the check guards non-finite
        // input and any future quantization of the stored factor.
        let rederived = pixel_distance * scale_factor;
        let relative_error = (rederived - known_distance).abs() / known_distance;
        if relative_error >= CALIBRATION_MAX_RELATIVE_ERROR {
            return Err(CalibrationError::LowAccuracy { relative_error });
        }

        let mut warnings = Vec::new();
        let accuracy = 1.0 - relative_error;
        if accuracy < CALIBRATION_WARN_ACCURACY {
            warnings.push(CalibrationWarning::Accuracy { accuracy });
        }
        if !(TYPICAL_SCALE_FACTOR_MIN..=TYPICAL_SCALE_FACTOR_MAX).contains(&scale_factor) {
            tracing::warn!(
                scale_factor,
                "scale factor outside the typical architectural range"
            );
            warnings.push(CalibrationWarning::AtypicalScaleFactor { scale_factor });
        }

        Ok(CalibrationOutcome {
            record: CalibrationRecord {
                scale_factor,
                unit: self.unit,
                base_width: base.width,
                base_height: base.height,
                rotation_at_calibration: rotation,
                scope: self.scope,
            },
            warnings,
        })
    }
}

impl Default for CalibrationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use takeoffkit_core::FixedPageGeometry;

    fn page() -> FixedPageGeometry {
        FixedPageGeometry::new(1000.0, 800.0)
    }

    #[test]
    fn test_two_point_calibration() {
        let mut engine = CalibrationEngine::new();
        engine
            .begin(10.0, Unit::Feet, CalibrationScope::Document)
            .unwrap();
        assert_eq!(engine.state(), CalibrationState::Idle);

        let first = engine
            .add_point(DocumentPoint::new(0.0, 0.5), Rotation::R0, &page())
            .unwrap();
        assert!(first.is_none());
        assert_eq!(engine.state(), CalibrationState::AwaitingSecondPoint);

        // 0.1 of a 1000 px wide base page: 100 px for 10 ft.
        let outcome = engine
            .add_point(DocumentPoint::new(0.1, 0.5), Rotation::R0, &page())
            .unwrap()
            .unwrap()
            .clone();
        assert!((outcome.record.scale_factor - 0.1).abs() < 1e-12);
        assert_eq!(outcome.record.base_width, 1000.0);
        assert_eq!(outcome.record.base_height, 800.0);
        assert_eq!(outcome.record.unit, Unit::Feet);
        assert_eq!(engine.state(), CalibrationState::Complete);

        // Re-derivation lands within 1% of the entered distance.
        let rederived = 100.0 * outcome.record.scale_factor;
        assert!((rederived - 10.0).abs() / 10.0 < 0.01);
    }

    #[test]
    fn test_calibration_at_rotation_stores_swapped_base() {
        let mut engine = CalibrationEngine::new();
        engine
            .begin(5.0, Unit::Meters, CalibrationScope::Page)
            .unwrap();
        engine
            .add_point(DocumentPoint::new(0.2, 0.5), Rotation::R90, &page())
            .unwrap();
        let outcome = engine
            .add_point(DocumentPoint::new(0.3, 0.5), Rotation::R90, &page())
            .unwrap()
            .unwrap();
        // Base viewport at 90° is 800x1000; dx spans 0.1 of 800 px.
        assert_eq!(outcome.record.base_width, 800.0);
        assert_eq!(outcome.record.base_height, 1000.0);
        assert_eq!(outcome.record.rotation_at_calibration, Rotation::R90);
        assert!((outcome.record.scale_factor - 5.0 / 80.0).abs() < 1e-12);
        assert_eq!(outcome.record.scope, CalibrationScope::Page);
    }

    #[test]
    fn test_coincident_points_reset_to_idle() {
        let mut engine = CalibrationEngine::new();
        engine
            .begin(10.0, Unit::Feet, CalibrationScope::Document)
            .unwrap();
        let p = DocumentPoint::new(0.4, 0.4);
        engine.add_point(p, Rotation::R0, &page()).unwrap();
        let err = engine.add_point(p, Rotation::R0, &page()).unwrap_err();
        assert_eq!(err, CalibrationError::CoincidentPoints);
        assert_eq!(engine.state(), CalibrationState::Idle);
        assert!(engine.points().is_empty());
        // The attempt is disarmed: another point without begin() is misuse.
        assert!(matches!(
            engine.add_point(p, Rotation::R0, &page()),
            Err(CalibrationError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_absurd_scale_factor_rejected() {
        let mut engine = CalibrationEngine::new();
        // 1 ft spread across nearly the whole 1000 px page: 0.001 units/px
        // is fine, but 100000 ft across 100 px is not.
        engine
            .begin(10_000_000.0, Unit::Feet, CalibrationScope::Document)
            .unwrap();
        engine
            .add_point(DocumentPoint::new(0.0, 0.5), Rotation::R0, &page())
            .unwrap();
        let err = engine
            .add_point(DocumentPoint::new(0.1, 0.5), Rotation::R0, &page())
            .unwrap_err();
        assert!(matches!(err, CalibrationError::OutOfRange { .. }));
        assert_eq!(engine.state(), CalibrationState::Idle);
    }

    #[test]
    fn test_atypical_scale_factor_warns_but_completes() {
        let mut engine = CalibrationEngine::new();
        // 500 ft over 500 px: 1.0 units/px, valid but unusual for plans.
        engine
            .begin(500.0, Unit::Feet, CalibrationScope::Document)
            .unwrap();
        engine
            .add_point(DocumentPoint::new(0.0, 0.5), Rotation::R0, &page())
            .unwrap();
        let outcome = engine
            .add_point(DocumentPoint::new(0.5, 0.5), Rotation::R0, &page())
            .unwrap()
            .unwrap()
            .clone();
        assert!(outcome
            .warnings
            .iter()
            .any(|w| matches!(w, CalibrationWarning::AtypicalScaleFactor { .. })));
        assert_eq!(engine.state(), CalibrationState::Complete);
    }

    #[test]
    fn test_invalid_known_distance() {
        let mut engine = CalibrationEngine::new();
        assert!(matches!(
            engine.begin(0.0, Unit::Feet, CalibrationScope::Document),
            Err(CalibrationError::InvalidKnownDistance { .. })
        ));
        assert!(matches!(
            engine.begin(f64::NAN, Unit::Feet, CalibrationScope::Document),
            Err(CalibrationError::InvalidKnownDistance { .. })
        ));
    }

    #[test]
    fn test_begin_resets_previous_attempt() {
        let mut engine = CalibrationEngine::new();
        engine
            .begin(10.0, Unit::Feet, CalibrationScope::Document)
            .unwrap();
        engine
            .add_point(DocumentPoint::new(0.1, 0.1), Rotation::R0, &page())
            .unwrap();
        engine
            .begin(20.0, Unit::Meters, CalibrationScope::Page)
            .unwrap();
        assert!(engine.points().is_empty());
        assert_eq!(engine.state(), CalibrationState::Idle);
    }
}
