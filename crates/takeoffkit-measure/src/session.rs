//! Interactive drawing session for capturing measurement points.
//!
//! An explicit state machine: `Idle → Active(n points) → back to Idle` on
//! completion or cancellation. Every pointer/keyboard event is a pure,
//! synchronous transition whose outcome is returned to the host; the host
//! renders from the returned state rather than the core knowing about any
//! UI framework. One session exists per active page at a time.

use std::fmt;
use std::time::{Duration, Instant};

use chrono::Utc;
use takeoffkit_core::constants::COMPLETION_GUARD_MS;
use takeoffkit_core::{
    CalibrationRecord, DocumentPoint, Measurement, MeasurementKind, MeasurementWarning,
    SessionError,
};
use uuid::Uuid;

use crate::calculator::{self, EvaluateOptions};
use crate::snap::ortho_snap;

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No drawing in progress.
    Idle,
    /// Points are being captured.
    Active,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Active => write!(f, "active"),
        }
    }
}

/// Result of a click transition.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// The point was captured; the session stays active.
    Added {
        /// Points captured so far.
        points: usize,
        /// Length of the open polyline so far (linear sessions).
        running_length: f64,
    },
    /// The click completed the measurement (count kind).
    Completed {
        measurement: Measurement,
        warnings: Vec<MeasurementWarning>,
    },
}

/// Result of an escape transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeOutcome {
    /// The most recent point was removed; the session stays active.
    PointRemoved { remaining: usize },
    /// The last point was removed and the session cancelled.
    Cancelled,
    /// Nothing to undo.
    Ignored,
}

/// Result of a completion trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome {
    /// A measurement was emitted and the session reset.
    Completed {
        measurement: Measurement,
        warnings: Vec<MeasurementWarning>,
    },
    /// A repeated trigger inside the double-click window; the measurement
    /// identified here was already emitted for this gesture.
    AlreadyCompleted { id: Uuid },
}

/// Captures points for one measurement on one page.
///
/// Ephemeral: hosts create a session when a measurement tool is armed and
/// drop it (or reuse it) after completion. Persistence of the emitted
/// [`Measurement`] is the host's job and must never block further input.
#[derive(Debug, Clone)]
pub struct DrawingSession {
    kind: MeasurementKind,
    page: u32,
    calib: CalibrationRecord,
    state: SessionState,
    points: Vec<DocumentPoint>,
    running_length: f64,
    ortho_snapping: bool,
    include_perimeter: bool,
    depth: Option<f64>,
    last_completion: Option<(Instant, Uuid)>,
}

impl DrawingSession {
    /// Creates a session for `kind` on `page`, measuring against `calib`.
    pub fn new(kind: MeasurementKind, page: u32, calib: CalibrationRecord) -> Self {
        Self {
            kind,
            page,
            calib,
            state: SessionState::Idle,
            points: Vec::new(),
            running_length: 0.0,
            ortho_snapping: false,
            include_perimeter: false,
            depth: None,
            last_completion: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn kind(&self) -> MeasurementKind {
        self.kind
    }

    pub fn points(&self) -> &[DocumentPoint] {
        &self.points
    }

    /// Length of the open polyline captured so far, in the calibration's
    /// unit. Zero until a linear session has two points.
    pub fn running_length(&self) -> f64 {
        self.running_length
    }

    pub fn ortho_snapping(&self) -> bool {
        self.ortho_snapping
    }

    /// Toggles axis snapping (e.g. bound to a modifier key).
    pub fn set_ortho_snapping(&mut self, enabled: bool) {
        self.ortho_snapping = enabled;
    }

    /// Sets the extrusion depth for volume sessions, in the calibration's
    /// unit.
    pub fn set_depth(&mut self, depth: f64) {
        self.depth = Some(depth);
    }

    /// Also computes the closed-loop perimeter on completion (area
    /// sessions).
    pub fn set_include_perimeter(&mut self, include: bool) {
        self.include_perimeter = include;
    }

    /// Captures a point.
    ///
    /// With snapping enabled the point is constrained against the previous
    /// one before capture. Count sessions complete immediately on their
    /// first point; every other kind stays active until an explicit
    /// completion trigger.
    pub fn click(&mut self, point: DocumentPoint) -> Result<ClickOutcome, SessionError> {
        let point = match (self.ortho_snapping, self.points.last()) {
            (true, Some(last)) => ortho_snap(point, *last),
            _ => point,
        };

        self.state = SessionState::Active;
        self.points.push(point);

        if self.kind == MeasurementKind::Count {
            let (measurement, warnings) = self.complete_at(Instant::now())?;
            return Ok(ClickOutcome::Completed {
                measurement,
                warnings,
            });
        }

        if self.kind == MeasurementKind::Linear && self.points.len() >= 2 {
            self.running_length = calculator::linear_distance(&self.points, &self.calib);
        }

        Ok(ClickOutcome::Added {
            points: self.points.len(),
            running_length: self.running_length,
        })
    }

    /// The point set to render while the cursor hovers at `cursor`:
    /// captured points plus the would-be next point, snapped the same way a
    /// click would be. Does not mutate the session.
    pub fn preview(&self, cursor: DocumentPoint) -> Vec<DocumentPoint> {
        if self.state != SessionState::Active {
            return Vec::new();
        }
        let cursor = match (self.ortho_snapping, self.points.last()) {
            (true, Some(last)) => ortho_snap(cursor, *last),
            _ => cursor,
        };
        let mut preview = self.points.clone();
        preview.push(cursor);
        preview
    }

    /// Running length the polyline would have if the cursor became the next
    /// point (linear sessions).
    pub fn preview_length(&self, cursor: DocumentPoint) -> f64 {
        let preview = self.preview(cursor);
        if preview.len() < 2 {
            return 0.0;
        }
        calculator::linear_distance(&preview, &self.calib)
    }

    /// Undoes the most recent point; removing the last one cancels the
    /// session back to idle.
    pub fn escape(&mut self) -> EscapeOutcome {
        if self.state != SessionState::Active {
            return EscapeOutcome::Ignored;
        }
        self.points.pop();
        if self.points.is_empty() {
            self.state = SessionState::Idle;
            self.running_length = 0.0;
            return EscapeOutcome::Cancelled;
        }
        self.running_length = if self.kind == MeasurementKind::Linear && self.points.len() >= 2 {
            calculator::linear_distance(&self.points, &self.calib)
        } else {
            0.0
        };
        EscapeOutcome::PointRemoved {
            remaining: self.points.len(),
        }
    }

    /// Abandons the session unconditionally.
    pub fn cancel(&mut self) {
        self.state = SessionState::Idle;
        self.points.clear();
        self.running_length = 0.0;
    }

    /// Completion trigger: double-click or an explicit finish command.
    ///
    /// Rejects with the session left active when the kind's point minimum
    /// is not met. Idempotent within the double-click window: the trailing
    /// trigger of the same gesture reports the already-emitted measurement
    /// instead of completing twice.
    pub fn finish(&mut self) -> Result<CompletionOutcome, SessionError> {
        self.finish_at(Instant::now())
    }

    /// [`Self::finish`] with an explicit timestamp, for deterministic tests
    /// of the completion window.
    pub fn finish_at(&mut self, now: Instant) -> Result<CompletionOutcome, SessionError> {
        if self.state != SessionState::Active {
            if let Some((completed_at, id)) = self.last_completion {
                if now.duration_since(completed_at) <= Duration::from_millis(COMPLETION_GUARD_MS) {
                    return Ok(CompletionOutcome::AlreadyCompleted { id });
                }
            }
            return Err(SessionError::NotActive);
        }
        let (measurement, warnings) = self.complete_at(now)?;
        Ok(CompletionOutcome::Completed {
            measurement,
            warnings,
        })
    }

    fn complete_at(
        &mut self,
        now: Instant,
    ) -> Result<(Measurement, Vec<MeasurementWarning>), SessionError> {
        let opts = EvaluateOptions {
            depth: self.depth,
            include_perimeter: self.include_perimeter,
        };
        // Precondition failures leave the captured points untouched.
        let evaluation = calculator::evaluate(self.kind, &self.points, &self.calib, &opts)?;

        let measurement = Measurement {
            id: Uuid::new_v4(),
            page: self.page,
            kind: self.kind,
            points: std::mem::take(&mut self.points),
            calculated_value: evaluation.value,
            unit: self.calib.unit,
            perimeter_value: evaluation.perimeter,
            depth: if self.kind == MeasurementKind::Volume {
                self.depth
            } else {
                None
            },
            cutouts: Vec::new(),
            net_calculated_value: None,
            created: Utc::now(),
        };

        tracing::debug!(
            kind = %self.kind,
            page = self.page,
            value = measurement.calculated_value,
            "drawing session completed"
        );

        self.state = SessionState::Idle;
        self.running_length = 0.0;
        self.last_completion = Some((now, measurement.id));
        Ok((measurement, evaluation.warnings))
    }
}
