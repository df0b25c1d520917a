//! Error handling for TakeoffKit
//!
//! Provides error types for all layers of the measurement core:
//! - Calibration errors (reference points and scale factor validation)
//! - Measurement errors (point-count preconditions, cutout attachment)
//! - Session errors (drawing state machine misuse)
//! - Store errors (persistence adapter failures)
//!
//! All error types use `thiserror`. Recoverable conditions that should not
//! block an operation are modeled as warnings, not errors.

use thiserror::Error;
use uuid::Uuid;

use crate::data::MeasurementKind;

/// Calibration error type
///
/// Fatal calibration errors reset the calibration attempt; no record is
/// emitted and nothing is persisted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// The two reference points coincide, so no scale can be derived
    #[error("Calibration points coincide")]
    CoincidentPoints,

    /// The derived scale factor is absurdly small or large
    #[error("Calibration points too close or far apart (scale factor {scale_factor})")]
    OutOfRange {
        /// The rejected scale factor in units per base pixel.
        scale_factor: f64,
    },

    /// Re-deriving the known distance missed by more than the hard floor
    #[error("Calibration accuracy too low (relative error {relative_error:.3})")]
    LowAccuracy {
        /// Relative error between the re-derived and known distance.
        relative_error: f64,
    },

    /// The known distance must be a positive, finite value
    #[error("Invalid known distance: {value}")]
    InvalidKnownDistance {
        /// The rejected distance value.
        value: f64,
    },

    /// The geometry provider returned a degenerate base viewport
    #[error("Invalid base viewport: {width}x{height}")]
    InvalidBaseViewport {
        /// Reported base width in pixels.
        width: f64,
        /// Reported base height in pixels.
        height: f64,
    },

    /// An operation was invoked in a state that does not allow it
    #[error("Invalid calibration state: {current}")]
    InvalidState {
        /// The current state name.
        current: String,
    },
}

/// Measurement error type
///
/// Raised before any value is computed; a measurement is never emitted in a
/// partially-calculated state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasurementError {
    /// Fewer points than the measurement kind requires
    #[error("{kind} measurement requires at least {required} points, got {actual}")]
    InsufficientPoints {
        /// The measurement kind being computed.
        kind: MeasurementKind,
        /// The minimum point count for the kind.
        required: usize,
        /// The point count actually supplied.
        actual: usize,
    },

    /// A volume computation was requested without a depth
    #[error("Volume measurement requires a depth")]
    MissingDepth,

    /// Cutouts only apply to area and volume measurements
    #[error("Cutouts are not supported on {kind} measurements")]
    CutoutUnsupported {
        /// The kind of the parent measurement.
        kind: MeasurementKind,
    },

    /// The referenced cutout does not exist on the parent measurement
    #[error("Cutout {id} not found")]
    CutoutNotFound {
        /// The missing cutout id.
        id: Uuid,
    },
}

/// Session error type
///
/// Misuse of the drawing state machine. The session always remains in a
/// well-defined state after an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// A completion trigger arrived with no active drawing
    #[error("No active drawing session")]
    NotActive,

    /// Completion precondition failed; the session stays active
    #[error(transparent)]
    Measurement(#[from] MeasurementError),
}

/// Store error type
///
/// Raised by persistence adapters behind the [`crate::store::MeasurementStore`]
/// trait.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No measurement with the given id exists
    #[error("Measurement {id} not found")]
    NotFound {
        /// The missing measurement id.
        id: Uuid,
    },

    /// Backend-specific failure
    #[error("Store error: {message}")]
    Backend {
        /// The backend error message.
        message: String,
    },
}

/// Main error type for TakeoffKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Calibration error
    #[error(transparent)]
    Calibration(#[from] CalibrationError),

    /// Measurement error
    #[error(transparent)]
    Measurement(#[from] MeasurementError),

    /// Session error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a precondition violation the caller should have
    /// caught before invoking a calculator
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::Measurement(MeasurementError::InsufficientPoints { .. })
                | Error::Session(SessionError::Measurement(
                    MeasurementError::InsufficientPoints { .. }
                ))
        )
    }

    /// Check if this is a calibration error
    pub fn is_calibration_error(&self) -> bool {
        matches!(self, Error::Calibration(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Non-blocking calibration findings surfaced alongside a successful record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationWarning {
    /// Accuracy is acceptable but below the review threshold
    Accuracy {
        /// Accuracy of the re-derived distance, 1.0 being exact.
        accuracy: f64,
    },
    /// Scale factor falls outside the typical architectural range
    AtypicalScaleFactor {
        /// The accepted but unusual scale factor.
        scale_factor: f64,
    },
}

/// Non-blocking measurement findings; the value is still computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementWarning {
    /// The geometry collapses to (near) zero extent, e.g. collinear polygon
    /// points or a zero-length polyline
    DegenerateGeometry,
    /// A cutout's extent leaves its parent's bounding box
    CutoutOutsideParent,
}
