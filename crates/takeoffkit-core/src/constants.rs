//! Numeric policy constants shared across TakeoffKit crates.

/// Tolerance for coordinate round-trip comparisons and coincidence checks.
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// Smallest scale factor a calibration may produce (units per base pixel).
pub const SCALE_FACTOR_MIN: f64 = 1e-4;

/// Largest scale factor a calibration may produce (units per base pixel).
pub const SCALE_FACTOR_MAX: f64 = 1e4;

/// Relative error at or above which a calibration is rejected outright.
pub const CALIBRATION_MAX_RELATIVE_ERROR: f64 = 0.10;

/// Accuracy below which a calibration is accepted but flagged for review.
pub const CALIBRATION_WARN_ACCURACY: f64 = 0.95;

/// Typical architectural scale-factor range; values outside it are flagged.
pub const TYPICAL_SCALE_FACTOR_MIN: f64 = 0.005;
pub const TYPICAL_SCALE_FACTOR_MAX: f64 = 0.2;

/// Window within which a repeated completion trigger is treated as the tail
/// of the same gesture (a double-click is two close clicks).
pub const COMPLETION_GUARD_MS: u64 = 100;
