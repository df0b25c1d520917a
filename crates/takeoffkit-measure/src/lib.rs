//! # TakeoffKit Measure
//!
//! Measurement tools for plan takeoff: calibrate a rasterized sheet against
//! a known distance, then capture linear, area, volume, and count
//! measurements that stay pinned to the page across zoom, quarter-turn
//! rotation, and reopening in a later session.
//!
//! ## Core Components
//!
//! - **Viewport**: conversion between the displayed viewport's pixels and
//!   normalized, rotation-invariant document space
//! - **Calibration**: two-point derivation of a units-per-pixel scale
//!   factor, with range and accuracy validation
//! - **Calculator**: pure linear/area/perimeter/volume/count math over
//!   document points
//! - **Cutouts**: holes subtracted from area/volume measurements with net
//!   value maintenance
//! - **Session**: the interactive drawing state machine with snapping,
//!   undo, and idempotent completion
//! - **Serialization**: versioned JSON takeoff documents
//!
//! ## Architecture
//!
//! ```text
//! Host (rendering, dialogs, persistence backend)
//!   ├── ViewPoint events ──▶ viewport ──▶ DocumentPoint
//!   ├── DrawingSession (capture, snap, undo, complete)
//!   │     └── calculator (+ CalibrationRecord) ──▶ Measurement
//!   ├── CalibrationEngine ──▶ CalibrationRecord
//!   ├── CutoutEngine (net value maintenance)
//!   └── TakeoffFile (save/load)
//! ```
//!
//! The core is synchronous and single-threaded: every operation is an
//! instantaneous state transition, and persistence is fire-and-forget
//! through the host's [`takeoffkit_core::MeasurementStore`].

pub mod calculator;
pub mod calibration;
pub mod cutout;
pub mod serialization;
pub mod session;
pub mod snap;
pub mod viewport;

pub use calculator::{
    count_value, evaluate, linear_distance, perimeter, polygon_area, volume, EvaluateOptions,
    Evaluation,
};
pub use calibration::{CalibrationEngine, CalibrationOutcome, CalibrationState};
pub use cutout::{CutoutEngine, CutoutOutcome, NegativeNetPolicy};
pub use serialization::{TakeoffFile, TakeoffFileError, TakeoffMetadata};
pub use session::{
    ClickOutcome, CompletionOutcome, DrawingSession, EscapeOutcome, SessionState,
};
pub use snap::ortho_snap;
pub use viewport::{project_points, to_document_space, to_view_space, ViewPoint};
