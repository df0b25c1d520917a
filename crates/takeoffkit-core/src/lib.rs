//! # TakeoffKit Core
//!
//! Core types, traits, and utilities for TakeoffKit.
//! Provides the data model for zoom- and rotation-stable plan measurements:
//! document-space points, viewport descriptors, calibration records,
//! measurements with cutouts, and the seams hosts implement for page
//! geometry and persistence.

pub mod constants;
pub mod data;
pub mod error;
pub mod store;
pub mod units;

pub use data::{
    point_bounds, CalibrationRecord, CalibrationScope, Cutout, DocumentPoint, Measurement,
    MeasurementKind, Rotation, ViewportDescriptor,
};

pub use error::{
    CalibrationError, CalibrationWarning, Error, MeasurementError, MeasurementWarning, Result,
    SessionError, StoreError,
};

pub use store::{FixedPageGeometry, MeasurementStore, MemoryStore, PageGeometryProvider};

pub use units::Unit;
