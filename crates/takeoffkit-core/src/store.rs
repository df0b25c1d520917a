//! Host-facing traits
//!
//! The measurement core never owns the rendered page or the persisted
//! measurement list. Hosts supply page geometry through
//! [`PageGeometryProvider`] and persistence through [`MeasurementStore`];
//! the core only calls through these seams.

use std::collections::HashMap;

use uuid::Uuid;

use crate::data::{Measurement, Rotation, ViewportDescriptor};
use crate::error::StoreError;

/// Supplies viewport dimensions for the active page.
///
/// Calibration asks for the base viewport (scale = 1) at the live rotation;
/// the host's rendering adapter asks for live viewports when projecting
/// stored points back to the screen.
pub trait PageGeometryProvider {
    /// Viewport for the active page at the given scale and rotation.
    fn get_viewport(&self, scale: f64, rotation: Rotation) -> ViewportDescriptor;
}

/// A fixed-size page: the simplest possible geometry provider.
///
/// Holds the base (unrotated, unscaled) pixel dimensions and derives every
/// other viewport from them, swapping axes for quarter rotations.
#[derive(Debug, Clone, Copy)]
pub struct FixedPageGeometry {
    pub base_width: f64,
    pub base_height: f64,
}

impl FixedPageGeometry {
    pub fn new(base_width: f64, base_height: f64) -> Self {
        Self {
            base_width,
            base_height,
        }
    }
}

impl PageGeometryProvider for FixedPageGeometry {
    fn get_viewport(&self, scale: f64, rotation: Rotation) -> ViewportDescriptor {
        let (w, h) = if rotation.swaps_axes() {
            (self.base_height, self.base_width)
        } else {
            (self.base_width, self.base_height)
        };
        ViewportDescriptor::new(w * scale, h * scale, scale, rotation)
    }
}

/// Persistence seam for finished measurements.
///
/// The core calls `save`/`update`/`delete` and treats the operations as
/// fire-and-forget; it never blocks new input on persistence completing.
pub trait MeasurementStore {
    /// Persists a new measurement, returning its id.
    fn save(&mut self, measurement: Measurement) -> Result<Uuid, StoreError>;

    /// Replaces a stored measurement (cutout attachment goes through here).
    fn update(&mut self, id: Uuid, measurement: Measurement) -> Result<(), StoreError>;

    /// Removes a stored measurement.
    fn delete(&mut self, id: Uuid) -> Result<(), StoreError>;

    /// All measurements recorded on a page.
    fn query_by_page(&self, page: u32) -> Vec<Measurement>;
}

/// In-memory [`MeasurementStore`], suitable for tests and single-session
/// hosts without a persistence backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    measurements: HashMap<Uuid, Measurement>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    pub fn get(&self, id: &Uuid) -> Option<&Measurement> {
        self.measurements.get(id)
    }
}

impl MeasurementStore for MemoryStore {
    fn save(&mut self, measurement: Measurement) -> Result<Uuid, StoreError> {
        let id = measurement.id;
        tracing::debug!(%id, page = measurement.page, kind = %measurement.kind, "measurement saved");
        self.measurements.insert(id, measurement);
        Ok(id)
    }

    fn update(&mut self, id: Uuid, measurement: Measurement) -> Result<(), StoreError> {
        if !self.measurements.contains_key(&id) {
            return Err(StoreError::NotFound { id });
        }
        self.measurements.insert(id, measurement);
        Ok(())
    }

    fn delete(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.measurements
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound { id })
    }

    fn query_by_page(&self, page: u32) -> Vec<Measurement> {
        let mut found: Vec<Measurement> = self
            .measurements
            .values()
            .filter(|m| m.page == page)
            .cloned()
            .collect();
        found.sort_by_key(|m| m.created);
        found
    }
}
