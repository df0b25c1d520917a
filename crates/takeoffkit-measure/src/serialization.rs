//! Serialization and deserialization for takeoff files.
//!
//! Implements save/load for takeoff documents using JSON: file metadata,
//! the calibrations in effect, and every recorded measurement. Viewports are
//! deliberately absent — they are ephemeral display state, and measurements
//! re-render from document space wherever the file is reopened.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

use takeoffkit_core::{CalibrationRecord, CalibrationScope, Measurement};

/// Takeoff file format version
const FILE_FORMAT_VERSION: &str = "1.0";

/// Format-level load failures.
#[derive(Error, Debug)]
pub enum TakeoffFileError {
    /// The file declares a format version this build cannot read
    #[error("Unsupported takeoff file version: {found}")]
    UnsupportedVersion {
        /// The version string found in the file.
        found: String,
    },
}

/// Complete takeoff file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakeoffFile {
    pub version: String,
    pub metadata: TakeoffMetadata,
    /// Document-wide calibration, the fallback for uncalibrated pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_calibration: Option<CalibrationRecord>,
    /// Page-scoped calibrations, overriding the document calibration.
    #[serde(default)]
    pub page_calibrations: BTreeMap<u32, CalibrationRecord>,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
}

/// Takeoff metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakeoffMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
}

impl TakeoffFile {
    /// Creates an empty takeoff document.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: TakeoffMetadata {
                name: name.into(),
                created: now,
                modified: now,
                author: String::new(),
                description: String::new(),
            },
            document_calibration: None,
            page_calibrations: BTreeMap::new(),
            measurements: Vec::new(),
        }
    }

    /// Records a calibration, routing by its scope: page-scoped records
    /// attach to `page`, document-scoped records replace the fallback.
    pub fn apply_calibration(&mut self, page: u32, record: CalibrationRecord) {
        match record.scope {
            CalibrationScope::Page => {
                self.page_calibrations.insert(page, record);
            }
            CalibrationScope::Document => {
                self.document_calibration = Some(record);
            }
        }
        self.touch();
    }

    /// The calibration in effect on a page: its page-scoped record when one
    /// exists, the document-wide record otherwise.
    pub fn effective_calibration(&self, page: u32) -> Option<&CalibrationRecord> {
        self.page_calibrations
            .get(&page)
            .or(self.document_calibration.as_ref())
    }

    /// Appends a finished measurement.
    pub fn add_measurement(&mut self, measurement: Measurement) {
        self.measurements.push(measurement);
        self.touch();
    }

    /// Removes a measurement by id.
    pub fn remove_measurement(&mut self, id: Uuid) -> bool {
        let before = self.measurements.len();
        self.measurements.retain(|m| m.id != id);
        let removed = self.measurements.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Measurements recorded on a page, in insertion order.
    pub fn measurements_for_page(&self, page: u32) -> Vec<&Measurement> {
        self.measurements.iter().filter(|m| m.page == page).collect()
    }

    fn touch(&mut self) {
        self.metadata.modified = Utc::now();
    }

    /// Saves the takeoff to a JSON file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize takeoff document")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write takeoff file: {}", path.display()))?;
        Ok(())
    }

    /// Loads a takeoff from a JSON file, rejecting unknown format versions.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read takeoff file: {}", path.display()))?;
        let file: TakeoffFile =
            serde_json::from_str(&json).context("Failed to parse takeoff document")?;
        if file.version != FILE_FORMAT_VERSION {
            return Err(TakeoffFileError::UnsupportedVersion {
                found: file.version,
            }
            .into());
        }
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use takeoffkit_core::{
        CalibrationScope, DocumentPoint, MeasurementKind, Rotation, Unit,
    };

    fn record(scope: CalibrationScope, scale_factor: f64) -> CalibrationRecord {
        CalibrationRecord {
            scale_factor,
            unit: Unit::Feet,
            base_width: 1000.0,
            base_height: 800.0,
            rotation_at_calibration: Rotation::R0,
            scope,
        }
    }

    fn sample_measurement(page: u32) -> Measurement {
        Measurement {
            id: Uuid::new_v4(),
            page,
            kind: MeasurementKind::Linear,
            points: vec![DocumentPoint::new(0.0, 0.0), DocumentPoint::new(0.5, 0.0)],
            calculated_value: 25.0,
            unit: Unit::Feet,
            perimeter_value: None,
            depth: None,
            cutouts: Vec::new(),
            net_calculated_value: None,
            created: Utc::now(),
        }
    }

    #[test]
    fn test_page_calibration_overrides_document() {
        let mut file = TakeoffFile::new("Office remodel");
        file.apply_calibration(1, record(CalibrationScope::Document, 0.1));
        file.apply_calibration(2, record(CalibrationScope::Page, 0.05));

        assert_eq!(file.effective_calibration(1).unwrap().scale_factor, 0.1);
        assert_eq!(file.effective_calibration(2).unwrap().scale_factor, 0.05);
        // Pages without their own record fall back to the document's.
        assert_eq!(file.effective_calibration(7).unwrap().scale_factor, 0.1);
    }

    #[test]
    fn test_no_calibration_resolves_to_none() {
        let file = TakeoffFile::new("Empty");
        assert!(file.effective_calibration(1).is_none());
    }

    #[test]
    fn test_measurement_bookkeeping() {
        let mut file = TakeoffFile::new("Test");
        let m1 = sample_measurement(1);
        let id = m1.id;
        file.add_measurement(m1);
        file.add_measurement(sample_measurement(2));

        assert_eq!(file.measurements_for_page(1).len(), 1);
        assert!(file.remove_measurement(id));
        assert!(!file.remove_measurement(id));
        assert!(file.measurements_for_page(1).is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let mut file = TakeoffFile::new("Warehouse takeoff");
        file.apply_calibration(1, record(CalibrationScope::Document, 0.1));
        file.add_measurement(sample_measurement(1));

        let json = serde_json::to_string(&file).unwrap();
        let back: TakeoffFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.measurements, file.measurements);
        assert_eq!(back.document_calibration, file.document_calibration);
        assert_eq!(back.metadata.name, "Warehouse takeoff");
    }
}
