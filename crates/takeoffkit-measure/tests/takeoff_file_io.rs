//! Takeoff file save/load round trips.

use takeoffkit_core::{
    CalibrationRecord, CalibrationScope, DocumentPoint, Measurement, MeasurementKind, Rotation,
    Unit,
};
use takeoffkit_measure::TakeoffFile;

use chrono::Utc;
use uuid::Uuid;

fn record(scope: CalibrationScope) -> CalibrationRecord {
    CalibrationRecord {
        scale_factor: 0.1,
        unit: Unit::Feet,
        base_width: 1000.0,
        base_height: 800.0,
        rotation_at_calibration: Rotation::R0,
        scope,
    }
}

fn measurement(page: u32) -> Measurement {
    Measurement {
        id: Uuid::new_v4(),
        page,
        kind: MeasurementKind::Area,
        points: vec![
            DocumentPoint::new(0.1, 0.1),
            DocumentPoint::new(0.9, 0.1),
            DocumentPoint::new(0.9, 0.9),
            DocumentPoint::new(0.1, 0.9),
        ],
        calculated_value: 5120.0,
        unit: Unit::Feet,
        perimeter_value: Some(288.0),
        depth: None,
        cutouts: Vec::new(),
        net_calculated_value: None,
        created: Utc::now(),
    }
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warehouse.takeoff.json");

    let mut file = TakeoffFile::new("Warehouse");
    file.metadata.author = "estimating".to_string();
    file.apply_calibration(1, record(CalibrationScope::Document));
    file.apply_calibration(3, record(CalibrationScope::Page));
    file.add_measurement(measurement(1));
    file.add_measurement(measurement(3));

    file.save_to_file(&path).unwrap();
    let loaded = TakeoffFile::load_from_file(&path).unwrap();

    assert_eq!(loaded.metadata.name, "Warehouse");
    assert_eq!(loaded.metadata.author, "estimating");
    assert_eq!(loaded.measurements, file.measurements);
    assert_eq!(loaded.document_calibration, file.document_calibration);
    assert_eq!(loaded.page_calibrations, file.page_calibrations);

    // Scope resolution survives the trip.
    assert_eq!(
        loaded.effective_calibration(3).unwrap().scope,
        CalibrationScope::Page
    );
    assert_eq!(
        loaded.effective_calibration(5).unwrap().scope,
        CalibrationScope::Document
    );
}

#[test]
fn test_unknown_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.takeoff.json");

    let mut file = TakeoffFile::new("Future");
    file.version = "9.9".to_string();
    file.save_to_file(&path).unwrap();

    let err = TakeoffFile::load_from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Unsupported takeoff file version"));
}

#[test]
fn test_missing_file_reports_path() {
    let err = TakeoffFile::load_from_file(std::path::Path::new("/nonexistent/t.json"))
        .unwrap_err();
    assert!(err.to_string().contains("/nonexistent/t.json"));
}
