//! Axis snapping during capture: the measurement-session toggle and the
//! second-calibration-point convention.

use takeoffkit_core::{
    CalibrationRecord, CalibrationScope, DocumentPoint, FixedPageGeometry, MeasurementKind,
    Rotation, Unit,
};
use takeoffkit_measure::{ortho_snap, CalibrationEngine, DrawingSession};

fn calib() -> CalibrationRecord {
    CalibrationRecord {
        scale_factor: 0.1,
        unit: Unit::Feet,
        base_width: 1000.0,
        base_height: 1000.0,
        rotation_at_calibration: Rotation::R0,
        scope: CalibrationScope::Document,
    }
}

#[test]
fn test_snapping_toggle_mid_session() {
    let mut session = DrawingSession::new(MeasurementKind::Linear, 1, calib());
    session.click(DocumentPoint::new(0.1, 0.1)).unwrap();

    // Unsnapped: the point lands where clicked.
    session.click(DocumentPoint::new(0.5, 0.13)).unwrap();
    assert_eq!(
        session.points().last().copied(),
        Some(DocumentPoint::new(0.5, 0.13))
    );

    // Modifier held: the next point squares up against the previous one.
    session.set_ortho_snapping(true);
    session.click(DocumentPoint::new(0.9, 0.16)).unwrap();
    assert_eq!(
        session.points().last().copied(),
        Some(DocumentPoint::new(0.9, 0.13))
    );

    // Released again: free placement resumes.
    session.set_ortho_snapping(false);
    session.click(DocumentPoint::new(0.95, 0.4)).unwrap();
    assert_eq!(
        session.points().last().copied(),
        Some(DocumentPoint::new(0.95, 0.4))
    );
}

#[test]
fn test_snapped_segment_measures_single_axis() {
    // A snapped horizontal run measures pure x-distance even when the
    // cursor wandered vertically.
    let mut session = DrawingSession::new(MeasurementKind::Linear, 1, calib());
    session.set_ortho_snapping(true);
    session.click(DocumentPoint::new(0.0, 0.5)).unwrap();
    session.click(DocumentPoint::new(0.3, 0.55)).unwrap();

    // 300 base px at 0.1 ft/px; the 0.05 vertical wander snapped away.
    assert!((session.running_length() - 30.0).abs() < 1e-9);
}

#[test]
fn test_calibration_second_point_snapped_by_convention() {
    // Hosts run the second calibration pick through ortho_snap so scale
    // bars measure square; a slightly sloppy pick still yields the exact
    // horizontal distance.
    let page = FixedPageGeometry::new(1000.0, 1000.0);
    let mut engine = CalibrationEngine::new();
    engine
        .begin(10.0, Unit::Feet, CalibrationScope::Document)
        .unwrap();

    let first = DocumentPoint::new(0.2, 0.5);
    engine.add_point(first, Rotation::R0, &page).unwrap();

    let sloppy_second = DocumentPoint::new(0.3, 0.52);
    let snapped = ortho_snap(sloppy_second, first);
    let outcome = engine
        .add_point(snapped, Rotation::R0, &page)
        .unwrap()
        .unwrap();

    // Exactly 100 px → 0.1 ft/px, no diagonal contamination.
    assert!((outcome.record.scale_factor - 0.1).abs() < 1e-12);
}
