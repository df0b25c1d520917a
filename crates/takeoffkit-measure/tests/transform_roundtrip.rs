//! Coordinate transform round-trip properties.
//!
//! The guarantee that makes annotations stick to the page: converting a
//! document point to any viewport and back is the identity, for every
//! canonical rotation and zoom level.

use proptest::prelude::*;
use takeoffkit_core::constants::GEOMETRY_EPSILON;
use takeoffkit_core::{DocumentPoint, FixedPageGeometry, PageGeometryProvider, Rotation};
use takeoffkit_measure::{to_document_space, to_view_space};

const ROTATIONS: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

proptest! {
    #[test]
    fn round_trip_is_identity(
        x in 0.0f64..=1.0,
        y in 0.0f64..=1.0,
        rotation_index in 0usize..4,
        scale in 0.25f64..8.0,
    ) {
        let page = FixedPageGeometry::new(850.0, 1100.0);
        let rotation = ROTATIONS[rotation_index];
        let viewport = page.get_viewport(scale, rotation);
        let doc = DocumentPoint::new(x, y);

        let back = to_document_space(to_view_space(doc, &viewport), &viewport);
        prop_assert!((back.x - doc.x).abs() < GEOMETRY_EPSILON);
        prop_assert!((back.y - doc.y).abs() < GEOMETRY_EPSILON);
    }

    #[test]
    fn document_point_is_rotation_invariant(
        x in 0.0f64..=1.0,
        y in 0.0f64..=1.0,
        from_index in 0usize..4,
        to_index in 0usize..4,
    ) {
        // Capture in one viewport, re-render in another, re-capture: the
        // stored document point never drifts.
        let page = FixedPageGeometry::new(850.0, 1100.0);
        let vp_a = page.get_viewport(1.5, ROTATIONS[from_index]);
        let vp_b = page.get_viewport(3.0, ROTATIONS[to_index]);
        let doc = DocumentPoint::new(x, y);

        let captured = to_document_space(to_view_space(doc, &vp_a), &vp_a);
        let recaptured = to_document_space(to_view_space(captured, &vp_b), &vp_b);
        prop_assert!((recaptured.x - doc.x).abs() < GEOMETRY_EPSILON);
        prop_assert!((recaptured.y - doc.y).abs() < GEOMETRY_EPSILON);
    }
}

#[test]
fn normalization_canonicalizes_raw_degrees() {
    assert_eq!(Rotation::normalize(-90), Rotation::R270);
    assert_eq!(Rotation::normalize(450), Rotation::R90);
    assert_eq!(Rotation::normalize(37), Rotation::R0);
    assert_eq!(Rotation::normalize(720), Rotation::R0);
    assert_eq!(Rotation::normalize(-1), Rotation::R0);
}
