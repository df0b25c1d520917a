//! Orthogonal snapping for point capture.

use takeoffkit_core::DocumentPoint;

/// Constrains a candidate point to be exactly horizontal or vertical
/// relative to the previous point, whichever axis dominates the delta.
///
/// Enabled by convention for the second calibration point; user-toggleable
/// (e.g. via a modifier key) during measurement.
pub fn ortho_snap(candidate: DocumentPoint, last: DocumentPoint) -> DocumentPoint {
    if (candidate.x - last.x).abs() > (candidate.y - last.y).abs() {
        DocumentPoint::new(candidate.x, last.y)
    } else {
        DocumentPoint::new(last.x, candidate.y)
    }
}
