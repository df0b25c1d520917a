//! Coordinate transformation between view space and document space.
//!
//! Handles conversion between pixel coordinates (the viewport currently
//! displayed, already at the live rotation and zoom) and document coordinates
//! (normalized `[0,1]²`, relative to the page's base orientation). The two
//! transforms are exact inverses, which is what makes a stored measurement
//! stick to the page across zoom and rotation changes.

use takeoffkit_core::{DocumentPoint, Rotation, ViewportDescriptor};

/// A point in view space: pixels in whatever viewport is displayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPoint {
    pub x: f64,
    pub y: f64,
}

impl ViewPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Converts view-space pixel coordinates to document space.
///
/// The viewport is the one the pointer event happened in; for quarter
/// rotations its width/height are already the base page's swapped.
///
/// Formula per rotation (W/H are the live viewport dimensions):
/// ```text
///   0°:   doc_x = x/W          doc_y = y/H
///   90°:  doc_x = y/H          doc_y = 1 - x/W
///   180°: doc_x = 1 - x/W      doc_y = 1 - y/H
///   270°: doc_x = 1 - y/H      doc_y = x/W
/// ```
pub fn to_document_space(view: ViewPoint, viewport: &ViewportDescriptor) -> DocumentPoint {
    debug_assert!(
        viewport.width > 0.0 && viewport.height > 0.0,
        "viewport must have positive dimensions, got {}x{}",
        viewport.width,
        viewport.height
    );
    let fx = view.x / viewport.width;
    let fy = view.y / viewport.height;
    match viewport.rotation {
        Rotation::R0 => DocumentPoint::new(fx, fy),
        Rotation::R90 => DocumentPoint::new(fy, 1.0 - fx),
        Rotation::R180 => DocumentPoint::new(1.0 - fx, 1.0 - fy),
        Rotation::R270 => DocumentPoint::new(1.0 - fy, fx),
    }
}

/// Converts a document-space point back to view-space pixels — the inverse
/// of [`to_document_space`] for the same viewport.
///
/// Formula per rotation:
/// ```text
///   0°:   x = W·doc_x          y = H·doc_y
///   90°:  x = W·(1 - doc_y)    y = H·doc_x
///   180°: x = W·(1 - doc_x)    y = H·(1 - doc_y)
///   270°: x = W·doc_y          y = H·(1 - doc_x)
/// ```
pub fn to_view_space(doc: DocumentPoint, viewport: &ViewportDescriptor) -> ViewPoint {
    debug_assert!(
        viewport.width > 0.0 && viewport.height > 0.0,
        "viewport must have positive dimensions, got {}x{}",
        viewport.width,
        viewport.height
    );
    let w = viewport.width;
    let h = viewport.height;
    match viewport.rotation {
        Rotation::R0 => ViewPoint::new(w * doc.x, h * doc.y),
        Rotation::R90 => ViewPoint::new(w * (1.0 - doc.y), h * doc.x),
        Rotation::R180 => ViewPoint::new(w * (1.0 - doc.x), h * (1.0 - doc.y)),
        Rotation::R270 => ViewPoint::new(w * doc.y, h * (1.0 - doc.x)),
    }
}

/// Projects a stored point set into the current viewport for rendering.
pub fn project_points(points: &[DocumentPoint], viewport: &ViewportDescriptor) -> Vec<ViewPoint> {
    points.iter().map(|p| to_view_space(*p, viewport)).collect()
}
