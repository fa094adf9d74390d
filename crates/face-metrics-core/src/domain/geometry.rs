//! Geometric primitives: face regions and landmark sets.

use serde::{Deserialize, Serialize};

/// Pixel rectangle bounding a detected face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRegion {
    /// X coordinate of the top-left corner (pixels).
    pub x: u32,
    /// Y coordinate of the top-left corner (pixels).
    pub y: u32,
    /// Width of the region (pixels).
    pub width: u32,
    /// Height of the region (pixels).
    pub height: u32,
}

/// A single normalized 3D landmark point.
///
/// `x` and `y` are in `[0, 1]` relative to the image dimensions; `z` is the
/// model's relative depth estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Ordered set of facial landmarks produced by a face-mesh model.
///
/// Indexed positions are semantically fixed (refined MediaPipe topology):
/// specific indices denote eye corners, eyelids and iris centers.
#[derive(Debug, Clone, Default)]
pub struct LandmarkSet {
    points: Vec<Point3>,
}

impl LandmarkSet {
    /// Creates a landmark set from an ordered point list.
    #[must_use]
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// Returns the point at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Point3> {
        self.points.get(index).copied()
    }

    /// Number of points in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the set contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in index order.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }
}
