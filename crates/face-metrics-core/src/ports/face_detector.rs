//! Face detection port.

use image::GrayImage;

use crate::domain::FaceRegion;

/// Port for locating face bounding boxes in a grayscale image.
///
/// Implementations wrap a classical frontal-face detector. An empty result
/// means "no face found" and is not an error; callers apply their own
/// fallback policy.
pub trait FaceDetector: Send + Sync {
    /// Detects faces and returns their bounding boxes in detector order.
    fn detect(&self, gray: &GrayImage) -> Vec<FaceRegion>;
}
