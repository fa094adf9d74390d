//! Face landmark port.

use image::DynamicImage;

use crate::domain::LandmarkSet;

/// Port for producing dense facial landmarks from a color image.
///
/// Implementations wrap a face-mesh model with refined (iris) landmarks
/// enabled, configured for a single still image and at most one face.
pub trait FaceLandmarker: Send + Sync {
    /// Runs landmark inference.
    ///
    /// Returns `Ok(None)` when no face is present, which callers must keep
    /// distinct from a decode failure.
    ///
    /// # Errors
    ///
    /// Returns an error if model inference itself fails.
    fn landmarks(&self, image: &DynamicImage) -> anyhow::Result<Option<LandmarkSet>>;
}
