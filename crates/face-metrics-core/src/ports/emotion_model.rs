//! Emotion model port.

use image::GrayImage;

/// Port for the pretrained emotion classifier.
///
/// The input is an already-cropped grayscale face region of arbitrary size;
/// implementations own the resize/normalize steps their model requires.
pub trait EmotionModel: Send + Sync {
    /// Returns a probability vector over the 7 emotion categories, in
    /// [`crate::domain::EMOTION_LABELS`] order.
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing or inference fails.
    fn predict(&self, face: &GrayImage) -> anyhow::Result<[f32; 7]>;
}
