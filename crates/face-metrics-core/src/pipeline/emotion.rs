//! Emotion classification pipeline.
//!
//! Locates a face with the classical detector, crops the region (falling
//! back to the whole image when nothing is found), and hands the crop to
//! the emotion model.

use std::sync::Arc;

use image::{DynamicImage, GrayImage};
use tracing::debug;

use crate::domain::{AnalysisError, EmotionResult, FaceRegion};
use crate::ports::{EmotionModel, FaceDetector};

/// End-to-end emotion analysis over a decoded image.
pub struct EmotionPipeline {
    detector: Arc<dyn FaceDetector>,
    model: Arc<dyn EmotionModel>,
}

impl EmotionPipeline {
    /// Creates a pipeline over the given detector and model.
    #[must_use]
    pub fn new(detector: Arc<dyn FaceDetector>, model: Arc<dyn EmotionModel>) -> Self {
        Self { detector, model }
    }

    /// Classifies the dominant emotion in the image.
    ///
    /// Detection order is the detector's native ordering; only the first
    /// face is used. Zero detections are not an error: the whole image
    /// becomes the face region.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Inference`] if the model fails.
    pub fn analyze(&self, image: &DynamicImage) -> Result<EmotionResult, AnalysisError> {
        let gray = image.to_luma8();

        let faces = self.detector.detect(&gray);
        debug!("detected {} face(s)", faces.len());

        let region = faces.first().copied();
        let face = crop_face_region(&gray, region);

        let probabilities = self
            .model
            .predict(&face)
            .map_err(|e| AnalysisError::inference(&e))?;

        Ok(EmotionResult::from_probabilities(probabilities))
    }
}

/// Crops the face region out of the grayscale image, clamped to bounds.
///
/// `None` means no face was detected and the entire image is used.
fn crop_face_region(gray: &GrayImage, region: Option<FaceRegion>) -> GrayImage {
    let Some(region) = region else {
        return gray.clone();
    };

    let x = region.x.min(gray.width().saturating_sub(1));
    let y = region.y.min(gray.height().saturating_sub(1));
    let width = region.width.min(gray.width() - x).max(1);
    let height = region.height.min(gray.height() - y).max(1);

    image::imageops::crop_imm(gray, x, y, width, height).to_image()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Detector stub returning a fixed region list.
    struct FixedDetector {
        regions: Vec<FaceRegion>,
    }

    impl FaceDetector for FixedDetector {
        fn detect(&self, _gray: &GrayImage) -> Vec<FaceRegion> {
            self.regions.clone()
        }
    }

    /// Model stub recording the crop dimensions it received.
    struct RecordingModel {
        seen: Mutex<Option<(u32, u32)>>,
        probabilities: [f32; 7],
    }

    impl RecordingModel {
        fn new(probabilities: [f32; 7]) -> Self {
            Self {
                seen: Mutex::new(None),
                probabilities,
            }
        }
    }

    impl EmotionModel for RecordingModel {
        fn predict(&self, face: &GrayImage) -> anyhow::Result<[f32; 7]> {
            *self.seen.lock().unwrap() = Some((face.width(), face.height()));
            Ok(self.probabilities)
        }
    }

    fn test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, image::Luma([128u8])))
    }

    const UNIFORM: [f32; 7] = [0.1, 0.1, 0.1, 0.4, 0.1, 0.1, 0.1];

    #[test]
    fn test_no_face_uses_whole_image() {
        let detector = Arc::new(FixedDetector { regions: vec![] });
        let model = Arc::new(RecordingModel::new(UNIFORM));
        let pipeline = EmotionPipeline::new(detector, Arc::clone(&model) as _);

        let result = pipeline.analyze(&test_image(120, 90)).unwrap();

        assert_eq!(result.predicted_emotion, "happy");
        assert_eq!(*model.seen.lock().unwrap(), Some((120, 90)));
    }

    #[test]
    fn test_first_face_of_many_is_used() {
        let detector = Arc::new(FixedDetector {
            regions: vec![
                FaceRegion {
                    x: 10,
                    y: 10,
                    width: 40,
                    height: 50,
                },
                FaceRegion {
                    x: 70,
                    y: 10,
                    width: 30,
                    height: 30,
                },
            ],
        });
        let model = Arc::new(RecordingModel::new(UNIFORM));
        let pipeline = EmotionPipeline::new(detector, Arc::clone(&model) as _);

        pipeline.analyze(&test_image(120, 90)).unwrap();

        assert_eq!(*model.seen.lock().unwrap(), Some((40, 50)));
    }

    #[test]
    fn test_region_outside_bounds_is_clamped() {
        let detector = Arc::new(FixedDetector {
            regions: vec![FaceRegion {
                x: 100,
                y: 80,
                width: 500,
                height: 500,
            }],
        });
        let model = Arc::new(RecordingModel::new(UNIFORM));
        let pipeline = EmotionPipeline::new(detector, Arc::clone(&model) as _);

        pipeline.analyze(&test_image(120, 90)).unwrap();

        assert_eq!(*model.seen.lock().unwrap(), Some((20, 10)));
    }

    #[test]
    fn test_model_failure_maps_to_inference_error() {
        struct FailingModel;
        impl EmotionModel for FailingModel {
            fn predict(&self, _face: &GrayImage) -> anyhow::Result<[f32; 7]> {
                anyhow::bail!("tensor shape mismatch")
            }
        }

        let pipeline = EmotionPipeline::new(
            Arc::new(FixedDetector { regions: vec![] }),
            Arc::new(FailingModel),
        );

        let err = pipeline.analyze(&test_image(64, 64)).unwrap_err();
        assert!(matches!(err, AnalysisError::Inference(_)));
        assert!(err.to_string().contains("tensor shape mismatch"));
    }
}
