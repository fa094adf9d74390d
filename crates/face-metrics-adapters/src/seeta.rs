//! Classical face detection backed by the `rustface` crate (SeetaFace).
//!
//! Fills the [`FaceDetector`] port with a frontal-face cascade detector.
//! The parsed model is shared; the `rustface` detector object itself is not
//! `Sync`, so a fresh one is built per call from the shared model.

// Allow common image code patterns
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use face_metrics_core::domain::FaceRegion;
use face_metrics_core::ports::FaceDetector;
use image::GrayImage;
use tracing::debug;

/// Detection tuning for the SeetaFace cascade.
///
/// Mirrors the classical detector knobs: pyramid scale step, score (vote)
/// threshold, minimum detectable face size, and sliding window step.
#[derive(Debug, Clone)]
pub struct SeetaConfig {
    /// Minimum detectable face edge, in pixels.
    pub min_face_size: u32,
    /// Classifier score threshold; higher means fewer, surer detections.
    pub score_threshold: f64,
    /// Image pyramid scale factor in `(0, 1)`.
    pub pyramid_scale_factor: f32,
    /// Sliding window step in x and y, in pixels.
    pub window_step: u32,
}

impl Default for SeetaConfig {
    fn default() -> Self {
        Self {
            min_face_size: 30,
            score_threshold: 2.0,
            pyramid_scale_factor: 0.8,
            window_step: 4,
        }
    }
}

/// Face detector adapter over a SeetaFace frontal model.
pub struct SeetaDetector {
    model: rustface::Model,
    config: SeetaConfig,
}

impl SeetaDetector {
    /// Loads the SeetaFace model from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the model file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>, config: SeetaConfig) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .with_context(|| format!("failed to read face detector model: {}", path.display()))?;
        let model = rustface::read_model(Cursor::new(data))
            .map_err(|e| anyhow::anyhow!("failed to parse SeetaFace model: {e}"))?;

        Ok(Self { model, config })
    }
}

impl FaceDetector for SeetaDetector {
    fn detect(&self, gray: &GrayImage) -> Vec<FaceRegion> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(self.config.min_face_size);
        detector.set_score_thresh(self.config.score_threshold);
        detector.set_pyramid_scale_factor(self.config.pyramid_scale_factor);
        detector.set_slide_window_step(self.config.window_step, self.config.window_step);

        let faces = detector.detect(&rustface::ImageData::new(
            gray.as_raw(),
            gray.width(),
            gray.height(),
        ));

        debug!("seeta detector found {} face(s)", faces.len());

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                // SeetaFace may report boxes with negative origin near edges.
                FaceRegion {
                    x: bbox.x().max(0) as u32,
                    y: bbox.y().max(0) as u32,
                    width: bbox.width(),
                    height: bbox.height(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_deployment_policy() {
        let config = SeetaConfig::default();
        assert_eq!(config.min_face_size, 30);
        assert!(config.pyramid_scale_factor > 0.0 && config.pyramid_scale_factor < 1.0);
    }

    #[test]
    fn test_missing_model_file_is_error() {
        let result = SeetaDetector::from_file("/nonexistent/seeta.bin", SeetaConfig::default());
        assert!(result.is_err());
    }
}
