//! Shared application state: the two pipelines over loaded models.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use face_metrics_adapters::{
    model_path, set_models_dir, FaceMeshLandmarker, SeetaConfig, SeetaDetector,
};
use face_metrics_core::inference::{get_device, EmotionClassifier};
use face_metrics_core::{EmotionPipeline, GazePipeline};
use tracing::info;

use crate::config::AppConfig;

/// Process-wide read-only state shared by all requests.
///
/// Models are loaded once at startup and never mutated afterwards; both
/// pipelines are safe to call from concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub emotion: Arc<EmotionPipeline>,
    pub gaze: Arc<GazePipeline>,
}

impl AppState {
    /// Loads all models and wires the pipelines.
    ///
    /// This is the startup-fatal path: any failure here means the process
    /// must not claim readiness to serve.
    ///
    /// # Errors
    ///
    /// Returns an error if any model fails to load (for the emotion model,
    /// after both load strategies have been tried).
    pub fn initialize(config: &AppConfig) -> Result<Self> {
        if let Some(dir) = &config.models.dir {
            set_models_dir(dir.clone());
        }

        let emotion_path = resolve(config.models.emotion.clone(), "emotion")?;
        let mesh_path = resolve(config.models.face_mesh.clone(), "face_mesh")?;
        let detector_path = resolve(config.models.face_detector.clone(), "face_detector")?;

        let device = get_device();
        let classifier = EmotionClassifier::from_file(&emotion_path, &device)
            .context("emotion model unavailable, cannot serve emotion requests")?;

        let detector = SeetaDetector::from_file(
            &detector_path,
            SeetaConfig {
                min_face_size: config.detector.min_face_size,
                score_threshold: config.detector.score_threshold,
                pyramid_scale_factor: config.detector.pyramid_scale_factor,
                window_step: config.detector.window_step,
            },
        )
        .context("face detector model unavailable")?;

        let landmarker =
            FaceMeshLandmarker::from_file(&mesh_path).context("face mesh model unavailable")?;

        info!("all models loaded, pipelines ready");

        Ok(Self {
            emotion: Arc::new(EmotionPipeline::new(
                Arc::new(detector),
                Arc::new(classifier),
            )),
            gaze: Arc::new(GazePipeline::new(Arc::new(landmarker))),
        })
    }

    /// Builds state from already-constructed pipelines. Used by tests to
    /// inject mock-backed pipelines.
    #[must_use]
    pub fn from_pipelines(emotion: EmotionPipeline, gaze: GazePipeline) -> Self {
        Self {
            emotion: Arc::new(emotion),
            gaze: Arc::new(gaze),
        }
    }
}

fn resolve(explicit: Option<PathBuf>, name: &str) -> Result<PathBuf> {
    explicit
        .or_else(|| model_path(name))
        .with_context(|| format!("no path configured for model '{name}'"))
}
