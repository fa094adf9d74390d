//! Mock implementations of the core port traits.

use std::sync::{Arc, Mutex, PoisonError};

use face_metrics_core::domain::{FaceRegion, LandmarkSet};
use face_metrics_core::ports::{EmotionModel, FaceDetector, FaceLandmarker};
use image::{DynamicImage, GrayImage};

/// Mock `FaceDetector` yielding a preset region list.
///
/// Tracks call counts for assertions.
pub struct MockFaceDetector {
    regions: Vec<FaceRegion>,
    calls: Arc<Mutex<usize>>,
}

impl MockFaceDetector {
    /// Creates a detector that always returns the given regions.
    #[must_use]
    pub fn new(regions: Vec<FaceRegion>) -> Self {
        Self {
            regions,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates a detector that never finds a face.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Number of times `detect` has been called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FaceDetector for MockFaceDetector {
    fn detect(&self, _gray: &GrayImage) -> Vec<FaceRegion> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls += 1;
        }
        self.regions.clone()
    }
}

/// Mock `FaceLandmarker` with a preset outcome.
pub struct MockLandmarker {
    outcome: Outcome,
}

enum Outcome {
    Landmarks(LandmarkSet),
    NoFace,
    Failure(String),
}

impl MockLandmarker {
    /// Always yields the given landmark set.
    #[must_use]
    pub fn with_landmarks(landmarks: LandmarkSet) -> Self {
        Self {
            outcome: Outcome::Landmarks(landmarks),
        }
    }

    /// Always reports "no face detected".
    #[must_use]
    pub fn no_face() -> Self {
        Self {
            outcome: Outcome::NoFace,
        }
    }

    /// Always fails inference with the given message.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failure(message.into()),
        }
    }
}

impl FaceLandmarker for MockLandmarker {
    fn landmarks(&self, _image: &DynamicImage) -> anyhow::Result<Option<LandmarkSet>> {
        match &self.outcome {
            Outcome::Landmarks(set) => Ok(Some(set.clone())),
            Outcome::NoFace => Ok(None),
            Outcome::Failure(message) => Err(anyhow::anyhow!("{message}")),
        }
    }
}

/// Mock `EmotionModel` returning a fixed probability vector.
pub struct MockEmotionModel {
    probabilities: [f32; 7],
    fail_message: Option<String>,
}

impl MockEmotionModel {
    /// Always predicts the given distribution.
    #[must_use]
    pub fn new(probabilities: [f32; 7]) -> Self {
        Self {
            probabilities,
            fail_message: None,
        }
    }

    /// Always fails prediction with the given message.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            probabilities: [0.0; 7],
            fail_message: Some(message.into()),
        }
    }
}

impl EmotionModel for MockEmotionModel {
    fn predict(&self, _face: &GrayImage) -> anyhow::Result<[f32; 7]> {
        if let Some(message) = &self.fail_message {
            anyhow::bail!("{message}");
        }
        Ok(self.probabilities)
    }
}
