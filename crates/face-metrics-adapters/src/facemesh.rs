//! Face-mesh landmark inference via ONNX Runtime.
//!
//! Wraps a MediaPipe face-mesh model with attention/iris refinement (478
//! points), configured for a single still image and at most one face. The
//! ONNX Runtime session is not reentrant for mutation, so inference calls
//! are serialized behind a mutex.

// Allow common ML/image code patterns
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use face_metrics_core::domain::{LandmarkSet, Point3};
use face_metrics_core::ports::FaceLandmarker;
use image::{imageops::FilterType, DynamicImage};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use tracing::debug;

/// Model input edge length.
pub const MESH_INPUT_SIZE: u32 = 192;

/// Number of points in the refined (attention) mesh, iris included.
pub const MESH_POINTS: usize = 478;

/// Default face-presence probability below which "no face" is reported.
pub const DEFAULT_PRESENCE_THRESHOLD: f32 = 0.5;

/// Landmarker adapter over a face-mesh ONNX session.
pub struct FaceMeshLandmarker {
    session: Mutex<Session>,
    presence_threshold: f32,
}

impl FaceMeshLandmarker {
    /// Loads the face-mesh model from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the ONNX model cannot be loaded.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_threshold(path, DEFAULT_PRESENCE_THRESHOLD)
    }

    /// Loads the model with a custom face-presence threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the ONNX model cannot be loaded.
    pub fn with_threshold(path: impl AsRef<Path>, presence_threshold: f32) -> Result<Self> {
        let path = path.as_ref();
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(ort::Error::<()>::from)?
            .with_intra_threads(2)
            .map_err(ort::Error::<()>::from)?
            .commit_from_file(path)
            .with_context(|| format!("failed to load face mesh model: {}", path.display()))?;

        Ok(Self {
            session: Mutex::new(session),
            presence_threshold,
        })
    }

    /// Scales the raw mesh output (input-pixel space) into normalized points.
    fn to_landmark_set(raw: &[f32]) -> LandmarkSet {
        let edge = MESH_INPUT_SIZE as f32;
        let points = raw
            .chunks_exact(3)
            .take(MESH_POINTS)
            .map(|chunk| Point3 {
                x: chunk[0] / edge,
                y: chunk[1] / edge,
                z: chunk[2] / edge,
            })
            .collect();
        LandmarkSet::new(points)
    }
}

impl FaceLandmarker for FaceMeshLandmarker {
    fn landmarks(&self, image: &DynamicImage) -> Result<Option<LandmarkSet>> {
        let rgb = image.to_rgb8();
        let resized = image::imageops::resize(
            &rgb,
            MESH_INPUT_SIZE,
            MESH_INPUT_SIZE,
            FilterType::Triangle,
        );

        let mut input =
            Vec::with_capacity((MESH_INPUT_SIZE * MESH_INPUT_SIZE * 3) as usize);
        for pixel in resized.pixels() {
            input.push(f32::from(pixel[0]) / 255.0);
            input.push(f32::from(pixel[1]) / 255.0);
            input.push(f32::from(pixel[2]) / 255.0);
        }

        let shape = vec![
            1,
            i64::from(MESH_INPUT_SIZE),
            i64::from(MESH_INPUT_SIZE),
            3,
        ];
        let tensor = Tensor::from_array((shape, input))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("face mesh session lock poisoned: {e}"))?;
        let outputs = session.run(ort::inputs![tensor])?;

        // The converted model exposes two outputs: the 478x3 coordinate
        // block (input-pixel space) and a scalar face-presence logit. Output
        // names vary between conversions, so identify them by size.
        let mut coordinates: Option<Vec<f32>> = None;
        let mut presence_logit: Option<f32> = None;

        for (_, value) in outputs.iter() {
            let (_, data) = value.try_extract_tensor::<f32>()?;
            if data.len() >= MESH_POINTS * 3 {
                coordinates = Some(data.to_vec());
            } else if data.len() == 1 {
                presence_logit = Some(data[0]);
            }
        }

        let coordinates = coordinates.context("face mesh output missing coordinate block")?;
        let presence_logit = presence_logit.context("face mesh output missing presence score")?;

        let presence = 1.0 / (1.0 + (-presence_logit).exp());
        debug!("face presence score {presence:.3}");

        if presence < self.presence_threshold {
            return Ok(None);
        }

        Ok(Some(Self::to_landmark_set(&coordinates)))
    }
}
