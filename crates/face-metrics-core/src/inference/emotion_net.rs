//! Emotion classifier CNN.
//!
//! A small convolutional network over 64x64 grayscale face crops producing
//! a 7-way emotion distribution. Weights are safetensors exported from the
//! pretrained Keras model.

// Allow common ML code patterns
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{Device, Module, Tensor};
use candle_nn::{conv2d, linear, Conv2d, Conv2dConfig, Linear, VarBuilder};
use image::{imageops::FilterType, GrayImage};
use tracing::{info, warn};

use super::loader::{load_checkpoint_tolerant, load_safetensors};
use super::softmax;
use crate::ports::EmotionModel;

/// Picks the device the emotion classifier runs on.
///
/// Prefers a GPU when the corresponding feature is enabled and the device
/// initializes, otherwise falls back to CPU. Called once at startup.
#[must_use]
pub fn get_device() -> Device {
    #[cfg(feature = "metal")]
    if let Ok(device) = Device::new_metal(0) {
        info!("emotion classifier on Metal");
        return device;
    }

    #[cfg(feature = "cuda")]
    if let Ok(device) = Device::new_cuda(0) {
        info!("emotion classifier on CUDA");
        return device;
    }

    info!("emotion classifier on CPU");
    Device::Cpu
}

/// Input edge length for face crops.
pub const INPUT_SIZE: usize = 64;

/// Number of emotion categories.
pub const NUM_CLASSES: usize = 7;

/// Emotion classifier model.
///
/// Architecture: 3 conv layers with max pooling, followed by 2 FC layers.
/// Input: 64x64 grayscale face crop, normalized to `[0, 1]`.
/// Output: 7 logits, softmaxed into a probability vector.
pub struct EmotionClassifier {
    conv1: Conv2d,
    conv2: Conv2d,
    conv3: Conv2d,
    fc1: Linear,
    fc2: Linear,
    device: Device,
}

impl EmotionClassifier {
    /// Creates a classifier from loaded weights.
    ///
    /// # Errors
    ///
    /// Returns an error if model weights cannot be resolved or are invalid.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(vb: VarBuilder) -> Result<Self> {
        let device = vb.device().clone();

        let conv1 = conv2d(
            1,
            32,
            3,
            Conv2dConfig {
                padding: 1,
                ..Conv2dConfig::default()
            },
            vb.pp("conv1"),
        )?;

        let conv2 = conv2d(
            32,
            64,
            3,
            Conv2dConfig {
                padding: 1,
                ..Conv2dConfig::default()
            },
            vb.pp("conv2"),
        )?;

        let conv3 = conv2d(
            64,
            128,
            3,
            Conv2dConfig {
                padding: 1,
                ..Conv2dConfig::default()
            },
            vb.pp("conv3"),
        )?;

        // After 3 max pools of 2x2: 64 -> 32 -> 16 -> 8
        // Flattened: 128 * 8 * 8 = 8192
        let fc1 = linear(8192, 256, vb.pp("fc1"))?;
        let fc2 = linear(256, NUM_CLASSES, vb.pp("fc2"))?;

        Ok(Self {
            conv1,
            conv2,
            conv3,
            fc1,
            fc2,
            device,
        })
    }

    /// Loads the classifier from a safetensors file with fallback.
    ///
    /// The primary strategy expects clean inference weights. If it fails,
    /// a second attempt tolerates training-checkpoint layouts (optimizer
    /// state, `model.` key prefix). Both failing is fatal to the caller;
    /// the process cannot serve emotion requests without a model.
    ///
    /// # Errors
    ///
    /// Returns an error if both load strategies fail.
    pub fn from_file(path: impl AsRef<Path>, device: &Device) -> Result<Self> {
        let path = path.as_ref();

        match load_safetensors(path, device).and_then(Self::new) {
            Ok(model) => {
                info!("emotion model loaded from {}", path.display());
                Ok(model)
            }
            Err(primary) => {
                warn!(
                    "primary emotion model load failed ({primary:#}), \
                     retrying as training checkpoint"
                );
                let vb = load_checkpoint_tolerant(path, device)?;
                let model = Self::new(vb).with_context(|| {
                    format!(
                        "both load strategies failed for {} (primary: {primary:#})",
                        path.display()
                    )
                })?;
                info!("emotion model loaded via checkpoint fallback");
                Ok(model)
            }
        }
    }

    /// Runs a forward pass and softmaxes the logits.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails, e.g. on a shape mismatch.
    pub fn predict_probabilities(&self, face: &GrayImage) -> Result<[f32; 7]> {
        let input = preprocess_face(face, &self.device)?;
        let logits = self
            .forward(&input)
            .context("emotion classifier forward pass failed")?;

        let logits: Vec<f32> = logits
            .squeeze(0)?
            .to_vec1()
            .context("failed to read classifier output")?;

        anyhow::ensure!(
            logits.len() == NUM_CLASSES,
            "classifier produced {} outputs, expected {NUM_CLASSES}",
            logits.len()
        );

        let probs = softmax(&logits);
        let mut out = [0.0f32; NUM_CLASSES];
        out.copy_from_slice(&probs);
        Ok(out)
    }
}

/// Preprocesses a cropped face region into the classifier input tensor.
///
/// Resizes to 64x64 (bilinear), normalizes intensities by 255, and shapes
/// the result as a rank-4 batch-of-one single-channel tensor.
///
/// # Errors
///
/// Returns an error if tensor creation fails.
pub fn preprocess_face(face: &GrayImage, device: &Device) -> Result<Tensor> {
    let resized = image::imageops::resize(
        face,
        INPUT_SIZE as u32,
        INPUT_SIZE as u32,
        FilterType::Triangle,
    );

    let data: Vec<f32> = resized.pixels().map(|p| f32::from(p[0]) / 255.0).collect();

    Tensor::from_vec(data, (1, 1, INPUT_SIZE, INPUT_SIZE), device)
        .context("failed to create face tensor")
}

impl Module for EmotionClassifier {
    fn forward(&self, x: &Tensor) -> candle_core::Result<Tensor> {
        // Conv1 + ReLU + MaxPool
        let x = self.conv1.forward(x)?;
        let x = x.relu()?;
        let x = x.max_pool2d(2)?;

        // Conv2 + ReLU + MaxPool
        let x = self.conv2.forward(&x)?;
        let x = x.relu()?;
        let x = x.max_pool2d(2)?;

        // Conv3 + ReLU + MaxPool
        let x = self.conv3.forward(&x)?;
        let x = x.relu()?;
        let x = x.max_pool2d(2)?;

        // Flatten
        let x = x.flatten_from(1)?;

        // FC1 + ReLU
        let x = self.fc1.forward(&x)?;
        let x = x.relu()?;

        // FC2 (logit output)
        self.fc2.forward(&x)
    }
}

impl EmotionModel for EmotionClassifier {
    fn predict(&self, face: &GrayImage) -> Result<[f32; 7]> {
        self.predict_probabilities(face)
    }
}
