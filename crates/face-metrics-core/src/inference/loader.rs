//! Model loading for safetensors weights.
//!
//! Two load strategies are provided. [`load_safetensors`] maps the file's
//! tensors as-is. [`load_checkpoint_tolerant`] additionally accepts training
//! checkpoints: it skips optimizer state and strips a `model.` key prefix,
//! mirroring how exported checkpoints commonly differ from clean weights.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use safetensors::SafeTensors;
use tracing::debug;

/// Tensor key prefix written by some training exporters.
const MODEL_KEY_PREFIX: &str = "model.";

/// Tensor key prefix for optimizer state in training checkpoints.
const OPTIMIZER_KEY_PREFIX: &str = "optimizer.";

/// Loads a safetensors file and creates a `VarBuilder` over its tensors.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the safetensors data is
/// invalid.
pub fn load_safetensors(path: impl AsRef<Path>, device: &Device) -> Result<VarBuilder<'static>> {
    let tensors = read_tensors(path.as_ref(), device)?;
    Ok(VarBuilder::from_tensors(tensors, DType::F32, device))
}

/// Loads a safetensors file tolerating training-checkpoint artifacts.
///
/// Optimizer tensors are dropped and a `model.` prefix on weight keys is
/// removed, so a checkpoint saved mid-training still resolves to the same
/// variable names as clean inference weights.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the safetensors data is
/// invalid.
pub fn load_checkpoint_tolerant(
    path: impl AsRef<Path>,
    device: &Device,
) -> Result<VarBuilder<'static>> {
    let tensors = read_tensors(path.as_ref(), device)?;
    let normalized = normalize_checkpoint_tensors(tensors);
    Ok(VarBuilder::from_tensors(normalized, DType::F32, device))
}

fn read_tensors(path: &Path, device: &Device) -> Result<HashMap<String, Tensor>> {
    debug!("loading safetensors from {}", path.display());

    let data = std::fs::read(path)
        .with_context(|| format!("failed to read model file: {}", path.display()))?;

    let tensors = SafeTensors::deserialize(&data)
        .with_context(|| format!("failed to parse safetensors: {}", path.display()))?;

    let mut tensor_map: HashMap<String, Tensor> = HashMap::new();

    for name in tensors.names() {
        let view = tensors
            .tensor(name)
            .with_context(|| format!("failed to get tensor '{name}'"))?;

        let dtype = convert_dtype(view.dtype())?;
        let shape: Vec<usize> = view.shape().to_vec();

        let tensor = Tensor::from_raw_buffer(view.data(), dtype, &shape, device)
            .with_context(|| format!("failed to create tensor '{name}'"))?;

        tensor_map.insert(name.clone(), tensor);
    }

    Ok(tensor_map)
}

/// Drops optimizer state and strips the `model.` key prefix.
fn normalize_checkpoint_tensors(tensors: HashMap<String, Tensor>) -> HashMap<String, Tensor> {
    tensors
        .into_iter()
        .filter(|(name, _)| !name.starts_with(OPTIMIZER_KEY_PREFIX))
        .map(|(name, tensor)| {
            let name = name
                .strip_prefix(MODEL_KEY_PREFIX)
                .map_or(name.clone(), ToString::to_string);
            (name, tensor)
        })
        .collect()
}

fn convert_dtype(dtype: safetensors::Dtype) -> Result<DType> {
    match dtype {
        safetensors::Dtype::F32 => Ok(DType::F32),
        safetensors::Dtype::F16 => Ok(DType::F16),
        safetensors::Dtype::BF16 => Ok(DType::BF16),
        safetensors::Dtype::F64 => Ok(DType::F64),
        safetensors::Dtype::U8 => Ok(DType::U8),
        safetensors::Dtype::U32 => Ok(DType::U32),
        safetensors::Dtype::I64 => Ok(DType::I64),
        other => anyhow::bail!("unsupported safetensors dtype: {other:?}"),
    }
}
