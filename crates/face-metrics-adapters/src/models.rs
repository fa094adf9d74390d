//! Model file resolution.
//!
//! The three pretrained models are looked up in a single models directory,
//! overridable at startup for deployments that ship models elsewhere.

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::debug;

/// Known model files.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Model name/identifier.
    pub name: &'static str,
    /// Filename in the models directory.
    pub filename: &'static str,
}

/// Models the server needs at startup.
pub const MODELS: &[ModelInfo] = &[
    ModelInfo {
        name: "emotion",
        filename: "emotion.safetensors",
    },
    ModelInfo {
        name: "face_mesh",
        filename: "face_mesh_with_iris.onnx",
    },
    ModelInfo {
        name: "face_detector",
        filename: "seeta_fd_frontal_v1.0.bin",
    },
];

static MODELS_DIR_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

/// Overrides the models directory for this process.
///
/// Later calls are ignored; the first override wins. Intended to be called
/// once during startup from configuration.
pub fn set_models_dir(dir: PathBuf) {
    debug!("models directory set to {}", dir.display());
    let _ = MODELS_DIR_OVERRIDE.set(dir);
}

/// Returns the models directory path.
///
/// Uses the startup override if set, otherwise
/// `XDG_DATA_HOME/face-metrics/models` (or the platform equivalent).
#[must_use]
pub fn models_dir() -> PathBuf {
    if let Some(dir) = MODELS_DIR_OVERRIDE.get() {
        return dir.clone();
    }

    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("face-metrics")
        .join("models")
}

/// Returns the path to a specific model file by name.
#[must_use]
pub fn model_path(name: &str) -> Option<PathBuf> {
    MODELS
        .iter()
        .find(|m| m.name == name)
        .map(|m| models_dir().join(m.filename))
}
