//! Face Metrics Adapters - External adapters for face-metrics.
//!
//! This crate provides the concrete implementations behind the core ports:
//! - Byte-buffer image decoding
//! - Classical face detection (SeetaFace via `rustface`)
//! - Face-mesh landmarks with iris refinement (ONNX via `ort`)
//! - Model file resolution

pub mod decode;
pub mod facemesh;
pub mod models;
pub mod seeta;

pub use decode::decode_image;
pub use facemesh::FaceMeshLandmarker;
pub use models::{model_path, models_dir, set_models_dir};
pub use seeta::{SeetaConfig, SeetaDetector};
