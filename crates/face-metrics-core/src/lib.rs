//! Face Metrics Core - Domain logic for facial emotion and gaze analysis.
//!
//! This crate contains the core domain types, the port traits that bound
//! external vision capabilities, the candle-based emotion classifier, and
//! the two analysis pipelines (emotion classification, gaze estimation).

pub mod domain;
pub mod inference;
pub mod pipeline;
pub mod ports;

pub use domain::{
    AnalysisError, EmotionResult, FaceRegion, GazePoint, LandmarkSet, Point3, EMOTION_LABELS,
};
pub use pipeline::{EmotionPipeline, GazePipeline};
pub use ports::{EmotionModel, FaceDetector, FaceLandmarker};
