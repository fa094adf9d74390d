//! Core domain types for facial analysis.

mod emotion;
mod error;
mod gaze;
mod geometry;

pub use emotion::{EmotionResult, EMOTION_LABELS};
pub use error::AnalysisError;
pub use gaze::GazePoint;
pub use geometry::{FaceRegion, LandmarkSet, Point3};
