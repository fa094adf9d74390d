//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the domain core and the
//! external computer-vision capabilities it consumes.

mod emotion_model;
mod face_detector;
mod face_landmarker;

pub use emotion_model::EmotionModel;
pub use face_detector::FaceDetector;
pub use face_landmarker::FaceLandmarker;
