//! Analysis pipelines.
//!
//! Each pipeline takes a decoded image, orchestrates the vision ports, and
//! returns either a domain result or an [`crate::domain::AnalysisError`].

mod emotion;
mod gaze;

pub use emotion::EmotionPipeline;
pub use gaze::{enhance_sensitivity, estimate_gaze, GazePipeline};
