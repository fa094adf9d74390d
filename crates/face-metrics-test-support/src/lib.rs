//! Test support utilities for face-metrics.
//!
//! Provides mock port implementations and synthetic image/landmark builders
//! for testing the analysis pipelines and the HTTP surface without real
//! models.
//!
//! # Example
//!
//! ```
//! use face_metrics_test_support::{MockLandmarker, SyntheticLandmarks};
//!
//! let landmarks = SyntheticLandmarks::centered().build();
//! let landmarker = MockLandmarker::with_landmarks(landmarks);
//! ```

mod builders;
mod mocks;

pub use builders::{png_bytes, solid_image, SyntheticLandmarks};
pub use mocks::{MockEmotionModel, MockFaceDetector, MockLandmarker};
