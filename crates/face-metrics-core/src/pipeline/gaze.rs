//! Gaze estimation pipeline.
//!
//! Computes normalized gaze direction from iris position relative to the
//! eye corners and eyelids, per eye, with a saturating sensitivity curve,
//! then averages both eyes and clamps into `[0, 1]`.

use std::sync::Arc;

use image::DynamicImage;
use tracing::{debug, warn};

use crate::domain::{AnalysisError, GazePoint, LandmarkSet};
use crate::ports::FaceLandmarker;

/// Left eye corner indices (inner, outer) in the refined mesh topology.
const LEFT_EYE_CORNERS: (usize, usize) = (33, 133);
/// Left eyelid indices (upper, lower).
const LEFT_EYELIDS: (usize, usize) = (145, 159);
/// Left iris center index.
const LEFT_IRIS: usize = 468;

/// Right eye corner indices (inner, outer).
const RIGHT_EYE_CORNERS: (usize, usize) = (362, 263);
/// Right eyelid indices (upper, lower).
const RIGHT_EYELIDS: (usize, usize) = (374, 386);
/// Right iris center index.
const RIGHT_IRIS: usize = 473;

/// Guard against division by a near-zero eye extent, in pixels.
const EPSILON: f64 = 1e-6;

/// Gain applied inside the sensitivity curve.
const SENSITIVITY_GAIN: f64 = 1.5;

/// End-to-end gaze analysis over a decoded image.
pub struct GazePipeline {
    landmarker: Arc<dyn FaceLandmarker>,
}

impl GazePipeline {
    /// Creates a pipeline over the given landmarker.
    #[must_use]
    pub fn new(landmarker: Arc<dyn FaceLandmarker>) -> Self {
        Self { landmarker }
    }

    /// Estimates the gaze direction for the (single) face in the image.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NoFace`] when the landmark model finds no
    /// face, and [`AnalysisError::GazeComputation`] when landmark inference
    /// or the ratio arithmetic fails.
    pub fn analyze(&self, image: &DynamicImage) -> Result<GazePoint, AnalysisError> {
        let landmarks = self
            .landmarker
            .landmarks(image)
            .map_err(|e| {
                warn!("landmark inference failed: {e:#}");
                AnalysisError::GazeComputation
            })?
            .ok_or(AnalysisError::NoFace)?;

        debug!("landmark set with {} points", landmarks.len());

        estimate_gaze(&landmarks, image.width(), image.height())
    }
}

/// Computes the averaged, clamped gaze coordinate from a landmark set.
///
/// Landmarks are normalized `[0, 1]`; they are scaled to pixel space per
/// axis before the ratio math since eye geometry is not generally square.
///
/// # Errors
///
/// Returns [`AnalysisError::GazeComputation`] when required landmark
/// indices are missing or the arithmetic produces non-finite values.
pub fn estimate_gaze(
    landmarks: &LandmarkSet,
    width: u32,
    height: u32,
) -> Result<GazePoint, AnalysisError> {
    let (left_x, left_y) = eye_ratios(
        landmarks,
        LEFT_EYE_CORNERS,
        LEFT_EYELIDS,
        LEFT_IRIS,
        width,
        height,
    )?;
    let (right_x, right_y) = eye_ratios(
        landmarks,
        RIGHT_EYE_CORNERS,
        RIGHT_EYELIDS,
        RIGHT_IRIS,
        width,
        height,
    )?;

    let x = (left_x + right_x) / 2.0;
    let y = (left_y + right_y) / 2.0;

    if !x.is_finite() || !y.is_finite() {
        return Err(AnalysisError::GazeComputation);
    }

    // Hard clamp: the tanh curve approaches but does not guarantee exact
    // bounds after rounding, and detector noise can push raw ratios far
    // outside [0, 1].
    Ok(GazePoint {
        x: round3(x.clamp(0.0, 1.0)),
        y: round3(y.clamp(0.0, 1.0)),
    })
}

/// Enhanced iris-position ratios for one eye, (horizontal, vertical).
fn eye_ratios(
    landmarks: &LandmarkSet,
    corners: (usize, usize),
    eyelids: (usize, usize),
    iris: usize,
    width: u32,
    height: u32,
) -> Result<(f64, f64), AnalysisError> {
    let point = |index: usize| landmarks.get(index).ok_or(AnalysisError::GazeComputation);

    let inner = point(corners.0)?;
    let outer = point(corners.1)?;
    let upper = point(eyelids.0)?;
    let lower = point(eyelids.1)?;
    let iris = point(iris)?;

    let w = f64::from(width);
    let h = f64::from(height);

    let horizontal = (f64::from(iris.x) - f64::from(inner.x)) * w
        / ((f64::from(outer.x) - f64::from(inner.x)) * w + EPSILON);
    let vertical = (f64::from(iris.y) - f64::from(upper.y)) * h
        / ((f64::from(lower.y) - f64::from(upper.y)) * h + EPSILON);

    if !horizontal.is_finite() || !vertical.is_finite() {
        return Err(AnalysisError::GazeComputation);
    }

    Ok((enhance_sensitivity(horizontal), enhance_sensitivity(vertical)))
}

/// Amplifies deviation of a ratio from the center (0.5).
///
/// Centers the ratio around zero, applies a tanh curve with gain, and maps
/// back into `(0, 1)`. Small pupil movements register as larger coordinate
/// shifts while the output stays bounded.
#[must_use]
pub fn enhance_sensitivity(ratio: f64) -> f64 {
    let centered = (ratio - 0.5) * 2.0;
    (centered * SENSITIVITY_GAIN).tanh() * 0.5 + 0.5
}

/// Rounds to 3 decimal digits for output stability.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::Point3;
    use crate::ports::FaceLandmarker;

    /// Builds a full-size refined mesh with every point at image center,
    /// then overrides the given indices.
    fn mesh_with(overrides: &[(usize, f32, f32)]) -> LandmarkSet {
        let mut points = vec![
            Point3 {
                x: 0.5,
                y: 0.5,
                z: 0.0,
            };
            478
        ];
        for &(index, x, y) in overrides {
            points[index] = Point3 { x, y, z: 0.0 };
        }
        LandmarkSet::new(points)
    }

    /// Symmetric geometry with both irises centered in their eyes.
    fn centered_mesh() -> LandmarkSet {
        mesh_with(&[
            (33, 0.40, 0.52),
            (133, 0.46, 0.52),
            (145, 0.43, 0.50),
            (159, 0.43, 0.54),
            (468, 0.43, 0.52),
            (362, 0.54, 0.52),
            (263, 0.60, 0.52),
            (374, 0.57, 0.50),
            (386, 0.57, 0.54),
            (473, 0.57, 0.52),
        ])
    }

    #[test]
    fn test_enhance_sensitivity_center_maps_to_center() {
        assert!((enhance_sensitivity(0.5) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_enhance_sensitivity_monotonic_on_unit_interval() {
        let mut previous = f64::NEG_INFINITY;
        for step in 0..=100 {
            let value = enhance_sensitivity(f64::from(step) / 100.0);
            assert!(value > previous);
            previous = value;
        }
    }

    #[test]
    fn test_enhance_sensitivity_bounded() {
        for ratio in [-100.0, -1.0, 0.0, 1.0, 2.0, 100.0] {
            let value = enhance_sensitivity(ratio);
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_centered_gaze_is_half_half() {
        let gaze = estimate_gaze(&centered_mesh(), 1000, 1000).unwrap();
        assert!((gaze.x - 0.5).abs() < 1e-9);
        assert!((gaze.y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_known_offset_matches_hand_computation() {
        // Both irises at horizontal ratio 0.75 within an 80px-wide eye.
        // enhanced = tanh((0.75 - 0.5) * 2 * 1.5) * 0.5 + 0.5
        //          = tanh(0.75) * 0.5 + 0.5 = 0.8175745
        // averaged and rounded: 0.818
        let mesh = mesh_with(&[
            (33, 0.40, 0.52),
            (133, 0.48, 0.52),
            (145, 0.46, 0.50),
            (159, 0.46, 0.54),
            (468, 0.46, 0.52),
            (362, 0.54, 0.52),
            (263, 0.62, 0.52),
            (374, 0.60, 0.50),
            (386, 0.60, 0.54),
            (473, 0.60, 0.52),
        ]);

        let gaze = estimate_gaze(&mesh, 1000, 1000).unwrap();
        assert!((gaze.x - 0.818).abs() < 1e-9);
        assert!((gaze.y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_eye_height_stays_clamped() {
        // Upper and lower eyelids coincide: vertical extent is zero and the
        // epsilon guard takes over, saturating the curve instead of dividing
        // by zero. Output must still be inside [0, 1].
        let mesh = mesh_with(&[
            (33, 0.40, 0.52),
            (133, 0.46, 0.52),
            (145, 0.43, 0.52),
            (159, 0.43, 0.52),
            (468, 0.43, 0.55),
            (362, 0.54, 0.52),
            (263, 0.60, 0.52),
            (374, 0.57, 0.52),
            (386, 0.57, 0.52),
            (473, 0.57, 0.55),
        ]);

        let gaze = estimate_gaze(&mesh, 640, 480).unwrap();
        assert!((0.0..=1.0).contains(&gaze.x));
        assert!((0.0..=1.0).contains(&gaze.y));
    }

    #[test]
    fn test_wild_ratios_stay_clamped() {
        // Iris far outside the eye corners.
        let mesh = mesh_with(&[
            (33, 0.40, 0.52),
            (133, 0.41, 0.52),
            (145, 0.43, 0.50),
            (159, 0.43, 0.51),
            (468, 0.90, 0.95),
            (362, 0.54, 0.52),
            (263, 0.55, 0.52),
            (374, 0.57, 0.50),
            (386, 0.57, 0.51),
            (473, 0.05, 0.05),
        ]);

        let gaze = estimate_gaze(&mesh, 640, 480).unwrap();
        assert!((0.0..=1.0).contains(&gaze.x));
        assert!((0.0..=1.0).contains(&gaze.y));
    }

    #[test]
    fn test_missing_iris_indices_is_computation_failure() {
        // Base 468-point mesh without the refined iris landmarks.
        let points = vec![
            Point3 {
                x: 0.5,
                y: 0.5,
                z: 0.0,
            };
            468
        ];
        let err = estimate_gaze(&LandmarkSet::new(points), 640, 480).unwrap_err();
        assert!(matches!(err, AnalysisError::GazeComputation));
    }

    #[test]
    fn test_nan_landmark_is_computation_failure() {
        let mesh = mesh_with(&[(468, f32::NAN, 0.5)]);
        let err = estimate_gaze(&mesh, 640, 480).unwrap_err();
        assert!(matches!(err, AnalysisError::GazeComputation));
    }

    #[test]
    fn test_pipeline_maps_missing_face_to_no_face() {
        struct NoFaceLandmarker;
        impl FaceLandmarker for NoFaceLandmarker {
            fn landmarks(
                &self,
                _image: &DynamicImage,
            ) -> anyhow::Result<Option<LandmarkSet>> {
                Ok(None)
            }
        }

        let pipeline = GazePipeline::new(Arc::new(NoFaceLandmarker));
        let image = DynamicImage::new_rgb8(64, 64);
        let err = pipeline.analyze(&image).unwrap_err();
        assert!(matches!(err, AnalysisError::NoFace));
    }

    #[test]
    fn test_pipeline_maps_landmarker_error_to_computation_failure() {
        struct BrokenLandmarker;
        impl FaceLandmarker for BrokenLandmarker {
            fn landmarks(
                &self,
                _image: &DynamicImage,
            ) -> anyhow::Result<Option<LandmarkSet>> {
                anyhow::bail!("session failure")
            }
        }

        let pipeline = GazePipeline::new(Arc::new(BrokenLandmarker));
        let image = DynamicImage::new_rgb8(64, 64);
        let err = pipeline.analyze(&image).unwrap_err();
        assert!(matches!(err, AnalysisError::GazeComputation));
    }
}
