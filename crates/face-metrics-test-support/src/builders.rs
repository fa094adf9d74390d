//! Synthetic images and landmark sets for testing.

use face_metrics_core::domain::{LandmarkSet, Point3};
use image::{DynamicImage, Rgb, RgbImage};

/// Number of points in the refined mesh the builders produce.
const MESH_POINTS: usize = 478;

/// Creates a solid-color RGB test image.
#[must_use]
pub fn solid_image(width: u32, height: u32, value: u8) -> DynamicImage {
    let img = RgbImage::from_pixel(width, height, Rgb([value, value, value]));
    DynamicImage::ImageRgb8(img)
}

/// Encodes an image as PNG bytes, for upload-style tests.
///
/// # Panics
///
/// Panics if in-memory PNG encoding fails (test-only code).
#[must_use]
pub fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .expect("in-memory PNG encoding");
    bytes
}

/// Builder for refined-mesh landmark sets with controllable eye geometry.
///
/// Starts from a full 478-point set with every point at image center, then
/// lets tests place the eye corner, eyelid and iris landmarks.
pub struct SyntheticLandmarks {
    points: Vec<Point3>,
}

impl SyntheticLandmarks {
    /// All points at image center; eye landmarks unset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            points: vec![
                Point3 {
                    x: 0.5,
                    y: 0.5,
                    z: 0.0,
                };
                MESH_POINTS
            ],
        }
    }

    /// Symmetric geometry with both irises centered in their eyes, which
    /// estimates to gaze (0.5, 0.5).
    #[must_use]
    pub fn centered() -> Self {
        Self::new()
            .with_left_eye((0.40, 0.52), (0.46, 0.52), (0.43, 0.50), (0.43, 0.54))
            .with_left_iris(0.43, 0.52)
            .with_right_eye((0.54, 0.52), (0.60, 0.52), (0.57, 0.50), (0.57, 0.54))
            .with_right_iris(0.57, 0.52)
    }

    /// Places a single point by mesh index.
    #[must_use]
    pub fn with_point(mut self, index: usize, x: f32, y: f32) -> Self {
        self.points[index] = Point3 { x, y, z: 0.0 };
        self
    }

    /// Places the left eye corners and eyelids (inner, outer, upper, lower).
    #[must_use]
    pub fn with_left_eye(
        self,
        inner: (f32, f32),
        outer: (f32, f32),
        upper: (f32, f32),
        lower: (f32, f32),
    ) -> Self {
        self.with_point(33, inner.0, inner.1)
            .with_point(133, outer.0, outer.1)
            .with_point(145, upper.0, upper.1)
            .with_point(159, lower.0, lower.1)
    }

    /// Places the left iris center.
    #[must_use]
    pub fn with_left_iris(self, x: f32, y: f32) -> Self {
        self.with_point(468, x, y)
    }

    /// Places the right eye corners and eyelids (inner, outer, upper, lower).
    #[must_use]
    pub fn with_right_eye(
        self,
        inner: (f32, f32),
        outer: (f32, f32),
        upper: (f32, f32),
        lower: (f32, f32),
    ) -> Self {
        self.with_point(362, inner.0, inner.1)
            .with_point(263, outer.0, outer.1)
            .with_point(374, upper.0, upper.1)
            .with_point(386, lower.0, lower.1)
    }

    /// Places the right iris center.
    #[must_use]
    pub fn with_right_iris(self, x: f32, y: f32) -> Self {
        self.with_point(473, x, y)
    }

    /// Finalizes the landmark set.
    #[must_use]
    pub fn build(self) -> LandmarkSet {
        LandmarkSet::new(self.points)
    }
}

impl Default for SyntheticLandmarks {
    fn default() -> Self {
        Self::new()
    }
}
