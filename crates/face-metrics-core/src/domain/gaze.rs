//! Gaze coordinate result type.

use serde::{Deserialize, Serialize};

/// Normalized gaze direction, one per analyzed image.
///
/// Both axes are in `[0, 1]` with `0.5` denoting center: `x` runs from
/// looking left (0.0) to looking right (1.0), `y` from looking up (0.0) to
/// looking down (1.0). Values are rounded to 3 decimal digits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazePoint {
    pub x: f64,
    pub y: f64,
}
