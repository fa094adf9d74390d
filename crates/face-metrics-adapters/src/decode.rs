//! Image decoding from uploaded byte buffers.

use face_metrics_core::domain::AnalysisError;
use image::DynamicImage;
use tracing::debug;

/// Decodes raw uploaded bytes into a color image.
///
/// Format is sniffed from the buffer contents. Malformed, unsupported or
/// empty buffers yield [`AnalysisError::Decode`]; this is an expected,
/// handled outcome on every upload path, not an exceptional one.
///
/// # Errors
///
/// Returns [`AnalysisError::Decode`] when the bytes are not a decodable
/// image.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, AnalysisError> {
    if bytes.is_empty() {
        return Err(AnalysisError::Decode);
    }

    image::load_from_memory(bytes).map_err(|e| {
        debug!("image decode failed: {e}");
        AnalysisError::Decode
    })
}
