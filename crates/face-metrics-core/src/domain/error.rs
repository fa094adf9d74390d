//! Per-request error taxonomy.

use thiserror::Error;

/// Failure classification for a single analysis request.
///
/// Every pipeline stage returns one of these instead of panicking; the HTTP
/// layer converts them to a status code and JSON body at the boundary only.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The uploaded bytes could not be decoded into an image.
    #[error("could not decode image bytes")]
    Decode,

    /// The landmark model found no face in the image.
    #[error("no face detected")]
    NoFace,

    /// Gaze arithmetic failed (missing landmarks, non-finite geometry).
    #[error("failed to compute gaze coordinates")]
    GazeComputation,

    /// Unexpected failure during classification or preprocessing.
    #[error("{0}")]
    Inference(String),
}

impl AnalysisError {
    /// Wraps an underlying error as an inference failure, preserving the
    /// full cause chain text.
    pub fn inference(err: &anyhow::Error) -> Self {
        Self::Inference(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inference_keeps_cause_chain() {
        let err = anyhow::anyhow!("tensor shape mismatch").context("forward pass failed");
        let analysis = AnalysisError::inference(&err);
        let text = analysis.to_string();
        assert!(text.contains("forward pass failed"));
        assert!(text.contains("tensor shape mismatch"));
    }
}
