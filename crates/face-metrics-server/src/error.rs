//! Error-to-response mapping at the HTTP boundary.
//!
//! Each endpoint has its own wire vocabulary for the same taxonomy, kept
//! byte-compatible with the original API contract.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use face_metrics_core::domain::AnalysisError;
use serde::Serialize;

/// Structured JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Maps an analysis error to the `/detect-emotion` wire contract.
pub fn emotion_error_response(err: &AnalysisError) -> Response {
    match err {
        AnalysisError::Decode => {
            error_response(StatusCode::BAD_REQUEST, "Could not decode image")
        }
        AnalysisError::NoFace => error_response(StatusCode::BAD_REQUEST, "No face detected"),
        AnalysisError::GazeComputation | AnalysisError::Inference(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error processing image: {err}"),
        ),
    }
}

/// Maps an analysis error to the `/gaze-coordinates` wire contract.
pub fn gaze_error_response(err: &AnalysisError) -> Response {
    match err {
        AnalysisError::Decode => error_response(StatusCode::BAD_REQUEST, "Invalid image"),
        AnalysisError::NoFace => error_response(StatusCode::BAD_REQUEST, "No face detected"),
        AnalysisError::GazeComputation | AnalysisError::Inference(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to compute gaze coordinates",
        ),
    }
}
