//! HTTP surface: the two analysis endpoints plus a liveness probe.

use anyhow::{Context, Result};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{HeaderValue, Method};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use face_metrics_core::domain::AnalysisError;
use serde_json::json;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::{emotion_error_response, gaze_error_response};
use crate::state::AppState;

/// Maximum accepted upload size.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Builds the application router with the fixed CORS deployment policy.
///
/// # Errors
///
/// Returns an error if the configured origin is not a valid header value.
pub fn router(state: AppState, allowed_origin: &str) -> Result<Router> {
    let origin: HeaderValue = allowed_origin
        .parse()
        .with_context(|| format!("invalid CORS origin: {allowed_origin}"))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Ok(Router::new()
        .route("/detect-emotion", post(detect_emotion))
        .route("/gaze-coordinates", post(gaze_coordinates))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// `POST /detect-emotion`: classify the dominant facial emotion.
async fn detect_emotion(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    // Extractor rejections (non-multipart content type, oversized body)
    // must produce the same JSON error shape as in-handler failures.
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!("multipart extraction rejected: {rejection}");
            return emotion_error_response(&AnalysisError::Decode);
        }
    };

    let Some(bytes) = read_upload(multipart).await else {
        return emotion_error_response(&AnalysisError::Decode);
    };

    let pipeline = state.emotion.clone();
    let result = tokio::task::spawn_blocking(move || {
        let image = face_metrics_adapters::decode_image(&bytes)?;
        pipeline.analyze(&image)
    })
    .await;

    match result {
        Ok(Ok(emotion)) => Json(emotion).into_response(),
        Ok(Err(err)) => emotion_error_response(&err),
        Err(join) => {
            emotion_error_response(&AnalysisError::Inference(join.to_string()))
        }
    }
}

/// `POST /gaze-coordinates`: estimate normalized gaze direction.
async fn gaze_coordinates(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!("multipart extraction rejected: {rejection}");
            return gaze_error_response(&AnalysisError::Decode);
        }
    };

    let Some(bytes) = read_upload(multipart).await else {
        return gaze_error_response(&AnalysisError::Decode);
    };

    let pipeline = state.gaze.clone();
    let result = tokio::task::spawn_blocking(move || {
        let image = face_metrics_adapters::decode_image(&bytes)?;
        pipeline.analyze(&image)
    })
    .await;

    match result {
        Ok(Ok(gaze)) => Json(gaze).into_response(),
        Ok(Err(err)) => gaze_error_response(&err),
        Err(join) => gaze_error_response(&AnalysisError::Inference(join.to_string())),
    }
}

/// `GET /health`: liveness probe.
async fn health() -> Response {
    Json(json!({ "status": "ok" })).into_response()
}

/// Reads the uploaded file bytes out of a multipart body.
///
/// Prefers a field named `file`; otherwise the first field wins. `None`
/// means the upload carried no usable bytes, which every caller treats as
/// a decode failure.
async fn read_upload(mut multipart: Multipart) -> Option<Vec<u8>> {
    let mut first: Option<Vec<u8>> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let is_file_field = field.name() == Some("file");
        let bytes = field.bytes().await.ok()?.to_vec();
        debug!("multipart field with {} bytes", bytes.len());

        if is_file_field {
            return Some(bytes);
        }
        if first.is_none() {
            first = Some(bytes);
        }
    }

    first
}
