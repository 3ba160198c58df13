//! Story generation API routes

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::domain::GenerationMode;
use crate::infrastructure::state::AppState;

/// Header carrying the recoverable illustration failure, when the document
/// came out text-only
pub const ILLUSTRATION_ERROR_HEADER: &str = "x-illustration-error";

/// Trigger one pipeline run and stream back the PDF for download.
///
/// `mode` is `dragon` (alias `fixed`) or `wildcard`. A second trigger while
/// a run is in flight is rejected with 409; the pipeline serves one
/// interactive user at a time.
pub async fn generate_story(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mode: GenerationMode = mode
        .parse()
        .map_err(|e: crate::domain::InvalidMode| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let mut pipeline = state
        .pipeline
        .try_lock()
        .map_err(|_| {
            (
                StatusCode::CONFLICT,
                "a story run is already in progress".to_string(),
            )
        })?;

    let outcome = pipeline
        .run(mode)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    tracing::info!(run_id = %outcome.run_id, "artifact ready for download");

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!(
            "attachment; filename=\"{}\"",
            outcome.artifact.filename
        ))
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?,
    );
    if let Some(failure) = &outcome.fetch_failure {
        // best effort; the message is ASCII but a header value must be valid
        if let Ok(value) = HeaderValue::from_str(&failure.to_string()) {
            headers.insert(ILLUSTRATION_ERROR_HEADER, value);
        }
    }

    Ok((headers, outcome.artifact.bytes))
}
