use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};

use super::ErrorResponse;

/// Router fallback for unmatched paths.
pub async fn not_found(uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "No route matched");
    let body = Json(ErrorResponse::new(format!(
        "No route for {}",
        uri.path()
    )));

    (StatusCode::NOT_FOUND, body).into_response()
}
