use axum::{
    body::Body,
    http::{header, Response, Uri},
};

use crate::database::describe;
use crate::error::ApiError;

/// Unrouted paths: an unknown entity name is reported as such
pub async fn not_found(uri: Uri) -> ApiError {
    let entity = uri.path().trim_start_matches('/').split('/').next().unwrap_or_default();
    match describe(entity) {
        Ok(_) => ApiError::not_found("Not Found"),
        Err(e) => e.into(),
    }
}

/// Gives bodiless error responses from the router and tower layers the
/// `{"message"}` body handlers produce. `Allow` is carried over.
pub async fn json_error_bodies(response: Response<Body>) -> Response<Body> {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));
    if is_json {
        return response;
    }
    let Some(err) = ApiError::from_status(response.status()) else {
        return response;
    };

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut rewritten = axum::response::IntoResponse::into_response(err);
    if let Some(allow) = allow {
        rewritten.headers_mut().insert(header::ALLOW, allow);
    }
    rewritten
}
