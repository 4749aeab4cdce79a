//! Development-mode detail on internal errors.
//!
//! [`AppError`](crate::error::AppError) never writes the underlying message of
//! a 500 into the body. It leaves it in an [`InternalErrorDetail`] extension,
//! and this layer merges it into the JSON body when
//! `ServerConfig::expose_error_details` is on.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::CONTENT_LENGTH;
use axum::middleware::Next;
use axum::response::Response;
use serde_json::Value;

use crate::error::InternalErrorDetail;
use crate::state::AppState;

/// Upper bound on the error body read back for rewriting.
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

pub async fn expose_error_detail(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let Some(InternalErrorDetail(detail)) =
        response.extensions_mut().remove::<InternalErrorDetail>()
    else {
        return response;
    };
    if !state.config.expose_error_details {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Could not read error body to attach detail");
            return Response::from_parts(parts, Body::empty());
        }
    };

    let mut json: Value = match serde_json::from_slice(&bytes) {
        Ok(json) => json,
        Err(_) => return Response::from_parts(parts, Body::from(bytes)),
    };
    if let Value::Object(map) = &mut json {
        map.insert("detail".into(), Value::String(detail));
    }

    match serde_json::to_vec(&json) {
        Ok(rewritten) => {
            parts.headers.remove(CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(rewritten))
        }
        Err(_) => Response::from_parts(parts, Body::from(bytes)),
    }
}
