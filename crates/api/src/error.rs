use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use edurank_core::error::CoreError;
use serde_json::{json, Map, Value};

/// The underlying message of a sanitized 500, carried as a response
/// extension. It reaches the body only through
/// [`expose_error_detail`](crate::middleware::error_detail::expose_error_detail).
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

/// Every handler failure. Rendered as `{ "error", "code" }` plus
/// `index`/`field`/`value` for batch rejections and `missing_ids` for
/// unknown ids in a batch.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Storage failure: {0}")]
    Database(#[from] sqlx::Error),

    /// Missing or malformed request parameters.
    #[error("{0}")]
    BadRequest(String),

    #[error("Unexpected state: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Status, machine-readable code, message, and extra body fields.
struct ErrorParts {
    status: StatusCode,
    code: &'static str,
    message: String,
    extra: Map<String, Value>,
    detail: Option<String>,
}

impl ErrorParts {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            extra: Map::new(),
            detail: None,
        }
    }

    fn with(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    /// A sanitized 500. The real message is logged and kept aside for the
    /// development-mode middleware.
    fn internal(detail: &str) -> Self {
        let mut parts = Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        );
        parts.detail = Some(detail.to_string());
        parts
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let parts = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => ErrorParts::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::NotFoundMany { entity, ids } => ErrorParts::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{} {entity} record(s) not found", ids.len()),
                )
                .with("missing_ids", json!(ids)),
                CoreError::Validation(msg) => {
                    ErrorParts::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::BatchValidation(detail) => {
                    let mut parts = ErrorParts::new(
                        StatusCode::BAD_REQUEST,
                        "BATCH_VALIDATION",
                        detail.message.clone(),
                    )
                    .with("index", json!(detail.index));
                    if let Some(field) = detail.field {
                        parts = parts.with("field", json!(field));
                    }
                    if let Some(value) = &detail.value {
                        parts = parts.with("value", value.clone());
                    }
                    parts
                }
                CoreError::Conflict(msg) => {
                    ErrorParts::new(StatusCode::CONFLICT, "CONFLICT", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Core invariant violated");
                    ErrorParts::internal(msg)
                }
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::BadRequest(msg) => {
                ErrorParts::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Handler failed");
                ErrorParts::internal(msg)
            }
        };

        let mut body = Map::new();
        body.insert("error".into(), Value::String(parts.message));
        body.insert("code".into(), Value::String(parts.code.to_string()));
        body.extend(parts.extra);

        let mut response = (parts.status, axum::Json(Value::Object(body))).into_response();
        if let Some(detail) = parts.detail {
            response.extensions_mut().insert(InternalErrorDetail(detail));
        }
        response
    }
}

/// 404 for `RowNotFound` and foreign-key violations (an unknown student,
/// class, subject or user), 409 for `uq_*` unique violations, 500 otherwise.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    const UNIQUE_VIOLATION: &str = "23505";
    const FOREIGN_KEY_VIOLATION: &str = "23503";

    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return ErrorParts::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found");
        }
        sqlx::Error::Database(db_err) => db_err,
        other => {
            tracing::error!(error = %other, "Storage failure");
            return ErrorParts::internal(&other.to_string());
        }
    };

    let constraint = db_err.constraint().unwrap_or("unknown");
    match db_err.code().as_deref() {
        Some(UNIQUE_VIOLATION) if constraint.starts_with("uq_") => ErrorParts::new(
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Value already exists ({constraint})"),
        ),
        Some(FOREIGN_KEY_VIOLATION) => ErrorParts::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Referenced record does not exist ({constraint})"),
        ),
        _ => {
            tracing::error!(error = %db_err, code = ?db_err.code(), "Database rejected statement");
            ErrorParts::internal(&db_err.to_string())
        }
    }
}
