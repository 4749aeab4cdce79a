//! Tests for `AppError` to HTTP response mapping.
//!
//! No server or database is needed: `IntoResponse` is called directly on
//! `AppError` values, and the detail middleware runs over a lazy pool.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{middleware, Router};
use edurank_api::config::ServerConfig;
use edurank_api::error::{AppError, AppResult, InternalErrorDetail};
use edurank_api::middleware::error_detail::expose_error_detail;
use edurank_api::state::AppState;
use edurank_core::bulk_update::{validate_bulk_updates, RawResultUpdate};
use edurank_core::error::{BatchValidationError, CoreError};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "StudentResult",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "StudentResult with id 42 not found");
}

#[tokio::test]
async fn not_found_many_lists_missing_ids() {
    let err = AppError::Core(CoreError::NotFoundMany {
        entity: "StudentResult",
        ids: vec![7, 9],
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["missing_ids"], json!([7, 9]));
}

#[tokio::test]
async fn batch_validation_carries_index_field_and_value() {
    let err = AppError::Core(
        BatchValidationError::at(3, "mid_exam must be between 0 and 100")
            .with_field("mid_exam")
            .with_value(json!(150))
            .into(),
    );

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BATCH_VALIDATION");
    assert_eq!(json["index"], 3);
    assert_eq!(json["field"], "mid_exam");
    assert_eq!(json["value"], 150);
}

#[tokio::test]
async fn batch_validation_from_validator_maps_through() {
    let updates = vec![RawResultUpdate {
        result_id: Some(json!("not-a-valid-id")),
        ..Default::default()
    }];
    let core = validate_bulk_updates(&updates).unwrap_err();
    assert_matches!(&core, CoreError::BatchValidation(e) if e.index == 0);

    let (status, json) = error_to_response(AppError::Core(core)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["index"], 0);
    assert_eq!(json["value"], "not-a-valid-id");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("updates must not be empty".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "updates must not be empty");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("class_id is required".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "class_id is required");
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Core(CoreError::Conflict("duplicate subject".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn internal_error_body_never_carries_detail() {
    let response = AppError::InternalError("pool exhausted on write".into()).into_response();
    assert_matches!(
        response.extensions().get::<InternalErrorDetail>(),
        Some(InternalErrorDetail(detail)) if detail == "pool exhausted on write"
    );

    let (status, json) =
        error_to_response(AppError::Core(CoreError::Internal("pool exhausted on write".into())))
            .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
    assert!(json.get("detail").is_none());
}

// ---------------------------------------------------------------------------
// Development-mode detail middleware
// ---------------------------------------------------------------------------

async fn failing_handler() -> AppResult<()> {
    Err(AppError::InternalError("pool exhausted on write".into()))
}

async fn rejected_handler() -> AppResult<()> {
    Err(AppError::BadRequest("class_id is required".into()))
}

/// A router with only the detail middleware. The pool is lazy and never used.
fn detail_app(expose_error_details: bool) -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/unused")
        .unwrap();
    let config = Arc::new(ServerConfig {
        expose_error_details,
        ..common::test_config()
    });
    let state = AppState::new(pool, config);
    Router::new()
        .route("/fail", get(failing_handler))
        .route("/reject", get(rejected_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            expose_error_detail,
        ))
        .with_state(state)
}

async fn call(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn detail_is_attached_when_enabled() {
    let (status, json) = call(detail_app(true), "/fail").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
    assert_eq!(json["detail"], "pool exhausted on write");
}

#[tokio::test]
async fn detail_is_withheld_when_disabled() {
    let (status, json) = call(detail_app(false), "/fail").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json.get("detail").is_none());
}

#[tokio::test]
async fn client_errors_are_untouched_when_enabled() {
    let (status, json) = call(detail_app(true), "/reject").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json.get("detail").is_none());
}
