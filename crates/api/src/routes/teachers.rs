//! Teacher-scoped submission routes.

use axum::routing::post;
use axum::Router;

use crate::handlers::{attendance, results};
use crate::state::AppState;

/// Submission routes mounted at `/teachers`.
///
/// ```text
/// POST   /{teacher_id}/results       -> submit_results
/// POST   /{teacher_id}/attendance    -> submit_sheet
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{teacher_id}/results", post(results::submit_results))
        .route("/{teacher_id}/attendance", post(attendance::submit_sheet))
}
