use axum::routing::get;
use axum::Router;

use crate::handlers::results;
use crate::state::AppState;

/// Student-scoped routes mounted at `/students`.
///
/// ```text
/// GET    /{student_id}/results       -> list_student_results
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{student_id}/results", get(results::list_student_results))
}
