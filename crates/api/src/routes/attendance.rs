//! Route definitions for attendance rates and status corrections.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::attendance;
use crate::state::AppState;

/// Attendance routes mounted at `/attendance`.
///
/// ```text
/// GET    /rate              -> get_student_rate
/// GET    /class-rates       -> get_class_rates
/// PUT    /bulk-status       -> bulk_update_status
/// PUT    /{id}/status       -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rate", get(attendance::get_student_rate))
        .route("/class-rates", get(attendance::get_class_rates))
        .route("/bulk-status", put(attendance::bulk_update_status))
        .route("/{id}/status", put(attendance::update_status))
}
