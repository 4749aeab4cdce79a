//! Route definitions for result records.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::results;
use crate::state::AppState;

/// Result routes mounted at `/results`.
///
/// ```text
/// GET    /                  -> list_results (class+subject+year scope)
/// POST   /bulk-update       -> bulk_update_results
/// GET    /class-overview    -> class_overview
/// GET    /academic-years    -> registered_academic_years
/// GET    /{id}              -> get_result
/// PUT    /{id}              -> update_single_result
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(results::list_results))
        .route("/bulk-update", post(results::bulk_update_results))
        .route("/class-overview", get(results::class_overview))
        .route("/academic-years", get(results::registered_academic_years))
        .route(
            "/{id}",
            get(results::get_result).put(results::update_single_result),
        )
}
