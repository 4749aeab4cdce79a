pub mod attendance;
pub mod health;
pub mod results;
pub mod students;
pub mod teachers;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /teachers/{teacher_id}/results                   submit class results (POST)
/// /teachers/{teacher_id}/attendance                submit attendance sheet (POST)
///
/// /attendance/rate                                 single student+subject+year rate
/// /attendance/class-rates                          per-student rates for a class
/// /attendance/bulk-status                          bulk status correction (PUT)
/// /attendance/{id}/status                          single status correction (PUT)
///
/// /results                                         list by class+subject+year
/// /results/bulk-update                             validated bulk score update (POST)
/// /results/class-overview                          ranked class summary
/// /results/academic-years                          registered academic years
/// /results/{id}                                    get, update scores (PUT)
///
/// /students/{student_id}/results                   a student's results
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Teacher submissions (results and attendance sheets).
        .nest("/teachers", teachers::router())
        // Attendance rates and corrections.
        .nest("/attendance", attendance::router())
        // Result records, bulk updates, overview.
        .nest("/results", results::router())
        // Student-scoped reads.
        .nest("/students", students::router())
}
