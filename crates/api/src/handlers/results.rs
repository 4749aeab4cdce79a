//! Handlers for result submission, score updates and class-level result views.
//!
//! Every write recomputes `total` from the five components and takes a fresh
//! attendance snapshot for the row's student+subject+year.

use std::collections::{BTreeSet, HashMap};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use edurank_core::academic_year::sort_years_desc;
use edurank_core::attendance::{AttendanceIndex, AttendanceStatus};
use edurank_core::bulk_update::{
    find_missing_ids, parse_entry_scores, require_identifier, validate_bulk_updates,
};
use edurank_core::error::CoreError;
use edurank_core::overview::build_class_overview;
use edurank_core::types::DbId;
use edurank_db::models::student_result::{
    BulkUpdateResultsRequest, ClassOverviewParams, CreateStudentResult, ResultScopeParams,
    ResultScoreUpdate, StudentResult, StudentResultsParams, SubmitResultsRequest,
    UpdateSingleResult,
};
use edurank_db::repositories::{AttendanceRepo, StudentRepo, StudentResultRepo};

use super::attendance::student_attendance_rate;
use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::query::{require, require_text};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// POST /api/v1/teachers/{teacher_id}/results
///
/// Store one result row per submitted student for a class+subject+year.
/// All rows go in with a single insert; a storage failure is reported as a
/// whole, not per student.
pub async fn submit_results(
    State(state): State<AppState>,
    PathParam(teacher_id): PathParam<DbId>,
    JsonBody(input): JsonBody<SubmitResultsRequest>,
) -> AppResult<impl IntoResponse> {
    let class_id = require(input.class_id, "class_id")?;
    let subject_id = require(input.subject_id, "subject_id")?;
    let academic_year = require_text(input.academic_year, "academic_year")?;
    let entries = require(input.results, "results")?;

    if entries.is_empty() {
        return Err(AppError::BadRequest("results must not be empty".into()));
    }

    let mut parsed = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let student_id = require_identifier(index, "student_id", entry.student_id.as_ref())?;
        let scores = parse_entry_scores(index, |field| entry.score(field))?;
        parsed.push((student_id, scores));
    }

    let mut rows = Vec::with_capacity(parsed.len());
    for (student_id, scores) in parsed {
        let attendance_rate =
            student_attendance_rate(&state.pool, student_id, subject_id, &academic_year).await?;
        rows.push(CreateStudentResult {
            teacher_id,
            student_id,
            class_id,
            subject_id,
            academic_year: academic_year.clone(),
            attendance_rate,
            total: scores.total_string(),
            scores,
        });
    }

    let created = StudentResultRepo::create_batch(&state.pool, &rows).await?;

    tracing::info!(
        teacher_id,
        class_id,
        subject_id,
        academic_year = %academic_year,
        count = created.len(),
        "Results submitted",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

/// PUT /api/v1/results/{id}
///
/// Replace the scores of one row, recomputing its total and attendance snapshot.
pub async fn update_single_result(
    State(state): State<AppState>,
    PathParam(result_id): PathParam<DbId>,
    JsonBody(input): JsonBody<UpdateSingleResult>,
) -> AppResult<impl IntoResponse> {
    let scores = parse_entry_scores(0, |field| input.score(field))?;
    let updated_by = require_identifier(0, "updated_by", input.updated_by.as_ref())?;

    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "StudentResult",
            id: result_id,
        })
    };

    let existing = StudentResultRepo::find_by_id(&state.pool, result_id)
        .await?
        .ok_or_else(not_found)?;

    let attendance_rate = student_attendance_rate(
        &state.pool,
        existing.student_id,
        existing.subject_id,
        &existing.academic_year,
    )
    .await?;

    let update = ResultScoreUpdate {
        result_id,
        updated_by,
        scores,
        attendance_rate,
        total: scores.total_string(),
    };

    let updated = StudentResultRepo::update_scores(&state.pool, &update)
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(
        result_id,
        updated_by,
        total = %updated.total,
        "Result updated",
    );

    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/results/bulk-update
///
/// Validates the whole batch (id format, required fields, score ranges,
/// duplicates, existence) before writing anything. Attendance for every
/// affected row is fetched with one query and resolved through an index.
pub async fn bulk_update_results(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<BulkUpdateResultsRequest>,
) -> AppResult<impl IntoResponse> {
    let validated = validate_bulk_updates(&input.updates)?;

    let ids: Vec<DbId> = validated.iter().map(|u| u.result_id).collect();
    let existing = StudentResultRepo::find_by_ids(&state.pool, &ids).await?;
    let existing_ids: Vec<DbId> = existing.iter().map(|r| r.id).collect();
    let missing = find_missing_ids(&ids, &existing_ids);
    if !missing.is_empty() {
        return Err(AppError::Core(CoreError::NotFoundMany {
            entity: "StudentResult",
            ids: missing,
        }));
    }

    let index = load_attendance_index(&state, &existing).await?;
    let by_id: HashMap<DbId, &StudentResult> = existing.iter().map(|r| (r.id, r)).collect();

    let mut updates = Vec::with_capacity(validated.len());
    for v in &validated {
        let record = by_id.get(&v.result_id).ok_or_else(|| {
            AppError::InternalError(format!("result {} vanished during bulk update", v.result_id))
        })?;
        updates.push(ResultScoreUpdate {
            result_id: v.result_id,
            updated_by: v.updated_by,
            scores: v.scores,
            attendance_rate: index.student_rate(
                record.student_id,
                record.subject_id,
                &record.academic_year,
            ),
            total: v.scores.total_string(),
        });
    }

    let summary = StudentResultRepo::bulk_update(&state.pool, &updates).await?;

    tracing::info!(
        requested = updates.len(),
        matched = summary.matched_count,
        modified = summary.modified_count,
        "Bulk result update applied",
    );

    Ok(Json(DataResponse { data: summary }))
}

/// Fetch attendance for every student+subject pair in `rows` with one query
/// and index it by student+subject+year.
async fn load_attendance_index(
    state: &AppState,
    rows: &[StudentResult],
) -> AppResult<AttendanceIndex> {
    let student_ids: Vec<DbId> = rows
        .iter()
        .map(|r| r.student_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let subject_ids: Vec<DbId> = rows
        .iter()
        .map(|r| r.subject_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let scope_rows = AttendanceRepo::list_scope_rows(&state.pool, &student_ids, &subject_ids).await?;

    Ok(AttendanceIndex::build(scope_rows.iter().filter_map(|r| {
        AttendanceStatus::from_str_value(&r.status)
            .ok()
            .map(|status| (r.student_id, r.subject_id, r.academic_year.as_str(), status))
    })))
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/results/{id}
pub async fn get_result(
    State(state): State<AppState>,
    PathParam(result_id): PathParam<DbId>,
) -> AppResult<impl IntoResponse> {
    let result = StudentResultRepo::find_by_id(&state.pool, result_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StudentResult",
            id: result_id,
        }))?;

    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/results?class_id&subject_id&academic_year
pub async fn list_results(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ResultScopeParams>,
) -> AppResult<impl IntoResponse> {
    let class_id = require(params.class_id, "class_id")?;
    let subject_id = require(params.subject_id, "subject_id")?;
    let academic_year = require_text(params.academic_year, "academic_year")?;

    let results =
        StudentResultRepo::list_for_scope(&state.pool, class_id, subject_id, &academic_year)
            .await?;

    Ok(Json(DataResponse { data: results }))
}

/// GET /api/v1/students/{student_id}/results
///
/// 404 when the student does not exist; an empty list when they have no results.
pub async fn list_student_results(
    State(state): State<AppState>,
    PathParam(student_id): PathParam<DbId>,
    QueryParams(params): QueryParams<StudentResultsParams>,
) -> AppResult<impl IntoResponse> {
    StudentRepo::find_by_id(&state.pool, student_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Student",
            id: student_id,
        }))?;

    let results = StudentResultRepo::list_for_student(
        &state.pool,
        student_id,
        params.academic_year.as_deref(),
    )
    .await?;

    Ok(Json(DataResponse { data: results }))
}

/// GET /api/v1/results/class-overview?class_id&academic_year
///
/// Ranked per-student summary keeping the best row per subject.
pub async fn class_overview(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ClassOverviewParams>,
) -> AppResult<impl IntoResponse> {
    let class_id = require(params.class_id, "class_id")?;
    let academic_year = require_text(params.academic_year, "academic_year")?;

    let rows = StudentResultRepo::list_for_class_year(&state.pool, class_id, &academic_year).await?;
    let overview = build_class_overview(rows);

    Ok(Json(DataResponse { data: overview }))
}

/// GET /api/v1/results/academic-years
///
/// Distinct academic years with results, newest start year first.
pub async fn registered_academic_years(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let years = StudentResultRepo::distinct_academic_years(&state.pool).await?;

    Ok(Json(DataResponse {
        data: sort_years_desc(years),
    }))
}
