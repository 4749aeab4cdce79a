//! Handlers for attendance sheets, status corrections and attendance rates.
//!
//! The two rate endpoints disagree on the zero-record case:
//! `/attendance/rate` answers `"0.0"`, `/attendance/class-rates` answers
//! `"N/A"` for a student without records.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use edurank_core::attendance::{AttendanceTally, YearFilter};
use edurank_core::bulk_update::{find_missing_ids, validate_status_updates};
use edurank_core::error::CoreError;
use edurank_core::types::DbId;
use edurank_db::models::attendance::{
    AttendanceRateParams, BulkStatusResult, BulkStatusUpdateRequest, ClassAttendanceParams,
    ClassAttendanceRate, CreateAttendanceRecord, StudentAttendanceRate, SubmitAttendanceSheet,
    UpdateAttendanceStatus,
};
use edurank_db::repositories::{AttendanceRepo, ClassroomRepo};
use edurank_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::query::{require, require_text};
use crate::response::DataResponse;
use crate::state::AppState;

/// Attendance rate for exactly one student+subject+year: `"0.0"` with no records.
pub async fn student_attendance_rate(
    pool: &DbPool,
    student_id: DbId,
    subject_id: DbId,
    academic_year: &str,
) -> AppResult<String> {
    let tally = AttendanceRepo::tally_for_scope(pool, student_id, subject_id, academic_year).await?;
    Ok(tally.student_rate())
}

// ---------------------------------------------------------------------------
// Rates
// ---------------------------------------------------------------------------

/// GET /api/v1/attendance/rate
pub async fn get_student_rate(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<AttendanceRateParams>,
) -> AppResult<impl IntoResponse> {
    let student_id = require(params.student_id, "student_id")?;
    let subject_id = require(params.subject_id, "subject_id")?;
    let academic_year = require_text(params.academic_year, "academic_year")?;

    let attendance_rate =
        student_attendance_rate(&state.pool, student_id, subject_id, &academic_year).await?;

    Ok(Json(DataResponse {
        data: StudentAttendanceRate {
            student_id,
            subject_id,
            academic_year,
            attendance_rate,
        },
    }))
}

/// GET /api/v1/attendance/class-rates
///
/// One row per student enrolled in the class. `academic_year=All` disables
/// the year filter; the value is echoed back on every row.
pub async fn get_class_rates(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ClassAttendanceParams>,
) -> AppResult<impl IntoResponse> {
    let class_id = require(params.class_id, "class_id")?;
    let academic_year = require_text(params.academic_year, "academic_year")?;

    ClassroomRepo::find_by_id(&state.pool, class_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Classroom",
            id: class_id,
        }))?;

    let filter = YearFilter::parse(&academic_year);
    let counts =
        AttendanceRepo::class_counts(&state.pool, class_id, params.subject_id, filter.as_year())
            .await?;

    let rates: Vec<ClassAttendanceRate> = counts
        .into_iter()
        .map(|c| ClassAttendanceRate {
            student_id: c.student_id,
            attendance_rate: AttendanceTally::new(c.total_records, c.present_records).class_rate(),
            total_records: c.total_records,
            academic_year: academic_year.clone(),
        })
        .collect();

    Ok(Json(DataResponse { data: rates }))
}

// ---------------------------------------------------------------------------
// Sheets and corrections
// ---------------------------------------------------------------------------

/// POST /api/v1/teachers/{teacher_id}/attendance
///
/// Record a whole class attendance sheet in one insert.
pub async fn submit_sheet(
    State(state): State<AppState>,
    PathParam(teacher_id): PathParam<DbId>,
    JsonBody(input): JsonBody<SubmitAttendanceSheet>,
) -> AppResult<impl IntoResponse> {
    let class_id = require(input.class_id, "class_id")?;
    let subject_id = require(input.subject_id, "subject_id")?;
    let academic_year = require_text(input.academic_year, "academic_year")?;
    let date = require(input.date, "date")?;
    let period_start = require_text(input.period_start, "period_start")?;
    let period_end = require_text(input.period_end, "period_end")?;
    let entries = require(input.records, "records")?;

    if entries.is_empty() {
        return Err(AppError::BadRequest("records must not be empty".into()));
    }

    let rows: Vec<CreateAttendanceRecord> = entries
        .iter()
        .map(|e| CreateAttendanceRecord {
            student_id: e.student_id,
            subject_id,
            class_id,
            status: e.status,
            date,
            period_start: period_start.clone(),
            period_end: period_end.clone(),
            academic_year: academic_year.clone(),
            marked_by: teacher_id,
        })
        .collect();

    let created = AttendanceRepo::create_batch(&state.pool, &rows).await?;

    tracing::info!(
        teacher_id,
        class_id,
        subject_id,
        academic_year = %academic_year,
        count = created.len(),
        "Attendance sheet recorded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PUT /api/v1/attendance/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    PathParam(attendance_id): PathParam<DbId>,
    JsonBody(input): JsonBody<UpdateAttendanceStatus>,
) -> AppResult<impl IntoResponse> {
    let record = AttendanceRepo::update_status(&state.pool, attendance_id, input.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AttendanceRecord",
            id: attendance_id,
        }))?;

    tracing::info!(
        attendance_id,
        status = input.status.as_str(),
        "Attendance status updated",
    );

    Ok(Json(DataResponse { data: record }))
}

/// PUT /api/v1/attendance/bulk-status
///
/// All entries are validated, and all ids confirmed to exist, before any
/// status is changed.
pub async fn bulk_update_status(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<BulkStatusUpdateRequest>,
) -> AppResult<impl IntoResponse> {
    let updates = validate_status_updates(&input.updates)?;

    let ids: Vec<DbId> = updates.iter().map(|(id, _)| *id).collect();
    let existing = AttendanceRepo::find_existing_ids(&state.pool, &ids).await?;
    let missing = find_missing_ids(&ids, &existing);
    if !missing.is_empty() {
        return Err(AppError::Core(CoreError::NotFoundMany {
            entity: "AttendanceRecord",
            ids: missing,
        }));
    }

    let modified_count = AttendanceRepo::bulk_update_status(&state.pool, &updates).await?;

    tracing::info!(
        requested = updates.len(),
        modified_count,
        "Bulk attendance status update applied",
    );

    Ok(Json(DataResponse {
        data: BulkStatusResult { modified_count },
    }))
}
