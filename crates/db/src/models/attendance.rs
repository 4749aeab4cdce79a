//! Attendance record models and DTOs.

use chrono::NaiveDate;
use edurank_core::attendance::AttendanceStatus;
use edurank_core::bulk_update::RawStatusUpdate;
use edurank_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `attendance_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttendanceRecord {
    pub id: DbId,
    pub student_id: DbId,
    pub subject_id: DbId,
    pub class_id: DbId,
    pub status: String,
    pub date: NaiveDate,
    pub period_start: String,
    pub period_end: String,
    pub academic_year: String,
    pub marked_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The columns needed to tally attendance per student+subject+year.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceScopeRow {
    pub student_id: DbId,
    pub subject_id: DbId,
    pub academic_year: String,
    pub status: String,
}

/// Per-student record counts for one class.
#[derive(Debug, Clone, FromRow)]
pub struct StudentAttendanceCount {
    pub student_id: DbId,
    pub total_records: i64,
    pub present_records: i64,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Insert payload for a single attendance row.
#[derive(Debug, Clone)]
pub struct CreateAttendanceRecord {
    pub student_id: DbId,
    pub subject_id: DbId,
    pub class_id: DbId,
    pub status: AttendanceStatus,
    pub date: NaiveDate,
    pub period_start: String,
    pub period_end: String,
    pub academic_year: String,
    pub marked_by: DbId,
}

/// One student's mark on a submitted attendance sheet.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceEntry {
    pub student_id: DbId,
    pub status: AttendanceStatus,
}

/// Request body for `POST /teachers/{teacher_id}/attendance`.
///
/// Scope fields are optional so a missing key is reported as a 400 with a
/// message instead of a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAttendanceSheet {
    pub class_id: Option<DbId>,
    pub subject_id: Option<DbId>,
    pub academic_year: Option<String>,
    pub date: Option<NaiveDate>,
    pub period_start: Option<String>,
    pub period_end: Option<String>,
    pub records: Option<Vec<AttendanceEntry>>,
}

/// Request body for `PUT /attendance/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAttendanceStatus {
    pub status: AttendanceStatus,
}

/// Request body for `PUT /attendance/bulk-status`.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkStatusUpdateRequest {
    #[serde(default)]
    pub updates: Vec<RawStatusUpdate>,
}

/// Query parameters for `GET /attendance/rate`.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceRateParams {
    pub student_id: Option<DbId>,
    pub subject_id: Option<DbId>,
    pub academic_year: Option<String>,
}

/// Query parameters for `GET /attendance/class-rates`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassAttendanceParams {
    pub class_id: Option<DbId>,
    pub subject_id: Option<DbId>,
    /// `All` disables year filtering.
    pub academic_year: Option<String>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Attendance rate of one student for one subject and year.
#[derive(Debug, Clone, Serialize)]
pub struct StudentAttendanceRate {
    pub student_id: DbId,
    pub subject_id: DbId,
    pub academic_year: String,
    pub attendance_rate: String,
}

/// One row of the class attendance aggregation.
#[derive(Debug, Clone, Serialize)]
pub struct ClassAttendanceRate {
    pub student_id: DbId,
    /// One-decimal percentage, or `N/A` when the student has no records.
    pub attendance_rate: String,
    pub total_records: i64,
    pub academic_year: String,
}

/// Outcome of a bulk status update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkStatusResult {
    pub modified_count: u64,
}
