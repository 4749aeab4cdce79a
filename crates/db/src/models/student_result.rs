//! Student result models and DTOs.

use edurank_core::bulk_update::RawResultUpdate;
use edurank_core::numeric::parse_decimal;
use edurank_core::overview::ScoredResult;
use edurank_core::scores::{ExamScores, ScoreField};
use edurank_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `student_results` table.
///
/// `attendance_rate` is a snapshot taken when the row was last written; it is
/// not refreshed when attendance records change afterwards.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StudentResult {
    pub id: DbId,
    pub teacher_id: DbId,
    pub student_id: DbId,
    pub class_id: DbId,
    pub subject_id: DbId,
    pub academic_year: String,
    pub attendance_rate: String,
    pub first_exam: f64,
    pub mid_exam: f64,
    pub third_exam: f64,
    pub final_exam: f64,
    pub activities: f64,
    pub total: String,
    pub created_by: DbId,
    pub last_updated_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StudentResult {
    pub fn scores(&self) -> ExamScores {
        ExamScores {
            first_exam: self.first_exam,
            mid_exam: self.mid_exam,
            third_exam: self.third_exam,
            final_exam: self.final_exam,
            activities: self.activities,
        }
    }
}

impl ScoredResult for StudentResult {
    fn student_id(&self) -> DbId {
        self.student_id
    }

    fn subject_id(&self) -> DbId {
        self.subject_id
    }

    fn total_value(&self) -> f64 {
        parse_decimal(&self.total).unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Write payloads
// ---------------------------------------------------------------------------

/// Insert payload for a single result row (attendance and total already computed).
#[derive(Debug, Clone)]
pub struct CreateStudentResult {
    pub teacher_id: DbId,
    pub student_id: DbId,
    pub class_id: DbId,
    pub subject_id: DbId,
    pub academic_year: String,
    pub attendance_rate: String,
    pub scores: ExamScores,
    pub total: String,
}

/// One row of a bulk result write (attendance and total already computed).
#[derive(Debug, Clone)]
pub struct ResultScoreUpdate {
    pub result_id: DbId,
    pub updated_by: DbId,
    pub scores: ExamScores,
    pub attendance_rate: String,
    pub total: String,
}

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// One student's scores in a result submission, as received.
///
/// Kept as raw JSON so a missing or malformed field is reported with the
/// entry's index instead of failing deserialization of the whole body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmittedScores {
    pub student_id: Option<Value>,
    pub first_exam: Option<Value>,
    pub mid_exam: Option<Value>,
    pub third_exam: Option<Value>,
    pub final_exam: Option<Value>,
    pub activities: Option<Value>,
}

impl SubmittedScores {
    pub fn score(&self, field: ScoreField) -> Option<&Value> {
        score_field(
            [
                &self.first_exam,
                &self.mid_exam,
                &self.third_exam,
                &self.final_exam,
                &self.activities,
            ],
            field,
        )
    }
}

/// Request body for `POST /teachers/{teacher_id}/results`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResultsRequest {
    pub class_id: Option<DbId>,
    pub subject_id: Option<DbId>,
    pub academic_year: Option<String>,
    pub results: Option<Vec<SubmittedScores>>,
}

/// Request body for `PUT /results/{id}`, validated like one bulk entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSingleResult {
    pub first_exam: Option<Value>,
    pub mid_exam: Option<Value>,
    pub third_exam: Option<Value>,
    pub final_exam: Option<Value>,
    pub activities: Option<Value>,
    pub updated_by: Option<Value>,
}

impl UpdateSingleResult {
    pub fn score(&self, field: ScoreField) -> Option<&Value> {
        score_field(
            [
                &self.first_exam,
                &self.mid_exam,
                &self.third_exam,
                &self.final_exam,
                &self.activities,
            ],
            field,
        )
    }
}

fn score_field(columns: [&Option<Value>; 5], field: ScoreField) -> Option<&Value> {
    let slot = match field {
        ScoreField::FirstExam => columns[0],
        ScoreField::MidExam => columns[1],
        ScoreField::ThirdExam => columns[2],
        ScoreField::FinalExam => columns[3],
        ScoreField::Activities => columns[4],
    };
    slot.as_ref()
}

/// Request body for `POST /results/bulk-update`.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkUpdateResultsRequest {
    #[serde(default)]
    pub updates: Vec<RawResultUpdate>,
}

/// Query parameters for `GET /results/class-overview`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassOverviewParams {
    pub class_id: Option<DbId>,
    pub academic_year: Option<String>,
}

/// Query parameters for `GET /results`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultScopeParams {
    pub class_id: Option<DbId>,
    pub subject_id: Option<DbId>,
    pub academic_year: Option<String>,
}

/// Query parameters for `GET /students/{student_id}/results`.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentResultsParams {
    pub academic_year: Option<String>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Summary of a bulk result write.
///
/// `matched_count` counts rows addressed by the batch; `modified_count`
/// counts rows whose stored values actually changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct BulkWriteSummary {
    pub matched_count: i64,
    pub modified_count: i64,
}
