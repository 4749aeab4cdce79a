//! Ranked per-student summary of a class's results for one academic year.
//!
//! Duplicate submissions for the same student+subject are collapsed by
//! keeping the row with the highest total (not the latest one), so a lower
//! resubmission never hides an earlier, better score.

use std::collections::HashMap;

use serde::Serialize;

use crate::numeric::round_to;
use crate::types::DbId;

/// Read access to the fields the overview needs from a stored result row.
pub trait ScoredResult {
    fn student_id(&self) -> DbId;
    fn subject_id(&self) -> DbId;
    /// Numeric total; rows whose stored total does not parse count as `0`.
    fn total_value(&self) -> f64;
}

/// One ranked row of the class overview.
#[derive(Debug, Clone, Serialize)]
pub struct StudentOverview<R> {
    pub student_id: DbId,
    pub total_marks: f64,
    pub subjects_count: usize,
    pub average_per_subject: f64,
    pub subjects: Vec<R>,
}

/// Group `rows` by student, keep the best row per subject, and rank students
/// by the sum of their kept totals (highest first).
///
/// Ties on a subject keep the first row encountered; ties on total marks keep
/// students in ascending id order.
pub fn build_class_overview<R>(rows: Vec<R>) -> Vec<StudentOverview<R>>
where
    R: ScoredResult,
{
    let mut by_student: HashMap<DbId, Vec<R>> = HashMap::new();

    for row in rows {
        let kept = by_student.entry(row.student_id()).or_default();
        match kept.iter_mut().find(|r| r.subject_id() == row.subject_id()) {
            Some(existing) => {
                if row.total_value() > existing.total_value() {
                    *existing = row;
                }
            }
            None => kept.push(row),
        }
    }

    let mut overview: Vec<StudentOverview<R>> = by_student
        .into_iter()
        .map(|(student_id, subjects)| {
            let total_marks = round_to(subjects.iter().map(ScoredResult::total_value).sum(), 1);
            let subjects_count = subjects.len();
            let average_per_subject = if subjects_count == 0 {
                0.0
            } else {
                round_to(total_marks / subjects_count as f64, 2)
            };
            StudentOverview {
                student_id,
                total_marks,
                subjects_count,
                average_per_subject,
                subjects,
            }
        })
        .collect();

    overview.sort_by(|a, b| {
        b.total_marks
            .total_cmp(&a.total_marks)
            .then(a.student_id.cmp(&b.student_id))
    });
    overview
}
