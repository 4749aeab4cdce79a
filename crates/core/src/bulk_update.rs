//! Validation for bulk result updates.
//!
//! Every pass runs over the whole batch before the next one starts, and the
//! first failure rejects the batch. Nothing here touches storage: the caller
//! applies the returned updates only once validation (including the
//! existence check against [`find_missing_ids`]) has succeeded.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::attendance::AttendanceStatus;
use crate::error::{BatchValidationError, CoreError};
use crate::scores::{is_valid_score, parse_score, ExamScores, ScoreField, MAX_SCORE, MIN_SCORE};
use crate::types::DbId;

/// Maximum number of entries accepted in one bulk update.
pub const MAX_BULK_UPDATES: usize = 1000;

/// One entry of a bulk update request, as received.
///
/// Fields are kept as raw JSON so malformed ids and non-numeric scores can be
/// reported by index and field instead of failing deserialization wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResultUpdate {
    pub result_id: Option<Value>,
    pub updated_by: Option<Value>,
    pub first_exam: Option<Value>,
    pub mid_exam: Option<Value>,
    pub third_exam: Option<Value>,
    pub final_exam: Option<Value>,
    pub activities: Option<Value>,
}

impl RawResultUpdate {
    fn score(&self, field: ScoreField) -> Option<&Value> {
        let value = match field {
            ScoreField::FirstExam => &self.first_exam,
            ScoreField::MidExam => &self.mid_exam,
            ScoreField::ThirdExam => &self.third_exam,
            ScoreField::FinalExam => &self.final_exam,
            ScoreField::Activities => &self.activities,
        };
        present(value)
    }
}

/// A bulk update entry that passed every input check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedResultUpdate {
    pub result_id: DbId,
    pub updated_by: DbId,
    pub scores: ExamScores,
}

/// Parse a syntactically valid identifier: a positive integer given as a
/// JSON number or as a string of ASCII digits.
pub fn parse_identifier(value: &Value) -> Option<DbId> {
    let id = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse::<DbId>().ok()
        }
        _ => None,
    };
    id.filter(|id| *id > 0)
}

fn present(value: &Option<Value>) -> Option<&Value> {
    value.as_ref().filter(|v| !v.is_null())
}

/// Run the input validation passes over a bulk update batch.
///
/// 1. every `result_id` is a valid identifier
/// 2. every entry carries `updated_by` and all five score fields
/// 3. every score is a finite number in `[0, 100]`
/// 4. no `result_id` repeats (the second occurrence is reported)
pub fn validate_bulk_updates(
    updates: &[RawResultUpdate],
) -> Result<Vec<ValidatedResultUpdate>, CoreError> {
    if updates.is_empty() {
        return Err(CoreError::Validation("updates must not be empty".into()));
    }
    if updates.len() > MAX_BULK_UPDATES {
        return Err(CoreError::Validation(format!(
            "At most {MAX_BULK_UPDATES} updates are accepted per batch, got {}",
            updates.len()
        )));
    }

    let mut result_ids = Vec::with_capacity(updates.len());
    for (index, update) in updates.iter().enumerate() {
        let raw = present(&update.result_id);
        match raw.and_then(parse_identifier) {
            Some(id) => result_ids.push(id),
            None => {
                let mut err = BatchValidationError::at(index, "Invalid result id format")
                    .with_field("result_id");
                if let Some(v) = raw {
                    err = err.with_value(v.clone());
                }
                return Err(err.into());
            }
        }
    }

    let mut updaters = Vec::with_capacity(updates.len());
    for (index, update) in updates.iter().enumerate() {
        let Some(raw) = present(&update.updated_by) else {
            return Err(missing_field(index, "updated_by"));
        };
        for field in ScoreField::ALL {
            if update.score(field).is_none() {
                return Err(missing_field(index, field.as_str()));
            }
        }
        updaters.push(require_identifier(index, "updated_by", Some(raw))?);
    }

    let mut all_scores = Vec::with_capacity(updates.len());
    for (index, update) in updates.iter().enumerate() {
        all_scores.push(parse_entry_scores(index, |field| update.score(field))?);
    }

    let mut seen = HashSet::with_capacity(result_ids.len());
    for (index, id) in result_ids.iter().enumerate() {
        if !seen.insert(*id) {
            return Err(BatchValidationError::at(
                index,
                format!("Duplicate result id {id} in batch"),
            )
            .with_field("result_id")
            .with_value(Value::from(*id))
            .into());
        }
    }

    Ok(result_ids
        .into_iter()
        .zip(updaters)
        .zip(all_scores)
        .map(|((result_id, updated_by), scores)| ValidatedResultUpdate {
            result_id,
            updated_by,
            scores,
        })
        .collect())
}

/// One entry of a bulk attendance status correction, as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStatusUpdate {
    pub attendance_id: Option<Value>,
    pub status: Option<Value>,
}

/// Validate a bulk status correction with the same all-or-nothing policy as
/// result updates: id format, then status, then duplicates.
pub fn validate_status_updates(
    updates: &[RawStatusUpdate],
) -> Result<Vec<(DbId, AttendanceStatus)>, CoreError> {
    if updates.is_empty() {
        return Err(CoreError::Validation("updates must not be empty".into()));
    }
    if updates.len() > MAX_BULK_UPDATES {
        return Err(CoreError::Validation(format!(
            "At most {MAX_BULK_UPDATES} updates are accepted per batch, got {}",
            updates.len()
        )));
    }

    let mut ids = Vec::with_capacity(updates.len());
    for (index, update) in updates.iter().enumerate() {
        let raw = present(&update.attendance_id);
        match raw.and_then(parse_identifier) {
            Some(id) => ids.push(id),
            None => {
                let mut err = BatchValidationError::at(index, "Invalid attendance id format")
                    .with_field("attendance_id");
                if let Some(v) = raw {
                    err = err.with_value(v.clone());
                }
                return Err(err.into());
            }
        }
    }

    let mut statuses = Vec::with_capacity(updates.len());
    for (index, update) in updates.iter().enumerate() {
        let Some(raw) = present(&update.status) else {
            return Err(missing_field(index, "status"));
        };
        let status = raw
            .as_str()
            .ok_or_else(|| "status must be a string".to_string())
            .and_then(AttendanceStatus::from_str_value)
            .map_err(|msg| {
                CoreError::from(
                    BatchValidationError::at(index, msg)
                        .with_field("status")
                        .with_value(raw.clone()),
                )
            })?;
        statuses.push(status);
    }

    let mut seen = HashSet::with_capacity(ids.len());
    for (index, id) in ids.iter().enumerate() {
        if !seen.insert(*id) {
            return Err(BatchValidationError::at(
                index,
                format!("Duplicate attendance id {id} in batch"),
            )
            .with_field("attendance_id")
            .with_value(Value::from(*id))
            .into());
        }
    }

    Ok(ids.into_iter().zip(statuses).collect())
}

/// Parse the five score fields of one entry.
///
/// The first missing, non-numeric or out-of-range field is reported against
/// `index` together with the offending value.
pub fn parse_entry_scores<'a>(
    index: usize,
    score: impl Fn(ScoreField) -> Option<&'a Value>,
) -> Result<ExamScores, CoreError> {
    let mut values = [0.0; 5];
    for (slot, field) in values.iter_mut().zip(ScoreField::ALL) {
        let raw = score(field)
            .filter(|v| !v.is_null())
            .ok_or_else(|| missing_field(index, field.as_str()))?;
        *slot = match parse_score(raw) {
            Some(v) if is_valid_score(v) => v,
            Some(_) => {
                return Err(BatchValidationError::at(
                    index,
                    format!(
                        "{} must be between {MIN_SCORE} and {MAX_SCORE}",
                        field.as_str()
                    ),
                )
                .with_field(field.as_str())
                .with_value(raw.clone())
                .into());
            }
            None => {
                return Err(BatchValidationError::at(
                    index,
                    format!("{} must be a number", field.as_str()),
                )
                .with_field(field.as_str())
                .with_value(raw.clone())
                .into());
            }
        };
    }
    Ok(ExamScores {
        first_exam: values[0],
        mid_exam: values[1],
        third_exam: values[2],
        final_exam: values[3],
        activities: values[4],
    })
}

/// A required identifier field of one entry: missing and malformed values
/// are both reported against `index` and `field`.
pub fn require_identifier(
    index: usize,
    field: &'static str,
    value: Option<&Value>,
) -> Result<DbId, CoreError> {
    let raw = value
        .filter(|v| !v.is_null())
        .ok_or_else(|| missing_field(index, field))?;
    parse_identifier(raw).ok_or_else(|| {
        BatchValidationError::at(index, format!("Invalid {field} format"))
            .with_field(field)
            .with_value(raw.clone())
            .into()
    })
}

fn missing_field(index: usize, field: &'static str) -> CoreError {
    BatchValidationError::at(index, format!("Missing required field '{field}'"))
        .with_field(field)
        .into()
}

/// Ids from `requested` that are absent from `found`, in request order.
pub fn find_missing_ids(requested: &[DbId], found: &[DbId]) -> Vec<DbId> {
    let found: HashSet<DbId> = found.iter().copied().collect();
    requested
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect()
}
