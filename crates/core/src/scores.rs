//! Exam-component scores and the derived result total.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::numeric::{format_one_decimal, round_to};

/// Lowest accepted component score.
pub const MIN_SCORE: f64 = 0.0;

/// Highest accepted component score.
pub const MAX_SCORE: f64 = 100.0;

/// The five score components of a result record, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreField {
    FirstExam,
    MidExam,
    ThirdExam,
    FinalExam,
    Activities,
}

impl ScoreField {
    pub const ALL: [ScoreField; 5] = [
        Self::FirstExam,
        Self::MidExam,
        Self::ThirdExam,
        Self::FinalExam,
        Self::Activities,
    ];

    /// Field name as it appears in request payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstExam => "first_exam",
            Self::MidExam => "mid_exam",
            Self::ThirdExam => "third_exam",
            Self::FinalExam => "final_exam",
            Self::Activities => "activities",
        }
    }
}

/// Component scores for one student+subject+year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExamScores {
    pub first_exam: f64,
    pub mid_exam: f64,
    pub third_exam: f64,
    pub final_exam: f64,
    pub activities: f64,
}

impl ExamScores {
    pub fn get(&self, field: ScoreField) -> f64 {
        match field {
            ScoreField::FirstExam => self.first_exam,
            ScoreField::MidExam => self.mid_exam,
            ScoreField::ThirdExam => self.third_exam,
            ScoreField::FinalExam => self.final_exam,
            ScoreField::Activities => self.activities,
        }
    }

    /// Sum of the five components, kept to one decimal place.
    pub fn total(&self) -> f64 {
        let sum: f64 = ScoreField::ALL.iter().map(|f| self.get(*f)).sum();
        round_to(sum, 1)
    }

    /// The stored form of [`ExamScores::total`].
    pub fn total_string(&self) -> String {
        format_one_decimal(self.total())
    }

    /// Check every component is a finite number in `[0, 100]`.
    pub fn validate(&self) -> Result<(), CoreError> {
        for field in ScoreField::ALL {
            let value = self.get(field);
            if !is_valid_score(value) {
                return Err(CoreError::Validation(format!(
                    "{} must be between {MIN_SCORE} and {MAX_SCORE}, got {value}",
                    field.as_str()
                )));
            }
        }
        Ok(())
    }
}

pub fn is_valid_score(value: f64) -> bool {
    value.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&value)
}

/// Interpret a JSON value as a score: numbers, or strings holding a number.
///
/// Returns `None` when the value is not numeric or not finite. Range is
/// checked separately so callers can report the two failures differently.
pub fn parse_score(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}
