//! Attendance statuses and present-fraction rate computation.
//!
//! Two zero-record conventions coexist and must not be unified:
//! a single student+subject+year lookup reports `"0.0"`, while the
//! class-level aggregation reports `"N/A"` for a student without records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::numeric::format_one_decimal;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const STATUS_PRESENT: &str = "Present";
pub const STATUS_ABSENT: &str = "Absent";
pub const STATUS_LATE: &str = "Late";
pub const STATUS_EXCUSED: &str = "Excused";

/// All valid status strings (stored in DB).
pub const VALID_STATUSES: &[&str] = &[STATUS_PRESENT, STATUS_ABSENT, STATUS_LATE, STATUS_EXCUSED];

/// Rate reported for a single-scope lookup with no records.
pub const ZERO_RATE: &str = "0.0";

/// Rate reported by the class aggregation for a student with no records.
pub const NO_RECORDS_RATE: &str = "N/A";

/// Academic-year filter value meaning "every year".
pub const ALL_YEARS: &str = "All";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATUS_PRESENT => Ok(Self::Present),
            STATUS_ABSENT => Ok(Self::Absent),
            STATUS_LATE => Ok(Self::Late),
            STATUS_EXCUSED => Ok(Self::Excused),
            _ => Err(format!(
                "Invalid attendance status '{s}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => STATUS_PRESENT,
            Self::Absent => STATUS_ABSENT,
            Self::Late => STATUS_LATE,
            Self::Excused => STATUS_EXCUSED,
        }
    }
}

// ---------------------------------------------------------------------------
// Rates
// ---------------------------------------------------------------------------

/// Total and present record counts for one scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceTally {
    pub total: i64,
    pub present: i64,
}

impl AttendanceTally {
    pub fn new(total: i64, present: i64) -> Self {
        Self { total, present }
    }

    pub fn record(&mut self, status: AttendanceStatus) {
        self.total += 1;
        if status == AttendanceStatus::Present {
            self.present += 1;
        }
    }

    fn percentage(&self) -> f64 {
        self.present as f64 / self.total as f64 * 100.0
    }

    /// Rate for a single student+subject+year scope: `"0.0"` with no records.
    pub fn student_rate(&self) -> String {
        if self.total <= 0 {
            return ZERO_RATE.to_string();
        }
        format_one_decimal(self.percentage())
    }

    /// Rate for one row of the class aggregation: `"N/A"` with no records.
    pub fn class_rate(&self) -> String {
        if self.total <= 0 {
            return NO_RECORDS_RATE.to_string();
        }
        format_one_decimal(self.percentage())
    }
}

/// Academic-year scope for the class aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearFilter {
    All,
    Year(String),
}

impl YearFilter {
    /// The literal `"All"` disables year filtering; anything else is an exact match.
    pub fn parse(value: &str) -> Self {
        if value == ALL_YEARS {
            Self::All
        } else {
            Self::Year(value.to_string())
        }
    }

    pub fn as_year(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Year(year) => Some(year.as_str()),
        }
    }
}

/// Attendance tallies keyed by `(student_id, subject_id, academic_year)`.
///
/// Built once from a single fetch of raw records so each result row resolves
/// its rate with a map lookup instead of rescanning the record list.
#[derive(Debug, Default)]
pub struct AttendanceIndex {
    tallies: HashMap<(DbId, DbId, String), AttendanceTally>,
}

impl AttendanceIndex {
    pub fn build<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = (DbId, DbId, &'a str, AttendanceStatus)>,
    {
        let mut tallies: HashMap<(DbId, DbId, String), AttendanceTally> = HashMap::new();
        for (student_id, subject_id, academic_year, status) in records {
            tallies
                .entry((student_id, subject_id, academic_year.to_string()))
                .or_default()
                .record(status);
        }
        Self { tallies }
    }

    pub fn tally(&self, student_id: DbId, subject_id: DbId, academic_year: &str) -> AttendanceTally {
        self.tallies
            .get(&(student_id, subject_id, academic_year.to_string()))
            .copied()
            .unwrap_or_default()
    }

    /// Single-scope rate, `"0.0"` when the scope has no records.
    pub fn student_rate(&self, student_id: DbId, subject_id: DbId, academic_year: &str) -> String {
        self.tally(student_id, subject_id, academic_year).student_rate()
    }
}
