//! Domain logic for attendance and result aggregation.
//!
//! This crate has no database dependency: every function operates on data
//! passed in by the caller, so the repository and HTTP layers stay thin.

pub mod academic_year;
pub mod attendance;
pub mod bulk_update;
pub mod error;
pub mod numeric;
pub mod overview;
pub mod scores;
pub mod types;
