//! Classroom reference entity.

use edurank_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `classrooms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Classroom {
    pub id: DbId,
    pub grade: String,
    pub section: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassroom {
    pub grade: String,
    pub section: String,
}
