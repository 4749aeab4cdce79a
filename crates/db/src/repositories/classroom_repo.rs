//! Repository for the `classrooms` table.

use edurank_core::types::DbId;
use sqlx::PgPool;

use crate::models::classroom::{Classroom, CreateClassroom};

const COLUMNS: &str = "id, grade, section, created_at, updated_at";

pub struct ClassroomRepo;

impl ClassroomRepo {
    pub async fn create(pool: &PgPool, input: &CreateClassroom) -> Result<Classroom, sqlx::Error> {
        let query = format!(
            "INSERT INTO classrooms (grade, section) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Classroom>(&query)
            .bind(&input.grade)
            .bind(&input.section)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Classroom>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM classrooms WHERE id = $1");
        sqlx::query_as::<_, Classroom>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
