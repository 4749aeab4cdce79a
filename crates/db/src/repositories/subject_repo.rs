//! Repository for the `subjects` table.

use edurank_core::types::DbId;
use sqlx::PgPool;

use crate::models::subject::{CreateSubject, Subject};

const COLUMNS: &str = "id, name, created_at, updated_at";

pub struct SubjectRepo;

impl SubjectRepo {
    pub async fn create(pool: &PgPool, input: &CreateSubject) -> Result<Subject, sqlx::Error> {
        let query = format!("INSERT INTO subjects (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Subject>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Subject>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subjects WHERE id = $1");
        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
