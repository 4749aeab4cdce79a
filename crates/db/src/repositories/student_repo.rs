//! Repository for the `students` table.

use edurank_core::types::DbId;
use sqlx::PgPool;

use crate::models::student::{CreateStudent, Student};

const COLUMNS: &str = "id, name, class_id, created_at, updated_at";

pub struct StudentRepo;

impl StudentRepo {
    pub async fn create(pool: &PgPool, input: &CreateStudent) -> Result<Student, sqlx::Error> {
        let query =
            format!("INSERT INTO students (name, class_id) VALUES ($1, $2) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Student>(&query)
            .bind(&input.name)
            .bind(input.class_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Student>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE id = $1");
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All students enrolled in a class, ordered by id.
    pub async fn list_by_class(pool: &PgPool, class_id: DbId) -> Result<Vec<Student>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE class_id = $1 ORDER BY id");
        sqlx::query_as::<_, Student>(&query)
            .bind(class_id)
            .fetch_all(pool)
            .await
    }
}
