//! Repository for the `student_results` table.

use edurank_core::scores::ExamScores;
use edurank_core::types::DbId;
use sqlx::PgPool;

use crate::models::student_result::{
    BulkWriteSummary, CreateStudentResult, ResultScoreUpdate, StudentResult,
};

/// Column list for `student_results` queries.
const COLUMNS: &str = "\
    id, teacher_id, student_id, class_id, subject_id, academic_year, attendance_rate, \
    first_exam, mid_exam, third_exam, final_exam, activities, total, \
    created_by, last_updated_by, created_at, updated_at";

/// Provides inserts, score updates and scoped listings for result rows.
pub struct StudentResultRepo;

impl StudentResultRepo {
    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert a class submission with one multi-row statement.
    ///
    /// `created_by` and `last_updated_by` are both set to the submitting teacher.
    pub async fn create_batch(
        pool: &PgPool,
        rows: &[CreateStudentResult],
    ) -> Result<Vec<StudentResult>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let teacher_ids: Vec<DbId> = rows.iter().map(|r| r.teacher_id).collect();
        let student_ids: Vec<DbId> = rows.iter().map(|r| r.student_id).collect();
        let class_ids: Vec<DbId> = rows.iter().map(|r| r.class_id).collect();
        let subject_ids: Vec<DbId> = rows.iter().map(|r| r.subject_id).collect();
        let years: Vec<String> = rows.iter().map(|r| r.academic_year.clone()).collect();
        let rates: Vec<String> = rows.iter().map(|r| r.attendance_rate.clone()).collect();
        let totals: Vec<String> = rows.iter().map(|r| r.total.clone()).collect();
        let [first, mid, third, fin, act] = score_columns(rows.iter().map(|r| &r.scores));

        let query = format!(
            "INSERT INTO student_results \
                (teacher_id, student_id, class_id, subject_id, academic_year, attendance_rate, \
                 first_exam, mid_exam, third_exam, final_exam, activities, total, \
                 created_by, last_updated_by) \
             SELECT t, s, c, sub, y, rate, f1, f2, f3, f4, f5, tot, t, t \
             FROM UNNEST($1::bigint[], $2::bigint[], $3::bigint[], $4::bigint[], $5::text[], \
                         $6::text[], $7::float8[], $8::float8[], $9::float8[], $10::float8[], \
                         $11::float8[], $12::text[]) \
                  AS u(t, s, c, sub, y, rate, f1, f2, f3, f4, f5, tot) \
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, StudentResult>(&query)
            .bind(&teacher_ids)
            .bind(&student_ids)
            .bind(&class_ids)
            .bind(&subject_ids)
            .bind(&years)
            .bind(&rates)
            .bind(&first)
            .bind(&mid)
            .bind(&third)
            .bind(&fin)
            .bind(&act)
            .bind(&totals)
            .fetch_all(pool)
            .await?;
        tracing::debug!(inserted = created.len(), "Result rows inserted");
        Ok(created)
    }

    /// Overwrite the scores, total and attendance snapshot of one row.
    ///
    /// Returns `None` if no row with the given ID exists.
    pub async fn update_scores(
        pool: &PgPool,
        update: &ResultScoreUpdate,
    ) -> Result<Option<StudentResult>, sqlx::Error> {
        let query = format!(
            "UPDATE student_results SET \
                 first_exam = $2, mid_exam = $3, third_exam = $4, final_exam = $5, \
                 activities = $6, attendance_rate = $7, total = $8, \
                 last_updated_by = $9, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StudentResult>(&query)
            .bind(update.result_id)
            .bind(update.scores.first_exam)
            .bind(update.scores.mid_exam)
            .bind(update.scores.third_exam)
            .bind(update.scores.final_exam)
            .bind(update.scores.activities)
            .bind(&update.attendance_rate)
            .bind(&update.total)
            .bind(update.updated_by)
            .fetch_optional(pool)
            .await
    }

    /// Apply many score updates with a single statement inside a transaction.
    ///
    /// Rows whose stored values already equal the update are matched but not
    /// modified, mirroring a document store's bulk-write summary.
    pub async fn bulk_update(
        pool: &PgPool,
        updates: &[ResultScoreUpdate],
    ) -> Result<BulkWriteSummary, sqlx::Error> {
        if updates.is_empty() {
            return Ok(BulkWriteSummary::default());
        }

        let ids: Vec<DbId> = updates.iter().map(|u| u.result_id).collect();
        let updaters: Vec<DbId> = updates.iter().map(|u| u.updated_by).collect();
        let rates: Vec<String> = updates.iter().map(|u| u.attendance_rate.clone()).collect();
        let totals: Vec<String> = updates.iter().map(|u| u.total.clone()).collect();
        let [first, mid, third, fin, act] = score_columns(updates.iter().map(|u| &u.scores));

        let mut tx = pool.begin().await?;
        let summary = sqlx::query_as::<_, BulkWriteSummary>(
            "WITH input AS ( \
                 SELECT * FROM UNNEST($1::bigint[], $2::bigint[], $3::float8[], $4::float8[], \
                                      $5::float8[], $6::float8[], $7::float8[], $8::text[], \
                                      $9::text[]) \
                     AS u(id, updated_by, first_exam, mid_exam, third_exam, final_exam, \
                          activities, attendance_rate, total) \
             ), updated AS ( \
                 UPDATE student_results AS r SET \
                     first_exam = u.first_exam, mid_exam = u.mid_exam, \
                     third_exam = u.third_exam, final_exam = u.final_exam, \
                     activities = u.activities, attendance_rate = u.attendance_rate, \
                     total = u.total, last_updated_by = u.updated_by, updated_at = now() \
                 FROM input AS u \
                 WHERE r.id = u.id \
                   AND (r.first_exam, r.mid_exam, r.third_exam, r.final_exam, r.activities, \
                        r.attendance_rate, r.total, r.last_updated_by) \
                       IS DISTINCT FROM \
                       (u.first_exam, u.mid_exam, u.third_exam, u.final_exam, u.activities, \
                        u.attendance_rate, u.total, u.updated_by) \
                 RETURNING r.id \
             ) \
             SELECT \
                 (SELECT COUNT(*) FROM student_results r JOIN input u ON r.id = u.id) \
                     AS matched_count, \
                 (SELECT COUNT(*) FROM updated) AS modified_count",
        )
        .bind(&ids)
        .bind(&updaters)
        .bind(&first)
        .bind(&mid)
        .bind(&third)
        .bind(&fin)
        .bind(&act)
        .bind(&rates)
        .bind(&totals)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::debug!(
            matched = summary.matched_count,
            modified = summary.modified_count,
            "Bulk result update applied",
        );
        Ok(summary)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<StudentResult>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM student_results WHERE id = $1");
        sqlx::query_as::<_, StudentResult>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All rows whose id is in `ids`, ordered by id.
    pub async fn find_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<StudentResult>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM student_results WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, StudentResult>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Every row for a class and academic year, oldest first.
    pub async fn list_for_class_year(
        pool: &PgPool,
        class_id: DbId,
        academic_year: &str,
    ) -> Result<Vec<StudentResult>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM student_results \
             WHERE class_id = $1 AND academic_year = $2 \
             ORDER BY id"
        );
        sqlx::query_as::<_, StudentResult>(&query)
            .bind(class_id)
            .bind(academic_year)
            .fetch_all(pool)
            .await
    }

    /// Every row for a class+subject+year submission scope.
    pub async fn list_for_scope(
        pool: &PgPool,
        class_id: DbId,
        subject_id: DbId,
        academic_year: &str,
    ) -> Result<Vec<StudentResult>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM student_results \
             WHERE class_id = $1 AND subject_id = $2 AND academic_year = $3 \
             ORDER BY student_id, id"
        );
        sqlx::query_as::<_, StudentResult>(&query)
            .bind(class_id)
            .bind(subject_id)
            .bind(academic_year)
            .fetch_all(pool)
            .await
    }

    /// A student's rows, optionally restricted to one academic year.
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: DbId,
        academic_year: Option<&str>,
    ) -> Result<Vec<StudentResult>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM student_results \
             WHERE student_id = $1 AND ($2::TEXT IS NULL OR academic_year = $2) \
             ORDER BY academic_year DESC, subject_id, id"
        );
        sqlx::query_as::<_, StudentResult>(&query)
            .bind(student_id)
            .bind(academic_year)
            .fetch_all(pool)
            .await
    }

    /// Distinct academic years with at least one result row, unordered.
    pub async fn distinct_academic_years(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT DISTINCT academic_year FROM student_results")
            .fetch_all(pool)
            .await
    }
}

/// Split score structs into the five per-column arrays bound to `UNNEST`.
fn score_columns<'a>(scores: impl Iterator<Item = &'a ExamScores>) -> [Vec<f64>; 5] {
    let mut columns: [Vec<f64>; 5] = Default::default();
    for s in scores {
        columns[0].push(s.first_exam);
        columns[1].push(s.mid_exam);
        columns[2].push(s.third_exam);
        columns[3].push(s.final_exam);
        columns[4].push(s.activities);
    }
    columns
}
