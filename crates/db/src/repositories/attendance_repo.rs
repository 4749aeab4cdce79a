//! Repository for the `attendance_records` table.
//!
//! Besides sheet inserts and status corrections, this is where attendance
//! tallies are computed: per single student+subject+year scope, per class,
//! and as raw scope rows for callers that index many scopes at once.

use edurank_core::attendance::{AttendanceStatus, AttendanceTally, STATUS_PRESENT};
use edurank_core::types::DbId;
use sqlx::PgPool;

use crate::models::attendance::{
    AttendanceRecord, AttendanceScopeRow, CreateAttendanceRecord, StudentAttendanceCount,
};

/// Column list for `attendance_records` queries.
const COLUMNS: &str = "\
    id, student_id, subject_id, class_id, status, date, period_start, period_end, \
    academic_year, marked_by, created_at, updated_at";

/// Provides inserts, status edits and tally queries for attendance records.
pub struct AttendanceRepo;

impl AttendanceRepo {
    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert a whole attendance sheet with one multi-row statement.
    pub async fn create_batch(
        pool: &PgPool,
        records: &[CreateAttendanceRecord],
    ) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
        if records.is_empty() {
            return Ok(vec![]);
        }

        let student_ids: Vec<DbId> = records.iter().map(|r| r.student_id).collect();
        let subject_ids: Vec<DbId> = records.iter().map(|r| r.subject_id).collect();
        let class_ids: Vec<DbId> = records.iter().map(|r| r.class_id).collect();
        let statuses: Vec<String> = records
            .iter()
            .map(|r| r.status.as_str().to_string())
            .collect();
        let dates: Vec<chrono::NaiveDate> = records.iter().map(|r| r.date).collect();
        let starts: Vec<String> = records.iter().map(|r| r.period_start.clone()).collect();
        let ends: Vec<String> = records.iter().map(|r| r.period_end.clone()).collect();
        let years: Vec<String> = records.iter().map(|r| r.academic_year.clone()).collect();
        let markers: Vec<DbId> = records.iter().map(|r| r.marked_by).collect();

        let query = format!(
            "INSERT INTO attendance_records \
                (student_id, subject_id, class_id, status, date, period_start, period_end, \
                 academic_year, marked_by) \
             SELECT * FROM UNNEST($1::bigint[], $2::bigint[], $3::bigint[], $4::text[], \
                                  $5::date[], $6::text[], $7::text[], $8::text[], $9::bigint[]) \
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(&student_ids)
            .bind(&subject_ids)
            .bind(&class_ids)
            .bind(&statuses)
            .bind(&dates)
            .bind(&starts)
            .bind(&ends)
            .bind(&years)
            .bind(&markers)
            .fetch_all(pool)
            .await?;
        tracing::debug!(inserted = created.len(), "Attendance sheet inserted");
        Ok(created)
    }

    /// Change the status of one record. Returns `None` if it does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: AttendanceStatus,
    ) -> Result<Option<AttendanceRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE attendance_records SET status = $2, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Apply many status corrections in one statement.
    ///
    /// Returns the number of rows updated.
    pub async fn bulk_update_status(
        pool: &PgPool,
        updates: &[(DbId, AttendanceStatus)],
    ) -> Result<u64, sqlx::Error> {
        if updates.is_empty() {
            return Ok(0);
        }

        let ids: Vec<DbId> = updates.iter().map(|(id, _)| *id).collect();
        let statuses: Vec<String> = updates
            .iter()
            .map(|(_, s)| s.as_str().to_string())
            .collect();

        let mut tx = pool.begin().await?;
        let result = sqlx::query(
            "UPDATE attendance_records AS a \
             SET status = u.status, updated_at = now() \
             FROM UNNEST($1::bigint[], $2::text[]) AS u(id, status) \
             WHERE a.id = u.id",
        )
        .bind(&ids)
        .bind(&statuses)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::debug!(
            requested = updates.len(),
            updated = result.rows_affected(),
            "Attendance statuses updated",
        );
        Ok(result.rows_affected())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AttendanceRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attendance_records WHERE id = $1");
        sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The subset of `ids` that exist.
    pub async fn find_existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM attendance_records WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Total and present counts for exactly one student+subject+year.
    pub async fn tally_for_scope(
        pool: &PgPool,
        student_id: DbId,
        subject_id: DbId,
        academic_year: &str,
    ) -> Result<AttendanceTally, sqlx::Error> {
        let (total, present) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE status = $4) \
             FROM attendance_records \
             WHERE student_id = $1 AND subject_id = $2 AND academic_year = $3",
        )
        .bind(student_id)
        .bind(subject_id)
        .bind(academic_year)
        .bind(STATUS_PRESENT)
        .fetch_one(pool)
        .await?;
        Ok(AttendanceTally::new(total, present))
    }

    /// Per-student counts for every student enrolled in a class.
    ///
    /// Records are matched by student (not by the class stamped on the
    /// record), optionally narrowed to one subject and one academic year.
    /// Students without matching records appear with zero counts.
    pub async fn class_counts(
        pool: &PgPool,
        class_id: DbId,
        subject_id: Option<DbId>,
        academic_year: Option<&str>,
    ) -> Result<Vec<StudentAttendanceCount>, sqlx::Error> {
        sqlx::query_as::<_, StudentAttendanceCount>(
            "SELECT s.id AS student_id, \
                    COUNT(a.id) AS total_records, \
                    COUNT(a.id) FILTER (WHERE a.status = $4) AS present_records \
             FROM students s \
             LEFT JOIN attendance_records a \
                ON a.student_id = s.id \
               AND ($2::BIGINT IS NULL OR a.subject_id = $2) \
               AND ($3::TEXT IS NULL OR a.academic_year = $3) \
             WHERE s.class_id = $1 \
             GROUP BY s.id \
             ORDER BY s.id",
        )
        .bind(class_id)
        .bind(subject_id)
        .bind(academic_year)
        .bind(STATUS_PRESENT)
        .fetch_all(pool)
        .await
    }

    /// Raw scope rows for every record of the given students and subjects,
    /// fetched in one query so the caller can index them in memory.
    pub async fn list_scope_rows(
        pool: &PgPool,
        student_ids: &[DbId],
        subject_ids: &[DbId],
    ) -> Result<Vec<AttendanceScopeRow>, sqlx::Error> {
        sqlx::query_as::<_, AttendanceScopeRow>(
            "SELECT student_id, subject_id, academic_year, status \
             FROM attendance_records \
             WHERE student_id = ANY($1) AND subject_id = ANY($2)",
        )
        .bind(student_ids)
        .bind(subject_ids)
        .fetch_all(pool)
        .await
    }
}
