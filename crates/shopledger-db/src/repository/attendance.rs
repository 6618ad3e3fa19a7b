//! # Attendance Repository
//!
//! Check-in/check-out records, one per worker per calendar day.
//!
//! ## Daily Lifecycle
//! ```text
//! check_in(worker)  ──► row created for today (check_out = NULL)
//! check_in(worker)  ──► UniqueViolation (already checked in today)
//! check_out(worker) ──► fills check_out on today's open row
//! check_out(worker) ──► NotFound (no open check-in today)
//! ```
//!
//! The one-per-day rule is enforced twice: a friendly pre-check here, and
//! the UNIQUE(worker_id, work_date) index as the real guarantee under
//! concurrent check-ins.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use shopledger_core::Attendance;

const ATTENDANCE_COLUMNS: &str =
    "id, worker_id, work_date, check_in, check_out, overtime_minutes, late_minutes";

/// Repository for attendance database operations.
#[derive(Debug, Clone)]
pub struct AttendanceRepository {
    pool: SqlitePool,
}

impl AttendanceRepository {
    /// Creates a new AttendanceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AttendanceRepository { pool }
    }

    /// Records a check-in for the worker for today (UTC).
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - already checked in today
    /// * `Err(DbError::ForeignKeyViolation)` - no such worker
    pub async fn check_in(&self, worker_id: &str, late_minutes: i64) -> DbResult<Attendance> {
        let now = Utc::now();
        let today = now.date_naive();

        debug!(worker_id = %worker_id, date = %today, "Recording check-in");

        if self.for_day(worker_id, today).await?.is_some() {
            return Err(DbError::duplicate("attendance", today.to_string()));
        }

        let record = Attendance {
            id: Uuid::new_v4().to_string(),
            worker_id: worker_id.to_string(),
            work_date: today,
            check_in: now,
            check_out: None,
            overtime_minutes: 0,
            late_minutes,
        };

        // The unique index still backstops a concurrent double check-in.
        sqlx::query(
            "INSERT INTO attendance (
                id, worker_id, work_date, check_in, check_out,
                overtime_minutes, late_minutes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&record.id)
        .bind(&record.worker_id)
        .bind(record.work_date)
        .bind(record.check_in)
        .bind(record.check_out)
        .bind(record.overtime_minutes)
        .bind(record.late_minutes)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    /// Records a check-out on today's open record.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no open check-in today
    pub async fn check_out(&self, worker_id: &str, overtime_minutes: i64) -> DbResult<()> {
        let now = Utc::now();
        let today = now.date_naive();

        debug!(worker_id = %worker_id, date = %today, "Recording check-out");

        let result = sqlx::query(
            "UPDATE attendance
             SET check_out = ?3, overtime_minutes = ?4
             WHERE worker_id = ?1 AND work_date = ?2 AND check_out IS NULL",
        )
        .bind(worker_id)
        .bind(today)
        .bind(now)
        .bind(overtime_minutes)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Open check-in", worker_id));
        }

        Ok(())
    }

    /// Gets the worker's attendance record for a specific day, if any.
    pub async fn for_day(&self, worker_id: &str, day: NaiveDate) -> DbResult<Option<Attendance>> {
        let record = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance \
             WHERE worker_id = ?1 AND work_date = ?2"
        ))
        .bind(worker_id)
        .bind(day)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Gets the worker's record for today (UTC), if any.
    pub async fn today(&self, worker_id: &str) -> DbResult<Option<Attendance>> {
        self.for_day(worker_id, Utc::now().date_naive()).await
    }

    /// Lists a worker's records in a date range (inclusive), oldest first.
    /// Used for monthly attendance sheets.
    pub async fn list_range(
        &self,
        worker_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<Vec<Attendance>> {
        let records = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance \
             WHERE worker_id = ?1 AND work_date >= ?2 AND work_date <= ?3 \
             ORDER BY work_date"
        ))
        .bind(worker_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Lists everyone's records for one day (the daily attendance board).
    pub async fn list_for_day(&self, day: NaiveDate) -> DbResult<Vec<Attendance>> {
        let records = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance \
             WHERE work_date = ?1 ORDER BY check_in"
        ))
        .bind(day)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
