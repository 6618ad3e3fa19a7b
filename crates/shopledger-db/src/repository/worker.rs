//! # Worker Repository
//!
//! Database operations for workers (staff registry).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use shopledger_core::Worker;

const WORKER_COLUMNS: &str = "id, name, username, department, salary_paise, shift_start, \
     shift_end, created_at, updated_at";

/// Repository for worker database operations.
#[derive(Debug, Clone)]
pub struct WorkerRepository {
    pool: SqlitePool,
}

impl WorkerRepository {
    /// Creates a new WorkerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        WorkerRepository { pool }
    }

    /// Gets a worker by their ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Worker>> {
        let worker = sqlx::query_as::<_, Worker>(&format!(
            "SELECT {WORKER_COLUMNS} FROM workers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(worker)
    }

    /// Gets a worker by their unique username.
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<Worker>> {
        let worker = sqlx::query_as::<_, Worker>(&format!(
            "SELECT {WORKER_COLUMNS} FROM workers WHERE username = ?1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(worker)
    }

    /// Lists all workers sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Worker>> {
        let workers = sqlx::query_as::<_, Worker>(&format!(
            "SELECT {WORKER_COLUMNS} FROM workers ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(workers)
    }

    /// Inserts a new worker.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - username already taken
    pub async fn insert(&self, worker: &Worker) -> DbResult<()> {
        debug!(username = %worker.username, "Inserting worker");

        sqlx::query(
            "INSERT INTO workers (
                id, name, username, department, salary_paise,
                shift_start, shift_end, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&worker.id)
        .bind(&worker.name)
        .bind(&worker.username)
        .bind(&worker.department)
        .bind(worker.salary_paise)
        .bind(&worker.shift_start)
        .bind(&worker.shift_end)
        .bind(worker.created_at)
        .bind(worker.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a worker's profile.
    pub async fn update(&self, worker: &Worker) -> DbResult<()> {
        debug!(id = %worker.id, "Updating worker");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE workers SET
                name = ?2,
                username = ?3,
                department = ?4,
                salary_paise = ?5,
                shift_start = ?6,
                shift_end = ?7,
                updated_at = ?8
            WHERE id = ?1",
        )
        .bind(&worker.id)
        .bind(&worker.name)
        .bind(&worker.username)
        .bind(&worker.department)
        .bind(worker.salary_paise)
        .bind(&worker.shift_start)
        .bind(&worker.shift_end)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Worker", &worker.id));
        }

        Ok(())
    }

    /// Deletes a worker and (via ON DELETE CASCADE) their attendance
    /// records.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting worker");

        let result = sqlx::query("DELETE FROM workers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Worker", id));
        }

        Ok(())
    }
}
