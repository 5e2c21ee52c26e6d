//! Storage layer for disciplines and their tasks.
//!
//! Provides persistence for a student's disciplines using `rusqlite`, and
//! supplies the active schedules that new or edited disciplines are checked
//! against. Tasks live in [`tasks`].
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization.
//!
//! # Schema
//!
//! Timestamps are stored as TEXT in RFC 3339 UTC with millisecond precision
//! (e.g., `2024-01-15T10:30:00.000Z`). Schedule codes are stored exactly as
//! supplied; they are re-parsed whenever they are compared, so a code that
//! stops parsing under a stricter grammar degrades to "no conflict" instead
//! of breaking reads. Workload tiers are stored by name (`H60`).

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;
use thiserror::Error;

use gm_core::{EnrollmentPlan, Scheduled, StudentId, WorkloadTier};

pub mod tasks;

pub use tasks::{TaskRecord, TaskScope};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// No discipline with this ID exists.
    #[error("discipline not found: {0}")]
    NotFound(i64),
    /// A stored workload value names no known tier.
    #[error("invalid workload for discipline {id}: {value}")]
    InvalidWorkload { id: i64, value: String },
    /// Absence hours must be positive.
    #[error("invalid absence hours: {0}")]
    InvalidAbsenceHours(i64),
    /// No task with this ID exists.
    #[error("task not found: {0}")]
    TaskNotFound(i64),
    /// A stored task enum column holds an unknown value.
    #[error("invalid {field} for task {id}: {value}")]
    InvalidTaskField {
        id: i64,
        field: &'static str,
        value: String,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A stored discipline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineRecord {
    pub id: i64,
    pub student_id: String,
    pub name: String,
    pub code: String,
    pub schedule_code: String,
    pub location: Option<String>,
    #[serde(rename = "workloadHours")]
    pub workload: WorkloadTier,
    pub absences_hours: i64,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Scheduled for DisciplineRecord {
    fn label(&self) -> &str {
        &self.name
    }

    fn course_code(&self) -> &str {
        &self.code
    }

    fn schedule_code(&self) -> &str {
        &self.schedule_code
    }
}

const DISCIPLINE_COLUMNS: &str = "id, student_id, name, code, schedule_code, location, workload, absences_hours, active, created_at, updated_at";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS disciplines (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                student_id TEXT NOT NULL,
                name TEXT NOT NULL,
                code TEXT NOT NULL,
                schedule_code TEXT NOT NULL,
                location TEXT,
                workload TEXT NOT NULL,
                absences_hours INTEGER NOT NULL DEFAULT 0,
                active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_disciplines_student ON disciplines(student_id);
            CREATE INDEX IF NOT EXISTS idx_disciplines_student_active ON disciplines(student_id, active);
            ",
        )?;
        self.conn.execute_batch(tasks::TASK_SCHEMA)?;
        Ok(())
    }

    /// Stores a validated discipline for a student and returns the new record.
    pub fn insert_discipline(
        &mut self,
        student: &StudentId,
        plan: &EnrollmentPlan,
    ) -> Result<DisciplineRecord, DbError> {
        let now = now_timestamp();
        self.conn.execute(
            "
            INSERT INTO disciplines
            (student_id, name, code, schedule_code, location, workload, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                student.as_str(),
                plan.name.as_str(),
                plan.code.as_str(),
                plan.schedule.as_str(),
                plan.location,
                plan.workload.as_str(),
                now,
                now,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, student = %student, code = %plan.code, "discipline stored");
        self.get_discipline(id)
    }

    /// Fetches one discipline by ID.
    pub fn get_discipline(&self, id: i64) -> Result<DisciplineRecord, DbError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {DISCIPLINE_COLUMNS} FROM disciplines WHERE id = ?"),
                [id],
                DisciplineRow::from_row,
            )
            .optional()?;
        row.ok_or(DbError::NotFound(id))?.into_record()
    }

    /// Lists a student's disciplines ordered by ID.
    pub fn list_disciplines(
        &self,
        student: &StudentId,
        active_only: bool,
    ) -> Result<Vec<DisciplineRecord>, DbError> {
        let sql = if active_only {
            format!(
                "SELECT {DISCIPLINE_COLUMNS} FROM disciplines WHERE student_id = ? AND active = 1 ORDER BY id ASC"
            )
        } else {
            format!("SELECT {DISCIPLINE_COLUMNS} FROM disciplines WHERE student_id = ? ORDER BY id ASC")
        };
        self.query_disciplines(&sql, params![student.as_str()])
    }

    /// A student's active disciplines, optionally leaving one out.
    ///
    /// This is what a candidate schedule is checked against: when editing a
    /// discipline, its own current schedule must not count as a conflict.
    pub fn active_disciplines_except(
        &self,
        student: &StudentId,
        exclude_id: Option<i64>,
    ) -> Result<Vec<DisciplineRecord>, DbError> {
        let sql = format!(
            "SELECT {DISCIPLINE_COLUMNS} FROM disciplines
             WHERE student_id = ? AND active = 1 AND (? IS NULL OR id <> ?)
             ORDER BY id ASC"
        );
        self.query_disciplines(&sql, params![student.as_str(), exclude_id, exclude_id])
    }

    /// Replaces a discipline's fields with a newly validated plan.
    pub fn update_discipline(
        &mut self,
        id: i64,
        plan: &EnrollmentPlan,
    ) -> Result<DisciplineRecord, DbError> {
        let updated = self.conn.execute(
            "
            UPDATE disciplines
            SET name = ?, code = ?, schedule_code = ?, location = ?, workload = ?, updated_at = ?
            WHERE id = ?
            ",
            params![
                plan.name.as_str(),
                plan.code.as_str(),
                plan.schedule.as_str(),
                plan.location,
                plan.workload.as_str(),
                now_timestamp(),
                id,
            ],
        )?;
        if updated == 0 {
            return Err(DbError::NotFound(id));
        }
        self.get_discipline(id)
    }

    /// Marks a discipline inactive. Inactive disciplines never cause conflicts.
    pub fn deactivate_discipline(&mut self, id: i64) -> Result<DisciplineRecord, DbError> {
        let updated = self.conn.execute(
            "UPDATE disciplines SET active = 0, updated_at = ? WHERE id = ?",
            params![now_timestamp(), id],
        )?;
        if updated == 0 {
            return Err(DbError::NotFound(id));
        }
        self.get_discipline(id)
    }

    /// Adds missed class hours to a discipline.
    pub fn record_absence(&mut self, id: i64, hours: i64) -> Result<DisciplineRecord, DbError> {
        if hours <= 0 {
            return Err(DbError::InvalidAbsenceHours(hours));
        }
        let updated = self.conn.execute(
            "UPDATE disciplines SET absences_hours = absences_hours + ?, updated_at = ? WHERE id = ?",
            params![hours, now_timestamp(), id],
        )?;
        if updated == 0 {
            return Err(DbError::NotFound(id));
        }
        self.get_discipline(id)
    }

    fn query_disciplines(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<DisciplineRecord>, DbError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, DisciplineRow::from_row)?;
        let mut disciplines = Vec::new();
        for row in rows {
            disciplines.push(row?.into_record()?);
        }
        Ok(disciplines)
    }
}

#[derive(Debug)]
struct DisciplineRow {
    id: i64,
    student_id: String,
    name: String,
    code: String,
    schedule_code: String,
    location: Option<String>,
    workload: String,
    absences_hours: i64,
    active: bool,
    created_at: String,
    updated_at: String,
}

impl DisciplineRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            student_id: row.get(1)?,
            name: row.get(2)?,
            code: row.get(3)?,
            schedule_code: row.get(4)?,
            location: row.get(5)?,
            workload: row.get(6)?,
            absences_hours: row.get(7)?,
            active: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }

    fn into_record(self) -> Result<DisciplineRecord, DbError> {
        let workload = self
            .workload
            .parse::<WorkloadTier>()
            .map_err(|_| DbError::InvalidWorkload {
                id: self.id,
                value: self.workload.clone(),
            })?;
        Ok(DisciplineRecord {
            id: self.id,
            student_id: self.student_id,
            name: self.name,
            code: self.code,
            schedule_code: self.schedule_code,
            location: self.location,
            workload,
            absences_hours: self.absences_hours,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
