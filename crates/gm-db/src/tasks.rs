//! Task persistence.
//!
//! Tasks belong to a discipline and are listed with that discipline's name.
//! Due dates are stored as `YYYY-MM-DDTHH:MM:SS` local times; a task counts
//! as completed once its status is `DONE`.

use rusqlite::{OptionalExtension, Row, params};
use serde::Serialize;

use gm_core::task::DUE_DATE_FORMAT;
use gm_core::{StudentId, TaskPlan, TaskPriority, TaskStatus, TaskType};

use crate::{Database, DbError, now_timestamp};

/// A stored task.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: i64,
    pub discipline_id: i64,
    pub discipline_name: String,
    pub title: String,
    pub description: Option<String>,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: String,
    pub grade_weight: Option<f64>,
    pub grade_obtained: Option<f64>,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Which tasks to list.
#[derive(Debug, Clone, Copy)]
pub enum TaskScope<'a> {
    Discipline(i64),
    Student(&'a StudentId),
}

const TASK_COLUMNS: &str = "t.id, t.discipline_id, d.name, t.title, t.description, t.task_type, t.status, t.priority, t.due_date, t.grade_weight, t.grade_obtained, t.created_at, t.updated_at";

pub(crate) const TASK_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        discipline_id INTEGER NOT NULL REFERENCES disciplines(id),
        title TEXT NOT NULL,
        description TEXT,
        task_type TEXT NOT NULL,
        status TEXT NOT NULL,
        priority TEXT NOT NULL,
        due_date TEXT NOT NULL,
        grade_weight REAL,
        grade_obtained REAL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_tasks_discipline ON tasks(discipline_id);
";

impl Database {
    /// Stores a validated task under a discipline and returns the new record.
    ///
    /// The discipline must exist. Whether it may still receive tasks is decided
    /// by [`gm_core::plan_task`] before this is called.
    pub fn insert_task(
        &mut self,
        discipline_id: i64,
        plan: &TaskPlan,
    ) -> Result<TaskRecord, DbError> {
        self.get_discipline(discipline_id)?;
        let now = now_timestamp();
        self.conn.execute(
            "
            INSERT INTO tasks
            (discipline_id, title, description, task_type, status, priority, due_date,
             grade_weight, grade_obtained, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                discipline_id,
                plan.title.as_str(),
                plan.description,
                plan.task_type.as_str(),
                plan.status.as_str(),
                plan.priority.as_str(),
                plan.due_date.format(DUE_DATE_FORMAT).to_string(),
                plan.grade_weight,
                plan.grade_obtained,
                now,
                now,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, discipline_id, title = %plan.title, "task stored");
        self.get_task(id)
    }

    pub fn get_task(&self, id: i64) -> Result<TaskRecord, DbError> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {TASK_COLUMNS} FROM tasks t JOIN disciplines d ON d.id = t.discipline_id WHERE t.id = ?"
                ),
                [id],
                TaskRow::from_row,
            )
            .optional()?;
        row.ok_or(DbError::TaskNotFound(id))?.into_record()
    }

    /// Lists tasks by due date, optionally only completed or only open ones.
    ///
    /// Listing by discipline fails with [`DbError::NotFound`] when the
    /// discipline does not exist.
    pub fn list_tasks(
        &self,
        scope: TaskScope<'_>,
        completed: Option<bool>,
    ) -> Result<Vec<TaskRecord>, DbError> {
        let status_clause = match completed {
            Some(true) => " AND t.status = 'DONE'",
            Some(false) => " AND t.status <> 'DONE'",
            None => "",
        };
        let (scope_clause, key) = match scope {
            TaskScope::Discipline(id) => {
                self.get_discipline(id)?;
                ("t.discipline_id = ?", rusqlite::types::Value::Integer(id))
            }
            TaskScope::Student(student) => (
                "d.student_id = ?",
                rusqlite::types::Value::Text(student.as_str().to_string()),
            ),
        };
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks t JOIN disciplines d ON d.id = t.discipline_id
             WHERE {scope_clause}{status_clause}
             ORDER BY t.due_date ASC, t.id ASC"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([key], TaskRow::from_row)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?.into_record()?);
        }
        Ok(tasks)
    }

    /// Replaces a task's fields, possibly moving it to another discipline.
    pub fn update_task(
        &mut self,
        id: i64,
        discipline_id: i64,
        plan: &TaskPlan,
    ) -> Result<TaskRecord, DbError> {
        self.get_discipline(discipline_id)?;
        let updated = self.conn.execute(
            "
            UPDATE tasks
            SET discipline_id = ?, title = ?, description = ?, task_type = ?, status = ?,
                priority = ?, due_date = ?, grade_weight = ?, grade_obtained = ?, updated_at = ?
            WHERE id = ?
            ",
            params![
                discipline_id,
                plan.title.as_str(),
                plan.description,
                plan.task_type.as_str(),
                plan.status.as_str(),
                plan.priority.as_str(),
                plan.due_date.format(DUE_DATE_FORMAT).to_string(),
                plan.grade_weight,
                plan.grade_obtained,
                now_timestamp(),
                id,
            ],
        )?;
        if updated == 0 {
            return Err(DbError::TaskNotFound(id));
        }
        self.get_task(id)
    }

    pub fn set_task_status(&mut self, id: i64, status: TaskStatus) -> Result<TaskRecord, DbError> {
        let updated = self.conn.execute(
            "UPDATE tasks SET status = ?, updated_at = ? WHERE id = ?",
            params![status.as_str(), now_timestamp(), id],
        )?;
        if updated == 0 {
            return Err(DbError::TaskNotFound(id));
        }
        self.get_task(id)
    }

    pub fn delete_task(&mut self, id: i64) -> Result<(), DbError> {
        let deleted = self.conn.execute("DELETE FROM tasks WHERE id = ?", [id])?;
        if deleted == 0 {
            return Err(DbError::TaskNotFound(id));
        }
        tracing::debug!(id, "task deleted");
        Ok(())
    }
}

#[derive(Debug)]
struct TaskRow {
    id: i64,
    discipline_id: i64,
    discipline_name: String,
    title: String,
    description: Option<String>,
    task_type: String,
    status: String,
    priority: String,
    due_date: String,
    grade_weight: Option<f64>,
    grade_obtained: Option<f64>,
    created_at: String,
    updated_at: String,
}

impl TaskRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            discipline_id: row.get(1)?,
            discipline_name: row.get(2)?,
            title: row.get(3)?,
            description: row.get(4)?,
            task_type: row.get(5)?,
            status: row.get(6)?,
            priority: row.get(7)?,
            due_date: row.get(8)?,
            grade_weight: row.get(9)?,
            grade_obtained: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }

    fn into_record(self) -> Result<TaskRecord, DbError> {
        let id = self.id;
        let invalid = |field: &'static str, value: &str| DbError::InvalidTaskField {
            id,
            field,
            value: value.to_string(),
        };
        let task_type = self
            .task_type
            .parse::<TaskType>()
            .map_err(|_| invalid("task_type", &self.task_type))?;
        let status = self
            .status
            .parse::<TaskStatus>()
            .map_err(|_| invalid("status", &self.status))?;
        let priority = self
            .priority
            .parse::<TaskPriority>()
            .map_err(|_| invalid("priority", &self.priority))?;
        Ok(TaskRecord {
            id,
            discipline_id: self.discipline_id,
            discipline_name: self.discipline_name,
            title: self.title,
            description: self.description,
            task_type,
            status,
            priority,
            due_date: self.due_date,
            grade_weight: self.grade_weight,
            grade_obtained: self.grade_obtained,
            completed: status.is_done(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
