//! Tasks attached to a discipline: exams, assignments and the like.
//!
//! As with enrollment, nothing here touches storage. The caller looks up the
//! owning discipline and passes in whether it is still active.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{TaskTitle, ValidationError, validate_grade};

/// Storage and display format for due dates.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Generates a closed task enum stored by its upper-case name.
macro_rules! define_task_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $error:ident, $what:literal,
        { $($(#[$variant_meta:meta])* $variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($(#[$variant_meta])* $variant),+
        }

        impl $name {
            pub const ALL: &[Self] = &[$(Self::$variant),+];

            /// String representation for database storage.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        #[derive(Debug, Clone, PartialEq, Eq, Error)]
        #[error("unknown {}: {}", $what, .0)]
        pub struct $error(pub String);

        impl FromStr for $name {
            type Err = $error;

            /// Case-insensitive; `-` and `_` are interchangeable.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().replace('-', "_");
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(&wanted))
                    .ok_or_else(|| $error(s.to_string()))
            }
        }
    };
}

define_task_enum!(
    /// What kind of work a task is.
    TaskType, UnknownTaskType, "task type",
    {
        Exam => "EXAM",
        Assignment => "ASSIGNMENT",
        Project => "PROJECT",
        Presentation => "PRESENTATION",
        Reading => "READING",
        Other => "OTHER",
    }
);

define_task_enum!(
    /// Progress of a task. A task counts as completed once it is `Done`.
    #[derive(Default)]
    TaskStatus, UnknownTaskStatus, "task status",
    {
        #[default]
        Todo => "TODO",
        InProgress => "IN_PROGRESS",
        Done => "DONE",
    }
);

define_task_enum!(
    #[derive(Default)]
    TaskPriority, UnknownTaskPriority, "task priority",
    {
        Low => "LOW",
        #[default]
        Medium => "MEDIUM",
        High => "HIGH",
    }
);

impl TaskStatus {
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Why a task cannot be stored.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error(transparent)]
    Field(#[from] ValidationError),

    #[error("invalid due date {0:?} (expected YYYY-MM-DD or YYYY-MM-DDTHH:MM)")]
    InvalidDueDate(String),

    /// New tasks must be due after the moment they are created.
    #[error("due date {} must be in the future", .0.format(DUE_DATE_FORMAT))]
    DueDateNotInFuture(NaiveDateTime),

    #[error("cannot add a task to an inactive discipline")]
    InactiveDiscipline,
}

/// Parses `YYYY-MM-DD` (end of that day), `YYYY-MM-DDTHH:MM[:SS]` or the
/// same with a space instead of `T`.
pub fn parse_due_date(raw: &str) -> Result<NaiveDateTime, TaskError> {
    let trimmed = raw.trim();
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| NaiveTime::from_hms_opt(23, 59, 0).map(|end| date.and_time(end)))
        .ok_or_else(|| TaskError::InvalidDueDate(raw.to_string()))
}

/// A task as submitted, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub task_type: TaskType,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    pub due_date: String,
    #[serde(default)]
    pub grade_weight: Option<f64>,
    #[serde(default)]
    pub grade_obtained: Option<f64>,
}

/// A task that passed validation, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskPlan {
    pub title: TaskTitle,
    pub description: Option<String>,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: NaiveDateTime,
    pub grade_weight: Option<f64>,
    pub grade_obtained: Option<f64>,
}

impl TaskDraft {
    /// Checks the draft's own fields. Missing status and priority fall back
    /// to `TODO` and `MEDIUM`.
    pub fn validate(&self) -> Result<TaskPlan, TaskError> {
        let title = TaskTitle::new(self.title.as_str())?;
        let due_date = parse_due_date(&self.due_date)?;
        let grade_weight = self
            .grade_weight
            .map(|w| validate_grade("grade weight", w))
            .transpose()?;
        let grade_obtained = self
            .grade_obtained
            .map(|g| validate_grade("grade obtained", g))
            .transpose()?;
        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(TaskPlan {
            title,
            description,
            task_type: self.task_type,
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            due_date,
            grade_weight,
            grade_obtained,
        })
    }
}

/// Validates a new task for a discipline.
///
/// Field errors come first, then the due date must lie after `now`, then the
/// discipline must still be active.
pub fn plan_task(
    draft: &TaskDraft,
    discipline_active: bool,
    now: NaiveDateTime,
) -> Result<TaskPlan, TaskError> {
    let plan = draft.validate()?;
    if plan.due_date <= now {
        return Err(TaskError::DueDateNotInFuture(plan.due_date));
    }
    if !discipline_active {
        return Err(TaskError::InactiveDiscipline);
    }
    Ok(plan)
}
