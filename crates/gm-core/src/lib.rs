//! Core domain logic for tracking a student's disciplines.
//!
//! This crate contains:
//! - Schedule codes: parsing, validation, slot expansion, conflict detection,
//!   and workload inference
//! - Enrollment planning: checking a candidate discipline against the ones a
//!   student already attends
//! - Tasks: validated assignments, exams and grades attached to a discipline
//! - Validated field types for discipline and task records

pub mod discipline;
pub mod schedule;
pub mod task;
pub mod types;

pub use discipline::{
    BatchReport, DisciplineDraft, EnrollmentError, EnrollmentPlan, ValidatedDraft,
    plan_enrollment, plan_validated, validate_batch,
};
pub use schedule::{
    ConflictPolicy, ScheduleCode, ScheduleConflict, ScheduleError, ScheduleInfo, Scheduled,
    WorkloadTier, has_conflict, infer_workload, is_valid, parse,
};
pub use task::{
    TaskDraft, TaskError, TaskPlan, TaskPriority, TaskStatus, TaskType, parse_due_date, plan_task,
};
pub use types::{CourseCode, DisciplineName, StudentId, TaskTitle, ValidationError};
