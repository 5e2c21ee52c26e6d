//! Enrollment planning: validating a candidate discipline against the ones a
//! student already attends.
//!
//! Nothing here touches storage. Callers pass the student's other active
//! disciplines in and persist the returned [`EnrollmentPlan`] themselves.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schedule::{
    ConflictPolicy, ScheduleCode, ScheduleConflict, ScheduleError, Scheduled, WorkloadTier,
    find_conflicts, infer_workload,
};
use crate::types::{CourseCode, DisciplineName, ValidationError};

/// A discipline as submitted, before validation.
///
/// Field names follow the JSON emitted by enrollment-document extractors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineDraft {
    pub name: String,
    pub code: String,
    pub schedule_code: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, rename = "workloadHours")]
    pub workload: Option<WorkloadTier>,
}

/// Why a draft cannot be enrolled.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnrollmentError {
    #[error(transparent)]
    Field(#[from] ValidationError),

    #[error("invalid schedule code: {0}")]
    Schedule(#[from] ScheduleError),

    /// The student already has an active discipline with this course code.
    #[error("an active discipline with code {0} already exists")]
    DuplicateCode(String),

    /// The schedule overlaps other active disciplines.
    #[error("{}", describe_conflicts(.0))]
    Conflicts(Vec<ScheduleConflict>),
}

fn describe_conflicts(conflicts: &[ScheduleConflict]) -> String {
    let details = conflicts
        .iter()
        .map(|c| c.description.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    format!("schedule conflict: {details}")
}

/// A draft that passed every check, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentPlan {
    pub name: DisciplineName,
    pub code: CourseCode,
    pub schedule: ScheduleCode,
    pub location: Option<String>,
    pub workload: WorkloadTier,
    /// True when no workload was supplied and it was inferred from the schedule.
    pub workload_inferred: bool,
}

/// The draft's own fields and schedule, without looking at other disciplines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDraft {
    pub name: DisciplineName,
    pub code: CourseCode,
    pub schedule: ScheduleCode,
}

impl DisciplineDraft {
    /// Checks name, course code, then schedule code.
    pub fn validate(&self) -> Result<ValidatedDraft, EnrollmentError> {
        let name = DisciplineName::new(self.name.as_str())?;
        let code = CourseCode::new(self.code.as_str())?;
        let schedule = ScheduleCode::parse(&self.schedule_code)?;
        Ok(ValidatedDraft {
            name,
            code,
            schedule,
        })
    }
}

/// Validates a draft and checks it against the student's other active disciplines.
///
/// `existing` must already exclude the discipline being edited, if any.
pub fn plan_enrollment<S: Scheduled>(
    draft: &DisciplineDraft,
    existing: &[S],
    policy: ConflictPolicy,
) -> Result<EnrollmentPlan, EnrollmentError> {
    let validated = draft.validate()?;
    plan_validated(draft, validated, existing, policy)
}

/// Second half of [`plan_enrollment`] for drafts validated up front, e.g. by
/// [`validate_batch`].
pub fn plan_validated<S: Scheduled>(
    draft: &DisciplineDraft,
    validated: ValidatedDraft,
    existing: &[S],
    policy: ConflictPolicy,
) -> Result<EnrollmentPlan, EnrollmentError> {
    let ValidatedDraft {
        name,
        code,
        schedule,
    } = validated;

    if existing
        .iter()
        .any(|other| other.course_code().eq_ignore_ascii_case(code.as_str()))
    {
        return Err(EnrollmentError::DuplicateCode(code.into()));
    }

    let conflicts = find_conflicts(&schedule, existing, policy);
    if !conflicts.is_empty() {
        return Err(EnrollmentError::Conflicts(conflicts));
    }

    let (workload, workload_inferred) = match draft.workload {
        Some(tier) => (tier, false),
        None => (infer_workload(schedule.as_str()), true),
    };

    let location = draft
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string);

    Ok(EnrollmentPlan {
        name,
        code,
        schedule,
        location,
        workload,
        workload_inferred,
    })
}

/// Validates every draft independently and in parallel.
///
/// Results are in input order.
pub fn validate_batch(drafts: &[DisciplineDraft]) -> Vec<Result<ValidatedDraft, EnrollmentError>> {
    drafts.par_iter().map(DisciplineDraft::validate).collect()
}

/// Outcome of a batch import: what was created and why the rest was not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport<T> {
    pub extracted_count: usize,
    pub created_count: usize,
    pub created: Vec<T>,
    pub errors: Vec<String>,
}

impl<T> BatchReport<T> {
    pub const fn new(extracted_count: usize) -> Self {
        Self {
            extracted_count,
            created_count: 0,
            created: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn push_created(&mut self, item: T) {
        self.created.push(item);
        self.created_count = self.created.len();
    }

    pub fn push_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }
}
