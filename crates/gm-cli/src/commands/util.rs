//! Shared helpers for commands that touch stored disciplines.

use anyhow::{Context, Result};

use gm_core::StudentId;
use gm_db::DisciplineRecord;

/// Parses a `--student` value.
pub fn student_id(raw: &str) -> Result<StudentId> {
    StudentId::new(raw).context("invalid student id")
}

/// One-line summary: `#3 IMD0030 Data Structures [246N12] H90 @ A-101`.
pub fn summarize(record: &DisciplineRecord) -> String {
    let mut line = format!(
        "#{} {} {} [{}] {}",
        record.id, record.code, record.name, record.schedule_code, record.workload
    );
    if let Some(location) = &record.location {
        line.push_str(" @ ");
        line.push_str(location);
    }
    line
}
