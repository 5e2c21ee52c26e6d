//! Add command for enrolling a student in a discipline.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use gm_core::{DisciplineDraft, WorkloadTier, plan_enrollment};

use super::util::{student_id, summarize};
use crate::Config;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Student the discipline belongs to.
    #[arg(long)]
    pub student: String,

    /// Discipline name (3 to 100 characters).
    #[arg(long)]
    pub name: String,

    /// Course code, three letters and four digits (e.g. IMD0030).
    #[arg(long)]
    pub code: String,

    /// Schedule code, e.g. "246N12".
    #[arg(long)]
    pub schedule: String,

    /// Room or building.
    #[arg(long)]
    pub location: Option<String>,

    /// Workload tier (H30, H45, H60, H75, H90, H120). Inferred when omitted.
    #[arg(long)]
    pub workload: Option<WorkloadTier>,
}

impl AddArgs {
    fn draft(&self) -> DisciplineDraft {
        DisciplineDraft {
            name: self.name.clone(),
            code: self.code.clone(),
            schedule_code: self.schedule.clone(),
            location: self.location.clone(),
            workload: self.workload,
        }
    }
}

pub fn run<W: Write>(writer: &mut W, args: &AddArgs, config: &Config) -> Result<()> {
    let student = student_id(&args.student)?;
    let mut db = config.open_database()?;

    let existing = db.active_disciplines_except(&student, None)?;
    let plan = plan_enrollment(&args.draft(), &existing, config.conflict_policy)
        .with_context(|| format!("cannot add {}", args.code.trim()))?;
    if plan.workload_inferred {
        tracing::info!(workload = %plan.workload, schedule = %plan.schedule, "inferred workload");
    }

    let record = db.insert_discipline(&student, &plan)?;
    writeln!(writer, "Added {}", summarize(&record))?;
    Ok(())
}
