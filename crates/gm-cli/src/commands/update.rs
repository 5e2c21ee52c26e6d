//! Update command for editing a stored discipline.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use gm_core::schedule::normalize;
use gm_core::{DisciplineDraft, StudentId, WorkloadTier, plan_enrollment};

use super::util::summarize;
use crate::Config;

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Discipline ID.
    pub id: i64,

    /// New discipline name.
    #[arg(long)]
    pub name: Option<String>,

    /// New course code.
    #[arg(long)]
    pub code: Option<String>,

    /// New schedule code. The workload is re-inferred unless `--workload` is also given.
    #[arg(long)]
    pub schedule: Option<String>,

    /// New room or building. Pass an empty string to clear it.
    #[arg(long)]
    pub location: Option<String>,

    /// New workload tier.
    #[arg(long)]
    pub workload: Option<WorkloadTier>,
}

pub fn run<W: Write>(writer: &mut W, args: &UpdateArgs, config: &Config) -> Result<()> {
    let mut db = config.open_database()?;
    let current = db.get_discipline(args.id)?;
    let student = StudentId::new(current.student_id.as_str())
        .with_context(|| format!("discipline {} has an invalid student id", current.id))?;

    let schedule_changed = args
        .schedule
        .as_deref()
        .is_some_and(|schedule| normalize(schedule) != normalize(&current.schedule_code));
    let workload = match args.workload {
        Some(tier) => Some(tier),
        None if schedule_changed => None,
        None => Some(current.workload),
    };
    let draft = DisciplineDraft {
        name: args.name.clone().unwrap_or_else(|| current.name.clone()),
        code: args.code.clone().unwrap_or_else(|| current.code.clone()),
        schedule_code: args
            .schedule
            .clone()
            .unwrap_or_else(|| current.schedule_code.clone()),
        location: args.location.clone().or_else(|| current.location.clone()),
        workload,
    };

    // The discipline's own current schedule must not count against it.
    let others = db.active_disciplines_except(&student, Some(current.id))?;
    let plan = plan_enrollment(&draft, &others, config.conflict_policy)
        .with_context(|| format!("cannot update discipline {}", current.id))?;

    let record = db.update_discipline(current.id, &plan)?;
    writeln!(writer, "Updated {}", summarize(&record))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use gm_core::ConflictPolicy;
    use insta::assert_snapshot;

    use crate::commands::add::{self, AddArgs};
    use crate::commands::util::test_support::config_at;

    fn add(config: &Config, code: &str, schedule: &str) {
        let args = AddArgs {
            student: "20230001".to_string(),
            name: format!("Discipline {code}"),
            code: code.to_string(),
            schedule: schedule.to_string(),
            location: None,
            workload: None,
        };
        add::run(&mut Vec::new(), &args, config).unwrap();
    }

    fn update_args(id: i64) -> UpdateArgs {
        UpdateArgs {
            id,
            name: None,
            code: None,
            schedule: None,
            location: None,
            workload: None,
        }
    }

    #[test]
    fn update_keeps_own_schedule_out_of_conflict_check() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_at(temp.path(), ConflictPolicy::FirstFound);
        add(&config, "MAT0001", "35T12");

        let mut args = update_args(1);
        args.schedule = Some("35T123".to_string());
        let mut output = Vec::new();
        run(&mut output, &args, &config).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @"Updated #1 MAT0001 Discipline MAT0001 [35T123] H60");
    }

    #[test]
    fn update_rejects_overlap_with_other_discipline() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_at(temp.path(), ConflictPolicy::FirstFound);
        add(&config, "MAT0001", "35T12");
        add(&config, "FIS0001", "24M34");

        let mut args = update_args(2);
        args.schedule = Some("5T2".to_string());
        let err = run(&mut Vec::new(), &args, &config).unwrap_err();
        assert!(format!("{err:#}").contains("conflicts with Discipline MAT0001 (35T12)"));

        let db = config.open_database().unwrap();
        assert_eq!(db.get_discipline(2).unwrap().schedule_code, "24M34");
    }

    #[test]
    fn update_keeps_workload_when_schedule_unchanged() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_at(temp.path(), ConflictPolicy::FirstFound);
        add(&config, "MAT0001", "35T12");

        let mut args = update_args(1);
        args.workload = Some(WorkloadTier::H75);
        run(&mut Vec::new(), &args, &config).unwrap();

        let mut args = update_args(1);
        args.location = Some("B-204".to_string());
        run(&mut Vec::new(), &args, &config).unwrap();

        let db = config.open_database().unwrap();
        let record = db.get_discipline(1).unwrap();
        assert_eq!(record.workload, WorkloadTier::H75);
        assert_eq!(record.location.as_deref(), Some("B-204"));
    }

    #[test]
    fn update_with_same_schedule_keeps_workload() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_at(temp.path(), ConflictPolicy::FirstFound);
        add(&config, "MAT0001", "35T12");

        let mut args = update_args(1);
        args.workload = Some(WorkloadTier::H120);
        run(&mut Vec::new(), &args, &config).unwrap();

        let mut args = update_args(1);
        args.schedule = Some(" 35t12 ".to_string());
        run(&mut Vec::new(), &args, &config).unwrap();

        let db = config.open_database().unwrap();
        assert_eq!(db.get_discipline(1).unwrap().workload, WorkloadTier::H120);
    }

    #[test]
    fn update_with_new_schedule_reinfers_workload() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_at(temp.path(), ConflictPolicy::FirstFound);
        add(&config, "MAT0001", "35T12");

        let mut args = update_args(1);
        args.workload = Some(WorkloadTier::H120);
        run(&mut Vec::new(), &args, &config).unwrap();

        let mut args = update_args(1);
        args.schedule = Some("7M12".to_string());
        run(&mut Vec::new(), &args, &config).unwrap();

        let db = config.open_database().unwrap();
        assert_eq!(db.get_discipline(1).unwrap().workload, WorkloadTier::H30);
    }

    #[test]
    fn update_missing_discipline_fails() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_at(temp.path(), ConflictPolicy::FirstFound);
        let err = run(&mut Vec::new(), &update_args(42), &config).unwrap_err();
        assert!(err.to_string().contains("discipline not found: 42"));
    }
}
