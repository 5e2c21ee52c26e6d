//! List command for showing a student's disciplines.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use clap::Args;

use gm_db::DisciplineRecord;

use super::util::student_id;
use crate::Config;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Student whose disciplines to list.
    #[arg(long)]
    pub student: String,

    /// Include dropped disciplines.
    #[arg(long)]
    pub all: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(writer: &mut W, args: &ListArgs, config: &Config) -> Result<()> {
    let student = student_id(&args.student)?;
    let db = config.open_database()?;
    let records = db.list_disciplines(&student, !args.all)?;

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&records)?)?;
    } else {
        write!(writer, "{}", format_disciplines(&records))?;
    }
    Ok(())
}

/// Format disciplines for human-readable output.
pub fn format_disciplines(records: &[DisciplineRecord]) -> String {
    let mut output = String::new();

    if records.is_empty() {
        writeln!(output, "No disciplines.").unwrap();
        return output;
    }

    writeln!(
        output,
        "{:>4}  {:<7}  {:<24}  {:<12}  {:<4}  {:>8}  Location",
        "ID", "Code", "Name", "Schedule", "Load", "Absences"
    )
    .unwrap();
    writeln!(
        output,
        "────  ───────  ────────────────────────  ────────────  ────  ────────  ────────"
    )
    .unwrap();

    for record in records {
        let name = if record.name.chars().count() > 24 {
            format!("{}...", record.name.chars().take(21).collect::<String>())
        } else {
            record.name.clone()
        };
        let mut location = record.location.clone().unwrap_or_default();
        if !record.active {
            location.push_str(" (dropped)");
        }
        writeln!(
            output,
            "{:>4}  {:<7}  {:<24}  {:<12}  {:<4}  {:>7}h  {}",
            record.id,
            record.code,
            name,
            record.schedule_code,
            record.workload,
            record.absences_hours,
            location.trim_start()
        )
        .unwrap();
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    use gm_core::ConflictPolicy;
    use insta::assert_snapshot;

    use crate::commands::add::{self, AddArgs};
    use crate::commands::drop::{self, DropArgs};
    use crate::commands::util::test_support::config_at;

    fn seed(config: &Config) {
        for (code, name, schedule, location) in [
            ("MAT0001", "Calculus I", "35T12", Some("A-101")),
            ("IMD0030", "Introduction to Software Engineering Practice", "246N12", None),
        ] {
            let args = AddArgs {
                student: "20230001".to_string(),
                name: name.to_string(),
                code: code.to_string(),
                schedule: schedule.to_string(),
                location: location.map(str::to_string),
                workload: None,
            };
            add::run(&mut Vec::new(), &args, config).unwrap();
        }
        drop::run(&mut Vec::new(), &DropArgs { id: 2 }, config).unwrap();
    }

    fn list(config: &Config, all: bool, json: bool) -> String {
        let args = ListArgs {
            student: "20230001".to_string(),
            all,
            json,
        };
        let mut output = Vec::new();
        run(&mut output, &args, config).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn list_shows_active_only_by_default() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_at(temp.path(), ConflictPolicy::FirstFound);
        seed(&config);

        assert_snapshot!(list(&config, false, false), @r"
          ID  Code     Name                      Schedule      Load  Absences  Location
        ────  ───────  ────────────────────────  ────────────  ────  ────────  ────────
           1  MAT0001  Calculus I                35T12         H60         0h  A-101
        ");
    }

    #[test]
    fn list_all_marks_dropped() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_at(temp.path(), ConflictPolicy::FirstFound);
        seed(&config);

        let output = list(&config, true, false);
        assert!(output.contains("Introduction to Softw...  246N12"));
        assert!(output.contains("H90         0h  (dropped)"));
    }

    #[test]
    fn list_json_uses_camel_case() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_at(temp.path(), ConflictPolicy::FirstFound);
        seed(&config);

        let value: serde_json::Value = serde_json::from_str(&list(&config, true, true)).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["scheduleCode"], "35T12");
        assert_eq!(value[0]["workloadHours"], "H60");
        assert_eq!(value[1]["active"], false);
    }

    #[test]
    fn list_empty_student() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_at(temp.path(), ConflictPolicy::FirstFound);
        assert_eq!(list(&config, false, false), "No disciplines.\n");
    }
}
