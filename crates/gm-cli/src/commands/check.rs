//! Check command for validating and describing a schedule code.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use gm_core::{ScheduleCode, ScheduleInfo, WorkloadTier, infer_workload};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Schedule code, e.g. "246N12" or "35T12 4M34".
    pub code: String,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct CheckOutput {
    #[serde(flatten)]
    info: ScheduleInfo,
    workload: WorkloadTier,
}

pub fn run<W: Write>(writer: &mut W, args: &CheckArgs) -> Result<()> {
    let code = ScheduleCode::parse(&args.code)
        .with_context(|| format!("invalid schedule code {:?}", args.code))?;
    let output = CheckOutput {
        info: code.info(),
        workload: infer_workload(code.as_str()),
    };

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
        return Ok(());
    }

    let info = &output.info;
    let blocks = info
        .blocks
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let slots = info
        .slots
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");

    writeln!(writer, "Schedule:  {}", info.canonical)?;
    writeln!(writer, "Days:      {}", info.days_description())?;
    writeln!(writer, "Shifts:    {}", info.shifts_description())?;
    writeln!(writer, "Blocks:    {blocks}")?;
    writeln!(writer, "Slots:     {slots}")?;
    let unit = if info.days_per_week == 1 { "day" } else { "days" };
    writeln!(
        writer,
        "Workload:  {} ({} {unit} per week)",
        output.workload, info.days_per_week
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn check(code: &str, json: bool) -> Result<String> {
        let args = CheckArgs {
            code: code.to_string(),
            json,
        };
        let mut output = Vec::new();
        run(&mut output, &args)?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn check_describes_multi_segment_code() {
        let output = check("35t12; 4m34", false).unwrap();
        assert_snapshot!(output, @r"
        Schedule:  35T12 4M34
        Days:      Tuesday, Wednesday, Thursday
        Shifts:    Morning, Afternoon
        Blocks:    1, 2, 3, 4
        Slots:     3T1 3T2 4M3 4M4 5T1 5T2
        Workload:  H90 (3 days per week)
        ");
    }

    #[test]
    fn check_json_includes_slots_and_workload() {
        let output = check("246N12", true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["workload"], "H90");
        assert_eq!(value["days_per_week"], 3);
        assert_eq!(
            value["slots"],
            serde_json::json!(["2N1", "2N2", "4N1", "4N2", "6N1", "6N2"])
        );
    }

    #[test]
    fn check_single_day_code() {
        let output = check("7n1", false).unwrap();
        assert!(output.ends_with("Workload:  H30 (1 day per week)\n"));
    }

    #[test]
    fn check_reports_diagnostic() {
        let err = check("2N5", false).unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            "invalid schedule code \"2N5\": invalid Evening block 5 (must be between 1 and 4)"
        );
    }
}
