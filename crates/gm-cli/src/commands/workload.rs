//! Workload command for inferring a tier from a schedule code.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use gm_core::infer_workload;
use gm_core::schedule::count_distinct_days;

#[derive(Debug, Args)]
pub struct WorkloadArgs {
    /// Schedule code, e.g. "35T12".
    pub code: String,
}

pub fn run<W: Write>(writer: &mut W, args: &WorkloadArgs) -> Result<()> {
    let tier = infer_workload(&args.code);
    let days = count_distinct_days(&args.code);
    let unit = if days == 1 { "day" } else { "days" };
    writeln!(writer, "{tier} ({} hours, {days} {unit} per week)", tier.hours())?;
    Ok(())
}
