//! Conflict command for comparing two schedule codes.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use gm_core::schedule::{describe_days, describe_shifts};
use gm_core::{ScheduleCode, has_conflict};

#[derive(Debug, Args)]
pub struct ConflictArgs {
    /// First schedule code.
    pub first: String,
    /// Second schedule code.
    pub second: String,
}

/// Returns whether the codes conflict. Both must be valid.
pub fn run<W: Write>(writer: &mut W, args: &ConflictArgs) -> Result<bool> {
    let first = ScheduleCode::parse(&args.first)
        .with_context(|| format!("invalid schedule code {:?}", args.first))?;
    let second = ScheduleCode::parse(&args.second)
        .with_context(|| format!("invalid schedule code {:?}", args.second))?;

    if !has_conflict(first.as_str(), second.as_str()) {
        writeln!(
            writer,
            "No conflict: {} and {} share no slots.",
            first.canonical(),
            second.canonical()
        )?;
        return Ok(false);
    }

    let overlap = first.overlap(&second);
    let days: Vec<_> = overlap.iter().map(|s| s.day).collect();
    let shifts: Vec<_> = overlap.iter().map(|s| s.shift).collect();
    let slots = overlap
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(
        writer,
        "Conflict: {} and {} overlap on {} during {}.",
        first.canonical(),
        second.canonical(),
        describe_days(&days),
        describe_shifts(&shifts)
    )?;
    writeln!(writer, "Shared slots: {slots}")?;
    Ok(true)
}
