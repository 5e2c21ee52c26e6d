//! Absent command for recording missed class hours.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use crate::Config;

#[derive(Debug, Args)]
pub struct AbsentArgs {
    /// Discipline ID.
    pub id: i64,

    /// Hours missed.
    #[arg(long)]
    pub hours: i64,
}

pub fn run<W: Write>(writer: &mut W, args: &AbsentArgs, config: &Config) -> Result<()> {
    let mut db = config.open_database()?;
    let record = db.record_absence(args.id, args.hours)?;
    writeln!(
        writer,
        "{} {}: {} of {} hours missed",
        record.code,
        record.name,
        record.absences_hours,
        record.workload.hours()
    )?;
    Ok(())
}
