//! Drop command for deactivating a discipline.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use super::util::summarize;
use crate::Config;

#[derive(Debug, Args)]
pub struct DropArgs {
    /// Discipline ID.
    pub id: i64,
}

pub fn run<W: Write>(writer: &mut W, args: &DropArgs, config: &Config) -> Result<()> {
    let mut db = config.open_database()?;
    let record = db.deactivate_discipline(args.id)?;
    writeln!(writer, "Dropped {}", summarize(&record))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use gm_core::ConflictPolicy;

    use crate::commands::add::{self, AddArgs};
    use crate::commands::util::test_support::config_at;

    fn add(config: &Config, code: &str) {
        let args = AddArgs {
            student: "20230001".to_string(),
            name: "Calculus I".to_string(),
            code: code.to_string(),
            schedule: "35T12".to_string(),
            location: None,
            workload: None,
        };
        add::run(&mut Vec::new(), &args, config).unwrap();
    }

    #[test]
    fn dropped_discipline_frees_its_slots() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_at(temp.path(), ConflictPolicy::FirstFound);
        add(&config, "MAT0001");

        let mut output = Vec::new();
        run(&mut output, &DropArgs { id: 1 }, &config).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Dropped #1 MAT0001 Calculus I [35T12] H60\n"
        );

        // Same slots and even the same course code are free again.
        add(&config, "MAT0001");
    }

    #[test]
    fn drop_missing_discipline_fails() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_at(temp.path(), ConflictPolicy::FirstFound);
        let err = run(&mut Vec::new(), &DropArgs { id: 7 }, &config).unwrap_err();
        assert_eq!(err.to_string(), "discipline not found: 7");
    }
}
