//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{
    absent::AbsentArgs, add::AddArgs, check::CheckArgs, conflict::ConflictArgs, drop::DropArgs,
    import::ImportArgs, list::ListArgs, task::TaskAction, update::UpdateArgs,
    workload::WorkloadArgs,
};

/// Discipline and class-schedule tracker.
///
/// Validates compact schedule codes such as `246N12` or `35T12 4M34`, keeps a
/// student's disciplines free of timetable clashes and tracks their tasks.
#[derive(Debug, Parser)]
#[command(name = "gm", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate a schedule code and describe the slots it occupies.
    Check(CheckArgs),

    /// Check whether two schedule codes overlap.
    Conflict(ConflictArgs),

    /// Infer the workload tier of a schedule code.
    Workload(WorkloadArgs),

    /// Add a discipline for a student.
    Add(AddArgs),

    /// Replace the fields of an existing discipline.
    Update(UpdateArgs),

    /// List a student's disciplines.
    List(ListArgs),

    /// Deactivate a discipline.
    Drop(DropArgs),

    /// Record missed class hours for a discipline.
    Absent(AbsentArgs),

    /// Import extracted disciplines as JSON lines from stdin.
    Import(ImportArgs),

    /// Manage tasks attached to disciplines.
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },
}
