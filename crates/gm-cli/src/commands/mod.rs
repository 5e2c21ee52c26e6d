//! CLI subcommand implementations.

pub mod absent;
pub mod add;
pub mod check;
pub mod conflict;
pub mod drop;
pub mod import;
pub mod list;
pub mod task;
pub mod update;
pub mod util;
pub mod workload;
