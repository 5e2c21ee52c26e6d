//! Failure kinds for schedule-code parsing and conflict reporting.

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use super::slot::{Shift, Slot};

/// Why a schedule code was rejected.
///
/// Each variant is a distinct failure kind. None of them is retryable: parsing
/// is a pure function of its input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The input was blank before any parsing was attempted.
    #[error("schedule code cannot be empty")]
    EmptyInput,

    /// No `(days)(shift)(blocks)` segment could be found, or text was left
    /// over outside the segments. Carries the offending text.
    #[error("malformed schedule code: {0:?}")]
    MalformedSchedule(String),

    /// A day character outside `1..=7`.
    #[error("invalid day {0:?} in schedule code (must be between 1 and 7)")]
    InvalidDay(char),

    /// A shift character outside `M`, `T`, `N` (or the legacy `V`).
    #[error("invalid shift {0:?} in schedule code (must be M, T or N)")]
    InvalidShift(char),

    /// A segment had no block digits.
    #[error("schedule segment has no blocks")]
    EmptySegment,

    /// A block digit outside the range allowed for its shift.
    #[error("invalid {shift} block {block} (must be between 1 and {max})", max = .shift.max_block())]
    InvalidBlock { shift: Shift, block: u8 },

    /// Expansion produced nothing even though every segment validated.
    #[error("schedule code produced no time slots")]
    NoSlotsProduced,
}

/// A candidate schedule overlapping an existing discipline.
///
/// Raised by the enrollment flow, never by the parser.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[error("{description}")]
pub struct ScheduleConflict {
    /// Human-facing name of the discipline already occupying the slots.
    pub other_label: String,
    /// Schedule code of that discipline, as stored.
    pub other_code: String,
    /// Slots both schedules occupy.
    pub overlap: BTreeSet<Slot>,
    /// Rendered diagnostic, e.g. `conflicts with Calculus I (35T12) on Tuesday during Afternoon`.
    pub description: String,
}
