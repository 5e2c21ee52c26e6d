//! Schedule-code engine.
//!
//! Decodes the compact weekly notation used for class times (`246N12`,
//! `35T12 4M34`): one or more segments of weekday digits (1 = Sunday .. 7 =
//! Saturday), a shift letter (`M` morning, `T` afternoon, `N` evening, with
//! legacy `V` read as `T`), and block digits (1-6, or 1-4 in the evening).
//!
//! Pipeline: raw text → [`normalize`] → [`SegmentMatcher`] →
//! [`RawSegment::validate`] → [`expand_all`] → slot set, which is then
//! compared ([`has_conflict`]), counted ([`infer_workload`]), or described
//! ([`ScheduleInfo`]). Every stage is pure.

mod code;
mod conflict;
mod error;
mod info;
mod normalize;
mod segment;
mod slot;
mod workload;

use std::collections::BTreeSet;

pub use code::ScheduleCode;
pub use conflict::{
    ConflictPolicy, Scheduled, UnknownConflictPolicy, ensure_no_conflict, find_conflicts,
    has_conflict,
};
pub use error::{ScheduleConflict, ScheduleError};
pub use info::{ScheduleInfo, describe_days, describe_shifts};
pub use normalize::normalize;
pub use segment::{RawSegment, Segment, SegmentMatcher, Segments, expand_all};
pub use slot::{Block, Shift, Slot, Weekday};
pub use workload::{UnknownWorkloadTier, WorkloadTier, count_distinct_days, infer_workload};

/// Whether `code` is a well-formed, non-empty schedule code.
pub fn is_valid(code: &str) -> bool {
    ScheduleCode::parse(code).is_ok()
}

/// Parses `code` into its aggregate description.
pub fn parse(code: &str) -> Result<ScheduleInfo, ScheduleError> {
    ScheduleCode::parse(code).map(|parsed| parsed.info())
}

/// Every slot `code` occupies.
pub fn extract_slots(code: &str) -> Result<BTreeSet<Slot>, ScheduleError> {
    ScheduleCode::parse(code).map(|parsed| parsed.slots().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(code: &str) -> Vec<String> {
        extract_slots(code)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn evening_code_expands_to_six_slots() {
        let info = parse("246N12").unwrap();
        let rendered: Vec<String> = info.slots.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["2N1", "2N2", "4N1", "4N2", "6N1", "6N2"]);
    }

    #[test]
    fn out_of_range_day_and_shift_are_invalid() {
        assert!(!is_valid("9X99"));
        assert_eq!(parse("9X99"), Err(ScheduleError::InvalidDay('9')));
    }

    #[test]
    fn blank_codes_are_invalid() {
        assert!(!is_valid(""));
        assert!(!is_valid("   "));
        assert_eq!(parse("  "), Err(ScheduleError::EmptyInput));
    }

    #[test]
    fn accepts_common_real_world_codes() {
        for code in ["246N12", "35T12", "35M56 4T34", "246N12 7N12", "2M123456", "7N1234"] {
            assert!(is_valid(code), "{code} should be valid");
        }
    }

    #[test]
    fn rejects_out_of_range_blocks() {
        assert!(!is_valid("2N5"));
        assert!(!is_valid("2M7"));
        assert!(!is_valid("2T0"));
    }

    #[test]
    fn multi_segment_codes_union_slots() {
        assert_eq!(
            slots("246N12 7N12"),
            ["2N1", "2N2", "4N1", "4N2", "6N1", "6N2", "7N1", "7N2"]
        );
    }

    #[test]
    fn slot_set_is_deterministic() {
        assert_eq!(slots(" 35t12 "), slots("35T12"));
        assert_eq!(slots("35V12"), slots("35T12"));
    }
}
