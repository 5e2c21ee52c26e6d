//! Conflict detection between schedule codes.
//!
//! The pairwise detector only answers yes or no. [`find_conflicts`] applies
//! it to a candidate and a library of stored schedules, following a
//! [`ConflictPolicy`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::code::ScheduleCode;
use super::error::ScheduleConflict;
use super::info::{describe_days, describe_shifts};

/// Whether two codes occupy a common slot.
///
/// Malformed input is logged and reported as no conflict; validate codes with
/// [`is_valid`](super::is_valid) or [`parse`](super::parse) to surface the error.
pub fn has_conflict(a: &str, b: &str) -> bool {
    let (a_code, b_code) = match (ScheduleCode::parse(a), ScheduleCode::parse(b)) {
        (Ok(a_code), Ok(b_code)) => (a_code, b_code),
        (Err(err), _) | (_, Err(err)) => {
            tracing::warn!(a, b, error = %err, "invalid schedule code during conflict check");
            return false;
        }
    };

    let conflict = a_code.conflicts_with(&b_code);
    if conflict {
        tracing::debug!(a, b, "schedule conflict detected");
    }
    conflict
}

/// Something that occupies a weekly schedule, e.g. a stored discipline.
pub trait Scheduled {
    /// Human-facing name used in conflict messages.
    fn label(&self) -> &str;

    /// Institutional course code, e.g. `IMD1012`.
    fn course_code(&self) -> &str;

    /// The stored schedule code; may be corrupt.
    fn schedule_code(&self) -> &str;
}

/// How many conflicts to report when checking against many schedules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Stop at the first conflicting schedule.
    #[default]
    FirstFound,
    /// Check every schedule and report all conflicts.
    CollectAll,
}

impl ConflictPolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstFound => "first_found",
            Self::CollectAll => "collect_all",
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognized policy names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown conflict policy: {0} (expected first_found or collect_all)")]
pub struct UnknownConflictPolicy(pub String);

impl FromStr for ConflictPolicy {
    type Err = UnknownConflictPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "first_found" | "first" => Ok(Self::FirstFound),
            "collect_all" | "all" => Ok(Self::CollectAll),
            other => Err(UnknownConflictPolicy(other.to_string())),
        }
    }
}

/// Checks `candidate` against every schedule in `existing`.
///
/// Stored codes that no longer parse are skipped with a warning rather than
/// aborting the whole check.
pub fn find_conflicts<S: Scheduled>(
    candidate: &ScheduleCode,
    existing: &[S],
    policy: ConflictPolicy,
) -> Vec<ScheduleConflict> {
    let mut conflicts = Vec::new();
    for other in existing {
        let other_code = match ScheduleCode::parse(other.schedule_code()) {
            Ok(code) => code,
            Err(err) => {
                tracing::warn!(
                    discipline = other.label(),
                    code = other.schedule_code(),
                    error = %err,
                    "skipping stored discipline with invalid schedule code"
                );
                continue;
            }
        };

        let overlap = candidate.overlap(&other_code);
        if overlap.is_empty() {
            continue;
        }

        let description = format!(
            "conflicts with {} ({}) on {} during {}",
            other.label(),
            other.schedule_code(),
            describe_days(&overlap.iter().map(|s| s.day).collect::<Vec<_>>()),
            describe_shifts(&overlap.iter().map(|s| s.shift).collect::<Vec<_>>()),
        );
        tracing::debug!(candidate = candidate.as_str(), %description, "schedule conflict");
        conflicts.push(ScheduleConflict {
            other_label: other.label().to_string(),
            other_code: other.schedule_code().to_string(),
            overlap,
            description,
        });

        if policy == ConflictPolicy::FirstFound {
            break;
        }
    }
    conflicts
}

/// Fails with the first conflict found, if any.
pub fn ensure_no_conflict<S: Scheduled>(
    candidate: &ScheduleCode,
    existing: &[S],
) -> Result<(), ScheduleConflict> {
    match find_conflicts(candidate, existing, ConflictPolicy::FirstFound)
        .into_iter()
        .next()
    {
        Some(conflict) => Err(conflict),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use crate::schedule::{Segment, SegmentMatcher, Slot, expand_all, normalize};

    struct Stored {
        name: &'static str,
        code: &'static str,
    }

    impl Scheduled for Stored {
        fn label(&self) -> &str {
            self.name
        }

        fn course_code(&self) -> &str {
            "TST0001"
        }

        fn schedule_code(&self) -> &str {
            self.code
        }
    }

    fn library() -> Vec<Stored> {
        vec![
            Stored {
                name: "Corrupt",
                code: "??",
            },
            Stored {
                name: "Calculus I",
                code: "35T12",
            },
            Stored {
                name: "Databases",
                code: "24T12 3T34",
            },
        ]
    }

    #[test]
    fn disjoint_blocks_on_shared_day_do_not_conflict() {
        assert!(!has_conflict("35T12", "3T3"));
    }

    #[test]
    fn shared_slot_conflicts() {
        assert!(has_conflict("35T12", "3T1"));
    }

    #[test]
    fn different_shift_same_block_does_not_conflict() {
        assert!(!has_conflict("35T12", "35M12"));
    }

    #[test]
    fn conflicts_across_segments() {
        assert!(has_conflict("2M12 6N34", "46N4"));
    }

    #[test]
    fn legacy_letter_conflicts_with_canonical() {
        assert!(has_conflict("35V12", "5T2"));
    }

    #[test]
    fn malformed_input_is_not_a_conflict() {
        assert!(!has_conflict("9X99", "35T12"));
        assert!(!has_conflict("35T12", ""));
    }

    #[test]
    fn first_found_stops_after_one() {
        let candidate = ScheduleCode::parse("3T1234").unwrap();
        let conflicts = find_conflicts(&candidate, &library(), ConflictPolicy::FirstFound);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].other_label, "Calculus I");
        assert_eq!(
            conflicts[0].description,
            "conflicts with Calculus I (35T12) on Tuesday during Afternoon"
        );
    }

    #[test]
    fn collect_all_reports_every_conflict() {
        let candidate = ScheduleCode::parse("3T1234").unwrap();
        let conflicts = find_conflicts(&candidate, &library(), ConflictPolicy::CollectAll);
        let labels: Vec<_> = conflicts.iter().map(|c| c.other_label.as_str()).collect();
        assert_eq!(labels, ["Calculus I", "Databases"]);
        let overlap: Vec<String> = conflicts[1]
            .overlap
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(overlap, ["3T3", "3T4"]);
    }

    #[test]
    fn corrupt_stored_code_is_skipped() {
        let candidate = ScheduleCode::parse("7M1").unwrap();
        assert!(find_conflicts(&candidate, &library(), ConflictPolicy::CollectAll).is_empty());
        assert!(ensure_no_conflict(&candidate, &library()).is_ok());
    }

    #[test]
    fn ensure_no_conflict_returns_first() {
        let candidate = ScheduleCode::parse("4T2").unwrap();
        let err = ensure_no_conflict(&candidate, &library()).unwrap_err();
        assert_eq!(err.other_code, "24T12 3T34");
        assert_eq!(
            err.to_string(),
            "conflicts with Databases (24T12 3T34) on Wednesday during Afternoon"
        );
    }

    #[test]
    fn policy_parses_from_config_names() {
        assert_eq!(
            "collect_all".parse::<ConflictPolicy>(),
            Ok(ConflictPolicy::CollectAll)
        );
        assert_eq!("first".parse::<ConflictPolicy>(), Ok(ConflictPolicy::FirstFound));
        assert!("sometimes".parse::<ConflictPolicy>().is_err());
        assert_eq!(ConflictPolicy::default(), ConflictPolicy::FirstFound);
    }

    /// `(days, shift, blocks)` with blocks drawn from the shift's own range.
    fn arb_segment() -> impl Strategy<Value = (String, char, String)> {
        let shift_and_blocks = prop_oneof![
            (prop_oneof![Just('M'), Just('T'), Just('V')], "[1-6]{1,3}"),
            (Just('N'), "[1-4]{1,3}"),
        ];
        ("[1-7]{1,3}", shift_and_blocks)
            .prop_map(|(days, (shift, blocks))| (days, shift, blocks))
    }

    fn arb_segments() -> impl Strategy<Value = Vec<(String, char, String)>> {
        prop::collection::vec(arb_segment(), 1..4)
    }

    fn render(segments: &[(String, char, String)]) -> String {
        segments
            .iter()
            .map(|(days, shift, blocks)| format!("{days}{shift}{blocks}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn arb_code() -> impl Strategy<Value = String> {
        arb_segments().prop_map(|segments| render(&segments))
    }

    /// Slots written out by hand from the generated parts.
    fn expected_slots(segments: &[(String, char, String)]) -> BTreeSet<String> {
        let mut slots = BTreeSet::new();
        for (days, shift, blocks) in segments {
            let shift = if *shift == 'V' { 'T' } else { *shift };
            for day in days.chars() {
                for block in blocks.chars() {
                    slots.insert(format!("{day}{shift}{block}"));
                }
            }
        }
        slots
    }

    fn rendered(slots: &BTreeSet<Slot>) -> BTreeSet<String> {
        slots.iter().map(ToString::to_string).collect()
    }

    proptest! {
        #[test]
        fn conflict_is_symmetric(a in arb_code(), b in arb_code()) {
            prop_assert_eq!(has_conflict(&a, &b), has_conflict(&b, &a));
        }

        #[test]
        fn conflict_is_reflexive(a in arb_code()) {
            prop_assert!(has_conflict(&a, &a));
        }

        #[test]
        fn parsed_slots_equal_cartesian_product(segments in arb_segments()) {
            let code = ScheduleCode::parse(&render(&segments)).unwrap();
            prop_assert_eq!(rendered(code.slots()), expected_slots(&segments));
        }

        #[test]
        fn parsed_slots_match_segment_expansion(a in arb_code()) {
            let canonical = normalize(&a);
            let segments: Vec<Segment> = SegmentMatcher::new(&canonical)
                .segments()
                .map(|segment| segment.validate().unwrap())
                .collect();
            let expanded = expand_all(&segments).unwrap();
            let parsed = super::super::parse(&a).unwrap();
            prop_assert_eq!(parsed.slots, expanded);
        }

        #[test]
        fn conflict_matches_slot_intersection(a in arb_segments(), b in arb_segments()) {
            let shared = expected_slots(&a)
                .intersection(&expected_slots(&b))
                .next()
                .is_some();
            prop_assert_eq!(has_conflict(&render(&a), &render(&b)), shared);
        }

        #[test]
        fn valid_codes_have_in_range_slots(a in arb_code()) {
            prop_assert!(super::super::is_valid(&a));
            let code = ScheduleCode::parse(&a).unwrap();
            prop_assert!(!code.slots().is_empty());
            for slot in code.slots() {
                prop_assert!((1..=7).contains(&slot.day.number()));
                prop_assert!((1..=slot.shift.max_block()).contains(&slot.block.number()));
            }
        }
    }
}
