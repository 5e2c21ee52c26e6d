//! The validated schedule code.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ScheduleError;
use super::info::ScheduleInfo;
use super::normalize::normalize;
use super::segment::{RawSegment, SegmentMatcher, expand_all};
use super::slot::{Slot, Weekday};

/// A schedule code that parsed successfully.
///
/// Keeps the text as given, its canonical form, and the non-empty set of
/// slots it occupies. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScheduleCode {
    raw: String,
    canonical: String,
    slots: BTreeSet<Slot>,
}

impl ScheduleCode {
    /// Runs the full pipeline: normalize, match segments, validate, expand.
    pub fn parse(raw: &str) -> Result<Self, ScheduleError> {
        if raw.trim().is_empty() {
            return Err(ScheduleError::EmptyInput);
        }
        let canonical = normalize(raw);

        let matcher = SegmentMatcher::new(&canonical);
        let raw_segments: Vec<RawSegment<'_>> = matcher.segments().collect();
        if raw_segments.is_empty() {
            return Err(ScheduleError::MalformedSchedule(raw.to_string()));
        }
        let leftover = matcher.unmatched();
        if !leftover.is_empty() {
            return Err(ScheduleError::MalformedSchedule(leftover.join(" ")));
        }

        let segments = raw_segments
            .iter()
            .map(RawSegment::validate)
            .collect::<Result<Vec<_>, _>>()?;

        let slots = expand_all(&segments)?;
        Ok(Self {
            raw: raw.to_string(),
            canonical,
            slots,
        })
    }

    /// The code exactly as it was supplied.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The normalized form, e.g. `35T12 4M34`.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub const fn slots(&self) -> &BTreeSet<Slot> {
        &self.slots
    }

    /// Slots this code shares with `other`.
    pub fn overlap(&self, other: &Self) -> BTreeSet<Slot> {
        self.slots.intersection(&other.slots).copied().collect()
    }

    /// Whether the two codes occupy at least one common slot.
    pub fn conflicts_with(&self, other: &Self) -> bool {
        !self.slots.is_disjoint(&other.slots)
    }

    /// Distinct weekdays across all segments.
    pub fn days(&self) -> BTreeSet<Weekday> {
        self.slots.iter().map(|slot| slot.day).collect()
    }

    pub fn distinct_days(&self) -> usize {
        self.days().len()
    }

    /// Aggregate view for diagnostics.
    pub fn info(&self) -> ScheduleInfo {
        ScheduleInfo::from_slots(self.raw.clone(), self.canonical.clone(), &self.slots)
    }
}

impl FromStr for ScheduleCode {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ScheduleCode {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ScheduleCode> for String {
    fn from(code: ScheduleCode) -> Self {
        code.raw
    }
}

impl fmt::Display for ScheduleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for ScheduleCode {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}
