//! Segment scanning and validation.
//!
//! A schedule code is one or more `(days)(shift)(blocks)` segments such as
//! `246N12` or `35T12`. The matcher accepts any digit run and any letter; the
//! validator then names the offending character.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{CaptureMatches, Regex};

use super::error::ScheduleError;
use super::slot::{Block, Shift, Slot, Weekday};

/// Day group, shift letter, block group. Whitespace between the parts is tolerated.
static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s*([A-Z])\s*([0-9]*)").unwrap());

/// An unvalidated segment, borrowed from the normalized input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSegment<'a> {
    pub days: &'a str,
    pub shift: char,
    pub blocks: &'a str,
}

/// Scans a normalized code for segments.
///
/// Each call to [`segments`](Self::segments) starts a fresh pass, so the
/// matcher can be iterated any number of times.
#[derive(Debug, Clone, Copy)]
pub struct SegmentMatcher<'a> {
    normalized: &'a str,
}

impl<'a> SegmentMatcher<'a> {
    pub const fn new(normalized: &'a str) -> Self {
        Self { normalized }
    }

    /// Lazily yields every segment in the input, left to right.
    pub fn segments(&self) -> Segments<'a> {
        Segments {
            captures: SEGMENT_RE.captures_iter(self.normalized),
        }
    }

    /// Text before, between or after segments that is not whitespace.
    pub fn unmatched(&self) -> Vec<&'a str> {
        let mut leftover = Vec::new();
        let mut cursor = 0;
        for found in SEGMENT_RE.find_iter(self.normalized) {
            leftover.push(&self.normalized[cursor..found.start()]);
            cursor = found.end();
        }
        leftover.push(&self.normalized[cursor..]);
        leftover
            .into_iter()
            .map(str::trim)
            .filter(|gap| !gap.is_empty())
            .collect()
    }
}

impl<'a> IntoIterator for &SegmentMatcher<'a> {
    type Item = RawSegment<'a>;
    type IntoIter = Segments<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments()
    }
}

/// Iterator returned by [`SegmentMatcher::segments`].
#[derive(Debug)]
pub struct Segments<'a> {
    captures: CaptureMatches<'static, 'a>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = RawSegment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = self.captures.next()?;
        let days = caps.get(1).map_or("", |m| m.as_str());
        let shift = caps
            .get(2)
            .and_then(|m| m.as_str().chars().next())
            .unwrap_or_default();
        let blocks = caps.get(3).map_or("", |m| m.as_str());
        Some(RawSegment {
            days,
            shift,
            blocks,
        })
    }
}

/// A segment whose days and shift are known to be legal.
///
/// Block digits are checked against the shift range during expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub days: BTreeSet<Weekday>,
    pub shift: Shift,
    pub blocks: Vec<u8>,
}

impl RawSegment<'_> {
    /// Checks days, then shift, then that blocks were given.
    pub fn validate(&self) -> Result<Segment, ScheduleError> {
        if self.days.is_empty() {
            return Err(ScheduleError::MalformedSchedule(self.to_string()));
        }
        let days = self
            .days
            .chars()
            .map(Weekday::from_char)
            .collect::<Result<BTreeSet<_>, _>>()?;
        let shift = Shift::from_char(self.shift)?;
        if self.blocks.is_empty() {
            return Err(ScheduleError::EmptySegment);
        }
        let blocks = self
            .blocks
            .bytes()
            .map(|b| b.wrapping_sub(b'0'))
            .collect();
        Ok(Segment {
            days,
            shift,
            blocks,
        })
    }
}

impl std::fmt::Display for RawSegment<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.days, self.shift, self.blocks)
    }
}

impl Segment {
    /// Expands into the cartesian product `days x blocks`.
    pub fn expand(&self) -> Result<BTreeSet<Slot>, ScheduleError> {
        let blocks = self
            .blocks
            .iter()
            .map(|&b| Block::new(self.shift, b))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self
            .days
            .iter()
            .flat_map(|&day| {
                blocks.iter().map(move |&block| Slot {
                    day,
                    shift: self.shift,
                    block,
                })
            })
            .collect())
    }
}

/// Unions the expansion of every segment of one code.
pub fn expand_all<'s>(
    segments: impl IntoIterator<Item = &'s Segment>,
) -> Result<BTreeSet<Slot>, ScheduleError> {
    let mut slots = BTreeSet::new();
    for segment in segments {
        slots.extend(segment.expand()?);
    }
    if slots.is_empty() {
        return Err(ScheduleError::NoSlotsProduced);
    }
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(normalized: &str) -> Vec<RawSegment<'_>> {
        SegmentMatcher::new(normalized).segments().collect()
    }

    #[test]
    fn matches_multiple_segments() {
        let segments = raw("246N12 7N12");
        assert_eq!(
            segments,
            vec![
                RawSegment {
                    days: "246",
                    shift: 'N',
                    blocks: "12"
                },
                RawSegment {
                    days: "7",
                    shift: 'N',
                    blocks: "12"
                },
            ]
        );
    }

    #[test]
    fn tolerates_spaces_inside_segment() {
        let segments = raw("35 T 12");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].days, "35");
        assert_eq!(segments[0].blocks, "12");
    }

    #[test]
    fn matcher_is_restartable() {
        let matcher = SegmentMatcher::new("35M56 4T34");
        let first: Vec<_> = matcher.segments().collect();
        let second: Vec<_> = (&matcher).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn no_segments_in_free_text() {
        assert!(raw("HELLO THERE").is_empty());
        assert!(raw("").is_empty());
    }

    #[test]
    fn unmatched_collects_text_outside_segments() {
        assert!(SegmentMatcher::new("35T12 4M34").unmatched().is_empty());
        assert!(SegmentMatcher::new("35 T 12").unmatched().is_empty());
        assert_eq!(SegmentMatcher::new("3-5T12").unmatched(), ["3-"]);
        assert_eq!(SegmentMatcher::new("35T12 HELLO").unmatched(), ["HELLO"]);
        assert_eq!(SegmentMatcher::new("35É12 4M1").unmatched(), ["35É12"]);
        assert_eq!(SegmentMatcher::new("X 2N1 Y").unmatched(), ["X", "Y"]);
    }

    #[test]
    fn validate_reports_bad_day_first() {
        let segment = raw("9X99")[0];
        assert_eq!(segment.validate(), Err(ScheduleError::InvalidDay('9')));
    }

    #[test]
    fn validate_reports_bad_shift() {
        let segment = raw("35X12")[0];
        assert_eq!(segment.validate(), Err(ScheduleError::InvalidShift('X')));
    }

    #[test]
    fn validate_reports_missing_blocks() {
        let segment = raw("35T")[0];
        assert_eq!(segment.validate(), Err(ScheduleError::EmptySegment));
    }

    #[test]
    fn expand_is_cartesian_product() {
        let segment = raw("246N12")[0].validate().unwrap();
        let slots: Vec<String> = segment
            .expand()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(slots, ["2N1", "2N2", "4N1", "4N2", "6N1", "6N2"]);
    }

    #[test]
    fn expand_rejects_block_out_of_shift_range() {
        let segment = raw("2N5")[0].validate().unwrap();
        assert_eq!(
            segment.expand(),
            Err(ScheduleError::InvalidBlock {
                shift: Shift::Evening,
                block: 5
            })
        );
        let segment = raw("2M0")[0].validate().unwrap();
        assert!(matches!(
            segment.expand(),
            Err(ScheduleError::InvalidBlock { block: 0, .. })
        ));
    }

    #[test]
    fn expand_all_deduplicates_across_segments() {
        let segments: Vec<Segment> = raw("24M12 2M2")
            .iter()
            .map(|s| s.validate().unwrap())
            .collect();
        let slots = expand_all(&segments).unwrap();
        assert_eq!(slots.len(), 4);
    }

    #[test]
    fn expand_all_of_nothing_is_an_error() {
        assert_eq!(expand_all(&[]), Err(ScheduleError::NoSlotsProduced));
    }
}
