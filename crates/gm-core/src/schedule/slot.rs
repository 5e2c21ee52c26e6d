//! Atomic schedule units: weekday, shift, block, and the slot triple.

use std::fmt;

use serde::{Serialize, Serializer};

use super::error::ScheduleError;

/// A weekday digit in `1..=7`, where 1 is Sunday and 7 is Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Weekday(u8);

impl Weekday {
    /// Parses a day character, rejecting anything outside `'1'..='7'`.
    pub const fn from_char(c: char) -> Result<Self, ScheduleError> {
        match c {
            '1'..='7' => Ok(Self(c as u8 - b'0')),
            _ => Err(ScheduleError::InvalidDay(c)),
        }
    }

    /// The numeric day (1 = Sunday).
    pub const fn number(self) -> u8 {
        self.0
    }

    /// English day name.
    pub const fn name(self) -> &'static str {
        match self.0 {
            1 => "Sunday",
            2 => "Monday",
            3 => "Tuesday",
            4 => "Wednesday",
            5 => "Thursday",
            6 => "Friday",
            _ => "Saturday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Weekday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

/// Coarse time-of-day bucket.
///
/// Ordered by time of day, which is also the order used in descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shift {
    Morning,
    Afternoon,
    Evening,
}

impl Shift {
    /// Parses a canonical shift letter.
    ///
    /// The legacy `V` letter is accepted as an alias for `T`, so callers that
    /// skip normalization still get the canonical shift.
    pub const fn from_char(c: char) -> Result<Self, ScheduleError> {
        match c {
            'M' => Ok(Self::Morning),
            'T' | 'V' => Ok(Self::Afternoon),
            'N' => Ok(Self::Evening),
            _ => Err(ScheduleError::InvalidShift(c)),
        }
    }

    /// Canonical letter used in schedule codes.
    pub const fn letter(self) -> char {
        match self {
            Self::Morning => 'M',
            Self::Afternoon => 'T',
            Self::Evening => 'N',
        }
    }

    /// Highest legal block number in this shift.
    pub const fn max_block(self) -> u8 {
        match self {
            Self::Evening => 4,
            Self::Morning | Self::Afternoon => 6,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Shift {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.letter())
    }
}

/// A block number that is legal for the shift it was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Block(u8);

impl Block {
    /// Checks a block digit against the shift-specific range.
    pub const fn new(shift: Shift, block: u8) -> Result<Self, ScheduleError> {
        if block >= 1 && block <= shift.max_block() {
            Ok(Self(block))
        } else {
            Err(ScheduleError::InvalidBlock { shift, block })
        }
    }

    pub const fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One `(day, shift, block)` triple; the unit of conflict comparison.
///
/// Renders as the compact form used inside schedule codes, e.g. `2N1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    pub day: Weekday,
    pub shift: Shift,
    pub block: Block,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.day, self.shift.letter(), self.block)
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
