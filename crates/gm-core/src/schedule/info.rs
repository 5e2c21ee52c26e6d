//! Aggregate view of a parsed schedule code, for display and diagnostics.

use std::collections::BTreeSet;

use serde::Serialize;

use super::slot::{Shift, Slot, Weekday};

/// Union of days, shifts, blocks, and slots across every segment of a code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleInfo {
    /// The code as it was supplied.
    pub code: String,
    /// The normalized form.
    pub canonical: String,
    pub days: BTreeSet<Weekday>,
    pub shifts: BTreeSet<Shift>,
    pub blocks: BTreeSet<u8>,
    pub slots: BTreeSet<Slot>,
    pub days_per_week: usize,
}

impl ScheduleInfo {
    pub(crate) fn from_slots(code: String, canonical: String, slots: &BTreeSet<Slot>) -> Self {
        let days: BTreeSet<Weekday> = slots.iter().map(|s| s.day).collect();
        let shifts = slots.iter().map(|s| s.shift).collect();
        let blocks = slots.iter().map(|s| s.block.number()).collect();
        Self {
            code,
            canonical,
            days_per_week: days.len(),
            days,
            shifts,
            blocks,
            slots: slots.clone(),
        }
    }

    /// Day names in week order, e.g. `Monday, Wednesday, Friday`.
    pub fn days_description(&self) -> String {
        describe_days(&self.days)
    }

    /// Shift names in time-of-day order, e.g. `Morning, Evening`.
    pub fn shifts_description(&self) -> String {
        describe_shifts(&self.shifts)
    }
}

pub fn describe_days<'a>(days: impl IntoIterator<Item = &'a Weekday>) -> String {
    let days: BTreeSet<&Weekday> = days.into_iter().collect();
    days.into_iter()
        .map(|d| d.name())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn describe_shifts<'a>(shifts: impl IntoIterator<Item = &'a Shift>) -> String {
    let shifts: BTreeSet<&Shift> = shifts.into_iter().collect();
    shifts
        .into_iter()
        .map(|s| s.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use crate::schedule::ScheduleCode;

    #[test]
    fn info_aggregates_all_segments() {
        let info = ScheduleCode::parse("246N12 7N34").unwrap().info();
        assert_eq!(info.days_per_week, 4);
        assert_eq!(info.blocks.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4]);
        assert_eq!(info.slots.len(), 8);
        assert_eq!(info.canonical, "246N12 7N34");
    }

    #[test]
    fn descriptions_are_sorted_by_week_and_time_of_day() {
        let info = ScheduleCode::parse("6N12 24M12").unwrap().info();
        assert_eq!(info.days_description(), "Monday, Wednesday, Friday");
        assert_eq!(info.shifts_description(), "Morning, Evening");
    }

    #[test]
    fn weekend_days_have_names() {
        let info = ScheduleCode::parse("17M1").unwrap().info();
        assert_eq!(info.days_description(), "Sunday, Saturday");
    }

    #[test]
    fn info_serializes_compact_slots() {
        let info = ScheduleCode::parse("3T1").unwrap().info();
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["slots"], serde_json::json!(["3T1"]));
        assert_eq!(json["shifts"], serde_json::json!(["T"]));
        assert_eq!(json["days"], serde_json::json!([3]));
    }
}
