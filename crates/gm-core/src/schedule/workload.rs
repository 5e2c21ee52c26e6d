//! Workload tiers and inference from class days.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::code::ScheduleCode;

/// Weekly-hour classification of a discipline.
///
/// Inference only ever yields `H30`, `H60` or `H90`; the others must be set
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WorkloadTier {
    H30,
    H45,
    H60,
    H75,
    H90,
    H120,
}

impl WorkloadTier {
    pub const ALL: [Self; 6] = [
        Self::H30,
        Self::H45,
        Self::H60,
        Self::H75,
        Self::H90,
        Self::H120,
    ];

    /// Total hours this tier stands for.
    pub const fn hours(self) -> u16 {
        match self {
            Self::H30 => 30,
            Self::H45 => 45,
            Self::H60 => 60,
            Self::H75 => 75,
            Self::H90 => 90,
            Self::H120 => 120,
        }
    }

    /// String representation for database storage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::H30 => "H30",
            Self::H45 => "H45",
            Self::H60 => "H60",
            Self::H75 => "H75",
            Self::H90 => "H90",
            Self::H120 => "H120",
        }
    }

    /// Maps a count of distinct class days to a tier.
    pub const fn from_days_per_week(days: usize) -> Self {
        match days {
            0 | 1 => Self::H30,
            2 => Self::H60,
            _ => Self::H90,
        }
    }
}

impl fmt::Display for WorkloadTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for workload strings that name no tier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown workload tier: {0} (expected one of H30, H45, H60, H75, H90, H120)")]
pub struct UnknownWorkloadTier(pub String);

impl FromStr for WorkloadTier {
    type Err = UnknownWorkloadTier;

    /// Accepts `H60` as well as a bare `60`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('H')
            .or_else(|| trimmed.strip_prefix('h'))
            .unwrap_or(trimmed);
        Self::ALL
            .into_iter()
            .find(|tier| digits.parse::<u16>().is_ok_and(|h| h == tier.hours()))
            .ok_or_else(|| UnknownWorkloadTier(s.to_string()))
    }
}

/// Infers the workload tier from the number of distinct class days.
///
/// Only used when no workload was supplied, so an unparseable code falls back
/// to the lowest tier instead of failing.
pub fn infer_workload(code: &str) -> WorkloadTier {
    match code.parse::<ScheduleCode>() {
        Ok(parsed) => {
            let days = parsed.distinct_days();
            let tier = WorkloadTier::from_days_per_week(days);
            tracing::debug!(code, days, %tier, "inferred workload");
            tier
        }
        Err(err) => {
            tracing::warn!(code, error = %err, "cannot infer workload, defaulting to H30");
            WorkloadTier::H30
        }
    }
}

/// Counts distinct class days across every segment.
///
/// Unparseable codes count as a single day.
pub fn count_distinct_days(code: &str) -> usize {
    code.parse::<ScheduleCode>()
        .map_or(1, |parsed| parsed.distinct_days())
}
