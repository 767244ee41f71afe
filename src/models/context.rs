// ABOUTME: Weekly schedule context - schedule days, day types, and the 7-day invariant
// ABOUTME: DayType carries the total intensity order used when merging activity records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Training-intensity classification of a single calendar day.
///
/// Variant order defines the total intensity order `High > Training > Rest`,
/// so `Ord::max` resolves conflicting classifications of the same date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    /// Rest or recovery day
    Rest,
    /// Standard endurance/strength session
    Training,
    /// Long, interval, or race-intensity day
    High,
}

impl DayType {
    /// Strict parse; `None` for anything outside the three valid tokens
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "rest" => Some(Self::Rest),
            "training" => Some(Self::Training),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Lowercase label as written in documents and artifacts
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rest => "rest",
            Self::Training => "training",
            Self::High => "high",
        }
    }

    /// Resolve two classifications of the same date to the higher intensity.
    ///
    /// Commutative; never averages or votes.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        self.max(other)
    }
}

/// One entry of the weekly schedule.
///
/// `day_type` is kept as the raw document string so invalid values degrade to
/// the note-based heuristic instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDay {
    /// Calendar date
    pub date: NaiveDate,
    /// Pre-classified day type, if supplied and valid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_type: Option<String>,
    /// Free-text session notes, used for classification fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The full weekly planning context.
///
/// Invariant (hard validation gate): `schedule.len() == 7`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyContext {
    /// Monday of the planned week
    pub week_start: NaiveDate,
    /// IANA timezone name of the household
    pub timezone: String,
    /// Free-text training focus for the week
    pub training_focus: String,
    /// Exactly seven schedule days
    pub schedule: Vec<ScheduleDay>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_commutative_and_takes_higher() {
        for a in [DayType::Rest, DayType::Training, DayType::High] {
            for b in [DayType::Rest, DayType::Training, DayType::High] {
                assert_eq!(a.merge(b), b.merge(a));
                assert_eq!(a.merge(b), a.max(b));
            }
        }
        assert_eq!(DayType::Rest.merge(DayType::High), DayType::High);
        assert_eq!(DayType::Training.merge(DayType::Rest), DayType::Training);
    }

    #[test]
    fn parse_rejects_unknown_tokens() {
        assert_eq!(DayType::parse("high"), Some(DayType::High));
        assert_eq!(DayType::parse("HIGH"), None);
        assert_eq!(DayType::parse("recovery"), None);
    }
}
