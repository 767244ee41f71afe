// ABOUTME: Advisory analytics models - plan modifications and the historical feature table row
// ABOUTME: Analytics never mutate the plan; modifications stay empty until enough history exists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Historical rows required before the analytics stage authorizes revisions
pub const ACTIVATION_WEEKS: usize = 4;

/// One proposed plan modification (revision mode only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanModification {
    /// Stable modification identifier
    pub modification_id: String,
    /// Meal identifier the modification targets; must exist in the plan
    pub meal_id: String,
    /// Proposed replacement/adjustment description
    pub proposed_value: String,
    /// Confidence label (low/medium/high)
    pub confidence: String,
}

/// Output of the advisory analytics stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanModifications {
    /// Generation timestamp
    pub generated_at: DateTime<Utc>,
    /// "insufficient" until the feature table holds enough history
    pub data_confidence: String,
    /// Whether the revision pass may run
    pub revision_pass_authorized: bool,
    /// Proposed modifications; empty in accumulation mode
    pub modifications: Vec<PlanModification>,
    /// Cap on modifications applied per week
    pub max_modifications_applied: u32,
    /// Explanation of the current mode
    pub note: String,
}

/// One row of the long-lived historical feature table.
///
/// Appended once per week (idempotent on `week_start`), never rewritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Monday of the recorded week
    pub week_start: NaiveDate,
    /// Week intensity tier label
    pub week_tier: String,
    /// Declared daily average kcal
    pub avg_kcal: u32,
    /// Declared daily protein grams
    pub avg_protein_g: u32,
    /// Declared training-day carb grams
    pub avg_carbs_g: u32,
    /// Declared daily fat grams
    pub avg_fat_g: u32,
    /// Count of training days
    pub training_days: usize,
    /// Count of rest days
    pub rest_days: usize,
    /// Count of high-intensity days
    pub high_days: usize,
    /// Average sleep hours, blank when unavailable
    #[serde(default)]
    pub avg_sleep_hr: String,
    /// Average resting heart rate, blank when unavailable
    #[serde(default)]
    pub avg_rhr: String,
    /// ACWR, blank when unavailable
    #[serde(default)]
    pub acwr: String,
    /// Training load label, blank when unavailable
    #[serde(default)]
    pub training_load: String,
    /// Alcohol units last 7 days, blank when unavailable
    #[serde(default)]
    pub alcohol_units_7d: String,
    /// Alcohol flag, blank when unavailable
    #[serde(default)]
    pub alcohol_flag: String,
    /// Logged average kcal, blank when unavailable
    #[serde(default)]
    pub log_avg_kcal: String,
    /// Logged average protein grams, blank when unavailable
    #[serde(default)]
    pub log_protein_g: String,
    /// Free-text note
    #[serde(default)]
    pub notes: String,
}
