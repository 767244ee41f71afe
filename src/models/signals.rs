// ABOUTME: Aggregated external wellness, alcohol, and nutrition-log signal summaries
// ABOUTME: Read-only inputs to rationale text and QA; never mutated by the core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

use serde::{Deserialize, Serialize};

/// Wearable wellness aggregates over the trailing window
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WellnessSummary {
    /// Average nightly sleep in hours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_sleep_hr: Option<f64>,
    /// Average resting heart rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_rhr: Option<f64>,
    /// Acute:chronic workload ratio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acwr: Option<f64>,
    /// Coarse training-load label (low/moderate/high)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_load: Option<String>,
}

/// Alcohol-log aggregates for the trailing 7 days
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlcoholSummary {
    /// Standard units consumed in the last 7 days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units_7d: Option<f64>,
    /// Flag label (none/light/moderate/heavy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    /// Free-text recovery note from the import
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_note: Option<String>,
}

/// Nutrition-log adherence aggregates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NutritionLogSummary {
    /// Average daily kcal logged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_kcal: Option<f64>,
    /// Average daily protein logged, grams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<f64>,
}

/// All external outcome signals consumed by the pipeline.
///
/// Every leaf is optional; absence degrades the rationale/analytics, never
/// the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutcomeSignals {
    /// Wearable wellness aggregates
    #[serde(default)]
    pub wellness_summary: WellnessSummary,
    /// Alcohol-log aggregates
    #[serde(default)]
    pub alcohol_summary: AlcoholSummary,
    /// Nutrition-log aggregates
    #[serde(default)]
    pub nutrition_summary: NutritionLogSummary,
}
