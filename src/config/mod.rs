// ABOUTME: Pipeline configuration root aggregating nutrition and QA rule settings
// ABOUTME: Defaults are the documented production constants; everything validates up front
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

//! Configuration for the planning pipeline.
//!
//! All lookup tables and numeric policy live in immutable config structs
//! whose `Default` impls carry the documented constants. The orchestrator
//! validates the whole tree once before the first stage runs.

/// Macro target engine configuration
pub mod nutrition;
/// QA gate rule configuration
pub mod qa;

pub use nutrition::{
    ActivityModelConfig, MacronutrientConfig, NutritionConfig, RmrConfig, WeekTierConfig,
};
pub use qa::QaConfig;

use serde::{Deserialize, Serialize};

use crate::errors::AppResult;

/// Top-level pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Nutrition engine settings
    pub nutrition: NutritionConfig,
    /// QA gate rules
    pub qa: QaConfig,
    /// Store name written into grocery artifacts
    #[serde(default = "default_store")]
    pub store_name: String,
}

fn default_store() -> String {
    "Fred Meyer".into()
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            nutrition: NutritionConfig::default(),
            qa: QaConfig::default(),
            store_name: default_store(),
        }
    }
}

impl PlannerConfig {
    /// Validate the full configuration tree
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found in any subtree.
    pub fn validate(&self) -> AppResult<()> {
        self.nutrition.validate()?;
        self.qa.validate()
    }
}
