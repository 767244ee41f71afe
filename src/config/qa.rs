// ABOUTME: QA gate configuration - required sections, tone phrase lists, tolerances
// ABOUTME: Rule content is data; the gate itself stays a small deterministic engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// QA gate rule configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaConfig {
    /// Digest section headings that must be present verbatim
    pub required_sections: Vec<String>,
    /// Medical-claim phrases banned from the digest (case-insensitive)
    pub medical_claim_phrases: Vec<String>,
    /// Overly prescriptive phrases banned from the digest (case-insensitive)
    pub prescriptive_phrases: Vec<String>,
    /// Allowed relative deviation between computed and declared average kcal: 0.10
    pub kcal_tolerance: f64,
    /// Expected recipe count (7 days × 4 slots): 28
    pub expected_recipe_count: usize,
    /// Domains that mark a recipe link as a placeholder
    pub placeholder_domains: Vec<String>,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            required_sections: vec![
                "## TL;DR".into(),
                "## This Week's Targets".into(),
                "## Plan Rationale".into(),
                "## Data Analyst Notes".into(),
                "## Meal Plan".into(),
                "## Grocery List".into(),
                "## Notes / Assumptions".into(),
                "## Next Week Feedback Prompts".into(),
                "## QA Summary".into(),
            ],
            medical_claim_phrases: vec![
                "will improve".into(),
                "proven to".into(),
                "scientifically shown".into(),
                "cures".into(),
                "prevents disease".into(),
                "treats".into(),
            ],
            prescriptive_phrases: vec![
                "you must".into(),
                "you need to".into(),
                "you should always".into(),
            ],
            kcal_tolerance: 0.10,
            expected_recipe_count: 28,
            placeholder_domains: vec!["example.com".into()],
        }
    }
}

impl QaConfig {
    /// Validate tolerance bounds and non-empty rule lists
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the tolerance is outside (0, 1) or the
    /// required-section list is empty.
    pub fn validate(&self) -> AppResult<()> {
        if self.kcal_tolerance <= 0.0 || self.kcal_tolerance >= 1.0 {
            return Err(AppError::config(format!(
                "kcal_tolerance must be within (0, 1), got {}",
                self.kcal_tolerance
            )));
        }
        if self.required_sections.is_empty() {
            return Err(AppError::config("required_sections must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        QaConfig::default().validate().unwrap();
    }

    #[test]
    fn nine_required_sections() {
        assert_eq!(QaConfig::default().required_sections.len(), 9);
    }
}
