// ABOUTME: User profile model with physiology, goal, and dietary constraints
// ABOUTME: Read-only for the whole run; supplied once per pipeline execution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

use serde::{Deserialize, Serialize};

/// Biological sex category used for resting-metabolism formula selection.
///
/// Only `Female` selects the female regression variant; every other value
/// (male, nonbinary, unspecified) uses the male variant as a conservative
/// default equation. This is a policy choice about formula selection, not an
/// assumption about identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    /// Male regression variant
    Male,
    /// Female regression variant
    Female,
    /// Any other value; uses the male variant
    Other,
}

impl Sex {
    /// Parse a sex string leniently; never fails
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "male" => Self::Male,
            "female" => Self::Female,
            _ => Self::Other,
        }
    }
}

/// Training goal driving caloric adjustment and protein factors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    /// Caloric balance
    Maintain,
    /// Caloric surplus
    Gain,
    /// Caloric deficit
    Cut,
}

impl Goal {
    /// Lowercase label as it appears in documents and rationale text
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Maintain => "maintain",
            Self::Gain => "gain",
            Self::Cut => "cut",
        }
    }
}

/// User identity, physiology, and operational constraints.
///
/// Supplied once per run and read-only throughout. `weight_kg > 0` is an
/// invariant; the macro engine substitutes a documented 75 kg fallback when
/// violated rather than failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable user identifier
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Age in years
    pub age: u32,
    /// Sex string from the intake document; parsed leniently at use sites
    pub sex: String,
    /// Height in centimeters
    pub height_cm: f64,
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Training goal
    pub goal: Goal,
    /// Body fat percentage; enables the body-composition-aware RMR formula
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat_pct: Option<f64>,
    /// Physical Activity Level multiplier for non-training energy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pal_value: Option<f64>,
    /// Ingredients/dishes the user wants avoided
    #[serde(default)]
    pub avoid_list: Vec<String>,
    /// Allergy terms; violations are QA-blocking
    #[serde(default)]
    pub allergies: Vec<String>,
    /// Free-form dietary preferences passed to the recipe collaborator
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
    /// Maximum cooking time in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_time_max_min: Option<u32>,
    /// Budget level hint for the grocery collaborator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_level: Option<String>,
}

impl UserProfile {
    /// Sex parsed for formula selection
    #[must_use]
    pub fn sex_category(&self) -> Sex {
        Sex::from_str_lossy(&self.sex)
    }

    /// All restricted terms (avoid list + allergies), lowercased
    #[must_use]
    pub fn restricted_terms(&self) -> Vec<String> {
        self.avoid_list
            .iter()
            .chain(self.allergies.iter())
            .map(|s| s.to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sex_parses_leniently() {
        assert_eq!(Sex::from_str_lossy("Female"), Sex::Female);
        assert_eq!(Sex::from_str_lossy("MALE"), Sex::Male);
        assert_eq!(Sex::from_str_lossy("nonbinary"), Sex::Other);
        assert_eq!(Sex::from_str_lossy(""), Sex::Other);
    }

    #[test]
    fn restricted_terms_merge_and_lowercase() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "user_id": "u1",
            "name": "Casey",
            "age": 38,
            "sex": "female",
            "height_cm": 170.0,
            "weight_kg": 64.0,
            "goal": "maintain",
            "avoid_list": ["Cilantro"],
            "allergies": ["Shellfish"]
        }))
        .unwrap();
        assert_eq!(profile.restricted_terms(), vec!["cilantro", "shellfish"]);
    }
}
