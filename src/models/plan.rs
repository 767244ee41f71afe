// ABOUTME: Plan intent artifact - day targets, week tier, meal identifiers, macro plan
// ABOUTME: Atomic outputs of the macro target engine and the plan-intent stage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::context::DayType;

/// Week-level intensity tier derived from the distribution of day types.
///
/// Computed once per week and shared across all seven day-target calls so
/// carbohydrate positioning is consistent within the week.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeekTier {
    /// ≥3 high-intensity days
    Peak,
    /// Mixed week with some intensity
    Build,
    /// No high-intensity days
    Base,
    /// ≥4 rest days
    Recovery,
}

impl WeekTier {
    /// Lowercase label as written in artifacts
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Peak => "peak",
            Self::Build => "build",
            Self::Base => "base",
            Self::Recovery => "recovery",
        }
    }
}

/// Meal slot within a day; four slots per day, 28 meal identifiers per week
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MealSlot {
    /// First meal
    Breakfast,
    /// Midday meal
    Lunch,
    /// Evening meal
    Dinner,
    /// Between-meal snack
    Snack,
}

impl MealSlot {
    /// All slots in identifier order
    pub const ALL: [Self; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

    /// Title-case label used in meal identifiers ("D3_Dinner")
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snack => "Snack",
        }
    }

    /// Lowercase label used in digest/meal-structure text
    #[must_use]
    pub const fn as_lower(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }
}

/// Stable key correlating plan intent, recipe attachment, and grocery
/// derivation: one per (day × slot).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealId {
    /// Identifier string, `D{n}_{Slot}` with n in 1..=7
    pub meal_id: String,
    /// Calendar date of the meal
    pub date: NaiveDate,
    /// Slot within the day
    pub slot: MealSlot,
    /// Day type of the meal's date
    pub day_type: DayType,
}

/// Validated daily macro target; the atomic output of the macro engine.
///
/// Invariant: all four values > 0 and
/// `kcal == 4*protein_g + 4*carbs_g + 9*fat_g` exactly (post-rounding).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DayTarget {
    /// Calendar date
    pub date: NaiveDate,
    /// Day type the target was computed for
    pub day_type: DayType,
    /// Total energy, recomputed from the final macro grams
    pub kcal: u32,
    /// Protein grams
    pub protein_g: u32,
    /// Carbohydrate grams
    pub carbs_g: u32,
    /// Fat grams
    pub fat_g: u32,
}

/// Week-level macro averages declared in the plan intent
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacroPlan {
    /// Mean kcal across all seven days
    pub daily_avg_kcal: u32,
    /// Mean protein grams across all seven days
    pub protein_g: u32,
    /// Mean carb grams across training + high days
    pub carbs_g_training: u32,
    /// Mean carb grams across rest days
    pub carbs_g_rest: u32,
    /// Mean fat grams across all seven days
    pub fat_g: u32,
}

/// Dates partitioned by day type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayTypePartition {
    /// Standard training dates
    pub training_days: Vec<NaiveDate>,
    /// High-intensity dates
    pub high_days: Vec<NaiveDate>,
    /// Rest dates
    pub rest_days: Vec<NaiveDate>,
}

/// Per-slot meal guidance text for one day type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotGuidance {
    /// Breakfast guidance
    pub breakfast: String,
    /// Lunch guidance
    pub lunch: String,
    /// Dinner guidance
    pub dinner: String,
    /// Snack guidance
    pub snack: String,
}

/// Meal structure guidance keyed by day type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealStructure {
    /// Guidance for training days
    pub training_day: SlotGuidance,
    /// Guidance for high-intensity days
    pub high_day: SlotGuidance,
    /// Guidance for rest days
    pub rest_day: SlotGuidance,
}

/// The plan-intent artifact: the contract handed to the recipe collaborator
/// and the source of truth for downstream macro checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanIntent {
    /// Monday of the planned week
    pub week_start: NaiveDate,
    /// Week-level macro averages
    pub macro_plan: MacroPlan,
    /// Dates partitioned by day type
    pub day_types: DayTypePartition,
    /// Per-day-type meal guidance
    pub meal_structure: MealStructure,
    /// Rationale bullets tied to this week's signals (4–8)
    pub rationale: Vec<String>,
    /// The 28-entry meal identifier table
    pub meal_ids: Vec<MealId>,
    /// User-visible list of defaults applied during validation
    pub defaults_applied: Vec<String>,
    /// One validated target per schedule day
    pub per_day_targets: Vec<DayTarget>,
}
