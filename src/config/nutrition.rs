// ABOUTME: Nutrition engine configuration - RMR formulas, activity model, macro allocation policy
// ABOUTME: Defaults carry the documented constants; validate() guards hand-edited overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

//! Macro Target Engine Configuration
//!
//! Every constant the engine uses lives here as a `Default` impl, so the
//! numbers are inspectable and overridable without touching the algorithm.
//!
//! # Scientific References
//!
//! - RMR (body-composition-aware): Cunningham (1980),
//!   `RMR = 22 × FFM + 500`
//! - BMR (regression fallback): Harris & Benedict (1919), sex-specific
//!   coefficients
//! - Protein: Phillips & Van Loon (2011) DOI: 10.1080/02640414.2011.619204
//! - Carbohydrate periodization: Burke et al. (2011)
//!   DOI: 10.1080/02640414.2011.585473

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::{DayType, Goal, WeekTier};

/// Complete nutrition engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NutritionConfig {
    /// Resting-metabolism estimation settings
    pub rmr: RmrConfig,
    /// Activity/energy-expenditure model settings
    pub activity: ActivityModelConfig,
    /// Macronutrient allocation policy
    pub macros: MacronutrientConfig,
    /// Week intensity tier thresholds and carb positioning
    pub week_tier: WeekTierConfig,
}

impl NutritionConfig {
    /// Validate all sub-configurations
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any constant is outside its valid domain.
    pub fn validate(&self) -> AppResult<()> {
        self.activity.validate()?;
        self.macros.validate()?;
        self.week_tier.validate()
    }
}

/// RMR/BMR estimation configuration.
///
/// The Cunningham equation is preferred when body-fat percentage is known
/// and plausible; otherwise the Harris-Benedict regression is selected by
/// sex (female variant for "female", male variant for everything else as a
/// conservative default equation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RmrConfig {
    /// Cunningham fat-free-mass coefficient: 22.0
    pub cunningham_ffm_coef: f64,
    /// Cunningham constant term: 500.0
    pub cunningham_constant: f64,
    /// Body-fat % must exceed this (exclusive) for Cunningham: 3.0
    pub body_fat_plausible_min: f64,
    /// Body-fat % must be below this (exclusive) for Cunningham: 60.0
    pub body_fat_plausible_max: f64,
    /// Harris-Benedict female constant: 655.0955
    pub hb_female_constant: f64,
    /// Harris-Benedict female weight coefficient: 9.5634
    pub hb_female_weight_coef: f64,
    /// Harris-Benedict female height coefficient: 1.8496
    pub hb_female_height_coef: f64,
    /// Harris-Benedict female age coefficient: -4.6756
    pub hb_female_age_coef: f64,
    /// Harris-Benedict male constant: 66.473
    pub hb_male_constant: f64,
    /// Harris-Benedict male weight coefficient: 13.7516
    pub hb_male_weight_coef: f64,
    /// Harris-Benedict male height coefficient: 5.0033
    pub hb_male_height_coef: f64,
    /// Harris-Benedict male age coefficient: -6.755
    pub hb_male_age_coef: f64,
    /// Substitute weight when the profile's weight is missing/non-positive: 75.0
    pub fallback_weight_kg: f64,
}

impl Default for RmrConfig {
    fn default() -> Self {
        Self {
            cunningham_ffm_coef: 22.0,
            cunningham_constant: 500.0,
            body_fat_plausible_min: 3.0,
            body_fat_plausible_max: 60.0,
            hb_female_constant: 655.0955,
            hb_female_weight_coef: 9.5634,
            hb_female_height_coef: 1.8496,
            hb_female_age_coef: -4.6756,
            hb_male_constant: 66.473,
            hb_male_weight_coef: 13.7516,
            hb_male_height_coef: 5.0033,
            hb_male_age_coef: -6.755,
            fallback_weight_kg: 75.0,
        }
    }
}

/// Activity model for total-energy estimation.
///
/// TDEE = RMR × PAL + a day-type training increment estimated from MET
/// values (energy ≈ RMR × MET × duration/24). When RMR is undefined the
/// engine falls back to a flat per-kilogram heuristic adjusted by day type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityModelConfig {
    /// Default PAL when missing/invalid (desk job + light walking): 1.55
    pub pal_default: f64,
    /// Lowest accepted PAL: 1.0
    pub pal_min: f64,
    /// Highest accepted PAL: 3.0
    pub pal_max: f64,
    /// MET for high days (interval/long session midpoint): 10.0
    pub high_met: f64,
    /// Assumed high-day session duration, hours: 2.0
    pub high_duration_hr: f64,
    /// MET for standard training days (zone-2 endurance): 8.0
    pub training_met: f64,
    /// Assumed training-day session duration, hours: 1.5
    pub training_duration_hr: f64,
    /// Flat heuristic base when RMR is undefined, kcal/kg/day: 33.0
    pub flat_base_kcal_per_kg: f64,
    /// Flat heuristic high-day increment, kcal: 400.0
    pub flat_high_bonus_kcal: f64,
    /// Flat heuristic rest-day reduction, kcal: 200.0
    pub flat_rest_reduction_kcal: f64,
}

impl Default for ActivityModelConfig {
    fn default() -> Self {
        Self {
            pal_default: 1.55,
            pal_min: 1.0,
            pal_max: 3.0,
            high_met: 10.0,
            high_duration_hr: 2.0,
            training_met: 8.0,
            training_duration_hr: 1.5,
            flat_base_kcal_per_kg: 33.0,
            flat_high_bonus_kcal: 400.0,
            flat_rest_reduction_kcal: 200.0,
        }
    }
}

impl ActivityModelConfig {
    /// Validate PAL bounds ordering
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the PAL bounds are inverted or the default
    /// falls outside them.
    pub fn validate(&self) -> AppResult<()> {
        if self.pal_min >= self.pal_max {
            return Err(AppError::config(format!(
                "pal_min ({}) must be below pal_max ({})",
                self.pal_min, self.pal_max
            )));
        }
        if !(self.pal_min..=self.pal_max).contains(&self.pal_default) {
            return Err(AppError::config(format!(
                "pal_default ({}) outside [{}, {}]",
                self.pal_default, self.pal_min, self.pal_max
            )));
        }
        Ok(())
    }
}

/// Macronutrient allocation policy.
///
/// Protein factors are a total table over (day type, goal) - rest days carry
/// a higher factor than training/high days for a given goal, reflecting the
/// recovery-synthesis policy. Carb g/kg ranges come from the periodization
/// tables; positions inside the range are chosen by the week tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacronutrientConfig {
    /// Fat allocation as fraction of total kcal: 0.25
    pub fat_fraction_default: f64,
    /// Fat floor fraction used when the carb budget is tight: 0.20
    pub fat_fraction_floor: f64,
    /// Protein g/kg, high day / maintain: 1.4
    pub protein_high_maintain: f64,
    /// Protein g/kg, high day / gain: 1.8
    pub protein_high_gain: f64,
    /// Protein g/kg, high day / cut: 2.0
    pub protein_high_cut: f64,
    /// Protein g/kg, training day / maintain: 1.6
    pub protein_training_maintain: f64,
    /// Protein g/kg, training day / gain: 1.8
    pub protein_training_gain: f64,
    /// Protein g/kg, training day / cut: 2.0
    pub protein_training_cut: f64,
    /// Protein g/kg, rest day / maintain: 1.8
    pub protein_rest_maintain: f64,
    /// Protein g/kg, rest day / gain: 1.8
    pub protein_rest_gain: f64,
    /// Protein g/kg, rest day / cut: 2.0
    pub protein_rest_cut: f64,
    /// Age at which the masters adjustment applies: 40
    pub protein_age_threshold: u32,
    /// Masters adjustment added to the factor: 0.2
    pub protein_age_bump: f64,
    /// Cap on the adjusted factor: 2.3
    pub protein_factor_cap: f64,
    /// Absolute protein floor, g/kg: 1.6
    pub protein_floor_g_per_kg: f64,
    /// Absolute protein floor, grams: 120.0
    pub protein_floor_g: f64,
    /// Carb range low, high day, g/kg: 6.0
    pub carbs_high_lo: f64,
    /// Carb range high, high day, g/kg: 12.0
    pub carbs_high_hi: f64,
    /// Carb range low, training day, g/kg: 5.0
    pub carbs_training_lo: f64,
    /// Carb range high, training day, g/kg: 7.0
    pub carbs_training_hi: f64,
    /// Carb range low, rest day, g/kg: 3.0
    pub carbs_rest_lo: f64,
    /// Carb range high, rest day, g/kg: 5.0
    pub carbs_rest_hi: f64,
    /// Caloric deficit on cut, kcal/day: 300.0
    pub deficit_cut_kcal: f64,
    /// Energy floor on cut, kcal/kg: 28.0
    pub cut_floor_kcal_per_kg: f64,
    /// Caloric surplus on gain, kcal/day: 200.0
    pub surplus_gain_kcal: f64,
}

impl Default for MacronutrientConfig {
    fn default() -> Self {
        Self {
            fat_fraction_default: 0.25,
            fat_fraction_floor: 0.20,
            protein_high_maintain: 1.4,
            protein_high_gain: 1.8,
            protein_high_cut: 2.0,
            protein_training_maintain: 1.6,
            protein_training_gain: 1.8,
            protein_training_cut: 2.0,
            protein_rest_maintain: 1.8,
            protein_rest_gain: 1.8,
            protein_rest_cut: 2.0,
            protein_age_threshold: 40,
            protein_age_bump: 0.2,
            protein_factor_cap: 2.3,
            protein_floor_g_per_kg: 1.6,
            protein_floor_g: 120.0,
            carbs_high_lo: 6.0,
            carbs_high_hi: 12.0,
            carbs_training_lo: 5.0,
            carbs_training_hi: 7.0,
            carbs_rest_lo: 3.0,
            carbs_rest_hi: 5.0,
            deficit_cut_kcal: 300.0,
            cut_floor_kcal_per_kg: 28.0,
            surplus_gain_kcal: 200.0,
        }
    }
}

impl MacronutrientConfig {
    /// Protein factor (g/kg) for a day type and goal.
    ///
    /// The table is total over both enum domains, so no miss policy is
    /// needed at this level.
    #[must_use]
    pub const fn protein_factor(&self, day_type: DayType, goal: Goal) -> f64 {
        match (day_type, goal) {
            (DayType::High, Goal::Maintain) => self.protein_high_maintain,
            (DayType::High, Goal::Gain) => self.protein_high_gain,
            (DayType::High, Goal::Cut) => self.protein_high_cut,
            (DayType::Training, Goal::Maintain) => self.protein_training_maintain,
            (DayType::Training, Goal::Gain) => self.protein_training_gain,
            (DayType::Training, Goal::Cut) => self.protein_training_cut,
            (DayType::Rest, Goal::Maintain) => self.protein_rest_maintain,
            (DayType::Rest, Goal::Gain) => self.protein_rest_gain,
            (DayType::Rest, Goal::Cut) => self.protein_rest_cut,
        }
    }

    /// Valid carbohydrate range (g/kg) for a day type
    #[must_use]
    pub const fn carb_range(&self, day_type: DayType) -> (f64, f64) {
        match day_type {
            DayType::High => (self.carbs_high_lo, self.carbs_high_hi),
            DayType::Training => (self.carbs_training_lo, self.carbs_training_hi),
            DayType::Rest => (self.carbs_rest_lo, self.carbs_rest_hi),
        }
    }

    /// Validate fraction ordering and range ordering
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a fat fraction is outside (0, 1), the
    /// floor exceeds the default, or any carb range is inverted.
    pub fn validate(&self) -> AppResult<()> {
        for (name, value) in [
            ("fat_fraction_default", self.fat_fraction_default),
            ("fat_fraction_floor", self.fat_fraction_floor),
        ] {
            if !(0.0..1.0).contains(&value) || value <= 0.0 {
                return Err(AppError::config(format!(
                    "{name} must be within (0, 1), got {value}"
                )));
            }
        }
        if self.fat_fraction_floor > self.fat_fraction_default {
            return Err(AppError::config(
                "fat_fraction_floor must not exceed fat_fraction_default",
            ));
        }
        for (name, lo, hi) in [
            ("high", self.carbs_high_lo, self.carbs_high_hi),
            ("training", self.carbs_training_lo, self.carbs_training_hi),
            ("rest", self.carbs_rest_lo, self.carbs_rest_hi),
        ] {
            if lo >= hi {
                return Err(AppError::config(format!(
                    "carb range for {name} days is inverted: ({lo}, {hi})"
                )));
            }
        }
        Ok(())
    }
}

/// Week intensity tier thresholds and in-range carbohydrate positions.
///
/// One sitewide tier value biases every day in the week - intentional
/// coupling, even when a recovery week contains a high day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekTierConfig {
    /// High days at/above this count → peak week: 3
    pub peak_high_days: usize,
    /// Rest days at/above this count → recovery week: 4
    pub recovery_rest_days: usize,
    /// Carb position within range on peak weeks: 0.75
    pub position_peak: f64,
    /// Carb position within range on build weeks: 0.55
    pub position_build: f64,
    /// Carb position within range on base weeks: 0.45
    pub position_base: f64,
    /// Carb position within range on recovery weeks: 0.30
    pub position_recovery: f64,
}

impl Default for WeekTierConfig {
    fn default() -> Self {
        Self {
            peak_high_days: 3,
            recovery_rest_days: 4,
            position_peak: 0.75,
            position_build: 0.55,
            position_base: 0.45,
            position_recovery: 0.30,
        }
    }
}

impl WeekTierConfig {
    /// Carb position within the day-type range for a week tier
    #[must_use]
    pub const fn position(&self, tier: WeekTier) -> f64 {
        match tier {
            WeekTier::Peak => self.position_peak,
            WeekTier::Build => self.position_build,
            WeekTier::Base => self.position_base,
            WeekTier::Recovery => self.position_recovery,
        }
    }

    /// Validate position bounds
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any tier position falls outside [0, 1].
    pub fn validate(&self) -> AppResult<()> {
        for (name, value) in [
            ("position_peak", self.position_peak),
            ("position_build", self.position_build),
            ("position_base", self.position_base),
            ("position_recovery", self.position_recovery),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AppError::config(format!(
                    "{name} must be between 0.0 and 1.0, got {value}"
                )));
            }
        }
        Ok(())
    }
}
