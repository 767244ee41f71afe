// ABOUTME: Macro target engine - RMR/TDEE estimation, goal adjustment, macro allocation
// ABOUTME: Advisory computation: every missing input degrades to a documented default
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

//! Macro Target Engine
//!
//! Computes one validated `{kcal, protein_g, carbs_g, fat_g}` target per
//! scheduled day. The chain is: resting-metabolism estimate → total-energy
//! estimate → goal adjustment → fat allocation → protein allocation →
//! carbohydrate fill-then-validate → final kcal recompute.
//!
//! The engine never fails; macro computation is advisory, not
//! safety-critical, so missing or implausible inputs degrade to the
//! documented defaults in [`NutritionConfig`].
//!
//! # Scientific References
//!
//! - Cunningham, J.J. (1980). A reanalysis of the factors influencing basal
//!   metabolic rate in normal adults. RMR = 22 × FFM + 500.
//! - Harris, J.A., & Benedict, F.G. (1919). A biometric study of basal
//!   metabolism in man.
//! - Phillips, S.M., & Van Loon, L.J. (2011). Dietary protein for athletes.
//!   DOI: 10.1080/02640414.2011.619204
//! - Burke, L.M., et al. (2011). Carbohydrates for training and competition.
//!   DOI: 10.1080/02640414.2011.585473

use chrono::NaiveDate;

use crate::config::{MacronutrientConfig, NutritionConfig, RmrConfig, WeekTierConfig};
use crate::models::{DayTarget, DayType, Goal, Sex, UserProfile, WeekTier};

/// Caloric density of fat, kcal per gram
pub const KCAL_PER_G_FAT: f64 = 9.0;
/// Caloric density of carbohydrate, kcal per gram
pub const KCAL_PER_G_CARB: f64 = 4.0;
/// Caloric density of protein, kcal per gram
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;

/// Hours per day, for MET-based training energy
const HOURS_PER_DAY: f64 = 24.0;

/// Effective body weight: the profile's weight when positive and finite,
/// else the documented fallback.
fn effective_weight(profile: &UserProfile, config: &RmrConfig) -> f64 {
    if profile.weight_kg.is_finite() && profile.weight_kg > 0.0 {
        profile.weight_kg
    } else {
        config.fallback_weight_kg
    }
}

/// Estimate resting energy expenditure from the profile.
///
/// Prefers the Cunningham equation when body-fat percentage is known and
/// plausible; falls back to the Harris-Benedict regression selected by sex
/// (female variant for "female", male variant for all other values - a
/// conservative formula-selection policy). Returns `None` when neither path
/// has usable inputs; callers then use the flat per-kilogram heuristic.
#[must_use]
pub fn estimate_rmr(profile: &UserProfile, config: &RmrConfig) -> Option<f64> {
    if !(profile.weight_kg.is_finite() && profile.weight_kg > 0.0) {
        return None;
    }
    let weight = profile.weight_kg;

    if let Some(bf) = profile.body_fat_pct {
        if bf > config.body_fat_plausible_min && bf < config.body_fat_plausible_max {
            let ffm = weight * (1.0 - bf / 100.0);
            return Some(config.cunningham_ffm_coef * ffm + config.cunningham_constant);
        }
    }

    if profile.height_cm > 0.0 && profile.age > 0 {
        let age = f64::from(profile.age);
        let bmr = match profile.sex_category() {
            Sex::Female => {
                config.hb_female_constant
                    + config.hb_female_weight_coef * weight
                    + config.hb_female_height_coef * profile.height_cm
                    + config.hb_female_age_coef * age
            }
            Sex::Male | Sex::Other => {
                config.hb_male_constant
                    + config.hb_male_weight_coef * weight
                    + config.hb_male_height_coef * profile.height_cm
                    + config.hb_male_age_coef * age
            }
        };
        return Some(bmr);
    }

    None
}

/// Estimate total daily energy expenditure for a day type.
///
/// TDEE = RMR × PAL (non-training component) + training energy keyed by day
/// type using a MET × duration heuristic
/// (energy ≈ RMR × MET × duration / 24). Returns `None` when RMR cannot be
/// estimated.
#[must_use]
pub fn estimate_tdee(
    profile: &UserProfile,
    day_type: DayType,
    config: &NutritionConfig,
) -> Option<f64> {
    let rmr = estimate_rmr(profile, &config.rmr)?;

    let activity = &config.activity;
    let pal = match profile.pal_value {
        Some(p) if (activity.pal_min..=activity.pal_max).contains(&p) => p,
        _ => activity.pal_default,
    };

    let non_training = rmr * pal;
    let training_kcal = match day_type {
        DayType::High => rmr * activity.high_met * (activity.high_duration_hr / HOURS_PER_DAY),
        DayType::Training => {
            rmr * activity.training_met * (activity.training_duration_hr / HOURS_PER_DAY)
        }
        DayType::Rest => 0.0,
    };

    Some((non_training + training_kcal).round())
}

/// Determine the week intensity tier from the classified 7-day schedule.
///
/// ≥3 high days → peak. Else ≥4 rest days → recovery. Else 0 high days →
/// base. Else → build. Must be computed once per week and shared across all
/// seven day-target calls so carbohydrate positioning is consistent.
#[must_use]
pub fn week_intensity_tier(day_types: &[DayType], config: &WeekTierConfig) -> WeekTier {
    if day_types.is_empty() {
        return WeekTier::Build;
    }
    let high_count = day_types.iter().filter(|d| **d == DayType::High).count();
    let rest_count = day_types.iter().filter(|d| **d == DayType::Rest).count();

    if high_count >= config.peak_high_days {
        WeekTier::Peak
    } else if rest_count >= config.recovery_rest_days {
        WeekTier::Recovery
    } else if high_count == 0 {
        WeekTier::Base
    } else {
        WeekTier::Build
    }
}

/// Tier-biased carbohydrate target within the day-type range, g/kg.
///
/// `lo + (hi - lo) × position`: peak weeks sit in the upper portion of the
/// range, recovery weeks in the lower portion.
#[must_use]
pub fn carb_position_g_per_kg(
    day_type: DayType,
    tier: WeekTier,
    macros: &MacronutrientConfig,
    tier_config: &WeekTierConfig,
) -> f64 {
    let (lo, hi) = macros.carb_range(day_type);
    lo + (hi - lo) * tier_config.position(tier)
}

/// Compute the validated daily macro target for one scheduled day.
///
/// Calculation chain:
/// 1. Total daily kcal from TDEE (or the flat per-kg heuristic when the
///    resting estimate is undefined).
/// 2. Goal-based caloric adjustment - a fixed deficit on cut with a
///    per-kilogram energy floor, a fixed surplus on gain.
/// 3. Fat allocated at the default fraction of total kcal.
/// 4. Protein from weight × (day type, goal) factor, with the masters-age
///    adjustment and both absolute floors applied.
/// 5. Carbohydrate fills the remaining energy budget.
/// 6. Carb validation against the day-type g/kg range: a shortfall re-runs
///    the fat allocation at the floor fraction; an excess is capped at the
///    range top (the excess energy is deliberately left unallocated - known
///    slack in the energy balance, not a bug). A tier-positioned target
///    inside the range then takes precedence over the range-valid fill.
/// 7. Final kcal is the literal sum of the three macros at their caloric
///    densities - not the step-2 estimate.
#[must_use]
pub fn compute_day_target(
    date: NaiveDate,
    day_type: DayType,
    profile: &UserProfile,
    tier: WeekTier,
    config: &NutritionConfig,
) -> DayTarget {
    let macros = &config.macros;
    let weight = effective_weight(profile, &config.rmr);
    let goal = profile.goal;

    // Step 1: total daily kcal
    let mut tdee = estimate_tdee(profile, day_type, config).unwrap_or_else(|| {
        let mut base = (weight * config.activity.flat_base_kcal_per_kg).round();
        match day_type {
            DayType::High => base += config.activity.flat_high_bonus_kcal,
            DayType::Rest => base -= config.activity.flat_rest_reduction_kcal,
            DayType::Training => {}
        }
        base
    });

    // Step 2: goal adjustment
    match goal {
        Goal::Cut => {
            let floor = (weight * macros.cut_floor_kcal_per_kg).round();
            tdee = (tdee - macros.deficit_cut_kcal).max(floor);
        }
        Goal::Gain => tdee += macros.surplus_gain_kcal,
        Goal::Maintain => {}
    }
    let total_kcal = tdee.round();

    // Step 3: fat allocation
    let mut fat_kcal = total_kcal * macros.fat_fraction_default;
    let mut fat_g = (fat_kcal / KCAL_PER_G_FAT).round();

    // Step 4: protein
    let mut protein_factor = macros.protein_factor(day_type, goal);
    if profile.age >= macros.protein_age_threshold {
        protein_factor = (protein_factor + macros.protein_age_bump).min(macros.protein_factor_cap);
    }
    let protein_computed = (weight * protein_factor).round();
    let protein_floor = (weight * macros.protein_floor_g_per_kg).round();
    let protein_g = protein_computed.max(protein_floor).max(macros.protein_floor_g);

    // Step 5: carbs from the remaining budget
    let mut remaining_g = (total_kcal - fat_kcal) / KCAL_PER_G_CARB;
    let mut carbs_g = (remaining_g - protein_g).round();

    // Step 6: validate against the day-type g/kg range
    let (lo_g_per_kg, hi_g_per_kg) = macros.carb_range(day_type);
    let lo_carbs = (weight * lo_g_per_kg).round();
    let hi_carbs = (weight * hi_g_per_kg).round();
    let target_carbs =
        (weight * carb_position_g_per_kg(day_type, tier, macros, &config.week_tier)).round();

    if carbs_g < lo_carbs {
        // Not enough carb budget: drop fat to the floor fraction to free energy
        fat_kcal = total_kcal * macros.fat_fraction_floor;
        fat_g = (fat_kcal / KCAL_PER_G_FAT).round();
        remaining_g = (total_kcal - fat_kcal) / KCAL_PER_G_CARB;
        carbs_g = (remaining_g - protein_g).round().max(lo_carbs);
    } else if carbs_g > hi_carbs {
        carbs_g = hi_carbs;
    }

    // Snap to the tier-positioned target whenever it is itself range-valid;
    // the snap takes precedence over the range-valid fill.
    if (lo_carbs..=hi_carbs).contains(&target_carbs) {
        carbs_g = target_carbs;
    }

    // Step 7: kcal recomputed from the final grams
    let kcal =
        carbs_g * KCAL_PER_G_CARB + protein_g * KCAL_PER_G_PROTEIN + fat_g * KCAL_PER_G_FAT;

    DayTarget {
        date,
        day_type,
        kcal: kcal.round() as u32,
        protein_g: protein_g as u32,
        carbs_g: carbs_g as u32,
        fat_g: fat_g as u32,
    }
}

/// Compute targets for all seven days of a classified schedule.
///
/// The week tier is derived once from the full schedule and shared across
/// every per-day call.
#[must_use]
pub fn targets_for_week(
    classified: &[(NaiveDate, DayType)],
    profile: &UserProfile,
    config: &NutritionConfig,
) -> Vec<DayTarget> {
    let day_types: Vec<DayType> = classified.iter().map(|(_, t)| *t).collect();
    let tier = week_intensity_tier(&day_types, &config.week_tier);
    classified
        .iter()
        .map(|(date, day_type)| compute_day_target(*date, *day_type, profile, tier, config))
        .collect()
}
