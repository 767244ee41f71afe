// ABOUTME: Deterministic intelligence engines - day classification and macro targeting
// ABOUTME: Pure, total functions over the profile and schedule; no I/O, no failure modes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

//! Planning intelligence: day-type classification and the macro target
//! engine. Both are total functions over realistic input - missing keys
//! degrade to documented defaults instead of raising.

/// Day-type classification from schedule entries
pub mod day_classifier;
/// Macro target computation (RMR → TDEE → goal → allocation)
pub mod targets;

pub use day_classifier::classify;
pub use targets::{
    carb_position_g_per_kg, compute_day_target, estimate_rmr, estimate_tdee, targets_for_week,
    week_intensity_tier,
};
