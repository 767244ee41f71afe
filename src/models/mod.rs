// ABOUTME: Domain models for the weekly nutrition planning pipeline
// ABOUTME: Profile, schedule, signals, plan, recipe, grocery, analytics, and QA types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

//! Domain data model.
//!
//! All input documents and pipeline artifacts are serde-derived types. Input
//! documents use snake_case field names matching the JSON files on disk;
//! artifacts are immutable once produced by their stage.

/// Advisory analytics types (plan modifications, feature table rows)
pub mod analytics;
/// Weekly schedule context and day typing
pub mod context;
/// Grocery items, raw and rolled up
pub mod grocery;
/// Plan intent, day targets, meal identifiers
pub mod plan;
/// User profile and goals
pub mod profile;
/// QA gate report types
pub mod qa;
/// Attached recipes and ingredients
pub mod recipe;
/// External wellness/nutrition/alcohol signal summaries
pub mod signals;

pub use analytics::{FeatureRow, PlanModification, PlanModifications};
pub use context::{DayType, ScheduleDay, WeeklyContext};
pub use grocery::{GroceryCsvRow, RawGroceryItem, RolledGroceryItem};
pub use plan::{
    DayTarget, DayTypePartition, MacroPlan, MealId, MealSlot, MealStructure, PlanIntent,
    SlotGuidance, WeekTier,
};
pub use profile::{Goal, Sex, UserProfile};
pub use qa::{QaCategory, QaIssue, QaReport, QaVerdict};
pub use recipe::{AttachedRecipe, RecipeIngredient, RecipeMacros};
pub use signals::{AlcoholSummary, NutritionLogSummary, OutcomeSignals, WellnessSummary};
