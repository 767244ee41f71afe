// ABOUTME: Attached recipe records returned by the recipe collaborator
// ABOUTME: One record per submitted meal identifier, carrying ingredients and macros
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::context::DayType;
use super::plan::MealSlot;

/// Estimated macros for one recipe serving
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RecipeMacros {
    /// Energy, kcal
    #[serde(default)]
    pub kcal: f64,
    /// Protein grams
    #[serde(default)]
    pub protein_g: f64,
    /// Carbohydrate grams
    #[serde(default)]
    pub carbs_g: f64,
    /// Fat grams
    #[serde(default)]
    pub fat_g: f64,
}

/// One ingredient reference within a recipe.
///
/// Shape-compatible with [`super::grocery::RawGroceryItem`]; the grocery
/// build stage flattens these without interpretation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// Ingredient name as written by the recipe source
    pub name: String,
    /// Quantity in `unit`
    pub quantity: f64,
    /// Unit token (g, ml, tbsp, count, ...)
    pub unit: String,
    /// Grocery category hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Recipe record attached to one meal identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachedRecipe {
    /// Meal identifier this recipe fulfills
    pub meal_id: String,
    /// Meal date
    pub date: NaiveDate,
    /// Day type of the meal's date
    pub day_type: DayType,
    /// Meal slot
    pub slot: MealSlot,
    /// Recipe display name
    pub name: String,
    /// Link to the full recipe; absent for simple builds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_link: Option<String>,
    /// Dinner shared across multiple days
    #[serde(default)]
    pub batch_cook: bool,
    /// Up to five headline ingredients
    #[serde(default)]
    pub key_ingredients: Vec<String>,
    /// Full ingredient list
    pub ingredients: Vec<RecipeIngredient>,
    /// Estimated macros
    #[serde(default)]
    pub macros: RecipeMacros,
    /// Substitution note when the source swapped something out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitution_note: Option<String>,
}
