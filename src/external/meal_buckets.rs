// ABOUTME: File-backed recipe source keyed by day type, plus the fixed placeholder set
// ABOUTME: Slot-prefix name match first, positional fallback - one recipe per meal id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::errors::AppResult;
use crate::models::{
    AttachedRecipe, DayType, MealSlot, PlanIntent, RecipeIngredient, RecipeMacros, UserProfile,
};

use super::RecipeSource;

/// One curated meal entry in a bucket file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealBucketEntry {
    /// Meal name; a "Slot:" prefix pins it to a slot
    pub name: String,
    /// Prep time hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Recipe link; absent for simple builds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_link: Option<String>,
    /// Ingredient list
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    /// Estimated macros
    #[serde(default)]
    pub macros: RecipeMacros,
}

/// Recipe source backed by day-type-keyed meal buckets.
///
/// Bucket keys are day-type labels ("rest"/"training"/"high"); each bucket
/// holds curated meals. Slot resolution tries an exact `"Slot:"` name-prefix
/// match first, then falls back to a positional index.
#[derive(Debug, Clone)]
pub struct BucketRecipeSource {
    buckets: HashMap<String, Vec<MealBucketEntry>>,
}

/// Positional index per slot when no name-prefix match exists
const fn slot_index(slot: MealSlot) -> usize {
    match slot {
        MealSlot::Breakfast => 0,
        MealSlot::Lunch => 1,
        MealSlot::Snack => 2,
        MealSlot::Dinner => 3,
    }
}

impl BucketRecipeSource {
    /// Load buckets from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error when the file is missing or malformed; callers fall
    /// back to [`BucketRecipeSource::placeholder`].
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let raw = fs::read_to_string(path)?;
        let buckets: HashMap<String, Vec<MealBucketEntry>> = serde_json::from_str(&raw)?;
        Ok(Self { buckets })
    }

    /// The fixed placeholder recipe set keyed by meal slot.
    ///
    /// Used whenever the real collaborator response is missing or
    /// malformed; every day type shares the same four simple builds.
    #[must_use]
    pub fn placeholder() -> Self {
        let ing = |name: &str, quantity: f64, unit: &str, category: &str| RecipeIngredient {
            name: name.to_owned(),
            quantity,
            unit: unit.to_owned(),
            category: Some(category.to_owned()),
        };
        let meals = vec![
            MealBucketEntry {
                name: "Breakfast: Greek Yogurt Oat Bowl".to_owned(),
                time: Some("5 min".to_owned()),
                recipe_link: None,
                ingredients: vec![
                    ing("greek yogurt", 200.0, "g", "dairy"),
                    ing("oats", 50.0, "g", "pantry"),
                    ing("blueberries", 80.0, "g", "produce"),
                ],
                macros: RecipeMacros {
                    kcal: 420.0,
                    protein_g: 30.0,
                    carbs_g: 55.0,
                    fat_g: 8.0,
                },
            },
            MealBucketEntry {
                name: "Lunch: Chicken Grain Bowl".to_owned(),
                time: Some("20 min".to_owned()),
                recipe_link: None,
                ingredients: vec![
                    ing("chicken breast", 150.0, "g", "protein"),
                    ing("rice", 90.0, "g", "pantry"),
                    ing("spinach", 60.0, "g", "produce"),
                    ing("olive oil", 1.0, "tbsp", "pantry"),
                ],
                macros: RecipeMacros {
                    kcal: 640.0,
                    protein_g: 48.0,
                    carbs_g: 75.0,
                    fat_g: 16.0,
                },
            },
            MealBucketEntry {
                name: "Snack: Apple & Peanut Butter".to_owned(),
                time: Some("2 min".to_owned()),
                recipe_link: None,
                ingredients: vec![
                    ing("apple", 1.0, "count", "produce"),
                    ing("peanut butter", 2.0, "tbsp", "pantry"),
                ],
                macros: RecipeMacros {
                    kcal: 280.0,
                    protein_g: 8.0,
                    carbs_g: 30.0,
                    fat_g: 16.0,
                },
            },
            MealBucketEntry {
                name: "Dinner: Salmon, Rice & Greens".to_owned(),
                time: Some("25 min".to_owned()),
                recipe_link: None,
                ingredients: vec![
                    ing("salmon", 180.0, "g", "protein"),
                    ing("rice", 90.0, "g", "pantry"),
                    ing("broccoli", 120.0, "g", "produce"),
                    ing("olive oil", 1.0, "tbsp", "pantry"),
                ],
                macros: RecipeMacros {
                    kcal: 720.0,
                    protein_g: 50.0,
                    carbs_g: 72.0,
                    fat_g: 24.0,
                },
            },
        ];
        let buckets = [
            DayType::Rest.as_str(),
            DayType::Training.as_str(),
            DayType::High.as_str(),
        ]
        .into_iter()
        .map(|k| (k.to_owned(), meals.clone()))
        .collect();
        Self { buckets }
    }

    /// Pick the meal for a slot: exact `"Slot:"` prefix match, then the
    /// positional fallback, then the first entry.
    fn pick(&self, day_type: DayType, slot: MealSlot) -> Option<&MealBucketEntry> {
        let bucket = self
            .buckets
            .get(day_type.as_str())
            .or_else(|| self.buckets.get(DayType::Training.as_str()))?;

        let prefix = format!("{}:", slot.as_str());
        if let Some(meal) = bucket.iter().find(|m| m.name.starts_with(&prefix)) {
            return Some(meal);
        }
        bucket.get(slot_index(slot)).or_else(|| bucket.first())
    }
}

impl RecipeSource for BucketRecipeSource {
    fn attach(&self, plan: &PlanIntent, _profile: &UserProfile) -> AppResult<Vec<AttachedRecipe>> {
        let mut recipes = Vec::with_capacity(plan.meal_ids.len());
        for meal in &plan.meal_ids {
            let Some(entry) = self.pick(meal.day_type, meal.slot) else {
                continue;
            };
            recipes.push(AttachedRecipe {
                meal_id: meal.meal_id.clone(),
                date: meal.date,
                day_type: meal.day_type,
                slot: meal.slot,
                name: entry.name.clone(),
                recipe_link: entry.recipe_link.clone(),
                batch_cook: false,
                key_ingredients: entry
                    .ingredients
                    .iter()
                    .take(5)
                    .map(|i| i.name.clone())
                    .collect(),
                ingredients: entry.ingredients.clone(),
                macros: entry.macros,
                substitution_note: None,
            });
        }
        Ok(recipes)
    }
}
