// ABOUTME: Recipe attachment stage - collaborator call, placeholder fallback, batch-cook marking
// ABOUTME: Guarantees one recipe per meal identifier regardless of collaborator health
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

use std::collections::HashMap;

use tracing::warn;

use crate::external::{BucketRecipeSource, RecipeSource};
use crate::models::{AttachedRecipe, MealSlot, PlanIntent, UserProfile};

use super::run_log::RunLog;

/// Attach one recipe per meal identifier.
///
/// The collaborator response is degraded-but-non-fatal: a failed call, or
/// any meal identifier left uncovered, falls back to the fixed placeholder
/// set keyed by meal slot, and the fallback is recorded in the run log.
/// Extra or duplicate responses are dropped (first per meal id wins, in
/// plan order).
#[must_use]
pub fn attach_recipes(
    plan: &PlanIntent,
    profile: &UserProfile,
    source: &dyn RecipeSource,
    run_log: &mut RunLog,
) -> Vec<AttachedRecipe> {
    let attached = match source.attach(plan, profile) {
        Ok(recipes) => recipes,
        Err(err) => {
            warn!(error = %err, "recipe source failed; using placeholder set");
            run_log.add_fallback(format!("recipe source failed ({err}); placeholder set used"));
            Vec::new()
        }
    };

    let mut by_id: HashMap<&str, &AttachedRecipe> = HashMap::new();
    for recipe in &attached {
        by_id.entry(recipe.meal_id.as_str()).or_insert(recipe);
    }

    let placeholder = BucketRecipeSource::placeholder();
    let placeholder_recipes = placeholder
        .attach(plan, profile)
        .unwrap_or_default();
    let placeholder_by_id: HashMap<&str, &AttachedRecipe> = placeholder_recipes
        .iter()
        .map(|r| (r.meal_id.as_str(), r))
        .collect();

    let mut missing = 0usize;
    let mut recipes: Vec<AttachedRecipe> = Vec::with_capacity(plan.meal_ids.len());
    for meal in &plan.meal_ids {
        if let Some(recipe) = by_id.get(meal.meal_id.as_str()) {
            recipes.push((*recipe).clone());
        } else if let Some(fallback) = placeholder_by_id.get(meal.meal_id.as_str()) {
            missing += 1;
            recipes.push((*fallback).clone());
        }
    }
    if missing > 0 {
        run_log.add_fallback(format!(
            "{missing} meal id(s) uncovered by the recipe source; placeholder recipes attached"
        ));
    }

    mark_batch_cook(&mut recipes);
    recipes
}

/// Mark dinners that share a recipe name across days as batch-cook
fn mark_batch_cook(recipes: &mut [AttachedRecipe]) {
    let mut dinner_counts: HashMap<String, usize> = HashMap::new();
    for recipe in recipes.iter() {
        if recipe.slot == MealSlot::Dinner {
            *dinner_counts.entry(recipe.name.clone()).or_insert(0) += 1;
        }
    }
    for recipe in recipes.iter_mut() {
        if recipe.slot == MealSlot::Dinner && dinner_counts.get(&recipe.name).copied() > Some(1) {
            recipe.batch_cook = true;
        }
    }
}

/// Render the recipes artifact as markdown
#[must_use]
pub fn recipes_to_markdown(recipes: &[AttachedRecipe]) -> String {
    let mut lines = vec!["# Recipes".to_owned(), String::new()];
    for r in recipes {
        let recipe_line = r.recipe_link.as_deref().map_or_else(
            || format!("- **Recipe:** Simple Build — {}", r.name),
            |link| format!("- **Recipe:** [{}]({})", r.name, link),
        );
        let source = r
            .recipe_link
            .as_deref()
            .and_then(link_domain)
            .unwrap_or_else(|| "simple build".to_owned());
        lines.push(format!("### {} — {}", r.meal_id, r.name));
        lines.push(format!("- **Date:** {}", r.date));
        lines.push(format!("- **Day Type:** {}", r.day_type.as_str()));
        lines.push(recipe_line);
        lines.push(format!("- **Source:** {source}"));
        lines.push(format!(
            "- **Batch-cook:** {}",
            if r.batch_cook { "yes" } else { "no" }
        ));
        lines.push(format!(
            "- **Estimated macros:** {:.0} kcal | P{:.0}g C{:.0}g F{:.0}g",
            r.macros.kcal, r.macros.protein_g, r.macros.carbs_g, r.macros.fat_g
        ));
        lines.push(format!(
            "- **Key ingredients:** {}",
            r.key_ingredients.join(", ")
        ));
        if let Some(note) = &r.substitution_note {
            lines.push(format!("- **Substitution note:** {note}"));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Domain component of a recipe link, for the Source line
fn link_domain(link: &str) -> Option<String> {
    let parts: Vec<&str> = link.split('/').collect();
    (parts.len() > 2).then(|| parts[2].to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use chrono::NaiveDate;

    struct FailingSource;
    impl RecipeSource for FailingSource {
        fn attach(
            &self,
            _plan: &PlanIntent,
            _profile: &UserProfile,
        ) -> crate::errors::AppResult<Vec<AttachedRecipe>> {
            Err(AppError::external_service("recipes", "timeout"))
        }
    }

    fn plan_with_week() -> PlanIntent {
        let start = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        crate::pipeline::plan_intent::build_plan_intent(
            &profile(),
            &crate::models::WeeklyContext {
                week_start: start,
                timezone: "UTC".into(),
                training_focus: "base".into(),
                schedule: (0..7)
                    .map(|i| crate::models::ScheduleDay {
                        date: start + chrono::Duration::days(i),
                        day_type: Some("training".into()),
                        notes: None,
                    })
                    .collect(),
            },
            &crate::models::OutcomeSignals::default(),
            vec![],
            &crate::config::NutritionConfig::default(),
        )
    }

    fn profile() -> UserProfile {
        serde_json::from_value(serde_json::json!({
            "user_id": "u1", "name": "Test", "age": 30, "sex": "male",
            "height_cm": 175.0, "weight_kg": 70.0, "goal": "maintain"
        }))
        .unwrap()
    }

    #[test]
    fn failed_source_falls_back_to_placeholders() {
        let plan = plan_with_week();
        let mut run_log = RunLog::new(plan.week_start);
        let recipes = attach_recipes(&plan, &profile(), &FailingSource, &mut run_log);
        assert_eq!(recipes.len(), 28);
        assert!(!run_log.fallbacks.is_empty());
    }

    #[test]
    fn shared_dinners_marked_batch_cook() {
        let plan = plan_with_week();
        let mut run_log = RunLog::new(plan.week_start);
        let recipes = attach_recipes(
            &plan,
            &profile(),
            &BucketRecipeSource::placeholder(),
            &mut run_log,
        );
        // Placeholder uses one dinner recipe for every day
        let dinners: Vec<_> = recipes
            .iter()
            .filter(|r| r.slot == MealSlot::Dinner)
            .collect();
        assert_eq!(dinners.len(), 7);
        assert!(dinners.iter().all(|r| r.batch_cook));
    }
}
