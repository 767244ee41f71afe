// ABOUTME: QA gate - deterministic rule engine over all produced artifacts
// ABOUTME: Blocking: coverage, constraints, modification, tone; advisory: macro, grocery, recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

//! Post-hoc acceptance test over the finished artifacts. Pure and
//! deterministic, no external calls. A FAIL verdict does not stop artifact
//! generation - all files are still written - but flips the process exit
//! code, signaling "do not act on this plan without review."

use std::collections::HashMap;

use crate::config::QaConfig;
use crate::models::{
    AttachedRecipe, GroceryCsvRow, PlanIntent, PlanModifications, QaCategory, QaIssue, QaReport,
    UserProfile,
};

/// Evaluate every QA rule and aggregate the verdict
#[must_use]
pub fn evaluate(
    profile: &UserProfile,
    plan: &PlanIntent,
    recipes: &[AttachedRecipe],
    csv_rows: &[GroceryCsvRow],
    digest: &str,
    modifications: &PlanModifications,
    config: &QaConfig,
) -> QaReport {
    let mut issues = Vec::new();

    check_coverage(digest, config, &mut issues);
    check_constraints(profile, recipes, &mut issues);
    check_macro_accuracy(plan, config, &mut issues);
    check_grocery(csv_rows, &mut issues);
    check_recipes(plan, recipes, config, &mut issues);
    check_modifications(plan, modifications, &mut issues);
    check_tone(digest, config, &mut issues);

    QaReport::from_issues(issues)
}

/// Coverage: every required section heading string-contained in the digest
fn check_coverage(digest: &str, config: &QaConfig, issues: &mut Vec<QaIssue>) {
    for section in &config.required_sections {
        if !digest.contains(section.as_str()) {
            issues.push(QaIssue::new(
                QaCategory::Coverage,
                format!("Missing section: {section}"),
            ));
        }
    }
}

/// Constraints: no recipe name contains an avoid-list or allergy term
fn check_constraints(profile: &UserProfile, recipes: &[AttachedRecipe], issues: &mut Vec<QaIssue>) {
    let restricted = profile.restricted_terms();
    if restricted.is_empty() {
        return;
    }
    for recipe in recipes {
        let name_lower = recipe.name.to_lowercase();
        for term in &restricted {
            if name_lower.contains(term.as_str()) {
                issues.push(QaIssue::new(
                    QaCategory::Constraints,
                    format!("Meal '{}' contains restricted item '{term}'", recipe.name),
                ));
            }
        }
    }
}

/// Macro accuracy: mean computed kcal within tolerance of the declared
/// daily average (advisory)
fn check_macro_accuracy(plan: &PlanIntent, config: &QaConfig, issues: &mut Vec<QaIssue>) {
    let per_day = &plan.per_day_targets;
    if per_day.is_empty() {
        return;
    }
    let target = f64::from(plan.macro_plan.daily_avg_kcal);
    if target <= 0.0 {
        return;
    }
    let actual = per_day.iter().map(|d| f64::from(d.kcal)).sum::<f64>() / per_day.len() as f64;
    let deviation = (actual - target).abs() / target;
    if deviation > config.kcal_tolerance {
        issues.push(QaIssue::new(
            QaCategory::Macro,
            format!(
                "Avg kcal deviation {:.1}% exceeds +-{:.0}% (target: {target:.0}, actual: {actual:.0})",
                deviation * 100.0,
                config.kcal_tolerance * 100.0
            ),
        ));
    }
}

/// Grocery completeness: non-blank names, positive quantities, populated
/// match confidence (advisory)
fn check_grocery(csv_rows: &[GroceryCsvRow], issues: &mut Vec<QaIssue>) {
    if csv_rows.is_empty() {
        issues.push(QaIssue::new(QaCategory::Grocery, "Grocery CSV has no rows"));
        return;
    }
    for row in csv_rows {
        if row.item_name.trim().is_empty() {
            issues.push(QaIssue::new(
                QaCategory::Grocery,
                format!("Blank item_name for {}", row.ingredient_id),
            ));
        }
        if row.match_confidence.trim().is_empty() {
            issues.push(QaIssue::new(
                QaCategory::Grocery,
                format!("Missing match_confidence for {}", row.item_name),
            ));
        }
        if row.quantity <= 0.0 || !row.quantity.is_finite() {
            issues.push(QaIssue::new(
                QaCategory::Grocery,
                format!(
                    "Non-positive quantity for {}: {}",
                    row.item_name, row.quantity
                ),
            ));
        }
    }
}

/// Recipe link quality: no placeholder domains; every submitted meal id has
/// exactly one recipe (advisory)
fn check_recipes(
    plan: &PlanIntent,
    recipes: &[AttachedRecipe],
    config: &QaConfig,
    issues: &mut Vec<QaIssue>,
) {
    for recipe in recipes {
        if let Some(link) = recipe.recipe_link.as_deref() {
            for domain in &config.placeholder_domains {
                if link.contains(domain.as_str()) {
                    issues.push(QaIssue::new(
                        QaCategory::Recipes,
                        format!("{}: placeholder {domain} URL", recipe.meal_id),
                    ));
                }
            }
        }
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for recipe in recipes {
        *counts.entry(recipe.meal_id.as_str()).or_insert(0) += 1;
    }
    for meal in &plan.meal_ids {
        match counts.get(meal.meal_id.as_str()).copied().unwrap_or(0) {
            0 => issues.push(QaIssue::new(
                QaCategory::Recipes,
                format!("{}: no recipe attached", meal.meal_id),
            )),
            1 => {}
            n => issues.push(QaIssue::new(
                QaCategory::Recipes,
                format!("{}: {n} recipes attached (expected exactly one)", meal.meal_id),
            )),
        }
    }
    if recipes.len() != config.expected_recipe_count {
        issues.push(QaIssue::new(
            QaCategory::Recipes,
            format!(
                "Expected {} recipes, got {}",
                config.expected_recipe_count,
                recipes.len()
            ),
        ));
    }
}

/// Modification audit: every applied modification must reference a meal id
/// present in the plan (blocking)
fn check_modifications(
    plan: &PlanIntent,
    modifications: &PlanModifications,
    issues: &mut Vec<QaIssue>,
) {
    if modifications.modifications.is_empty() {
        return;
    }
    let known: std::collections::HashSet<&str> =
        plan.meal_ids.iter().map(|m| m.meal_id.as_str()).collect();
    for m in &modifications.modifications {
        if !known.contains(m.meal_id.as_str()) {
            issues.push(QaIssue::new(
                QaCategory::Modification,
                format!("Modification references unknown meal_id: {}", m.meal_id),
            ));
        }
    }
}

/// Tone: no medical-claim or prescriptive phrases in the digest (blocking)
fn check_tone(digest: &str, config: &QaConfig, issues: &mut Vec<QaIssue>) {
    let digest_lower = digest.to_lowercase();
    for phrase in &config.medical_claim_phrases {
        if digest_lower.contains(phrase.as_str()) {
            issues.push(QaIssue::new(
                QaCategory::Tone,
                format!("Medical claim: '{phrase}'"),
            ));
        }
    }
    for phrase in &config.prescriptive_phrases {
        if digest_lower.contains(phrase.as_str()) {
            issues.push(QaIssue::new(
                QaCategory::Tone,
                format!("Prescriptive language: '{phrase}'"),
            ));
        }
    }
}

/// Render the QA report artifact as markdown
#[must_use]
pub fn report_to_markdown(
    report: &QaReport,
    digest: &str,
    recipes: &[AttachedRecipe],
    modifications: &PlanModifications,
    config: &QaConfig,
) -> String {
    let pf = |category: QaCategory| {
        if report.in_category(category).is_empty() {
            "PASS"
        } else {
            "FAIL"
        }
    };

    let mut lines = vec!["# QA Report".to_owned(), String::new(), "## Coverage Check".to_owned()];
    lines.push(format!(
        "- Subject line: {}",
        if digest.starts_with('#') { "PASS" } else { "FAIL" }
    ));
    for section in &config.required_sections {
        let label = section.trim_start_matches("## ");
        lines.push(format!(
            "- {label}: {}",
            if digest.contains(section.as_str()) {
                "PASS"
            } else {
                "FAIL"
            }
        ));
    }

    lines.push(String::new());
    lines.push("## Constraint Adherence".to_owned());
    lines.push(format!("- Restrictions honored: {}", pf(QaCategory::Constraints)));
    lines.push(format!(
        "- Allergies not violated: {}",
        pf(QaCategory::Constraints)
    ));
    for issue in report.in_category(QaCategory::Constraints) {
        lines.push(format!("  - {}", issue.message));
    }

    lines.push(String::new());
    lines.push("## Macro Accuracy".to_owned());
    lines.push(format!(
        "- Daily average within +-{:.0}% of targets: {}",
        config.kcal_tolerance * 100.0,
        pf(QaCategory::Macro)
    ));
    for issue in report.in_category(QaCategory::Macro) {
        lines.push(format!("  - {}", issue.message));
    }

    lines.push(String::new());
    lines.push("## Grocery Completeness".to_owned());
    lines.push(format!("- All quantities present: {}", pf(QaCategory::Grocery)));
    lines.push(format!(
        "- match_confidence populated: {}",
        pf(QaCategory::Grocery)
    ));
    lines.push(format!(
        "- No blank item_name fields: {}",
        pf(QaCategory::Grocery)
    ));

    lines.push(String::new());
    lines.push("## Recipe Link Quality".to_owned());
    lines.push(format!(
        "- No placeholder or broken URLs: {}",
        pf(QaCategory::Recipes)
    ));
    lines.push(format!(
        "- All meal IDs have recipe entry: {}",
        if recipes.len() == config.expected_recipe_count {
            "PASS".to_owned()
        } else {
            format!(
                "FAIL (expected {}, got {})",
                config.expected_recipe_count,
                recipes.len()
            )
        }
    ));
    for issue in report.in_category(QaCategory::Recipes) {
        lines.push(format!("  - {}", issue.message));
    }

    lines.push(String::new());
    lines.push("## Modification Audit".to_owned());
    if modifications.modifications.is_empty() {
        lines.push(
            "- No modifications applied (data_confidence: insufficient — accumulation mode)"
                .to_owned(),
        );
    } else {
        lines.push(format!(
            "- Modifications traceable: {}",
            pf(QaCategory::Modification)
        ));
    }

    lines.push(String::new());
    lines.push("## Tone Check".to_owned());
    let tone_issues = report.in_category(QaCategory::Tone);
    lines.push(format!(
        "- No medical claims: {}",
        if tone_issues.iter().any(|i| i.message.starts_with("Medical")) {
            "FAIL"
        } else {
            "PASS"
        }
    ));
    lines.push(format!(
        "- No prescriptive language: {}",
        if tone_issues
            .iter()
            .any(|i| i.message.starts_with("Prescriptive"))
        {
            "FAIL"
        } else {
            "PASS"
        }
    ));

    lines.push(String::new());
    lines.push(format!("## Overall: {}", report.verdict.as_str()));
    lines.push(String::new());
    lines.push("## Blocking Issues".to_owned());
    let blocking = report.blocking_issues();
    if blocking.is_empty() {
        lines.push("- None".to_owned());
    } else {
        lines.extend(blocking.iter().take(10).map(|i| format!("- {}", i.message)));
    }

    lines.push(String::new());
    lines.push("## Non-blocking Suggestions".to_owned());
    let advisory = report.advisory_issues();
    if advisory.is_empty() {
        lines.push("- None".to_owned());
    } else {
        lines.extend(advisory.iter().take(5).map(|i| format!("- {}", i.message)));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::RecipeSource;
    use crate::models::{PlanModification, QaVerdict};
    use chrono::Utc;

    fn modifications(mods: Vec<PlanModification>) -> PlanModifications {
        PlanModifications {
            generated_at: Utc::now(),
            data_confidence: "insufficient".into(),
            revision_pass_authorized: false,
            modifications: mods,
            max_modifications_applied: 3,
            note: String::new(),
        }
    }

    fn profile() -> UserProfile {
        serde_json::from_value(serde_json::json!({
            "user_id": "u1", "name": "Test", "age": 30, "sex": "male",
            "height_cm": 175.0, "weight_kg": 70.0, "goal": "maintain",
            "allergies": ["shellfish"]
        }))
        .unwrap()
    }

    fn plan() -> PlanIntent {
        let start = chrono::NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
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

    fn full_digest(config: &QaConfig) -> String {
        let mut digest = "# Week W32 — Supportive load balance\n".to_owned();
        for section in &config.required_sections {
            digest.push_str(section);
            digest.push('\n');
        }
        digest
    }

    #[test]
    fn constraint_violation_blocks() {
        let plan = plan();
        let config = QaConfig::default();
        let mut recipes = crate::external::BucketRecipeSource::placeholder()
            .attach(&plan, &profile())
            .unwrap();
        recipes[0].name = "Shellfish Paella".into();

        let report = evaluate(
            &profile(),
            &plan,
            &recipes,
            &[],
            &full_digest(&config),
            &modifications(vec![]),
            &config,
        );
        assert_eq!(report.verdict, QaVerdict::Fail);
        assert!(!report.in_category(QaCategory::Constraints).is_empty());
    }

    #[test]
    fn tone_phrases_block() {
        let config = QaConfig::default();
        let digest = format!("{}\nThis plan is proven to work.", full_digest(&config));
        let report = evaluate(
            &profile(),
            &plan(),
            &[],
            &[],
            &digest,
            &modifications(vec![]),
            &config,
        );
        assert!(report
            .in_category(QaCategory::Tone)
            .iter()
            .any(|i| i.message.contains("proven to")));
        assert_eq!(report.verdict, QaVerdict::Fail);
    }

    #[test]
    fn unknown_modification_meal_id_blocks() {
        let config = QaConfig::default();
        let mods = modifications(vec![PlanModification {
            modification_id: "m1".into(),
            meal_id: "D9_Dinner".into(),
            proposed_value: "swap".into(),
            confidence: "low".into(),
        }]);
        let report = evaluate(
            &profile(),
            &plan(),
            &[],
            &[],
            &full_digest(&config),
            &mods,
            &config,
        );
        assert!(!report.in_category(QaCategory::Modification).is_empty());
        assert_eq!(report.verdict, QaVerdict::Fail);
    }
}
