// ABOUTME: Digest composition stage - subject theming and section assembly for the weekly email
// ABOUTME: Built twice per run: draft with placeholder QA section, final with the real verdict
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::models::{
    AttachedRecipe, MealSlot, PlanIntent, PlanModifications, QaReport, QaVerdict,
    RolledGroceryItem, UserProfile, WeeklyContext,
};

/// Placeholder QA section used for the draft digest the QA gate inspects
pub const QA_PLACEHOLDER: &str = "- Status: pending (QA gate not yet run)";

/// Compose the digest. Returns `(subject_line, body)`.
///
/// The QA section content is injected by the caller: a placeholder for the
/// draft, the real summary for the final composition. Everything else is
/// identical between the two passes, so the gate sees every other artifact
/// in final form.
#[must_use]
pub fn build_digest(
    profile: &UserProfile,
    context: &WeeklyContext,
    plan: &PlanIntent,
    recipes: &[AttachedRecipe],
    grocery_items: &[RolledGroceryItem],
    modifications: &PlanModifications,
    qa_section: &str,
    grocery_diff_lines: Option<&[String]>,
) -> (String, String) {
    let high_count = plan.day_types.high_days.len();
    let rest_count = plan.day_types.rest_days.len();
    let training_count = plan.day_types.training_days.len();

    let theme = if grocery_diff_lines.is_some_and(|d| !d.is_empty()) {
        "Higher-carb support for load"
    } else if high_count >= 2 {
        "Peak load week"
    } else if rest_count >= 3 {
        "Recovery focus week"
    } else {
        "Supportive load balance"
    };
    let week_label = format!("W{:02}", context.week_start.iso_week().week());
    let subject = format!("Week {week_label} — {theme}");

    let mp = &plan.macro_plan;
    let categories: std::collections::HashSet<&str> =
        grocery_items.iter().map(|i| i.category.as_str()).collect();

    let mut body = vec![format!("# {subject}"), String::new()];

    body.push("## TL;DR".to_owned());
    body.push(format!(
        "- Training focus: {}",
        context.training_focus
    ));
    body.push(format!(
        "- Pattern: {high_count} intensity, {training_count} endurance, {rest_count} rest days"
    ));
    body.push(format!(
        "- Goal: {} — avg {} kcal/day",
        profile.goal.as_str(),
        mp.daily_avg_kcal
    ));
    body.push(format!(
        "- Protein target: {}g/day | Carbs: {}g training / {}g rest",
        mp.protein_g, mp.carbs_g_training, mp.carbs_g_rest
    ));
    body.push(format!(
        "- Grocery list ready: {} items across {} categories",
        grocery_items.len(),
        categories.len()
    ));
    if let Some(diff) = grocery_diff_lines {
        if !diff.is_empty() {
            body.push("- Biggest changes vs base plan:".to_owned());
            body.extend(diff.iter().map(|d| format!("  - {d}")));
        }
    }
    body.push(String::new());

    body.push("## This Week's Targets".to_owned());
    for t in &plan.per_day_targets {
        body.push(format!(
            "- {} ({}): {} kcal | P{}g C{}g F{}g",
            t.date,
            t.day_type.as_str(),
            t.kcal,
            t.protein_g,
            t.carbs_g,
            t.fat_g
        ));
    }
    body.push(String::new());

    body.push("## Plan Rationale".to_owned());
    body.extend(plan.rationale.iter().map(|b| format!("- {b}")));
    body.push(String::new());

    body.push("## Data Analyst Notes".to_owned());
    body.push(analyst_notes(modifications));
    body.push(String::new());

    body.push("## Meal Plan".to_owned());
    body.push(meal_plan_section(recipes));

    body.push("## Grocery List".to_owned());
    let mut top_items: Vec<&RolledGroceryItem> = grocery_items.iter().collect();
    top_items.sort_by(|a, b| b.total_quantity.total_cmp(&a.total_quantity));
    for item in top_items.iter().take(10) {
        body.push(format!(
            "- {} — {:.0} {}",
            item.name_display, item.total_quantity, item.unit
        ));
    }
    body.push(String::new());

    body.push("## Notes / Assumptions".to_owned());
    body.push(notes_assumptions(&plan.defaults_applied, modifications));
    body.push(String::new());

    body.push("## Next Week Feedback Prompts".to_owned());
    body.push("- Any schedule changes or time constraints next week?".to_owned());
    body.push("- Budget target or preferred price range?".to_owned());
    body.push("- Meals you want repeated or avoided?".to_owned());
    body.push("- Energy levels this week (1-5) — particularly on training days?".to_owned());
    body.push(String::new());

    body.push("## QA Summary".to_owned());
    body.push(qa_section.to_owned());
    body.push(String::new());

    (subject, body.join("\n"))
}

/// QA section for the final digest: verdict plus the top blocking issues
#[must_use]
pub fn qa_section_from_report(report: &QaReport) -> String {
    let mut lines = vec![format!("- Status: {}", report.verdict.as_str())];
    let blocking = report.blocking_issues();
    if blocking.is_empty() {
        lines.push("- No blocking issues".to_owned());
    } else {
        lines.extend(blocking.iter().take(3).map(|i| format!("- {}", i.message)));
    }
    if report.verdict == QaVerdict::Pass {
        lines.push("- QA checks passed".to_owned());
    }
    lines.join("\n")
}

/// The analyst notes block: fixed accumulation-mode text until revisions
/// activate, itemized modifications afterwards.
fn analyst_notes(modifications: &PlanModifications) -> String {
    if modifications.data_confidence == "insufficient" {
        return format!(
            "**Modifications applied to this plan:** None — insufficient historical data\n\n\
             *{}*\n\n\
             *Analytics will activate once enough weekly rows accumulate in the feature table.*\n\n\
             *These signals are correlational, not causal. Training load, sleep environment, \
             and stress are not fully controlled.*",
            modifications.note
        );
    }
    let mut lines = vec![format!(
        "**Modifications applied to this plan:** {} of {} max",
        modifications.modifications.len(),
        modifications.max_modifications_applied
    )];
    lines.push(String::new());
    for m in &modifications.modifications {
        lines.push(format!(
            "- {}: {} (confidence: {})",
            m.meal_id, m.proposed_value, m.confidence
        ));
    }
    lines.push(String::new());
    lines.push(
        "*These signals are correlational, not causal. Training load, sleep environment, \
         and stress are not fully controlled.*"
            .to_owned(),
    );
    lines.join("\n")
}

/// The per-day meal plan section, Monday through Sunday
fn meal_plan_section(recipes: &[AttachedRecipe]) -> String {
    let mut by_date: BTreeMap<chrono::NaiveDate, Vec<&AttachedRecipe>> = BTreeMap::new();
    for r in recipes {
        by_date.entry(r.date).or_default().push(r);
    }

    let mut lines = Vec::new();
    for (date, meals) in &by_date {
        let day_type = meals.first().map_or("training", |m| m.day_type.as_str());
        let day_name = date.format("%A");
        lines.push(format!("### {day_name} {date} — {} Day", title_word(day_type)));
        for slot in MealSlot::ALL {
            if let Some(meal) = meals.iter().find(|m| m.slot == slot) {
                let label = title_word(slot.as_lower());
                match &meal.recipe_link {
                    Some(link) => {
                        lines.push(format!("- **{label}:** [{}]({link})", meal.name));
                    }
                    None => lines.push(format!("- **{label}:** {} *(simple build)*", meal.name)),
                }
            }
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

/// The defaults/modifications traceability block
fn notes_assumptions(defaults: &[String], modifications: &PlanModifications) -> String {
    let mut lines = Vec::new();
    if !defaults.is_empty() {
        lines.push("**Defaults applied (inputs were missing):**".to_owned());
        lines.extend(defaults.iter().map(|d| format!("- {d}")));
        lines.push(String::new());
    }
    if !modifications.modifications.is_empty() {
        lines.push("**Plan modifications applied:**".to_owned());
        for m in &modifications.modifications {
            lines.push(format!(
                "- {}: {} — {}",
                m.modification_id, m.meal_id, m.proposed_value
            ));
        }
        lines.push(String::new());
    }
    if lines.is_empty() {
        return "- No defaults or modifications applied this week.".to_owned();
    }
    lines.join("\n")
}

/// Uppercase the first letter of a single word
fn title_word(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}
