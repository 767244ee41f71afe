// ABOUTME: Plan-intent stage - classification, shared week tier, targets, meal ids, rationale
// ABOUTME: Produces the contract handed to the recipe collaborator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

use crate::config::NutritionConfig;
use crate::intelligence::{classify, targets_for_week, week_intensity_tier};
use crate::models::{
    DayTarget, DayType, DayTypePartition, MacroPlan, MealId, MealSlot, MealStructure,
    OutcomeSignals, PlanIntent, SlotGuidance, UserProfile, WeekTier, WeeklyContext,
};

/// Build the plan intent from the weekly context, profile, and signals.
///
/// Classifies all seven days, derives the week tier once, computes the seven
/// day targets against that shared tier, generates the 28-entry meal
/// identifier table, and assembles rationale bullets tied to this week's
/// signals.
#[must_use]
pub fn build_plan_intent(
    profile: &UserProfile,
    context: &WeeklyContext,
    signals: &OutcomeSignals,
    defaults_applied: Vec<String>,
    config: &NutritionConfig,
) -> PlanIntent {
    let classified: Vec<_> = context
        .schedule
        .iter()
        .map(|day| (day.date, classify(day)))
        .collect();
    let day_types: Vec<DayType> = classified.iter().map(|(_, t)| *t).collect();
    let tier = week_intensity_tier(&day_types, &config.week_tier);
    let per_day = targets_for_week(&classified, profile, config);

    let mut partition = DayTypePartition::default();
    for (date, day_type) in &classified {
        match day_type {
            DayType::Training => partition.training_days.push(*date),
            DayType::High => partition.high_days.push(*date),
            DayType::Rest => partition.rest_days.push(*date),
        }
    }

    let macro_plan = build_macro_plan(&per_day);
    let meal_ids = build_meal_id_table(&classified);
    let rationale = build_rationale(profile, context, signals, &per_day, tier);

    PlanIntent {
        week_start: context.week_start,
        macro_plan,
        day_types: partition,
        meal_structure: meal_structure(),
        rationale,
        meal_ids,
        defaults_applied,
        per_day_targets: per_day,
    }
}

/// Build the 28 meal identifiers for the week: 4 slots × 7 days, each
/// carrying date, day type, and slot.
#[must_use]
pub fn build_meal_id_table(classified: &[(chrono::NaiveDate, DayType)]) -> Vec<MealId> {
    let mut meal_ids = Vec::with_capacity(classified.len() * MealSlot::ALL.len());
    for (i, (date, day_type)) in classified.iter().enumerate() {
        for slot in MealSlot::ALL {
            meal_ids.push(MealId {
                meal_id: format!("D{}_{}", i + 1, slot.as_str()),
                date: *date,
                slot,
                day_type: *day_type,
            });
        }
    }
    meal_ids
}

/// Week-level averages declared in the plan; divisors are guarded so a week
/// without training or rest days still produces a plan.
fn build_macro_plan(per_day: &[DayTarget]) -> MacroPlan {
    let n = per_day.len().max(1) as f64;
    let avg = |f: fn(&DayTarget) -> u32| {
        (per_day.iter().map(|d| f64::from(f(d))).sum::<f64>() / n).round() as u32
    };

    let training: Vec<_> = per_day
        .iter()
        .filter(|d| matches!(d.day_type, DayType::Training | DayType::High))
        .collect();
    let rest: Vec<_> = per_day
        .iter()
        .filter(|d| d.day_type == DayType::Rest)
        .collect();
    let avg_of = |days: &[&DayTarget]| {
        (days.iter().map(|d| f64::from(d.carbs_g)).sum::<f64>() / days.len().max(1) as f64).round()
            as u32
    };

    MacroPlan {
        daily_avg_kcal: avg(|d| d.kcal),
        protein_g: avg(|d| d.protein_g),
        carbs_g_training: avg_of(&training),
        carbs_g_rest: avg_of(&rest),
        fat_g: avg(|d| d.fat_g),
    }
}

/// Fixed per-day-type meal structure guidance
fn meal_structure() -> MealStructure {
    MealStructure {
        training_day: SlotGuidance {
            breakfast: "Moderate carbs (50-70g), protein anchor 35-45g, easy prep — e.g., Greek yogurt bowl or egg-based".into(),
            lunch: "Balanced meal, carb-forward, protein anchor 45-55g — e.g., grain bowl or sandwich".into(),
            dinner: "Higher protein (50-60g), moderate carbs, batch-cook friendly — e.g., salmon/chicken + rice + veg".into(),
            snack: "Protein-anchored (>=15g), light carbs — e.g., apple + nut butter or cottage cheese".into(),
        },
        high_day: SlotGuidance {
            breakfast: "High-carb (80-110g), easy prep, pre-training fuel — e.g., oats + banana + protein".into(),
            lunch: "Carb-forward post-training (100-120g carbs), protein anchor 40-50g — e.g., turkey rice bowl".into(),
            dinner: "High protein (55-65g), high carbs (100-120g), recovery-focused — e.g., salmon pasta or chicken stir-fry with rice".into(),
            snack: "Rapid-carb + protein (>=20g protein, >=30g carbs) — e.g., yogurt + granola + berries".into(),
        },
        rest_day: SlotGuidance {
            breakfast: "Protein-forward (40-50g), lower carbs (<30g), higher fat — e.g., egg white scramble + avocado".into(),
            lunch: "Protein anchor (50-55g), moderate carbs (40-50g) — e.g., chicken salad + quinoa".into(),
            dinner: "Early dinner (before 7pm), moderate protein (45-50g), lower carbs — e.g., miso tofu rice or chicken + veg".into(),
            snack: "Protein-focused (>=20g), minimal carbs — e.g., cottage cheese + berries".into(),
        },
    }
}

/// Render the plan intent artifact as markdown
#[must_use]
pub fn plan_intent_to_markdown(plan: &PlanIntent) -> String {
    let mp = &plan.macro_plan;
    let dt = &plan.day_types;
    let join_dates = |dates: &[chrono::NaiveDate]| {
        if dates.is_empty() {
            "None".to_owned()
        } else {
            dates
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        }
    };

    let mut lines = vec![
        format!("# Plan Intent — {}", plan.week_start),
        String::new(),
        "## Macro Plan".to_owned(),
        format!("- Daily average calories: {} kcal", mp.daily_avg_kcal),
        format!("- Protein target: {}g (all days)", mp.protein_g),
        format!("- Carb target (training/high days): {}g", mp.carbs_g_training),
        format!("- Carb target (rest days): {}g", mp.carbs_g_rest),
        format!("- Fat target: {}g", mp.fat_g),
        String::new(),
        "## Day Types".to_owned(),
        format!("- Training days: {}", join_dates(&dt.training_days)),
        format!("- High-intensity days: {}", join_dates(&dt.high_days)),
        format!("- Rest/recovery days: {}", join_dates(&dt.rest_days)),
        String::new(),
        "## Meal Structure (by day type)".to_owned(),
    ];

    let sections = [
        ("Training Days", &plan.meal_structure.training_day),
        ("High-Intensity Days", &plan.meal_structure.high_day),
        ("Rest Days", &plan.meal_structure.rest_day),
    ];
    for (label, guidance) in sections {
        lines.push(String::new());
        lines.push(format!("### {label}"));
        lines.push(format!("- Breakfast: {}", guidance.breakfast));
        lines.push(format!("- Lunch: {}", guidance.lunch));
        lines.push(format!("- Dinner: {}", guidance.dinner));
        lines.push(format!("- Snack: {}", guidance.snack));
    }

    lines.push(String::new());
    lines.push("## Rationale".to_owned());
    lines.extend(plan.rationale.iter().map(|b| format!("- {b}")));

    lines.push(String::new());
    lines.push("## Meal IDs".to_owned());
    lines.push("| Meal ID | Date | Slot | Day Type |".to_owned());
    lines.push("|---|---|---|---|".to_owned());
    for m in &plan.meal_ids {
        lines.push(format!(
            "| {} | {} | {} | {} |",
            m.meal_id,
            m.date,
            m.slot.as_str(),
            m.day_type.as_str()
        ));
    }

    if !plan.defaults_applied.is_empty() {
        lines.push(String::new());
        lines.push("## Defaults Applied".to_owned());
        lines.extend(plan.defaults_applied.iter().map(|d| format!("- {d}")));
    }

    lines.join("\n")
}

/// Build 4–8 rationale bullets tied to this week's profile and signals
fn build_rationale(
    profile: &UserProfile,
    context: &WeeklyContext,
    signals: &OutcomeSignals,
    per_day: &[DayTarget],
    tier: WeekTier,
) -> Vec<String> {
    let mut bullets = Vec::new();

    let high_count = per_day.iter().filter(|d| d.day_type == DayType::High).count();
    let rest_count = per_day.iter().filter(|d| d.day_type == DayType::Rest).count();
    let training_count = per_day
        .iter()
        .filter(|d| d.day_type == DayType::Training)
        .count();

    let pal = profile.pal_value.unwrap_or(1.55);
    bullets.push(format!(
        "Goal: {} — calorie targets set via evidence-based TDEE calculation \
         (resting-metabolism estimate + PAL {pal}).",
        profile.goal.as_str()
    ));

    let position_label = match tier {
        WeekTier::Peak => "upper",
        WeekTier::Build => "mid-upper",
        WeekTier::Base => "mid",
        WeekTier::Recovery => "lower",
    };
    bullets.push(format!(
        "Week pattern: {high_count} high-intensity, {training_count} training, {rest_count} rest — \
         week tier classified as '{}'. Carb targets positioned at {position_label} end of daily range.",
        tier.as_str()
    ));

    let masters = profile.age >= 40;
    bullets.push(format!(
        "Protein set at {} g/kg ({:.0} kg) — {}. \
         Rest days prioritize protein synthesis (higher protein, lower carbs).",
        if masters { "1.8-2.0" } else { "1.6-1.8" },
        profile.weight_kg,
        if masters {
            "elevated for masters athlete (age 40+)"
        } else {
            "standard endurance athlete range"
        }
    ));

    bullets.push(format!(
        "Training focus: {} — meal structure supports this with {}.",
        context.training_focus,
        if high_count > 0 {
            "carbohydrate periodization (high-carb on intensity days, moderate on endurance, lower on rest)"
        } else {
            "consistent moderate carb intake across training days"
        }
    ));

    let wellness = &signals.wellness_summary;
    let load_high = wellness.training_load.as_deref() == Some("high")
        || wellness.acwr.is_some_and(|a| a > 1.3);
    if load_high {
        let acwr = wellness
            .acwr
            .map_or_else(|| "elevated".to_owned(), |a| format!("{a}"));
        bullets.push(format!(
            "Training load is HIGH (ACWR: {acwr}) — added ~100 kcal buffer on training days \
             to support recovery. Monitor for fatigue; consider reducing load if energy declines."
        ));
    } else if wellness.training_load.as_deref() == Some("moderate") {
        let acwr = wellness
            .acwr
            .map_or_else(|| "mid-range".to_owned(), |a| format!("{a}"));
        bullets.push(format!(
            "Training load is moderate (ACWR: {acwr}) — standard fuelling strategy applied."
        ));
    }

    if let Some(sleep) = wellness.avg_sleep_hr {
        if sleep < 7.0 {
            bullets.push(format!(
                "Sleep average: {sleep:.1} hrs (below 7 hr target) — prioritize earlier dinners \
                 on rest days and magnesium-rich foods (spinach, pumpkin seeds) to support sleep quality."
            ));
        } else if sleep >= 8.0 {
            bullets.push(format!(
                "Sleep average: {sleep:.1} hrs (good) — recovery is well-supported. \
                 Maintaining current meal timing."
            ));
        }
    }

    let alcohol = &signals.alcohol_summary;
    let units = alcohol.units_7d.unwrap_or(0.0);
    match alcohol.flag.as_deref() {
        Some(flag @ ("moderate" | "heavy")) => {
            bullets.push(format!(
                "Alcohol: {units:.1} units last 7 days ({flag} flag) — plan includes B-vitamin \
                 rich foods (leafy greens, eggs) and hydration emphasis. {}",
                alcohol.recovery_note.as_deref().unwrap_or_default()
            ));
        }
        Some("light") if units > 0.0 => {
            bullets.push(format!(
                "Alcohol: {units:.1} units last 7 days (light) — minor consideration. {}",
                alcohol
                    .recovery_note
                    .as_deref()
                    .unwrap_or("Maintain hydration.")
            ));
        }
        _ => {}
    }

    bullets.truncate(8);
    bullets
}
