// ABOUTME: QA gate scenario tests - blocking vs advisory severity and the documented scenarios
// ABOUTME: A missing section plus a kcal deviation must FAIL with exactly one of each severity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::NaiveDate;
use remy::config::{NutritionConfig, QaConfig};
use remy::external::{BucketRecipeSource, RecipeSource};
use remy::models::{
    OutcomeSignals, PlanIntent, PlanModifications, QaCategory, QaVerdict, ScheduleDay,
    UserProfile, WeeklyContext,
};
use remy::pipeline::plan_intent::build_plan_intent;
use remy::pipeline::qa_gate::{evaluate, report_to_markdown};

fn profile() -> UserProfile {
    serde_json::from_value(serde_json::json!({
        "user_id": "u1", "name": "Casey", "age": 30, "sex": "male",
        "height_cm": 175.0, "weight_kg": 70.0, "goal": "maintain",
        "avoid_list": ["cilantro"], "allergies": []
    }))
    .unwrap()
}

fn plan() -> PlanIntent {
    let start = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
    build_plan_intent(
        &profile(),
        &WeeklyContext {
            week_start: start,
            timezone: "UTC".into(),
            training_focus: "base build".into(),
            schedule: (0..7)
                .map(|i| ScheduleDay {
                    date: start + chrono::Duration::days(i),
                    day_type: Some("training".into()),
                    notes: None,
                })
                .collect(),
        },
        &OutcomeSignals::default(),
        vec![],
        &NutritionConfig::default(),
    )
}

fn no_modifications() -> PlanModifications {
    PlanModifications {
        generated_at: chrono::Utc::now(),
        data_confidence: "insufficient".into(),
        revision_pass_authorized: false,
        modifications: vec![],
        max_modifications_applied: 3,
        note: String::new(),
    }
}

fn digest_with_sections(config: &QaConfig, skip: Option<&str>) -> String {
    let mut digest = "# Week W32 — Supportive load balance\n".to_owned();
    for section in &config.required_sections {
        if Some(section.as_str()) == skip {
            continue;
        }
        digest.push_str(section);
        digest.push_str("\ncontent\n");
    }
    digest
}

#[test]
fn blocking_vs_advisory_scenario() {
    // Digest missing one required section + a 15% kcal deviation:
    // overall FAIL, exactly one blocking and one advisory issue.
    let config = QaConfig::default();
    let mut plan = plan();
    let recipes = BucketRecipeSource::placeholder()
        .attach(&plan, &profile())
        .unwrap();
    // Declare an average 15% above the computed mean
    let actual_mean = (plan
        .per_day_targets
        .iter()
        .map(|d| f64::from(d.kcal))
        .sum::<f64>()
        / 7.0)
        .round();
    plan.macro_plan.daily_avg_kcal = (actual_mean * 1.15) as u32;

    let digest = digest_with_sections(&config, Some("## Meal Plan"));
    let (_, csv_rows) =
        remy::pipeline::grocery_build::build_grocery(&recipes, "Fred Meyer");

    let report = evaluate(
        &profile(),
        &plan,
        &recipes,
        &csv_rows,
        &digest,
        &no_modifications(),
        &config,
    );
    assert_eq!(report.verdict, QaVerdict::Fail);
    assert_eq!(report.blocking_issues().len(), 1);
    assert_eq!(report.blocking_issues()[0].category, QaCategory::Coverage);
    assert_eq!(report.advisory_issues().len(), 1);
    assert_eq!(report.advisory_issues()[0].category, QaCategory::Macro);
}

#[test]
fn clean_run_passes() {
    let config = QaConfig::default();
    let plan = plan();
    let recipes = BucketRecipeSource::placeholder()
        .attach(&plan, &profile())
        .unwrap();
    let (_, csv_rows) =
        remy::pipeline::grocery_build::build_grocery(&recipes, "Fred Meyer");
    let report = evaluate(
        &profile(),
        &plan,
        &recipes,
        &csv_rows,
        &digest_with_sections(&config, None),
        &no_modifications(),
        &config,
    );
    assert_eq!(report.verdict, QaVerdict::Pass);
    assert!(report.blocking_issues().is_empty());
}

#[test]
fn avoid_list_term_in_recipe_name_blocks() {
    let config = QaConfig::default();
    let plan = plan();
    let mut recipes = BucketRecipeSource::placeholder()
        .attach(&plan, &profile())
        .unwrap();
    recipes[5].name = "Cilantro Lime Chicken".into();
    let (_, csv_rows) =
        remy::pipeline::grocery_build::build_grocery(&recipes, "Fred Meyer");

    let report = evaluate(
        &profile(),
        &plan,
        &recipes,
        &csv_rows,
        &digest_with_sections(&config, None),
        &no_modifications(),
        &config,
    );
    assert_eq!(report.verdict, QaVerdict::Fail);
    let constraint_issues = report.in_category(QaCategory::Constraints);
    assert_eq!(constraint_issues.len(), 1);
    assert!(constraint_issues[0].message.contains("cilantro"));
}

#[test]
fn placeholder_domain_is_advisory_only() {
    let config = QaConfig::default();
    let plan = plan();
    let mut recipes = BucketRecipeSource::placeholder()
        .attach(&plan, &profile())
        .unwrap();
    recipes[0].recipe_link = Some("https://example.com/recipe/1".into());
    let (_, csv_rows) =
        remy::pipeline::grocery_build::build_grocery(&recipes, "Fred Meyer");

    let report = evaluate(
        &profile(),
        &plan,
        &recipes,
        &csv_rows,
        &digest_with_sections(&config, None),
        &no_modifications(),
        &config,
    );
    // Advisory issue, verdict still PASS
    assert_eq!(report.verdict, QaVerdict::Pass);
    assert!(!report.in_category(QaCategory::Recipes).is_empty());
}

#[test]
fn report_markdown_has_overall_and_sections() {
    let config = QaConfig::default();
    let plan = plan();
    let recipes = BucketRecipeSource::placeholder()
        .attach(&plan, &profile())
        .unwrap();
    let (_, csv_rows) =
        remy::pipeline::grocery_build::build_grocery(&recipes, "Fred Meyer");
    let digest = digest_with_sections(&config, None);
    let report = evaluate(
        &profile(),
        &plan,
        &recipes,
        &csv_rows,
        &digest,
        &no_modifications(),
        &config,
    );
    let md = report_to_markdown(&report, &digest, &recipes, &no_modifications(), &config);
    assert!(md.contains("# QA Report"));
    assert!(md.contains("## Overall: PASS"));
    assert!(md.contains("## Blocking Issues"));
    assert!(md.contains("## Non-blocking Suggestions"));
    assert!(md.contains("- All meal IDs have recipe entry: PASS"));
}
