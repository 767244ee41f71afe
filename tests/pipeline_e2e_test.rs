// ABOUTME: End-to-end pipeline tests - full runs in a temp dir, artifacts, exit semantics
// ABOUTME: Covers the fatal-halt path, QA PASS path, and feature-table idempotence across runs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::NaiveDate;
use remy::config::PlannerConfig;
use remy::external::BucketRecipeSource;
use remy::models::{OutcomeSignals, QaVerdict, ScheduleDay, UserProfile, WeeklyContext};
use remy::pipeline::{Pipeline, PipelineInputs, RunOptions};

fn profile() -> UserProfile {
    serde_json::from_value(serde_json::json!({
        "user_id": "household-1",
        "name": "Casey",
        "age": 41,
        "sex": "female",
        "height_cm": 170.0,
        "weight_kg": 64.0,
        "goal": "maintain",
        "pal_value": 1.6,
        "avoid_list": ["cilantro"],
        "allergies": []
    }))
    .unwrap()
}

fn context(schedule_len: usize) -> WeeklyContext {
    let start = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
    let types = ["training", "high", "rest", "training", "high", "long ride", "rest"];
    WeeklyContext {
        week_start: start,
        timezone: "America/Los_Angeles".into(),
        training_focus: "century prep".into(),
        schedule: (0..schedule_len)
            .map(|i| {
                let label = types[i % types.len()];
                ScheduleDay {
                    date: start + chrono::Duration::days(i as i64),
                    day_type: remy::models::DayType::parse(label).map(|_| label.to_owned()),
                    notes: Some(label.to_owned()),
                }
            })
            .collect(),
    }
}

fn inputs() -> PipelineInputs {
    PipelineInputs {
        profile: profile(),
        context: context(7),
        signals: OutcomeSignals::default(),
    }
}

fn options(dir: &std::path::Path) -> RunOptions {
    RunOptions {
        out_dir: dir.join("out"),
        feature_table_path: dir.join("data/feature_table.csv"),
        base_grocery_path: None,
    }
}

#[test]
fn full_run_writes_all_artifacts_and_passes_qa() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(PlannerConfig::default()).unwrap();
    let outcome = pipeline
        .run(
            &inputs(),
            &BucketRecipeSource::placeholder(),
            None,
            &options(dir.path()),
        )
        .unwrap();

    assert_eq!(outcome.verdict, QaVerdict::Pass);

    let out = dir.path().join("out");
    for artifact in [
        "plan_intent.md",
        "plan_intent.json",
        "recipes.md",
        "grocery_list.csv",
        "grocery_notes.md",
        "Grocery_List.md",
        "grocery_list.json",
        "plan_modifications.json",
        "Insights_Report.md",
        "qa_report.md",
        "Weekly_Email_Digest.md",
        "run_log.md",
    ] {
        assert!(out.join(artifact).exists(), "missing artifact {artifact}");
    }

    // Every required digest section is present
    let digest = std::fs::read_to_string(out.join("Weekly_Email_Digest.md")).unwrap();
    for section in &PlannerConfig::default().qa.required_sections {
        assert!(digest.contains(section.as_str()), "digest missing {section}");
    }
    assert!(digest.contains("- Status: PASS"));

    // The subject line leads the digest
    assert!(digest.starts_with("# Week W"));
    assert_eq!(outcome.subject, digest.lines().next().unwrap().trim_start_matches("# "));
}

#[test]
fn six_day_schedule_halts_with_run_log_only() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(PlannerConfig::default()).unwrap();
    let mut bad = inputs();
    bad.context = context(6);

    let err = pipeline
        .run(
            &bad,
            &BucketRecipeSource::placeholder(),
            None,
            &options(dir.path()),
        )
        .unwrap_err();
    assert!(err.message.contains("exactly 7 days"));

    let out = dir.path().join("out");
    assert!(out.join("run_log.md").exists());
    assert!(!out.join("plan_intent.md").exists());
    assert!(!out.join("Weekly_Email_Digest.md").exists());

    let run_log = std::fs::read_to_string(out.join("run_log.md")).unwrap();
    assert!(run_log.contains("FAIL"));
}

#[test]
fn feature_table_grows_once_per_week_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(PlannerConfig::default()).unwrap();
    let opts = options(dir.path());

    pipeline
        .run(&inputs(), &BucketRecipeSource::placeholder(), None, &opts)
        .unwrap();
    pipeline
        .run(&inputs(), &BucketRecipeSource::placeholder(), None, &opts)
        .unwrap();

    let table = std::fs::read_to_string(dir.path().join("data/feature_table.csv")).unwrap();
    // Header plus exactly one data row despite two runs
    assert_eq!(table.trim().lines().count(), 2);

    // A different week appends a second row
    let mut next_week = inputs();
    let start = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
    next_week.context.week_start = start;
    for (i, day) in next_week.context.schedule.iter_mut().enumerate() {
        day.date = start + chrono::Duration::days(i as i64);
    }
    pipeline
        .run(&next_week, &BucketRecipeSource::placeholder(), None, &opts)
        .unwrap();
    let table = std::fs::read_to_string(dir.path().join("data/feature_table.csv")).unwrap();
    assert_eq!(table.trim().lines().count(), 3);
}

#[test]
fn alt_variant_diff_feeds_digest_theme() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(PlannerConfig::default()).unwrap();

    // Base run
    let base_opts = RunOptions {
        out_dir: dir.path().join("base"),
        feature_table_path: dir.path().join("data/feature_table.csv"),
        base_grocery_path: None,
    };
    pipeline
        .run(&inputs(), &BucketRecipeSource::placeholder(), None, &base_opts)
        .unwrap();

    // Alt run against a context with an extra high day (different groceries
    // would normally differ; placeholder recipes keep lists identical, so
    // the diff is empty and the theme falls through to the pattern rules)
    let alt_opts = RunOptions {
        out_dir: dir.path().join("alt"),
        feature_table_path: dir.path().join("data/feature_table.csv"),
        base_grocery_path: Some(dir.path().join("base/grocery_list.json")),
    };
    let outcome = pipeline
        .run(&inputs(), &BucketRecipeSource::placeholder(), None, &alt_opts)
        .unwrap();
    // 3 high days in the schedule → peak theme
    assert!(outcome.subject.contains("Peak load week"));
}

#[test]
fn digest_tone_stays_clean_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(PlannerConfig::default()).unwrap();
    let outcome = pipeline
        .run(
            &inputs(),
            &BucketRecipeSource::placeholder(),
            None,
            &options(dir.path()),
        )
        .unwrap();
    let lower = outcome.digest.to_lowercase();
    for phrase in &PlannerConfig::default().qa.medical_claim_phrases {
        assert!(!lower.contains(phrase.as_str()), "digest contains '{phrase}'");
    }
}
