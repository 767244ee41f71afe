// ABOUTME: Advisory analytics stage - idempotent feature-table append and data-confidence gating
// ABOUTME: Never blocks and never mutates the plan; revisions stay off until history accumulates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

use std::fs::OpenOptions;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::config::WeekTierConfig;
use crate::errors::AppResult;
use crate::models::analytics::ACTIVATION_WEEKS;
use crate::models::{FeatureRow, OutcomeSignals, PlanIntent, PlanModifications, WeekTier};

/// Count data rows in the feature table; 0 when the file does not exist
///
/// # Errors
///
/// Returns an error when the file exists but cannot be parsed as CSV.
pub fn feature_table_rows(path: &Path) -> AppResult<usize> {
    if !path.exists() {
        return Ok(0);
    }
    let mut reader = csv::Reader::from_path(path)?;
    let mut count = 0usize;
    for record in reader.records() {
        record?;
        count += 1;
    }
    Ok(count)
}

/// Whether the feature table already holds a row for this week
fn week_already_recorded(path: &Path, week_start: NaiveDate) -> AppResult<bool> {
    if !path.exists() {
        return Ok(false);
    }
    let mut reader = csv::Reader::from_path(path)?;
    for result in reader.deserialize::<FeatureRow>() {
        let row = result?;
        if row.week_start == week_start {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Derive the week tier from the plan's day-type partition, using the same
/// thresholds as the macro engine.
fn tier_from_partition(plan: &PlanIntent, config: &WeekTierConfig) -> WeekTier {
    let high_n = plan.day_types.high_days.len();
    let rest_n = plan.day_types.rest_days.len();
    if high_n >= config.peak_high_days {
        WeekTier::Peak
    } else if rest_n >= config.recovery_rest_days {
        WeekTier::Recovery
    } else if high_n == 0 {
        WeekTier::Base
    } else {
        WeekTier::Build
    }
}

/// Append one row for the current week, idempotent on `week_start`.
///
/// Returns `true` when a row was appended, `false` when the week was already
/// recorded. Single-process single-writer assumption; no locking.
///
/// # Errors
///
/// Returns an error on filesystem or CSV failure.
pub fn append_feature_row(
    plan: &PlanIntent,
    signals: &OutcomeSignals,
    tier_config: &WeekTierConfig,
    path: &Path,
) -> AppResult<bool> {
    if week_already_recorded(path, plan.week_start)? {
        info!(week_start = %plan.week_start, "feature table already has this week; skipping append");
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let existing_rows = feature_table_rows(path)?;
    let write_header = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(write_header)
        .from_writer(file);

    let fmt_opt = |v: Option<f64>| v.map_or_else(String::new, |x| x.to_string());
    let wellness = &signals.wellness_summary;
    let alcohol = &signals.alcohol_summary;
    let nutrition = &signals.nutrition_summary;
    let mp = &plan.macro_plan;

    writer.serialize(FeatureRow {
        week_start: plan.week_start,
        week_tier: tier_from_partition(plan, tier_config).as_str().to_owned(),
        avg_kcal: mp.daily_avg_kcal,
        avg_protein_g: mp.protein_g,
        avg_carbs_g: mp.carbs_g_training,
        avg_fat_g: mp.fat_g,
        training_days: plan.day_types.training_days.len(),
        rest_days: plan.day_types.rest_days.len(),
        high_days: plan.day_types.high_days.len(),
        avg_sleep_hr: fmt_opt(wellness.avg_sleep_hr),
        avg_rhr: fmt_opt(wellness.avg_rhr),
        acwr: fmt_opt(wellness.acwr),
        training_load: wellness.training_load.clone().unwrap_or_default(),
        alcohol_units_7d: fmt_opt(alcohol.units_7d),
        alcohol_flag: alcohol.flag.clone().unwrap_or_default(),
        log_avg_kcal: fmt_opt(nutrition.avg_kcal),
        log_protein_g: fmt_opt(nutrition.protein_g),
        notes: format!("baseline row {}", existing_rows + 1),
    })?;
    writer.flush()?;
    Ok(true)
}

/// Run the advisory analytics stage.
///
/// Appends the current week to the feature table (idempotently) and marks
/// analytical confidence from the table length. Below the activation
/// threshold no modifications are proposed and the revision pass stays
/// unauthorized.
///
/// # Errors
///
/// Returns an error on filesystem or CSV failure; callers treat that as a
/// degraded condition for this stage only.
pub fn run_analytics(
    plan: &PlanIntent,
    signals: &OutcomeSignals,
    tier_config: &WeekTierConfig,
    feature_table_path: &Path,
) -> AppResult<(PlanModifications, usize)> {
    let weeks_available = feature_table_rows(feature_table_path)?;
    append_feature_row(plan, signals, tier_config, feature_table_path)?;

    let modifications = PlanModifications {
        generated_at: Utc::now(),
        data_confidence: "insufficient".to_owned(),
        revision_pass_authorized: false,
        modifications: Vec::new(),
        max_modifications_applied: 3,
        note: format!(
            "Insufficient historical data: feature table has {weeks_available} week(s) \
             (minimum {ACTIVATION_WEEKS} required to activate analysis). \
             Appending current week to the feature table."
        ),
    };
    Ok((modifications, weeks_available))
}

/// Render the insights report for data-accumulation mode
#[must_use]
pub fn insights_report(modifications: &PlanModifications, weeks_available: usize) -> String {
    [
        "# Insights Report (Data Accumulation Mode)".to_owned(),
        String::new(),
        "## Signals Summary".to_owned(),
        "No historical baseline available. This is an early run of the pipeline.".to_owned(),
        format!(
            "The feature table currently has {weeks_available} week(s) of data \
             ({ACTIVATION_WEEKS} required to activate analysis)."
        ),
        String::new(),
        "## Analytics Status".to_owned(),
        format!(
            "**Accumulation mode:** Inactive. Reason: {}",
            modifications.note
        ),
        String::new(),
        format!(
            "**Activation threshold:** {ACTIVATION_WEEKS} complete weekly rows in the feature table."
        ),
        "**Current status:** Accumulating baseline data. No modifications proposed.".to_owned(),
        String::new(),
        "## What to Track Next Week".to_owned(),
        "- Log energy level 1-5 at 2pm each day".to_owned(),
        "- Note which meals you actually cooked vs substituted".to_owned(),
        "- Rate sleep quality 1-5 each morning".to_owned(),
        "- Log any GI discomfort after meals (1=none, 5=significant)".to_owned(),
        "- Note how training felt (RPE 1-10) on each training day".to_owned(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NutritionConfig;
    use crate::models::{OutcomeSignals, ScheduleDay, WeeklyContext};
    use chrono::NaiveDate;

    fn plan() -> PlanIntent {
        let start = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        let profile = serde_json::from_value(serde_json::json!({
            "user_id": "u1", "name": "Test", "age": 30, "sex": "male",
            "height_cm": 175.0, "weight_kg": 70.0, "goal": "maintain"
        }))
        .unwrap();
        crate::pipeline::plan_intent::build_plan_intent(
            &profile,
            &WeeklyContext {
                week_start: start,
                timezone: "UTC".into(),
                training_focus: "base".into(),
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

    #[test]
    fn append_is_idempotent_per_week() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feature_table.csv");
        let tier_config = WeekTierConfig::default();
        let plan = plan();
        let signals = OutcomeSignals::default();

        assert!(append_feature_row(&plan, &signals, &tier_config, &path).unwrap());
        assert!(!append_feature_row(&plan, &signals, &tier_config, &path).unwrap());
        assert_eq!(feature_table_rows(&path).unwrap(), 1);
    }

    #[test]
    fn analytics_stays_insufficient_below_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feature_table.csv");
        let (modifications, weeks) = run_analytics(
            &plan(),
            &OutcomeSignals::default(),
            &WeekTierConfig::default(),
            &path,
        )
        .unwrap();
        assert_eq!(weeks, 0);
        assert_eq!(modifications.data_confidence, "insufficient");
        assert!(!modifications.revision_pass_authorized);
        assert!(modifications.modifications.is_empty());
    }
}
