// ABOUTME: Pipeline orchestrator - strict linear stage machine with fail-fast validation gates
// ABOUTME: Validate, PlanIntent, RecipeAttach, GroceryBuild, Analytics, Digest, QAGate, DigestFinal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

//! Pipeline Orchestrator
//!
//! Sequences the weekly run:
//! `Validate → PlanIntent → RecipeAttach → GroceryBuild →
//! AdvisoryAnalytics → DigestDraft → QAGate → DigestFinal`.
//!
//! Each stage is gated by validation of its inputs. A fatal validation
//! failure halts immediately with no artifacts beyond the run log. The QA
//! gate runs against the finished draft so it sees every other artifact in
//! final form, and its verdict is then re-embedded into the final digest.
//! All artifacts are written even when the verdict is FAIL; only the
//! process exit code flips.

/// Advisory analytics stage
pub mod analytics;
/// Digest composition stage
pub mod digest;
/// Grocery build stage
pub mod grocery_build;
/// Plan-intent stage
pub mod plan_intent;
/// QA gate stage
pub mod qa_gate;
/// Recipe attachment stage
pub mod recipes;
/// The append-only run log
pub mod run_log;

pub use run_log::{RunLog, StageRecord, StageStatus};

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::PlannerConfig;
use crate::errors::{AppError, AppResult};
use crate::external::{ProductResolver, RecipeSource};
use crate::models::{OutcomeSignals, QaVerdict, RolledGroceryItem, UserProfile, WeeklyContext};

/// All validated input documents for one run
#[derive(Debug, Clone)]
pub struct PipelineInputs {
    /// User profile document
    pub profile: UserProfile,
    /// Weekly context document
    pub context: WeeklyContext,
    /// Outcome signal summaries
    pub signals: OutcomeSignals,
}

/// Where a run reads and writes its files
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory all per-run artifacts are written into
    pub out_dir: PathBuf,
    /// Path of the long-lived historical feature table
    pub feature_table_path: PathBuf,
    /// Base-variant grocery artifact, for the alt-variant diff
    pub base_grocery_path: Option<PathBuf>,
}

/// Serialized grocery artifact (`grocery_list.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryArtifact {
    /// Week the list covers
    pub week_start: NaiveDate,
    /// Rolled shopping-list items
    pub items: Vec<RolledGroceryItem>,
}

/// Result of a completed (non-halted) run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// QA verdict; FAIL flips the process exit code
    pub verdict: QaVerdict,
    /// Digest subject line
    pub subject: String,
    /// Final digest body
    pub digest: String,
    /// The run log as recorded
    pub run_log: RunLog,
}

/// The stage-sequenced weekly pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PlannerConfig,
}

impl Pipeline {
    /// Create a pipeline, validating the configuration up front
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any configured constant is invalid.
    pub fn new(config: PlannerConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Execute the full weekly run.
    ///
    /// # Errors
    ///
    /// Returns an error only on fatal conditions: malformed inputs (stage 0)
    /// or filesystem failure while writing artifacts. The run log is written
    /// even then. A QA FAIL is not an error - it is reported in the outcome.
    pub fn run(
        &self,
        inputs: &PipelineInputs,
        recipe_source: &dyn RecipeSource,
        product_resolver: Option<&dyn ProductResolver>,
        options: &RunOptions,
    ) -> AppResult<RunOutcome> {
        fs::create_dir_all(&options.out_dir)?;
        let mut run_log = RunLog::new(inputs.context.week_start);

        let result = self.run_stages(inputs, recipe_source, product_resolver, options, &mut run_log);
        if let Err(err) = &result {
            error!(error = %err, "pipeline halted");
            run_log.record_stage("Halt", StageStatus::Fail, &err.to_string());
        }
        // The run log is the one artifact that always lands on disk
        fs::write(options.out_dir.join("run_log.md"), run_log.to_markdown())?;

        result.map(|(verdict, subject, digest)| RunOutcome {
            verdict,
            subject,
            digest,
            run_log,
        })
    }

    fn run_stages(
        &self,
        inputs: &PipelineInputs,
        recipe_source: &dyn RecipeSource,
        product_resolver: Option<&dyn ProductResolver>,
        options: &RunOptions,
        run_log: &mut RunLog,
    ) -> AppResult<(QaVerdict, String, String)> {
        let out_dir = &options.out_dir;

        // Stage 0 - validate
        let defaults = validate_inputs(inputs, run_log)?;
        run_log.record_stage("Stage 0 (Validate)", StageStatus::Pass, "");
        info!(defaults = defaults.len(), "inputs validated");

        // Stage 1 - plan intent
        let plan = plan_intent::build_plan_intent(
            &inputs.profile,
            &inputs.context,
            &inputs.signals,
            defaults,
            &self.config.nutrition,
        );
        fs::write(
            out_dir.join("plan_intent.md"),
            plan_intent::plan_intent_to_markdown(&plan),
        )?;
        fs::write(
            out_dir.join("plan_intent.json"),
            serde_json::to_string_pretty(&plan)?,
        )?;
        run_log.record_stage("Stage 1 (Plan Intent)", StageStatus::Pass, "");
        info!(meal_ids = plan.meal_ids.len(), "plan intent built");

        // Stage 2 - recipe attachment (external collaborator)
        let recipes = recipes::attach_recipes(&plan, &inputs.profile, recipe_source, run_log);
        fs::write(out_dir.join("recipes.md"), recipes::recipes_to_markdown(&recipes))?;
        let batch_cook = recipes.iter().filter(|r| r.batch_cook).count();
        run_log.record_stage(
            "Stage 2 (Recipes)",
            StageStatus::Pass,
            &format!("{} recipes attached ({batch_cook} batch-cook)", recipes.len()),
        );

        // Stage 3 - grocery build
        let (mut grocery_items, csv_rows) =
            grocery_build::build_grocery(&recipes, &self.config.store_name);
        if let Some(resolver) = product_resolver {
            match resolver.resolve(&grocery_items) {
                Ok(matches) => {
                    grocery_build::apply_product_matches(&mut grocery_items, &matches);
                }
                Err(err) => {
                    warn!(error = %err, "product resolver failed; prices left empty");
                    run_log.add_fallback(format!(
                        "product resolver failed ({err}); prices left empty"
                    ));
                }
            }
        }
        grocery_build::write_grocery_csv(&csv_rows, &out_dir.join("grocery_list.csv"))?;
        fs::write(
            out_dir.join("grocery_notes.md"),
            grocery_build::grocery_notes_to_markdown(
                &grocery_items,
                &csv_rows,
                &self.config.store_name,
            ),
        )?;
        fs::write(
            out_dir.join("Grocery_List.md"),
            grocery_build::grocery_to_markdown(plan.week_start, &grocery_items),
        )?;
        let grocery_artifact = GroceryArtifact {
            week_start: plan.week_start,
            items: grocery_items.clone(),
        };
        fs::write(
            out_dir.join("grocery_list.json"),
            serde_json::to_string_pretty(&grocery_artifact)?,
        )?;
        run_log.record_stage(
            "Stage 3 (Grocery)",
            StageStatus::Pass,
            &format!(
                "{} line items, {} after rollup",
                csv_rows.len(),
                grocery_items.len()
            ),
        );

        // Stage 4 - advisory analytics (never blocks the plan)
        let (modifications, weeks_available) = match analytics::run_analytics(
            &plan,
            &inputs.signals,
            &self.config.nutrition.week_tier,
            &options.feature_table_path,
        ) {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "analytics stage degraded");
                run_log.add_fallback(format!("analytics degraded ({err}); no row appended"));
                (
                    crate::models::PlanModifications {
                        generated_at: chrono::Utc::now(),
                        data_confidence: "insufficient".to_owned(),
                        revision_pass_authorized: false,
                        modifications: Vec::new(),
                        max_modifications_applied: 3,
                        note: format!("analytics unavailable this run: {err}"),
                    },
                    0,
                )
            }
        };
        fs::write(
            out_dir.join("plan_modifications.json"),
            serde_json::to_string_pretty(&modifications)?,
        )?;
        fs::write(
            out_dir.join("Insights_Report.md"),
            analytics::insights_report(&modifications, weeks_available),
        )?;
        run_log.record_stage(
            "Stage 4 (Analytics)",
            StageStatus::Pass,
            &format!(
                "data_confidence={} ({weeks_available} weeks in feature table)",
                modifications.data_confidence
            ),
        );
        if modifications.revision_pass_authorized {
            run_log.record_stage("Stage 4b (Revision)", StageStatus::Pass, "revision pass executed");
        } else {
            run_log.record_stage(
                "Stage 4b (Revision)",
                StageStatus::Skip,
                "data_confidence=insufficient — revision_pass_authorized=false",
            );
        }

        // Variant comparison (alt runs only, when a base artifact exists)
        let diff_lines = options
            .base_grocery_path
            .as_deref()
            .filter(|p| p.exists())
            .and_then(|path| match load_grocery_artifact(path) {
                Ok(base) => Some(grocery_build::compute_grocery_diff(
                    &base.items,
                    &grocery_items,
                )),
                Err(err) => {
                    warn!(error = %err, "base grocery artifact unreadable; diff skipped");
                    None
                }
            });

        // Stage 5 - digest draft with a placeholder QA section
        let (_, draft) = digest::build_digest(
            &inputs.profile,
            &inputs.context,
            &plan,
            &recipes,
            &grocery_items,
            &modifications,
            digest::QA_PLACEHOLDER,
            diff_lines.as_deref(),
        );
        run_log.record_stage("Stage 5 (Digest)", StageStatus::Pass, "draft composed");

        // Stage 6 - QA gate over the draft (all other artifacts final-form)
        let report = qa_gate::evaluate(
            &inputs.profile,
            &plan,
            &recipes,
            &csv_rows,
            &draft,
            &modifications,
            &self.config.qa,
        );
        fs::write(
            out_dir.join("qa_report.md"),
            qa_gate::report_to_markdown(&report, &draft, &recipes, &modifications, &self.config.qa),
        )?;
        let verdict = report.verdict;
        run_log.record_stage(
            "Stage 6 (QA Gate)",
            if verdict == QaVerdict::Pass {
                StageStatus::Pass
            } else {
                StageStatus::Fail
            },
            "",
        );

        // Final digest with the real verdict embedded
        let (subject, final_digest) = digest::build_digest(
            &inputs.profile,
            &inputs.context,
            &plan,
            &recipes,
            &grocery_items,
            &modifications,
            &digest::qa_section_from_report(&report),
            diff_lines.as_deref(),
        );
        fs::write(out_dir.join("Weekly_Email_Digest.md"), &final_digest)?;
        info!(verdict = verdict.as_str(), "run complete");

        Ok((verdict, subject, final_digest))
    }
}

/// Load a previously written grocery artifact
fn load_grocery_artifact(path: &std::path::Path) -> AppResult<GroceryArtifact> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Stage 0: presence/shape validation with fail-fast semantics.
///
/// Missing required fields are caught at deserialization; this gate checks
/// the cross-field invariants (exactly 7 schedule days, non-blank context
/// strings) and records applied defaults for the missing optionals.
///
/// # Errors
///
/// Returns a fatal error naming the offending field when the schedule
/// length is wrong or a required string is blank.
pub fn validate_inputs(inputs: &PipelineInputs, run_log: &mut RunLog) -> AppResult<Vec<String>> {
    let context = &inputs.context;
    let profile = &inputs.profile;

    if context.schedule.len() != 7 {
        return Err(AppError::invalid_input(format!(
            "weekly_context.json: schedule must have exactly 7 days; found {}",
            context.schedule.len()
        )));
    }
    if context.timezone.trim().is_empty() {
        return Err(AppError::missing_field("weekly_context.json", "timezone"));
    }
    if context.training_focus.trim().is_empty() {
        return Err(AppError::missing_field(
            "weekly_context.json",
            "training_focus",
        ));
    }
    if profile.user_id.trim().is_empty() {
        return Err(AppError::missing_field("user_profile.json", "user_id"));
    }

    let mut defaults = Vec::new();
    if !(profile.weight_kg.is_finite() && profile.weight_kg > 0.0) {
        let msg = "weight_kg: non-positive; engine fallback of 75 kg applied";
        defaults.push(msg.to_owned());
        run_log.add_default(msg);
    }
    if profile.pal_value.is_none() {
        let msg = "pal_value: applied default 1.55 (desk job + light walking)";
        defaults.push(msg.to_owned());
        run_log.add_default("pal_value: default 1.55");
    }
    if profile.body_fat_pct.is_none() {
        let msg =
            "body_fat_pct: not set; using the regression equation (body-composition formula unavailable)";
        defaults.push(msg.to_owned());
        run_log.add_default("body_fat_pct: missing — regression equation used");
    }
    if inputs.signals.nutrition_summary.avg_kcal.is_none() {
        let msg = "nutrition log: not available; macro adherence tracking unavailable this week";
        defaults.push(msg.to_owned());
        run_log.add_default("nutrition_summary.avg_kcal: null — no adherence tracking");
    }

    Ok(defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduleDay;

    fn inputs(schedule_len: usize) -> PipelineInputs {
        let start = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        PipelineInputs {
            profile: serde_json::from_value(serde_json::json!({
                "user_id": "u1", "name": "Test", "age": 30, "sex": "male",
                "height_cm": 175.0, "weight_kg": 70.0, "goal": "maintain"
            }))
            .unwrap(),
            context: WeeklyContext {
                week_start: start,
                timezone: "UTC".into(),
                training_focus: "base".into(),
                schedule: (0..schedule_len)
                    .map(|i| ScheduleDay {
                        date: start + chrono::Duration::days(i as i64),
                        day_type: Some("training".into()),
                        notes: None,
                    })
                    .collect(),
            },
            signals: OutcomeSignals::default(),
        }
    }

    #[test]
    fn wrong_schedule_length_is_fatal() {
        let mut run_log = RunLog::new(NaiveDate::from_ymd_opt(2026, 8, 3).unwrap());
        let err = validate_inputs(&inputs(6), &mut run_log).unwrap_err();
        assert!(err.message.contains("exactly 7 days"));
        assert!(err.message.contains('6'));
    }

    #[test]
    fn missing_optionals_become_defaults_not_failures() {
        let mut run_log = RunLog::new(NaiveDate::from_ymd_opt(2026, 8, 3).unwrap());
        let defaults = validate_inputs(&inputs(7), &mut run_log).unwrap();
        // pal_value, body_fat_pct, and nutrition log are all absent
        assert_eq!(defaults.len(), 3);
        assert_eq!(run_log.defaults.len(), 3);
    }
}
