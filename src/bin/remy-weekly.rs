// ABOUTME: remy-weekly - CLI entry point for the stage-gated weekly planning pipeline
// ABOUTME: Loads input documents, runs the pipeline, maps the QA verdict to the exit code
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

//! Weekly pipeline runner.
//!
//! ```bash
//! # Local demo run with bundled inputs
//! remy-weekly --demo
//!
//! # Alternate-context variant, diffed against the base run
//! remy-weekly --demo --variant alt
//!
//! # Write a delivery draft of the digest
//! remy-weekly --demo --deliver-draft --to casey@example.org
//! ```
//!
//! Exit code 0 on QA PASS, 1 on QA FAIL or fatal validation halt.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, warn};

use remy::config::PlannerConfig;
use remy::external::{
    BucketRecipeSource, DigestDelivery, DraftFileDelivery, NoopProductResolver, RecipeSource,
};
use remy::logging::LoggingConfig;
use remy::models::{OutcomeSignals, QaVerdict, UserProfile, WeeklyContext};
use remy::pipeline::{Pipeline, PipelineInputs, RunOptions};

/// Which weekly context document the run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Variant {
    /// The primary weekly context
    Base,
    /// The alternate context, diffed against the base run's grocery list
    Alt,
}

#[derive(Parser)]
#[command(
    name = "remy-weekly",
    about = "Remy weekly nutrition planning pipeline",
    long_about = "Stage-gated weekly pipeline: day typing, macro targets, recipes, \
                  grocery rollup, advisory analytics, digest, and QA gate."
)]
struct Cli {
    /// Run with the local demo inputs
    #[arg(long)]
    demo: bool,

    /// Context variant to plan
    #[arg(long, value_enum, default_value = "base")]
    variant: Variant,

    /// Directory holding the input documents
    #[arg(long, default_value = "demo_inputs")]
    input_dir: PathBuf,

    /// Output directory; defaults to outputs/demo or outputs/demo_alt
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Override the planned week start (YYYY-MM-DD)
    #[arg(long)]
    week_start: Option<String>,

    /// Write a delivery draft of the finished digest
    #[arg(long)]
    deliver_draft: bool,

    /// Draft recipient; falls back to $DELIVERY_EMAIL
    #[arg(long)]
    to: Option<String>,

    /// Annotate the grocery list via the product resolver
    #[arg(long)]
    resolve_products: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    logging.init();

    match run(&cli) {
        Ok(QaVerdict::Pass) => ExitCode::SUCCESS,
        Ok(QaVerdict::Fail) => {
            error!("QA gate verdict: FAIL — review qa_report.md before acting on this plan");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!(error = ?err, "run halted");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<QaVerdict> {
    if !cli.demo {
        anyhow::bail!("use --demo for the local demo run");
    }

    let input_dir = &cli.input_dir;
    let out_dir = cli.out_dir.clone().unwrap_or_else(|| match cli.variant {
        Variant::Base => PathBuf::from("outputs/demo"),
        Variant::Alt => PathBuf::from("outputs/demo_alt"),
    });

    let profile: UserProfile = load_json(&input_dir.join("user_profile.json"))?;
    let context_file = match cli.variant {
        Variant::Base => "weekly_context.json",
        Variant::Alt => "weekly_context_alt.json",
    };
    let mut context: WeeklyContext = load_json(&input_dir.join(context_file))?;
    let signals: OutcomeSignals = load_json(&input_dir.join("outcome_signals.json"))
        .unwrap_or_else(|err| {
            warn!(error = ?err, "outcome signals unavailable; continuing without them");
            OutcomeSignals::default()
        });

    if let Some(week_start) = &cli.week_start {
        context.week_start = week_start
            .parse()
            .with_context(|| format!("invalid --week-start '{week_start}'"))?;
    }

    // A failed bucket load is degraded, not fatal: the placeholder set keeps
    // the pipeline executable end-to-end.
    let buckets_path = input_dir.join("meal_buckets.json");
    let recipe_source: Box<dyn RecipeSource> = match BucketRecipeSource::from_file(&buckets_path) {
        Ok(source) => Box::new(source),
        Err(err) => {
            warn!(error = %err, path = %buckets_path.display(), "meal buckets unavailable; placeholder set used");
            Box::new(BucketRecipeSource::placeholder())
        }
    };

    let resolver = NoopProductResolver;
    let options = RunOptions {
        out_dir: out_dir.clone(),
        feature_table_path: PathBuf::from("data/feature_table.csv"),
        base_grocery_path: (cli.variant == Variant::Alt)
            .then(|| PathBuf::from("outputs/demo/grocery_list.json")),
    };

    let pipeline = Pipeline::new(PlannerConfig::default())?;
    let inputs = PipelineInputs {
        profile,
        context,
        signals,
    };
    let outcome = pipeline.run(
        &inputs,
        recipe_source.as_ref(),
        cli.resolve_products.then_some(&resolver as &dyn remy::external::ProductResolver),
        &options,
    )?;

    if cli.deliver_draft {
        let to = cli
            .to
            .clone()
            .or_else(|| std::env::var("DELIVERY_EMAIL").ok())
            .unwrap_or_else(|| "household@example.org".to_owned());
        let delivery = DraftFileDelivery {
            out_dir: out_dir.clone(),
            to,
        };
        if let Err(err) = delivery.deliver(&outcome.subject, &outcome.digest) {
            // Delivery failure is logged, never fatal to the exit code
            warn!(error = %err, "digest delivery failed");
        }
    }

    println!("Run complete — outputs in {}", out_dir.display());
    println!("  plan_intent.md           Stage 1 artifact");
    println!("  recipes.md               Stage 2 artifact");
    println!("  grocery_list.csv         Stage 3 artifact");
    println!("  grocery_notes.md         Stage 3 artifact");
    println!("  plan_modifications.json  Stage 4 artifact");
    println!("  Insights_Report.md       Stage 4 artifact");
    println!("  Weekly_Email_Digest.md   Stage 5 artifact (primary sendable)");
    println!(
        "  qa_report.md             Stage 6 artifact — Overall: {}",
        outcome.verdict.as_str()
    );
    println!("  run_log.md               Orchestrator log");

    Ok(outcome.verdict)
}
