// ABOUTME: Append-only run log - stage completions, defaults applied, fallbacks taken
// ABOUTME: One per pipeline execution; serialized to markdown even on fatal halt
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of one pipeline stage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum StageStatus {
    /// Stage completed
    Pass,
    /// Stage failed (the run halts or the QA verdict was FAIL)
    Fail,
    /// Stage intentionally skipped
    Skip,
}

impl StageStatus {
    /// Uppercase label as written in the run log
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
        }
    }
}

/// One recorded stage completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRecord {
    /// Stage name
    pub stage: String,
    /// Completion timestamp
    pub timestamp: DateTime<Utc>,
    /// Outcome
    pub status: StageStatus,
    /// Optional free-text note
    pub note: String,
}

/// Append-only record of one pipeline execution.
///
/// Single writer, single process; exists only for the duration of a run and
/// is serialized at the end (or at a fatal halt).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLog {
    /// Unique run identifier
    pub run_id: Uuid,
    /// Week the run planned
    pub week_start: NaiveDate,
    /// Stage completions in execution order
    pub stages: Vec<StageRecord>,
    /// Defaults applied for missing optional inputs
    pub defaults: Vec<String>,
    /// Fallbacks taken for failed external collaborators
    pub fallbacks: Vec<String>,
}

impl RunLog {
    /// Start a new run log
    #[must_use]
    pub fn new(week_start: NaiveDate) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            week_start,
            stages: Vec::new(),
            defaults: Vec::new(),
            fallbacks: Vec::new(),
        }
    }

    /// Record a stage completion
    pub fn record_stage(&mut self, stage: &str, status: StageStatus, note: &str) {
        self.stages.push(StageRecord {
            stage: stage.to_owned(),
            timestamp: Utc::now(),
            status,
            note: note.to_owned(),
        });
    }

    /// Record a default applied for a missing optional input
    pub fn add_default(&mut self, msg: impl Into<String>) {
        self.defaults.push(msg.into());
    }

    /// Record a fallback taken for a failed collaborator
    pub fn add_fallback(&mut self, msg: impl Into<String>) {
        self.fallbacks.push(msg.into());
    }

    /// Render the run log as markdown
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut lines = vec![
            format!("# Run Log — {}", self.week_start),
            format!("Run ID: {}", self.run_id),
            String::new(),
            "## Stage Completions".to_owned(),
        ];
        for record in &self.stages {
            let note = if record.note.is_empty() {
                String::new()
            } else {
                format!(" — {}", record.note)
            };
            lines.push(format!(
                "- {}: {} — {}{}",
                record.stage,
                record.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
                record.status.as_str(),
                note
            ));
        }
        lines.push(String::new());
        lines.push("## Defaults Applied".to_owned());
        if self.defaults.is_empty() {
            lines.push("- None".to_owned());
        } else {
            for d in &self.defaults {
                lines.push(format!("- {d}"));
            }
        }
        lines.push(String::new());
        lines.push("## Fallbacks".to_owned());
        if self.fallbacks.is_empty() {
            lines.push("- None".to_owned());
        } else {
            for f in &self.fallbacks {
                lines.push(format!("- {f}"));
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_lists_stages_and_defaults() {
        let mut log = RunLog::new(NaiveDate::from_ymd_opt(2026, 8, 3).unwrap());
        log.record_stage("Stage 0 (Validate)", StageStatus::Pass, "");
        log.record_stage("Stage 4b (Revision)", StageStatus::Skip, "insufficient data");
        log.add_default("pal_value: default 1.55");

        let md = log.to_markdown();
        assert!(md.contains("Stage 0 (Validate)"));
        assert!(md.contains("PASS"));
        assert!(md.contains("SKIP — insufficient data"));
        assert!(md.contains("pal_value: default 1.55"));
        assert!(md.contains("## Fallbacks\n- None"));
    }
}
