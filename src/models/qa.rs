// ABOUTME: QA gate report model - issue categories, severity split, and overall verdict
// ABOUTME: Coverage/constraints/modification/tone block; macro/grocery/recipes are advisory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

use serde::{Deserialize, Serialize};

/// Category of a QA issue; determines whether it blocks publication
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum QaCategory {
    /// Required digest section missing
    Coverage,
    /// Avoid-list or allergy term violated
    Constraints,
    /// Average kcal deviates beyond tolerance
    Macro,
    /// Grocery CSV row incomplete
    Grocery,
    /// Recipe link missing/placeholder or meal id uncovered
    Recipes,
    /// Plan modification references an unknown meal id
    Modification,
    /// Medical-claim or prescriptive phrasing in the digest
    Tone,
}

impl QaCategory {
    /// Whether issues in this category force an overall FAIL
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(
            self,
            Self::Coverage | Self::Constraints | Self::Modification | Self::Tone
        )
    }
}

/// One itemized QA finding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaIssue {
    /// Issue category
    pub category: QaCategory,
    /// Human-readable description
    pub message: String,
}

impl QaIssue {
    /// Create a new issue
    pub fn new(category: QaCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

/// Overall QA verdict
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum QaVerdict {
    /// No blocking issues
    Pass,
    /// At least one blocking issue
    Fail,
}

impl QaVerdict {
    /// Uppercase label as written in reports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

/// Aggregated QA findings plus the overall verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaReport {
    /// All findings, blocking and advisory
    pub issues: Vec<QaIssue>,
    /// FAIL iff any blocking-category issue exists
    pub verdict: QaVerdict,
}

impl QaReport {
    /// Build a report from findings, deriving the verdict
    #[must_use]
    pub fn from_issues(issues: Vec<QaIssue>) -> Self {
        let verdict = if issues.iter().any(|i| i.category.is_blocking()) {
            QaVerdict::Fail
        } else {
            QaVerdict::Pass
        };
        Self { issues, verdict }
    }

    /// Issues that force the FAIL verdict
    #[must_use]
    pub fn blocking_issues(&self) -> Vec<&QaIssue> {
        self.issues
            .iter()
            .filter(|i| i.category.is_blocking())
            .collect()
    }

    /// Reported-only issues
    #[must_use]
    pub fn advisory_issues(&self) -> Vec<&QaIssue> {
        self.issues
            .iter()
            .filter(|i| !i.category.is_blocking())
            .collect()
    }

    /// Issues in one category
    #[must_use]
    pub fn in_category(&self, category: QaCategory) -> Vec<&QaIssue> {
        self.issues
            .iter()
            .filter(|i| i.category == category)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_fails_only_on_blocking() {
        let advisory = QaReport::from_issues(vec![QaIssue::new(QaCategory::Macro, "off by 12%")]);
        assert_eq!(advisory.verdict, QaVerdict::Pass);

        let blocking = QaReport::from_issues(vec![
            QaIssue::new(QaCategory::Macro, "off by 12%"),
            QaIssue::new(QaCategory::Coverage, "missing section"),
        ]);
        assert_eq!(blocking.verdict, QaVerdict::Fail);
        assert_eq!(blocking.blocking_issues().len(), 1);
        assert_eq!(blocking.advisory_issues().len(), 1);
    }
}
