// ABOUTME: Day-type classification from schedule entries and free-text session notes
// ABOUTME: Pure total function; ambiguity defaults to a standard training day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

//! Day-Type Classifier
//!
//! Maps one schedule entry to `rest | training | high`. An explicit valid
//! `day_type` in the entry is authoritative; otherwise the note text is
//! scanned for intensity tokens. There are no failure modes - every entry
//! classifies to something.

use crate::models::{DayType, ScheduleDay};

/// Note tokens indicating a high-intensity day (long/interval/race work)
const HIGH_TOKENS: [&str; 3] = ["long", "interval", "race"];

/// Note tokens indicating a rest or mobility day
const REST_TOKENS: [&str; 2] = ["rest", "mobility"];

/// Classify one schedule entry.
///
/// Resolution order:
/// 1. An explicit, valid `day_type` is returned unchanged.
/// 2. Notes containing a high-intensity token → [`DayType::High`].
/// 3. Notes containing a rest token → [`DayType::Rest`].
/// 4. Anything else → [`DayType::Training`].
#[must_use]
pub fn classify(entry: &ScheduleDay) -> DayType {
    if let Some(explicit) = entry.day_type.as_deref().and_then(DayType::parse) {
        return explicit;
    }

    let notes = entry
        .notes
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    if HIGH_TOKENS.iter().any(|t| notes.contains(t)) {
        return DayType::High;
    }
    if REST_TOKENS.iter().any(|t| notes.contains(t)) {
        return DayType::Rest;
    }
    DayType::Training
}
