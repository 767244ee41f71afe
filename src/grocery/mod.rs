// ABOUTME: Grocery normalization - canonical names, units, and cross-unit conversion factors
// ABOUTME: Fixed lookup tables with documented default-on-miss: unknown tokens pass through
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

//! Grocery Normalization & Rollup
//!
//! Canonicalizes ingredient names and units across many meals, then merges
//! duplicate and unit-equivalent entries. All tables are fixed finite maps;
//! a token with no entry is left unchanged rather than erroring, so the
//! engine is total over arbitrary recipe output.

/// The rollup engine
pub mod rollup;

pub use rollup::rollup;

use std::collections::HashMap;
use std::sync::LazyLock;

/// Ingredient name aliases: synonyms and regional spellings
static NAME_ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("capsicum", "bell pepper"),
        ("bell peppers", "bell pepper"),
        ("olive oil extra virgin", "olive oil"),
        ("extra virgin olive oil", "olive oil"),
        ("ev olive oil", "olive oil"),
    ])
});

/// Ingredient-domain plural → singular map.
///
/// Replaces a naive trailing-s strip, which corrupts words like
/// "hummus" → "hummu" or "asparagus" → "asparagu". Unmapped plurals are
/// left as-is.
static PLURAL_MAP: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("oats", "oat"),
        ("berries", "berry"),
        ("greens", "green"),
        ("whites", "white"),
        ("fillets", "fillet"),
        ("eggs", "egg"),
        ("bananas", "banana"),
        ("peppers", "pepper"),
        ("tomatoes", "tomato"),
        ("potatoes", "potato"),
        ("onions", "onion"),
        ("carrots", "carrot"),
        ("olives", "olive"),
        ("grapes", "grape"),
        ("nuts", "nut"),
        ("almonds", "almond"),
        ("cashews", "cashew"),
        ("walnuts", "walnut"),
        ("strawberries", "strawberry"),
        ("blueberries", "blueberry"),
        ("raspberries", "raspberry"),
        ("cherries", "cherry"),
        ("peaches", "peach"),
        ("apples", "apple"),
        ("oranges", "orange"),
        ("lemons", "lemon"),
        ("limes", "lime"),
        ("mushrooms", "mushroom"),
        ("zucchinis", "zucchini"),
        ("cucumbers", "cucumber"),
        ("lentils", "lentil"),
        ("beans", "bean"),
        ("chickpeas", "chickpea"),
        ("shrimps", "shrimp"),
        ("sardines", "sardine"),
        ("anchovies", "anchovy"),
        ("herbs", "herb"),
        ("spices", "spice"),
        ("seeds", "seed"),
    ])
});

/// Unit aliases → canonical unit tokens
static UNIT_ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("grams", "g"),
        ("gram", "g"),
        ("kilogram", "kg"),
        ("kilograms", "kg"),
        ("milliliter", "ml"),
        ("milliliters", "ml"),
        ("liter", "l"),
        ("liters", "l"),
        ("tablespoon", "tbsp"),
        ("tablespoons", "tbsp"),
        ("teaspoon", "tsp"),
        ("teaspoons", "tsp"),
        ("count", "count"),
    ])
});

/// Grams per kilogram
const G_PER_KG: f64 = 1000.0;
/// Milliliters per liter
const ML_PER_L: f64 = 1000.0;
/// Milliliters per tablespoon
const ML_PER_TBSP: f64 = 15.0;
/// Milliliters per teaspoon
const ML_PER_TSP: f64 = 5.0;

/// Collapse internal whitespace and lowercase
fn canonical_token(s: &str) -> String {
    s.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonicalize an ingredient name: lowercase, collapse whitespace, alias
/// table, then the irregular-plural map.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let mut n = canonical_token(name);
    if let Some(alias) = NAME_ALIASES.get(n.as_str()) {
        n = (*alias).to_owned();
    }
    if let Some(singular) = PLURAL_MAP.get(n.as_str()) {
        n = (*singular).to_owned();
    }
    n
}

/// Canonicalize a unit token: lowercase, collapse whitespace, alias table.
/// Unknown units pass through unchanged.
#[must_use]
pub fn normalize_unit(unit: &str) -> String {
    let u = canonical_token(unit);
    UNIT_ALIASES
        .get(u.as_str())
        .map_or(u, |canonical| (*canonical).to_owned())
}

/// Convert a quantity between canonical units.
///
/// Identity when the units match; `None` when no factor is known - callers
/// must not merge in that case.
#[must_use]
pub fn convert(quantity: f64, from_unit: &str, to_unit: &str) -> Option<f64> {
    if from_unit == to_unit {
        return Some(quantity);
    }
    let factor = match (from_unit, to_unit) {
        ("kg", "g") => G_PER_KG,
        ("g", "kg") => 1.0 / G_PER_KG,
        ("l", "ml") => ML_PER_L,
        ("ml", "l") => 1.0 / ML_PER_L,
        ("tbsp", "ml") => ML_PER_TBSP,
        ("tsp", "ml") => ML_PER_TSP,
        _ => return None,
    };
    Some(quantity * factor)
}
