// ABOUTME: Grocery item models - raw per-ingredient references, rolled-up shopping lines, CSV rows
// ABOUTME: Raw items are created once per recipe ingredient and never mutated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One physical-ingredient reference from one recipe.
///
/// Many raw items may describe the same physical ingredient under different
/// names and units; only the rollup engine reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGroceryItem {
    /// Ingredient name as written by the recipe source
    pub name: String,
    /// Quantity in `unit`
    pub quantity: f64,
    /// Unit token before normalization
    pub unit: String,
    /// Grocery category hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Dates of the meals this reference came from
    #[serde(default)]
    pub source_days: Vec<NaiveDate>,
    /// Meal identifier of the owning recipe
    pub meal_id: String,
}

/// One shopping-list line after normalization and rollup; immutable once
/// emitted. Retailer annotations are filled only by the external product
/// resolver and stay empty otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolledGroceryItem {
    /// Display name (first-seen raw spelling)
    pub name_display: String,
    /// Canonical name after alias and plural mapping
    pub name_normalized: String,
    /// Total quantity in `unit`
    pub total_quantity: f64,
    /// Canonical unit token
    pub unit: String,
    /// Grocery category ("unknown" when no hint was given)
    pub category: String,
    /// Sorted, deduplicated dates of contributing meals
    pub source_days: Vec<NaiveDate>,
    /// Human-readable note ("Unit conversion applied" after a cross-unit merge)
    #[serde(default)]
    pub notes: String,
    /// Store product name from the resolver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_item_name: Option<String>,
    /// Resolved price in USD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<f64>,
    /// Resolved SKU
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Resolver match quality (exact/approximate/best-effort)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_type: Option<String>,
}

/// One row of the retailer-facing grocery CSV.
///
/// `meal_id` is "MULTI" when the ingredient aggregates across meals. Price
/// and SKU stay blank unless the external resolver supplies them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryCsvRow {
    /// Owning meal id, or "MULTI"
    pub meal_id: String,
    /// Slugged ingredient identifier
    pub ingredient_id: String,
    /// Grocery category
    pub category: String,
    /// Ingredient display name
    pub item_name: String,
    /// Aggregated quantity
    pub quantity: f64,
    /// Unit token
    pub unit: String,
    /// Store name
    pub store: String,
    /// Price, blank unless resolved
    pub price: String,
    /// SKU, blank unless resolved
    pub sku: String,
    /// Match quality; required non-blank by the QA gate
    pub match_confidence: String,
    /// First substitute suggestion
    pub substitute_1: String,
    /// Second substitute suggestion
    pub substitute_2: String,
}
