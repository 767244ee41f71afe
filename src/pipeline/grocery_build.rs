// ABOUTME: Grocery build stage - flatten recipe ingredients, roll up, aggregate the retailer CSV
// ABOUTME: Also renders grocery markdown artifacts and the base/alt variant diff
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use crate::errors::AppResult;
use crate::external::ProductMatch;
use crate::grocery::rollup;
use crate::models::{AttachedRecipe, GroceryCsvRow, RawGroceryItem, RolledGroceryItem};

/// Marker used in the CSV when an ingredient aggregates across meals
const MULTI_MEAL: &str = "MULTI";

/// Flatten every attached recipe's ingredients into raw grocery items and
/// roll them up; also produce the retailer-facing CSV rows aggregated by
/// ingredient id.
#[must_use]
pub fn build_grocery(
    recipes: &[AttachedRecipe],
    store_name: &str,
) -> (Vec<RolledGroceryItem>, Vec<GroceryCsvRow>) {
    let mut raw_items = Vec::new();
    let mut csv_rows = Vec::new();

    for recipe in recipes {
        for ing in &recipe.ingredients {
            let category = ing.category.clone().unwrap_or_else(|| "other".to_owned());
            raw_items.push(RawGroceryItem {
                name: ing.name.clone(),
                quantity: ing.quantity,
                unit: ing.unit.clone(),
                category: Some(category.clone()),
                source_days: vec![recipe.date],
                meal_id: recipe.meal_id.clone(),
            });
            csv_rows.push(GroceryCsvRow {
                meal_id: recipe.meal_id.clone(),
                ingredient_id: ingredient_slug(&ing.name),
                category,
                item_name: ing.name.clone(),
                quantity: ing.quantity,
                unit: ing.unit.clone(),
                store: store_name.to_owned(),
                price: String::new(),
                sku: String::new(),
                match_confidence: "approximate".to_owned(),
                substitute_1: String::new(),
                substitute_2: String::new(),
            });
        }
    }

    (rollup(&raw_items), aggregate_csv_rows(csv_rows))
}

/// Slug an ingredient name into a stable identifier
fn ingredient_slug(name: &str) -> String {
    format!("ing_{}", name.to_lowercase().replace(['-', ' '], "_"))
}

/// Aggregate CSV rows by ingredient id: quantities sum, meal id becomes
/// MULTI when more than one meal contributes, rows sort by category then
/// item name.
fn aggregate_csv_rows(rows: Vec<GroceryCsvRow>) -> Vec<GroceryCsvRow> {
    let mut order: Vec<String> = Vec::new();
    let mut by_id: HashMap<String, (GroceryCsvRow, HashSet<String>)> = HashMap::new();

    for row in rows {
        match by_id.get_mut(&row.ingredient_id) {
            Some((existing, meal_ids)) => {
                existing.quantity += row.quantity;
                meal_ids.insert(row.meal_id);
            }
            None => {
                order.push(row.ingredient_id.clone());
                let meal_ids = HashSet::from([row.meal_id.clone()]);
                by_id.insert(row.ingredient_id.clone(), (row, meal_ids));
            }
        }
    }

    let mut result: Vec<GroceryCsvRow> = order
        .into_iter()
        .filter_map(|id| by_id.remove(&id))
        .map(|(mut row, meal_ids)| {
            if meal_ids.len() > 1 {
                row.meal_id = MULTI_MEAL.to_owned();
            }
            row.quantity = row.quantity.round();
            row
        })
        .collect();
    result.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| a.item_name.cmp(&b.item_name))
    });
    result
}

/// Annotate rolled items with retailer product matches, keyed by normalized
/// name. Unmatched items are left untouched.
pub fn apply_product_matches(items: &mut [RolledGroceryItem], matches: &[ProductMatch]) {
    let by_name: HashMap<&str, &ProductMatch> = matches
        .iter()
        .map(|m| (m.name_normalized.as_str(), m))
        .collect();
    for item in items.iter_mut() {
        if let Some(m) = by_name.get(item.name_normalized.as_str()) {
            item.store_item_name = Some(m.store_item_name.clone());
            item.price_usd = m.price_usd;
            item.sku = m.sku.clone();
            item.match_type = Some(m.match_type.clone());
        }
    }
}

/// Write the retailer CSV artifact
///
/// # Errors
///
/// Returns an error on filesystem or encoding failure.
pub fn write_grocery_csv(rows: &[GroceryCsvRow], path: &Path) -> AppResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Render the grocery notes artifact: budget band, flagged items,
/// batch-cook aggregation summary.
#[must_use]
pub fn grocery_notes_to_markdown(
    items: &[RolledGroceryItem],
    csv_rows: &[GroceryCsvRow],
    store_name: &str,
) -> String {
    let total_items = items.len();
    let est_low = total_items as f64 * 2.5;
    let est_high = total_items as f64 * 5.0;

    let mut approximate: Vec<&str> = csv_rows
        .iter()
        .filter(|r| r.match_confidence == "approximate")
        .map(|r| r.item_name.as_str())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    approximate.sort_unstable();

    let mut no_match: Vec<&str> = csv_rows
        .iter()
        .filter(|r| r.match_confidence == "best-effort")
        .map(|r| r.item_name.as_str())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    no_match.sort_unstable();

    let mut multi_meal: Vec<&str> = csv_rows
        .iter()
        .filter(|r| r.meal_id == MULTI_MEAL)
        .map(|r| r.item_name.as_str())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    multi_meal.sort_unstable();

    let mut lines = vec![
        "# Grocery Notes".to_owned(),
        String::new(),
        format!("## Store: {store_name}"),
        format!(
            "## Budget Estimate: ${est_low:.0}–${est_high:.0} (approximate; {total_items} line items)"
        ),
        String::new(),
        "## Items Flagged as Approximate".to_owned(),
    ];
    if approximate.is_empty() {
        lines.push("- None".to_owned());
    } else {
        lines.extend(approximate.iter().map(|i| format!("- {i}")));
    }

    lines.push(String::new());
    lines.push("## Items With No Match (Needs Manual Lookup)".to_owned());
    if no_match.is_empty() {
        lines.push("- None".to_owned());
    } else {
        lines.extend(no_match.iter().map(|i| format!("- {i}")));
    }

    lines.push(String::new());
    lines.push("## Batch-Cook Notes".to_owned());
    if multi_meal.is_empty() {
        lines.push("- No batch-cook aggregation this week".to_owned());
    } else {
        lines.push(format!(
            "- {} ingredients aggregated across multiple meals (meal_id=MULTI in CSV)",
            multi_meal.len()
        ));
        lines.extend(multi_meal.iter().take(8).map(|i| format!("  - {i}")));
    }

    lines.join("\n")
}

/// Render the human-readable grocery list grouped by category
#[must_use]
pub fn grocery_to_markdown(week_start: chrono::NaiveDate, items: &[RolledGroceryItem]) -> String {
    let mut groups: BTreeMap<&str, Vec<&RolledGroceryItem>> = BTreeMap::new();
    for item in items {
        groups.entry(item.category.as_str()).or_default().push(item);
    }
    let has_prices = items.iter().any(|i| i.price_usd.is_some());

    let mut lines = vec![
        format!("# Grocery List ({week_start})"),
        String::new(),
        "**Items**".to_owned(),
    ];
    for (category, group) in &mut groups {
        lines.push(String::new());
        lines.push(title_case(category));
        group.sort_by(|a, b| a.name_normalized.cmp(&b.name_normalized));
        for item in group.iter() {
            let mut line = format!(
                "- {} — {:.0} {}",
                item.name_display, item.total_quantity, item.unit
            );
            if let Some(price) = item.price_usd {
                line.push_str(&format!(" | ${price:.2}"));
                if item.match_type.as_deref() == Some("approximate") {
                    line.push_str(" (approx match)");
                }
            } else if has_prices {
                line.push_str(" | price unavailable");
            }
            if let Some(store_name) = &item.store_item_name {
                if !store_name.eq_ignore_ascii_case(&item.name_display) {
                    line.push_str(&format!("\n  -> {store_name}"));
                }
            }
            lines.push(line);
        }
    }
    if has_prices {
        let priced: Vec<_> = items.iter().filter(|i| i.price_usd.is_some()).collect();
        let total: f64 = priced.iter().filter_map(|i| i.price_usd).sum();
        lines.push(format!(
            "\n**Estimated Total:** ${total:.2} ({}/{} items priced)",
            priced.len(),
            items.len()
        ));
    }
    lines.push(String::new());
    lines.join("\n")
}

/// Top quantity deltas between the base and alt variant grocery lists,
/// formatted for the digest (at most five lines, largest first).
#[must_use]
pub fn compute_grocery_diff(
    base: &[RolledGroceryItem],
    alt: &[RolledGroceryItem],
) -> Vec<String> {
    let mut base_map: HashMap<(String, String), f64> = HashMap::new();
    for item in base {
        *base_map
            .entry((item.name_normalized.clone(), item.unit.clone()))
            .or_default() += item.total_quantity;
    }
    let mut alt_map: HashMap<(String, String), f64> = HashMap::new();
    for item in alt {
        *alt_map
            .entry((item.name_normalized.clone(), item.unit.clone()))
            .or_default() += item.total_quantity;
    }

    let keys: HashSet<_> = base_map.keys().chain(alt_map.keys()).cloned().collect();
    let mut deltas: Vec<((String, String), f64)> = keys
        .into_iter()
        .filter_map(|k| {
            let d = alt_map.get(&k).copied().unwrap_or(0.0) - base_map.get(&k).copied().unwrap_or(0.0);
            (d.abs() > 0.0001).then_some((k, d))
        })
        .collect();
    deltas.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));

    deltas
        .into_iter()
        .take(5)
        .map(|((name, unit), delta)| {
            let sign = if delta > 0.0 { "+" } else { "-" };
            format!("{sign} {name} ({unit}): {:.0}", delta.abs())
        })
        .collect()
}

/// Title-case a category label for display
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayType, MealSlot, RecipeIngredient, RecipeMacros};
    use chrono::NaiveDate;

    fn recipe(meal_id: &str, day: u32, ingredients: Vec<RecipeIngredient>) -> AttachedRecipe {
        AttachedRecipe {
            meal_id: meal_id.to_owned(),
            date: NaiveDate::from_ymd_opt(2026, 8, day).unwrap(),
            day_type: DayType::Training,
            slot: MealSlot::Dinner,
            name: "Test Meal".to_owned(),
            recipe_link: None,
            batch_cook: false,
            key_ingredients: vec![],
            ingredients,
            macros: RecipeMacros::default(),
            substitution_note: None,
        }
    }

    fn ing(name: &str, quantity: f64, unit: &str) -> RecipeIngredient {
        RecipeIngredient {
            name: name.to_owned(),
            quantity,
            unit: unit.to_owned(),
            category: Some("pantry".to_owned()),
        }
    }

    #[test]
    fn shared_ingredient_becomes_multi_row() {
        let recipes = vec![
            recipe("D1_Dinner", 3, vec![ing("rice", 90.0, "g")]),
            recipe("D2_Dinner", 4, vec![ing("rice", 90.0, "g")]),
        ];
        let (rolled, csv_rows) = build_grocery(&recipes, "Fred Meyer");
        assert_eq!(rolled.len(), 1);
        assert!((rolled[0].total_quantity - 180.0).abs() < f64::EPSILON);
        assert_eq!(csv_rows.len(), 1);
        assert_eq!(csv_rows[0].meal_id, "MULTI");
        assert!((csv_rows[0].quantity - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn csv_rows_sorted_by_category_then_name() {
        let recipes = vec![recipe(
            "D1_Dinner",
            3,
            vec![
                RecipeIngredient {
                    name: "salmon".into(),
                    quantity: 180.0,
                    unit: "g".into(),
                    category: Some("protein".into()),
                },
                RecipeIngredient {
                    name: "broccoli".into(),
                    quantity: 120.0,
                    unit: "g".into(),
                    category: Some("produce".into()),
                },
                RecipeIngredient {
                    name: "rice".into(),
                    quantity: 90.0,
                    unit: "g".into(),
                    category: Some("pantry".into()),
                },
            ],
        )];
        let (_, csv_rows) = build_grocery(&recipes, "Fred Meyer");
        let categories: Vec<&str> = csv_rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, vec!["pantry", "produce", "protein"]);
    }

    #[test]
    fn ingredient_slug_is_stable() {
        assert_eq!(ingredient_slug("Olive Oil"), "ing_olive_oil");
        assert_eq!(ingredient_slug("whole-wheat pasta"), "ing_whole_wheat_pasta");
    }

    #[test]
    fn diff_reports_top_deltas_with_sign() {
        let base = rollup(&[RawGroceryItem {
            name: "rice".into(),
            quantity: 100.0,
            unit: "g".into(),
            category: None,
            source_days: vec![],
            meal_id: "D1_Dinner".into(),
        }]);
        let alt = rollup(&[RawGroceryItem {
            name: "rice".into(),
            quantity: 250.0,
            unit: "g".into(),
            category: None,
            source_days: vec![],
            meal_id: "D1_Dinner".into(),
        }]);
        let diff = compute_grocery_diff(&base, &alt);
        assert_eq!(diff, vec!["+ rice (g): 150"]);
    }

    #[test]
    fn product_matches_annotate_by_normalized_name() {
        let mut items = rollup(&[RawGroceryItem {
            name: "Extra Virgin Olive Oil".into(),
            quantity: 60.0,
            unit: "ml".into(),
            category: None,
            source_days: vec![],
            meal_id: "D1_Dinner".into(),
        }]);
        apply_product_matches(
            &mut items,
            &[ProductMatch {
                name_normalized: "olive oil".into(),
                store_item_name: "Store Brand EVOO 500ml".into(),
                price_usd: Some(8.99),
                sku: Some("0001111".into()),
                match_type: "approximate".into(),
            }],
        );
        assert_eq!(items[0].price_usd, Some(8.99));
        assert_eq!(items[0].match_type.as_deref(), Some("approximate"));
    }
}
