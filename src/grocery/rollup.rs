// ABOUTME: Two-pass grocery rollup - bucket by (name, unit), then all-or-nothing cross-unit merge
// ABOUTME: Never drops data: a name group merges only when every unit converts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

use std::collections::HashMap;

use crate::models::{RawGroceryItem, RolledGroceryItem};

use super::{convert, normalize_name, normalize_unit};

/// Note set on an item produced by a successful cross-unit merge
const UNIT_CONVERSION_NOTE: &str = "Unit conversion applied";

/// Roll many raw ingredient references up into one shopping-list line per
/// physical ingredient.
///
/// Pass 1 buckets by (normalized name, normalized unit), summing quantities
/// and unioning source days. Pass 2 attempts to fold every bucket of a name
/// group into the first bucket's unit; the group merges only if *every*
/// conversion succeeds, otherwise all buckets are emitted unmerged rather
/// than silently dropping data.
///
/// Input is never mutated; output length ≤ bucket count.
#[must_use]
pub fn rollup(items: &[RawGroceryItem]) -> Vec<RolledGroceryItem> {
    // Pass 1: bucket by (normalized name, normalized unit), insertion-ordered
    let mut buckets: Vec<RolledGroceryItem> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for item in items {
        let name_norm = normalize_name(&item.name);
        let unit_norm = normalize_unit(&item.unit);
        let key = (name_norm.clone(), unit_norm.clone());

        if let Some(&i) = index.get(&key) {
            let bucket = &mut buckets[i];
            bucket.total_quantity += item.quantity;
            bucket.source_days.extend(item.source_days.iter().copied());
            bucket.source_days.sort_unstable();
            bucket.source_days.dedup();
        } else {
            let mut source_days = item.source_days.clone();
            source_days.sort_unstable();
            source_days.dedup();
            index.insert(key, buckets.len());
            buckets.push(RolledGroceryItem {
                name_display: item.name.clone(),
                name_normalized: name_norm,
                total_quantity: item.quantity,
                unit: unit_norm,
                category: item
                    .category
                    .clone()
                    .unwrap_or_else(|| "unknown".to_owned()),
                source_days,
                notes: String::new(),
                store_item_name: None,
                price_usd: None,
                sku: None,
                match_type: None,
            });
        }
    }

    // Pass 2: group by normalized name, attempt full-group unit conversion
    let mut group_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<RolledGroceryItem>> = HashMap::new();
    for bucket in buckets {
        if !groups.contains_key(&bucket.name_normalized) {
            group_order.push(bucket.name_normalized.clone());
        }
        groups
            .entry(bucket.name_normalized.clone())
            .or_default()
            .push(bucket);
    }

    let mut rolled = Vec::new();
    for name in group_order {
        let group = groups.remove(&name).unwrap_or_default();
        if group.len() == 1 {
            rolled.extend(group);
            continue;
        }
        match merge_group(&group) {
            Some(merged) => rolled.push(merged),
            None => rolled.extend(group),
        }
    }

    rolled
}

/// Attempt to merge a multi-unit name group into a single item.
///
/// Each bucket is tried in order as the merge base; the first base whose
/// unit every other bucket converts into wins. `None` when no base works -
/// the caller then emits the group unmerged.
fn merge_group(group: &[RolledGroceryItem]) -> Option<RolledGroceryItem> {
    'base: for (base_idx, base) in group.iter().enumerate() {
        let mut merged = base.clone();
        for (i, other) in group.iter().enumerate() {
            if i == base_idx {
                continue;
            }
            match convert(other.total_quantity, &other.unit, &merged.unit) {
                Some(converted) => {
                    merged.total_quantity += converted;
                    merged.source_days.extend(other.source_days.iter().copied());
                }
                None => continue 'base,
            }
        }
        merged.source_days.sort_unstable();
        merged.source_days.dedup();
        merged.notes = UNIT_CONVERSION_NOTE.to_owned();
        return Some(merged);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(name: &str, quantity: f64, unit: &str, day: u32) -> RawGroceryItem {
        RawGroceryItem {
            name: name.to_owned(),
            quantity,
            unit: unit.to_owned(),
            category: Some("pantry".to_owned()),
            source_days: vec![NaiveDate::from_ymd_opt(2026, 8, day).unwrap()],
            meal_id: format!("D{day}_Dinner"),
        }
    }

    #[test]
    fn same_name_same_unit_sums() {
        let rolled = rollup(&[item("rice", 100.0, "g", 3), item("Rice", 50.0, "g", 4)]);
        assert_eq!(rolled.len(), 1);
        assert!((rolled[0].total_quantity - 150.0).abs() < f64::EPSILON);
        assert_eq!(rolled[0].source_days.len(), 2);
        assert!(rolled[0].notes.is_empty());
    }

    #[test]
    fn olive_oil_cross_unit_merge() {
        // 2 tbsp → 30 ml, plus 30 ml = 60 ml total
        let rolled = rollup(&[
            item("olive oil", 2.0, "tbsp", 3),
            item("extra virgin olive oil", 30.0, "ml", 4),
        ]);
        assert_eq!(rolled.len(), 1);
        let merged = &rolled[0];
        assert_eq!(merged.name_normalized, "olive oil");
        // tbsp cannot be the base (no ml→tbsp factor); the ml bucket can
        assert_eq!(merged.unit, "ml");
        assert!((merged.total_quantity - 60.0).abs() < 1e-9);
        assert_eq!(merged.notes, "Unit conversion applied");
    }

    #[test]
    fn unconvertible_group_emits_all_buckets() {
        let rolled = rollup(&[item("banana", 2.0, "count", 3), item("bananas", 100.0, "g", 4)]);
        // count↔g has no factor: both buckets survive
        assert_eq!(rolled.len(), 2);
    }

    #[test]
    fn idempotent_on_own_output() {
        let first = rollup(&[
            item("oats", 50.0, "g", 3),
            item("oats", 30.0, "g", 5),
            item("milk", 1.0, "l", 3),
            item("milk", 200.0, "ml", 4),
        ]);
        let as_raw: Vec<RawGroceryItem> = first
            .iter()
            .map(|r| RawGroceryItem {
                name: r.name_display.clone(),
                quantity: r.total_quantity,
                unit: r.unit.clone(),
                category: Some(r.category.clone()),
                source_days: r.source_days.clone(),
                meal_id: "D1_Breakfast".to_owned(),
            })
            .collect();
        let second = rollup(&as_raw);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.name_normalized, b.name_normalized);
            assert_eq!(a.unit, b.unit);
            assert!((a.total_quantity - b.total_quantity).abs() < 1e-9);
        }
    }

    #[test]
    fn conservation_across_merge() {
        let rolled = rollup(&[
            item("milk", 1.0, "l", 3),
            item("milk", 200.0, "ml", 4),
            item("milk", 300.0, "ml", 5),
        ]);
        assert_eq!(rolled.len(), 1);
        // 1 l bucketed first → 1000 ml equivalent + 500 ml... the l bucket is
        // the merge base, so 200 ml and 300 ml fold into l at 0.001 each.
        assert_eq!(rolled[0].unit, "l");
        assert!((rolled[0].total_quantity - 1.5).abs() < 1e-9);
        assert_eq!(rolled[0].source_days.len(), 3);
    }

    #[test]
    fn input_not_mutated_and_output_bounded() {
        let items = vec![item("rice", 100.0, "g", 3), item("rice", 50.0, "g", 4)];
        let before = items.clone();
        let rolled = rollup(&items);
        assert_eq!(items.len(), before.len());
        assert!((items[0].quantity - before[0].quantity).abs() < f64::EPSILON);
        assert!(rolled.len() <= items.len());
    }
}
