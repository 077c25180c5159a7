//! Grocery list building.
//!
//! Derives a shopping list from planned recipes minus pantry stock, merging
//! duplicate lines and grouping by-store aisle.

use uuid::Uuid;

use crate::categorize::categorize;
use crate::pantry::matches_ingredient;
use crate::quantity::combine_quantities;
use crate::types::{Category, GroceryItem, PantryItem, Recipe};

/// Merge grocery items that name the same thing in the same unit.
///
/// Quantities combine via `combine_quantities`; the first occurrence keeps
/// its id and category. A merged line counts as purchased only when every
/// source line was.
pub fn merge_grocery_items(items: Vec<GroceryItem>) -> Vec<GroceryItem> {
    let mut merged: Vec<GroceryItem> = Vec::new();

    for item in items {
        let key = merge_key(&item);
        match merged.iter_mut().find(|m| merge_key(m) == key) {
            Some(line) => {
                line.quantity = match (line.quantity.as_deref(), item.quantity.as_deref()) {
                    (Some(a), Some(b)) => Some(combine_quantities(a, b)),
                    (Some(a), None) => Some(a.to_string()),
                    (None, Some(b)) => Some(b.to_string()),
                    (None, None) => None,
                };
                line.purchased = line.purchased && item.purchased;
            }
            None => merged.push(item),
        }
    }

    merged
}

fn merge_key(item: &GroceryItem) -> (String, Option<String>) {
    (
        item.name.trim().to_lowercase(),
        item.unit.as_ref().map(|unit| unit.trim().to_lowercase()),
    )
}

/// Build a grocery list covering every recipe ingredient the pantry lacks.
///
/// Optional ingredients are included; the cook can strike lines they don't
/// want. Duplicate lines across recipes are merged.
pub fn build_grocery_list(recipes: &[Recipe], pantry: &[PantryItem]) -> Vec<GroceryItem> {
    let mut items = Vec::new();

    for recipe in recipes {
        for ingredient in &recipe.ingredients {
            if pantry
                .iter()
                .any(|item| matches_ingredient(&item.name, &ingredient.name))
            {
                continue;
            }
            items.push(GroceryItem {
                id: Uuid::new_v4(),
                name: ingredient.name.clone(),
                quantity: ingredient.quantity.clone(),
                unit: ingredient.unit.clone(),
                category: categorize(&ingredient.name),
                purchased: false,
            });
        }
    }

    merge_grocery_items(items)
}

/// Group items by category in store-aisle display order. Empty categories
/// are omitted.
pub fn group_by_category(items: Vec<GroceryItem>) -> Vec<(Category, Vec<GroceryItem>)> {
    let mut buckets: Vec<(Category, Vec<GroceryItem>)> =
        Category::ALL.iter().map(|c| (*c, Vec::new())).collect();

    for item in items {
        if let Some((_, bucket)) = buckets.iter_mut().find(|(c, _)| *c == item.category) {
            bucket.push(item);
        }
    }

    buckets.retain(|(_, bucket)| !bucket.is_empty());
    buckets
}
