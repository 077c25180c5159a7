//! Pantry matching against recipe ingredient lists.
//!
//! Matching is deliberately fuzzy: pantry names are typed by hand and
//! recipe ingredients come from extraction, so "flour" has to match
//! "all-purpose flour". Three tiers, cheapest first.

use chrono::{Duration, Utc};

use crate::types::{Ingredient, PantryItem, Recipe};

/// Days before expiration at which an item counts as expiring soon.
pub const EXPIRING_SOON_DAYS: i64 = 3;

/// Descriptors that carry no identity: "fresh basil" and "dried basil"
/// both name basil. Tokens in this set are ignored by word-level matching.
const MODIFIER_WORDS: &[&str] = &[
    "fresh", "large", "small", "medium", "organic", "chopped", "diced", "minced", "sliced",
    "crushed", "ground", "whole", "dried", "frozen", "canned", "raw", "cooked", "boneless",
    "skinless", "extra", "virgin", "light", "dark", "sweet", "unsalted", "salted", "plain",
    "flavored", "ripe", "unripe",
];

/// Check whether two ingredient names refer to the same thing.
///
/// Comparison is trimmed and case-insensitive. Tiers: exact match,
/// substring containment in either direction, then any shared significant
/// word. Empty names match nothing.
pub fn matches_ingredient(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();

    // An empty string is a substring of everything; rule it out first.
    if a.is_empty() || b.is_empty() {
        return false;
    }

    if a == b {
        return true;
    }

    // Containment: "flour" matches "all-purpose flour".
    if a.contains(&b) || b.contains(&a) {
        return true;
    }

    // Shared significant word: "tomato sauce" matches "crushed tomatoes"
    // only when a real word survives filtering on both sides.
    let b_words = significant_words(&b);
    significant_words(&a)
        .iter()
        .any(|word| b_words.contains(word))
}

/// Tokens that identify an ingredient: longer than two characters and not
/// a pure descriptor.
fn significant_words(name: &str) -> Vec<&str> {
    name.split_whitespace()
        .filter(|word| word.len() > 2 && !MODIFIER_WORDS.contains(word))
        .collect()
}

impl PantryItem {
    /// True when the expiration has passed. Items without an expiration
    /// never expire.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at < Utc::now(),
            None => false,
        }
    }

    /// True when the item expires within the next `EXPIRING_SOON_DAYS`
    /// days. Already-expired items are not "expiring soon". Evaluated
    /// against the clock at call time, never cached.
    pub fn is_expiring_soon(&self) -> bool {
        let Some(expires_at) = self.expires_at else {
            return false;
        };
        let now = Utc::now();
        expires_at >= now && expires_at <= now + Duration::days(EXPIRING_SOON_DAYS)
    }
}

/// Percentage of a recipe's required ingredients available in the pantry.
///
/// Optional ingredients are excluded. A recipe whose ingredients are all
/// optional scores 100; a recipe with no ingredients at all scores 0.
pub fn recipe_match_percentage(recipe: &Recipe, pantry: &[PantryItem]) -> u8 {
    if recipe.ingredients.is_empty() {
        return 0;
    }

    let required: Vec<&Ingredient> = recipe.ingredients.iter().filter(|i| !i.optional).collect();
    if required.is_empty() {
        return 100;
    }

    let matched = required
        .iter()
        .filter(|ingredient| in_pantry(ingredient, pantry))
        .count();

    (matched as f64 / required.len() as f64 * 100.0).round() as u8
}

/// Required ingredients with no pantry match.
pub fn missing_ingredients<'a>(recipe: &'a Recipe, pantry: &[PantryItem]) -> Vec<&'a Ingredient> {
    recipe
        .ingredients
        .iter()
        .filter(|i| !i.optional && !in_pantry(i, pantry))
        .collect()
}

/// Ingredients (optional included) with at least one pantry match.
pub fn matched_ingredients<'a>(recipe: &'a Recipe, pantry: &[PantryItem]) -> Vec<&'a Ingredient> {
    recipe
        .ingredients
        .iter()
        .filter(|i| in_pantry(i, pantry))
        .collect()
}

fn in_pantry(ingredient: &Ingredient, pantry: &[PantryItem]) -> bool {
    pantry
        .iter()
        .any(|item| matches_ingredient(&item.name, &ingredient.name))
}

/// A recipe scored against the current pantry. Derived on demand, never
/// stored: scores are stale as soon as the pantry changes.
#[derive(Debug)]
pub struct RankedRecipe<'a> {
    pub recipe: &'a Recipe,
    pub match_percentage: u8,
    pub missing_count: usize,
}

/// Rank recipes by pantry coverage: highest match first, ties broken by
/// fewest missing ingredients.
pub fn rank_recipes_by_pantry<'a>(
    recipes: &'a [Recipe],
    pantry: &[PantryItem],
) -> Vec<RankedRecipe<'a>> {
    let mut ranked: Vec<RankedRecipe<'a>> = recipes
        .iter()
        .map(|recipe| RankedRecipe {
            recipe,
            match_percentage: recipe_match_percentage(recipe, pantry),
            missing_count: missing_ingredients(recipe, pantry).len(),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.match_percentage
            .cmp(&a.match_percentage)
            .then(a.missing_count.cmp(&b.missing_count))
    });

    ranked
}
