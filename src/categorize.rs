//! Ingredient categorization for grocery list grouping.
//!
//! Maps ingredient names to grocery store aisle categories based on keyword
//! matching. Keyword data is loaded from `data/categories.json` at compile
//! time.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::types::Category;

/// The raw JSON structure of the categories data file.
#[derive(Deserialize)]
struct CategoryData {
    keywords: HashMap<String, Category>,
}

/// Keyword map loaded from JSON and sorted by keyword length (longest first).
/// This ensures more specific matches are tried before general ones:
/// "dried basil" lands in Pantry before "basil" lands in Produce.
static KEYWORD_MAP: LazyLock<Vec<(String, Category)>> = LazyLock::new(|| {
    let json = include_str!("../data/categories.json");
    let data: CategoryData = serde_json::from_str(json).expect("Failed to parse categories.json");

    let mut map: Vec<(String, Category)> = data.keywords.into_iter().collect();
    // Secondary sort by keyword alphabetically for deterministic ordering.
    map.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
    map
});

/// Categorize an ingredient by name.
///
/// Matching is case-insensitive keyword containment. Unknown names fall to
/// `Category::Other`.
pub fn categorize(name: &str) -> Category {
    let lower = name.to_lowercase();

    for (keyword, category) in KEYWORD_MAP.iter() {
        if lower.contains(keyword) {
            return *category;
        }
    }

    Category::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_categories() {
        assert_eq!(categorize("chicken breast"), Category::MeatSeafood);
        assert_eq!(categorize("Olive Oil"), Category::Pantry);
        assert_eq!(categorize("tomatoes"), Category::Produce);
        assert_eq!(categorize("butter"), Category::DairyEggs);
        assert_eq!(categorize("sourdough bread"), Category::Bakery);
        assert_eq!(categorize("frozen peas"), Category::Frozen);
        assert_eq!(categorize("orange juice"), Category::Beverages);
    }

    #[test]
    fn test_longest_keyword_wins() {
        assert_eq!(categorize("Fresh Basil"), Category::Produce);
        assert_eq!(categorize("dried basil"), Category::Pantry);
        assert_eq!(categorize("tomato paste"), Category::Pantry);
        assert_eq!(categorize("heirloom tomato"), Category::Produce);
        assert_eq!(categorize("peanut butter"), Category::Pantry);
        assert_eq!(categorize("black pepper"), Category::Pantry);
        assert_eq!(categorize("bell pepper"), Category::Produce);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(categorize("xyzfoobar123"), Category::Other);
        assert_eq!(categorize(""), Category::Other);
    }
}
