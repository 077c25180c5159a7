pub mod categorize;
pub mod error;
pub mod extract;
pub mod grocery;
pub mod notify;
pub mod pantry;
pub mod quantity;
pub mod store;
pub mod types;

pub use error::{ErrorKind, ExtractError};
pub use extract::{ExtractionClient, ExtractorConfig, RetryConfig};
pub use grocery::{build_grocery_list, group_by_category, merge_grocery_items};
pub use notify::{
    expiry_reminders, MemoryScheduler, NotificationRequest, NotificationScheduler, NotifyError,
};
pub use pantry::{
    matched_ingredients, matches_ingredient, missing_ingredients, rank_recipes_by_pantry,
    recipe_match_percentage, RankedRecipe,
};
pub use quantity::{
    combine_quantities, format_amount, format_ingredient, parse_amount, scale_quantity,
};
pub use store::{KeyStore, MemoryKeyStore, MemoryStore, RecordStore, StoreError};
pub use types::{
    Category, ExtractedIngredient, ExtractedRecipe, GroceryItem, Ingredient, MealPlan, PantryItem,
    Recipe, SourceType,
};
