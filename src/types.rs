use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a recipe came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Video,
    Webpage,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Video => "video",
            SourceType::Webpage => "webpage",
        }
    }
}

/// Grocery store aisle categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Produce,
    MeatSeafood,
    DairyEggs,
    Bakery,
    Frozen,
    Pantry,
    Beverages,
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: &'static [Category] = &[
        Category::Produce,
        Category::MeatSeafood,
        Category::DairyEggs,
        Category::Bakery,
        Category::Frozen,
        Category::Pantry,
        Category::Beverages,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Produce => "Produce",
            Category::MeatSeafood => "Meat & Seafood",
            Category::DairyEggs => "Dairy & Eggs",
            Category::Bakery => "Bakery",
            Category::Frozen => "Frozen",
            Category::Pantry => "Pantry",
            Category::Beverages => "Beverages",
            Category::Other => "Other",
        }
    }
}

/// One recipe ingredient. Quantity and unit stay as entered; parsing
/// happens at the point of use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub category: Category,
    #[serde(default)]
    pub optional: bool,
}

/// A saved recipe. Ingredients are owned inline, not stored separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub source_type: SourceType,
}

/// An item in the pantry. `expires_at` is optional: staples don't expire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PantryItem {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// A line on the grocery list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryItem {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub category: Category,
    #[serde(default)]
    pub purchased: bool,
}

/// A recipe scheduled for a day. The multiplier scales ingredient
/// quantities relative to the recipe's own serving count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlan {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub scheduled_for: DateTime<Utc>,
    pub servings_multiplier: f64,
}

/// Ingredient line in an extraction response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedIngredient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Recipe payload returned by the extraction endpoint. Field names follow
/// the endpoint's JSON contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecipe {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<ExtractedIngredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, rename = "imageURL", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, rename = "sourceURL", skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
    #[serde(default)]
    pub is_transcript: bool,
}

impl ExtractedRecipe {
    /// Convert an extraction result into a saved-recipe record, assigning
    /// an id and categorizing each ingredient.
    pub fn into_recipe(self) -> Recipe {
        let source_type = self.source_type.unwrap_or(if self.is_transcript {
            SourceType::Video
        } else {
            SourceType::Webpage
        });

        Recipe {
            id: Uuid::new_v4(),
            title: self.title,
            servings: self.servings,
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            ingredients: self
                .ingredients
                .into_iter()
                .map(|i| Ingredient {
                    category: crate::categorize::categorize(&i.name),
                    name: i.name,
                    quantity: i.quantity,
                    unit: i.unit,
                    optional: false,
                })
                .collect(),
            instructions: self.instructions,
            image_url: self.image_url,
            source_url: self.source_url,
            source_type,
        }
    }
}
