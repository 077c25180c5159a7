//! Persistence contracts.
//!
//! The app persists through whatever backend the host wires in; on mobile
//! that is an on-device database and the OS keychain. `MemoryStore` and
//! `MemoryKeyStore` are the reference implementations used by tests and by
//! embedders without a real backend.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::types::{GroceryItem, MealPlan, PantryItem, Recipe};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(Uuid),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Persistence contract for domain records. Ingredient rows live inline on
/// their recipe.
///
/// Implementations must make writes visible to subsequent reads within the
/// same session.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError>;
    async fn get_recipe(&self, id: Uuid) -> Result<Recipe, StoreError>;
    async fn upsert_recipe(&self, recipe: Recipe) -> Result<(), StoreError>;
    async fn delete_recipe(&self, id: Uuid) -> Result<(), StoreError>;

    async fn list_pantry(&self) -> Result<Vec<PantryItem>, StoreError>;
    async fn upsert_pantry_item(&self, item: PantryItem) -> Result<(), StoreError>;
    async fn delete_pantry_item(&self, id: Uuid) -> Result<(), StoreError>;

    async fn list_grocery(&self) -> Result<Vec<GroceryItem>, StoreError>;
    async fn upsert_grocery_item(&self, item: GroceryItem) -> Result<(), StoreError>;
    async fn delete_grocery_item(&self, id: Uuid) -> Result<(), StoreError>;

    async fn list_meal_plans(&self) -> Result<Vec<MealPlan>, StoreError>;
    async fn upsert_meal_plan(&self, plan: MealPlan) -> Result<(), StoreError>;
    async fn delete_meal_plan(&self, id: Uuid) -> Result<(), StoreError>;
}

/// In-memory store. Contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    recipes: RwLock<HashMap<Uuid, Recipe>>,
    pantry: RwLock<HashMap<Uuid, PantryItem>>,
    grocery: RwLock<HashMap<Uuid, GroceryItem>>,
    meal_plans: RwLock<HashMap<Uuid, MealPlan>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        Ok(self.recipes.read().unwrap().values().cloned().collect())
    }

    async fn get_recipe(&self, id: Uuid) -> Result<Recipe, StoreError> {
        self.recipes
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn upsert_recipe(&self, recipe: Recipe) -> Result<(), StoreError> {
        self.recipes.write().unwrap().insert(recipe.id, recipe);
        Ok(())
    }

    async fn delete_recipe(&self, id: Uuid) -> Result<(), StoreError> {
        self.recipes
            .write()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn list_pantry(&self) -> Result<Vec<PantryItem>, StoreError> {
        Ok(self.pantry.read().unwrap().values().cloned().collect())
    }

    async fn upsert_pantry_item(&self, item: PantryItem) -> Result<(), StoreError> {
        self.pantry.write().unwrap().insert(item.id, item);
        Ok(())
    }

    async fn delete_pantry_item(&self, id: Uuid) -> Result<(), StoreError> {
        self.pantry
            .write()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn list_grocery(&self) -> Result<Vec<GroceryItem>, StoreError> {
        Ok(self.grocery.read().unwrap().values().cloned().collect())
    }

    async fn upsert_grocery_item(&self, item: GroceryItem) -> Result<(), StoreError> {
        self.grocery.write().unwrap().insert(item.id, item);
        Ok(())
    }

    async fn delete_grocery_item(&self, id: Uuid) -> Result<(), StoreError> {
        self.grocery
            .write()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn list_meal_plans(&self) -> Result<Vec<MealPlan>, StoreError> {
        Ok(self.meal_plans.read().unwrap().values().cloned().collect())
    }

    async fn upsert_meal_plan(&self, plan: MealPlan) -> Result<(), StoreError> {
        self.meal_plans.write().unwrap().insert(plan.id, plan);
        Ok(())
    }

    async fn delete_meal_plan(&self, id: Uuid) -> Result<(), StoreError> {
        self.meal_plans
            .write()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}

/// Secure key storage contract; on mobile this is the OS keychain.
///
/// A missing key is `Ok(None)`, not an error: absence is a normal state,
/// a failed keychain read is not.
#[async_trait]
pub trait KeyStore: Send + Sync {
    async fn get_key(&self, name: &str) -> Result<Option<String>, StoreError>;
    async fn set_key(&self, name: &str, value: &str) -> Result<(), StoreError>;
    async fn delete_key(&self, name: &str) -> Result<(), StoreError>;
}

/// In-memory key store for tests and development builds.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    keys: RwLock<HashMap<String, String>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with one key.
    pub fn with_key(name: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .keys
            .write()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        store
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn get_key(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.keys.read().unwrap().get(name).cloned())
    }

    async fn set_key(&self, name: &str, value: &str) -> Result<(), StoreError> {
        self.keys
            .write()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_key(&self, name: &str) -> Result<(), StoreError> {
        self.keys.write().unwrap().remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, SourceType};

    fn recipe(title: &str) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            title: title.to_string(),
            servings: None,
            prep_time: None,
            cook_time: None,
            ingredients: vec![],
            instructions: vec![],
            image_url: None,
            source_url: None,
            source_type: SourceType::Webpage,
        }
    }

    #[tokio::test]
    async fn test_recipe_read_after_write() {
        let store = MemoryStore::new();
        let r = recipe("Lasagna");
        let id = r.id;

        store.upsert_recipe(r).await.unwrap();
        let fetched = store.get_recipe(id).await.unwrap();
        assert_eq!(fetched.title, "Lasagna");
        assert_eq!(store.list_recipes().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_replaces() {
        let store = MemoryStore::new();
        let mut r = recipe("Draft");
        let id = r.id;
        store.upsert_recipe(r.clone()).await.unwrap();

        r.title = "Final".to_string();
        store.upsert_recipe(r).await.unwrap();

        assert_eq!(store.get_recipe(id).await.unwrap().title, "Final");
        assert_eq!(store.list_recipes().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_records_are_not_found() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();

        assert!(matches!(
            store.get_recipe(id).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_recipe(id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_pantry_round_trip() {
        let store = MemoryStore::new();
        let item = PantryItem {
            id: Uuid::new_v4(),
            name: "milk".to_string(),
            category: Category::DairyEggs,
            quantity: None,
            unit: None,
            expires_at: None,
        };
        let id = item.id;

        store.upsert_pantry_item(item).await.unwrap();
        assert_eq!(store.list_pantry().await.unwrap().len(), 1);
        store.delete_pantry_item(id).await.unwrap();
        assert!(store.list_pantry().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_key_store() {
        let keys = MemoryKeyStore::new();
        assert_eq!(keys.get_key("api").await.unwrap(), None);

        keys.set_key("api", "secret-value").await.unwrap();
        assert_eq!(
            keys.get_key("api").await.unwrap().as_deref(),
            Some("secret-value")
        );

        keys.delete_key("api").await.unwrap();
        assert_eq!(keys.get_key("api").await.unwrap(), None);
    }
}
