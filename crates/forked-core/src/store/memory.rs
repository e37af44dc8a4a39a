//! In-process stores, for tests and for running without a database.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

use forked_db::models::{Recipe, ShoppingList};
use forked_db::queries::recipes::NewRecipe;

use super::{RecipeStore, ShoppingListStore, canonical_uuid};
use crate::shopping::ShoppingListResult;

#[derive(Debug, Default)]
pub struct MemoryStore {
    recipes: RwLock<Vec<Recipe>>,
    lists: RwLock<Vec<ShoppingList>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    fn canonical_id(&self, id: &str) -> String {
        canonical_uuid(id)
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Recipe>> {
        let wanted: HashSet<Uuid> = ids
            .iter()
            .filter_map(|id| Uuid::parse_str(id).ok())
            .collect();
        let recipes = self.recipes.read().await;
        Ok(recipes
            .iter()
            .filter(|r| wanted.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn get_recipe(&self, id: &str) -> Result<Option<Recipe>> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };
        let recipes = self.recipes.read().await;
        Ok(recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let recipes = self.recipes.read().await;
        Ok(recipes.iter().rev().cloned().collect())
    }

    async fn insert_recipe(&self, recipe: &NewRecipe) -> Result<Recipe> {
        let now = Utc::now();
        let row = Recipe {
            id: Uuid::new_v4(),
            name: recipe.name.clone(),
            ingredients: Json(recipe.ingredients.clone()),
            instructions: recipe.instructions.clone(),
            image_url: recipe.image_url.clone(),
            created_at: now,
            updated_at: now,
        };
        self.recipes.write().await.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl ShoppingListStore for MemoryStore {
    async fn insert_list(&self, list: &ShoppingListResult) -> Result<ShoppingList> {
        let people = i32::try_from(list.people)?;
        let row = ShoppingList {
            id: Uuid::new_v4(),
            recipe_names: list.recipe_names.clone(),
            entries: Json(list.entries.clone()),
            people,
            created_at: list.generated_at,
        };
        self.lists.write().await.push(row.clone());
        Ok(row)
    }

    async fn get_list(&self, id: &str) -> Result<Option<ShoppingList>> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };
        let lists = self.lists.read().await;
        Ok(lists.iter().find(|l| l.id == id).cloned())
    }

    async fn list_lists(&self) -> Result<Vec<ShoppingList>> {
        let lists = self.lists.read().await;
        Ok(lists.iter().rev().cloned().collect())
    }
}
