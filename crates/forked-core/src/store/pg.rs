//! PostgreSQL-backed stores, delegating to `forked_db::queries`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use forked_db::models::{Recipe, ShoppingList};
use forked_db::queries::recipes::{self as recipe_db, NewRecipe};
use forked_db::queries::shopping_lists::{self as list_db, NewShoppingList};

use super::{RecipeStore, ShoppingListStore, canonical_uuid};
use crate::shopping::ShoppingListResult;

/// Both stores over one connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Parse the identifiers that can name a row; the rest cannot exist.
fn parse_ids(ids: &[String]) -> Vec<Uuid> {
    ids.iter()
        .filter_map(|id| Uuid::parse_str(id).ok())
        .collect()
}

#[async_trait]
impl RecipeStore for PgStore {
    fn canonical_id(&self, id: &str) -> String {
        canonical_uuid(id)
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Recipe>> {
        let uuids = parse_ids(ids);
        if uuids.len() < ids.len() {
            debug!(
                skipped = ids.len() - uuids.len(),
                "ignoring recipe ids that are not UUIDs"
            );
        }
        recipe_db::find_recipes_by_ids(&self.pool, &uuids).await
    }

    async fn get_recipe(&self, id: &str) -> Result<Option<Recipe>> {
        match Uuid::parse_str(id) {
            Ok(id) => recipe_db::get_recipe(&self.pool, id).await,
            Err(_) => Ok(None),
        }
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        recipe_db::list_recipes(&self.pool).await
    }

    async fn insert_recipe(&self, recipe: &NewRecipe) -> Result<Recipe> {
        recipe_db::insert_recipe(&self.pool, recipe).await
    }
}

#[async_trait]
impl ShoppingListStore for PgStore {
    async fn insert_list(&self, list: &ShoppingListResult) -> Result<ShoppingList> {
        let people = i32::try_from(list.people).context("person count does not fit the store")?;
        list_db::insert_shopping_list(
            &self.pool,
            &NewShoppingList {
                recipe_names: &list.recipe_names,
                entries: &list.entries,
                people,
                created_at: list.generated_at,
            },
        )
        .await
    }

    async fn get_list(&self, id: &str) -> Result<Option<ShoppingList>> {
        match Uuid::parse_str(id) {
            Ok(id) => list_db::get_shopping_list(&self.pool, id).await,
            Err(_) => Ok(None),
        }
    }

    async fn list_lists(&self) -> Result<Vec<ShoppingList>> {
        list_db::list_shopping_lists(&self.pool).await
    }
}
