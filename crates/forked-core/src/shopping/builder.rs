//! Shopping-list builder: validate, resolve, aggregate, assemble.
//!
//! The builder holds only borrowed store handles. Each call reads its own
//! request and returns a fresh [`ShoppingListResult`], so independent
//! requests can run concurrently against the same builder.

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use forked_db::models::{ShoppingList, ShoppingListEntry};

use super::aggregate::aggregate;
use super::request::ShoppingListRequest;
use crate::error::ShoppingListError;
use crate::store::{RecipeStore, ShoppingListStore};

/// A generated shopping list, in the wire shape the API returns and
/// persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListResult {
    /// Names of the resolved recipes, in resolution order.
    #[serde(rename = "ricette")]
    pub recipe_names: Vec<String>,
    #[serde(rename = "listaSpesa")]
    pub entries: Vec<ShoppingListEntry>,
    #[serde(rename = "persone")]
    pub people: u32,
    #[serde(rename = "createdAt")]
    pub generated_at: DateTime<Utc>,
}

/// A request that passed validation.
#[derive(Debug)]
struct ValidRequest {
    /// Requested ids in canonical form with duplicates removed, first
    /// occurrence kept.
    recipe_ids: Vec<String>,
    people: u32,
}

pub struct ShoppingListBuilder<'a> {
    recipes: &'a dyn RecipeStore,
}

impl<'a> ShoppingListBuilder<'a> {
    pub fn new(recipes: &'a dyn RecipeStore) -> Self {
        Self { recipes }
    }

    /// Build a shopping list without persisting it.
    ///
    /// Fails with [`ShoppingListError::Validation`] before touching the
    /// store when no recipes are requested or `people < 1`, and with
    /// [`ShoppingListError::NotFound`] when any requested recipe is absent.
    /// A scaled total that overflows `f64` is also a validation failure.
    pub async fn build(
        &self,
        request: &ShoppingListRequest,
    ) -> Result<ShoppingListResult, ShoppingListError> {
        let valid = validate(request, self.recipes)?;

        let recipes = self
            .recipes
            .find_by_ids(&valid.recipe_ids)
            .await
            .map_err(ShoppingListError::StoreUnavailable)?;

        debug!(
            requested = valid.recipe_ids.len(),
            resolved = recipes.len(),
            "resolved recipes"
        );

        if recipes.len() != valid.recipe_ids.len() {
            warn!(
                requested = valid.recipe_ids.len(),
                resolved = recipes.len(),
                "shopping list requested for missing recipes"
            );
            return Err(ShoppingListError::NotFound {
                requested: valid.recipe_ids.len(),
                found: recipes.len(),
            });
        }

        let entries = aggregate(&recipes, valid.people);
        if let Some(entry) = entries.iter().find(|e| !e.quantity.is_finite()) {
            return Err(ShoppingListError::validation(format!(
                "total quantity of {} ({}) is out of range for {} people",
                entry.name, entry.unit, valid.people
            )));
        }
        let result = ShoppingListResult {
            recipe_names: recipes.into_iter().map(|r| r.name).collect(),
            entries,
            people: valid.people,
            generated_at: Utc::now(),
        };

        info!(
            recipes = result.recipe_names.len(),
            entries = result.entries.len(),
            people = result.people,
            "shopping list built"
        );
        Ok(result)
    }

    /// Build a shopping list and append it to `lists`.
    ///
    /// Nothing is written when the build fails.
    pub async fn build_and_save(
        &self,
        request: &ShoppingListRequest,
        lists: &dyn ShoppingListStore,
    ) -> Result<ShoppingList, ShoppingListError> {
        let result = self.build(request).await?;
        let saved = lists
            .insert_list(&result)
            .await
            .map_err(ShoppingListError::StoreUnavailable)?;
        info!(list_id = %saved.id, "shopping list saved");
        Ok(saved)
    }
}

fn validate(
    request: &ShoppingListRequest,
    store: &dyn RecipeStore,
) -> Result<ValidRequest, ShoppingListError> {
    if request.recipe_ids.is_empty() {
        return Err(ShoppingListError::validation(
            "ricette must list at least one recipe",
        ));
    }
    if request.people < 1 {
        return Err(ShoppingListError::validation(format!(
            "persone must be at least 1 (got {})",
            request.people
        )));
    }
    // Persisted counts are 32-bit signed.
    let people = i32::try_from(request.people)
        .ok()
        .and_then(|p| u32::try_from(p).ok())
        .ok_or_else(|| {
            ShoppingListError::validation(format!("persone is too large (got {})", request.people))
        })?;

    let recipe_ids: IndexSet<String> = request
        .recipe_ids
        .iter()
        .map(|id| store.canonical_id(id))
        .collect();

    Ok(ValidRequest {
        recipe_ids: recipe_ids.into_iter().collect(),
        people,
    })
}
