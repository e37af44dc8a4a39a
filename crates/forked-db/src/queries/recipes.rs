//! Database query functions for the `recipes` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::{Ingredient, Recipe};

/// Parameters for inserting a new recipe.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
    pub image_url: Option<String>,
}

/// Insert a new recipe row. Returns the inserted recipe with server-generated
/// defaults (id, created_at, updated_at).
pub async fn insert_recipe(pool: &PgPool, recipe: &NewRecipe) -> Result<Recipe> {
    let row = sqlx::query_as::<_, Recipe>(
        "INSERT INTO recipes (name, ingredients, instructions, image_url) \
         VALUES ($1, $2, $3, $4) \
         RETURNING *",
    )
    .bind(&recipe.name)
    .bind(Json(&recipe.ingredients))
    .bind(&recipe.instructions)
    .bind(&recipe.image_url)
    .fetch_one(pool)
    .await
    .with_context(|| format!("failed to insert recipe {:?}", recipe.name))?;

    Ok(row)
}

/// Fetch a recipe by its ID.
pub async fn get_recipe(pool: &PgPool, id: Uuid) -> Result<Option<Recipe>> {
    let recipe = sqlx::query_as::<_, Recipe>("SELECT * FROM recipes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch recipe")?;

    Ok(recipe)
}

/// List all recipes, newest first.
pub async fn list_recipes(pool: &PgPool) -> Result<Vec<Recipe>> {
    let recipes = sqlx::query_as::<_, Recipe>("SELECT * FROM recipes ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
        .context("failed to list recipes")?;

    Ok(recipes)
}

/// Fetch every recipe whose ID is in `ids` with a single query.
///
/// Missing IDs are simply absent from the result. Each recipe appears at
/// most once even if its ID is repeated in `ids`. Rows come back oldest
/// first.
pub async fn find_recipes_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Recipe>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let recipes = sqlx::query_as::<_, Recipe>(
        "SELECT * FROM recipes WHERE id = ANY($1) ORDER BY created_at, id",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
    .context("failed to fetch recipes by id")?;

    Ok(recipes)
}
