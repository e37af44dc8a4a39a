//! Database query functions for the `shopping_lists` table.
//!
//! The table is append-only: there are no update or delete queries.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::{ShoppingList, ShoppingListEntry};

/// Parameters for inserting a generated shopping list.
#[derive(Debug)]
pub struct NewShoppingList<'a> {
    pub recipe_names: &'a [String],
    pub entries: &'a [ShoppingListEntry],
    pub people: i32,
    pub created_at: DateTime<Utc>,
}

/// Insert a list and return the stored row.
///
/// JSON has no encoding for infinite or NaN quantities, so a list carrying
/// one is refused before anything is written.
pub async fn insert_shopping_list(pool: &PgPool, list: &NewShoppingList<'_>) -> Result<ShoppingList> {
    if let Some(entry) = list.entries.iter().find(|e| !e.quantity.is_finite()) {
        anyhow::bail!(
            "refusing to store non-finite quantity for {} ({})",
            entry.name,
            entry.unit
        );
    }

    let row = sqlx::query_as::<_, ShoppingList>(
        "INSERT INTO shopping_lists (recipe_names, entries, people, created_at) \
         VALUES ($1, $2, $3, $4) \
         RETURNING *",
    )
    .bind(list.recipe_names)
    .bind(Json(list.entries))
    .bind(list.people)
    .bind(list.created_at)
    .fetch_one(pool)
    .await
    .context("failed to insert shopping list")?;

    Ok(row)
}

pub async fn get_shopping_list(pool: &PgPool, id: Uuid) -> Result<Option<ShoppingList>> {
    let row = sqlx::query_as::<_, ShoppingList>("SELECT * FROM shopping_lists WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch shopping list")?;

    Ok(row)
}

/// List saved shopping lists, newest first.
pub async fn list_shopping_lists(pool: &PgPool) -> Result<Vec<ShoppingList>> {
    let rows = sqlx::query_as::<_, ShoppingList>(
        "SELECT * FROM shopping_lists ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
    .context("failed to list shopping lists")?;

    Ok(rows)
}
