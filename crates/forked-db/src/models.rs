use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Embedded documents
// ---------------------------------------------------------------------------

/// A single ingredient line of a recipe, stored inside the recipe's
/// `ingredients` JSON array.
///
/// `quantity` is expressed per person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "quantita")]
    pub quantity: f64,
    #[serde(rename = "unita")]
    pub unit: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
        }
    }
}

/// One line of a generated shopping list: the total quantity of a
/// `(name, unit)` pair across every selected recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListEntry {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "quantita")]
    pub quantity: f64,
    #[serde(rename = "unita")]
    pub unit: String,
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row in the `recipes` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub ingredients: Json<Vec<Ingredient>>,
    pub instructions: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row in the `shopping_lists` table.
///
/// Rows are immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ShoppingList {
    pub id: Uuid,
    #[serde(rename = "ricette")]
    pub recipe_names: Vec<String>,
    #[serde(rename = "listaSpesa")]
    pub entries: Json<Vec<ShoppingListEntry>>,
    #[serde(rename = "persone")]
    pub people: i32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
