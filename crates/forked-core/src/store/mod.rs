//! Store seams consumed by the shopping-list builder and the HTTP layer.
//!
//! [`RecipeStore`] and [`ShoppingListStore`] are object-safe so the server
//! can hold them as `Arc<dyn ...>` and tests can swap in [`MemoryStore`].
//! Identifiers are opaque strings at this boundary: a string that cannot
//! name a stored record is reported as absent, not as an error. Two
//! spellings naming the same record share one [`RecipeStore::canonical_id`].

pub mod memory;
pub mod pg;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use forked_db::models::{Recipe, ShoppingList};
use forked_db::queries::recipes::NewRecipe;

use crate::shopping::ShoppingListResult;

pub use memory::MemoryStore;
pub use pg::PgStore;

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// The spelling under which this store knows `id`. Ids that map to the
    /// same canonical form name the same recipe.
    fn canonical_id(&self, id: &str) -> String {
        id.to_owned()
    }

    /// Resolve a set of identifiers in one batched lookup.
    ///
    /// Returns exactly the recipes that exist, each at most once, in no
    /// particular relation to the order of `ids`. Missing identifiers are
    /// not an error.
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Recipe>>;

    async fn get_recipe(&self, id: &str) -> Result<Option<Recipe>>;

    /// All recipes, newest first.
    async fn list_recipes(&self) -> Result<Vec<Recipe>>;

    async fn insert_recipe(&self, recipe: &NewRecipe) -> Result<Recipe>;
}

/// Append-only storage for generated shopping lists.
#[async_trait]
pub trait ShoppingListStore: Send + Sync {
    async fn insert_list(&self, list: &ShoppingListResult) -> Result<ShoppingList>;

    async fn get_list(&self, id: &str) -> Result<Option<ShoppingList>>;

    /// All saved lists, newest first.
    async fn list_lists(&self) -> Result<Vec<ShoppingList>>;
}

/// Lower-case hyphenated form of a UUID in any accepted spelling (case,
/// simple, braced, urn). Anything else comes back unchanged.
pub(crate) fn canonical_uuid(id: &str) -> String {
    Uuid::parse_str(id).map_or_else(|_| id.to_owned(), |uuid| uuid.to_string())
}

// Compile-time assertion: both traits must stay usable as trait objects.
const _: () = {
    fn _assert_object_safe(_: &dyn RecipeStore, _: &dyn ShoppingListStore) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_uuid_folds_spellings() {
        let id = Uuid::new_v4();
        let canonical = id.to_string();
        for spelling in [
            canonical.to_uppercase(),
            id.simple().to_string(),
            id.braced().to_string(),
            id.urn().to_string(),
        ] {
            assert_eq!(canonical_uuid(&spelling), canonical, "{spelling}");
        }
        assert_eq!(canonical_uuid("Not-A-Uuid"), "Not-A-Uuid");
    }
}
