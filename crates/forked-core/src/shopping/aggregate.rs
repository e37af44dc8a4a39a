//! Merge ingredient quantities across recipes.

use indexmap::IndexMap;

use forked_db::models::{Recipe, ShoppingListEntry};

use super::normalize::{IdentityKey, identity_key};

/// Fold every ingredient line of `recipes` into one entry per
/// [`IdentityKey`], scaling each line by `people`.
///
/// Entries come back in order of first occurrence: recipes in input order,
/// lines in stored order. Quantities are plain `f64` sums with no rounding,
/// and zero or negative lines are added like any other. `people` is not
/// validated here.
pub fn aggregate(recipes: &[Recipe], people: u32) -> Vec<ShoppingListEntry> {
    let factor = f64::from(people);
    let mut totals: IndexMap<IdentityKey<'_>, ShoppingListEntry> = IndexMap::new();

    for recipe in recipes {
        for line in recipe.ingredients.iter() {
            let entry = totals
                .entry(identity_key(line))
                .or_insert_with(|| ShoppingListEntry {
                    name: line.name.clone(),
                    quantity: 0.0,
                    unit: line.unit.clone(),
                });
            entry.quantity += line.quantity * factor;
        }
    }

    totals.into_values().collect()
}
