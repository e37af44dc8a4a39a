//! Ingredient identity used when merging shopping-list lines.

use forked_db::models::Ingredient;

/// The `(name, unit)` pair two ingredient lines must share to be merged.
///
/// Comparison is byte-exact: no case folding, trimming, or unit
/// conversion. Keeping the two fields separate means no choice of
/// separator can make distinct pairs collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityKey<'a> {
    pub name: &'a str,
    pub unit: &'a str,
}

pub fn identity_key(ingredient: &Ingredient) -> IdentityKey<'_> {
    IdentityKey {
        name: &ingredient.name,
        unit: &ingredient.unit,
    }
}
