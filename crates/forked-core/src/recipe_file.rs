//! Recipe seed files.
//!
//! A recipe file is TOML:
//!
//! ```toml
//! name = "Pancakes"
//! instructions = "Whisk, rest, fry."
//! image_url = "https://example.com/pancakes.jpg"   # optional
//!
//! [[ingredients]]
//! name = "flour"
//! quantity = 60
//! unit = "g"
//! ```
//!
//! Quantities are per person and must be finite and non-negative.

use serde::Deserialize;
use thiserror::Error;

use forked_db::models::Ingredient;
use forked_db::queries::recipes::NewRecipe;

#[derive(Debug, Error)]
pub enum RecipeFileError {
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("recipe name must not be empty")]
    EmptyName,

    #[error("ingredient #{index} has an empty name")]
    EmptyIngredientName { index: usize },

    #[error("ingredient {name:?} has an invalid quantity {quantity} (must be finite and >= 0)")]
    InvalidQuantity { name: String, quantity: f64 },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecipeToml {
    name: String,
    #[serde(default)]
    instructions: String,
    image_url: Option<String>,
    #[serde(default)]
    ingredients: Vec<IngredientToml>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IngredientToml {
    name: String,
    quantity: f64,
    #[serde(default)]
    unit: String,
}

/// Parse and validate a recipe file into insertable form.
pub fn parse_recipe_toml(content: &str) -> Result<NewRecipe, RecipeFileError> {
    let recipe: RecipeToml = toml::from_str(content)?;

    let name = recipe.name.trim();
    if name.is_empty() {
        return Err(RecipeFileError::EmptyName);
    }

    let mut ingredients = Vec::with_capacity(recipe.ingredients.len());
    for (index, ing) in recipe.ingredients.into_iter().enumerate() {
        if ing.name.trim().is_empty() {
            return Err(RecipeFileError::EmptyIngredientName { index: index + 1 });
        }
        if !ing.quantity.is_finite() || ing.quantity < 0.0 {
            return Err(RecipeFileError::InvalidQuantity {
                name: ing.name,
                quantity: ing.quantity,
            });
        }
        // Stored verbatim: merging compares raw strings.
        ingredients.push(Ingredient::new(ing.name, ing.quantity, ing.unit));
    }

    Ok(NewRecipe {
        name: name.to_string(),
        ingredients,
        instructions: recipe.instructions,
        image_url: recipe.image_url.filter(|url| !url.trim().is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_recipe() {
        let recipe = parse_recipe_toml(
            r#"
name = "Pancakes"
instructions = "Whisk, rest, fry."
image_url = "https://example.com/p.jpg"

[[ingredients]]
name = "flour"
quantity = 60
unit = "g"

[[ingredients]]
name = "milk"
quantity = 0.125
unit = "l"
"#,
        )
        .unwrap();

        assert_eq!(recipe.name, "Pancakes");
        assert_eq!(recipe.image_url.as_deref(), Some("https://example.com/p.jpg"));
        assert_eq!(
            recipe.ingredients,
            vec![
                Ingredient::new("flour", 60.0, "g"),
                Ingredient::new("milk", 0.125, "l"),
            ]
        );
    }

    #[test]
    fn ingredients_and_unit_are_optional() {
        let recipe = parse_recipe_toml("name = \"Toast\"").unwrap();
        assert!(recipe.ingredients.is_empty());
        assert_eq!(recipe.instructions, "");

        let recipe = parse_recipe_toml(
            "name = \"Eggs\"\n[[ingredients]]\nname = \"egg\"\nquantity = 2\n",
        )
        .unwrap();
        assert_eq!(recipe.ingredients, vec![Ingredient::new("egg", 2.0, "")]);
    }

    #[test]
    fn ingredient_text_is_not_normalized() {
        let recipe = parse_recipe_toml(
            "name = \"X\"\n[[ingredients]]\nname = \" Salt\"\nquantity = 1\nunit = \"G\"\n",
        )
        .unwrap();
        assert_eq!(recipe.ingredients[0].name, " Salt");
        assert_eq!(recipe.ingredients[0].unit, "G");
    }

    #[test]
    fn rejects_blank_name() {
        let err = parse_recipe_toml("name = \"  \"").unwrap_err();
        assert!(matches!(err, RecipeFileError::EmptyName));
    }

    #[test]
    fn rejects_blank_ingredient_name() {
        let err = parse_recipe_toml(
            "name = \"X\"\n[[ingredients]]\nname = \"\"\nquantity = 1\nunit = \"g\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, RecipeFileError::EmptyIngredientName { index: 1 }));
    }

    #[test]
    fn rejects_negative_quantity() {
        let err = parse_recipe_toml(
            "name = \"X\"\n[[ingredients]]\nname = \"oil\"\nquantity = -1\nunit = \"ml\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, RecipeFileError::InvalidQuantity { .. }));
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = parse_recipe_toml("name = \"X\"\nservings = 4\n").unwrap_err();
        assert!(matches!(err, RecipeFileError::TomlError(_)));
    }
}
