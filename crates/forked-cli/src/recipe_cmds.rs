//! CLI handlers for `forked recipe` subcommands.
//!
//! Implements:
//! - `forked recipe add <file>`   -- insert a recipe from a TOML file
//! - `forked recipe list`         -- list all recipes
//! - `forked recipe show <id>`    -- show one recipe with its ingredients

use anyhow::{Context, Result};

use forked_core::recipe_file::parse_recipe_toml;
use forked_core::store::RecipeStore;
use forked_db::models::Recipe;

use crate::RecipeCommands;

pub async fn run_recipe_command(command: RecipeCommands, store: &dyn RecipeStore) -> Result<()> {
    match command {
        RecipeCommands::Add { file } => {
            let recipe = add_from_file(store, &file).await?;
            println!("Recipe created.");
            println!();
            println!("  Recipe ID:   {}", recipe.id);
            println!("  Name:        {}", recipe.name);
            println!("  Ingredients: {}", recipe.ingredients.len());
            Ok(())
        }
        RecipeCommands::List => {
            let recipes = store.list_recipes().await?;
            print!("{}", render_recipe_table(&recipes));
            Ok(())
        }
        RecipeCommands::Show { recipe_id } => {
            let recipe = store
                .get_recipe(&recipe_id)
                .await?
                .with_context(|| format!("recipe {recipe_id} not found"))?;
            print!("{}", render_recipe(&recipe));
            Ok(())
        }
    }
}

/// Read, validate, and insert a recipe file.
pub async fn add_from_file(store: &dyn RecipeStore, file_path: &str) -> Result<Recipe> {
    let content = std::fs::read_to_string(file_path)
        .with_context(|| format!("failed to read recipe file: {file_path}"))?;
    let new_recipe = parse_recipe_toml(&content)
        .with_context(|| format!("failed to parse recipe file: {file_path}"))?;
    let recipe = store.insert_recipe(&new_recipe).await?;
    tracing::info!(recipe_id = %recipe.id, name = %recipe.name, "recipe added");
    Ok(recipe)
}

fn render_recipe_table(recipes: &[Recipe]) -> String {
    if recipes.is_empty() {
        return "No recipes found. Use `forked recipe add <file>` to create one.\n".to_string();
    }

    // ID is always 36 chars (UUID).
    let id_w = 36;
    let name_w = recipes.iter().map(|r| r.name.len()).max().unwrap_or(4).max(4);
    let ing_w = 11;

    let mut out = format!(
        "{:<id_w$}  {:<name_w$}  {:>ing_w$}  CREATED\n",
        "ID", "NAME", "INGREDIENTS",
    );
    for recipe in recipes {
        out.push_str(&format!(
            "{:<id_w$}  {:<name_w$}  {:>ing_w$}  {}\n",
            recipe.id,
            recipe.name,
            recipe.ingredients.len(),
            recipe.created_at.format("%Y-%m-%d %H:%M"),
        ));
    }
    out
}

fn render_recipe(recipe: &Recipe) -> String {
    let mut out = format!("{} ({})\n", recipe.name, recipe.id);
    if let Some(url) = &recipe.image_url {
        out.push_str(&format!("Image: {url}\n"));
    }
    out.push_str("\nIngredients (per person):\n");
    if recipe.ingredients.is_empty() {
        out.push_str("  (none)\n");
    }
    for ing in recipe.ingredients.iter() {
        out.push_str(&format!("  - {} {} {}\n", ing.quantity, ing.unit, ing.name));
    }
    if !recipe.instructions.is_empty() {
        out.push_str(&format!("\n{}\n", recipe.instructions));
    }
    out
}
