//! `forked list` -- build a shopping list from the terminal.

use anyhow::Result;

use forked_core::shopping::{ShoppingListBuilder, ShoppingListRequest};
use forked_core::store::{RecipeStore, ShoppingListStore};
use forked_db::models::ShoppingListEntry;

pub async fn run_list(
    recipes: &dyn RecipeStore,
    lists: &dyn ShoppingListStore,
    recipe_ids: Vec<String>,
    people: i64,
    save: bool,
) -> Result<()> {
    let request = ShoppingListRequest::new(recipe_ids, people);
    let builder = ShoppingListBuilder::new(recipes);

    if save {
        let saved = builder.build_and_save(&request, lists).await?;
        print!(
            "{}",
            render_shopping_list(&saved.recipe_names, &saved.entries, i64::from(saved.people))
        );
        println!();
        println!("Saved as {}", saved.id);
    } else {
        let result = builder.build(&request).await?;
        print!(
            "{}",
            render_shopping_list(&result.recipe_names, &result.entries, i64::from(result.people))
        );
    }
    Ok(())
}

/// Plain-text rendering: recipes, then one aligned line per entry.
fn render_shopping_list(
    recipe_names: &[String],
    entries: &[ShoppingListEntry],
    people: i64,
) -> String {
    let mut out = format!(
        "Shopping list for {} {} ({})\n\n",
        people,
        if people == 1 { "person" } else { "people" },
        recipe_names.join(", "),
    );

    if entries.is_empty() {
        out.push_str("  (nothing to buy)\n");
        return out;
    }

    let qty_w = entries
        .iter()
        .map(|e| e.quantity.to_string().len())
        .max()
        .unwrap_or(0);
    let unit_w = entries.iter().map(|e| e.unit.len()).max().unwrap_or(0);

    for entry in entries {
        out.push_str(&format!(
            "  {:>qty_w$} {:<unit_w$}  {}\n",
            entry.quantity.to_string(),
            entry.unit,
            entry.name,
        ));
    }
    out
}
