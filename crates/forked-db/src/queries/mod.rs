pub mod recipes;
pub mod shopping_lists;
