//! Domain logic for forked: shopping-list aggregation, request validation,
//! recipe seed files, and the store seams the aggregation engine reads from.

pub mod error;
pub mod recipe_file;
pub mod shopping;
pub mod store;

pub use error::ShoppingListError;
