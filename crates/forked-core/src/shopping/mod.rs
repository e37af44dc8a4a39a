//! Shopping-list generation: identity keys, aggregation, request parsing,
//! and the builder that ties them to a [`crate::store::RecipeStore`].

pub mod aggregate;
pub mod builder;
pub mod normalize;
pub mod request;

pub use aggregate::aggregate;
pub use builder::{ShoppingListBuilder, ShoppingListResult};
pub use normalize::{IdentityKey, identity_key};
pub use request::ShoppingListRequest;
