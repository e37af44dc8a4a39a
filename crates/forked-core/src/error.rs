//! Error taxonomy for shopping-list generation.

/// Failures surfaced by [`crate::shopping::ShoppingListBuilder`].
///
/// The aggregation itself cannot fail; a total it produces may still be
/// rejected when it does not fit an `f64`.
#[derive(Debug, thiserror::Error)]
pub enum ShoppingListError {
    /// The request is malformed or its totals overflow. Not retryable.
    #[error("invalid request: {0}")]
    Validation(String),

    /// One or more requested recipes do not exist. No partial list is produced.
    #[error("some recipes were not found ({found} of {requested} resolved)")]
    NotFound { requested: usize, found: usize },

    /// The backing store failed. Transient; callers may retry.
    #[error("store unavailable: {0:#}")]
    StoreUnavailable(#[source] anyhow::Error),
}

impl ShoppingListError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether the caller may retry the same request unchanged.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}
