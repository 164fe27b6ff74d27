//! Error types for the `kitchen-catalog` crate.
//!
//! Catalog construction validates every cross-reference up front so the
//! resolution engine can treat lookups as total over authored data.

use kitchen_types::{AchievementId, IngredientId, MethodId};

/// Errors raised while assembling a [`Catalog`](crate::Catalog).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Two ingredients share an id.
    #[error("duplicate ingredient id: {0}")]
    DuplicateIngredient(IngredientId),

    /// Two methods share an id.
    #[error("duplicate method id: {0}")]
    DuplicateMethod(MethodId),

    /// Two achievement rules share an id.
    #[error("duplicate achievement id: {0}")]
    DuplicateAchievement(AchievementId),

    /// A reference names an ingredient the catalog does not define.
    #[error("unknown ingredient {id} referenced by {context}")]
    UnknownIngredient {
        /// The missing id.
        id: IngredientId,
        /// Where the reference appeared.
        context: String,
    },

    /// A recipe has fewer than two or more than three inputs.
    #[error("recipe for {result} has {count} ingredients (expected 2 or 3)")]
    InvalidRecipeSize {
        /// The recipe's result id.
        result: IngredientId,
        /// The offending input count.
        count: usize,
    },

    /// A recipe lists the same input twice.
    #[error("recipe for {result} lists {ingredient} more than once")]
    DuplicateRecipeInput {
        /// The recipe's result id.
        result: IngredientId,
        /// The repeated input.
        ingredient: IngredientId,
    },

    /// Two recipes share the same ingredient set.
    #[error("recipes for {first} and {second} use the same ingredient set {key}")]
    DuplicateRecipeSet {
        /// Result of the earlier recipe.
        first: IngredientId,
        /// Result of the later recipe.
        second: IngredientId,
        /// The shared combination.
        key: String,
    },
}
