//! Shared type definitions for the Kitchen Alchemy crafting engine.
//!
//! This crate is the single source of truth for every type that crosses a
//! crate boundary or the persistence boundary. Types flow to `TypeScript`
//! via `ts-rs` for the browser front-end.
//!
//! # Modules
//!
//! - [`ids`] -- Typed string identifiers for ingredients, methods,
//!   achievements, and custom recipes
//! - [`enums`] -- Ingredient categories and resolution message codes
//! - [`structs`] -- Catalog templates, ledger entries, achievements,
//!   selections, and generation-service shapes
//! - [`outcome`] -- Resolution outcomes

pub mod enums;
pub mod ids;
pub mod outcome;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Category, MessageCode, UnknownCategory};
pub use ids::{AchievementId, CustomRecipeId, DEFAULT_METHOD, IngredientId, MethodId};
pub use outcome::{DiscoveryResult, DiscoverySource, Miss, Resolution};
pub use structs::{
    Achievement, AchievementRule, CandidateIngredient, CustomRecipe, CustomResult, Draggable,
    GenerationRequest, Ingredient, IngredientSketch, Method, Recipe, Selection, Threshold,
    Transformation,
};
