//! Static catalog for the Kitchen Alchemy crafting engine.
//!
//! The catalog is immutable for the lifetime of a session: seed
//! ingredients, cooking methods with their transformation tables, authored
//! recipes, the basic-starter allowlist, and achievement definitions.
//!
//! # Modules
//!
//! - [`catalog`] -- [`Catalog`] with validated lookups.
//! - [`combination`] -- [`CombinationKey`], the order-independent form of
//!   a multi-ingredient selection.
//! - [`error`] -- Validation errors.
//! - [`ingredients`] -- Seed ingredients and [`BASIC_STARTERS`].
//! - [`methods`] -- Built-in cooking methods.
//! - [`recipes`] -- Built-in authored recipes.
//! - [`achievements`] -- Built-in achievement rules.

pub mod achievements;
pub mod catalog;
pub mod combination;
pub mod error;
pub mod ingredients;
pub mod methods;
pub mod recipes;

pub use achievements::default_achievement_rules;
pub use catalog::{Catalog, CatalogParts};
pub use combination::CombinationKey;
pub use error::CatalogError;
pub use ingredients::{BASIC_STARTERS, is_basic_starter, seed_ingredients};
