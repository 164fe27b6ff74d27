//! Enumeration types for the crafting engine.
//!
//! [`Category`] is the closed set of ingredient families. The generation
//! service is constrained to the same set, so every enum here doubles as a
//! wire vocabulary and serializes in `snake_case`.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Ingredient categories
// ---------------------------------------------------------------------------

/// The family an ingredient belongs to.
///
/// Categories feed the "distinct categories" achievement statistic and are
/// the only values the generation service may answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Category {
    /// Pantry staples with no stronger family (water, salt, sugar).
    Basic,
    /// Flours, cereals, and rice.
    Grain,
    /// Milk and everything made from it.
    Dairy,
    /// Fruit and vegetables.
    Produce,
    /// Eggs, meat, and fish.
    Protein,
    /// Doughs and batters.
    Dough,
    /// Baked breads.
    Bread,
    /// Pies, tarts, and laminated pastry.
    Pastry,
    /// Sauces, dressings, and condiments.
    Sauce,
    /// Soups and stews.
    Soup,
    /// Sweet dishes.
    Dessert,
    /// Anything you drink.
    Drink,
    /// Savory plated dishes.
    Dish,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Basic,
        Self::Grain,
        Self::Dairy,
        Self::Produce,
        Self::Protein,
        Self::Dough,
        Self::Bread,
        Self::Pastry,
        Self::Sauce,
        Self::Soup,
        Self::Dessert,
        Self::Drink,
        Self::Dish,
    ];

    /// The wire name of this category.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Grain => "grain",
            Self::Dairy => "dairy",
            Self::Produce => "produce",
            Self::Protein => "protein",
            Self::Dough => "dough",
            Self::Bread => "bread",
            Self::Pastry => "pastry",
            Self::Sauce => "sauce",
            Self::Soup => "soup",
            Self::Dessert => "dessert",
            Self::Drink => "drink",
            Self::Dish => "dish",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive lookup by wire name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Message codes
// ---------------------------------------------------------------------------

/// A message class attached to every resolution outcome.
///
/// The presentation layer maps each code to localized, self-dismissing text.
/// The engine never formats user-facing strings itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum MessageCode {
    /// The result was not discovered before this attempt.
    NewDiscovery,
    /// The result was already discovered.
    AlreadyDiscovered,
    /// A single ingredient was cooked with a method that does not affect it.
    NoEffect,
    /// Nothing matched and the generation fallback declined or failed.
    NoRecipeFound,
    /// The selection was empty.
    EmptySelection,
    /// More ingredients were selected than a combination accepts.
    Overflow,
    /// The selection names an ingredient the player does not own.
    UnknownIngredient,
    /// The selection names the same ingredient more than once.
    RepeatedIngredient,
    /// A previous attempt is still waiting on the generation service.
    Busy,
    /// A generation response arrived for an attempt that is no longer current.
    Stale,
}

impl MessageCode {
    /// Whether this code accompanies a successful discovery.
    pub const fn is_discovery(self) -> bool {
        matches!(self, Self::NewDiscovery | Self::AlreadyDiscovered)
    }
}
