//! Core entity structs for the crafting engine.
//!
//! Covers the catalog templates (`Ingredient`, `Transformation`, `Method`,
//! `Recipe`), the admin ledger entries (`CustomRecipe`), achievements and
//! their unlock thresholds, the ephemeral `Selection`, and the request and
//! response shapes exchanged with the generation service.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Category;
use crate::ids::{AchievementId, CustomRecipeId, IngredientId, MethodId};

// ---------------------------------------------------------------------------
// Ingredients
// ---------------------------------------------------------------------------

/// An ingredient in the player's collection.
///
/// Catalog entries are immutable templates; once copied into the player
/// state the copy is owned there and only its `discovered` flag changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Ingredient {
    /// Stable unique id.
    pub id: IngredientId,
    /// Display name.
    pub name: String,
    /// Emoji or short glyph shown on the ingredient tile.
    pub glyph: String,
    /// Ingredient family.
    pub category: Category,
    /// Whether the player has unlocked this ingredient.
    pub discovered: bool,
    /// Derivation depth, starting at 1 for basic starters.
    pub difficulty: u32,
    /// Flavor text for custom and generated ingredients.
    #[serde(default)]
    pub description: Option<String>,
}

impl Ingredient {
    /// Whether this ingredient is derived rather than a difficulty-1 staple.
    pub const fn is_non_basic(&self) -> bool {
        self.difficulty > 1
    }

    /// The name and glyph pair sent to the generation service.
    pub fn sketch(&self) -> IngredientSketch {
        IngredientSketch {
            name: self.name.clone(),
            glyph: self.glyph.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Methods and transformations
// ---------------------------------------------------------------------------

/// The output of cooking a single ingredient with a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Transformation {
    /// Id of the produced ingredient.
    pub id: IngredientId,
    /// Display name of the produced ingredient.
    pub name: String,
    /// Glyph of the produced ingredient.
    pub glyph: String,
    /// Category of the produced ingredient.
    pub category: Category,
}

/// A cooking method and its per-ingredient transformation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Method {
    /// Stable method id.
    pub id: MethodId,
    /// Display name.
    pub name: String,
    /// Glyph shown on the method button.
    pub glyph: String,
    /// Source ingredient id to transformation output.
    pub transformations: BTreeMap<IngredientId, Transformation>,
}

// ---------------------------------------------------------------------------
// Recipes
// ---------------------------------------------------------------------------

/// An authored multi-ingredient recipe. Ingredient order is irrelevant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Recipe {
    /// Two or three distinct input ids.
    pub ingredients: Vec<IngredientId>,
    /// Id of the catalog ingredient this recipe produces.
    pub result: IngredientId,
    /// Difficulty of the result.
    pub difficulty: u32,
    /// Short description shown on discovery.
    pub description: String,
}

/// The inlined result descriptor of a [`CustomRecipe`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CustomResult {
    /// Id of the produced ingredient.
    pub id: IngredientId,
    /// Display name.
    pub name: String,
    /// Glyph.
    pub glyph: String,
    /// Category.
    pub category: Category,
    /// Description shown on discovery.
    #[serde(default)]
    pub description: String,
}

/// An admin-authored recipe stored in the custom-recipe ledger.
///
/// Serialized in `camelCase` so exported ledgers match the browser format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CustomRecipe {
    /// Ledger entry id (`name + timestamp` derived).
    pub id: CustomRecipeId,
    /// Two or three input ids, in authoring order.
    pub ingredients: Vec<IngredientId>,
    /// The fully inlined result.
    pub result: CustomResult,
    /// When the entry was authored.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Achievements
// ---------------------------------------------------------------------------

/// An achievement and whether the player has earned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Achievement {
    /// Stable achievement id.
    pub id: AchievementId,
    /// Display name.
    pub name: String,
    /// What the player has to do.
    pub description: String,
    /// Set once, never cleared except by a full progress reset.
    pub achieved: bool,
}

/// The statistic an achievement watches and the value that unlocks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Threshold {
    /// At least this many discovered ingredients with difficulty above 1.
    NonBasicDiscoveries(u32),
    /// At least this many distinct categories among non-basic discoveries.
    DistinctCategories(u32),
    /// Some discovered ingredient has at least this difficulty.
    MaxDifficulty(u32),
}

/// An achievement definition: display data plus its unlock threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AchievementRule {
    /// Stable achievement id.
    pub id: AchievementId,
    /// Display name.
    pub name: String,
    /// What the player has to do.
    pub description: String,
    /// Unlock condition.
    pub threshold: Threshold,
}

impl AchievementRule {
    /// A fresh, unearned [`Achievement`] for this rule.
    pub fn locked(&self) -> Achievement {
        Achievement {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            achieved: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// The content of the mixing bowl for a single resolution attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Selection {
    /// Selected ingredient ids in drop order.
    pub ingredients: Vec<IngredientId>,
    /// The selected method, if any.
    pub method: Option<MethodId>,
}

impl Selection {
    /// A selection of ingredients with no method.
    pub fn of<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<IngredientId>,
    {
        Self {
            ingredients: ids.into_iter().map(Into::into).collect(),
            method: None,
        }
    }

    /// The same selection with `method` active.
    pub fn with_method(mut self, method: impl Into<MethodId>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// The active method, treating the identity method as no method.
    pub fn active_method(&self) -> Option<&MethodId> {
        self.method.as_ref().filter(|m| !m.is_default())
    }
}

/// Something the player can drop into the mixing bowl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Draggable {
    /// An ingredient tile.
    Ingredient(IngredientId),
    /// A cooking method button.
    Method(MethodId),
}

// ---------------------------------------------------------------------------
// Generation service boundary
// ---------------------------------------------------------------------------

/// The name and glyph of a selected ingredient, as shown to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct IngredientSketch {
    /// Display name.
    pub name: String,
    /// Glyph.
    pub glyph: String,
}

/// A request to invent a result for an unmatched combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GenerationRequest {
    /// The selected ingredients.
    pub ingredients: Vec<IngredientSketch>,
    /// The active non-default method, if any.
    pub method: Option<MethodId>,
}

/// A structured answer from the generation service.
///
/// Carries no id or difficulty; the resolution engine assigns both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CandidateIngredient {
    /// Proposed name.
    pub name: String,
    /// Proposed glyph.
    pub glyph: String,
    /// One-sentence description.
    pub description: String,
    /// One of the fixed categories.
    pub category: Category,
}
