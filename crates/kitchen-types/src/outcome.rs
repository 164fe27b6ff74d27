//! Resolution outcomes returned to the presentation layer.
//!
//! A resolution attempt ends in exactly one of two shapes: a
//! [`DiscoveryResult`] or a [`Miss`]. Both carry a [`MessageCode`]; the
//! engine never produces display text or timing.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::MessageCode;
use crate::ids::{AchievementId, IngredientId};
use crate::structs::Ingredient;

/// Which stage of the precedence chain produced a discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DiscoverySource {
    /// A single ingredient cooked with a method.
    Transformation,
    /// An authored catalog recipe.
    Recipe,
    /// An admin-authored custom recipe.
    CustomRecipe,
    /// The generation service invented the result.
    Generated,
}

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DiscoveryResult {
    /// The user-visible final result, as stored in the player state.
    pub result: Ingredient,
    /// Whether `result` was undiscovered before this attempt.
    pub is_new: bool,
    /// The combined item when the active method then cooked it further.
    pub intermediate: Option<Ingredient>,
    /// Every id whose `discovered` flag flipped during this attempt.
    pub newly_discovered: Vec<IngredientId>,
    /// Achievements unlocked as a consequence of this attempt.
    pub unlocked_achievements: Vec<AchievementId>,
    /// The stage that matched.
    pub source: DiscoverySource,
    /// Recipe or generated description, if one exists.
    pub description: Option<String>,
    /// `NewDiscovery` or `AlreadyDiscovered`.
    pub message: MessageCode,
}

/// An unsuccessful, fully recoverable resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Miss {
    /// Why nothing was produced.
    pub message: MessageCode,
}

/// The outcome of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Resolution {
    /// Something was produced.
    Discovery(Box<DiscoveryResult>),
    /// Nothing was produced.
    Miss(Miss),
}

impl Resolution {
    /// A miss with the given message class.
    pub const fn miss(message: MessageCode) -> Self {
        Self::Miss(Miss { message })
    }

    /// The message class of this outcome.
    pub fn message(&self) -> MessageCode {
        match self {
            Self::Discovery(found) => found.message,
            Self::Miss(miss) => miss.message,
        }
    }

    /// The discovery, if this outcome is one.
    pub fn discovery(&self) -> Option<&DiscoveryResult> {
        match self {
            Self::Discovery(found) => Some(found),
            Self::Miss(_) => None,
        }
    }

    /// Whether nothing was produced.
    pub const fn is_miss(&self) -> bool {
        matches!(self, Self::Miss(_))
    }
}
