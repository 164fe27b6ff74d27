//! Type-safe identifier wrappers around stable string ids.
//!
//! Catalog entries are addressed by short human-readable ids (`flour`,
//! `bake`, `first_discovery`). Wrapping them in distinct newtypes keeps an
//! ingredient id from being passed where a method id is expected. All ids
//! serialize transparently as plain JSON strings so persisted blobs stay
//! readable by the browser front-end.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The identity method. Selecting it is equivalent to selecting no method.
pub const DEFAULT_METHOD: &str = "mix";

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(String::from(id))
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an ingredient (seed, derived, custom, or generated).
    IngredientId
}

define_id! {
    /// Unique identifier for a cooking method (`mix`, `bake`, `boil`, ...).
    MethodId
}

define_id! {
    /// Unique identifier for an achievement.
    AchievementId
}

define_id! {
    /// Unique identifier for an admin-authored custom recipe.
    CustomRecipeId
}

impl MethodId {
    /// The identity method id (`mix`).
    pub fn mix() -> Self {
        Self::from(DEFAULT_METHOD)
    }

    /// Whether this is the identity method, which never transforms anything.
    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_METHOD
    }
}
