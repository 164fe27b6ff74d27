//! Canonical, order-independent combination keys.

use core::fmt;

use kitchen_types::IngredientId;

/// A selection normalized to ascending id order.
///
/// Two selections match the same recipe exactly when their keys are equal,
/// whatever order the ingredients were dropped in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CombinationKey(Vec<IngredientId>);

impl CombinationKey {
    /// Build the canonical key for a set of ids.
    pub fn new<'a, I>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'a IngredientId>,
    {
        let mut sorted: Vec<IngredientId> = ids.into_iter().cloned().collect();
        sorted.sort_unstable();
        Self(sorted)
    }

    /// Number of ids in the key.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The sorted ids.
    pub fn ids(&self) -> &[IngredientId] {
        &self.0
    }

    /// The first id that appears more than once, if any.
    pub fn repeated(&self) -> Option<&IngredientId> {
        self.0.windows(2).find_map(|pair| match pair {
            [a, b] if a == b => Some(a),
            _ => None,
        })
    }
}

impl fmt::Display for CombinationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for id in &self.0 {
            if !first {
                f.write_str("+")?;
            }
            f.write_str(id.as_str())?;
            first = false;
        }
        Ok(())
    }
}
