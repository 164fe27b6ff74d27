//! The admin-authored custom-recipe ledger.
//!
//! Entries are matched by the resolution engine after authored recipes and
//! before the generation fallback. The ledger owns only authoring rules
//! (input count, required display fields, id generation) and the
//! import/export format: a JSON array of [`CustomRecipe`].

use chrono::{DateTime, Utc};
use kitchen_catalog::CombinationKey;
use kitchen_types::{Category, CustomRecipe, CustomRecipeId, CustomResult, IngredientId};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Errors raised by ledger authoring and import.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// A recipe needs two or three inputs.
    #[error("custom recipe needs 2 or 3 ingredients, got {0}")]
    IngredientCount(usize),

    /// The same input was listed twice.
    #[error("ingredient {0} is listed more than once")]
    RepeatedIngredient(IngredientId),

    /// An input does not exist in the player's collection.
    #[error("unknown ingredient: {0}")]
    UnknownIngredient(IngredientId),

    /// The result name is blank.
    #[error("custom recipe result needs a name")]
    MissingName,

    /// The result glyph is blank.
    #[error("custom recipe result needs a glyph")]
    MissingGlyph,

    /// An entry with this id already exists.
    #[error("custom recipe id already exists: {0}")]
    DuplicateId(CustomRecipeId),

    /// No entry has this id.
    #[error("custom recipe not found: {0}")]
    NotFound(CustomRecipeId),

    /// The import payload is valid JSON but not an array.
    #[error("import payload must be a JSON array")]
    NotAnArray,

    /// An element of the import payload is not a valid custom recipe.
    #[error("import entry {index} is invalid: {reason}")]
    InvalidEntry {
        /// Position in the payload.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// What an admin fills in to author a custom recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    /// Result name.
    pub name: String,
    /// Result glyph.
    pub glyph: String,
    /// Result category.
    pub category: Category,
    /// Result description.
    pub description: String,
    /// Two or three distinct input ids.
    pub ingredients: Vec<IngredientId>,
}

/// Outcome of a successful import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Entries appended to the ledger.
    pub imported: usize,
    /// Entries skipped because their id was already present.
    pub skipped: usize,
}

/// Ordered collection of custom recipes; insertion order is match order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomRecipeLedger {
    entries: Vec<CustomRecipe>,
}

impl CustomRecipeLedger {
    /// An empty ledger.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[CustomRecipe] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry with `id` exists.
    pub fn contains(&self, id: &CustomRecipeId) -> bool {
        self.entries.iter().any(|r| &r.id == id)
    }

    /// The first entry, in insertion order, whose inputs equal `key` as a set.
    pub fn find(&self, key: &CombinationKey) -> Option<&CustomRecipe> {
        self.entries
            .iter()
            .find(|r| CombinationKey::new(&r.ingredients) == *key)
    }

    /// Validate `draft` and append it, stamping it with `now`.
    ///
    /// The entry id is the sanitized name plus the millisecond timestamp,
    /// and the result id is that same stem with a `custom_` prefix, so two
    /// recipes sharing a name still produce distinct ingredients. When
    /// either id is already taken a `_2`, `_3`, ... suffix is appended to
    /// both.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the draft has the wrong number of inputs,
    /// a repeated input, or a blank name or glyph.
    pub fn add(&mut self, draft: RecipeDraft, now: DateTime<Utc>) -> Result<&CustomRecipe, LedgerError> {
        check_inputs(&draft.ingredients)?;
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(LedgerError::MissingName);
        }
        let glyph = draft.glyph.trim();
        if glyph.is_empty() {
            return Err(LedgerError::MissingGlyph);
        }

        let (id, result_id) = self.fresh_ids(&slugify(name), now)?;
        let recipe = CustomRecipe {
            id,
            ingredients: draft.ingredients,
            result: CustomResult {
                id: result_id,
                name: name.to_owned(),
                glyph: glyph.to_owned(),
                category: draft.category,
                description: draft.description.trim().to_owned(),
            },
            created_at: now,
        };
        info!(recipe_id = %recipe.id, result_id = %recipe.result.id, "custom recipe added");
        self.entries.push(recipe);
        self.entries.last().ok_or(LedgerError::IngredientCount(0))
    }

    /// First free entry id and result id for `slug` at `now`.
    fn fresh_ids(
        &self,
        slug: &str,
        now: DateTime<Utc>,
    ) -> Result<(CustomRecipeId, IngredientId), LedgerError> {
        let base = format!("{slug}_{}", now.timestamp_millis());
        let attempts = self.entries.len().saturating_add(1);
        for n in 1..=attempts {
            let stem = if n == 1 { base.clone() } else { format!("{base}_{n}") };
            let id = CustomRecipeId::new(stem.clone());
            let result_id = IngredientId::new(format!("custom_{stem}"));
            let taken = self
                .entries
                .iter()
                .any(|r| r.id == id || r.result.id == result_id);
            if !taken {
                return Ok((id, result_id));
            }
        }
        Err(LedgerError::DuplicateId(CustomRecipeId::new(base)))
    }

    /// Remove the entry with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if no entry has that id.
    pub fn delete(&mut self, id: &CustomRecipeId) -> Result<CustomRecipe, LedgerError> {
        let index = self
            .entries
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.clone()))?;
        let removed = self.entries.remove(index);
        info!(recipe_id = %removed.id, "custom recipe deleted");
        Ok(removed)
    }

    /// Remove every entry, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        info!(count, "custom recipe ledger cleared");
        count
    }

    /// Serialize the ledger as a pretty-printed JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Serde`] if serialization fails.
    pub fn export_json(&self) -> Result<String, LedgerError> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Append entries from a JSON array, skipping ids already present.
    ///
    /// The whole payload is validated before anything is applied: one bad
    /// entry rejects the import and leaves the ledger untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Serde`] for invalid JSON,
    /// [`LedgerError::NotAnArray`] for a non-array payload, and
    /// [`LedgerError::InvalidEntry`] for the first malformed entry.
    pub fn import_json(&mut self, json: &str) -> Result<ImportSummary, LedgerError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Array(items) = value else {
            return Err(LedgerError::NotAnArray);
        };

        let mut incoming = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let recipe: CustomRecipe = serde_json::from_value(item).map_err(|e| {
                LedgerError::InvalidEntry {
                    index,
                    reason: e.to_string(),
                }
            })?;
            check_entry(&recipe).map_err(|e| LedgerError::InvalidEntry {
                index,
                reason: e.to_string(),
            })?;
            incoming.push(recipe);
        }

        let mut summary = ImportSummary::default();
        for recipe in incoming {
            if self.contains(&recipe.id) {
                summary.skipped = summary.skipped.saturating_add(1);
            } else {
                self.entries.push(recipe);
                summary.imported = summary.imported.saturating_add(1);
            }
        }
        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            "custom recipes imported"
        );
        Ok(summary)
    }
}

/// Shape checks shared by authoring and import.
fn check_entry(recipe: &CustomRecipe) -> Result<(), LedgerError> {
    check_inputs(&recipe.ingredients)?;
    if recipe.id.as_str().trim().is_empty() || recipe.result.id.as_str().trim().is_empty() {
        return Err(LedgerError::MissingName);
    }
    if recipe.result.name.trim().is_empty() {
        return Err(LedgerError::MissingName);
    }
    if recipe.result.glyph.trim().is_empty() {
        return Err(LedgerError::MissingGlyph);
    }
    Ok(())
}

fn check_inputs(ingredients: &[IngredientId]) -> Result<(), LedgerError> {
    if !(2..=3).contains(&ingredients.len()) {
        return Err(LedgerError::IngredientCount(ingredients.len()));
    }
    if let Some(repeated) = CombinationKey::new(ingredients).repeated() {
        return Err(LedgerError::RepeatedIngredient(repeated.clone()));
    }
    Ok(())
}

/// Lowercase `name`, collapse runs of non-alphanumerics to `_`.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("recipe");
    }
    slug
}
