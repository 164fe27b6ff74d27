//! The generation-service seam and id policy for generated ingredients.
//!
//! When no authored or custom recipe matches, the engine asks a
//! [`Generator`] to invent a result. The generator only proposes a name,
//! glyph, description, and category; the engine owns id derivation and
//! difficulty through [`AiIdPolicy`] so those rules stay testable without
//! a remote service.
//!
//! [`DisabledGenerator`] always declines, which turns the fallback into an
//! immediate "no recipe found".

use std::future::Future;

use kitchen_types::{CandidateIngredient, GenerationRequest, Ingredient, IngredientId};

/// A source of invented ingredients for unmatched combinations.
///
/// Implementations must never fail loudly: transport errors, timeouts,
/// and malformed answers are all reported as `None`.
pub trait Generator {
    /// Propose a result for the given selection, or `None` to decline.
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Option<CandidateIngredient>> + Send;
}

/// A generator that declines every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

impl DisabledGenerator {
    /// Create a new disabled generator.
    pub const fn new() -> Self {
        Self
    }
}

impl Generator for DisabledGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Option<CandidateIngredient> {
        None
    }
}

/// How generated ingredients get their ids and difficulty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiIdPolicy {
    /// Prefix marking generated provenance.
    pub prefix: String,
    /// Maximum length of the sanitized name part.
    pub max_len: usize,
    /// Difficulty given to every generated ingredient.
    pub difficulty: u32,
}

impl Default for AiIdPolicy {
    fn default() -> Self {
        Self {
            prefix: String::from("ai_"),
            max_len: 30,
            difficulty: 3,
        }
    }
}

impl AiIdPolicy {
    /// The undisambiguated id for `name`: prefix plus the lowercased ASCII
    /// alphanumerics of the name, truncated to `max_len`.
    pub fn base_id(&self, name: &str) -> String {
        let stem: String = name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .take(self.max_len)
            .collect();
        let stem = if stem.is_empty() { "item" } else { stem.as_str() };
        format!("{}{stem}", self.prefix)
    }

    /// Assign an id for a generated ingredient called `name`.
    ///
    /// An existing entry with the same name (ignoring case) keeps its id,
    /// so regenerating a known result re-discovers it. A different name
    /// that sanitizes to a taken id gets the first free `_2`, `_3`, ...
    /// suffix.
    pub fn assign(&self, name: &str, existing: &[Ingredient]) -> IngredientId {
        let base = self.base_id(name);
        let available = |candidate: &str| {
            existing
                .iter()
                .find(|i| i.id.as_str() == candidate)
                .is_none_or(|i| i.name.eq_ignore_ascii_case(name.trim()))
        };

        if available(&base) {
            return IngredientId::new(base);
        }
        for suffix in 2..u32::MAX {
            let candidate = format!("{base}_{suffix}");
            if available(&candidate) {
                return IngredientId::new(candidate);
            }
        }
        IngredientId::new(base)
    }

    /// Build the ingredient for an accepted candidate.
    pub fn materialize(&self, candidate: &CandidateIngredient, existing: &[Ingredient]) -> Ingredient {
        let name = candidate.name.trim();
        Ingredient {
            id: self.assign(name, existing),
            name: name.to_owned(),
            glyph: candidate.glyph.trim().to_owned(),
            category: candidate.category,
            discovered: true,
            difficulty: self.difficulty,
            description: Some(candidate.description.trim().to_owned())
                .filter(|d| !d.is_empty()),
        }
    }
}

/// Whether a candidate carries the fields a discovery needs.
pub fn is_well_formed(candidate: &CandidateIngredient) -> bool {
    !candidate.name.trim().is_empty() && !candidate.glyph.trim().is_empty()
}
