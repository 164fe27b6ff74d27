//! The resolution engine.
//!
//! [`Kitchen`] owns the catalog, the player state, the persistence layer,
//! and the generation seam, and turns a [`Selection`] into a
//! [`Resolution`]. Lookup order is an explicit list of [`Strategy`]
//! values rather than nested conditionals, so it can be inspected and
//! reordered.
//!
//! Resolution runs in two phases. [`Kitchen::begin_resolution`] does all
//! synchronous work and either finishes or hands back a
//! [`GenerationTicket`]; [`Kitchen::complete_generation`] applies the
//! generator's answer. [`Kitchen::resolve`] chains both for callers that
//! can simply await. While a ticket is outstanding the engine reports
//! [`MessageCode::Busy`], and a ticket invalidated by a later clear or
//! reset is answered with [`MessageCode::Stale`] without touching state.
//!
//! Every state change is saved immediately and followed by an achievement
//! pass.

use std::sync::Arc;

use chrono::Utc;
use kitchen_catalog::{Catalog, CatalogError, CombinationKey};
use kitchen_types::{
    AchievementId, CandidateIngredient, CustomRecipe, CustomRecipeId, DiscoveryResult,
    DiscoverySource, Draggable, GenerationRequest, Ingredient, IngredientId, MessageCode, MethodId,
    Resolution, Selection,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::achievements::{AchievementEvaluator, Evaluation};
use crate::config::GameConfig;
use crate::generation::{AiIdPolicy, Generator, is_well_formed};
use crate::ledger::{ImportSummary, LedgerError, RecipeDraft};
use crate::state::{PlayerState, Progress};
use crate::store::{BlobStore, StateStore, StorageKey};
use crate::workspace::{MAX_SELECTION, RejectReason, Workspace, WorkspaceEvent};

// ---------------------------------------------------------------------------
// Strategies and tickets
// ---------------------------------------------------------------------------

/// One stage of the multi-ingredient lookup chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Authored catalog recipes, in catalog order.
    AuthoredRecipe,
    /// Admin-authored custom recipes, in ledger order.
    CustomRecipe,
    /// Ask the generation service. Always suspends, so later stages are
    /// never consulted.
    Generative,
}

/// The lookup chain used unless configured otherwise.
pub const DEFAULT_PRECEDENCE: [Strategy; 3] = [
    Strategy::AuthoredRecipe,
    Strategy::CustomRecipe,
    Strategy::Generative,
];

/// An outstanding generation request.
///
/// Hand the request to a [`Generator`] and the answer, with this ticket,
/// back to [`Kitchen::complete_generation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    attempt: u64,
    request: GenerationRequest,
}

impl GenerationTicket {
    /// The attempt number this ticket belongs to.
    pub const fn attempt(&self) -> u64 {
        self.attempt
    }

    /// What to send to the generator.
    pub const fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

/// The outcome of the synchronous phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionStep {
    /// Resolution is complete.
    Finished(Resolution),
    /// Nothing matched; a generation answer is needed.
    Pending(GenerationTicket),
}

/// A matched result before it is applied to the player state.
struct Found {
    template: Ingredient,
    source: DiscoverySource,
    description: Option<String>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The crafting engine for one player.
#[derive(Debug)]
pub struct Kitchen<B, G> {
    catalog: Catalog,
    state: PlayerState,
    store: StateStore<B>,
    generator: Arc<G>,
    evaluator: AchievementEvaluator,
    ai_ids: AiIdPolicy,
    precedence: Vec<Strategy>,
    workspace: Workspace,
    attempt: u64,
    in_flight: Option<u64>,
}

impl<B: BlobStore, G: Generator> Kitchen<B, G> {
    /// Build an engine, loading saved progress from `backend`.
    ///
    /// Achievement rules from `config` replace the catalog defaults. With
    /// generation disabled the [`Strategy::Generative`] stage is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateAchievement`] if the configured
    /// achievement rules repeat an id.
    pub fn new(
        catalog: Catalog,
        backend: B,
        generator: G,
        config: &GameConfig,
    ) -> Result<Self, CatalogError> {
        let catalog = match &config.achievements {
            Some(rules) => catalog.with_achievement_rules(rules.clone())?,
            None => catalog,
        };
        let mut store = StateStore::new(backend);
        let state = store.load(&catalog);

        let precedence = DEFAULT_PRECEDENCE
            .into_iter()
            .filter(|s| config.generation.enabled || *s != Strategy::Generative)
            .collect();

        Ok(Self {
            evaluator: AchievementEvaluator::from_catalog(&catalog),
            catalog,
            state,
            store,
            generator: Arc::new(generator),
            ai_ids: config.ai_id_policy(),
            precedence,
            workspace: Workspace::new(),
            attempt: 0,
            in_flight: None,
        })
    }

    /// Replace the lookup chain.
    #[must_use]
    pub fn with_precedence(mut self, precedence: Vec<Strategy>) -> Self {
        self.precedence = precedence;
        self
    }

    // -- Accessors ---------------------------------------------------------

    /// The static catalog.
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The player's progress.
    pub const fn state(&self) -> &PlayerState {
        &self.state
    }

    /// The persistence layer.
    pub const fn store(&self) -> &StateStore<B> {
        &self.store
    }

    /// Mutable access to the persistence layer.
    pub const fn store_mut(&mut self) -> &mut StateStore<B> {
        &mut self.store
    }

    /// A shared handle to the generator, for driving tickets elsewhere.
    pub fn generator(&self) -> Arc<G> {
        Arc::clone(&self.generator)
    }

    /// The active lookup chain.
    pub fn precedence(&self) -> &[Strategy] {
        &self.precedence
    }

    /// The mixing bowl.
    pub const fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Whether a generation request is outstanding.
    pub const fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The latest attempt number.
    pub const fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Discovery and achievement counts.
    pub fn progress(&self) -> Progress {
        self.state.progress()
    }

    // -- Workspace ---------------------------------------------------------

    /// Drop an ingredient or method into the bowl.
    ///
    /// Only discovered ingredients and known methods are accepted, and the
    /// bowl is locked while a generation request is outstanding.
    pub fn drop_item(&mut self, item: Draggable) -> WorkspaceEvent {
        if self.is_busy() {
            return WorkspaceEvent::Rejected(RejectReason::Busy);
        }
        match &item {
            Draggable::Ingredient(id) => match self.state.ingredient(id.as_str()) {
                None => return WorkspaceEvent::Rejected(RejectReason::Unknown),
                Some(found) if !found.discovered => {
                    return WorkspaceEvent::Rejected(RejectReason::Undiscovered);
                }
                Some(_) => {}
            },
            Draggable::Method(id) => {
                if self.catalog.method(id.as_str()).is_none() {
                    return WorkspaceEvent::Rejected(RejectReason::Unknown);
                }
            }
        }
        self.workspace.drop_item(item)
    }

    /// Take one ingredient back out of the bowl.
    pub fn remove_from_workspace(&mut self, id: &IngredientId) -> WorkspaceEvent {
        if self.is_busy() {
            return WorkspaceEvent::Rejected(RejectReason::Busy);
        }
        self.workspace.remove(id)
    }

    /// Empty the bowl. Any outstanding generation answer becomes stale.
    pub fn clear_workspace(&mut self) {
        self.workspace.clear();
        self.invalidate_in_flight();
    }

    /// Resolve whatever is in the bowl.
    pub async fn mix(&mut self) -> Resolution {
        let selection = self.workspace.selection().clone();
        self.resolve(&selection).await
    }

    /// Synchronous phase for whatever is in the bowl.
    pub fn begin_mix(&mut self) -> ResolutionStep {
        let selection = self.workspace.selection().clone();
        self.begin_resolution(&selection)
    }

    // -- Resolution --------------------------------------------------------

    /// Resolve `selection`, awaiting the generator if nothing else matches.
    pub async fn resolve(&mut self, selection: &Selection) -> Resolution {
        match self.begin_resolution(selection) {
            ResolutionStep::Finished(resolution) => resolution,
            ResolutionStep::Pending(ticket) => {
                let generator = Arc::clone(&self.generator);
                let candidate = generator.generate(ticket.request()).await;
                self.complete_generation(ticket, candidate)
            }
        }
    }

    /// Run every synchronous lookup for `selection`.
    pub fn begin_resolution(&mut self, selection: &Selection) -> ResolutionStep {
        if self.is_busy() {
            debug!("resolution refused while generation is outstanding");
            return ResolutionStep::Finished(Resolution::miss(MessageCode::Busy));
        }
        if selection.ingredients.is_empty() {
            return ResolutionStep::Finished(Resolution::miss(MessageCode::EmptySelection));
        }
        if selection.ingredients.len() > MAX_SELECTION {
            return ResolutionStep::Finished(Resolution::miss(MessageCode::Overflow));
        }
        if let Some(repeated) = CombinationKey::new(&selection.ingredients).repeated() {
            debug!(ingredient_id = %repeated, "selection repeats an ingredient");
            return ResolutionStep::Finished(Resolution::miss(MessageCode::RepeatedIngredient));
        }

        let mut inputs = Vec::with_capacity(selection.ingredients.len());
        for id in &selection.ingredients {
            match self.state.ingredient(id.as_str()) {
                Some(found) if found.discovered => inputs.push(found.clone()),
                _ => {
                    debug!(ingredient_id = %id, "selection holds an unknown ingredient");
                    return ResolutionStep::Finished(Resolution::miss(
                        MessageCode::UnknownIngredient,
                    ));
                }
            }
        }

        self.attempt = self.attempt.saturating_add(1);
        let method = selection.active_method().cloned();

        let [single] = inputs.as_slice() else {
            return self.resolve_combination(&inputs, method);
        };
        let resolution = match &method {
            Some(method) => self.cook(single, method),
            None => Resolution::miss(MessageCode::NoEffect),
        };
        ResolutionStep::Finished(resolution)
    }

    /// Apply a generation answer for `ticket`.
    ///
    /// Answers for a ticket that is no longer current are discarded.
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        candidate: Option<CandidateIngredient>,
    ) -> Resolution {
        if self.in_flight != Some(ticket.attempt) {
            warn!(
                ticket = ticket.attempt,
                current = self.attempt,
                "discarding stale generation answer"
            );
            return Resolution::miss(MessageCode::Stale);
        }
        self.in_flight = None;

        let Some(candidate) = candidate.filter(is_well_formed) else {
            info!(attempt = ticket.attempt, "generation declined");
            return Resolution::miss(MessageCode::NoRecipeFound);
        };

        let template = self.ai_ids.materialize(&candidate, &self.state.ingredients);
        let found = Found {
            description: template.description.clone(),
            template,
            source: DiscoverySource::Generated,
        };
        self.settle(found, None)
    }

    /// Single ingredient with an active method.
    fn cook(&mut self, source: &Ingredient, method: &MethodId) -> Resolution {
        let Some(target) = self.transformed(source, method) else {
            debug!(ingredient_id = %source.id, method_id = %method, "method has no effect");
            return Resolution::miss(MessageCode::NoEffect);
        };
        let found = Found {
            template: target,
            source: DiscoverySource::Transformation,
            description: None,
        };
        self.settle(found, None)
    }

    /// Two or three ingredients: walk the lookup chain.
    fn resolve_combination(
        &mut self,
        inputs: &[Ingredient],
        method: Option<MethodId>,
    ) -> ResolutionStep {
        let ids: Vec<IngredientId> = inputs.iter().map(|i| i.id.clone()).collect();
        let key = CombinationKey::new(&ids);

        for strategy in self.precedence.clone() {
            let found = match strategy {
                Strategy::AuthoredRecipe => self.authored(&key),
                Strategy::CustomRecipe => self.custom(&key, inputs),
                Strategy::Generative => {
                    self.in_flight = Some(self.attempt);
                    info!(attempt = self.attempt, combination = %key, "requesting generation");
                    return ResolutionStep::Pending(GenerationTicket {
                        attempt: self.attempt,
                        request: GenerationRequest {
                            ingredients: inputs.iter().map(Ingredient::sketch).collect(),
                            method,
                        },
                    });
                }
            };
            if let Some(found) = found {
                return ResolutionStep::Finished(self.settle(found, method.as_ref()));
            }
        }

        debug!(combination = %key, "no recipe found");
        ResolutionStep::Finished(Resolution::miss(MessageCode::NoRecipeFound))
    }

    fn authored(&self, key: &CombinationKey) -> Option<Found> {
        let recipe = self.catalog.find_recipe(key)?;
        let template = self
            .state
            .ingredient(recipe.result.as_str())
            .or_else(|| self.catalog.ingredient(recipe.result.as_str()))
            .cloned();
        if template.is_none() {
            warn!(result = %recipe.result, "authored recipe result is missing");
        }
        Some(Found {
            template: template?,
            source: DiscoverySource::Recipe,
            description: Some(recipe.description.clone()),
        })
    }

    fn custom(&self, key: &CombinationKey, inputs: &[Ingredient]) -> Option<Found> {
        let recipe = self.state.custom_recipes.find(key)?;
        let difficulty = inputs
            .iter()
            .map(|i| i.difficulty)
            .max()
            .unwrap_or(1)
            .saturating_add(1);
        let description = Some(recipe.result.description.clone()).filter(|d| !d.is_empty());
        Some(Found {
            template: Ingredient {
                id: recipe.result.id.clone(),
                name: recipe.result.name.clone(),
                glyph: recipe.result.glyph.clone(),
                category: recipe.result.category,
                discovered: true,
                difficulty,
                description: description.clone(),
            },
            source: DiscoverySource::CustomRecipe,
            description,
        })
    }

    /// The ingredient `method` turns `source` into, if it has a rule.
    ///
    /// A target already in the collection is reused as is; otherwise it is
    /// one difficulty step above its source.
    fn transformed(&self, source: &Ingredient, method: &MethodId) -> Option<Ingredient> {
        let rule = self.catalog.transformation(method, &source.id)?;
        let target = self.state.ingredient(rule.id.as_str()).cloned().unwrap_or_else(|| {
            Ingredient {
                id: rule.id.clone(),
                name: rule.name.clone(),
                glyph: rule.glyph.clone(),
                category: rule.category,
                discovered: true,
                difficulty: source.difficulty.saturating_add(1),
                description: None,
            }
        });
        Some(target)
    }

    /// Apply a match: discover it, optionally cook it further with
    /// `method`, persist, evaluate achievements, and empty the bowl.
    fn settle(&mut self, found: Found, method: Option<&MethodId>) -> Resolution {
        let mut newly_discovered = Vec::new();
        let combined_id = found.template.id.clone();
        if self.state.discover(found.template) {
            newly_discovered.push(combined_id.clone());
        }
        let Some(combined) = self.state.ingredient(combined_id.as_str()).cloned() else {
            return Resolution::miss(MessageCode::NoRecipeFound);
        };

        let secondary = method.and_then(|m| self.transformed(&combined, m));
        let (result, intermediate) = match secondary {
            Some(target) => {
                let final_id = target.id.clone();
                if self.state.discover(target) {
                    newly_discovered.push(final_id.clone());
                }
                let Some(result) = self.state.ingredient(final_id.as_str()).cloned() else {
                    return Resolution::miss(MessageCode::NoRecipeFound);
                };
                (result, Some(combined))
            }
            None => (combined, None),
        };

        let is_new = newly_discovered.contains(&result.id);
        let unlocked_achievements = if newly_discovered.is_empty() {
            Vec::new()
        } else {
            self.store.save(&self.state, &[StorageKey::Ingredients]);
            self.evaluate_achievements()
        };
        let message = if newly_discovered.is_empty() {
            MessageCode::AlreadyDiscovered
        } else {
            MessageCode::NewDiscovery
        };

        info!(
            result_id = %result.id,
            source = ?found.source,
            is_new,
            newly_discovered = newly_discovered.len(),
            "combination resolved"
        );
        self.workspace.clear();

        Resolution::Discovery(Box::new(DiscoveryResult {
            result,
            is_new,
            intermediate,
            newly_discovered,
            unlocked_achievements,
            source: found.source,
            description: found.description,
            message,
        }))
    }

    fn evaluate_achievements(&mut self) -> Vec<AchievementId> {
        match self
            .evaluator
            .evaluate(&self.state.ingredients, &self.state.achievements)
        {
            Evaluation::Unchanged => Vec::new(),
            Evaluation::Unlocked {
                achievements,
                newly_unlocked,
            } => {
                self.state.achievements = achievements;
                self.store.save(&self.state, &[StorageKey::Achievements]);
                newly_unlocked
            }
        }
    }

    fn invalidate_in_flight(&mut self) {
        if let Some(attempt) = self.in_flight.take() {
            debug!(attempt, "outstanding generation invalidated");
        }
        self.attempt = self.attempt.saturating_add(1);
    }

    // -- Custom recipe ledger ----------------------------------------------

    /// Author a custom recipe from a draft and persist the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownIngredient`] if an input is not in the
    /// collection, or any authoring error from the ledger.
    pub fn add_custom_recipe(&mut self, draft: RecipeDraft) -> Result<CustomRecipe, LedgerError> {
        if let Some(unknown) = draft
            .ingredients
            .iter()
            .find(|id| self.state.ingredient(id.as_str()).is_none())
        {
            return Err(LedgerError::UnknownIngredient(unknown.clone()));
        }
        let recipe = self.state.custom_recipes.add(draft, Utc::now())?.clone();
        self.store.save(&self.state, &[StorageKey::CustomRecipes]);
        Ok(recipe)
    }

    /// Delete a custom recipe and persist the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if no entry has that id.
    pub fn delete_custom_recipe(&mut self, id: &CustomRecipeId) -> Result<CustomRecipe, LedgerError> {
        let removed = self.state.custom_recipes.delete(id)?;
        self.store.save(&self.state, &[StorageKey::CustomRecipes]);
        Ok(removed)
    }

    /// Delete every custom recipe and persist the empty ledger.
    pub fn clear_custom_recipes(&mut self) -> usize {
        let removed = self.state.custom_recipes.clear();
        self.store.save(&self.state, &[StorageKey::CustomRecipes]);
        removed
    }

    /// Import custom recipes from a JSON array and persist the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the payload is not a valid array of
    /// custom recipes. Nothing is imported in that case.
    pub fn import_custom_recipes(&mut self, json: &str) -> Result<ImportSummary, LedgerError> {
        let summary = self.state.custom_recipes.import_json(json)?;
        if summary.imported > 0 {
            self.store.save(&self.state, &[StorageKey::CustomRecipes]);
        }
        Ok(summary)
    }

    /// The ledger as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Serde`] if serialization fails.
    pub fn export_custom_recipes(&self) -> Result<String, LedgerError> {
        self.state.custom_recipes.export_json()
    }

    // -- Lifecycle -----------------------------------------------------------

    /// Wipe all progress back to the catalog seeds.
    ///
    /// This is the only operation that clears discovered or achieved
    /// flags. The bowl is emptied and any outstanding generation answer
    /// becomes stale.
    pub fn reset(&mut self) {
        self.state = self.store.reset(&self.catalog);
        self.clear_workspace();
    }

    /// Write every part of the state (the periodic safeguard save).
    pub fn autosave(&mut self) {
        self.store.save_all(&self.state);
        debug!("autosave written");
    }
}
