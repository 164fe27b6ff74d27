//! The player's mutable progress: ingredient collection, achievements,
//! and the custom-recipe ledger.
//!
//! Discovery flags only ever go from `false` to `true` here. The single
//! way back is replacing the whole state with [`PlayerState::seed`], which
//! is what a progress reset does.

use std::collections::BTreeSet;

use kitchen_catalog::Catalog;
use kitchen_types::{Achievement, AchievementRule, Ingredient, IngredientId};
use serde::Serialize;
use tracing::{debug, info};

use crate::ledger::CustomRecipeLedger;

/// Everything the player has earned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerState {
    /// The merged ingredient collection. Ids are unique.
    pub ingredients: Vec<Ingredient>,
    /// One entry per configured achievement rule.
    pub achievements: Vec<Achievement>,
    /// Admin-authored recipes.
    pub custom_recipes: CustomRecipeLedger,
}

/// Discovery progress for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Discovered ingredients.
    pub discovered: usize,
    /// Ingredients in the collection, discovered or not.
    pub total: usize,
    /// Achievements earned.
    pub achievements_earned: usize,
    /// Achievements configured.
    pub achievements_total: usize,
}

impl PlayerState {
    /// A fresh state: catalog seeds with starter flags, every achievement
    /// locked, and an empty ledger.
    pub fn seed(catalog: &Catalog) -> Self {
        Self {
            ingredients: catalog.seed_collection(),
            achievements: catalog
                .achievement_rules()
                .iter()
                .map(AchievementRule::locked)
                .collect(),
            custom_recipes: CustomRecipeLedger::new(),
        }
    }

    /// Look up an ingredient in the collection.
    pub fn ingredient(&self, id: &str) -> Option<&Ingredient> {
        self.ingredients.iter().find(|i| i.id.as_str() == id)
    }

    /// Whether `id` is in the collection and discovered.
    pub fn is_discovered(&self, id: &IngredientId) -> bool {
        self.ingredient(id.as_str()).is_some_and(|i| i.discovered)
    }

    /// Discovered ingredients in collection order.
    pub fn discovered(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.iter().filter(|i| i.discovered)
    }

    /// Mark `template` discovered, inserting it if the id is new.
    ///
    /// An existing undiscovered entry is flipped in place rather than
    /// duplicated. Returns `true` when the flag changed.
    pub fn discover(&mut self, template: Ingredient) -> bool {
        if let Some(existing) = self.ingredients.iter_mut().find(|i| i.id == template.id) {
            if existing.discovered {
                return false;
            }
            existing.discovered = true;
            if existing.description.is_none() {
                existing.description = template.description;
            }
            debug!(ingredient_id = %existing.id, "ingredient flag flipped");
            return true;
        }

        let mut ingredient = template;
        ingredient.discovered = true;
        debug!(ingredient_id = %ingredient.id, "ingredient inserted");
        self.ingredients.push(ingredient);
        true
    }

    /// Reconcile a loaded collection with the current catalog.
    ///
    /// Drops duplicate ids (first wins), appends catalog seeds the save
    /// does not know yet, and makes sure every basic starter is discovered.
    pub fn merge_catalog(&mut self, catalog: &Catalog) {
        let mut seen = BTreeSet::new();
        let before = self.ingredients.len();
        self.ingredients.retain(|i| seen.insert(i.id.clone()));
        let dropped = before.saturating_sub(self.ingredients.len());

        let mut appended = 0_usize;
        for seed in catalog.seed_collection() {
            if seen.insert(seed.id.clone()) {
                self.ingredients.push(seed);
                appended = appended.saturating_add(1);
            }
        }

        for ingredient in &mut self.ingredients {
            if catalog.is_basic_starter(&ingredient.id) {
                ingredient.discovered = true;
            }
        }

        if dropped > 0 || appended > 0 {
            info!(dropped, appended, "saved collection merged with catalog");
        }
    }

    /// Align achievements with the configured rules, keeping earned flags.
    ///
    /// The result has exactly one entry per rule, in rule order. Saved
    /// entries without a matching rule are discarded.
    pub fn sync_achievements(&mut self, rules: &[AchievementRule]) {
        let synced = rules
            .iter()
            .map(|rule| {
                let mut achievement = rule.locked();
                achievement.achieved = self
                    .achievements
                    .iter()
                    .any(|saved| saved.id == rule.id && saved.achieved);
                achievement
            })
            .collect();
        self.achievements = synced;
    }

    /// Counts for a progress display.
    pub fn progress(&self) -> Progress {
        Progress {
            discovered: self.discovered().count(),
            total: self.ingredients.len(),
            achievements_earned: self.achievements.iter().filter(|a| a.achieved).count(),
            achievements_total: self.achievements.len(),
        }
    }
}
