//! The immutable catalog the resolution engine reads from.
//!
//! [`Catalog::from_parts`] validates every cross-reference once, so the
//! engine can rely on each recipe result and each transformation source
//! naming a real seed ingredient.

use std::collections::{BTreeMap, BTreeSet};

use kitchen_types::{
    AchievementRule, Ingredient, IngredientId, Method, MethodId, Recipe, Transformation,
};
use tracing::debug;

use crate::achievements::default_achievement_rules;
use crate::combination::CombinationKey;
use crate::error::CatalogError;
use crate::ingredients::{BASIC_STARTERS, seed_ingredients};
use crate::methods::standard_methods;
use crate::recipes::standard_recipes;

/// Raw catalog content prior to validation.
#[derive(Debug, Clone, Default)]
pub struct CatalogParts {
    /// Seed ingredients in display order.
    pub ingredients: Vec<Ingredient>,
    /// Cooking methods.
    pub methods: Vec<Method>,
    /// Authored recipes in match order.
    pub recipes: Vec<Recipe>,
    /// Ids that start discovered.
    pub basic_starters: BTreeSet<IngredientId>,
    /// Achievement definitions.
    pub achievement_rules: Vec<AchievementRule>,
}

impl CatalogParts {
    /// The built-in kitchen.
    pub fn standard() -> Self {
        Self {
            ingredients: seed_ingredients(),
            methods: standard_methods(),
            recipes: standard_recipes(),
            basic_starters: BASIC_STARTERS.iter().map(|s| IngredientId::from(*s)).collect(),
            achievement_rules: default_achievement_rules(),
        }
    }
}

/// Static ingredient, method, recipe, and achievement definitions.
#[derive(Debug, Clone)]
pub struct Catalog {
    ingredients: Vec<Ingredient>,
    index: BTreeMap<IngredientId, usize>,
    methods: Vec<Method>,
    recipes: Vec<Recipe>,
    recipe_keys: Vec<CombinationKey>,
    basic_starters: BTreeSet<IngredientId>,
    achievement_rules: Vec<AchievementRule>,
}

impl Catalog {
    /// Validate `parts` and build a catalog from them.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on duplicate ids, recipes with the wrong
    /// number of inputs, repeated inputs or ingredient sets, and references
    /// to ingredients the catalog does not define.
    pub fn from_parts(parts: CatalogParts) -> Result<Self, CatalogError> {
        validate(&parts)?;
        Ok(Self::assemble(parts))
    }

    /// The built-in kitchen.
    pub fn standard() -> Self {
        Self::assemble(CatalogParts::standard())
    }

    /// Replace the achievement definitions, e.g. from a game config.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateAchievement`] if two rules share an id.
    pub fn with_achievement_rules(
        mut self,
        rules: Vec<AchievementRule>,
    ) -> Result<Self, CatalogError> {
        check_achievement_ids(&rules)?;
        self.achievement_rules = rules;
        Ok(self)
    }

    fn assemble(parts: CatalogParts) -> Self {
        let index = parts
            .ingredients
            .iter()
            .enumerate()
            .map(|(i, ingredient)| (ingredient.id.clone(), i))
            .collect();
        let recipe_keys = parts
            .recipes
            .iter()
            .map(|r| CombinationKey::new(&r.ingredients))
            .collect();
        Self {
            ingredients: parts.ingredients,
            index,
            methods: parts.methods,
            recipes: parts.recipes,
            recipe_keys,
            basic_starters: parts.basic_starters,
            achievement_rules: parts.achievement_rules,
        }
    }

    /// Look up a seed ingredient template.
    pub fn ingredient(&self, id: &str) -> Option<&Ingredient> {
        self.index.get(id).and_then(|&i| self.ingredients.get(i))
    }

    /// All seed ingredient templates.
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    /// Copies of the seed templates with starter flags applied.
    pub fn seed_collection(&self) -> Vec<Ingredient> {
        self.ingredients
            .iter()
            .map(|template| {
                let mut ingredient = template.clone();
                ingredient.discovered = self.basic_starters.contains(&ingredient.id);
                ingredient
            })
            .collect()
    }

    /// Look up a method.
    pub fn method(&self, id: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.id.as_str() == id)
    }

    /// All methods.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// The transformation `method` applies to `source`, if any.
    pub fn transformation(&self, method: &MethodId, source: &IngredientId) -> Option<&Transformation> {
        self.method(method.as_str())
            .and_then(|m| m.transformations.get(source))
    }

    /// All authored recipes in match order.
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// The first authored recipe whose ingredient set equals `key`.
    pub fn find_recipe(&self, key: &CombinationKey) -> Option<&Recipe> {
        let found = self
            .recipe_keys
            .iter()
            .position(|candidate| candidate == key)
            .and_then(|i| self.recipes.get(i));
        debug!(combination = %key, matched = found.is_some(), "authored recipe lookup");
        found
    }

    /// The basic-starter allowlist.
    pub const fn basic_starters(&self) -> &BTreeSet<IngredientId> {
        &self.basic_starters
    }

    /// Whether `id` starts discovered.
    pub fn is_basic_starter(&self, id: &IngredientId) -> bool {
        self.basic_starters.contains(id)
    }

    /// Achievement definitions.
    pub fn achievement_rules(&self) -> &[AchievementRule] {
        &self.achievement_rules
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(parts: &CatalogParts) -> Result<(), CatalogError> {
    let mut known = BTreeSet::new();
    for ingredient in &parts.ingredients {
        if !known.insert(ingredient.id.clone()) {
            return Err(CatalogError::DuplicateIngredient(ingredient.id.clone()));
        }
    }

    let require = |id: &IngredientId, context: &str| {
        if known.contains(id) {
            Ok(())
        } else {
            Err(CatalogError::UnknownIngredient {
                id: id.clone(),
                context: context.to_owned(),
            })
        }
    };

    for starter in &parts.basic_starters {
        require(starter, "basic starter list")?;
    }

    let mut seen_keys: BTreeMap<CombinationKey, &IngredientId> = BTreeMap::new();
    for recipe in &parts.recipes {
        let count = recipe.ingredients.len();
        if !(2..=3).contains(&count) {
            return Err(CatalogError::InvalidRecipeSize {
                result: recipe.result.clone(),
                count,
            });
        }
        let context = format!("recipe for {}", recipe.result);
        require(&recipe.result, &context)?;
        for input in &recipe.ingredients {
            require(input, &context)?;
        }
        let key = CombinationKey::new(&recipe.ingredients);
        if let Some(repeated) = key.repeated() {
            return Err(CatalogError::DuplicateRecipeInput {
                result: recipe.result.clone(),
                ingredient: repeated.clone(),
            });
        }
        if let Some(first) = seen_keys.get(&key) {
            return Err(CatalogError::DuplicateRecipeSet {
                first: (*first).clone(),
                second: recipe.result.clone(),
                key: key.to_string(),
            });
        }
        seen_keys.insert(key, &recipe.result);
    }

    let mut method_ids = BTreeSet::new();
    for method in &parts.methods {
        if !method_ids.insert(method.id.clone()) {
            return Err(CatalogError::DuplicateMethod(method.id.clone()));
        }
        let context = format!("method {}", method.id);
        for source in method.transformations.keys() {
            require(source, &context)?;
        }
    }

    check_achievement_ids(&parts.achievement_rules)
}

fn check_achievement_ids(rules: &[AchievementRule]) -> Result<(), CatalogError> {
    let mut ids = BTreeSet::new();
    for rule in rules {
        if !ids.insert(rule.id.clone()) {
            return Err(CatalogError::DuplicateAchievement(rule.id.clone()));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
