//! Achievement evaluation over the discovered collection.
//!
//! The evaluator reduces the collection to three statistics and checks
//! every rule's threshold against them. It is pure: given the same
//! collection and achievements it returns the same answer, and it never
//! clears an earned flag. When nothing new unlocks it reports
//! [`Evaluation::Unchanged`] so the caller can skip the write.

use std::collections::BTreeSet;

use kitchen_catalog::Catalog;
use kitchen_types::{Achievement, AchievementId, AchievementRule, Category, Ingredient, IngredientId, Threshold};
use tracing::info;

/// The statistics achievement thresholds are defined over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryStats {
    /// Discovered ingredients with difficulty above 1.
    pub non_basic_discoveries: u32,
    /// Distinct categories among non-basic discoveries, starters excluded.
    pub distinct_categories: u32,
    /// Highest difficulty among discovered ingredients (0 if none).
    pub max_difficulty: u32,
}

impl DiscoveryStats {
    /// Reduce a collection to its statistics.
    pub fn collect(ingredients: &[Ingredient], starters: &BTreeSet<IngredientId>) -> Self {
        let mut non_basic = 0_u32;
        let mut categories: BTreeSet<Category> = BTreeSet::new();
        let mut max_difficulty = 0_u32;

        for ingredient in ingredients.iter().filter(|i| i.discovered) {
            max_difficulty = max_difficulty.max(ingredient.difficulty);
            if ingredient.is_non_basic() {
                non_basic = non_basic.saturating_add(1);
                if !starters.contains(&ingredient.id) {
                    categories.insert(ingredient.category);
                }
            }
        }

        Self {
            non_basic_discoveries: non_basic,
            distinct_categories: u32::try_from(categories.len()).unwrap_or(u32::MAX),
            max_difficulty,
        }
    }

    /// Whether these statistics satisfy `threshold`.
    pub const fn meets(&self, threshold: Threshold) -> bool {
        match threshold {
            Threshold::NonBasicDiscoveries(n) => self.non_basic_discoveries >= n,
            Threshold::DistinctCategories(n) => self.distinct_categories >= n,
            Threshold::MaxDifficulty(n) => self.max_difficulty >= n,
        }
    }
}

/// The result of one evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// No rule newly evaluated true; nothing to write.
    Unchanged,
    /// At least one achievement was earned.
    Unlocked {
        /// The full updated achievement list.
        achievements: Vec<Achievement>,
        /// Ids earned in this pass.
        newly_unlocked: Vec<AchievementId>,
    },
}

/// Checks achievement rules against a discovered collection.
#[derive(Debug, Clone)]
pub struct AchievementEvaluator {
    rules: Vec<AchievementRule>,
    starters: BTreeSet<IngredientId>,
}

impl AchievementEvaluator {
    /// An evaluator for `rules`, excluding `starters` from category counts.
    pub const fn new(rules: Vec<AchievementRule>, starters: BTreeSet<IngredientId>) -> Self {
        Self { rules, starters }
    }

    /// An evaluator using the catalog's rules and starter allowlist.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self::new(
            catalog.achievement_rules().to_vec(),
            catalog.basic_starters().clone(),
        )
    }

    /// The configured rules.
    pub fn rules(&self) -> &[AchievementRule] {
        &self.rules
    }

    /// Evaluate every rule against `ingredients`.
    ///
    /// Entries in `achievements` without a matching rule, and entries that
    /// are already earned, are carried over untouched.
    pub fn evaluate(&self, ingredients: &[Ingredient], achievements: &[Achievement]) -> Evaluation {
        let stats = DiscoveryStats::collect(ingredients, &self.starters);

        let newly_unlocked: Vec<AchievementId> = self
            .rules
            .iter()
            .filter(|rule| stats.meets(rule.threshold))
            .filter(|rule| {
                !achievements
                    .iter()
                    .any(|a| a.id == rule.id && a.achieved)
            })
            .map(|rule| rule.id.clone())
            .collect();

        if newly_unlocked.is_empty() {
            return Evaluation::Unchanged;
        }

        let mut updated = achievements.to_vec();
        for id in &newly_unlocked {
            if let Some(existing) = updated.iter_mut().find(|a| &a.id == id) {
                existing.achieved = true;
            } else if let Some(rule) = self.rules.iter().find(|r| &r.id == id) {
                let mut earned = rule.locked();
                earned.achieved = true;
                updated.push(earned);
            }
        }

        info!(
            unlocked = ?newly_unlocked.iter().map(AchievementId::as_str).collect::<Vec<_>>(),
            non_basic = stats.non_basic_discoveries,
            categories = stats.distinct_categories,
            max_difficulty = stats.max_difficulty,
            "achievements unlocked"
        );
        Evaluation::Unlocked {
            achievements: updated,
            newly_unlocked,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kitchen_catalog::default_achievement_rules;

    use super::*;

    fn item(id: &str, category: Category, difficulty: u32, discovered: bool) -> Ingredient {
        Ingredient {
            id: IngredientId::from(id),
            name: id.to_owned(),
            glyph: String::from("?"),
            category,
            discovered,
            difficulty,
            description: None,
        }
    }

    fn locked_defaults() -> Vec<Achievement> {
        default_achievement_rules().iter().map(AchievementRule::locked).collect()
    }

    fn evaluator() -> AchievementEvaluator {
        AchievementEvaluator::new(default_achievement_rules(), BTreeSet::new())
    }

    #[test]
    fn stats_ignore_undiscovered_and_basic() {
        let ingredients = vec![
            item("flour", Category::Grain, 1, true),
            item("dough", Category::Dough, 2, true),
            item("bread", Category::Bread, 4, false),
        ];
        let stats = DiscoveryStats::collect(&ingredients, &BTreeSet::new());
        assert_eq!(
            stats,
            DiscoveryStats {
                non_basic_discoveries: 1,
                distinct_categories: 1,
                max_difficulty: 2,
            }
        );
    }

    #[test]
    fn starters_do_not_count_toward_categories() {
        let ingredients = vec![item("odd_starter", Category::Sauce, 2, true)];
        let starters = BTreeSet::from([IngredientId::from("odd_starter")]);
        let stats = DiscoveryStats::collect(&ingredients, &starters);
        assert_eq!(stats.non_basic_discoveries, 1);
        assert_eq!(stats.distinct_categories, 0);
    }

    #[test]
    fn first_discovery_unlocks() {
        let ingredients = vec![item("dough", Category::Dough, 2, true)];
        let result = evaluator().evaluate(&ingredients, &locked_defaults());
        let Evaluation::Unlocked { achievements, newly_unlocked } = result else {
            panic!("expected an unlock");
        };
        assert_eq!(newly_unlocked, vec![AchievementId::from("first_discovery")]);
        assert_eq!(achievements.iter().filter(|a| a.achieved).count(), 1);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let ingredients = vec![item("bread", Category::Bread, 4, true)];
        let evaluator = evaluator();
        let Evaluation::Unlocked { achievements, .. } =
            evaluator.evaluate(&ingredients, &locked_defaults())
        else {
            panic!("expected an unlock");
        };
        assert_eq!(evaluator.evaluate(&ingredients, &achievements), Evaluation::Unchanged);
    }

    #[test]
    fn earned_flags_are_never_reverted() {
        let mut achievements = locked_defaults();
        for a in &mut achievements {
            a.achieved = true;
        }
        assert_eq!(evaluator().evaluate(&[], &achievements), Evaluation::Unchanged);
    }

    #[test]
    fn configured_thresholds_apply() {
        let rules = vec![AchievementRule {
            id: AchievementId::from("two_kinds"),
            name: String::from("Two Kinds"),
            description: String::new(),
            threshold: Threshold::DistinctCategories(2),
        }];
        let evaluator = AchievementEvaluator::new(rules, BTreeSet::new());
        let one = vec![item("a", Category::Soup, 2, true), item("b", Category::Soup, 2, true)];
        assert_eq!(evaluator.evaluate(&one, &[]), Evaluation::Unchanged);

        let two = vec![item("a", Category::Soup, 2, true), item("c", Category::Drink, 2, true)];
        let Evaluation::Unlocked { achievements, .. } = evaluator.evaluate(&two, &[]) else {
            panic!("expected an unlock");
        };
        assert!(achievements.first().unwrap().achieved);
    }
}
