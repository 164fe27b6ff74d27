//! Default achievement definitions.
//!
//! Thresholds are data. A game config may replace this list wholesale.

use kitchen_types::{AchievementId, AchievementRule, Threshold};

/// The built-in achievement rules.
pub fn default_achievement_rules() -> Vec<AchievementRule> {
    vec![
        achievement("first_discovery", "First Creation",
            "Discover your first new ingredient.", Threshold::NonBasicDiscoveries(1)),
        achievement("apprentice_cook", "Apprentice Cook",
            "Discover 5 new ingredients.", Threshold::NonBasicDiscoveries(5)),
        achievement("head_chef", "Head Chef",
            "Discover 15 new ingredients.", Threshold::NonBasicDiscoveries(15)),
        achievement("diverse_palate", "Diverse Palate",
            "Discover new ingredients in 5 different categories.",
            Threshold::DistinctCategories(5)),
        achievement("master_chef", "Master Chef",
            "Create an ingredient of difficulty 4 or higher.", Threshold::MaxDifficulty(4)),
    ]
}

/// Helper to construct an [`AchievementRule`].
fn achievement(id: &str, name: &str, description: &str, threshold: Threshold) -> AchievementRule {
    AchievementRule {
        id: AchievementId::from(id),
        name: String::from(name),
        description: String::from(description),
        threshold,
    }
}
