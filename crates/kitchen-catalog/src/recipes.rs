//! Authored multi-ingredient recipes.
//!
//! Ingredient sets are mutually exclusive; catalog validation rejects two
//! recipes over the same set. Iteration order is the order listed here.

use kitchen_types::{IngredientId, Recipe};

/// Build the list of authored recipes.
pub fn standard_recipes() -> Vec<Recipe> {
    vec![
        recipe(&["flour", "water"], "dough", 2,
            "Flour and water kneaded into a soft dough."),
        recipe(&["flour", "egg", "milk"], "batter", 2,
            "A smooth pouring batter."),
        recipe(&["milk", "sugar"], "sweet_cream", 2,
            "Milk sweetened and whipped until thick."),
        recipe(&["tomato", "onion"], "salsa", 2,
            "A bright, chunky tomato sauce."),
        recipe(&["tomato", "water", "salt"], "tomato_soup", 2,
            "A simple, comforting soup."),
        recipe(&["onion", "water", "salt"], "onion_soup", 2,
            "Slow-simmered onions in a savory broth."),
        recipe(&["potato", "butter", "milk"], "mashed_potatoes", 2,
            "Creamy potatoes mashed with butter."),
        recipe(&["rice", "milk", "sugar"], "rice_pudding", 2,
            "Rice cooked slowly in sweet milk."),
        recipe(&["apple", "water", "sugar"], "apple_juice", 2,
            "Pressed apples, lightly sweetened."),
        recipe(&["dough", "yeast"], "bread_dough", 3,
            "Dough left to rise with yeast."),
        recipe(&["dough", "apple", "sugar"], "raw_apple_pie", 3,
            "Sweet apples in a pastry shell, ready for the oven."),
        recipe(&["dough", "butter"], "puff_pastry", 3,
            "Dough folded with butter into many thin layers."),
        recipe(&["batter", "sugar"], "cake_batter", 3,
            "A sweet batter ready to bake into a cake."),
    ]
}

/// Helper to construct a [`Recipe`].
fn recipe(ingredients: &[&str], result: &str, difficulty: u32, description: &str) -> Recipe {
    Recipe {
        ingredients: ingredients.iter().map(|s| IngredientId::from(*s)).collect(),
        result: IngredientId::from(result),
        difficulty,
        description: String::from(description),
    }
}
