//! Seed ingredients and the basic-starter allowlist.
//!
//! Starters are discovered from the first session. Every other seed entry
//! exists in the collection undiscovered so progress can be counted against
//! the full catalog.

use kitchen_types::{Category, Ingredient, IngredientId};

/// Ingredients every new player starts with.
pub const BASIC_STARTERS: &[&str] = &[
    "flour", "water", "egg", "milk", "sugar", "salt", "butter", "yeast", "tomato", "potato",
    "onion", "apple", "rice",
];

/// The built-in seed ingredients, starters first.
pub fn seed_ingredients() -> Vec<Ingredient> {
    vec![
        // --- Basic starters ---
        ingredient("flour", "Flour", "🌾", Category::Grain, 1),
        ingredient("water", "Water", "💧", Category::Basic, 1),
        ingredient("egg", "Egg", "🥚", Category::Protein, 1),
        ingredient("milk", "Milk", "🥛", Category::Dairy, 1),
        ingredient("sugar", "Sugar", "🍬", Category::Basic, 1),
        ingredient("salt", "Salt", "🧂", Category::Basic, 1),
        ingredient("butter", "Butter", "🧈", Category::Dairy, 1),
        ingredient("yeast", "Yeast", "🫧", Category::Basic, 1),
        ingredient("tomato", "Tomato", "🍅", Category::Produce, 1),
        ingredient("potato", "Potato", "🥔", Category::Produce, 1),
        ingredient("onion", "Onion", "🧅", Category::Produce, 1),
        ingredient("apple", "Apple", "🍎", Category::Produce, 1),
        ingredient("rice", "Rice", "🍚", Category::Grain, 1),
        // --- Combined (difficulty 2) ---
        ingredient("dough", "Dough", "🫓", Category::Dough, 2),
        ingredient("batter", "Batter", "🥣", Category::Dough, 2),
        ingredient("sweet_cream", "Sweet Cream", "🍦", Category::Dairy, 2),
        ingredient("salsa", "Salsa", "🥫", Category::Sauce, 2),
        ingredient("tomato_soup", "Tomato Soup", "🍲", Category::Soup, 2),
        ingredient("onion_soup", "Onion Soup", "🍜", Category::Soup, 2),
        ingredient("mashed_potatoes", "Mashed Potatoes", "🥘", Category::Dish, 2),
        ingredient("rice_pudding", "Rice Pudding", "🍮", Category::Dessert, 2),
        ingredient("apple_juice", "Apple Juice", "🧃", Category::Drink, 2),
        // --- Combined (difficulty 3) ---
        ingredient("bread_dough", "Bread Dough", "🥖", Category::Dough, 3),
        ingredient("raw_apple_pie", "Raw Apple Pie", "🥧", Category::Pastry, 3),
        ingredient("puff_pastry", "Puff Pastry", "🥮", Category::Pastry, 3),
        ingredient("cake_batter", "Cake Batter", "🍥", Category::Dessert, 3),
        // --- Cooked ---
        ingredient("pancake", "Pancake", "🥞", Category::Dessert, 3),
        ingredient("donut", "Donut", "🍩", Category::Pastry, 3),
        ingredient("bread", "Bread", "🍞", Category::Bread, 4),
        ingredient("apple_pie", "Apple Pie", "🥧", Category::Pastry, 4),
        ingredient("croissant", "Croissant", "🥐", Category::Pastry, 4),
        ingredient("sponge_cake", "Sponge Cake", "🍰", Category::Dessert, 4),
    ]
}

/// Whether `id` is on the [`BASIC_STARTERS`] allowlist.
pub fn is_basic_starter(id: &IngredientId) -> bool {
    BASIC_STARTERS.contains(&id.as_str())
}

/// Helper to construct an undiscovered catalog [`Ingredient`].
fn ingredient(id: &str, name: &str, glyph: &str, category: Category, difficulty: u32) -> Ingredient {
    Ingredient {
        id: IngredientId::from(id),
        name: String::from(name),
        glyph: String::from(glyph),
        category,
        discovered: false,
        difficulty,
        description: None,
    }
}
