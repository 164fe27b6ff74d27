//! Cooking methods and their single-ingredient transformation tables.
//!
//! `mix` is the identity method and has no table. Targets that are also
//! seed ingredients take their catalog entry on discovery; the rest are
//! synthesized from the [`Transformation`] descriptor.

use std::collections::BTreeMap;

use kitchen_types::{Category, DEFAULT_METHOD, IngredientId, Method, MethodId, Transformation};

/// The built-in methods, identity first.
pub fn standard_methods() -> Vec<Method> {
    vec![
        method(DEFAULT_METHOD, "Mix", "🥄", &[]),
        method("bake", "Bake", "🔥", &[
            ("bread_dough", "bread", "Bread", "🍞", Category::Bread),
            ("raw_apple_pie", "apple_pie", "Apple Pie", "🥧", Category::Pastry),
            ("puff_pastry", "croissant", "Croissant", "🥐", Category::Pastry),
            ("cake_batter", "sponge_cake", "Sponge Cake", "🍰", Category::Dessert),
            ("potato", "baked_potato", "Baked Potato", "🥔", Category::Dish),
            ("apple", "baked_apple", "Baked Apple", "🍏", Category::Dessert),
        ]),
        method("boil", "Boil", "♨️", &[
            ("egg", "boiled_egg", "Boiled Egg", "🥚", Category::Protein),
            ("potato", "boiled_potato", "Boiled Potato", "🥔", Category::Dish),
            ("rice", "steamed_rice", "Steamed Rice", "🍚", Category::Dish),
            ("milk", "warm_milk", "Warm Milk", "🥛", Category::Drink),
            ("sugar", "syrup", "Syrup", "🍯", Category::Sauce),
        ]),
        method("fry", "Fry", "🍳", &[
            ("egg", "fried_egg", "Fried Egg", "🍳", Category::Protein),
            ("potato", "fries", "Fries", "🍟", Category::Dish),
            ("onion", "fried_onion", "Fried Onion", "🧅", Category::Dish),
            ("batter", "pancake", "Pancake", "🥞", Category::Dessert),
            ("dough", "donut", "Donut", "🍩", Category::Pastry),
        ]),
        method("chop", "Chop", "🔪", &[
            ("onion", "diced_onion", "Diced Onion", "🧅", Category::Produce),
            ("tomato", "diced_tomato", "Diced Tomato", "🍅", Category::Produce),
            ("apple", "apple_slices", "Apple Slices", "🍎", Category::Produce),
            ("potato", "potato_cubes", "Potato Cubes", "🥔", Category::Produce),
        ]),
    ]
}

/// One row of a transformation table: source, target id, name, glyph, category.
type Row<'a> = (&'a str, &'a str, &'a str, &'a str, Category);

/// Helper to construct a [`Method`] from table rows.
fn method(id: &str, name: &str, glyph: &str, rows: &[Row<'_>]) -> Method {
    let transformations: BTreeMap<IngredientId, Transformation> = rows
        .iter()
        .map(|&(source, target, target_name, target_glyph, category)| {
            (
                IngredientId::from(source),
                Transformation {
                    id: IngredientId::from(target),
                    name: String::from(target_name),
                    glyph: String::from(target_glyph),
                    category,
                },
            )
        })
        .collect();
    Method {
        id: MethodId::from(id),
        name: String::from(name),
        glyph: String::from(glyph),
        transformations,
    }
}
