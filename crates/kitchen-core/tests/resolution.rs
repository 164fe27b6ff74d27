//! Scenario tests for the resolution engine.
//!
//! Every test drives the public [`Kitchen`] API against the standard
//! catalog, an in-memory blob store, and a scripted generator.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use kitchen_catalog::Catalog;
use kitchen_core::{
    DisabledGenerator, GameConfig, Generator, Kitchen, MemoryBlobStore, PlayerState, RecipeDraft,
    RejectReason, ResolutionStep, StorageKey, Strategy, WorkspaceEvent,
};
use kitchen_types::{
    CandidateIngredient, Category, DiscoveryResult, DiscoverySource, Draggable,
    GenerationRequest, IngredientId, MessageCode, MethodId, Resolution, Selection,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Answers every request with the same candidate and records the requests.
#[derive(Debug, Default)]
struct ScriptedGenerator {
    answer: Option<CandidateIngredient>,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    fn answering(name: &str) -> Self {
        Self {
            answer: Some(CandidateIngredient {
                name: name.to_owned(),
                glyph: String::from("🥘"),
                description: String::from("Something new from the pot."),
                category: Category::Dish,
            }),
            ..Self::default()
        }
    }

    fn declining() -> Self {
        Self::default()
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> Option<GenerationRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Generator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Option<CandidateIngredient> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.answer.clone()
    }
}

fn kitchen<G: Generator>(generator: G) -> Kitchen<MemoryBlobStore, G> {
    Kitchen::new(
        Catalog::standard(),
        MemoryBlobStore::new(),
        generator,
        &GameConfig::default(),
    )
    .unwrap()
}

fn discovery(resolution: &Resolution) -> &DiscoveryResult {
    resolution.discovery().unwrap()
}

fn id(raw: &str) -> IngredientId {
    IngredientId::from(raw)
}

fn draft(name: &str, inputs: &[&str]) -> RecipeDraft {
    RecipeDraft {
        name: name.to_owned(),
        glyph: String::from("⭐"),
        category: Category::Dish,
        description: String::from("House special."),
        ingredients: inputs.iter().map(|s| id(s)).collect(),
    }
}

// ---------------------------------------------------------------------------
// Authored recipes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn every_authored_recipe_resolves_through_the_engine() {
    let catalog = Catalog::standard();
    let everything: Vec<_> = catalog
        .seed_collection()
        .into_iter()
        .map(|mut ingredient| {
            ingredient.discovered = true;
            ingredient
        })
        .collect();
    let backend = MemoryBlobStore::new().with_blob(
        StorageKey::Ingredients.as_str(),
        serde_json::to_string(&everything).unwrap(),
    );
    let mut kitchen = Kitchen::new(
        catalog.clone(),
        backend,
        DisabledGenerator::new(),
        &GameConfig::default(),
    )
    .unwrap();

    assert!(!catalog.recipes().is_empty());
    for recipe in catalog.recipes() {
        let resolution = kitchen.resolve(&Selection::of(recipe.ingredients.iter().cloned())).await;
        assert!(resolution.message().is_discovery(), "{:?} missed", recipe.ingredients);
        let found = discovery(&resolution);
        assert_eq!(found.result.id, recipe.result);
        assert_eq!(found.source, DiscoverySource::Recipe);
    }
}

#[tokio::test]
async fn flour_and_water_make_dough() {
    let mut kitchen = kitchen(DisabledGenerator::new());
    let resolution = kitchen.resolve(&Selection::of(["water", "flour"])).await;

    let found = discovery(&resolution);
    assert!(found.is_new);
    assert_eq!(found.result.id, id("dough"));
    assert_eq!(found.result.difficulty, 2);
    assert_eq!(found.source, DiscoverySource::Recipe);
    assert_eq!(found.message, MessageCode::NewDiscovery);
    assert_eq!(found.newly_discovered, vec![id("dough")]);
    assert!(found.intermediate.is_none());
    assert!(kitchen.state().is_discovered(&id("dough")));
}

#[tokio::test]
async fn repeating_a_discovery_changes_nothing() {
    let mut kitchen = kitchen(DisabledGenerator::new());
    let selection = Selection::of(["flour", "water"]);
    kitchen.resolve(&selection).await;
    let before = kitchen.state().clone();

    let again = kitchen.resolve(&selection).await;
    let found = discovery(&again);
    assert!(!found.is_new);
    assert_eq!(found.message, MessageCode::AlreadyDiscovered);
    assert!(found.newly_discovered.is_empty());
    assert!(found.unlocked_achievements.is_empty());
    assert_eq!(kitchen.state(), &before);
}

#[tokio::test]
async fn selection_order_is_irrelevant() {
    let orders = [
        ["flour", "egg", "milk"],
        ["flour", "milk", "egg"],
        ["egg", "flour", "milk"],
        ["egg", "milk", "flour"],
        ["milk", "flour", "egg"],
        ["milk", "egg", "flour"],
    ];
    for order in orders {
        let mut kitchen = kitchen(DisabledGenerator::new());
        let resolution = kitchen.resolve(&Selection::of(order)).await;
        assert_eq!(discovery(&resolution).result.id, id("batter"), "order {order:?}");
    }
}

#[tokio::test]
async fn new_ingredient_is_flipped_not_duplicated() {
    let mut kitchen = kitchen(DisabledGenerator::new());
    let total = kitchen.state().ingredients.len();
    kitchen.resolve(&Selection::of(["flour", "water"])).await;
    assert_eq!(kitchen.state().ingredients.len(), total);
    let doughs = kitchen
        .state()
        .ingredients
        .iter()
        .filter(|i| i.id == id("dough"))
        .count();
    assert_eq!(doughs, 1);
}

// ---------------------------------------------------------------------------
// Single ingredient with a method
// ---------------------------------------------------------------------------

#[tokio::test]
async fn plain_dough_cannot_be_baked() {
    let mut kitchen = kitchen(DisabledGenerator::new());
    kitchen.resolve(&Selection::of(["flour", "water"])).await;
    let before = kitchen.state().clone();

    let resolution = kitchen
        .resolve(&Selection::of(["dough"]).with_method("bake"))
        .await;
    assert_eq!(resolution.message(), MessageCode::NoEffect);
    assert_eq!(kitchen.state(), &before);
}

#[tokio::test]
async fn single_ingredient_without_method_has_no_effect() {
    let mut kitchen = kitchen(ScriptedGenerator::answering("Mystery"));
    for selection in [Selection::of(["egg"]), Selection::of(["egg"]).with_method("mix")] {
        let resolution = kitchen.resolve(&selection).await;
        assert_eq!(resolution.message(), MessageCode::NoEffect);
    }
    assert_eq!(kitchen.generator().calls(), 0);
}

#[tokio::test]
async fn transformation_adds_one_difficulty_step() {
    let mut kitchen = kitchen(DisabledGenerator::new());
    let total = kitchen.state().ingredients.len();
    let resolution = kitchen
        .resolve(&Selection::of(["potato"]).with_method("bake"))
        .await;

    let found = discovery(&resolution);
    assert!(found.is_new);
    assert_eq!(found.source, DiscoverySource::Transformation);
    assert_eq!(found.result.id, id("baked_potato"));
    assert_eq!(found.result.difficulty, 2);
    assert_eq!(kitchen.state().ingredients.len(), total + 1);
}

#[tokio::test]
async fn transformation_to_a_catalog_item_keeps_its_template() {
    let mut kitchen = kitchen(DisabledGenerator::new());
    kitchen.resolve(&Selection::of(["flour", "water"])).await;
    kitchen.resolve(&Selection::of(["dough", "yeast"])).await;

    let resolution = kitchen
        .resolve(&Selection::of(["bread_dough"]).with_method("bake"))
        .await;
    let found = discovery(&resolution);
    assert_eq!(found.result.id, id("bread"));
    assert_eq!(found.result.difficulty, 4);
    assert!(
        found
            .unlocked_achievements
            .iter()
            .any(|a| a.as_str() == "master_chef")
    );
}

// ---------------------------------------------------------------------------
// Combine, then cook
// ---------------------------------------------------------------------------

#[tokio::test]
async fn combination_is_cooked_when_method_applies() {
    let mut kitchen = kitchen(DisabledGenerator::new());
    let resolution = kitchen
        .resolve(&Selection::of(["flour", "water"]).with_method("fry"))
        .await;

    let found = discovery(&resolution);
    assert_eq!(found.result.id, id("donut"));
    assert_eq!(found.intermediate.as_ref().map(|i| i.id.clone()), Some(id("dough")));
    assert_eq!(found.newly_discovered, vec![id("dough"), id("donut")]);
    assert!(kitchen.state().is_discovered(&id("dough")));
    assert!(kitchen.state().is_discovered(&id("donut")));
}

#[tokio::test]
async fn combination_is_left_alone_when_method_has_no_rule() {
    let mut kitchen = kitchen(DisabledGenerator::new());
    let resolution = kitchen
        .resolve(&Selection::of(["flour", "water"]).with_method("bake"))
        .await;

    let found = discovery(&resolution);
    assert_eq!(found.result.id, id("dough"));
    assert!(found.intermediate.is_none());
}

// ---------------------------------------------------------------------------
// Custom recipes and precedence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn custom_recipe_matches_without_generation() {
    let mut kitchen = kitchen(ScriptedGenerator::answering("Should Not Appear"));
    let recipe = kitchen.add_custom_recipe(draft("Z", &["tomato", "rice"])).unwrap();
    assert!(recipe.result.id.as_str().starts_with("custom_z_"));

    let resolution = kitchen.resolve(&Selection::of(["rice", "tomato"])).await;
    let found = discovery(&resolution);
    assert_eq!(found.result.id, recipe.result.id);
    assert_eq!(found.result.difficulty, 2);
    assert_eq!(found.source, DiscoverySource::CustomRecipe);
    assert_eq!(found.description.as_deref(), Some("House special."));
    assert_eq!(kitchen.generator().calls(), 0);
}

#[tokio::test]
async fn authored_recipes_win_over_custom_ones() {
    let mut kitchen = kitchen(DisabledGenerator::new());
    kitchen.add_custom_recipe(draft("Paste", &["flour", "water"])).unwrap();
    let resolution = kitchen.resolve(&Selection::of(["flour", "water"])).await;
    assert_eq!(discovery(&resolution).result.id, id("dough"));
}

#[tokio::test]
async fn precedence_can_be_reordered() {
    let mut kitchen = kitchen(DisabledGenerator::new())
        .with_precedence(vec![Strategy::CustomRecipe, Strategy::AuthoredRecipe]);
    assert_eq!(
        kitchen.precedence(),
        [Strategy::CustomRecipe, Strategy::AuthoredRecipe]
    );
    let recipe = kitchen.add_custom_recipe(draft("Paste", &["flour", "water"])).unwrap();
    let resolution = kitchen.resolve(&Selection::of(["flour", "water"])).await;
    assert_eq!(discovery(&resolution).result.id, recipe.result.id);
}

#[tokio::test]
async fn same_name_recipes_keep_their_own_results() {
    let mut kitchen = kitchen(DisabledGenerator::new());
    let pudding = RecipeDraft {
        name: String::from("Custard"),
        glyph: String::from("🍮"),
        category: Category::Dessert,
        description: String::new(),
        ingredients: vec![id("egg"), id("milk")],
    };
    let sauce = RecipeDraft {
        glyph: String::from("🥫"),
        category: Category::Sauce,
        ingredients: vec![id("egg"), id("salt")],
        ..pudding.clone()
    };
    let first = kitchen.add_custom_recipe(pudding).unwrap();
    let second = kitchen.add_custom_recipe(sauce).unwrap();
    assert_ne!(first.id, second.id);
    assert_ne!(first.result.id, second.result.id);

    let a = kitchen.resolve(&Selection::of(["egg", "milk"])).await;
    let b = kitchen.resolve(&Selection::of(["egg", "salt"])).await;
    let (a, b) = (discovery(&a), discovery(&b));
    assert!(a.is_new);
    assert!(b.is_new);
    assert_eq!(a.result.glyph, "🍮");
    assert_eq!(a.result.category, Category::Dessert);
    assert_eq!(b.result.id, second.result.id);
    assert_eq!(b.result.glyph, "🥫");
    assert_eq!(b.result.category, Category::Sauce);
}

#[tokio::test]
async fn custom_recipe_needs_known_inputs() {
    let mut kitchen = kitchen(DisabledGenerator::new());
    let err = kitchen.add_custom_recipe(draft("Ghost", &["flour", "ectoplasm"]));
    assert!(err.is_err());
    assert!(kitchen.state().custom_recipes.is_empty());
}

// ---------------------------------------------------------------------------
// Generation fallback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn declined_generation_is_a_clean_miss() {
    let mut kitchen = kitchen(ScriptedGenerator::declining());
    let before = kitchen.state().clone();

    let resolution = kitchen.resolve(&Selection::of(["egg", "apple"])).await;
    assert_eq!(resolution.message(), MessageCode::NoRecipeFound);
    assert_eq!(kitchen.state(), &before);
    assert_eq!(kitchen.generator().calls(), 1);
    assert!(!kitchen.is_busy());
}

#[tokio::test]
async fn generated_result_gets_derived_id_and_fixed_difficulty() {
    let mut kitchen = kitchen(ScriptedGenerator::answering("Apple Omelette!"));
    let resolution = kitchen
        .resolve(&Selection::of(["egg", "apple"]).with_method("fry"))
        .await;

    let found = discovery(&resolution);
    assert!(found.is_new);
    assert_eq!(found.source, DiscoverySource::Generated);
    assert_eq!(found.result.id, id("ai_appleomelette"));
    assert_eq!(found.result.difficulty, 3);
    assert!(found.intermediate.is_none());
    assert!(kitchen.state().is_discovered(&id("ai_appleomelette")));

    let request = kitchen.generator().last_request().unwrap();
    let names: Vec<&str> = request.ingredients.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Egg", "Apple"]);
    assert_eq!(request.method, Some(MethodId::from("fry")));
}

#[tokio::test]
async fn default_method_is_not_sent_to_generator() {
    let mut kitchen = kitchen(ScriptedGenerator::declining());
    kitchen
        .resolve(&Selection::of(["egg", "apple"]).with_method("mix"))
        .await;
    assert_eq!(kitchen.generator().last_request().unwrap().method, None);
}

#[tokio::test]
async fn regenerating_a_known_name_rediscovers_it() {
    let mut kitchen = kitchen(ScriptedGenerator::answering("Apple Omelette"));
    kitchen.resolve(&Selection::of(["egg", "apple"])).await;
    let total = kitchen.state().ingredients.len();

    let again = kitchen.resolve(&Selection::of(["egg", "sugar"])).await;
    let found = discovery(&again);
    assert!(!found.is_new);
    assert_eq!(found.result.id, id("ai_appleomelette"));
    assert_eq!(kitchen.state().ingredients.len(), total);
}

#[tokio::test]
async fn blank_candidate_is_rejected() {
    let mut kitchen = kitchen(ScriptedGenerator::answering("   "));
    let resolution = kitchen.resolve(&Selection::of(["egg", "apple"])).await;
    assert_eq!(resolution.message(), MessageCode::NoRecipeFound);
}

#[tokio::test]
async fn disabled_generation_never_calls_the_generator() {
    let config = GameConfig::parse("generation:\n  enabled: false\n").unwrap();
    let mut kitchen = Kitchen::new(
        Catalog::standard(),
        MemoryBlobStore::new(),
        ScriptedGenerator::answering("Nope"),
        &config,
    )
    .unwrap();
    assert!(!kitchen.precedence().contains(&Strategy::Generative));

    let resolution = kitchen.resolve(&Selection::of(["egg", "apple"])).await;
    assert_eq!(resolution.message(), MessageCode::NoRecipeFound);
    assert_eq!(kitchen.generator().calls(), 0);
}

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

#[tokio::test]
async fn capacity_and_membership_guards() {
    let mut kitchen = kitchen(ScriptedGenerator::answering("Nope"));
    let before = kitchen.state().clone();

    let cases = [
        (Selection::default(), MessageCode::EmptySelection),
        (
            Selection::of(["flour", "water", "egg", "milk"]),
            MessageCode::Overflow,
        ),
        (Selection::of(["flour", "unobtainium"]), MessageCode::UnknownIngredient),
        (Selection::of(["bread", "butter"]), MessageCode::UnknownIngredient),
    ];
    for (selection, expected) in cases {
        assert_eq!(kitchen.resolve(&selection).await.message(), expected);
    }
    assert_eq!(kitchen.state(), &before);
    assert_eq!(kitchen.generator().calls(), 0);
}

#[tokio::test]
async fn repeated_ingredient_is_refused_before_any_attempt() {
    let mut kitchen = kitchen(ScriptedGenerator::answering("Double Flour"));
    let before = kitchen.state().clone();

    for selection in [
        Selection::of(["flour", "flour"]),
        Selection::of(["egg", "milk", "egg"]).with_method("fry"),
    ] {
        let resolution = kitchen.resolve(&selection).await;
        assert_eq!(resolution.message(), MessageCode::RepeatedIngredient);
    }
    assert_eq!(kitchen.attempt(), 0);
    assert!(!kitchen.is_busy());
    assert_eq!(kitchen.state(), &before);
    assert_eq!(kitchen.generator().calls(), 0);
}

#[tokio::test]
async fn discoveries_are_monotonic() {
    let mut kitchen = kitchen(ScriptedGenerator::declining());
    let steps = [
        Selection::of(["flour", "water"]),
        Selection::of(["egg", "apple"]),
        Selection::of(["dough"]).with_method("bake"),
        Selection::of(["dough", "butter"]),
        Selection::of(["puff_pastry"]).with_method("bake"),
        Selection::of(["tomato", "onion"]),
    ];
    let mut seen: Vec<IngredientId> = Vec::new();
    for selection in steps {
        kitchen.resolve(&selection).await;
        for earlier in &seen {
            assert!(kitchen.state().is_discovered(earlier), "{earlier} was lost");
        }
        seen = kitchen.state().discovered().map(|i| i.id.clone()).collect();
    }
    assert!(seen.contains(&id("croissant")));
}

// ---------------------------------------------------------------------------
// Two-phase resolution
// ---------------------------------------------------------------------------

fn pending(step: ResolutionStep) -> kitchen_core::GenerationTicket {
    match step {
        ResolutionStep::Pending(ticket) => ticket,
        ResolutionStep::Finished(resolution) => panic!("expected a ticket, got {resolution:?}"),
    }
}

fn candidate(name: &str) -> CandidateIngredient {
    CandidateIngredient {
        name: name.to_owned(),
        glyph: String::from("🍱"),
        description: String::from("Late arrival."),
        category: Category::Dish,
    }
}

#[test]
fn outstanding_generation_locks_the_bowl() {
    let mut kitchen = kitchen(DisabledGenerator::new());
    let selection = Selection::of(["egg", "apple"]);
    let ticket = pending(kitchen.begin_resolution(&selection));
    assert!(kitchen.is_busy());

    match kitchen.begin_resolution(&selection) {
        ResolutionStep::Finished(resolution) => {
            assert_eq!(resolution.message(), MessageCode::Busy);
        }
        ResolutionStep::Pending(_) => panic!("second attempt must not start"),
    }
    assert_eq!(
        kitchen.drop_item(Draggable::Ingredient(id("flour"))),
        WorkspaceEvent::Rejected(RejectReason::Busy)
    );

    let resolution = kitchen.complete_generation(ticket, Some(candidate("Apple Scramble")));
    assert_eq!(discovery(&resolution).result.id, id("ai_applescramble"));
    assert!(!kitchen.is_busy());
}

#[test]
fn answer_after_clear_is_discarded() {
    let mut kitchen = kitchen(DisabledGenerator::new());
    let ticket = pending(kitchen.begin_resolution(&Selection::of(["egg", "apple"])));
    let before = kitchen.state().clone();

    kitchen.clear_workspace();
    assert!(!kitchen.is_busy());
    let resolution = kitchen.complete_generation(ticket, Some(candidate("Too Late")));
    assert_eq!(resolution.message(), MessageCode::Stale);
    assert_eq!(kitchen.state(), &before);
}

#[test]
fn old_ticket_cannot_complete_a_newer_attempt() {
    let mut kitchen = kitchen(DisabledGenerator::new());
    let first = pending(kitchen.begin_resolution(&Selection::of(["egg", "apple"])));
    kitchen.clear_workspace();
    let second = pending(kitchen.begin_resolution(&Selection::of(["egg", "sugar"])));
    assert!(second.attempt() > first.attempt());

    let stale = kitchen.complete_generation(first, Some(candidate("Old")));
    assert_eq!(stale.message(), MessageCode::Stale);
    assert!(kitchen.is_busy());

    let fresh = kitchen.complete_generation(second, Some(candidate("New")));
    assert_eq!(discovery(&fresh).result.id, id("ai_new"));
}

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mixing_the_bowl_clears_it_on_success() {
    let mut kitchen = kitchen(DisabledGenerator::new());
    kitchen.drop_item(Draggable::Ingredient(id("flour")));
    kitchen.drop_item(Draggable::Ingredient(id("water")));
    kitchen.drop_item(Draggable::Method(MethodId::from("fry")));

    let resolution = kitchen.mix().await;
    assert_eq!(discovery(&resolution).result.id, id("donut"));
    assert!(kitchen.workspace().is_empty());
}

#[tokio::test]
async fn a_miss_leaves_the_bowl_alone() {
    let mut kitchen = kitchen(ScriptedGenerator::declining());
    kitchen.drop_item(Draggable::Ingredient(id("egg")));
    kitchen.drop_item(Draggable::Ingredient(id("apple")));

    let resolution = kitchen.mix().await;
    assert!(resolution.is_miss());
    assert_eq!(kitchen.workspace().selection().ingredients.len(), 2);
}

#[test]
fn bowl_accepts_only_discovered_items() {
    let mut kitchen = kitchen(DisabledGenerator::new());
    assert_eq!(
        kitchen.drop_item(Draggable::Ingredient(id("bread"))),
        WorkspaceEvent::Rejected(RejectReason::Undiscovered)
    );
    assert_eq!(
        kitchen.drop_item(Draggable::Ingredient(id("caviar"))),
        WorkspaceEvent::Rejected(RejectReason::Unknown)
    );
    assert_eq!(
        kitchen.drop_item(Draggable::Method(MethodId::from("sous_vide"))),
        WorkspaceEvent::Rejected(RejectReason::Unknown)
    );
    assert!(kitchen.workspace().is_empty());
}

// ---------------------------------------------------------------------------
// Reset
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reset_restores_the_seed_state() {
    let mut kitchen = kitchen(ScriptedGenerator::answering("Apple Omelette"));
    kitchen.resolve(&Selection::of(["flour", "water"])).await;
    kitchen.resolve(&Selection::of(["egg", "apple"])).await;
    kitchen.add_custom_recipe(draft("Z", &["tomato", "rice"])).unwrap();
    assert!(kitchen.state().achievements.iter().any(|a| a.achieved));

    kitchen.reset();
    let seed = PlayerState::seed(kitchen.catalog());
    assert_eq!(kitchen.state(), &seed);

    let reloaded = Kitchen::new(
        Catalog::standard(),
        kitchen.store().backend().clone(),
        DisabledGenerator::new(),
        &GameConfig::default(),
    )
    .unwrap();
    assert_eq!(reloaded.state(), &seed);
}
