use std::time::Duration;

use cauldron_core::{
    Catalog, Command, Difficulty, Event, IngredientDefinition, IngredientId, IngredientKind,
    Receiver,
};
use cauldron_system_recipe::{CatchOutcome, Config, RecipeManager, RecipePhase, RecipeTuning};
use cauldron_system_spawning::{self as spawning, IngredientSpawner, Production, SpawnerTuning};
use cauldron_world::{self as world, query, World};
use glam::Vec2;

struct Harness {
    world: World,
    recipes: RecipeManager,
    spawner: IngredientSpawner,
    log: Vec<Event>,
}

impl Harness {
    fn new() -> Self {
        let catalog = Catalog::new(vec![
            IngredientDefinition::new("Egg", 10),
            IngredientDefinition::new("Fish", 20),
            IngredientDefinition::new("Mushroom", 15),
            IngredientDefinition::new("Frog", 5),
        ]);
        let table = spawning::WeightedIngredientTable::uniform(
            catalog.iter().map(|definition| definition.kind().clone()),
        );
        Self {
            world: World::new(world::Config::new(catalog).with_recipes_to_max_level(10)),
            recipes: RecipeManager::new(Config::new(RecipeTuning::default(), 0xfeed)),
            spawner: IngredientSpawner::new(spawning::Config::new(
                SpawnerTuning::default(),
                table,
                0xbeef,
            )),
            log: Vec::new(),
        }
    }

    fn start_with(&mut self, entries: &[&str]) {
        let mut commands = Vec::new();
        self.recipes.set_recipe(
            entries.iter().map(|entry| IngredientKind::from(*entry)).collect(),
            &mut commands,
        );
        self.pump(commands);
    }

    fn pump(&mut self, initial: Vec<Command>) {
        let mut commands = initial;
        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            let catalog = query::catalog(&self.world).clone();
            self.recipes.handle(&events, &catalog, &mut commands);
            self.spawner.handle(&events, &mut commands);
            self.log.extend(events);
        }
    }

    fn drop_into_cauldron(&mut self, kind: &str) {
        let ingredient = self.spawn(kind);
        self.pump(vec![Command::ResolveContact {
            ingredient,
            receiver: Receiver::Cauldron,
        }]);
    }

    fn spawn(&mut self, kind: &str) -> IngredientId {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::SpawnIngredient {
                kind: IngredientKind::from(kind),
                position: Vec2::new(0.0, 4.5),
                fall_speed: 1.0,
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::IngredientSpawned { ingredient, .. }] => *ingredient,
            other => panic!("unexpected spawn events: {other:?}"),
        }
    }

    fn tick(&mut self, dt: Duration) {
        self.pump(vec![Command::Tick { dt }]);
    }

    fn remaining(&self) -> Vec<&str> {
        self.recipes
            .recipe()
            .remaining()
            .iter()
            .map(IngredientKind::as_str)
            .collect()
    }

    fn difficulty_changes(&self) -> usize {
        self.log
            .iter()
            .filter(|event| matches!(event, Event::DifficultyChanged { .. }))
            .count()
    }
}

#[test]
fn catching_through_a_recipe_end_to_end() {
    let mut harness = Harness::new();
    harness.start_with(&["Egg", "Egg", "Fish", "Mushroom"]);
    assert_eq!(harness.spawner.production(), Production::Running);

    harness.drop_into_cauldron("Egg");
    assert_eq!(harness.remaining(), vec!["Egg", "Fish", "Mushroom"]);

    harness.drop_into_cauldron("Egg");
    assert_eq!(harness.remaining(), vec!["Fish", "Mushroom"]);
    assert_eq!(query::scoreboard(&harness.world).score(), 20);

    harness.drop_into_cauldron("Frog");
    assert_eq!(harness.remaining(), vec!["Fish", "Mushroom"]);
    assert_eq!(query::heat(&harness.world), 0.25);
    assert_eq!(query::scoreboard(&harness.world).score(), 20);

    harness.drop_into_cauldron("Fish");
    harness.drop_into_cauldron("Mushroom");
    assert!(harness.remaining().is_empty());
    assert_eq!(harness.recipes.phase(), RecipePhase::Complete);
    assert_eq!(query::scoreboard(&harness.world).score(), 55);

    assert_eq!(harness.difficulty_changes(), 1);
    assert_eq!(query::difficulty(&harness.world), Difficulty::new(0.1));
    assert_eq!(harness.spawner.difficulty(), Difficulty::new(0.1));
    assert_eq!(harness.spawner.production(), Production::Idle);
    assert_eq!(
        harness.recipes.pending_regeneration(),
        Some(Duration::from_millis(1_500))
    );
}

#[test]
fn regeneration_fires_after_delay_and_restarts_round() {
    let mut harness = Harness::new();
    harness.start_with(&["Fish"]);
    harness.drop_into_cauldron("Frog");
    assert_eq!(query::heat(&harness.world), 0.25);

    harness.drop_into_cauldron("Fish");
    assert_eq!(harness.recipes.phase(), RecipePhase::Complete);

    harness.tick(Duration::from_millis(1_000));
    assert_eq!(harness.recipes.phase(), RecipePhase::Complete);
    assert_eq!(harness.spawner.production(), Production::Idle);

    harness.tick(Duration::from_millis(500));
    assert_eq!(harness.recipes.phase(), RecipePhase::Active);
    assert_eq!(harness.remaining().len(), 4);
    assert_eq!(query::heat(&harness.world), 0.0);
    assert_eq!(harness.spawner.production(), Production::Running);
    assert!(harness.recipes.pending_regeneration().is_none());
    assert_eq!(harness.difficulty_changes(), 1);
}

#[test]
fn wrong_catches_only_heat_the_cauldron() {
    let mut harness = Harness::new();
    harness.start_with(&["Egg", "Fish"]);

    for _ in 0..6 {
        harness.drop_into_cauldron("Frog");
    }

    assert_eq!(harness.remaining(), vec!["Egg", "Fish"]);
    assert_eq!(query::heat(&harness.world), 1.0);
    assert_eq!(query::needle_angle(&harness.world), -92.0);
    assert_eq!(query::difficulty(&harness.world), Difficulty::MIN);
    assert_eq!(harness.difficulty_changes(), 0);
}

#[test]
fn four_catches_complete_a_generated_recipe_exactly_once() {
    let mut harness = Harness::new();
    let mut commands = Vec::new();
    let catalog = query::catalog(&harness.world).clone();
    harness
        .recipes
        .begin(&catalog, &mut commands)
        .expect("begin round");
    harness.pump(commands);

    let required: Vec<String> = harness
        .remaining()
        .into_iter()
        .rev()
        .map(str::to_owned)
        .collect();
    assert_eq!(required.len(), 4);

    for kind in &required {
        harness.drop_into_cauldron(kind);
    }

    assert!(harness.remaining().is_empty());
    assert_eq!(harness.recipes.completed(), 1);
    assert_eq!(harness.difficulty_changes(), 1);

    harness.drop_into_cauldron(&required[0]);
    assert_eq!(harness.recipes.completed(), 1, "empty recipe cannot complete again");
    assert_eq!(query::heat(&harness.world), 0.25);
}

#[test]
fn trashed_ingredients_are_ignored_by_the_recipe() {
    let mut harness = Harness::new();
    harness.start_with(&["Egg"]);
    let egg = harness.spawn("Egg");
    harness.pump(vec![Command::ResolveContact {
        ingredient: egg,
        receiver: Receiver::TrashPipe,
    }]);
    harness.pump(vec![Command::ResolveContact {
        ingredient: egg,
        receiver: Receiver::Cauldron,
    }]);

    assert_eq!(harness.remaining(), vec!["Egg"]);
    assert_eq!(query::heat(&harness.world), 0.0);
    assert_eq!(query::scoreboard(&harness.world).score(), 0);
}

#[test]
fn second_completion_replaces_pending_regeneration() {
    let tuning = RecipeTuning::default();
    let mut manager = RecipeManager::new(Config::new(tuning, 5));
    let mut commands = Vec::new();
    manager.set_recipe(vec![IngredientKind::from("Egg")], &mut commands);
    let catalog = Catalog::new(vec![IngredientDefinition::new("Egg", 10)]);

    assert_eq!(
        manager.on_ingredient_caught(&IngredientKind::from("Egg"), 10, &mut commands),
        CatchOutcome::Completed
    );
    manager.advance(Duration::from_millis(1_000), &catalog, &mut commands);
    assert_eq!(
        manager.pending_regeneration(),
        Some(Duration::from_millis(500))
    );

    manager.set_recipe(vec![IngredientKind::from("Egg")], &mut commands);
    assert!(manager.pending_regeneration().is_none());
    assert_eq!(
        manager.on_ingredient_caught(&IngredientKind::from("Egg"), 10, &mut commands),
        CatchOutcome::Completed
    );
    assert_eq!(
        manager.pending_regeneration(),
        Some(Duration::from_millis(1_500))
    );

    commands.clear();
    manager.advance(Duration::from_millis(1_500), &catalog, &mut commands);
    let restarts = commands
        .iter()
        .filter(|command| matches!(command, Command::SetSpawning { active: true }))
        .count();
    assert_eq!(restarts, 1, "exactly one regeneration fires");
    assert_eq!(manager.phase(), RecipePhase::Active);
}
