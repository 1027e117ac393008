//! Headless host that stands in for the engine's physics and sorter input.
//!
//! Ingredients fall under a constant acceleration scaled by their fall speed.
//! Once one reaches the cauldron line an autopilot decides where the sorter
//! arm points, and the contact is reported back to the world.

use std::{fmt, time::Duration};

use anyhow::{Context, Result};
use cauldron_core::{clamp01, Command, Difficulty, Event, IngredientId, IngredientKind, Receiver};
use cauldron_rendering::{FrameInput, IngredientPresentation, Rotation, Scene};
use cauldron_system_recipe::{self as recipe, RecipeManager};
use cauldron_system_spawning::{self as spawning, IngredientSpawner};
use cauldron_world::{self as world, query, World};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{GameConfig, HostConfig};

/// Owns the world and every system, and drives them from host frames.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    recipes: RecipeManager,
    spawner: IngredientSpawner,
    host: HostConfig,
    falling: Vec<FallingIngredient>,
    autopilot: Autopilot,
}

#[derive(Clone, Debug)]
struct FallingIngredient {
    id: IngredientId,
    kind: IngredientKind,
    position: Vec2,
    velocity: f32,
    acceleration: f32,
}

/// Operates the sorter arm, occasionally getting it wrong.
#[derive(Debug)]
struct Autopilot {
    rng: ChaCha8Rng,
    miss_rate: f64,
}

impl Autopilot {
    fn new(seed: u64, miss_rate: f32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            miss_rate: f64::from(clamp01(miss_rate)),
        }
    }

    /// Chooses whether the arm should divert an ingredient to the trash pipe.
    fn divert(&mut self, needed: bool) -> bool {
        let mistaken = self.rng.gen_bool(self.miss_rate);
        needed == mistaken
    }
}

impl Simulation {
    /// Builds every system from `config` and draws the first recipe.
    pub(crate) fn new(config: &GameConfig, seed: u64, miss_rate: f32) -> Result<Self> {
        let table = config.spawn_table()?;
        let world = World::new(
            world::Config::new(config.catalog.clone())
                .with_recipes_to_max_level(config.progression.recipes_to_max_level)
                .with_gauge_range(config.gauge)
                .with_level_arrow_range(config.level_arrow)
                .with_sorter_positions(config.sorter),
        );
        let spawner = IngredientSpawner::new(spawning::Config::new(
            config.spawner.clone(),
            table,
            seed,
        ));
        let recipes = RecipeManager::new(recipe::Config::new(
            config.recipe.clone(),
            seed.wrapping_add(1),
        ));

        let mut simulation = Self {
            world,
            recipes,
            spawner,
            host: config.host.clone(),
            falling: Vec::new(),
            autopilot: Autopilot::new(seed.wrapping_add(2), miss_rate),
        };

        let mut commands = Vec::new();
        let catalog = query::catalog(&simulation.world).clone();
        simulation
            .recipes
            .begin(&catalog, &mut commands)
            .context("failed to draw the first recipe")?;
        let _ = simulation.pump(commands);
        Ok(simulation)
    }

    /// Welcome text shown by the host before the first frame.
    pub(crate) fn banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    /// Scene reflecting the current world state.
    pub(crate) fn scene(&self) -> Scene {
        let mut scene = Scene {
            score_text: query::scoreboard(&self.world).score_text(),
            needle: Rotation::from_degrees(query::needle_angle(&self.world)),
            level_arrow: Rotation::from_degrees(query::level_arrow_angle(&self.world)),
            sorter_arm: Rotation::from_degrees(query::sorter_angle(&self.world)),
            spawner_origin: self.spawner.position(),
            ..Scene::default()
        };
        self.refresh_scene(&mut scene);
        scene
    }

    /// Advances the game by one host frame and updates `scene` to match.
    pub(crate) fn step(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) {
        let events = self.pump(vec![Command::Tick { dt }]);
        self.observe(&events, scene);

        let seconds = dt.as_secs_f32();
        let mut landed = Vec::new();
        for ingredient in &mut self.falling {
            ingredient.velocity += ingredient.acceleration * seconds;
            ingredient.position.y -= ingredient.velocity * seconds;
            if ingredient.position.y <= self.host.cauldron_y {
                landed.push(ingredient.id);
            }
        }

        for id in landed {
            let events = self.land(id, input);
            self.observe(&events, scene);
        }

        self.refresh_scene(scene);
    }

    /// Totals reported when the session ends.
    pub(crate) fn summary(&self) -> Summary {
        Summary {
            elapsed: query::elapsed(&self.world),
            score: query::scoreboard(&self.world).score(),
            recipes_completed: query::recipes_completed(&self.world),
            heat: query::heat(&self.world),
            difficulty: query::difficulty(&self.world),
            in_play: query::ingredient_view(&self.world).iter().count(),
        }
    }

    fn land(&mut self, id: IngredientId, input: FrameInput) -> Vec<Event> {
        let Some(ingredient) = self.falling.iter().find(|falling| falling.id == id) else {
            return Vec::new();
        };
        let needed = self.recipes.recipe().remaining().contains(&ingredient.kind);
        let divert = input.sorter_held || self.autopilot.divert(needed);

        let mut commands = Vec::new();
        if divert != query::sorter_active(&self.world) {
            commands.push(Command::SetSorterArm { active: divert });
        }
        commands.push(Command::ResolveContact {
            ingredient: id,
            receiver: if divert {
                Receiver::TrashPipe
            } else {
                Receiver::Cauldron
            },
        });
        self.pump(commands)
    }

    fn pump(&mut self, initial: Vec<Command>) -> Vec<Event> {
        let mut log = Vec::new();
        let mut commands = initial;
        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            let catalog = query::catalog(&self.world).clone();
            self.recipes.handle(&events, &catalog, &mut commands);
            self.spawner.handle(&events, &mut commands);
            log.extend(events);
        }
        log
    }

    fn observe(&mut self, events: &[Event], scene: &mut Scene) {
        for event in events {
            match event {
                Event::IngredientSpawned {
                    ingredient,
                    kind,
                    position,
                    fall_speed,
                } => self.falling.push(FallingIngredient {
                    id: *ingredient,
                    kind: kind.clone(),
                    position: *position,
                    velocity: 0.0,
                    acceleration: fall_speed * self.host.base_gravity,
                }),
                Event::IngredientCaught { ingredient, .. }
                | Event::IngredientDiscarded { ingredient, .. } => {
                    self.falling.retain(|falling| falling.id != *ingredient);
                }
                Event::ScoreChanged { score } => scene.score_text = score.to_string(),
                Event::HeatChanged { needle_angle, .. } => {
                    scene.needle = Rotation::from_degrees(*needle_angle);
                }
                Event::DifficultyChanged { arrow_angle, .. } => {
                    scene.level_arrow = Rotation::from_degrees(*arrow_angle);
                    scene.spawner_origin = self.spawner.position();
                }
                Event::SorterArmMoved { angle, .. } => {
                    scene.sorter_arm = Rotation::from_degrees(*angle);
                }
                _ => {}
            }
        }
    }

    fn refresh_scene(&self, scene: &mut Scene) {
        scene.recipe_text = self.recipes.recipe().display_text();
        scene.ingredients = self
            .falling
            .iter()
            .map(|falling| IngredientPresentation {
                id: falling.id,
                kind: falling.kind.clone(),
                position: falling.position,
            })
            .collect();
    }
}

/// End-of-session report.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Summary {
    pub(crate) elapsed: Duration,
    pub(crate) score: i64,
    pub(crate) recipes_completed: u32,
    pub(crate) heat: f32,
    pub(crate) difficulty: Difficulty,
    pub(crate) in_play: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}s played, score {}, {} recipes completed, heat {:.2}, difficulty {:.2}, {} ingredients still falling",
            self.elapsed.as_secs_f32(),
            self.score,
            self.recipes_completed,
            self.heat,
            self.difficulty.get(),
            self.in_play
        )
    }
}
