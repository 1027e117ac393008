#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Cauldron Catch.

mod contacts;
mod scoreboard;

use std::time::Duration;

use cauldron_core::{
    Catalog, Command, Difficulty, Event, IngredientId, IngredientKind, WELCOME_BANNER,
};
use cauldron_instruments::{CauldronGauge, DialRange, LevelArrow, SorterController, SorterPositions};
use glam::Vec2;

pub use scoreboard::Scoreboard;

const DEFAULT_RECIPES_TO_MAX_LEVEL: u32 = 10;

/// Configuration parameters required to construct the world.
#[derive(Clone, Debug)]
pub struct Config {
    catalog: Catalog,
    recipes_to_max_level: u32,
    gauge: DialRange,
    level_arrow: DialRange,
    sorter: SorterPositions,
}

impl Config {
    /// Creates a configuration around the provided catalog with stock tuning.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            recipes_to_max_level: DEFAULT_RECIPES_TO_MAX_LEVEL,
            gauge: CauldronGauge::DEFAULT_RANGE,
            level_arrow: LevelArrow::DEFAULT_RANGE,
            sorter: SorterPositions::default(),
        }
    }

    /// Number of completed recipes after which difficulty saturates.
    #[must_use]
    pub const fn with_recipes_to_max_level(mut self, recipes: u32) -> Self {
        self.recipes_to_max_level = recipes;
        self
    }

    /// Needle sweep of the cauldron gauge.
    #[must_use]
    pub const fn with_gauge_range(mut self, range: DialRange) -> Self {
        self.gauge = range;
        self
    }

    /// Sweep of the level arrow.
    #[must_use]
    pub const fn with_level_arrow_range(mut self, range: DialRange) -> Self {
        self.level_arrow = range;
        self
    }

    /// Fixed rotations of the sorter arm.
    #[must_use]
    pub const fn with_sorter_positions(mut self, positions: SorterPositions) -> Self {
        self.sorter = positions;
        self
    }
}

/// Represents the authoritative Cauldron Catch world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    catalog: Catalog,
    scoreboard: Scoreboard,
    gauge: CauldronGauge,
    level_arrow: LevelArrow,
    sorter: SorterController,
    progression: Progression,
    spawning_active: bool,
    ingredients: Vec<LiveIngredient>,
    next_ingredient_id: u32,
    elapsed: Duration,
}

impl World {
    /// Creates a new world with an empty cauldron and zero score.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            banner: WELCOME_BANNER,
            catalog: config.catalog,
            scoreboard: Scoreboard::default(),
            gauge: CauldronGauge::new(config.gauge),
            level_arrow: LevelArrow::new(config.level_arrow),
            sorter: SorterController::new(config.sorter),
            progression: Progression::new(config.recipes_to_max_level),
            spawning_active: false,
            ingredients: Vec::new(),
            next_ingredient_id: 0,
            elapsed: Duration::ZERO,
        }
    }

    fn allocate_ingredient_id(&mut self) -> IngredientId {
        let id = IngredientId::new(self.next_ingredient_id);
        self.next_ingredient_id = self.next_ingredient_id.wrapping_add(1);
        id
    }

    pub(crate) fn take_ingredient(&mut self, ingredient: IngredientId) -> Option<LiveIngredient> {
        let index = self
            .ingredients
            .iter()
            .position(|live| live.id == ingredient)?;
        Some(self.ingredients.remove(index))
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.elapsed = world.elapsed.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::SpawnIngredient {
            kind,
            position,
            fall_speed,
        } => {
            let Some(definition) = world.catalog.find(&kind) else {
                log::warn!("spawn request for unknown ingredient {kind}");
                out_events.push(Event::SpawnRejected { kind });
                return;
            };
            let score_value = definition.score_value();
            let id = world.allocate_ingredient_id();
            world.ingredients.push(LiveIngredient {
                id,
                kind: kind.clone(),
                score_value,
                fall_speed,
                spawn_position: position,
            });
            out_events.push(Event::IngredientSpawned {
                ingredient: id,
                kind,
                position,
                fall_speed,
            });
        }
        Command::ResolveContact {
            ingredient,
            receiver,
        } => contacts::resolve(world, ingredient, receiver, out_events),
        Command::AwardScore { points } => {
            world.scoreboard.award(points);
            out_events.push(Event::ScoreChanged {
                score: world.scoreboard.score(),
            });
        }
        Command::AddHeat { amount } => {
            world.gauge.add_heat(amount);
            push_heat(world, out_events);
        }
        Command::SetHeat { value } => {
            world.gauge.set_heat(value);
            push_heat(world, out_events);
        }
        Command::AdvanceDifficulty => {
            let difficulty = world.progression.advance();
            world.level_arrow.set_value(difficulty.get());
            log::info!(
                "recipe {} complete, difficulty is now {:.2}",
                world.progression.recipes_completed,
                difficulty.get()
            );
            out_events.push(Event::DifficultyChanged {
                difficulty,
                recipes_completed: world.progression.recipes_completed,
                arrow_angle: world.level_arrow.angle(),
            });
        }
        Command::SetSpawning { active } => {
            world.spawning_active = active;
            out_events.push(Event::SpawningChanged { active });
        }
        Command::SetSorterArm { active } => {
            world.sorter.set_active(active);
            out_events.push(Event::SorterArmMoved {
                active,
                angle: world.sorter.angle(),
            });
        }
    }
}

fn push_heat(world: &World, out_events: &mut Vec<Event>) {
    out_events.push(Event::HeatChanged {
        heat: world.gauge.heat(),
        needle_angle: world.gauge.needle_angle(),
    });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Scoreboard, World};
    use cauldron_core::{Catalog, Difficulty, IngredientId, IngredientSnapshot, IngredientView};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the ingredient catalog.
    #[must_use]
    pub fn catalog(world: &World) -> &Catalog {
        &world.catalog
    }

    /// Provides read-only access to the running score.
    #[must_use]
    pub fn scoreboard(world: &World) -> &Scoreboard {
        &world.scoreboard
    }

    /// Current normalized cauldron heat.
    #[must_use]
    pub fn heat(world: &World) -> f32 {
        world.gauge.heat()
    }

    /// Current gauge needle rotation in degrees.
    #[must_use]
    pub fn needle_angle(world: &World) -> f32 {
        world.gauge.needle_angle()
    }

    /// Current normalized difficulty.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.progression.difficulty()
    }

    /// Number of recipes completed since the world was created.
    #[must_use]
    pub fn recipes_completed(world: &World) -> u32 {
        world.progression.recipes_completed
    }

    /// Current level arrow rotation in degrees.
    #[must_use]
    pub fn level_arrow_angle(world: &World) -> f32 {
        world.level_arrow.angle()
    }

    /// Whether the sorter arm is in its active position.
    #[must_use]
    pub fn sorter_active(world: &World) -> bool {
        world.sorter.is_active()
    }

    /// Current sorter arm rotation in degrees.
    #[must_use]
    pub fn sorter_angle(world: &World) -> f32 {
        world.sorter.angle()
    }

    /// Whether ingredient production was last requested to run.
    #[must_use]
    pub fn spawning_active(world: &World) -> bool {
        world.spawning_active
    }

    /// Reports whether `ingredient` is still in play.
    #[must_use]
    pub fn is_live(world: &World, ingredient: IngredientId) -> bool {
        world.ingredients.iter().any(|live| live.id == ingredient)
    }

    /// Total simulated time processed by the world.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Captures a read-only view of the ingredients currently in play.
    #[must_use]
    pub fn ingredient_view(world: &World) -> IngredientView {
        IngredientView::from_snapshots(
            world
                .ingredients
                .iter()
                .map(|live| IngredientSnapshot {
                    id: live.id,
                    kind: live.kind.clone(),
                    score_value: live.score_value,
                    fall_speed: live.fall_speed,
                    spawn_position: live.spawn_position,
                })
                .collect(),
        )
    }
}

#[derive(Clone, Debug)]
pub(crate) struct LiveIngredient {
    id: IngredientId,
    kind: IngredientKind,
    score_value: i32,
    fall_speed: f32,
    spawn_position: Vec2,
}

#[derive(Clone, Copy, Debug)]
struct Progression {
    recipes_completed: u32,
    recipes_to_max_level: u32,
}

impl Progression {
    const fn new(recipes_to_max_level: u32) -> Self {
        Self {
            recipes_completed: 0,
            recipes_to_max_level,
        }
    }

    fn advance(&mut self) -> Difficulty {
        self.recipes_completed = self.recipes_completed.saturating_add(1);
        self.difficulty()
    }

    fn difficulty(&self) -> Difficulty {
        if self.recipes_completed == 0 {
            return Difficulty::MIN;
        }
        Difficulty::from_progress(self.recipes_completed, self.recipes_to_max_level)
    }
}
