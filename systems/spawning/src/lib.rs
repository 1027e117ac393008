#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting ingredient spawn commands.
//!
//! The spawner runs a repeating production loop on simulated time: it waits
//! for the current interval, draws an ingredient from the tier selected by the
//! current difficulty, and requests that the world spawns it. Difficulty
//! shortens the interval, lowers the spawn point, and speeds up the fall.

mod table;

use std::time::Duration;

use cauldron_core::{lerp, Command, Difficulty, Event};
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub use table::{TableError, Tier, WeightedEntry, WeightedIngredientTable};

/// Designer-facing knobs controlling spawn cadence and placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpawnerTuning {
    /// Seconds between spawns at the lowest difficulty.
    pub initial_interval_secs: f32,
    /// Seconds between spawns at the highest difficulty.
    pub fastest_interval_secs: f32,
    /// Horizontal position of the spawner assembly.
    pub spawn_x: f32,
    /// Vertical position of the spawner at the lowest difficulty.
    pub initial_y: f32,
    /// Vertical position of the spawner at the highest difficulty.
    pub lowest_y: f32,
    /// Offset from the spawner origin at which ingredients appear.
    pub offset: Vec2,
    /// Gravity scale given to ingredients at the lowest difficulty.
    pub initial_gravity: f32,
    /// Gravity scale given to ingredients at the highest difficulty.
    pub max_gravity: f32,
}

impl Default for SpawnerTuning {
    fn default() -> Self {
        Self {
            initial_interval_secs: 2.0,
            fastest_interval_secs: 0.5,
            spawn_x: 0.0,
            initial_y: 4.5,
            lowest_y: 2.0,
            offset: Vec2::ZERO,
            initial_gravity: 1.0,
            max_gravity: 2.5,
        }
    }
}

impl SpawnerTuning {
    /// Seconds between spawns at `difficulty`.
    #[must_use]
    pub fn spawn_interval(&self, difficulty: Difficulty) -> f32 {
        lerp(
            self.initial_interval_secs,
            self.fastest_interval_secs,
            difficulty.get(),
        )
    }

    /// Spawner origin at `difficulty`.
    #[must_use]
    pub fn spawner_position(&self, difficulty: Difficulty) -> Vec2 {
        Vec2::new(
            self.spawn_x,
            lerp(self.initial_y, self.lowest_y, difficulty.get()),
        )
    }

    /// Gravity scale assigned to ingredients spawned at `difficulty`.
    #[must_use]
    pub fn fall_speed(&self, difficulty: Difficulty) -> f32 {
        lerp(self.initial_gravity, self.max_gravity, difficulty.get())
    }
}

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Debug)]
pub struct Config {
    tuning: SpawnerTuning,
    table: WeightedIngredientTable,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided tuning, table, and seed.
    #[must_use]
    pub fn new(tuning: SpawnerTuning, table: WeightedIngredientTable, rng_seed: u64) -> Self {
        Self {
            tuning,
            table,
            rng_seed,
        }
    }
}

/// Lifecycle of the production loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Production {
    /// Not producing; `start` begins a fresh wait.
    Idle,
    /// Waiting for the next spawn.
    Running,
    /// Stopped permanently by a configuration error.
    Halted,
}

/// Pure system that emits spawn commands while production runs.
#[derive(Debug)]
pub struct IngredientSpawner {
    tuning: SpawnerTuning,
    table: WeightedIngredientTable,
    rng: ChaCha8Rng,
    production: Production,
    accumulator: Duration,
    difficulty: Difficulty,
    interval: Duration,
    position: Vec2,
    fall_speed: f32,
    active_tier: usize,
}

impl IngredientSpawner {
    /// Creates an idle spawner at the lowest difficulty.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut spawner = Self {
            tuning: config.tuning,
            table: config.table,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            production: Production::Idle,
            accumulator: Duration::ZERO,
            difficulty: Difficulty::MIN,
            interval: Duration::ZERO,
            position: Vec2::ZERO,
            fall_speed: 0.0,
            active_tier: 0,
        };
        spawner.apply_difficulty(Difficulty::MIN);
        spawner
    }

    /// Consumes world events and emits spawn commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::SpawningChanged { active: true } => self.start(),
                Event::SpawningChanged { active: false } => self.stop(),
                Event::DifficultyChanged { difficulty, .. } => self.update_difficulty(*difficulty),
                Event::TimeAdvanced { dt } => self.advance(*dt, out),
                _ => {}
            }
        }
    }

    /// Begins production unless it is already running. A halted spawner stays halted.
    pub fn start(&mut self) {
        match self.production {
            Production::Running => {}
            Production::Halted => {
                log::warn!("ignoring start request for a spawner halted by a configuration error");
            }
            Production::Idle => {
                self.production = Production::Running;
                self.accumulator = Duration::ZERO;
            }
        }
    }

    /// Stops production, abandoning the pending wait.
    pub fn stop(&mut self) {
        if self.production == Production::Running {
            self.production = Production::Idle;
            self.accumulator = Duration::ZERO;
        }
    }

    /// Recomputes interval, spawn point, fall speed, and tier for `difficulty`.
    pub fn update_difficulty(&mut self, difficulty: Difficulty) {
        self.apply_difficulty(difficulty);
        log::info!(
            "spawn interval now {:.2}s, tier {}",
            self.interval.as_secs_f32(),
            self.active_tier
        );
    }

    /// Accumulates simulated time and spawns once per elapsed interval.
    pub fn advance(&mut self, dt: Duration, out: &mut Vec<Command>) {
        if self.production != Production::Running || self.interval.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        while self.production == Production::Running && self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            if let Err(error) = self.produce(out) {
                log::error!("ingredient spawner halted: {error}");
                self.production = Production::Halted;
                self.accumulator = Duration::ZERO;
            }
        }
    }

    /// Current state of the production loop.
    #[must_use]
    pub const fn production(&self) -> Production {
        self.production
    }

    /// Difficulty most recently applied.
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Wait between spawns at the current difficulty.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawner origin at the current difficulty.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Gravity scale given to newly spawned ingredients.
    #[must_use]
    pub const fn fall_speed(&self) -> f32 {
        self.fall_speed
    }

    /// Index of the tier ingredients are drawn from.
    #[must_use]
    pub const fn active_tier(&self) -> usize {
        self.active_tier
    }

    fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        let seconds = self.tuning.spawn_interval(difficulty);
        self.interval = Duration::try_from_secs_f32(seconds).unwrap_or(Duration::ZERO);
        self.position = self.tuning.spawner_position(difficulty);
        self.fall_speed = self.tuning.fall_speed(difficulty);
        self.active_tier = self.table.tier_index(difficulty);
    }

    fn produce(&mut self, out: &mut Vec<Command>) -> Result<(), TableError> {
        let level = self.active_tier;
        let tier = self.table.tier(level).ok_or(TableError::NoTiers)?;
        let entry = tier
            .select(&mut self.rng)
            .ok_or(TableError::EmptyTier { level })?;

        log::debug!("spawning {} from tier {level}", entry.kind);
        out.push(Command::SpawnIngredient {
            kind: entry.kind.clone(),
            position: self.position + self.tuning.offset,
            fall_speed: self.fall_speed,
        });
        Ok(())
    }
}
