#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Recipe orchestration system.
//!
//! The manager owns the current recipe and decides what every catch means:
//! a needed ingredient earns its score, anything else heats the cauldron.
//! Emptying the recipe stops the spawner, advances difficulty, and arms a
//! regeneration timer; when the timer fires a fresh recipe is drawn, the heat
//! is cleared, and the spawner restarts.

mod recipe;

use std::time::Duration;

use cauldron_core::{Catalog, Command, Event, IngredientKind};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use recipe::Recipe;

/// Designer-facing knobs controlling recipes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecipeTuning {
    /// Number of ingredients drawn for each recipe.
    pub recipe_length: usize,
    /// Heat added to the cauldron for every unwanted catch.
    pub heat_per_wrong_ingredient: f32,
    /// Seconds between completing a recipe and drawing the next one.
    pub regeneration_delay_secs: f32,
}

impl Default for RecipeTuning {
    fn default() -> Self {
        Self {
            recipe_length: 4,
            heat_per_wrong_ingredient: 0.25,
            regeneration_delay_secs: 1.5,
        }
    }
}

/// Configuration parameters required to construct the recipe manager.
#[derive(Clone, Debug)]
pub struct Config {
    tuning: RecipeTuning,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided tuning and seed.
    #[must_use]
    pub fn new(tuning: RecipeTuning, rng_seed: u64) -> Self {
        Self { tuning, rng_seed }
    }
}

/// Where the manager is in the recipe cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecipePhase {
    /// No recipe has been issued yet.
    Idle,
    /// At least one ingredient is still required.
    Active,
    /// The recipe is empty and a new one is pending.
    Complete,
}

/// Result of evaluating a single catch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatchOutcome {
    /// The ingredient was needed and more remain.
    Accepted,
    /// The ingredient was the last one needed.
    Completed,
    /// The ingredient was not needed.
    Rejected,
}

/// Problems that prevent a recipe from being drawn.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecipeError {
    /// The catalog has nothing to draw from.
    #[error("ingredient catalog is empty")]
    EmptyCatalog,
    /// Recipes are configured to contain no ingredients.
    #[error("recipe length must be at least one")]
    ZeroLength,
}

/// Pure system that tracks the current recipe and judges catches.
#[derive(Debug)]
pub struct RecipeManager {
    tuning: RecipeTuning,
    rng: ChaCha8Rng,
    recipe: Recipe,
    phase: RecipePhase,
    regeneration: Option<Duration>,
    completed: u32,
}

impl RecipeManager {
    /// Creates an idle manager. Call [`RecipeManager::begin`] to issue the first recipe.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            tuning: config.tuning,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            recipe: Recipe::default(),
            phase: RecipePhase::Idle,
            regeneration: None,
            completed: 0,
        }
    }

    /// Draws the first recipe and starts the round.
    pub fn begin(&mut self, catalog: &Catalog, out: &mut Vec<Command>) -> Result<(), RecipeError> {
        self.generate(catalog, out)
    }

    /// Installs an explicit recipe and starts the round, cancelling any pending regeneration.
    pub fn set_recipe(&mut self, entries: Vec<IngredientKind>, out: &mut Vec<Command>) {
        self.regeneration = None;
        self.start_round(Recipe::new(entries), out);
    }

    /// Consumes world events and emits score, heat, difficulty, and spawner commands.
    pub fn handle(&mut self, events: &[Event], catalog: &Catalog, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::IngredientCaught {
                    kind, score_value, ..
                } => {
                    let _ = self.on_ingredient_caught(kind, *score_value, out);
                }
                Event::TimeAdvanced { dt } => self.advance(*dt, catalog, out),
                _ => {}
            }
        }
    }

    /// Judges a catch against the remaining recipe.
    pub fn on_ingredient_caught(
        &mut self,
        kind: &IngredientKind,
        score_value: i32,
        out: &mut Vec<Command>,
    ) -> CatchOutcome {
        if !self.recipe.consume(kind) {
            log::debug!("wrong ingredient: {kind}");
            out.push(Command::AddHeat {
                amount: self.tuning.heat_per_wrong_ingredient,
            });
            return CatchOutcome::Rejected;
        }

        log::debug!("correct ingredient: {kind}");
        out.push(Command::AwardScore {
            points: score_value,
        });

        if !self.recipe.is_complete() {
            return CatchOutcome::Accepted;
        }

        self.complete(out);
        CatchOutcome::Completed
    }

    /// Advances the regeneration timer, drawing a new recipe when it fires.
    pub fn advance(&mut self, dt: Duration, catalog: &Catalog, out: &mut Vec<Command>) {
        let Some(remaining) = self.regeneration else {
            return;
        };

        let remaining = remaining.saturating_sub(dt);
        if !remaining.is_zero() {
            self.regeneration = Some(remaining);
            return;
        }

        self.regeneration = None;
        if let Err(error) = self.generate(catalog, out) {
            log::error!("could not draw a new recipe: {error}");
        }
    }

    /// Ingredients still required.
    #[must_use]
    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Current phase of the recipe cycle.
    #[must_use]
    pub const fn phase(&self) -> RecipePhase {
        self.phase
    }

    /// Time left before the next recipe is drawn, if one is pending.
    #[must_use]
    pub const fn pending_regeneration(&self) -> Option<Duration> {
        self.regeneration
    }

    /// Number of recipes finished since construction.
    #[must_use]
    pub const fn completed(&self) -> u32 {
        self.completed
    }

    fn complete(&mut self, out: &mut Vec<Command>) {
        self.completed = self.completed.saturating_add(1);
        self.phase = RecipePhase::Complete;
        log::info!("recipe complete, drawing a new one shortly");

        out.push(Command::SetSpawning { active: false });
        out.push(Command::AdvanceDifficulty);

        if self.regeneration.is_some() {
            log::debug!("replacing pending recipe regeneration");
        }
        self.regeneration = Some(
            Duration::try_from_secs_f32(self.tuning.regeneration_delay_secs)
                .unwrap_or(Duration::ZERO),
        );
    }

    fn generate(&mut self, catalog: &Catalog, out: &mut Vec<Command>) -> Result<(), RecipeError> {
        if self.tuning.recipe_length == 0 {
            return Err(RecipeError::ZeroLength);
        }
        if catalog.is_empty() {
            return Err(RecipeError::EmptyCatalog);
        }

        let mut entries = Vec::with_capacity(self.tuning.recipe_length);
        for _ in 0..self.tuning.recipe_length {
            let index = self.rng.gen_range(0..catalog.len());
            if let Some(definition) = catalog.get(index) {
                entries.push(definition.kind().clone());
            }
        }

        self.start_round(Recipe::new(entries), out);
        Ok(())
    }

    fn start_round(&mut self, recipe: Recipe, out: &mut Vec<Command>) {
        let listing: Vec<&str> = recipe
            .remaining()
            .iter()
            .map(IngredientKind::as_str)
            .collect();
        log::info!("new recipe: {}", listing.join(", "));

        self.recipe = recipe;
        self.phase = if self.recipe.is_complete() {
            RecipePhase::Complete
        } else {
            RecipePhase::Active
        };
        out.push(Command::SetHeat { value: 0.0 });
        out.push(Command::SetSpawning { active: true });
    }
}
