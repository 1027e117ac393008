#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Cauldron Catch engine.
//!
//! This crate defines the message surface that connects the host adapter,
//! the authoritative world, and pure systems. Hosts submit [`Command`] values
//! describing desired mutations (time passing, contacts detected by the
//! physics engine, sorter toggles), the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Cauldron Catch.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a new ingredient instance enters play.
    SpawnIngredient {
        /// Catalog identity of the ingredient to create.
        kind: IngredientKind,
        /// World-space point at which the ingredient appears.
        position: Vec2,
        /// Gravity scale applied to the ingredient while it falls.
        fall_speed: f32,
    },
    /// Reports that a live ingredient touched one of the boundary detectors.
    ResolveContact {
        /// Instance that touched the detector.
        ingredient: IngredientId,
        /// Detector that registered the contact.
        receiver: Receiver,
    },
    /// Adds points to the running score.
    AwardScore {
        /// Points to add. Negative values subtract.
        points: i32,
    },
    /// Accumulates heat on the cauldron gauge.
    AddHeat {
        /// Heat delta, clamped into the gauge range after accumulation.
        amount: f32,
    },
    /// Replaces the cauldron heat with an explicit value.
    SetHeat {
        /// Desired heat, clamped into `0.0..=1.0`.
        value: f32,
    },
    /// Records one more completed recipe and recomputes difficulty.
    AdvanceDifficulty,
    /// Starts or stops ingredient production.
    SetSpawning {
        /// Whether the spawner should run.
        active: bool,
    },
    /// Moves the sorter arm into its active or resting position.
    SetSorterArm {
        /// `true` for the active (flipper) position.
        active: bool,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an ingredient instance entered play.
    IngredientSpawned {
        /// Handle allocated to the new instance.
        ingredient: IngredientId,
        /// Catalog identity of the instance.
        kind: IngredientKind,
        /// Point at which the instance appeared.
        position: Vec2,
        /// Gravity scale assigned to the instance.
        fall_speed: f32,
    },
    /// Reports that a spawn request named an ingredient missing from the catalog.
    SpawnRejected {
        /// Identity that failed the catalog lookup.
        kind: IngredientKind,
    },
    /// Confirms that the cauldron consumed an ingredient.
    IngredientCaught {
        /// Instance that was consumed and destroyed.
        ingredient: IngredientId,
        /// Catalog identity of the consumed instance.
        kind: IngredientKind,
        /// Points the ingredient is worth when it matches the recipe.
        score_value: i32,
    },
    /// Confirms that the trash pipe consumed an ingredient.
    IngredientDiscarded {
        /// Instance that was consumed and destroyed.
        ingredient: IngredientId,
        /// Catalog identity of the consumed instance.
        kind: IngredientKind,
    },
    /// Announces the running score after a change.
    ScoreChanged {
        /// Total accumulated score.
        score: i64,
    },
    /// Announces the cauldron heat after a change.
    HeatChanged {
        /// Normalized heat in `0.0..=1.0`.
        heat: f32,
        /// Gauge needle rotation around the Z axis, in degrees.
        needle_angle: f32,
    },
    /// Announces a new difficulty level.
    DifficultyChanged {
        /// Normalized difficulty.
        difficulty: Difficulty,
        /// Number of recipes completed so far.
        recipes_completed: u32,
        /// Level arrow rotation around the Z axis, in degrees.
        arrow_angle: f32,
    },
    /// Announces that ingredient production was started or stopped.
    SpawningChanged {
        /// Whether the spawner should now be producing.
        active: bool,
    },
    /// Announces that the sorter arm moved.
    SorterArmMoved {
        /// Whether the arm now rests in its active position.
        active: bool,
        /// Arm rotation around the Z axis, in degrees.
        angle: f32,
    },
}

/// Boundary detectors that can consume a falling ingredient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Receiver {
    /// The cauldron, which forwards the ingredient to the recipe.
    Cauldron,
    /// The trash pipe, which discards the ingredient unconditionally.
    TrashPipe,
}

/// Catalog identity of an ingredient, such as `"Egg"` or `"Mushroom"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientKind(String);

impl IngredientKind {
    /// Creates a new ingredient identity.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IngredientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IngredientKind {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Unique identifier assigned to a live ingredient instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IngredientId(u32);

impl IngredientId {
    /// Creates a new ingredient identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Normalized progression scalar in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Difficulty(f32);

impl Difficulty {
    /// Lowest difficulty, used before any recipe has been completed.
    pub const MIN: Self = Self(0.0);

    /// Highest difficulty.
    pub const MAX: Self = Self(1.0);

    /// Creates a difficulty, clamping the value into `0.0..=1.0`.
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(clamp01(value))
    }

    /// Derives difficulty from recipe progress.
    ///
    /// A zero `recipes_to_max_level` means the game starts at full difficulty.
    #[must_use]
    pub fn from_progress(recipes_completed: u32, recipes_to_max_level: u32) -> Self {
        if recipes_to_max_level == 0 {
            return Self::MAX;
        }
        Self::new(recipes_completed as f32 / recipes_to_max_level as f32)
    }

    /// Retrieves the normalized value.
    #[must_use]
    pub const fn get(&self) -> f32 {
        self.0
    }
}

/// Static description of an ingredient the game knows how to spawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngredientDefinition {
    kind: IngredientKind,
    score_value: i32,
}

impl IngredientDefinition {
    /// Creates a new ingredient definition.
    #[must_use]
    pub fn new(kind: impl Into<IngredientKind>, score_value: i32) -> Self {
        Self {
            kind: kind.into(),
            score_value,
        }
    }

    /// Identity of the ingredient.
    #[must_use]
    pub fn kind(&self) -> &IngredientKind {
        &self.kind
    }

    /// Points awarded when the ingredient is needed by the recipe.
    #[must_use]
    pub const fn score_value(&self) -> i32 {
        self.score_value
    }
}

/// Every ingredient that may appear in recipes or be spawned.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    definitions: Vec<IngredientDefinition>,
}

impl Catalog {
    /// Creates a catalog from the provided definitions, preserving order.
    #[must_use]
    pub fn new(definitions: Vec<IngredientDefinition>) -> Self {
        Self { definitions }
    }

    /// Looks up a definition by identity.
    #[must_use]
    pub fn find(&self, kind: &IngredientKind) -> Option<&IngredientDefinition> {
        self.definitions
            .iter()
            .find(|definition| definition.kind() == kind)
    }

    /// Retrieves the definition stored at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&IngredientDefinition> {
        self.definitions.get(index)
    }

    /// Iterator over the definitions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &IngredientDefinition> {
        self.definitions.iter()
    }

    /// Number of definitions in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Reports whether the catalog has no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Immutable representation of a live ingredient used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct IngredientSnapshot {
    /// Handle assigned to the instance.
    pub id: IngredientId,
    /// Catalog identity of the instance.
    pub kind: IngredientKind,
    /// Points the instance is worth.
    pub score_value: i32,
    /// Gravity scale assigned at spawn.
    pub fall_speed: f32,
    /// Point at which the instance appeared.
    pub spawn_position: Vec2,
}

/// Read-only snapshot describing all live ingredients.
#[derive(Clone, Debug, Default)]
pub struct IngredientView {
    snapshots: Vec<IngredientSnapshot>,
}

impl IngredientView {
    /// Creates a new view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<IngredientSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &IngredientSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<IngredientSnapshot> {
        self.snapshots
    }
}

/// Clamps `value` into `0.0..=1.0`. NaN maps to zero.
#[must_use]
pub fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Linearly interpolates between `from` and `to`.
///
/// `t` is clamped into `0.0..=1.0`, so the result never leaves the segment.
#[must_use]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * clamp01(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_hits_both_endpoints() {
        assert_eq!(lerp(2.0, 0.5, 0.0), 2.0);
        assert_eq!(lerp(2.0, 0.5, 1.0), 0.5);
        assert!((lerp(2.0, 0.5, 0.5) - 1.25).abs() < f32::EPSILON);
    }

    #[test]
    fn lerp_clamps_parameter() {
        assert_eq!(lerp(65.0, -92.0, 3.0), -92.0);
        assert_eq!(lerp(65.0, -92.0, -1.0), 65.0);
    }

    #[test]
    fn clamp01_rejects_nan() {
        assert_eq!(clamp01(f32::NAN), 0.0);
        assert_eq!(clamp01(1.5), 1.0);
    }

    #[test]
    fn difficulty_from_progress_is_clamped() {
        assert_eq!(Difficulty::from_progress(0, 10).get(), 0.0);
        assert!((Difficulty::from_progress(3, 10).get() - 0.3).abs() < 1e-6);
        assert_eq!(Difficulty::from_progress(25, 10), Difficulty::MAX);
    }

    #[test]
    fn difficulty_with_zero_levels_is_maximal() {
        assert_eq!(Difficulty::from_progress(0, 0), Difficulty::MAX);
    }

    #[test]
    fn catalog_finds_definitions_by_kind() {
        let catalog = Catalog::new(vec![
            IngredientDefinition::new("Egg", 10),
            IngredientDefinition::new("Fish", 20),
        ]);

        let fish = catalog.find(&IngredientKind::from("Fish")).expect("fish");
        assert_eq!(fish.score_value(), 20);
        assert!(catalog.find(&IngredientKind::from("Frog")).is_none());
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn catalog_deserializes_from_toml_array() {
        #[derive(Deserialize)]
        struct Wrapper {
            catalog: Catalog,
        }

        let source = r#"
            [[catalog]]
            kind = "Egg"
            score_value = 10

            [[catalog]]
            kind = "Mushroom"
            score_value = 15
        "#;
        let wrapper: Wrapper = toml::from_str(source).expect("parse catalog");

        assert_eq!(wrapper.catalog.len(), 2);
        let first = wrapper.catalog.get(0).expect("first entry");
        assert_eq!(first.kind().as_str(), "Egg");
        assert_eq!(first.score_value(), 10);
    }
}
