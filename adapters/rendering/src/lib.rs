#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Cauldron Catch adapters.

use anyhow::Result as AnyResult;
use cauldron_core::{IngredientId, IngredientKind};
use glam::Vec2;
use std::time::Duration;

/// Rotation around the Z axis as authored in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
    degrees: f32,
}

impl Rotation {
    /// Creates a rotation from an angle in degrees.
    #[must_use]
    pub const fn from_degrees(degrees: f32) -> Self {
        Self { degrees }
    }

    /// Angle in degrees.
    #[must_use]
    pub const fn degrees(&self) -> f32 {
        self.degrees
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Whether the sorter button is held down on this frame.
    pub sorter_held: bool,
}

/// Ingredient drawn at its current position.
#[derive(Clone, Debug, PartialEq)]
pub struct IngredientPresentation {
    /// Instance handle, stable while the ingredient is in play.
    pub id: IngredientId,
    /// Catalog identity used to pick the sprite.
    pub kind: IngredientKind,
    /// Current position in world units.
    pub position: Vec2,
}

/// Scene description combining the HUD texts, dials, and falling ingredients.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Text shown on the score display.
    pub score_text: String,
    /// Text shown on the recipe display.
    pub recipe_text: String,
    /// Rotation of the cauldron gauge needle.
    pub needle: Rotation,
    /// Rotation of the level arrow.
    pub level_arrow: Rotation,
    /// Rotation of the sorter arm.
    pub sorter_arm: Rotation,
    /// Origin of the spawner assembly.
    pub spawner_origin: Vec2,
    /// Ingredients currently falling.
    pub ingredients: Vec<IngredientPresentation>,
}

impl Scene {
    /// Reports whether the text displays differ between two scenes.
    #[must_use]
    pub fn hud_differs(&self, other: &Scene) -> bool {
        self.score_text != other.score_text || self.recipe_text != other.recipe_text
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window or printed header.
    pub window_title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Cauldron Catch scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and per-frame input captured by the adapter, and mutates the scene
    /// before it is presented. Returning `false` ends the run.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_keeps_authored_degrees() {
        assert_eq!(Rotation::from_degrees(-92.0).degrees(), -92.0);
        assert_eq!(Rotation::default().degrees(), 0.0);
    }

    #[test]
    fn hud_difference_ignores_dials() {
        let base = Scene {
            score_text: "10".into(),
            recipe_text: "Recipe:\n- Egg\n".into(),
            ..Scene::default()
        };
        let mut moved = base.clone();
        moved.needle = Rotation::from_degrees(12.0);
        assert!(!base.hud_differs(&moved));

        moved.score_text = "20".into();
        assert!(base.hud_differs(&moved));
    }
}
