#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Dial-style instruments that turn normalized game values into rotations.
//!
//! Each instrument stores its current value together with the derived
//! rotation. Rotations are recomputed only when the value changes, so hosts
//! can copy [`CauldronGauge::needle_angle`] and friends onto their scene
//! graph whenever the world reports a change instead of polling every frame.

use cauldron_core::{clamp01, lerp};
use serde::{Deserialize, Serialize};

/// Rotation range swept by a dial, in degrees around the Z axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DialRange {
    /// Rotation shown for a value of zero.
    pub min_angle: f32,
    /// Rotation shown for a value of one.
    pub max_angle: f32,
}

impl DialRange {
    /// Creates a new dial range.
    #[must_use]
    pub const fn new(min_angle: f32, max_angle: f32) -> Self {
        Self {
            min_angle,
            max_angle,
        }
    }

    /// Maps a normalized value onto the dial.
    #[must_use]
    pub fn angle_for(&self, value: f32) -> f32 {
        lerp(self.min_angle, self.max_angle, clamp01(value))
    }
}

/// Heat gauge mounted on the cauldron.
#[derive(Clone, Debug)]
pub struct CauldronGauge {
    range: DialRange,
    heat: f32,
    needle_angle: f32,
}

impl CauldronGauge {
    /// Needle sweep used by the shipped cauldron artwork.
    pub const DEFAULT_RANGE: DialRange = DialRange::new(65.0, -92.0);

    /// Creates a cold gauge.
    #[must_use]
    pub fn new(range: DialRange) -> Self {
        Self {
            range,
            heat: 0.0,
            needle_angle: range.angle_for(0.0),
        }
    }

    /// Adds `delta` to the stored heat, clamping the result into `0.0..=1.0`.
    pub fn add_heat(&mut self, delta: f32) {
        self.set_heat(self.heat + delta);
    }

    /// Replaces the stored heat, clamping into `0.0..=1.0`.
    pub fn set_heat(&mut self, value: f32) {
        self.heat = clamp01(value);
        self.needle_angle = self.range.angle_for(self.heat);
    }

    /// Current normalized heat.
    #[must_use]
    pub const fn heat(&self) -> f32 {
        self.heat
    }

    /// Needle rotation in degrees.
    #[must_use]
    pub const fn needle_angle(&self) -> f32 {
        self.needle_angle
    }
}

impl Default for CauldronGauge {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RANGE)
    }
}

/// Arrow that points at the current difficulty level.
#[derive(Clone, Debug)]
pub struct LevelArrow {
    range: DialRange,
    value: f32,
    angle: f32,
}

impl LevelArrow {
    /// Sweep from the quarter-turn rest position up to a full turn.
    pub const DEFAULT_RANGE: DialRange = DialRange::new(270.0, 360.0);

    /// Creates an arrow resting at its minimum rotation.
    #[must_use]
    pub fn new(range: DialRange) -> Self {
        Self {
            range,
            value: 0.0,
            angle: range.angle_for(0.0),
        }
    }

    /// Points the arrow at a normalized value, clamped into `0.0..=1.0`.
    pub fn set_value(&mut self, value: f32) {
        self.value = clamp01(value);
        self.angle = self.range.angle_for(self.value);
    }

    /// Value the arrow currently points at.
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Arrow rotation in degrees.
    #[must_use]
    pub const fn angle(&self) -> f32 {
        self.angle
    }
}

impl Default for LevelArrow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RANGE)
    }
}

/// Fixed rotations of the sorter arm.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SorterPositions {
    /// Rotation while the arm rests.
    pub resting_angle: f32,
    /// Rotation while the arm flips ingredients towards the trash pipe.
    pub active_angle: f32,
}

impl Default for SorterPositions {
    fn default() -> Self {
        Self {
            resting_angle: 0.0,
            active_angle: 45.0,
        }
    }
}

/// Two-position arm that deflects ingredients away from the cauldron.
#[derive(Clone, Debug, Default)]
pub struct SorterController {
    positions: SorterPositions,
    active: bool,
}

impl SorterController {
    /// Creates a resting sorter arm.
    #[must_use]
    pub const fn new(positions: SorterPositions) -> Self {
        Self {
            positions,
            active: false,
        }
    }

    /// Snaps the arm into the active or resting position.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Whether the arm is in the active position.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Arm rotation in degrees.
    #[must_use]
    pub const fn angle(&self) -> f32 {
        if self.active {
            self.positions.active_angle
        } else {
            self.positions.resting_angle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_heat_never_exceeds_one() {
        let mut gauge = CauldronGauge::default();
        for _ in 0..10 {
            gauge.add_heat(0.25);
        }
        assert_eq!(gauge.heat(), 1.0);
        assert_eq!(gauge.needle_angle(), -92.0);

        gauge.add_heat(1_000.0);
        assert_eq!(gauge.heat(), 1.0);
    }

    #[test]
    fn accumulated_heat_matches_clamped_sum() {
        let mut gauge = CauldronGauge::default();
        let increments = [0.1, 0.2, 0.05];
        for delta in increments {
            gauge.add_heat(delta);
        }
        let expected: f32 = increments.iter().sum();
        assert!((gauge.heat() - expected).abs() < 1e-6);
    }

    #[test]
    fn set_heat_recomputes_needle() {
        let mut gauge = CauldronGauge::default();
        gauge.set_heat(0.5);
        assert!((gauge.needle_angle() - (65.0 - 157.0 / 2.0)).abs() < 1e-4);

        gauge.set_heat(-3.0);
        assert_eq!(gauge.heat(), 0.0);
        assert_eq!(gauge.needle_angle(), 65.0);
    }

    #[test]
    fn level_arrow_starts_at_minimum_and_clamps() {
        let mut arrow = LevelArrow::default();
        assert_eq!(arrow.angle(), 270.0);

        arrow.set_value(0.5);
        assert_eq!(arrow.angle(), 315.0);

        arrow.set_value(7.0);
        assert_eq!(arrow.value(), 1.0);
        assert_eq!(arrow.angle(), 360.0);
    }

    #[test]
    fn sorter_switches_between_fixed_angles() {
        let mut sorter = SorterController::default();
        assert_eq!(sorter.angle(), 0.0);

        sorter.set_active(true);
        assert!(sorter.is_active());
        assert_eq!(sorter.angle(), 45.0);

        sorter.set_active(false);
        assert_eq!(sorter.angle(), 0.0);
    }
}
