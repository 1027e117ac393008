//! Difficulty-tiered spawn tables with per-entry weights.

use cauldron_core::{Catalog, Difficulty, IngredientKind};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ingredient paired with its relative spawn weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightedEntry {
    /// Ingredient produced when the entry is drawn.
    pub kind: IngredientKind,
    /// Relative likelihood of the entry within its tier.
    pub weight: f32,
}

impl WeightedEntry {
    /// Creates a new weighted entry.
    #[must_use]
    pub fn new(kind: impl Into<IngredientKind>, weight: f32) -> Self {
        Self {
            kind: kind.into(),
            weight,
        }
    }
}

/// Bucket of ingredients selectable at one difficulty level.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tier {
    /// Entries in draw order.
    pub entries: Vec<WeightedEntry>,
}

impl Tier {
    /// Creates a tier from the provided entries.
    #[must_use]
    pub fn new(entries: Vec<WeightedEntry>) -> Self {
        Self { entries }
    }

    /// Sum of all entry weights.
    #[must_use]
    pub fn total_weight(&self) -> f32 {
        self.entries.iter().map(|entry| entry.weight).sum()
    }

    /// Draws one entry with probability proportional to its weight.
    ///
    /// A tier whose weights sum to zero, or to no finite number, always
    /// yields its first entry. Returns `None` only when the tier is empty.
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&WeightedEntry> {
        let first = self.entries.first()?;
        let total = self.total_weight();
        if !total.is_finite() || total <= 0.0 {
            return Some(first);
        }
        self.select_with(rng.gen_range(0.0..total))
    }

    /// Resolves a draw in `0.0..total_weight()` to an entry.
    ///
    /// Walks the entries subtracting weights and returns the first one whose
    /// weight reaches the remaining draw, so a draw landing exactly on a
    /// boundary belongs to the earlier entry. Entries without positive weight
    /// are never drawn, not even by a draw of exactly zero.
    #[must_use]
    pub fn select_with(&self, draw: f32) -> Option<&WeightedEntry> {
        let mut remainder = draw;
        for entry in self.entries.iter().filter(|entry| entry.weight > 0.0) {
            if remainder <= entry.weight {
                return Some(entry);
            }
            remainder -= entry.weight;
        }
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.weight > 0.0)
            .or_else(|| self.entries.first())
    }
}

/// Per-level spawn tables indexed by difficulty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightedIngredientTable {
    tiers: Vec<Tier>,
}

impl WeightedIngredientTable {
    /// Creates a table without validating it.
    ///
    /// Empty tables and tiers are accepted here and surface as a fatal
    /// configuration error the first time the spawner draws from them.
    #[must_use]
    pub fn new(tiers: Vec<Tier>) -> Self {
        Self { tiers }
    }

    /// Creates a single-tier table in which every ingredient is equally likely.
    #[must_use]
    pub fn uniform<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = IngredientKind>,
    {
        let entries = kinds
            .into_iter()
            .map(|kind| WeightedEntry { kind, weight: 1.0 })
            .collect();
        Self::new(vec![Tier::new(entries)])
    }

    /// Creates a table after checking it against the ingredient catalog.
    pub fn validated(tiers: Vec<Tier>, catalog: &Catalog) -> Result<Self, TableError> {
        if tiers.is_empty() {
            return Err(TableError::NoTiers);
        }

        for (level, tier) in tiers.iter().enumerate() {
            if tier.entries.is_empty() {
                return Err(TableError::EmptyTier { level });
            }
            for entry in &tier.entries {
                if !entry.weight.is_finite() || entry.weight < 0.0 {
                    return Err(TableError::InvalidWeight {
                        level,
                        kind: entry.kind.clone(),
                        weight: entry.weight,
                    });
                }
                if catalog.find(&entry.kind).is_none() {
                    return Err(TableError::UnknownIngredient {
                        level,
                        kind: entry.kind.clone(),
                    });
                }
            }
            if !tier.total_weight().is_finite() {
                return Err(TableError::UnboundedTier { level });
            }
        }

        Ok(Self { tiers })
    }

    /// Number of difficulty tiers.
    #[must_use]
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Retrieves the tier stored at `level`.
    #[must_use]
    pub fn tier(&self, level: usize) -> Option<&Tier> {
        self.tiers.get(level)
    }

    /// Tier selected for a difficulty: `floor(d * tier_count)`, clamped to the last tier.
    #[must_use]
    pub fn tier_index(&self, difficulty: Difficulty) -> usize {
        let count = self.tiers.len();
        if count == 0 {
            return 0;
        }
        let scaled = (difficulty.get() * count as f32).floor() as usize;
        scaled.min(count - 1)
    }
}

/// Problems detected while validating a spawn table.
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    /// The table contains no tiers at all.
    #[error("spawn table has no tiers")]
    NoTiers,
    /// A tier contains no entries.
    #[error("spawn tier {level} has no ingredients")]
    EmptyTier {
        /// Index of the offending tier.
        level: usize,
    },
    /// An entry carries a negative, infinite, or non-numeric weight.
    #[error("spawn tier {level} gives {kind} invalid weight {weight}")]
    InvalidWeight {
        /// Index of the offending tier.
        level: usize,
        /// Ingredient carrying the weight.
        kind: IngredientKind,
        /// Rejected weight.
        weight: f32,
    },
    /// The weights of a tier sum past the largest representable value.
    #[error("spawn tier {level} has weights that do not sum to a finite total")]
    UnboundedTier {
        /// Index of the offending tier.
        level: usize,
    },
    /// An entry names an ingredient missing from the catalog.
    #[error("spawn tier {level} references unknown ingredient {kind}")]
    UnknownIngredient {
        /// Index of the offending tier.
        level: usize,
        /// Unknown ingredient identity.
        kind: IngredientKind,
    },
}
