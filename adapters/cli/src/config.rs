//! TOML-backed game configuration.

use std::{collections::HashSet, fs, path::Path};

use cauldron_core::{Catalog, IngredientDefinition, IngredientKind};
use cauldron_instruments::{CauldronGauge, DialRange, LevelArrow, SorterPositions};
use cauldron_system_recipe::RecipeTuning;
use cauldron_system_spawning::{
    SpawnerTuning, TableError, Tier, WeightedEntry, WeightedIngredientTable,
};
use serde::Deserialize;
use thiserror::Error;

/// Every tunable of a session, as authored in the configuration file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) spawner: SpawnerTuning,
    pub(crate) recipe: RecipeTuning,
    pub(crate) progression: ProgressionConfig,
    pub(crate) gauge: DialRange,
    pub(crate) level_arrow: DialRange,
    pub(crate) sorter: SorterPositions,
    pub(crate) host: HostConfig,
    pub(crate) catalog: Catalog,
    pub(crate) tiers: Vec<Tier>,
}

/// Difficulty progression settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ProgressionConfig {
    pub(crate) recipes_to_max_level: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            recipes_to_max_level: 10,
        }
    }
}

/// Stand-in physics used by the headless host.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct HostConfig {
    /// Downward acceleration applied to an ingredient with fall speed 1.
    pub(crate) base_gravity: f32,
    /// Height at which falling ingredients reach the sorter and cauldron.
    pub(crate) cauldron_y: f32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            base_gravity: 9.81,
            cauldron_y: -4.0,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            spawner: SpawnerTuning::default(),
            recipe: RecipeTuning::default(),
            progression: ProgressionConfig::default(),
            gauge: CauldronGauge::DEFAULT_RANGE,
            level_arrow: LevelArrow::DEFAULT_RANGE,
            sorter: SorterPositions::default(),
            host: HostConfig::default(),
            catalog: default_catalog(),
            tiers: default_tiers(),
        }
    }
}

impl GameConfig {
    /// Loads a configuration file, falling back to defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                Self::parse(&contents)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration text without validating it.
    pub(crate) fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Checks cross-field invariants the type system cannot express.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }

        let mut seen = HashSet::new();
        for definition in self.catalog.iter() {
            if !seen.insert(definition.kind()) {
                return Err(ConfigError::DuplicateIngredient(definition.kind().clone()));
            }
        }

        if self.recipe.recipe_length == 0 {
            return Err(ConfigError::ZeroRecipeLength);
        }

        for (field, value) in [
            ("spawner.initial_interval_secs", self.spawner.initial_interval_secs),
            ("spawner.fastest_interval_secs", self.spawner.fastest_interval_secs),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositiveInterval { field, value });
            }
        }

        let _ = self.spawn_table()?;
        Ok(())
    }

    /// Builds the spawn table, defaulting to an even single tier over the catalog.
    pub(crate) fn spawn_table(&self) -> Result<WeightedIngredientTable, ConfigError> {
        if self.tiers.is_empty() {
            return Ok(WeightedIngredientTable::uniform(
                self.catalog.iter().map(|definition| definition.kind().clone()),
            ));
        }
        Ok(WeightedIngredientTable::validated(
            self.tiers.clone(),
            &self.catalog,
        )?)
    }
}

/// Reasons a configuration cannot be used.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read configuration file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),
    #[error("ingredient catalog is empty")]
    EmptyCatalog,
    #[error("ingredient {0} is listed more than once in the catalog")]
    DuplicateIngredient(IngredientKind),
    #[error("recipe.recipe_length must be at least one")]
    ZeroRecipeLength,
    #[error("{field} must be positive (received {value})")]
    NonPositiveInterval { field: &'static str, value: f32 },
    #[error(transparent)]
    Table(#[from] TableError),
}

fn default_catalog() -> Catalog {
    Catalog::new(vec![
        IngredientDefinition::new("Egg", 10),
        IngredientDefinition::new("Mushroom", 10),
        IngredientDefinition::new("Fish", 15),
        IngredientDefinition::new("Frog", 20),
        IngredientDefinition::new("Eye", 25),
    ])
}

fn default_tiers() -> Vec<Tier> {
    let tier = |weights: [f32; 5]| {
        Tier::new(
            ["Egg", "Mushroom", "Fish", "Frog", "Eye"]
                .into_iter()
                .zip(weights)
                .map(|(kind, weight)| WeightedEntry::new(kind, weight))
                .collect(),
        )
    };
    vec![
        tier([35.0, 30.0, 15.0, 10.0, 10.0]),
        tier([25.0, 25.0, 20.0, 15.0, 15.0]),
        tier([15.0, 15.0, 25.0, 20.0, 25.0]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../cauldron.toml");

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        config.validate().expect("defaults validate");
        assert_eq!(config.spawn_table().expect("table").tier_count(), 3);
    }

    #[test]
    fn sample_file_matches_defaults() {
        let config = GameConfig::parse(SAMPLE).expect("sample parses");
        config.validate().expect("sample validates");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = GameConfig::parse(
            r#"
            [recipe]
            recipe_length = 6
            "#,
        )
        .expect("partial file parses");

        assert_eq!(config.recipe.recipe_length, 6);
        assert_eq!(config.recipe.heat_per_wrong_ingredient, 0.25);
        assert_eq!(config.spawner, SpawnerTuning::default());
    }

    #[test]
    fn empty_tier_list_means_uniform_table() {
        let config = GameConfig {
            tiers: Vec::new(),
            ..GameConfig::default()
        };
        let table = config.spawn_table().expect("uniform table");
        assert_eq!(table.tier_count(), 1);
        assert_eq!(table.tier(0).map(|tier| tier.entries.len()), Some(5));
    }

    #[test]
    fn duplicate_catalog_entries_are_rejected() {
        let mut config = GameConfig::default();
        config.catalog = Catalog::new(vec![
            IngredientDefinition::new("Egg", 10),
            IngredientDefinition::new("Egg", 12),
        ]);
        config.tiers = Vec::new();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateIngredient(kind)) if kind.as_str() == "Egg"
        ));
    }

    #[test]
    fn tiers_must_reference_catalog() {
        let config = GameConfig::parse(
            r#"
            [[catalog]]
            kind = "Egg"
            score_value = 10

            [[tiers]]
            entries = [{ kind = "Dragon", weight = 1.0 }]
            "#,
        )
        .expect("parses");

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Table(TableError::UnknownIngredient { level: 0, .. }))
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        for source in [
            "spawn_rate = 3",
            "[spawner]\ninitial_intervall_secs = 9.0\n",
            "[recipe]\nlength = 3\n",
            "[gauge]\nmin_angle = 0.0\nmax_angle = 1.0\nmid_angle = 0.5\n",
            "[sorter]\nresting_angle = 0.0\nactive_angle = 45.0\nspeed = 2.0\n",
            "[[catalog]]\nkind = \"Egg\"\nscore_value = 1\nscore = 5\n",
            "[[tiers]]\nentries = [{ kind = \"Egg\", weight = 1.0, chance = 2.0 }]\n",
            "[[tiers]]\nlevel = 0\nentries = []\n",
        ] {
            assert!(
                matches!(GameConfig::parse(source), Err(ConfigError::Parse(_))),
                "accepted unknown key in {source:?}"
            );
        }
    }

    #[test]
    fn infinite_spawn_weight_is_rejected() {
        let config = GameConfig::parse(
            r#"
            [[catalog]]
            kind = "Egg"
            score_value = 10

            [[tiers]]
            entries = [{ kind = "Egg", weight = inf }]
            "#,
        )
        .expect("parses");

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Table(TableError::InvalidWeight { level: 0, .. }))
        ));
    }
}
