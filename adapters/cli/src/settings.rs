//! Layered configuration: built-in defaults, an optional TOML file, then flags.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use crawl_core::{DEFAULT_REVEAL_RADIUS, GRID_COLUMNS, GRID_ROWS};
use crawl_system_turn::{Config, ReactionConfig, SpawningConfig};
use serde::Deserialize;

const DEFAULT_PILLAR_ONE_IN: u32 = 12;
const START_REGION_DIVISOR: u32 = 3;

/// Values accepted from a configuration file. Every key is optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    seed: Option<u64>,
    map: Option<PathBuf>,
    enemy_movement: Option<bool>,
    reveal_radius: Option<u32>,
    columns: Option<u32>,
    rows: Option<u32>,
    pillar_one_in: Option<u32>,
    spawn: SpawnSection,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
struct SpawnSection {
    chance_numerator: Option<u32>,
    chance_denominator: Option<u32>,
    enemy_budget: Option<usize>,
    separation: Option<u32>,
}

impl FileConfig {
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse configuration toml contents")
    }

    pub(crate) fn load(path: &std::path::Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration file {}", path.display()))?;
        Self::parse(&contents)
    }
}

/// Overrides taken from the command line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) map: Option<PathBuf>,
    pub(crate) enemy_movement: Option<bool>,
    pub(crate) reveal_radius: Option<u32>,
    pub(crate) columns: Option<u32>,
    pub(crate) rows: Option<u32>,
}

/// Fully resolved settings for one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) seed: u64,
    pub(crate) map: Option<PathBuf>,
    pub(crate) enemy_movement: bool,
    pub(crate) reveal_radius: u32,
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) pillar_one_in: u32,
    spawning: SpawningConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,
            map: None,
            enemy_movement: false,
            reveal_radius: DEFAULT_REVEAL_RADIUS,
            columns: GRID_COLUMNS,
            rows: GRID_ROWS,
            pillar_one_in: DEFAULT_PILLAR_ONE_IN,
            spawning: SpawningConfig::default(),
        }
    }
}

impl Settings {
    /// Applies the file layer and then the command-line layer over the defaults.
    pub(crate) fn resolve(file: FileConfig, overrides: Overrides) -> Self {
        let defaults = Self::default();
        let spawn = file.spawn;
        let (numerator, denominator) = defaults.spawning.spawn_chance();
        let spawning = SpawningConfig::new(
            spawn.chance_numerator.unwrap_or(numerator),
            spawn.chance_denominator.unwrap_or(denominator),
            spawn.enemy_budget.unwrap_or(defaults.spawning.enemy_budget()),
            spawn.separation.unwrap_or(defaults.spawning.separation()),
            START_REGION_DIVISOR,
        );

        Self {
            seed: overrides.seed.or(file.seed).unwrap_or(defaults.seed),
            map: overrides.map.or(file.map),
            enemy_movement: overrides
                .enemy_movement
                .or(file.enemy_movement)
                .unwrap_or(defaults.enemy_movement),
            reveal_radius: overrides
                .reveal_radius
                .or(file.reveal_radius)
                .unwrap_or(defaults.reveal_radius),
            columns: overrides.columns.or(file.columns).unwrap_or(defaults.columns),
            rows: overrides.rows.or(file.rows).unwrap_or(defaults.rows),
            pillar_one_in: file.pillar_one_in.unwrap_or(defaults.pillar_one_in),
            spawning,
        }
    }

    /// Turn controller configuration for a layout of the given size.
    pub(crate) fn turn_config(&self, columns: u32, rows: u32) -> Config {
        Config::new(self.seed)
            .with_dimensions(columns, rows)
            .with_reveal_radius(self.reveal_radius)
            .with_spawning(self.spawning)
            .with_reaction(ReactionConfig::new(self.enemy_movement))
    }
}
