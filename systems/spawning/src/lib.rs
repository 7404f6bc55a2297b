#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawn planner that turns a wall mask into the initial dungeon population.

use crawl_core::{
    CellCoord, CombatStats, EnemyId, EnemySpawn, EnemyVariant, SpawnPlan, WallMask,
};
use rand::Rng;
use thiserror::Error;

/// Configuration parameters required to construct the spawn planner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    spawn_numerator: u32,
    spawn_denominator: u32,
    enemy_budget: usize,
    separation: u32,
    start_region_divisor: u32,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// Each eligible floor cell spawns an enemy with probability
    /// `spawn_numerator / spawn_denominator`. No two enemies are placed within
    /// `separation` tiles (Chebyshev) of each other, and at most `enemy_budget`
    /// enemies are placed. The player starts on the first floor cell whose
    /// row and column both exceed the grid extent divided by
    /// `start_region_divisor`.
    #[must_use]
    pub const fn new(
        spawn_numerator: u32,
        spawn_denominator: u32,
        enemy_budget: usize,
        separation: u32,
        start_region_divisor: u32,
    ) -> Self {
        Self {
            spawn_numerator,
            spawn_denominator,
            enemy_budget,
            separation,
            start_region_divisor,
        }
    }

    /// Spawn probability per eligible cell as `(numerator, denominator)`.
    #[must_use]
    pub const fn spawn_chance(&self) -> (u32, u32) {
        (self.spawn_numerator, self.spawn_denominator)
    }

    /// Maximum number of enemies placed per plan.
    #[must_use]
    pub const fn enemy_budget(&self) -> usize {
        self.enemy_budget
    }

    /// Chebyshev distance every pair of enemies must exceed.
    #[must_use]
    pub const fn separation(&self) -> u32 {
        self.separation
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(1, 8, 150, 3, 3)
    }
}

/// Failures raised while planning a population.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpawnError {
    /// No floor cell satisfied the player start region.
    #[error("no floor cell in the start region of the {columns}x{rows} layout")]
    NoPlayerStart {
        /// Layout width.
        columns: u32,
        /// Layout height.
        rows: u32,
    },
}

/// Stateful planner issuing session-unique enemy identifiers.
#[derive(Debug)]
pub struct SpawnPlanner {
    config: Config,
    next_enemy_id: u32,
}

impl SpawnPlanner {
    /// Creates a new spawn planner using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            config,
            next_enemy_id: 0,
        }
    }

    /// Scans the mask in row-major order and places the player and enemies.
    ///
    /// All random draws come from `rng`, so a seeded generator yields the same
    /// plan for the same mask. Identifiers keep increasing across calls.
    pub fn plan<R>(&mut self, mask: WallMask, rng: &mut R) -> Result<SpawnPlan, SpawnError>
    where
        R: Rng + ?Sized,
    {
        let divisor = self.config.start_region_divisor.max(1);
        let min_column = mask.columns() / divisor;
        let min_row = mask.rows() / divisor;

        let mut player: Option<CellCoord> = None;
        let mut enemies: Vec<EnemySpawn> = Vec::new();

        for (cell, wall) in mask.iter() {
            if wall {
                continue;
            }

            if player.is_none() && cell.row() > min_row && cell.column() > min_column {
                player = Some(cell);
                continue;
            }

            if enemies.len() >= self.config.enemy_budget || !self.roll_spawn(rng) {
                continue;
            }

            if self.is_crowded(cell, &enemies) {
                continue;
            }

            let variant = EnemyVariant::from_roll(rng.gen_range(0..EnemyVariant::ROLL_SIDES));
            let id = self.allocate_id();
            enemies.push(EnemySpawn::from_variant(id, variant, cell));
        }

        let Some(player) = player else {
            tracing::warn!(
                columns = mask.columns(),
                rows = mask.rows(),
                "layout has no player start"
            );
            return Err(SpawnError::NoPlayerStart {
                columns: mask.columns(),
                rows: mask.rows(),
            });
        };

        tracing::info!(?player, enemies = enemies.len(), "spawn plan ready");
        Ok(SpawnPlan {
            mask,
            player,
            player_stats: CombatStats::starting_player(),
            enemies,
        })
    }

    fn roll_spawn<R>(&self, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        if self.config.spawn_denominator == 0 {
            return false;
        }
        rng.gen_range(0..self.config.spawn_denominator) < self.config.spawn_numerator
    }

    fn is_crowded(&self, cell: CellCoord, enemies: &[EnemySpawn]) -> bool {
        enemies
            .iter()
            .any(|enemy| enemy.cell.chebyshev_distance(cell) <= self.config.separation)
    }

    fn allocate_id(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        id
    }
}

impl Default for SpawnPlanner {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
