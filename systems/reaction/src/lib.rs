#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Local reactive system that proposes one-tile enemy steps.
//!
//! Each decision looks only at the four cardinal neighbours of the enemy's
//! tile. The system never mutates the world; it answers with a
//! [`StepDelta`] or a [`Command::StepEnemy`] for the caller to apply.

use crawl_core::{CellCoord, Command, EnemySnapshot, StepDelta};
use crawl_world::Grid;

/// Configuration parameters required to construct the reaction system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    enabled: bool,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// A disabled system answers every decision with [`StepDelta::ZERO`].
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Reports whether enemies are allowed to move.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }
}

/// Freedom of the four cardinal neighbours around an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Proposals {
    /// Neighbour at `column + 1` is free.
    pub right: bool,
    /// Neighbour at `column - 1` is free.
    pub left: bool,
    /// Neighbour at `row + 1` is free.
    pub down: bool,
    /// Neighbour at `row - 1` is free.
    pub up: bool,
}

impl Proposals {
    /// Inspects the neighbours of `cell`.
    ///
    /// A neighbour is blocked when it is a wall or holds any occupant. At the
    /// grid border the clamped neighbour is the tile itself, which is occupied
    /// by the enemy being decided, so the move is blocked.
    #[must_use]
    pub fn survey(cell: CellCoord, grid: &Grid) -> Self {
        let column = i64::from(cell.column());
        let row = i64::from(cell.row());
        let free = |dx: i64, dy: i64| grid.tile_at(column + dx, row + dy).is_walkable();
        Self {
            right: free(1, 0),
            left: free(-1, 0),
            down: free(0, 1),
            up: free(0, -1),
        }
    }

    /// Folds the freedoms into a delta. Each axis is decided independently,
    /// preferring the positive direction, so the result may be diagonal.
    #[must_use]
    pub const fn delta(self) -> StepDelta {
        let dx = if self.right {
            1
        } else if self.left {
            -1
        } else {
            0
        };
        let dy = if self.down {
            1
        } else if self.up {
            -1
        } else {
            0
        };
        StepDelta::new(dx, dy)
    }
}

/// Pure system that decides enemy steps from immediate neighbour occupancy.
#[derive(Debug, Default)]
pub struct LocalReaction {
    config: Config,
}

impl LocalReaction {
    /// Creates a new reaction system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Configuration the system was created with.
    #[must_use]
    pub const fn config(&self) -> Config {
        self.config
    }

    /// Computes the step `enemy` would like to take on `grid`.
    #[must_use]
    pub fn decide(&self, enemy: &EnemySnapshot, grid: &Grid) -> StepDelta {
        if !self.config.enabled {
            return StepDelta::ZERO;
        }
        let delta = Proposals::survey(enemy.cell, grid).delta();
        tracing::trace!(enemy = enemy.id.get(), ?delta, "reaction decided");
        delta
    }

    /// Emits a step command for `enemy` unless it stays put.
    pub fn handle(&self, enemy: &EnemySnapshot, grid: &Grid, out: &mut Vec<Command>) {
        let delta = self.decide(enemy, grid);
        if delta.is_zero() {
            return;
        }
        out.push(Command::StepEnemy {
            enemy: enemy.id,
            delta,
        });
    }
}
