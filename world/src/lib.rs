#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Crawl.
//!
//! The [`World`] owns the tile [`Grid`] and the [`EntityStore`] and keeps the
//! two in agreement about who stands where. All mutation flows through
//! [`apply`]; read access for systems and adapters lives in [`query`].

mod combat;
mod entities;
mod grid;
mod progression;
mod visibility;

use crawl_core::{
    AttackOutcome, CellCoord, Command, Direction, EnemyId, Event, Occupant, SpawnPlan, StepDelta,
};

pub use entities::{Enemy, EntityStore, Player};
pub use grid::{Grid, Tile};

/// Represents the authoritative dungeon floor.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
    entities: EntityStore,
    deaths: u32,
}

impl World {
    /// Builds a world from a spawn plan.
    ///
    /// Enemies whose tile is not walkable when they are placed (a wall, or a
    /// tile already taken) are dropped so the grid and the entity store never
    /// disagree.
    #[must_use]
    pub fn from_plan(plan: &SpawnPlan) -> Self {
        let mut grid = Grid::from_mask(&plan.mask);
        let player_cell = grid.clamp(
            i64::from(plan.player.column()),
            i64::from(plan.player.row()),
        );
        let mut entities = EntityStore::new(Player::spawn(player_cell, plan.player_stats));
        grid.set_occupant(player_cell, Some(Occupant::Player));

        for spawn in &plan.enemies {
            let in_bounds =
                spawn.cell.column() < grid.columns() && spawn.cell.row() < grid.rows();
            if !in_bounds || !grid.is_walkable(spawn.cell) || !entities.insert_enemy(spawn) {
                tracing::warn!(
                    enemy = spawn.id.get(),
                    cell = ?spawn.cell,
                    "dropped enemy spawn on an unavailable tile"
                );
                continue;
            }
            grid.set_occupant(spawn.cell, Some(Occupant::Enemy(spawn.id)));
        }

        Self {
            grid,
            entities,
            deaths: 0,
        }
    }

    fn move_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let from = self.entities.player().cell();
        let to = self.target_of(from, direction.delta());

        if !self.grid.is_walkable(to) {
            tracing::debug!(?direction, ?to, "player step rejected");
            out_events.push(Event::PlayerMoveRejected {
                direction,
                target: to,
            });
            return;
        }

        self.grid.set_occupant(from, None);
        self.grid.set_occupant(to, Some(Occupant::Player));
        self.entities.player_mut().cell = to;
        tracing::debug!(?from, ?to, "player moved");
        out_events.push(Event::PlayerMoved { from, to });
    }

    fn attack(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let from = self.entities.player().cell();
        let target = self.target_of(from, direction.delta());

        let Some(Occupant::Enemy(enemy)) = self.grid.occupant(target) else {
            out_events.push(Event::AttackMissed { target });
            return;
        };

        let outcome = combat::resolve_attack(&mut self.grid, &mut self.entities, enemy, out_events);
        if outcome == Some(AttackOutcome::PlayerDied) {
            self.deaths = self.deaths.saturating_add(1);
        }
    }

    fn step_enemy(&mut self, enemy: EnemyId, delta: StepDelta, out_events: &mut Vec<Event>) {
        let Some(from) = self.entities.enemy(enemy).map(Enemy::cell) else {
            tracing::debug!(enemy = enemy.get(), "step requested for missing enemy");
            return;
        };
        let to = self.target_of(from, delta);
        if to == from {
            return;
        }

        if !self.grid.is_walkable(to) {
            tracing::debug!(enemy = enemy.get(), ?from, ?to, "enemy step rejected");
            out_events.push(Event::EnemyStepRejected { enemy, from, to });
            return;
        }

        self.grid.set_occupant(from, None);
        self.grid.set_occupant(to, Some(Occupant::Enemy(enemy)));
        if let Some(record) = self.entities.enemy_mut(enemy) {
            record.cell = to;
        }
        out_events.push(Event::EnemyMoved { enemy, from, to });
    }

    fn target_of(&self, from: CellCoord, delta: StepDelta) -> CellCoord {
        from.offset_clamped(delta, self.grid.columns(), self.grid.rows())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Populate { plan } => {
            let deaths = world.deaths;
            *world = World::from_plan(&plan);
            world.deaths = deaths;
            let player = world.entities.player().cell();
            let enemies = world.entities.enemy_count();
            tracing::info!(?player, enemies, "world populated");
            out_events.push(Event::WorldPopulated { player, enemies });
        }
        Command::MovePlayer { direction } => world.move_player(direction, out_events),
        Command::Attack { direction } => world.attack(direction, out_events),
        Command::StepEnemy { enemy, delta } => world.step_enemy(enemy, delta, out_events),
        Command::Reveal { center, radius } => {
            let newly_revealed = visibility::reveal(&mut world.grid, center, radius);
            tracing::debug!(?center, radius, newly_revealed, "tiles revealed");
            out_events.push(Event::TilesRevealed {
                center,
                newly_revealed,
            });
        }
    }
}

/// Disagreement between the grid and the entity store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A wall tile holds an occupant.
    WallOccupied {
        /// Offending tile.
        cell: CellCoord,
    },
    /// A tile references an entity whose stored position is elsewhere or that does not exist.
    StaleOccupant {
        /// Offending tile.
        cell: CellCoord,
        /// Occupant recorded on the tile.
        occupant: Occupant,
    },
    /// An entity's stored position does not reference it back.
    UnlistedEntity {
        /// Entity whose tile disagrees.
        occupant: Occupant,
        /// Position stored for the entity.
        cell: CellCoord,
    },
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use crawl_core::{CellCoord, EnemyView, Occupant, Terrain};

    use super::{EntityStore, Grid, InvariantViolation, Player, World};

    /// Provides read-only access to the tile grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Provides read-only access to the entity store.
    #[must_use]
    pub fn entities(world: &World) -> &EntityStore {
        &world.entities
    }

    /// Provides read-only access to the player.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        world.entities.player()
    }

    /// Captures a read-only view of the living enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.entities.enemies().map(|enemy| enemy.snapshot()).collect())
    }

    /// Number of times the player died in this session.
    #[must_use]
    pub fn deaths(world: &World) -> u32 {
        world.deaths
    }

    /// Cells revealed so far, in row-major order.
    #[must_use]
    pub fn revealed_cells(world: &World) -> Vec<CellCoord> {
        world
            .grid
            .iter()
            .filter(|(_, tile)| tile.is_revealed())
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Lists every disagreement between the grid and the entity store.
    ///
    /// An empty result means each occupied tile references an entity stored
    /// at that exact tile, every entity is referenced by its tile, and no wall
    /// holds an occupant.
    #[must_use]
    pub fn check_invariants(world: &World) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();

        for (cell, tile) in world.grid.iter() {
            let Some(occupant) = tile.occupant() else {
                continue;
            };
            if tile.terrain() == Terrain::Wall {
                violations.push(InvariantViolation::WallOccupied { cell });
            }
            let stored = match occupant {
                Occupant::Player => Some(world.entities.player().cell()),
                Occupant::Enemy(id) => world.entities.enemy(id).map(|enemy| enemy.cell()),
            };
            if stored != Some(cell) {
                violations.push(InvariantViolation::StaleOccupant { cell, occupant });
            }
        }

        let player_cell = world.entities.player().cell();
        if world.grid.occupant(player_cell) != Some(Occupant::Player) {
            violations.push(InvariantViolation::UnlistedEntity {
                occupant: Occupant::Player,
                cell: player_cell,
            });
        }
        for enemy in world.entities.enemies() {
            let occupant = Occupant::Enemy(enemy.id());
            if world.grid.occupant(enemy.cell()) != Some(occupant) {
                violations.push(InvariantViolation::UnlistedEntity {
                    occupant,
                    cell: enemy.cell(),
                });
            }
        }

        violations
    }
}
