#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn controller that sequences one player intent into world commands.
//!
//! A cycle resolves the intent as a move or an attack, lets every surviving
//! enemy react in ascending identifier order, and refreshes visibility around
//! the player. Intents that neither move nor attack leave the world untouched.
//! When the player dies the world is rebuilt from a fresh layout.

use crawl_core::{
    AttackOutcome, Command, Direction, Event, LayoutSource, Occupant, SpawnPlan,
    DEFAULT_REVEAL_RADIUS, GRID_COLUMNS, GRID_ROWS,
};
use crawl_system_reaction::LocalReaction;
use crawl_system_spawning::{SpawnError, SpawnPlanner};
use crawl_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

pub use crawl_system_reaction::Config as ReactionConfig;
pub use crawl_system_spawning::Config as SpawningConfig;

/// Configuration parameters required to construct the turn controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    seed: u64,
    columns: u32,
    rows: u32,
    reveal_radius: u32,
    spawning: SpawningConfig,
    reaction: ReactionConfig,
}

impl Config {
    /// Creates a configuration with the default layout size, reveal radius,
    /// spawning parameters and a disabled reaction system.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            columns: GRID_COLUMNS,
            rows: GRID_ROWS,
            reveal_radius: DEFAULT_REVEAL_RADIUS,
            spawning: SpawningConfig::default(),
            reaction: ReactionConfig::default(),
        }
    }

    /// Overrides the dimensions requested from the layout source.
    #[must_use]
    pub const fn with_dimensions(mut self, columns: u32, rows: u32) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    /// Overrides the reveal radius.
    #[must_use]
    pub const fn with_reveal_radius(mut self, reveal_radius: u32) -> Self {
        self.reveal_radius = reveal_radius;
        self
    }

    /// Overrides the spawn planner configuration.
    #[must_use]
    pub const fn with_spawning(mut self, spawning: SpawningConfig) -> Self {
        self.spawning = spawning;
        self
    }

    /// Overrides the reaction configuration.
    #[must_use]
    pub const fn with_reaction(mut self, reaction: ReactionConfig) -> Self {
        self.reaction = reaction;
        self
    }

    /// Seed of the shared random source.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Radius revealed around the player after each acting turn.
    #[must_use]
    pub const fn reveal_radius(&self) -> u32 {
        self.reveal_radius
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Result of handling one player intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnOutcome {
    /// The player stepped onto a free tile.
    Moved,
    /// The player struck an enemy that survived.
    Struck,
    /// The player slew an enemy and took its tile.
    Advanced,
    /// The player died and the world was rebuilt.
    PlayerDied,
    /// The intent had no effect; enemies did not act.
    Ignored,
}

/// Failures raised while running a turn.
#[derive(Debug, Error)]
pub enum TurnError {
    /// A new world could not be planned.
    #[error("failed to plan a world")]
    Spawn(#[from] SpawnError),
}

/// Orchestrates spawning, combat, enemy reaction and visibility.
#[derive(Debug)]
pub struct TurnController<L> {
    config: Config,
    layout: L,
    planner: SpawnPlanner,
    reaction: LocalReaction,
    rng: ChaCha8Rng,
}

impl<L> TurnController<L>
where
    L: LayoutSource,
{
    /// Creates a new controller that draws layouts from `layout`.
    #[must_use]
    pub fn new(config: Config, layout: L) -> Self {
        Self {
            planner: SpawnPlanner::new(config.spawning),
            reaction: LocalReaction::new(config.reaction),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            layout,
        }
    }

    /// Configuration the controller was created with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Builds the first world and reveals the player's surroundings.
    pub fn bootstrap(&mut self, out_events: &mut Vec<Event>) -> Result<World, TurnError> {
        let plan = self.plan_world()?;
        let mut world = World::from_plan(&plan);
        tracing::info!(
            player = ?plan.player,
            enemies = query::enemy_view(&world).len(),
            "world bootstrapped"
        );
        self.reveal(&mut world, out_events);
        Ok(world)
    }

    /// Runs one cycle for the provided intent.
    ///
    /// A reset caused by the player's death builds the replacement world
    /// before touching `world`; if planning fails the error is returned and
    /// `world` keeps its current state. While the player of `world` is dead
    /// every intent retries that rebuild instead of acting.
    pub fn handle(
        &mut self,
        world: &mut World,
        intent: Direction,
        out_events: &mut Vec<Event>,
    ) -> Result<TurnOutcome, TurnError> {
        if query::player(world).is_dead() {
            tracing::debug!(?intent, "player is dead, retrying the rebuild");
            self.reset(world, out_events)?;
            return Ok(TurnOutcome::PlayerDied);
        }

        let grid = query::grid(world);
        let target = query::player(world).cell().offset_clamped(
            intent.delta(),
            grid.columns(),
            grid.rows(),
        );

        let outcome = if grid.is_walkable(target) {
            world::apply(world, Command::MovePlayer { direction: intent }, out_events);
            TurnOutcome::Moved
        } else if matches!(grid.occupant(target), Some(Occupant::Enemy(_))) {
            let first_new = out_events.len();
            world::apply(world, Command::Attack { direction: intent }, out_events);
            match attack_outcome(&out_events[first_new..]) {
                Some(AttackOutcome::PlayerDied) => {
                    self.reset(world, out_events)?;
                    return Ok(TurnOutcome::PlayerDied);
                }
                Some(AttackOutcome::AttackerAdvances) => {
                    world::apply(world, Command::MovePlayer { direction: intent }, out_events);
                    TurnOutcome::Advanced
                }
                Some(AttackOutcome::NoOccupancyChange) => TurnOutcome::Struck,
                None => return Ok(TurnOutcome::Ignored),
            }
        } else {
            tracing::trace!(?intent, ?target, "intent ignored");
            return Ok(TurnOutcome::Ignored);
        };

        self.react(world, out_events);
        self.reveal(world, out_events);
        Ok(outcome)
    }

    fn plan_world(&mut self) -> Result<SpawnPlan, SpawnError> {
        let mask = self.layout.generate(self.config.columns, self.config.rows);
        self.planner.plan(mask, &mut self.rng)
    }

    fn reset(&mut self, world: &mut World, out_events: &mut Vec<Event>) -> Result<(), TurnError> {
        let plan = self.plan_world()?;
        tracing::info!(deaths = query::deaths(world), "player died, rebuilding the world");
        world::apply(world, Command::Populate { plan }, out_events);
        self.reveal(world, out_events);
        Ok(())
    }

    fn react(&self, world: &mut World, out_events: &mut Vec<Event>) {
        if !self.reaction.config().enabled() {
            return;
        }
        let mut commands = Vec::new();
        for id in query::entities(world).enemy_ids() {
            let Some(enemy) = query::entities(world).enemy(id).map(|enemy| enemy.snapshot()) else {
                continue;
            };
            self.reaction.handle(&enemy, query::grid(world), &mut commands);
            for command in commands.drain(..) {
                world::apply(world, command, out_events);
            }
        }
    }

    fn reveal(&self, world: &mut World, out_events: &mut Vec<Event>) {
        let center = query::player(world).cell();
        world::apply(
            world,
            Command::Reveal {
                center,
                radius: self.config.reveal_radius,
            },
            out_events,
        );
    }
}

fn attack_outcome(events: &[Event]) -> Option<AttackOutcome> {
    events.iter().find_map(|event| match event {
        Event::AttackResolved { outcome, .. } => Some(*outcome),
        _ => None,
    })
}
