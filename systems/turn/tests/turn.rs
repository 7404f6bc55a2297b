use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use crawl_core::{
    CellCoord, CombatStats, Direction, EnemyId, EnemySpawn, EnemyVariant, Event, LayoutSource,
    SpawnPlan, WallMask,
};
use crawl_system_turn::{
    Config, ReactionConfig, SpawningConfig, TurnController, TurnError, TurnOutcome,
};
use crawl_world::{query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Open room enclosed by a one-tile wall.
#[derive(Debug)]
struct Room;

impl LayoutSource for Room {
    fn generate(&mut self, columns: u32, rows: u32) -> WallMask {
        let mut mask = WallMask::filled(columns, rows, false);
        for column in 0..columns {
            mask.set_wall(CellCoord::new(column, 0), true);
            mask.set_wall(CellCoord::new(column, rows - 1), true);
        }
        for row in 0..rows {
            mask.set_wall(CellCoord::new(0, row), true);
            mask.set_wall(CellCoord::new(columns - 1, row), true);
        }
        mask
    }
}

/// Solid rock with no floor at all.
#[derive(Debug)]
struct Rock;

impl LayoutSource for Rock {
    fn generate(&mut self, columns: u32, rows: u32) -> WallMask {
        WallMask::filled(columns, rows, true)
    }
}

/// Solid rock for the first `rock_left` layouts, then an open room.
#[derive(Debug)]
struct RockThenRoom {
    rock_left: usize,
}

impl LayoutSource for RockThenRoom {
    fn generate(&mut self, columns: u32, rows: u32) -> WallMask {
        if self.rock_left > 0 {
            self.rock_left -= 1;
            return Rock.generate(columns, rows);
        }
        Room.generate(columns, rows)
    }
}

fn config(seed: u64, movement: bool) -> Config {
    Config::new(seed)
        .with_dimensions(24, 24)
        .with_spawning(SpawningConfig::new(1, 4, 20, 3, 3))
        .with_reaction(ReactionConfig::new(movement))
}

fn hand_built(player: CellCoord, enemies: Vec<EnemySpawn>) -> World {
    World::from_plan(&SpawnPlan {
        mask: WallMask::filled(10, 10, false),
        player,
        player_stats: CombatStats::new(5, 5, 0),
        enemies,
    })
}

fn intents(seed: u64, count: usize) -> Vec<Direction> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| Direction::ALL[rng.gen_range(0..Direction::ALL.len())])
        .collect()
}

#[test]
fn invariants_hold_after_every_cycle() {
    for movement in [false, true] {
        let mut controller = TurnController::new(config(11, movement), Room);
        let mut events = Vec::new();
        let mut world = controller.bootstrap(&mut events).expect("room has a start");

        for intent in intents(5, 400) {
            let _ = controller
                .handle(&mut world, intent, &mut events)
                .expect("room always replans");
            assert!(
                query::check_invariants(&world).is_empty(),
                "invariants broken after {intent:?}: {:?}",
                query::check_invariants(&world)
            );
        }
    }
}

#[test]
fn revealed_tiles_only_grow_between_resets() {
    let mut controller = TurnController::new(config(3, true), Room);
    let mut events = Vec::new();
    let mut world = controller.bootstrap(&mut events).expect("room has a start");
    let mut previous = query::revealed_cells(&world);
    assert_eq!(previous.len(), 9);

    for intent in intents(8, 200) {
        let outcome = controller
            .handle(&mut world, intent, &mut events)
            .expect("room always replans");
        let current = query::revealed_cells(&world);
        if outcome != TurnOutcome::PlayerDied {
            assert!(previous.iter().all(|cell| current.contains(cell)));
        }
        previous = current;
    }
}

#[test]
fn fatal_attack_rebuilds_the_world() {
    let mut controller = TurnController::new(config(21, false), Room);
    let mut world = hand_built(
        CellCoord::new(4, 4),
        vec![EnemySpawn {
            id: EnemyId::new(0),
            variant: EnemyVariant::Dwarf,
            cell: CellCoord::new(5, 4),
            stats: CombatStats::new(100, 10, 0),
            xp_reward: 15,
        }],
    );
    let mut events = Vec::new();

    let outcome = controller
        .handle(&mut world, Direction::Right, &mut events)
        .expect("room always replans");

    assert_eq!(outcome, TurnOutcome::PlayerDied);
    assert_eq!(query::deaths(&world), 1);
    assert_eq!(query::grid(&world).columns(), 24);
    let player = query::player(&world);
    assert_eq!(player.stats(), CombatStats::starting_player());
    assert_eq!(player.xp(), 0);
    assert_eq!(player.inventory().len(), 1);
    assert_eq!(query::revealed_cells(&world).len(), 9);
    assert!(query::check_invariants(&world).is_empty());
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::WorldPopulated { .. })));
}

#[test]
fn failed_rebuild_keeps_the_old_world() {
    let mut controller = TurnController::new(config(21, false), Rock);
    let mut world = hand_built(
        CellCoord::new(4, 4),
        vec![EnemySpawn {
            id: EnemyId::new(0),
            variant: EnemyVariant::Dwarf,
            cell: CellCoord::new(5, 4),
            stats: CombatStats::new(100, 10, 0),
            xp_reward: 15,
        }],
    );
    let mut events = Vec::new();

    let result = controller.handle(&mut world, Direction::Right, &mut events);

    assert!(matches!(result, Err(TurnError::Spawn(_))));
    assert_eq!(query::grid(&world).columns(), 10);
    assert_eq!(query::enemy_view(&world).len(), 1);
    assert_eq!(query::deaths(&world), 1);

    let before = events.len();
    let retry = controller.handle(&mut world, Direction::Up, &mut events);

    assert!(matches!(retry, Err(TurnError::Spawn(_))));
    assert_eq!(query::player(&world).cell(), CellCoord::new(4, 4));
    assert!(query::player(&world).is_dead());
    assert_eq!(events.len(), before);
}

#[test]
fn dead_player_rebuilds_on_the_next_intent() {
    let mut controller = TurnController::new(config(21, false), RockThenRoom { rock_left: 1 });
    let mut world = hand_built(
        CellCoord::new(4, 4),
        vec![EnemySpawn {
            id: EnemyId::new(0),
            variant: EnemyVariant::Dwarf,
            cell: CellCoord::new(5, 4),
            stats: CombatStats::new(100, 10, 0),
            xp_reward: 15,
        }],
    );
    let mut events = Vec::new();

    let failed = controller.handle(&mut world, Direction::Right, &mut events);
    assert!(matches!(failed, Err(TurnError::Spawn(_))));

    let outcome = controller
        .handle(&mut world, Direction::Up, &mut events)
        .expect("room replans");

    assert_eq!(outcome, TurnOutcome::PlayerDied);
    assert_eq!(query::deaths(&world), 1);
    assert_eq!(query::grid(&world).columns(), 24);
    assert!(!query::player(&world).is_dead());
    assert_eq!(query::revealed_cells(&world).len(), 9);
    assert!(query::check_invariants(&world).is_empty());
}

#[test]
fn killing_blow_advances_the_player() {
    let mut controller = TurnController::new(config(2, false), Room);
    let mut world = hand_built(
        CellCoord::new(4, 4),
        vec![EnemySpawn {
            id: EnemyId::new(0),
            variant: EnemyVariant::GoldenEye,
            cell: CellCoord::new(5, 4),
            stats: CombatStats::new(1, 10, 0),
            xp_reward: 7,
        }],
    );
    let mut events = Vec::new();

    let outcome = controller
        .handle(&mut world, Direction::Right, &mut events)
        .expect("no reset needed");

    assert_eq!(outcome, TurnOutcome::Advanced);
    assert_eq!(query::player(&world).cell(), CellCoord::new(5, 4));
    assert_eq!(query::player(&world).stats().health, 5);
    assert!(query::enemy_view(&world).is_empty());
    assert!(query::check_invariants(&world).is_empty());
}

#[test]
fn surviving_enemy_is_struck_in_place() {
    let mut controller = TurnController::new(config(2, false), Room);
    let mut world = hand_built(
        CellCoord::new(4, 4),
        vec![EnemySpawn::from_variant(
            EnemyId::new(0),
            EnemyVariant::Dwarf,
            CellCoord::new(4, 5),
        )],
    );
    let mut events = Vec::new();

    let outcome = controller
        .handle(&mut world, Direction::Down, &mut events)
        .expect("no reset needed");

    assert_eq!(outcome, TurnOutcome::Struck);
    assert_eq!(query::player(&world).cell(), CellCoord::new(4, 4));
    assert_eq!(query::player(&world).stats().health, 2);
    assert!(events.contains(&Event::TilesRevealed {
        center: CellCoord::new(4, 4),
        newly_revealed: 9,
    }));
    assert_eq!(query::revealed_cells(&world).len(), 9);
}

#[test]
fn enemy_movement_follows_the_toggle() {
    for (movement, expected) in [(false, CellCoord::new(7, 7)), (true, CellCoord::new(8, 8))] {
        let mut controller = TurnController::new(config(2, movement), Room);
        let mut world = hand_built(
            CellCoord::new(2, 2),
            vec![EnemySpawn::from_variant(
                EnemyId::new(0),
                EnemyVariant::Elf,
                CellCoord::new(7, 7),
            )],
        );
        let mut events = Vec::new();

        let outcome = controller
            .handle(&mut world, Direction::Right, &mut events)
            .expect("no reset needed");

        assert_eq!(outcome, TurnOutcome::Moved);
        let enemy = query::entities(&world)
            .enemy(EnemyId::new(0))
            .map(|enemy| enemy.cell());
        assert_eq!(enemy, Some(expected));
    }
}

#[test]
fn enemies_react_in_identifier_order() {
    let mut controller = TurnController::new(config(2, true), Room);
    // Enemies 0 and 1 both aim at (6, 6); enemy 2 only blocks enemy 1 from below.
    let mut world = hand_built(
        CellCoord::new(0, 0),
        vec![
            EnemySpawn::from_variant(EnemyId::new(2), EnemyVariant::Elf, CellCoord::new(5, 8)),
            EnemySpawn::from_variant(EnemyId::new(1), EnemyVariant::Elf, CellCoord::new(5, 7)),
            EnemySpawn::from_variant(EnemyId::new(0), EnemyVariant::Elf, CellCoord::new(5, 5)),
        ],
    );
    let mut events = Vec::new();

    let _ = controller
        .handle(&mut world, Direction::Right, &mut events)
        .expect("no reset needed");

    let cell = |id| {
        query::entities(&world)
            .enemy(EnemyId::new(id))
            .map(|enemy| enemy.cell())
    };
    assert_eq!(cell(0), Some(CellCoord::new(6, 6)));
    assert_eq!(cell(1), Some(CellCoord::new(5, 7)));
    assert!(events.contains(&Event::EnemyStepRejected {
        enemy: EnemyId::new(1),
        from: CellCoord::new(5, 7),
        to: CellCoord::new(6, 6),
    }));
    assert!(query::check_invariants(&world).is_empty());
}

#[test]
fn ignored_intents_do_not_give_enemies_a_turn() {
    let mut controller = TurnController::new(config(2, true), Room);
    let mut world = hand_built(
        CellCoord::new(0, 4),
        vec![EnemySpawn::from_variant(
            EnemyId::new(0),
            EnemyVariant::Elf,
            CellCoord::new(6, 6),
        )],
    );
    let mut events = Vec::new();

    let outcome = controller
        .handle(&mut world, Direction::Left, &mut events)
        .expect("no reset needed");

    assert_eq!(outcome, TurnOutcome::Ignored);
    assert!(events.is_empty());
    assert!(query::revealed_cells(&world).is_empty());
}

#[test]
fn seeded_replays_are_deterministic() {
    fn fingerprint(seed: u64) -> u64 {
        let mut controller = TurnController::new(config(seed, true), Room);
        let mut events = Vec::new();
        let mut world = controller.bootstrap(&mut events).expect("room has a start");
        let mut hasher = DefaultHasher::new();

        for intent in intents(seed, 300) {
            let outcome = controller
                .handle(&mut world, intent, &mut events)
                .expect("room always replans");
            outcome.hash(&mut hasher);
        }

        let player = query::player(&world);
        player.cell().hash(&mut hasher);
        player.stats().hash(&mut hasher);
        player.xp().hash(&mut hasher);
        query::deaths(&world).hash(&mut hasher);
        for enemy in query::enemy_view(&world).iter() {
            enemy.id.hash(&mut hasher);
            enemy.cell.hash(&mut hasher);
            enemy.stats.hash(&mut hasher);
        }
        query::revealed_cells(&world).hash(&mut hasher);
        events.len().hash(&mut hasher);
        hasher.finish()
    }

    assert_eq!(fingerprint(0xfeed), fingerprint(0xfeed));
    assert_ne!(fingerprint(0xfeed), fingerprint(0xbeef));
}
