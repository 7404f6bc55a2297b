use crawl_core::{
    CellCoord, CombatStats, Command, Decoration, Direction, EnemyId, EnemySpawn, EnemyVariant,
    Event, ItemKind, Occupant, SpawnPlan, StepDelta, WallMask,
};
use crawl_world::{self as world, query, World};

fn corridor() -> SpawnPlan {
    let mut mask = WallMask::filled(8, 3, false);
    for column in 0..8 {
        mask.set_wall(CellCoord::new(column, 0), true);
        mask.set_wall(CellCoord::new(column, 2), true);
    }
    SpawnPlan {
        mask,
        player: CellCoord::new(1, 1),
        player_stats: CombatStats::new(5, 5, 0),
        enemies: vec![
            EnemySpawn {
                id: EnemyId::new(0),
                variant: EnemyVariant::GoldenEye,
                cell: CellCoord::new(2, 1),
                stats: CombatStats::new(1, 10, 0),
                xp_reward: 7,
            },
            EnemySpawn::from_variant(EnemyId::new(1), EnemyVariant::Dwarf, CellCoord::new(6, 1)),
        ],
    }
}

fn populated(plan: SpawnPlan) -> (World, Vec<Event>) {
    let mut world = World::from_plan(&corridor());
    let mut events = Vec::new();
    world::apply(&mut world, Command::Populate { plan }, &mut events);
    (world, events)
}

#[test]
fn killing_blow_clears_the_tile_and_leaves_blood() {
    let (mut world, _) = populated(corridor());
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::Attack {
            direction: Direction::Right,
        },
        &mut events,
    );

    let slain_cell = CellCoord::new(2, 1);
    assert!(events.contains(&Event::EnemySlain {
        enemy: EnemyId::new(0),
        variant: EnemyVariant::GoldenEye,
        cell: slain_cell,
        xp_reward: 7,
    }));
    assert!(events.contains(&Event::ItemLooted {
        item: ItemKind::LOOT_DROP
    }));
    let tile = query::grid(&world).tile(slain_cell);
    assert_eq!(tile.occupant(), None);
    assert_eq!(tile.decorations(), &[Decoration::Blood]);
    assert_eq!(query::player(&world).stats().health, 5);
    assert_eq!(query::deaths(&world), 0);
    assert!(query::check_invariants(&world).is_empty());

    world::apply(
        &mut world,
        Command::MovePlayer {
            direction: Direction::Right,
        },
        &mut events,
    );
    assert_eq!(query::player(&world).cell(), slain_cell);
    assert!(query::check_invariants(&world).is_empty());
}

#[test]
fn player_death_is_counted() {
    let mut plan = corridor();
    plan.enemies[0].stats = CombatStats::new(100, 10, 0);
    let (mut world, _) = populated(plan);
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::Attack {
            direction: Direction::Right,
        },
        &mut events,
    );

    assert!(events.contains(&Event::PlayerDied {
        cell: CellCoord::new(1, 1)
    }));
    assert_eq!(query::deaths(&world), 1);
    assert!(query::player(&world).is_dead());
}

#[test]
fn walls_never_receive_occupants() {
    let (mut world, _) = populated(corridor());
    let mut events = Vec::new();

    for direction in Direction::ALL {
        world::apply(&mut world, Command::MovePlayer { direction }, &mut events);
    }
    world::apply(
        &mut world,
        Command::StepEnemy {
            enemy: EnemyId::new(1),
            delta: StepDelta::new(0, 1),
        },
        &mut events,
    );

    for (_, tile) in query::grid(&world).iter() {
        if tile.occupant().is_some() {
            assert_ne!(tile.terrain(), crawl_core::Terrain::Wall);
        }
    }
    assert!(query::check_invariants(&world).is_empty());
}

#[test]
fn reveal_is_monotonic_across_centers() {
    let (mut world, _) = populated(corridor());
    let mut events = Vec::new();
    let mut previous = Vec::new();

    for column in [1, 4, 7, 4, 1] {
        world::apply(
            &mut world,
            Command::Reveal {
                center: CellCoord::new(column, 1),
                radius: 1,
            },
            &mut events,
        );
        let current = query::revealed_cells(&world);
        assert!(previous.iter().all(|cell| current.contains(cell)));
        previous = current;
    }

    assert_eq!(previous.len(), 8 * 3);
    assert_eq!(
        events.last(),
        Some(&Event::TilesRevealed {
            center: CellCoord::new(1, 1),
            newly_revealed: 0,
        })
    );
}

#[test]
fn enemy_view_is_sorted_by_identifier() {
    let mut plan = corridor();
    plan.enemies.reverse();
    let (world, events) = populated(plan);

    let ids: Vec<_> = query::enemy_view(&world)
        .iter()
        .map(|enemy| enemy.id.get())
        .collect();
    assert_eq!(ids, vec![0, 1]);
    assert_eq!(
        query::grid(&world).occupant(CellCoord::new(6, 1)),
        Some(Occupant::Enemy(EnemyId::new(1)))
    );
    assert_eq!(
        events,
        vec![Event::WorldPopulated {
            player: CellCoord::new(1, 1),
            enemies: 2,
        }]
    );
}
