use crawl_core::{
    CellCoord, CombatStats, Command, Direction, EnemyId, EnemySpawn, EnemyVariant, SpawnPlan,
    WallMask,
};
use crawl_rendering::{Scene, Severity, Sprite, TILE_SIZE, VIEWPORT_TILES};
use crawl_world::{self as world, World};
use glam::Vec2;

fn world_at(player: CellCoord) -> World {
    let mut mask = WallMask::filled(30, 30, false);
    mask.set_wall(CellCoord::new(player.column(), player.row() + 1), true);
    let mut world = World::from_plan(&SpawnPlan {
        mask,
        player,
        player_stats: CombatStats::new(20, 3, 0),
        enemies: vec![EnemySpawn {
            id: EnemyId::new(0),
            variant: EnemyVariant::Dwarf,
            cell: CellCoord::new(player.column() + 1, player.row()),
            stats: CombatStats::new(15, 1, 0),
            xp_reward: 15,
        }],
    });
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Reveal {
            center: player,
            radius: 1,
        },
        &mut events,
    );
    world
}

#[test]
fn viewport_spans_twenty_tiles_around_the_player() {
    let scene = Scene::capture(&world_at(CellCoord::new(15, 15)));

    assert_eq!(scene.origin, (5, 5));
    assert_eq!(scene.cells.len(), (VIEWPORT_TILES * VIEWPORT_TILES) as usize);
    let first = &scene.cells[0];
    assert_eq!(first.cell, CellCoord::new(5, 5));
    assert_eq!(first.screen, Vec2::ZERO);
    let player = scene
        .cells
        .iter()
        .find(|cell| cell.cell == CellCoord::new(15, 15))
        .expect("player tile in view");
    assert_eq!(player.screen, Vec2::splat(10.0 * TILE_SIZE));
    assert_eq!(
        player.occupant.map(|occupant| occupant.sprite),
        Some(Sprite::Player)
    );
}

#[test]
fn viewport_skips_tiles_outside_the_grid() {
    let scene = Scene::capture(&world_at(CellCoord::new(2, 3)));

    assert_eq!(scene.origin, (-8, -7));
    assert_eq!(scene.cells.len(), 12 * 13);
    assert!(scene
        .cells
        .iter()
        .all(|cell| cell.cell.column() < 12 && cell.cell.row() < 13));
}

#[test]
fn hidden_tiles_carry_no_content() {
    let scene = Scene::capture(&world_at(CellCoord::new(15, 15)));

    let revealed = scene.cells.iter().filter(|cell| cell.revealed).count();
    assert_eq!(revealed, 9);
    assert!(scene
        .cells
        .iter()
        .filter(|cell| !cell.revealed)
        .all(|cell| cell.terrain.is_none() && cell.occupant.is_none()));
}

#[test]
fn wounded_enemies_show_their_severity() {
    let mut world = world_at(CellCoord::new(15, 15));
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Attack {
            direction: Direction::Right,
        },
        &mut events,
    );

    let scene = Scene::capture(&world);
    let enemy = scene
        .cells
        .iter()
        .find_map(|cell| cell.occupant.filter(|o| o.sprite != Sprite::Player))
        .expect("enemy in view");
    assert_eq!(enemy.sprite, Sprite::Enemy(EnemyVariant::Dwarf));
    assert_eq!(enemy.severity, Severity::Lightly);
    assert_eq!(scene.hud.health, 19);
}

#[test]
fn ascii_frame_draws_the_revealed_neighbourhood() {
    let frame = Scene::capture(&world_at(CellCoord::new(15, 15))).to_ascii();
    let lines: Vec<&str> = frame.lines().collect();

    assert_eq!(lines.len(), VIEWPORT_TILES as usize + 1);
    assert_eq!(&lines[9][9..12], "...");
    assert_eq!(&lines[10][9..12], ".@d");
    assert_eq!(&lines[11][9..12], ".#.");
    assert_eq!(lines[0].trim(), "");
    assert!(lines[20].starts_with("HP 20/20"));
}
