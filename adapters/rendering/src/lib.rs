#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Crawl adapters.
//!
//! A [`Scene`] is a read-only snapshot of the viewport around the player.
//! Backends receive scenes through [`RenderingBackend`] and never touch the
//! world themselves.

use anyhow::Result as AnyResult;
use crawl_core::{CellCoord, Decoration, EnemyVariant, Occupant, Terrain};
use crawl_world::{query, World};
use glam::Vec2;

/// Edge length of one tile on screen, in pixels.
pub const TILE_SIZE: f32 = 32.0;

/// Tiles drawn before the player on each axis. The viewport spans
/// `-VIEWPORT_REACH..VIEWPORT_REACH` around the player.
pub const VIEWPORT_REACH: i64 = 10;

/// Edge length of the viewport in tiles.
pub const VIEWPORT_TILES: u32 = 20;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let channel = |value: f32| value + (1.0 - value) * amount;
        Self {
            red: channel(self.red),
            green: channel(self.green),
            blue: channel(self.blue),
            alpha: self.alpha,
        }
    }
}

/// Damage overlay chosen from an entity's remaining health.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Health at or below a fifth of the maximum.
    AlmostDead,
    /// Health at or below a quarter of the maximum.
    Severely,
    /// Health at or below a third of the maximum.
    Heavily,
    /// Health at or below half of the maximum.
    Moderately,
    /// Any missing health.
    Lightly,
    /// Full health; no overlay is drawn.
    Unhurt,
}

impl Severity {
    /// Selects the first matching threshold, using integer division of the
    /// maximum health.
    #[must_use]
    pub const fn from_health(health: i32, max_health: i32) -> Self {
        if health <= max_health / 5 {
            Self::AlmostDead
        } else if health <= max_health / 4 {
            Self::Severely
        } else if health <= max_health / 3 {
            Self::Heavily
        } else if health <= max_health / 2 {
            Self::Moderately
        } else if health < max_health {
            Self::Lightly
        } else {
            Self::Unhurt
        }
    }

    /// Amount by which a sprite tint is washed out.
    #[must_use]
    pub const fn fade(self) -> f32 {
        match self {
            Self::AlmostDead => 0.8,
            Self::Severely => 0.6,
            Self::Heavily => 0.45,
            Self::Moderately => 0.3,
            Self::Lightly => 0.15,
            Self::Unhurt => 0.0,
        }
    }
}

/// Sprite drawn for a tile occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sprite {
    /// The player character.
    Player,
    /// An enemy of the given variant.
    Enemy(EnemyVariant),
}

impl Sprite {
    /// Base tint of the sprite.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Player => Color::from_rgb_u8(0xf5, 0xe0, 0x5b),
            Self::Enemy(EnemyVariant::Elf) => Color::from_rgb_u8(0x2f, 0x95, 0x32),
            Self::Enemy(EnemyVariant::Dwarf) => Color::from_rgb_u8(0x8a, 0x5a, 0x2b),
            Self::Enemy(EnemyVariant::GoldenEye) => Color::from_rgb_u8(0xff, 0xc1, 0x07),
        }
    }

    const fn glyph(self) -> char {
        match self {
            Self::Player => '@',
            Self::Enemy(EnemyVariant::Elf) => 'e',
            Self::Enemy(EnemyVariant::Dwarf) => 'd',
            Self::Enemy(EnemyVariant::GoldenEye) => 'g',
        }
    }
}

/// Occupant of a visible tile with its damage overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneOccupant {
    /// Sprite to draw.
    pub sprite: Sprite,
    /// Damage overlay for the occupant's health.
    pub severity: Severity,
}

impl SceneOccupant {
    /// Tint of the sprite after the damage overlay is applied.
    #[must_use]
    pub fn tint(&self) -> Color {
        self.sprite.color().lighten(self.severity.fade())
    }
}

/// One tile inside the viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneCell {
    /// Grid coordinate of the tile.
    pub cell: CellCoord,
    /// Top-left corner of the tile on screen.
    pub screen: Vec2,
    /// Whether the tile has been revealed. Hidden tiles carry no content.
    pub revealed: bool,
    /// Terrain of a revealed tile.
    pub terrain: Option<Terrain>,
    /// Decorations of a revealed tile, in the order they were added.
    pub decorations: Vec<Decoration>,
    /// Occupant of a revealed tile.
    pub occupant: Option<SceneOccupant>,
}

/// Player status shown beside the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Current health.
    pub health: i32,
    /// Maximum health.
    pub max_health: i32,
    /// Attack value.
    pub attack: i32,
    /// Shield value.
    pub shield: i32,
    /// Experience inside the current tier.
    pub xp: u32,
    /// Active tier level.
    pub level: u8,
    /// Total currency carried.
    pub gold: u32,
    /// Deaths this session.
    pub deaths: u32,
}

/// Scene description of the viewport around the player.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Grid coordinate at the viewport's top-left corner, before bounds are applied.
    pub origin: (i64, i64),
    /// Visible in-bounds tiles in row-major order.
    pub cells: Vec<SceneCell>,
    /// Player status.
    pub hud: Hud,
}

impl Scene {
    /// Captures the viewport centered on the player.
    ///
    /// Tiles outside the grid are skipped rather than clamped.
    #[must_use]
    pub fn capture(world: &World) -> Self {
        let grid = query::grid(world);
        let entities = query::entities(world);
        let player = query::player(world);
        let center = player.cell();
        let origin = (
            i64::from(center.column()) - VIEWPORT_REACH,
            i64::from(center.row()) - VIEWPORT_REACH,
        );

        let mut cells = Vec::new();
        for row_offset in 0..i64::from(VIEWPORT_TILES) {
            for column_offset in 0..i64::from(VIEWPORT_TILES) {
                let column = origin.0 + column_offset;
                let row = origin.1 + row_offset;
                let (Ok(column), Ok(row)) = (u32::try_from(column), u32::try_from(row)) else {
                    continue;
                };
                if column >= grid.columns() || row >= grid.rows() {
                    continue;
                }

                let cell = CellCoord::new(column, row);
                let tile = grid.tile(cell);
                let screen = Vec2::new(column_offset as f32, row_offset as f32) * TILE_SIZE;
                if !tile.is_revealed() {
                    cells.push(SceneCell {
                        cell,
                        screen,
                        revealed: false,
                        terrain: None,
                        decorations: Vec::new(),
                        occupant: None,
                    });
                    continue;
                }

                let occupant = tile.occupant().and_then(|occupant| match occupant {
                    Occupant::Player => Some(SceneOccupant {
                        sprite: Sprite::Player,
                        severity: Severity::from_health(
                            player.stats().health,
                            player.stats().max_health,
                        ),
                    }),
                    Occupant::Enemy(id) => entities.enemy(id).map(|enemy| SceneOccupant {
                        sprite: Sprite::Enemy(enemy.variant()),
                        severity: Severity::from_health(
                            enemy.stats().health,
                            enemy.stats().max_health,
                        ),
                    }),
                });
                cells.push(SceneCell {
                    cell,
                    screen,
                    revealed: true,
                    terrain: Some(tile.terrain()),
                    decorations: tile.decorations().to_vec(),
                    occupant,
                });
            }
        }

        let stats = player.stats();
        Self {
            origin,
            cells,
            hud: Hud {
                health: stats.health,
                max_health: stats.max_health,
                attack: stats.attack,
                shield: stats.shield,
                xp: player.xp(),
                level: player.tier().level,
                gold: player.gold(),
                deaths: query::deaths(world),
            },
        }
    }

    /// Renders the scene as text: one line per viewport row followed by a
    /// status line.
    ///
    /// Hidden and out-of-bounds tiles are blank, walls `#`, floor `.`,
    /// bloodied floor `,`, the player `@`, enemies by variant initial.
    #[must_use]
    pub fn to_ascii(&self) -> String {
        let width = VIEWPORT_TILES as usize;
        let mut canvas = vec![' '; width * width];
        for scene_cell in &self.cells {
            let column = (i64::from(scene_cell.cell.column()) - self.origin.0) as usize;
            let row = (i64::from(scene_cell.cell.row()) - self.origin.1) as usize;
            canvas[row * width + column] = glyph(scene_cell);
        }

        let mut frame = String::with_capacity(width * (width + 1) + 64);
        for line in canvas.chunks(width) {
            frame.extend(line.iter());
            frame.push('\n');
        }
        let hud = &self.hud;
        frame.push_str(&format!(
            "HP {}/{}  ATK {}  SHD {}  LVL {}  XP {}  GOLD {}  DEATHS {}\n",
            hud.health,
            hud.max_health,
            hud.attack,
            hud.shield,
            hud.level,
            hud.xp,
            hud.gold,
            hud.deaths
        ));
        frame
    }
}

fn glyph(scene_cell: &SceneCell) -> char {
    if let Some(occupant) = scene_cell.occupant {
        return occupant.sprite.glyph();
    }
    match scene_cell.terrain {
        None => ' ',
        Some(Terrain::Wall) => '#',
        Some(Terrain::Floor) if scene_cell.decorations.contains(&Decoration::Blood) => ',',
        Some(Terrain::Floor) => '.',
    }
}

/// Rendering backend capable of presenting Crawl scenes.
pub trait RenderingBackend {
    /// Presents one scene.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_uses_integer_thresholds() {
        assert_eq!(Severity::from_health(4, 20), Severity::AlmostDead);
        assert_eq!(Severity::from_health(5, 20), Severity::Severely);
        assert_eq!(Severity::from_health(6, 20), Severity::Heavily);
        assert_eq!(Severity::from_health(10, 20), Severity::Moderately);
        assert_eq!(Severity::from_health(19, 20), Severity::Lightly);
        assert_eq!(Severity::from_health(20, 20), Severity::Unhurt);
        assert_eq!(Severity::from_health(-3, 20), Severity::AlmostDead);
        // 7 / 3 == 2 and 7 / 2 == 3.
        assert_eq!(Severity::from_health(3, 7), Severity::Moderately);
    }

    #[test]
    fn unhurt_sprites_keep_their_color() {
        let occupant = SceneOccupant {
            sprite: Sprite::Player,
            severity: Severity::Unhurt,
        };
        assert_eq!(occupant.tint(), Sprite::Player.color());

        let hurt = SceneOccupant {
            severity: Severity::AlmostDead,
            ..occupant
        };
        assert!(hurt.tint().blue > occupant.tint().blue);
    }
}
