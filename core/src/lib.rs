#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Crawl simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems read immutable snapshots,
//! answer with [`Command`] values describing desired mutations, the world
//! executes those commands via its `apply` entry point, and then reports
//! [`Event`] values describing what actually happened. Static registries for
//! enemy variants, items, and progression tiers live here so every crate
//! agrees on the same numbers.

use serde::{Deserialize, Serialize};

/// Number of tile columns in a default dungeon floor.
pub const GRID_COLUMNS: u32 = 150;

/// Number of tile rows in a default dungeon floor.
pub const GRID_ROWS: u32 = 150;

/// Radius revealed around the player after each accepted action.
pub const DEFAULT_REVEAL_RADIUS: u32 = 1;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Replaces the entire world with the state described by a spawn plan.
    Populate {
        /// Placement produced by the spawn planner.
        plan: SpawnPlan,
    },
    /// Requests that the player step one tile in the provided direction.
    MovePlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that the player strike the enemy standing in the provided direction.
    Attack {
        /// Direction of the tile holding the defender.
        direction: Direction,
    },
    /// Requests that an enemy shift its position by the provided delta.
    StepEnemy {
        /// Identifier of the enemy attempting to move.
        enemy: EnemyId,
        /// Offset proposed by the reaction system.
        delta: StepDelta,
    },
    /// Marks every tile within `radius` of `center` as revealed.
    Reveal {
        /// Tile at the center of the revealed square.
        center: CellCoord,
        /// Number of tiles revealed in each direction.
        radius: u32,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Announces that a fresh world replaced the previous one.
    WorldPopulated {
        /// Tile the player starts on.
        player: CellCoord,
        /// Number of enemies placed into the world.
        enemies: usize,
    },
    /// Confirms that the player moved between two tiles.
    PlayerMoved {
        /// Tile the player occupied before moving.
        from: CellCoord,
        /// Tile the player occupies after moving.
        to: CellCoord,
    },
    /// Reports that a player step was refused because the target was not walkable.
    PlayerMoveRejected {
        /// Direction of the refused step.
        direction: Direction,
        /// Tile that blocked the step.
        target: CellCoord,
    },
    /// Reports that an attack was requested against a tile without an enemy.
    AttackMissed {
        /// Tile that was attacked.
        target: CellCoord,
    },
    /// Describes the damage exchanged between the player and an enemy.
    AttackResolved {
        /// Enemy that defended.
        enemy: EnemyId,
        /// Damage dealt to the enemy.
        dealt: i32,
        /// Damage dealt back to the player.
        taken: i32,
        /// Verdict reported to the turn controller.
        outcome: AttackOutcome,
    },
    /// Announces that an enemy died and was removed from the world.
    EnemySlain {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
        /// Variant of the removed enemy.
        variant: EnemyVariant,
        /// Tile the enemy died on.
        cell: CellCoord,
        /// Experience awarded to the player.
        xp_reward: u32,
    },
    /// Announces that the player picked up an item.
    ItemLooted {
        /// Item appended to the inventory.
        item: ItemKind,
    },
    /// Announces that the player advanced to a new progression tier.
    TierAdvanced {
        /// Level of the tier that became active.
        level: u8,
        /// Experience remaining after the threshold was consumed.
        carried_xp: u32,
    },
    /// Announces that the player's health dropped to zero or below.
    PlayerDied {
        /// Tile the player died on.
        cell: CellCoord,
    },
    /// Confirms that an enemy moved between two tiles.
    EnemyMoved {
        /// Identifier of the enemy that moved.
        enemy: EnemyId,
        /// Tile occupied before the move.
        from: CellCoord,
        /// Tile occupied after the move.
        to: CellCoord,
    },
    /// Reports that an enemy step was refused because the destination was not walkable.
    EnemyStepRejected {
        /// Identifier of the enemy whose step was refused.
        enemy: EnemyId,
        /// Tile the enemy remains on.
        from: CellCoord,
        /// Destination that blocked the step.
        to: CellCoord,
    },
    /// Reports how many tiles flipped from hidden to revealed.
    TilesRevealed {
        /// Center of the revealed square.
        center: CellCoord,
        /// Number of tiles that were hidden before the reveal.
        newly_revealed: usize,
    },
}

/// Verdict produced by a single melee exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackOutcome {
    /// The player's health dropped to zero or below.
    PlayerDied,
    /// The defender died; the attacker may step into its tile.
    AttackerAdvances,
    /// Both combatants survived.
    NoOccupancyChange,
}

/// Cardinal directions available to player intents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
}

impl Direction {
    /// Every direction in a stable order.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Single-tile offset associated with the direction.
    #[must_use]
    pub const fn delta(self) -> StepDelta {
        match self {
            Self::Left => StepDelta::new(-1, 0),
            Self::Right => StepDelta::new(1, 0),
            Self::Up => StepDelta::new(0, -1),
            Self::Down => StepDelta::new(0, 1),
        }
    }
}

/// Offset in whole tiles applied to a position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepDelta {
    dx: i32,
    dy: i32,
}

impl StepDelta {
    /// Offset that leaves a position unchanged.
    pub const ZERO: StepDelta = StepDelta::new(0, 0);

    /// Creates a new delta from column and row offsets.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Column offset.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.dx
    }

    /// Row offset.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.dy
    }

    /// Reports whether the delta leaves a position unchanged.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Location of a single grid tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Chebyshev (king-move) distance between two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }

    /// Applies a delta and clamps the result into a `columns` by `rows` grid.
    ///
    /// Coordinates that would leave the grid collapse onto the nearest edge
    /// instead of failing, so callers at the border observe their own tile.
    #[must_use]
    pub fn offset_clamped(self, delta: StepDelta, columns: u32, rows: u32) -> CellCoord {
        clamp_cell(
            i64::from(self.column) + i64::from(delta.dx()),
            i64::from(self.row) + i64::from(delta.dy()),
            columns,
            rows,
        )
    }
}

/// Clamps a signed coordinate pair into a `columns` by `rows` grid.
///
/// A zero-sized axis clamps to index zero.
#[must_use]
pub fn clamp_cell(column: i64, row: i64, columns: u32, rows: u32) -> CellCoord {
    let max_column = i64::from(columns.saturating_sub(1));
    let max_row = i64::from(rows.saturating_sub(1));
    let column = column.clamp(0, max_column);
    let row = row.clamp(0, max_row);
    CellCoord::new(
        u32::try_from(column).unwrap_or(0),
        u32::try_from(row).unwrap_or(0),
    )
}

/// Unique identifier assigned to an enemy for its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Entity standing on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    /// The single player.
    Player,
    /// The enemy with the provided identifier.
    Enemy(EnemyId),
}

/// Terrain kind of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Walkable ground.
    Floor,
    /// Solid rock that is never entered.
    Wall,
}

/// Cosmetic mark left on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decoration {
    /// Blood left behind by a slain enemy.
    Blood,
}

/// Health, attack, and shield values carried by a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatStats {
    /// Current health; zero or below means dead.
    pub health: i32,
    /// Health restored on level-up.
    pub max_health: i32,
    /// Damage dealt per strike.
    pub attack: i32,
    /// Tracked defensive rating; melee ignores it.
    pub shield: i32,
}

impl CombatStats {
    /// Creates a stat block with full health.
    #[must_use]
    pub const fn new(max_health: i32, attack: i32, shield: i32) -> Self {
        Self {
            health: max_health,
            max_health,
            attack,
            shield,
        }
    }

    /// Stat block of a freshly created player.
    #[must_use]
    pub const fn starting_player() -> Self {
        Self::new(20, 3, 0)
    }
}

/// Enemy kinds known to the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyVariant {
    /// Common enemy.
    Elf,
    /// Sturdier enemy.
    Dwarf,
    /// Rare, fragile, hard-hitting enemy.
    GoldenEye,
}

impl EnemyVariant {
    /// Every variant in registry order.
    pub const ALL: [EnemyVariant; 3] = [
        EnemyVariant::Elf,
        EnemyVariant::Dwarf,
        EnemyVariant::GoldenEye,
    ];

    /// Number of faces on the die rolled by [`EnemyVariant::from_roll`].
    pub const ROLL_SIDES: u32 = 10;

    /// Maps a roll in `0..ROLL_SIDES` onto a variant.
    ///
    /// Rolls 0..=6 select an elf, 7..=8 a dwarf, and 9 a golden eye. Rolls
    /// beyond the die wrap around.
    #[must_use]
    pub const fn from_roll(roll: u32) -> Self {
        match roll % Self::ROLL_SIDES {
            0..=6 => Self::Elf,
            7 | 8 => Self::Dwarf,
            _ => Self::GoldenEye,
        }
    }

    /// Combat stats assigned to freshly spawned enemies of this variant.
    #[must_use]
    pub const fn stats(self) -> CombatStats {
        match self {
            Self::Elf => CombatStats::new(10, 2, 0),
            Self::Dwarf => CombatStats::new(15, 3, 0),
            Self::GoldenEye => CombatStats::new(5, 10, 0),
        }
    }

    /// Experience granted to the player when an enemy of this variant dies.
    #[must_use]
    pub const fn xp_reward(self) -> u32 {
        match self {
            Self::Elf => 10,
            Self::Dwarf => 15,
            Self::GoldenEye => 25,
        }
    }
}

/// Category of an inventory item, deciding which stat its deltas affect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    /// Adds its damage delta to the player's attack.
    Weapon,
    /// Adds its shield delta to the player's shield.
    Armor,
    /// Adds its health delta to the player's maximum health.
    HealthSlot,
    /// Carries value only.
    Currency,
}

/// Items known to the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Starting purse.
    Gold,
    /// Loot dropped by every slain enemy.
    LargeSword,
    /// Light body armour.
    LeatherArmour,
    /// Extra potion slot raising maximum health.
    HealthPotionSlot,
}

impl ItemKind {
    /// Item dropped by slain enemies.
    pub const LOOT_DROP: ItemKind = ItemKind::LargeSword;

    /// Builds the inventory record for this kind.
    #[must_use]
    pub const fn item(self) -> Item {
        match self {
            Self::Gold => Item::new(self, ItemCategory::Currency, 0, 0, 0, 10),
            Self::LargeSword => Item::new(self, ItemCategory::Weapon, 1, 0, 0, 0),
            Self::LeatherArmour => Item::new(self, ItemCategory::Armor, 0, 0, 1, 0),
            Self::HealthPotionSlot => Item::new(self, ItemCategory::HealthSlot, 0, 5, 0, 0),
        }
    }
}

/// Inventory entry with its stat deltas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// Registry entry the item was created from.
    pub kind: ItemKind,
    /// Category selecting which delta applies.
    pub category: ItemCategory,
    /// Attack delta applied by weapons.
    pub damage: i32,
    /// Maximum health delta applied by health slots.
    pub health: i32,
    /// Shield delta applied by armour.
    pub shield: i32,
    /// Worth of currency items.
    pub value: u32,
}

impl Item {
    const fn new(
        kind: ItemKind,
        category: ItemCategory,
        damage: i32,
        health: i32,
        shield: i32,
        value: u32,
    ) -> Self {
        Self {
            kind,
            category,
            damage,
            health,
            shield,
            value,
        }
    }
}

/// Player progression step unlocked by crossing an experience threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tier {
    /// Zero-based level of the tier.
    pub level: u8,
    /// Experience required to leave this tier for the next one.
    pub required_xp: u32,
    /// Attack bonus granted while the tier is active.
    pub damage: i32,
    /// Maximum health bonus granted when the tier is entered.
    pub health: i32,
    /// Shield bonus granted while the tier is active.
    pub shield: i32,
}

/// Ordered progression table. The final tier never advances.
pub const TIERS: [Tier; 5] = [
    Tier {
        level: 0,
        required_xp: 20,
        damage: 0,
        health: 0,
        shield: 0,
    },
    Tier {
        level: 1,
        required_xp: 50,
        damage: 1,
        health: 5,
        shield: 0,
    },
    Tier {
        level: 2,
        required_xp: 100,
        damage: 2,
        health: 5,
        shield: 1,
    },
    Tier {
        level: 3,
        required_xp: 200,
        damage: 4,
        health: 10,
        shield: 1,
    },
    Tier {
        level: 4,
        required_xp: u32::MAX,
        damage: 6,
        health: 10,
        shield: 2,
    },
];

impl Tier {
    /// Tier every player starts in.
    #[must_use]
    pub const fn first() -> Tier {
        TIERS[0]
    }

    /// Tier that follows this one, if any.
    #[must_use]
    pub fn next(&self) -> Option<Tier> {
        TIERS.get(usize::from(self.level) + 1).copied()
    }
}

/// Boolean floor/wall layout produced by an external map generator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallMask {
    columns: u32,
    rows: u32,
    cells: Vec<bool>,
}

impl WallMask {
    /// Creates a mask where every cell is either wall or floor.
    #[must_use]
    pub fn filled(columns: u32, rows: u32, wall: bool) -> Self {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![wall; capacity],
        }
    }

    /// Creates a mask from row-major cells where `true` marks a wall.
    ///
    /// Returns `None` when either dimension is zero or the cell count does not
    /// match the dimensions.
    #[must_use]
    pub fn from_cells(columns: u32, rows: u32, cells: Vec<bool>) -> Option<Self> {
        if columns == 0 || rows == 0 {
            return None;
        }
        let expected = usize::try_from(u64::from(columns) * u64::from(rows)).ok()?;
        if cells.len() != expected {
            return None;
        }
        Some(Self {
            columns,
            rows,
            cells,
        })
    }

    /// Number of columns in the mask.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the mask.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell is a wall. Cells outside the mask count as walls.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(true)
    }

    /// Marks a cell as wall or floor. Cells outside the mask are ignored.
    pub fn set_wall(&mut self, cell: CellCoord, wall: bool) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = wall;
            }
        }
    }

    /// Iterates over every cell in row-major order alongside its wall flag.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, bool)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, wall)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            (CellCoord::new(index % columns, index / columns), *wall)
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// External map generator consumed as a pure layout input.
pub trait LayoutSource {
    /// Produces a fresh wall mask with the requested dimensions.
    fn generate(&mut self, columns: u32, rows: u32) -> WallMask;
}

/// Enemy placement decided by the spawn planner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Identifier generated for the enemy.
    pub id: EnemyId,
    /// Variant rolled for the enemy.
    pub variant: EnemyVariant,
    /// Tile the enemy starts on.
    pub cell: CellCoord,
    /// Starting combat stats.
    pub stats: CombatStats,
    /// Experience granted on death.
    pub xp_reward: u32,
}

impl EnemySpawn {
    /// Creates a spawn using the registry stats of the variant.
    #[must_use]
    pub const fn from_variant(id: EnemyId, variant: EnemyVariant, cell: CellCoord) -> Self {
        Self {
            id,
            variant,
            cell,
            stats: variant.stats(),
            xp_reward: variant.xp_reward(),
        }
    }
}

/// Complete description of a world at creation time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPlan {
    /// Terrain layout the world is built from.
    pub mask: WallMask,
    /// Tile the player starts on.
    pub player: CellCoord,
    /// Starting stats of the player.
    pub player_stats: CombatStats,
    /// Enemies placed into the world, in placement order.
    pub enemies: Vec<EnemySpawn>,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Variant used for presentation and neighbor checks.
    pub variant: EnemyVariant,
    /// Tile currently occupied by the enemy.
    pub cell: CellCoord,
    /// Current combat stats.
    pub stats: CombatStats,
}

/// Read-only snapshot describing all enemies in the world.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}
