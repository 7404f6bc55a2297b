//! Player singleton and keyed enemy records.

use std::collections::BTreeMap;

use crawl_core::{
    CellCoord, CombatStats, EnemyId, EnemySnapshot, EnemySpawn, EnemyVariant, Item, ItemCategory,
    ItemKind, Tier,
};

/// The single player character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub(crate) cell: CellCoord,
    pub(crate) stats: CombatStats,
    pub(crate) xp: u32,
    pub(crate) tier: Tier,
    pub(crate) inventory: Vec<Item>,
}

impl Player {
    pub(crate) fn spawn(cell: CellCoord, stats: CombatStats) -> Self {
        Self {
            cell,
            stats,
            xp: 0,
            tier: Tier::first(),
            inventory: vec![ItemKind::Gold.item()],
        }
    }

    /// Tile the player stands on.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Current combat stats.
    #[must_use]
    pub const fn stats(&self) -> CombatStats {
        self.stats
    }

    /// Experience accumulated inside the current tier.
    #[must_use]
    pub const fn xp(&self) -> u32 {
        self.xp
    }

    /// Active progression tier.
    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.tier
    }

    /// Items in pickup order.
    #[must_use]
    pub fn inventory(&self) -> &[Item] {
        &self.inventory
    }

    /// Total value of the currency items carried.
    #[must_use]
    pub fn gold(&self) -> u32 {
        self.inventory
            .iter()
            .filter(|item| item.category == ItemCategory::Currency)
            .map(|item| item.value)
            .sum()
    }

    /// Reports whether the player's health dropped to zero or below.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.stats.health <= 0
    }
}

/// A hostile creature placed by the spawn planner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) variant: EnemyVariant,
    pub(crate) cell: CellCoord,
    pub(crate) stats: CombatStats,
    pub(crate) xp_reward: u32,
}

impl Enemy {
    fn from_spawn(spawn: &EnemySpawn) -> Self {
        Self {
            id: spawn.id,
            variant: spawn.variant,
            cell: spawn.cell,
            stats: spawn.stats,
            xp_reward: spawn.xp_reward,
        }
    }

    /// Identifier stable for the enemy's lifetime.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Variant the enemy was spawned as.
    #[must_use]
    pub const fn variant(&self) -> EnemyVariant {
        self.variant
    }

    /// Tile the enemy stands on.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Current combat stats.
    #[must_use]
    pub const fn stats(&self) -> CombatStats {
        self.stats
    }

    /// Experience granted to the player on death.
    #[must_use]
    pub const fn xp_reward(&self) -> u32 {
        self.xp_reward
    }

    /// Captures an immutable snapshot for systems.
    #[must_use]
    pub const fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            variant: self.variant,
            cell: self.cell,
            stats: self.stats,
        }
    }
}

/// Owner of the player and every living enemy.
#[derive(Clone, Debug)]
pub struct EntityStore {
    player: Player,
    enemies: BTreeMap<EnemyId, Enemy>,
}

impl EntityStore {
    pub(crate) fn new(player: Player) -> Self {
        Self {
            player,
            enemies: BTreeMap::new(),
        }
    }

    /// The player record.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Looks up a living enemy.
    #[must_use]
    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(&id)
    }

    /// Iterates over living enemies in ascending identifier order.
    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.values()
    }

    /// Identifiers of living enemies in ascending order.
    #[must_use]
    pub fn enemy_ids(&self) -> Vec<EnemyId> {
        self.enemies.keys().copied().collect()
    }

    /// Number of living enemies.
    #[must_use]
    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub(crate) fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub(crate) fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.get_mut(&id)
    }

    /// Inserts an enemy, refusing duplicate identifiers.
    pub(crate) fn insert_enemy(&mut self, spawn: &EnemySpawn) -> bool {
        if self.enemies.contains_key(&spawn.id) {
            return false;
        }
        let _ = self.enemies.insert(spawn.id, Enemy::from_spawn(spawn));
        true
    }

    pub(crate) fn remove_enemy(&mut self, id: EnemyId) -> Option<Enemy> {
        self.enemies.remove(&id)
    }
}
