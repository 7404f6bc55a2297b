//! Experience, loot, and tier advancement.

use crawl_core::{Event, Item, ItemCategory, ItemKind};

use crate::entities::Player;

/// Grants the rewards of a kill: experience, the loot drop, then a tier check.
pub(crate) fn award_kill(player: &mut Player, xp: u32, loot: ItemKind, out_events: &mut Vec<Event>) {
    player.xp = player.xp.saturating_add(xp);

    let item = loot.item();
    player.inventory.push(item);
    apply_item(player, &item);
    out_events.push(Event::ItemLooted { item: loot });

    let _ = advance_tier(player, out_events);
}

/// Applies the stat delta selected by the item's category.
pub(crate) fn apply_item(player: &mut Player, item: &Item) {
    match item.category {
        ItemCategory::Weapon => player.stats.attack += item.damage,
        ItemCategory::Armor => player.stats.shield += item.shield,
        ItemCategory::HealthSlot => player.stats.max_health += item.health,
        ItemCategory::Currency => {}
    }
}

/// Moves the player into the next tier once the threshold is reached.
///
/// Damage and shield bonuses are per-tier and replace the previous tier's
/// bonus; health bonuses accumulate on maximum health. Experience beyond the
/// threshold carries over into the new tier. At most one tier is gained per
/// call.
pub(crate) fn advance_tier(player: &mut Player, out_events: &mut Vec<Event>) -> bool {
    let current = player.tier;
    if player.xp < current.required_xp {
        return false;
    }
    let Some(next) = current.next() else {
        return false;
    };

    let stats = &mut player.stats;
    stats.attack = stats.attack - current.damage + next.damage;
    stats.shield = stats.shield - current.shield + next.shield;
    stats.max_health += next.health;
    stats.health = stats.max_health;

    player.xp -= current.required_xp;
    player.tier = next;

    tracing::info!(
        level = next.level,
        carried_xp = player.xp,
        attack = stats.attack,
        max_health = stats.max_health,
        "player advanced a tier"
    );
    out_events.push(Event::TierAdvanced {
        level: next.level,
        carried_xp: player.xp,
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crawl_core::{CellCoord, CombatStats, Tier, TIERS};

    fn player() -> Player {
        Player::spawn(CellCoord::new(0, 0), CombatStats::starting_player())
    }

    #[test]
    fn reaching_the_threshold_exactly_advances_the_tier() {
        let mut player = player();
        player.stats.health = 4;
        let mut events = Vec::new();

        award_kill(&mut player, TIERS[0].required_xp, ItemKind::Gold, &mut events);

        assert_eq!(player.tier, TIERS[1]);
        assert_eq!(player.xp, 0);
        let base = CombatStats::starting_player();
        assert_eq!(player.stats.attack, base.attack + TIERS[1].damage);
        assert_eq!(player.stats.shield, base.shield + TIERS[1].shield);
        assert_eq!(player.stats.max_health, base.max_health + TIERS[1].health);
        assert_eq!(player.stats.health, player.stats.max_health);
        assert!(events.contains(&Event::TierAdvanced {
            level: 1,
            carried_xp: 0
        }));
    }

    #[test]
    fn level_up_carries_xp_overshoot_forward() {
        // The overshoot is kept as `xp - threshold`; it is never clamped back to
        // the threshold itself.
        let mut player = player();
        let mut events = Vec::new();

        award_kill(&mut player, TIERS[0].required_xp + 7, ItemKind::Gold, &mut events);

        assert_eq!(player.tier.level, 1);
        assert_eq!(player.xp, 7);
    }

    #[test]
    fn below_threshold_keeps_the_tier() {
        let mut player = player();
        let mut events = Vec::new();
        award_kill(&mut player, TIERS[0].required_xp - 1, ItemKind::Gold, &mut events);

        assert_eq!(player.tier, Tier::first());
        assert_eq!(events, vec![Event::ItemLooted { item: ItemKind::Gold }]);
    }

    #[test]
    fn tier_bonuses_replace_rather_than_stack() {
        let mut player = player();
        let mut events = Vec::new();
        award_kill(&mut player, TIERS[0].required_xp, ItemKind::Gold, &mut events);
        award_kill(&mut player, TIERS[1].required_xp, ItemKind::Gold, &mut events);

        let base = CombatStats::starting_player();
        assert_eq!(player.tier, TIERS[2]);
        assert_eq!(player.stats.attack, base.attack + TIERS[2].damage);
        assert_eq!(player.stats.shield, base.shield + TIERS[2].shield);
        assert_eq!(
            player.stats.max_health,
            base.max_health + TIERS[1].health + TIERS[2].health
        );
    }

    #[test]
    fn final_tier_never_advances() {
        let mut player = player();
        player.tier = TIERS[TIERS.len() - 1];
        player.xp = u32::MAX;
        let mut events = Vec::new();

        assert!(!advance_tier(&mut player, &mut events));
        assert!(events.is_empty());
    }

    #[test]
    fn items_apply_their_category_delta() {
        let mut player = player();
        let before = player.stats;
        apply_item(&mut player, &ItemKind::LargeSword.item());
        apply_item(&mut player, &ItemKind::LeatherArmour.item());
        apply_item(&mut player, &ItemKind::HealthPotionSlot.item());
        apply_item(&mut player, &ItemKind::Gold.item());

        assert_eq!(player.stats.attack, before.attack + 1);
        assert_eq!(player.stats.shield, before.shield + 1);
        assert_eq!(player.stats.max_health, before.max_health + 5);
        assert_eq!(player.stats.health, before.health);
    }
}
