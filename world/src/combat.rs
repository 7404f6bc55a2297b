//! Melee exchange between the player and a single enemy.

use crawl_core::{AttackOutcome, Decoration, EnemyId, Event, ItemKind};

use crate::{entities::EntityStore, grid::Grid, progression};

/// Resolves one player attack against `enemy`.
///
/// The player strikes first; a surviving defender strikes back. Shields are
/// tracked on both sides but never reduce damage. Returns `None` when the
/// enemy does not exist.
pub(crate) fn resolve_attack(
    grid: &mut Grid,
    store: &mut EntityStore,
    enemy: EnemyId,
    out_events: &mut Vec<Event>,
) -> Option<AttackOutcome> {
    let player_attack = store.player().stats().attack;
    let defender = store.enemy_mut(enemy)?;

    defender.stats.health -= player_attack;
    let dealt = player_attack;
    let defender_alive = defender.stats.health > 0;
    let taken = if defender_alive {
        defender.stats.attack
    } else {
        0
    };
    let defender_cell = defender.cell;

    let player = store.player_mut();
    player.stats.health -= taken;

    let outcome = if player.is_dead() {
        AttackOutcome::PlayerDied
    } else if !defender_alive {
        AttackOutcome::AttackerAdvances
    } else {
        AttackOutcome::NoOccupancyChange
    };

    tracing::debug!(
        enemy = enemy.get(),
        dealt,
        taken,
        player_health = player.stats.health,
        ?outcome,
        "attack resolved"
    );
    out_events.push(Event::AttackResolved {
        enemy,
        dealt,
        taken,
        outcome,
    });

    match outcome {
        AttackOutcome::PlayerDied => {
            out_events.push(Event::PlayerDied { cell: player.cell });
        }
        AttackOutcome::AttackerAdvances => {
            let slain = store.remove_enemy(enemy)?;
            grid.set_occupant(defender_cell, None);
            grid.decorate(defender_cell, Decoration::Blood);
            out_events.push(Event::EnemySlain {
                enemy,
                variant: slain.variant,
                cell: defender_cell,
                xp_reward: slain.xp_reward,
            });
            progression::award_kill(
                store.player_mut(),
                slain.xp_reward,
                ItemKind::LOOT_DROP,
                out_events,
            );
        }
        AttackOutcome::NoOccupancyChange => {}
    }

    Some(outcome)
}
