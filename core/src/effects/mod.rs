//! Per-turn effect and cooldown bookkeeping
//!
//! Pure decrement-and-expire semantics, invoked exactly once per
//! resolved turn by the turn resolver (after the termination check).
//! Nothing here mutates HP and nothing here schedules itself.

#[cfg(test)]
mod tracker_tests;

use crate::session::{MobCombatant, PlayerCombatant};

/// Effect name attached by freezing attacks.
///
/// Applied with 2 turns so the tick at the end of the applying turn
/// consumes one point and the effect still covers the victim's next
/// action exactly.
pub const FROZEN: &str = "frozen";

/// Duration to insert when freezing a player. See [`FROZEN`].
pub const FROZEN_APPLY_TURNS: u32 = 2;

/// Advance every per-turn counter at the end of a resolved turn.
pub fn tick_turn(players: &mut [PlayerCombatant; 2], mob: &mut MobCombatant) {
    for player in players.iter_mut() {
        tick_player(player);
    }
    tick_mob(mob);
}

/// Player side: cooldowns down, one-turn flags reset, timed effects
/// decremented and expired at zero.
pub fn tick_player(player: &mut PlayerCombatant) {
    if player.power_strike_cooldown > 0 {
        player.power_strike_cooldown -= 1;
    }
    player.is_defending = false;
    player.combo_defense_bonus = None;

    for duration in player.effects.values_mut() {
        *duration = duration.saturating_sub(1);
    }
    player.effects.retain(|_, duration| *duration > 0);
}

/// Mob side: temporary buffs decremented and expired; permanent buffs
/// are never touched.
pub fn tick_mob(mob: &mut MobCombatant) {
    for buff in mob.buffs.values_mut() {
        buff.duration = buff.duration.saturating_sub(1);
    }
    mob.buffs.retain(|_, buff| buff.duration > 0);
}
