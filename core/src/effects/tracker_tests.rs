//! Tests for per-turn effect and cooldown bookkeeping

use super::*;
use crate::session::{BattleStats, PlayerCombatant, TempBuff};

// ═══════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════

fn make_player(nickname: &str) -> PlayerCombatant {
    PlayerCombatant::new(nickname, BattleStats::default(), 100)
}

fn make_mob() -> crate::session::MobCombatant {
    let catalog = crate::catalog::Catalog::builtin();
    let wolf = catalog.encounter("wolf").expect("wolf exists");
    crate::session::MobCombatant::from_template(wolf, &catalog)
}

// ═══════════════════════════════════════════════════════════════════
// Player bookkeeping
// ═══════════════════════════════════════════════════════════════════

#[test]
fn cooldown_decrements_and_stops_at_zero() {
    let mut player = make_player("ash");
    player.power_strike_cooldown = 2;
    tick_player(&mut player);
    assert_eq!(player.power_strike_cooldown, 1);
    tick_player(&mut player);
    assert_eq!(player.power_strike_cooldown, 0);
    tick_player(&mut player);
    assert_eq!(player.power_strike_cooldown, 0);
}

#[test]
fn defend_flags_reset_every_turn() {
    let mut player = make_player("ash");
    player.is_defending = true;
    player.combo_defense_bonus = Some(0.2);
    tick_player(&mut player);
    assert!(!player.is_defending);
    assert!(player.combo_defense_bonus.is_none());
}

#[test]
fn effects_expire_at_zero_and_are_removed() {
    let mut player = make_player("ash");
    player.effects.insert(FROZEN.to_string(), FROZEN_APPLY_TURNS);
    tick_player(&mut player);
    // Survives the applying turn's tick.
    assert!(player.has_effect(FROZEN));
    tick_player(&mut player);
    assert!(!player.has_effect(FROZEN));
}

#[test]
fn heals_used_is_untouched_by_the_tick() {
    let mut player = make_player("ash");
    player.heals_used = 1;
    tick_player(&mut player);
    assert_eq!(player.heals_used, 1);
}

// ═══════════════════════════════════════════════════════════════════
// Mob bookkeeping
// ═══════════════════════════════════════════════════════════════════

#[test]
fn temporary_buffs_expire_but_permanent_persist() {
    let mut mob = make_mob();
    mob.buffs.insert(
        "attack_bonus".to_string(),
        TempBuff {
            value: 0.15,
            duration: 2,
        },
    );
    mob.permanent_buffs.insert("attack_bonus".to_string(), 0.4);

    tick_mob(&mut mob);
    assert_eq!(mob.buffs["attack_bonus"].duration, 1);
    tick_mob(&mut mob);
    assert!(mob.buffs.is_empty());
    assert_eq!(mob.permanent_buffs["attack_bonus"], 0.4);

    // Multiplier now reflects only the permanent bonus.
    assert!((mob.attack_multiplier() - 1.4).abs() < 1e-9);
}

#[test]
fn tick_never_touches_hp() {
    let mut players = [make_player("ash"), make_player("brook")];
    players[0].current_hp = 42;
    let mut mob = make_mob();
    mob.current_hp = 123;

    tick_turn(&mut players, &mut mob);

    assert_eq!(players[0].current_hp, 42);
    assert_eq!(players[1].current_hp, 100);
    assert_eq!(mob.current_hp, 123);
}
