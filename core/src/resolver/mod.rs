//! Turn resolution
//!
//! The resolver consumes a session whose turn barrier is satisfied and
//! executes one full turn: combo detection, player actions in seat
//! order, the adversary's decision and execution, the termination
//! check, and the end-of-turn effect tick. It is the only mutator of
//! combat state besides action submission and must run under the
//! session lock.

pub mod behavior;


use std::time::Instant;

use crate::catalog::{AbilitySpec, ActionChoice, COMBO_DEFENSE_BONUS, Catalog};
use crate::effects;
use crate::session::{
    BattleOutcome, BattleResult, BattleSession, LogKind, SessionStatus, TempBuff,
};

pub use behavior::{AbilityDecision, select_ability};

/// Hard cap on resolved turns; guarantees every session terminates.
pub const MAX_TURNS: u32 = 30;

/// Fraction of damage taken while defending.
pub const DEFEND_DAMAGE_TAKEN: f64 = 0.4;

/// Resolve one full turn. Returns the terminal outcome if the battle
/// ended, `None` if the session went back to awaiting actions.
pub fn resolve_turn(session: &mut BattleSession, catalog: &Catalog) -> Option<BattleOutcome> {
    session.status = SessionStatus::Resolving;
    tracing::debug!(session = session.id, turn = session.current_turn, "Resolving turn");

    // Broken invariants make combat fairness impossible; abandon the
    // session rather than attempt partial recovery.
    if let Err(violation) = check_invariants(session) {
        tracing::error!(
            session = session.id,
            violation,
            "Invariant violation; abandoning session"
        );
        session.log(LogKind::System, "The battle collapses in confusion.");
        session.finish(BattleResult {
            outcome: BattleOutcome::Aborted,
            message: "Battle abandoned after an internal error.".to_string(),
            winners: Vec::new(),
        });
        return Some(BattleOutcome::Aborted);
    }

    let combo = detect_combo(session);
    if let Some(action) = combo {
        let message = format!("COMBO! Both players use {}", action.spec().name);
        session.log(LogKind::Combo, message);
    }

    execute_player_actions(session, combo);

    if session.mob.is_alive() {
        execute_mob_action(session, catalog);
    }

    let outcome = check_termination(session);
    effects::tick_turn(&mut session.players, &mut session.mob);
    conclude(session, outcome)
}

/// Force a stalled turn forward: no player acts, the adversary holds,
/// only the effect tick, the termination check and the turn increment
/// run. Keeps the 30-turn liveness guarantee when a player never
/// submits.
pub fn resolve_stalled_turn(session: &mut BattleSession) -> Option<BattleOutcome> {
    if session.status != SessionStatus::AwaitingActions {
        return None;
    }
    session.status = SessionStatus::Resolving;
    session.log(LogKind::System, "The turn passes with no actions.");

    let outcome = check_termination(session);
    effects::tick_turn(&mut session.players, &mut session.mob);
    conclude(session, outcome)
}

// ═══════════════════════════════════════════════════════════════════
// Player side
// ═══════════════════════════════════════════════════════════════════

fn detect_combo(session: &BattleSession) -> Option<ActionChoice> {
    // A downed player submits nothing, so a lone survivor never combos.
    let mut actions = session
        .players
        .iter()
        .filter(|p| p.is_alive())
        .filter_map(|p| session.pending_action(&p.nickname));
    match (actions.next(), actions.next()) {
        (Some(a), Some(b)) if a == b => Some(a),
        _ => None,
    }
}

fn execute_player_actions(session: &mut BattleSession, combo: Option<ActionChoice>) {
    for i in 0..session.players.len() {
        if !session.players[i].is_alive() {
            continue;
        }
        let nickname = session.players[i].nickname.clone();
        let Some(action) = session.pending_action(&nickname) else {
            continue;
        };
        if session.players[i].has_effect(effects::FROZEN) {
            let message = format!("{nickname} is frozen solid and cannot act!");
            session.log(LogKind::PlayerFrozen, message);
            continue;
        }

        match action {
            ActionChoice::Attack | ActionChoice::PowerStrike => {
                player_strike(session, i, action, combo);
            }
            ActionChoice::Defend => {
                session.players[i].is_defending = true;
                session.log(LogKind::PlayerDefend, format!("{nickname} takes a guard stance"));
                if combo == Some(ActionChoice::Defend) {
                    session.players[i].combo_defense_bonus = Some(COMBO_DEFENSE_BONUS);
                    let message = format!("Paired block! Extra protection for {nickname}");
                    session.log(LogKind::Combo, message);
                }
            }
            ActionChoice::Heal => {
                let spec = action.spec();
                let amount =
                    (session.players[i].max_hp as f64 * spec.heal_percent).floor() as i64;
                let actual = session.players[i].heal(amount);
                session.players[i].heals_used += 1;
                let message = format!("{nickname} restores {actual} HP ({})", spec.name);
                session.log(LogKind::PlayerHeal, message);
            }
        }
    }
}

fn player_strike(
    session: &mut BattleSession,
    idx: usize,
    action: ActionChoice,
    combo: Option<ActionChoice>,
) {
    let spec = action.spec();
    let mut damage = session.players[idx].stats.attack as f64 * spec.damage_multiplier;
    if combo == Some(action) {
        damage *= spec.combo_multiplier;
    }
    damage *= 1.0 - session.mob.passive_damage_reduction;

    let dealt = ((damage - session.mob.defense as f64).floor() as i64).max(1);
    session.mob.apply_damage(dealt);

    if action == ActionChoice::PowerStrike {
        session.players[idx].power_strike_cooldown = spec.cooldown;
    }

    let message = format!(
        "{} hits the {} for {} damage ({})",
        session.players[idx].nickname, session.mob.name, dealt, spec.name
    );
    session.log(LogKind::PlayerAttack, message);
}

// ═══════════════════════════════════════════════════════════════════
// Adversary side
// ═══════════════════════════════════════════════════════════════════

fn execute_mob_action(session: &mut BattleSession, catalog: &Catalog) {
    let turn = session.current_turn;
    let Some(decision) = behavior::select_ability(&session.mob, catalog, turn) else {
        tracing::warn!(session = session.id, "Adversary has no executable ability");
        return;
    };

    match decision {
        AbilityDecision::Desperate(spec) => {
            session.mob.desperate_used = true;
            let message = format!("The {} unleashes {}!", session.mob.name, spec.name);
            session.log(LogKind::MobRage, message);
            aoe_strike(session, spec);
        }
        AbilityDecision::Rage(spec) => mob_rage(session, spec),
        AbilityDecision::SelfHeal(spec) => {
            session.mob.regeneration_used = true;
            mob_heal(session, spec);
        }
        AbilityDecision::Pattern { aoe, basic } => {
            aoe_strike(session, aoe);
            single_strike(session, basic);
        }
        AbilityDecision::Kit(spec) => execute_kit_ability(session, spec),
    }
}

fn execute_kit_ability(session: &mut BattleSession, spec: &AbilitySpec) {
    use crate::catalog::AbilityKind;

    match spec.kind {
        AbilityKind::SingleAttack => single_strike(session, spec),
        AbilityKind::AoeAttack => aoe_strike(session, spec),
        AbilityKind::Buff => {
            session.mob.buffs.insert(
                "attack_bonus".to_string(),
                TempBuff {
                    value: spec.attack_bonus.unwrap_or(0.0),
                    duration: spec.buff_duration.unwrap_or(1),
                },
            );
            let message = format!("The {} uses {}! Attack increased!", session.mob.name, spec.name);
            session.log(LogKind::MobBuff, message);
        }
        AbilityKind::Heal => mob_heal(session, spec),
        AbilityKind::ConditionalBuff => mob_rage(session, spec),
        AbilityKind::DesperateAttack => {
            session.mob.desperate_used = true;
            aoe_strike(session, spec);
        }
        // Selection never yields these directly.
        AbilityKind::Passive | AbilityKind::ConditionalAttackPattern => {}
    }
}

fn mob_rage(session: &mut BattleSession, spec: &AbilitySpec) {
    session.mob.rage_activated = true;
    session
        .mob
        .permanent_buffs
        .insert("attack_bonus".to_string(), spec.attack_bonus.unwrap_or(0.0));
    let message = format!(
        "The {} flies into a rage! Its attacks grow far stronger!",
        session.mob.name
    );
    session.log(LogKind::MobRage, message);
}

fn mob_heal(session: &mut BattleSession, spec: &AbilitySpec) {
    let amount = (session.mob.max_hp as f64 * spec.heal_percent.unwrap_or(0.0)).floor() as i64;
    let actual = session.mob.heal(amount);
    let message = format!(
        "The {} uses {} and restores {} HP!",
        session.mob.name, spec.name, actual
    );
    session.log(LogKind::MobHeal, message);
}

fn alive_player_indices(session: &BattleSession) -> Vec<usize> {
    session
        .players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_alive())
        .map(|(i, _)| i)
        .collect()
}

fn single_strike(session: &mut BattleSession, spec: &AbilitySpec) {
    let targets = alive_player_indices(session);
    if targets.is_empty() {
        return;
    }
    let target = targets[session.rng.pick_index(targets.len())];
    strike_player(session, target, spec);
}

fn aoe_strike(session: &mut BattleSession, spec: &AbilitySpec) {
    for target in alive_player_indices(session) {
        strike_player(session, target, spec);
    }
}

fn strike_player(session: &mut BattleSession, idx: usize, spec: &AbilitySpec) {
    let mut damage =
        session.mob.attack as f64 * spec.damage_multiplier * session.mob.attack_multiplier();

    let defending = session.players[idx].is_defending;
    if defending {
        damage *= DEFEND_DAMAGE_TAKEN;
        if let Some(bonus) = session.players[idx].combo_defense_bonus {
            damage *= 1.0 - bonus;
        }
    }
    damage -= session.players[idx].stats.defense as f64;

    let dealt = (damage.floor() as i64).max(1);
    session.players[idx].apply_damage(dealt);

    let blocked = if defending { " (blocked!)" } else { "" };
    let message = format!(
        "The {} hits {} for {} damage{}",
        session.mob.name, session.players[idx].nickname, dealt, blocked
    );
    session.log(LogKind::MobAttack, message);

    if let Some(chance) = spec.freeze_chance {
        if session.rng.chance(chance) {
            session.players[idx]
                .effects
                .insert(effects::FROZEN.to_string(), effects::FROZEN_APPLY_TURNS);
            let message = format!(
                "{} is frozen and will skip the next turn!",
                session.players[idx].nickname
            );
            session.log(LogKind::Freeze, message);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Termination
// ═══════════════════════════════════════════════════════════════════

fn check_termination(session: &BattleSession) -> Option<BattleOutcome> {
    if !session.mob.is_alive() {
        return Some(BattleOutcome::Victory);
    }
    if session.players.iter().all(|p| !p.is_alive()) {
        return Some(BattleOutcome::Defeat);
    }
    if session.current_turn >= MAX_TURNS {
        return Some(BattleOutcome::Timeout);
    }
    None
}

fn check_invariants(session: &BattleSession) -> Result<(), &'static str> {
    if session.pending_actions.len() > session.players.len() {
        return Err("more pending actions than players");
    }
    if session
        .pending_actions
        .keys()
        .any(|nickname| !session.is_participant(nickname))
    {
        return Err("pending action from a non-participant");
    }
    Ok(())
}

/// Common tail: clear the barrier, then either advance the turn or
/// finish the session.
fn conclude(session: &mut BattleSession, outcome: Option<BattleOutcome>) -> Option<BattleOutcome> {
    session.pending_actions.clear();
    session.last_activity = Instant::now();

    match outcome {
        Some(outcome) => {
            let result = make_result(session, outcome);
            session.log(LogKind::System, result.message.clone());
            tracing::info!(
                session = session.id,
                turn = session.current_turn,
                ?outcome,
                "Battle finished"
            );
            session.finish(result);
            Some(outcome)
        }
        None => {
            session.current_turn += 1;
            session.status = SessionStatus::AwaitingActions;
            None
        }
    }
}

fn make_result(session: &BattleSession, outcome: BattleOutcome) -> BattleResult {
    match outcome {
        BattleOutcome::Victory => BattleResult {
            outcome,
            message: format!("Victory! The {} is defeated!", session.mob.name),
            winners: session.players.iter().map(|p| p.nickname.clone()).collect(),
        },
        BattleOutcome::Defeat => BattleResult {
            outcome,
            message: format!("Defeat! Both heroes have fallen to the {}.", session.mob.name),
            winners: Vec::new(),
        },
        BattleOutcome::Timeout => BattleResult {
            outcome,
            message: format!("Time is up! The {} remains undefeated.", session.mob.name),
            winners: Vec::new(),
        },
        BattleOutcome::Aborted => BattleResult {
            outcome,
            message: "Battle abandoned after an internal error.".to_string(),
            winners: Vec::new(),
        },
    }
}
