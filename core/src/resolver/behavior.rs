//! Adversary decision procedure
//!
//! Pure selection: given the mob's state and the current turn, decide
//! what it does. Evaluated in strict priority order; the first match
//! wins. One-shot flags are read here but set by the executor, which
//! runs immediately after selection within the same resolved turn.

use crate::catalog::{AbilityKind, AbilitySpec, Catalog};
use crate::session::MobCombatant;

/// What the adversary does this turn.
#[derive(Debug, Clone, Copy)]
pub enum AbilityDecision<'a> {
    /// One-shot all-out attack on the full living party.
    Desperate(&'a AbilitySpec),
    /// One-shot permanent attack buff.
    Rage(&'a AbilitySpec),
    /// One-shot self heal.
    SelfHeal(&'a AbilitySpec),
    /// Low-HP pattern: AoE plus basic attack, every turn it holds.
    Pattern {
        aoe: &'a AbilitySpec,
        basic: &'a AbilitySpec,
    },
    /// An ordinary kit ability (frequency-triggered or default).
    Kit(&'a AbilitySpec),
}

/// Select the adversary's ability for this turn.
///
/// Priority: desperate attack, rage, self heal, attack pattern,
/// frequency trigger (kit declaration order), then the kit's first
/// executable ability. Returns `None` only for a kit with no
/// executable abilities, which catalog validation rules out.
pub fn select_ability<'a>(
    mob: &MobCombatant,
    catalog: &'a Catalog,
    turn: u32,
) -> Option<AbilityDecision<'a>> {
    let kit: Vec<&AbilitySpec> = mob
        .abilities
        .iter()
        .filter_map(|id| catalog.ability(id))
        .collect();
    let hp = mob.hp_fraction();

    // 1. Desperate attack at critically low HP, once.
    if !mob.desperate_used {
        if let Some(spec) = kit.iter().copied().find(|a| {
            a.kind == AbilityKind::DesperateAttack && threshold_met(a, hp)
        }) {
            return Some(AbilityDecision::Desperate(spec));
        }
    }

    // 2. Permanent rage buff, once.
    if !mob.rage_activated {
        if let Some(spec) = kit.iter().copied().find(|a| {
            a.kind == AbilityKind::ConditionalBuff && threshold_met(a, hp)
        }) {
            return Some(AbilityDecision::Rage(spec));
        }
    }

    // 3. Threshold self heal, once.
    if !mob.regeneration_used {
        if let Some(spec) = kit.iter().copied().find(|a| {
            a.kind == AbilityKind::Heal && a.trigger_hp.is_some() && threshold_met(a, hp)
        }) {
            return Some(AbilityDecision::SelfHeal(spec));
        }
    }

    // 4. Low-HP attack pattern: needs both an AoE and a basic attack
    //    in the kit; otherwise the pattern is ignored.
    if kit.iter().any(|a| {
        a.kind == AbilityKind::ConditionalAttackPattern && threshold_met(a, hp)
    }) {
        let aoe = kit.iter().copied().find(|a| a.kind == AbilityKind::AoeAttack);
        let basic = kit.iter().copied().find(|a| a.kind == AbilityKind::SingleAttack);
        if let (Some(aoe), Some(basic)) = (aoe, basic) {
            return Some(AbilityDecision::Pattern { aoe, basic });
        }
    }

    // 5. Frequency trigger, in kit declaration order.
    if let Some(spec) = kit.iter().copied().find(|a| {
        a.frequency.is_some_and(|f| f > 0 && turn % f == 0)
    }) {
        return Some(AbilityDecision::Kit(spec));
    }

    // 6. Default: the first executable ability in the kit.
    kit.iter()
        .copied()
        .find(|a| a.kind != AbilityKind::Passive)
        .map(AbilityDecision::Kit)
}

fn threshold_met(spec: &AbilitySpec, hp_fraction: f64) -> bool {
    spec.trigger_hp.is_some_and(|t| hp_fraction <= t)
}
