//! Adversary ability definitions
//!
//! Abilities are identified by string IDs and referenced from
//! encounter templates. The built-in set covers the five bundled
//! encounters; TOML packs may add more or override by ID.

use serde::{Deserialize, Serialize};

/// Closed set of ability behaviors, dispatched exhaustively by the
/// turn resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    /// Damage one uniformly-random living player.
    SingleAttack,
    /// Damage every living player independently.
    AoeAttack,
    /// Install a temporary attack bonus on the adversary.
    Buff,
    /// Restore a fraction of the adversary's max HP.
    Heal,
    /// Always-on modifier (incoming damage reduction); never selected.
    Passive,
    /// One-shot permanent attack bonus below an HP threshold.
    ConditionalBuff,
    /// Below an HP threshold, AoE plus basic attack every turn.
    ConditionalAttackPattern,
    /// One-shot all-out attack at critically low HP.
    DesperateAttack,
}

/// One adversary ability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilitySpec {
    pub id: String,
    pub name: String,
    pub kind: AbilityKind,

    /// Multiplier over the adversary's base attack.
    #[serde(default = "default_multiplier")]
    pub damage_multiplier: f64,

    /// HP fraction at or below which a conditional ability fires.
    #[serde(default)]
    pub trigger_hp: Option<f64>,

    /// Fires on turns evenly divisible by this value.
    #[serde(default)]
    pub frequency: Option<u32>,

    /// Probability (0..=1) that a hit freezes its target.
    #[serde(default)]
    pub freeze_chance: Option<f64>,

    /// Attack bonus installed by buff kinds (0.15 = +15%).
    #[serde(default)]
    pub attack_bonus: Option<f64>,

    /// Duration in turns for temporary buffs.
    #[serde(default)]
    pub buff_duration: Option<u32>,

    /// Fraction of max HP restored by heal kinds.
    #[serde(default)]
    pub heal_percent: Option<f64>,

    /// Incoming damage reduction granted by passive kinds.
    #[serde(default)]
    pub damage_reduction: Option<f64>,
}

fn default_multiplier() -> f64 {
    1.0
}

fn spec(id: &str, name: &str, kind: AbilityKind) -> AbilitySpec {
    AbilitySpec {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        damage_multiplier: 1.0,
        trigger_hp: None,
        frequency: None,
        freeze_chance: None,
        attack_bonus: None,
        buff_duration: None,
        heal_percent: None,
        damage_reduction: None,
    }
}

/// The bundled ability set, covering the five built-in encounters.
pub(crate) fn builtin_abilities() -> Vec<AbilitySpec> {
    vec![
        // ── Forest Wolf ─────────────────────────────────────────────
        spec("bite", "Bite", AbilityKind::SingleAttack),
        AbilitySpec {
            frequency: Some(4),
            attack_bonus: Some(0.15),
            buff_duration: Some(2),
            ..spec("howl", "Howl", AbilityKind::Buff)
        },
        // ── Mountain Troll ──────────────────────────────────────────
        spec("club_hit", "Club Hit", AbilityKind::SingleAttack),
        AbilitySpec {
            frequency: Some(3),
            damage_multiplier: 0.75,
            ..spec("earthquake", "Earthquake", AbilityKind::AoeAttack)
        },
        AbilitySpec {
            damage_reduction: Some(0.1),
            ..spec("thick_skin", "Thick Skin", AbilityKind::Passive)
        },
        // ── Ice Golem ───────────────────────────────────────────────
        AbilitySpec {
            freeze_chance: Some(0.15),
            ..spec("ice_shard", "Ice Shard", AbilityKind::SingleAttack)
        },
        AbilitySpec {
            frequency: Some(3),
            damage_multiplier: 0.8,
            freeze_chance: Some(0.3),
            ..spec("ice_storm", "Ice Storm", AbilityKind::AoeAttack)
        },
        AbilitySpec {
            trigger_hp: Some(0.3),
            heal_percent: Some(0.2),
            ..spec("regeneration", "Regeneration", AbilityKind::Heal)
        },
        // ── Fire Elemental ──────────────────────────────────────────
        spec("fireball", "Fireball", AbilityKind::SingleAttack),
        AbilitySpec {
            frequency: Some(3),
            damage_multiplier: 1.2,
            ..spec("inferno", "Inferno", AbilityKind::AoeAttack)
        },
        AbilitySpec {
            trigger_hp: Some(0.25),
            attack_bonus: Some(0.4),
            ..spec("flame_rage", "Flame Rage", AbilityKind::ConditionalBuff)
        },
        // ── Ancient Dragon ──────────────────────────────────────────
        spec("claw_strike", "Claw Strike", AbilityKind::SingleAttack),
        AbilitySpec {
            frequency: Some(2),
            damage_multiplier: 1.1,
            ..spec("fire_breath", "Fire Breath", AbilityKind::AoeAttack)
        },
        AbilitySpec {
            trigger_hp: Some(0.5),
            ..spec("sky_rage", "Sky Rage", AbilityKind::ConditionalAttackPattern)
        },
        AbilitySpec {
            trigger_hp: Some(0.1),
            damage_multiplier: 3.0,
            ..spec("last_breath", "Last Breath", AbilityKind::DesperateAttack)
        },
    ]
}
