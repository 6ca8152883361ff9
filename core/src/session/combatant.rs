//! Combatant state for one battle session
//!
//! Player stats are snapshotted from the attribute provider at session
//! start; nothing here reads back into character sheets. The mob is
//! instantiated from its encounter template.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{AbilityKind, ActionChoice, Catalog, EncounterTemplate};

/// Battle-relevant player attributes, snapshotted at session start.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BattleStats {
    pub attack: i64,
    pub defense: i64,
    pub speed: i64,
    pub luck: i64,
    pub intelligence: i64,
}

/// A temporary adversary buff with a remaining duration in turns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TempBuff {
    pub value: f64,
    pub duration: u32,
}

/// One player's combat state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerCombatant {
    pub nickname: String,
    pub stats: BattleStats,
    pub max_hp: i64,
    pub current_hp: i64,

    // ─── Per-session action bookkeeping ─────────────────────────────
    /// Turns until power strike is available again.
    pub power_strike_cooldown: u32,
    /// Heals spent so far (saturates at the action's max uses).
    pub heals_used: u32,
    /// Set for the current turn only; reset by the effect tick.
    pub is_defending: bool,
    /// Extra defend reduction from a paired block; this turn only.
    pub combo_defense_bonus: Option<f64>,
    /// Timed effects (e.g. frozen) by name, value = remaining turns.
    pub effects: HashMap<String, u32>,
}

impl PlayerCombatant {
    pub fn new(nickname: impl Into<String>, stats: BattleStats, max_hp: i64) -> Self {
        Self {
            nickname: nickname.into(),
            stats,
            max_hp,
            current_hp: max_hp,
            power_strike_cooldown: 0,
            heals_used: 0,
            is_defending: false,
            combo_defense_bonus: None,
            effects: HashMap::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    pub fn has_effect(&self, name: &str) -> bool {
        self.effects.contains_key(name)
    }

    /// Apply damage, clamping HP at zero.
    pub fn apply_damage(&mut self, amount: i64) {
        self.current_hp = (self.current_hp - amount).max(0);
    }

    /// Restore HP up to the cap; returns the amount actually healed.
    pub fn heal(&mut self, amount: i64) -> i64 {
        let actual = amount.min(self.max_hp - self.current_hp);
        self.current_hp += actual;
        actual
    }

    /// Availability check performed at submission time. Cooldowns and
    /// use counts gate here; resolved turns never see an unavailable
    /// action.
    pub fn can_use(&self, action: ActionChoice) -> bool {
        let spec = action.spec();
        if spec.always_available {
            return true;
        }
        match action {
            ActionChoice::PowerStrike => self.power_strike_cooldown == 0,
            ActionChoice::Heal => spec.max_uses.is_none_or(|max| self.heals_used < max),
            ActionChoice::Attack | ActionChoice::Defend => true,
        }
    }
}

/// The adversary's combat state, derived from its template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobCombatant {
    pub template_id: String,
    pub name: String,
    pub attack: i64,
    pub defense: i64,
    pub max_hp: i64,
    pub current_hp: i64,
    /// Kit ability IDs in declared order.
    pub abilities: Vec<String>,
    pub is_boss: bool,
    /// Incoming damage reduction from passive kit abilities.
    pub passive_damage_reduction: f64,

    // ─── One-shot behavior flags ────────────────────────────────────
    pub rage_activated: bool,
    pub regeneration_used: bool,
    pub desperate_used: bool,

    // ─── Buffs ──────────────────────────────────────────────────────
    /// Temporary buffs by name; expired by the effect tick.
    pub buffs: HashMap<String, TempBuff>,
    /// Permanent buffs by name; never expire once set.
    pub permanent_buffs: HashMap<String, f64>,
}

impl MobCombatant {
    /// Instantiate the adversary from its template at full HP.
    pub fn from_template(template: &EncounterTemplate, catalog: &Catalog) -> Self {
        let passive_damage_reduction = catalog
            .kit_of(template)
            .iter()
            .filter(|a| a.kind == AbilityKind::Passive)
            .filter_map(|a| a.damage_reduction)
            .sum();

        Self {
            template_id: template.id.clone(),
            name: template.name.clone(),
            attack: template.base_attack,
            defense: template.base_defense,
            max_hp: template.base_hp,
            current_hp: template.base_hp,
            abilities: template.abilities.clone(),
            is_boss: template.is_boss,
            passive_damage_reduction,
            rage_activated: false,
            regeneration_used: false,
            desperate_used: false,
            buffs: HashMap::new(),
            permanent_buffs: HashMap::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Fraction of max HP remaining, for trigger thresholds.
    pub fn hp_fraction(&self) -> f64 {
        self.current_hp as f64 / self.max_hp as f64
    }

    /// Combined attack multiplier from temporary and permanent buffs.
    pub fn attack_multiplier(&self) -> f64 {
        let temp: f64 = self.buffs.values().map(|b| 1.0 + b.value).product();
        let perm: f64 = self.permanent_buffs.values().map(|v| 1.0 + v).product();
        temp * perm
    }

    pub fn apply_damage(&mut self, amount: i64) {
        self.current_hp = (self.current_hp - amount).max(0);
    }

    pub fn heal(&mut self, amount: i64) -> i64 {
        let actual = amount.min(self.max_hp - self.current_hp);
        self.current_hp += actual;
        actual
    }
}
