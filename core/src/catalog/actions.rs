//! Player action catalog
//!
//! The four combat actions and their fixed parameters. Parameters are
//! static data shared by every session; a session only carries usage
//! bookkeeping (cooldown turns, use counts, defend flags).

use phf::phf_map;
use serde::{Deserialize, Serialize};

/// Extra defense fraction granted when both players defend together.
/// Stacks multiplicatively with the base defend reduction.
pub const COMBO_DEFENSE_BONUS: f64 = 0.2;

/// A player's chosen action for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionChoice {
    Attack,
    PowerStrike,
    Defend,
    Heal,
}

/// Fixed parameters for one action type.
#[derive(Debug, Clone, Copy)]
pub struct ActionSpec {
    pub name: &'static str,
    pub damage_multiplier: f64,
    /// Turns of cooldown imposed after use (0 = none).
    pub cooldown: u32,
    /// Maximum uses per battle (`None` = unlimited).
    pub max_uses: Option<u32>,
    /// Fraction of incoming damage removed while defending.
    pub damage_reduction: f64,
    /// Fraction of max HP restored.
    pub heal_percent: f64,
    /// Extra damage multiplier when both players pick this action.
    pub combo_multiplier: f64,
    pub always_available: bool,
}

static ATTACK: ActionSpec = ActionSpec {
    name: "Attack",
    damage_multiplier: 1.0,
    cooldown: 0,
    max_uses: None,
    damage_reduction: 0.0,
    heal_percent: 0.0,
    combo_multiplier: 1.2,
    always_available: true,
};

static POWER_STRIKE: ActionSpec = ActionSpec {
    name: "Power Strike",
    damage_multiplier: 1.8,
    cooldown: 3,
    max_uses: None,
    damage_reduction: 0.0,
    heal_percent: 0.0,
    combo_multiplier: 1.5,
    always_available: false,
};

static DEFEND: ActionSpec = ActionSpec {
    name: "Defend",
    damage_multiplier: 0.0,
    cooldown: 0,
    max_uses: None,
    damage_reduction: 0.6,
    heal_percent: 0.0,
    combo_multiplier: 1.0,
    always_available: true,
};

static HEAL: ActionSpec = ActionSpec {
    name: "Heal",
    damage_multiplier: 0.0,
    cooldown: 0,
    max_uses: Some(2),
    damage_reduction: 0.0,
    heal_percent: 0.35,
    combo_multiplier: 1.0,
    always_available: false,
};

/// Lookup from wire/CLI identifiers to action types.
pub static ACTIONS_BY_ID: phf::Map<&'static str, ActionChoice> = phf_map! {
    "attack" => ActionChoice::Attack,
    "power_strike" => ActionChoice::PowerStrike,
    "defend" => ActionChoice::Defend,
    "heal" => ActionChoice::Heal,
};

impl ActionChoice {
    pub const ALL: [ActionChoice; 4] = [
        ActionChoice::Attack,
        ActionChoice::PowerStrike,
        ActionChoice::Defend,
        ActionChoice::Heal,
    ];

    /// Static parameters for this action type.
    pub fn spec(self) -> &'static ActionSpec {
        match self {
            ActionChoice::Attack => &ATTACK,
            ActionChoice::PowerStrike => &POWER_STRIKE,
            ActionChoice::Defend => &DEFEND,
            ActionChoice::Heal => &HEAL,
        }
    }

    /// Stable identifier, matching the keys of [`ACTIONS_BY_ID`].
    pub fn id(self) -> &'static str {
        match self {
            ActionChoice::Attack => "attack",
            ActionChoice::PowerStrike => "power_strike",
            ActionChoice::Defend => "defend",
            ActionChoice::Heal => "heal",
        }
    }

    /// Whether the action deals weapon damage to the adversary.
    pub fn is_strike(self) -> bool {
        matches!(self, ActionChoice::Attack | ActionChoice::PowerStrike)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_lookup() {
        for action in ActionChoice::ALL {
            assert_eq!(ACTIONS_BY_ID.get(action.id()), Some(&action));
        }
    }

    #[test]
    fn action_parameters_match_the_design() {
        assert_eq!(ActionChoice::PowerStrike.spec().cooldown, 3);
        assert_eq!(ActionChoice::PowerStrike.spec().damage_multiplier, 1.8);
        assert_eq!(ActionChoice::Heal.spec().max_uses, Some(2));
        assert_eq!(ActionChoice::Heal.spec().heal_percent, 0.35);
        assert_eq!(ActionChoice::Defend.spec().damage_reduction, 0.6);
        assert!(ActionChoice::Attack.spec().always_available);
        assert!(ActionChoice::Defend.spec().always_available);
    }
}
