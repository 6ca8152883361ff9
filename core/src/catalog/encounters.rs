//! Encounter template definitions
//!
//! Immutable adversary templates. Each template names its ability kit
//! by ID, carries reward ranges, and may gate behind a prerequisite
//! encounter for progression unlocking.

use serde::{Deserialize, Serialize};

/// An inclusive `[min, max]` reward range, stored as a TOML array.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RewardRange(pub i64, pub i64);

impl RewardRange {
    pub fn min(&self) -> i64 {
        self.0
    }

    pub fn max(&self) -> i64 {
        self.1
    }
}

/// Reward configuration for one encounter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardRanges {
    pub crystals: RewardRange,
    pub gold: RewardRange,
    pub exp: RewardRange,
    /// Percent chance (0..=100) of an item drop. Boss encounters only.
    #[serde(default)]
    pub item_chance: Option<f64>,
}

/// Immutable template describing one adversary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterTemplate {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub base_hp: i64,
    pub base_attack: i64,
    #[serde(default)]
    pub base_defense: i64,
    /// Ability IDs in declared order. The first executable ability is
    /// the default action; declaration order breaks frequency ties.
    pub abilities: Vec<String>,
    /// Encounter that must be completed before this one unlocks.
    #[serde(default)]
    pub unlocked_by: Option<String>,
    #[serde(default)]
    pub is_boss: bool,
    #[serde(default)]
    pub description: String,
    pub rewards: RewardRanges,
}

fn template(
    id: &str,
    name: &str,
    level: u32,
    base_hp: i64,
    base_attack: i64,
    base_defense: i64,
    abilities: &[&str],
) -> EncounterTemplate {
    EncounterTemplate {
        id: id.to_string(),
        name: name.to_string(),
        level,
        base_hp,
        base_attack,
        base_defense,
        abilities: abilities.iter().map(|a| a.to_string()).collect(),
        unlocked_by: None,
        is_boss: false,
        description: String::new(),
        rewards: RewardRanges {
            crystals: RewardRange(0, 0),
            gold: RewardRange(0, 0),
            exp: RewardRange(0, 0),
            item_chance: None,
        },
    }
}

/// The bundled encounter ladder, wolf through dragon.
pub(crate) fn builtin_encounters() -> Vec<EncounterTemplate> {
    vec![
        EncounterTemplate {
            description: "An aggressive wolf from the dark forest. Good for newcomers.".into(),
            rewards: RewardRanges {
                crystals: RewardRange(2, 4),
                gold: RewardRange(20, 35),
                exp: RewardRange(15, 25),
                item_chance: None,
            },
            ..template("wolf", "Forest Wolf", 1, 200, 20, 0, &["bite", "howl"])
        },
        EncounterTemplate {
            unlocked_by: Some("wolf".into()),
            description: "A massive troll with a club. Very hard to put down.".into(),
            rewards: RewardRanges {
                crystals: RewardRange(4, 7),
                gold: RewardRange(35, 55),
                exp: RewardRange(25, 40),
                item_chance: None,
            },
            ..template(
                "troll",
                "Mountain Troll",
                2,
                320,
                28,
                0,
                &["club_hit", "earthquake", "thick_skin"],
            )
        },
        EncounterTemplate {
            unlocked_by: Some("troll".into()),
            description: "An ancient golem of ice. Can freeze its enemies.".into(),
            rewards: RewardRanges {
                crystals: RewardRange(6, 10),
                gold: RewardRange(50, 80),
                exp: RewardRange(40, 60),
                item_chance: None,
            },
            ..template(
                "golem",
                "Ice Golem",
                3,
                480,
                35,
                0,
                &["ice_shard", "ice_storm", "regeneration"],
            )
        },
        EncounterTemplate {
            unlocked_by: Some("golem".into()),
            description: "A creature of pure flame. Grows stronger when wounded.".into(),
            rewards: RewardRanges {
                crystals: RewardRange(8, 15),
                gold: RewardRange(70, 120),
                exp: RewardRange(60, 90),
                item_chance: None,
            },
            ..template(
                "elemental",
                "Fire Elemental",
                4,
                650,
                42,
                0,
                &["fireball", "inferno", "flame_rage"],
            )
        },
        EncounterTemplate {
            unlocked_by: Some("elemental".into()),
            is_boss: true,
            description: "BOSS! A legendary dragon with devastating abilities and rich loot."
                .into(),
            rewards: RewardRanges {
                crystals: RewardRange(15, 25),
                gold: RewardRange(100, 200),
                exp: RewardRange(100, 150),
                item_chance: Some(60.0),
            },
            ..template(
                "dragon",
                "Ancient Dragon",
                5,
                900,
                55,
                0,
                &["claw_strike", "fire_breath", "sky_rage", "last_breath"],
            )
        },
    ]
}
