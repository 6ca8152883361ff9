//! Victory reward generation
//!
//! Rolled per winner from the encounter's reward ranges, using the
//! session's RNG so a seeded battle replays its loot. Invoked only on
//! victory; defeat, timeout and abort grant nothing.

use serde::Serialize;

use crate::catalog::RewardRanges;
use crate::rng::ArenaRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyKind {
    Crystals,
    Gold,
    Experience,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Weapon,
    Armor,
    Accessory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemRarity {
    Common,
    Rare,
    Epic,
}

impl ItemRarity {
    /// Stat bonus multiplier applied to the base roll.
    pub fn multiplier(self) -> f64 {
        match self {
            ItemRarity::Common => 1.0,
            ItemRarity::Rare => 1.5,
            ItemRarity::Epic => 2.0,
        }
    }

    /// Weighted roll: 70% common, 25% rare, 5% epic.
    fn roll(rng: &mut ArenaRng) -> Self {
        match rng.roll_inclusive(1, 100) {
            1..=70 => ItemRarity::Common,
            71..=95 => ItemRarity::Rare,
            _ => ItemRarity::Epic,
        }
    }
}

/// A dropped item with a single stat bonus.
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub name: String,
    pub item_type: ItemType,
    pub rarity: ItemRarity,
    /// Attribute the bonus applies to.
    pub bonus_stat: &'static str,
    pub bonus_value: i64,
}

/// Everything one winner walks away with.
#[derive(Debug, Clone, Serialize)]
pub struct RewardGrant {
    pub nickname: String,
    pub crystals: i64,
    pub gold: i64,
    pub exp: i64,
    pub item: Option<Item>,
}

impl RewardGrant {
    /// One-line summary for battle logs and the CLI.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{}: +{} crystals, +{} gold, +{} exp",
            self.nickname, self.crystals, self.gold, self.exp
        );
        if let Some(item) = &self.item {
            line.push_str(&format!(", found {}", item.name));
        }
        line
    }
}

/// Roll a grant for every winner, independently.
pub fn distribute(winners: &[String], rewards: &RewardRanges, rng: &mut ArenaRng) -> Vec<RewardGrant> {
    winners
        .iter()
        .map(|nickname| {
            let item = match rewards.item_chance {
                Some(chance) if rng.percent(chance) => Some(generate_item(rng)),
                _ => None,
            };
            RewardGrant {
                nickname: nickname.clone(),
                crystals: rng.roll_inclusive(rewards.crystals.min(), rewards.crystals.max()),
                gold: rng.roll_inclusive(rewards.gold.min(), rewards.gold.max()),
                exp: rng.roll_inclusive(rewards.exp.min(), rewards.exp.max()),
                item,
            }
        })
        .collect()
}

const ACCESSORY_STATS: [&str; 6] = [
    "strength",
    "endurance",
    "dexterity",
    "intelligence",
    "charisma",
    "luck",
];

const WEAPON_NAMES: [&str; 4] = ["Sword", "Axe", "Warhammer", "Spear"];
const ARMOR_NAMES: [&str; 4] = ["Shield", "Breastplate", "Helm", "Greaves"];
const ACCESSORY_NAMES: [&str; 4] = ["Ring", "Amulet", "Bracelet", "Talisman"];

/// Roll a random item: type, rarity, then a stat bonus scaled by
/// rarity.
pub fn generate_item(rng: &mut ArenaRng) -> Item {
    const TYPES: [ItemType; 3] = [ItemType::Weapon, ItemType::Armor, ItemType::Accessory];
    let item_type = TYPES[rng.pick_index(TYPES.len())];
    let rarity = ItemRarity::roll(rng);

    let (base_name, bonus_stat, base_value) = match item_type {
        ItemType::Weapon => (
            WEAPON_NAMES[rng.pick_index(WEAPON_NAMES.len())],
            "attack",
            rng.roll_inclusive(4, 10),
        ),
        ItemType::Armor => (
            ARMOR_NAMES[rng.pick_index(ARMOR_NAMES.len())],
            "defense",
            rng.roll_inclusive(3, 8),
        ),
        ItemType::Accessory => (
            ACCESSORY_NAMES[rng.pick_index(ACCESSORY_NAMES.len())],
            ACCESSORY_STATS[rng.pick_index(ACCESSORY_STATS.len())],
            rng.roll_inclusive(2, 5),
        ),
    };

    let bonus_value = ((base_value as f64 * rarity.multiplier()).floor() as i64).max(1);
    let name = match rarity {
        ItemRarity::Common => base_name.to_string(),
        ItemRarity::Rare => format!("Fine {base_name}"),
        ItemRarity::Epic => format!("Heroic {base_name}"),
    };

    Item {
        name,
        item_type,
        rarity,
        bonus_stat,
        bonus_value,
    }
}
