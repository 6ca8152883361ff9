//! Player attributes and persistent progression
//!
//! The arena core never owns character data; it asks an
//! [`AttributeProvider`] for battle stats at session start and pushes
//! completions and rewards into a [`ProgressStore`]. Both traits have
//! in-memory defaults so the core runs standalone.

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::rewards::{CurrencyKind, Item};
use crate::session::BattleStats;

/// A character's battle-relevant sheet, derived from raw attributes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub stats: BattleStats,
    pub max_hp: i64,
}

impl CharacterSheet {
    /// Derive combat numbers from raw attribute points.
    pub fn from_attributes(
        strength: i64,
        endurance: i64,
        dexterity: i64,
        luck: i64,
        intelligence: i64,
    ) -> Self {
        Self {
            stats: BattleStats {
                attack: 10 + strength * 3,
                defense: endurance * 2,
                speed: dexterity,
                luck,
                intelligence,
            },
            max_hp: 50 + endurance * 10,
        }
    }

    /// Baseline sheet for a character with no recorded attributes.
    pub fn baseline() -> Self {
        Self {
            stats: BattleStats {
                attack: 25,
                defense: 10,
                speed: 3,
                luck: 3,
                intelligence: 1,
            },
            max_hp: 100,
        }
    }
}

/// Source of battle stats, snapshotted once per session.
pub trait AttributeProvider: Send + Sync {
    fn sheet_for(&self, nickname: &str) -> CharacterSheet;
}

/// Provider backed by a fixed map, with a baseline fallback for
/// unknown players.
#[derive(Debug, Default)]
pub struct SheetProvider {
    sheets: HashMap<String, CharacterSheet>,
}

impl SheetProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, nickname: impl Into<String>, sheet: CharacterSheet) {
        self.sheets.insert(nickname.into(), sheet);
    }
}

impl AttributeProvider for SheetProvider {
    fn sheet_for(&self, nickname: &str) -> CharacterSheet {
        self.sheets
            .get(nickname)
            .copied()
            .unwrap_or_else(CharacterSheet::baseline)
    }
}

/// Sink for battle outcomes: completions unlock the next encounter,
/// currencies and items accumulate per player.
pub trait ProgressStore: Send + Sync {
    fn has_completed(&self, nickname: &str, encounter_id: &str) -> bool;
    fn mark_encounter_completed(&self, nickname: &str, encounter_id: &str);
    fn add_currency(&self, nickname: &str, kind: CurrencyKind, amount: i64);
    fn add_item(&self, nickname: &str, item: Item);
}

/// Per-player progression totals, for inspection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProgressSnapshot {
    pub completed: Vec<String>,
    pub crystals: i64,
    pub gold: i64,
    pub exp: i64,
    pub items: Vec<Item>,
}

#[derive(Debug, Default)]
struct PlayerProgress {
    completed: HashSet<String>,
    currencies: HashMap<CurrencyKind, i64>,
    items: Vec<Item>,
}

/// In-memory progression store; the default when no persistence layer
/// is wired in.
#[derive(Debug, Default)]
pub struct InMemoryProgress {
    players: Mutex<HashMap<String, PlayerProgress>>,
}

impl InMemoryProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals for one player; empty defaults for unknown players.
    pub fn snapshot(&self, nickname: &str) -> ProgressSnapshot {
        let players = self.players.lock().unwrap_or_else(|e| e.into_inner());
        let Some(progress) = players.get(nickname) else {
            return ProgressSnapshot::default();
        };
        let mut completed: Vec<String> = progress.completed.iter().cloned().collect();
        completed.sort();
        ProgressSnapshot {
            completed,
            crystals: progress.currencies.get(&CurrencyKind::Crystals).copied().unwrap_or(0),
            gold: progress.currencies.get(&CurrencyKind::Gold).copied().unwrap_or(0),
            exp: progress
                .currencies
                .get(&CurrencyKind::Experience)
                .copied()
                .unwrap_or(0),
            items: progress.items.clone(),
        }
    }
}

impl ProgressStore for InMemoryProgress {
    fn has_completed(&self, nickname: &str, encounter_id: &str) -> bool {
        let players = self.players.lock().unwrap_or_else(|e| e.into_inner());
        players
            .get(nickname)
            .is_some_and(|p| p.completed.contains(encounter_id))
    }

    fn mark_encounter_completed(&self, nickname: &str, encounter_id: &str) {
        let mut players = self.players.lock().unwrap_or_else(|e| e.into_inner());
        players
            .entry(nickname.to_string())
            .or_default()
            .completed
            .insert(encounter_id.to_string());
    }

    fn add_currency(&self, nickname: &str, kind: CurrencyKind, amount: i64) {
        let mut players = self.players.lock().unwrap_or_else(|e| e.into_inner());
        *players
            .entry(nickname.to_string())
            .or_default()
            .currencies
            .entry(kind)
            .or_insert(0) += amount;
    }

    fn add_item(&self, nickname: &str, item: Item) {
        let mut players = self.players.lock().unwrap_or_else(|e| e.into_inner());
        players.entry(nickname.to_string()).or_default().items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheets_derive_from_attributes() {
        let sheet = CharacterSheet::from_attributes(5, 4, 3, 2, 1);
        assert_eq!(sheet.stats.attack, 25);
        assert_eq!(sheet.stats.defense, 8);
        assert_eq!(sheet.max_hp, 90);
    }

    #[test]
    fn unknown_players_get_the_baseline_sheet() {
        let provider = SheetProvider::new();
        let sheet = provider.sheet_for("nobody");
        assert_eq!(sheet.stats.attack, 25);
        assert_eq!(sheet.stats.defense, 10);
        assert_eq!(sheet.max_hp, 100);
    }

    #[test]
    fn progress_accumulates_per_player() {
        let store = InMemoryProgress::new();
        store.add_currency("Ayla", CurrencyKind::Gold, 20);
        store.add_currency("Ayla", CurrencyKind::Gold, 15);
        store.mark_encounter_completed("Ayla", "wolf");

        assert!(store.has_completed("Ayla", "wolf"));
        assert!(!store.has_completed("Ayla", "troll"));
        assert!(!store.has_completed("Brick", "wolf"));

        let snapshot = store.snapshot("Ayla");
        assert_eq!(snapshot.gold, 35);
        assert_eq!(snapshot.completed, vec!["wolf".to_string()]);
        assert!(store.snapshot("Brick").completed.is_empty());
    }
}
