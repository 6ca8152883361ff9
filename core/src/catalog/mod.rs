//! Static combat data: encounters, adversary abilities, player actions
//!
//! The catalog is built once at startup and shared immutably. Built-in
//! data covers the bundled encounter ladder; TOML packs from a
//! configured directory merge on top, overriding by ID.

mod abilities;
mod actions;
mod encounters;
pub mod loader;

#[cfg(test)]
mod loader_tests;

use std::path::Path;
use std::sync::LazyLock;

use hashbrown::HashMap;

use crate::error::CatalogError;

pub use abilities::{AbilityKind, AbilitySpec};
pub use actions::{ACTIONS_BY_ID, ActionChoice, ActionSpec, COMBO_DEFENSE_BONUS};
pub use encounters::{EncounterTemplate, RewardRange, RewardRanges};
pub use loader::PackConfig;

/// The built-in catalog, shared by consumers that load no packs.
pub static BUILTIN_CATALOG: LazyLock<Catalog> = LazyLock::new(Catalog::builtin);

/// Immutable lookup for encounter templates and ability specs.
#[derive(Debug, Clone)]
pub struct Catalog {
    encounters: HashMap<String, EncounterTemplate>,
    abilities: HashMap<String, AbilitySpec>,
    /// Encounter IDs in presentation order (built-ins first, then
    /// packs in file order).
    order: Vec<String>,
}

impl Catalog {
    /// Catalog holding only the bundled data.
    pub fn builtin() -> Self {
        let mut catalog = Self {
            encounters: HashMap::new(),
            abilities: HashMap::new(),
            order: Vec::new(),
        };
        for ability in abilities::builtin_abilities() {
            catalog.insert_ability(ability);
        }
        for encounter in encounters::builtin_encounters() {
            catalog.insert_encounter(encounter);
        }
        debug_assert!(catalog.validate().is_ok());
        catalog
    }

    /// Built-in catalog plus every pack found in `dir`.
    pub fn with_packs(dir: &Path) -> Result<Self, CatalogError> {
        let mut catalog = Self::builtin();
        for pack in loader::load_packs_from_dir(dir)? {
            for ability in pack.abilities {
                catalog.insert_ability(ability);
            }
            for encounter in pack.encounters {
                catalog.insert_encounter(encounter);
            }
        }
        catalog.validate()?;
        Ok(catalog)
    }

    fn insert_ability(&mut self, ability: AbilitySpec) {
        if self.abilities.contains_key(&ability.id) {
            tracing::warn!(id = %ability.id, "Ability overridden by pack");
        }
        self.abilities.insert(ability.id.clone(), ability);
    }

    fn insert_encounter(&mut self, encounter: EncounterTemplate) {
        if self.encounters.contains_key(&encounter.id) {
            tracing::warn!(id = %encounter.id, "Encounter overridden by pack");
        } else {
            self.order.push(encounter.id.clone());
        }
        self.encounters.insert(encounter.id.clone(), encounter);
    }

    /// Check cross-references: every ability a template names and every
    /// unlock prerequisite must exist, and a kit may not be empty.
    fn validate(&self) -> Result<(), CatalogError> {
        for encounter in self.encounters.values() {
            if encounter.abilities.is_empty() {
                return Err(CatalogError::NoAbilities {
                    encounter: encounter.id.clone(),
                });
            }
            for ability in &encounter.abilities {
                if !self.abilities.contains_key(ability) {
                    return Err(CatalogError::UnknownAbility {
                        encounter: encounter.id.clone(),
                        ability: ability.clone(),
                    });
                }
            }
            if let Some(prerequisite) = &encounter.unlocked_by {
                if !self.encounters.contains_key(prerequisite) {
                    return Err(CatalogError::UnknownPrerequisite {
                        encounter: encounter.id.clone(),
                        prerequisite: prerequisite.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn encounter(&self, id: &str) -> Option<&EncounterTemplate> {
        self.encounters.get(id)
    }

    pub fn ability(&self, id: &str) -> Option<&AbilitySpec> {
        self.abilities.get(id)
    }

    /// Templates in presentation order.
    pub fn encounters(&self) -> impl Iterator<Item = &EncounterTemplate> {
        self.order.iter().filter_map(|id| self.encounters.get(id))
    }

    /// Resolve an encounter's kit to ability specs, preserving
    /// declaration order. Unknown IDs cannot occur after validation.
    pub fn kit_of(&self, template: &EncounterTemplate) -> Vec<&AbilitySpec> {
        template
            .abilities
            .iter()
            .filter_map(|id| self.abilities.get(id))
            .collect()
    }
}
