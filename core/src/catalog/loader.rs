//! Encounter pack loading
//!
//! Packs are TOML files adding encounters and abilities on top of the
//! built-in set. A file can carry any mix of `[[ability]]` and
//! `[[encounter]]` tables:
//!
//! ```toml
//! [[ability]]
//! id = "venom_spit"
//! name = "Venom Spit"
//! kind = "single_attack"
//! freeze_chance = 0.1
//!
//! [[encounter]]
//! id = "basilisk"
//! name = "Cave Basilisk"
//! level = 3
//! base_hp = 400
//! base_attack = 30
//! abilities = ["venom_spit"]
//! rewards = { crystals = [5, 9], gold = [40, 70], exp = [30, 50] }
//! ```
//!
//! Pack entries override built-ins with the same ID.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AbilitySpec, EncounterTemplate};
use crate::error::CatalogError;

/// Root structure of one pack file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackConfig {
    #[serde(default, rename = "ability")]
    pub abilities: Vec<AbilitySpec>,

    #[serde(default, rename = "encounter")]
    pub encounters: Vec<EncounterTemplate>,
}

/// Load a single pack file.
pub fn load_pack_file(path: &Path) -> Result<PackConfig, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

/// Load every `.toml` pack in a directory, sorted by file name so
/// override order is stable. A missing directory yields no packs.
pub fn load_packs_from_dir(dir: &Path) -> Result<Vec<PackConfig>, CatalogError> {
    let mut packs = Vec::new();
    if !dir.exists() {
        return Ok(packs);
    }

    let entries = fs::read_dir(dir).map_err(|source| CatalogError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<_> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    for path in paths {
        tracing::debug!(path = %path.display(), "Loading encounter pack");
        packs.push(load_pack_file(&path)?);
    }

    Ok(packs)
}
