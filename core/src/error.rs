//! Error types for arena operations
//!
//! Every boundary failure is returned synchronously to the caller;
//! nothing in the core retries internally. Queue and action errors
//! never mutate state.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::SessionId;

/// Errors from queue operations (join, leave, pairing).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("unknown encounter '{0}'")]
    UnknownEncounter(String),

    #[error("encounter '{encounter}' is locked until '{prerequisite}' is completed")]
    EncounterLocked {
        encounter: String,
        prerequisite: String,
    },

    #[error("player '{0}' already holds a queue slot")]
    AlreadyQueued(String),

    #[error("player '{0}' is already in an active battle")]
    AlreadyInBattle(String),

    #[error("player '{0}' is not queued")]
    NotQueued(String),
}

/// Errors from action submission and session lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    #[error("session {0} is already finished")]
    SessionFinished(SessionId),

    #[error("player '{0}' is not part of this session")]
    NotInSession(String),

    #[error("player '{0}' already chose an action this turn")]
    AlreadyActed(String),

    #[error("player '{0}' is down and cannot act")]
    PlayerDown(String),

    #[error("action '{action}' is currently unavailable for '{nickname}'")]
    ActionUnavailable {
        nickname: String,
        action: &'static str,
    },
}

/// Errors while building the encounter catalog from TOML packs.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read encounter pack {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse encounter pack {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    #[error("encounter '{encounter}' references unknown ability '{ability}'")]
    UnknownAbility { encounter: String, ability: String },

    #[error("encounter '{encounter}' requires unknown prerequisite '{prerequisite}'")]
    UnknownPrerequisite {
        encounter: String,
        prerequisite: String,
    },

    #[error("encounter '{encounter}' has no abilities")]
    NoAbilities { encounter: String },
}

/// Errors during configuration load/save.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[from] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),
}
