//! Co-op arena combat core
//!
//! Pairs two players against a scripted adversary and resolves their
//! battle in discrete simultaneous turns. The [`service::ArenaService`]
//! is the single entry point: it matches players from per-encounter
//! queues, owns every battle session, resolves turns when both action
//! slots fill, and pays out victory rewards into a progression store.
//!
//! Layering, top to bottom:
//! - [`service`]: shared handle, locking, sweeps
//! - [`queue`]: FIFO matchmaking buckets
//! - [`session`] / [`resolver`] / [`effects`]: combat state and rules
//! - [`catalog`]: static encounter and ability data plus TOML packs
//! - [`progress`] / [`rewards`]: character sheets and loot
//! - [`rng`] / [`config`] / [`error`]: plumbing

pub mod catalog;
pub mod config;
pub mod effects;
pub mod error;
pub mod progress;
pub mod queue;
pub mod resolver;
pub mod rewards;
pub mod rng;
pub mod service;
pub mod session;

pub use catalog::{ActionChoice, Catalog};
pub use config::ArenaConfig;
pub use error::{ActionError, CatalogError, ConfigError, QueueError};
pub use progress::{AttributeProvider, InMemoryProgress, ProgressStore, SheetProvider};
pub use service::{ArenaService, EncounterView, JoinOutcome, SubmitOutcome};
pub use session::{BattleOutcome, SessionId, SessionSnapshot};
