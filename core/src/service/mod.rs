//! Arena orchestration
//!
//! The service owns every shared structure: the immutable catalog, the
//! matchmaking queues, the session registry and the progression store.
//! It is the concurrency boundary; everything below it is plain
//! single-threaded combat code.
//!
//! Lock order is fixed: queue mutex, then registry, then a session
//! mutex. The registry write lock is only ever taken while no session
//! mutex is held.

#[cfg(test)]
mod service_tests;

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashMap;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use crate::catalog::{ActionChoice, Catalog, EncounterTemplate};
use crate::config::ArenaConfig;
use crate::error::{ActionError, QueueError};
use crate::progress::{AttributeProvider, ProgressStore};
use crate::queue::QueueCoordinator;
use crate::resolver;
use crate::rewards::{self, CurrencyKind};
use crate::rng::ArenaRng;
use crate::session::{
    BattleOutcome, BattleSession, LogKind, MobCombatant, PlayerCombatant, SessionId,
    SessionSnapshot, SubmitState,
};

type SessionHandle = Arc<Mutex<BattleSession>>;

#[derive(Debug, Default)]
struct SessionRegistry {
    sessions: HashMap<SessionId, SessionHandle>,
    /// Active battle per player; entries removed the moment a battle
    /// finishes so players can requeue while the session lingers for
    /// inspection.
    by_player: HashMap<String, SessionId>,
}

/// Result of a queue join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Waiting for a partner.
    Queued,
    /// Paired immediately; the battle has started.
    Paired(SessionId),
}

/// Result of an action submission, after any resolution it triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored; the other player has not acted yet.
    Waiting,
    /// The turn resolved and the battle continues.
    TurnResolved,
    /// The turn resolved and ended the battle.
    BattleFinished(BattleOutcome),
}

/// One encounter as presented to a player, with their unlock state.
#[derive(Debug, Clone, Serialize)]
pub struct EncounterView {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub is_boss: bool,
    pub description: String,
    pub unlocked: bool,
    pub completed: bool,
}

/// The arena: matchmaking, sessions, resolution and rewards behind one
/// shared handle.
pub struct ArenaService {
    catalog: Arc<Catalog>,
    config: ArenaConfig,
    attributes: Arc<dyn AttributeProvider>,
    progress: Arc<dyn ProgressStore>,
    queues: Mutex<QueueCoordinator>,
    registry: RwLock<SessionRegistry>,
    next_session_id: AtomicU64,
    /// Parent RNG; each session gets an independent fork.
    seed_source: StdMutex<ArenaRng>,
}

impl ArenaService {
    pub fn new(
        catalog: Catalog,
        config: ArenaConfig,
        attributes: Arc<dyn AttributeProvider>,
        progress: Arc<dyn ProgressStore>,
    ) -> Self {
        let seed_source = match config.rng_seed {
            Some(seed) => ArenaRng::from_seed(seed),
            None => ArenaRng::from_entropy(),
        };
        Self {
            catalog: Arc::new(catalog),
            config,
            attributes,
            progress,
            queues: Mutex::new(QueueCoordinator::new()),
            registry: RwLock::new(SessionRegistry::default()),
            next_session_id: AtomicU64::new(1),
            seed_source: StdMutex::new(seed_source),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    // ═══════════════════════════════════════════════════════════════
    // Matchmaking
    // ═══════════════════════════════════════════════════════════════

    /// Queue a player for an encounter, pairing and starting a battle
    /// when a partner is already waiting.
    pub async fn join_queue(
        &self,
        nickname: &str,
        encounter_id: &str,
    ) -> Result<JoinOutcome, QueueError> {
        let Some(template) = self.catalog.encounter(encounter_id) else {
            return Err(QueueError::UnknownEncounter(encounter_id.to_string()));
        };
        if let Some(prerequisite) = &template.unlocked_by {
            if !self.progress.has_completed(nickname, prerequisite) {
                return Err(QueueError::EncounterLocked {
                    encounter: encounter_id.to_string(),
                    prerequisite: prerequisite.clone(),
                });
            }
        }

        // Queue lock held across pairing and registration so a pair is
        // formed and its session registered atomically.
        let mut queues = self.queues.lock().await;
        if self.registry.read().await.by_player.contains_key(nickname) {
            return Err(QueueError::AlreadyInBattle(nickname.to_string()));
        }

        match queues.join(nickname, encounter_id)? {
            None => Ok(JoinOutcome::Queued),
            Some(pair) => {
                let id = self.create_session(pair, template).await;
                Ok(JoinOutcome::Paired(id))
            }
        }
    }

    pub async fn leave_queue(&self, nickname: &str) -> Result<(), QueueError> {
        self.queues.lock().await.leave(nickname)
    }

    /// Waiting-player counts per encounter ID.
    pub async fn queue_counts(&self) -> HashMap<String, usize> {
        self.queues.lock().await.counts()
    }

    /// The encounter ladder as seen by one player.
    pub fn available_encounters(&self, nickname: &str) -> Vec<EncounterView> {
        self.catalog
            .encounters()
            .map(|template| {
                let unlocked = template
                    .unlocked_by
                    .as_ref()
                    .is_none_or(|prereq| self.progress.has_completed(nickname, prereq));
                EncounterView {
                    id: template.id.clone(),
                    name: template.name.clone(),
                    level: template.level,
                    is_boss: template.is_boss,
                    description: template.description.clone(),
                    unlocked,
                    completed: self.progress.has_completed(nickname, &template.id),
                }
            })
            .collect()
    }

    async fn create_session(&self, pair: [String; 2], template: &EncounterTemplate) -> SessionId {
        let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        let players = pair.clone().map(|nickname| {
            let sheet = self.attributes.sheet_for(&nickname);
            PlayerCombatant::new(nickname, sheet.stats, sheet.max_hp)
        });
        let mob = MobCombatant::from_template(template, &self.catalog);
        let rng = {
            let mut source = self.seed_source.lock().unwrap_or_else(|e| e.into_inner());
            source.fork()
        };
        let session = BattleSession::new(id, players, mob, rng);

        let mut registry = self.registry.write().await;
        for nickname in &pair {
            registry.by_player.insert(nickname.clone(), id);
        }
        registry.sessions.insert(id, Arc::new(Mutex::new(session)));
        tracing::info!(
            session = id,
            encounter = %template.id,
            first = %pair[0],
            second = %pair[1],
            "Battle started"
        );
        id
    }

    // ═══════════════════════════════════════════════════════════════
    // Combat
    // ═══════════════════════════════════════════════════════════════

    /// Submit one player's action for the given battle. When this
    /// fills the turn barrier, the turn resolves before the call
    /// returns.
    pub async fn submit_action(
        &self,
        id: SessionId,
        nickname: &str,
        action: ActionChoice,
    ) -> Result<SubmitOutcome, ActionError> {
        let handle = self
            .registry
            .read()
            .await
            .sessions
            .get(&id)
            .cloned()
            .ok_or(ActionError::SessionNotFound(id))?;

        let outcome = {
            let mut session = handle.lock().await;
            match session.submit(nickname, action)? {
                SubmitState::Waiting => SubmitOutcome::Waiting,
                SubmitState::Ready => match resolver::resolve_turn(&mut session, &self.catalog) {
                    None => SubmitOutcome::TurnResolved,
                    Some(outcome) => {
                        if outcome == BattleOutcome::Victory {
                            self.grant_rewards(&mut session);
                        }
                        SubmitOutcome::BattleFinished(outcome)
                    }
                },
            }
        };

        if matches!(outcome, SubmitOutcome::BattleFinished(_)) {
            self.release_players(id).await;
        }
        Ok(outcome)
    }

    /// Roll and persist rewards for every winner, appending a log
    /// entry per grant. Called under the session lock.
    fn grant_rewards(&self, session: &mut BattleSession) {
        let Some(template) = self.catalog.encounter(&session.mob.template_id) else {
            tracing::error!(
                session = session.id,
                template = %session.mob.template_id,
                "Encounter template vanished; no rewards granted"
            );
            return;
        };
        let winners = session
            .result
            .as_ref()
            .map(|r| r.winners.clone())
            .unwrap_or_default();

        let grants = rewards::distribute(&winners, &template.rewards, &mut session.rng);
        for grant in grants {
            self.progress
                .add_currency(&grant.nickname, CurrencyKind::Crystals, grant.crystals);
            self.progress
                .add_currency(&grant.nickname, CurrencyKind::Gold, grant.gold);
            self.progress
                .add_currency(&grant.nickname, CurrencyKind::Experience, grant.exp);
            if let Some(item) = grant.item.clone() {
                self.progress.add_item(&grant.nickname, item);
            }
            self.progress
                .mark_encounter_completed(&grant.nickname, &template.id);
            session.log(LogKind::Reward, grant.summary());
        }
    }

    // ═══════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════

    pub async fn active_session_for(&self, nickname: &str) -> Option<SessionId> {
        self.registry.read().await.by_player.get(nickname).copied()
    }

    pub async fn session_snapshot(&self, id: SessionId) -> Option<SessionSnapshot> {
        let handle = self.registry.read().await.sessions.get(&id).cloned()?;
        let session = handle.lock().await;
        Some(session.snapshot())
    }

    async fn release_players(&self, id: SessionId) {
        let mut registry = self.registry.write().await;
        registry.by_player.retain(|_, session_id| *session_id != id);
    }

    // ═══════════════════════════════════════════════════════════════
    // Sweeps
    // ═══════════════════════════════════════════════════════════════

    /// Force every stalled session's turn forward. Returns the number
    /// of sessions advanced.
    pub async fn sweep_stalled(&self) -> usize {
        let handles: Vec<(SessionId, SessionHandle)> = {
            let registry = self.registry.read().await;
            registry
                .sessions
                .iter()
                .map(|(id, handle)| (*id, handle.clone()))
                .collect()
        };

        let timeout = self.config.stall_timeout();
        let mut advanced = 0;
        let mut finished = Vec::new();
        for (id, handle) in handles {
            let mut session = handle.lock().await;
            if !session.is_stalled(timeout) {
                continue;
            }
            tracing::warn!(session = id, turn = session.current_turn, "Forcing stalled turn");
            // A forced turn deals no damage, so it can only end in a
            // timeout; no rewards apply.
            if resolver::resolve_stalled_turn(&mut session).is_some() {
                finished.push(id);
            }
            advanced += 1;
        }

        for id in finished {
            self.release_players(id).await;
        }
        advanced
    }

    /// Drop finished sessions past the retention window. Returns the
    /// number removed.
    pub async fn sweep_finished(&self) -> usize {
        let retention = self.config.retention();
        let mut registry = self.registry.write().await;
        let before = registry.sessions.len();
        registry.sessions.retain(|id, handle| {
            // Skip anything currently locked; the next sweep gets it.
            let Ok(session) = handle.try_lock() else {
                return true;
            };
            if session.is_expired(retention) {
                tracing::debug!(session = *id, "Session expired from retention");
                false
            } else {
                true
            }
        });
        before - registry.sessions.len()
    }
}
