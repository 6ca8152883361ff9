//! Battle session state
//!
//! A session owns all mutable combat state for one paired match: two
//! player combatants, one adversary, the pending-action slots that
//! form the turn barrier, and the append-only battle log. The session
//! is a single-writer resource; the service wraps each one in a mutex
//! and the resolver is the only mutator besides [`BattleSession::submit`].

mod combatant;
mod snapshot;

use std::time::Instant;

use hashbrown::HashMap;
use serde::Serialize;

use crate::catalog::ActionChoice;
use crate::error::ActionError;
use crate::rng::ArenaRng;

pub use combatant::{BattleStats, MobCombatant, PlayerCombatant, TempBuff};
pub use snapshot::{MobSnapshot, PlayerSnapshot, SessionSnapshot};

pub type SessionId = u64;

/// Session lifecycle status.
///
/// Transitions only `AwaitingActions → Resolving → {AwaitingActions,
/// Finished}`. `Resolving` is transient and only ever observed by the
/// resolver itself, which runs under the session lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    AwaitingActions,
    Resolving,
    Finished,
}

/// How a finished battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    /// The adversary fell; both players win.
    Victory,
    /// Both players fell.
    Defeat,
    /// The 30-turn cap elapsed.
    Timeout,
    /// An internal invariant broke; combat fairness cannot be
    /// guaranteed, so the session was abandoned.
    Aborted,
}

/// Terminal result, set exactly when the session finishes.
#[derive(Debug, Clone, Serialize)]
pub struct BattleResult {
    pub outcome: BattleOutcome,
    pub message: String,
    /// Nicknames credited with the win (victory only).
    pub winners: Vec<String>,
}

/// Category tag for battle log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    System,
    Combo,
    PlayerAttack,
    PlayerDefend,
    PlayerHeal,
    PlayerFrozen,
    MobAttack,
    MobBuff,
    MobHeal,
    MobRage,
    Freeze,
    Reward,
}

/// One turn-tagged battle log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub turn: u32,
    pub kind: LogKind,
    pub message: String,
}

/// Result of an action submission, before any resolution runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    /// Stored; waiting on the other player.
    Waiting,
    /// Both slots filled; the barrier is satisfied and the caller must
    /// resolve the turn while still holding the session lock.
    Ready,
}

/// All mutable combat state for one paired match.
#[derive(Debug)]
pub struct BattleSession {
    pub id: SessionId,
    pub status: SessionStatus,
    /// Starts at 1 and increases by exactly 1 per resolved turn.
    pub current_turn: u32,
    /// The two paired players, in seat order (stable for resolution).
    pub players: [PlayerCombatant; 2],
    pub mob: MobCombatant,
    /// Turn barrier: at most one entry per player, cleared when a turn
    /// resolves.
    pub(crate) pending_actions: HashMap<String, ActionChoice>,
    pub battle_log: Vec<LogEntry>,
    /// Set if and only if `status == Finished`.
    pub result: Option<BattleResult>,
    /// Session-private RNG; forked from the service RNG at creation.
    pub(crate) rng: ArenaRng,
    /// Last submission or resolution, for the stall sweep.
    pub(crate) last_activity: Instant,
    /// Set when the session finishes, for the retention sweep.
    pub(crate) finished_at: Option<Instant>,
}

impl BattleSession {
    pub fn new(
        id: SessionId,
        players: [PlayerCombatant; 2],
        mob: MobCombatant,
        rng: ArenaRng,
    ) -> Self {
        debug_assert_ne!(players[0].nickname, players[1].nickname);
        let mut session = Self {
            id,
            status: SessionStatus::AwaitingActions,
            current_turn: 1,
            players,
            mob,
            pending_actions: HashMap::new(),
            battle_log: Vec::new(),
            result: None,
            rng,
            last_activity: Instant::now(),
            finished_at: None,
        };
        let message = format!(
            "{} and {} face the {}!",
            session.players[0].nickname, session.players[1].nickname, session.mob.name
        );
        session.log(LogKind::System, message);
        session
    }

    pub fn is_participant(&self, nickname: &str) -> bool {
        self.players.iter().any(|p| p.nickname == nickname)
    }

    pub fn player(&self, nickname: &str) -> Option<&PlayerCombatant> {
        self.players.iter().find(|p| p.nickname == nickname)
    }

    pub fn pending_action(&self, nickname: &str) -> Option<ActionChoice> {
        self.pending_actions.get(nickname).copied()
    }

    /// Submit one player's action for the current turn.
    ///
    /// Validates synchronously and mutates nothing on failure. When
    /// this fills the second slot, returns [`SubmitState::Ready`]: the
    /// caller holds the session lock and must resolve the turn before
    /// releasing it, which is what makes the barrier flip atomic.
    pub fn submit(
        &mut self,
        nickname: &str,
        action: ActionChoice,
    ) -> Result<SubmitState, ActionError> {
        if self.status == SessionStatus::Finished {
            return Err(ActionError::SessionFinished(self.id));
        }
        let Some(player) = self.players.iter().find(|p| p.nickname == nickname) else {
            return Err(ActionError::NotInSession(nickname.to_string()));
        };
        if !player.is_alive() {
            return Err(ActionError::PlayerDown(nickname.to_string()));
        }
        if self.pending_actions.contains_key(nickname) {
            return Err(ActionError::AlreadyActed(nickname.to_string()));
        }
        if !player.can_use(action) {
            return Err(ActionError::ActionUnavailable {
                nickname: nickname.to_string(),
                action: action.id(),
            });
        }

        self.pending_actions.insert(nickname.to_string(), action);
        self.last_activity = Instant::now();
        tracing::debug!(
            session = self.id,
            player = nickname,
            action = action.id(),
            "Action submitted"
        );

        // The barrier waits on living players only; a downed player
        // cannot submit, so requiring their slot would stall forever.
        let living = self.players.iter().filter(|p| p.is_alive()).count();
        if self.pending_actions.len() >= living {
            Ok(SubmitState::Ready)
        } else {
            Ok(SubmitState::Waiting)
        }
    }

    /// Append a turn-tagged log entry.
    pub(crate) fn log(&mut self, kind: LogKind, message: impl Into<String>) {
        self.battle_log.push(LogEntry {
            turn: self.current_turn,
            kind,
            message: message.into(),
        });
    }

    /// Transition to `Finished` with the given result.
    pub(crate) fn finish(&mut self, result: BattleResult) {
        self.status = SessionStatus::Finished;
        self.result = Some(result);
        self.finished_at = Some(Instant::now());
        self.last_activity = Instant::now();
    }

    /// Immutable view for external inspection.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::of(self)
    }

    pub(crate) fn is_stalled(&self, timeout: std::time::Duration) -> bool {
        self.status == SessionStatus::AwaitingActions && self.last_activity.elapsed() >= timeout
    }

    pub(crate) fn is_expired(&self, retention: std::time::Duration) -> bool {
        self.finished_at
            .is_some_and(|at| at.elapsed() >= retention)
    }
}
