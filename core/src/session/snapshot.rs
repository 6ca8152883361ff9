//! Immutable session views
//!
//! External code never borrows live session state; it receives these
//! serializable copies via read-only polls.

use hashbrown::HashMap;
use serde::Serialize;

use super::{BattleResult, BattleSession, LogEntry, SessionId, SessionStatus, TempBuff};
use crate::session::BattleStats;

#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
    pub nickname: String,
    pub current_hp: i64,
    pub max_hp: i64,
    pub stats: BattleStats,
    pub power_strike_cooldown: u32,
    pub heals_used: u32,
    pub is_defending: bool,
    pub effects: HashMap<String, u32>,
    /// Whether this player's action slot is filled for the turn.
    pub has_acted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MobSnapshot {
    pub template_id: String,
    pub name: String,
    pub current_hp: i64,
    pub max_hp: i64,
    pub is_boss: bool,
    pub buffs: HashMap<String, TempBuff>,
    pub permanent_buffs: HashMap<String, f64>,
}

/// Read-only poll result for one session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub status: SessionStatus,
    pub current_turn: u32,
    pub players: Vec<PlayerSnapshot>,
    pub mob: MobSnapshot,
    pub battle_log: Vec<LogEntry>,
    pub result: Option<BattleResult>,
}

impl SessionSnapshot {
    pub(crate) fn of(session: &BattleSession) -> Self {
        Self {
            id: session.id,
            status: session.status,
            current_turn: session.current_turn,
            players: session
                .players
                .iter()
                .map(|p| PlayerSnapshot {
                    nickname: p.nickname.clone(),
                    current_hp: p.current_hp,
                    max_hp: p.max_hp,
                    stats: p.stats,
                    power_strike_cooldown: p.power_strike_cooldown,
                    heals_used: p.heals_used,
                    is_defending: p.is_defending,
                    effects: p.effects.clone(),
                    has_acted: session.pending_actions.contains_key(&p.nickname),
                })
                .collect(),
            mob: MobSnapshot {
                template_id: session.mob.template_id.clone(),
                name: session.mob.name.clone(),
                current_hp: session.mob.current_hp,
                max_hp: session.mob.max_hp,
                is_boss: session.mob.is_boss,
                buffs: session.mob.buffs.clone(),
                permanent_buffs: session.mob.permanent_buffs.clone(),
            },
            battle_log: session.battle_log.clone(),
            result: session.result.clone(),
        }
    }
}
