//! Per-encounter matchmaking queues
//!
//! Pure data structure; the service wraps one coordinator in a mutex
//! and performs eligibility checks before calling in. FIFO within an
//! encounter bucket, and a player holds at most one slot across all
//! buckets.

use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};

use crate::error::QueueError;

#[derive(Debug, Default)]
pub struct QueueCoordinator {
    /// Waiting players per encounter ID, in arrival order.
    buckets: HashMap<String, VecDeque<String>>,
    /// Every queued player, for the one-slot rule.
    queued: HashSet<String>,
}

impl QueueCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_queued(&self, nickname: &str) -> bool {
        self.queued.contains(nickname)
    }

    /// Enqueue a player for an encounter. Returns the paired players
    /// in arrival order when this fills a pair.
    ///
    /// The caller has already validated the encounter ID and the
    /// player's eligibility; this only enforces the one-slot rule.
    pub fn join(
        &mut self,
        nickname: &str,
        encounter_id: &str,
    ) -> Result<Option<[String; 2]>, QueueError> {
        if self.queued.contains(nickname) {
            return Err(QueueError::AlreadyQueued(nickname.to_string()));
        }

        let bucket = self.buckets.entry(encounter_id.to_string()).or_default();
        if let Some(partner) = bucket.pop_front() {
            self.queued.remove(&partner);
            tracing::debug!(encounter = encounter_id, first = %partner, second = nickname, "Pair formed");
            return Ok(Some([partner, nickname.to_string()]));
        }

        bucket.push_back(nickname.to_string());
        self.queued.insert(nickname.to_string());
        tracing::debug!(encounter = encounter_id, player = nickname, "Queued");
        Ok(None)
    }

    /// Remove a player from whichever bucket holds them.
    pub fn leave(&mut self, nickname: &str) -> Result<(), QueueError> {
        if !self.queued.remove(nickname) {
            return Err(QueueError::NotQueued(nickname.to_string()));
        }
        for bucket in self.buckets.values_mut() {
            bucket.retain(|n| n != nickname);
        }
        tracing::debug!(player = nickname, "Left the queue");
        Ok(())
    }

    /// Waiting-player count per encounter, for display.
    pub fn counts(&self) -> HashMap<String, usize> {
        self.buckets
            .iter()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(id, bucket)| (id.clone(), bucket.len()))
            .collect()
    }
}
