use std::sync::Arc;

use crate::catalog::{ActionChoice, Catalog};
use crate::config::ArenaConfig;
use crate::error::{ActionError, QueueError};
use crate::progress::{InMemoryProgress, ProgressStore, SheetProvider};
use crate::service::{ArenaService, JoinOutcome, SubmitOutcome};
use crate::session::BattleOutcome;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════

const AYLA: &str = "Ayla";
const BRICK: &str = "Brick";

fn make_service(config: ArenaConfig) -> (Arc<ArenaService>, Arc<InMemoryProgress>) {
    let progress = Arc::new(InMemoryProgress::new());
    let service = ArenaService::new(
        Catalog::builtin(),
        config,
        Arc::new(SheetProvider::new()),
        progress.clone(),
    );
    (Arc::new(service), progress)
}

fn seeded(seed: u64) -> ArenaConfig {
    ArenaConfig {
        rng_seed: Some(seed),
        ..ArenaConfig::default()
    }
}

async fn pair_on_wolf(service: &ArenaService) -> u64 {
    assert_eq!(
        service.join_queue(AYLA, "wolf").await.expect("join"),
        JoinOutcome::Queued
    );
    match service.join_queue(BRICK, "wolf").await.expect("join") {
        JoinOutcome::Paired(id) => id,
        JoinOutcome::Queued => panic!("second joiner must pair"),
    }
}

/// Drive a battle of matched attacks to its end.
async fn attack_until_finished(service: &ArenaService, id: u64) -> BattleOutcome {
    for _ in 0..64 {
        service.submit_action(id, AYLA, ActionChoice::Attack).await.expect("submit");
        let outcome = service
            .submit_action(id, BRICK, ActionChoice::Attack)
            .await
            .expect("submit");
        if let SubmitOutcome::BattleFinished(outcome) = outcome {
            return outcome;
        }
    }
    panic!("battle never finished");
}

// ═══════════════════════════════════════════════════════════════════
// Matchmaking
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn second_joiner_pairs_and_starts_a_battle() {
    let (service, _) = make_service(seeded(3));
    let id = pair_on_wolf(&service).await;

    assert_eq!(service.active_session_for(AYLA).await, Some(id));
    assert_eq!(service.active_session_for(BRICK).await, Some(id));

    let snapshot = service.session_snapshot(id).await.expect("snapshot");
    assert_eq!(snapshot.current_turn, 1);
    assert_eq!(snapshot.mob.name, "Forest Wolf");

    // Mid-battle players can neither queue nor pair again.
    assert_eq!(
        service.join_queue(AYLA, "wolf").await,
        Err(QueueError::AlreadyInBattle(AYLA.to_string()))
    );
}

#[tokio::test]
async fn locked_encounters_reject_queueing() {
    let (service, progress) = make_service(seeded(3));
    assert_eq!(
        service.join_queue(AYLA, "troll").await,
        Err(QueueError::EncounterLocked {
            encounter: "troll".to_string(),
            prerequisite: "wolf".to_string(),
        })
    );

    progress.mark_encounter_completed(AYLA, "wolf");
    assert_eq!(
        service.join_queue(AYLA, "troll").await.expect("join"),
        JoinOutcome::Queued
    );
}

#[tokio::test]
async fn unknown_encounters_are_rejected() {
    let (service, _) = make_service(seeded(3));
    assert_eq!(
        service.join_queue(AYLA, "kraken").await,
        Err(QueueError::UnknownEncounter("kraken".to_string()))
    );
}

#[tokio::test]
async fn leaving_the_queue_frees_the_slot() {
    let (service, _) = make_service(seeded(3));
    service.join_queue(AYLA, "wolf").await.expect("join");
    assert_eq!(service.queue_counts().await.get("wolf"), Some(&1));

    service.leave_queue(AYLA).await.expect("leave");
    assert!(service.queue_counts().await.is_empty());
    assert_eq!(
        service.leave_queue(AYLA).await,
        Err(QueueError::NotQueued(AYLA.to_string()))
    );
}

#[tokio::test]
async fn encounter_views_track_unlocks() {
    let (service, progress) = make_service(seeded(3));
    let views = service.available_encounters(AYLA);
    assert_eq!(views.len(), 5);
    assert!(views[0].unlocked, "first encounter starts unlocked");
    assert!(!views[1].unlocked);
    assert!(views[4].is_boss);

    progress.mark_encounter_completed(AYLA, "wolf");
    let views = service.available_encounters(AYLA);
    assert!(views[0].completed);
    assert!(views[1].unlocked);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_joiners_pair_exactly_once() {
    let (service, _) = make_service(seeded(3));
    let mut joins = tokio::task::JoinSet::new();
    for i in 0..10 {
        let service = service.clone();
        joins.spawn(async move {
            service
                .join_queue(&format!("player-{i}"), "wolf")
                .await
                .expect("join")
        });
    }

    let mut paired = 0;
    let mut queued = 0;
    while let Some(result) = joins.join_next().await {
        match result.expect("task") {
            JoinOutcome::Paired(_) => paired += 1,
            JoinOutcome::Queued => queued += 1,
        }
    }

    // Every player landed in exactly one place: 5 pairs, empty queue.
    assert_eq!(paired, 5);
    assert_eq!(queued, 5);
    assert!(service.queue_counts().await.is_empty());
    for i in 0..10 {
        assert!(
            service
                .active_session_for(&format!("player-{i}"))
                .await
                .is_some()
        );
    }
}

// ═══════════════════════════════════════════════════════════════════
// Combat through the service
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn the_barrier_holds_until_both_players_act() {
    let (service, _) = make_service(seeded(3));
    let id = pair_on_wolf(&service).await;

    assert_eq!(
        service.submit_action(id, AYLA, ActionChoice::Attack).await.expect("submit"),
        SubmitOutcome::Waiting
    );
    assert_eq!(
        service.submit_action(id, AYLA, ActionChoice::Defend).await,
        Err(ActionError::AlreadyActed(AYLA.to_string()))
    );

    assert_eq!(
        service.submit_action(id, BRICK, ActionChoice::Heal).await.expect("submit"),
        SubmitOutcome::TurnResolved
    );
    let snapshot = service.session_snapshot(id).await.expect("snapshot");
    assert_eq!(snapshot.current_turn, 2);
    assert!(snapshot.players.iter().all(|p| !p.has_acted));
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_submissions_resolve_the_turn_exactly_once() {
    let (service, _) = make_service(seeded(3));
    let id = pair_on_wolf(&service).await;

    let mut submits = tokio::task::JoinSet::new();
    for nickname in [AYLA, BRICK] {
        let service = service.clone();
        submits.spawn(async move {
            service
                .submit_action(id, nickname, ActionChoice::Attack)
                .await
                .expect("submit")
        });
    }

    let mut waiting = 0;
    let mut resolved = 0;
    while let Some(result) = submits.join_next().await {
        match result.expect("task") {
            SubmitOutcome::Waiting => waiting += 1,
            SubmitOutcome::TurnResolved => resolved += 1,
            SubmitOutcome::BattleFinished(outcome) => panic!("unexpected finish: {outcome:?}"),
        }
    }

    // Whichever submission lands second fills the barrier; the turn
    // resolves exactly once.
    assert_eq!(waiting, 1);
    assert_eq!(resolved, 1);
    let snapshot = service.session_snapshot(id).await.expect("snapshot");
    assert_eq!(snapshot.current_turn, 2);
    assert_eq!(snapshot.mob.current_hp, 200 - 60);
}

#[tokio::test]
async fn outsiders_cannot_act() {
    let (service, _) = make_service(seeded(3));
    let id = pair_on_wolf(&service).await;
    assert_eq!(
        service.submit_action(id, "Cato", ActionChoice::Attack).await,
        Err(ActionError::NotInSession("Cato".to_string()))
    );
}

#[tokio::test]
async fn unknown_sessions_are_rejected() {
    let (service, _) = make_service(seeded(3));
    pair_on_wolf(&service).await;
    assert_eq!(
        service.submit_action(999, AYLA, ActionChoice::Attack).await,
        Err(ActionError::SessionNotFound(999))
    );
}

#[tokio::test]
async fn victory_pays_out_and_releases_the_players() {
    let (service, progress) = make_service(seeded(3));
    let id = pair_on_wolf(&service).await;

    let outcome = attack_until_finished(&service, id).await;
    assert_eq!(outcome, BattleOutcome::Victory);

    for nickname in [AYLA, BRICK] {
        assert!(progress.has_completed(nickname, "wolf"));
        let snapshot = progress.snapshot(nickname);
        assert!((2..=4).contains(&snapshot.crystals));
        assert!((20..=35).contains(&snapshot.gold));
        assert!((15..=25).contains(&snapshot.exp));
        // Players are free to requeue while the session lingers.
        assert_eq!(service.active_session_for(nickname).await, None);
    }

    let snapshot = service.session_snapshot(id).await.expect("retained");
    assert!(snapshot.result.is_some());
    assert_eq!(
        service.join_queue(AYLA, "troll").await.expect("rejoin"),
        JoinOutcome::Queued
    );
}

#[tokio::test]
async fn timeout_grants_nothing() {
    let (service, progress) = make_service(seeded(3));
    let id = pair_on_wolf(&service).await;

    let mut outcome = SubmitOutcome::Waiting;
    for _ in 0..40 {
        service.submit_action(id, AYLA, ActionChoice::Defend).await.expect("submit");
        outcome = service
            .submit_action(id, BRICK, ActionChoice::Defend)
            .await
            .expect("submit");
        if matches!(outcome, SubmitOutcome::BattleFinished(_)) {
            break;
        }
    }

    assert_eq!(outcome, SubmitOutcome::BattleFinished(BattleOutcome::Timeout));
    assert!(!progress.has_completed(AYLA, "wolf"));
    assert_eq!(progress.snapshot(AYLA).gold, 0);
    assert_eq!(progress.snapshot(BRICK).exp, 0);
}

#[tokio::test]
async fn seeded_battles_replay_identically() {
    let run = |seed: u64| async move {
        let (service, progress) = make_service(seeded(seed));
        let id = pair_on_wolf(&service).await;
        attack_until_finished(&service, id).await;
        let snapshot = progress.snapshot(AYLA);
        (snapshot.crystals, snapshot.gold, snapshot.exp)
    };

    assert_eq!(run(99).await, run(99).await);
}

// ═══════════════════════════════════════════════════════════════════
// Sweeps
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn stalled_sessions_are_forced_forward() {
    let config = ArenaConfig {
        rng_seed: Some(3),
        stall_timeout_secs: 0,
        ..ArenaConfig::default()
    };
    let (service, _) = make_service(config);
    let id = pair_on_wolf(&service).await;
    service.submit_action(id, AYLA, ActionChoice::Attack).await.expect("submit");

    assert_eq!(service.sweep_stalled().await, 1);
    let snapshot = service.session_snapshot(id).await.expect("snapshot");
    // The turn advanced without any damage, and the stale submission
    // was discarded.
    assert_eq!(snapshot.current_turn, 2);
    assert_eq!(snapshot.mob.current_hp, snapshot.mob.max_hp);
    assert!(snapshot.players.iter().all(|p| p.current_hp == p.max_hp));
    assert!(snapshot.players.iter().all(|p| !p.has_acted));
}

#[tokio::test]
async fn abandoned_sessions_time_out_through_the_sweep() {
    let config = ArenaConfig {
        rng_seed: Some(3),
        stall_timeout_secs: 0,
        ..ArenaConfig::default()
    };
    let (service, progress) = make_service(config);
    let id = pair_on_wolf(&service).await;

    for _ in 0..30 {
        service.sweep_stalled().await;
    }

    let snapshot = service.session_snapshot(id).await.expect("snapshot");
    let result = snapshot.result.expect("timed out");
    assert_eq!(result.outcome, BattleOutcome::Timeout);
    assert!(!progress.has_completed(AYLA, "wolf"));
    // Both players were released for requeueing.
    assert_eq!(service.active_session_for(AYLA).await, None);
    assert_eq!(service.active_session_for(BRICK).await, None);
}

#[tokio::test]
async fn finished_sessions_expire_after_retention() {
    let config = ArenaConfig {
        rng_seed: Some(3),
        retention_secs: 0,
        ..ArenaConfig::default()
    };
    let (service, _) = make_service(config);
    let id = pair_on_wolf(&service).await;

    // Nothing to remove while the battle runs.
    assert_eq!(service.sweep_finished().await, 0);

    attack_until_finished(&service, id).await;
    assert_eq!(service.sweep_finished().await, 1);
    assert!(service.session_snapshot(id).await.is_none());
}
