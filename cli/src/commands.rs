use std::io::Write;

use wylds_core::catalog::ACTIONS_BY_ID;
use wylds_core::service::{JoinOutcome, SubmitOutcome};
use wylds_core::session::SessionSnapshot;

use crate::CliContext;

pub async fn encounters(ctx: &CliContext, player: &str) {
    let counts = ctx.service.queue_counts().await;
    println!("{:<12} {:<16} {:>5}  {:<8} Waiting", "Id", "Name", "Lvl", "Status");
    println!("{}", "-".repeat(60));
    for view in ctx.service.available_encounters(player) {
        let status = if view.completed {
            "cleared"
        } else if view.unlocked {
            "open"
        } else {
            "locked"
        };
        let boss = if view.is_boss { " (BOSS)" } else { "" };
        let waiting = counts.get(&view.id).copied().unwrap_or(0);
        println!(
            "{:<12} {:<16} {:>5}  {:<8} {}",
            view.id,
            format!("{}{}", view.name, boss),
            view.level,
            status,
            waiting
        );
    }
}

pub async fn join(ctx: &CliContext, player: &str, encounter: &str) {
    match ctx.service.join_queue(player, encounter).await {
        Ok(JoinOutcome::Queued) => {
            println!("{player} queued for '{encounter}', waiting for a partner");
        }
        Ok(JoinOutcome::Paired(id)) => {
            println!("Partner found! Battle {id} begins.");
            if let Some(snapshot) = ctx.service.session_snapshot(id).await {
                print_status(&snapshot);
            }
        }
        Err(err) => println!("error: {err}"),
    }
}

pub async fn leave(ctx: &CliContext, player: &str) {
    match ctx.service.leave_queue(player).await {
        Ok(()) => println!("{player} left the queue"),
        Err(err) => println!("error: {err}"),
    }
}

pub async fn act(ctx: &CliContext, player: &str, action: &str) {
    let Some(choice) = ACTIONS_BY_ID.get(action).copied() else {
        let known: Vec<&str> = ACTIONS_BY_ID.keys().copied().collect();
        println!("error: unknown action '{action}' (one of: {})", known.join(", "));
        return;
    };

    // A finishing turn releases the player, but the session stays
    // inspectable by ID.
    let Some(id) = ctx.service.active_session_for(player).await else {
        println!("{player} has no active battle");
        return;
    };
    let outcome = match ctx.service.submit_action(id, player, choice).await {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("error: {err}");
            return;
        }
    };

    match outcome {
        SubmitOutcome::Waiting => println!("{player} is ready, waiting for the other player"),
        SubmitOutcome::TurnResolved => {
            if let Some(snapshot) = ctx.service.session_snapshot(id).await {
                print_turn_log(&snapshot, snapshot.current_turn.saturating_sub(1));
                print_status(&snapshot);
            }
        }
        SubmitOutcome::BattleFinished(_) => {
            if let Some(snapshot) = ctx.service.session_snapshot(id).await {
                print_turn_log(&snapshot, snapshot.current_turn);
                print_status(&snapshot);
            }
        }
    }
}

pub async fn status(ctx: &CliContext, player: &str) {
    let Some(id) = ctx.service.active_session_for(player).await else {
        println!("{player} has no active battle");
        return;
    };
    let Some(snapshot) = ctx.service.session_snapshot(id).await else {
        println!("{player} has no active battle");
        return;
    };
    print_status(&snapshot);
    let tail = snapshot.battle_log.len().saturating_sub(6);
    for entry in &snapshot.battle_log[tail..] {
        println!("  [t{}] {}", entry.turn, entry.message);
    }
}

pub async fn progress(ctx: &CliContext, player: &str) {
    let snapshot = ctx.progress.snapshot(player);
    println!(
        "{player}: {} crystals, {} gold, {} exp",
        snapshot.crystals, snapshot.gold, snapshot.exp
    );
    if !snapshot.completed.is_empty() {
        println!("  cleared: {}", snapshot.completed.join(", "));
    }
    for item in &snapshot.items {
        println!("  item: {} (+{} {})", item.name, item.bonus_value, item.bonus_stat);
    }
}

pub async fn show_settings(ctx: &CliContext) {
    let config = ctx.service.config();
    println!("stall timeout: {}s", config.stall_timeout_secs);
    println!("retention:     {}s", config.retention_secs);
    match config.rng_seed {
        Some(seed) => println!("rng seed:      {seed}"),
        None => println!("rng seed:      entropy"),
    }
    match &config.encounter_pack_dir {
        Some(dir) => println!("pack dir:      {}", dir.display()),
        None => println!("pack dir:      built-ins only"),
    }
}

pub fn exit() {
    write!(std::io::stdout(), "quitting...").ok();
    std::io::stdout().flush().ok();
}

fn print_status(snapshot: &SessionSnapshot) {
    let boss = if snapshot.mob.is_boss { " (BOSS)" } else { "" };
    println!(
        "=== Battle {} — turn {} — {}{} ===",
        snapshot.id, snapshot.current_turn, snapshot.mob.name, boss
    );
    println!(
        "  {:<12} HP {}/{}",
        snapshot.mob.name, snapshot.mob.current_hp, snapshot.mob.max_hp
    );
    for player in &snapshot.players {
        let acted = if player.has_acted { " [ready]" } else { "" };
        let down = if player.current_hp == 0 { " [down]" } else { "" };
        println!(
            "  {:<12} HP {}/{}{}{}",
            player.nickname, player.current_hp, player.max_hp, acted, down
        );
    }
    if let Some(result) = &snapshot.result {
        println!("  {}", result.message);
    }
}

fn print_turn_log(snapshot: &SessionSnapshot, turn: u32) {
    for entry in snapshot.battle_log.iter().filter(|e| e.turn == turn) {
        println!("  {}", entry.message);
    }
}
