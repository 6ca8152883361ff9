use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use wylds_core::catalog::Catalog;
use wylds_core::config::ArenaConfig;
use wylds_core::progress::{InMemoryProgress, SheetProvider};
use wylds_core::service::ArenaService;

/// Long-running tasks owned by the CLI, aborted on exit.
#[derive(Default)]
pub struct BackgroundTasks {
    pub sweeper: Option<JoinHandle<()>>,
}

/// Holds all shared state for the CLI application.
/// This is a lightweight container - logic lives in the arena service.
#[derive(Clone)]
pub struct CliContext {
    pub service: Arc<ArenaService>,
    pub progress: Arc<InMemoryProgress>,
    pub tasks: Arc<Mutex<BackgroundTasks>>,
}

impl CliContext {
    pub fn new() -> Self {
        let config = ArenaConfig::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Using default configuration");
            ArenaConfig::default()
        });
        let catalog = match &config.encounter_pack_dir {
            Some(dir) => Catalog::with_packs(dir).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Encounter packs rejected; using built-ins");
                Catalog::builtin()
            }),
            None => Catalog::builtin(),
        };
        let progress = Arc::new(InMemoryProgress::new());
        let service = Arc::new(ArenaService::new(
            catalog,
            config,
            Arc::new(SheetProvider::new()),
            progress.clone(),
        ));
        Self {
            service,
            progress,
            tasks: Arc::new(Mutex::new(BackgroundTasks::default())),
        }
    }

    /// Spawn the periodic sweep that forces stalled turns and drops
    /// expired sessions.
    pub fn start_sweeper(&self) -> JoinHandle<()> {
        let service = self.service.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(5));
            loop {
                tick.tick().await;
                let forced = service.sweep_stalled().await;
                if forced > 0 {
                    tracing::info!(forced, "Stalled turns forced forward");
                }
                service.sweep_finished().await;
            }
        })
    }
}

impl Default for CliContext {
    fn default() -> Self {
        Self::new()
    }
}
