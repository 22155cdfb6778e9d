//! Service runtime integration.
//!
//! Bridges the synchronous engine with async collaborators. Nothing here
//! blocks the caller: saves and leaderboard submissions run on the blocking
//! pool, achievement checks on a debounced task, and failures are logged.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;

use crate::achievements::{AchievementTracker, NotificationCenter};
use crate::config::AdapterConfig;
use crate::core::{AchievementSignal, PersistedGame};
use crate::leaderboard::{InMemoryLeaderboard, Leaderboard, LeaderboardEntry};
use crate::store::{JsonFileStore, MemoryStore, SnapshotStore};

/// Running collaborator set.
pub struct Services {
    // Owned runtime when started from the environment; `None` when borrowing a handle.
    _rt: Option<Runtime>,
    handle: Handle,
    config: AdapterConfig,
    achievements: AchievementTracker,
    leaderboard: Arc<dyn Leaderboard>,
    store: Arc<dyn SnapshotStore>,
}

impl Services {
    /// Start services from environment variables on a dedicated runtime.
    ///
    /// Returns `Ok(None)` if `BLOCK_SMASH_SERVICES_DISABLED` is set.
    pub fn start_from_env() -> Result<Option<Self>> {
        if AdapterConfig::is_disabled() {
            info!("services disabled");
            return Ok(None);
        }

        let config = AdapterConfig::from_env();
        let rt = Runtime::new().context("failed to create tokio runtime")?;
        let store: Arc<dyn SnapshotStore> = match &config.save_path {
            Some(path) => Arc::new(JsonFileStore::new(path)),
            None => Arc::new(MemoryStore::new()),
        };
        let leaderboard = Arc::new(InMemoryLeaderboard::new(config.leaderboard_size));

        let mut services = Self::new(rt.handle().clone(), config, leaderboard, store);
        services._rt = Some(rt);
        Ok(Some(services))
    }

    pub fn new(
        handle: Handle,
        config: AdapterConfig,
        leaderboard: Arc<dyn Leaderboard>,
        store: Arc<dyn SnapshotStore>,
    ) -> Self {
        let notifications = NotificationCenter::new(handle.clone(), config.notification_dismiss);
        let achievements =
            AchievementTracker::new(handle.clone(), config.achievement_debounce, notifications);
        Self {
            _rt: None,
            handle,
            config,
            achievements,
            leaderboard,
            store,
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub fn achievements(&self) -> &AchievementTracker {
        &self.achievements
    }

    pub fn achievements_mut(&mut self) -> &mut AchievementTracker {
        &mut self.achievements
    }

    pub fn leaderboard(&self) -> &Arc<dyn Leaderboard> {
        &self.leaderboard
    }

    pub fn report_achievements(&mut self, signals: Vec<AchievementSignal>) {
        if !signals.is_empty() {
            self.achievements.schedule(signals);
        }
    }

    /// Fire-and-forget score submission
    pub fn submit_score(&self, entry: LeaderboardEntry) -> JoinHandle<()> {
        let leaderboard = Arc::clone(&self.leaderboard);
        self.handle.spawn_blocking(move || {
            if let Err(e) = leaderboard.submit(entry) {
                warn!("leaderboard submit failed: {e:#}");
            }
        })
    }

    /// Fire-and-forget save
    pub fn save(&self, game: PersistedGame) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        self.handle.spawn_blocking(move || {
            if let Err(e) = store.save(&game) {
                warn!("save failed: {e:#}");
            }
        })
    }

    /// Load the last save. Errors are logged and treated as "no save".
    pub fn load(&self) -> Option<PersistedGame> {
        match self.store.load() {
            Ok(game) => game,
            Err(e) => {
                warn!("load failed: {e:#}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    struct Offline;

    impl Leaderboard for Offline {
        fn submit(&self, _entry: LeaderboardEntry) -> Result<()> {
            bail!("network unreachable")
        }

        fn top(&self, _n: usize) -> Result<Vec<LeaderboardEntry>> {
            bail!("network unreachable")
        }
    }

    #[tokio::test]
    async fn failed_submission_is_swallowed() {
        let services = Services::new(
            Handle::current(),
            AdapterConfig::default(),
            Arc::new(Offline),
            Arc::new(MemoryStore::new()),
        );
        let task = services.submit_score(LeaderboardEntry { score: 10, level: 1 });
        assert!(task.await.is_ok());
    }

    #[tokio::test]
    async fn save_then_load() {
        let services = Services::new(
            Handle::current(),
            AdapterConfig::default(),
            Arc::new(InMemoryLeaderboard::new(10)),
            Arc::new(MemoryStore::new()),
        );
        assert!(services.load().is_none());

        let game = crate::core::GameState::default().to_persisted();
        services.save(game.clone()).await.unwrap();
        assert_eq!(services.load(), Some(game));
    }
}
