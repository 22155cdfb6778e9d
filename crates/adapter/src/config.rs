//! Environment configuration
//!
//! - `BLOCK_SMASH_GRID_SIZE`: board edge length (default 10, clamped to 5..=20)
//! - `BLOCK_SMASH_SAVE_PATH`: JSON save file; unset keeps saves in memory
//! - `BLOCK_SMASH_AUTOSAVE`: "1"/"true" saves after every operation (default: only on game over and level change)
//! - `BLOCK_SMASH_ACHIEVEMENT_DEBOUNCE_MS`: quiet period before achievements are evaluated (default 250)
//! - `BLOCK_SMASH_NOTIFICATION_MS`: how long unlock notifications stay visible (default 3000)
//! - `BLOCK_SMASH_LEADERBOARD_SIZE`: entries kept by the local leaderboard (default 100)
//! - `BLOCK_SMASH_SERVICES_DISABLED`: "1"/"true" runs the engine with no collaborators

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::GameConfig;
use crate::types::{DEFAULT_GRID_SIZE, NOTIFICATION_DISMISS_MS, UNDO_GRANT};

const DEFAULT_DEBOUNCE_MS: u64 = 250;
const DEFAULT_LEADERBOARD_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    pub grid_size: u8,
    pub save_path: Option<PathBuf>,
    pub autosave: bool,
    pub achievement_debounce: Duration,
    pub notification_dismiss: Duration,
    pub leaderboard_size: usize,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            save_path: None,
            autosave: false,
            achievement_debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            notification_dismiss: Duration::from_millis(NOTIFICATION_DISMISS_MS),
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
        }
    }
}

impl AdapterConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any key lookup (environment, test map, ...)
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let grid_size = var("BLOCK_SMASH_GRID_SIZE")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.grid_size);

        let save_path = var("BLOCK_SMASH_SAVE_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let autosave = var("BLOCK_SMASH_AUTOSAVE")
            .map(|v| is_truthy(&v))
            .unwrap_or(defaults.autosave);

        let achievement_debounce = var("BLOCK_SMASH_ACHIEVEMENT_DEBOUNCE_MS")
            .and_then(|s| s.trim().parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.achievement_debounce);

        let notification_dismiss = var("BLOCK_SMASH_NOTIFICATION_MS")
            .and_then(|s| s.trim().parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.notification_dismiss);

        let leaderboard_size = var("BLOCK_SMASH_LEADERBOARD_SIZE")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.leaderboard_size);

        Self {
            grid_size,
            save_path,
            autosave,
            achievement_debounce,
            notification_dismiss,
            leaderboard_size,
        }
    }

    /// Check if collaborators are disabled via environment
    pub fn is_disabled() -> bool {
        env::var("BLOCK_SMASH_SERVICES_DISABLED")
            .map(|v| is_truthy(&v))
            .unwrap_or(false)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            grid_size: self.grid_size,
            undo_grant: UNDO_GRANT,
        }
    }
}

fn is_truthy(v: &str) -> bool {
    v == "1" || v.eq_ignore_ascii_case("true")
}
