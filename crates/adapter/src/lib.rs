//! Adapter module - collaborators around the synchronous engine
//!
//! The core engine never waits on anything. Everything that may be slow or may
//! fail lives here and is driven from the events the engine emits:
//!
//! - [`achievements`]: catalog, progress book, debounced evaluation and
//!   self-dismissing unlock notifications
//! - [`leaderboard`]: score submission trait plus a local top-N board
//! - [`store`]: save/load of the persisted snapshot (JSON file or memory)
//! - [`runtime`]: [`Services`], the tokio-backed hub that runs all of the above
//!   fire-and-forget
//! - [`config`]: environment configuration
//!
//! # Environment Variables
//!
//! - `BLOCK_SMASH_SAVE_PATH`: JSON save file (default: keep saves in memory)
//! - `BLOCK_SMASH_AUTOSAVE`: save after every operation
//! - `BLOCK_SMASH_SERVICES_DISABLED`: set to "1" or "true" to run without collaborators
//!
//! See [`config`] for the full list.

pub mod achievements;
pub mod config;
pub mod leaderboard;
pub mod runtime;
pub mod store;

pub use block_smash_core as core;
pub use block_smash_types as types;

pub use achievements::{
    AchievementBook, AchievementDef, AchievementTracker, Notification, NotificationCenter,
};
pub use config::AdapterConfig;
pub use leaderboard::{InMemoryLeaderboard, Leaderboard, LeaderboardEntry};
pub use runtime::Services;
pub use store::{JsonFileStore, MemoryStore, SnapshotStore};
