//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the whole grid engine: placement rules, line clears,
//! bonus scoring, level progression, undo and the level-seeded block generator.
//! It has **no dependencies** on rendering, networking, storage or async runtimes:
//!
//! - **Deterministic**: the tray for a given level is reproducible from the level number
//! - **Synchronous**: every operation runs to completion; observers are told afterwards
//! - **Portable**: persistence and collaborators live in other crates
//!
//! # Module Structure
//!
//! - [`board`]: square grid with placement checks, row/column clears and flood fill
//! - [`game_state`]: tray, scoring, level transitions, undo and game over
//! - [`rng`]: level-seeded LCG and block generator
//! - [`scoring`]: bonus values and the required-score step function
//! - [`events`]: outbound events, delegate trait and achievement signals
//! - [`snapshot`]: undo snapshot and the persisted save shape
//! - [`stats`]: session counters
//!
//! # Game Rules
//!
//! - The tray always holds 3 blocks while the game is running
//! - After a placement, full rows are cleared first, then full columns
//!   (checked against the row-cleared board)
//! - 100 points per line, +500 when the line is a single color, plus
//!   `matches × 1000` when a pass has two or more single-color lines
//! - +200 for every 4-connected group of 10+ cells left after a clear
//! - Emptying the board advances the level immediately
//! - The game ends when no tray block fits anywhere
//!
//! # Example
//!
//! ```
//! use block_smash_core::{GameConfig, GameState};
//!
//! let mut game = GameState::new(GameConfig::default());
//!
//! let (id, anchor) = game.find_hint().unwrap();
//! assert!(game.place_block_from_tray(id, anchor));
//!
//! assert!(game.can_undo());
//! assert!(game.undo_last_move());
//! assert_eq!(game.stats().total_undos, 1);
//! ```

pub mod board;
pub mod events;
pub mod game_state;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod stats;

pub use block_smash_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use events::{AchievementId, AchievementSignal, GameDelegate, GameEvent};
pub use game_state::{GameConfig, GameState};
pub use rng::{BlockGenerator, SimpleRng};
pub use scoring::{required_score, ClearReport};
pub use snapshot::{PersistedGame, SnapshotError, UndoSnapshot};
pub use stats::GameStats;
