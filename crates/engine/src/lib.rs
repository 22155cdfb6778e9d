//! Engine layer - the game session and placement diagnostics
//!
//! [`GameSession`] is what a front end drives: it wraps the pure
//! [`GameState`](block_smash_core::GameState) and routes the events it emits to
//! a render delegate and the adapter services.

pub mod place;
pub mod session;

pub use block_smash_adapter as adapter;
pub use block_smash_core as core;
pub use block_smash_types as types;

pub use place::{apply_place, check_place, PlaceError};
pub use session::GameSession;
