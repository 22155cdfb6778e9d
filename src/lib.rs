//! Block Smash (workspace facade crate).
//!
//! Re-exports the workspace crates as `block_smash::{core,adapter,engine,types}`
//! so integration tests, benches and the CLI share one import path. The
//! implementation lives in dedicated crates under `crates/`.

pub mod cli;

pub use block_smash_adapter as adapter;
pub use block_smash_core as core;
pub use block_smash_engine as engine;
pub use block_smash_types as types;
