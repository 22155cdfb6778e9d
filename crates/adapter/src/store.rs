//! Snapshot persistence
//!
//! The engine hands out [`PersistedGame`] values; where they end up is decided
//! here. [`JsonFileStore`] writes the JSON shape to disk, [`MemoryStore`] keeps
//! the latest save in process.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use log::debug;

use crate::core::PersistedGame;

pub trait SnapshotStore: Send + Sync + 'static {
    fn save(&self, game: &PersistedGame) -> Result<()>;
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<PersistedGame>>;
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Saves share one temp file; only one may write it at a time.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&self, game: &PersistedGame) -> Result<()> {
        let json = serde_json::to_string_pretty(game)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow!("file store lock poisoned"))?;
        // Write then rename so a crash never leaves a half-written save.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        debug!("saved game to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<PersistedGame>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            }
        };
        let game = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(Some(game))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<PersistedGame>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&self, game: &PersistedGame) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        *slot = Some(game.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<PersistedGame>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(slot.clone())
    }
}
