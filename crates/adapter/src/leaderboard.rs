//! Leaderboard collaborator
//!
//! Submissions are best effort: the runtime calls them off the game loop and
//! only logs failures.

use std::sync::Mutex;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub score: u32,
    pub level: u32,
}

pub trait Leaderboard: Send + Sync + 'static {
    fn submit(&self, entry: LeaderboardEntry) -> Result<()>;
    fn top(&self, n: usize) -> Result<Vec<LeaderboardEntry>>;
}

/// Local top-N board, best score first
#[derive(Debug)]
pub struct InMemoryLeaderboard {
    capacity: usize,
    entries: Mutex<Vec<LeaderboardEntry>>,
}

impl InMemoryLeaderboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Vec::new()),
        }
    }
}

impl Leaderboard for InMemoryLeaderboard {
    fn submit(&self, entry: LeaderboardEntry) -> Result<()> {
        let Ok(mut entries) = self.entries.lock() else {
            bail!("leaderboard lock poisoned");
        };
        // Same score reached again on the same level adds nothing.
        if entries.contains(&entry) {
            return Ok(());
        }
        let pos = entries
            .iter()
            .position(|e| (e.score, e.level) < (entry.score, entry.level))
            .unwrap_or(entries.len());
        entries.insert(pos, entry);
        entries.truncate(self.capacity);
        Ok(())
    }

    fn top(&self, n: usize) -> Result<Vec<LeaderboardEntry>> {
        let Ok(entries) = self.entries.lock() else {
            bail!("leaderboard lock poisoned");
        };
        Ok(entries.iter().take(n).copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: u32, level: u32) -> LeaderboardEntry {
        LeaderboardEntry { score, level }
    }

    #[test]
    fn keeps_best_first_and_caps_size() {
        let board = InMemoryLeaderboard::new(3);
        for (score, level) in [(300, 1), (1200, 2), (50, 1), (800, 1), (1200, 3)] {
            board.submit(entry(score, level)).unwrap();
        }
        assert_eq!(
            board.top(10).unwrap(),
            vec![entry(1200, 3), entry(1200, 2), entry(800, 1)]
        );
    }

    #[test]
    fn duplicate_submission_is_ignored() {
        let board = InMemoryLeaderboard::new(5);
        board.submit(entry(500, 1)).unwrap();
        board.submit(entry(500, 1)).unwrap();
        assert_eq!(board.top(5).unwrap().len(), 1);
    }
}
