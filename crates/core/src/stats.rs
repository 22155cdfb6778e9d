//! Session counters
//!
//! Grouped so they can be persisted and exposed as one read-only value.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::types::{BlockColor, BlockShape};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameStats {
    pub blocks_placed: u32,
    /// Running lines total. Each cleared line is counted twice per pass.
    pub lines_cleared: u32,
    /// Consecutive placements that cleared at least one line
    pub chain: u32,
    pub games_completed: u32,
    pub total_undos: u32,
    /// Resolution passes that cleared anything
    pub first_clears: u32,
    /// Resolution passes that cleared `COMBO_LINE_THRESHOLD` or more lines
    pub combos: u32,
    pub high_score: u32,
    pub highest_level: u32,
    /// Best score reached while on each level
    pub level_high_scores: BTreeMap<u32, u32>,
    /// Colors placed during the current level
    pub used_colors: BTreeSet<BlockColor>,
    /// Shapes placed during the current level
    pub used_shapes: BTreeSet<BlockShape>,
}

impl GameStats {
    /// Record `score` for `level`, returning true when it is a new best
    pub fn record_level_score(&mut self, level: u32, score: u32) -> bool {
        let best = self.level_high_scores.entry(level).or_insert(0);
        if score > *best {
            *best = score;
            true
        } else {
            false
        }
    }

    pub fn level_high_score(&self, level: u32) -> u32 {
        self.level_high_scores.get(&level).copied().unwrap_or(0)
    }

    /// Forget per-level diversity tracking
    pub fn reset_level_tracking(&mut self) {
        self.chain = 0;
        self.used_colors.clear();
        self.used_shapes.clear();
    }
}
