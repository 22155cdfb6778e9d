//! Scoring module - line-clear bonuses and level thresholds
//!
//! Everything here is a pure function of its inputs; the engine decides when to
//! call them and routes the resulting points through `GameState::add_score`.

use crate::types::{
    COLOR_MATCH_BONUS, GROUP_BONUS, GROUP_BONUS_MIN_SIZE, LINE_CLEAR_BONUS,
    SUPER_BONUS_PER_MATCH,
};

/// Points for one cleared row or column
pub fn line_score(color_matched: bool) -> u32 {
    if color_matched {
        LINE_CLEAR_BONUS + COLOR_MATCH_BONUS
    } else {
        LINE_CLEAR_BONUS
    }
}

/// Extra bonus for several single-color lines in one resolution pass.
/// Zero unless at least two lines matched.
pub fn super_bonus(color_match_count: u32) -> u32 {
    if color_match_count >= 2 {
        color_match_count.saturating_mul(SUPER_BONUS_PER_MATCH)
    } else {
        0
    }
}

/// Bonus for one connected group of occupied cells
pub fn group_bonus(group_size: usize) -> u32 {
    if group_size >= GROUP_BONUS_MIN_SIZE {
        GROUP_BONUS
    } else {
        0
    }
}

/// Score needed to complete `level` (tiered step function)
pub fn required_score(level: u32) -> u32 {
    let multiplier = match level {
        0..=5 => 1000,
        6..=10 => 2000,
        11..=50 => 3000,
        _ => 5000,
    };
    level.saturating_mul(multiplier)
}

/// Per-pass summary of a line clear resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearReport {
    pub rows: Vec<u8>,
    pub cols: Vec<u8>,
    /// Lines whose cells all shared one color
    pub color_matches: u32,
    /// Connected groups that earned the group bonus
    pub bonus_groups: u32,
    /// Total points awarded during the pass
    pub points: u32,
    /// Board was emptied by the clear
    pub perfect_clear: bool,
}

impl ClearReport {
    pub fn lines(&self) -> u32 {
        (self.rows.len() + self.cols.len()) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }
}
