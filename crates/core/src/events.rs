//! Events emitted by the engine
//!
//! `GameState` never calls out while it is mutating. Every operation appends
//! [`GameEvent`]s to an internal queue and the owner drains them once the
//! operation has returned, so observers only ever see fully-updated state.

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// Achievement signal ids understood by the achievements tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    Score1000,
    Score5000,
    Score10000,
    HighScore,
    HighestLevel,
    FirstClear,
    Combo3,
    Games10,
    Games50,
    Games100,
    Blocks100,
    ColorMaster,
    ShapeMaster,
    PerfectLevel,
    UndoUsed,
}

impl AchievementId {
    pub const ALL: [AchievementId; 15] = [
        AchievementId::Score1000,
        AchievementId::Score5000,
        AchievementId::Score10000,
        AchievementId::HighScore,
        AchievementId::HighestLevel,
        AchievementId::FirstClear,
        AchievementId::Combo3,
        AchievementId::Games10,
        AchievementId::Games50,
        AchievementId::Games100,
        AchievementId::Blocks100,
        AchievementId::ColorMaster,
        AchievementId::ShapeMaster,
        AchievementId::PerfectLevel,
        AchievementId::UndoUsed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AchievementId::Score1000 => "score_1000",
            AchievementId::Score5000 => "score_5000",
            AchievementId::Score10000 => "score_10000",
            AchievementId::HighScore => "high_score",
            AchievementId::HighestLevel => "highest_level",
            AchievementId::FirstClear => "first_clear",
            AchievementId::Combo3 => "combo_3",
            AchievementId::Games10 => "games_10",
            AchievementId::Games50 => "games_50",
            AchievementId::Games100 => "games_100",
            AchievementId::Blocks100 => "blocks_100",
            AchievementId::ColorMaster => "color_master",
            AchievementId::ShapeMaster => "shape_master",
            AchievementId::PerfectLevel => "perfect_level",
            AchievementId::UndoUsed => "undo_used",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }
}

/// A named progress value handed to the achievements tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AchievementSignal {
    pub id: AchievementId,
    pub value: u32,
}

impl AchievementSignal {
    pub fn new(id: AchievementId, value: u32) -> Self {
        Self { id, value }
    }
}

/// Everything the engine reports to the outside world
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Fired once at the end of every mutating operation
    StateChanged,
    /// Cells emptied by one resolution pass
    LinesCleared(Vec<Position>),
    /// Points awarded, with where to draw them
    ScoreAnimation { points: u32, position: Position },
    Achievement(AchievementSignal),
    /// A score worth submitting to the leaderboard
    LeaderboardUpdate { score: u32, level: u32 },
    LevelChanged { level: u32 },
    /// Final state reached; the owner should persist it
    GameOver { score: u32, level: u32 },
}

/// Listener for the render-facing subset of [`GameEvent`]
///
/// All methods default to no-ops so implementors pick what they need.
pub trait GameDelegate {
    fn on_state_changed(&mut self) {}

    fn on_lines_cleared(&mut self, _positions: &[Position]) {}

    fn on_score_animation(&mut self, _points: u32, _position: Position) {}
}

impl GameEvent {
    /// Forward this event to a delegate. Returns false for events the delegate
    /// does not handle (achievements, leaderboard, persistence).
    pub fn dispatch(&self, delegate: &mut dyn GameDelegate) -> bool {
        match self {
            GameEvent::StateChanged => delegate.on_state_changed(),
            GameEvent::LinesCleared(positions) => delegate.on_lines_cleared(positions),
            GameEvent::ScoreAnimation { points, position } => {
                delegate.on_score_animation(*points, *position)
            }
            _ => return false,
        }
        true
    }
}
