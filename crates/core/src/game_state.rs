//! Game state module - manages the complete game state
//!
//! This module ties together all core components: board, tray generator, scoring,
//! level progression and the single-slot undo. Every mutating operation runs to
//! completion synchronously and queues [`GameEvent`]s for the owner to drain.

use log::{debug, info, warn};

use crate::board::{Board, LineSet};
use crate::events::{AchievementId, AchievementSignal, GameEvent};
use crate::rng::BlockGenerator;
use crate::scoring::{group_bonus, line_score, required_score, super_bonus, ClearReport};
use crate::snapshot::{PersistedGame, SavedBlock, SnapshotError, Tray, UndoSnapshot};
use crate::stats::GameStats;
use crate::types::*;

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Board edge length, clamped to `MIN_GRID_SIZE..=MAX_GRID_SIZE`
    pub grid_size: u8,
    /// Undo credit restored after every successful placement
    pub undo_grant: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            undo_grant: UNDO_GRANT,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    tray: Tray,
    generator: BlockGenerator,
    /// Next id handed to a generated block
    next_block_id: u32,
    score: u32,
    level: u32,
    game_over: bool,
    /// This game's end was already counted in `games_completed`
    game_over_counted: bool,
    /// Score has reached the current level's requirement
    level_complete: bool,
    /// No block placed (and no undo used) since the level started
    perfect_level: bool,
    undo: Option<UndoSnapshot>,
    /// Earned undo credit
    ad_undo_count: u32,
    stats: GameStats,
    /// Outcome of the most recent resolution pass
    last_clear: Option<ClearReport>,
    /// Pending notifications, drained by the owner
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game at level 1
    pub fn new(config: GameConfig) -> Self {
        let board = Board::new(config.grid_size);
        let mut state = Self {
            config: GameConfig {
                grid_size: board.size(),
                ..config
            },
            board,
            tray: Tray::new(),
            generator: BlockGenerator::for_level(1),
            next_block_id: 1,
            score: 0,
            level: 1,
            game_over: false,
            game_over_counted: false,
            level_complete: false,
            perfect_level: true,
            undo: None,
            ad_undo_count: 0,
            stats: GameStats {
                highest_level: 1,
                ..Default::default()
            },
            last_clear: None,
            events: Vec::new(),
        };
        state.refill_tray();
        state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tray(&self) -> &[Block] {
        &self.tray
    }

    /// Look up a tray block by id
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.tray.iter().find(|b| b.id == id)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn level_complete(&self) -> bool {
        self.level_complete
    }

    pub fn perfect_level(&self) -> bool {
        self.perfect_level
    }

    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }

    pub fn ad_undo_count(&self) -> u32 {
        self.ad_undo_count
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn high_score(&self) -> u32 {
        self.stats.high_score
    }

    /// Score needed to finish the current level
    pub fn required_score(&self) -> u32 {
        required_score(self.level)
    }

    /// Seed a known global high score (e.g. from the leaderboard)
    pub fn set_high_score(&mut self, high_score: u32) {
        self.stats.high_score = self.stats.high_score.max(high_score);
    }

    /// Result of the last placement's line resolution
    pub fn last_clear(&self) -> Option<&ClearReport> {
        self.last_clear.as_ref()
    }

    /// Take all queued events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ---------------------------------------------------------------------
    // Placement
    // ---------------------------------------------------------------------

    /// Whether `block` fits at `anchor`. Side-effect free.
    pub fn can_place_block(&self, block: &Block, anchor: Position) -> bool {
        self.board.can_place(block, anchor)
    }

    /// Whether `block` fits at any anchor on the current board
    pub fn can_place_block_anywhere(&self, block: &Block) -> bool {
        self.board.can_place_anywhere(block)
    }

    /// Write `block` onto the board and update placement bookkeeping.
    ///
    /// Only call after [`GameState::can_place_block`] succeeded for the same
    /// block and anchor. Placing always breaks the perfect-level flag.
    pub fn place_block(&mut self, block: &Block, anchor: Position) {
        debug_assert!(self.board.can_place(block, anchor));
        self.board.place(block, anchor);
        self.stats.blocks_placed += 1;
        self.stats.used_colors.insert(block.color);
        self.stats.used_shapes.insert(block.shape);
        self.perfect_level = false;

        self.signal(AchievementId::Blocks100, self.stats.blocks_placed);
        self.signal(AchievementId::ColorMaster, self.stats.used_colors.len() as u32);
        self.signal(AchievementId::ShapeMaster, self.stats.used_shapes.len() as u32);
    }

    /// Place a tray block with its anchor at `anchor`.
    ///
    /// Returns false (and changes nothing) when the game is over, the block is
    /// not in the tray, or it does not fit.
    pub fn place_block_from_tray(&mut self, id: BlockId, anchor: Position) -> bool {
        if self.game_over {
            debug!("placement of {id} ignored: game over");
            return false;
        }
        let Some(index) = self.tray.iter().position(|b| b.id == id) else {
            debug!("placement of {id} ignored: not in tray");
            return false;
        };
        let block = self.tray[index];
        if !self.can_place_block(&block, anchor) {
            debug!("placement of {id} at {anchor:?} rejected");
            return false;
        }

        self.undo = Some(UndoSnapshot {
            board: self.board.clone(),
            tray: self.tray.clone(),
            score: self.score,
            level: self.level,
        });

        self.place_block(&block, anchor);
        self.tray.remove(index);

        let report = self.resolve_lines();
        self.last_clear = Some(report);
        self.refill_tray();
        self.ad_undo_count = self.config.undo_grant;
        self.check_game_over();

        self.events.push(GameEvent::StateChanged);
        true
    }

    /// First legal `(block, anchor)` in tray order, row-major anchor scan
    pub fn find_hint(&self) -> Option<(BlockId, Position)> {
        if self.game_over {
            return None;
        }
        self.tray
            .iter()
            .find_map(|b| self.board.first_fit(b).map(|anchor| (b.id, anchor)))
    }

    /// Rows and columns a placement would clear, without changing anything.
    ///
    /// Columns are evaluated after the rows are cleared, exactly as a real
    /// placement resolves. Returns None for an illegal placement.
    pub fn preview_clears(&self, id: BlockId, anchor: Position) -> Option<(LineSet, LineSet)> {
        let block = self.block(id)?;
        if !self.board.can_place(block, anchor) {
            return None;
        }
        let mut board = self.board.clone();
        board.place(block, anchor);
        let rows = board.full_rows();
        for &row in &rows {
            board.clear_row(row);
        }
        let cols = board.full_cols();
        Some((rows, cols))
    }

    // ---------------------------------------------------------------------
    // Line clears & scoring
    // ---------------------------------------------------------------------

    /// One resolution pass: rows first, then columns on the row-cleared board.
    fn resolve_lines(&mut self) -> ClearReport {
        let size = self.board.size();
        let mut report = ClearReport::default();
        let mut cleared = Vec::new();

        for row in 0..size {
            if !self.board.is_row_full(row) {
                continue;
            }
            let matched = self.board.row_uniform_color(row).is_some();
            cleared.extend(self.board.clear_row(row));
            report.rows.push(row);
            self.stats.lines_cleared += 1;
            if matched {
                report.color_matches += 1;
            }
            let points = line_score(matched);
            report.points += points;
            self.add_score(points, Position::new(row as i8, (size / 2) as i8));
        }

        // Evaluated against the post-row-clear board.
        for col in 0..size {
            if !self.board.is_col_full(col) {
                continue;
            }
            let matched = self.board.col_uniform_color(col).is_some();
            cleared.extend(self.board.clear_col(col));
            report.cols.push(col);
            self.stats.lines_cleared += 1;
            if matched {
                report.color_matches += 1;
            }
            let points = line_score(matched);
            report.points += points;
            self.add_score(points, Position::new((size / 2) as i8, col as i8));
        }

        let bonus = super_bonus(report.color_matches);
        if bonus > 0 {
            report.points += bonus;
            let center = (size / 2) as i8;
            self.add_score(bonus, Position::new(center, center));
        }

        if report.is_empty() {
            self.stats.chain = 0;
            return report;
        }

        debug!(
            "cleared rows {:?} cols {:?} ({} color matches)",
            report.rows, report.cols, report.color_matches
        );
        self.events.push(GameEvent::LinesCleared(cleared));

        self.stats.first_clears += 1;
        self.signal(AchievementId::FirstClear, self.stats.first_clears);
        if report.lines() >= COMBO_LINE_THRESHOLD {
            self.stats.combos += 1;
            self.signal(AchievementId::Combo3, self.stats.combos);
        }

        let (groups, group_points) = self.award_group_bonus();
        report.bonus_groups = groups;
        report.points += group_points;

        if self.board.is_empty() {
            info!("perfect clear on level {}", self.level);
            report.perfect_clear = true;
            self.perform_level_up();
        }

        self.stats.chain += 1;
        // Lines were already counted one by one above; the pass total is added
        // again on purpose and pinned by tests.
        self.stats.lines_cleared += report.lines();

        report
    }

    /// +`GROUP_BONUS` per 4-connected group of at least `GROUP_BONUS_MIN_SIZE` cells
    fn award_group_bonus(&mut self) -> (u32, u32) {
        let mut groups = 0;
        let mut points = 0;
        for group in self.board.occupied_groups() {
            let bonus = group_bonus(group.len());
            if bonus > 0 {
                groups += 1;
                points += bonus;
                self.add_score(bonus, group[0]);
            }
        }
        (groups, points)
    }

    /// Single entry point for every score change
    pub fn add_score(&mut self, points: u32, position: Position) {
        if points == 0 {
            return;
        }
        self.score = self.score.saturating_add(points);
        self.events
            .push(GameEvent::ScoreAnimation { points, position });

        for id in [
            AchievementId::Score1000,
            AchievementId::Score5000,
            AchievementId::Score10000,
        ] {
            self.signal(id, self.score);
        }

        if self.score > self.stats.high_score {
            self.stats.high_score = self.score;
            self.signal(AchievementId::HighScore, self.score);
            self.events.push(GameEvent::LeaderboardUpdate {
                score: self.score,
                level: self.level,
            });
        }

        self.stats.record_level_score(self.level, self.score);

        if !self.level_complete && self.score >= required_score(self.level) {
            info!("level {} complete at {} points", self.level, self.score);
            self.level_complete = true;
        }
    }

    // ---------------------------------------------------------------------
    // Levels
    // ---------------------------------------------------------------------

    /// Advance if the current level's required score has been reached.
    /// Otherwise a logged no-op returning false.
    pub fn level_up(&mut self) -> bool {
        let required = required_score(self.level);
        if self.score < required {
            warn!(
                "level up refused: {} points, level {} needs {}",
                self.score, self.level, required
            );
            return false;
        }
        self.undo = None;
        self.perform_level_up();
        self.events.push(GameEvent::StateChanged);
        true
    }

    /// Advance unconditionally (explicit "next level" action).
    ///
    /// Unlike [`GameState::level_up`] this keeps the perfect-level flag, chain
    /// and used color/shape sets.
    pub fn advance_to_next_level(&mut self) {
        self.undo = None;
        self.enter_level(self.level.saturating_add(1));
        self.events.push(GameEvent::StateChanged);
    }

    /// Reseed the block generator from a level number.
    ///
    /// Only the random stream changes; blocks are still drawn from the pool of
    /// the current level.
    pub fn set_seed(&mut self, level: u32) {
        self.generator.reseed(level);
    }

    fn perform_level_up(&mut self) {
        if self.perfect_level {
            self.signal(AchievementId::PerfectLevel, self.level);
        }
        self.enter_level(self.level.saturating_add(1));
        self.perfect_level = true;
        self.stats.reset_level_tracking();
    }

    fn enter_level(&mut self, level: u32) {
        info!("entering level {level}");
        self.level = level;
        self.generator.reseed(level);
        self.board.clear();
        self.tray.clear();
        self.refill_tray();
        self.level_complete = false;
        self.game_over = false;

        if level > self.stats.highest_level {
            self.stats.highest_level = level;
            self.signal(AchievementId::HighestLevel, level);
            self.events.push(GameEvent::LeaderboardUpdate {
                score: self.score,
                level,
            });
        }
        self.events.push(GameEvent::LevelChanged { level });
    }

    // ---------------------------------------------------------------------
    // Undo
    // ---------------------------------------------------------------------

    /// Add earned undo credit (e.g. after a rewarded ad)
    pub fn grant_undo_credit(&mut self, credit: u32) {
        self.ad_undo_count = self.ad_undo_count.saturating_add(credit);
        self.events.push(GameEvent::StateChanged);
    }

    /// Revert the most recent placement. Needs a snapshot and undo credit.
    pub fn undo_last_move(&mut self) -> bool {
        if self.ad_undo_count == 0 {
            debug!("undo ignored: no credit");
            return false;
        }
        let Some(snapshot) = self.undo.take() else {
            debug!("undo ignored: nothing to undo");
            return false;
        };

        if snapshot.level != self.level {
            self.generator.reseed(snapshot.level);
        }
        self.board = snapshot.board;
        self.tray = snapshot.tray;
        self.score = snapshot.score;
        self.level = snapshot.level;
        self.game_over = false;
        self.level_complete = self.score >= required_score(self.level);

        self.ad_undo_count -= 1;
        self.stats.total_undos += 1;
        self.perfect_level = false;

        self.signal(AchievementId::UndoUsed, self.stats.total_undos);
        self.emit_progress_signals();
        self.events.push(GameEvent::StateChanged);
        true
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Start over at level 1. Lifetime statistics survive the reset.
    pub fn reset_game(&mut self) {
        let mut stats = std::mem::take(&mut self.stats);
        stats.reset_level_tracking();
        let events = std::mem::take(&mut self.events);

        *self = Self::new(self.config);
        self.stats = GameStats {
            highest_level: stats.highest_level.max(1),
            ..stats
        };
        self.events = events;
        self.events.push(GameEvent::LevelChanged { level: 1 });
        self.events.push(GameEvent::StateChanged);
    }

    fn refill_tray(&mut self) {
        while !self.tray.is_full() {
            let id = BlockId(self.next_block_id);
            self.next_block_id = self.next_block_id.wrapping_add(1);
            self.tray.push(self.generator.draw(id, self.level));
        }
    }

    fn check_game_over(&mut self) {
        if self.game_over {
            return;
        }
        if self.tray.iter().any(|b| self.board.can_place_anywhere(b)) {
            return;
        }

        info!("game over: score {} on level {}", self.score, self.level);
        self.game_over = true;
        // A game ended, undone and ended again still counts once.
        if !self.game_over_counted {
            self.game_over_counted = true;
            self.stats.games_completed += 1;
            for id in [
                AchievementId::Games10,
                AchievementId::Games50,
                AchievementId::Games100,
            ] {
                self.signal(id, self.stats.games_completed);
            }
        }
        if self.score > 0 {
            self.events.push(GameEvent::LeaderboardUpdate {
                score: self.score,
                level: self.level,
            });
        }
        self.events.push(GameEvent::GameOver {
            score: self.score,
            level: self.level,
        });
    }

    fn signal(&mut self, id: AchievementId, value: u32) {
        self.events
            .push(GameEvent::Achievement(AchievementSignal::new(id, value)));
    }

    /// Re-send every cumulative progress value
    fn emit_progress_signals(&mut self) {
        for id in [
            AchievementId::Score1000,
            AchievementId::Score5000,
            AchievementId::Score10000,
        ] {
            self.signal(id, self.score);
        }
        self.signal(AchievementId::HighScore, self.stats.high_score);
        self.signal(AchievementId::HighestLevel, self.stats.highest_level);
        self.signal(AchievementId::Blocks100, self.stats.blocks_placed);
        self.signal(AchievementId::FirstClear, self.stats.first_clears);
        self.signal(AchievementId::Combo3, self.stats.combos);
    }

    // ---------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------

    /// Serializable copy of the session
    pub fn to_persisted(&self) -> PersistedGame {
        PersistedGame {
            score: self.score,
            level: self.level,
            grid: self
                .board
                .rows()
                .map(|row| row.iter().map(|c| c.map(Into::into)).collect())
                .collect(),
            tray: self.tray.iter().copied().map(SavedBlock::from).collect(),
            rng_state: Some(self.generator.state()),
            next_block_id: Some(self.next_block_id),
            ad_undo_count: self.ad_undo_count,
            perfect_level: self.perfect_level,
            stats: self.stats.clone(),
        }
    }

    /// Rebuild a session from a saved copy.
    ///
    /// Blocks saved without ids get fresh ones; a short tray is topped up from
    /// the generator. The undo slot always starts empty.
    pub fn restore(saved: &PersistedGame, config: GameConfig) -> Result<Self, SnapshotError> {
        saved.validate()?;
        let board = saved.board()?;

        let max_id = saved
            .tray
            .iter()
            .filter_map(|b| b.id)
            .chain(saved.grid.iter().flatten().flatten().filter_map(|c| c.block))
            .map(|id| id.0)
            .max()
            .unwrap_or(0);
        let mut next_block_id = saved
            .next_block_id
            .unwrap_or_else(|| max_id.wrapping_add(1));

        let mut tray = Tray::new();
        for saved_block in &saved.tray {
            let id = saved_block.id.unwrap_or_else(|| {
                let id = BlockId(next_block_id);
                next_block_id = next_block_id.wrapping_add(1);
                id
            });
            tray.push(Block::new(id, saved_block.shape, saved_block.color));
        }

        let generator = match saved.rng_state {
            Some(state) => BlockGenerator::from_state(state),
            None => BlockGenerator::for_level(saved.level),
        };

        let mut stats = saved.stats.clone();
        stats.highest_level = stats.highest_level.max(saved.level);
        stats.high_score = stats.high_score.max(saved.score);

        let mut state = Self {
            config: GameConfig {
                grid_size: board.size(),
                ..config
            },
            board,
            tray,
            generator,
            next_block_id,
            score: saved.score,
            level: saved.level,
            game_over: false,
            game_over_counted: false,
            level_complete: saved.score >= required_score(saved.level),
            perfect_level: saved.perfect_level,
            undo: None,
            ad_undo_count: saved.ad_undo_count,
            stats,
            last_clear: None,
            events: Vec::new(),
        };
        state.refill_tray();
        state.game_over = !state
            .tray
            .iter()
            .any(|b| state.board.can_place_anywhere(b));
        // A save taken at game over was counted before it was written.
        state.game_over_counted = state.game_over;
        Ok(state)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
