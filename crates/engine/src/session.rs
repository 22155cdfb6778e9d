//! Game session
//!
//! Owns the [`GameState`] and, optionally, the [`Services`] around it. Every
//! public operation runs the engine to completion first, then drains the queued
//! events: render events go to the delegate, achievement signals to the tracker,
//! the best leaderboard update to the leaderboard, and a save is spawned on game
//! over, level change, or after every operation with autosave on.

use log::{info, warn};
use tokio::task::JoinHandle;

use crate::adapter::{LeaderboardEntry, Services};
use crate::core::{GameConfig, GameDelegate, GameEvent, GameState, SnapshotError};
use crate::place::{apply_place, PlaceError};
use crate::types::{BlockId, Position};

pub struct GameSession {
    state: GameState,
    services: Option<Services>,
    delegate: Option<Box<dyn GameDelegate>>,
}

impl GameSession {
    pub fn new(state: GameState, services: Option<Services>) -> Self {
        Self {
            state,
            services,
            delegate: None,
        }
    }

    /// Resume the last save if the store has a valid one, else start fresh
    pub fn resume(services: Option<Services>, config: GameConfig) -> Self {
        let saved = services.as_ref().and_then(Services::load);
        let state = match saved {
            Some(saved) => match GameState::restore(&saved, config) {
                Ok(state) => {
                    info!("resumed level {} with {} points", state.level(), state.score());
                    state
                }
                Err(e) => {
                    warn!("discarding unusable save: {e}");
                    GameState::new(config)
                }
            },
            None => GameState::new(config),
        };
        Self::new(state, services)
    }

    pub fn with_delegate(mut self, delegate: Box<dyn GameDelegate>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn services(&self) -> Option<&Services> {
        self.services.as_ref()
    }

    pub fn services_mut(&mut self) -> Option<&mut Services> {
        self.services.as_mut()
    }

    pub fn place_block_from_tray(&mut self, id: BlockId, anchor: Position) -> bool {
        let placed = self.state.place_block_from_tray(id, anchor);
        self.flush();
        placed
    }

    pub fn try_place(&mut self, id: BlockId, anchor: Position) -> Result<(), PlaceError> {
        let result = apply_place(&mut self.state, id, anchor);
        self.flush();
        result
    }

    pub fn undo_last_move(&mut self) -> bool {
        let undone = self.state.undo_last_move();
        self.flush();
        undone
    }

    pub fn grant_undo_credit(&mut self, credit: u32) {
        self.state.grant_undo_credit(credit);
        self.flush();
    }

    pub fn level_up(&mut self) -> bool {
        let advanced = self.state.level_up();
        self.flush();
        advanced
    }

    pub fn advance_to_next_level(&mut self) {
        self.state.advance_to_next_level();
        self.flush();
    }

    pub fn set_seed(&mut self, level: u32) {
        self.state.set_seed(level);
    }

    pub fn reset_game(&mut self) {
        self.state.reset_game();
        self.flush();
    }

    /// Replace the running game with the last save.
    ///
    /// `Ok(false)` when there are no services or nothing was saved.
    pub fn load(&mut self) -> Result<bool, SnapshotError> {
        let Some(saved) = self.services.as_ref().and_then(Services::load) else {
            return Ok(false);
        };
        self.state = GameState::restore(&saved, *self.state.config())?;
        info!("loaded level {} with {} points", self.state.level(), self.state.score());
        if let Some(delegate) = self.delegate.as_deref_mut() {
            delegate.on_state_changed();
        }
        Ok(true)
    }

    /// Spawn a save of the current state
    pub fn save(&self) -> Option<JoinHandle<()>> {
        self.services
            .as_ref()
            .map(|services| services.save(self.state.to_persisted()))
    }

    fn flush(&mut self) {
        let events = self.state.take_events();
        if events.is_empty() {
            return;
        }

        let autosave = self
            .services
            .as_ref()
            .is_some_and(|s| s.config().autosave);
        let mut signals = Vec::new();
        let mut best: Option<LeaderboardEntry> = None;
        let mut persist = false;

        for event in &events {
            if let Some(delegate) = self.delegate.as_deref_mut() {
                event.dispatch(delegate);
            }
            match *event {
                GameEvent::Achievement(signal) => signals.push(signal),
                GameEvent::LeaderboardUpdate { score, level } => {
                    let entry = LeaderboardEntry { score, level };
                    if best.map_or(true, |b| (score, level) > (b.score, b.level)) {
                        best = Some(entry);
                    }
                }
                GameEvent::GameOver { score, level } => {
                    info!("game over at level {level} with {score} points");
                    persist = true;
                }
                GameEvent::LevelChanged { .. } => persist = true,
                GameEvent::StateChanged => persist |= autosave,
                GameEvent::LinesCleared(_) | GameEvent::ScoreAnimation { .. } => {}
            }
        }

        let Some(services) = self.services.as_mut() else {
            return;
        };
        services.report_achievements(signals);
        if let Some(entry) = best {
            services.submit_score(entry);
        }
        if persist {
            services.save(self.state.to_persisted());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counts {
        changed: u32,
        points: u32,
    }

    struct Shared(Rc<RefCell<Counts>>);

    impl GameDelegate for Shared {
        fn on_state_changed(&mut self) {
            self.0.borrow_mut().changed += 1;
        }

        fn on_score_animation(&mut self, points: u32, _position: Position) {
            self.0.borrow_mut().points += points;
        }
    }

    #[test]
    fn delegate_sees_render_events_without_services() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut session = GameSession::new(GameState::default(), None)
            .with_delegate(Box::new(Shared(Rc::clone(&counts))));

        let (id, anchor) = session.state().find_hint().unwrap();
        assert!(session.place_block_from_tray(id, anchor));
        assert!(session.undo_last_move());

        assert_eq!(counts.borrow().changed, 2);
        assert_eq!(counts.borrow().points, 0);
        assert!(session.save().is_none());
    }

    #[test]
    fn try_place_reports_reason() {
        let mut session = GameSession::new(GameState::default(), None);
        let err = session
            .try_place(BlockId(4242), Position::new(0, 0))
            .unwrap_err();
        assert_eq!(err, PlaceError::UnknownBlock);
    }
}
