//! Achievement tracking
//!
//! The engine only emits [`AchievementSignal`]s. This module owns the catalog
//! (targets and titles), the progress book, and the asynchronous evaluation:
//! every `schedule` call restarts a debounce timer and aborts the check that was
//! in flight, so a burst of score changes is evaluated once. Unlocks are
//! published as notifications that dismiss themselves after a fixed delay.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::core::{AchievementId, AchievementSignal};
use crate::types::BlockColor;

/// Catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    pub id: AchievementId,
    pub title: &'static str,
    pub target: u32,
}

pub fn definition(id: AchievementId) -> AchievementDef {
    let (title, target) = match id {
        AchievementId::Score1000 => ("Getting Started", 1000),
        AchievementId::Score5000 => ("Rising Star", 5000),
        AchievementId::Score10000 => ("Block Master", 10000),
        AchievementId::HighScore => ("New Record", 1),
        AchievementId::HighestLevel => ("Climber", 10),
        AchievementId::FirstClear => ("First Clear", 1),
        AchievementId::Combo3 => ("Combo", 1),
        AchievementId::Games10 => ("Regular", 10),
        AchievementId::Games50 => ("Dedicated", 50),
        AchievementId::Games100 => ("Veteran", 100),
        AchievementId::Blocks100 => ("Builder", 100),
        AchievementId::ColorMaster => ("Color Master", BlockColor::ALL.len() as u32),
        AchievementId::ShapeMaster => ("Shape Master", 10),
        AchievementId::PerfectLevel => ("Untouched", 1),
        AchievementId::UndoUsed => ("Second Thoughts", 1),
    };
    AchievementDef { id, title, target }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub value: u32,
    pub unlocked: bool,
}

/// Per-achievement progress
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementBook {
    progress: BTreeMap<AchievementId, Progress>,
}

impl AchievementBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a signal. Progress only moves forward. Returns the definition
    /// when this signal unlocks the achievement.
    pub fn apply(&mut self, signal: AchievementSignal) -> Option<AchievementDef> {
        let def = definition(signal.id);
        let entry = self.progress.entry(signal.id).or_default();
        entry.value = entry.value.max(signal.value);
        if !entry.unlocked && entry.value >= def.target {
            entry.unlocked = true;
            return Some(def);
        }
        None
    }

    pub fn progress(&self, id: AchievementId) -> Progress {
        self.progress.get(&id).copied().unwrap_or_default()
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.progress(id).unlocked
    }

    pub fn unlocked(&self) -> impl Iterator<Item = AchievementId> + '_ {
        self.progress
            .iter()
            .filter(|(_, p)| p.unlocked)
            .map(|(id, _)| *id)
    }
}

/// A visible unlock message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub achievement: AchievementId,
    pub title: &'static str,
}

/// Holds visible notifications and dismisses each one after a delay
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    handle: Handle,
    dismiss_after: Duration,
    active: Arc<Mutex<Vec<Notification>>>,
    next_id: Arc<AtomicU64>,
    tx: broadcast::Sender<Notification>,
}

impl NotificationCenter {
    pub fn new(handle: Handle, dismiss_after: Duration) -> Self {
        let (tx, _) = broadcast::channel(32);
        Self {
            handle,
            dismiss_after,
            active: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            tx,
        }
    }

    /// Receive every notification as it is shown
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn show(&self, def: AchievementDef) -> Notification {
        let notification = Notification {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            achievement: def.id,
            title: def.title,
        };
        info!("achievement unlocked: {}", def.id.as_str());

        lock(&self.active).push(notification.clone());
        // No subscribers is fine.
        let _ = self.tx.send(notification.clone());

        let active = Arc::clone(&self.active);
        let id = notification.id;
        let delay = self.dismiss_after;
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            lock(&active).retain(|n| n.id != id);
        });

        notification
    }

    /// Notifications currently on screen
    pub fn active(&self) -> Vec<Notification> {
        lock(&self.active).clone()
    }
}

/// Debounced, superseding achievement evaluation
#[derive(Debug)]
pub struct AchievementTracker {
    handle: Handle,
    debounce: Duration,
    book: Arc<Mutex<AchievementBook>>,
    pending: Arc<Mutex<Vec<AchievementSignal>>>,
    in_flight: Option<JoinHandle<()>>,
    notifications: NotificationCenter,
}

impl AchievementTracker {
    pub fn new(handle: Handle, debounce: Duration, notifications: NotificationCenter) -> Self {
        Self {
            handle,
            debounce,
            book: Arc::new(Mutex::new(AchievementBook::new())),
            pending: Arc::new(Mutex::new(Vec::new())),
            in_flight: None,
            notifications,
        }
    }

    /// Queue signals and (re)start the evaluation timer. Never blocks.
    pub fn schedule(&mut self, signals: impl IntoIterator<Item = AchievementSignal>) {
        lock(&self.pending).extend(signals);

        if let Some(previous) = self.in_flight.take() {
            if !previous.is_finished() {
                debug!("superseding in-flight achievement check");
            }
            previous.abort();
        }

        let debounce = self.debounce;
        let book = Arc::clone(&self.book);
        let pending = Arc::clone(&self.pending);
        let notifications = self.notifications.clone();
        self.in_flight = Some(self.handle.spawn(async move {
            tokio::time::sleep(debounce).await;
            // No await below: once the timer fired the check cannot be torn.
            let batch = std::mem::take(&mut *lock(&pending));
            let unlocked: Vec<_> = {
                let mut book = lock(&book);
                batch.into_iter().filter_map(|s| book.apply(s)).collect()
            };
            for def in unlocked {
                notifications.show(def);
            }
        }));
    }

    /// Wait for the scheduled check, if any
    pub async fn settle(&mut self) {
        if let Some(task) = self.in_flight.take() {
            let _ = task.await;
        }
    }

    pub fn book(&self) -> AchievementBook {
        lock(&self.book).clone()
    }

    /// Signals waiting for the next evaluation
    pub fn pending_len(&self) -> usize {
        lock(&self.pending).len()
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_unlocks_once_at_target() {
        let mut book = AchievementBook::new();
        assert!(book
            .apply(AchievementSignal::new(AchievementId::Score1000, 999))
            .is_none());
        let def = book
            .apply(AchievementSignal::new(AchievementId::Score1000, 1200))
            .unwrap();
        assert_eq!(def.target, 1000);
        assert!(book
            .apply(AchievementSignal::new(AchievementId::Score1000, 5000))
            .is_none());
        assert!(book.is_unlocked(AchievementId::Score1000));
    }

    #[test]
    fn progress_never_goes_backwards() {
        let mut book = AchievementBook::new();
        book.apply(AchievementSignal::new(AchievementId::Games50, 20));
        book.apply(AchievementSignal::new(AchievementId::Games50, 3));
        assert_eq!(book.progress(AchievementId::Games50).value, 20);
    }

    #[test]
    fn games_tiers_unlock_at_their_own_targets() {
        let mut book = AchievementBook::new();
        let mut unlocked = Vec::new();
        for games in [10, 50, 100] {
            for id in [
                AchievementId::Games10,
                AchievementId::Games50,
                AchievementId::Games100,
            ] {
                if let Some(def) = book.apply(AchievementSignal::new(id, games)) {
                    unlocked.push((games, def.id));
                }
            }
        }
        assert_eq!(
            unlocked,
            vec![
                (10, AchievementId::Games10),
                (50, AchievementId::Games50),
                (100, AchievementId::Games100),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn burst_is_evaluated_once_after_quiet_period() {
        let center = NotificationCenter::new(Handle::current(), Duration::from_secs(3));
        let mut rx = center.subscribe();
        let mut tracker =
            AchievementTracker::new(Handle::current(), Duration::from_millis(100), center);

        for score in [200, 600, 1100] {
            tracker.schedule([AchievementSignal::new(AchievementId::Score1000, score)]);
            tokio::time::sleep(Duration::from_millis(30)).await;
        }
        // Each schedule restarted the timer, nothing evaluated yet.
        assert_eq!(tracker.pending_len(), 3);
        assert!(!tracker.book().is_unlocked(AchievementId::Score1000));

        tracker.settle().await;
        assert_eq!(tracker.pending_len(), 0);
        assert!(tracker.book().is_unlocked(AchievementId::Score1000));

        let shown = rx.recv().await.unwrap();
        assert_eq!(shown.achievement, AchievementId::Score1000);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn notifications_dismiss_after_delay() {
        let center = NotificationCenter::new(Handle::current(), Duration::from_secs(3));
        center.show(definition(AchievementId::FirstClear));
        assert_eq!(center.active().len(), 1);

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert_eq!(center.active().len(), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(center.active().is_empty());
    }
}
