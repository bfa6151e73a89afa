//! Application-facing streak service.
//!
//! Wires the engine, coordinator, and stores together and exposes the
//! surface the rest of the application calls: synchronous
//! recalculation, debounced enqueueing, point reads, live
//! subscriptions, and the write-then-recalculate path used when the
//! patient marks a bundle complete.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;

use crate::config::StreakConfig;
use crate::coordinator::UpdateCoordinator;
use crate::day_key;
use crate::engine::StreakEngine;
use crate::error::Result;
use crate::model::{CompletedExercise, StreakData};
use crate::store::{AssignmentReader, CompletionStore, StreakStore};

/// Facade over the streak subsystem.
///
/// Owned by the application's composition root; all dependencies are
/// injected, nothing here is global.
pub struct StreakService {
    engine: Arc<StreakEngine>,
    coordinator: UpdateCoordinator,
    completions: Arc<dyn CompletionStore>,
    streaks: Arc<dyn StreakStore>,
}

impl StreakService {
    pub fn new(
        assignments: Arc<dyn AssignmentReader>,
        completions: Arc<dyn CompletionStore>,
        streaks: Arc<dyn StreakStore>,
        config: &StreakConfig,
    ) -> Self {
        let engine = Arc::new(
            StreakEngine::new(assignments, Arc::clone(&completions), Arc::clone(&streaks))
                .with_store_timeout(std::time::Duration::from_secs(config.store_timeout_secs)),
        );
        let coordinator = UpdateCoordinator::new(engine.clone(), config.debounce());

        Self {
            engine,
            coordinator,
            completions,
            streaks,
        }
    }

    /// Run a full recalculation pass now and return the fresh record.
    ///
    /// `None` means the user has no completion history yet; no record
    /// is written in that case.
    pub async fn recalculate_all(&self, user_id: &str) -> Result<Option<StreakData>> {
        self.engine.recalculate(user_id).await
    }

    /// Request a debounced recalculation.
    ///
    /// Bursts of events for one user within the configured window
    /// collapse into a single pass.
    pub fn enqueue_recalculation(&self, user_id: &str) {
        self.coordinator.enqueue(user_id);
    }

    /// Point read of the user's current streak record.
    pub async fn get_streak_data(&self, user_id: &str) -> Result<Option<StreakData>> {
        Ok(self.streaks.load(user_id).await?)
    }

    /// Live view of the user's streak record.
    ///
    /// The receiver's current value is the latest record (`None` when
    /// no streak exists yet); every save pushes an update. Dropping the
    /// receiver unsubscribes.
    pub async fn on_streak_data_change(
        &self,
        user_id: &str,
    ) -> Result<watch::Receiver<Option<StreakData>>> {
        Ok(self.streaks.subscribe(user_id).await?)
    }

    /// Replace one day's completions and recalculate synchronously.
    ///
    /// The write-then-recalculate path: the caller gets the fresh record
    /// back without waiting out a debounce window. `exercises` must be
    /// the complete list for the day; the write is a full replace.
    pub async fn record_day(
        &self,
        user_id: &str,
        date: NaiveDate,
        exercises: Vec<CompletedExercise>,
    ) -> Result<Option<StreakData>> {
        let key = day_key::day_key(date);
        self.completions.set_day(user_id, &key, exercises).await?;
        self.engine.recalculate(user_id).await
    }

    /// [`record_day`](Self::record_day) for the current local calendar day.
    pub async fn record_today(
        &self,
        user_id: &str,
        exercises: Vec<CompletedExercise>,
    ) -> Result<Option<StreakData>> {
        self.record_day(user_id, day_key::today_local(), exercises)
            .await
    }
}
