//! Streak recalculation engine.
//!
//! Turns the sparse, append-only completion history into the derived
//! streak record: current streak, longest streak, and a gap-free
//! per-day timeline from the first recorded activity through today.
//! Every pass re-derives the record from scratch; nothing is patched
//! incrementally, so the result is a pure function of durable state
//! and a failed pass is healed by the next one.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::day_key;
use crate::error::{Result, StoreError};
use crate::model::{
    AssignedExercise, CompletedExercise, DailyCompletion, StreakData, StreakStatus,
};
use crate::store::{AssignmentReader, CompletionStore, StreakStore};

/// Derive a complete streak record from assignment and history inputs.
///
/// Pure: `today` and `now` are explicit so two derivations over the
/// same inputs are identical. Returns `None` when the history holds no
/// usable day keys -- there is nothing to derive and no record should
/// exist.
///
/// The walk covers every calendar day in `[first, today]` inclusive,
/// including days with zero stored activity; streak continuity can only
/// be judged by looking at the gaps. Day keys that do not parse as
/// `YYYY-MM-DD` are logged and excluded from the timeline.
pub fn derive_streak(
    assigned: &[AssignedExercise],
    history: &HashMap<String, Vec<CompletedExercise>>,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Option<StreakData> {
    let mut by_date: BTreeMap<NaiveDate, &Vec<CompletedExercise>> = BTreeMap::new();
    for (key, exercises) in history {
        match day_key::parse_day_key(key) {
            Some(date) => {
                by_date.insert(date, exercises);
            }
            None => warn!(key = %key, "excluding malformed day key from timeline"),
        }
    }

    let first = *by_date.keys().next()?;
    let range = day_key::date_range(first, today);
    if range.is_empty() {
        // Only future-dated keys; nothing derivable yet.
        warn!(%first, %today, "first activity is after today, skipping derivation");
        return None;
    }

    let total_assigned = assigned.len() as u32;
    let mut current_streak: u32 = 0;
    let mut longest_streak: u32 = 0;
    let mut last_activity: Option<NaiveDate> = None;
    let mut streak_history: Vec<DailyCompletion> = Vec::with_capacity(range.len());

    for date in range {
        let exercises = by_date.get(&date).map(|e| (*e).clone()).unwrap_or_default();
        let mut day = DailyCompletion::summarize(day_key::day_key(date), exercises, total_assigned);

        if day.all_exercises_completed {
            if last_activity == Some(day_key::previous_day(date)) {
                current_streak += 1;
                day.streak_status = StreakStatus::Maintained;
            } else {
                current_streak = 1;
                day.streak_status = StreakStatus::Started;
            }
            last_activity = Some(date);
        } else if current_streak > 0 {
            // A streak was active coming in; this day did not sustain it.
            current_streak = 0;
            day.streak_status = StreakStatus::Broken;
        }

        longest_streak = longest_streak.max(current_streak);
        streak_history.push(day);
    }

    let total_days_active = streak_history
        .iter()
        .filter(|d| d.total_completed > 0)
        .count() as u32;
    let total_exercises_completed: u32 = streak_history.iter().map(|d| d.total_completed).sum();
    let average_completion_rate = if streak_history.is_empty() {
        0.0
    } else {
        streak_history.iter().map(|d| d.completion_rate).sum::<f64>() / streak_history.len() as f64
    };

    Some(StreakData {
        current_streak,
        longest_streak,
        last_activity_date: last_activity.map(day_key::day_key),
        total_days_active,
        total_exercises_completed,
        average_completion_rate,
        streak_history,
        last_updated: now,
    })
}

/// The recalculation engine: fetch, derive, persist.
///
/// Holds the three store seams and nothing else; per-pass state lives
/// on the stack, so concurrent passes for different users cannot
/// interfere.
pub struct StreakEngine {
    assignments: Arc<dyn AssignmentReader>,
    completions: Arc<dyn CompletionStore>,
    streaks: Arc<dyn StreakStore>,
    store_timeout: Duration,
}

impl StreakEngine {
    pub fn new(
        assignments: Arc<dyn AssignmentReader>,
        completions: Arc<dyn CompletionStore>,
        streaks: Arc<dyn StreakStore>,
    ) -> Self {
        Self {
            assignments,
            completions,
            streaks,
            store_timeout: Duration::from_secs(30),
        }
    }

    /// Override the timeout applied to each store call.
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    async fn bounded<T>(
        &self,
        store: &'static str,
        fut: impl Future<Output = std::result::Result<T, StoreError>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(StoreError::Timeout {
                store,
                timeout_secs: self.store_timeout.as_secs(),
            }
            .into()),
        }
    }

    /// Run one full recalculation pass for the user.
    ///
    /// Reads the current assignment snapshot and the complete completion
    /// history, derives a fresh record, and overwrites the stored one.
    /// Returns `None` without writing when the user has no history; any
    /// previously stored record is left untouched so subscribers never
    /// see a transient blank.
    ///
    /// # Errors
    ///
    /// Propagates store failures; the pass is aborted and the stored
    /// record keeps its previous value.
    pub async fn recalculate(&self, user_id: &str) -> Result<Option<StreakData>> {
        let assigned = self
            .bounded("assignments", self.assignments.assigned_exercises(user_id))
            .await?;
        let history = self
            .bounded("completions", self.completions.all_days(user_id))
            .await?;

        // "Today" is computed once per pass; the rest of the walk reuses
        // it, so a pass straddling midnight stays self-consistent.
        let today = day_key::today_local();

        let Some(data) = derive_streak(&assigned, &history, today, Utc::now()) else {
            debug!(user_id, "no completion history, nothing to derive");
            return Ok(None);
        };

        self.bounded("streaks", self.streaks.save(user_id, &data))
            .await?;
        debug!(
            user_id,
            current = data.current_streak,
            longest = data.longest_streak,
            days = data.streak_history.len(),
            "streak record recalculated"
        );
        Ok(Some(data))
    }
}
