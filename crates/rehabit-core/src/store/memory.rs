//! In-memory store implementations.
//!
//! Reference implementations of the store traits, used by the test
//! suite and by embedded callers that do not need a remote backend.
//! Writes are last-writer-wins on independent (user, date) or (user)
//! keys, matching the semantics of the production document store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};

use crate::error::StoreError;
use crate::model::{AssignedExercise, CompletedExercise, StreakData};
use crate::store::{AssignmentReader, CompletionStore, StreakStore};

/// In-memory assignment snapshot, settable by the embedding application.
#[derive(Default)]
pub struct MemoryAssignments {
    assignments: RwLock<HashMap<String, Vec<AssignedExercise>>>,
}

impl MemoryAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the user's current assignment snapshot.
    pub async fn set_assignments(&self, user_id: &str, exercises: Vec<AssignedExercise>) {
        self.assignments
            .write()
            .await
            .insert(user_id.to_string(), exercises);
    }
}

#[async_trait]
impl AssignmentReader for MemoryAssignments {
    async fn assigned_exercises(&self, user_id: &str) -> Result<Vec<AssignedExercise>, StoreError> {
        Ok(self
            .assignments
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// In-memory day-keyed completion history.
#[derive(Default)]
pub struct MemoryCompletions {
    days: RwLock<HashMap<String, HashMap<String, Vec<CompletedExercise>>>>,
}

impl MemoryCompletions {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompletionStore for MemoryCompletions {
    async fn set_day(
        &self,
        user_id: &str,
        date: &str,
        exercises: Vec<CompletedExercise>,
    ) -> Result<(), StoreError> {
        self.days
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .insert(date.to_string(), exercises);
        Ok(())
    }

    async fn all_days(
        &self,
        user_id: &str,
    ) -> Result<HashMap<String, Vec<CompletedExercise>>, StoreError> {
        Ok(self
            .days
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// In-memory streak record store with live subscriptions.
///
/// One watch channel per user; the sender side is kept alive here so
/// receivers stay valid across saves.
#[derive(Default)]
pub struct MemoryStreaks {
    records: RwLock<HashMap<String, Arc<watch::Sender<Option<StreakData>>>>>,
}

impl MemoryStreaks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle, convenient for wiring into the service.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    async fn channel(&self, user_id: &str) -> Arc<watch::Sender<Option<StreakData>>> {
        let mut records = self.records.write().await;
        Arc::clone(
            records
                .entry(user_id.to_string())
                .or_insert_with(|| Arc::new(watch::channel(None).0)),
        )
    }
}

#[async_trait]
impl StreakStore for MemoryStreaks {
    async fn save(&self, user_id: &str, data: &StreakData) -> Result<(), StoreError> {
        let tx = self.channel(user_id).await;
        tx.send_replace(Some(data.clone()));
        Ok(())
    }

    async fn load(&self, user_id: &str) -> Result<Option<StreakData>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .get(user_id)
            .and_then(|tx| tx.borrow().clone()))
    }

    async fn subscribe(
        &self,
        user_id: &str,
    ) -> Result<watch::Receiver<Option<StreakData>>, StoreError> {
        let tx = self.channel(user_id).await;
        let mut rx = tx.subscribe();
        // First changed().await resolves immediately with the current value.
        rx.mark_changed();
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn exercise(id: &str, completed: bool) -> CompletedExercise {
        CompletedExercise {
            exercise_id: id.to_string(),
            exercise_name: format!("Exercise {id}"),
            bundle_id: "bundle-1".to_string(),
            bundle_name: "Shoulder Mobility".to_string(),
            completed_at: Utc::now(),
            completed,
        }
    }

    fn record(current: u32) -> StreakData {
        StreakData {
            current_streak: current,
            longest_streak: current,
            last_activity_date: None,
            total_days_active: 0,
            total_exercises_completed: 0,
            average_completion_rate: 0.0,
            streak_history: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_set_day_replaces_whole_day() {
        let store = MemoryCompletions::new();
        store
            .set_day("u1", "2025-06-01", vec![exercise("a", true), exercise("b", true)])
            .await
            .unwrap();
        store
            .set_day("u1", "2025-06-01", vec![exercise("a", false)])
            .await
            .unwrap();

        let days = store.all_days("u1").await.unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days["2025-06-01"].len(), 1);
        assert!(!days["2025-06-01"][0].completed);
    }

    #[tokio::test]
    async fn test_all_days_unknown_user_is_empty() {
        let store = MemoryCompletions::new();
        assert!(store.all_days("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_absent_record() {
        let store = MemoryStreaks::new();
        assert!(store.load("u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_subscribe_delivers_current_then_updates() {
        let store = MemoryStreaks::new();
        store.save("u1", &record(1)).await.unwrap();

        let mut rx = store.subscribe("u1").await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().unwrap().current_streak, 1);

        store.save("u1", &record(2)).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().unwrap().current_streak, 2);
    }

    #[tokio::test]
    async fn test_subscribe_before_first_save_sees_none() {
        let store = MemoryStreaks::new();
        let mut rx = store.subscribe("u1").await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());

        store.save("u1", &record(3)).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().unwrap().current_streak, 3);
    }
}
