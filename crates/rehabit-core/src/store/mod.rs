//! Store adapter boundaries.
//!
//! The engine and coordinator only ever talk to these traits. The
//! mobile application implements them against its remote document
//! database; the in-memory implementations here back the tests and any
//! embedded use. Keeping the full-history read behind [`CompletionStore`]
//! also keeps the door open for an incremental-recompute substitute
//! without touching callers.

mod memory;

pub use memory::{MemoryAssignments, MemoryCompletions, MemoryStreaks};

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::StoreError;
use crate::model::{AssignedExercise, CompletedExercise, StreakData};

/// Read access to the user's current exercise assignments.
#[async_trait]
pub trait AssignmentReader: Send + Sync {
    /// Every exercise currently assigned to the user, flattened across
    /// all bundles they are enrolled in. Empty when none; not an error.
    async fn assigned_exercises(&self, user_id: &str) -> Result<Vec<AssignedExercise>, StoreError>;
}

/// The day-indexed completion history for a user.
#[async_trait]
pub trait CompletionStore: Send + Sync {
    /// Replace the full exercise list for one day. Last writer wins per
    /// (user, date); callers submit the complete day's list.
    async fn set_day(
        &self,
        user_id: &str,
        date: &str,
        exercises: Vec<CompletedExercise>,
    ) -> Result<(), StoreError>;

    /// The complete day-keyed completion history for the user.
    async fn all_days(
        &self,
        user_id: &str,
    ) -> Result<HashMap<String, Vec<CompletedExercise>>, StoreError>;
}

/// Persistence and live subscription for derived streak records.
#[async_trait]
pub trait StreakStore: Send + Sync {
    /// Overwrite the user's streak record in full. Never a partial merge.
    async fn save(&self, user_id: &str, data: &StreakData) -> Result<(), StoreError>;

    /// Point read of the current record, `None` when no streak exists yet.
    async fn load(&self, user_id: &str) -> Result<Option<StreakData>, StoreError>;

    /// Live view of the user's streak record.
    ///
    /// The receiver's current value is delivered immediately (`None`
    /// when no record exists yet) and updated on every subsequent save.
    /// Dropping the receiver unsubscribes.
    async fn subscribe(
        &self,
        user_id: &str,
    ) -> Result<watch::Receiver<Option<StreakData>>, StoreError>;
}
