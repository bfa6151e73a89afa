//! Debounced recalculation coordinator.
//!
//! Bursts of completion events would otherwise trigger one full-history
//! recalculation each. The coordinator keeps a pending set of user ids
//! and a single drain task: enqueues within one debounce window collapse
//! into one pass per user, and ids arriving while a pass is draining are
//! picked up by the next loop iteration. Constructed explicitly at the
//! application's composition root; there is no global instance.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::engine::StreakEngine;
use crate::error::Result;

/// Seam between the coordinator and the engine.
///
/// The coordinator only needs "recalculate this user"; keeping it a
/// trait lets tests count passes without standing up stores.
#[async_trait]
pub trait Recalculate: Send + Sync {
    async fn recalculate_user(&self, user_id: &str) -> Result<()>;
}

#[async_trait]
impl Recalculate for StreakEngine {
    async fn recalculate_user(&self, user_id: &str) -> Result<()> {
        self.recalculate(user_id).await.map(|_| ())
    }
}

struct CoordinatorState {
    pending: HashSet<String>,
    running: bool,
}

/// Serializes and debounces recalculation requests.
pub struct UpdateCoordinator {
    state: Arc<Mutex<CoordinatorState>>,
    engine: Arc<dyn Recalculate>,
    debounce: Duration,
}

impl UpdateCoordinator {
    pub fn new(engine: Arc<dyn Recalculate>, debounce: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(CoordinatorState {
                pending: HashSet::new(),
                running: false,
            })),
            engine,
            debounce,
        }
    }

    /// Request a recalculation for the user.
    ///
    /// Guarantees: the user is recalculated at least once after their
    /// last enqueue, and at most once per debounce window however many
    /// events arrive within it. Must be called from within a tokio
    /// runtime; the drain pass runs as a spawned task.
    pub fn enqueue(&self, user_id: &str) {
        let mut state = lock(&self.state);
        state.pending.insert(user_id.to_string());
        if !state.running {
            state.running = true;
            drop(state);
            tokio::spawn(drain_loop(
                Arc::clone(&self.state),
                Arc::clone(&self.engine),
                self.debounce,
            ));
        }
    }

    /// Number of user ids currently waiting for a pass.
    pub fn pending_len(&self) -> usize {
        lock(&self.state).pending.len()
    }
}

async fn drain_loop(
    state: Arc<Mutex<CoordinatorState>>,
    engine: Arc<dyn Recalculate>,
    debounce: Duration,
) {
    loop {
        tokio::time::sleep(debounce).await;

        let batch: Vec<String> = {
            let mut state = lock(&state);
            if state.pending.is_empty() {
                // The running flag is cleared under the same lock that
                // enqueue checks, so no enqueue can be lost in between.
                state.running = false;
                return;
            }
            state.pending.drain().collect()
        };

        for user_id in batch {
            // A failed pass is dropped, not retried; the next completion
            // event re-enqueues the user and heals the record.
            if let Err(err) = engine.recalculate_user(&user_id).await {
                warn!(user_id = %user_id, %err, "recalculation pass failed");
            }
        }
    }
}

fn lock(state: &Mutex<CoordinatorState>) -> MutexGuard<'_, CoordinatorState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
