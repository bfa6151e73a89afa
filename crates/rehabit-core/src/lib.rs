//! # Rehabit Core Library
//!
//! This library provides the streak subsystem for Rehabit, a mobile
//! application connecting physical therapists and patients around
//! assigned exercise bundles. The mobile shell handles screens,
//! navigation, and the remote document-database client; this crate owns
//! the one piece with real invariants: turning the sparse per-day
//! completion history into a timezone-safe, gap-free streak record.
//!
//! ## Architecture
//!
//! - **Engine**: a pure from-scratch derivation of the streak record;
//!   every pass re-reads the full history, so the result depends only on
//!   durable state and failed passes heal on the next one
//! - **Coordinator**: a debounced pending-set so bursts of completion
//!   events collapse into one recalculation pass per user
//! - **Stores**: trait seams for assignments, completion history, and
//!   the derived record; in-memory implementations included, the remote
//!   backend implements the same traits in the application shell
//! - **Day keys**: one module owns the `YYYY-MM-DD` local-calendar keys
//!   so day continuity means the same thing everywhere
//!
//! ## Key Components
//!
//! - [`StreakService`]: application-facing facade
//! - [`StreakEngine`]: recalculation engine
//! - [`UpdateCoordinator`]: debounced recalculation queue
//! - [`StreakConfig`]: TOML-backed tunables

pub mod config;
pub mod coordinator;
pub mod day_key;
pub mod engine;
pub mod error;
pub mod model;
pub mod service;
pub mod store;

pub use config::StreakConfig;
pub use coordinator::{Recalculate, UpdateCoordinator};
pub use engine::{derive_streak, StreakEngine};
pub use error::{ConfigError, CoreError, Result, StoreError};
pub use model::{
    AssignedExercise, CompletedExercise, DailyCompletion, StreakData, StreakStatus,
};
pub use service::StreakService;
pub use store::{
    AssignmentReader, CompletionStore, MemoryAssignments, MemoryCompletions, MemoryStreaks,
    StreakStore,
};
