//! Domain model for users, tasks and derived statistics.
//!
//! # Responsibility
//! - Define the in-memory shapes loaded from and saved to the record store.
//! - Provide pure query helpers (per-user projections, stats aggregation).
//!
//! # Invariants
//! - Usernames are trimmed and lowercased before they enter a collection.
//! - Every task carries a stable `TaskId` for the lifetime of a session.
//! - Helpers never mutate the collections they receive.

pub mod stats;
pub mod task;
pub mod user;
pub mod view;
