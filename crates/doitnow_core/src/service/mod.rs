//! Core use-case services.
//!
//! # Responsibility
//! - Provide the state-transition commands over user/task collections.
//! - Aggregate statistics into reports and hand them to the record store.
//! - Persist dirty collections at logout.
//!
//! # Invariants
//! - Commands never mutate their input collections; they return new ones.
//! - "Did this take effect" is answered by `CommandOutcome`, never by a
//!   sentinel value.

pub mod outcome;
pub mod report_service;
pub mod session_service;
pub mod task_service;
pub mod user_service;
