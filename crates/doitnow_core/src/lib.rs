//! Core domain logic for the DO-IT-NOW task manager.
//! This crate is the single source of truth for user/task invariants.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::stats::{compute_task_stats, compute_user_stats, TaskStats, UserStats, UserTaskStats};
pub use model::task::{parse_date, Task, TaskId, TaskValidationError, DATE_FORMAT};
pub use model::user::{authenticate, normalize_username, user_exists, AuthError, User, ADMIN_USERNAME};
pub use model::view::{filter_incomplete_for_user, tasks_for_user, UserTaskView};
pub use repo::file_store::FileRecordStore;
pub use repo::{RecordStore, RepoError, RepoResult};
pub use service::outcome::{CommandOutcome, RejectReason};
pub use service::report_service::{
    generate_reports, render_task_report, render_user_report, GeneratedReports, ReportError,
};
pub use service::session_service::{
    DirtyFlags, LogoutReport, PublishedReports, SavedStatistics, SessionData, SessionService,
};
pub use service::task_service::{add_task, edit_owned_task, write_back, NewTask, TaskEdit};
pub use service::user_service::{plan_user_deletion, register_user, PendingUserDeletion};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
