//! Session-level persistence boundary.
//!
//! # Responsibility
//! - Load both record stores at session start.
//! - Save dirty collections at logout and report what happened.
//! - Publish generated reports and read them back for display.
//!
//! # Invariants
//! - Only collections flagged dirty are written.
//! - Write failures never abort logout or report publishing.

use crate::model::task::Task;
use crate::model::user::User;
use crate::repo::{RecordStore, RepoError, RepoResult};
use crate::service::report_service::{generate_reports, GeneratedReports, ReportError};
use chrono::NaiveDate;
use log::{info, warn};

/// Confirmation shown when at least one save was attempted.
pub const ALL_CHANGES_SAVED: &str = "All changes saved";

/// Working collections owned by the session loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    pub users: Vec<User>,
    pub tasks: Vec<Task>,
}

/// Which collections changed since login.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyFlags {
    pub users: bool,
    pub tasks: bool,
}

impl DirtyFlags {
    pub fn any(self) -> bool {
        self.users || self.tasks
    }
}

/// Outcome of a logout save.
#[derive(Debug, Default)]
pub struct LogoutReport {
    pub users_written: bool,
    pub tasks_written: bool,
    /// Failed writes; the in-memory state stays valid.
    pub failures: Vec<RepoError>,
    /// Operator-facing lines, in display order.
    pub messages: Vec<String>,
}

/// Outcome of a report publish.
#[derive(Debug)]
pub struct PublishedReports {
    pub reports: GeneratedReports,
    pub failures: Vec<RepoError>,
}

/// Both saved report texts, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedStatistics {
    pub task_report: String,
    pub user_report: String,
}

/// Session facade over a record store.
pub struct SessionService<R: RecordStore> {
    store: R,
}

impl<R: RecordStore> SessionService<R> {
    pub fn new(store: R) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    /// Loads users then tasks. Any error here is fatal for the caller.
    pub fn load(&self) -> RepoResult<SessionData> {
        let users = self.store.load_users()?;
        let tasks = self.store.load_tasks()?;
        Ok(SessionData { users, tasks })
    }

    /// Persists dirty collections for `username` and builds the logout
    /// messages.
    ///
    /// "All changes saved" follows any attempted write, even a failed one.
    pub fn logout_save(
        &self,
        username: &str,
        data: &SessionData,
        dirty: DirtyFlags,
    ) -> LogoutReport {
        let mut report = LogoutReport::default();

        if dirty.users {
            report.users_written = true;
            if let Err(err) = self.store.save_users(&data.users) {
                report.failures.push(err);
            }
        }
        if dirty.tasks {
            report.tasks_written = true;
            if let Err(err) = self.store.save_tasks(&data.tasks) {
                report.failures.push(err);
            }
        }

        for failure in &report.failures {
            report.messages.push(failure.to_string());
        }
        if dirty.any() {
            report.messages.push(ALL_CHANGES_SAVED.to_string());
        }
        report.messages.push(format!("Logged out as {username}"));

        if report.failures.is_empty() {
            info!(
                "event=logout_save module=service status=ok users_written={} tasks_written={}",
                report.users_written, report.tasks_written
            );
        } else {
            warn!(
                "event=logout_save module=service status=error failures={}",
                report.failures.len()
            );
        }
        report
    }

    /// Generates both reports and writes them to the store.
    ///
    /// # Errors
    /// - `NoTasks` when there is nothing to report; nothing is written.
    pub fn publish_reports(
        &self,
        data: &SessionData,
        today: NaiveDate,
    ) -> Result<PublishedReports, ReportError> {
        let reports = generate_reports(&data.tasks, &data.users, today).inspect_err(|_| {
            info!("event=reports_generate module=service status=rejected reason=no_tasks");
        })?;

        let mut failures = Vec::new();
        if let Err(err) = self.store.save_task_report(&reports.task_report) {
            failures.push(err);
        }
        if let Err(err) = self.store.save_user_report(&reports.user_report) {
            failures.push(err);
        }
        info!(
            "event=reports_generate module=service status={} task_total={} failures={}",
            if failures.is_empty() { "ok" } else { "error" },
            reports.task_stats.total,
            failures.len()
        );
        Ok(PublishedReports { reports, failures })
    }

    /// Reads both saved reports; `None` when either has not been generated.
    pub fn load_statistics(&self) -> RepoResult<Option<SavedStatistics>> {
        let task_report = self.store.load_task_report()?;
        let user_report = self.store.load_user_report()?;
        Ok(task_report
            .zip(user_report)
            .map(|(task_report, user_report)| SavedStatistics {
                task_report,
                user_report,
            }))
    }
}
