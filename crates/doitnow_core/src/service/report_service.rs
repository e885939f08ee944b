//! Statistics report generation and rendering.
//!
//! # Responsibility
//! - Build task and user statistics from the session collections.
//! - Render both as fixed-width bordered text blocks.
//!
//! # Invariants
//! - No reports are produced when there are no tasks.
//! - Per-user percentages divide by the global task total.

use crate::model::stats::{compute_task_stats, compute_user_stats, TaskStats, UserStats};
use crate::model::task::Task;
use crate::model::user::User;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter, Write as _};

const LABEL_WIDTH: usize = 40;
const RULE: &str = "-----------------------------------------------";
const TASK_HEADING: &str = "-----------------TASK STATS-------------------";
const USER_HEADING: &str = "-----------------USER STATS--------------------";
const USERNAME_INDENT: &str = "                 ";

/// Report generation refusal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportError {
    /// The task collection is empty.
    NoTasks,
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTasks => write!(f, "Cannot generate any reports. No tasks are available"),
        }
    }
}

impl Error for ReportError {}

/// Structured stats plus their rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReports {
    pub task_stats: TaskStats,
    pub user_stats: UserStats,
    pub task_report: String,
    pub user_report: String,
}

/// Aggregates `tasks` and `users` into both reports.
///
/// # Errors
/// - `NoTasks` when `tasks` is empty.
pub fn generate_reports(
    tasks: &[Task],
    users: &[User],
    today: NaiveDate,
) -> Result<GeneratedReports, ReportError> {
    let task_stats = compute_task_stats(tasks, today).ok_or(ReportError::NoTasks)?;
    let user_stats = compute_user_stats(tasks, users, today).ok_or(ReportError::NoTasks)?;
    Ok(GeneratedReports {
        task_report: render_task_report(&task_stats),
        user_report: render_user_report(&user_stats),
        task_stats,
        user_stats,
    })
}

/// Renders the task overview block.
pub fn render_task_report(stats: &TaskStats) -> String {
    let mut out = format!("\n{TASK_HEADING}\n");
    push_line(&mut out, "The total number of tasks -", stats.total);
    push_line(&mut out, "The total number of completed tasks -", stats.completed);
    push_line(&mut out, "The total number of uncompleted tasks -", stats.incomplete);
    push_line(&mut out, "The total number of overdue tasks -", stats.overdue);
    push_pct(&mut out, "The percentage of incomplete tasks -", stats.incomplete_pct);
    push_pct(&mut out, "The percentage of overdue tasks -", stats.overdue_pct);
    out.push_str(RULE);
    out.push('\n');
    out
}

/// Renders the user overview: a global header, then one block per user.
pub fn render_user_report(stats: &UserStats) -> String {
    let mut out = format!("\n{USER_HEADING}\n");
    push_line(&mut out, "The total number of users -", stats.user_count);
    push_line(&mut out, "The total number of tasks -", stats.total_tasks);
    out.push('\n');
    for user in &stats.users {
        out.push_str(RULE);
        out.push('\n');
        let _ = writeln!(out, "{USERNAME_INDENT}{}", user.username.to_uppercase());
        push_line(&mut out, "Number of tasks assigned -", user.stats.total);
        push_pct(&mut out, "The percentage of tasks assigned -", user.pct_assigned);
        push_pct(&mut out, "The percentage of completed tasks -", user.pct_completed);
        push_pct(&mut out, "The percentage of uncompleted tasks -", user.pct_incomplete);
        push_pct(&mut out, "The percentage of overdue tasks -", user.pct_overdue);
        out.push_str(RULE);
        out.push('\n');
    }
    out
}

fn push_line(out: &mut String, label: &str, value: usize) {
    let _ = writeln!(out, "{:<width$}{value}", format!("{label} "), width = LABEL_WIDTH);
}

fn push_pct(out: &mut String, label: &str, value: u32) {
    let _ = writeln!(out, "{:<width$}{value}%", format!("{label} "), width = LABEL_WIDTH);
}

#[cfg(test)]
mod tests {
    use super::{generate_reports, render_task_report, ReportError};
    use crate::model::stats::TaskStats;
    use crate::model::user::User;
    use chrono::NaiveDate;

    #[test]
    fn empty_task_list_yields_no_reports() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            generate_reports(&[], &[User::default_admin()], today),
            Err(ReportError::NoTasks)
        );
    }

    #[test]
    fn task_report_keeps_fixed_label_column() {
        let stats = TaskStats {
            total: 4,
            completed: 1,
            incomplete: 3,
            overdue: 2,
            incomplete_pct: 75,
            overdue_pct: 50,
        };
        let expected = "\n\
-----------------TASK STATS-------------------\n\
The total number of tasks -             4\n\
The total number of completed tasks -   1\n\
The total number of uncompleted tasks - 3\n\
The total number of overdue tasks -     2\n\
The percentage of incomplete tasks -    75%\n\
The percentage of overdue tasks -       50%\n\
-----------------------------------------------\n";
        assert_eq!(render_task_report(&stats), expected);
    }
}
