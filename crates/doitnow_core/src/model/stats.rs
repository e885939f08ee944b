//! Task and user statistics.
//!
//! # Responsibility
//! - Aggregate completion and overdue counts over a task slice.
//! - Derive per-user figures for the user overview report.
//!
//! # Invariants
//! - `completed + incomplete == total` and `overdue <= incomplete`.
//! - Empty inputs produce no stats, so percentages never divide by zero.
//! - Per-user percentages use the global task total as denominator.

use crate::model::task::Task;
use crate::model::user::User;
use crate::model::view::tasks_for_user;
use chrono::NaiveDate;
use serde::Serialize;

/// Counts and percentages over one task slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub incomplete: usize,
    pub overdue: usize,
    /// `incomplete / total`, as a rounded percentage.
    pub incomplete_pct: u32,
    /// `overdue / total`, as a rounded percentage.
    pub overdue_pct: u32,
}

/// Figures for one user with at least one assigned task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserTaskStats {
    pub username: String,
    /// The user's own subtotal.
    pub stats: TaskStats,
    /// Share of all tasks assigned to this user.
    pub pct_assigned: u32,
    /// The user's completed count over the global total.
    pub pct_completed: u32,
    /// The user's incomplete count over the global total.
    pub pct_incomplete: u32,
    /// The user's overdue count over the global total.
    pub pct_overdue: u32,
}

/// Global user overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub user_count: usize,
    pub total_tasks: usize,
    /// Users without tasks are omitted; order follows the user list.
    pub users: Vec<UserTaskStats>,
}

/// Aggregates `tasks`. Returns `None` for an empty slice.
pub fn compute_task_stats<'a, I>(tasks: I, today: NaiveDate) -> Option<TaskStats>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut total = 0;
    let mut completed = 0;
    let mut overdue = 0;
    for task in tasks {
        total += 1;
        if task.completed {
            completed += 1;
        } else if task.is_overdue(today) {
            overdue += 1;
        }
    }
    if total == 0 {
        return None;
    }

    let incomplete = total - completed;
    Some(TaskStats {
        total,
        completed,
        incomplete,
        overdue,
        incomplete_pct: percent(incomplete, total),
        overdue_pct: percent(overdue, total),
    })
}

/// Builds the user overview. Returns `None` when there are no tasks.
pub fn compute_user_stats(tasks: &[Task], users: &[User], today: NaiveDate) -> Option<UserStats> {
    let total_tasks = tasks.len();
    if total_tasks == 0 {
        return None;
    }

    let per_user = users
        .iter()
        .filter_map(|user| {
            let owned = tasks_for_user(tasks, &user.username);
            let stats = compute_task_stats(owned.iter().copied(), today)?;
            Some(UserTaskStats {
                username: user.username.clone(),
                pct_assigned: percent(stats.total, total_tasks),
                pct_completed: percent(stats.completed, total_tasks),
                pct_incomplete: percent(stats.incomplete, total_tasks),
                pct_overdue: percent(stats.overdue, total_tasks),
                stats,
            })
        })
        .collect();

    Some(UserStats {
        user_count: users.len(),
        total_tasks,
        users: per_user,
    })
}

/// `part / whole * 100` in `f64`, rounded half to even.
///
/// The float ratio is rounded as computed, so `23 / 40` gives 57.
/// An empty `whole` yields 0.
fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let scaled = (part as f64 / whole as f64) * 100.0;
    scaled.round_ties_even() as u32
}
