//! User registration and deletion commands.
//!
//! # Invariants
//! - Usernames stay unique after registration.
//! - A user that owns any task, completed or not, cannot be deleted.
//! - Deletion only applies after the literal confirmation `yes`.

use crate::model::task::Task;
use crate::model::user::{normalize_username, user_exists, User};
use crate::model::view::tasks_for_user;
use crate::service::outcome::{CommandOutcome, RejectReason};
use log::info;

/// Confirmation text that commits a pending deletion.
pub const DELETE_CONFIRMATION: &str = "yes";

/// Registers `username` (normalized) with `password`.
pub fn register_user(users: &[User], username: &str, password: &str) -> CommandOutcome<Vec<User>> {
    let user = User::new(username, password);
    if user_exists(users, &user.username) {
        info!("event=user_register module=service status=rejected reason=username_taken");
        return CommandOutcome::Rejected(RejectReason::UsernameTaken(user.username));
    }

    let mut next = users.to_vec();
    next.push(user);
    info!(
        "event=user_register module=service status=ok user_count={}",
        next.len()
    );
    CommandOutcome::Applied(next)
}

/// Deletion that passed its guards and awaits operator confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUserDeletion {
    username: String,
    remaining: Vec<User>,
}

impl PendingUserDeletion {
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Commits when `answer` is exactly `yes` (surrounding whitespace
    /// ignored); any other answer aborts.
    pub fn confirm(self, answer: &str) -> CommandOutcome<Vec<User>> {
        if answer.trim() != DELETE_CONFIRMATION {
            info!("event=user_delete module=service status=aborted");
            return CommandOutcome::Aborted;
        }
        info!(
            "event=user_delete module=service status=ok user_count={}",
            self.remaining.len()
        );
        CommandOutcome::Applied(self.remaining)
    }
}

/// Checks the deletion guards for `username`.
///
/// Nothing is removed until the returned plan is confirmed.
pub fn plan_user_deletion(
    users: &[User],
    tasks: &[Task],
    username: &str,
) -> CommandOutcome<PendingUserDeletion> {
    let username = normalize_username(username);
    if !user_exists(users, &username) {
        return CommandOutcome::Rejected(RejectReason::UnknownUser(username));
    }

    let task_count = tasks_for_user(tasks, &username).len();
    if task_count > 0 {
        info!(
            "event=user_delete module=service status=rejected reason=has_tasks task_count={task_count}"
        );
        return CommandOutcome::Rejected(RejectReason::HasAssignedTasks {
            username,
            task_count,
        });
    }

    let remaining = users
        .iter()
        .filter(|user| user.username != username)
        .cloned()
        .collect();
    CommandOutcome::Applied(PendingUserDeletion {
        username,
        remaining,
    })
}
