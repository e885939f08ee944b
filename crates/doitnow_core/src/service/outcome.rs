//! Tagged command results.

use crate::model::task::{TaskId, TaskValidationError};
use std::fmt::{Display, Formatter};

/// Result of a state-transition command.
///
/// Callers substitute their working copy only on `Applied`, and only then
/// mark the matching collection dirty.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome<T> {
    /// The command took effect; carries the new value.
    Applied(T),
    /// A guard refused the command.
    Rejected(RejectReason),
    /// The operator backed out; nothing changed.
    Aborted,
}

impl<T> CommandOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Returns the applied value, dropping rejection details.
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Rejected(_) | Self::Aborted => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CommandOutcome<U> {
        match self {
            Self::Applied(value) => CommandOutcome::Applied(f(value)),
            Self::Rejected(reason) => CommandOutcome::Rejected(reason),
            Self::Aborted => CommandOutcome::Aborted,
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> CommandOutcome<U>) -> CommandOutcome<U> {
        match self {
            Self::Applied(value) => f(value),
            Self::Rejected(reason) => CommandOutcome::Rejected(reason),
            Self::Aborted => CommandOutcome::Aborted,
        }
    }
}

/// Why a command was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Registration target is already registered.
    UsernameTaken(String),
    /// Referenced user is not registered.
    UnknownUser(String),
    /// Deletion target still owns tasks (completed ones included).
    HasAssignedTasks { username: String, task_count: usize },
    /// Task fields break a task invariant.
    InvalidTask(TaskValidationError),
    /// Write-back target is no longer in the collection.
    TaskNotFound(TaskId),
}

impl Display for RejectReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UsernameTaken(_) => write!(f, "Username already exists"),
            Self::UnknownUser(_) => write!(f, "User does not exist."),
            Self::HasAssignedTasks { .. } => {
                write!(f, "This user has tasks assigned, cannot delete")
            }
            Self::InvalidTask(TaskValidationError::DueDateNotInFuture { .. }) => {
                write!(f, "Invalid date. Date must be after today's date")
            }
            Self::InvalidTask(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "Task no longer exists: {id}"),
        }
    }
}

impl From<TaskValidationError> for RejectReason {
    fn from(value: TaskValidationError) -> Self {
        Self::InvalidTask(value)
    }
}
