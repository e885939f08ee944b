//! Task domain model.
//!
//! # Responsibility
//! - Define the task record owned by the session and the record store.
//! - Enforce the due-date ordering rule on creation and due-date edits.
//!
//! # Invariants
//! - `id` is stable for the session and never reused for another task.
//! - `assigned_date` never changes after creation.
//! - New or re-dated tasks have `due_date` strictly after today.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Date format used by records, prompts and task cards.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stable identifier for a task within one session.
///
/// Records on disk carry no identifier; ids are assigned when a task is
/// created or loaded so write-back never depends on list positions.
pub type TaskId = Uuid;

/// Validation errors raised when building or re-dating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// `due_date` is not strictly after `today`.
    DueDateNotInFuture { due_date: NaiveDate, today: NaiveDate },
    /// Owner username is blank.
    EmptyOwner,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DueDateNotInFuture { due_date, today } => write!(
                f,
                "due date {} must be after today's date {}",
                due_date.format(DATE_FORMAT),
                today.format(DATE_FORMAT)
            ),
            Self::EmptyOwner => write!(f, "task owner must not be blank"),
        }
    }
}

impl Error for TaskValidationError {}

/// Assigned unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Owner; references an existing user when the task is created.
    pub username: String,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    /// Set to the creation day and never edited.
    pub assigned_date: NaiveDate,
    pub completed: bool,
}

impl Task {
    /// Creates an incomplete task assigned `today`.
    ///
    /// # Errors
    /// - `EmptyOwner` when `username` is blank.
    /// - `DueDateNotInFuture` when `due_date <= today`.
    pub fn new(
        username: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Self, TaskValidationError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(TaskValidationError::EmptyOwner);
        }
        ensure_due_after(due_date, today)?;
        Ok(Self::from_record(
            username,
            title,
            description,
            due_date,
            today,
            false,
        ))
    }

    /// Rebuilds a task from persisted fields with a fresh session id.
    ///
    /// Persisted tasks are not checked against today; old tasks may be
    /// overdue.
    pub fn from_record(
        username: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: NaiveDate,
        assigned_date: NaiveDate,
        completed: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            title: title.into(),
            description: description.into(),
            due_date,
            assigned_date,
            completed,
        }
    }

    /// Overdue means incomplete and due strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date < today
    }

    /// Whole days between assignment and due date.
    pub fn days_to_complete(&self) -> i64 {
        (self.due_date - self.assigned_date).num_days()
    }

    /// Returns whether `username` owns this task.
    pub fn is_owned_by(&self, username: &str) -> bool {
        self.username == username
    }
}

/// Checks the due-date ordering rule shared by creation and edits.
pub fn ensure_due_after(due_date: NaiveDate, today: NaiveDate) -> Result<(), TaskValidationError> {
    if due_date <= today {
        return Err(TaskValidationError::DueDateNotInFuture { due_date, today });
    }
    Ok(())
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::{parse_date, Task, TaskValidationError};
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_rejects_due_date_not_after_today() {
        let today = day(2024, 5, 10);
        let err = Task::new("bob", "t", "d", today, today).unwrap_err();
        assert_eq!(
            err,
            TaskValidationError::DueDateNotInFuture {
                due_date: today,
                today
            }
        );
        assert!(Task::new("bob", "t", "d", day(2024, 5, 11), today).is_ok());
    }

    #[test]
    fn new_rejects_blank_owner() {
        let today = day(2024, 5, 10);
        let err = Task::new("  ", "t", "d", day(2024, 6, 1), today).unwrap_err();
        assert_eq!(err, TaskValidationError::EmptyOwner);
    }

    #[test]
    fn days_to_complete_counts_calendar_days() {
        let task = Task::new("bob", "t", "d", day(2024, 5, 13), day(2024, 5, 10)).unwrap();
        assert_eq!(task.days_to_complete(), 3);
        assert_eq!(task.assigned_date, day(2024, 5, 10));
        assert!(!task.completed);
    }

    #[test]
    fn parse_date_accepts_iso_dates_only() {
        assert_eq!(parse_date(" 2024-02-29 "), Some(day(2024, 2, 29)));
        assert_eq!(parse_date("2023-02-29"), None);
        assert_eq!(parse_date("29/02/2024"), None);
    }

    #[test]
    fn task_serializes_dates_as_iso_strings() {
        let task = Task::from_record("bob", "t", "d", day(2024, 5, 3), day(2024, 5, 1), true);
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["due_date"], "2024-05-03");
        assert_eq!(value["assigned_date"], "2024-05-01");
        assert_eq!(value["completed"], true);
        assert!(value["id"].is_string());
    }
}
