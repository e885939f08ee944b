//! Task assignment and edit commands.
//!
//! # Responsibility
//! - Assign new tasks to registered users.
//! - Apply owner edits (complete, reassign, re-date) to one view entry.
//! - Write an edited task back into the master collection by stable id.
//!
//! # Invariants
//! - `assigned_date` is set to today on creation and never edited.
//! - New and re-dated tasks are due strictly after today.
//! - Mark-complete is idempotent.

use crate::model::task::{ensure_due_after, Task};
use crate::model::user::{normalize_username, user_exists, User};
use crate::model::view::UserTaskView;
use crate::service::outcome::{CommandOutcome, RejectReason};
use chrono::NaiveDate;
use log::info;

/// Input for assigning a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Assignee; normalized before lookup.
    pub username: String,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
}

/// Owner choice for one selected task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEdit {
    MarkComplete,
    /// Hand the task to another registered user.
    Reassign(String),
    ChangeDueDate(NaiveDate),
    /// Leave without changes (either menu level).
    Abort,
}

/// Appends a new incomplete task assigned `today`.
pub fn add_task(
    tasks: &[Task],
    users: &[User],
    request: &NewTask,
    today: NaiveDate,
) -> CommandOutcome<Vec<Task>> {
    let username = normalize_username(&request.username);
    if !user_exists(users, &username) {
        return CommandOutcome::Rejected(RejectReason::UnknownUser(username));
    }

    let task = match Task::new(
        username,
        request.title.trim(),
        request.description.trim(),
        request.due_date,
        today,
    ) {
        Ok(task) => task,
        Err(err) => return CommandOutcome::Rejected(err.into()),
    };

    let mut next = tasks.to_vec();
    info!(
        "event=task_add module=service status=ok task_id={} task_count={}",
        task.id,
        next.len() + 1
    );
    next.push(task);
    CommandOutcome::Applied(next)
}

/// Applies `edit` to a copy of the task in `entry`.
///
/// The caller writes the result back with [`write_back`].
pub fn edit_owned_task(
    entry: &UserTaskView,
    users: &[User],
    edit: TaskEdit,
    today: NaiveDate,
) -> CommandOutcome<Task> {
    let mut task = entry.task.clone();
    match edit {
        TaskEdit::MarkComplete => {
            task.completed = true;
        }
        TaskEdit::Reassign(username) => {
            let username = normalize_username(&username);
            if !user_exists(users, &username) {
                return CommandOutcome::Rejected(RejectReason::UnknownUser(username));
            }
            task.username = username;
        }
        TaskEdit::ChangeDueDate(due_date) => {
            if let Err(err) = ensure_due_after(due_date, today) {
                return CommandOutcome::Rejected(err.into());
            }
            task.due_date = due_date;
        }
        TaskEdit::Abort => return CommandOutcome::Aborted,
    }
    info!(
        "event=task_edit module=service status=ok task_id={}",
        task.id
    );
    CommandOutcome::Applied(task)
}

/// Replaces the task sharing `edited.id` in a copy of `tasks`.
pub fn write_back(tasks: &[Task], edited: Task) -> CommandOutcome<Vec<Task>> {
    let Some(position) = tasks.iter().position(|task| task.id == edited.id) else {
        return CommandOutcome::Rejected(RejectReason::TaskNotFound(edited.id));
    };
    let mut next = tasks.to_vec();
    next[position] = edited;
    CommandOutcome::Applied(next)
}

#[cfg(test)]
mod tests {
    use super::{add_task, edit_owned_task, write_back, NewTask, TaskEdit};
    use crate::model::task::{Task, TaskValidationError};
    use crate::model::user::User;
    use crate::model::view::filter_incomplete_for_user;
    use crate::service::outcome::{CommandOutcome, RejectReason};
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()
    }

    fn users() -> Vec<User> {
        vec![User::default_admin(), User::new("bob", "pw1")]
    }

    fn request(username: &str, due_date: NaiveDate) -> NewTask {
        NewTask {
            username: username.to_string(),
            title: " Title ".to_string(),
            description: "Desc".to_string(),
            due_date,
        }
    }

    #[test]
    fn add_task_sets_assignment_defaults() {
        let due = today().succ_opt().unwrap();
        let tasks = add_task(&[], &users(), &request("BOB", due), today())
            .applied()
            .unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].username, "bob");
        assert_eq!(tasks[0].title, "Title");
        assert_eq!(tasks[0].assigned_date, today());
        assert!(!tasks[0].completed);
    }

    #[test]
    fn add_task_rejects_unknown_user_and_past_due_dates() {
        let due = today().succ_opt().unwrap();
        assert_eq!(
            add_task(&[], &users(), &request("carol", due), today()),
            CommandOutcome::Rejected(RejectReason::UnknownUser("carol".to_string()))
        );
        assert_eq!(
            add_task(&[], &users(), &request("bob", today()), today()),
            CommandOutcome::Rejected(RejectReason::InvalidTask(
                TaskValidationError::DueDateNotInFuture {
                    due_date: today(),
                    today: today(),
                }
            ))
        );
    }

    #[test]
    fn mark_complete_is_idempotent() {
        let mut task = Task::new("bob", "t", "d", today().succ_opt().unwrap(), today()).unwrap();
        let view = filter_incomplete_for_user(std::slice::from_ref(&task), "bob");
        let done = edit_owned_task(&view[0], &users(), TaskEdit::MarkComplete, today())
            .applied()
            .unwrap();
        assert!(done.completed);

        task.completed = true;
        let entry = crate::model::view::UserTaskView {
            task_num: 1,
            position: 0,
            task: task.clone(),
        };
        let again = edit_owned_task(&entry, &users(), TaskEdit::MarkComplete, today())
            .applied()
            .unwrap();
        assert_eq!(again, task);
    }

    #[test]
    fn reassign_and_redate_follow_guards() {
        let task = Task::new("bob", "t", "d", today().succ_opt().unwrap(), today()).unwrap();
        let view = filter_incomplete_for_user(std::slice::from_ref(&task), "bob");

        let moved = edit_owned_task(&view[0], &users(), TaskEdit::Reassign("Admin".into()), today());
        assert_eq!(moved.applied().unwrap().username, "admin");

        let unknown = edit_owned_task(&view[0], &users(), TaskEdit::Reassign("zed".into()), today());
        assert!(matches!(unknown, CommandOutcome::Rejected(RejectReason::UnknownUser(_))));

        let later = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let redated = edit_owned_task(&view[0], &users(), TaskEdit::ChangeDueDate(later), today());
        let redated = redated.applied().unwrap();
        assert_eq!(redated.due_date, later);
        assert_eq!(redated.assigned_date, today());

        let past = edit_owned_task(&view[0], &users(), TaskEdit::ChangeDueDate(today()), today());
        assert!(matches!(past, CommandOutcome::Rejected(RejectReason::InvalidTask(_))));

        assert_eq!(
            edit_owned_task(&view[0], &users(), TaskEdit::Abort, today()),
            CommandOutcome::Aborted
        );
    }

    #[test]
    fn write_back_replaces_by_id_and_detects_missing_tasks() {
        let due = today().succ_opt().unwrap();
        let tasks = vec![
            Task::new("bob", "a", "", due, today()).unwrap(),
            Task::new("bob", "b", "", due, today()).unwrap(),
        ];
        let mut edited = tasks[1].clone();
        edited.completed = true;

        let next = write_back(&tasks, edited.clone()).applied().unwrap();
        assert!(next[1].completed);
        assert!(!tasks[1].completed);

        let stray = Task::new("bob", "c", "", due, today()).unwrap();
        assert_eq!(
            write_back(&tasks, stray.clone()),
            CommandOutcome::Rejected(RejectReason::TaskNotFound(stray.id))
        );
    }
}
