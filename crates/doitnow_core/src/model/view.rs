//! Per-user task projections.
//!
//! # Invariants
//! - Numbering starts at 1 and follows master collection order.
//! - Numbering is recomputed on every call and is not stable across edits.

use crate::model::task::{Task, TaskId};
use serde::Serialize;

/// One incomplete task as shown to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserTaskView {
    /// Display number, 1-based.
    pub task_num: usize,
    /// Index in the master collection when the view was built.
    pub position: usize,
    pub task: Task,
}

impl UserTaskView {
    pub fn task_id(&self) -> TaskId {
        self.task.id
    }
}

/// Selects `username`'s incomplete tasks and numbers them `1..=N`.
pub fn filter_incomplete_for_user(tasks: &[Task], username: &str) -> Vec<UserTaskView> {
    tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| task.is_owned_by(username) && !task.completed)
        .enumerate()
        .map(|(offset, (position, task))| UserTaskView {
            task_num: offset + 1,
            position,
            task: task.clone(),
        })
        .collect()
}

/// Every task owned by `username`, completed or not.
pub fn tasks_for_user<'a>(tasks: &'a [Task], username: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| task.is_owned_by(username))
        .collect()
}
