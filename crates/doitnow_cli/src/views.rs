//! Text rendering for menus, notices and task cards.

use doitnow_core::{Task, User, UserTaskView, DATE_FORMAT};
use std::fmt::Write as _;

pub const WELCOME_BANNER: &str = "\nWelcome to DO-IT-NOW! Task Management System\n\
--------------------------------------------";

pub const TOP_LEVEL_PROMPT: &str = "\nEnter 'l' to login 'e' to exit : ";

const ADMIN_MENU: &str = "Select one of the following options below:

       USER OPTIONS              TASK OPTIONS              REPORT OPTIONS

    r -  Register a user       a -  Add a task          gr - Generate reports
    vu - View all users        va - View all tasks      ds - Display statistics
    du - Delete a user         vm - View my task

    lo - Logout
    :  ";

const USER_MENU: &str = "Select one of the following options below:
    vm - View my task
    lo - logout
    :  ";

pub const TASK_MENU: &str = "Select one of the following options below:
    mc - Mark as complete
    et - Edit my task
    e -  Exit
    :  ";

pub const EDIT_TASK_MENU: &str = "Select one of the following options below:
        cu - Change user assigned to task
        cd - Change the due date
        e -  Exit
        :  ";

/// Frames `message` between dashed rules.
pub fn info_box(message: &str) -> String {
    let rule = "-".repeat(message.chars().count() + 4);
    format!("\n{rule}\n! {message} !\n{rule}")
}

pub fn main_menu(user: &User) -> &'static str {
    if user.is_admin() {
        ADMIN_MENU
    } else {
        USER_MENU
    }
}

pub fn user_list(users: &[User]) -> String {
    let mut out = String::from("All registered users\n\n");
    for user in users {
        let _ = writeln!(out, "    {}", user.username);
    }
    out
}

/// Header line of a task card.
#[derive(Debug, Clone, Copy)]
pub enum CardLabel {
    /// Owner-facing number from a `UserTaskView`.
    Number(usize),
    /// Completion state, for the admin's full listing.
    Completion,
}

pub fn task_card(label: CardLabel, task: &Task) -> String {
    let mut out = match label {
        CardLabel::Number(num) => format!("\nTask Number: {num}\n"),
        CardLabel::Completion => format!(
            "\nTask Completed: {}\n",
            if task.completed { "Yes" } else { "No" }
        ),
    };
    let _ = writeln!(out, "Task: \t\t {}", task.title);
    let _ = writeln!(out, "Assigned to: \t {}", task.username);
    let _ = writeln!(out, "Date Assigned: \t {}", task.assigned_date.format(DATE_FORMAT));
    let _ = writeln!(out, "Due Date: \t {}", task.due_date.format(DATE_FORMAT));
    let _ = writeln!(out, "Task Description: \n {}\n", task.description);
    out
}

pub fn task_cards(view: &[UserTaskView]) -> String {
    view.iter()
        .map(|entry| task_card(CardLabel::Number(entry.task_num), &entry.task))
        .collect()
}

/// Detail block shown after the owner selects a task.
pub fn task_detail(entry: &UserTaskView) -> String {
    let days = entry.task.days_to_complete();
    let unit = if days > 1 { "days" } else { "day" };
    let stars = "*".repeat(47);
    format!(
        "\n{stars}\nYou selected task number {}\nYou have {days} {unit} to complete this task\n\
         \n               ASSIGNED TASK\n{}\n{stars}\n",
        entry.task_num, entry.task.description
    )
}

#[cfg(test)]
mod tests {
    use super::{info_box, main_menu, task_card, task_detail, CardLabel};
    use chrono::NaiveDate;
    use doitnow_core::{filter_incomplete_for_user, Task, User};

    fn task() -> Task {
        Task::from_record(
            "bob",
            "Ship",
            "Ship the release",
            NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            false,
        )
    }

    #[test]
    fn info_box_frames_message() {
        assert_eq!(info_box("Hi"), "\n------\n! Hi !\n------");
    }

    #[test]
    fn menus_depend_on_account() {
        assert!(main_menu(&User::default_admin()).contains("gr - Generate reports"));
        assert!(!main_menu(&User::new("bob", "x")).contains("gr -"));
    }

    #[test]
    fn task_card_lists_fields() {
        let card = task_card(CardLabel::Completion, &task());
        assert!(card.starts_with("\nTask Completed: No\n"));
        assert!(card.contains("Date Assigned: \t 2024-05-01\n"));
        assert!(card.contains("Due Date: \t 2024-05-03\n"));
    }

    #[test]
    fn task_detail_counts_days() {
        let tasks = vec![task()];
        let view = filter_incomplete_for_user(&tasks, "bob");
        let detail = task_detail(&view[0]);
        assert!(detail.contains("You selected task number 1"));
        assert!(detail.contains("You have 2 days to complete this task"));
    }
}
