use chrono::{Days, NaiveDate};
use doitnow_core::repo::record_codec::{decode_tasks, decode_users};
use doitnow_core::{
    add_task, authenticate, edit_owned_task, filter_incomplete_for_user, plan_user_deletion,
    register_user, write_back, CommandOutcome, NewTask, RejectReason, Task, TaskEdit, User,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
}

fn tomorrow() -> NaiveDate {
    today().checked_add_days(Days::new(1)).unwrap()
}

fn admin_and_bob() -> Vec<User> {
    vec![User::new("admin", "password"), User::new("bob", "pw1")]
}

#[test]
fn add_complete_then_delete_owner_is_rejected() {
    let users = admin_and_bob();
    let tasks: Vec<Task> = Vec::new();

    let request = NewTask {
        username: "bob".to_string(),
        title: "Title".to_string(),
        description: "Desc".to_string(),
        due_date: tomorrow(),
    };
    let tasks = add_task(&tasks, &users, &request, today()).applied().unwrap();
    assert_eq!(tasks.len(), 1);
    assert!(!tasks[0].completed);

    let view = filter_incomplete_for_user(&tasks, "bob");
    let edited = edit_owned_task(&view[0], &users, TaskEdit::MarkComplete, today())
        .applied()
        .unwrap();
    let tasks = write_back(&tasks, edited).applied().unwrap();
    assert!(tasks[0].completed);
    assert!(filter_incomplete_for_user(&tasks, "bob").is_empty());

    assert_eq!(
        plan_user_deletion(&users, &tasks, "bob"),
        CommandOutcome::Rejected(RejectReason::HasAssignedTasks {
            username: "bob".to_string(),
            task_count: 1,
        })
    );
}

#[test]
fn delete_guard_covers_incomplete_tasks_too() {
    let users = admin_and_bob();
    let tasks = vec![Task::from_record("bob", "t", "", tomorrow(), today(), false)];

    assert!(matches!(
        plan_user_deletion(&users, &tasks, "Bob"),
        CommandOutcome::Rejected(RejectReason::HasAssignedTasks { task_count: 1, .. })
    ));
    assert!(plan_user_deletion(&users, &tasks, "admin").is_applied());
}

#[test]
fn reassigned_task_leaves_old_owner_view() {
    let users = admin_and_bob();
    let tasks = vec![
        Task::from_record("bob", "first", "", tomorrow(), today(), false),
        Task::from_record("bob", "second", "", tomorrow(), today(), false),
    ];

    let view = filter_incomplete_for_user(&tasks, "bob");
    let edited = edit_owned_task(&view[1], &users, TaskEdit::Reassign("admin".into()), today())
        .applied()
        .unwrap();
    let tasks = write_back(&tasks, edited).applied().unwrap();

    let bob_view = filter_incomplete_for_user(&tasks, "bob");
    assert_eq!(bob_view.len(), 1);
    assert_eq!(bob_view[0].task.title, "first");
    let admin_view = filter_incomplete_for_user(&tasks, "admin");
    assert_eq!(admin_view[0].task.title, "second");
    assert_eq!(admin_view[0].position, 1);
}

#[test]
fn aborted_edit_leaves_collection_untouched() {
    let users = admin_and_bob();
    let tasks = vec![Task::from_record("bob", "t", "", tomorrow(), today(), false)];
    let view = filter_incomplete_for_user(&tasks, "bob");

    let outcome = edit_owned_task(&view[0], &users, TaskEdit::Abort, today())
        .and_then(|edited| write_back(&tasks, edited));
    assert_eq!(outcome, CommandOutcome::Aborted);
    assert!(!tasks[0].completed);
}

#[test]
fn mixed_case_records_keep_login_and_guards_working() {
    let users = decode_users("admin;password\nBob;pw\n").unwrap();
    let tasks = decode_tasks("BOB;T;D;2024-09-10;2024-09-01;No\n").unwrap();

    assert_eq!(authenticate(&users, "Bob", "pw").unwrap().username, "bob");
    assert_eq!(
        register_user(&users, "bob", "x"),
        CommandOutcome::Rejected(RejectReason::UsernameTaken("bob".to_string()))
    );
    assert!(matches!(
        plan_user_deletion(&users, &tasks, "bob"),
        CommandOutcome::Rejected(RejectReason::HasAssignedTasks { task_count: 1, .. })
    ));
}
