use chrono::NaiveDate;
use doitnow_core::{
    compute_task_stats, generate_reports, DirtyFlags, FileRecordStore, RecordStore, ReportError,
    SessionData, SessionService, Task, User,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, d).unwrap()
}

fn today() -> NaiveDate {
    day(15)
}

fn sample() -> SessionData {
    let users = vec![
        User::new("admin", "password"),
        User::new("alice", "a"),
        User::new("bob", "b"),
    ];
    let tasks = vec![
        Task::from_record("alice", "a1", "", day(20), day(1), true),
        Task::from_record("alice", "a2", "", day(10), day(1), false),
        Task::from_record("alice", "a3", "", day(25), day(1), false),
        Task::from_record("bob", "b1", "", day(14), day(1), false),
    ];
    SessionData { users, tasks }
}

#[test]
fn per_user_percentages_use_global_total() {
    let data = sample();
    let reports = generate_reports(&data.tasks, &data.users, today()).unwrap();

    let stats = &reports.user_stats;
    assert_eq!(stats.user_count, 3);
    assert_eq!(stats.total_tasks, 4);
    // admin owns nothing and is omitted
    assert_eq!(stats.users.len(), 2);

    let alice = &stats.users[0];
    assert_eq!(alice.username, "alice");
    assert_eq!(alice.stats.total, 3);
    assert_eq!(alice.pct_assigned, 75);
    assert_eq!(alice.pct_completed, 25);
    assert_eq!(alice.pct_incomplete, 50);
    assert_eq!(alice.pct_overdue, 25);

    let bob = &stats.users[1];
    assert_eq!(bob.pct_assigned, 25);
    assert_eq!(bob.pct_completed, 0);
    assert_eq!(bob.pct_incomplete, 25);
    assert_eq!(bob.pct_overdue, 25);

    assert!(reports
        .user_report
        .contains("The percentage of completed tasks -     25%"));
    assert!(reports.user_report.contains("                 ALICE\n"));
}

#[test]
fn task_stats_invariants_hold() {
    let data = sample();
    let stats = compute_task_stats(&data.tasks, today()).unwrap();
    assert_eq!(stats.completed + stats.incomplete, stats.total);
    assert!(stats.overdue <= stats.incomplete);
    assert_eq!(stats.overdue, 2);
    assert_eq!(stats.incomplete_pct, 75);
    assert_eq!(stats.overdue_pct, 50);
}

#[test]
fn user_report_text_layout() {
    let users = vec![User::new("admin", "password"), User::new("bob", "b")];
    let tasks = vec![Task::from_record("bob", "b1", "", day(20), day(1), false)];
    let reports = generate_reports(&tasks, &users, today()).unwrap();

    let expected = "\n\
-----------------USER STATS--------------------\n\
The total number of users -             2\n\
The total number of tasks -             1\n\
\n\
-----------------------------------------------\n                 BOB\n\
Number of tasks assigned -              1\n\
The percentage of tasks assigned -      100%\n\
The percentage of completed tasks -     0%\n\
The percentage of uncompleted tasks -   100%\n\
The percentage of overdue tasks -       0%\n\
-----------------------------------------------\n";
    assert_eq!(reports.user_report, expected);
}

#[test]
fn empty_task_list_writes_no_report_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileRecordStore::open(dir.path()).unwrap();
    let service = SessionService::new(&store);
    let data = SessionData {
        users: vec![User::default_admin()],
        tasks: Vec::new(),
    };

    assert!(matches!(
        service.publish_reports(&data, today()),
        Err(ReportError::NoTasks)
    ));
    assert!(!store.task_report_path().exists());
    assert!(!store.user_report_path().exists());
    assert_eq!(service.load_statistics().unwrap(), None);
}

#[test]
fn published_reports_are_readable_as_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileRecordStore::open(dir.path()).unwrap();
    let service = SessionService::new(&store);

    let published = service.publish_reports(&sample(), today()).unwrap();
    assert!(published.failures.is_empty());

    let saved = service.load_statistics().unwrap().unwrap();
    assert_eq!(saved.task_report, published.reports.task_report);
    assert_eq!(saved.user_report, published.reports.user_report);
}

#[test]
fn logout_saves_only_dirty_collections() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileRecordStore::open(dir.path()).unwrap();
    let service = SessionService::new(&store);
    let mut data = service.load().unwrap();
    data.users.push(User::new("carol", "c"));
    data.tasks
        .push(Task::from_record("carol", "t", "", day(20), day(1), false));

    let report = service.logout_save(
        "admin",
        &data,
        DirtyFlags {
            users: true,
            tasks: false,
        },
    );
    assert!(report.users_written);
    assert!(!report.tasks_written);
    assert!(report.failures.is_empty());
    assert_eq!(
        report.messages,
        vec!["All changes saved".to_string(), "Logged out as admin".to_string()]
    );

    assert_eq!(store.load_users().unwrap().len(), 2);
    assert!(store.load_tasks().unwrap().is_empty());
}

#[test]
fn logout_without_changes_only_says_goodbye() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileRecordStore::open(dir.path()).unwrap();
    let service = SessionService::new(&store);
    let data = service.load().unwrap();

    let report = service.logout_save("bob", &data, DirtyFlags::default());
    assert_eq!(report.messages, vec!["Logged out as bob".to_string()]);
}

#[test]
fn failed_logout_write_is_reported_and_still_confirms() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileRecordStore::open(dir.path().join("data")).unwrap();
    let service = SessionService::new(&store);
    let data = service.load().unwrap();
    std::fs::remove_dir_all(store.dir()).unwrap();

    let report = service.logout_save(
        "admin",
        &data,
        DirtyFlags {
            users: false,
            tasks: true,
        },
    );
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.messages.len(), 3);
    assert_eq!(report.messages[1], "All changes saved");
}
