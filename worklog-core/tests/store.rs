//! End-to-end tests for the CSV-backed report store.
//!
//! These go through the public service API and then inspect the file on
//! disk, so the on-disk format and the typed view are checked together.

use std::path::Path;

use time::macros::date;
use worklog_core::{
    Backend, Category, Config, GoalEntry, RecordStore, ReportInput, ReportService, Status,
    StoreParams, WorklogError, open_store,
};

fn csv_store(path: &Path) -> Box<dyn RecordStore> {
    open_store(
        Backend::Csv,
        StoreParams {
            store_path: path.to_path_buf(),
        },
    )
    .unwrap()
}

fn service(path: &Path) -> ReportService {
    ReportService::open(csv_store(path), &Config::default()).unwrap()
}

fn kim_daily() -> ReportInput {
    ReportInput {
        author: "Kim".into(),
        category: Category::Daily,
        date: date!(2024 - 05 - 02),
        status: Status::InProgress,
        goals: vec![
            GoalEntry::new("Ship v1", true),
            GoalEntry::new("", false),
            GoalEntry::new("", false),
            GoalEntry::new("", false),
            GoalEntry::new("", false),
        ],
        issues: vec!["Blocked on review".into(), String::new(), String::new()],
    }
}

#[test]
fn initialize_writes_header_once() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested").join("work_logs.csv");
    let store = csv_store(&path);

    assert!(matches!(store.load_all(), Err(WorklogError::NotFound(_))));
    assert!(store.is_empty().unwrap());

    store.initialize().unwrap();
    store.initialize().unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "date,author,category,goals,status,rate,issues\n"
    );
    assert!(store.load_all().unwrap().is_empty());
}

#[test]
fn append_to_missing_store_is_not_found() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("work_logs.csv");
    let svc = service(&path);
    std::fs::remove_file(&path).unwrap();

    let err = svc.submit(kim_daily()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn submit_then_load() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("work_logs.csv");
    let svc = service(&path);

    let r = svc.submit(kim_daily()).unwrap();
    assert_eq!(r.completion_rate, 100);

    let rows = svc.reports().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0], r);
    assert_eq!(rows[0].issues, "1. Blocked on review");
    assert_eq!(rows[0].goals, "[DONE] Ship v1");
}

#[test]
fn multiline_fields_survive_the_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("work_logs.csv");
    let svc = service(&path);

    let mut input = kim_daily();
    input.goals = vec![
        GoalEntry::new("Review \"auth\" PR, then merge", true),
        GoalEntry::new("Draft plan\nwith two lines", false),
        GoalEntry::new("Call vendor", false),
    ];
    input.issues = vec!["Budget, pending".into(), "Laptop\ndied".into()];
    svc.submit(input.clone()).unwrap();

    let draft = svc.draft(0).unwrap();
    assert_eq!(&draft.goals[..3], &input.goals[..]);
    assert_eq!(draft.goals[3], GoalEntry::default());
    assert_eq!(draft.issues[..2], input.issues[..]);
    assert_eq!(draft.completion_rate, 33);
}

#[test]
fn update_rewrites_only_the_target_row() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("work_logs.csv");
    let svc = service(&path);

    svc.submit(kim_daily()).unwrap();
    let mut lee = kim_daily();
    lee.author = "Lee".into();
    lee.category = Category::Weekly;
    svc.submit(lee).unwrap();

    let mut edit = svc.draft(1).unwrap().into_input();
    edit.goals[0].completed = false;
    edit.goals[1] = GoalEntry::new("Plan sprint", true);
    edit.status = Status::Done;
    svc.update(1, edit).unwrap();

    let rows = svc.reports().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].author, "Kim");
    assert_eq!(rows[0].completion_rate, 100);
    assert_eq!(rows[1].author, "Lee");
    assert_eq!(rows[1].status, Status::Done);
    assert_eq!(rows[1].completion_rate, 50);
    assert_eq!(rows[1].goals, "[IN-PROGRESS] Ship v1\n\n[DONE] Plan sprint");
}

#[test]
fn rewrite_of_loaded_rows_is_idempotent() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("work_logs.csv");
    let svc = service(&path);
    svc.submit(kim_daily()).unwrap();
    let mut second = kim_daily();
    second.issues = vec!["a\n\nb".into()];
    svc.submit(second).unwrap();

    let store = csv_store(&path);
    let before = std::fs::read_to_string(&path).unwrap();
    let rows = store.load_all().unwrap();
    store.rewrite_all(&rows).unwrap();
    assert_eq!(store.load_all().unwrap(), rows);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn append_after_hand_edit_without_trailing_newline() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("work_logs.csv");
    std::fs::write(
        &path,
        "date,author,category,goals,status,rate,issues\n2024-05-01,Park,monthly,[DONE] x,done,100,",
    )
    .unwrap();
    let svc = service(&path);
    svc.submit(kim_daily()).unwrap();

    let rows = svc.reports().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].author, "Park");
    assert_eq!(rows[1].author, "Kim");
}

#[test]
fn corrupt_store_is_a_parse_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("work_logs.csv");
    std::fs::write(&path, "date,author\n2024-05-01,Park\n").unwrap();
    let svc = service(&path);
    assert!(matches!(svc.reports(), Err(WorklogError::Parse(_))));
    assert!(matches!(svc.summary(), Err(WorklogError::Parse(_))));
}

#[test]
fn submit_into_blank_line_store_is_readable() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("work_logs.csv");
    std::fs::write(&path, "\n").unwrap();
    let svc = service(&path);
    assert!(svc.is_empty().unwrap());

    svc.submit(kim_daily()).unwrap();

    let rows = svc.reports().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].author, "Kim");
}

#[cfg(unix)]
#[test]
fn update_keeps_store_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("work_logs.csv");
    let svc = service(&path);
    svc.submit(kim_daily()).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

    let edit = svc.draft(0).unwrap().into_input();
    svc.update(0, edit).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}
