#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use pert_tool::{Project, ProjectMetadata, ProjectStore, SqliteProjectStore, Task};
use tempfile::NamedTempFile;

#[test]
fn sqlite_store_round_trips_a_project() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteProjectStore::new(file.path()).unwrap();

    let mut metadata = ProjectMetadata::default();
    metadata.project_name = "SQLite Project".into();
    metadata.project_start_date = NaiveDate::from_ymd_opt(2026, 3, 2);

    let mut project = Project::new_with_metadata(metadata);
    project.upsert_task(1, "Design", 5, None).unwrap();
    project.upsert_task(2, "Build", 10, Some(vec![1])).unwrap();
    project.compute().unwrap();

    store.save_project(&project).expect("save project");

    let loaded = store
        .load_project()
        .expect("load project")
        .expect("project exists");

    assert_eq!(loaded.metadata().project_name, "SQLite Project");
    assert_eq!(
        loaded.metadata().project_start_date,
        NaiveDate::from_ymd_opt(2026, 3, 2)
    );
    assert_eq!(loaded.dataframe().height(), 2);

    let task = Task::from_dataframe_row(loaded.dataframe(), 1).unwrap();
    assert_eq!(task.id, 2);
    assert_eq!(task.predecessors, vec![1]);
    assert_eq!(task.earliest_date, Some(5));
    assert_eq!(task.latest_date, Some(5));
    assert_eq!(task.is_critical, Some(true));
}

#[test]
fn sqlite_store_starts_empty() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteProjectStore::new(file.path()).unwrap();
    assert!(store.load_project().unwrap().is_none());
}

#[test]
fn sqlite_store_save_overwrites_previous_project() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteProjectStore::new(file.path()).unwrap();

    let mut first = Project::new();
    first.upsert_task(1, "A", 3, None).unwrap();
    store.save_project(&first).unwrap();

    let mut second = Project::new();
    second.upsert_task(10, "X", 1, None).unwrap();
    second.upsert_task(11, "Y", 2, Some(vec![10])).unwrap();
    store.save_project(&second).unwrap();

    let loaded = store.load_project().unwrap().expect("project exists");
    assert_eq!(loaded.dataframe().height(), 2);
    let ids: Vec<i32> = loaded.tasks().unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![10, 11]);
}
