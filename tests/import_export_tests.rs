use chrono::NaiveDate;
use pert_tool::{
    PersistenceError, Project, ProjectMetadata, Task, load_project_from_csv,
    load_project_from_json, save_project_to_csv, save_project_to_json,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn build_sample_project() -> Project {
    let mut metadata = ProjectMetadata::default();
    metadata.project_name = "Export Project".into();
    metadata.project_description = "Testing persistence helpers".into();
    metadata.project_start_date = NaiveDate::from_ymd_opt(2026, 3, 2);

    let mut project = Project::new_with_metadata(metadata);
    project.upsert_task(1, "A", 7, None).unwrap();
    project.upsert_task(2, "B", 4, Some(vec![1])).unwrap();
    project.upsert_task(3, "C", 2, None).unwrap();
    project.upsert_task(4, "D", 6, Some(vec![1, 3])).unwrap();
    project.compute().unwrap();
    project
}

fn collect_tasks(project: &Project) -> Vec<Task> {
    let mut tasks = project.tasks().unwrap();
    tasks.sort_by_key(|t| t.id);
    tasks
}

#[test]
fn json_round_trip_preserves_project() {
    let project = build_sample_project();
    let file = NamedTempFile::new().unwrap();

    save_project_to_json(&project, file.path()).unwrap();
    let loaded = load_project_from_json(file.path()).unwrap();

    assert_eq!(loaded.metadata(), project.metadata());
    assert_eq!(collect_tasks(&loaded), collect_tasks(&project));
}

#[test]
fn csv_round_trip_preserves_tasks_and_metadata() {
    let project = build_sample_project();
    let file = NamedTempFile::new().unwrap();

    save_project_to_csv(&project, file.path()).unwrap();
    let loaded = load_project_from_csv(file.path()).unwrap();

    assert_eq!(loaded.metadata().project_name, "Export Project");
    assert_eq!(
        loaded.metadata().project_start_date,
        NaiveDate::from_ymd_opt(2026, 3, 2)
    );
    assert_eq!(collect_tasks(&loaded), collect_tasks(&project));
}

#[test]
fn round_trip_keeps_computed_dates() {
    let project = build_sample_project();
    let file = NamedTempFile::new().unwrap();

    save_project_to_json(&project, file.path()).unwrap();
    let loaded = load_project_from_json(file.path()).unwrap();

    let tasks = collect_tasks(&loaded);
    assert_eq!(tasks[0].earliest_date, Some(0));
    assert_eq!(tasks[0].latest_date, Some(0));
    assert_eq!(tasks[0].is_critical, Some(true));
    assert_eq!(tasks[1].earliest_date, Some(7));
    assert_eq!(tasks[1].latest_date, Some(9));
    assert_eq!(tasks[1].total_float, Some(2));
}

#[test]
fn json_load_rejects_duplicate_ids() {
    let snapshot = serde_json::json!({
        "metadata": ProjectMetadata::default(),
        "tasks": [
            Task::new(1, "A", 1),
            Task::new(1, "B", 2)
        ]
    });

    let file = NamedTempFile::new().unwrap();
    serde_json::to_writer_pretty(file.as_file(), &snapshot).unwrap();

    match load_project_from_json(file.path()) {
        Ok(_) => panic!("expected duplicate ids to be rejected"),
        Err(PersistenceError::InvalidData(msg)) => assert!(
            msg.contains("duplicate task id"),
            "unexpected message: {msg}"
        ),
        Err(other) => panic!("expected InvalidData error, got {other:?}"),
    }
}

#[test]
fn json_load_rejects_negative_duration() {
    let snapshot = serde_json::json!({
        "metadata": ProjectMetadata::default(),
        "tasks": [Task::new(1, "A", -5)]
    });

    let file = NamedTempFile::new().unwrap();
    serde_json::to_writer_pretty(file.as_file(), &snapshot).unwrap();

    match load_project_from_json(file.path()) {
        Ok(_) => panic!("expected negative duration to be rejected"),
        Err(PersistenceError::InvalidData(msg)) => assert!(
            msg.contains("negative duration"),
            "unexpected message: {msg}"
        ),
        Err(other) => panic!("expected InvalidData error, got {other:?}"),
    }
}

#[test]
fn json_load_rejects_unknown_predecessor() {
    let mut orphan = Task::new(2, "B", 4);
    orphan.predecessors = vec![99];
    let snapshot = serde_json::json!({
        "metadata": ProjectMetadata::default(),
        "tasks": [Task::new(1, "A", 7), orphan]
    });

    let file = NamedTempFile::new().unwrap();
    serde_json::to_writer_pretty(file.as_file(), &snapshot).unwrap();

    match load_project_from_json(file.path()) {
        Ok(_) => panic!("expected unknown predecessor to be rejected"),
        Err(PersistenceError::InvalidData(msg)) => assert!(
            msg.contains("unknown predecessor"),
            "unexpected message: {msg}"
        ),
        Err(other) => panic!("expected InvalidData error, got {other:?}"),
    }
}

#[test]
fn csv_load_rejects_empty_files() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "id,name,duration,predecessors,earliest_date,latest_date,total_float,is_critical,successors,metadata_json"
    )
    .unwrap();
    file.flush().unwrap();

    match load_project_from_csv(file.path()) {
        Ok(_) => panic!("expected empty CSV to be rejected"),
        Err(PersistenceError::InvalidData(msg)) => {
            assert!(msg.contains("no tasks"), "unexpected message: {msg}")
        }
        Err(other) => panic!("expected InvalidData error, got {other:?}"),
    }
}

#[test]
fn csv_load_rejects_malformed_integers() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "id,name,duration,predecessors,earliest_date,latest_date,total_float,is_critical,successors,metadata_json"
    )
    .unwrap();
    writeln!(file, "1,A,7,,zero,,,,,").unwrap();
    file.flush().unwrap();

    match load_project_from_csv(file.path()) {
        Ok(_) => panic!("expected malformed integer to be rejected"),
        Err(PersistenceError::InvalidData(msg)) => {
            assert!(msg.contains("invalid integer"), "unexpected message: {msg}")
        }
        Err(other) => panic!("expected InvalidData error, got {other:?}"),
    }
}
