use pert_tool::{Project, ProjectMetadata, Task};

fn build_sample_project() -> Project {
    let mut project = Project::new();
    project.upsert_task(1, "A", 7, None).unwrap();
    project.upsert_task(2, "B", 4, Some(vec![1])).unwrap();
    project.upsert_task(3, "C", 2, None).unwrap();
    project.upsert_task(4, "D", 6, Some(vec![1, 3])).unwrap();
    project
}

fn task_by_id(project: &Project, id: i32) -> Task {
    project.find_task(id).unwrap().expect("task should exist")
}

#[test]
fn compute_fills_dates_and_summary() {
    let mut project = build_sample_project();
    let summary = project.compute().unwrap();

    assert_eq!(summary.task_count, 4);
    assert_eq!(summary.critical_count, 2);
    assert_eq!(summary.critical_path, vec![1, 4]);
    assert_eq!(summary.total_duration, 13);

    let a = task_by_id(&project, 1);
    assert_eq!(a.earliest_date, Some(0));
    assert_eq!(a.latest_date, Some(0));
    assert_eq!(a.total_float, Some(0));
    assert_eq!(a.is_critical, Some(true));
    assert_eq!(a.successors, vec![2, 4]);

    let b = task_by_id(&project, 2);
    assert_eq!(b.earliest_date, Some(7));
    assert_eq!(b.latest_date, Some(9));
    assert_eq!(b.total_float, Some(2));
    assert_eq!(b.is_critical, Some(false));

    let c = task_by_id(&project, 3);
    assert_eq!(c.earliest_date, Some(0));
    assert_eq!(c.latest_date, Some(5));

    let d = task_by_id(&project, 4);
    assert_eq!(d.earliest_date, Some(7));
    assert_eq!(d.latest_date, Some(7));
    assert_eq!(d.is_critical, Some(true));
}

#[test]
fn compute_is_idempotent() {
    let mut project = build_sample_project();
    project.compute().unwrap();
    let first = project.tasks().unwrap();
    project.compute().unwrap();
    let second = project.tasks().unwrap();
    assert_eq!(first, second);
}

#[test]
fn total_duration_requires_computed_dates() {
    let project = build_sample_project();
    assert!(project.total_duration().is_err());
}

#[test]
fn total_duration_after_compute() {
    let mut project = build_sample_project();
    project.compute().unwrap();
    assert_eq!(project.total_duration().unwrap(), 13);
}

#[test]
fn critical_path_follows_insertion_order() {
    let mut project = Project::new();
    // Same graph, rows inserted out of id order.
    project.upsert_task(4, "D", 6, Some(vec![1, 3])).unwrap();
    project.upsert_task(1, "A", 7, None).unwrap();
    project.upsert_task(3, "C", 2, None).unwrap();
    project.upsert_task(2, "B", 4, Some(vec![1])).unwrap();

    let summary = project.compute().unwrap();
    assert_eq!(summary.critical_path, vec![4, 1]);
    assert_eq!(project.critical_path().unwrap(), vec![4, 1]);
}

#[test]
fn critical_path_is_non_empty_for_non_empty_projects() {
    let mut project = build_sample_project();
    project.compute().unwrap();
    assert!(!project.critical_path().unwrap().is_empty());
}

#[test]
fn delete_task_scrubs_dependents_and_recomputes() {
    let mut project = build_sample_project();
    project.compute().unwrap();

    assert!(project.delete_task(1).unwrap());
    assert_eq!(project.dataframe().height(), 3);

    let b = task_by_id(&project, 2);
    assert!(b.predecessors.is_empty());
    let d = task_by_id(&project, 4);
    assert_eq!(d.predecessors, vec![3]);

    // Dates were recomputed for the reduced graph: C(2) -> D(6), B(4).
    assert_eq!(project.total_duration().unwrap(), 8);
}

#[test]
fn delete_task_reports_missing_ids() {
    let mut project = build_sample_project();
    assert!(!project.delete_task(42).unwrap());
}

#[test]
fn compute_surfaces_unknown_predecessors() {
    let mut project = Project::new();
    project.upsert_task(1, "A", 7, Some(vec![9])).unwrap();
    let err = project.compute().unwrap_err();
    assert!(err.to_string().contains("unknown predecessor"));
}

#[test]
fn compute_surfaces_cycles() {
    let mut project = Project::new();
    project.upsert_task(1, "A", 7, Some(vec![2])).unwrap();
    project.upsert_task(2, "B", 4, Some(vec![1])).unwrap();
    let err = project.compute().unwrap_err();
    assert!(err.to_string().contains("cycle"));
}

#[test]
fn empty_project_computes_to_zero() {
    let mut project = Project::new();
    let summary = project.compute().unwrap();
    assert_eq!(summary.task_count, 0);
    assert_eq!(summary.total_duration, 0);
    assert!(summary.critical_path.is_empty());
    assert_eq!(project.total_duration().unwrap(), 0);
}

#[test]
fn metadata_setters_update_in_place() {
    let mut metadata = ProjectMetadata::default();
    metadata.project_name = "Bridge".into();
    let mut project = Project::new_with_metadata(metadata);
    assert_eq!(project.project_name(), "Bridge");

    project.set_project_description("Span assembly");
    assert_eq!(project.project_description(), "Span assembly");

    let start = chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    project.set_project_start_date(Some(start));
    assert_eq!(
        project.date_for_offset(13),
        chrono::NaiveDate::from_ymd_opt(2026, 3, 15)
    );
}
