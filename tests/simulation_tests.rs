use pert_tool::{Project, SimulationError, Task, WorkerSimulation};

fn build_sample_project() -> Project {
    let mut project = Project::new();
    project.upsert_task(1, "A", 7, None).unwrap();
    project.upsert_task(2, "B", 4, Some(vec![1])).unwrap();
    project.upsert_task(3, "C", 2, None).unwrap();
    project.upsert_task(4, "D", 6, Some(vec![1, 3])).unwrap();
    project
}

#[test]
fn serial_chain_with_one_worker_matches_total_duration() {
    let mut project = Project::new();
    project.upsert_task(1, "A", 3, None).unwrap();
    project.upsert_task(2, "B", 5, Some(vec![1])).unwrap();
    project.upsert_task(3, "C", 2, Some(vec![2])).unwrap();

    assert_eq!(project.simulate(1).unwrap(), 10);
    assert_eq!(project.total_duration().unwrap(), 10);
}

#[test]
fn enough_workers_short_circuits_to_total_duration() {
    let mut project = build_sample_project();
    assert_eq!(project.simulate(4).unwrap(), 13);
    assert_eq!(project.simulate(10).unwrap(), 13);
}

#[test]
fn constrained_workers_stretch_the_makespan() {
    let mut project = build_sample_project();
    assert_eq!(project.simulate(1).unwrap(), 19);
    assert_eq!(project.simulate(2).unwrap(), 13);
}

#[test]
fn simulated_duration_never_beats_the_critical_path() {
    let mut project = build_sample_project();
    let total = {
        project.compute().unwrap();
        project.total_duration().unwrap()
    };
    for workers in 1..4 {
        assert!(project.simulate(workers).unwrap() >= total);
    }
}

#[test]
fn more_workers_never_slow_the_project() {
    let mut project = build_sample_project();
    let mut previous = i64::MAX;
    for workers in 1..=5 {
        let duration = project.simulate(workers).unwrap();
        assert!(
            duration <= previous,
            "{workers} workers took {duration}, fewer took {previous}"
        );
        previous = duration;
    }
}

#[test]
fn zero_workers_is_invalid() {
    let mut project = build_sample_project();
    project.compute().unwrap();
    let tasks = project.tasks().unwrap();
    let err = WorkerSimulation::new(&tasks, 0).execute().unwrap_err();
    assert_eq!(err, SimulationError::InvalidWorkerCount(0));
}

#[test]
fn simulation_requires_computed_dates() {
    let tasks = vec![Task::new(1, "A", 7)];
    let err = WorkerSimulation::new(&tasks, 1).execute().unwrap_err();
    assert_eq!(err, SimulationError::MissingDates(1));
}

#[test]
fn empty_task_set_has_zero_duration() {
    let tasks: Vec<Task> = Vec::new();
    assert_eq!(WorkerSimulation::new(&tasks, 3).execute().unwrap(), 0);
}
