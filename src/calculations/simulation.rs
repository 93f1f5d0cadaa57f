use crate::task::Task;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    InvalidWorkerCount(usize),
    MissingDates(i32),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidWorkerCount(count) => {
                write!(f, "worker count must be at least 1 (got {count})")
            }
            SimulationError::MissingDates(id) => {
                write!(f, "task {id} has no computed dates; run compute first")
            }
        }
    }
}

impl std::error::Error for SimulationError {}

/// Per-task view the simulation works from, keyed by task id.
struct TaskRun {
    duration: i64,
    predecessors: Vec<i32>,
    latest_date: i64,
    is_critical: bool,
}

/// Worker-constrained project duration, as a discrete-event simulation.
///
/// Workers are assigned greedily: ready critical-path tasks first (ascending
/// id), then the ready task with the smallest latest date. This is a
/// heuristic; it does not guarantee the minimal makespan under a worker
/// limit.
pub struct WorkerSimulation<'a> {
    tasks: &'a [Task],
    worker_count: usize,
}

impl<'a> WorkerSimulation<'a> {
    pub fn new(tasks: &'a [Task], worker_count: usize) -> Self {
        Self { tasks, worker_count }
    }

    pub fn execute(&self) -> Result<i64, SimulationError> {
        if self.worker_count == 0 {
            return Err(SimulationError::InvalidWorkerCount(self.worker_count));
        }
        if self.tasks.is_empty() {
            return Ok(0);
        }

        let mut runs: BTreeMap<i32, TaskRun> = BTreeMap::new();
        let mut unconstrained = 0i64;
        for task in self.tasks {
            let (earliest, latest) = match (task.earliest_date, task.latest_date) {
                (Some(earliest), Some(latest)) => (earliest, latest),
                _ => return Err(SimulationError::MissingDates(task.id)),
            };
            unconstrained = unconstrained.max(earliest + task.duration);
            runs.insert(
                task.id,
                TaskRun {
                    duration: task.duration,
                    predecessors: task.predecessors.clone(),
                    latest_date: latest,
                    is_critical: earliest == latest,
                },
            );
        }

        // With a worker per task the dependency graph alone decides the
        // makespan.
        if self.worker_count >= self.tasks.len() {
            return Ok(unconstrained);
        }

        let mut state = ScheduleState::new(&runs);
        state.promote_ready();
        state.assign_workers(self.worker_count);

        let mut elapsed = 0i64;
        while !state.all_completed() {
            // Cannot stall: acyclic input guarantees some task is in
            // progress whenever any remains incomplete.
            let Some(step) = state.complete_next(elapsed) else {
                break;
            };
            elapsed += step;
            state.promote_ready();
            state.assign_workers(self.worker_count);
        }

        Ok(elapsed)
    }
}

/// The four disjoint partitions of the simulated task set. A task only moves
/// forward: not-ready, ready, in-progress, completed.
struct ScheduleState<'a> {
    runs: &'a BTreeMap<i32, TaskRun>,
    not_ready: BTreeSet<i32>,
    ready: BTreeSet<i32>,
    /// Remaining duration per assigned task.
    in_progress: BTreeMap<i32, i64>,
    /// Completion date per finished task.
    completed: BTreeMap<i32, i64>,
}

impl<'a> ScheduleState<'a> {
    fn new(runs: &'a BTreeMap<i32, TaskRun>) -> Self {
        Self {
            runs,
            not_ready: runs.keys().copied().collect(),
            ready: BTreeSet::new(),
            in_progress: BTreeMap::new(),
            completed: BTreeMap::new(),
        }
    }

    fn all_completed(&self) -> bool {
        self.completed.len() == self.runs.len()
    }

    /// Finish the in-progress task with the least remaining duration (ties
    /// resolved to the smallest id, one completion per call) and advance the
    /// other assigned tasks by the elapsed amount.
    fn complete_next(&mut self, elapsed: i64) -> Option<i64> {
        let (&id, &remaining) = self
            .in_progress
            .iter()
            .min_by(|a, b| (a.1, a.0).cmp(&(b.1, b.0)))?;
        self.in_progress.remove(&id);
        for other in self.in_progress.values_mut() {
            *other -= remaining;
        }
        self.completed.insert(id, elapsed + remaining);
        Some(remaining)
    }

    /// Move every task whose predecessors are all completed out of not-ready.
    fn promote_ready(&mut self) {
        let promoted: Vec<i32> = self
            .not_ready
            .iter()
            .copied()
            .filter(|id| {
                self.runs[id]
                    .predecessors
                    .iter()
                    .all(|pred| self.completed.contains_key(pred))
            })
            .collect();
        for id in promoted {
            self.not_ready.remove(&id);
            self.ready.insert(id);
        }
    }

    fn assign_workers(&mut self, worker_count: usize) {
        while self.in_progress.len() < worker_count {
            let Some(id) = self.next_assignment() else {
                break;
            };
            self.ready.remove(&id);
            self.in_progress.insert(id, self.runs[&id].duration);
        }
    }

    /// Critical-path members win; otherwise the smallest latest date. Both
    /// rules break ties by ascending task id.
    fn next_assignment(&self) -> Option<i32> {
        if let Some(&id) = self.ready.iter().find(|id| self.runs[id].is_critical) {
            return Some(id);
        }
        self.ready
            .iter()
            .copied()
            .min_by_key(|id| (self.runs[id].latest_date, *id))
    }
}
