use crate::task::Task;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone)]
pub struct TaskValidationError {
    message: String,
}

impl TaskValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TaskValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TaskValidationError {}

pub fn validate_task(task: &Task) -> Result<(), TaskValidationError> {
    if task.duration < 0 {
        return Err(TaskValidationError::new(format!(
            "task {} has negative duration {}",
            task.id, task.duration
        )));
    }

    let mut seen = HashSet::with_capacity(task.predecessors.len());
    for &pred in &task.predecessors {
        if pred == task.id {
            return Err(TaskValidationError::new(format!(
                "task {} depends on itself",
                task.id
            )));
        }
        if !seen.insert(pred) {
            return Err(TaskValidationError::new(format!(
                "task {} lists predecessor {} more than once",
                task.id, pred
            )));
        }
    }

    Ok(())
}

pub fn validate_task_collection(tasks: &[Task]) -> Result<(), TaskValidationError> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_ids.insert(task.id) {
            return Err(TaskValidationError::new(format!(
                "duplicate task id {}",
                task.id
            )));
        }
        validate_task(task)?;
    }

    // A predecessor naming a task outside the set is a configuration error,
    // never silently skipped.
    for task in tasks {
        for &pred in &task.predecessors {
            if !seen_ids.contains(&pred) {
                return Err(TaskValidationError::new(format!(
                    "task {} references unknown predecessor {}",
                    task.id, pred
                )));
            }
        }
    }

    Ok(())
}
