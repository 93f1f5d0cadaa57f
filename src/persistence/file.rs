use super::{PersistenceError, PersistenceResult};
use crate::{Project, ProjectMetadata, Task};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct ProjectSnapshot {
    metadata: ProjectMetadata,
    tasks: Vec<Task>,
}

impl ProjectSnapshot {
    fn from_project(project: &Project) -> PersistenceResult<Self> {
        let df = project.dataframe();
        let mut tasks = Vec::with_capacity(df.height());
        for row_idx in 0..df.height() {
            tasks.push(Task::from_dataframe_row(df, row_idx)?);
        }
        super::validate_tasks(&tasks)?;
        Ok(Self {
            metadata: project.metadata().clone(),
            tasks,
        })
    }

    fn into_project(self) -> PersistenceResult<Project> {
        super::validate_tasks(&self.tasks)?;
        let mut project = Project::new_with_metadata(self.metadata);
        for task in self.tasks {
            project.upsert_task_record(task)?;
        }
        Ok(project)
    }
}

pub fn save_project_to_json<P: AsRef<Path>>(project: &Project, path: P) -> PersistenceResult<()> {
    let snapshot = ProjectSnapshot::from_project(project)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_project_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Project> {
    let file = File::open(path)?;
    let snapshot: ProjectSnapshot = serde_json::from_reader(file)?;
    snapshot.into_project()
}

#[derive(Default, Serialize, Deserialize)]
struct TaskCsvRecord {
    id: i32,
    name: String,
    duration: i64,
    predecessors: String,
    earliest_date: String,
    latest_date: String,
    total_float: String,
    is_critical: String,
    successors: String,
    #[serde(default)]
    metadata_json: String,
}

impl From<&Task> for TaskCsvRecord {
    fn from(task: &Task) -> Self {
        let mut record = TaskCsvRecord::default();
        record.id = task.id;
        record.name = task.name.clone();
        record.duration = task.duration;
        record.predecessors = join_i32(&task.predecessors);
        record.earliest_date = format_option_i64(task.earliest_date);
        record.latest_date = format_option_i64(task.latest_date);
        record.total_float = format_option_i64(task.total_float);
        record.is_critical = format_option_bool(task.is_critical);
        record.successors = join_i32(&task.successors);
        record
    }
}

impl TaskCsvRecord {
    fn metadata_row(project: &Project) -> PersistenceResult<Self> {
        let metadata_json = serde_json::to_string(project.metadata())?;
        let mut record = TaskCsvRecord::default();
        record.name = "__metadata__".to_string();
        record.metadata_json = metadata_json;
        Ok(record)
    }

    fn is_metadata_row(&self) -> bool {
        !self.metadata_json.trim().is_empty()
    }

    fn into_task(self) -> PersistenceResult<Task> {
        if self.is_metadata_row() {
            return Err(PersistenceError::InvalidData(
                "metadata row cannot be converted to task".into(),
            ));
        }
        let mut task = Task::new(self.id, self.name, self.duration);
        task.predecessors = split_i32(&self.predecessors)?;
        task.successors = split_i32(&self.successors)?;
        task.earliest_date = parse_i64(&self.earliest_date)?;
        task.latest_date = parse_i64(&self.latest_date)?;
        task.total_float = parse_i64(&self.total_float)?;
        task.is_critical = parse_bool(&self.is_critical)?;
        Ok(task)
    }
}

pub fn save_project_to_csv<P: AsRef<Path>>(project: &Project, path: P) -> PersistenceResult<()> {
    super::validate_project(project)?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.serialize(TaskCsvRecord::metadata_row(project)?)?;
    let df = project.dataframe();
    for row_idx in 0..df.height() {
        let task = Task::from_dataframe_row(df, row_idx)?;
        writer.serialize(TaskCsvRecord::from(&task))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_project_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Project> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut tasks = Vec::new();
    let mut metadata: Option<ProjectMetadata> = None;
    for record in reader.deserialize::<TaskCsvRecord>() {
        let record = record?;
        if record.is_metadata_row() {
            if metadata.is_some() {
                return Err(PersistenceError::InvalidData(
                    "CSV file contained multiple metadata rows".into(),
                ));
            }
            metadata = Some(serde_json::from_str(&record.metadata_json).map_err(|err| {
                PersistenceError::InvalidData(format!("invalid metadata json: {err}"))
            })?);
            continue;
        }
        tasks.push(record.into_task()?);
    }

    if tasks.is_empty() {
        return Err(PersistenceError::InvalidData(
            "CSV file contained no tasks".into(),
        ));
    }

    super::validate_tasks(&tasks)?;

    let mut project = match metadata {
        Some(metadata) => Project::new_with_metadata(metadata),
        None => Project::new(),
    };
    for task in tasks {
        project.upsert_task_record(task)?;
    }
    Ok(project)
}

fn format_option_i64(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_i64(input: &str) -> PersistenceResult<Option<i64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<i64>()
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid integer '{input}': {e}")))
}

fn format_option_bool(value: Option<bool>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_bool(input: &str) -> PersistenceResult<Option<bool>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    match input.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        other => Err(PersistenceError::InvalidData(format!(
            "invalid boolean '{other}'"
        ))),
    }
}

fn join_i32(values: &[i32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn split_i32(input: &str) -> PersistenceResult<Vec<i32>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    input
        .split(',')
        .map(|part| {
            part.trim().parse::<i32>().map_err(|e| {
                PersistenceError::InvalidData(format!("invalid integer '{part}': {e}"))
            })
        })
        .collect()
}
