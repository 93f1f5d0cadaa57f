use crate::calculations::backward_pass::BackwardPass;
use crate::calculations::forward_pass::ForwardPass;
use crate::calculations::simulation::{SimulationError, WorkerSimulation};
use crate::graph::{GraphError, PertGraph, Vertex};
use crate::metadata::ProjectMetadata;
use crate::task::Task;
use crate::task_validation::{self, TaskValidationError};
use chrono::{Duration, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeSummary {
    pub task_count: usize,
    pub critical_count: usize,
    pub critical_path: Vec<i32>,
    pub total_duration: i64,
}

impl ComputeSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        parts.push(format!("critical={}", self.critical_count));
        parts.push(format!("duration={}", self.total_duration));
        if !self.critical_path.is_empty() {
            let chain = self
                .critical_path
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("->");
            parts.push(format!("crit_path={}", chain));
        }
        parts.join(", ")
    }
}

/// DataFrame-backed project table plus metadata. One row per task; the
/// computed columns are rewritten whole on every `compute`.
pub struct Project {
    df: DataFrame,
    metadata: ProjectMetadata,
}

impl Project {
    pub(crate) fn from_parts(metadata: ProjectMetadata) -> Self {
        let schema = Self::default_schema();
        let df = DataFrame::empty_with_schema(&schema);
        Self { df, metadata }
    }

    pub fn new() -> Self {
        Self::from_parts(ProjectMetadata::default())
    }

    pub fn new_with_metadata(metadata: ProjectMetadata) -> Self {
        Self::from_parts(metadata)
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn metadata(&self) -> &ProjectMetadata {
        &self.metadata
    }

    pub fn project_name(&self) -> &str {
        &self.metadata.project_name
    }

    pub fn project_description(&self) -> &str {
        &self.metadata.project_description
    }

    pub fn project_start_date(&self) -> Option<NaiveDate> {
        self.metadata.project_start_date
    }

    pub fn set_project_name(&mut self, name: impl Into<String>) {
        self.metadata.project_name = name.into();
    }

    pub fn set_project_description(&mut self, description: impl Into<String>) {
        self.metadata.project_description = description.into();
    }

    pub fn set_project_start_date(&mut self, date: Option<NaiveDate>) {
        self.metadata.project_start_date = date;
    }

    /// Render a day offset as a calendar date when a start date is set.
    pub fn date_for_offset(&self, offset: i64) -> Option<NaiveDate> {
        self.metadata
            .project_start_date
            .map(|start| start + Duration::days(offset))
    }

    fn default_schema() -> Schema {
        Schema::from_iter(vec![
            Field::new("id".into(), DataType::Int32),
            Field::new("name".into(), DataType::String),
            Field::new("duration".into(), DataType::Int64),
            Field::new(
                "predecessors".into(),
                DataType::List(Box::new(DataType::Int32)),
            ),
            Field::new("earliest_date".into(), DataType::Int64),
            Field::new("latest_date".into(), DataType::Int64),
            Field::new("total_float".into(), DataType::Int64),
            Field::new("is_critical".into(), DataType::Boolean),
            Field::new(
                "successors".into(),
                DataType::List(Box::new(DataType::Int32)),
            ),
        ])
    }

    pub fn tasks(&self) -> Result<Vec<Task>, PolarsError> {
        let df = self.dataframe();
        let mut tasks = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            tasks.push(Task::from_dataframe_row(df, idx)?);
        }
        Ok(tasks)
    }

    pub fn find_task(&self, task_id: i32) -> Result<Option<Task>, PolarsError> {
        if self.df.height() == 0 {
            return Ok(None);
        }
        let ids = self.df.column("id")?.i32()?;
        for (idx, id_opt) in ids.into_iter().enumerate() {
            if id_opt == Some(task_id) {
                let task = Task::from_dataframe_row(self.dataframe(), idx)?;
                return Ok(Some(task));
            }
        }
        Ok(None)
    }

    pub fn delete_task(&mut self, task_id: i32) -> Result<bool, PolarsError> {
        if self.df.height() == 0 {
            return Ok(false);
        }
        let snapshot = self.df.clone();
        let mut tasks: Vec<Task> = Vec::with_capacity(snapshot.height());
        let mut found = false;
        for idx in 0..snapshot.height() {
            let mut task = Task::from_dataframe_row(&snapshot, idx)?;
            if task.id == task_id {
                found = true;
                continue;
            }
            task.predecessors.retain(|&pred| pred != task_id);
            task.successors.retain(|&succ| succ != task_id);
            tasks.push(task);
        }
        if !found {
            return Ok(false);
        }

        self.df = DataFrame::empty_with_schema(&Self::default_schema());
        for task in tasks {
            self.upsert_task_record(task)?;
        }
        self.compute()?; // Dates are stale after a structural change
        Ok(true)
    }

    fn update_string_column(
        &mut self,
        column_name: &str,
        task_id: i32,
        new_value: &str,
    ) -> Result<(), PolarsError> {
        let id_col = self.df.column("id")?;
        let target_col = self.df.column(column_name)?;

        let new_series = target_col
            .str()?
            .into_iter()
            .zip(id_col.i32()?.into_iter())
            .map(|(val, id)| if id == Some(task_id) { Some(new_value) } else { val })
            .collect::<StringChunked>()
            .into_series()
            .with_name(column_name.into());

        self.df.replace(column_name, new_series)?;
        Ok(())
    }

    fn update_i64_column(
        &mut self,
        column_name: &str,
        task_id: i32,
        new_value: i64,
    ) -> Result<(), PolarsError> {
        let id_col = self.df.column("id")?;
        let target_col = self.df.column(column_name)?;

        let new_series = target_col
            .i64()?
            .into_iter()
            .zip(id_col.i32()?.into_iter())
            .map(|(val, id)| if id == Some(task_id) { Some(new_value) } else { val })
            .collect::<Int64Chunked>()
            .into_series()
            .with_name(column_name.into());

        self.df.replace(column_name, new_series)?;
        Ok(())
    }

    fn update_bool_column(
        &mut self,
        column_name: &str,
        task_id: i32,
        new_value: bool,
    ) -> Result<(), PolarsError> {
        let id_col = self.df.column("id")?;
        let target_col = self.df.column(column_name)?;

        let new_series = target_col
            .bool()?
            .into_iter()
            .zip(id_col.i32()?.into_iter())
            .map(|(val, id)| if id == Some(task_id) { Some(new_value) } else { val })
            .collect::<BooleanChunked>()
            .into_series()
            .with_name(column_name.into());

        self.df.replace(column_name, new_series)?;
        Ok(())
    }

    fn update_list_i32_column(
        &mut self,
        column_name: &str,
        task_id: i32,
        new_values: Vec<i32>,
    ) -> Result<(), PolarsError> {
        let id_col = self.df.column("id")?;
        let target_col = self.df.column(column_name)?;

        let new_series = target_col
            .list()?
            .into_iter()
            .zip(id_col.i32()?.into_iter())
            .map(|(val, id)| {
                if id == Some(task_id) {
                    Some(Series::new(PlSmallStr::from_static(""), new_values.clone()))
                } else {
                    val
                }
            })
            .collect::<ListChunked>()
            .into_series()
            .with_name(column_name.into());

        self.df.replace(column_name, new_series)?;
        Ok(())
    }

    fn update_computed_i64_column(
        &mut self,
        column_name: &str,
        task_id: i32,
        new_value: i64,
    ) -> Result<(), PolarsError> {
        self.df = self
            .df
            .clone()
            .lazy()
            .with_column(
                when(col("id").eq(lit(task_id)))
                    .then(lit(new_value))
                    .otherwise(col(column_name))
                    .alias(column_name),
            )
            .collect()?;
        Ok(())
    }

    fn set_successors_column(&mut self) -> Result<(), PolarsError> {
        let id_col = self.df.column("id")?.i32()?;
        let predecessors = self.df.column("predecessors")?.list()?;

        let ids: Vec<Option<i32>> = id_col.into_iter().collect();
        let mut successors_map: HashMap<i32, Vec<i32>> = HashMap::new();
        for opt_id in ids.iter().flatten() {
            successors_map.entry(*opt_id).or_default();
        }

        for (idx, maybe_id) in ids.iter().enumerate() {
            if let Some(task_id) = maybe_id {
                if let Some(series) = predecessors.get_as_series(idx) {
                    let pred_col = series.i32()?;
                    for pred in pred_col.into_iter().flatten() {
                        successors_map.entry(pred).or_default().push(*task_id);
                    }
                }
            }
        }

        let successor_rows: Vec<Series> = ids
            .into_iter()
            .map(|maybe_id| {
                let list = if let Some(id) = maybe_id {
                    let mut list = successors_map.get(&id).cloned().unwrap_or_default();
                    list.sort_unstable();
                    list.dedup();
                    list
                } else {
                    Vec::new()
                };
                Series::new(PlSmallStr::from_static(""), list)
            })
            .collect();

        let list_chunked: ListChunked = successor_rows.into_iter().collect();
        self.df.replace("successors", list_chunked.into_series())?;
        Ok(())
    }

    fn validation_error(err: TaskValidationError) -> PolarsError {
        PolarsError::ComputeError(err.to_string().into())
    }

    fn graph_error(err: GraphError) -> PolarsError {
        PolarsError::ComputeError(err.to_string().into())
    }

    fn simulation_error(err: SimulationError) -> PolarsError {
        PolarsError::ComputeError(err.to_string().into())
    }

    pub fn upsert_task(
        &mut self,
        id: i32,
        name: &str,
        duration: i64,
        predecessors: Option<Vec<i32>>,
    ) -> Result<(), PolarsError> {
        if duration < 0 {
            return Err(PolarsError::ComputeError(
                format!("task {} has negative duration {}", id, duration).into(),
            ));
        }
        let id_exists = if self.df.height() == 0 {
            false
        } else {
            self.df
                .column("id")?
                .i32()?
                .into_iter()
                .any(|v| v == Some(id))
        };

        if id_exists {
            self.update_string_column("name", id, name)?;
            if let Some(preds) = predecessors {
                self.update_list_i32_column("predecessors", id, preds)?;
            }
            self.update_i64_column("duration", id, duration)?;
            return Ok(());
        }

        let mut task = Task::new(id, name, duration);
        if let Some(preds) = predecessors {
            task.predecessors = preds;
        }
        task_validation::validate_task(&task).map_err(Self::validation_error)?;
        let new_row = task.to_dataframe_row()?;
        self.df = self.df.vstack(&new_row)?;
        Ok(())
    }

    pub fn upsert_task_record(&mut self, task: Task) -> Result<(), PolarsError> {
        task_validation::validate_task(&task).map_err(Self::validation_error)?;
        let id_exists = if self.df.height() == 0 {
            false
        } else {
            self.df
                .column("id")?
                .i32()?
                .into_iter()
                .any(|v| v == Some(task.id))
        };

        if id_exists {
            self.update_string_column("name", task.id, &task.name)?;
            self.update_list_i32_column("predecessors", task.id, task.predecessors.clone())?;
            self.update_i64_column("duration", task.id, task.duration)?;

            if let Some(earliest) = task.earliest_date {
                self.update_computed_i64_column("earliest_date", task.id, earliest)?;
            }

            if let Some(latest) = task.latest_date {
                self.update_computed_i64_column("latest_date", task.id, latest)?;
            }

            if let Some(total_float) = task.total_float {
                self.update_computed_i64_column("total_float", task.id, total_float)?;
            }

            if let Some(is_critical) = task.is_critical {
                self.update_bool_column("is_critical", task.id, is_critical)?;
            }

            if !task.successors.is_empty() {
                self.update_list_i32_column("successors", task.id, task.successors.clone())?;
            }

            return Ok(());
        }

        let new_row = task.to_dataframe_row()?;
        self.df = self.df.vstack(&new_row)?;
        Ok(())
    }

    /// Run both CPM passes and rewrite the computed columns.
    ///
    /// Validates the task collection, builds the activity graph, derives
    /// earliest dates (forward pass) and latest dates (backward pass over the
    /// reversed graph), then writes earliest/latest/float/critical and the
    /// derived successors column. Running it twice on an unchanged table
    /// yields identical columns.
    pub fn compute(&mut self) -> Result<ComputeSummary, PolarsError> {
        let tasks = self.tasks()?;
        task_validation::validate_task_collection(&tasks).map_err(Self::validation_error)?;

        if tasks.is_empty() {
            return Ok(ComputeSummary {
                task_count: 0,
                critical_count: 0,
                critical_path: Vec::new(),
                total_duration: 0,
            });
        }

        let graph = PertGraph::from_tasks(&tasks).map_err(Self::graph_error)?;
        let earliest_dates = ForwardPass::new(&graph).execute();
        let latest_dates = BackwardPass::new(&graph).execute();

        let height = self.df.height();
        let mut earliest_vals: Vec<i64> = Vec::with_capacity(height);
        let mut latest_vals: Vec<i64> = Vec::with_capacity(height);
        let mut float_vals: Vec<i64> = Vec::with_capacity(height);
        let mut crit_vals: Vec<bool> = Vec::with_capacity(height);

        let mut critical_count = 0usize;
        let mut critical_path: Vec<i32> = Vec::new();

        for task in &tasks {
            let vertex = Vertex::Task(task.id);
            let earliest = earliest_dates.get(&vertex).copied().ok_or_else(|| {
                PolarsError::ComputeError(
                    format!("task {} is unreachable from project start", task.id).into(),
                )
            })?;
            let latest = latest_dates.get(&vertex).copied().ok_or_else(|| {
                PolarsError::ComputeError(
                    format!("task {} cannot reach project end", task.id).into(),
                )
            })?;
            let total_float = latest - earliest;
            let is_critical = total_float == 0;
            if is_critical {
                critical_count += 1;
                critical_path.push(task.id);
            }
            earliest_vals.push(earliest);
            latest_vals.push(latest);
            float_vals.push(total_float);
            crit_vals.push(is_critical);
        }

        self.df.replace(
            "earliest_date",
            Series::new(PlSmallStr::from_static("earliest_date"), earliest_vals),
        )?;
        self.df.replace(
            "latest_date",
            Series::new(PlSmallStr::from_static("latest_date"), latest_vals),
        )?;
        self.df.replace(
            "total_float",
            Series::new(PlSmallStr::from_static("total_float"), float_vals),
        )?;
        self.df.replace(
            "is_critical",
            Series::new(PlSmallStr::from_static("is_critical"), crit_vals),
        )?;
        self.set_successors_column()?;

        let total_duration = earliest_dates.get(&Vertex::End).copied().unwrap_or(0);

        Ok(ComputeSummary {
            task_count: tasks.len(),
            critical_count,
            critical_path,
            total_duration,
        })
    }

    /// Unconstrained project duration, from the computed columns.
    pub fn total_duration(&self) -> Result<i64, PolarsError> {
        if self.df.height() == 0 {
            return Ok(0);
        }
        let durations = self.df.column("duration")?.i64()?;
        let earliest = self.df.column("earliest_date")?.i64()?;
        let mut total = 0i64;
        for idx in 0..self.df.height() {
            let earliest_date = earliest.get(idx).ok_or_else(|| {
                PolarsError::ComputeError("dates not computed; run compute first".into())
            })?;
            total = total.max(earliest_date + durations.get(idx).unwrap_or(0));
        }
        Ok(total)
    }

    /// Ids of zero-slack tasks, in task insertion order.
    pub fn critical_path(&self) -> Result<Vec<i32>, PolarsError> {
        let ids = self.df.column("id")?.i32()?;
        let crit = self.df.column("is_critical")?.bool()?;
        let mut path = Vec::new();
        for (idx, id_opt) in ids.into_iter().enumerate() {
            let Some(id) = id_opt else { continue };
            let is_critical = crit.get(idx).ok_or_else(|| {
                PolarsError::ComputeError("dates not computed; run compute first".into())
            })?;
            if is_critical {
                path.push(id);
            }
        }
        Ok(path)
    }

    /// Worker-constrained duration. Recomputes dates first so the simulation
    /// never reads a stale table.
    pub fn simulate(&mut self, worker_count: usize) -> Result<i64, PolarsError> {
        self.compute()?;
        let tasks = self.tasks()?;
        WorkerSimulation::new(&tasks, worker_count)
            .execute()
            .map_err(Self::simulation_error)
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}
