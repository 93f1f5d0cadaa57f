use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// A single project task. Durations are abstract integer time units counted
/// from project start; the four computed fields stay `None` until
/// `Project::compute` fills them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i32,
    pub name: String,
    pub duration: i64,
    #[serde(default)]
    pub predecessors: Vec<i32>,
    pub earliest_date: Option<i64>,
    pub latest_date: Option<i64>,
    pub total_float: Option<i64>,
    pub is_critical: Option<bool>,
    #[serde(default)]
    pub successors: Vec<i32>,
}

impl Task {
    pub fn new(id: i32, name: impl Into<String>, duration: i64) -> Self {
        Self {
            id,
            name: name.into(),
            duration,
            predecessors: Vec::new(),
            earliest_date: None,
            latest_date: None,
            total_float: None,
            is_critical: None,
            successors: Vec::new(),
        }
    }

    pub fn to_dataframe_row(&self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(9);

        let id_data: [i32; 1] = [self.id];
        columns.push(Series::new(PlSmallStr::from_static("id"), id_data).into_column());

        let name_data: [&str; 1] = [self.name.as_str()];
        columns.push(Series::new(PlSmallStr::from_static("name"), name_data).into_column());

        let duration_data: [i64; 1] = [self.duration];
        columns.push(Series::new(PlSmallStr::from_static("duration"), duration_data).into_column());

        columns.push(Self::series_from_i32_list("predecessors", &self.predecessors).into_column());

        let earliest: [Option<i64>; 1] = [self.earliest_date];
        columns.push(Series::new(PlSmallStr::from_static("earliest_date"), earliest).into_column());

        let latest: [Option<i64>; 1] = [self.latest_date];
        columns.push(Series::new(PlSmallStr::from_static("latest_date"), latest).into_column());

        let total_float: [Option<i64>; 1] = [self.total_float];
        columns
            .push(Series::new(PlSmallStr::from_static("total_float"), total_float).into_column());

        let is_critical: [Option<bool>; 1] = [self.is_critical];
        columns
            .push(Series::new(PlSmallStr::from_static("is_critical"), is_critical).into_column());

        columns.push(Self::series_from_i32_list("successors", &self.successors).into_column());

        DataFrame::new(columns)
    }

    pub fn from_dataframe_row(df: &DataFrame, row_idx: usize) -> PolarsResult<Self> {
        let id = df
            .column("id")?
            .i32()?
            .get(row_idx)
            .ok_or_else(|| PolarsError::ComputeError("task row missing id".into()))?;

        let name = df
            .column("name")?
            .str()?
            .get(row_idx)
            .unwrap_or("")
            .to_string();

        let duration = df.column("duration")?.i64()?.get(row_idx).unwrap_or(0);

        let predecessors = Self::vec_from_i32_list(df.column("predecessors")?.list()?, row_idx)?;
        let successors = Self::vec_from_i32_list(df.column("successors")?.list()?, row_idx)?;

        Ok(Self {
            id,
            name,
            duration,
            predecessors,
            earliest_date: df.column("earliest_date")?.i64()?.get(row_idx),
            latest_date: df.column("latest_date")?.i64()?.get(row_idx),
            total_float: df.column("total_float")?.i64()?.get(row_idx),
            is_critical: df.column("is_critical")?.bool()?.get(row_idx),
            successors,
        })
    }

    fn series_from_i32_list(name: &str, values: &[i32]) -> Series {
        let inner = Series::new(PlSmallStr::from_static(""), values.to_vec());
        Series::new(name.into(), &[inner])
    }

    fn vec_from_i32_list(list: &ListChunked, row_idx: usize) -> PolarsResult<Vec<i32>> {
        if let Some(series) = list.get_as_series(row_idx) {
            Ok(series.i32()?.into_iter().flatten().collect::<Vec<_>>())
        } else {
            Ok(Vec::new())
        }
    }
}
