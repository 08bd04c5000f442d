use super::{LoadError, LoadResult};
use crate::Task;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub fn load_tasks_from_json<P: AsRef<Path>>(path: P) -> LoadResult<Vec<Task>> {
    read_tasks_json(File::open(path)?)
}

pub fn read_tasks_json<R: Read>(reader: R) -> LoadResult<Vec<Task>> {
    let tasks: Vec<Task> = serde_json::from_reader(reader)?;
    super::validate_tasks(&tasks)?;
    Ok(tasks)
}

pub fn load_tasks_from_csv<P: AsRef<Path>>(path: P) -> LoadResult<Vec<Task>> {
    read_tasks_csv(File::open(path)?)
}

pub fn read_tasks_csv<R: Read>(reader: R) -> LoadResult<Vec<Task>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut tasks = Vec::new();
    for record in csv_reader.deserialize::<TaskCsvRecord>() {
        tasks.push(record?.into_task()?);
    }
    super::validate_tasks(&tasks)?;
    Ok(tasks)
}

/// One row of the tabular task list. Estimate columns run pessimistic,
/// most likely, optimistic.
#[derive(Deserialize)]
struct TaskCsvRecord {
    name: String,
    #[serde(default)]
    dependencies: String,
    #[serde(alias = "pessimistic_duration")]
    t_pes: String,
    #[serde(alias = "most_likely_duration")]
    t_ver: String,
    #[serde(alias = "optimistic_duration")]
    t_opt: String,
    #[serde(default)]
    cost_reduction: String,
}

impl TaskCsvRecord {
    fn into_task(self) -> LoadResult<Task> {
        if self.name.trim().is_empty() {
            return Err(LoadError::InvalidData("task row without a name".into()));
        }
        let task = Task::new(
            self.name.trim(),
            parse_f64(&self.t_opt)?,
            parse_f64(&self.t_ver)?,
            parse_f64(&self.t_pes)?,
        )
        .with_dependencies(split_dependencies(&self.dependencies))
        .with_cost_reduction(if self.cost_reduction.trim().is_empty() {
            0.0
        } else {
            parse_f64(&self.cost_reduction)?
        });
        Ok(task)
    }
}

fn parse_f64(input: &str) -> LoadResult<f64> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|e| LoadError::InvalidData(format!("invalid number '{input}': {e}")))
}

fn split_dependencies(input: &str) -> Vec<String> {
    input
        .split(&[';', ','][..])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
