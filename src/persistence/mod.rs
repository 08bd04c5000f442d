use crate::Task;
use crate::error::NetworkError;
use crate::task_validation;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Checks names and estimates. Unknown dependencies are left to the builder.
pub fn validate_tasks(tasks: &[Task]) -> LoadResult<()> {
    task_validation::validate_task_collection(tasks)?;
    Ok(())
}

pub mod file;

pub use file::{load_tasks_from_csv, load_tasks_from_json, read_tasks_csv, read_tasks_json};
