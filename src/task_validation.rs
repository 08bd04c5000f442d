use crate::error::{NetworkError, NetworkResult};
use crate::task::Task;
use std::collections::HashSet;

fn check_estimate(task: &Task, field: &'static str, value: f64) -> NetworkResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(NetworkError::InvalidEstimate {
            task: task.name.clone(),
            field,
            value,
        });
    }
    Ok(())
}

pub fn validate_task(task: &Task) -> NetworkResult<()> {
    check_estimate(task, "optimistic_duration", task.optimistic_duration)?;
    check_estimate(task, "most_likely_duration", task.most_likely_duration)?;
    check_estimate(task, "pessimistic_duration", task.pessimistic_duration)?;

    // cost reduction may be negative, only NaN/inf are rejected
    if !task.cost_reduction.is_finite() {
        return Err(NetworkError::InvalidEstimate {
            task: task.name.clone(),
            field: "cost_reduction",
            value: task.cost_reduction,
        });
    }
    Ok(())
}

pub fn validate_task_collection(tasks: &[Task]) -> NetworkResult<()> {
    let mut seen_names = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_names.insert(task.name.as_str()) {
            return Err(NetworkError::DuplicateTask {
                name: task.name.clone(),
            });
        }
        validate_task(task)?;
    }
    Ok(())
}
