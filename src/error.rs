use std::fmt;
use thiserror::Error;

use crate::graph::Event;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    #[error("task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },
    #[error("duplicate task name '{name}'")]
    DuplicateTask { name: String },
    #[error("task '{task}' has invalid {field} {value}")]
    InvalidEstimate {
        task: String,
        field: &'static str,
        value: f64,
    },
}

pub type NetworkResult<T> = Result<T, NetworkError>;

/// Non-fatal conditions recovered locally. Returned next to the result they
/// affected and logged at `warn` level when raised.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Dummy-arc insertion closed a cycle; the network was rebuilt without
    /// precedence dummies.
    CycleDetected { dropped_arcs: usize, at: Event },
    /// The task dependencies themselves are cyclic; the rebuilt network is
    /// still cyclic.
    DependencyCycle { at: Event },
    /// Layered placement was impossible; positions come from the spring embedder.
    LayoutDegenerate { at: Event },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::CycleDetected { dropped_arcs, at } => write!(
                f,
                "dummy arcs created a cycle through {at}; rebuilt without them ({dropped_arcs} arcs dropped)"
            ),
            Diagnostic::DependencyCycle { at } => {
                write!(f, "task dependencies form a cycle through {at}")
            }
            Diagnostic::LayoutDegenerate { at } => write!(
                f,
                "network is cyclic through {at}; using force-directed placement"
            ),
        }
    }
}
