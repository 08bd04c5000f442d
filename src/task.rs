use serde::{Deserialize, Serialize};

/// A unit of work as supplied by the task-list loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    /// Names of prerequisite tasks. A lone `"none"` (or `"-"`) marks a task
    /// that can start at project begin.
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(alias = "t_opt")]
    pub optimistic_duration: f64,
    #[serde(alias = "t_ver")]
    pub most_likely_duration: f64,
    #[serde(alias = "t_pes")]
    pub pessimistic_duration: f64,
    #[serde(default)]
    pub cost_reduction: f64,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        optimistic_duration: f64,
        most_likely_duration: f64,
        pessimistic_duration: f64,
    ) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            optimistic_duration,
            most_likely_duration,
            pessimistic_duration,
            cost_reduction: 0.0,
        }
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cost_reduction(mut self, cost_reduction: f64) -> Self {
        self.cost_reduction = cost_reduction;
        self
    }

    /// PERT three-point estimate: `(optimistic + 4 * most_likely + pessimistic) / 6`.
    pub fn expected_duration(&self) -> f64 {
        pert_duration(
            self.optimistic_duration,
            self.most_likely_duration,
            self.pessimistic_duration,
        )
    }

    /// Dependencies that name another task, with the no-dependency markers removed.
    pub fn named_dependencies<'a>(
        &'a self,
        markers: &'a [String],
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.dependencies
            .iter()
            .map(|dep| dep.trim())
            .filter(move |dep| !dep.is_empty() && !markers.iter().any(|m| m == dep))
    }
}

pub fn pert_duration(optimistic: f64, most_likely: f64, pessimistic: f64) -> f64 {
    (optimistic + 4.0 * most_likely + pessimistic) / 6.0
}
