use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::task::Task;

pub mod builder;

/// A point in time at which activities complete and/or begin.
///
/// Ordering is `Source < Task(0) < Task(1) < … < Sink`; the builder uses it
/// as the dummy-arc direction tie-break and the layout as the in-layer sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Event {
    Source,
    /// Completion point of the task at this input position.
    Task(usize),
    Sink,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Source => write!(f, "source"),
            Event::Task(idx) => write!(f, "e{}", idx + 1),
            Event::Sink => write!(f, "sink"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RealActivity {
    pub label: String,
    pub duration: f64,
    pub optimistic: f64,
    pub most_likely: f64,
    pub pessimistic: f64,
    pub cost_reduction: f64,
}

impl RealActivity {
    pub fn from_task(task: &Task) -> Self {
        Self {
            label: task.name.clone(),
            duration: task.expected_duration(),
            optimistic: task.optimistic_duration,
            most_likely: task.most_likely_duration,
            pessimistic: task.pessimistic_duration,
            cost_reduction: task.cost_reduction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DummyKind {
    /// Orders two events that share a dependent task.
    Precedence,
    /// Connects a terminal task event to the sink.
    SinkClosure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DummyActivity {
    pub kind: DummyKind,
}

/// Arc payload: real work with a PERT duration, or a zero-length constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Activity {
    Real(RealActivity),
    Dummy(DummyActivity),
}

impl Activity {
    pub fn precedence() -> Self {
        Activity::Dummy(DummyActivity {
            kind: DummyKind::Precedence,
        })
    }

    pub fn sink_closure() -> Self {
        Activity::Dummy(DummyActivity {
            kind: DummyKind::SinkClosure,
        })
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Activity::Real(_))
    }

    pub fn duration(&self) -> f64 {
        match self {
            Activity::Real(real) => real.duration,
            Activity::Dummy(_) => 0.0,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Activity::Real(real) => &real.label,
            Activity::Dummy(DummyActivity {
                kind: DummyKind::Precedence,
            }) => "dummy",
            Activity::Dummy(DummyActivity {
                kind: DummyKind::SinkClosure,
            }) => "finish",
        }
    }

    pub fn as_real(&self) -> Option<&RealActivity> {
        match self {
            Activity::Real(real) => Some(real),
            Activity::Dummy(_) => None,
        }
    }

    pub fn is_precedence_dummy(&self) -> bool {
        matches!(
            self,
            Activity::Dummy(DummyActivity {
                kind: DummyKind::Precedence
            })
        )
    }
}

pub type NetworkGraph = DiGraph<Event, Activity>;

/// Borrowed view of one arc with its endpoints resolved to events.
#[derive(Debug, Clone, Copy)]
pub struct ActivityArc<'a> {
    pub from: Event,
    pub to: Event,
    pub activity: &'a Activity,
}

/// Immutable name → event lookup, built once per task-list snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameIndex {
    by_name: HashMap<String, Event>,
    names: Vec<String>,
}

impl NameIndex {
    pub(crate) fn from_tasks(tasks: &[Task]) -> Self {
        let mut by_name = HashMap::with_capacity(tasks.len());
        let mut names = Vec::with_capacity(tasks.len());
        for (idx, task) in tasks.iter().enumerate() {
            by_name.insert(task.name.clone(), Event::Task(idx));
            names.push(task.name.clone());
        }
        Self { by_name, names }
    }

    pub fn event(&self, name: &str) -> Option<Event> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, event: Event) -> Option<&str> {
        match event {
            Event::Task(idx) => self.names.get(idx).map(String::as_str),
            Event::Source | Event::Sink => None,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Task names with their events, in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Event)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), Event::Task(idx)))
    }
}

/// The directed multigraph of events and activities.
#[derive(Debug, Clone, Default)]
pub struct ActivityNetwork {
    pub graph: NetworkGraph,
    event_to_index: HashMap<Event, NodeIndex>,
}

impl ActivityNetwork {
    pub(crate) fn with_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = Event>,
    {
        let mut network = Self::default();
        for event in events {
            let node_ix = network.graph.add_node(event);
            network.event_to_index.insert(event, node_ix);
        }
        network
    }

    pub(crate) fn add_activity(&mut self, from: Event, to: Event, activity: Activity) {
        if let (Some(&u), Some(&v)) = (self.event_to_index.get(&from), self.event_to_index.get(&to))
        {
            self.graph.add_edge(u, v, activity);
        }
    }

    /// True when any arc (real or dummy) runs `from -> to`.
    pub fn has_arc(&self, from: Event, to: Event) -> bool {
        match (self.node_index(from), self.node_index(to)) {
            (Some(u), Some(v)) => self.graph.contains_edge(u, v),
            _ => false,
        }
    }

    pub fn node_index(&self, event: Event) -> Option<NodeIndex> {
        self.event_to_index.get(&event).copied()
    }

    pub fn contains_event(&self, event: Event) -> bool {
        self.event_to_index.contains_key(&event)
    }

    pub fn event_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn activity_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn events(&self) -> impl Iterator<Item = Event> + '_ {
        self.graph.node_weights().copied()
    }

    pub fn activities(&self) -> impl Iterator<Item = ActivityArc<'_>> + '_ {
        self.graph.edge_references().map(|edge| ActivityArc {
            from: self.graph[edge.source()],
            to: self.graph[edge.target()],
            activity: edge.weight(),
        })
    }

    pub fn real_activities(&self) -> impl Iterator<Item = ActivityArc<'_>> + '_ {
        self.activities().filter(|arc| arc.activity.is_real())
    }

    pub fn dummy_activities(&self) -> impl Iterator<Item = ActivityArc<'_>> + '_ {
        self.activities().filter(|arc| !arc.activity.is_real())
    }

    pub fn out_degree(&self, event: Event) -> usize {
        self.node_index(event)
            .map(|ix| {
                self.graph
                    .neighbors_directed(ix, petgraph::Direction::Outgoing)
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_acyclic(&self) -> bool {
        toposort(&self.graph, None).is_ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Dependency entries that mean "no dependency".
    pub no_dependency_markers: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            no_dependency_markers: vec!["none".to_string(), "-".to_string()],
        }
    }
}
