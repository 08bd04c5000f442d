use super::{Activity, ActivityNetwork, BuildConfig, Event, NameIndex, RealActivity};
use crate::error::{Diagnostic, NetworkError, NetworkResult};
use crate::task::Task;
use crate::task_validation;
use log::{debug, info, warn};
use petgraph::algo::toposort;

/// Output of one build: the network plus everything layout and callers need
/// to interpret it.
#[derive(Debug, Clone, Default)]
pub struct BuiltNetwork {
    pub network: ActivityNetwork,
    /// Precedence dummies in insertion order. Empty after a cycle fallback.
    pub dummy_arcs: Vec<(Event, Event)>,
    pub names: NameIndex,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct NetworkBuilder<'a> {
    tasks: &'a [Task],
    config: BuildConfig,
}

impl<'a> NetworkBuilder<'a> {
    pub fn new(tasks: &'a [Task]) -> Self {
        Self::with_config(tasks, BuildConfig::default())
    }

    pub fn with_config(tasks: &'a [Task], config: BuildConfig) -> Self {
        Self { tasks, config }
    }

    pub fn build(&self) -> NetworkResult<BuiltNetwork> {
        if self.tasks.is_empty() {
            return Ok(BuiltNetwork::default());
        }

        // Reject bad input before any arc is drawn
        task_validation::validate_task_collection(self.tasks)?;
        let names = NameIndex::from_tasks(self.tasks);
        let dependencies = self.resolve_dependencies(&names)?;

        // Steps 1-3: events and real activities
        let mut network = self.base_network(&dependencies);

        // Steps 4-5: precedence dummies
        let mut dummy_arcs = Vec::new();
        Self::insert_pairwise_dummies(&mut network, &dependencies, &mut dummy_arcs);
        // A dependency set holding a lower event that itself depends on a
        // higher one gets a chain arc against the real arc. That 2-cycle is
        // the usual way into the step 7 fallback.
        Self::insert_chain_dummies(&mut network, &dependencies, &mut dummy_arcs);

        // Step 6: sink closure
        Self::close_into_sink(&mut network, self.tasks.len());

        // Step 7: cycle check with fallback
        let mut diagnostics = Vec::new();
        if let Err(cycle) = toposort(&network.graph, None) {
            let mut direct = self.base_network(&dependencies);
            Self::close_into_sink(&mut direct, self.tasks.len());
            let diagnostic = match toposort(&direct.graph, None) {
                // dropping dummies cannot help, keep the full network
                Err(raw_cycle) => Diagnostic::DependencyCycle {
                    at: direct.graph[raw_cycle.node_id()],
                },
                Ok(_) => {
                    let diagnostic = Diagnostic::CycleDetected {
                        dropped_arcs: dummy_arcs.len(),
                        at: network.graph[cycle.node_id()],
                    };
                    dummy_arcs.clear();
                    network = direct;
                    diagnostic
                }
            };
            warn!("{diagnostic}");
            diagnostics.push(diagnostic);
        }

        info!(
            "built activity network: {} events, {} activities, {} dummy arcs",
            network.event_count(),
            network.activity_count(),
            dummy_arcs.len()
        );

        Ok(BuiltNetwork {
            network,
            dummy_arcs,
            names,
            diagnostics,
        })
    }

    /// Dependency events per task, in the task's listed order.
    fn resolve_dependencies(&self, names: &NameIndex) -> NetworkResult<Vec<Vec<Event>>> {
        let markers = &self.config.no_dependency_markers;
        let mut resolved = Vec::with_capacity(self.tasks.len());
        for task in self.tasks {
            let mut events = Vec::new();
            for dep in task.named_dependencies(markers) {
                let event = names
                    .event(dep)
                    .ok_or_else(|| NetworkError::UnknownDependency {
                        task: task.name.clone(),
                        dependency: dep.to_string(),
                    })?;
                events.push(event);
            }
            resolved.push(events);
        }
        Ok(resolved)
    }

    fn base_network(&self, dependencies: &[Vec<Event>]) -> ActivityNetwork {
        let mut network = ActivityNetwork::with_events(
            std::iter::once(Event::Source)
                .chain((0..self.tasks.len()).map(Event::Task))
                .chain(std::iter::once(Event::Sink)),
        );

        for (idx, (task, deps)) in self.tasks.iter().zip(dependencies).enumerate() {
            let task_event = Event::Task(idx);
            if deps.is_empty() {
                network.add_activity(
                    Event::Source,
                    task_event,
                    Activity::Real(RealActivity::from_task(task)),
                );
                continue;
            }
            for &dep_event in deps {
                network.add_activity(
                    dep_event,
                    task_event,
                    Activity::Real(RealActivity::from_task(task)),
                );
            }
        }
        network
    }

    /// Orders every pair of events sharing a dependent task unless an arc
    /// already joins them in either direction. Direction is lower event to
    /// higher event, a numbering heuristic rather than true precedence.
    fn insert_pairwise_dummies(
        network: &mut ActivityNetwork,
        dependencies: &[Vec<Event>],
        dummy_arcs: &mut Vec<(Event, Event)>,
    ) {
        for deps in dependencies.iter().filter(|deps| deps.len() > 1) {
            for (i, &dep_i) in deps.iter().enumerate() {
                for &dep_j in &deps[i + 1..] {
                    if dep_i == dep_j
                        || network.has_arc(dep_i, dep_j)
                        || network.has_arc(dep_j, dep_i)
                    {
                        continue;
                    }
                    let (from, to) = if dep_i < dep_j {
                        (dep_i, dep_j)
                    } else {
                        (dep_j, dep_i)
                    };
                    debug!("pairwise dummy {from} -> {to}");
                    network.add_activity(from, to, Activity::precedence());
                    dummy_arcs.push((from, to));
                }
            }
        }
    }

    /// Chains each dependency set in event order. Only the same ordered pair
    /// counts as already connected here.
    fn insert_chain_dummies(
        network: &mut ActivityNetwork,
        dependencies: &[Vec<Event>],
        dummy_arcs: &mut Vec<(Event, Event)>,
    ) {
        for deps in dependencies.iter().filter(|deps| deps.len() > 1) {
            let mut sorted = deps.clone();
            sorted.sort();
            sorted.dedup();
            for pair in sorted.windows(2) {
                let (from, to) = (pair[0], pair[1]);
                if network.has_arc(from, to) {
                    continue;
                }
                debug!("chain dummy {from} -> {to}");
                network.add_activity(from, to, Activity::precedence());
                dummy_arcs.push((from, to));
            }
        }
    }

    fn close_into_sink(network: &mut ActivityNetwork, task_count: usize) {
        for idx in 0..task_count {
            let event = Event::Task(idx);
            if network.out_degree(event) == 0 {
                debug!("sink closure {event} -> sink");
                network.add_activity(event, Event::Sink, Activity::sink_closure());
            }
        }
    }
}

/// Builds the network for `tasks` with the default configuration.
pub fn build_network(tasks: &[Task]) -> NetworkResult<BuiltNetwork> {
    NetworkBuilder::new(tasks).build()
}
