use crate::error::Diagnostic;
use crate::graph::builder::BuiltNetwork;
use crate::graph::{Event, NameIndex, NetworkGraph};
use log::{info, warn};
use petgraph::Direction;
use petgraph::algo::toposort;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

mod force;

const MIDPOINT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal distance between consecutive layers.
    pub column_spacing: f64,
    pub force_iterations: usize,
    pub force_seed_radius: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_spacing: 2.0,
            force_iterations: 300,
            force_seed_radius: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePosition {
    /// Longest-path layer; `None` for force-directed placement.
    pub layer: Option<usize>,
    pub x: f64,
    pub y: f64,
}

impl NodePosition {
    fn layered(layer: usize, x: f64, y: f64) -> Self {
        Self {
            layer: Some(layer),
            x,
            y,
        }
    }

    fn unlayered(x: f64, y: f64) -> Self {
        Self { layer: None, x, y }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub positions: BTreeMap<Event, NodePosition>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Layout {
    pub fn position(&self, event: Event) -> Option<NodePosition> {
        self.positions.get(&event).copied()
    }

    pub fn layer(&self, event: Event) -> Option<usize> {
        self.position(event).and_then(|pos| pos.layer)
    }

    pub fn position_of_task(&self, name: &str, names: &NameIndex) -> Option<NodePosition> {
        names.event(name).and_then(|event| self.position(event))
    }

    /// False when the layered placement had to be abandoned.
    pub fn is_layered(&self) -> bool {
        self.positions.values().all(|pos| pos.layer.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

pub struct LayeredLayout<'a> {
    graph: &'a NetworkGraph,
    dummy_arcs: &'a [(Event, Event)],
    config: LayoutConfig,
}

impl<'a> LayeredLayout<'a> {
    pub fn new(graph: &'a NetworkGraph, dummy_arcs: &'a [(Event, Event)]) -> Self {
        Self::with_config(graph, dummy_arcs, LayoutConfig::default())
    }

    pub fn with_config(
        graph: &'a NetworkGraph,
        dummy_arcs: &'a [(Event, Event)],
        config: LayoutConfig,
    ) -> Self {
        Self {
            graph,
            dummy_arcs,
            config,
        }
    }

    pub fn compute(&self) -> Layout {
        let order = match toposort(self.graph, None) {
            Ok(order) => order,
            Err(cycle) => {
                let diagnostic = Diagnostic::LayoutDegenerate {
                    at: self.graph[cycle.node_id()],
                };
                warn!("{diagnostic}");
                return Layout {
                    positions: force::force_directed(self.graph, &self.config),
                    diagnostics: vec![diagnostic],
                };
            }
        };

        // Longest-path layering in topological order
        let mut layers: HashMap<Event, usize> = HashMap::with_capacity(order.len());
        for node_ix in order {
            let layer = self
                .graph
                .neighbors_directed(node_ix, Direction::Incoming)
                .filter_map(|pred| layers.get(&self.graph[pred]))
                .map(|layer| layer + 1)
                .max()
                .unwrap_or(0);
            layers.insert(self.graph[node_ix], layer);
        }

        let mut by_layer: BTreeMap<usize, Vec<Event>> = BTreeMap::new();
        for (&event, &layer) in &layers {
            by_layer.entry(layer).or_default().push(event);
        }

        let mut positions = BTreeMap::new();
        for (layer, mut events) in by_layer {
            events.sort();
            let count = events.len();
            let x = layer as f64 * self.config.column_spacing;
            for (idx, event) in events.into_iter().enumerate() {
                let y = if count == 1 {
                    MIDPOINT
                } else {
                    idx as f64 / (count - 1) as f64
                };
                positions.insert(event, NodePosition::layered(layer, x, y));
            }
        }

        if !self.dummy_arcs.is_empty() {
            self.spread_dummy_targets(&mut positions);
        }

        info!(
            "layered layout: {} events over {} layers",
            positions.len(),
            positions
                .values()
                .filter_map(|pos| pos.layer)
                .max()
                .map_or(0, |max| max + 1)
        );

        Layout {
            positions,
            diagnostics: Vec::new(),
        }
    }

    /// Lifts the lower half by the midpoint, then fans dummy-arc targets
    /// apart: targets at or below the midpoint move down, the rest move up,
    /// each side by its own growing offset.
    fn spread_dummy_targets(&self, positions: &mut BTreeMap<Event, NodePosition>) {
        for pos in positions.values_mut() {
            if pos.y <= MIDPOINT {
                pos.y += MIDPOINT;
            }
        }

        let step = MIDPOINT / self.dummy_arcs.len() as f64;
        let (mut low_offset, mut high_offset) = (0.0, 0.0);
        for (_, target) in self.dummy_arcs {
            let Some(pos) = positions.get_mut(target) else {
                continue;
            };
            if pos.y <= MIDPOINT {
                low_offset += step;
                pos.y -= low_offset;
            } else {
                high_offset += step;
                pos.y += high_offset;
            }
        }
    }
}

/// Lays out a freshly built network with the default configuration.
pub fn layout_network(built: &BuiltNetwork) -> Layout {
    LayeredLayout::new(&built.network.graph, &built.dummy_arcs).compute()
}
