//! Spring-embedder placement for networks that cannot be layered.
//!
//! Fruchterman–Reingold with a fixed circle seed and linear cooling, so the
//! same graph always lands on the same coordinates.

use super::{LayoutConfig, NodePosition};
use crate::graph::{Event, NetworkGraph};
use petgraph::visit::EdgeRef;
use std::collections::BTreeMap;
use std::f64::consts::PI;

const MIN_DISTANCE: f64 = 1e-9;

pub(crate) fn force_directed(
    graph: &NetworkGraph,
    config: &LayoutConfig,
) -> BTreeMap<Event, NodePosition> {
    let mut nodes: Vec<_> = graph.node_indices().collect();
    nodes.sort_by_key(|ix| graph[*ix]);
    let n = nodes.len();
    if n == 0 {
        return BTreeMap::new();
    }
    if n == 1 {
        return BTreeMap::from([(graph[nodes[0]], NodePosition::unlayered(0.5, 0.5))]);
    }

    let slot: BTreeMap<_, usize> = nodes.iter().enumerate().map(|(i, ix)| (*ix, i)).collect();
    let radius = config.force_seed_radius.max(MIN_DISTANCE);
    let mut pos: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / n as f64;
            (radius * angle.cos(), radius * angle.sin())
        })
        .collect();

    let side = 2.0 * radius;
    let k = (side * side / n as f64).sqrt();
    let start_temperature = side / 10.0;
    let iterations = config.force_iterations.max(1);

    for step in 0..iterations {
        let temperature = start_temperature * (1.0 - step as f64 / iterations as f64);
        let mut disp = vec![(0.0_f64, 0.0_f64); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let (dx, dy) = (pos[i].0 - pos[j].0, pos[i].1 - pos[j].1);
                let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let push = k * k / dist;
                let (fx, fy) = (dx / dist * push, dy / dist * push);
                disp[i].0 += fx;
                disp[i].1 += fy;
                disp[j].0 -= fx;
                disp[j].1 -= fy;
            }
        }

        for edge in graph.edge_references() {
            let (u, v) = (slot[&edge.source()], slot[&edge.target()]);
            if u == v {
                continue;
            }
            let (dx, dy) = (pos[u].0 - pos[v].0, pos[u].1 - pos[v].1);
            let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
            let pull = dist * dist / k;
            let (fx, fy) = (dx / dist * pull, dy / dist * pull);
            disp[u].0 -= fx;
            disp[u].1 -= fy;
            disp[v].0 += fx;
            disp[v].1 += fy;
        }

        for (p, d) in pos.iter_mut().zip(&disp) {
            let len = (d.0 * d.0 + d.1 * d.1).sqrt();
            if len > MIN_DISTANCE {
                let capped = len.min(temperature);
                p.0 += d.0 / len * capped;
                p.1 += d.1 / len * capped;
            }
        }
    }

    let normalize = |values: Vec<f64>| -> Vec<f64> {
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if hi - lo < MIN_DISTANCE {
            return vec![0.5; values.len()];
        }
        values.iter().map(|v| (v - lo) / (hi - lo)).collect()
    };
    let xs = normalize(pos.iter().map(|p| p.0).collect());
    let ys = normalize(pos.iter().map(|p| p.1).collect());

    nodes
        .iter()
        .enumerate()
        .map(|(i, ix)| (graph[*ix], NodePosition::unlayered(xs[i], ys[i])))
        .collect()
}
