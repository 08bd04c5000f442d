use aoa_network::{
    Activity, Diagnostic, Event, LayeredLayout, LayoutConfig, NetworkGraph, Task, build_network,
    layout_network,
};
use petgraph::visit::EdgeRef;

fn task(name: &str, deps: &[&str]) -> Task {
    Task::new(name, 1.0, 2.0, 3.0).with_dependencies(deps.iter().copied())
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn scenario_a() -> Vec<Task> {
    vec![
        task("t1", &["none"]),
        task("t2", &["none"]),
        task("t3", &["t1", "t2"]),
    ]
}

#[test]
fn join_event_sits_after_all_its_dependencies() {
    let built = build_network(&scenario_a()).unwrap();
    let layout = layout_network(&built);

    let layer = |name: &str| layout.layer(built.names.event(name).unwrap()).unwrap();
    assert_eq!(layer("t3"), 1 + layer("t1").max(layer("t2")));
    assert_eq!(layout.layer(Event::Source), Some(0));
}

#[test]
fn every_arc_points_to_a_later_layer() {
    let tasks = vec![
        task("a", &[]),
        task("b", &["a"]),
        task("c", &["a"]),
        task("d", &["b", "c"]),
        task("e", &["c", "d", "a"]),
        task("f", &["none"]),
    ];
    let built = build_network(&tasks).unwrap();
    let layout = layout_network(&built);

    assert!(layout.is_layered());
    for arc in built.network.activities() {
        assert!(layout.layer(arc.to).unwrap() > layout.layer(arc.from).unwrap());
    }
}

#[test]
fn single_task_layout() {
    let tasks = vec![task("only", &["none"])];

    // the source holds layer 0, the task event is alone in layer 1
    let built = build_network(&tasks).unwrap();
    let layout = layout_network(&built);
    let only = layout.position_of_task("only", &built.names).unwrap();
    assert_eq!(only.layer, Some(1));
    assert!(approx(only.y, 0.5));
    assert!(approx(only.x, 2.0));
    let source = layout.position(Event::Source).unwrap();
    assert_eq!(source.layer, Some(0));
    assert!(approx(source.y, 0.5));
}

#[test]
fn layer_members_spread_evenly_in_event_order() {
    let tasks = vec![task("a", &[]), task("b", &[]), task("c", &[])];
    let built = build_network(&tasks).unwrap();
    let layout = layout_network(&built);

    let ys: Vec<f64> = (0..3)
        .map(|idx| layout.position(Event::Task(idx)).unwrap().y)
        .collect();
    assert!(approx(ys[0], 0.0));
    assert!(approx(ys[1], 0.5));
    assert!(approx(ys[2], 1.0));
    assert_eq!(layout.layer(Event::Sink), Some(2));
    assert!(approx(layout.position(Event::Sink).unwrap().x, 4.0));
}

#[test]
fn dummy_target_above_midpoint_moves_up() {
    let built = build_network(&scenario_a()).unwrap();
    let layout = layout_network(&built);

    // every layer holds one event: all lift from 0.5 to 1.0, then t2 fans out
    let t1 = layout.position_of_task("t1", &built.names).unwrap();
    let t2 = layout.position_of_task("t2", &built.names).unwrap();
    let t3 = layout.position_of_task("t3", &built.names).unwrap();
    assert!(approx(t1.y, 1.0));
    assert!(approx(t2.y, 1.5));
    assert!(approx(t3.y, 1.0));
}

#[test]
fn dummy_targets_fan_out_on_both_sides() {
    let tasks = vec![task("a", &[]), task("b", &[]), task("c", &[])];
    let built = build_network(&tasks).unwrap();
    let dummies = vec![
        (Event::Source, Event::Task(0)),
        (Event::Source, Event::Task(2)),
    ];
    let layout = LayeredLayout::new(&built.network.graph, &dummies).compute();

    // a: 0.0 -> 0.5 -> 0.25, b: 0.5 -> 1.0, c: 1.0 -> 1.25
    assert!(approx(layout.position(Event::Task(0)).unwrap().y, 0.25));
    assert!(approx(layout.position(Event::Task(1)).unwrap().y, 1.0));
    assert!(approx(layout.position(Event::Task(2)).unwrap().y, 1.25));
}

#[test]
fn dummy_offsets_accumulate_per_side() {
    // a, b, c in layer 1; d, e hang off a in layer 2
    let tasks = vec![
        task("a", &[]),
        task("b", &[]),
        task("c", &[]),
        task("d", &["a"]),
        task("e", &["a"]),
    ];
    let built = build_network(&tasks).unwrap();
    let dummies = vec![
        (Event::Source, Event::Task(0)),
        (Event::Source, Event::Task(3)),
        (Event::Source, Event::Task(2)),
        (Event::Source, Event::Task(4)),
    ];
    let layout = LayeredLayout::new(&built.network.graph, &dummies).compute();

    // step 0.125: low side moves 0.125 then 0.25, high side likewise upwards
    let y = |idx| layout.position(Event::Task(idx)).unwrap().y;
    assert!(approx(y(0), 0.375));
    assert!(approx(y(3), 0.25));
    assert!(approx(y(2), 1.125));
    assert!(approx(y(4), 1.25));
    assert!(approx(y(1), 1.0));
}

#[test]
fn repeated_high_side_targets_keep_separating() {
    let tasks: Vec<Task> = ["a", "b", "c", "d", "e"]
        .iter()
        .map(|name| task(name, &[]))
        .collect();
    let built = build_network(&tasks).unwrap();
    let dummies = vec![
        (Event::Source, Event::Task(0)),
        (Event::Source, Event::Task(1)),
        (Event::Source, Event::Task(3)),
        (Event::Source, Event::Task(4)),
    ];
    let layout = LayeredLayout::new(&built.network.graph, &dummies).compute();

    let ys: Vec<f64> = (0..5)
        .map(|idx| layout.position(Event::Task(idx)).unwrap().y)
        .collect();
    let expected = [0.375, 0.875, 1.0, 1.0, 1.375];
    for (got, want) in ys.iter().zip(expected) {
        assert!(approx(*got, want), "{ys:?}");
    }
}

#[test]
fn layout_is_idempotent() {
    let built = build_network(&scenario_a()).unwrap();
    let first = layout_network(&built);
    let second = layout_network(&built);
    assert_eq!(first, second);
}

#[test]
fn column_spacing_is_configurable() {
    let built = build_network(&scenario_a()).unwrap();
    let config = LayoutConfig {
        column_spacing: 5.0,
        ..LayoutConfig::default()
    };
    let layout =
        LayeredLayout::with_config(&built.network.graph, &built.dummy_arcs, config).compute();
    for pos in layout.positions.values() {
        assert!(approx(pos.x, pos.layer.unwrap() as f64 * 5.0));
    }
}

#[test]
fn empty_network_has_empty_layout() {
    let built = build_network(&[]).unwrap();
    let layout = layout_network(&built);
    assert!(layout.is_empty());
    assert!(layout.diagnostics.is_empty());
}

fn cyclic_graph() -> NetworkGraph {
    let mut graph = NetworkGraph::new();
    let a = graph.add_node(Event::Task(0));
    let b = graph.add_node(Event::Task(1));
    let c = graph.add_node(Event::Task(2));
    graph.add_edge(a, b, Activity::precedence());
    graph.add_edge(b, c, Activity::precedence());
    graph.add_edge(c, a, Activity::precedence());
    graph
}

#[test]
fn cyclic_graph_falls_back_to_force_layout() {
    let graph = cyclic_graph();
    let layout = LayeredLayout::new(&graph, &[]).compute();

    assert!(!layout.is_layered());
    assert_eq!(layout.positions.len(), 3);
    assert!(matches!(
        layout.diagnostics.as_slice(),
        [Diagnostic::LayoutDegenerate { .. }]
    ));
    for pos in layout.positions.values() {
        assert!(pos.layer.is_none());
        assert!((0.0..=1.0).contains(&pos.x));
        assert!((0.0..=1.0).contains(&pos.y));
    }

    let again = LayeredLayout::new(&graph, &[]).compute();
    assert_eq!(layout, again);
}

#[test]
fn force_layout_keeps_nodes_apart() {
    let graph = cyclic_graph();
    let layout = LayeredLayout::new(&graph, &[]).compute();
    let points: Vec<_> = layout.positions.values().map(|p| (p.x, p.y)).collect();
    for (i, p) in points.iter().enumerate() {
        for q in &points[i + 1..] {
            let dist = ((p.0 - q.0).powi(2) + (p.1 - q.1).powi(2)).sqrt();
            assert!(dist > 0.1);
        }
    }
}

#[test]
fn cyclic_dependencies_degrade_layout_end_to_end() {
    let tasks = vec![task("a", &["b"]), task("b", &["a"])];
    let built = build_network(&tasks).unwrap();
    let layout = layout_network(&built);

    assert!(!layout.is_layered());
    assert_eq!(layout.positions.len(), built.network.event_count());
    // arcs of the input still resolve to positioned events
    for edge in built.network.graph.edge_references() {
        assert!(layout.position(built.network.graph[edge.source()]).is_some());
    }
}
