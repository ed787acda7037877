//! End-to-end scenarios: a driver loading a graph document, stepping the
//! simulation once per frame and reading positions back between steps.

use nodelink::forces::CollideForce;
use nodelink::{DragController, GraphDocument, GraphError, Simulation, Viewport};

const GRAPH_JSON: &str = r#"{
    "nodes": [
        {"id": "a", "r": 10.0},
        {"id": "b", "r": 10.0},
        {"id": "c", "r": 12.0},
        {"id": "d", "r": 8.0}
    ],
    "links": [
        {"source": "a", "target": "b", "value": 4.0},
        {"source": "b", "target": "c", "value": 1.0},
        {"source": "c", "target": "d", "value": 2.0}
    ]
}"#;

#[test]
fn full_pipeline_settles_into_a_sane_layout() {
    let document = GraphDocument::from_json(GRAPH_JSON).unwrap();
    let mut sim = Simulation::with_default_forces(&document, Viewport::default()).unwrap();

    sim.run_to_convergence(1000);
    assert!(sim.is_settled());

    let nodes = sim.nodes();
    for node in nodes {
        assert!(
            node.x.is_finite() && node.y.is_finite(),
            "node {} ended at a non-finite position",
            node.id
        );
    }

    // The collision pass runs unscaled every step, so no pair should still
    // overlap meaningfully once the layout has cooled.
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let dx = nodes[i].x - nodes[j].x;
            let dy = nodes[i].y - nodes[j].y;
            let dist = (dx * dx + dy * dy).sqrt();
            let separation = nodes[i].r + nodes[j].r;
            assert!(
                dist > separation - 0.5,
                "{} and {} still overlap: {dist} < {separation}",
                nodes[i].id,
                nodes[j].id
            );
        }
    }
}

#[test]
fn collision_pass_moves_each_node_by_eight_and_a_half() {
    // Two radius-10 nodes, padding 2, five units apart on the x axis:
    // l = 5, required separation = 22, so each moves |((5-22)/5)*0.5| * 5 = 8.5.
    let document = GraphDocument::from_json(
        r#"{
            "nodes": [
                {"id": "a", "r": 10.0, "x": 100.0, "y": 200.0},
                {"id": "b", "r": 10.0, "x": 105.0, "y": 200.0}
            ],
            "links": []
        }"#,
    )
    .unwrap();
    let viewport = Viewport::default();
    let mut sim = Simulation::new(&document, viewport).unwrap();
    sim.register_force("collision", CollideForce::new(2.0, viewport));

    sim.step();

    let a = sim.node("a").unwrap();
    let b = sim.node("b").unwrap();
    assert!((a.x - 91.5).abs() < 1e-9, "a at {}", a.x);
    assert!((b.x - 113.5).abs() < 1e-9, "b at {}", b.x);
    assert_eq!(a.y, 200.0);
    assert_eq!(b.y, 200.0);
}

#[test]
fn dangling_link_fails_before_the_simulation_starts() {
    // Graph with one link a -> b, but node b missing from the node set.
    let document = GraphDocument::from_json(
        r#"{
            "nodes": [{"id": "a", "r": 10.0}],
            "links": [{"source": "a", "target": "b", "value": 4.0}]
        }"#,
    )
    .unwrap();

    let Err(err) = Simulation::with_default_forces(&document, Viewport::default()) else {
        panic!("dangling link must fail before the first step");
    };
    assert!(matches!(err, GraphError::UnknownNode(id) if id == "b"));
}

#[test]
fn pinned_node_holds_its_position_under_every_force() {
    let document = GraphDocument::from_json(GRAPH_JSON).unwrap();
    let mut sim = Simulation::with_default_forces(&document, Viewport::default()).unwrap();
    sim.pin("b", 50.0, 60.0).unwrap();

    let moved_before: Vec<(f64, f64)> = sim.nodes().iter().map(|n| (n.x, n.y)).collect();
    for _ in 0..50 {
        sim.step();
    }

    let pinned = sim.node("b").unwrap();
    assert_eq!((pinned.x, pinned.y), (50.0, 60.0));

    // The pinned node still exerts forces: its neighbors keep moving.
    let a = sim.node("a").unwrap();
    let a_before = moved_before[0];
    assert!(
        (a.x - a_before.0).abs() > 1e-3 || (a.y - a_before.1).abs() > 1e-3,
        "unpinned neighbors should have moved"
    );
}

#[test]
fn drag_reheats_a_settled_layout_and_lets_it_cool_again() {
    let document = GraphDocument::from_json(GRAPH_JSON).unwrap();
    let mut sim = Simulation::with_default_forces(&document, Viewport::default()).unwrap();
    sim.run_to_convergence(1000);
    assert!(sim.is_settled());

    let mut drag = DragController::new();
    drag.drag_start(&mut sim, "a", 10.0, 10.0).unwrap();
    assert!(!sim.step(), "reheated simulation must be active again");
    assert_eq!((sim.node("a").unwrap().x, sim.node("a").unwrap().y), (10.0, 10.0));

    drag.drag_move(&mut sim, "a", 20.0, 30.0).unwrap();
    sim.step();
    assert_eq!((sim.node("a").unwrap().x, sim.node("a").unwrap().y), (20.0, 30.0));

    drag.drag_end(&mut sim, "a").unwrap();
    assert_eq!(sim.alpha_target(), 0.0);
    sim.run_to_convergence(2000);
    assert!(sim.is_settled(), "layout should cool once the drag ends");
    assert!(sim.node("a").unwrap().fx.is_none());
}

#[test]
fn tick_listener_sees_every_completed_step() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let document = GraphDocument::from_json(GRAPH_JSON).unwrap();
    let mut sim = Simulation::with_default_forces(&document, Viewport::default()).unwrap();

    let frames: Rc<RefCell<Vec<Vec<(f64, f64)>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = frames.clone();
    sim.on_tick(move |nodes| {
        sink.borrow_mut()
            .push(nodes.iter().map(|n| (n.x, n.y)).collect());
    });

    // Drive like a render loop: step until settled, drawing each frame.
    let mut steps = 0;
    while !sim.step() {
        steps += 1;
        assert!(steps < 2000, "layout failed to settle");
    }

    let frames = frames.borrow();
    assert_eq!(frames.len(), steps + 1, "exactly one tick per step");
    let last = frames.last().unwrap();
    for (i, node) in sim.nodes().iter().enumerate() {
        assert_eq!(last[i], (node.x, node.y), "listener saw stale positions");
    }
}

#[test]
fn links_keep_their_visual_weight_for_the_renderer() {
    let document = GraphDocument::from_json(GRAPH_JSON).unwrap();
    let mut sim = Simulation::new(&document, Viewport::default()).unwrap();
    sim.set_links(&document.links).unwrap();

    let weights: Vec<f64> = sim.links().iter().map(|l| l.value).collect();
    assert_eq!(weights, vec![4.0, 1.0, 2.0]);
}
