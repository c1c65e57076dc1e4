use tablekit::graph::{traverse, Digraph, Edge, Graph, Strategy, VisitOrder, WeightedGraph};

// the 13-vertex, 22-edge calibration digraph
const EDGES: [(usize, usize); 22] = [
	(4, 2),
	(2, 3),
	(3, 2),
	(6, 0),
	(0, 1),
	(2, 0),
	(11, 12),
	(12, 9),
	(9, 10),
	(9, 11),
	(7, 9),
	(10, 12),
	(11, 4),
	(4, 3),
	(3, 5),
	(6, 8),
	(8, 6),
	(5, 4),
	(0, 5),
	(6, 4),
	(6, 9),
	(7, 6),
];

fn calibration_digraph() -> Digraph {
	let mut g = Digraph::new(13);
	for (v, w) in EDGES {
		assert!(g.add_edge(v, w));
	}
	g
}

fn visit_order(g: &Digraph, source: usize, strategy: Strategy, order: VisitOrder) -> Vec<usize> {
	let mut visited = Vec::new();
	traverse(g, source, strategy, order, |v| {
		visited.push(v);
		true
	});
	visited
}

#[test]
fn calibration_traversals() {
	let g = calibration_digraph();
	assert_eq!(g.vertex_count(), 13);
	assert_eq!(g.edge_count(), 22);

	assert_eq!(
		visit_order(&g, 0, Strategy::RecursiveDfs, VisitOrder::Preorder),
		[0, 1, 5, 4, 2, 3]
	);
	assert_eq!(
		visit_order(&g, 0, Strategy::IterativeDfs, VisitOrder::Postorder),
		[0, 5, 4, 3, 2, 1]
	);
	assert_eq!(
		visit_order(&g, 0, Strategy::Bfs, VisitOrder::Preorder),
		[0, 1, 5, 4, 2, 3]
	);
}

#[test]
fn iterative_preorder_matches_bfs_preorder() {
	let g = calibration_digraph();
	for source in 0..g.vertex_count() {
		assert_eq!(
			visit_order(&g, source, Strategy::IterativeDfs, VisitOrder::Preorder),
			visit_order(&g, source, Strategy::Bfs, VisitOrder::Preorder),
			"from {}",
			source
		);
	}
}

#[test]
fn recursive_and_iterative_postorders_disagree_here() {
	let g = calibration_digraph();
	assert_eq!(
		visit_order(&g, 0, Strategy::RecursiveDfs, VisitOrder::Postorder),
		[1, 3, 2, 4, 5, 0]
	);
	assert_ne!(
		visit_order(&g, 0, Strategy::RecursiveDfs, VisitOrder::Postorder),
		visit_order(&g, 0, Strategy::IterativeDfs, VisitOrder::Postorder)
	);
}

#[test]
fn every_strategy_reaches_the_same_vertices() {
	let g = calibration_digraph();
	for source in 0..g.vertex_count() {
		let mut reference =
			visit_order(&g, source, Strategy::RecursiveDfs, VisitOrder::Preorder);
		reference.sort();
		for strategy in [Strategy::RecursiveDfs, Strategy::IterativeDfs, Strategy::Bfs] {
			for order in [VisitOrder::Preorder, VisitOrder::Postorder] {
				let mut visited = visit_order(&g, source, strategy, order);
				visited.sort();
				assert_eq!(visited, reference);
			}
		}
	}
}

#[test]
fn visitors_stop_the_walk() {
	let g = calibration_digraph();
	for strategy in [Strategy::RecursiveDfs, Strategy::IterativeDfs, Strategy::Bfs] {
		let mut visited = Vec::new();
		traverse(&g, 0, strategy, VisitOrder::Preorder, |v| {
			visited.push(v);
			visited.len() < 2
		});
		assert_eq!(visited.len(), 2, "{:?}", strategy);
	}

	// out-of-range sources visit nothing
	let mut visited = Vec::new();
	traverse(&g, 13, Strategy::Bfs, VisitOrder::Preorder, |v| {
		visited.push(v);
		true
	});
	assert!(visited.is_empty());
}

#[test]
fn digraph_degrees_and_reverse() {
	let g = calibration_digraph();
	assert_eq!(g.out_degree(6), 4);
	assert_eq!(g.in_degree(9), 3);
	assert_eq!(g.out_degree(1), 0);
	assert_eq!(g.in_degree(1), 1);

	let r = g.reverse();
	assert_eq!(r.edge_count(), g.edge_count());
	for v in 0..g.vertex_count() {
		assert_eq!(r.out_degree(v), g.in_degree(v), "at {}", v);
		assert_eq!(r.in_degree(v), g.out_degree(v), "at {}", v);
	}
	// double reversal restores the edge set, though not the adjacency order
	let mut restored = r.reverse().adj(6).to_vec();
	restored.sort();
	let mut original = g.adj(6).to_vec();
	original.sort();
	assert_eq!(restored, original);
}

#[test]
fn invalid_edges_change_nothing() {
	let mut g = Digraph::new(3);
	assert!(g.add_edge(0, 1));
	assert!(!g.add_edge(0, 3));
	assert!(!g.add_edge(7, 0));
	assert_eq!(g.edge_count(), 1);
	assert_eq!(g.out_degree(0), 1);

	let mut u = Graph::new(3);
	assert!(u.add_edge(0, 1));
	assert!(!u.add_edge(3, 0));
	assert_eq!(u.edge_count(), 1);
	assert_eq!(u.degree(0), 1);
}

#[test]
fn undirected_graph_counts_both_ends() {
	let mut g = Graph::new(5);
	g.add_edge(0, 1);
	g.add_edge(0, 2);
	g.add_edge(3, 3);

	assert_eq!(g.edge_count(), 3);
	assert_eq!(g.degree(0), 2);
	assert_eq!(g.adj(1), [0]);
	// a self-loop contributes two to its vertex degree
	assert_eq!(g.degree(3), 2);

	let mut visited = Vec::new();
	traverse(&g, 1, Strategy::Bfs, VisitOrder::Preorder, |v| {
		visited.push(v);
		true
	});
	assert_eq!(visited, [1, 0, 2]);
}

#[test]
fn weighted_graph_edges() {
	let mut g = WeightedGraph::new(4);
	assert!(g.add_edge(Edge::new(0, 1, 0.5)));
	assert!(g.add_edge(Edge::new(1, 2, 0.25)));
	assert!(g.add_edge(Edge::new(2, 3, 1.5)));
	assert!(!g.add_edge(Edge::new(2, 9, 1.0)));

	assert_eq!(g.edge_count(), 3);
	assert_eq!(g.degree(1), 2);
	assert_eq!(g.degree(2), 2);

	let edge = g.adj(1)[0];
	assert_eq!(edge.weight(), 0.5);
	let v = edge.either();
	assert_eq!(edge.other(edge.other(v)), v);

	let mut edges = g.edges();
	assert_eq!(edges.len(), 3);
	edges.sort_by(|a, b| a.partial_cmp(b).unwrap());
	assert_eq!(edges[0].weight(), 0.25);
	assert_eq!(edges[2].weight(), 1.5);
}

#[test]
#[should_panic]
fn edge_other_rejects_foreign_vertices() {
	Edge::new(0, 1, 1.0).other(2);
}
