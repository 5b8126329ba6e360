//! Small synthetic road graphs shared by unit tests

use petgraph::visit::EdgeRef;

use crate::model::{RoadEdge, RoadGraph};
use crate::NodeId;

/// Builds a graph from external node IDs and `(from, to, length)` edges.
/// Nodes are laid out on a diagonal near Ho Chi Minh City in the given order.
pub(crate) fn build(nodes: &[u64], edges: &[(u64, u64, f64)]) -> RoadGraph {
    let mut builder = RoadGraph::builder();
    for (position, &id) in nodes.iter().enumerate() {
        let offset = position as f64 * 0.001;
        builder
            .add_node(id, 10.77 + offset, 106.69 + offset)
            .unwrap();
    }
    for &(from, to, length) in edges {
        builder
            .add_edge(from, to, RoadEdge::with_length(length))
            .unwrap();
    }
    builder.build()
}

pub(crate) fn node(graph: &RoadGraph, id: u64) -> NodeId {
    graph.node_index(id).unwrap()
}

pub(crate) const A: u64 = 1;
pub(crate) const B: u64 = 2;
pub(crate) const C: u64 = 3;
pub(crate) const D: u64 = 4;

/// A→B→C→D→A with unit weights plus the chord A→C
pub(crate) fn cycle_with_chord() -> RoadGraph {
    build(
        &[A, B, C, D],
        &[(A, B, 1.0), (B, C, 1.0), (C, D, 1.0), (D, A, 1.0), (A, C, 1.0)],
    )
}

/// Same as [`cycle_with_chord`] without D→A, so nothing leaves D
pub(crate) fn open_cycle_with_chord() -> RoadGraph {
    build(
        &[A, B, C, D],
        &[(A, B, 1.0), (B, C, 1.0), (C, D, 1.0), (A, C, 1.0)],
    )
}

/// A→B costs 1 while B→A costs 4 via C (direct B→A costs 10)
pub(crate) fn asymmetric() -> RoadGraph {
    build(
        &[A, B, C],
        &[(A, B, 1.0), (B, A, 10.0), (B, C, 2.0), (C, A, 2.0)],
    )
}

/// Deterministic pseudo random graph with integer weights and some parallel edges
pub(crate) fn pseudo_random(node_count: u64, edge_count: usize, seed: u64) -> RoadGraph {
    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    let mut next = move |bound: u64| {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 33) % bound
    };

    let nodes: Vec<u64> = (0..node_count).collect();
    let edges: Vec<(u64, u64, f64)> = (0..edge_count)
        .map(|_| {
            let from = next(node_count);
            let to = next(node_count);
            let length = (next(20) + 1) as f64;
            (from, to, length)
        })
        .filter(|(from, to, _)| from != to)
        .collect();

    build(&nodes, &edges)
}

/// All-pairs shortest distances by Floyd-Warshall, indexed by node index
pub(crate) fn reference_distances(graph: &RoadGraph) -> Vec<Vec<Option<f64>>> {
    let n = graph.node_count();
    let mut dist = vec![vec![f64::INFINITY; n]; n];
    let mut chosen_length = vec![vec![f64::INFINITY; n]; n];

    for (i, row) in dist.iter_mut().enumerate() {
        row[i] = 0.0;
    }
    for edge in graph.graph.edge_references() {
        let (u, v) = (edge.source().index(), edge.target().index());
        let length = edge.weight().raw_length();
        // Parallel edges: the shortest raw length decides the cost
        if u != v && length < chosen_length[u][v] {
            chosen_length[u][v] = length;
            dist[u][v] = edge.weight().cost().value();
        }
    }
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                let through = dist[i][k] + dist[k][j];
                if through < dist[i][j] {
                    dist[i][j] = through;
                }
            }
        }
    }

    dist.into_iter()
        .map(|row| {
            row.into_iter()
                .map(|d| d.is_finite().then_some(d))
                .collect()
        })
        .collect()
}
