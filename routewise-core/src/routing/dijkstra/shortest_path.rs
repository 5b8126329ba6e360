use std::collections::BinaryHeap;

use hashbrown::{HashMap, hash_map::Entry};
use petgraph::{graph::NodeIndex, visit::EdgeRef};

use super::state::State;
use crate::model::{EdgeCost, RoadGraph, Segment};

/// Outgoing neighbours of `node` with the cost of the edge used to reach them.
///
/// Among parallel edges to the same neighbour only the one with the smallest
/// raw length is kept (lowest edge index on equal lengths). Neighbours come
/// out sorted by node index.
pub fn cheapest_edges(graph: &RoadGraph, node: NodeIndex) -> Vec<(NodeIndex, EdgeCost)> {
    let mut candidates: Vec<_> = graph
        .edges(node)
        .map(|edge| (edge.target(), edge.weight().raw_length(), edge.id(), edge.weight()))
        .collect();

    candidates.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| a.1.total_cmp(&b.1))
            .then_with(|| a.2.cmp(&b.2))
    });
    candidates.dedup_by_key(|(target, ..)| *target);

    candidates
        .into_iter()
        .map(|(target, _, edge_id, edge)| {
            let cost = edge.cost();
            if cost.is_fallback() {
                log::trace!("Edge {edge_id:?} has no usable weight or length, using fallback cost");
            }
            (target, cost)
        })
        .collect()
}

/// Dijkstra's algorithm between two nodes of the road network.
///
/// The search stops as soon as `end` is settled. Returns `None` when `end`
/// cannot be reached or either node is not part of the graph; a search from
/// a node to itself yields a single-node segment of distance 0.
pub fn shortest_path(graph: &RoadGraph, start: NodeIndex, end: NodeIndex) -> Option<Segment> {
    if !graph.contains(start) || !graph.contains(end) {
        return None;
    }
    if start == end {
        return Some(Segment::new(vec![start], 0.0));
    }

    let mut distances: HashMap<NodeIndex, f64> = HashMap::new();
    let mut predecessors: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut heap = BinaryHeap::new();

    // Start node has distance 0
    heap.push(State {
        cost: 0.0,
        node: start,
    });
    distances.insert(start, 0.0);

    while let Some(State { cost, node }) = heap.pop() {
        if node == end {
            break;
        }

        // Skip if we've found a better path
        if let Some(&best) = distances.get(&node) {
            if cost > best {
                continue;
            }
        }

        for (next, edge_cost) in cheapest_edges(graph, node) {
            let next_cost = cost + edge_cost.value();

            match distances.entry(next) {
                Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                    predecessors.insert(next, node);
                }
                Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                        predecessors.insert(next, node);
                    }
                }
            }
        }
    }

    let distance = *distances.get(&end)?;

    // Follow predecessors backward from end to start
    let mut nodes = vec![end];
    let mut current = end;
    while current != start {
        current = *predecessors.get(&current)?;
        nodes.push(current);
    }
    nodes.reverse();

    Some(Segment::new(nodes, distance))
}
