//! Per-request memoization of shortest paths between ordered node pairs

use hashbrown::HashMap;
use rayon::prelude::*;

use super::dijkstra::shortest_path;
use crate::NodeId;
use crate::model::{RoadGraph, Segment};

/// Shortest paths computed during one planning request.
///
/// Keys are ordered `(from, to)` pairs: the graph is directed, so both
/// directions are searched and stored independently. Unreachable pairs are
/// remembered as well, so every pair is searched at most once.
pub struct SegmentCache<'g> {
    graph: &'g RoadGraph,
    segments: HashMap<(NodeId, NodeId), Option<Segment>>,
    searches: usize,
}

impl<'g> SegmentCache<'g> {
    pub fn new(graph: &'g RoadGraph) -> Self {
        Self {
            graph,
            segments: HashMap::new(),
            searches: 0,
        }
    }

    pub fn graph(&self) -> &'g RoadGraph {
        self.graph
    }

    /// Shortest path from `from` to `to`, searching the graph on first use
    pub fn get(&mut self, from: NodeId, to: NodeId) -> Option<&Segment> {
        let graph = self.graph;
        let searches = &mut self.searches;

        self.segments
            .entry((from, to))
            .or_insert_with(|| {
                *searches += 1;
                shortest_path(graph, from, to)
            })
            .as_ref()
    }

    /// Distance of the shortest path from `from` to `to` in meters
    pub fn distance(&mut self, from: NodeId, to: NodeId) -> Option<f64> {
        self.get(from, to).map(Segment::distance)
    }

    /// Distance of an already searched pair; pairs never searched read as unreachable
    pub fn cached_distance(&self, from: NodeId, to: NodeId) -> Option<f64> {
        debug_assert!(
            self.segments.contains_key(&(from, to)),
            "pair {from:?} -> {to:?} was not prefetched"
        );
        self.segments
            .get(&(from, to))
            .and_then(Option::as_ref)
            .map(Segment::distance)
    }

    /// Searches every pair not cached yet, on the rayon pool when `parallel` is set
    pub fn prefetch<I>(&mut self, pairs: I, parallel: bool)
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut missing: Vec<(NodeId, NodeId)> = pairs
            .into_iter()
            .filter(|pair| !self.segments.contains_key(pair))
            .collect();
        missing.sort_unstable();
        missing.dedup();

        let graph = self.graph;
        let computed: Vec<_> = if parallel {
            missing
                .into_par_iter()
                .map(|(from, to)| ((from, to), shortest_path(graph, from, to)))
                .collect()
        } else {
            missing
                .into_iter()
                .map(|(from, to)| ((from, to), shortest_path(graph, from, to)))
                .collect()
        };

        self.searches += computed.len();
        self.segments.extend(computed);
    }

    /// Number of shortest path searches run so far
    pub fn searches(&self) -> usize {
        self.searches
    }

    /// Number of cached pairs, reachable or not
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
