//! Directed road network with a spatial index over its nodes

use geo::{Distance, Haversine, Point};
use hashbrown::HashMap;
use petgraph::{
    Directed, Graph,
    graph::{EdgeIndex, Edges, NodeIndex},
};
use rstar::{RTree, primitives::GeomWithData};

use super::components::{RoadEdge, RoadNode};
use crate::Error;

/// Node position in lon/lat space, tagged with its graph index
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// Immutable directed multigraph of the road network.
///
/// Parallel edges between the same ordered pair of nodes are allowed;
/// routing picks the shortest one.
pub struct RoadGraph {
    pub graph: Graph<RoadNode, RoadEdge, Directed>,
    rtree: RTree<IndexedPoint>,
    node_ids: HashMap<u64, NodeIndex>,
}

impl RoadGraph {
    pub fn builder() -> RoadGraphBuilder {
        RoadGraphBuilder::default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        node.index() < self.graph.node_count()
    }

    pub fn node(&self, node: NodeIndex) -> Option<&RoadNode> {
        self.graph.node_weight(node)
    }

    /// Graph index of a node by its external ID
    pub fn node_index(&self, id: u64) -> Option<NodeIndex> {
        self.node_ids.get(&id).copied()
    }

    /// Node position as `[lat, lon]`
    pub fn coordinates(&self, node: NodeIndex) -> Option<[f64; 2]> {
        self.node(node).map(|node| [node.lat(), node.lon()])
    }

    /// Outgoing edges of a node
    pub fn edges(&self, node: NodeIndex) -> Edges<'_, RoadEdge, Directed> {
        self.graph.edges(node)
    }

    /// Finds the node closest to `point` (x = lon, y = lat).
    /// Returns the node and its haversine distance in meters.
    pub fn nearest_node(&self, point: &Point<f64>) -> Option<(NodeIndex, f64)> {
        let nearest = self.rtree.nearest_neighbor(&[point.x(), point.y()])?;
        let node = self.graph.node_weight(nearest.data)?;
        let distance = Haversine.distance(*point, node.geometry);

        Some((nearest.data, distance))
    }
}

/// Incremental construction of a [`RoadGraph`]
#[derive(Default)]
pub struct RoadGraphBuilder {
    graph: Graph<RoadNode, RoadEdge, Directed>,
    node_ids: HashMap<u64, NodeIndex>,
}

impl RoadGraphBuilder {
    /// Adds a node with the given external ID
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is already taken or the coordinates are not finite
    pub fn add_node(&mut self, id: u64, lat: f64, lon: f64) -> Result<NodeIndex, Error> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(Error::InvalidData(format!(
                "Node {id} has invalid coordinates ({lat}, {lon})"
            )));
        }
        if self.node_ids.contains_key(&id) {
            return Err(Error::InvalidData(format!("Duplicate node ID {id}")));
        }

        let index = self.graph.add_node(RoadNode::new(id, lat, lon));
        self.node_ids.insert(id, index);
        Ok(index)
    }

    /// Adds a directed edge between two previously added nodes
    ///
    /// # Errors
    ///
    /// Returns an error if either endpoint is unknown
    pub fn add_edge(&mut self, from: u64, to: u64, edge: RoadEdge) -> Result<EdgeIndex, Error> {
        let source = self.lookup(from)?;
        let target = self.lookup(to)?;

        Ok(self.graph.add_edge(source, target, edge))
    }

    fn lookup(&self, id: u64) -> Result<NodeIndex, Error> {
        self.node_ids
            .get(&id)
            .copied()
            .ok_or_else(|| Error::InvalidData(format!("Edge references unknown node {id}")))
    }

    pub fn build(self) -> RoadGraph {
        let points = self
            .graph
            .node_indices()
            .map(|index| {
                let geometry = self.graph[index].geometry;
                IndexedPoint::new([geometry.x(), geometry.y()], index)
            })
            .collect();

        RoadGraph {
            rtree: RTree::bulk_load(points),
            graph: self.graph,
            node_ids: self.node_ids,
        }
    }
}
