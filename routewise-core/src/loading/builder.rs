use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

use log::{info, warn};

use super::config::GraphSource;
use super::raw_types::GraphDocument;
use crate::Error;
use crate::model::{RoadEdge, RoadGraph};

/// Loads the road graph described by `source`
///
/// # Errors
///
/// Returns an error if the file is missing, is not a valid graph document,
/// or references unknown nodes
pub fn create_road_graph(source: &GraphSource) -> Result<RoadGraph, Error> {
    validate_source(source)?;

    info!("Loading road graph: {}", source.path.display());
    let started = Instant::now();

    let file = File::open(&source.path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open graph '{}': {}", source.path.display(), e),
        )
    })?;
    let document: GraphDocument = serde_json::from_reader(BufReader::new(file))?;
    let graph = graph_from_document(document)?;

    info!(
        "Road graph loaded: {} nodes, {} edges in {:.2?}",
        graph.node_count(),
        graph.edge_count(),
        started.elapsed()
    );
    Ok(graph)
}

/// Builds the routing graph from an already parsed document
///
/// # Errors
///
/// Returns an error on duplicate node IDs, invalid coordinates or edges
/// between unknown nodes
pub fn graph_from_document(document: GraphDocument) -> Result<RoadGraph, Error> {
    let mut builder = RoadGraph::builder();

    for node in document.nodes {
        builder.add_node(node.id, node.lat, node.lon)?;
    }

    let mut fallback_edges = 0usize;
    for edge in document.edges {
        let attributes = RoadEdge::new(edge.weight, edge.length);
        if attributes.cost().is_fallback() {
            fallback_edges += 1;
        }
        builder.add_edge(edge.from, edge.to, attributes)?;
    }

    if fallback_edges > 0 {
        warn!(
            "{fallback_edges} edges have no usable weight or length and will be routed with the fallback cost"
        );
    }

    let graph = builder.build();
    if graph.is_empty() {
        warn!("Road graph has no nodes, every waypoint will fail to snap");
    }
    Ok(graph)
}

fn validate_source(source: &GraphSource) -> Result<(), Error> {
    if !source.path.exists() {
        return Err(Error::InvalidData(format!(
            "Graph file not found: {}",
            source.path.display()
        )));
    }
    if !source.path.is_file() {
        return Err(Error::InvalidData(format!(
            "Graph path is not a file: {}",
            source.path.display()
        )));
    }
    Ok(())
}
