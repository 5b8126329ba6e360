//! This module is responsible for loading a prepared road graph
//! and building the in-memory routing graph with its spatial index.

mod builder;
mod config;
mod raw_types;

pub use builder::{create_road_graph, graph_from_document};
pub use config::GraphSource;
pub use raw_types::{EdgeRecord, GraphDocument, NodeRecord};
