//! Road network model

pub mod components;
pub mod network;

pub use components::{EdgeCost, RoadEdge, RoadNode, parse_attribute};
pub use network::{IndexedPoint, RoadGraph, RoadGraphBuilder};
