//! Data model for waypoint route planning
//!
//! Contains the road network and the values produced while planning a route.

pub mod route;
pub mod streets;

pub use route::{Route, Segment, Waypoint};
pub use streets::{EdgeCost, IndexedPoint, RoadEdge, RoadGraph, RoadGraphBuilder, RoadNode};
