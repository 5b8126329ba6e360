//! Multi-waypoint route planning over a directed road network.
//!
//! A request gives a start point and a list of destinations. Every point is
//! snapped to its nearest road node, pairwise shortest paths are computed on
//! demand with Dijkstra's algorithm, the visiting order with the smallest
//! total distance is chosen, and the legs are stitched into one polyline
//! with a step by step report.
//!
//! ```no_run
//! use routewise_core::prelude::*;
//!
//! # fn main() -> Result<(), Error> {
//! let graph = create_road_graph(&GraphSource::new("hcm_graph.json"))?;
//! let waypoints = [
//!     Waypoint::new(10.7769, 106.7009),
//!     Waypoint::new(10.7797, 106.6990),
//!     Waypoint::new(10.7626, 106.6822),
//! ];
//! let route = plan_route(&graph, &waypoints, &PlannerOptions::default())?;
//! println!("{:.2} m in {} steps", route.total_distance, route.steps.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loading;
pub mod model;
pub mod planner;
pub mod prelude;
pub mod routing;

#[cfg(test)]
pub(crate) mod test_graphs;

pub use error::Error;
pub use loading::{GraphSource, create_road_graph, graph_from_document};
pub use model::{RoadGraph, Route, Segment, Waypoint};
pub use planner::{PlannerOptions, plan_route};
pub use routing::{AssembledRoute, OptimizerOptions, RouteStep};

/// Index of a node in the routing graph
pub type NodeId = petgraph::graph::NodeIndex;

/// Cost of an edge whose weight and length are both missing or unusable
pub const FALLBACK_EDGE_WEIGHT: f64 = 1.0;

/// Decimal places of every distance in the route report
pub const DISTANCE_DECIMALS: i32 = 2;
