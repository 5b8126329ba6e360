pub use crate::Error;
pub use crate::{DISTANCE_DECIMALS, FALLBACK_EDGE_WEIGHT, NodeId};

// Graph loading and the street network
pub use crate::loading::{GraphSource, create_road_graph, graph_from_document};
pub use crate::model::{RoadEdge, RoadGraph, RoadNode, Waypoint};

// Planning
pub use crate::planner::{PlannerOptions, plan_route, snap_waypoints};
pub use crate::routing::{
    AssembledRoute, LabelMap, OptimizerOptions, RouteStep, SegmentCache, assemble, optimize,
    shortest_path,
};
