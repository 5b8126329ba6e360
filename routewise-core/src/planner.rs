//! Planning request: waypoints in, assembled route out

use std::time::Instant;

use log::{debug, info};

use crate::model::{RoadGraph, Waypoint};
use crate::routing::{
    AssembledRoute, LabelMap, OptimizerOptions, SegmentCache, assemble, optimize,
};
use crate::{Error, NodeId};

/// Default upper bound on the number of destinations per request
pub const DEFAULT_MAX_DESTINATIONS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerOptions {
    /// Largest number of destinations (waypoints after the start) accepted
    pub max_destinations: usize,
    pub optimizer: OptimizerOptions,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            max_destinations: DEFAULT_MAX_DESTINATIONS,
            optimizer: OptimizerOptions::default(),
        }
    }
}

/// Plans a route from the first waypoint through all the others in the
/// order that minimizes the total distance.
///
/// Every waypoint is snapped to its nearest graph node first. All
/// intermediate state lives for this call only.
///
/// # Errors
///
/// - [`Error::InvalidInput`] for fewer than 2 waypoints or invalid coordinates
/// - [`Error::TooManyWaypoints`] above [`PlannerOptions::max_destinations`]
/// - [`Error::NoPointsFound`] if the graph is empty
/// - [`Error::NoFeasibleRoute`] if no visiting order connects all waypoints
pub fn plan_route(
    graph: &RoadGraph,
    waypoints: &[Waypoint],
    options: &PlannerOptions,
) -> Result<AssembledRoute, Error> {
    validate_waypoints(waypoints, options)?;
    let started = Instant::now();

    let nodes = snap_waypoints(graph, waypoints)?;
    let labels = LabelMap::from_nodes(&nodes);

    let mut cache = SegmentCache::new(graph);
    let route = optimize(&mut cache, nodes[0], &nodes[1..], &options.optimizer)?;
    let assembled = assemble(graph, &route, &labels)?;

    info!(
        "Planned route through {} waypoints: {:.2} m, {} path searches in {:.2?}",
        waypoints.len(),
        assembled.total_distance,
        cache.searches(),
        started.elapsed()
    );
    Ok(assembled)
}

fn validate_waypoints(waypoints: &[Waypoint], options: &PlannerOptions) -> Result<(), Error> {
    if waypoints.len() < 2 {
        return Err(Error::InvalidInput(format!(
            "At least 2 points are required, got {}",
            waypoints.len()
        )));
    }

    let destinations = waypoints.len() - 1;
    if destinations > options.max_destinations {
        return Err(Error::TooManyWaypoints {
            given: destinations,
            max: options.max_destinations,
        });
    }

    waypoints.iter().try_for_each(Waypoint::validate)
}

/// Resolves every waypoint to its nearest graph node, in input order
///
/// # Errors
///
/// Returns [`Error::NoPointsFound`] if the graph has no nodes
pub fn snap_waypoints(graph: &RoadGraph, waypoints: &[Waypoint]) -> Result<Vec<NodeId>, Error> {
    waypoints
        .iter()
        .enumerate()
        .map(|(position, waypoint)| {
            let (node, distance) = graph
                .nearest_node(&waypoint.point())
                .ok_or(Error::NoPointsFound)?;
            debug!(
                "Point {} ({}, {}) snapped to node {:?} {distance:.1} m away",
                position + 1,
                waypoint.lat,
                waypoint.lon,
                node
            );
            Ok(node)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_graphs::{self, A, C, D};

    fn waypoint_at(graph: &RoadGraph, id: u64) -> Waypoint {
        let [lat, lon] = graph
            .coordinates(graph.node_index(id).unwrap())
            .unwrap();
        // A few meters off the node
        Waypoint::new(lat + 0.00002, lon - 0.00002)
    }

    #[test]
    fn plans_cycle_scenario() {
        let graph = test_graphs::cycle_with_chord();
        let waypoints = [A, C, D].map(|id| waypoint_at(&graph, id));

        let route = plan_route(&graph, &waypoints, &PlannerOptions::default()).unwrap();

        assert_eq!(route.total_distance, 2.0);
        assert_eq!(route.steps.len(), 2);
        assert_eq!(route.steps[0].to, "Point 2");
        assert_eq!(route.steps[1].to, "Point 3");
        assert_eq!(route.polyline.len(), 3);
    }

    #[test]
    fn reorders_destinations() {
        let graph = test_graphs::cycle_with_chord();
        // Input order D then C: going to C first is shorter
        let waypoints = [A, D, C].map(|id| waypoint_at(&graph, id));

        let route = plan_route(&graph, &waypoints, &PlannerOptions::default()).unwrap();

        assert_eq!(route.total_distance, 2.0);
        assert_eq!(route.steps[0].from, "Point 1");
        assert_eq!(route.steps[0].to, "Point 3");
        assert_eq!(route.steps[1].to, "Point 2");
    }

    #[test]
    fn rejects_single_waypoint() {
        let graph = test_graphs::cycle_with_chord();
        let result = plan_route(
            &graph,
            &[waypoint_at(&graph, A)],
            &PlannerOptions::default(),
        );
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(matches!(
            plan_route(&graph, &[], &PlannerOptions::default()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_too_many_destinations() {
        let graph = test_graphs::cycle_with_chord();
        let waypoints = vec![waypoint_at(&graph, A); 5];
        let options = PlannerOptions {
            max_destinations: 3,
            ..PlannerOptions::default()
        };

        assert!(matches!(
            plan_route(&graph, &waypoints, &options),
            Err(Error::TooManyWaypoints { given: 4, max: 3 })
        ));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let graph = test_graphs::cycle_with_chord();
        let waypoints = [waypoint_at(&graph, A), Waypoint::new(95.0, 10.0)];
        assert!(matches!(
            plan_route(&graph, &waypoints, &PlannerOptions::default()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn empty_graph_cannot_snap() {
        let graph = RoadGraph::builder().build();
        let waypoints = [Waypoint::new(10.0, 106.0), Waypoint::new(10.1, 106.1)];
        assert!(matches!(
            plan_route(&graph, &waypoints, &PlannerOptions::default()),
            Err(Error::NoPointsFound)
        ));
    }

    #[test]
    fn unreachable_waypoint() {
        let graph = test_graphs::open_cycle_with_chord();
        // Nothing leaves D, and C has to be visited too
        let waypoints = [D, C].map(|id| waypoint_at(&graph, id));
        assert!(matches!(
            plan_route(&graph, &waypoints, &PlannerOptions::default()),
            Err(Error::NoFeasibleRoute)
        ));
    }

    #[test]
    fn same_point_twice() {
        let graph = test_graphs::cycle_with_chord();
        let waypoints = [A, A].map(|id| waypoint_at(&graph, id));

        let route = plan_route(&graph, &waypoints, &PlannerOptions::default()).unwrap();
        assert_eq!(route.total_distance, 0.0);
        assert_eq!(route.polyline.len(), 1);
        assert_eq!(route.steps[0].from, "Point 1");
        assert_eq!(route.steps[0].to, "Point 1");
    }
}
