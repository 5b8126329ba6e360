//! Values produced while planning a route

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::{Error, NodeId};

/// User supplied location to visit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
}

impl Waypoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Position as a geo point (x = lon, y = lat)
    pub fn point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    /// Checks that the coordinates are finite and inside WGS84 bounds
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] otherwise
    pub fn validate(&self) -> Result<(), Error> {
        let valid = self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon);

        if valid {
            Ok(())
        } else {
            Err(Error::InvalidInput(format!(
                "Coordinates ({}, {}) are out of range",
                self.lat, self.lon
            )))
        }
    }
}

impl From<[f64; 2]> for Waypoint {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

/// Shortest path between two specific nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    nodes: Vec<NodeId>,
    distance: f64,
}

impl Segment {
    pub(crate) fn new(nodes: Vec<NodeId>, distance: f64) -> Self {
        debug_assert!(!nodes.is_empty());
        Self { nodes, distance }
    }

    /// Nodes from start to end, both included
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Total distance in meters
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn start(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn end(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// Number of points on the path
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A segment from a node to itself
    pub fn is_degenerate(&self) -> bool {
        self.nodes.len() == 1
    }
}

/// Itinerary chosen by the optimizer: the visiting order and one segment per leg
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    stops: Vec<NodeId>,
    segments: Vec<Segment>,
    distance: f64,
}

impl Route {
    pub(crate) fn new(stops: Vec<NodeId>, segments: Vec<Segment>) -> Self {
        debug_assert_eq!(stops.len(), segments.len() + 1);
        let distance = segments.iter().map(Segment::distance).sum();
        Self {
            stops,
            segments,
            distance,
        }
    }

    /// Start node followed by the destinations in visiting order
    pub fn stops(&self) -> &[NodeId] {
        &self.stops
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Total distance in meters
    pub fn distance(&self) -> f64 {
        self.distance
    }
}
