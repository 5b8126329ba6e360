//! Turns the optimized route into one polyline and a step by step report

use geo::{Coord, LineString};
use geojson::{Feature, Geometry, Value as GeoJsonValue};
use serde::Serialize;
use serde_json::json;

use super::labels::LabelMap;
use crate::model::{RoadGraph, Route, Segment};
use crate::{DISTANCE_DECIMALS, Error, NodeId};

/// One leg of the assembled route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStep {
    /// 1-based position of the leg
    pub step: usize,
    pub from: String,
    pub to: String,
    /// Leg distance in meters, rounded to [`DISTANCE_DECIMALS`] places
    pub distance: f64,
}

/// Final route: continuous polyline, legs and total distance
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledRoute {
    /// `[lat, lon]` points without repeated leg boundaries
    pub polyline: Vec<[f64; 2]>,
    pub steps: Vec<RouteStep>,
    /// Total distance in meters, rounded to [`DISTANCE_DECIMALS`] places
    pub total_distance: f64,
    /// Start node followed by the destinations in visiting order
    pub stops: Vec<NodeId>,
}

/// Stitches the segments of `route` together and labels every leg.
///
/// The first segment contributes all of its points; every following segment
/// skips its first point, which is the last point of the previous one.
///
/// # Errors
///
/// Returns [`Error::InvalidNodeIndex`] if a segment node is not part of `graph`
pub fn assemble(
    graph: &RoadGraph,
    route: &Route,
    labels: &LabelMap,
) -> Result<AssembledRoute, Error> {
    let segments = route.segments();
    let point_count = segments.iter().map(Segment::len).sum::<usize>()
        - segments.len().saturating_sub(1);

    let mut polyline = Vec::with_capacity(point_count);
    let mut steps = Vec::with_capacity(segments.len());

    for (index, segment) in segments.iter().enumerate() {
        let skip = usize::from(index > 0);
        for &node in &segment.nodes()[skip..] {
            polyline.push(graph.coordinates(node).ok_or(Error::InvalidNodeIndex)?);
        }

        steps.push(RouteStep {
            step: index + 1,
            from: labels.label(segment.start()).to_owned(),
            to: labels.label(segment.end()).to_owned(),
            distance: round_distance(segment.distance()),
        });
    }

    Ok(AssembledRoute {
        polyline,
        steps,
        total_distance: round_distance(route.distance()),
        stops: route.stops().to_vec(),
    })
}

/// Rounds meters to [`DISTANCE_DECIMALS`] places
pub fn round_distance(meters: f64) -> f64 {
    let scale = 10f64.powi(DISTANCE_DECIMALS);
    (meters * scale).round() / scale
}

impl AssembledRoute {
    /// Converts the route to a `GeoJSON` `LineString` feature (lon/lat order)
    /// carrying the steps and the total distance as properties.
    pub fn to_geojson(&self) -> Result<Feature, Error> {
        let line: LineString<f64> = self
            .polyline
            .iter()
            .map(|&[lat, lon]| Coord { x: lon, y: lat })
            .collect();
        let geometry = Geometry::new(GeoJsonValue::from(&line));

        let value = json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": {
                "steps": self.steps,
                "total_distance": self.total_distance,
            }
        });

        serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}
