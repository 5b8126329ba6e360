//! Street network components - nodes, edges and edge cost resolution

use geo::Point;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::FALLBACK_EDGE_WEIGHT;

/// Road graph node
#[derive(Debug, Clone)]
pub struct RoadNode {
    /// External (data source) ID of the node
    pub id: u64,
    /// Node coordinates, x = longitude, y = latitude
    pub geometry: Point<f64>,
}

impl RoadNode {
    pub fn new(id: u64, lat: f64, lon: f64) -> Self {
        Self {
            id,
            geometry: Point::new(lon, lat),
        }
    }

    pub fn lat(&self) -> f64 {
        self.geometry.y()
    }

    pub fn lon(&self) -> f64 {
        self.geometry.x()
    }
}

/// Road graph edge (directed street segment)
///
/// Attributes are kept exactly as the data source delivered them, so a
/// `length` may be a number, a numeric string or something unusable such
/// as a list of values from a merged way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadEdge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<Value>,
}

/// Outcome of resolving the traversal cost of an edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeCost {
    /// Cost read from the edge's `weight` or `length` attribute
    Parsed(f64),
    /// Neither attribute holds a usable number
    Fallback,
}

impl EdgeCost {
    pub fn value(self) -> f64 {
        match self {
            EdgeCost::Parsed(cost) => cost,
            EdgeCost::Fallback => FALLBACK_EDGE_WEIGHT,
        }
    }

    pub fn is_fallback(self) -> bool {
        matches!(self, EdgeCost::Fallback)
    }
}

impl RoadEdge {
    pub fn new(weight: Option<Value>, length: Option<Value>) -> Self {
        Self { weight, length }
    }

    /// Edge whose only attribute is a numeric length in meters
    pub fn with_length(length: f64) -> Self {
        Self {
            weight: None,
            length: Some(Value::from(length)),
        }
    }

    /// Length used to choose between parallel edges
    pub fn raw_length(&self) -> f64 {
        self.length
            .as_ref()
            .and_then(parse_attribute)
            .unwrap_or(FALLBACK_EDGE_WEIGHT)
    }

    /// Traversal cost: `weight`, then `length`, then the fallback constant
    pub fn cost(&self) -> EdgeCost {
        self.weight
            .as_ref()
            .and_then(parse_attribute)
            .or_else(|| self.length.as_ref().and_then(parse_attribute))
            .map_or(EdgeCost::Fallback, EdgeCost::Parsed)
    }
}

/// Reads a raw attribute as a non-negative finite number
pub fn parse_attribute(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn weight_takes_precedence_over_length() {
        let edge = RoadEdge::new(Some(json!(7.5)), Some(json!(12.0)));
        assert_eq!(edge.cost(), EdgeCost::Parsed(7.5));
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let edge = RoadEdge::new(None, Some(json!(" 42.25 ")));
        assert_eq!(edge.cost(), EdgeCost::Parsed(42.25));
        assert_eq!(edge.raw_length(), 42.25);
    }

    #[test]
    fn invalid_weight_falls_through_to_length() {
        let edge = RoadEdge::new(Some(json!("n/a")), Some(json!(3)));
        assert_eq!(edge.cost(), EdgeCost::Parsed(3.0));
    }

    #[test]
    fn list_valued_length_uses_fallback() {
        let edge = RoadEdge::new(None, Some(json!([12.0, 30.5])));
        let cost = edge.cost();
        assert!(cost.is_fallback());
        assert_eq!(cost.value(), 1.0);
        assert_eq!(edge.raw_length(), 1.0);
    }

    #[test]
    fn missing_attributes_use_fallback() {
        assert_eq!(RoadEdge::default().cost().value(), FALLBACK_EDGE_WEIGHT);
    }

    #[test]
    fn negative_and_non_finite_values_are_rejected() {
        assert_eq!(parse_attribute(&json!(-4.0)), None);
        assert_eq!(parse_attribute(&json!("NaN")), None);
        assert_eq!(parse_attribute(&json!("inf")), None);
        assert_eq!(parse_attribute(&json!(null)), None);
        assert_eq!(parse_attribute(&json!({"value": 3})), None);
    }
}
