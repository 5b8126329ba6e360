use serde::Deserialize;
use serde_json::Value;

/// Road graph as exported by the graph preparation pipeline
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct GraphDocument {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Deserialize)]
pub struct NodeRecord {
    pub id: u64,
    #[serde(alias = "y")]
    pub lat: f64,
    #[serde(alias = "x")]
    pub lon: f64,
}

/// Directed edge; `weight` and `length` are kept untyped
#[derive(Debug, Deserialize)]
pub struct EdgeRecord {
    #[serde(alias = "u")]
    pub from: u64,
    #[serde(alias = "v")]
    pub to: u64,
    #[serde(default)]
    pub weight: Option<Value>,
    #[serde(default)]
    pub length: Option<Value>,
}
