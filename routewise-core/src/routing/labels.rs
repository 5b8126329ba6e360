use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::NodeId;

/// Label of nodes that were not chosen by the user
pub const INTERMEDIATE_LABEL: &str = "Intermediate point";

/// Display labels of the waypoint nodes: "Point 1", "Point 2", ...
///
/// When several waypoints snap to the same node, the earliest waypoint
/// keeps its label.
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    labels: HashMap<NodeId, String>,
}

impl LabelMap {
    /// Builds labels from the snapped waypoints in their input order
    pub fn from_nodes(nodes: &[NodeId]) -> Self {
        let mut labels = HashMap::with_capacity(nodes.len());

        for (position, &node) in nodes.iter().enumerate() {
            match labels.entry(node) {
                Entry::Vacant(entry) => {
                    entry.insert(format!("Point {}", position + 1));
                }
                Entry::Occupied(entry) => {
                    log::warn!(
                        "Point {} snaps to the same node as {}, keeping the first label",
                        position + 1,
                        entry.get()
                    );
                }
            }
        }

        Self { labels }
    }

    pub fn label(&self, node: NodeId) -> &str {
        self.labels
            .get(&node)
            .map_or(INTERMEDIATE_LABEL, String::as_str)
    }
}
