mod shortest_path;
mod state;

pub use shortest_path::{cheapest_edges, shortest_path};
