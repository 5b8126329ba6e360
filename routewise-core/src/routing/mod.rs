//! Route planning algorithms: shortest paths, per-request path cache,
//! visiting order optimization and route assembly

pub mod assembler;
pub mod dijkstra;
mod heuristic;
pub mod labels;
pub mod optimizer;
pub mod permutations;
pub mod segment_cache;

pub use assembler::{AssembledRoute, RouteStep, assemble, round_distance};
pub use dijkstra::shortest_path;
pub use labels::{INTERMEDIATE_LABEL, LabelMap};
pub use optimizer::{OptimizerOptions, optimize};
pub use permutations::Permutations;
pub use segment_cache::SegmentCache;
