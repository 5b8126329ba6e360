//! Visiting order optimization for a fixed start and a set of destinations
//!
//! Up to [`OptimizerOptions::exhaustive_limit`] destinations every order is
//! tried, which costs `k!` path evaluations: the exhaustive search is only
//! practical for small `k`. Larger inputs fall back to a local search that
//! gives no optimality guarantee.

use itertools::Itertools;
use log::debug;
use rayon::prelude::*;

use super::heuristic::{DistanceMatrix, plan_order};
use super::permutations::{Permutations, factorial, permutation_at};
use super::segment_cache::SegmentCache;
use crate::model::Route;
use crate::{Error, NodeId};

/// Largest destination count ever searched exhaustively (12! orders)
pub const MAX_EXHAUSTIVE_LIMIT: usize = 12;
pub const DEFAULT_EXHAUSTIVE_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerOptions {
    /// Destination count up to which every visiting order is evaluated
    pub exhaustive_limit: usize,
    /// Search segments and evaluate orders on the rayon pool
    pub parallel: bool,
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        Self {
            exhaustive_limit: DEFAULT_EXHAUSTIVE_LIMIT,
            parallel: false,
        }
    }
}

/// Finds the order of `destinations` that minimizes the distance travelled from `start`.
///
/// Orders are enumerated lexicographically over the input positions and a
/// later order only replaces the best one on a strictly shorter distance, so
/// among equally short orders the first enumerated wins. Orders containing an
/// unreachable leg are discarded.
///
/// # Errors
///
/// Returns [`Error::NoFeasibleRoute`] if every order contains an unreachable leg
pub fn optimize(
    cache: &mut SegmentCache<'_>,
    start: NodeId,
    destinations: &[NodeId],
    options: &OptimizerOptions,
) -> Result<Route, Error> {
    let limit = options.exhaustive_limit.min(MAX_EXHAUSTIVE_LIMIT);

    let order = if destinations.len() > limit {
        debug!(
            "{} destinations exceed the exhaustive limit of {limit}, using local search",
            destinations.len()
        );
        local_search(cache, start, destinations, options.parallel)
    } else if options.parallel {
        exhaustive_parallel(cache, start, destinations)
    } else {
        exhaustive(cache, start, destinations)
    };
    let order = order.ok_or(Error::NoFeasibleRoute)?;

    build_route(cache, start, destinations, &order)
}

/// Distance of `start` followed by `destinations` in `order`, `None` if a leg is unreachable
fn path_distance(
    mut leg: impl FnMut(NodeId, NodeId) -> Option<f64>,
    start: NodeId,
    destinations: &[NodeId],
    order: &[usize],
) -> Option<f64> {
    std::iter::once(start)
        .chain(order.iter().map(|&index| destinations[index]))
        .tuple_windows()
        .try_fold(0.0, |total, (from, to)| Some(total + leg(from, to)?))
}

fn exhaustive(
    cache: &mut SegmentCache<'_>,
    start: NodeId,
    destinations: &[NodeId],
) -> Option<Vec<usize>> {
    let mut best: Option<(f64, Vec<usize>)> = None;
    let mut permutations = Permutations::new(destinations.len());

    while let Some(order) = permutations.next_permutation() {
        let Some(distance) =
            path_distance(|from, to| cache.distance(from, to), start, destinations, order)
        else {
            continue;
        };

        if best.as_ref().is_none_or(|(shortest, _)| distance < *shortest) {
            best = Some((distance, order.to_vec()));
        }
    }

    best.map(|(_, order)| order)
}

/// Same result as [`exhaustive`]: ties are resolved by the lexicographic rank
fn exhaustive_parallel(
    cache: &mut SegmentCache<'_>,
    start: NodeId,
    destinations: &[NodeId],
) -> Option<Vec<usize>> {
    let k = destinations.len();
    let total = factorial(k)?;
    cache.prefetch(leg_pairs(start, destinations), true);
    let cache = &*cache;

    (0..total)
        .into_par_iter()
        .filter_map(|rank| {
            let order = permutation_at(k, rank);
            let distance = path_distance(
                |from, to| cache.cached_distance(from, to),
                start,
                destinations,
                &order,
            )?;
            Some((distance, rank, order))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
        .map(|(_, _, order)| order)
}

fn local_search(
    cache: &mut SegmentCache<'_>,
    start: NodeId,
    destinations: &[NodeId],
    parallel: bool,
) -> Option<Vec<usize>> {
    cache.prefetch(leg_pairs(start, destinations), parallel);

    // Matrix index 0 is the start, index i is destination i - 1
    let stops: Vec<NodeId> = std::iter::once(start)
        .chain(destinations.iter().copied())
        .collect();
    let matrix = DistanceMatrix::new(stops.len(), |from, to| {
        cache.cached_distance(stops[from], stops[to])
    });

    let order = plan_order(&matrix);
    matrix
        .tour_cost(&order)
        .is_feasible()
        .then(|| order.into_iter().skip(1).map(|index| index - 1).collect())
}

/// Every ordered pair a visiting order may use
fn leg_pairs(start: NodeId, destinations: &[NodeId]) -> Vec<(NodeId, NodeId)> {
    let sources = std::iter::once(start).chain(destinations.iter().copied());

    sources
        .enumerate()
        .flat_map(move |(source_position, from)| {
            destinations
                .iter()
                .enumerate()
                .filter(move |(target_index, _)| target_index + 1 != source_position)
                .map(move |(_, &to)| (from, to))
        })
        .collect()
}

fn build_route(
    cache: &mut SegmentCache<'_>,
    start: NodeId,
    destinations: &[NodeId],
    order: &[usize],
) -> Result<Route, Error> {
    let stops: Vec<NodeId> = std::iter::once(start)
        .chain(order.iter().map(|&index| destinations[index]))
        .collect();

    let segments = stops
        .iter()
        .tuple_windows()
        .map(|(&from, &to)| cache.get(from, to).cloned().ok_or(Error::NoFeasibleRoute))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Route::new(stops, segments))
}
