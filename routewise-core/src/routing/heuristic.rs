//! Visiting order for many destinations: nearest neighbour construction
//! followed by 2-opt and relocation moves.
//!
//! Works on a directed distance matrix where index 0 is the fixed start and
//! unreachable legs are `f64::INFINITY`. Every move is re-evaluated on the
//! full path, since `d(a, b) != d(b, a)` in general. Paths are compared by
//! their number of unreachable legs first, so moves can repair a broken path.

use std::cmp::Ordering;

const MAX_ITERATIONS: usize = 100;

/// Dense directed distance matrix
pub(crate) struct DistanceMatrix {
    size: usize,
    distances: Vec<f64>,
}

impl DistanceMatrix {
    /// Asks `leg` for every pair except those ending at index 0: the start
    /// is never a target of an open path.
    pub(crate) fn new(size: usize, mut leg: impl FnMut(usize, usize) -> Option<f64>) -> Self {
        let mut distances = vec![f64::INFINITY; size * size];
        for from in 0..size {
            distances[from * size + from] = 0.0;
            for to in (1..size).filter(|&to| to != from) {
                distances[from * size + to] = leg(from, to).unwrap_or(f64::INFINITY);
            }
        }
        Self { size, distances }
    }

    fn get(&self, from: usize, to: usize) -> f64 {
        self.distances[from * self.size + to]
    }

    /// Cost of an open path visiting `order` from left to right
    pub(crate) fn tour_cost(&self, order: &[usize]) -> TourCost {
        order
            .windows(2)
            .map(|leg| self.get(leg[0], leg[1]))
            .fold(TourCost::default(), |cost, leg| {
                if leg.is_finite() {
                    TourCost {
                        distance: cost.distance + leg,
                        ..cost
                    }
                } else {
                    TourCost {
                        unreachable: cost.unreachable + 1,
                        ..cost
                    }
                }
            })
    }
}

/// Unreachable leg count, then the distance over the reachable legs
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct TourCost {
    pub(crate) unreachable: usize,
    pub(crate) distance: f64,
}

impl TourCost {
    pub(crate) fn is_feasible(&self) -> bool {
        self.unreachable == 0
    }

    fn cmp(&self, other: &Self) -> Ordering {
        self.unreachable
            .cmp(&other.unreachable)
            .then(self.distance.total_cmp(&other.distance))
    }

    fn is_better_than(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Less
    }
}

/// Builds an open path starting at index 0 that visits every matrix index.
///
/// Both the nearest neighbour path and the input order are improved; the
/// result is never worse than the input order.
pub(crate) fn plan_order(matrix: &DistanceMatrix) -> Vec<usize> {
    let input: Vec<usize> = (0..matrix.size).collect();

    [nearest_neighbour(matrix), input]
        .into_iter()
        .map(|order| {
            let cost = matrix.tour_cost(&order);
            improve(matrix, order, cost)
        })
        .reduce(|best, candidate| {
            if candidate.1.is_better_than(&best.1) {
                candidate
            } else {
                best
            }
        })
        .map(|(order, _)| order)
        .unwrap_or_default()
}

fn nearest_neighbour(matrix: &DistanceMatrix) -> Vec<usize> {
    let n = matrix.size;
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    let mut current = 0;
    visited[current] = true;
    order.push(current);

    for _ in 1..n {
        let next = (0..n)
            .filter(|&j| !visited[j])
            .filter(|&j| matrix.get(current, j).is_finite())
            .min_by(|&a, &b| {
                matrix
                    .get(current, a)
                    .total_cmp(&matrix.get(current, b))
                    .then(a.cmp(&b))
            });

        let Some(next) = next else {
            // Nothing left is reachable from here, keep input order
            order.extend((0..n).filter(|&j| !visited[j]));
            break;
        };

        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

fn improve(
    matrix: &DistanceMatrix,
    mut order: Vec<usize>,
    mut cost: TourCost,
) -> (Vec<usize>, TourCost) {
    let len = order.len();
    if len <= 2 {
        return (order, cost);
    }

    for _ in 0..MAX_ITERATIONS {
        let mut improved = false;

        // 2-opt: reverse order[i..=j], the start at position 0 stays put
        for i in 1..len - 1 {
            for j in i + 1..len {
                order[i..=j].reverse();
                let candidate = matrix.tour_cost(&order);
                if candidate.is_better_than(&cost) {
                    cost = candidate;
                    improved = true;
                } else {
                    order[i..=j].reverse();
                }
            }
        }

        // Relocation: move one destination to another position
        'relocate: for from in 1..len {
            for to in 1..len {
                if from == to {
                    continue;
                }
                let mut trial = order.clone();
                let node = trial.remove(from);
                trial.insert(to, node);

                let candidate = matrix.tour_cost(&trial);
                if candidate.is_better_than(&cost) {
                    order = trial;
                    cost = candidate;
                    improved = true;
                    break 'relocate;
                }
            }
        }

        if !improved {
            break;
        }
    }

    (order, cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_matrix(positions: &[f64]) -> DistanceMatrix {
        DistanceMatrix::new(positions.len(), |a, b| {
            Some((positions[a] - positions[b]).abs())
        })
    }

    #[test]
    fn points_on_a_line_are_visited_in_sweep_order() {
        // Start at 0, destinations scattered to the right
        let matrix = line_matrix(&[0.0, 7.0, 2.0, 9.0, 4.0, 1.0]);
        let order = plan_order(&matrix);

        assert_eq!(order, vec![0, 5, 2, 4, 1, 3]);
        assert_eq!(matrix.tour_cost(&order).distance, 9.0);
    }

    #[test]
    fn start_stays_first() {
        let matrix = line_matrix(&[5.0, 0.0, 10.0, 3.0, 8.0]);
        let order = plan_order(&matrix);

        assert_eq!(order[0], 0);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn improvement_fixes_greedy_choice() {
        // Greedy sweeps right first and has to come all the way back for -1.5
        let matrix = line_matrix(&[0.0, -1.5, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(matrix.tour_cost(&nearest_neighbour(&matrix)).distance, 11.5);

        let order = plan_order(&matrix);
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(matrix.tour_cost(&order).distance, 8.0);
    }

    #[test]
    fn unreachable_legs_are_infinite() {
        let matrix = DistanceMatrix::new(3, |from, to| (to != 1 || from == 0).then_some(1.0));
        let order = plan_order(&matrix);

        assert_eq!(order, vec![0, 1, 2]);
        assert!(matrix.tour_cost(&order).is_feasible());
    }

    /// Directed legs, `None` where unreachable
    fn matrix_from(legs: &[&[Option<f64>]]) -> DistanceMatrix {
        DistanceMatrix::new(legs.len(), |from, to| legs[from][to])
    }

    #[test]
    fn start_column_is_never_queried() {
        let mut asked = Vec::new();
        DistanceMatrix::new(4, |from, to| {
            asked.push((from, to));
            Some(1.0)
        });

        assert!(asked.iter().all(|&(from, to)| to != 0 && from != to));
        assert_eq!(asked.len(), 9);
    }

    #[test]
    fn dead_end_greedy_path_is_repaired() {
        // Greedy goes 0 -> 2 -> 3 and cannot reach 1 any more
        let matrix = matrix_from(&[
            &[None, Some(5.0), Some(1.0), Some(5.0)],
            &[None, None, Some(5.0), Some(5.0)],
            &[None, None, None, Some(1.0)],
            &[None, None, None, None],
        ]);
        assert!(!matrix.tour_cost(&nearest_neighbour(&matrix)).is_feasible());

        let order = plan_order(&matrix);
        assert_eq!(order, vec![0, 1, 2, 3]);
        assert_eq!(
            matrix.tour_cost(&order),
            TourCost {
                unreachable: 0,
                distance: 11.0
            }
        );
    }

    #[test]
    fn never_worse_than_input_order_on_directed_matrices() {
        let mut state = 0x2545_f491_4f6c_dd1d_u64;
        let mut next = move |bound: u64| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (state >> 33) % bound
        };

        for round in 0..300 {
            let size = 10;
            let mut legs = vec![vec![None; size]; size];
            for (from, row) in legs.iter_mut().enumerate() {
                for (to, leg) in row.iter_mut().enumerate() {
                    // Consecutive indices stay connected so the input order is feasible
                    let keep = to == from + 1 || next(100) < 35;
                    if to != 0 && to != from && keep {
                        *leg = Some((next(50) + 1) as f64);
                    }
                }
            }
            let matrix = DistanceMatrix::new(size, |from, to| legs[from][to]);
            let input: Vec<usize> = (0..size).collect();
            let input_cost = matrix.tour_cost(&input);
            assert!(input_cost.is_feasible());

            let order = plan_order(&matrix);
            let cost = matrix.tour_cost(&order);
            assert_eq!(order[0], 0, "round {round}");
            assert!(cost.is_feasible(), "round {round}: {order:?}");
            assert!(
                cost.distance <= input_cost.distance,
                "round {round}: {} > {}",
                cost.distance,
                input_cost.distance
            );
        }
    }
}
