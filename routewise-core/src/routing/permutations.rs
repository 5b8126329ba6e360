//! Lexicographic permutations of `0..k`, generated one at a time

/// Restartable generator of the permutations of `0..k` in lexicographic order.
///
/// Only the current permutation is kept in memory.
#[derive(Debug, Clone)]
pub struct Permutations {
    indices: Vec<usize>,
    started: bool,
    exhausted: bool,
}

impl Permutations {
    pub fn new(k: usize) -> Self {
        Self {
            indices: (0..k).collect(),
            started: false,
            exhausted: false,
        }
    }

    /// Rewinds to the identity permutation
    pub fn reset(&mut self) {
        self.indices.sort_unstable();
        self.started = false;
        self.exhausted = false;
    }

    /// Advances to the next permutation. The first call yields the identity.
    pub fn next_permutation(&mut self) -> Option<&[usize]> {
        if self.exhausted {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.as_slice());
        }

        let indices = &mut self.indices;
        // Rightmost ascent
        let Some(pivot) = (1..indices.len())
            .rev()
            .find(|&i| indices[i - 1] < indices[i])
            .map(|i| i - 1)
        else {
            self.exhausted = true;
            return None;
        };

        let successor = (pivot + 1..indices.len())
            .rev()
            .find(|&j| indices[j] > indices[pivot])
            .unwrap_or(pivot + 1);
        indices.swap(pivot, successor);
        indices[pivot + 1..].reverse();

        Some(self.indices.as_slice())
    }
}

impl Iterator for Permutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_permutation().map(<[usize]>::to_vec)
    }
}

/// `k!`, or `None` when it does not fit in `usize`
pub fn factorial(k: usize) -> Option<usize> {
    (1..=k).try_fold(1usize, |acc, n| acc.checked_mul(n))
}

/// The permutation at position `rank` of the lexicographic order over `0..k`
pub fn permutation_at(k: usize, mut rank: usize) -> Vec<usize> {
    let mut available: Vec<usize> = (0..k).collect();
    let mut permutation = Vec::with_capacity(k);

    for position in 0..k {
        let block = factorial(k - 1 - position).unwrap_or(usize::MAX);
        let index = (rank / block).min(available.len() - 1);
        rank %= block;
        permutation.push(available.remove(index));
    }

    permutation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_elements_in_lexicographic_order() {
        let all: Vec<Vec<usize>> = Permutations::new(3).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 1, 2],
                vec![0, 2, 1],
                vec![1, 0, 2],
                vec![1, 2, 0],
                vec![2, 0, 1],
                vec![2, 1, 0],
            ]
        );
    }

    #[test]
    fn counts_match_factorial() {
        for k in 0..=6 {
            assert_eq!(Permutations::new(k).count(), factorial(k).unwrap());
        }
    }

    #[test]
    fn empty_and_single() {
        assert_eq!(Permutations::new(0).collect::<Vec<_>>(), vec![Vec::<usize>::new()]);
        assert_eq!(Permutations::new(1).collect::<Vec<_>>(), vec![vec![0]]);
    }

    #[test]
    fn reset_restarts_the_sequence() {
        let mut permutations = Permutations::new(4);
        let first: Vec<Vec<usize>> = permutations.by_ref().take(5).collect();
        permutations.reset();
        let again: Vec<Vec<usize>> = permutations.by_ref().take(5).collect();
        assert_eq!(first, again);

        // Exhausted generators can be restarted too
        permutations.by_ref().for_each(drop);
        permutations.reset();
        assert_eq!(permutations.count(), 24);
    }

    #[test]
    fn ranks_follow_generation_order() {
        for k in 0..=5 {
            for (rank, permutation) in Permutations::new(k).enumerate() {
                assert_eq!(permutation_at(k, rank), permutation, "k = {k}, rank = {rank}");
            }
        }
    }

    #[test]
    fn factorial_overflow() {
        assert_eq!(factorial(0), Some(1));
        assert_eq!(factorial(10), Some(3_628_800));
        assert_eq!(factorial(200), None);
    }
}
