//! Lexicographic enumeration of `k`-subsets of `0..n`.

/// Yields every `k`-combination of `0..n` as an ascending index vector, in
/// lexicographic order. `k == 0` yields the empty combination once; `k > n`
/// yields nothing.
#[derive(Debug, Clone)]
pub struct ChoiceGenerator {
    n: usize,
    k: usize,
    current: Vec<usize>,
    started: bool,
    done: bool,
}

impl ChoiceGenerator {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            k,
            current: (0..k).collect(),
            started: false,
            done: k > n,
        }
    }
}

impl Iterator for ChoiceGenerator {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.current.clone());
        }
        // Rightmost position that can still move right.
        let Some(i) = (0..self.k).rev().find(|&i| self.current[i] < self.n - self.k + i) else {
            self.done = true;
            return None;
        };
        self.current[i] += 1;
        for j in i + 1..self.k {
            self.current[j] = self.current[j - 1] + 1;
        }
        Some(self.current.clone())
    }
}

/// Every subset of `pool` with size in `0..=max_size`, smallest first, each
/// size in lexicographic order. `max_size < 0` means no bound.
pub fn subsets_up_to<T: Clone>(pool: &[T], max_size: i32) -> impl Iterator<Item = Vec<T>> + '_ {
    let bound = usize::try_from(max_size).map_or(pool.len(), |m| m.min(pool.len()));
    (0..=bound).flat_map(move |k| {
        ChoiceGenerator::new(pool.len(), k).map(move |choice| choice.iter().map(|&i| pool[i].clone()).collect())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicographic_pairs() {
        let all: Vec<Vec<usize>> = ChoiceGenerator::new(4, 2).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
    }

    #[test]
    fn edge_sizes() {
        assert_eq!(ChoiceGenerator::new(3, 0).collect::<Vec<_>>(), vec![Vec::<usize>::new()]);
        assert_eq!(ChoiceGenerator::new(2, 3).count(), 0);
        assert_eq!(ChoiceGenerator::new(5, 5).count(), 1);
        assert_eq!(ChoiceGenerator::new(6, 3).count(), 20);
    }

    #[test]
    fn bounded_subsets() {
        let pool = ['a', 'b', 'c'];
        let sizes: Vec<usize> = subsets_up_to(&pool, 1).map(|s| s.len()).collect();
        assert_eq!(sizes, vec![0, 1, 1, 1]);
        assert_eq!(subsets_up_to(&pool, -1).count(), 8);
    }
}
