//! Seeded shuffling and train/test partitioning of corpus positions.

use anyhow::ensure;
use oorandom::Rand64;

/// Corpus positions assigned to training and held-out evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Fisher–Yates shuffle driven by `seed`.
pub fn shuffle(indices: &mut [usize], seed: u64) {
    let mut rng = Rand64::new(u128::from(seed));
    for i in (1..indices.len()).rev() {
        let j = rng.rand_range(0..(i as u64 + 1)) as usize;
        indices.swap(i, j);
    }
}

/// Partition `0..len` into train and test sets.
///
/// Every position lands in exactly one partition. The train share is
/// `len * train_fraction`, rounded, and never empty for a non-empty corpus.
pub fn split_indices(len: usize, train_fraction: f64, seed: u64) -> anyhow::Result<Split> {
    ensure!(
        train_fraction > 0.0 && train_fraction <= 1.0,
        "train_fraction must be in (0, 1], got {train_fraction}"
    );

    let mut train: Vec<usize> = (0..len).collect();
    shuffle(&mut train, seed);

    let train_len = ((len as f64) * train_fraction).round() as usize;
    let test = train.split_off(train_len.clamp(len.min(1), len));

    Ok(Split { train, test })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_index_lands_in_one_partition() {
        let split = split_indices(100, 0.85, 2024).unwrap();
        assert_eq!(split.train.len(), 85);
        assert_eq!(split.test.len(), 15);

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn split_is_deterministic_for_a_seed() {
        let a = split_indices(50, 0.5, 9).unwrap();
        let b = split_indices(50, 0.5, 9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn full_fraction_keeps_nothing_back() {
        let split = split_indices(7, 1.0, 1).unwrap();
        assert_eq!(split.train.len(), 7);
        assert!(split.test.is_empty());
    }

    #[test]
    fn small_fraction_still_trains_on_one_item() {
        let split = split_indices(3, 0.1, 7).unwrap();
        assert_eq!(split.train.len(), 1);
        assert_eq!(split.test.len(), 2);
    }

    #[test]
    fn empty_corpus_splits_into_nothing() {
        let split = split_indices(0, 0.5, 7).unwrap();
        assert!(split.train.is_empty());
        assert!(split.test.is_empty());
    }

    #[test]
    fn rejects_out_of_range_fraction() {
        assert!(split_indices(10, 0.0, 1).is_err());
        assert!(split_indices(10, 1.01, 1).is_err());
    }

    #[test]
    fn shuffle_permutes_in_place() {
        let mut indices: Vec<usize> = (0..20).collect();
        shuffle(&mut indices, 42);
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }
}
