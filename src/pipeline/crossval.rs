//! Shuffled k-fold splitting.

use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KFold {
    pub n_splits: usize,
    pub seed: u64,
}

/// Training and test row indices of one fold.
pub type Split = (Vec<usize>, Vec<usize>);

impl KFold {
    pub fn new(n_splits: usize, seed: u64) -> Self {
        KFold { n_splits, seed }
    }

    /// Shuffle `0..n` with the seed and cut it into `n_splits` test folds.
    /// The first `n % n_splits` folds get one extra row.
    pub fn split(&self, n: usize) -> Result<Vec<Split>> {
        if self.n_splits < 2 {
            return Err(Error::Config(format!(
                "k-fold needs at least 2 splits, got {}",
                self.n_splits
            )));
        }
        if n < self.n_splits {
            return Err(Error::Config(format!(
                "cannot split {n} rows into {} folds",
                self.n_splits
            )));
        }

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);

        let base = n / self.n_splits;
        let extra = n % self.n_splits;
        let mut splits = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold in 0..self.n_splits {
            let size = base + usize::from(fold < extra);
            let test = indices[start..start + size].to_vec();
            let train = indices[..start]
                .iter()
                .chain(&indices[start + size..])
                .copied()
                .collect();
            splits.push((train, test));
            start += size;
        }
        Ok(splits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folds_partition_rows() {
        let splits = KFold::new(3, 7).split(10).unwrap();
        let sizes: Vec<usize> = splits.iter().map(|(_, test)| test.len()).collect();
        assert_eq!(sizes, vec![4, 3, 3]);

        let mut seen: Vec<usize> = splits.iter().flat_map(|(_, test)| test.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());

        for (train, test) in &splits {
            assert_eq!(train.len() + test.len(), 10);
            assert!(test.iter().all(|i| !train.contains(i)));
        }
    }

    #[test]
    fn test_same_seed_same_folds() {
        assert_eq!(KFold::new(5, 1).split(20).unwrap(), KFold::new(5, 1).split(20).unwrap());
    }

    #[test]
    fn test_too_few_rows() {
        assert!(KFold::new(5, 1).split(4).is_err());
        assert!(KFold::new(1, 1).split(4).is_err());
    }
}
