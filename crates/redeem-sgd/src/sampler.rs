//! Example selection for the training loop.
//!
//! Each sampler owns its own seeded random stream, so two runs with the same
//! seed visit the same positions and concurrent runs never share state.
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::LoopPolicy;
use crate::data_handling::{ClassIndex, Dataset};
use crate::error::{Result, SgdError};

#[derive(Debug, Clone)]
enum Strategy<'a> {
    Stochastic { len: usize },
    Balanced { positive: &'a [usize], negative: &'a [usize] },
}

#[derive(Debug, Clone)]
pub struct Sampler<'a> {
    strategy: Strategy<'a>,
    rng: Xoshiro256PlusPlus,
}

impl<'a> Sampler<'a> {
    /// Create a sampler over `dataset` for `policy`.
    ///
    /// Fails with `EmptyDataset` for an empty dataset and with
    /// `DegenerateDataset` when balanced sampling is requested but one class
    /// has no members.
    pub fn new(dataset: &'a Dataset, policy: LoopPolicy, seed: u64) -> Result<Self> {
        if dataset.is_empty() {
            return Err(SgdError::EmptyDataset);
        }
        let strategy = match policy {
            LoopPolicy::Stochastic => Strategy::Stochastic { len: dataset.len() },
            LoopPolicy::BalancedStochastic => {
                let ClassIndex { positive, negative } = dataset.class_index();
                dataset.class_index().require_both_classes()?;
                Strategy::Balanced {
                    positive: positive.as_slice(),
                    negative: negative.as_slice(),
                }
            }
        };
        Ok(Self {
            strategy,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        })
    }

    /// Position to train on at iteration `t` (1-indexed).
    ///
    /// Under balanced sampling even `t` draws from the positive class and odd
    /// `t` from the negative class.
    pub fn next_position(&mut self, t: usize) -> usize {
        match &self.strategy {
            Strategy::Stochastic { len } => self.rng.gen_range(0..*len),
            Strategy::Balanced { positive, negative } => {
                let class = if t % 2 == 0 { positive } else { negative };
                class[self.rng.gen_range(0..class.len())]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handling::build_dataset;

    fn skewed() -> Dataset {
        let mut rows = vec![(vec![0], vec![1.0], -1.0); 9];
        rows.push((vec![1], vec![1.0], 1.0));
        build_dataset(rows, 2).unwrap()
    }

    #[test]
    fn stochastic_covers_range() {
        let ds = skewed();
        let mut sampler = Sampler::new(&ds, LoopPolicy::Stochastic, 7).unwrap();
        let mut seen = [false; 10];
        for t in 1..=2000 {
            let p = sampler.next_position(t);
            assert!(p < 10);
            seen[p] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn balanced_alternates_classes() {
        let ds = skewed();
        let mut sampler = Sampler::new(&ds, LoopPolicy::BalancedStochastic, 7).unwrap();
        for t in 1..=100 {
            let p = sampler.next_position(t);
            let label = ds.get(p).unwrap().label();
            if t % 2 == 0 {
                assert_eq!(label, 1.0);
            } else {
                assert_eq!(label, -1.0);
            }
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let ds = skewed();
        let mut a = Sampler::new(&ds, LoopPolicy::Stochastic, 11).unwrap();
        let mut b = Sampler::new(&ds, LoopPolicy::Stochastic, 11).unwrap();
        let sa: Vec<usize> = (1..=50).map(|t| a.next_position(t)).collect();
        let sb: Vec<usize> = (1..=50).map(|t| b.next_position(t)).collect();
        assert_eq!(sa, sb);
    }

    #[test]
    fn balanced_requires_both_classes() {
        let ds = build_dataset(vec![(vec![0], vec![1.0], 1.0)], 1).unwrap();
        assert!(matches!(
            Sampler::new(&ds, LoopPolicy::BalancedStochastic, 0),
            Err(SgdError::DegenerateDataset { .. })
        ));
        assert!(Sampler::new(&ds, LoopPolicy::Stochastic, 0).is_ok());
    }

    #[test]
    fn empty_dataset_rejected() {
        let ds = build_dataset(Vec::new(), 4).unwrap();
        assert!(matches!(
            Sampler::new(&ds, LoopPolicy::Stochastic, 0),
            Err(SgdError::EmptyDataset)
        ));
    }
}
