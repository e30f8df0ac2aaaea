//! Synthetic data shared by the integration tests.
#![allow(dead_code)]

use rand::distributions::Distribution;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use statrs::distribution::Normal;

use redeem_sgd::{build_dataset, Dataset, Row};

/// Two 2-D Gaussian clusters (unit variance) centred at (-5,-5) and (5,5),
/// labelled -1 and +1, alternating.
pub fn gaussian_rows(n: usize, seed: u64) -> Vec<Row> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let positive = Normal::new(5.0, 1.0).unwrap();
    let negative = Normal::new(-5.0, 1.0).unwrap();
    (0..n)
        .map(|i| {
            let (dist, label) = if i % 2 == 0 {
                (&positive, 1.0)
            } else {
                (&negative, -1.0)
            };
            let a = dist.sample(&mut rng);
            let b = dist.sample(&mut rng);
            (vec![0, 1], vec![a, b], label)
        })
        .collect()
}

pub fn gaussian_clusters(n: usize, seed: u64) -> Dataset {
    build_dataset(gaussian_rows(n, seed), 2).unwrap()
}

/// Rows whose label is the noiseless linear function `2·x0 - 3·x1`.
pub fn linear_regression_rows(n: usize, seed: u64) -> Vec<Row> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let a: f64 = rng.gen_range(-1.0..1.0);
            let b: f64 = rng.gen_range(-1.0..1.0);
            (vec![0, 1], vec![a, b], 2.0 * a - 3.0 * b)
        })
        .collect()
}

/// Skewed dataset: `negatives` rows labelled -1 followed by `positives` rows
/// labelled +1, each with a single distinct feature.
pub fn skewed(negatives: usize, positives: usize) -> Dataset {
    let total = negatives + positives;
    let rows = (0..total).map(|i| {
        let label = if i < negatives { -1.0 } else { 1.0 };
        (vec![i], vec![1.0], label)
    });
    build_dataset(rows, total).unwrap()
}
