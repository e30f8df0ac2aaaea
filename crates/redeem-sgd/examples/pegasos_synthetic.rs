use anyhow::{Context, Result};
use log::LevelFilter;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use redeem_sgd::scorer::accuracy;
use redeem_sgd::{
    build_dataset, objective, predict, train_many, Dataset, LearnerFamily, Row, TrainConfig,
};

/// Two noisy clusters in a sparse 1000-dimensional space. Every row touches
/// the two informative features plus a handful of random noise features.
fn synthetic_rows(n: usize, seed: u64) -> Vec<Row> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let label = if i % 2 == 0 { 1.0 } else { -1.0 };
            let mut features: Vec<(usize, f64)> = vec![
                (0, label * 2.0 + rng.gen_range(-1.0..1.0)),
                (1, label * 1.5 + rng.gen_range(-1.0..1.0)),
            ];
            for _ in 0..5 {
                features.push((rng.gen_range(2..1000), rng.gen_range(-0.5..0.5)));
            }
            features.sort_by_key(|(index, _)| *index);
            features.dedup_by_key(|(index, _)| *index);
            let (indices, values): (Vec<usize>, Vec<f64>) = features.into_iter().unzip();
            (indices, values, label)
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("REDEEM_LOG", "error,redeem_sgd=info"))
        .init();

    let train_set: Dataset = build_dataset(synthetic_rows(2_000, 1), 1_000)
        .context("Failed to build training set")?;
    let test_set: Dataset = build_dataset(synthetic_rows(500, 2), 1_000)
        .context("Failed to build test set")?;
    train_set.log_summary();

    let families = [
        LearnerFamily::SvmPegasos,
        LearnerFamily::SvmSgd,
        LearnerFamily::Logreg,
        LearnerFamily::LogregPegasos,
        LearnerFamily::LmsRegression,
    ];
    let configs = families
        .iter()
        .map(|&family| {
            TrainConfig::builder()
                .iterations(20_000)
                .dimensionality(1_000)
                .lambda(0.01)
                .learner_family(family)
                .build()
        })
        .collect::<redeem_sgd::Result<Vec<_>>>()?;

    let results = train_many(&train_set, &configs);

    println!("{:<16} {:>10} {:>10} {:>10}", "learner", "train acc", "test acc", "objective");
    for (config, result) in configs.iter().zip(results) {
        let weights = result.with_context(|| format!("Training {} failed", config.learner_family()))?;
        let train_acc = accuracy(&predict(&weights, &train_set), &train_set);
        let test_acc = accuracy(&predict(&weights, &test_set), &test_set);
        println!(
            "{:<16} {:>10.4} {:>10.4} {:>10.4}",
            config.learner_family().to_string(),
            train_acc,
            test_acc,
            objective(&weights, &train_set, config)
        );
    }

    Ok(())
}
