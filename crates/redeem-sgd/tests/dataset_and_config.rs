//! Dataset validation and configuration parsing through the public API.

mod common;

use redeem_sgd::scorer::{predictions, score};
use redeem_sgd::{
    build_dataset, Dataset, EtaSchedule, LearnerFamily, LoopPolicy, PredictionType, SgdError,
    SparseVector, TrainConfig, WeightVector,
};

fn invalid_position(result: redeem_sgd::Result<Dataset>) -> usize {
    match result {
        Err(SgdError::InvalidVector { position, .. }) => position,
        other => panic!("expected InvalidVector, got {:?}", other.map(|d| d.len())),
    }
}

// ---------------------------------------------------------------------------
// Dataset construction
// ---------------------------------------------------------------------------

#[test]
fn malformed_rows_report_their_position() {
    let good = (vec![0, 1], vec![1.0, 2.0], 1.0);

    // index out of range
    let rows = vec![good.clone(), (vec![0, 4], vec![1.0, 1.0], -1.0)];
    assert_eq!(invalid_position(build_dataset(rows, 4)), 1);

    // duplicate index
    let rows = vec![good.clone(), good.clone(), (vec![2, 2], vec![1.0, 1.0], 1.0)];
    assert_eq!(invalid_position(build_dataset(rows, 4)), 2);

    // descending indices
    let rows = vec![(vec![3, 1], vec![1.0, 1.0], 1.0)];
    assert_eq!(invalid_position(build_dataset(rows, 4)), 0);

    // length mismatch
    let rows = vec![good.clone(), (vec![1], vec![1.0, 2.0], 1.0)];
    assert_eq!(invalid_position(build_dataset(rows, 4)), 1);

    // non-finite value and label
    let rows = vec![(vec![1], vec![f64::NAN], 1.0)];
    assert_eq!(invalid_position(build_dataset(rows, 4)), 0);
    let rows = vec![good.clone(), (vec![1], vec![1.0], f64::INFINITY)];
    assert_eq!(invalid_position(build_dataset(rows, 4)), 1);
}

#[test]
fn empty_vectors_and_zero_labels_are_accepted() {
    let ds = build_dataset(
        vec![
            (vec![], vec![], 1.0),
            (vec![2], vec![0.5], 0.0),
            (vec![0], vec![1.0], -1.0),
        ],
        3,
    )
    .unwrap();

    assert_eq!(ds.len(), 3);
    assert!(ds.get(0).unwrap().is_empty());
    // label 0 falls on the negative side
    assert_eq!(ds.count_positive(), 1);
    assert_eq!(ds.count_negative(), 2);
}

#[test]
fn bias_term_reserves_index_zero() {
    let mut builder = Dataset::builder(3).with_bias_term(true);
    builder.push_row(vec![1, 2], vec![0.5, 0.25], 1.0).unwrap();
    builder.push_dense_row(&[0.0, 2.0], -1.0).unwrap();
    assert!(matches!(
        builder.push_row(vec![0], vec![1.0], 1.0),
        Err(SgdError::InvalidVector { position: 2, .. })
    ));

    let ds = builder.build();
    assert!(ds.has_bias_term());
    assert_eq!(ds.get(0).unwrap().indices(), &[0, 1, 2]);
    assert_eq!(ds.get(1).unwrap().indices(), &[0, 2]);
    assert_eq!(ds.get(1).unwrap().values(), &[1.0, 2.0]);

    // the bias weight contributes to every score
    let w = WeightVector::from_vec(vec![-1.0, 0.0, 0.0]);
    assert_eq!(score(&w, ds.get(0).unwrap()), -1.0);
    assert_eq!(score(&w, ds.get(1).unwrap()), -1.0);
}

#[test]
fn dataset_is_shared_across_threads() {
    let ds = common::gaussian_clusters(50, 9);
    let shared = &ds;
    let counts: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(move || shared.count_positive()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(counts, vec![25; 4]);
}

#[test]
fn sparse_vector_from_dense_drops_zeros() {
    let v = SparseVector::from_dense(&[0.0, 3.0, 0.0, 4.0], -1.0).unwrap();
    assert_eq!(v.indices(), &[1, 3]);
    assert_eq!(v.squared_norm(), 25.0);
    assert_eq!(v.dot_dense(&[9.0, 1.0, 9.0, 1.0]), 7.0);
}

#[test]
fn logistic_predictions_follow_margins() {
    let ds = common::gaussian_clusters(20, 4);
    let w = WeightVector::from_vec(vec![0.1, 0.1]);
    let margins = predictions(&w, &ds, PredictionType::Linear);
    let probs = predictions(&w, &ds, PredictionType::Logistic);
    for (m, p) in margins.iter().zip(probs.iter()) {
        assert_eq!(*m > 0.0, *p > 0.5);
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn config_round_trips_through_json() {
    let cfg = TrainConfig::builder()
        .iterations(2_500)
        .dimensionality(64)
        .lambda(0.25)
        .eta_schedule(EtaSchedule::Constant)
        .learner_family(LearnerFamily::LogregPegasos)
        .loop_policy(LoopPolicy::Stochastic)
        .constant_eta(0.05)
        .prediction_type(PredictionType::Logistic)
        .seed(7)
        .build()
        .unwrap();

    let json = serde_json::to_string(&cfg).unwrap();
    assert!(json.contains("\"learner_family\":\"logreg_pegasos\""));
    let parsed: TrainConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, cfg);
}

#[test]
fn missing_json_fields_take_defaults() {
    let parsed: TrainConfig =
        serde_json::from_str(r#"{ "lambda": 0.01, "learner_family": "svm_sgd" }"#).unwrap();
    let expected = TrainConfig::builder()
        .lambda(0.01)
        .learner_family(LearnerFamily::SvmSgd)
        .build()
        .unwrap();
    assert_eq!(parsed, expected);
    assert_eq!(parsed.iterations(), 100_000);
    assert_eq!(parsed.loop_policy(), LoopPolicy::BalancedStochastic);
}

#[test]
fn invalid_json_config_is_rejected() {
    assert!(serde_json::from_str::<TrainConfig>(r#"{ "iterations": 0 }"#).is_err());
    assert!(serde_json::from_str::<TrainConfig>(r#"{ "lambda": -0.5 }"#).is_err());
    assert!(serde_json::from_str::<TrainConfig>(r#"{ "learner_family": "romma" }"#).is_err());
}

#[test]
fn config_names_parse_from_strings() {
    let cases = [
        ("pegasos", LearnerFamily::SvmPegasos),
        ("SGD-SVM", LearnerFamily::SvmSgd),
        ("logreg", LearnerFamily::Logreg),
        ("logreg pegasos", LearnerFamily::LogregPegasos),
        ("lms_regression", LearnerFamily::LmsRegression),
    ];
    for (name, family) in cases {
        assert_eq!(name.parse::<LearnerFamily>().unwrap(), family, "{}", name);
    }

    assert_eq!("basic".parse::<EtaSchedule>().unwrap(), EtaSchedule::Basic);
    assert_eq!(" Constant ".parse::<EtaSchedule>().unwrap(), EtaSchedule::Constant);
    assert_eq!("stochastic".parse::<LoopPolicy>().unwrap(), LoopPolicy::Stochastic);
    assert_eq!("logistic".parse::<PredictionType>().unwrap(), PredictionType::Logistic);

    let err = "romma".parse::<LearnerFamily>().unwrap_err();
    assert!(err.contains("romma"));
}

#[test]
fn constant_eta_must_be_positive() {
    let err = TrainConfig::builder().constant_eta(0.0).build().unwrap_err();
    assert!(matches!(err, SgdError::InvalidConfig(_)));
    assert!(TrainConfig::builder().dimensionality(0).build().is_err());
}
