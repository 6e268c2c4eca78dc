use super::*;

#[test]
fn test_sigmoid_link() {
    assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
    assert!(sigmoid(10.0) > 0.999);
    assert!(sigmoid(-10.0) < 0.001);
    assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
}

#[test]
fn test_dot() {
    assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
    assert_eq!(dot(&[], &[]), 0.0);
}

#[test]
fn test_inverse_decay_strictly_decreases() {
    let mut trainer = LogisticTrainer::new();
    trainer.set_learning_rate(0.5).unwrap();

    let rates: Vec<f64> = (1..6).map(|t| trainer.learning_rate_for(t)).collect();
    for pair in rates.windows(2) {
        assert!(pair[1] < pair[0], "rates not decreasing: {rates:?}");
    }
    assert!((trainer.learning_rate_for(10) - 0.05).abs() < 1e-12);
}

#[test]
fn test_inverse_sqrt_decay() {
    let mut trainer = LogisticTrainer::new();
    trainer.set_learning_rate(1.0).unwrap();
    trainer.set_decay(LearningRateDecay::InverseSqrt);

    assert!((trainer.learning_rate_for(4) - 0.5).abs() < 1e-12);
    assert!(trainer.learning_rate_for(9) > trainer.learning_rate_for(16));
}

#[test]
fn test_constant_decay_never_anneals() {
    let mut trainer = LogisticTrainer::new();
    trainer.set_learning_rate(0.3).unwrap();
    trainer.set_decay(LearningRateDecay::Constant);

    assert_eq!(trainer.learning_rate_for(1), trainer.learning_rate_for(1000));
}

#[test]
fn test_zero_touches_treated_as_first() {
    let trainer = LogisticTrainer::new();
    assert_eq!(trainer.learning_rate_for(0), trainer.learning_rate_for(1));
}

#[test]
fn test_train_step_moves_prediction_toward_label() {
    let mut trainer = LogisticTrainer::new();
    trainer.set_learning_rate(0.5).unwrap();

    let mut weights = vec![0.0, 0.0, 0.0];
    let features = [1.0, -1.0, 2.0];

    let p1 = trainer.train_step(&mut weights, 1, &features, 1).unwrap();
    assert!((p1 - 0.5).abs() < 1e-12);
    let p2 = trainer.train_step(&mut weights, 1, &features, 2).unwrap();
    assert!(p2 > p1);

    // and back down for a negative label
    let p3 = trainer.train_step(&mut weights, 0, &features, 3).unwrap();
    let p4 = trainer.train_step(&mut weights, 0, &features, 4).unwrap();
    assert!(p4 < p3);
}

#[test]
fn test_train_step_rejects_bad_label_without_mutation() {
    let trainer = LogisticTrainer::new();
    let mut weights = vec![0.25, -0.5];
    let before = weights.clone();

    let err = trainer.train_step(&mut weights, 2, &[1.0, 1.0], 1);
    assert!(err.is_err());
    assert_eq!(weights, before);
}

#[test]
fn test_train_step_rejects_width_mismatch_without_mutation() {
    let trainer = LogisticTrainer::new();
    let mut weights = vec![0.25, -0.5];
    let before = weights.clone();

    let err = trainer.train_step(&mut weights, 1, &[1.0, 1.0, 1.0], 1);
    assert!(err.is_err());
    assert_eq!(weights, before);
}

#[test]
fn test_l1_shrink_clamps_at_zero() {
    // shrink of 0.2: |0.5| survives, |0.1| would flip and snaps to zero
    assert!((Prior::L1.shrink(0.5, 0.2) - 0.3).abs() < 1e-12);
    assert!((Prior::L1.shrink(-0.5, 0.2) + 0.3).abs() < 1e-12);
    assert_eq!(Prior::L1.shrink(0.1, 0.2), 0.0);
    assert_eq!(Prior::L1.shrink(-0.1, 0.2), 0.0);
    assert_eq!(Prior::L1.shrink(0.0, 0.2), 0.0);
}

#[test]
fn test_l2_shrink_is_multiplicative() {
    assert!((Prior::L2.shrink(1.0, 0.5) - 0.5).abs() < 1e-12);
    assert!((Prior::L2.shrink(-2.0, 0.25) + 1.5).abs() < 1e-12);
    // an overshooting amount floors at zero rather than flipping sign
    assert_eq!(Prior::L2.shrink(3.0, 1.5), 0.0);
}

#[test]
fn test_regularization_never_flips_signs() {
    let mut trainer = LogisticTrainer::new();
    trainer.set_learning_rate(1.0).unwrap();
    trainer.set_lambda(0.05).unwrap();

    let mut weights = vec![0.4, -0.4, 0.001, -0.001];
    let before = weights.clone();
    // zero features: the gradient is a no-op, only the shrink runs
    trainer
        .train_step(&mut weights, 1, &[0.0, 0.0, 0.0, 0.0], 1)
        .unwrap();

    for (w, old) in weights.iter().zip(&before) {
        assert!(
            *w * *old >= 0.0,
            "sign flipped during regularization: {old} -> {w}"
        );
    }
    assert_eq!(weights[2], 0.0);
    assert_eq!(weights[3], 0.0);
    assert!((weights[0] - 0.35).abs() < 1e-12);
}

#[test]
fn test_heavy_l1_zeroes_the_row() {
    let mut trainer = LogisticTrainer::new();
    trainer.set_learning_rate(1.0).unwrap();
    trainer.set_lambda(10.0).unwrap();

    let mut weights = vec![0.3, -0.7, 1.2];
    trainer
        .train_step(&mut weights, 1, &[0.0, 0.0, 0.0], 1)
        .unwrap();
    assert_eq!(weights, vec![0.0, 0.0, 0.0]);
}

#[test]
fn test_per_term_rate_hook_is_honored() {
    struct FreezeFirst;
    impl TermRatePolicy for FreezeFirst {
        fn per_term_rate(&self, j: usize) -> f64 {
            if j == 0 {
                0.0
            } else {
                1.0
            }
        }
    }

    let mut trainer = LogisticTrainer::with_term_rate(FreezeFirst);
    trainer.set_learning_rate(0.5).unwrap();

    let mut weights = vec![0.0, 0.0];
    trainer.train_step(&mut weights, 1, &[1.0, 1.0], 1).unwrap();
    assert_eq!(weights[0], 0.0);
    assert!(weights[1] > 0.0);
}

#[test]
fn test_setters_reject_singular_configuration() {
    let mut trainer = LogisticTrainer::new();

    assert!(trainer.set_learning_rate(0.0).is_err());
    assert!(trainer.set_learning_rate(-0.1).is_err());
    assert!(trainer.set_learning_rate(f64::NAN).is_err());
    assert!(trainer.set_learning_rate(f64::INFINITY).is_err());
    assert!(trainer.set_lambda(-1e-9).is_err());
    assert!(trainer.set_lambda(f64::NAN).is_err());

    // rejected values leave the old configuration in place
    assert_eq!(trainer.learning_rate(), 1.0);
    assert_eq!(trainer.lambda(), 0.0);

    trainer.set_learning_rate(0.25).unwrap();
    trainer.set_lambda(1e-8).unwrap();
    assert_eq!(trainer.learning_rate(), 0.25);
    assert_eq!(trainer.lambda(), 1e-8);
}
