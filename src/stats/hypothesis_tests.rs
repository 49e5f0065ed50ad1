// =========================================================================
// Two-sample t-test contract
//
// References:
//   - Student (1908) "The Probable Error of a Mean"
// =========================================================================

use super::*;

#[test]
fn test_pooled_statistic_matches_hand_computation() {
    // means 3 and 6, variances 2.5 and 10, pooled 6.25, se = sqrt(2.5)
    let a = [1.0, 2.0, 3.0, 4.0, 5.0];
    let b = [2.0, 4.0, 6.0, 8.0, 10.0];
    let result = two_sample_ttest(&a, &b).expect("valid input");

    let expected_t = -3.0 / 2.5_f64.sqrt();
    assert!((result.t - expected_t).abs() < 1e-12);
    assert_eq!(result.df, 8);
    assert!(!result.degenerate);
    // t_{0.95, 8} = 1.860 < |t| < t_{0.975, 8} = 2.306
    assert!(result.p_value > 0.05 && result.p_value < 0.10, "p = {}", result.p_value);
}

#[test]
fn test_swapping_samples_negates_t_only() {
    let a = [0.3, 1.9, -0.4, 2.2, 0.8, 1.1];
    let b = [1.4, 2.6, 3.1, 0.9];
    let ab = two_sample_ttest(&a, &b).expect("valid input");
    let ba = two_sample_ttest(&b, &a).expect("valid input");

    assert!((ab.t + ba.t).abs() < 1e-12);
    assert!((ab.p_value - ba.p_value).abs() < 1e-12);
    assert_eq!(ab.df, ba.df);
}

#[test]
fn test_unequal_group_sizes_df() {
    let a = [1.0, 2.0, 3.0];
    let b = [1.5, 2.5, 3.5, 4.5, 5.5, 6.5, 7.5];
    let result = two_sample_ttest(&a, &b).expect("valid input");
    assert_eq!(result.df, 8);
}

#[test]
fn test_clearly_different_groups_significant() {
    let group1 = [1.0, 1.1, 1.2, 0.9, 1.0, 1.1, 0.95, 1.05];
    let group2 = [5.0, 5.1, 5.2, 4.9, 5.0, 5.1, 4.95, 5.05];
    let result = two_sample_ttest(&group1, &group2).expect("valid input");
    assert!(result.p_value < 1e-10, "p = {}", result.p_value);
    assert!(result.t < 0.0);
}

#[test]
fn test_identical_samples_give_p_one() {
    let a = [2.0, 4.0, 6.0];
    let result = two_sample_ttest(&a, &a).expect("valid input");
    assert_eq!(result.t, 0.0);
    assert_eq!(result.p_value, 1.0);
    assert!(!result.degenerate);
}

#[test]
fn test_minimum_group_size_is_finite() {
    let result = two_sample_ttest(&[0.1, 0.7], &[1.2, 0.4]).expect("n = 2 is valid");
    assert_eq!(result.df, 2);
    assert!(result.t.is_finite());
    assert!((0.0..=1.0).contains(&result.p_value));
}

#[test]
fn test_zero_standard_error_equal_means() {
    let result = two_sample_ttest(&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]).expect("defined policy");
    assert!(result.degenerate);
    assert_eq!(result.t, 0.0);
    assert_eq!(result.p_value, 1.0);
    assert_eq!(result.df, 4);
}

#[test]
fn test_zero_standard_error_different_means() {
    let up = two_sample_ttest(&[3.0, 3.0], &[1.0, 1.0, 1.0]).expect("defined policy");
    assert!(up.degenerate);
    assert_eq!(up.t, f64::INFINITY);
    assert_eq!(up.p_value, 0.0);

    let down = two_sample_ttest(&[1.0, 1.0], &[3.0, 3.0]).expect("defined policy");
    assert_eq!(down.t, f64::NEG_INFINITY);
    assert_eq!(down.p_value, 0.0);
}

#[test]
fn test_short_sample_rejected() {
    let err = two_sample_ttest(&[1.0], &[1.0, 2.0]).unwrap_err();
    assert!(matches!(
        err,
        SimError::InsufficientSamples {
            which: "a",
            len: 1,
            min: 2
        }
    ));

    let err = two_sample_ttest(&[1.0, 2.0], &[]).unwrap_err();
    assert!(matches!(err, SimError::InsufficientSamples { which: "b", .. }));
}

#[test]
fn test_non_finite_observation_rejected() {
    let err = two_sample_ttest(&[1.0, f64::NAN, 2.0], &[1.0, 2.0]).unwrap_err();
    assert!(matches!(
        err,
        SimError::NonFiniteObservation {
            which: "a",
            index: 1
        }
    ));

    let err = two_sample_ttest(&[1.0, 2.0], &[f64::INFINITY, 2.0]).unwrap_err();
    assert!(matches!(err, SimError::NonFiniteObservation { which: "b", index: 0 }));
}

#[test]
fn test_overflowing_spread_rejected() {
    let err = two_sample_ttest(&[1.7e308, 1.7e308, 1.6e308], &[0.0, 1.0, 2.0]).unwrap_err();
    assert!(err.is_invalid_input());
    match err {
        SimError::InvalidParameter { param, .. } => assert_eq!(param, "standard error"),
        other => panic!("expected InvalidParameter, got {other:?}"),
    }
}

#[test]
fn test_overflowing_mean_difference_rejected() {
    let err = two_sample_ttest(&[1.7e308, 1.7e308], &[-1.7e308, -1.7e308]).unwrap_err();
    match err {
        SimError::InvalidParameter { param, .. } => assert_eq!(param, "mean difference"),
        other => panic!("expected InvalidParameter, got {other:?}"),
    }
}

#[test]
fn test_large_finite_samples_accepted() {
    let result = two_sample_ttest(&[1e150, 2e150, 3e150], &[2e150, 3e150, 4e150])
        .expect("spread fits in f64");
    assert!((result.t + 1.224_744_871_391_589).abs() < 1e-9);
    assert!(result.p_value > 0.2 && result.p_value < 0.3);
}

#[test]
fn test_result_serializes() {
    let result = two_sample_ttest(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]).expect("valid input");
    let json = serde_json::to_string(&result).expect("serialize");
    assert!(json.contains("\"df\":4"));
    assert!(json.contains("\"degenerate\":false"));
}
