use assert_approx_eq::assert_approx_eq;
use demand_forecast::transform::{expm1, log1p};
use rstest::rstest;

#[rstest]
#[case(0.0)]
#[case(1.0)]
#[case(5.5)]
#[case(123.456)]
#[case(1.0e6)]
fn test_log1p_expm1_round_trip(#[case] x: f64) {
    assert_approx_eq!(expm1(log1p(x)), x, 1e-9 * x.max(1.0));
}

#[test]
fn test_log1p_at_zero() {
    assert_eq!(log1p(0.0), 0.0);
    assert_eq!(expm1(0.0), 0.0);
}

#[test]
fn test_log1p_compresses_scale() {
    // Variance-stabilizing: large values compress, order is preserved
    assert!(log1p(1000.0) < 1000.0);
    assert!(log1p(10.0) < log1p(100.0));
}
