// src/tests/liststats_tests.rs

//! tests for `liststats.rs`

#![allow(non_snake_case)]

use crate::report::liststats::{ListStats, StatsError, StatsSummary};

use ::more_asserts::{assert_ge, assert_le};
use ::test_case::test_case;

fn liststats(samples: &[f64]) -> ListStats {
    let mut liststats = ListStats::new();
    for sample in samples.iter() {
        liststats.add(*sample).unwrap();
    }

    liststats
}

#[test]
fn test_mean_median_1234() {
    let liststats = liststats(&[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(liststats.count(), 4);
    assert_eq!(liststats.mean(), Ok(2.5));
    assert_eq!(liststats.median(), Ok(2.5));
    assert_eq!(liststats.percentile(50.0), liststats.median());
}

#[test_case(&[1.0, 2.0, 3.0, 4.0], 0.0, 1.0; "p0 1234")]
#[test_case(&[1.0, 2.0, 3.0, 4.0], 25.0, 1.75; "p25 1234")]
#[test_case(&[1.0, 2.0, 3.0, 4.0], 75.0, 3.25; "p75 1234")]
#[test_case(&[1.0, 2.0, 3.0, 4.0], 100.0, 4.0; "p100 1234")]
#[test_case(&[10.0, 0.0], 50.0, 5.0; "p50 unsorted")]
#[test_case(&[7.0], 90.0, 7.0; "p90 single")]
#[test_case(&[1.0, 2.0, 3.0], 50.0, 2.0; "p50 odd")]
fn test_percentile(
    samples: &[f64],
    p: f64,
    expect: f64,
) {
    let result = liststats(samples).percentile(p).unwrap();
    assert!((result - expect).abs() < 1e-12, "percentile({}) = {} expected {}", p, result, expect);
}

#[test_case(&[5.0, 1.0, 3.0]; "three")]
#[test_case(&[0.5]; "one")]
#[test_case(&[2.0, 2.0, 2.0, 9.0, 0.0]; "repeats")]
fn test_percentile_bounds(samples: &[f64]) {
    let liststats = liststats(samples);
    let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(liststats.percentile(0.0), Ok(min));
    assert_eq!(liststats.percentile(100.0), Ok(max));
    assert_eq!(liststats.min(), Ok(min));
    assert_eq!(liststats.max(), Ok(max));
    let mut previous = min;
    for p in [10.0, 25.0, 50.0, 75.0, 90.0] {
        let value = liststats.percentile(p).unwrap();
        assert_ge!(value, previous);
        assert_le!(value, max);
        previous = value;
    }
}

#[test]
fn test_empty() {
    let liststats = ListStats::new();
    assert!(liststats.is_empty());
    assert_eq!(liststats.count(), 0);
    assert_eq!(liststats.mean(), Err(StatsError::Empty));
    assert_eq!(liststats.median(), Err(StatsError::Empty));
    assert_eq!(liststats.percentile(90.0), Err(StatsError::Empty));
    let result = liststats.summary();
    assert!(result.unwrap_err().is_empty());
}

#[test_case(-1.0; "negative")]
#[test_case(f64::NAN; "nan")]
#[test_case(f64::INFINITY; "infinity")]
fn test_add_rejected(value: f64) {
    let mut liststats = liststats(&[1.0]);
    assert!(liststats.add(value).is_err());
    // nothing was added
    assert_eq!(liststats.count(), 1);
}

#[test]
fn test_add_negative_error() {
    assert_eq!(ListStats::check(-2.0), Err(StatsError::Negative(-2.0)));
    assert_eq!(ListStats::check(0.0), Ok(0.0));
}

#[test_case(-0.1; "below")]
#[test_case(100.1; "above")]
#[test_case(f64::NAN; "nan")]
fn test_percentile_invalid(p: f64) {
    let liststats = liststats(&[1.0, 2.0]);
    match liststats.percentile(p) {
        Err(StatsError::InvalidPercentile(_)) => {}
        result => panic!("unexpected {:?}", result),
    }
}

#[test]
fn test_summary() {
    let summary: StatsSummary = liststats(&[4.0, 1.0, 3.0, 2.0]).summary().unwrap();
    assert_eq!(summary.count, 4);
    assert_eq!(summary.mean, 2.5);
    assert_eq!(summary.median, 2.5);
    assert!((summary.perc90 - 3.7).abs() < 1e-12);
    assert_eq!(summary.perc75, 3.25);
    assert_eq!(summary.perc25, 1.75);
    assert_eq!(summary.min, 1.0);
    assert_eq!(summary.max, 4.0);
}

#[test]
fn test_summary_order_independent() {
    let samples: Vec<f64> = vec![0.1, 0.7, 1e-9, 3.3, 0.2, 1e9, 0.3, 0.0];
    let mut reversed: Vec<f64> = samples.clone();
    reversed.reverse();
    let mut rotated: Vec<f64> = samples.clone();
    rotated.rotate_left(3);
    let expect = liststats(&samples).summary();
    assert_eq!(liststats(&reversed).summary(), expect);
    assert_eq!(liststats(&rotated).summary(), expect);
}
