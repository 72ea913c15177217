// src/report/liststats.rs

//! Implements [`ListStats`], an append-only collection of numeric samples
//! with exact descriptive statistics.
//!
//! Percentiles use linear interpolation between the two order statistics
//! bracketing the 0-indexed rank `p / 100 * (n - 1)` of the sorted samples.
//! The median is the 50th percentile.

use crate::common::Count;

use std::cmp::Ordering;
use std::fmt;

use ::more_asserts::debug_assert_le;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// One numeric sample, e.g. a request time in seconds or a body size in
/// bytes.
pub type Sample = f64;

/// Percentiles reported in a [`StatsSummary`].
pub const PERCENTILE_90: f64 = 90.0;
pub const PERCENTILE_75: f64 = 75.0;
pub const PERCENTILE_25: f64 = 25.0;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// StatsError
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StatsError {
    /// A statistic was requested of zero samples.
    ///
    /// An expected state, e.g. no upstream was ever used. Renderers show
    /// "no data".
    Empty,
    /// A sample was negative.
    Negative(Sample),
    /// A sample was NaN or infinite.
    NotFinite(Sample),
    /// A percentile outside of `0..=100` was requested.
    InvalidPercentile(f64),
}

impl StatsError {
    /// Returns `true` if the error is [`StatsError::Empty`].
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        matches!(*self, StatsError::Empty)
    }
}

impl fmt::Display for StatsError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            StatsError::Empty => write!(f, "no samples"),
            StatsError::Negative(value) => write!(f, "negative sample {}", value),
            StatsError::NotFinite(value) => write!(f, "sample {} is not finite", value),
            StatsError::InvalidPercentile(p) => write!(f, "percentile {} is not within 0 to 100", p),
        }
    }
}

impl std::error::Error for StatsError {}

pub type StatsResult = Result<StatsSummary, StatsError>;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// StatsSummary
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Frozen statistics of a non-empty [`ListStats`].
#[derive(Clone, Debug, PartialEq)]
pub struct StatsSummary {
    pub count: Count,
    pub mean: f64,
    pub median: f64,
    pub perc90: f64,
    pub perc75: f64,
    pub perc25: f64,
    pub min: f64,
    pub max: f64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ListStats
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Append-only numeric samples with mean, median, and percentile queries.
///
/// Samples must be finite and non-negative.
///
/// Queries sort a copy of the samples, so results are exact over every
/// sample added so far, and independent of the order samples were added.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListStats {
    samples: Vec<Sample>,
}

impl ListStats {
    pub fn new() -> ListStats {
        ListStats {
            samples: Vec::new(),
        }
    }

    /// Is `value` an acceptable sample?
    pub fn check(value: Sample) -> Result<Sample, StatsError> {
        if !value.is_finite() {
            return Err(StatsError::NotFinite(value));
        }
        if value < 0.0 {
            return Err(StatsError::Negative(value));
        }

        Ok(value)
    }

    /// Add one sample.
    pub fn add(
        &mut self,
        value: Sample,
    ) -> Result<(), StatsError> {
        self.samples.push(ListStats::check(value)?);

        Ok(())
    }

    pub fn count(&self) -> Count {
        self.samples.len() as Count
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Copy of the samples in ascending order.
    fn sorted(&self) -> Result<Vec<Sample>, StatsError> {
        if self.samples.is_empty() {
            return Err(StatsError::Empty);
        }
        let mut sorted: Vec<Sample> = self.samples.clone();
        // samples are finite so `total_cmp` agrees with `partial_cmp`
        sorted.sort_unstable_by(|a: &Sample, b: &Sample| -> Ordering { a.total_cmp(b) });

        Ok(sorted)
    }

    /// Arithmetic mean.
    pub fn mean(&self) -> Result<f64, StatsError> {
        Ok(mean_sorted(&self.sorted()?))
    }

    /// Median, the 50th percentile.
    pub fn median(&self) -> Result<f64, StatsError> {
        self.percentile(50.0)
    }

    /// The `p`th percentile for `0 <= p <= 100`.
    pub fn percentile(
        &self,
        p: f64,
    ) -> Result<f64, StatsError> {
        check_percentile(p)?;

        Ok(percentile_sorted(&self.sorted()?, p))
    }

    pub fn min(&self) -> Result<f64, StatsError> {
        self.percentile(0.0)
    }

    pub fn max(&self) -> Result<f64, StatsError> {
        self.percentile(100.0)
    }

    /// All statistics of a [`StatsSummary`], sorting only once.
    pub fn summary(&self) -> StatsResult {
        let sorted: Vec<Sample> = self.sorted()?;
        let summary = StatsSummary {
            count: sorted.len() as Count,
            mean: mean_sorted(&sorted),
            median: percentile_sorted(&sorted, 50.0),
            perc90: percentile_sorted(&sorted, PERCENTILE_90),
            perc75: percentile_sorted(&sorted, PERCENTILE_75),
            perc25: percentile_sorted(&sorted, PERCENTILE_25),
            min: percentile_sorted(&sorted, 0.0),
            max: percentile_sorted(&sorted, 100.0),
        };
        defñ!("{:?}", summary);

        Ok(summary)
    }
}

fn check_percentile(p: f64) -> Result<f64, StatsError> {
    if !(0.0..=100.0).contains(&p) {
        return Err(StatsError::InvalidPercentile(p));
    }

    Ok(p)
}

/// Mean of non-empty `sorted` using Neumaier compensated summation.
fn mean_sorted(sorted: &[Sample]) -> f64 {
    let mut sum: f64 = 0.0;
    let mut compensation: f64 = 0.0;
    for value in sorted.iter() {
        let t: f64 = sum + value;
        if sum.abs() >= value.abs() {
            compensation += (sum - t) + value;
        } else {
            compensation += (value - t) + sum;
        }
        sum = t;
    }

    (sum + compensation) / sorted.len() as f64
}

/// Linear interpolation at rank `p / 100 * (n - 1)` of non-empty `sorted`.
fn percentile_sorted(
    sorted: &[Sample],
    p: f64,
) -> f64 {
    let rank: f64 = p / 100.0 * (sorted.len() - 1) as f64;
    let lo: usize = rank.floor() as usize;
    let hi: usize = rank.ceil() as usize;
    debug_assert_le!(hi, sorted.len() - 1, "rank {} beyond samples", rank);
    let fraction: f64 = rank - lo as f64;
    if lo == hi || fraction == 0.0 {
        return sorted[lo];
    }

    sorted[lo] + (sorted[hi] - sorted[lo]) * fraction
}
