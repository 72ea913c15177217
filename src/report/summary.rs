// src/report/summary.rs

//! Implements [`ReportSummary`], the frozen view of a [`Report`].
//!
//! A `ReportSummary` is the only thing renderers see; never raw entries or
//! counters.
//!
//! [`Report`]: crate::report::report::Report

use crate::common::Count;
use crate::report::counter::GroupKey;
use crate::report::liststats::StatsResult;

/// Ordered `(group, count)` pairs of a counter.
pub type GroupCounts = Vec<(GroupKey, Count)>;

/// Sum of the counts of `counts`.
pub fn group_counts_total(counts: &GroupCounts) -> Count {
    counts
        .iter()
        .map(|(_, count)| count)
        .sum()
}

/// Lines not ingested by the [`Analyzer`], by reason.
///
/// [`Analyzer`]: crate::readers::analyzer::Analyzer
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SkippedLines {
    /// lines not matching the log format pattern
    pub malformed: Count,
    /// lines with a field that could not be coerced or is out of range
    pub invalid: Count,
    /// lines with an entry older than the maximum age
    pub too_old: Count,
}

impl SkippedLines {
    /// Lines skipped due to errors, i.e. `malformed + invalid`.
    /// Does not include `too_old`, which is filtering, not an error.
    pub const fn errors(&self) -> Count {
        self.malformed + self.invalid
    }

    /// All lines not ingested.
    pub const fn total(&self) -> Count {
        self.malformed + self.invalid + self.too_old
    }
}

/// Statistics of the three metrics of an entry.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricsSummary {
    /// request time in seconds
    pub request_time: StatsResult,
    /// upstream response time in seconds
    pub upstream_response_time: StatsResult,
    /// response body size in bytes
    pub body_bytes_sent: StatsResult,
}

/// Breakdown of one path group.
#[derive(Clone, Debug, PartialEq)]
pub struct PathSummary {
    pub path: GroupKey,
    pub requests: Count,
    pub verbs: GroupCounts,
    pub status: GroupCounts,
    pub metrics: MetricsSummary,
}

/// Frozen summary of a [`Report`].
///
/// Invariant: `requests` equals the total of `verbs`, the total of
/// `status`, and the total of `paths`.
///
/// [`Report`]: crate::report::report::Report
#[derive(Clone, Debug, PartialEq)]
pub struct ReportSummary {
    /// entries added to the report
    pub requests: Count,
    /// lines read by the `Analyzer`, if known
    pub lines: Count,
    /// lines not added to the report, if known
    pub skipped: SkippedLines,
    pub verbs: GroupCounts,
    pub status: GroupCounts,
    pub paths: GroupCounts,
    pub metrics: MetricsSummary,
    /// per-path breakdown, in `paths` order, if enabled
    pub path_stats: Option<Vec<PathSummary>>,
}

impl ReportSummary {
    /// Return this summary with the line counts of an [`Analyzer`] run.
    ///
    /// [`Analyzer`]: crate::readers::analyzer::Analyzer
    pub fn with_lines(
        mut self,
        lines: Count,
        skipped: SkippedLines,
    ) -> ReportSummary {
        self.lines = lines;
        self.skipped = skipped;

        self
    }
}
