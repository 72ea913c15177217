// src/report/report.rs

//! Implements [`Report`], the aggregate of all counters and statistics of
//! one analysis run.
//!
//! A `Report` is mutated only by [`Report::add`] and read by
//! [`Report::summary`]. It does no I/O.

use crate::common::Count;
use crate::data::entry::Entry;
use crate::report::config::Configuration;
use crate::report::counter::{
    GroupIndex,
    GroupKey,
    PrefixMatchingCounter,
};
use crate::report::liststats::{
    ListStats,
    Sample,
    StatsError,
};
use crate::report::summary::{
    group_counts_total,
    GroupCounts,
    MetricsSummary,
    PathSummary,
    ReportSummary,
    SkippedLines,
};

#[allow(unused_imports)]
use ::more_asserts::debug_assert_lt;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Metrics
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The three samples of one [`Entry`], checked.
type EntrySamples = (Sample, Sample, Sample);

/// A [`ListStats`] for each metric of an [`Entry`].
#[derive(Clone, Debug, Default)]
struct Metrics {
    request_time: ListStats,
    upstream_response_time: ListStats,
    body_bytes_sent: ListStats,
}

impl Metrics {
    /// Check all samples of `entry` before any is added.
    fn check(entry: &Entry) -> Result<EntrySamples, StatsError> {
        Ok((
            ListStats::check(entry.request_time())?,
            ListStats::check(entry.upstream_response_time())?,
            ListStats::check(entry.body_bytes_sent() as Sample)?,
        ))
    }

    fn add(
        &mut self,
        samples: &EntrySamples,
    ) -> Result<(), StatsError> {
        self.request_time.add(samples.0)?;
        self.upstream_response_time.add(samples.1)?;
        self.body_bytes_sent.add(samples.2)?;

        Ok(())
    }

    fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            request_time: self.request_time.summary(),
            upstream_response_time: self.upstream_response_time.summary(),
            body_bytes_sent: self.body_bytes_sent.summary(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PathStats
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Counters and statistics of one path group.
#[derive(Clone, Debug)]
struct PathStats {
    verbs: PrefixMatchingCounter,
    status: PrefixMatchingCounter,
    metrics: Metrics,
}

impl PathStats {
    fn new(
        verbs: &[String],
        status_codes: &[String],
    ) -> PathStats {
        PathStats {
            verbs: PrefixMatchingCounter::new(verbs.iter().cloned()),
            status: PrefixMatchingCounter::new(status_codes.iter().cloned()),
            metrics: Metrics::default(),
        }
    }

    fn add(
        &mut self,
        entry: &Entry,
        samples: &EntrySamples,
    ) -> Result<(), StatsError> {
        self.verbs.record(entry.verb());
        self.status.record(entry.status());

        self.metrics.add(samples)
    }

    fn summary(
        &self,
        path: GroupKey,
    ) -> PathSummary {
        PathSummary {
            path,
            requests: self.verbs.total(),
            verbs: ordered_counts(&self.verbs),
            status: ordered_counts(&self.status),
            metrics: self.metrics.summary(),
        }
    }
}

/// View of `counter` for a summary.
///
/// Configured groups keep configured order. Groups by exact value are
/// ordered by key so a summary does not depend on the order of entries.
fn ordered_counts(counter: &PrefixMatchingCounter) -> GroupCounts {
    let mut counts: GroupCounts = counter.counts();
    if counter.is_auto() {
        counts.sort_by(|a, b| a.0.cmp(&b.0));
    }

    counts
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Report
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Log analysis report.
///
/// Provides these statistical metrics:
///
/// * Number of requests.
/// * Request method (HTTP verb) distribution.
/// * Response status code distribution.
/// * Requests per path group.
/// * Request time, upstream response time, and response body size
///   statistics (mean, median, 90th, 75th and 25th percentiles).
/// * If enabled, all of the above per path group.
///
/// The same path group found for the path distribution is used for the
/// per path breakdown, so every entry is counted in exactly one path group.
#[derive(Clone, Debug)]
pub struct Report {
    verbs: PrefixMatchingCounter,
    status: PrefixMatchingCounter,
    paths: PrefixMatchingCounter,
    metrics: Metrics,
    /// configured verbs, for creating per path counters
    verb_keys: Vec<String>,
    /// configured status code prefixes, for creating per path counters
    status_keys: Vec<String>,
    path_stats_enabled: bool,
    /// per path group breakdown, indexed like `paths` groups
    path_stats: Vec<PathStats>,
    /// per path breakdown of the unmatched path group
    path_stats_unmatched: Option<PathStats>,
    requests: Count,
}

impl Report {
    /// Create a new empty `Report` with the verbs, status codes, paths and
    /// per path setting of `config`.
    pub fn new(config: &Configuration) -> Report {
        defn!("verbs {:?}, status_codes {:?}, paths {:?}, path_stats {}",
            config.verbs, config.status_codes, config.paths, config.path_stats);
        let paths = PrefixMatchingCounter::new(config.paths.iter().cloned());
        let mut path_stats: Vec<PathStats> = Vec::new();
        if config.path_stats {
            // configured path groups all get a breakdown, even if never
            // matched
            for _ in paths.counts().iter() {
                path_stats.push(PathStats::new(&config.verbs, &config.status_codes));
            }
        }
        defx!();

        Report {
            verbs: PrefixMatchingCounter::new(config.verbs.iter().cloned()),
            status: PrefixMatchingCounter::new(config.status_codes.iter().cloned()),
            paths,
            metrics: Metrics::default(),
            verb_keys: config.verbs.clone(),
            status_keys: config.status_codes.clone(),
            path_stats_enabled: config.path_stats,
            path_stats,
            path_stats_unmatched: None,
            requests: 0,
        }
    }

    /// Add one `entry` to all counters and statistics.
    ///
    /// Returns `Err` if a metric of `entry` is not an acceptable sample, in
    /// which case nothing was changed.
    pub fn add(
        &mut self,
        entry: &Entry,
    ) -> Result<(), StatsError> {
        let samples: EntrySamples = Metrics::check(entry)?;

        self.requests += 1;
        self.verbs.record(entry.verb());
        self.status.record(entry.status());
        let groupindex: GroupIndex = self.paths.record(entry.path());
        self.metrics.add(&samples)?;

        if !self.path_stats_enabled {
            return Ok(());
        }
        let pathstats: &mut PathStats = match groupindex {
            GroupIndex::Group(index) => {
                // groups by exact value are created by `record`
                while self.path_stats.len() <= index {
                    self.path_stats.push(PathStats::new(&self.verb_keys, &self.status_keys));
                }
                debug_assert_lt!(index, self.path_stats.len());

                &mut self.path_stats[index]
            }
            GroupIndex::Unmatched => {
                let verb_keys = &self.verb_keys;
                let status_keys = &self.status_keys;
                self.path_stats_unmatched
                    .get_or_insert_with(|| PathStats::new(verb_keys, status_keys))
            }
        };

        pathstats.add(entry, &samples)
    }

    /// Number of entries added.
    pub const fn requests(&self) -> Count {
        self.requests
    }

    pub const fn path_stats_enabled(&self) -> bool {
        self.path_stats_enabled
    }

    /// Frozen summary of everything added so far.
    ///
    /// Line counts are zero; see [`ReportSummary::with_lines`].
    pub fn summary(&self) -> ReportSummary {
        defn!("requests {}", self.requests);
        let paths: GroupCounts = ordered_counts(&self.paths);
        let path_stats: Option<Vec<PathSummary>> = match self.path_stats_enabled {
            true => Some(self.path_summaries()),
            false => None,
        };
        let summary = ReportSummary {
            requests: self.requests,
            lines: 0,
            skipped: SkippedLines::default(),
            verbs: ordered_counts(&self.verbs),
            status: ordered_counts(&self.status),
            paths,
            metrics: self.metrics.summary(),
            path_stats,
        };
        debug_assert_eq!(group_counts_total(&summary.verbs), summary.requests);
        debug_assert_eq!(group_counts_total(&summary.status), summary.requests);
        debug_assert_eq!(group_counts_total(&summary.paths), summary.requests);
        defx!();

        summary
    }

    /// Per path breakdowns in the order of the path distribution.
    fn path_summaries(&self) -> Vec<PathSummary> {
        // `counts` is in group index order
        let mut path_summaries: Vec<PathSummary> = self
            .paths
            .counts()
            .into_iter()
            .enumerate()
            .filter_map(|(index, (key, _count))| {
                let pathstats: Option<&PathStats> = match key {
                    GroupKey::Key(_) => self.path_stats.get(index),
                    GroupKey::Unmatched => self.path_stats_unmatched.as_ref(),
                };

                pathstats.map(|pathstats| pathstats.summary(key))
            })
            .collect();
        if self.paths.is_auto() {
            path_summaries.sort_by(|a, b| a.path.cmp(&b.path));
        }

        path_summaries
    }
}
