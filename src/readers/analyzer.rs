// src/readers/analyzer.rs

//! Implements an [`Analyzer`], the driver that feeds access log lines
//! through a [`LogFormat`] into a [`Report`].
//!
//! [`LogFormat`]: crate::data::logformat::LogFormat
//! [`Report`]: crate::report::report::Report

use crate::common::Count;
use crate::data::datetime::{
    datetime_now,
    dt_after_or_before,
    dt_oldest_permitted,
    DateTimeL,
    DateTimeLOpt,
    Duration,
};
use crate::data::entry::{Entry, LineError};
use crate::data::logformat::LogFormat;
use crate::report::config::{ConfigError, Configuration};
use crate::report::liststats::StatsError;
use crate::report::report::Report;
use crate::report::summary::{ReportSummary, SkippedLines};

use std::fmt;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Result of [`Analyzer::analyze_line`] for one line.
#[derive(Clone, Debug, PartialEq)]
pub enum LineResult {
    /// The entry was added to the `Report`.
    Added,
    /// The entry is older than the maximum age.
    TooOld,
    /// The line could not become an entry.
    Skipped(LineError),
    /// The entry has a metric the `Report` does not accept.
    Refused(StatsError),
}

/// Drives line-by-line parsing, maximum age filtering, and error skipping,
/// feeding every accepted [`Entry`] to a [`Report`].
///
/// One `Analyzer` per input. Lines are processed one at a time; nothing is
/// buffered.
///
/// A line that cannot be parsed never stops an `Analyzer`; it is counted
/// in [`SkippedLines`] and skipped.
pub struct Analyzer {
    logformat: LogFormat,
    /// entries before this datetime are skipped; `None` means no filter
    dt_oldest: DateTimeLOpt,
    /// count of lines passed to `analyze_line`
    lines: Count,
    skipped: SkippedLines,
}

impl fmt::Debug for Analyzer {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("logformat", &self.logformat.name())
            .field("dt_oldest", &self.dt_oldest)
            .field("lines", &self.lines)
            .field("skipped", &self.skipped)
            .finish()
    }
}

impl Analyzer {
    /// Create a new `Analyzer`.
    ///
    /// With a `max_age`, entries older than `now - max_age` are skipped.
    /// `now` defaults to the local system datetime.
    pub fn new(
        logformat: LogFormat,
        max_age: Option<Duration>,
        now: Option<DateTimeL>,
    ) -> Analyzer {
        defn!("logformat {:?}, max_age {:?}, now {:?}", logformat.name(), max_age, now);
        let dt_oldest: DateTimeLOpt = match max_age {
            Some(max_age) => {
                let now: DateTimeL = now.unwrap_or_else(datetime_now);

                dt_oldest_permitted(&now, &max_age)
            }
            None => None,
        };
        defx!("dt_oldest {:?}", dt_oldest);

        Analyzer {
            logformat,
            dt_oldest,
            lines: 0,
            skipped: SkippedLines::default(),
        }
    }

    /// Create a new `Analyzer` for the format and maximum age of `config`.
    pub fn from_config(
        config: &Configuration,
        now: Option<DateTimeL>,
    ) -> Result<Analyzer, ConfigError> {
        let logformat: LogFormat = config.logformat()?;

        Ok(Analyzer::new(logformat, config.max_age, now))
    }

    pub const fn logformat(&self) -> &LogFormat {
        &self.logformat
    }

    /// Entries before this datetime are skipped.
    pub const fn dt_oldest(&self) -> &DateTimeLOpt {
        &self.dt_oldest
    }

    /// Count of lines processed so far.
    pub const fn lines(&self) -> Count {
        self.lines
    }

    /// Lines not added to a `Report` so far, by reason.
    pub const fn skipped(&self) -> SkippedLines {
        self.skipped
    }

    /// Parse one `line`, filter it, and add it to `report`.
    pub fn analyze_line(
        &mut self,
        line: &str,
        report: &mut Report,
    ) -> LineResult {
        self.lines += 1;
        let entry: Entry = match self.logformat.parse(line) {
            Ok(entry) => entry,
            Err(LineError::Parse) => {
                defñ!("line {}: no match", self.lines);
                self.skipped.malformed += 1;
                return LineResult::Skipped(LineError::Parse);
            }
            Err(err) => {
                defñ!("line {}: {}", self.lines, err);
                self.skipped.invalid += 1;
                return LineResult::Skipped(err);
            }
        };
        if dt_after_or_before(entry.timestamp(), &self.dt_oldest).is_fail() {
            defñ!("line {}: too old {:?}", self.lines, entry.timestamp());
            self.skipped.too_old += 1;
            return LineResult::TooOld;
        }
        // `LogFormat::parse` checks values so the `Report` refusing an
        // entry is not expected
        if let Err(err) = report.add(&entry) {
            defñ!("line {}: refused by Report: {}", self.lines, err);
            self.skipped.invalid += 1;
            return LineResult::Refused(err);
        }

        LineResult::Added
    }

    /// Analyze all `lines`, adding accepted entries to `report`.
    ///
    /// `lines` is consumed lazily, one line at a time.
    pub fn analyze<I, S>(
        &mut self,
        lines: I,
        report: &mut Report,
    ) where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        defn!();
        for line in lines.into_iter() {
            self.analyze_line(line.as_ref(), report);
        }
        defx!("lines {}, skipped {:?}, requests {}", self.lines, self.skipped, report.requests());
    }

    /// Summary of `report` with the line counts of this `Analyzer`.
    pub fn summary(
        &self,
        report: &Report,
    ) -> ReportSummary {
        report
            .summary()
            .with_lines(self.lines, self.skipped)
    }
}
