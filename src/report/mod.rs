// src/report/mod.rs

//! The `report` module aggregates [`Entry`]s into counters and statistics.
//!
//! ## Definitions of data
//!
//! A [`PrefixMatchingCounter`] counts values by the first configured prefix
//! they start with.
//!
//! A [`ListStats`] collects numeric samples and summarizes them.
//!
//! A [`Report`] holds the counters and statistics of one analysis run.
//! A [`ReportSummary`] is the frozen view of a `Report` passed to the
//! renderers.
//!
//! A [`Configuration`] holds the settings of one analysis run.
//!
//! [`Entry`]: crate::data::entry::Entry
//! [`PrefixMatchingCounter`]: crate::report::counter::PrefixMatchingCounter
//! [`ListStats`]: crate::report::liststats::ListStats
//! [`Report`]: crate::report::report::Report
//! [`ReportSummary`]: crate::report::summary::ReportSummary
//! [`Configuration`]: crate::report::config::Configuration

pub mod config;
pub mod counter;
pub mod liststats;
#[allow(clippy::module_inception)]
pub mod report;
pub mod summary;
