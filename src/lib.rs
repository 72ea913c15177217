// src/lib.rs

//! _analoglib_ is the library used by the _analog_ binary, the access log
//! analyzer.
//!
//! An access log line is parsed by a [`LogFormat`] into an [`Entry`]. An
//! [`Analyzer`] feeds each `Entry` not older than the maximum age into a
//! [`Report`]. The `Report` groups entries by HTTP verb, by status code
//! prefix, and by path prefix using [`PrefixMatchingCounter`]s, and
//! collects request times, upstream response times, and body sizes in
//! [`ListStats`]. The frozen [`ReportSummary`] is rendered by the
//! [`renderers`].
//!
//! ```text
//! line ──▶ LogFormat::parse ──▶ Entry ──▶ Analyzer ──▶ Report::add
//!                                                         │
//!              renderers::render ◀── ReportSummary ◀── Report::summary
//! ```
//!
//! [`LogFormat`]: crate::data::logformat::LogFormat
//! [`Entry`]: crate::data::entry::Entry
//! [`Analyzer`]: crate::readers::analyzer::Analyzer
//! [`Report`]: crate::report::report::Report
//! [`PrefixMatchingCounter`]: crate::report::counter::PrefixMatchingCounter
//! [`ListStats`]: crate::report::liststats::ListStats
//! [`ReportSummary`]: crate::report::summary::ReportSummary
//! [`renderers`]: crate::printer::renderers

pub mod common;
pub mod data;
pub mod debug;
pub mod printer;
pub mod readers;
pub mod report;
#[cfg(test)]
pub mod tests;
