// src/printer/mod.rs

//! The `printer` module turns a [`ReportSummary`] into user-facing text
//! ([`renderers`]) and writes it ([`printers`]).
//!
//! Renderers are pure functions of a `ReportSummary`; they never see
//! entries or counters.
//!
//! [`ReportSummary`]: crate::report::summary::ReportSummary
//! [`renderers`]: crate::printer::renderers
//! [`printers`]: crate::printer::printers

pub mod printers;
pub mod renderers;
