// src/readers/mod.rs

//! "Readers" for _analoglib_.
//!
//! ## Overview of readers
//!
//! * An [`Analyzer`] drives a [`LogFormat`] over lines from a
//!   [`LineReader`], feeding a [`Report`].
//! * A `LineReader` reads lines from any [`BufRead`], e.g. one opened by
//!   [`open_fpath`].
//!
//! Lines are pulled one at a time; an input is never held in memory.
//!
//! [`Analyzer`]: crate::readers::analyzer::Analyzer
//! [`LineReader`]: crate::readers::linereader::LineReader
//! [`LogFormat`]: crate::data::logformat::LogFormat
//! [`Report`]: crate::report::report::Report
//! [`BufRead`]: std::io::BufRead
//! [`open_fpath`]: crate::readers::helpers::open_fpath

pub mod analyzer;
pub mod helpers;
pub mod linereader;
