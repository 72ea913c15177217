// src/data/mod.rs

//! The `data` module is specialized data containers for parsed access log
//! lines.
//!
//! ## Definitions of data
//!
//! ### Line
//!
//! A "line" is a sequence of characters that:
//!
//! * begin after a prior "line" or the beginning of the input.
//! * end with a newline character `'\n'` or the end of the input.
//!
//! Lines are read by a [`LineReader`].
//!
//! ### Entry
//!
//! An "entry" is a "line" matched by a [`LogFormat`] and coerced into
//! typed fields: a timestamp, an HTTP verb, a request path, a status code,
//! a body size, a request time, and an upstream response time.
//!
//! An "entry" is represented by an [`Entry`].
//!
//! ### LogFormat
//!
//! A "log format" is a regular expression with named capture groups for
//! each field of an "entry", and a strftime pattern for the timestamp
//! field. The predefined [`NGINX`] format is for the nginx
//! `combined_timed` log format.
//!
//! [`LineReader`]: crate::readers::linereader::LineReader
//! [`LogFormat`]: crate::data::logformat::LogFormat
//! [`Entry`]: crate::data::entry::Entry
//! [`NGINX`]: static@crate::data::logformat::NGINX

pub mod datetime;
pub mod entry;
pub mod logformat;
