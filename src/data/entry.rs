// src/data/entry.rs

//! Implements [`Entry`], one parsed access log line, and the [`Field`]s
//! an [`Entry`] is composed of.
//!
//! [`Entry`]: self::Entry
//! [`Field`]: self::Field

use crate::data::datetime::DateTimeL;

use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Field
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The fields of an [`Entry`]. Every [`LogFormat`] pattern must have a
/// named capture group for each `Field`, named by [`Field::group_name`].
///
/// [`LogFormat`]: crate::data::logformat::LogFormat
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Field {
    Timestamp,
    Verb,
    Path,
    Status,
    BodyBytesSent,
    RequestTime,
    UpstreamResponseTime,
}

/// Number of [`Field`] variants.
pub const FIELDS_LEN: usize = 7;

/// All [`Field`]s, in the order of the [`Entry`] fields.
pub const FIELDS_REQUIRED: [Field; FIELDS_LEN] = [
    Field::Timestamp,
    Field::Verb,
    Field::Path,
    Field::Status,
    Field::BodyBytesSent,
    Field::RequestTime,
    Field::UpstreamResponseTime,
];

impl Field {
    /// The regex capture group name for this field.
    pub const fn group_name(&self) -> &'static str {
        match self {
            Field::Timestamp => "timestamp",
            Field::Verb => "verb",
            Field::Path => "path",
            Field::Status => "status",
            Field::BodyBytesSent => "body_bytes_sent",
            Field::RequestTime => "request_time",
            Field::UpstreamResponseTime => "upstream_response_time",
        }
    }

    /// Index of this field within [`FIELDS_REQUIRED`].
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(f, "{}", self.group_name())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LineError
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Why one line could not become an [`Entry`].
///
/// Never fatal. The [`Analyzer`] counts each variant and skips the line.
///
/// [`Analyzer`]: crate::readers::analyzer::Analyzer
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LineError {
    /// The line did not match the [`LogFormat`] pattern.
    ///
    /// [`LogFormat`]: crate::data::logformat::LogFormat
    Parse,
    /// A matched field could not be coerced to its type, e.g. a non-numeric
    /// body size or a timestamp not matching the timestamp format.
    Field {
        field: Field,
        value: String,
    },
    /// A numeric field was coerced but is out of domain, i.e. negative or
    /// not finite.
    Value {
        field: Field,
        value: String,
    },
}

impl LineError {
    /// Returns `true` if the error is [`LineError::Parse`].
    #[inline(always)]
    pub const fn is_parse(&self) -> bool {
        matches!(*self, LineError::Parse)
    }
}

impl fmt::Display for LineError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            LineError::Parse => write!(f, "line does not match the log format pattern"),
            LineError::Field { field, value } => {
                write!(f, "field {} has invalid value {:?}", field, value)
            }
            LineError::Value { field, value } => {
                write!(f, "field {} has out of range value {:?}", field, value)
            }
        }
    }
}

impl std::error::Error for LineError {}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Entry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Body size in bytes.
pub type BodyBytes = u64;

/// A duration in seconds, as logged by the web server.
pub type Seconds = f64;

/// One parsed access log line.
///
/// An `Entry` is immutable; numeric fields are checked to be finite and
/// non-negative when created.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    timestamp: DateTimeL,
    verb: String,
    path: String,
    status: String,
    body_bytes_sent: BodyBytes,
    request_time: Seconds,
    /// `0.0` if the request was not passed to an upstream.
    upstream_response_time: Seconds,
}

/// Is `value` usable as a duration? Returns a [`LineError::Value`] if not.
fn check_seconds(
    field: Field,
    value: Seconds,
) -> Result<Seconds, LineError> {
    if !value.is_finite() || value < 0.0 {
        return Err(LineError::Value {
            field,
            value: value.to_string(),
        });
    }

    Ok(value)
}

impl Entry {
    /// Create a new `Entry`.
    ///
    /// Returns [`LineError::Value`] for a negative or non-finite
    /// `request_time` or `upstream_response_time`.
    pub fn new(
        timestamp: DateTimeL,
        verb: String,
        path: String,
        status: String,
        body_bytes_sent: BodyBytes,
        request_time: Seconds,
        upstream_response_time: Seconds,
    ) -> Result<Entry, LineError> {
        let request_time = check_seconds(Field::RequestTime, request_time)?;
        let upstream_response_time = check_seconds(Field::UpstreamResponseTime, upstream_response_time)?;

        Ok(Entry {
            timestamp,
            verb,
            path,
            status,
            body_bytes_sent,
            request_time,
            upstream_response_time,
        })
    }

    pub const fn timestamp(&self) -> &DateTimeL {
        &self.timestamp
    }

    /// HTTP request method, e.g. `GET`
    pub fn verb(&self) -> &str {
        self.verb.as_str()
    }

    /// Request path, without query string for the predefined formats
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Response status code as logged, e.g. `"404"`
    pub fn status(&self) -> &str {
        self.status.as_str()
    }

    pub const fn body_bytes_sent(&self) -> BodyBytes {
        self.body_bytes_sent
    }

    pub const fn request_time(&self) -> Seconds {
        self.request_time
    }

    pub const fn upstream_response_time(&self) -> Seconds {
        self.upstream_response_time
    }
}
