// src/data/logformat.rs

//! Implements [`LogFormat`], a compiled access log line pattern paired with
//! a timestamp format, and the predefined [`NGINX`] format.
//!
//! A `LogFormat` turns one line of text into one [`Entry`] via
//! [`LogFormat::parse`].
//!
//! [`Entry`]: crate::data::entry::Entry

use crate::data::datetime::{
    datetime_parse_from_str,
    pattern_has_tz,
    time_format_validate,
    DateTimeL,
    FixedOffset,
    FIXEDOFFSET0,
};
#[cfg(any(debug_assertions, test))]
use crate::debug::printers::str_to_String_noraw;
use crate::data::entry::{
    BodyBytes,
    Entry,
    Field,
    LineError,
    Seconds,
    FIELDS_LEN,
    FIELDS_REQUIRED,
};

use std::fmt;

use ::lazy_static::lazy_static;
use ::regex::{Captures, Regex};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FormatError
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Errors creating or selecting a [`LogFormat`].
///
/// These are configuration errors and are always fatal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FormatError {
    /// The pattern is not a valid regular expression. Holds the `regex`
    /// crate error message.
    InvalidRegex(String),
    /// The pattern does not define a named capture group for each of these
    /// required fields.
    MissingFields(Vec<Field>),
    /// The timestamp format is not a valid strftime pattern.
    InvalidTimeFormat(String),
    /// No predefined format has this name.
    UnknownFormat(String),
}

impl fmt::Display for FormatError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            FormatError::InvalidRegex(err) => write!(f, "Invalid regex in format; {}", err),
            FormatError::MissingFields(fields) => {
                let missing: Vec<&str> = fields
                    .iter()
                    .map(|field| field.group_name())
                    .collect();
                let required: Vec<&str> = FIELDS_REQUIRED
                    .iter()
                    .map(|field| field.group_name())
                    .collect();
                write!(
                    f,
                    "Format pattern must at least define the groups: {}; missing {}",
                    required.join(", "),
                    missing.join(", "),
                )
            }
            FormatError::InvalidTimeFormat(err) => write!(f, "Invalid time format; {}", err),
            FormatError::UnknownFormat(name) => {
                write!(f, "Unknown log format {:?}; known formats are: {}", name, FORMAT_NAMES.join(", "))
            }
        }
    }
}

impl std::error::Error for FormatError {}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LogFormat
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Capture group index of each [`Field`], indexed by [`Field::index`].
type GroupIndexes = [usize; FIELDS_LEN];

/// An access log format: a regular expression with a named capture group
/// for each required [`Field`], and a strftime pattern for the `timestamp`
/// group.
///
/// Other named capture groups are permitted and ignored.
///
/// A `LogFormat` has no per-line state; one instance parses every line
/// of an analysis run.
#[derive(Clone, Debug)]
pub struct LogFormat {
    name: String,
    regex: Regex,
    time_format: String,
    /// `time_format` has a timezone offset specifier
    time_format_has_tz: bool,
    /// timezone offset for timestamps when `!time_format_has_tz`
    tz_offset: FixedOffset,
    /// capture group index of each required `Field`
    groups: GroupIndexes,
}

impl LogFormat {
    /// Create a new `LogFormat`.
    ///
    /// - `name` identifies the format in messages
    /// - `pattern` is a `regex` crate regular expression
    /// - `time_format` is a strftime pattern for the `timestamp` group
    ///
    /// Timestamps are assumed UTC if `time_format` has no timezone offset
    /// specifier; see [`with_tz_offset`].
    ///
    /// [`with_tz_offset`]: LogFormat::with_tz_offset
    pub fn new(
        name: &str,
        pattern: &str,
        time_format: &str,
    ) -> Result<LogFormat, FormatError> {
        defn!("({:?}, …, {:?})", name, time_format);
        let regex: Regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(err) => {
                defx!("Regex::new failed {}", err);
                return Err(FormatError::InvalidRegex(err.to_string()));
            }
        };
        let mut groups: GroupIndexes = [0; FIELDS_LEN];
        let mut missing: Vec<Field> = Vec::with_capacity(0);
        for field in FIELDS_REQUIRED.iter() {
            match regex
                .capture_names()
                .position(|name_opt| name_opt == Some(field.group_name()))
            {
                Some(index) => groups[field.index()] = index,
                None => missing.push(*field),
            }
        }
        if !missing.is_empty() {
            defx!("missing fields {:?}", missing);
            return Err(FormatError::MissingFields(missing));
        }
        if let Err(err) = time_format_validate(time_format) {
            defx!("time_format_validate failed {}", err);
            return Err(FormatError::InvalidTimeFormat(err));
        }
        defx!("groups {:?}", groups);

        Ok(LogFormat {
            name: String::from(name),
            regex,
            time_format: String::from(time_format),
            time_format_has_tz: pattern_has_tz(time_format),
            tz_offset: *FIXEDOFFSET0,
            groups,
        })
    }

    /// Return this `LogFormat` using `tz_offset` for timestamps that do
    /// not carry a timezone offset.
    pub fn with_tz_offset(
        mut self,
        tz_offset: FixedOffset,
    ) -> LogFormat {
        self.tz_offset = tz_offset;

        self
    }

    /// Return a copy of the predefined format named `name`.
    pub fn by_name(name: &str) -> Result<LogFormat, FormatError> {
        match name {
            FORMAT_NAME_NGINX => Ok(NGINX.clone()),
            _ => Err(FormatError::UnknownFormat(String::from(name))),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn time_format(&self) -> &str {
        self.time_format.as_str()
    }

    pub const fn tz_offset(&self) -> &FixedOffset {
        &self.tz_offset
    }

    /// Matched text of `field`, or `""` if the group did not participate
    /// in the match.
    fn field_str<'a>(
        &self,
        captures: &Captures<'a>,
        field: Field,
    ) -> &'a str {
        match captures.get(self.groups[field.index()]) {
            Some(match_) => match_.as_str(),
            None => "",
        }
    }

    /// Parse one `line` into an [`Entry`].
    ///
    /// Returns [`LineError::Parse`] if `line` does not match the pattern,
    /// [`LineError::Field`] if a matched field cannot be coerced to its
    /// type, [`LineError::Value`] for negative or non-finite numbers.
    pub fn parse(
        &self,
        line: &str,
    ) -> Result<Entry, LineError> {
        defn!("({:?})", str_to_String_noraw(line));
        let captures: Captures = match self.regex.captures(line) {
            Some(captures) => captures,
            None => {
                defx!("no match");
                return Err(LineError::Parse);
            }
        };

        let timestamp: DateTimeL = self.parse_timestamp(self.field_str(&captures, Field::Timestamp))?;
        let verb: &str = self.field_str(&captures, Field::Verb);
        let path: &str = self.field_str(&captures, Field::Path);
        let status: &str = parse_status(self.field_str(&captures, Field::Status))?;
        let body_bytes_sent: BodyBytes = parse_body_bytes(self.field_str(&captures, Field::BodyBytesSent))?;
        let request_time: Seconds = parse_seconds(Field::RequestTime, self.field_str(&captures, Field::RequestTime))?;
        let upstream_response_time: Seconds =
            parse_upstream_seconds(self.field_str(&captures, Field::UpstreamResponseTime))?;

        let entry = Entry::new(
            timestamp,
            String::from(verb),
            String::from(path),
            String::from(status),
            body_bytes_sent,
            request_time,
            upstream_response_time,
        );
        defx!("{:?}", entry);

        entry
    }

    /// Parse the `timestamp` field value `data` with this `time_format`.
    pub fn parse_timestamp(
        &self,
        data: &str,
    ) -> Result<DateTimeL, LineError> {
        match datetime_parse_from_str(data, self.time_format.as_str(), self.time_format_has_tz, &self.tz_offset) {
            Some(dt) => Ok(dt),
            None => Err(LineError::Field {
                field: Field::Timestamp,
                value: String::from(data),
            }),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(f, "{} (time format {:?})", self.name, self.time_format)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// field coercion
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn field_error(
    field: Field,
    value: &str,
) -> LineError {
    LineError::Field {
        field,
        value: String::from(value),
    }
}

fn value_error(
    field: Field,
    value: &str,
) -> LineError {
    LineError::Value {
        field,
        value: String::from(value),
    }
}

/// A status code is one or more ASCII digits.
fn parse_status(value: &str) -> Result<&str, LineError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(field_error(Field::Status, value));
    }

    Ok(value)
}

fn parse_body_bytes(value: &str) -> Result<BodyBytes, LineError> {
    match value.parse::<BodyBytes>() {
        Ok(val) => Ok(val),
        Err(_) => match value.parse::<i64>() {
            // numeric but negative
            Ok(_) => Err(value_error(Field::BodyBytesSent, value)),
            Err(_) => Err(field_error(Field::BodyBytesSent, value)),
        },
    }
}

fn parse_seconds(
    field: Field,
    value: &str,
) -> Result<Seconds, LineError> {
    let seconds: Seconds = match value.trim().parse::<Seconds>() {
        Ok(val) => val,
        Err(_) => return Err(field_error(field, value)),
    };
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(value_error(field, value));
    }

    Ok(seconds)
}

/// nginx logs `-` for requests not passed to an upstream, and a list like
/// `0.001, 0.010 : 0.002` for requests passed to several upstreams.
/// Absent times are `0.0`, listed times are summed.
fn parse_upstream_seconds(value: &str) -> Result<Seconds, LineError> {
    let mut total: Seconds = 0.0;
    for part in value.split(|c| c == ',' || c == ':') {
        let part = part.trim();
        if part.is_empty() || part == "-" {
            continue;
        }
        total += parse_seconds(Field::UpstreamResponseTime, part)?;
    }

    Ok(total)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// predefined formats
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub const FORMAT_NAME_NGINX: &str = "nginx";

/// Names of all predefined formats, for [`LogFormat::by_name`].
pub const FORMAT_NAMES: [&str; 1] = [FORMAT_NAME_NGINX];

/// Pattern of nginx `log_format combined_timed`:
///
/// ```text
/// '$remote_addr - $remote_user [$time_local] "$request" '
/// '$status $body_bytes_sent "$http_referer" '
/// '"$http_user_agent" "$http_x_forwarded_for" '
/// '$request_time $upstream_response_time $pipe';
/// ```
///
/// The query string is not part of `path`.
pub const NGINX_PATTERN: &str = r#"(?x)
    ^(?P<remote_addr>\S+)\s-\s              # Remote address
    (?P<remote_user>\S+)\s                  # Remote user
    \[(?P<timestamp>.*?)\]\s                # Local time
    "                                       # Request
    (?P<verb>[A-Z]+)\s                      # HTTP verb (GET, POST, PUT, ...)
    (?P<path>[^?]+)                         # Request path
    (?:\?.+)?                               # Query string
    \sHTTP/(?:[\d.]+)                       # HTTP/x.x protocol
    "\s                                     # /Request
    (?P<status>\d+?)\s                      # Response status code
    (?P<body_bytes_sent>\d+?)\s             # Body size in bytes
    "(?P<http_referer>[^"]+?)"\s            # Referer header
    "(?P<http_user_agent>[^"]+?)"\s         # User-Agent header
    "(?P<http_x_forwarded_for>[^"]+?)"\s    # X-Forwarded-For header
    (?P<request_time>[\d.]+)\s              # Request time
    (?P<upstream_response_time>             # Upstream response time(s)
        -|[\d.]+(?:\s*[,:]\s*(?:[\d.]+|-))*
    )
    (?:\s(?P<pipe>\S+))?                    # Pipelined request
    \s*$
"#;

/// `$time_local` of nginx, e.g. `16/Jan/2014:13:30:30 +0000`
pub const NGINX_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

lazy_static! {
    /// The predefined nginx `combined_timed` [`LogFormat`].
    pub static ref NGINX: LogFormat = {
        defñ!("lazy_static! NGINX");
        match LogFormat::new(FORMAT_NAME_NGINX, NGINX_PATTERN, NGINX_TIME_FORMAT) {
            Ok(logformat) => logformat,
            Err(err) => panic!("predefined format {:?} is invalid; {}", FORMAT_NAME_NGINX, err),
        }
    };
}
