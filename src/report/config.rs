// src/report/config.rs

//! Implements [`Configuration`], the validated settings of one analysis
//! run, and the defaults of those settings.
//!
//! Defaults are resolved here, once. A [`Report`] and an [`Analyzer`] read
//! only the `Configuration` passed to them.
//!
//! [`Report`]: crate::report::report::Report
//! [`Analyzer`]: crate::readers::analyzer::Analyzer

use crate::data::datetime::{Duration, FixedOffset, FIXEDOFFSET0};
use crate::data::logformat::{FormatError, LogFormat, FORMAT_NAME_NGINX};

use std::fmt;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Default HTTP verbs to group by.
pub const DEFAULT_VERBS: [&str; 5] = ["DELETE", "GET", "PATCH", "POST", "PUT"];

/// Default status code prefixes to group by.
pub const DEFAULT_STATUS_CODES: [&str; 5] = ["1", "2", "3", "4", "5"];

/// Default path prefixes to group by. None, so each distinct path is a
/// group.
pub const DEFAULT_PATHS: [&str; 0] = [];

/// Comment prefix in a path configuration file.
pub const PATHCONF_COMMENT: char = '#';

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ConfigError
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Errors creating a [`Configuration`]. Always fatal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// The log format could not be created.
    Format(FormatError),
    /// The maximum age in minutes is negative or too large.
    MaxAge(i64),
}

impl fmt::Display for ConfigError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            ConfigError::Format(_err) => write!(f, "Invalid log format"),
            ConfigError::MaxAge(minutes) => write!(f, "Invalid max age {} minutes", minutes),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Format(err) => Some(err),
            ConfigError::MaxAge(_) => None,
        }
    }
}

impl From<FormatError> for ConfigError {
    fn from(err: FormatError) -> Self {
        ConfigError::Format(err)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FormatSelection
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Which [`LogFormat`] to parse lines with.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FormatSelection {
    /// A predefined format, e.g. `nginx`.
    Named(String),
    /// A user-defined regular expression `pattern` and strftime
    /// `time_format`.
    Custom {
        pattern: String,
        time_format: String,
    },
}

impl Default for FormatSelection {
    fn default() -> Self {
        FormatSelection::Named(String::from(FORMAT_NAME_NGINX))
    }
}

/// Name given to a [`FormatSelection::Custom`] format.
pub const FORMAT_NAME_CUSTOM: &str = "custom";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Configuration
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Settings of one analysis run.
#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    pub format: FormatSelection,
    /// Timezone offset for timestamps without one.
    pub tz_offset: FixedOffset,
    /// HTTP verbs to group by, in priority order.
    pub verbs: Vec<String>,
    /// Status code prefixes to group by, in priority order,
    /// e.g. `["2", "404", "4"]`.
    pub status_codes: Vec<String>,
    /// Path prefixes to group by, in priority order. Empty means group by
    /// exact path.
    pub paths: Vec<String>,
    /// Skip entries older than this, relative to the analysis "now".
    pub max_age: Option<Duration>,
    /// Also break down statistics per path group.
    pub path_stats: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            format: FormatSelection::default(),
            tz_offset: *FIXEDOFFSET0,
            verbs: DEFAULT_VERBS.iter().map(|s| String::from(*s)).collect(),
            status_codes: DEFAULT_STATUS_CODES.iter().map(|s| String::from(*s)).collect(),
            paths: DEFAULT_PATHS.iter().map(|s| String::from(*s)).collect(),
            max_age: None,
            path_stats: false,
        }
    }
}

impl Configuration {
    /// Create the [`LogFormat`] selected by `format`, using `tz_offset`.
    pub fn logformat(&self) -> Result<LogFormat, ConfigError> {
        let logformat: LogFormat = match &self.format {
            FormatSelection::Named(name) => LogFormat::by_name(name.as_str())?,
            FormatSelection::Custom { pattern, time_format } => {
                LogFormat::new(FORMAT_NAME_CUSTOM, pattern.as_str(), time_format.as_str())?
            }
        };
        defñ!("{}", logformat);

        Ok(logformat.with_tz_offset(self.tz_offset))
    }
}

/// Convert a maximum age in `minutes` to a `Duration`.
pub fn max_age_from_minutes(minutes: i64) -> Result<Duration, ConfigError> {
    if minutes < 0 {
        return Err(ConfigError::MaxAge(minutes));
    }
    match Duration::try_minutes(minutes) {
        Some(duration) => Ok(duration),
        None => Err(ConfigError::MaxAge(minutes)),
    }
}

/// Path prefixes from the contents of a path configuration file, one per
/// line. Surrounding whitespace is trimmed. Blank lines and lines
/// starting with `#` are ignored.
pub fn paths_from_str(data: &str) -> Vec<String> {
    data.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(PATHCONF_COMMENT))
        .map(String::from)
        .collect()
}

/// Split each of `values` on commas and whitespace, e.g.
/// `["GET, POST", "PUT"]` becomes `["GET", "POST", "PUT"]`.
pub fn split_list_values<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| {
            value
                .as_ref()
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect::<Vec<String>>()
        })
        .collect()
}
