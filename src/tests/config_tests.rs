// src/tests/config_tests.rs

//! tests for `config.rs`

#![allow(non_snake_case)]

use crate::data::datetime::{Duration, FixedOffset};
use crate::data::logformat::{FormatError, FORMAT_NAME_NGINX};
use crate::report::config::{
    max_age_from_minutes,
    paths_from_str,
    split_list_values,
    ConfigError,
    Configuration,
    FormatSelection,
    DEFAULT_STATUS_CODES,
    DEFAULT_VERBS,
    FORMAT_NAME_CUSTOM,
};

use std::error::Error;

use ::test_case::test_case;

#[test]
fn test_Configuration_default() {
    let config = Configuration::default();
    assert_eq!(config.format, FormatSelection::Named(String::from(FORMAT_NAME_NGINX)));
    assert_eq!(config.verbs, DEFAULT_VERBS);
    assert_eq!(config.status_codes, DEFAULT_STATUS_CODES);
    assert!(config.paths.is_empty());
    assert_eq!(config.max_age, None);
    assert!(!config.path_stats);
    assert_eq!(config.tz_offset.local_minus_utc(), 0);
}

#[test_case(0, Some(Duration::zero()))]
#[test_case(15, Some(Duration::minutes(15)))]
#[test_case(-1, None)]
#[test_case(i64::MAX, None; "overflow")]
fn test_max_age_from_minutes(
    minutes: i64,
    expect: Option<Duration>,
) {
    match (max_age_from_minutes(minutes), expect) {
        (Ok(duration), Some(expect)) => assert_eq!(duration, expect),
        (Err(err), None) => assert_eq!(err, ConfigError::MaxAge(minutes)),
        (result, expect) => panic!("max_age_from_minutes({}) returned {:?}, expected {:?}", minutes, result, expect),
    }
}

#[test]
fn test_paths_from_str() {
    let data = "# path groups\n/api/v1\n\n  /api  \n#/ignored\n/static\n";
    assert_eq!(paths_from_str(data), vec!["/api/v1", "/api", "/static"]);
    assert!(paths_from_str("").is_empty());
    assert!(paths_from_str("# only comments\n\n").is_empty());
}

#[test_case(&["GET"], &["GET"])]
#[test_case(&["GET,POST"], &["GET", "POST"]; "comma")]
#[test_case(&["GET, POST", "PUT"], &["GET", "POST", "PUT"]; "comma space")]
#[test_case(&["2 404", "5"], &["2", "404", "5"]; "whitespace")]
#[test_case(&[",,", " "], &[]; "nothing")]
fn test_split_list_values(
    values: &[&str],
    expect: &[&str],
) {
    assert_eq!(split_list_values(values), expect);
}

#[test]
fn test_logformat_named() {
    let config = Configuration {
        tz_offset: FixedOffset::east_opt(3600).unwrap(),
        ..Configuration::default()
    };
    let logformat = config.logformat().unwrap();
    assert_eq!(logformat.name(), FORMAT_NAME_NGINX);
    assert_eq!(logformat.tz_offset().local_minus_utc(), 3600);
}

#[test]
fn test_logformat_unknown() {
    let config = Configuration {
        format: FormatSelection::Named(String::from("nope")),
        ..Configuration::default()
    };
    let err: ConfigError = config.logformat().unwrap_err();
    assert_eq!(err, ConfigError::Format(FormatError::UnknownFormat(String::from("nope"))));
    assert_eq!(err.to_string(), "Invalid log format");
    assert!(err.source().is_some());
}

#[test]
fn test_logformat_custom() {
    let config = Configuration {
        format: FormatSelection::Custom {
            pattern: String::from(
                r"^(?P<timestamp>\S+) (?P<verb>\S+) (?P<path>\S+) (?P<status>\d+) (?P<body_bytes_sent>\d+) (?P<request_time>\S+) (?P<upstream_response_time>\S+)$",
            ),
            time_format: String::from("%Y-%m-%dT%H:%M:%S"),
        },
        ..Configuration::default()
    };
    let logformat = config.logformat().unwrap();
    assert_eq!(logformat.name(), FORMAT_NAME_CUSTOM);
    let entry = logformat
        .parse("2014-01-16T13:30:30 GET /a 200 10 0.5 -")
        .unwrap();
    assert_eq!(entry.path(), "/a");
    assert_eq!(entry.upstream_response_time(), 0.0);
}

#[test]
fn test_logformat_custom_missing_fields() {
    let config = Configuration {
        format: FormatSelection::Custom {
            pattern: String::from(r"^(?P<timestamp>\S+) (?P<verb>\S+)$"),
            time_format: String::from("%Y"),
        },
        ..Configuration::default()
    };
    match config.logformat() {
        Err(ConfigError::Format(FormatError::MissingFields(fields))) => assert_eq!(fields.len(), 5),
        result => panic!("unexpected {:?}", result),
    }
}

#[test]
fn test_ConfigError_MaxAge_display() {
    let err = ConfigError::MaxAge(-5);
    assert_eq!(err.to_string(), "Invalid max age -5 minutes");
    assert!(err.source().is_none());
}
