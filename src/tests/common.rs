// src/tests/common.rs

//! Common data for tests.

#![allow(non_upper_case_globals)]

use crate::data::datetime::{DateTimeL, FixedOffset, TimeZone};
use crate::data::entry::Entry;
use crate::report::config::Configuration;

use ::lazy_static::lazy_static;

/// A line of the nginx `combined_timed` format.
pub const NGINX_LINE_1: &str = "123.123.123.123 - test_client [16/Jan/2014:13:30:30 +0000] \"POST /auth/token HTTP/1.1\" 200 174 \"-\" \"OAuthClient 0.2.3\" \"-\" 0.633 0.633";

/// A line of the nginx `combined_timed` format with a query string and
/// no upstream.
pub const NGINX_LINE_2: &str = "234.234.234.234 - - [17/Jan/2014:12:00:27 +0000] \"GET /sub/folder?x=1 HTTP/1.1\" 404 110 \"-\" \"UserAgent/1.0\" \"-\" 0.003 -";

/// Lines not matching the nginx format.
pub const NGINX_LINE_MALFORMED_1: &str = "2014-03-15T12:00:00 GET /me/a/cookie";
pub const NGINX_LINE_MALFORMED_2: &str = "";

lazy_static! {
    pub static ref FO_0: FixedOffset = FixedOffset::east_opt(0).unwrap();

    /// The "now" of tests, `2014-01-16T13:30:30+00:00`.
    pub static ref NOW: DateTimeL = FO_0.with_ymd_and_hms(2014, 1, 16, 13, 30, 30).unwrap();
}

/// Format `16/Jan/2014:13:30:30 +0000` for `NOW - minutes_ago`.
pub fn nginx_time_local(minutes_ago: i64) -> String {
    let dt: DateTimeL = *NOW - crate::data::datetime::Duration::minutes(minutes_ago);

    dt.format("%d/%b/%Y:%H:%M:%S %z").to_string()
}

/// An nginx `combined_timed` line.
pub fn nginx_line(
    minutes_ago: i64,
    verb: &str,
    path: &str,
    status: &str,
    body_bytes_sent: u64,
    request_time: &str,
    upstream_response_time: &str,
) -> String {
    format!(
        "10.0.0.1 - - [{}] \"{} {} HTTP/1.1\" {} {} \"-\" \"test/1.0\" \"-\" {} {}",
        nginx_time_local(minutes_ago),
        verb,
        path,
        status,
        body_bytes_sent,
        request_time,
        upstream_response_time,
    )
}

/// An `Entry` at `NOW`.
pub fn entry(
    verb: &str,
    path: &str,
    status: &str,
    body_bytes_sent: u64,
    request_time: f64,
    upstream_response_time: f64,
) -> Entry {
    Entry::new(
        *NOW,
        String::from(verb),
        String::from(path),
        String::from(status),
        body_bytes_sent,
        request_time,
        upstream_response_time,
    )
    .unwrap()
}

/// Default `Configuration` with `paths` and per path statistics.
pub fn config_paths(
    paths: &[&str],
    path_stats: bool,
) -> Configuration {
    Configuration {
        paths: paths.iter().map(|s| String::from(*s)).collect(),
        path_stats,
        ..Configuration::default()
    }
}

/// A mixed set of entries used by several tests.
pub fn entries_mixed() -> Vec<Entry> {
    vec![
        entry("GET", "/docs/api/v1", "200", 100, 0.1, 0.09),
        entry("GET", "/docs/intro", "200", 200, 0.2, 0.19),
        entry("POST", "/auth/token", "201", 50, 0.5, 0.4),
        entry("DELETE", "/docs/api/v2", "404", 0, 0.01, 0.0),
        entry("OPTIONS", "/", "204", 0, 0.001, 0.0),
        entry("GET", "/static/app.js", "304", 0, 0.002, 0.0),
        entry("PUT", "/docs/api/v1", "500", 30, 1.5, 1.4),
    ]
}
