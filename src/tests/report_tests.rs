// src/tests/report_tests.rs

//! tests for `report.rs` and `summary.rs`

#![allow(non_snake_case)]

use crate::common::Count;
use crate::data::entry::Entry;
use crate::report::config::Configuration;
use crate::report::counter::GroupKey;
use crate::report::liststats::StatsError;
use crate::report::report::Report;
use crate::report::summary::{group_counts_total, PathSummary, ReportSummary, SkippedLines};
use crate::tests::common::{config_paths, entries_mixed, entry};

use ::more_asserts::assert_le;
use ::test_case::test_case;

fn key(s: &str) -> GroupKey {
    GroupKey::Key(String::from(s))
}

fn report_of(
    config: &Configuration,
    entries: &[Entry],
) -> Report {
    let mut report = Report::new(config);
    for entry in entries.iter() {
        report.add(entry).unwrap();
    }

    report
}

#[test]
fn test_empty_report() {
    let report = Report::new(&Configuration::default());
    let summary: ReportSummary = report.summary();
    assert_eq!(summary.requests, 0);
    assert_eq!(summary.metrics.request_time, Err(StatsError::Empty));
    assert_eq!(summary.metrics.upstream_response_time, Err(StatsError::Empty));
    assert_eq!(summary.metrics.body_bytes_sent, Err(StatsError::Empty));
    assert!(summary.paths.is_empty());
    assert!(summary.path_stats.is_none());
    // configured verbs are listed with zero counts
    assert_eq!(summary.verbs.len(), 5);
    assert_eq!(group_counts_total(&summary.verbs), 0);
}

#[test_case(&[], false; "auto paths")]
#[test_case(&["/docs/api", "/docs"], false; "configured paths")]
#[test_case(&["/docs/api", "/docs"], true; "configured paths with path stats")]
#[test_case(&[], true; "auto paths with path stats")]
fn test_totals_reconcile(
    paths: &[&str],
    path_stats: bool,
) {
    let entries = entries_mixed();
    let summary: ReportSummary = report_of(&config_paths(paths, path_stats), &entries).summary();
    let requests = entries.len() as Count;
    assert_eq!(summary.requests, requests);
    assert_eq!(group_counts_total(&summary.verbs), requests);
    assert_eq!(group_counts_total(&summary.status), requests);
    assert_eq!(group_counts_total(&summary.paths), requests);
    assert_eq!(summary.metrics.request_time.as_ref().unwrap().count, requests);
    assert_eq!(summary.metrics.upstream_response_time.as_ref().unwrap().count, requests);
    assert_eq!(summary.metrics.body_bytes_sent.as_ref().unwrap().count, requests);
}

#[test]
fn test_verbs_status_with_unmatched() {
    let summary: ReportSummary = report_of(&Configuration::default(), &entries_mixed()).summary();
    assert_eq!(
        summary.verbs,
        vec![
            (key("DELETE"), 1),
            (key("GET"), 3),
            (key("PATCH"), 0),
            (key("POST"), 1),
            (key("PUT"), 1),
            (GroupKey::Unmatched, 1),
        ]
    );
    assert_eq!(
        summary.status,
        vec![(key("1"), 0), (key("2"), 4), (key("3"), 1), (key("4"), 1), (key("5"), 1)]
    );
}

#[test]
fn test_paths_configured_order() {
    let config = config_paths(&["/docs/api", "/docs"], false);
    let summary: ReportSummary = report_of(&config, &entries_mixed()).summary();
    assert_eq!(summary.paths, vec![(key("/docs/api"), 3), (key("/docs"), 1), (GroupKey::Unmatched, 3)]);
}

#[test]
fn test_paths_auto_sorted_by_key() {
    let summary: ReportSummary = report_of(&Configuration::default(), &entries_mixed()).summary();
    let keys: Vec<&str> = summary
        .paths
        .iter()
        .map(|(key, _)| key.as_str())
        .collect();
    assert_eq!(keys, vec!["/", "/auth/token", "/docs/api/v1", "/docs/api/v2", "/docs/intro", "/static/app.js"]);
    assert_eq!(summary.paths[2], (key("/docs/api/v1"), 2));
}

#[test]
fn test_global_metrics() {
    let entries = vec![
        entry("GET", "/a", "200", 100, 1.0, 0.5),
        entry("GET", "/a", "200", 200, 2.0, 0.0),
        entry("GET", "/b", "200", 300, 3.0, 1.5),
        entry("GET", "/b", "200", 400, 4.0, 2.0),
    ];
    let summary: ReportSummary = report_of(&Configuration::default(), &entries).summary();
    let times = summary.metrics.request_time.unwrap();
    assert_eq!(times.mean, 2.5);
    assert_eq!(times.median, 2.5);
    let bytes = summary.metrics.body_bytes_sent.unwrap();
    assert_eq!(bytes.mean, 250.0);
    assert_eq!(bytes.max, 400.0);
    let upstream = summary.metrics.upstream_response_time.unwrap();
    assert_eq!(upstream.min, 0.0);
    assert_eq!(upstream.median, 1.0);
}

#[test]
fn test_path_stats_consistent_with_paths() {
    let config = config_paths(&["/docs/api", "/docs"], true);
    let summary: ReportSummary = report_of(&config, &entries_mixed()).summary();
    let path_stats: Vec<PathSummary> = summary.path_stats.clone().unwrap();
    assert_eq!(path_stats.len(), summary.paths.len());
    for ((key, count), pathsummary) in summary.paths.iter().zip(path_stats.iter()) {
        assert_eq!(&pathsummary.path, key);
        assert_eq!(pathsummary.requests, *count);
        assert_eq!(group_counts_total(&pathsummary.verbs), *count);
        assert_eq!(group_counts_total(&pathsummary.status), *count);
    }
    // "/docs/api/v1" is counted under "/docs/api" only, never also "/docs"
    let docs_api: &PathSummary = &path_stats[0];
    assert_eq!(docs_api.path, key("/docs/api"));
    assert_eq!(docs_api.requests, 3);
    let docs: &PathSummary = &path_stats[1];
    assert_eq!(docs.path, key("/docs"));
    assert_eq!(docs.requests, 1);
    assert_eq!(docs.metrics.request_time.as_ref().unwrap().mean, 0.2);
    let other: &PathSummary = &path_stats[2];
    assert!(other.path.is_unmatched());
    assert_eq!(other.requests, 3);
}

#[test]
fn test_path_stats_configured_group_never_matched() {
    let config = config_paths(&["/nothing", "/docs"], true);
    let summary: ReportSummary = report_of(&config, &entries_mixed()).summary();
    let path_stats = summary.path_stats.unwrap();
    assert_eq!(path_stats[0].path, key("/nothing"));
    assert_eq!(path_stats[0].requests, 0);
    assert_eq!(path_stats[0].metrics.request_time, Err(StatsError::Empty));
}

#[test]
fn test_path_stats_auto() {
    let entries = vec![
        entry("GET", "/b", "200", 1, 0.1, 0.0),
        entry("GET", "/a", "200", 1, 0.25, 0.0),
        entry("POST", "/a", "500", 1, 0.75, 0.0),
    ];
    let summary: ReportSummary = report_of(&config_paths(&[], true), &entries).summary();
    let path_stats = summary.path_stats.unwrap();
    assert_eq!(path_stats.len(), 2);
    assert_eq!(path_stats[0].path, key("/a"));
    assert_eq!(path_stats[0].requests, 2);
    assert_eq!(path_stats[0].metrics.request_time.as_ref().unwrap().mean, 0.5);
    assert_eq!(path_stats[1].path, key("/b"));
    assert_eq!(path_stats[1].requests, 1);
}

#[test]
fn test_summary_order_independent() {
    let config = config_paths(&["/docs/api", "/docs"], true);
    let entries = entries_mixed();
    let mut reversed = entries.clone();
    reversed.reverse();
    let mut rotated = entries.clone();
    rotated.rotate_left(2);
    let expect: ReportSummary = report_of(&config, &entries).summary();
    assert_eq!(report_of(&config, &reversed).summary(), expect);
    assert_eq!(report_of(&config, &rotated).summary(), expect);

    let config = config_paths(&[], true);
    let expect: ReportSummary = report_of(&config, &entries).summary();
    assert_eq!(report_of(&config, &reversed).summary(), expect);
    assert_eq!(report_of(&config, &rotated).summary(), expect);
}

#[test]
fn test_with_lines() {
    let skipped = SkippedLines {
        malformed: 2,
        invalid: 1,
        too_old: 3,
    };
    let summary = report_of(&Configuration::default(), &entries_mixed())
        .summary()
        .with_lines(13, skipped);
    assert_eq!(summary.lines, 13);
    assert_eq!(summary.skipped.errors(), 3);
    assert_eq!(summary.skipped.total(), 6);
    assert_le!(summary.requests + summary.skipped.total(), summary.lines);
}

#[test]
fn test_requests_counter() {
    let mut report = Report::new(&Configuration::default());
    assert_eq!(report.requests(), 0);
    report.add(&entry("GET", "/", "200", 0, 0.0, 0.0)).unwrap();
    assert_eq!(report.requests(), 1);
    assert!(!report.path_stats_enabled());
}

#[test]
fn test_path_stats_shadowed_key() {
    // "/docs" matches every path "/docs/api" would
    let config = config_paths(&["/docs", "/docs/api"], true);
    let summary: ReportSummary = report_of(&config, &entries_mixed()).summary();
    assert_eq!(summary.paths[0], (key("/docs"), 4));
    assert_eq!(summary.paths[1], (key("/docs/api"), 0));
    let path_stats = summary.path_stats.unwrap();
    assert_eq!(path_stats[0].requests, 4);
    assert_eq!(path_stats[1].path, key("/docs/api"));
    assert_eq!(path_stats[1].requests, 0);
}
