// benches/bench_analyzer.rs
//
// benchmark parsing nginx lines and adding them to a `Report`

#![allow(non_snake_case)]

use ::analoglib::data::entry::Entry;
use ::analoglib::data::logformat::{LogFormat, NGINX};
use ::analoglib::readers::analyzer::Analyzer;
use ::analoglib::report::config::Configuration;
use ::analoglib::report::report::Report;
use ::criterion::{black_box, criterion_group, criterion_main, Criterion};
use ::lazy_static::lazy_static;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const LINES_LEN: usize = 1000;

const VERBS: [&str; 4] = ["GET", "POST", "PUT", "OPTIONS"];
const PATHS: [&str; 5] = ["/", "/api/v1/users", "/api/v2/orders", "/static/app.js", "/auth/token"];
const STATUS: [&str; 4] = ["200", "304", "404", "500"];

lazy_static! {
    static ref LINES: Vec<String> = (0..LINES_LEN)
        .map(|i| {
            format!(
                "10.0.0.{} - - [16/Jan/2014:13:{:02}:{:02} +0000] \"{} {}?q={} HTTP/1.1\" {} {} \"-\" \"bench/1.0\" \"-\" 0.{:03} 0.{:03}",
                i % 256,
                i / 60 % 60,
                i % 60,
                VERBS[i % VERBS.len()],
                PATHS[i % PATHS.len()],
                i,
                STATUS[i % STATUS.len()],
                i * 7,
                i % 1000,
                i * 3 % 1000,
            )
        })
        .collect();
}

#[inline(never)]
fn logformat_parse() {
    let logformat: &LogFormat = &NGINX;
    for line in LINES.iter() {
        let entry: Entry = logformat.parse(line.as_str()).unwrap();
        black_box(entry);
    }
}

fn analyze(config: &Configuration) {
    let mut analyzer = Analyzer::from_config(config, None).unwrap();
    let mut report = Report::new(config);
    analyzer.analyze(LINES.iter(), &mut report);
    black_box(analyzer.summary(&report));
}

#[inline(never)]
fn analyze_auto_paths() {
    analyze(&Configuration::default());
}

#[inline(never)]
fn analyze_path_stats() {
    let config = Configuration {
        paths: vec![String::from("/api/v1"), String::from("/api"), String::from("/static")],
        path_stats: true,
        ..Configuration::default()
    };
    analyze(&config);
}

// criterion runners

fn criterion_benchmark(c: &mut Criterion) {
    let mut bg = c.benchmark_group("Analyzer");
    bg.bench_function("logformat_parse", |b| b.iter(logformat_parse));
    bg.bench_function("analyze_auto_paths", |b| b.iter(analyze_auto_paths));
    bg.bench_function("analyze_path_stats", |b| b.iter(analyze_path_stats));
    bg.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
