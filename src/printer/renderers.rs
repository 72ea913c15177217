// src/printer/renderers.rs

//! Render a [`ReportSummary`] as text.
//!
//! [`summary_to_table`] turns a `ReportSummary` into a [`Table`], a header
//! row and data rows: one row per path group (with per path statistics)
//! sorted by path group, then the `ALL` row. The table formats
//! ([`OutputFormat::Table`], [`OutputFormat::Grid`], [`OutputFormat::Csv`],
//! [`OutputFormat::Tsv`]) only differ in how a `Table` is laid out.
//! [`OutputFormat::Plain`] is a list format.
//!
//! All functions here are pure; printing is done by the caller.
//!
//! [`ReportSummary`]: crate::report::summary::ReportSummary

use crate::common::Count;
use crate::report::counter::GroupKey;
use crate::report::liststats::{StatsResult, StatsSummary};
use crate::report::summary::{
    GroupCounts,
    MetricsSummary,
    ReportSummary,
    SkippedLines,
};

use std::fmt;

use ::itertools::Itertools;
use ::min_max::max;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
use ::unicode_width::UnicodeWidthStr;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// OutputFormat
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Output formats of a rendered [`ReportSummary`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ::clap::ValueEnum)]
pub enum OutputFormat {
    /// list format
    #[default]
    Plain,
    /// reStructuredText simple table
    Table,
    /// grid table
    Grid,
    /// comma-separated values
    Csv,
    /// tab-separated values
    Tsv,
}

/// All [`OutputFormat`]s.
pub const OUTPUT_FORMATS: [OutputFormat; 5] = [
    OutputFormat::Plain,
    OutputFormat::Table,
    OutputFormat::Grid,
    OutputFormat::Csv,
    OutputFormat::Tsv,
];

impl OutputFormat {
    pub const fn name(&self) -> &'static str {
        match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Table => "table",
            OutputFormat::Grid => "grid",
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
        }
    }

    /// The `OutputFormat` named `name`.
    pub fn by_name(name: &str) -> Option<OutputFormat> {
        OUTPUT_FORMATS
            .iter()
            .find(|format| format.name() == name)
            .copied()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// metrics and statistics
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Rendered in place of a statistic of zero samples.
pub const NO_DATA: &str = "n/a";

/// Rendered when nothing was added to the report.
pub const ZERO_REQUESTS: &str = "Zero requests analyzed.";

/// Path column value of the overall row.
pub const ROW_ALL: &str = "ALL";

/// Decimal places of rendered statistics.
pub const FLOAT_PRECISION: usize = 3;

/// The metrics of a [`MetricsSummary`], in rendering order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Metric {
    RequestTime,
    UpstreamResponseTime,
    BodyBytesSent,
}

pub const METRICS: [Metric; 3] = [
    Metric::RequestTime,
    Metric::UpstreamResponseTime,
    Metric::BodyBytesSent,
];

impl Metric {
    /// Name used in table headers.
    pub const fn header(&self) -> &'static str {
        match self {
            Metric::RequestTime => "Time",
            Metric::UpstreamResponseTime => "Upstream Time",
            Metric::BodyBytesSent => "Body Bytes",
        }
    }

    /// Section title of the plain format.
    pub const fn title(&self) -> &'static str {
        match self {
            Metric::RequestTime => "Times [s]",
            Metric::UpstreamResponseTime => "Upstream Times [s]",
            Metric::BodyBytesSent => "Body Bytes Sent [B]",
        }
    }

    pub const fn stats<'a>(
        &self,
        metrics: &'a MetricsSummary,
    ) -> &'a StatsResult {
        match self {
            Metric::RequestTime => &metrics.request_time,
            Metric::UpstreamResponseTime => &metrics.upstream_response_time,
            Metric::BodyBytesSent => &metrics.body_bytes_sent,
        }
    }
}

/// The statistics of a [`StatsSummary`], in rendering order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stat {
    Mean,
    Median,
    Perc90,
    Perc75,
    Perc25,
    Min,
    Max,
}

pub const STATS: [Stat; 7] = [
    Stat::Mean,
    Stat::Median,
    Stat::Perc90,
    Stat::Perc75,
    Stat::Perc25,
    Stat::Min,
    Stat::Max,
];

impl Stat {
    /// Name used in table headers.
    pub const fn header(&self) -> &'static str {
        match self {
            Stat::Mean => "mean",
            Stat::Median => "median",
            Stat::Perc90 => "90th perc",
            Stat::Perc75 => "75th perc",
            Stat::Perc25 => "25th perc",
            Stat::Min => "min",
            Stat::Max => "max",
        }
    }

    /// Name used in the plain format.
    pub const fn title(&self) -> &'static str {
        match self {
            Stat::Mean => "mean",
            Stat::Median => "median",
            Stat::Perc90 => "90th percentile",
            Stat::Perc75 => "75th percentile",
            Stat::Perc25 => "25th percentile",
            Stat::Min => "minimum",
            Stat::Max => "maximum",
        }
    }

    pub const fn value(
        &self,
        stats: &StatsSummary,
    ) -> f64 {
        match self {
            Stat::Mean => stats.mean,
            Stat::Median => stats.median,
            Stat::Perc90 => stats.perc90,
            Stat::Perc75 => stats.perc75,
            Stat::Perc25 => stats.perc25,
            Stat::Min => stats.min,
            Stat::Max => stats.max,
        }
    }
}

/// Format a statistic, `None` is a statistic of zero samples.
fn float_to_string(
    value: Option<f64>,
    empty: &str,
) -> String {
    match value {
        Some(value) => format!("{:.*}", FLOAT_PRECISION, value),
        None => String::from(empty),
    }
}

/// Format `count` with thousands separators, e.g. `12,345`.
pub fn count_to_string_thousands(count: Count) -> String {
    let digits: String = count.to_string();
    let len: usize = digits.len();
    let mut out: String = String::with_capacity(len + len / 3);
    for (index, c) in digits.chars().enumerate() {
        if index != 0 && (len - index) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Table
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One value of a [`Table`].
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Text(String),
    Count(Count),
    /// a statistic, `None` for zero samples
    Float(Option<f64>),
}

impl Cell {
    /// Numeric cells are right-aligned.
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Cell::Count(_) | Cell::Float(_))
    }

    /// The cell as text, `empty` for a statistic of zero samples.
    pub fn to_text(
        &self,
        empty: &str,
    ) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Count(count) => count.to_string(),
            Cell::Float(value) => float_to_string(*value, empty),
        }
    }
}

/// A header row and data rows of equal length.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Count of `key` in `counts`; `0` if not present.
fn count_of(
    counts: &GroupCounts,
    key: &GroupKey,
) -> Count {
    counts
        .iter()
        .find(|(key_, _)| key_ == key)
        .map(|(_, count)| *count)
        .unwrap_or(0)
}

/// Append the count of each of `keys` found in `counts` to `row`.
fn push_counts(
    row: &mut Vec<Cell>,
    keys: &GroupCounts,
    counts: &GroupCounts,
) {
    for (key, _) in keys.iter() {
        row.push(Cell::Count(count_of(counts, key)));
    }
}

/// Append every [`STATS`] of every [`METRICS`] to `row`.
fn push_metrics(
    row: &mut Vec<Cell>,
    metrics: &MetricsSummary,
) {
    for (metric, stat) in METRICS
        .iter()
        .cartesian_product(STATS.iter())
    {
        let value: Option<f64> = match metric.stats(metrics) {
            Ok(stats) => Some(stat.value(stats)),
            Err(_) => None,
        };
        row.push(Cell::Float(value));
    }
}

/// Transform `summary` into a [`Table`].
///
/// Columns are path group, request count, a count per verb and per status
/// code group of the overall summary, then each statistic of each metric.
/// With per path statistics there is one row per path group, sorted by
/// path group. The last row is the `ALL` row.
pub fn summary_to_table(summary: &ReportSummary) -> Table {
    defn!();
    let mut headers: Vec<String> = vec![String::from("Path"), String::from("Requests")];
    for (verb, _) in summary.verbs.iter() {
        headers.push(format!("Verb[{}]", verb.as_str().to_uppercase()));
    }
    for (status, _) in summary.status.iter() {
        headers.push(format!("Status[{}]", status));
    }
    for (metric, stat) in METRICS
        .iter()
        .cartesian_product(STATS.iter())
    {
        headers.push(format!("{}[{}]", metric.header(), stat.header()));
    }

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    if let Some(path_stats) = summary.path_stats.as_ref() {
        for pathsummary in path_stats
            .iter()
            .sorted_by(|a, b| a.path.cmp(&b.path))
        {
            let mut row: Vec<Cell> = Vec::with_capacity(headers.len());
            row.push(Cell::Text(pathsummary.path.to_string()));
            row.push(Cell::Count(pathsummary.requests));
            push_counts(&mut row, &summary.verbs, &pathsummary.verbs);
            push_counts(&mut row, &summary.status, &pathsummary.status);
            push_metrics(&mut row, &pathsummary.metrics);
            rows.push(row);
        }
    }
    let mut row: Vec<Cell> = Vec::with_capacity(headers.len());
    row.push(Cell::Text(String::from(ROW_ALL)));
    row.push(Cell::Count(summary.requests));
    push_counts(&mut row, &summary.verbs, &summary.verbs);
    push_counts(&mut row, &summary.status, &summary.status);
    push_metrics(&mut row, &summary.metrics);
    rows.push(row);
    defx!("{} headers, {} rows", headers.len(), rows.len());

    Table { headers, rows }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// renderers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Render `summary` in `format`. The returned `String` ends with a newline.
pub fn render(
    summary: &ReportSummary,
    format: OutputFormat,
) -> String {
    defñ!("format {}", format);
    match format {
        OutputFormat::Plain => render_plain(summary),
        OutputFormat::Table => render_table(summary, TableStyle::Simple),
        OutputFormat::Grid => render_table(summary, TableStyle::Grid),
        OutputFormat::Csv => render_separated(&summary_to_table(summary), ','),
        OutputFormat::Tsv => render_separated(&summary_to_table(summary), '\t'),
    }
}

/// Indent of plain format sections.
const INDENT: &str = "    ";

/// Width of the value column of the plain format.
const PLAIN_VALUE_WIDTH: usize = 10;

fn plain_counts(
    counts: &GroupCounts,
    indent: &str,
    lines: &mut Vec<String>,
) {
    for (key, count) in counts.iter() {
        lines.push(format!(
            "{}{:>width$}   {}",
            indent,
            count_to_string_thousands(*count),
            key,
            width = PLAIN_VALUE_WIDTH
        ));
    }
}

fn plain_stats(
    stats: &StatsResult,
    indent: &str,
    lines: &mut Vec<String>,
) {
    for stat in STATS.iter() {
        let value: Option<f64> = stats
            .as_ref()
            .ok()
            .map(|stats| stat.value(stats));
        lines.push(format!(
            "{}{:>width$}   {}",
            indent,
            float_to_string(value, NO_DATA),
            stat.title(),
            width = PLAIN_VALUE_WIDTH
        ));
    }
}

/// The "HTTP Verbs", "Status Codes", optional "Paths", and metrics
/// sections of the plain format.
fn plain_sections(
    verbs: &GroupCounts,
    status: &GroupCounts,
    paths: Option<&GroupCounts>,
    metrics: &MetricsSummary,
    indent: &str,
    lines: &mut Vec<String>,
) {
    let indent2: String = format!("{}{}", indent, INDENT);
    lines.push(format!("{}HTTP Verbs:", indent));
    plain_counts(verbs, &indent2, lines);
    lines.push(String::new());
    lines.push(format!("{}Status Codes:", indent));
    plain_counts(status, &indent2, lines);
    lines.push(String::new());
    if let Some(paths) = paths {
        lines.push(format!("{}Paths:", indent));
        plain_counts(paths, &indent2, lines);
        lines.push(String::new());
    }
    for metric in METRICS.iter() {
        lines.push(format!("{}{}:", indent, metric.title()));
        plain_stats(metric.stats(metrics), &indent2, lines);
        lines.push(String::new());
    }
}

/// Skipped line counts, if any line was skipped.
pub fn skipped_to_string(
    lines: Count,
    skipped: &SkippedLines,
) -> Option<String> {
    if skipped.total() == 0 {
        return None;
    }

    Some(format!(
        "Skipped lines: {} of {} (not matching {}, invalid {}, too old {})",
        skipped.total(),
        lines,
        skipped.malformed,
        skipped.invalid,
        skipped.too_old,
    ))
}

/// Render `summary` in the plain list format.
pub fn render_plain(summary: &ReportSummary) -> String {
    if summary.requests == 0 {
        let mut out: String = String::new();
        if let Some(skipped) = skipped_to_string(summary.lines, &summary.skipped) {
            out.push_str(skipped.as_str());
            out.push('\n');
        }
        out.push_str(ZERO_REQUESTS);
        out.push('\n');
        return out;
    }
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("Requests: {}", count_to_string_thousands(summary.requests)));
    if let Some(skipped) = skipped_to_string(summary.lines, &summary.skipped) {
        lines.push(skipped);
    }
    lines.push(String::new());
    plain_sections(&summary.verbs, &summary.status, Some(&summary.paths), &summary.metrics, "", &mut lines);

    if let Some(path_stats) = summary.path_stats.as_ref() {
        for pathsummary in path_stats.iter() {
            lines.push(format!("{} ({} requests)", pathsummary.path, count_to_string_thousands(pathsummary.requests)));
            lines.push(String::new());
            plain_sections(
                &pathsummary.verbs,
                &pathsummary.status,
                None,
                &pathsummary.metrics,
                INDENT,
                &mut lines,
            );
        }
    }
    // sections end with a blank line; keep a single trailing newline
    while lines.last().map(String::is_empty).unwrap_or(false) {
        lines.pop();
    }

    let mut out: String = lines.join("\n");
    out.push('\n');

    out
}

/// Layouts of a text table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TableStyle {
    /// reStructuredText simple table
    Simple,
    /// grid table
    Grid,
}

/// `text` padded to `width` display columns.
fn pad(
    text: &str,
    width: usize,
    right_align: bool,
) -> String {
    let fill: usize = width.saturating_sub(UnicodeWidthStr::width(text));
    let spaces: String = " ".repeat(fill);
    match right_align {
        true => format!("{}{}", spaces, text),
        false => format!("{}{}", text, spaces),
    }
}

/// Render `summary` as a text table in `style`.
pub fn render_table(
    summary: &ReportSummary,
    style: TableStyle,
) -> String {
    if summary.requests == 0 {
        return format!("{}\n", ZERO_REQUESTS);
    }

    render_text_table(&summary_to_table(summary), style)
}

/// Lay out `table` as a text table in `style`.
pub fn render_text_table(
    table: &Table,
    style: TableStyle,
) -> String {
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.to_text(NO_DATA))
                .collect()
        })
        .collect();
    // a column is numeric if all of its cells are
    let numeric: Vec<bool> = (0..table.headers.len())
        .map(|column| {
            table
                .rows
                .iter()
                .all(|row| row.get(column).map(Cell::is_numeric).unwrap_or(true))
        })
        .collect();
    let widths: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .map(|(column, header)| {
            let mut width: usize = UnicodeWidthStr::width(header.as_str());
            for row in cells.iter() {
                if let Some(text) = row.get(column) {
                    width = max!(width, UnicodeWidthStr::width(text.as_str()));
                }
            }

            width
        })
        .collect();

    let line = |texts: &[String]| -> String {
        let mut padded = texts
            .iter()
            .zip(widths.iter().zip(numeric.iter()))
            .map(|(text, (width, right_align))| pad(text, *width, *right_align));
        match style {
            TableStyle::Simple => padded.join("  ").trim_end().to_string(),
            TableStyle::Grid => format!("| {} |", padded.join(" | ")),
        }
    };
    let rule = |c: char| -> String {
        match style {
            TableStyle::Simple => widths
                .iter()
                .map(|width| c.to_string().repeat(*width))
                .join("  "),
            TableStyle::Grid => format!(
                "+{}+",
                widths
                    .iter()
                    .map(|width| c.to_string().repeat(*width + 2))
                    .join("+")
            ),
        }
    };

    let mut lines: Vec<String> = Vec::with_capacity(cells.len() * 2 + 4);
    match style {
        TableStyle::Simple => {
            lines.push(rule('='));
            lines.push(line(table.headers.as_slice()));
            lines.push(rule('='));
            for row in cells.iter() {
                lines.push(line(row.as_slice()));
            }
            lines.push(rule('='));
        }
        TableStyle::Grid => {
            lines.push(rule('-'));
            lines.push(line(table.headers.as_slice()));
            lines.push(rule('='));
            for row in cells.iter() {
                lines.push(line(row.as_slice()));
                lines.push(rule('-'));
            }
        }
    }

    let mut out: String = lines.join("\n");
    out.push('\n');

    out
}

/// Quote a CSV `field` if it contains the separator, a quote, or a line
/// break. Embedded quotes are doubled.
pub fn csv_quote(
    field: &str,
    separator: char,
) -> String {
    if !field.contains(|c: char| c == separator || c == '"' || c == '\n' || c == '\r') {
        return String::from(field);
    }

    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Replace tabs and line breaks in a TSV `field` with spaces.
fn tsv_clean(field: &str) -> String {
    field.replace(['\t', '\n', '\r'], " ")
}

/// Lay out `table` as separated values, one line per row. An empty
/// statistic is an empty field.
pub fn render_separated(
    table: &Table,
    separator: char,
) -> String {
    let field = |text: &str| -> String {
        match separator {
            '\t' => tsv_clean(text),
            _ => csv_quote(text, separator),
        }
    };
    let separator_s: String = separator.to_string();
    let mut out: String = table
        .headers
        .iter()
        .map(|header| field(header))
        .join(separator_s.as_str());
    out.push('\n');
    for row in table.rows.iter() {
        out.push_str(
            row.iter()
                .map(|cell| field(cell.to_text("").as_str()))
                .join(separator_s.as_str())
                .as_str(),
        );
        out.push('\n');
    }

    out
}
