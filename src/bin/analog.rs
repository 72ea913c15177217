// src/bin/analog.rs

//! Driver program _analog_.
//!
//! Processes user-passed command-line arguments into a
//! [`Configuration`], reads one access log file (or stdin) line by line
//! through an [`Analyzer`] into a [`Report`], then renders the
//! [`ReportSummary`] to stdout.
//!
//! [`Configuration`]: analoglib::report::config::Configuration
//! [`Analyzer`]: analoglib::readers::analyzer::Analyzer
//! [`Report`]: analoglib::report::report::Report
//! [`ReportSummary`]: analoglib::report::summary::ReportSummary

#![allow(non_camel_case_types)]

// first setup the custom global allocator
use ::analoglib::common::AllocatorChosen;

cfg_if::cfg_if! {
    if #[cfg(feature = "jemalloc")] {
        use ::tikv_jemallocator::Jemalloc;
        #[global_allocator]
        static GLOBAL: Jemalloc = Jemalloc;
        const ALLOCATOR_CHOSEN: AllocatorChosen = AllocatorChosen::Jemalloc;
        const CLI_HELP_AFTER_ALLOCATOR: &str = "jemalloc";
    }
    else if #[cfg(feature = "mimalloc")] {
        use ::mimalloc::MiMalloc;
        #[global_allocator]
        static GLOBAL: MiMalloc = MiMalloc;
        const ALLOCATOR_CHOSEN: AllocatorChosen = AllocatorChosen::Mimalloc;
        const CLI_HELP_AFTER_ALLOCATOR: &str = "mimalloc";
    }
    else {
        const ALLOCATOR_CHOSEN: AllocatorChosen = AllocatorChosen::System;
        const CLI_HELP_AFTER_ALLOCATOR: &str = "system";
    }
}

use std::io::BufRead;
use std::process::ExitCode;
use std::sync::RwLock;
use std::time::{Duration as StdDuration, Instant};

use ::anyhow::{Context, Result as AnyResult};
use ::clap::{Parser, ValueEnum};
use ::const_format::concatcp;
use ::lazy_static::lazy_static;

use ::analoglib::common::{FPath, FPATH_STDIN};
use ::analoglib::data::datetime::{
    datetime_now,
    datetime_parse_from_str,
    FixedOffset,
    FIXEDOFFSET0,
};
use ::analoglib::data::logformat::{FORMAT_NAMES, FORMAT_NAME_NGINX};
use ::analoglib::debug::printers::{de_err, e_err, e_wrn};
use ::analoglib::printer::printers::{
    print_colored_stderr,
    write_stdout,
    Color,
    ColorChoice,
    COLOR_DIMMED,
    COLOR_ERROR,
    COLOR_WARNING,
};
use ::analoglib::printer::renderers::{render, OutputFormat};
use ::analoglib::readers::analyzer::Analyzer;
use ::analoglib::readers::helpers::open_fpath;
use ::analoglib::readers::linereader::LineReader;
use ::analoglib::report::config::{
    max_age_from_minutes,
    paths_from_str,
    split_list_values,
    Configuration,
    FormatSelection,
    DEFAULT_STATUS_CODES,
    DEFAULT_VERBS,
};
use ::analoglib::report::report::Report;
use ::analoglib::report::summary::ReportSummary;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// --------------------
// command-line parsing

thread_local! {
    static LOCAL_NOW_OFFSET: FixedOffset = {
        defo!("thread_local! LOCAL_NOW_OFFSET::new()");

        *datetime_now().offset()
    };
}

/// CLI enum that maps to [`termcolor::ColorChoice`].
///
/// [`termcolor::ColorChoice`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.ColorChoice.html
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    ValueEnum, // from `clap`
)]
enum CLI_Color_Choice {
    always,
    auto,
    never,
}

/// Prefix of an argument naming an argument file.
const ARGFILE_PREFIX: char = '@';

/// Comment prefix within an argument file.
const ARGFILE_COMMENT: char = '#';

#[cfg(debug_assertions)]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "\nDEBUG BUILD";
#[cfg(not(debug_assertions))]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "";

const CLI_HELP_AFTER: &str = concatcp!(
    "\
Paths are grouped by the first PREFIX the path starts with, in the order
given. Given prefixes \"/docs/api\" then \"/docs\", path \"/docs/api/v1\" is
counted under \"/docs/api\". Paths matching no prefix are counted under
\"(other)\". Without any prefix, paths are grouped by exact path.

Predefined log formats (--format): ", FORMAT_NAMES[0], "

A custom format (--regex) must have named groups:
    timestamp verb path status body_bytes_sent request_time
    upstream_response_time
and needs a strftime timestamp format (--time-format), e.g.
    \"%d/%b/%Y:%H:%M:%S %z\"

An argument \"@FILE\" is replaced by the arguments in FILE. Each line may
hold options and values, e.g. \"--path /api\" or \"--status=2,4\".
Lines starting with \"#\" are ignored.

LOG files ending \".gz\" or \".bz2\" are decompressed.

Allocator: ", CLI_HELP_AFTER_ALLOCATOR, "
",
    CLI_HELP_AFTER_NOTE_DEBUG,
);

// clap command-line arguments build-time definitions.
//
// Note:
// * the `about` is taken from `Cargo.toml:[package]:description`.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    name = "analog",
    // write expanded information for the `--version` output
    version = concatcp!(
        "\n",
        "Version: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "Allocator: ", CLI_HELP_AFTER_ALLOCATOR , "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
        "Repository: ", env!("CARGO_PKG_REPOSITORY"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Access log file to analyze. Defaults to STDIN for piping.
    #[clap(
        default_value = FPATH_STDIN,
        verbatim_doc_comment,
    )]
    log: FPath,

    /// Predefined log format.
    #[clap(
        short = 'f',
        long,
        verbatim_doc_comment,
        value_parser = clap::builder::PossibleValuesParser::new(FORMAT_NAMES),
        default_value = FORMAT_NAME_NGINX,
        conflicts_with = "regex",
    )]
    format: String,

    /// Regex log format pattern with named groups.
    #[clap(
        short = 'r',
        long,
        verbatim_doc_comment,
        requires = "time_format",
    )]
    regex: Option<String>,

    /// strftime timestamp format of the --regex log format.
    #[clap(
        short = 't',
        long = "time-format",
        verbatim_doc_comment,
        requires = "regex",
    )]
    time_format: Option<String>,

    /// Path PREFIX to group requests by. May be passed multiple times.
    /// Order matters; the first matching PREFIX is used.
    #[clap(
        short = 'p',
        long = "path",
        value_name = "PREFIX",
        verbatim_doc_comment,
        conflicts_with = "pathconf",
    )]
    paths: Vec<String>,

    /// File of path prefixes, one PREFIX per line.
    #[clap(
        short = 'c',
        long,
        verbatim_doc_comment,
    )]
    pathconf: Option<FPath>,

    /// HTTP VERB to count. May be passed multiple times or separated by
    /// commas.
    /// [default: DELETE,GET,PATCH,POST,PUT]
    #[clap(
        short = 'v',
        long = "verb",
        value_name = "VERB",
        verbatim_doc_comment,
    )]
    verbs: Vec<String>,

    /// Status code PREFIX to count. May be passed multiple times or
    /// separated by commas, e.g. "2,404,4".
    /// [default: 1,2,3,4,5]
    #[clap(
        short = 's',
        long = "status",
        value_name = "PREFIX",
        verbatim_doc_comment,
    )]
    status_codes: Vec<String>,

    /// Analyze only entries at most MINUTES old.
    #[clap(
        short = 'a',
        long,
        value_name = "MINUTES",
        verbatim_doc_comment,
    )]
    max_age: Option<i64>,

    /// Default timezone offset for timestamp formats without a timezone.
    /// Example values, "+12", "-0800", "+02:00".
    /// To pass a value with leading "-" use "=" notation, e.g.
    /// "--tz-offset=-0800".
    /// If not passed then the local system timezone offset is used.
    #[clap(
        long,
        verbatim_doc_comment,
        value_parser = cli_process_tz_offset,
        default_value_t = LOCAL_NOW_OFFSET.with(|lno| *lno),
    )]
    tz_offset: FixedOffset,

    /// Also print statistics per path group.
    #[clap(
        long,
        verbatim_doc_comment,
    )]
    path_stats: bool,

    /// Output format.
    #[clap(
        short = 'o',
        long,
        verbatim_doc_comment,
        value_enum,
        default_value_t = OutputFormat::Plain,
    )]
    output: OutputFormat,

    /// Print the analysis time to STDERR.
    #[clap(
        long,
        verbatim_doc_comment,
    )]
    timing: bool,

    /// Choose to print using colors.
    #[clap(
        required = false,
        long = "color",
        verbatim_doc_comment,
        value_enum,
        default_value_t = CLI_Color_Choice::auto,
    )]
    color_choice: CLI_Color_Choice,
}

/// CLI argument processing
fn cli_process_tz_offset(tzo: &str) -> std::result::Result<FixedOffset, String> {
    // transform the timezone string to a `FixedOffset` instance
    // using a dummy `DateTimeL`
    let mut data: String = String::from("2000-01-02 03:04:05 ");
    data.push_str(tzo);
    for pattern in [
        "%Y-%m-%d %H:%M:%S %:z",
        "%Y-%m-%d %H:%M:%S %z",
        "%Y-%m-%d %H:%M:%S %#z",
    ] {
        let dt = datetime_parse_from_str(data.as_str(), pattern, true, &FIXEDOFFSET0);
        defo!("datetime_parse_from_str({:?}, {:?}) returned {:?}", data, pattern, dt);
        if let Some(dt_) = dt {
            defñ!("return {:?}", dt_.offset());
            return Ok(*dt_.offset());
        }
    }

    Err(format!("Unable to parse a timezone offset for --tz-offset {:?}", tzo))
}

/// Arguments of one argument file line.
///
/// Whitespace separates arguments, except after a trailing comma, so
/// `--status 2, 4` is `["--status", "2,4"]`.
fn argfile_line_to_args(line: &str) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    for word in line.split_whitespace() {
        match args.last_mut() {
            Some(last) if last.ends_with(',') => last.push_str(word),
            _ => args.push(String::from(word)),
        }
    }

    args
}

/// Replace every argument `@FILE` with the arguments read from FILE.
fn args_expand_argfiles<I>(args: I) -> AnyResult<Vec<String>>
where
    I: IntoIterator<Item = String>,
{
    let mut expanded: Vec<String> = Vec::new();
    for arg in args.into_iter() {
        let fpath: &str = match arg.strip_prefix(ARGFILE_PREFIX) {
            Some(fpath) if !fpath.is_empty() && !expanded.is_empty() => fpath,
            _ => {
                expanded.push(arg);
                continue;
            }
        };
        defo!("argfile {:?}", fpath);
        let data: String = std::fs::read_to_string(fpath)
            .with_context(|| format!("failed to read argument file {:?}", fpath))?;
        for line in data.lines() {
            let line: &str = line.trim();
            if line.is_empty() || line.starts_with(ARGFILE_COMMENT) {
                continue;
            }
            expanded.extend(argfile_line_to_args(line));
        }
    }

    Ok(expanded)
}

/// Process the parsed command-line arguments into a [`Configuration`].
fn cli_process_args(args: &CLI_Args) -> AnyResult<Configuration> {
    defn!();
    let format: FormatSelection = match (&args.regex, &args.time_format) {
        (Some(pattern), Some(time_format)) => FormatSelection::Custom {
            pattern: pattern.clone(),
            time_format: time_format.clone(),
        },
        _ => FormatSelection::Named(args.format.clone()),
    };
    let paths: Vec<String> = match &args.pathconf {
        Some(pathconf) => {
            let data: String = std::fs::read_to_string(pathconf)
                .with_context(|| format!("failed to read path configuration file {:?}", pathconf))?;

            paths_from_str(data.as_str())
        }
        None => args.paths.clone(),
    };
    let verbs: Vec<String> = match args.verbs.is_empty() {
        true => DEFAULT_VERBS.iter().map(|s| String::from(*s)).collect(),
        false => split_list_values(&args.verbs),
    };
    let status_codes: Vec<String> = match args.status_codes.is_empty() {
        true => DEFAULT_STATUS_CODES.iter().map(|s| String::from(*s)).collect(),
        false => split_list_values(&args.status_codes),
    };
    let max_age = match args.max_age {
        Some(minutes) => Some(max_age_from_minutes(minutes)?),
        None => None,
    };
    let config = Configuration {
        format,
        tz_offset: args.tz_offset,
        verbs,
        status_codes,
        paths,
        max_age,
        path_stats: args.path_stats,
    };
    // fail now for a bad format, before reading any input
    config.logformat()?;
    defx!("{:?}", config);

    Ok(config)
}

// --------------------
// signal handling

lazy_static! {
    /// flag to signal to main thread should return ASAP.
    /// Polled while pulling lines.
    static ref EXIT_EARLY: RwLock<bool> = {
        defñ!("lazy_static! exit_early");

        RwLock::new(false)
    };
}

/// set a process signal handler
pub fn set_signal_handler() -> anyhow::Result<(), ctrlc::Error> {
    defn!();

    ctrlc::set_handler(move || {
        defn!();
        // signal the line loop to stop
        match EXIT_EARLY.write() {
            Ok(mut exit_early) => {
                *exit_early = true;
            }
            Err(_err) => {
                de_err!("EXIT_EARLY.write() failed {}", _err);
            }
        }
        defx!();
    })?;

    defx!();

    Ok(())
}

/// Has an interrupt been received?
fn exit_early() -> bool {
    match EXIT_EARLY.read() {
        Ok(exit_early) => *exit_early,
        Err(err) => {
            e_err!("EXIT_EARLY.read() failed: {:?}", err);

            true
        }
    }
}

// --------------------
// processing

/// Analyze the `log` file with `config`.
///
/// Returns the summary of all lines read, even if reading was interrupted
/// or failed part way; a read error is returned as the second value.
fn analyze_fpath(
    log: &FPath,
    config: &Configuration,
) -> AnyResult<(ReportSummary, Option<std::io::Error>)> {
    defn!("({:?})", log);
    let mut analyzer: Analyzer = Analyzer::from_config(config, None)?;
    let mut report: Report = Report::new(config);
    let reader: Box<dyn BufRead> = open_fpath(log)?;
    let mut linereader = LineReader::new(reader);
    analyzer.analyze(
        linereader
            .by_ref()
            .take_while(|_| !exit_early()),
        &mut report,
    );
    let error: Option<std::io::Error> = linereader.take_error();
    defo!("read {} lines, {} bytes", linereader.lines(), linereader.bytes());
    let summary: ReportSummary = analyzer.summary(&report);
    defx!("requests {}", summary.requests);

    Ok((summary, error))
}

/// Print `message` to stderr in `color`.
fn print_stderr(
    color: Color,
    color_choice: ColorChoice,
    message: &str,
) {
    let mut line: String = String::from(message);
    line.push('\n');
    if let Err(_err) = print_colored_stderr(color, Some(color_choice), line.as_bytes()) {
        de_err!("print_colored_stderr failed {}", _err);
    }
}

/// Process the user-passed command-line arguments.
/// Analyze the log, print the report.
/// Determine a process return code.
pub fn main() -> ExitCode {
    defn!();
    defo!("allocator {}", ALLOCATOR_CHOSEN);

    let args_raw: Vec<String> = match args_expand_argfiles(std::env::args()) {
        Ok(args) => args,
        Err(err) => {
            e_err!("{:#}", err);
            return ExitCode::FAILURE;
        }
    };
    let args: CLI_Args = CLI_Args::parse_from(args_raw);
    defo!("{:?}", args);

    // map `CLI_Color_Choice` to `ColorChoice`
    let color_choice: ColorChoice = match args.color_choice {
        CLI_Color_Choice::always => ColorChoice::Always,
        CLI_Color_Choice::auto => ColorChoice::Auto,
        CLI_Color_Choice::never => ColorChoice::Never,
    };

    let config: Configuration = match cli_process_args(&args) {
        Ok(config) => config,
        Err(err) => {
            print_stderr(COLOR_ERROR, color_choice, format!("ERROR: {:#}", err).as_str());
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = set_signal_handler() {
        e_wrn!("failed to set the signal handler: {}", err);
    }

    let start_time = Instant::now();
    let (summary, error) = match analyze_fpath(&args.log, &config) {
        Ok(val) => val,
        Err(err) => {
            print_stderr(COLOR_ERROR, color_choice, format!("ERROR: {:#}", err).as_str());
            return ExitCode::FAILURE;
        }
    };
    let elapsed: StdDuration = start_time.elapsed();

    write_stdout(render(&summary, args.output).as_bytes());

    if exit_early() {
        print_stderr(COLOR_WARNING, color_choice, "Execution cancelled.");
    }
    if args.timing {
        print_stderr(
            COLOR_DIMMED,
            color_choice,
            format!("Analyzed logs in {:.3}s.", elapsed.as_secs_f64()).as_str(),
        );
    }

    let exitcode: ExitCode = match error {
        Some(err) => {
            print_stderr(COLOR_ERROR, color_choice, format!("ERROR: reading {:?}: {}", args.log, err).as_str());

            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    };
    defx!("exitcode {:?}", exitcode);

    exitcode
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    use ::analoglib::data::datetime::{FixedOffset, Offset};
    use ::test_case::test_case;

    #[test_case("+00:00", 0; "zero colon")]
    #[test_case("-0800", -8 * 3600; "minus eight")]
    #[test_case("+02:00", 2 * 3600; "plus two colon")]
    #[test_case("+0530", 5 * 3600 + 30 * 60; "plus five thirty")]
    fn test_cli_process_tz_offset(
        tzo: &str,
        seconds: i32,
    ) {
        let offset: FixedOffset = cli_process_tz_offset(tzo).unwrap();
        assert_eq!(offset.fix().local_minus_utc(), seconds);
    }

    #[test_case("foo"; "word")]
    #[test_case(""; "empty")]
    fn test_cli_process_tz_offset_err(tzo: &str) {
        assert!(cli_process_tz_offset(tzo).is_err());
    }

    #[test_case("--path /api", &["--path", "/api"]; "option value")]
    #[test_case("--status=2,4", &["--status=2,4"]; "equals")]
    #[test_case("-s 2, 404,  4", &["-s", "2,404,4"]; "comma continuation")]
    #[test_case("GET POST", &["GET", "POST"]; "whitespace")]
    fn test_argfile_line_to_args(
        line: &str,
        expect: &[&str],
    ) {
        assert_eq!(argfile_line_to_args(line), expect);
    }

    #[test]
    fn test_args_expand_argfiles_no_argfile() {
        let args: Vec<String> = vec![String::from("analog"), String::from("-p"), String::from("/a")];
        let expanded = args_expand_argfiles(args.clone()).unwrap();
        assert_eq!(expanded, args);
    }

    #[test]
    fn test_args_expand_argfiles_missing() {
        let args: Vec<String> = vec![String::from("analog"), String::from("@/this/file/does/not/exist")];
        assert!(args_expand_argfiles(args).is_err());
    }

    #[test]
    fn test_cli_args_parse_defaults() {
        let args: CLI_Args = CLI_Args::parse_from(["analog"]);
        assert_eq!(args.log, FPATH_STDIN);
        assert_eq!(args.format, FORMAT_NAME_NGINX);
        assert_eq!(args.output, OutputFormat::Plain);
        let config = cli_process_args(&args).unwrap();
        assert_eq!(config.verbs, DEFAULT_VERBS);
        assert_eq!(config.status_codes, DEFAULT_STATUS_CODES);
        assert!(config.paths.is_empty());
        assert!(config.max_age.is_none());
        assert!(!config.path_stats);
    }

    #[test]
    fn test_cli_args_parse_lists() {
        let args: CLI_Args = CLI_Args::parse_from([
            "analog", "-v", "GET,POST", "-s", "2, 404", "-s", "5", "-p", "/docs/api", "-p", "/docs", "-a", "10",
            "--path-stats", "-o", "csv", "access.log",
        ]);
        let config = cli_process_args(&args).unwrap();
        assert_eq!(config.verbs, ["GET", "POST"]);
        assert_eq!(config.status_codes, ["2", "404", "5"]);
        assert_eq!(config.paths, ["/docs/api", "/docs"]);
        assert_eq!(config.max_age, Some(::analoglib::data::datetime::Duration::minutes(10)));
        assert!(config.path_stats);
        assert_eq!(args.output, OutputFormat::Csv);
        assert_eq!(args.log, "access.log");
    }

    #[test]
    fn test_cli_args_custom_format_bad_regex() {
        let args: CLI_Args = CLI_Args::parse_from(["analog", "-r", "(?P<verb>", "-t", "%s"]);
        assert!(cli_process_args(&args).is_err());
    }

    #[test]
    fn test_cli_args_negative_max_age() {
        let args: CLI_Args = CLI_Args::parse_from(["analog", "--max-age=-5"]);
        assert!(cli_process_args(&args).is_err());
    }

    #[test]
    fn test_cli_args_format_and_regex_conflict() {
        let result = CLI_Args::try_parse_from(["analog", "-f", "nginx", "-r", "x", "-t", "%s"]);
        assert!(result.is_err());
    }
}
