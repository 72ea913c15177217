// src/data/datetime.rs

//! Functions to transform access log timestamp strings to chrono
//! [`DateTime`] instances, and to filter those instances by age.
//!
//! The most relevant documents to understand this file are:
//! - `chrono` crate [`strftime`] format.
//!
//! The most relevant functions are:
//! - [`time_format_validate`], called once when a [`LogFormat`] is created
//! - [`datetime_parse_from_str`], called once per parsed log line
//! - [`dt_after_or_before`], called once per parsed log line when a
//!   maximum age is configured
//!
//! [`DateTime`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html
//! [`strftime`]: https://docs.rs/chrono/0.4.40/chrono/format/strftime/index.html
//! [`LogFormat`]: crate::data::logformat::LogFormat

#![allow(non_camel_case_types)]

#[cfg(any(debug_assertions, test))]
use crate::debug::printers::str_to_String_noraw;

#[doc(hidden)]
pub use ::chrono::{
    DateTime,
    Duration,
    FixedOffset,
    Local,
    NaiveDateTime,
    Offset,
    TimeZone,
    Utc,
};
use ::chrono::format::{Item, StrftimeItems};
use ::lazy_static::lazy_static;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{dpfn, dpfo, dpfx, dpfñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DateTime types and strftime patterns
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Crate `chrono` [`strftime`] formatting pattern, passed to
/// chrono [`DateTime::parse_from_str`].
///
/// [`strftime`]: https://docs.rs/chrono/0.4.40/chrono/format/strftime/index.html
/// [`DateTime::parse_from_str`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html#method.parse_from_str
pub type DateTimePattern_str = str;

/// `DateTimeL` is the timestamp of a log entry, a chrono
/// [`DateTime<FixedOffset>`].
///
/// [`DateTime<FixedOffset>`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html
pub type DateTimeL = DateTime<FixedOffset>;
pub type DateTimeLOpt = Option<DateTimeL>;

lazy_static! {
    /// UTC as a `FixedOffset`, the fallback offset for timestamp patterns
    /// without a timezone.
    pub static ref FIXEDOFFSET0: FixedOffset = Utc.fix();

    /// Matches the strftime specifiers that parse a numeric timezone offset,
    /// e.g. `%z`, `%:z`, `%#z`.
    static ref REGEX_STRFTIME_TZ: Regex = Regex::new(r"%[:#]*z").unwrap();
}

/// Does the strftime `pattern` include a numeric timezone offset specifier?
pub fn pattern_has_tz(pattern: &DateTimePattern_str) -> bool {
    REGEX_STRFTIME_TZ.is_match(pattern)
}

/// Check that `pattern` is a usable strftime pattern for parsing.
///
/// Returns `Err` with a description of the problem for an empty pattern or
/// for a pattern with an unknown or incomplete specifier (e.g. `"%Q"`,
/// a trailing `"%"`).
pub fn time_format_validate(pattern: &DateTimePattern_str) -> Result<(), String> {
    dpfn!("({:?})", pattern);
    if pattern.is_empty() {
        dpfx!("empty pattern");
        return Err(String::from("timestamp format is empty"));
    }
    for item in StrftimeItems::new(pattern) {
        if let Item::Error = item {
            dpfx!("found Item::Error");
            return Err(format!("invalid strftime specifier in timestamp format {:?}", pattern));
        }
    }
    dpfx!("Ok");

    Ok(())
}

/// Convert a [`&str`] to a chrono [`Option<DateTime<FixedOffset>>`]
/// instance.
///
/// Compensate for a missing timezone.
///
/// - `data` to parse that has a datetime string
/// - strftime `pattern` to use for parsing
/// - `has_tz`, the `pattern` has a timezone (`%z`, `%:z`, etc.)?
/// - `tz_offset` fallback timezone offset when `!has_tz`
///
/// [`&str`]: str
/// [`Option<DateTime<FixedOffset>>`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html#impl-DateTime%3CFixedOffset%3E
pub fn datetime_parse_from_str(
    data: &str,
    pattern: &DateTimePattern_str,
    has_tz: bool,
    tz_offset: &FixedOffset,
) -> DateTimeLOpt {
    dpfn!("(pattern {:?}, tz_offset {:?}, data {:?})", pattern, tz_offset, str_to_String_noraw(data));

    // if `has_tz` then create a `DateTime`.
    // else if `!has_tz` then create a `NaiveDateTime`, then convert that to
    // `DateTime` using `tz_offset`.
    if has_tz {
        match DateTime::parse_from_str(data, pattern) {
            Ok(val) => {
                dpfx!("return Some({:?})", val);

                Some(val)
            }
            Err(_err) => {
                dpfx!("DateTime::parse_from_str({:?}, {:?}) failed ParseError: {}", data, pattern, _err);

                None
            }
        }
    } else {
        // no timezone in `pattern` so first convert to a `NaiveDateTime` instance
        let dt_naive = match NaiveDateTime::parse_from_str(data, pattern) {
            Ok(val) => val,
            Err(_err) => {
                dpfx!("NaiveDateTime.parse_from_str({:?}, {:?}) failed ParseError: {}", data, pattern, _err);
                return None;
            }
        };
        // second convert the `NaiveDateTime` instance to `DateTime<FixedOffset>` instance
        match tz_offset
            .from_local_datetime(&dt_naive)
            .earliest()
        {
            Some(val) => {
                dpfx!("return Some({:?})", val);

                Some(val)
            }
            None => {
                dpfx!("tz_offset.from_local_datetime({:?}).earliest() returned None", dt_naive);

                None
            }
        }
    }
}

/// Return the local system datetime "now" as a `DateTimeL`.
pub fn datetime_now() -> DateTimeL {
    Local::now().fixed_offset()
}

/// The oldest permitted timestamp for `now` and a maximum age `max_age`,
/// i.e. `now - max_age`.
///
/// Returns `None` on chrono range overflow, which callers treat as
/// "no datetime filter".
pub fn dt_oldest_permitted(
    now: &DateTimeL,
    max_age: &Duration,
) -> DateTimeLOpt {
    let dt = now.checked_sub_signed(*max_age);
    dpfñ!("({:?}, {:?}) return {:?}", now, max_age, dt);

    dt
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DateTime comparisons
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Describe the result of comparing one [`DateTimeL`] to one filter
/// [`DateTimeL`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Result_Filter_DateTime1 {
    /// like Success (no filter)
    Pass,
    /// like Success
    OccursAtOrAfter,
    /// like Failure
    OccursBefore,
}

impl Result_Filter_DateTime1 {
    /// Returns `true` if the result is [`OccursBefore`].
    #[inline(always)]
    pub const fn is_fail(&self) -> bool {
        matches!(*self, Result_Filter_DateTime1::OccursBefore)
    }
}

/// Compare passed [`DateTimeL`] `dt` to the passed filter `dt_filter`.
///
/// If `dt` is at or after `dt_filter` then return [`OccursAtOrAfter`]<br/>
/// If `dt` is before `dt_filter` then return [`OccursBefore`]<br/>
/// Else return [`Pass`] (including if `dt_filter` is `None`)
///
/// [`OccursAtOrAfter`]: crate::data::datetime::Result_Filter_DateTime1
/// [`OccursBefore`]: crate::data::datetime::Result_Filter_DateTime1
/// [`Pass`]: crate::data::datetime::Result_Filter_DateTime1
pub fn dt_after_or_before(
    dt: &DateTimeL,
    dt_filter: &DateTimeLOpt,
) -> Result_Filter_DateTime1 {
    let dt_a = match dt_filter {
        Some(dt_a) => dt_a,
        None => {
            dpfñ!("return Result_Filter_DateTime1::Pass; (no dt filter)");
            return Result_Filter_DateTime1::Pass;
        }
    };
    if dt < dt_a {
        dpfñ!("return OccursBefore; (dt {:?} is before dt_filter {:?})", dt, dt_a);
        return Result_Filter_DateTime1::OccursBefore;
    }
    dpfñ!("return OccursAtOrAfter; (dt {:?} is at or after dt_filter {:?})", dt, dt_a);

    Result_Filter_DateTime1::OccursAtOrAfter
}
