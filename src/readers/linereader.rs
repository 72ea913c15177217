// src/readers/linereader.rs

//! Implements a [`LineReader`], a lazy, single-pass source of text lines
//! over any [`BufRead`].
//!
//! [`BufRead`]: std::io::BufRead

use crate::common::{Count, NLu8};

use std::io::{BufRead, Error};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Carriage return, removed before a trailing newline.
#[allow(non_upper_case_globals)]
const CRu8: u8 = 13;

/// Reads lines from a [`BufRead`], one at a time.
///
/// An `Iterator` of `String`. A line ending `"\n"` or `"\r\n"` is
/// removed. Invalid UTF-8 is replaced with `U+FFFD`; the line will then
/// not match most log format patterns and is skipped by the `Analyzer`.
///
/// The first I/O error ends iteration and is kept; see
/// [`LineReader::error`].
///
/// [`BufRead`]: std::io::BufRead
pub struct LineReader<R: BufRead> {
    reader: R,
    buffer: Vec<u8>,
    lines: Count,
    bytes: Count,
    error: Option<Error>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> LineReader<R> {
        LineReader {
            reader,
            buffer: Vec::with_capacity(1024),
            lines: 0,
            bytes: 0,
            error: None,
        }
    }

    /// Count of lines returned so far.
    pub const fn lines(&self) -> Count {
        self.lines
    }

    /// Count of bytes read so far, including line endings.
    pub const fn bytes(&self) -> Count {
        self.bytes
    }

    /// The I/O error that ended iteration, if any.
    pub const fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Take the I/O error that ended iteration, if any.
    pub fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.error.is_some() {
            return None;
        }
        self.buffer.clear();
        let read: usize = match self.reader.read_until(NLu8, &mut self.buffer) {
            Ok(read) => read,
            Err(err) => {
                defñ!("read_until error {}", err);
                self.error = Some(err);
                return None;
            }
        };
        if read == 0 {
            defñ!("EOF; lines {}, bytes {}", self.lines, self.bytes);
            return None;
        }
        self.bytes += read as Count;
        self.lines += 1;
        if self.buffer.last() == Some(&NLu8) {
            self.buffer.pop();
            if self.buffer.last() == Some(&CRu8) {
                self.buffer.pop();
            }
        }

        Some(String::from_utf8_lossy(&self.buffer).into_owned())
    }
}
