// src/debug/mod.rs

//! The `debug` module is macros and functions for printing diagnostics,
//! some only in debug builds and test builds.

#[cfg(test)]
pub mod helpers;

pub mod printers;
