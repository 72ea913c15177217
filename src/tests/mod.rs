// src/tests/mod.rs

//! Tests for _analoglib_.
//!
//! Tests are placed at `src/tests/`, inside the `analoglib`, for
//! crate-internal visibility. End-to-end tests through the public API are
//! at top-level path `tests/`.

pub mod common;
pub mod config_tests;
pub mod liststats_tests;
pub mod report_tests;
