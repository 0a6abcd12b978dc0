//! Command-line interface for the `qnah` binary.

pub mod commands;
