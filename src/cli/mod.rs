//! Command-line interface for tether.

pub mod args;
pub mod commands;
