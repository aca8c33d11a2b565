//! tether - an offline-first CLI client for the Tether productivity service
//!
//! This crate provides a command-line interface for a remote
//! personal-productivity service (tasks, habits, projects, contacts).
//! Mutations issued while the service is unreachable are captured in a
//! durable offline queue and replayed in order once connectivity returns.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod storage;
pub mod sync;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::TetherError;
pub use sync::OfflineQueue;
