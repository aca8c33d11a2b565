//! Output formatting for tether.
//!
//! This module provides formatters for displaying service data and
//! offline-queue state in pretty or JSON form.

mod json;
mod pretty;

use crate::api::types::{Contact, Habit, Project, Task};
use crate::api::Dispatch;
use crate::cli::args::OutputFormat;
use crate::error::TetherError;
use crate::sync::QueueStatus;

pub use json::*;
pub use pretty::*;

/// Format tasks based on output format
///
/// # Errors
///
/// Returns `TetherError::Parse` if JSON serialization fails.
pub fn format_tasks(tasks: &[Task], format: OutputFormat) -> Result<String, TetherError> {
    match format {
        OutputFormat::Pretty => Ok(format_tasks_pretty(tasks)),
        OutputFormat::Json => format_tasks_json(tasks),
    }
}

/// Format habits based on output format
///
/// # Errors
///
/// Returns `TetherError::Parse` if JSON serialization fails.
pub fn format_habits(habits: &[Habit], format: OutputFormat) -> Result<String, TetherError> {
    match format {
        OutputFormat::Pretty => Ok(format_habits_pretty(habits)),
        OutputFormat::Json => format_habits_json(habits),
    }
}

/// Format projects based on output format
///
/// # Errors
///
/// Returns `TetherError::Parse` if JSON serialization fails.
pub fn format_projects(projects: &[Project], format: OutputFormat) -> Result<String, TetherError> {
    match format {
        OutputFormat::Pretty => Ok(format_projects_pretty(projects)),
        OutputFormat::Json => format_projects_json(projects),
    }
}

/// Format contacts based on output format
///
/// # Errors
///
/// Returns `TetherError::Parse` if JSON serialization fails.
pub fn format_contacts(contacts: &[Contact], format: OutputFormat) -> Result<String, TetherError> {
    match format {
        OutputFormat::Pretty => Ok(format_contacts_pretty(contacts)),
        OutputFormat::Json => format_contacts_json(contacts),
    }
}

/// Format a queue status snapshot based on output format
///
/// # Errors
///
/// Returns `TetherError::Parse` if JSON serialization fails.
pub fn format_queue_status(
    status: &QueueStatus,
    format: OutputFormat,
) -> Result<String, TetherError> {
    match format {
        OutputFormat::Pretty => Ok(format_queue_status_pretty(status)),
        OutputFormat::Json => to_json(status),
    }
}

/// Format a mutation dispatch result based on output format
///
/// # Errors
///
/// Returns `TetherError::Parse` if JSON serialization fails.
pub fn format_dispatch(
    dispatch: &Dispatch,
    success_message: &str,
    format: OutputFormat,
) -> Result<String, TetherError> {
    match format {
        OutputFormat::Pretty => Ok(format_dispatch_pretty(dispatch, success_message)),
        OutputFormat::Json => format_dispatch_json(dispatch, success_message),
    }
}
