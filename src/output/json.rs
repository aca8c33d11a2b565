//! JSON output formatting for tether.
//!
//! This module provides functions for formatting service data as JSON.

use serde::Serialize;
use serde_json::json;

use crate::api::types::{Contact, Habit, Project, Task};
use crate::api::Dispatch;
use crate::error::TetherError;

/// Format tasks as JSON
///
/// # Errors
///
/// Returns `TetherError::Parse` if JSON serialization fails.
pub fn format_tasks_json(tasks: &[Task]) -> Result<String, TetherError> {
    let output = json!({
        "count": tasks.len(),
        "items": tasks
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format habits as JSON
///
/// # Errors
///
/// Returns `TetherError::Parse` if JSON serialization fails.
pub fn format_habits_json(habits: &[Habit]) -> Result<String, TetherError> {
    let output = json!({
        "count": habits.len(),
        "items": habits
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format projects as JSON
///
/// # Errors
///
/// Returns `TetherError::Parse` if JSON serialization fails.
pub fn format_projects_json(projects: &[Project]) -> Result<String, TetherError> {
    let output = json!({
        "count": projects.len(),
        "items": projects
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format contacts as JSON
///
/// # Errors
///
/// Returns `TetherError::Parse` if JSON serialization fails.
pub fn format_contacts_json(contacts: &[Contact]) -> Result<String, TetherError> {
    let output = json!({
        "count": contacts.len(),
        "items": contacts
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a mutation dispatch result as JSON
///
/// # Errors
///
/// Returns `TetherError::Parse` if JSON serialization fails.
pub fn format_dispatch_json(
    dispatch: &Dispatch,
    success_message: &str,
) -> Result<String, TetherError> {
    let output = match dispatch {
        Dispatch::Delivered(response) => json!({
            "queued": false,
            "message": success_message,
            "result": response.body
        }),
        Dispatch::Queued {
            request_id,
            message,
        } => json!({
            "queued": true,
            "request_id": request_id,
            "message": message
        }),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `TetherError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, TetherError> {
    Ok(serde_json::to_string_pretty(value)?)
}
