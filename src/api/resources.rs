//! Typed wrappers over the productivity service resources.
//!
//! Thin calls only: each method names a path and a verb and hands the rest
//! to the gateway, so offline interception applies uniformly.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::api::gateway::{ApiGateway, Dispatch};
use crate::api::types::{Contact, Habit, Method, NewTask, Project, Task};
use crate::error::TetherError;

/// Typed access to tasks, habits, projects, and contacts.
pub struct ResourceClient {
    gateway: Arc<ApiGateway>,
}

impl ResourceClient {
    /// Create a client over the given gateway.
    #[must_use]
    pub const fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// List all tasks.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response decoding fails.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, TetherError> {
        let response = self.gateway.get("/tasks").await?;
        parse_items(response.body)
    }

    /// Create a task.
    ///
    /// # Errors
    ///
    /// Returns an error on non-connectivity failures; offline creation is
    /// reported as [`Dispatch::Queued`].
    pub async fn create_task(&self, task: &NewTask) -> Result<Dispatch, TetherError> {
        self.gateway
            .send(Method::Post, "/tasks", Some(serde_json::to_value(task)?))
            .await
    }

    /// Mark a task completed.
    ///
    /// # Errors
    ///
    /// Returns an error on non-connectivity failures.
    pub async fn complete_task(&self, id: &str) -> Result<Dispatch, TetherError> {
        self.gateway
            .send(
                Method::Patch,
                &format!("/tasks/{id}"),
                Some(json!({"completed": true})),
            )
            .await
    }

    /// Replace a task.
    ///
    /// # Errors
    ///
    /// Returns an error on non-connectivity failures.
    pub async fn update_task(&self, id: &str, task: &NewTask) -> Result<Dispatch, TetherError> {
        self.gateway
            .send(
                Method::Put,
                &format!("/tasks/{id}"),
                Some(serde_json::to_value(task)?),
            )
            .await
    }

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns an error on non-connectivity failures.
    pub async fn delete_task(&self, id: &str) -> Result<Dispatch, TetherError> {
        self.gateway
            .send(Method::Delete, &format!("/tasks/{id}"), None)
            .await
    }

    /// List all habits.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response decoding fails.
    pub async fn list_habits(&self) -> Result<Vec<Habit>, TetherError> {
        let response = self.gateway.get("/habits").await?;
        parse_items(response.body)
    }

    /// Log a habit for today.
    ///
    /// # Errors
    ///
    /// Returns an error on non-connectivity failures.
    pub async fn log_habit(&self, id: &str) -> Result<Dispatch, TetherError> {
        self.gateway
            .send(Method::Post, &format!("/habits/{id}/log"), Some(json!({})))
            .await
    }

    /// List all projects.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response decoding fails.
    pub async fn list_projects(&self) -> Result<Vec<Project>, TetherError> {
        let response = self.gateway.get("/projects").await?;
        parse_items(response.body)
    }

    /// List all contacts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response decoding fails.
    pub async fn list_contacts(&self) -> Result<Vec<Contact>, TetherError> {
        let response = self.gateway.get("/contacts").await?;
        parse_items(response.body)
    }
}

/// Decode a list body, accepting either a bare array or `{"items": [...]}`.
fn parse_items<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, TetherError> {
    let items = match body {
        Value::Object(mut map) if map.contains_key("items") => {
            map.remove("items").unwrap_or(Value::Null)
        }
        Value::Null => Value::Array(Vec::new()),
        other => other,
    };

    serde_json::from_value(items).map_err(TetherError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_items_bare_array() {
        let body = json!([{"id": "t1", "title": "A"}]);
        let tasks: Vec<Task> = parse_items(body).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "t1");
    }

    #[test]
    fn test_parse_items_wrapped() {
        let body = json!({"count": 1, "items": [{"id": "t1", "title": "A"}]});
        let tasks: Vec<Task> = parse_items(body).unwrap();
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn test_parse_items_null_is_empty() {
        let tasks: Vec<Task> = parse_items(Value::Null).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_parse_items_wrong_shape_is_an_error() {
        let result: Result<Vec<Task>, _> = parse_items(json!({"unexpected": true}));
        assert!(result.is_err());
    }
}
