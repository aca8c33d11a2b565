//! Request/response types and data models for the Tether service API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP verbs used against the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Read a resource.
    Get,
    /// Create a resource.
    Post,
    /// Replace a resource.
    Put,
    /// Partially update a resource.
    Patch,
    /// Delete a resource.
    Delete,
}

impl Method {
    /// The canonical wire name of this verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Whether this verb mutates server state.
    ///
    /// Only mutation verbs are eligible for offline queueing; reads fail
    /// normally so callers can show stale or error state.
    #[must_use]
    pub const fn is_mutation(self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One outgoing request, independent of the HTTP client in use.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb.
    pub method: Method,
    /// Resource path relative to the configured API base.
    pub path: String,
    /// Optional JSON body, forwarded as submitted.
    pub body: Option<Value>,
    /// Request headers.
    pub headers: BTreeMap<String, String>,
}

/// A decoded response from the service.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded JSON body; `Value::Null` for empty bodies.
    pub body: Value,
}

/// A task on the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Payload for creating or replacing a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
}

/// A tracked habit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub last_logged: Option<String>,
}

/// A project grouping tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub task_count: u32,
}

/// A contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_verbs() {
        assert!(!Method::Get.is_mutation());
        assert!(Method::Post.is_mutation());
        assert!(Method::Put.is_mutation());
        assert!(Method::Patch.is_mutation());
        assert!(Method::Delete.is_mutation());
    }

    #[test]
    fn test_method_serialization() {
        let json = serde_json::to_string(&Method::Patch).unwrap();
        assert_eq!(json, r#""PATCH""#);

        let method: Method = serde_json::from_str(r#""DELETE""#).unwrap();
        assert_eq!(method, Method::Delete);
    }

    #[test]
    fn test_new_task_skips_empty_fields() {
        let task = NewTask {
            title: "Water the plants".to_string(),
            ..NewTask::default()
        };

        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(json, r#"{"title":"Water the plants"}"#);
    }
}
