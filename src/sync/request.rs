//! Queued request records for the offline mutation queue.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::types::{ApiRequest, Method};

/// A mutation handed to the queue: the caller's original request shape.
#[derive(Debug, Clone)]
pub struct NewMutation {
    /// HTTP verb; must be a mutation verb.
    pub method: Method,
    /// Resource path relative to the configured API base.
    pub url: String,
    /// Opaque request body, stored as submitted.
    pub data: Option<Value>,
    /// Headers in effect at enqueue time, including the bearer token.
    pub headers: BTreeMap<String, String>,
}

/// A durable record of one pending mutation.
///
/// The queue's order is structural (insertion order is replay order);
/// `timestamp` exists for display and debugging only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedRequest {
    /// Unique identifier assigned at enqueue time.
    pub id: String,
    /// HTTP verb (mutation verbs only; reads are never queued).
    pub method: Method,
    /// Resource path relative to the configured API base.
    pub url: String,
    /// Opaque request body.
    #[serde(default)]
    pub data: Option<Value>,
    /// Headers captured at enqueue time. If the auth token rotates before
    /// replay, the stale token is used; this is an accepted limitation.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Replay attempts made so far.
    #[serde(default)]
    pub retries: u32,
}

impl QueuedRequest {
    /// Build a fresh record from a caller's mutation.
    #[must_use]
    pub fn new(mutation: NewMutation) -> Self {
        Self {
            id: generate_request_id(),
            method: mutation.method,
            url: mutation.url,
            data: mutation.data,
            headers: mutation.headers,
            timestamp: Utc::now(),
            retries: 0,
        }
    }

    /// The request to replay, exactly as originally submitted.
    #[must_use]
    pub fn as_api_request(&self) -> ApiRequest {
        ApiRequest {
            method: self.method,
            path: self.url.clone(),
            body: self.data.clone(),
            headers: self.headers.clone(),
        }
    }
}

/// Time-based id with a random suffix. Ids only need to be unique within
/// one device's queue, so no global coordination is required.
fn generate_request_id() -> String {
    format!(
        "req-{}-{:04x}",
        Utc::now().timestamp_millis(),
        rand::random::<u16>()
    )
}
