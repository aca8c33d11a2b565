//! Persistent queue store.
//!
//! The whole pending-request list is serialized as one JSON array under a
//! fixed key. Durability is best-effort: the in-memory queue stays the
//! source of truth for the running process, so read and write failures are
//! logged rather than propagated into queue operations.

use std::sync::Arc;

use crate::error::TetherError;
use crate::storage::KeyValue;

use super::request::QueuedRequest;

/// Storage key holding the serialized queue blob.
pub const QUEUE_STORAGE_KEY: &str = "offline_queue";

/// Durable at-rest representation of the pending-request list.
pub struct QueueStore {
    store: Arc<dyn KeyValue>,
}

impl QueueStore {
    /// Create a queue store on top of a key-value backend.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValue>) -> Self {
        Self { store }
    }

    /// Read and deserialize the persisted queue.
    ///
    /// Missing or corrupt state loads as an empty queue; corruption is
    /// logged, never fatal.
    #[must_use]
    pub fn load(&self) -> Vec<QueuedRequest> {
        match self.store.get(QUEUE_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(queue) => queue,
                Err(e) => {
                    log::warn!("Discarding corrupt offline queue state: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Failed to read offline queue state: {e}");
                Vec::new()
            }
        }
    }

    /// Serialize and write the full queue.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails. The
    /// caller decides whether that is fatal; the queue manager logs it and
    /// keeps going.
    pub fn save(&self, queue: &[QueuedRequest]) -> Result<(), TetherError> {
        let raw = serde_json::to_string(queue)?;
        self.store.set(QUEUE_STORAGE_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::api::types::Method;
    use crate::storage::Database;
    use crate::sync::request::NewMutation;

    fn create_test_store() -> QueueStore {
        let db = Database::open_in_memory().unwrap();
        QueueStore::new(Arc::new(db))
    }

    fn make_request(url: &str) -> QueuedRequest {
        QueuedRequest::new(NewMutation {
            method: Method::Post,
            url: url.to_string(),
            data: Some(serde_json::json!({"title": "A"})),
            headers: BTreeMap::new(),
        })
    }

    #[test]
    fn test_load_empty_store() {
        let store = create_test_store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let store = create_test_store();
        let queue = vec![make_request("/tasks"), make_request("/habits/h1/log")];

        store.save(&queue).unwrap();

        assert_eq!(store.load(), queue);
    }

    #[test]
    fn test_save_of_load_is_identity() {
        let store = create_test_store();
        let queue = vec![make_request("/tasks")];
        store.save(&queue).unwrap();

        let loaded = store.load();
        store.save(&loaded).unwrap();

        assert_eq!(store.load(), queue);
    }

    #[test]
    fn test_corrupt_state_loads_as_empty() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        db.set(QUEUE_STORAGE_KEY, "{not json").unwrap();

        let store = QueueStore::new(db);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_replaces_previous_state() {
        let store = create_test_store();

        store.save(&[make_request("/tasks")]).unwrap();
        store.save(&[]).unwrap();

        assert!(store.load().is_empty());
    }
}
