//! Offline mutation queue.
//!
//! Mutations that fail while the service is unreachable are captured here
//! instead of surfacing an error, persisted durably, and replayed in
//! enqueue order once connectivity returns.
//!
//! Features:
//! - Strict FIFO replay through the same transport the request first took
//! - Linear backoff with a fixed retry ceiling per request
//! - Durable persistence across process restarts
//! - Lifecycle events for any front-end wanting to display queue status

pub mod connectivity;
pub mod events;
pub mod manager;
pub mod request;
pub mod store;

pub use connectivity::{ConnectivityMonitor, ConnectivityState, NetworkWatcher, Subscription};
pub use events::{ListenerId, QueueEvent, QueueEventKind};
pub use manager::{OfflineQueue, QueueStatus, MAX_RETRIES, RETRY_DELAY};
pub use request::{NewMutation, QueuedRequest};
pub use store::{QueueStore, QUEUE_STORAGE_KEY};
