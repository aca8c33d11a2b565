//! Command implementations.

mod auth;
mod contacts;
mod habits;
mod projects;
mod sync;
mod tasks;

pub use auth::auth;
pub use contacts::contacts;
pub use habits::habits;
pub use projects::projects;
pub use sync::sync;
pub use tasks::tasks;

use std::sync::Arc;

use crate::api::{ApiGateway, ResourceClient};
use crate::config::{Config, Paths};
use crate::sync::{NetworkWatcher, OfflineQueue};

/// Shared state threaded through every command.
///
/// Built once at startup; there is exactly one queue, one watcher, one
/// gateway per process.
pub struct AppContext {
    pub config: Config,
    pub paths: Paths,
    pub queue: Arc<OfflineQueue>,
    pub watcher: NetworkWatcher,
    pub gateway: Arc<ApiGateway>,
    pub resources: ResourceClient,
}
