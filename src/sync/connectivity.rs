//! Connectivity monitoring.
//!
//! The queue manager only cares about true reachability edges
//! (offline-to-online and online-to-offline), so the watcher deduplicates
//! repeated same-state reports before notifying subscribers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// Point-in-time reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityState {
    /// Whether the service is believed reachable.
    pub reachable: bool,
}

/// A reachability provider: current state plus edge notifications.
pub trait ConnectivityMonitor: Send + Sync {
    /// Current reachability, used to seed state at startup.
    fn current_state(&self) -> ConnectivityState;

    /// Register a handler invoked on every reachability edge.
    ///
    /// The returned [`Subscription`] unsubscribes when dropped.
    fn subscribe(
        &self,
        handler: Box<dyn Fn(ConnectivityState) + Send + Sync>,
    ) -> Subscription;
}

/// Disposer for a connectivity subscription.
pub struct Subscription {
    watcher: Weak<WatcherInner>,
    id: u64,
}

impl Subscription {
    /// Explicitly release the subscription (also happens on drop).
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.watcher.upgrade() {
            if let Ok(mut handlers) = inner.handlers.lock() {
                handlers.entries.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

type Handler = Box<dyn Fn(ConnectivityState) + Send + Sync>;

#[derive(Default)]
struct Handlers {
    next_id: u64,
    entries: Vec<(u64, Handler)>,
}

struct WatcherInner {
    reachable: AtomicBool,
    handlers: Mutex<Handlers>,
}

/// Reachability tracker fed by observed transport outcomes and probes.
///
/// There is no OS-level reachability signal to subscribe to from a CLI
/// process, so the watcher derives state from what the transport actually
/// experiences: any completed request marks the service reachable, any
/// connectivity-classed failure marks it unreachable.
#[derive(Clone)]
pub struct NetworkWatcher {
    inner: Arc<WatcherInner>,
}

impl NetworkWatcher {
    /// Create a watcher with the given initial assumption.
    #[must_use]
    pub fn new(initially_reachable: bool) -> Self {
        Self {
            inner: Arc::new(WatcherInner {
                reachable: AtomicBool::new(initially_reachable),
                handlers: Mutex::new(Handlers::default()),
            }),
        }
    }

    /// Report an observed reachability state.
    ///
    /// Only true edges notify subscribers; repeated "still offline" (or
    /// "still online") reports are absorbed here.
    pub fn set_reachable(&self, reachable: bool) {
        let was = self.inner.reachable.swap(reachable, Ordering::SeqCst);
        if was == reachable {
            return;
        }

        log::debug!(
            "Connectivity edge: {}",
            if reachable { "online" } else { "offline" }
        );

        let state = ConnectivityState { reachable };
        if let Ok(handlers) = self.inner.handlers.lock() {
            for (_, handler) in &handlers.entries {
                handler(state);
            }
        }
    }
}

impl ConnectivityMonitor for NetworkWatcher {
    fn current_state(&self) -> ConnectivityState {
        ConnectivityState {
            reachable: self.inner.reachable.load(Ordering::SeqCst),
        }
    }

    fn subscribe(
        &self,
        handler: Box<dyn Fn(ConnectivityState) + Send + Sync>,
    ) -> Subscription {
        let id = match self.inner.handlers.lock() {
            Ok(mut handlers) => {
                handlers.next_id += 1;
                let id = handlers.next_id;
                handlers.entries.push((id, handler));
                id
            }
            Err(_) => 0,
        };

        Subscription {
            watcher: Arc::downgrade(&self.inner),
            id,
        }
    }
}
