//! Queue lifecycle events and listener fan-out.
//!
//! Events are fire-and-forget broadcasts: delivery to one listener is
//! isolated from the others, and a misbehaving listener can never affect
//! queue state.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Mutex;

use serde::Serialize;

use super::request::QueuedRequest;

/// The kind of queue lifecycle transition an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueEventKind {
    /// A request was appended to the queue.
    Enqueued,
    /// A replay attempt for the head request is starting.
    Processing,
    /// The head request was replayed successfully and removed.
    Completed,
    /// The head request exhausted its retries and was abandoned.
    Failed,
    /// Connectivity transitioned to reachable.
    Online,
    /// Connectivity transitioned to unreachable.
    Offline,
}

impl std::fmt::Display for QueueEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Enqueued => "enqueued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Online => "online",
            Self::Offline => "offline",
        };
        write!(f, "{s}")
    }
}

/// An immutable notification describing one queue lifecycle transition.
#[derive(Debug, Clone, Serialize)]
pub struct QueueEvent {
    /// What happened.
    pub kind: QueueEventKind,
    /// The request involved, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<QueuedRequest>,
    /// Error detail for `Failed` events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Queue length at emission time.
    pub queue_length: usize,
}

/// Handle returned by [`ListenerRegistry::add`], used to unsubscribe.
pub type ListenerId = u64;

type Listener = Box<dyn Fn(&QueueEvent) + Send + Sync>;

/// Observer registry with isolated best-effort dispatch.
#[derive(Default)]
pub struct ListenerRegistry {
    inner: Mutex<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    next_id: ListenerId,
    listeners: Vec<(ListenerId, Listener)>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; the returned id unsubscribes it.
    pub fn add(&self, listener: impl Fn(&QueueEvent) + Send + Sync + 'static) -> ListenerId {
        let Ok(mut inner) = self.inner.lock() else {
            return 0;
        };
        inner.next_id += 1;
        let id = inner.next_id;
        inner.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns whether it was registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let Ok(mut inner) = self.inner.lock() else {
            return false;
        };
        let before = inner.listeners.len();
        inner.listeners.retain(|(listener_id, _)| *listener_id != id);
        inner.listeners.len() != before
    }

    /// Remove every listener.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.listeners.clear();
        }
    }

    /// Deliver an event to every listener in registration order.
    ///
    /// A panicking listener is logged and skipped; the remaining listeners
    /// still receive the event.
    pub fn emit(&self, event: &QueueEvent) {
        let Ok(inner) = self.inner.lock() else {
            log::warn!("Listener registry poisoned; dropping {} event", event.kind);
            return;
        };

        for (id, listener) in &inner.listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                log::warn!("Queue listener {id} panicked during {} dispatch", event.kind);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn make_event(kind: QueueEventKind) -> QueueEvent {
        QueueEvent {
            kind,
            request: None,
            error: None,
            queue_length: 0,
        }
    }

    #[test]
    fn test_emit_reaches_all_listeners() {
        let registry = ListenerRegistry::new();
        let count = Arc::new(AtomicU32::new(0));

        for _ in 0..3 {
            let count = Arc::clone(&count);
            registry.add(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }

        registry.emit(&make_event(QueueEventKind::Enqueued));
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let registry = ListenerRegistry::new();
        let count = Arc::new(AtomicU32::new(0));

        registry.add(|_| panic!("listener bug"));
        {
            let count = Arc::clone(&count);
            registry.add(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }

        registry.emit(&make_event(QueueEventKind::Processing));

        // The second listener still ran, and a later emit still works
        assert_eq!(count.load(Ordering::SeqCst), 1);
        registry.emit(&make_event(QueueEventKind::Completed));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_remove_listener() {
        let registry = ListenerRegistry::new();
        let count = Arc::new(AtomicU32::new(0));

        let id = {
            let count = Arc::clone(&count);
            registry.add(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };

        assert!(registry.remove(id));
        assert!(!registry.remove(id));

        registry.emit(&make_event(QueueEventKind::Online));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_clear_removes_everything() {
        let registry = ListenerRegistry::new();
        let count = Arc::new(AtomicU32::new(0));

        for _ in 0..2 {
            let count = Arc::clone(&count);
            registry.add(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }

        registry.clear();
        registry.emit(&make_event(QueueEventKind::Offline));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
