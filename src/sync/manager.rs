//! Offline queue manager.
//!
//! The central state machine for offline mutations: owns the in-memory
//! queue, persists every change, and replays entries oldest-first once
//! connectivity returns. Replay is strictly sequential because queued
//! mutations may depend on each other (create-then-update on the same
//! resource); the manager cannot know which requests are independent, so
//! it serializes all of them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use std::time::Duration;

use serde::Serialize;

use crate::api::transport::Transport;
use crate::error::TetherError;

use super::connectivity::{ConnectivityMonitor, ConnectivityState, Subscription};
use super::events::{ListenerId, ListenerRegistry, QueueEvent, QueueEventKind};
use super::request::{NewMutation, QueuedRequest};
use super::store::QueueStore;

/// Replay attempts before a queued request is abandoned.
pub const MAX_RETRIES: u32 = 3;

/// Base delay between replay attempts; the wait grows linearly with the
/// attempt count, bounding how long one bad request can stall the rest of
/// the queue.
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Snapshot of queue state for display.
#[derive(Debug, Clone, Serialize)]
pub struct QueueStatus {
    /// Whether the service is believed reachable.
    pub is_online: bool,
    /// Number of pending requests.
    pub queue_length: usize,
    /// Copy of the pending requests, oldest first.
    pub queue: Vec<QueuedRequest>,
}

/// The offline mutation queue.
///
/// Constructed once at application bootstrap and shared by `Arc`; there is
/// exactly one queue, one connectivity state, one transport. The in-memory
/// queue and the online/draining flags are owned exclusively by this type.
pub struct OfflineQueue {
    queue: Mutex<Vec<QueuedRequest>>,
    online: AtomicBool,
    draining: AtomicBool,
    initialized: AtomicBool,
    store: QueueStore,
    listeners: ListenerRegistry,
    transport: OnceLock<Arc<dyn Transport>>,
    subscription: Mutex<Option<Subscription>>,
    max_retries: u32,
    retry_delay: Duration,
}

impl OfflineQueue {
    /// Create a queue over the given store with the default retry policy.
    #[must_use]
    pub fn new(store: QueueStore) -> Self {
        Self {
            queue: Mutex::new(Vec::new()),
            online: AtomicBool::new(false),
            draining: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            store,
            listeners: ListenerRegistry::new(),
            transport: OnceLock::new(),
            subscription: Mutex::new(None),
            max_retries: MAX_RETRIES,
            retry_delay: RETRY_DELAY,
        }
    }

    /// Override the retry policy (attempt ceiling and base backoff delay).
    #[must_use]
    pub const fn with_policy(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Load persisted state, seed reachability, and start watching for
    /// connectivity edges. Call once at startup; if the service is
    /// reachable and requests are pending, a drain begins before this
    /// returns.
    ///
    /// # Errors
    ///
    /// Returns a usage error if called more than once.
    pub async fn initialize(
        self: Arc<Self>,
        transport: Arc<dyn Transport>,
        monitor: &dyn ConnectivityMonitor,
    ) -> Result<(), TetherError> {
        if self.transport.set(transport).is_err() {
            return Err(TetherError::Usage(
                "offline queue is already initialized".to_string(),
            ));
        }

        {
            let mut queue = self.lock_queue()?;
            *queue = self.store.load();
        }

        let state = monitor.current_state();
        self.online.store(state.reachable, Ordering::SeqCst);

        // Connectivity handlers run synchronously in the notifier, so hop
        // onto the runtime for the actual transition work.
        let weak = Arc::downgrade(&self);
        let subscription = monitor.subscribe(Box::new(move |state| {
            if let Some(queue) = weak.upgrade() {
                tokio::spawn(async move {
                    queue.on_connectivity(state).await;
                });
            }
        }));

        {
            let mut slot = self.lock_subscription()?;
            *slot = Some(subscription);
        }

        self.initialized.store(true, Ordering::SeqCst);

        let pending = self.queue_length();
        log::info!(
            "Offline queue initialized: {pending} pending, {}",
            if state.reachable { "online" } else { "offline" }
        );

        if state.reachable && pending > 0 {
            self.drain().await;
        }

        Ok(())
    }

    /// Append a mutation to the queue.
    ///
    /// The request is persisted before this returns; replay never happens
    /// before this returns. Emits an `enqueued` event.
    ///
    /// # Errors
    ///
    /// Returns a usage error if the queue is not initialized or the verb is
    /// not a mutation verb.
    pub fn enqueue(&self, mutation: NewMutation) -> Result<String, TetherError> {
        self.ensure_initialized()?;

        if !mutation.method.is_mutation() {
            return Err(TetherError::Usage(format!(
                "{} requests are never queued",
                mutation.method
            )));
        }

        let request = QueuedRequest::new(mutation);
        let id = request.id.clone();

        let (snapshot, length) = {
            let mut queue = self.lock_queue()?;
            queue.push(request.clone());
            (queue.clone(), queue.len())
        };
        self.persist(&snapshot);

        log::debug!("Queued {} {} as {id}", request.method, request.url);
        self.emit(QueueEventKind::Enqueued, Some(request), None, length);

        Ok(id)
    }

    /// Remove a pending request by id, regardless of queue position.
    ///
    /// Supports out-of-band cancellation; returns whether an entry was
    /// found.
    ///
    /// # Errors
    ///
    /// Returns a usage error if the queue is not initialized.
    pub fn remove(&self, id: &str) -> Result<bool, TetherError> {
        self.ensure_initialized()?;

        let (removed, snapshot) = {
            let mut queue = self.lock_queue()?;
            let before = queue.len();
            queue.retain(|r| r.id != id);
            (queue.len() != before, queue.clone())
        };

        if removed {
            self.persist(&snapshot);
            log::debug!("Removed queued request {id}");
        }

        Ok(removed)
    }

    /// Empty the queue, abandoning all pending mutations.
    ///
    /// Used on logout; the caller owns surfacing the tradeoff to the user.
    /// Returns the number of abandoned requests.
    ///
    /// # Errors
    ///
    /// Returns a usage error if the queue is not initialized.
    pub fn clear(&self) -> Result<usize, TetherError> {
        self.ensure_initialized()?;

        let cleared = {
            let mut queue = self.lock_queue()?;
            let count = queue.len();
            queue.clear();
            count
        };
        self.persist(&[]);

        if cleared > 0 {
            log::info!("Cleared {cleared} pending requests from the offline queue");
        }

        Ok(cleared)
    }

    /// Replay queued requests oldest-first through the transport.
    ///
    /// Normally driven by the offline-to-online edge; exposed so a manual
    /// sync can force a pass. Only one drain runs at a time; a concurrent
    /// call returns immediately. Returns the number of successfully
    /// replayed requests.
    pub async fn drain(&self) -> usize {
        let Some(transport) = self.transport.get().cloned() else {
            log::warn!("Drain requested before initialize");
            return 0;
        };

        if self.draining.swap(true, Ordering::SeqCst) {
            return 0;
        }

        let mut completed = 0;

        loop {
            if !self.online.load(Ordering::SeqCst) {
                break;
            }
            let Some(head) = self.peek_head() else {
                break;
            };

            self.emit(
                QueueEventKind::Processing,
                Some(head.clone()),
                None,
                self.queue_length(),
            );

            match transport.send(&head.as_api_request()).await {
                Ok(_) => {
                    let length = self.pop_head(&head.id);
                    completed += 1;
                    log::debug!("Replayed {} {} ({})", head.method, head.url, head.id);
                    self.emit(QueueEventKind::Completed, Some(head), None, length);
                }
                Err(e) => {
                    // The head may have been removed out-of-band mid-attempt
                    let Some(retries) = self.bump_retries(&head.id) else {
                        continue;
                    };

                    if retries >= self.max_retries {
                        let length = self.pop_head(&head.id);
                        log::warn!(
                            "Abandoning {} {} after {retries} attempts: {e}",
                            head.method,
                            head.url
                        );
                        self.emit(
                            QueueEventKind::Failed,
                            Some(head),
                            Some(e.to_string()),
                            length,
                        );
                    } else {
                        log::debug!(
                            "Replay attempt {retries} failed for {}: {e}",
                            head.id
                        );
                        tokio::time::sleep(self.retry_delay * retries).await;
                        // The loop re-checks `online` next; if connectivity
                        // dropped during the wait, the head stays queued for
                        // the next drain.
                    }
                }
            }
        }

        self.draining.store(false, Ordering::SeqCst);
        completed
    }

    /// Whether the service is currently believed reachable.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Whether a drain loop is currently running.
    #[must_use]
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::SeqCst)
    }

    /// Number of pending requests.
    #[must_use]
    pub fn queue_length(&self) -> usize {
        self.queue.lock().map(|q| q.len()).unwrap_or(0)
    }

    /// Copy of the pending requests, oldest first.
    #[must_use]
    pub fn queue(&self) -> Vec<QueuedRequest> {
        self.queue.lock().map(|q| q.clone()).unwrap_or_default()
    }

    /// Convenience snapshot for display.
    #[must_use]
    pub fn status(&self) -> QueueStatus {
        let queue = self.queue();
        QueueStatus {
            is_online: self.is_online(),
            queue_length: queue.len(),
            queue,
        }
    }

    /// Register a lifecycle event listener; the returned id unsubscribes.
    pub fn add_listener(
        &self,
        listener: impl Fn(&QueueEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        self.listeners.add(listener)
    }

    /// Remove a previously registered listener.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Release the connectivity subscription and drop all listeners.
    pub fn shutdown(&self) {
        if let Ok(mut slot) = self.subscription.lock() {
            *slot = None;
        }
        self.listeners.clear();
        log::debug!("Offline queue shut down");
    }

    /// Handle a reachability edge from the connectivity monitor.
    ///
    /// A transition event is emitted for both directions regardless of
    /// queue state; going online with pending requests starts a drain.
    async fn on_connectivity(&self, state: ConnectivityState) {
        let was = self.online.swap(state.reachable, Ordering::SeqCst);
        if was == state.reachable {
            return;
        }

        let pending = self.queue_length();
        if state.reachable {
            log::info!("Connectivity restored ({pending} pending)");
            self.emit(QueueEventKind::Online, None, None, pending);
            if pending > 0 {
                self.drain().await;
            }
        } else {
            log::info!("Connectivity lost");
            self.emit(QueueEventKind::Offline, None, None, pending);
        }
    }

    fn ensure_initialized(&self) -> Result<(), TetherError> {
        if self.initialized.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(TetherError::Usage(
                "offline queue used before initialize".to_string(),
            ))
        }
    }

    fn lock_queue(&self) -> Result<MutexGuard<'_, Vec<QueuedRequest>>, TetherError> {
        self.queue
            .lock()
            .map_err(|_| TetherError::Storage("Queue mutex poisoned".to_string()))
    }

    fn lock_subscription(&self) -> Result<MutexGuard<'_, Option<Subscription>>, TetherError> {
        self.subscription
            .lock()
            .map_err(|_| TetherError::Storage("Subscription mutex poisoned".to_string()))
    }

    /// Persist the given snapshot; failures are logged, never propagated:
    /// the in-memory queue remains authoritative for this process.
    fn persist(&self, queue: &[QueuedRequest]) {
        if let Err(e) = self.store.save(queue) {
            log::warn!("Failed to persist offline queue: {e}");
        }
    }

    fn peek_head(&self) -> Option<QueuedRequest> {
        self.queue.lock().ok().and_then(|q| q.first().cloned())
    }

    /// Pop the head if it still matches `id`; returns the new length.
    fn pop_head(&self, id: &str) -> usize {
        let Ok(mut queue) = self.queue.lock() else {
            return 0;
        };
        if queue.first().is_some_and(|r| r.id == id) {
            queue.remove(0);
        }
        let snapshot = queue.clone();
        let length = queue.len();
        drop(queue);

        self.persist(&snapshot);
        length
    }

    /// Increment the head's retry count if it still matches `id`.
    fn bump_retries(&self, id: &str) -> Option<u32> {
        let mut queue = self.queue.lock().ok()?;
        let head = queue.first_mut().filter(|r| r.id == id)?;
        head.retries += 1;
        Some(head.retries)
    }

    fn emit(
        &self,
        kind: QueueEventKind,
        request: Option<QueuedRequest>,
        error: Option<String>,
        queue_length: usize,
    ) {
        self.listeners.emit(&QueueEvent {
            kind,
            request,
            error,
            queue_length,
        });
    }
}
