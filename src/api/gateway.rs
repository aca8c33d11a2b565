//! Request gateway with offline interception.
//!
//! Every outgoing request goes through the gateway. It attaches the
//! current credential, reports observed reachability to the network
//! watcher, and converts exactly one failure class, "mutation failed
//! while offline", into a queued acknowledgment instead of an error.
//! Reads and non-connectivity failures always propagate unchanged.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::api::credentials::CredentialStore;
use crate::api::transport::Transport;
use crate::api::types::{ApiRequest, ApiResponse, Method};
use crate::error::TetherError;
use crate::sync::{NetworkWatcher, NewMutation, OfflineQueue};

/// Outcome of a gateway dispatch.
///
/// Callers must be able to tell "succeeded now" from "queued for later";
/// permanent failures arrive as errors.
#[derive(Debug)]
pub enum Dispatch {
    /// The request reached the service and returned a success response.
    Delivered(ApiResponse),
    /// The request failed while offline and was queued for replay.
    Queued {
        /// Id of the queued request, usable for out-of-band cancellation.
        request_id: String,
        /// Human-readable note for display.
        message: String,
    },
}

impl Dispatch {
    /// Whether the request was queued rather than delivered.
    #[must_use]
    pub const fn is_queued(&self) -> bool {
        matches!(self, Self::Queued { .. })
    }
}

/// The single hook point in front of the transport.
pub struct ApiGateway {
    transport: Arc<dyn Transport>,
    queue: Arc<OfflineQueue>,
    watcher: NetworkWatcher,
    credentials: Arc<dyn CredentialStore>,
}

impl ApiGateway {
    /// Assemble the gateway from its collaborators.
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        queue: Arc<OfflineQueue>,
        watcher: NetworkWatcher,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            transport,
            queue,
            watcher,
            credentials,
        }
    }

    /// Dispatch a request, queueing mutations that fail offline.
    ///
    /// # Errors
    ///
    /// Read failures and non-connectivity failures propagate unchanged;
    /// only "mutation failed while offline" becomes a [`Dispatch::Queued`]
    /// result.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Dispatch, TetherError> {
        let mut headers = BTreeMap::new();
        if let Some(token) = self.credentials.bearer_token() {
            headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }

        let request = ApiRequest {
            method,
            path: path.to_string(),
            body,
            headers,
        };

        match self.transport.send(&request).await {
            Ok(response) => {
                self.watcher.set_reachable(true);
                Ok(Dispatch::Delivered(response))
            }
            Err(e) if e.is_connectivity() => {
                self.watcher.set_reachable(false);

                if method.is_mutation() {
                    let request_id = self.queue.enqueue(NewMutation {
                        method,
                        url: request.path,
                        data: request.body,
                        headers: request.headers,
                    })?;
                    log::info!("Offline: queued {method} {path} as {request_id}");
                    Ok(Dispatch::Queued {
                        request_id,
                        message: "Saved offline; will sync when the service is reachable"
                            .to_string(),
                    })
                } else {
                    Err(e)
                }
            }
            Err(e) => {
                // The service answered, just not happily; still reachable
                self.watcher.set_reachable(true);
                Err(e)
            }
        }
    }

    /// Dispatch a read and return the response.
    ///
    /// # Errors
    ///
    /// Propagates every failure; reads are never queued.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, TetherError> {
        match self.send(Method::Get, path, None).await? {
            Dispatch::Delivered(response) => Ok(response),
            Dispatch::Queued { .. } => Err(TetherError::Usage(
                "read requests are never queued".to_string(),
            )),
        }
    }

    /// Probe the service health endpoint, refreshing reachability.
    ///
    /// Returns whether the service is reachable. Any HTTP answer counts,
    /// even an error status; only connectivity failures count as
    /// unreachable.
    pub async fn probe(&self) -> bool {
        match self.send(Method::Get, "/health", None).await {
            Ok(_) => true,
            Err(e) => !e.is_connectivity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::api::credentials::ConfigCredentials;
    use crate::storage::Database;
    use crate::sync::connectivity::ConnectivityMonitor;
    use crate::sync::QueueStore;

    /// Transport stub that either answers or fails with a fixed error.
    struct StubTransport {
        error: Option<fn() -> TetherError>,
        calls: Mutex<Vec<ApiRequest>>,
    }

    impl StubTransport {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                error: None,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing(error: fn() -> TetherError) -> Arc<Self> {
            Arc::new(Self {
                error: Some(error),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TetherError> {
            self.calls.lock().unwrap().push(request.clone());
            match self.error {
                Some(make_error) => Err(make_error()),
                None => Ok(ApiResponse {
                    status: 200,
                    body: json!({"ok": true}),
                }),
            }
        }
    }

    fn offline_error() -> TetherError {
        TetherError::Network("connect error".to_string())
    }

    fn server_error() -> TetherError {
        TetherError::Api {
            status: 500,
            message: "boom".to_string(),
        }
    }

    async fn make_gateway(
        transport: Arc<StubTransport>,
        token: Option<&str>,
    ) -> (ApiGateway, Arc<OfflineQueue>, NetworkWatcher) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let store = QueueStore::new(db as Arc<dyn crate::storage::KeyValue>);
        let queue = Arc::new(
            OfflineQueue::new(store).with_policy(3, Duration::from_millis(10)),
        );
        let watcher = NetworkWatcher::new(true);
        Arc::clone(&queue)
            .initialize(Arc::clone(&transport) as Arc<dyn Transport>, &watcher)
            .await
            .unwrap();

        let gateway = ApiGateway::new(
            transport,
            Arc::clone(&queue),
            watcher.clone(),
            Arc::new(ConfigCredentials::new(token.map(ToString::to_string))),
        );
        (gateway, queue, watcher)
    }

    #[tokio::test]
    async fn test_delivered_on_success() {
        let transport = StubTransport::ok();
        let (gateway, queue, watcher) = make_gateway(Arc::clone(&transport), None).await;

        let dispatch = gateway
            .send(Method::Post, "/tasks", Some(json!({"title": "A"})))
            .await
            .unwrap();

        assert!(!dispatch.is_queued());
        assert_eq!(queue.queue_length(), 0);
        assert!(watcher.current_state().reachable);
    }

    #[tokio::test]
    async fn test_offline_mutation_is_queued() {
        let transport = StubTransport::failing(offline_error);
        let (gateway, queue, watcher) = make_gateway(Arc::clone(&transport), None).await;

        let dispatch = gateway
            .send(Method::Post, "/tasks", Some(json!({"title": "A"})))
            .await
            .unwrap();

        let Dispatch::Queued { request_id, .. } = dispatch else {
            panic!("expected a queued dispatch");
        };

        assert_eq!(queue.queue_length(), 1);
        assert_eq!(queue.queue()[0].id, request_id);
        assert_eq!(queue.queue()[0].url, "/tasks");
        assert!(!watcher.current_state().reachable);
    }

    #[tokio::test]
    async fn test_offline_read_propagates_error() {
        let transport = StubTransport::failing(offline_error);
        let (gateway, queue, _watcher) = make_gateway(Arc::clone(&transport), None).await;

        let result = gateway.get("/tasks").await;

        assert!(matches!(result, Err(TetherError::Network(_))));
        assert_eq!(queue.queue_length(), 0);
    }

    #[tokio::test]
    async fn test_server_error_propagates_unchanged() {
        let transport = StubTransport::failing(server_error);
        let (gateway, queue, watcher) = make_gateway(Arc::clone(&transport), None).await;

        let result = gateway
            .send(Method::Delete, "/tasks/1", None)
            .await;

        assert!(matches!(result, Err(TetherError::Api { status: 500, .. })));
        assert_eq!(queue.queue_length(), 0);
        // An answered request means the service is reachable
        assert!(watcher.current_state().reachable);
    }

    #[tokio::test]
    async fn test_bearer_token_attached_and_captured() {
        let transport = StubTransport::failing(offline_error);
        let (gateway, queue, _watcher) =
            make_gateway(Arc::clone(&transport), Some("tok-9")).await;

        gateway
            .send(Method::Post, "/tasks", Some(json!({"title": "A"})))
            .await
            .unwrap();

        // Attached to the outgoing attempt
        let sent = transport.calls.lock().unwrap();
        assert_eq!(
            sent[0].headers.get("Authorization"),
            Some(&"Bearer tok-9".to_string())
        );

        // Frozen into the queued record for replay
        assert_eq!(
            queue.queue()[0].headers.get("Authorization"),
            Some(&"Bearer tok-9".to_string())
        );
    }

    #[tokio::test]
    async fn test_probe_counts_http_errors_as_reachable() {
        let transport = StubTransport::failing(server_error);
        let (gateway, _queue, _watcher) = make_gateway(transport, None).await;
        assert!(gateway.probe().await);

        let transport = StubTransport::failing(offline_error);
        let (gateway, _queue, _watcher) = make_gateway(transport, None).await;
        assert!(!gateway.probe().await);
    }
}
