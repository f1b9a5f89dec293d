//! Test utilities for aqi-client
//!
//! Serves an axum router on an ephemeral local port and hands back a client
//! whose base URL points at it, so feed handlers can be mocked without
//! touching the public API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::{AqiClient, ClientConfig, Result, Transport};

/// A mock API server that shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: AqiClient,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Start serving `router` with a client on the default transport
    ///
    /// # Example
    ///
    /// ```ignore
    /// use axum::{routing::get, Router};
    /// use aqi_client::{testing::TestServer, Context};
    ///
    /// let router = Router::new().route(
    ///     "/feed/{*station}",
    ///     get(|| async { r#"{"status":"ok","data":{"aqi":42}}"# }),
    /// );
    /// let server = TestServer::start(router).await?;
    /// let reading = server.client.latest(&Context::background(), "here").await?;
    /// assert_eq!(reading.aqi, 42);
    /// ```
    pub async fn start(router: axum::Router) -> Result<Self> {
        Self::start_with_transport(router, None).await
    }

    /// Start serving `router` with a client that sends through `transport`
    pub async fn start_with_transport(
        router: axum::Router,
        transport: Option<Arc<dyn Transport>>,
    ) -> Result<Self> {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        let config = ClientConfig::builder()
            .base_url(format!("http://{}/", addr))
            .build();
        let client = AqiClient::with_config(&config, transport)?;

        Ok(Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Get a reference to the client
    pub fn client(&self) -> &AqiClient {
        &self.client
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        // Abort the task if still running
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
