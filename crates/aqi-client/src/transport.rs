//! Pluggable HTTP transport
//!
//! The client never opens sockets itself. Requests are handed to a
//! [`Transport`], which defaults to a process-wide [`reqwest::Client`].

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use reqwest::{Request, Response};

/// Boxed error produced by a transport
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Sends a built request and returns the response once headers arrive
///
/// Implementations are shared between concurrent calls and must not rely on
/// per-call mutable state. Dropping the returned future must abort the
/// in-flight request.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a single request
    async fn execute(&self, request: Request) -> Result<Response, BoxError>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn execute(&self, request: Request) -> Result<Response, BoxError> {
        reqwest::Client::execute(self, request)
            .await
            .map_err(Into::into)
    }
}

/// The shared transport used when the caller does not supply one
///
/// Every call returns a handle to the same connection pool.
pub fn default_transport() -> Arc<dyn Transport> {
    static DEFAULT: OnceLock<reqwest::Client> = OnceLock::new();
    Arc::new(DEFAULT.get_or_init(reqwest::Client::new).clone())
}
