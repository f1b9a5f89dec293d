//! AQI Client Library
//!
//! Provides a typed HTTP client for the World Air Quality Index feed API,
//! plus color scales for rendering index values.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use aqi_client::{AqiClient, Context, Palette};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = AqiClient::new()?;
//!     let ctx = Context::background().with_timeout(Duration::from_secs(10));
//!
//!     let reading = client.latest(&ctx, "beijing/daxing").await?;
//!     let color = Palette::Legend.rgb(reading.aqi);
//!     println!("AQI {} ({})", reading.aqi, color);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Custom Requests
//!
//! Other endpoints reuse the same build/dispatch pair. Credentials can ride
//! along in the path, or be set as default headers on a custom transport:
//!
//! ```rust,no_run
//! use aqi_client::{AqiClient, Context, Method};
//!
//! # async fn run(client: AqiClient) -> aqi_client::Result<()> {
//! let request = client.build_request(Method::GET, "feed/here/?token=demo", None::<&()>)?;
//! let mut body = serde_json::Value::Null;
//! let info = client.dispatch(&Context::background(), request, Some(&mut body)).await?;
//! println!("{} {}", info.status, body["status"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Testing
//!
//! The `testing` module serves an axum router locally:
//!
//! ```rust,ignore
//! use aqi_client::testing::TestServer;
//!
//! let server = TestServer::start(router).await?;
//! let reading = server.client.latest(&Context::background(), "here").await?;
//! ```

mod client;
pub mod color;
mod config;
mod context;
mod error;
mod feed;
pub mod testing;
mod transport;

pub use client::{AqiClient, ResponseInfo};
pub use color::{rgb, Level, Palette, Rgb};
pub use config::{
    ClientConfig, ClientConfigBuilder, ConfigError, DEFAULT_BASE_URL, DEFAULT_USER_AGENT,
};
pub use context::{Cause, Context};
pub use error::{AqiClientError, Result};
pub use feed::{
    Attribution, City, DebugInfo, FeedData, FeedResponse, Measurement, ObservationTime, Reading,
};
pub use transport::{default_transport, BoxError, Transport};

// Re-export request types so callers don't need a direct reqwest dependency
pub use reqwest::{Method, StatusCode};
