//! AQI HTTP client implementation

use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, Request, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ClientConfig;
use crate::context::Context;
use crate::error::{AqiClientError, Result};
use crate::transport::{default_transport, Transport};

const APPLICATION_JSON: &str = "application/json";

/// Status and headers of a successful response
///
/// The body has already been consumed by the time this is returned.
#[derive(Debug, Clone)]
pub struct ResponseInfo {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Final URL after any redirects the transport followed
    pub url: Url,
    /// Number of body bytes read
    pub content_length: usize,
}

/// Air quality API client
///
/// Immutable once built, so a single instance can be cloned or shared
/// across tasks.
#[derive(Clone)]
pub struct AqiClient {
    transport: Arc<dyn Transport>,
    base_url: Url,
    user_agent: Option<HeaderValue>,
}

impl fmt::Debug for AqiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AqiClient")
            .field("base_url", &self.base_url.as_str())
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl AqiClient {
    /// Create a client for the public API using the shared default transport
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default(), None)
    }

    /// Create a client for the public API that sends through `transport`
    pub fn with_transport(transport: Arc<dyn Transport>) -> Result<Self> {
        Self::with_config(&ClientConfig::default(), Some(transport))
    }

    /// Create a client from configuration
    ///
    /// When `transport` is `None` the shared default transport is used.
    pub fn with_config(
        config: &ClientConfig,
        transport: Option<Arc<dyn Transport>>,
    ) -> Result<Self> {
        let base_url = config.parsed_base_url()?;
        let user_agent = config.parsed_user_agent()?;
        let transport = transport.unwrap_or_else(default_transport);

        Ok(Self {
            transport,
            base_url,
            user_agent,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the configured `User-Agent` value
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_ref().and_then(|v| v.to_str().ok())
    }

    /// Build a request without sending it
    ///
    /// `path` is resolved against the base URL with standard reference
    /// resolution, so it should be given without a leading `/`. An absolute
    /// URL replaces the base entirely.
    ///
    /// A body, when present, is encoded as JSON and sent with
    /// `Content-Type: application/json`. Characters such as `&`, `<` and `>`
    /// are written literally.
    pub fn build_request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Request>
    where
        B: Serialize + ?Sized,
    {
        let url = self
            .base_url
            .join(path)
            .map_err(|source| AqiClientError::InvalidPath {
                path: path.to_string(),
                source,
            })?;

        let mut request = Request::new(method, url);

        if let Some(body) = body {
            let payload = serde_json::to_vec(body).map_err(AqiClientError::EncodingError)?;
            request
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
            *request.body_mut() = Some(payload.into());
        }

        let headers = request.headers_mut();
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        if let Some(agent) = &self.user_agent {
            headers.insert(USER_AGENT, agent.clone());
        }

        Ok(request)
    }

    /// Send a request and decode the response body into `destination`
    ///
    /// Any status of 300 or above is an error regardless of the body. An
    /// empty or whitespace-only body leaves `destination` untouched. The
    /// call is abandoned as soon as `ctx` ends, whether the request is
    /// connecting, waiting for headers, or reading the body.
    #[instrument(
        skip(self, ctx, request, destination),
        fields(method = %request.method(), url = %request.url())
    )]
    pub async fn dispatch<T>(
        &self,
        ctx: &Context,
        request: Request,
        destination: Option<&mut T>,
    ) -> Result<ResponseInfo>
    where
        T: DeserializeOwned,
    {
        if let Some(cause) = ctx.err() {
            return Err(AqiClientError::aborted(cause));
        }

        debug!("Sending request");
        let response = tokio::select! {
            result = self.transport.execute(request) => match result {
                Ok(response) => response,
                Err(source) => {
                    return Err(AqiClientError::TransportError {
                        cause: ctx.err(),
                        source,
                    })
                }
            },
            cause = ctx.done() => return Err(AqiClientError::aborted(cause)),
        };

        let status = response.status();
        debug!(%status, "Received response");

        if status.as_u16() >= 300 {
            return Err(AqiClientError::HttpStatusError {
                status,
                response: Box::new(response),
            });
        }

        let headers = response.headers().clone();
        let url = response.url().clone();

        // `bytes()` consumes the response, releasing the connection on every
        // path out of this select.
        let body = tokio::select! {
            result = response.bytes() => result.map_err(AqiClientError::ReadError)?,
            cause = ctx.done() => return Err(AqiClientError::aborted(cause)),
        };

        if let Some(destination) = destination {
            if !body.is_empty() {
                decode_into(&body, destination)?;
            }
        }

        Ok(ResponseInfo {
            status,
            headers,
            url,
            content_length: body.len(),
        })
    }

    /// Send a request and discard the response body
    pub async fn send(&self, ctx: &Context, request: Request) -> Result<ResponseInfo> {
        self.dispatch::<IgnoredAny>(ctx, request, None).await
    }
}

fn decode_into<T: DeserializeOwned>(body: &[u8], destination: &mut T) -> Result<()> {
    match serde_json::from_slice(body) {
        Ok(value) => {
            *destination = value;
            Ok(())
        }
        // Nothing but whitespace: a valid empty reply.
        Err(e) if e.is_eof() && body.iter().all(u8::is_ascii_whitespace) => Ok(()),
        Err(e) => Err(AqiClientError::ParseError(e)),
    }
}
