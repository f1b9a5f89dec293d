//! Cancellation and deadline propagation for in-flight requests
//!
//! A [`Context`] is handed to every dispatch. Cancelling it, or letting its
//! deadline pass, aborts the call wherever it is suspended: while connecting,
//! while waiting for headers, or while reading the body.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// Why a [`Context`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    /// [`Context::cancel`] was called
    Canceled,
    /// The context deadline passed
    DeadlineExceeded,
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Canceled => f.write_str("context canceled"),
            Cause::DeadlineExceeded => f.write_str("context deadline exceeded"),
        }
    }
}

impl std::error::Error for Cause {}

/// Cancellation token with an optional deadline
///
/// Clones share the same cancellation signal, so cancelling any clone ends
/// all of them. Contexts derived with [`Context::with_timeout`] or
/// [`Context::with_deadline`] also share the signal but carry their own,
/// never later, deadline.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use aqi_client::{AqiClient, Context};
///
/// # async fn run() -> aqi_client::Result<()> {
/// let client = AqiClient::new()?;
/// let ctx = Context::background().with_timeout(Duration::from_secs(5));
/// let reading = client.latest(&ctx, "beijing/daxing").await?;
/// println!("AQI {}", reading.aqi);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    signal: Arc<watch::Sender<Option<Cause>>>,
    deadline: Option<Instant>,
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl Context {
    /// A context that is never cancelled and has no deadline
    pub fn background() -> Self {
        let (signal, _) = watch::channel(None);
        Self {
            signal: Arc::new(signal),
            deadline: None,
        }
    }

    /// Derive a context that expires after `timeout`
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a context that expires at `deadline`
    ///
    /// An existing earlier deadline is kept.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current <= deadline => current,
            _ => deadline,
        };
        Self {
            signal: Arc::clone(&self.signal),
            deadline: Some(deadline),
        }
    }

    /// The deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancel this context and every context sharing its signal
    ///
    /// Calling this more than once has no further effect.
    pub fn cancel(&self) {
        self.signal.send_if_modified(|cause| {
            if cause.is_none() {
                *cause = Some(Cause::Canceled);
                true
            } else {
                false
            }
        });
    }

    /// Why the context ended, or `None` while it is still live
    ///
    /// Explicit cancellation takes precedence over an expired deadline.
    pub fn err(&self) -> Option<Cause> {
        if let Some(cause) = *self.signal.borrow() {
            return Some(cause);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Cause::DeadlineExceeded),
            _ => None,
        }
    }

    /// Whether the context has ended
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Wait until the context ends and return the reason
    pub async fn done(&self) -> Cause {
        let mut rx = self.signal.subscribe();
        let cancelled = async move {
            // The sender lives as long as `self`, so this only returns once
            // a cause has been recorded.
            let _ = rx.wait_for(Option::is_some).await;
        };

        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = cancelled => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => cancelled.await,
        }

        self.err().unwrap_or(Cause::DeadlineExceeded)
    }
}
