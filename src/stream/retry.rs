//! Retry operator for live streams.
//!
//! A failed [`LiveStream`] cannot be resumed, so retrying means asking a
//! factory for a fresh stream. The policy decides whether a failure is
//! retried and how long to wait before resubscribing.

use futures::{stream, StreamExt};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::LiveStream;
use crate::error::AppError;
use crate::traits::ConnectivityMonitor;

/// Default pause after connectivity returns, before resubscribing.
pub const DEFAULT_ONLINE_SETTLE_MS: u64 = 1000;

#[derive(Clone)]
enum Gate {
    /// Retry after a fixed delay, at most `max_attempts` times in a row.
    Fixed {
        max_attempts: Option<u32>,
        delay: Duration,
    },
    /// Retry whenever connectivity is (or becomes) available.
    WhenOnline {
        monitor: Arc<dyn ConnectivityMonitor>,
        settle: Duration,
    },
}

/// When and how a failed stream is resubscribed.
#[derive(Clone)]
pub struct RetryPolicy {
    gate: Gate,
    retryable: fn(&AppError) -> bool,
}

impl RetryPolicy {
    /// Retry up to `max_attempts` consecutive failures (`None` = forever),
    /// sleeping `delay` before each resubscription.
    pub fn fixed(max_attempts: Option<u32>, delay: Duration) -> Self {
        Self {
            gate: Gate::Fixed {
                max_attempts,
                delay,
            },
            retryable: AppError::is_transient,
        }
    }

    /// Retry indefinitely, waiting until `monitor` reports online before each
    /// resubscription.
    pub fn when_online(monitor: Arc<dyn ConnectivityMonitor>) -> Self {
        Self {
            gate: Gate::WhenOnline {
                monitor,
                settle: Duration::from_millis(DEFAULT_ONLINE_SETTLE_MS),
            },
            retryable: AppError::is_transient,
        }
    }

    /// Override the pause taken after connectivity is confirmed. Has no
    /// effect on fixed policies.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        if let Gate::WhenOnline { settle: s, .. } = &mut self.gate {
            *s = settle;
        }
        self
    }

    /// Replace the retryable-error classifier (default
    /// [`AppError::is_transient`]).
    pub fn retry_if(mut self, predicate: fn(&AppError) -> bool) -> Self {
        self.retryable = predicate;
        self
    }

    /// Whether the `attempt`-th consecutive failure, `err`, is retried.
    pub fn should_retry(&self, err: &AppError, attempt: u32) -> bool {
        if !(self.retryable)(err) {
            return false;
        }
        match &self.gate {
            Gate::Fixed { max_attempts, .. } => max_attempts.map_or(true, |max| attempt <= max),
            Gate::WhenOnline { .. } => true,
        }
    }

    async fn wait(&self) {
        match &self.gate {
            Gate::Fixed { delay, .. } => tokio::time::sleep(*delay).await,
            Gate::WhenOnline { monitor, settle } => {
                let mut online = monitor.is_online();
                if online.wait_for(|up| *up).await.is_err() {
                    tracing::debug!("Connectivity monitor gone, retrying without waiting");
                }
                tokio::time::sleep(*settle).await;
            }
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.gate {
            Gate::Fixed {
                max_attempts,
                delay,
            } => f
                .debug_struct("RetryPolicy::Fixed")
                .field("max_attempts", max_attempts)
                .field("delay", delay)
                .finish(),
            Gate::WhenOnline { settle, .. } => f
                .debug_struct("RetryPolicy::WhenOnline")
                .field("settle", settle)
                .finish(),
        }
    }
}

struct RetryState<T, F, R> {
    factory: F,
    on_retry: R,
    policy: RetryPolicy,
    current: Option<LiveStream<T>>,
    attempt: u32,
    finished: bool,
}

/// Subscribe to `factory()` and resubscribe after retryable failures.
///
/// `on_retry(&err, attempt)` runs before the policy wait, with `attempt`
/// counting consecutive failures from 1. The counter resets once the fresh
/// stream emits a value. A failure the policy refuses is yielded as the
/// final item. When the inner stream ends normally, so does this one.
pub fn retry_with_policy<T, F, R>(factory: F, policy: RetryPolicy, on_retry: R) -> LiveStream<T>
where
    T: Send + 'static,
    F: FnMut() -> LiveStream<T> + Send + 'static,
    R: FnMut(&AppError, u32) + Send + 'static,
{
    drive(RetryState {
        factory,
        on_retry,
        policy,
        current: None,
        attempt: 0,
        finished: false,
    })
}

fn drive<T, F, R>(state: RetryState<T, F, R>) -> LiveStream<T>
where
    T: Send + 'static,
    F: FnMut() -> LiveStream<T> + Send + 'static,
    R: FnMut(&AppError, u32) + Send + 'static,
{
    stream::unfold(state, |mut st| async move {
        if st.finished {
            return None;
        }

        loop {
            if st.current.is_none() {
                st.current = Some((st.factory)());
            }
            let next = match st.current.as_mut() {
                Some(inner) => inner.next().await,
                None => None,
            };

            match next {
                Some(Ok(item)) => {
                    st.attempt = 0;
                    return Some((Ok(item), st));
                }
                None => return None,
                Some(Err(err)) => {
                    st.current = None;
                    let attempt = st.attempt.saturating_add(1);

                    if !st.policy.should_retry(&err, attempt) {
                        tracing::debug!("Not retrying after attempt {}: {}", attempt, err);
                        st.finished = true;
                        return Some((Err(err), st));
                    }

                    tracing::warn!("Stream failed (attempt {}), retrying: {}", attempt, err);
                    st.attempt = attempt;
                    (st.on_retry)(&err, attempt);
                    st.policy.wait().await;
                }
            }
        }
    })
    .boxed()
}
