//! Building blocks shared by every screen.
//!
//! - [`ScreenState`] - the lifecycle of one screen's data
//! - [`StateCell`] - the single observable cell a screen publishes into
//! - [`ScreenJob`] / [`JobSlot`] - a spawned pipeline that dies with its owner
//! - [`Epoch`] - keeps a superseded pipeline from publishing
//! - [`run_pipeline`] - live stream + retry policy -> published states
//! - [`BottomBar`] - handle onto the root-owned bottom-bar flag

use futures::StreamExt;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::AppError;
use crate::stream::{retry_with_policy, LiveStream, RetryPolicy};

/// What a screen is currently showing.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState<T> {
    /// First load in progress.
    Loading,
    /// Failed; waits for the user to retry.
    Retrying { message: String },
    /// Failed; will resubscribe on its own.
    AutoRetrying { message: String },
    /// Loaded, nothing to show.
    Empty,
    Loaded(T),
}

impl<T> ScreenState<T> {
    /// The loaded value, if any.
    pub fn loaded(&self) -> Option<&T> {
        match self {
            ScreenState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// Short variant name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            ScreenState::Loading => "loading",
            ScreenState::Retrying { .. } => "retrying",
            ScreenState::AutoRetrying { .. } => "auto-retrying",
            ScreenState::Empty => "empty",
            ScreenState::Loaded(_) => "loaded",
        }
    }

    /// The user-facing failure message, for the two failure states.
    pub fn message(&self) -> Option<&str> {
        match self {
            ScreenState::Retrying { message } | ScreenState::AutoRetrying { message } => {
                Some(message)
            }
            _ => None,
        }
    }
}

/// Observable single-value cell. Writers replace the value wholesale;
/// subscribers always see the latest value first.
#[derive(Debug)]
pub struct StateCell<S> {
    tx: Arc<watch::Sender<S>>,
}

impl<S> Clone for StateCell<S> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<S: Clone + Send + Sync + 'static> StateCell<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, value: S) {
        self.tx.send_replace(value);
    }

    /// Derive the next value from the current one.
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.tx.send_modify(f);
    }

    /// Like [`StateCell::update`], but only if `keep()` holds, checked while
    /// the write lock is held. Returns whether the value was updated.
    pub fn update_if(&self, keep: impl FnOnce() -> bool, f: impl FnOnce(&mut S)) -> bool {
        self.tx.send_if_modified(|current| {
            if !keep() {
                return false;
            }
            f(current);
            true
        })
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> S {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }
}

/// Ticket counter for restartable work. Only the most recent ticket is
/// current.
#[derive(Debug, Clone, Default)]
pub struct Epoch(Arc<AtomicU64>);

impl Epoch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new epoch and return its ticket. Every earlier ticket goes
    /// stale.
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.0.load(Ordering::SeqCst) == ticket
    }
}

/// A spawned task owned by a screen. Aborted on [`ScreenJob::cancel`], on
/// replacement and on drop.
#[derive(Debug, Default)]
pub struct ScreenJob {
    handle: Option<JoinHandle<()>>,
}

impl ScreenJob {
    /// A job with nothing running.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Spawn `task` as a new job.
    pub fn spawn<F>(task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: Some(tokio::spawn(task)),
        }
    }

    /// Abort the running task (if any), then spawn `task`.
    pub fn restart<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(task));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for ScreenJob {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A [`ScreenJob`] behind a lock, so `&self` screen methods can restart it.
#[derive(Debug, Default)]
pub struct JobSlot {
    job: Mutex<ScreenJob>,
}

impl JobSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort whatever runs in the slot and spawn `task` in its place.
    pub fn restart<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.lock().restart(task);
    }

    pub fn cancel(&self) {
        self.lock().cancel();
    }

    pub fn is_running(&self) -> bool {
        self.lock().is_running()
    }

    fn lock(&self) -> MutexGuard<'_, ScreenJob> {
        // A panic while holding the lock cannot leave a JoinHandle half-set.
        self.job.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Sink for a pipeline's states.
pub type Publish<O> = Arc<dyn Fn(ScreenState<O>) + Send + Sync>;

impl<O: Clone + Send + Sync + 'static> StateCell<ScreenState<O>> {
    /// A [`Publish`] sink that replaces this cell's value.
    pub fn publisher(&self) -> Publish<O> {
        let cell = self.clone();
        Arc::new(move |state| cell.set(state))
    }

    /// A [`Publish`] sink bound to a fresh ticket of `epoch`. Once `epoch`
    /// advances again, everything this sink receives is dropped.
    pub fn publisher_for(&self, epoch: &Epoch) -> Publish<O> {
        let cell = self.clone();
        let epoch = epoch.clone();
        let ticket = epoch.advance();
        Arc::new(move |state| {
            if !cell.update_if(|| epoch.is_current(ticket), |current| *current = state) {
                tracing::trace!("dropping state from superseded pipeline #{}", ticket);
            }
        })
    }
}

/// Drive a screen's data pipeline to completion.
///
/// Publishes `Loading`, then subscribes through [`retry_with_policy`]:
/// every retry publishes `AutoRetrying`, every item publishes
/// `present(item)`, and a failure the policy gives up on publishes
/// `Retrying` and ends the pipeline.
pub async fn run_pipeline<T, O, F, P>(
    screen: &'static str,
    factory: F,
    policy: RetryPolicy,
    mut present: P,
    publish: Publish<O>,
) where
    T: Send + 'static,
    O: 'static,
    F: FnMut() -> LiveStream<T> + Send + 'static,
    P: FnMut(T) -> ScreenState<O>,
{
    publish(ScreenState::Loading);

    let on_retry = {
        let publish = publish.clone();
        move |err: &AppError, attempt: u32| {
            tracing::warn!("{}: auto-retry #{} after {}", screen, attempt, err);
            publish(ScreenState::AutoRetrying {
                message: err.user_message(),
            });
        }
    };

    let mut live = retry_with_policy(factory, policy, on_retry);
    while let Some(item) = live.next().await {
        match item {
            Ok(value) => publish(present(value)),
            Err(err) => {
                tracing::error!(
                    "{}: giving up: {} ({}, {})",
                    screen,
                    err,
                    err.category(),
                    err.error_code()
                );
                publish(ScreenState::Retrying {
                    message: err.user_message(),
                });
                return;
            }
        }
    }
    tracing::debug!("{}: pipeline ended", screen);
}

/// Handle onto the bottom-bar visibility flag owned by the root screen.
///
/// The flag is a retained value: a late subscriber immediately sees the
/// current visibility.
#[derive(Debug, Clone)]
pub struct BottomBar {
    cell: StateCell<bool>,
}

impl BottomBar {
    /// A standalone flag, initially visible.
    pub fn new() -> Self {
        Self {
            cell: StateCell::new(true),
        }
    }

    pub fn show(&self) {
        self.set_visible(true);
    }

    pub fn hide(&self) {
        self.set_visible(false);
    }

    pub fn set_visible(&self, visible: bool) {
        self.cell.tx.send_if_modified(|current| {
            let changed = *current != visible;
            *current = visible;
            changed
        });
    }

    pub fn is_visible(&self) -> bool {
        self.cell.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.cell.subscribe()
    }
}

impl Default for BottomBar {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Display for ScreenState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenState::Loaded(value) => write!(f, "loaded: {:?}", value),
            other => match other.message() {
                Some(message) => write!(f, "{}: {}", other.label(), message),
                None => f.write_str(other.label()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use futures::stream;
    use std::sync::Mutex;
    use std::time::Duration;

    fn recorder<O: Send + 'static>() -> (Publish<O>, Arc<Mutex<Vec<ScreenState<O>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (Arc::new(move |state| sink.lock().unwrap().push(state)), seen)
    }

    #[test]
    fn test_state_cell_retains_latest() {
        let cell = StateCell::new(1);
        cell.set(2);
        cell.update(|v| *v += 1);

        let late = cell.subscribe();
        assert_eq!(*late.borrow(), 3);
        assert_eq!(cell.get(), 3);
    }

    #[test]
    fn test_superseded_publisher_is_ignored() {
        let cell: StateCell<ScreenState<u32>> = StateCell::new(ScreenState::Loading);
        let epoch = Epoch::new();

        let first = cell.publisher_for(&epoch);
        first(ScreenState::Loaded(1));
        assert_eq!(cell.get(), ScreenState::Loaded(1));

        let second = cell.publisher_for(&epoch);
        second(ScreenState::Loading);
        first(ScreenState::Retrying {
            message: "late".to_string(),
        });
        assert_eq!(cell.get(), ScreenState::Loading);

        second(ScreenState::Loaded(2));
        assert_eq!(cell.get(), ScreenState::Loaded(2));
    }

    #[test]
    fn test_update_if_checks_condition() {
        let cell = StateCell::new(1);
        assert!(!cell.update_if(|| false, |v| *v = 2));
        assert_eq!(cell.get(), 1);
        assert!(cell.update_if(|| true, |v| *v += 2));
        assert_eq!(cell.get(), 3);
    }

    #[tokio::test]
    async fn test_screen_job_aborts_on_drop() {
        let (tx, mut rx) = tokio::sync::oneshot::channel::<()>();
        let job = ScreenJob::spawn(async move {
            let _keep = tx;
            std::future::pending::<()>().await;
        });
        assert!(job.is_running());

        drop(job);
        // the sender is dropped when the aborted task is torn down
        assert!((&mut rx).await.is_err());
    }

    #[tokio::test]
    async fn test_pipeline_loaded_then_retrying() {
        let (publish, seen) = recorder::<u32>();

        run_pipeline(
            "test",
            || {
                stream::iter(vec![
                    Ok(1),
                    Err(AppError::Network(NetworkError::HttpStatus {
                        status: 404,
                        message: "gone".to_string(),
                    })),
                ])
                .boxed()
            },
            RetryPolicy::fixed(Some(3), Duration::from_millis(1)),
            ScreenState::Loaded,
            publish,
        )
        .await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], ScreenState::Loading);
        assert_eq!(seen[1], ScreenState::Loaded(1));
        assert_eq!(seen[2].label(), "retrying");
    }

    #[tokio::test(start_paused = true)]
    async fn test_pipeline_auto_retries() {
        let (publish, seen) = recorder::<u32>();
        let mut calls = 0;

        run_pipeline(
            "test",
            move || {
                calls += 1;
                if calls == 1 {
                    stream::iter(vec![Err(AppError::Network(NetworkError::Timeout {
                        operation: "GET".to_string(),
                        duration_secs: 15,
                    }))])
                    .boxed()
                } else {
                    stream::iter(vec![Ok(7)]).boxed()
                }
            },
            RetryPolicy::fixed(Some(3), Duration::from_millis(10)),
            |v| if v == 0 { ScreenState::Empty } else { ScreenState::Loaded(v) },
            publish,
        )
        .await;

        let labels: Vec<_> = seen.lock().unwrap().iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["loading", "auto-retrying", "loaded"]);
    }

    #[test]
    fn test_bottom_bar_initially_visible_and_retained() {
        let bar = BottomBar::new();
        assert!(bar.is_visible());
        bar.hide();

        let late = bar.subscribe();
        assert!(!*late.borrow());
        bar.show();
        assert!(bar.is_visible());
    }
}
