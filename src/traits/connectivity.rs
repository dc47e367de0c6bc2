//! Connectivity monitor abstraction.

use tokio::sync::watch;

/// Live online/offline signal.
///
/// The returned receiver always holds the latest known state, so a late
/// subscriber sees the current value immediately.
pub trait ConnectivityMonitor: Send + Sync {
    /// Subscribe to the online flag.
    fn is_online(&self) -> watch::Receiver<bool>;

    /// Current state without subscribing.
    fn online_now(&self) -> bool {
        *self.is_online().borrow()
    }
}
