//! Manually driven connectivity monitor for testing.

use std::sync::Arc;
use tokio::sync::watch;

use crate::traits::ConnectivityMonitor;

/// Connectivity monitor whose state is set by the test.
///
/// Also used by the binary when probing is disabled, in which case it
/// simply stays online.
#[derive(Debug, Clone)]
pub struct ManualConnectivity {
    online: Arc<watch::Sender<bool>>,
}

impl ManualConnectivity {
    /// Create a monitor with the given initial state.
    pub fn new(online: bool) -> Self {
        let (tx, _) = watch::channel(online);
        Self {
            online: Arc::new(tx),
        }
    }

    /// Change the reported state. Setting the same value notifies nobody.
    pub fn set_online(&self, online: bool) {
        self.online.send_if_modified(|current| {
            let changed = *current != online;
            *current = online;
            changed
        });
    }
}

impl Default for ManualConnectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConnectivityMonitor for ManualConnectivity {
    fn is_online(&self) -> watch::Receiver<bool> {
        self.online.subscribe()
    }
}
