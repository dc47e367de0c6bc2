//! Connectivity detection by polling the API host.
//!
//! There is no portable OS notification for "network came back", so the
//! monitor probes a URL on a fixed interval. Any HTTP response counts as
//! online; a transport failure counts as offline.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::traits::{ConnectivityMonitor, Headers, HttpClient};

/// Default probe interval (5 seconds).
pub const PROBE_INTERVAL_SECS: u64 = 5;

/// Connectivity monitor backed by a periodic HTTP probe.
///
/// The probe task is spawned on construction and aborted when the monitor
/// is dropped.
#[derive(Debug)]
pub struct HttpConnectivityMonitor {
    online: watch::Receiver<bool>,
    probe: JoinHandle<()>,
}

impl HttpConnectivityMonitor {
    /// Start probing `probe_url` every `interval`.
    ///
    /// The flag starts as online and is corrected by the first probe, which
    /// runs immediately.
    pub fn spawn(http: Arc<dyn HttpClient>, probe_url: String, interval: Duration) -> Self {
        let (tx, online) = watch::channel(true);
        let probe = tokio::spawn(run_probe(http, probe_url, interval, tx));
        Self { online, probe }
    }
}

impl Drop for HttpConnectivityMonitor {
    fn drop(&mut self) {
        self.probe.abort();
    }
}

impl ConnectivityMonitor for HttpConnectivityMonitor {
    fn is_online(&self) -> watch::Receiver<bool> {
        self.online.clone()
    }
}

async fn run_probe(
    http: Arc<dyn HttpClient>,
    probe_url: String,
    interval: Duration,
    tx: watch::Sender<bool>,
) {
    tracing::info!(
        "Connectivity probe started ({} every {}ms)",
        probe_url,
        interval.as_millis()
    );

    let headers = Headers::new();
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let online = match http.get(&probe_url, &headers).await {
            Ok(_) => true,
            Err(e) => {
                tracing::trace!("Connectivity probe failed: {}", e);
                false
            }
        };

        let changed = tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            tracing::info!(
                "Connectivity changed: {}",
                if online { "online" } else { "offline" }
            );
        }

        if tx.is_closed() {
            tracing::debug!("No connectivity subscribers left, stopping probe");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::error::NetworkError;
    use crate::traits::Response;

    const URL: &str = "http://probe.test/";

    #[tokio::test(start_paused = true)]
    async fn test_probe_reports_offline_then_online() {
        let http = MockHttpClient::new();
        http.set_response(
            URL,
            MockResponse::Error(NetworkError::ConnectionFailed {
                url: URL.to_string(),
                message: "refused".to_string(),
            }),
        );

        let monitor = HttpConnectivityMonitor::spawn(
            Arc::new(http.clone()),
            URL.to_string(),
            Duration::from_secs(PROBE_INTERVAL_SECS),
        );
        let mut online = monitor.is_online();
        assert!(*online.borrow());

        online.changed().await.unwrap();
        assert!(!*online.borrow_and_update());

        http.set_response(URL, MockResponse::Success(Response::new(404, "")));
        online.changed().await.unwrap();
        assert!(*online.borrow());
        assert!(monitor.online_now());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_probe() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::Success(Response::new(200, "")));

        let monitor = HttpConnectivityMonitor::spawn(
            Arc::new(http.clone()),
            URL.to_string(),
            Duration::from_secs(1),
        );
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let seen = http.get_requests().len();
        assert!(seen >= 1);

        drop(monitor);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(http.get_requests().len(), seen);
    }
}
