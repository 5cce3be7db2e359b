// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Relay health monitoring.
//!
//! The monitor probes every configured relay once at start and then on a fixed
//! interval, measuring the time it takes for a connection to open. Each cycle
//! publishes a complete snapshot of [`RelayStatus`] values through a watch
//! channel, so consumers never observe a partially updated list.

mod probe;

pub use probe::{RelayProbe, WebSocketProbe};

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use log::{debug, info};
use tokio::sync::watch;
use tokio::time::{timeout, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Default interval between probe cycles.
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(5);

/// Default timeout for a single probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Shorter configured intervals are raised to this.
pub const MIN_PROBE_INTERVAL: Duration = Duration::from_millis(1);

/// Health of a single relay as of the last probe cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Connecting,
    Connected,
    Error,
}

/// Relay status reported by the monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayStatus {
    pub url: String,
    /// Milliseconds from probe start until the connection opened.
    pub latency_ms: Option<u64>,
    pub state: RelayState,
}

impl RelayStatus {
    #[must_use]
    pub fn connecting(url: &str) -> Self {
        Self {
            url: url.to_string(),
            latency_ms: None,
            state: RelayState::Connecting,
        }
    }

    /// Relay URL without the scheme and trailing slash.
    #[must_use]
    pub fn display_host(&self) -> &str {
        let host = self
            .url
            .strip_prefix("wss://")
            .or_else(|| self.url.strip_prefix("ws://"))
            .unwrap_or(&self.url);
        host.strip_suffix('/').unwrap_or(host)
    }

    /// Short latency label: `"42ms"`, `"..."` while connecting, `"x"` on error.
    #[must_use]
    pub fn latency_label(&self) -> String {
        match (self.latency_ms, self.state) {
            (Some(ms), _) => format!("{ms}ms"),
            (None, RelayState::Connecting) => "...".to_string(),
            (None, _) => "x".to_string(),
        }
    }
}

/// Configuration for the relay monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub relays: Vec<String>,
    pub interval: Duration,
    pub probe_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            relays: Vec::new(),
            interval: DEFAULT_PROBE_INTERVAL,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl MonitorConfig {
    #[must_use]
    pub fn new(relays: Vec<String>) -> Self {
        Self {
            relays,
            ..Default::default()
        }
    }

    /// Configured relays with duplicates removed, order preserved.
    #[must_use]
    pub fn unique_relays(&self) -> Vec<String> {
        let mut seen = Vec::with_capacity(self.relays.len());
        for url in &self.relays {
            if !seen.contains(url) {
                seen.push(url.clone());
            }
        }
        seen
    }
}

/// Probe one relay, bounded by `probe_timeout`.
pub async fn probe_relay(probe: &dyn RelayProbe, url: &str, probe_timeout: Duration) -> RelayStatus {
    let started = Instant::now();

    match timeout(probe_timeout, probe.open(url)).await {
        Ok(Ok(())) => {
            let elapsed = started.elapsed();
            RelayStatus {
                url: url.to_string(),
                latency_ms: Some(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)),
                state: RelayState::Connected,
            }
        }
        Ok(Err(e)) => {
            debug!("Probe of {url} failed: {e}");
            RelayStatus {
                url: url.to_string(),
                latency_ms: None,
                state: RelayState::Error,
            }
        }
        Err(_) => {
            debug!("Probe of {url} timed out after {} ms", probe_timeout.as_millis());
            RelayStatus {
                url: url.to_string(),
                latency_ms: None,
                state: RelayState::Error,
            }
        }
    }
}

/// Probe every relay concurrently. Results come back in input order.
pub async fn probe_all(probe: &dyn RelayProbe, relays: &[String], probe_timeout: Duration) -> Vec<RelayStatus> {
    join_all(relays.iter().map(|url| probe_relay(probe, url, probe_timeout))).await
}

/// Handle to a running relay monitor.
///
/// The monitor task stops when the handle is shut down or dropped; probes in
/// flight at that moment are abandoned and their sockets closed.
pub struct RelayMonitor {
    status_rx: watch::Receiver<Vec<RelayStatus>>,
    cancel_token: CancellationToken,
}

impl std::fmt::Debug for RelayMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayMonitor")
            .field("cancel_token", &self.cancel_token)
            .finish_non_exhaustive()
    }
}

impl RelayMonitor {
    /// Spawn the monitor on the current tokio runtime.
    #[must_use]
    pub fn spawn(config: MonitorConfig, probe: Arc<dyn RelayProbe>) -> Self {
        let relays = config.unique_relays();
        let initial = relays.iter().map(|url| RelayStatus::connecting(url)).collect();
        let (status_tx, status_rx) = watch::channel(initial);
        let cancel_token = CancellationToken::new();

        info!("Starting relay monitor for {} relays", relays.len());

        // `tokio::time::interval` panics on a zero period
        let interval = config.interval.max(MIN_PROBE_INTERVAL);

        let task_cancel = cancel_token.clone();
        tokio::spawn(async move {
            monitor_loop(relays, interval, config.probe_timeout, probe, status_tx, task_cancel).await;
        });

        Self {
            status_rx,
            cancel_token,
        }
    }

    /// Latest complete snapshot.
    #[must_use]
    pub fn statuses(&self) -> Vec<RelayStatus> {
        self.status_rx.borrow().clone()
    }

    /// Receiver that is notified whenever a cycle completes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<RelayStatus>> {
        self.status_rx.clone()
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for RelayMonitor {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn monitor_loop(
    relays: Vec<String>,
    interval: Duration,
    probe_timeout: Duration,
    probe: Arc<dyn RelayProbe>,
    status_tx: watch::Sender<Vec<RelayStatus>>,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        // The first tick completes immediately
        tokio::select! {
            biased;
            () = cancel_token.cancelled() => {
                info!("Relay monitor cancelled");
                return;
            }
            _ = ticker.tick() => {}
        }

        let statuses = tokio::select! {
            biased;
            () = cancel_token.cancelled() => {
                info!("Relay monitor cancelled during probe cycle");
                return;
            }
            statuses = probe_all(probe.as_ref(), &relays, probe_timeout) => statuses,
        };

        let connected = statuses.iter().filter(|s| s.state == RelayState::Connected).count();
        debug!("Probe cycle complete: {connected}/{} relays connected", statuses.len());

        if status_tx.send(statuses).is_err() {
            return;
        }
    }
}
