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

//! Background runtime that owns the relay pool and relay monitor.
//!
//! The UI thread never awaits. Requests are spawned onto the runtime and
//! their results come back as [`BackendEvent`]s that the app drains once
//! per frame.

use std::sync::Arc;

use log::{info, warn};
use nostr_feed::relay::{MonitorConfig, WebSocketProbe};
use nostr_feed::{
    nip05, ArticleAddress, AuthorProfile, ContentService, DiagnosticEntry, DiagnosticFeed, FeedResult, Keys,
    NostrEvent, NostrPool, RelayMonitor, RelayStatus, UnsignedContent,
};
use tokio::runtime::Runtime;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;

/// Result of a request made through [`Backend`].
#[derive(Debug)]
pub enum BackendEvent {
    Profile(FeedResult<AuthorProfile>),
    Articles(FeedResult<Vec<NostrEvent>>),
    Notes(FeedResult<Vec<NostrEvent>>),
    Article {
        address: ArticleAddress,
        result: FeedResult<NostrEvent>,
    },
    Published {
        kind: u16,
        result: FeedResult<NostrEvent>,
    },
    Nip05Verified(bool),
}

pub struct Backend {
    runtime: Runtime,
    service: Arc<ContentService<NostrPool>>,
    feed: DiagnosticFeed,
    monitor: RelayMonitor,
    http: reqwest::Client,
    events_tx: mpsc::UnboundedSender<BackendEvent>,
    events_rx: mpsc::UnboundedReceiver<BackendEvent>,
    ctx: egui::Context,
    cancel_token: CancellationToken,
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("monitor", &self.monitor)
            .finish_non_exhaustive()
    }
}

impl Backend {
    /// Start the runtime, connect the relay pool and begin probing relays.
    pub fn start(config: &AppConfig, ctx: egui::Context) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("nostr-backend")
            .enable_all()
            .build()?;

        let feed = DiagnosticFeed::new();
        let pool = runtime.block_on(NostrPool::connect(&config.relays));
        if pool.relays().len() < config.relays.len() {
            warn!("Only {} of {} configured relays were added", pool.relays().len(), config.relays.len());
        }
        let service = Arc::new(ContentService::new(pool, Arc::new(feed.clone())));

        let monitor_config = MonitorConfig {
            relays: config.relays.clone(),
            interval: config.probe_interval(),
            probe_timeout: config.probe_timeout(),
        };
        let monitor = {
            let _guard = runtime.enter();
            RelayMonitor::spawn(monitor_config, Arc::new(WebSocketProbe))
        };

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let cancel_token = CancellationToken::new();

        spawn_repaint_on_change(&runtime, &ctx, &monitor, &feed, cancel_token.clone());
        info!("Backend started with {} relays", config.relays.len());

        Ok(Self {
            runtime,
            service,
            feed,
            monitor,
            http: reqwest::Client::new(),
            events_tx,
            events_rx,
            ctx,
            cancel_token,
        })
    }

    /// New receiver for the diagnostic feed.
    pub fn subscribe_diagnostics(&self) -> broadcast::Receiver<DiagnosticEntry> {
        self.feed.subscribe()
    }

    pub fn relay_statuses(&self) -> Vec<RelayStatus> {
        self.monitor.statuses()
    }

    /// Every event delivered since the last call.
    pub fn poll(&mut self) -> Vec<BackendEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            events.push(event);
        }
        events
    }

    pub fn fetch_profile(&self, author: &str) {
        let author = author.to_string();
        self.request(move |service| async move { BackendEvent::Profile(service.author_profile(&author).await) });
    }

    pub fn fetch_articles(&self, author: &str) {
        let author = author.to_string();
        self.request(move |service| async move { BackendEvent::Articles(service.articles(&author).await) });
    }

    pub fn fetch_notes(&self, author: &str) {
        let author = author.to_string();
        self.request(move |service| async move { BackendEvent::Notes(service.notes(&author).await) });
    }

    pub fn fetch_article(&self, address: ArticleAddress) {
        self.request(move |service| async move {
            let result = service.article(&address).await;
            BackendEvent::Article { address, result }
        });
    }

    pub fn publish(&self, keys: Keys, content: UnsignedContent) {
        let kind = content.kind;
        self.request(move |service| async move {
            BackendEvent::Published {
                kind,
                result: service.publish(&keys, content).await,
            }
        });
    }

    /// Check the profile's NIP-05 identifier against its domain.
    pub fn verify_nip05(&self, nip05: &str, pubkey: &str) {
        let http = self.http.clone();
        let nip05 = nip05.to_string();
        let pubkey = pubkey.to_string();
        let tx = self.events_tx.clone();
        let ctx = self.ctx.clone();

        self.runtime.spawn(async move {
            let verified = nip05::verify(&http, &nip05, &pubkey).await;
            if tx.send(BackendEvent::Nip05Verified(verified)).is_ok() {
                ctx.request_repaint();
            }
        });
    }

    fn request<F, Fut>(&self, job: F)
    where
        F: FnOnce(Arc<ContentService<NostrPool>>) -> Fut,
        Fut: std::future::Future<Output = BackendEvent> + Send + 'static,
    {
        let future = job(self.service.clone());
        let tx = self.events_tx.clone();
        let ctx = self.ctx.clone();

        self.runtime.spawn(async move {
            let event = future.await;
            if tx.send(event).is_err() {
                warn!("Backend event dropped, UI has gone away");
                return;
            }
            ctx.request_repaint();
        });
    }
}

impl Drop for Backend {
    fn drop(&mut self) {
        self.cancel_token.cancel();
        self.monitor.shutdown();
    }
}

/// Wake the UI when relay status or diagnostics change.
fn spawn_repaint_on_change(
    runtime: &Runtime,
    ctx: &egui::Context,
    monitor: &RelayMonitor,
    feed: &DiagnosticFeed,
    cancel_token: CancellationToken,
) {
    let mut status_rx = monitor.subscribe();
    let mut diag_rx = feed.subscribe();
    let ctx = ctx.clone();

    runtime.spawn(async move {
        loop {
            tokio::select! {
                biased;
                () = cancel_token.cancelled() => break,
                changed = status_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                received = diag_rx.recv() => {
                    if matches!(received, Err(broadcast::error::RecvError::Closed)) {
                        break;
                    }
                }
            }
            ctx.request_repaint();
        }
    });
}
