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

//! Nostr feed library for a single-author publication viewer.
//!
//! This crate holds everything the desktop viewer needs that does not touch
//! the window: relay health monitoring, the diagnostic activity feed, route
//! identifier decoding, content queries and publishing. It is organised in
//! layers that can be used independently:
//!
//! - **Relay layer**: periodic connection probes with latency measurement
//! - **Diagnostics layer**: injected progress sink plus a bounded recent log
//! - **Content layer**: author profile, article and note queries over an
//!   [`EventSource`], with a `nostr-sdk` backed [`NostrPool`] for production
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use nostr_feed::{ContentService, DiagnosticFeed, NostrPool};
//!
//! #[tokio::main]
//! async fn main() {
//!     let relays = vec!["wss://relay.damus.io".to_string()];
//!     let feed = DiagnosticFeed::new();
//!     let service = ContentService::new(NostrPool::connect(&relays).await, Arc::new(feed));
//!
//!     let author = nostr_feed::nip19::pubkey_hex(
//!         "npub17pdf8saz8fflz3dqyst8rhfzav4s922yv0truw85nr02jxyxqr3shkl0gr",
//!     )
//!     .unwrap();
//!     for article in service.articles(&author).await.unwrap_or_default() {
//!         println!("{}", nostr_feed::ArticleMeta::from_event(&article).title);
//!     }
//! }
//! ```
//!
//! # Relay Monitoring
//!
//! ```no_run
//! use std::sync::Arc;
//! use nostr_feed::relay::{MonitorConfig, RelayMonitor, WebSocketProbe};
//!
//! # async fn example() {
//! let monitor = RelayMonitor::spawn(
//!     MonitorConfig::new(vec!["wss://nos.lol".to_string()]),
//!     Arc::new(WebSocketProbe),
//! );
//! let mut rx = monitor.subscribe();
//! while rx.changed().await.is_ok() {
//!     for status in rx.borrow().iter() {
//!         println!("{} {}", status.display_host(), status.latency_label());
//!     }
//! }
//! # }
//! ```

pub mod auth;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod nip05;
pub mod nip19;
pub mod pool;
pub mod publish;
pub mod query;
pub mod relay;
pub mod service;

pub use auth::{is_author, AuthorSession};
pub use diagnostics::{DiagnosticEntry, DiagnosticFeed, DiagnosticLog, DiagnosticSink, Severity};
pub use error::{FeedError, FeedResult};
pub use event::{ArticleMeta, AuthorProfile, NostrEvent, ProfileMetadata};
pub use nostr_sdk::Keys;
pub use nip19::{ArticleAddress, Nip19Target};
pub use pool::NostrPool;
pub use publish::{ArticleDraft, NoteDraft};
pub use query::{ContentQuery, EventSource, UnsignedContent};
pub use relay::{RelayMonitor, RelayState, RelayStatus};
pub use service::ContentService;
