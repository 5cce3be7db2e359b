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

//! Diagnostic activity feed.
//!
//! Data-fetching code reports progress through a [`DiagnosticSink`] handed to
//! it explicitly. The [`DiagnosticFeed`] implementation fans messages out to any
//! number of subscribers, and a [`DiagnosticLog`] keeps the few most recent
//! entries for display.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use log::{error, info};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use uuid::Uuid;

/// Number of entries retained by a [`DiagnosticLog`].
pub const DIAGNOSTIC_LOG_CAPACITY: usize = 4;

const FEED_CHANNEL_CAPACITY: usize = 64;

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
}

/// A single diagnostic message with timestamp.
#[derive(Debug, Clone)]
pub struct DiagnosticEntry {
    /// Unique per emission.
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub severity: Severity,
}

impl DiagnosticEntry {
    #[must_use]
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            message: message.into(),
            severity,
        }
    }
}

/// Receiver of progress messages from data-fetching code.
///
/// Emitting never blocks and never fails.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, message: &str, severity: Severity);

    fn info(&self, message: &str) {
        self.emit(message, Severity::Info);
    }

    fn success(&self, message: &str) {
        self.emit(message, Severity::Success);
    }

    fn error(&self, message: &str) {
        self.emit(message, Severity::Error);
    }
}

/// Broadcast implementation of [`DiagnosticSink`].
#[derive(Debug, Clone)]
pub struct DiagnosticFeed {
    tx: broadcast::Sender<DiagnosticEntry>,
}

impl Default for DiagnosticFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticFeed {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(FEED_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to future diagnostic messages.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DiagnosticEntry> {
        self.tx.subscribe()
    }
}

impl DiagnosticSink for DiagnosticFeed {
    fn emit(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => error!("{message}"),
            Severity::Info | Severity::Success => info!("{message}"),
        }

        // No subscribers is fine
        let _ = self.tx.send(DiagnosticEntry::new(message, severity));
    }
}

/// Sink that drops everything. Handy where nobody is watching.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _message: &str, _severity: Severity) {}
}

/// Bounded list of the most recent diagnostic entries, newest first.
#[derive(Debug, Clone)]
pub struct DiagnosticLog {
    entries: VecDeque<DiagnosticEntry>,
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticLog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(DIAGNOSTIC_LOG_CAPACITY + 1),
        }
    }

    /// Log seeded with the "Panel ready" entry shown when the panel opens.
    #[must_use]
    pub fn ready() -> Self {
        let mut log = Self::new();
        log.push(DiagnosticEntry::new("Panel ready", Severity::Success));
        log
    }

    /// Prepend an entry, dropping the oldest beyond capacity.
    pub fn push(&mut self, entry: DiagnosticEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(DIAGNOSTIC_LOG_CAPACITY);
    }

    /// Pull every pending entry from a feed subscription without waiting.
    ///
    /// Returns the number of entries received.
    pub fn drain(&mut self, rx: &mut broadcast::Receiver<DiagnosticEntry>) -> usize {
        let mut received = 0;
        loop {
            match rx.try_recv() {
                Ok(entry) => {
                    self.push(entry);
                    received += 1;
                }
                Err(TryRecvError::Lagged(_)) => {}
                Err(TryRecvError::Empty | TryRecvError::Closed) => return received,
            }
        }
    }

    #[must_use]
    pub fn latest(&self) -> Option<&DiagnosticEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_never_exceeds_capacity() {
        let mut log = DiagnosticLog::new();
        for i in 0..10 {
            log.push(DiagnosticEntry::new(format!("message {i}"), Severity::Info));
            assert!(log.len() <= DIAGNOSTIC_LOG_CAPACITY);
        }
        assert_eq!(log.len(), DIAGNOSTIC_LOG_CAPACITY);
        assert_eq!(log.latest().unwrap().message, "message 9");

        let messages: Vec<_> = log.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["message 9", "message 8", "message 7", "message 6"]);
    }

    #[test]
    fn test_ready_log_has_panel_ready_entry() {
        let log = DiagnosticLog::ready();
        let latest = log.latest().unwrap();
        assert_eq!(latest.message, "Panel ready");
        assert_eq!(latest.severity, Severity::Success);
    }

    #[test]
    fn test_entry_ids_are_unique() {
        let a = DiagnosticEntry::new("same", Severity::Info);
        let b = DiagnosticEntry::new("same", Severity::Info);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_feed_broadcasts_to_every_subscriber() {
        let feed = DiagnosticFeed::new();
        let mut first = feed.subscribe();
        let mut second = feed.subscribe();

        feed.info("fetching...");
        feed.success("loaded 3 events");

        let mut log_a = DiagnosticLog::new();
        let mut log_b = DiagnosticLog::new();
        assert_eq!(log_a.drain(&mut first), 2);
        assert_eq!(log_b.drain(&mut second), 2);

        assert_eq!(log_a.latest().unwrap().message, "loaded 3 events");
        assert_eq!(log_a.latest().unwrap().severity, Severity::Success);
        assert_eq!(log_b.latest().unwrap().id, log_a.latest().unwrap().id);
    }

    #[test]
    fn test_emit_without_subscribers_does_not_fail() {
        let feed = DiagnosticFeed::new();
        feed.error("nobody listening");
    }

    #[test]
    fn test_drain_keeps_most_recent_four() {
        let feed = DiagnosticFeed::new();
        let mut rx = feed.subscribe();
        for i in 0..7 {
            feed.info(&format!("step {i}"));
        }

        let mut log = DiagnosticLog::ready();
        log.drain(&mut rx);
        assert_eq!(log.len(), DIAGNOSTIC_LOG_CAPACITY);
        assert_eq!(log.latest().unwrap().message, "step 6");
        assert!(log.iter().all(|e| e.message != "Panel ready"));
    }
}
