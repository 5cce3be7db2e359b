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

//! Query and publish seam between the content service and the relay client.

use std::time::Duration;

use async_trait::async_trait;
use nostr_sdk::Keys;

use crate::error::FeedResult;
use crate::event::NostrEvent;

/// A relay query: one filter plus the time budget for answering it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentQuery {
    pub kinds: Vec<u16>,
    /// Author public keys, hex.
    pub authors: Vec<String>,
    /// Values matched against `#d` tags.
    pub identifiers: Vec<String>,
    pub limit: usize,
    pub timeout: Duration,
}

impl ContentQuery {
    #[must_use]
    pub fn by_author(kind: u16, author: &str, limit: usize, timeout: Duration) -> Self {
        Self {
            kinds: vec![kind],
            authors: vec![author.to_string()],
            identifiers: Vec::new(),
            limit,
            timeout,
        }
    }

    #[must_use]
    pub fn identifier(mut self, d: &str) -> Self {
        self.identifiers.push(d.to_string());
        self
    }
}

/// Content to be signed and published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedContent {
    pub kind: u16,
    pub content: String,
    pub tags: Vec<Vec<String>>,
}

/// Source of events and sink for new ones.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Run one query against the configured relays.
    ///
    /// Returns whatever arrived before the query timeout; an empty result is
    /// not an error.
    async fn query(&self, query: ContentQuery) -> FeedResult<Vec<NostrEvent>>;

    /// Sign `content` with `keys` and send it to the relays.
    async fn publish(&self, keys: &Keys, content: UnsignedContent) -> FeedResult<NostrEvent>;
}
