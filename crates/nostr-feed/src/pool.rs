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

//! [`EventSource`] backed by a `nostr-sdk` relay pool.

use std::time::Duration;

use async_trait::async_trait;
use log::{info, warn};
use nostr_sdk::{Client, Event, EventBuilder, Filter, Keys, Kind, PublicKey, Tag};

use crate::error::{FeedError, FeedResult};
use crate::event::NostrEvent;
use crate::query::{ContentQuery, EventSource, UnsignedContent};

/// Extra time given to the pool before a query is abandoned.
const FETCH_GRACE: Duration = Duration::from_millis(500);

/// Relay pool connected to the configured relays.
pub struct NostrPool {
    client: Client,
    relays: Vec<String>,
}

impl std::fmt::Debug for NostrPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NostrPool")
            .field("relays", &self.relays)
            .finish_non_exhaustive()
    }
}

impl NostrPool {
    /// Add every relay and start connecting in the background.
    ///
    /// Relays that cannot be added (bad URL) are skipped with a warning.
    pub async fn connect(relays: &[String]) -> Self {
        let client = Client::default();
        let mut added = Vec::with_capacity(relays.len());

        for url in relays {
            match client.add_relay(url.as_str()).await {
                Ok(_) => added.push(url.clone()),
                Err(e) => warn!("Skipping relay {url}: {e}"),
            }
        }

        client.connect().await;
        info!("Relay pool connecting to {} relays", added.len());

        Self { client, relays: added }
    }

    #[must_use]
    pub fn relays(&self) -> &[String] {
        &self.relays
    }
}

fn to_filter(query: &ContentQuery) -> FeedResult<Filter> {
    let authors = query
        .authors
        .iter()
        .map(|a| PublicKey::from_hex(a).map_err(|e| FeedError::InvalidKey(e.to_string())))
        .collect::<FeedResult<Vec<_>>>()?;

    let mut filter = Filter::new()
        .kinds(query.kinds.iter().map(|k| Kind::from(*k)))
        .authors(authors)
        .limit(query.limit);
    if !query.identifiers.is_empty() {
        filter = filter.identifiers(query.identifiers.clone());
    }
    Ok(filter)
}

fn to_plain(event: &Event) -> FeedResult<NostrEvent> {
    Ok(serde_json::from_value(serde_json::to_value(event)?)?)
}

#[async_trait]
impl EventSource for NostrPool {
    async fn query(&self, query: ContentQuery) -> FeedResult<Vec<NostrEvent>> {
        let filter = to_filter(&query)?;
        let fetch = self.client.fetch_events(vec![filter], Some(query.timeout));
        let events = tokio::time::timeout(query.timeout + FETCH_GRACE, fetch)
            .await
            .map_err(|_elapsed| FeedError::Timeout(u64::try_from(query.timeout.as_millis()).unwrap_or(u64::MAX)))?
            .map_err(|e| FeedError::Relay(e.to_string()))?;

        events.into_iter().map(|event| to_plain(&event)).collect()
    }

    async fn publish(&self, keys: &Keys, content: UnsignedContent) -> FeedResult<NostrEvent> {
        let tags = content
            .tags
            .iter()
            .map(|tag| Tag::parse(tag).map_err(|e| FeedError::Validation(e.to_string())))
            .collect::<FeedResult<Vec<_>>>()?;

        let event = EventBuilder::new(Kind::from(content.kind), content.content, tags)
            .sign_with_keys(keys)
            .map_err(|e| FeedError::InvalidKey(e.to_string()))?;
        let plain = to_plain(&event)?;

        self.client
            .send_event(event)
            .await
            .map_err(|e| FeedError::Relay(e.to_string()))?;
        info!("Published event {}", plain.id);

        Ok(plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_filter_rejects_bad_author() {
        let query = ContentQuery::by_author(1, "not-hex", 10, Duration::from_secs(1));
        assert!(matches!(to_filter(&query), Err(FeedError::InvalidKey(_))));
    }

    #[test]
    fn test_to_filter_includes_identifier() {
        let pubkey = Keys::generate().public_key().to_hex();
        let query = ContentQuery::by_author(30023, &pubkey, 1, Duration::from_secs(3)).identifier("intro");
        let filter = to_filter(&query).unwrap();

        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["kinds"], serde_json::json!([30023]));
        assert_eq!(json["authors"], serde_json::json!([pubkey]));
        assert_eq!(json["#d"], serde_json::json!(["intro"]));
        assert_eq!(json["limit"], serde_json::json!(1));
    }

    #[test]
    fn test_signed_event_converts_to_plain() {
        let keys = Keys::generate();
        let event = EventBuilder::new(Kind::from(1), "gm", Vec::<Tag>::new())
            .sign_with_keys(&keys)
            .unwrap();
        let plain = to_plain(&event).unwrap();
        assert_eq!(plain.kind, 1);
        assert_eq!(plain.content, "gm");
        assert_eq!(plain.pubkey, keys.public_key().to_hex());
    }
}
