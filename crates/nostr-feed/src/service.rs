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

//! Content fetching for the author's profile, articles and notes.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::warn;
use nostr_sdk::Keys;

use crate::diagnostics::DiagnosticSink;
use crate::error::{FeedError, FeedResult};
use crate::event::{sort_newest_first, AuthorProfile, NostrEvent, ProfileMetadata};
use crate::nip19::{ArticleAddress, KIND_LONG_FORM, KIND_METADATA, KIND_TEXT_NOTE};
use crate::query::{ContentQuery, EventSource, UnsignedContent};

/// Timeout for list and article queries.
pub const QUERY_TIMEOUT: Duration = Duration::from_millis(3000);

/// Timeout for the profile query.
pub const PROFILE_TIMEOUT: Duration = Duration::from_millis(1500);

/// Maximum number of events requested per list.
pub const LIST_LIMIT: usize = 50;

/// Extra attempts after a failed fetch. `NotFound` is never retried.
pub const FETCH_RETRIES: u32 = 3;

const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);
const RETRY_MAX_DELAY: Duration = Duration::from_secs(30);

/// Fetches and publishes content through an [`EventSource`], reporting
/// progress to a [`DiagnosticSink`].
pub struct ContentService<S> {
    source: S,
    diagnostics: Arc<dyn DiagnosticSink>,
    retries: u32,
}

impl<S> std::fmt::Debug for ContentService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentService")
            .field("retries", &self.retries)
            .finish_non_exhaustive()
    }
}

impl<S: EventSource> ContentService<S> {
    pub fn new(source: S, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            source,
            diagnostics,
            retries: FETCH_RETRIES,
        }
    }

    /// Override the number of extra attempts made after a failed fetch.
    #[must_use]
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run `fetch` until it succeeds, reports `NotFound`, or the retries
    /// run out. The delay between attempts doubles up to a cap.
    async fn retrying<T, F, Fut>(&self, label: &str, mut fetch: F) -> FeedResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = FeedResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match fetch().await {
                Err(e) if !matches!(e, FeedError::NotFound(_)) && attempt < self.retries => {
                    let delay = retry_delay(attempt);
                    warn!("Fetching {label} failed ({e}), retrying in {} ms", delay.as_millis());
                    attempt += 1;
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    /// Fetch the author's kind-0 profile, retrying with backoff on failure.
    pub async fn author_profile(&self, pubkey: &str) -> FeedResult<AuthorProfile> {
        self.retrying("profile", || self.fetch_profile_once(pubkey)).await
    }

    async fn fetch_profile_once(&self, pubkey: &str) -> FeedResult<AuthorProfile> {
        self.diagnostics.info("Fetching author profile (kind 0)...");

        let query = ContentQuery::by_author(KIND_METADATA, pubkey, 1, PROFILE_TIMEOUT);
        let Some(event) = self.source.query(query).await?.into_iter().next() else {
            self.diagnostics.error("Author profile not found");
            return Err(FeedError::NotFound("profile"));
        };

        match ProfileMetadata::parse(&event.content) {
            Ok(metadata) => {
                let name = metadata.display().unwrap_or("Unknown");
                self.diagnostics.success(&format!("Profile loaded: {name}"));
                Ok(AuthorProfile {
                    event,
                    metadata: Some(metadata),
                })
            }
            Err(_) => {
                self.diagnostics.success("Profile loaded (metadata parse failed)");
                Ok(AuthorProfile { event, metadata: None })
            }
        }
    }

    /// Long-form articles by `pubkey`, newest first.
    pub async fn articles(&self, pubkey: &str) -> FeedResult<Vec<NostrEvent>> {
        self.list(KIND_LONG_FORM, pubkey, "articles").await
    }

    /// Short text notes by `pubkey`, newest first.
    pub async fn notes(&self, pubkey: &str) -> FeedResult<Vec<NostrEvent>> {
        self.list(KIND_TEXT_NOTE, pubkey, "notes").await
    }

    async fn list(&self, kind: u16, pubkey: &str, label: &str) -> FeedResult<Vec<NostrEvent>> {
        self.diagnostics.info(&format!("Fetching {label} (kind {kind})..."));

        let query = ContentQuery::by_author(kind, pubkey, LIST_LIMIT, QUERY_TIMEOUT);
        match self.retrying(label, || self.source.query(query.clone())).await {
            Ok(mut events) => {
                sort_newest_first(&mut events);
                self.diagnostics.success(&format!("Loaded {} {label}", events.len()));
                Ok(events)
            }
            Err(e) => {
                self.diagnostics.error(&format!("Failed to load {label}: {e}"));
                Err(e)
            }
        }
    }

    /// The single event at `address`.
    pub async fn article(&self, address: &ArticleAddress) -> FeedResult<NostrEvent> {
        self.diagnostics.info(&format!("Fetching article: {}", address.identifier));

        let query = ContentQuery::by_author(address.kind, &address.pubkey, 1, QUERY_TIMEOUT).identifier(&address.identifier);
        let events = match self.retrying("article", || self.source.query(query.clone())).await {
            Ok(events) => events,
            Err(e) => {
                self.diagnostics.error(&format!("Failed to load article: {e}"));
                return Err(e);
            }
        };

        if let Some(event) = events.into_iter().next() {
            self.diagnostics.success("Article loaded successfully");
            Ok(event)
        } else {
            self.diagnostics.error("Article not found");
            Err(FeedError::NotFound("article"))
        }
    }

    /// Sign and publish content with the author's keys.
    pub async fn publish(&self, keys: &Keys, content: UnsignedContent) -> FeedResult<NostrEvent> {
        let kind = content.kind;
        self.diagnostics.info(&format!("Publishing kind {kind} event..."));

        match self.source.publish(keys, content).await {
            Ok(event) => {
                self.diagnostics.success(&format!("Published kind {kind} event"));
                Ok(event)
            }
            Err(e) => {
                self.diagnostics.error(&format!("Publish failed: {e}"));
                Err(e)
            }
        }
    }
}

fn retry_delay(attempt: u32) -> Duration {
    RETRY_BASE_DELAY
        .saturating_mul(2u32.saturating_pow(attempt))
        .min(RETRY_MAX_DELAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticFeed, DiagnosticLog, NullSink, Severity};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSource {
        events: Vec<NostrEvent>,
        queries: Mutex<Vec<ContentQuery>>,
        failures_before_success: Mutex<u32>,
    }

    #[async_trait]
    impl EventSource for FakeSource {
        async fn query(&self, query: ContentQuery) -> FeedResult<Vec<NostrEvent>> {
            self.queries.lock().unwrap().push(query.clone());

            let mut failures = self.failures_before_success.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(FeedError::Timeout(u64::try_from(query.timeout.as_millis()).unwrap()));
            }
            drop(failures);

            let mut matched: Vec<_> = self
                .events
                .iter()
                .filter(|e| query.kinds.contains(&e.kind))
                .filter(|e| query.authors.contains(&e.pubkey))
                .filter(|e| {
                    query.identifiers.is_empty()
                        || e.tag_value("d").is_some_and(|d| query.identifiers.iter().any(|i| i == d))
                })
                .cloned()
                .collect();
            matched.truncate(query.limit);
            Ok(matched)
        }

        async fn publish(&self, _keys: &Keys, content: UnsignedContent) -> FeedResult<NostrEvent> {
            Ok(NostrEvent {
                id: "f".repeat(64),
                pubkey: "a".repeat(64),
                created_at: 1,
                kind: content.kind,
                tags: content.tags,
                content: content.content,
            })
        }
    }

    fn event(kind: u16, pubkey: &str, created_at: i64, tags: &[&[&str]], content: &str) -> NostrEvent {
        NostrEvent {
            id: format!("{created_at:064}"),
            pubkey: pubkey.to_string(),
            created_at,
            kind,
            tags: tags.iter().map(|t| t.iter().map(ToString::to_string).collect()).collect(),
            content: content.to_string(),
        }
    }

    fn service(source: FakeSource) -> (ContentService<FakeSource>, DiagnosticFeed) {
        let feed = DiagnosticFeed::new();
        (ContentService::new(source, Arc::new(feed.clone())), feed)
    }

    const P: &str = "pppppppppppppppppppppppppppppppppppppppppppppppppppppppppppppppp";

    #[tokio::test]
    async fn test_article_issues_one_filtered_query() {
        let source = FakeSource {
            events: vec![event(30023, P, 10, &[&["d", "intro"], &["title", "Intro"]], "body")],
            ..Default::default()
        };
        let (service, _feed) = service(source);

        let address = ArticleAddress::new(30023, P, "intro");
        let article = service.article(&address).await.unwrap();
        assert_eq!(article.content, "body");

        let queries = service.source().queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].kinds, vec![30023]);
        assert_eq!(queries[0].authors, vec![P.to_string()]);
        assert_eq!(queries[0].identifiers, vec!["intro".to_string()]);
        assert_eq!(queries[0].limit, 1);
        assert_eq!(queries[0].timeout, QUERY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_missing_article_is_not_found() {
        let (service, feed) = service(FakeSource::default());
        let mut rx = feed.subscribe();

        let result = service.article(&ArticleAddress::new(30023, P, "missing")).await;
        assert!(matches!(result, Err(FeedError::NotFound("article"))));

        let mut log = DiagnosticLog::new();
        log.drain(&mut rx);
        let latest = log.latest().unwrap();
        assert_eq!(latest.message, "Article not found");
        assert_eq!(latest.severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_lists_are_sorted_newest_first_and_filtered_by_kind() {
        let source = FakeSource {
            events: vec![
                event(1, P, 100, &[], "old"),
                event(1, P, 300, &[], "new"),
                event(30023, P, 200, &[&["d", "a"]], "article"),
                event(1, "other", 400, &[], "someone else"),
            ],
            ..Default::default()
        };
        let (service, feed) = service(source);
        let mut rx = feed.subscribe();

        let notes = service.notes(P).await.unwrap();
        let contents: Vec<_> = notes.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["new", "old"]);

        let articles = service.articles(P).await.unwrap();
        assert_eq!(articles.len(), 1);

        let queries = service.source().queries.lock().unwrap();
        assert_eq!(queries[0].limit, LIST_LIMIT);
        assert_eq!(queries[1].kinds, vec![KIND_LONG_FORM]);

        let mut log = DiagnosticLog::new();
        log.drain(&mut rx);
        assert_eq!(log.latest().unwrap().message, "Loaded 1 articles");
    }

    #[tokio::test(start_paused = true)]
    async fn test_profile_fetch_retries_then_succeeds() {
        let source = FakeSource {
            events: vec![event(0, P, 1, &[], r#"{"name":"satoshi"}"#)],
            failures_before_success: Mutex::new(2),
            ..Default::default()
        };
        let (service, _feed) = service(source);

        let profile = service.author_profile(P).await.unwrap();
        assert_eq!(profile.metadata.unwrap().display(), Some("satoshi"));

        let queries = service.source().queries.lock().unwrap();
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[0].timeout, PROFILE_TIMEOUT);
        assert_eq!(queries[0].limit, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_profile_not_found_is_not_retried() {
        let (service, _feed) = service(FakeSource::default());

        let result = service.author_profile(P).await;
        assert!(matches!(result, Err(FeedError::NotFound("profile"))));
        assert_eq!(service.source().queries.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_articles_recover_after_transient_failure() {
        let source = FakeSource {
            events: vec![event(30023, P, 5, &[&["d", "a"]], "article")],
            failures_before_success: Mutex::new(1),
            ..Default::default()
        };
        let (service, feed) = service(source);
        let mut rx = feed.subscribe();

        let started = tokio::time::Instant::now();
        let articles = service.articles(P).await.unwrap();
        assert_eq!(articles.len(), 1);
        assert!(started.elapsed() >= retry_delay(0));
        assert_eq!(service.source().queries.lock().unwrap().len(), 2);

        let mut log = DiagnosticLog::new();
        log.drain(&mut rx);
        assert!(log.iter().all(|e| e.severity != Severity::Error));
        assert_eq!(log.latest().unwrap().message, "Loaded 1 articles");
    }

    #[tokio::test(start_paused = true)]
    async fn test_article_gives_up_after_configured_retries() {
        let source = FakeSource {
            failures_before_success: Mutex::new(10),
            ..Default::default()
        };
        let service = ContentService::new(source, Arc::new(NullSink)).with_retries(1);

        let result = service.article(&ArticleAddress::new(30023, P, "intro")).await;
        assert!(matches!(result, Err(FeedError::Timeout(_))));
        assert_eq!(service.source().queries.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_article_queries_once() {
        let service = ContentService::new(FakeSource::default(), Arc::new(NullSink));

        let result = service.article(&ArticleAddress::new(30023, P, "missing")).await;
        assert!(matches!(result, Err(FeedError::NotFound("article"))));
        assert_eq!(service.source().queries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_profile_with_bad_metadata_still_loads() {
        let source = FakeSource {
            events: vec![event(0, P, 1, &[], "{{not json")],
            ..Default::default()
        };
        let (service, _feed) = service(source);

        let profile = service.author_profile(P).await.unwrap();
        assert!(profile.metadata.is_none());
        assert_eq!(profile.event.kind, 0);
    }

    #[test]
    fn test_retry_delay_backs_off() {
        assert_eq!(retry_delay(0), Duration::from_secs(1));
        assert_eq!(retry_delay(1), Duration::from_secs(2));
        assert_eq!(retry_delay(2), Duration::from_secs(4));
        assert_eq!(retry_delay(10), RETRY_MAX_DELAY);
    }
}
