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

//! Plain event and metadata types used by the viewer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::nip19::ArticleAddress;

/// A signed Nostr event as delivered by relays.
///
/// Signature verification happens in the relay client; this is the
/// already-verified view the UI works with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NostrEvent {
    pub id: String,
    pub pubkey: String,
    pub created_at: i64,
    pub kind: u16,
    #[serde(default)]
    pub tags: Vec<Vec<String>>,
    #[serde(default)]
    pub content: String,
}

impl NostrEvent {
    /// First value of the first tag named `name`.
    #[must_use]
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.first().is_some_and(|n| n == name))
            .and_then(|tag| tag.get(1))
            .map(String::as_str)
    }

    #[must_use]
    pub fn created_at_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.created_at, 0).unwrap_or_default()
    }
}

/// Sort events newest first.
pub fn sort_newest_first(events: &mut [NostrEvent]) {
    events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Format a date the way article cards show it, e.g. "March 4, 2025".
#[must_use]
pub fn format_long_date(date: DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Display metadata of a long-form article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleMeta {
    pub title: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    /// Value of the `d` tag, if any.
    pub identifier: Option<String>,
    /// `published_at` tag when present and valid, otherwise `created_at`.
    pub published: DateTime<Utc>,
}

impl ArticleMeta {
    #[must_use]
    pub fn from_event(event: &NostrEvent) -> Self {
        let published = event
            .tag_value("published_at")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or_else(|| event.created_at_utc());

        Self {
            title: non_empty(event.tag_value("title")).unwrap_or_else(|| "Untitled".to_string()),
            summary: non_empty(event.tag_value("summary")),
            image: non_empty(event.tag_value("image")),
            identifier: event.tag_value("d").map(ToString::to_string),
            published,
        }
    }

    /// Address of the article, available when it carries a `d` tag.
    #[must_use]
    pub fn address(&self, event: &NostrEvent) -> Option<ArticleAddress> {
        self.identifier
            .as_ref()
            .map(|d| ArticleAddress::new(event.kind, event.pubkey.clone(), d.clone()))
    }

    #[must_use]
    pub fn formatted_date(&self) -> String {
        format_long_date(self.published)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(ToString::to_string)
}

/// Profile metadata carried in a kind-0 event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub nip05: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl ProfileMetadata {
    /// Parse profile metadata from event content. Unknown fields are ignored.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Best available display name.
    #[must_use]
    pub fn display(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.name.as_deref().filter(|s| !s.is_empty()))
    }
}

/// A fetched author profile.
#[derive(Debug, Clone)]
pub struct AuthorProfile {
    pub event: NostrEvent,
    /// `None` when the event content was not valid metadata JSON.
    pub metadata: Option<ProfileMetadata>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(tags: Vec<Vec<&str>>) -> NostrEvent {
        NostrEvent {
            id: "e".repeat(64),
            pubkey: "a".repeat(64),
            created_at: 1_700_000_000,
            kind: 30023,
            tags: tags
                .into_iter()
                .map(|t| t.into_iter().map(ToString::to_string).collect())
                .collect(),
            content: "# Hello".to_string(),
        }
    }

    #[test]
    fn test_article_meta_reads_tags() {
        let event = article(vec![
            vec!["d", "my-post"],
            vec!["title", "My Post"],
            vec!["summary", "A summary"],
            vec!["image", "https://example.com/a.png"],
            vec!["published_at", "1600000000"],
        ]);
        let meta = ArticleMeta::from_event(&event);

        assert_eq!(meta.title, "My Post");
        assert_eq!(meta.summary.as_deref(), Some("A summary"));
        assert_eq!(meta.image.as_deref(), Some("https://example.com/a.png"));
        assert_eq!(meta.identifier.as_deref(), Some("my-post"));
        assert_eq!(meta.published.timestamp(), 1_600_000_000);
        assert_eq!(meta.formatted_date(), "September 13, 2020");

        let address = meta.address(&event).unwrap();
        assert_eq!(address.identifier, "my-post");
        assert_eq!(address.kind, 30023);
    }

    #[test]
    fn test_article_meta_defaults() {
        let event = article(vec![vec!["published_at", "soon"]]);
        let meta = ArticleMeta::from_event(&event);

        assert_eq!(meta.title, "Untitled");
        assert!(meta.summary.is_none());
        assert!(meta.identifier.is_none());
        assert!(meta.address(&event).is_none());
        assert_eq!(meta.published.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut events = vec![article(vec![]), article(vec![]), article(vec![])];
        events[0].created_at = 10;
        events[1].created_at = 30;
        events[2].created_at = 20;
        sort_newest_first(&mut events);
        let order: Vec<_> = events.iter().map(|e| e.created_at).collect();
        assert_eq!(order, vec![30, 20, 10]);
    }

    #[test]
    fn test_profile_metadata_parse() {
        let meta = ProfileMetadata::parse(r#"{"name":"alice","about":"hi","lud16":"x@y"}"#).unwrap();
        assert_eq!(meta.display(), Some("alice"));
        assert_eq!(meta.about.as_deref(), Some("hi"));

        let meta = ProfileMetadata::parse(r#"{"name":"alice","display_name":"Alice A."}"#).unwrap();
        assert_eq!(meta.display(), Some("Alice A."));

        assert!(ProfileMetadata::parse("not json").is_err());
    }

    #[test]
    fn test_event_deserializes_from_relay_json() {
        let json = r#"{"id":"01","pubkey":"02","created_at":5,"kind":1,"tags":[["p","03"]],"content":"gm","sig":"ff"}"#;
        let event: NostrEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind, 1);
        assert_eq!(event.tag_value("p"), Some("03"));
        assert_eq!(event.content, "gm");
    }
}
