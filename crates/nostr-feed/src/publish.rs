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

//! Drafts for new notes and articles, validated into [`UnsignedContent`].

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{FeedError, FeedResult};
use crate::nip19::{KIND_LONG_FORM, KIND_TEXT_NOTE};
use crate::query::UnsignedContent;

lazy_static! {
    static ref NON_SLUG_CHARS: Regex = Regex::new("[^a-z0-9]+").expect("valid slug regex");
}

/// Turn a title into a `d` identifier: lowercase, non-alphanumeric runs become `-`.
#[must_use]
pub fn slugify(title: &str) -> String {
    NON_SLUG_CHARS.replace_all(&title.to_lowercase(), "-").into_owned()
}

/// Short text note form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub content: String,
    /// Already-hosted image to append to the note.
    pub image_url: String,
}

impl NoteDraft {
    #[must_use]
    pub fn is_publishable(&self) -> bool {
        !self.content.trim().is_empty()
    }

    pub fn to_unsigned(&self) -> FeedResult<UnsignedContent> {
        if !self.is_publishable() {
            return Err(FeedError::Validation(
                "Please write some content before publishing.".to_string(),
            ));
        }

        let image = self.image_url.trim();
        let content = if image.is_empty() {
            self.content.clone()
        } else {
            format!("{}\n\n{image}", self.content)
        };

        Ok(UnsignedContent {
            kind: KIND_TEXT_NOTE,
            content,
            tags: Vec::new(),
        })
    }
}

/// Long-form article form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub image_url: String,
    /// Optional custom `d` identifier; derived from the title when blank.
    pub identifier: String,
}

impl ArticleDraft {
    #[must_use]
    pub fn is_publishable(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }

    /// `d` tag value this draft will publish under.
    #[must_use]
    pub fn resolved_identifier(&self) -> String {
        let custom = self.identifier.trim();
        if custom.is_empty() {
            slugify(&self.title)
        } else {
            custom.to_string()
        }
    }

    pub fn to_unsigned(&self) -> FeedResult<UnsignedContent> {
        self.to_unsigned_at(Utc::now().timestamp())
    }

    /// Build the event content with an explicit `published_at` timestamp.
    pub fn to_unsigned_at(&self, published_at: i64) -> FeedResult<UnsignedContent> {
        if !self.is_publishable() {
            return Err(FeedError::Validation(
                "Please provide at least a title and content.".to_string(),
            ));
        }

        let mut tags = vec![
            vec!["d".to_string(), self.resolved_identifier()],
            vec!["title".to_string(), self.title.clone()],
            vec!["published_at".to_string(), published_at.to_string()],
        ];
        if !self.summary.trim().is_empty() {
            tags.push(vec!["summary".to_string(), self.summary.clone()]);
        }
        if !self.image_url.trim().is_empty() {
            tags.push(vec!["image".to_string(), self.image_url.trim().to_string()]);
        }

        Ok(UnsignedContent {
            kind: KIND_LONG_FORM,
            content: self.content.clone(),
            tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world-");
        assert_eq!(slugify("Nostr 101: Relays & Keys"), "nostr-101-relays-keys");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
    }

    #[test]
    fn test_note_requires_content() {
        let draft = NoteDraft {
            content: "   ".to_string(),
            ..Default::default()
        };
        assert!(!draft.is_publishable());
        assert!(matches!(draft.to_unsigned(), Err(FeedError::Validation(_))));
    }

    #[test]
    fn test_note_appends_image_url() {
        let draft = NoteDraft {
            content: "gm".to_string(),
            image_url: "https://example.com/cat.jpg".to_string(),
        };
        let unsigned = draft.to_unsigned().unwrap();
        assert_eq!(unsigned.kind, 1);
        assert_eq!(unsigned.content, "gm\n\nhttps://example.com/cat.jpg");
        assert!(unsigned.tags.is_empty());
    }

    #[test]
    fn test_article_tags() {
        let draft = ArticleDraft {
            title: "My First Post".to_string(),
            summary: "Short".to_string(),
            content: "# Heading\n\nBody".to_string(),
            ..Default::default()
        };
        let unsigned = draft.to_unsigned_at(1_700_000_000).unwrap();

        assert_eq!(unsigned.kind, 30023);
        assert_eq!(
            unsigned.tags,
            vec![
                vec!["d".to_string(), "my-first-post".to_string()],
                vec!["title".to_string(), "My First Post".to_string()],
                vec!["published_at".to_string(), "1700000000".to_string()],
                vec!["summary".to_string(), "Short".to_string()],
            ]
        );
    }

    #[test]
    fn test_article_custom_identifier_and_image() {
        let draft = ArticleDraft {
            title: "Title".to_string(),
            content: "Body".to_string(),
            identifier: " custom-slug ".to_string(),
            image_url: "https://example.com/cover.png".to_string(),
            ..Default::default()
        };
        let unsigned = draft.to_unsigned_at(1).unwrap();
        assert_eq!(unsigned.tags[0][1], "custom-slug");
        assert!(unsigned.tags.iter().any(|t| t[0] == "image"));
        assert!(!unsigned.tags.iter().any(|t| t[0] == "summary"));
    }

    #[test]
    fn test_article_requires_title_and_content() {
        let draft = ArticleDraft {
            title: "Only a title".to_string(),
            ..Default::default()
        };
        assert!(matches!(draft.to_unsigned_at(1), Err(FeedError::Validation(_))));
    }
}
