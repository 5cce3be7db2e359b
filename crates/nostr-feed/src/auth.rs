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

//! Author login and gating.

use log::{info, warn};
use nostr_sdk::Keys;

use crate::error::{FeedError, FeedResult};

/// Message shown when someone other than the blog owner logs in.
pub const ACCESS_DENIED: &str = "Access denied: This login is only for the blog owner.";

/// Whether the logged-in key (if any) belongs to the author. Keys are hex.
#[must_use]
pub fn is_author(current: Option<&str>, author: &str) -> bool {
    current.is_some_and(|key| !author.is_empty() && key.eq_ignore_ascii_case(author))
}

/// Signing session restricted to the blog author.
pub struct AuthorSession {
    author_pubkey: String,
    keys: Option<Keys>,
}

impl std::fmt::Debug for AuthorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorSession")
            .field("author_pubkey", &self.author_pubkey)
            .field("logged_in", &self.keys.is_some())
            .finish()
    }
}

impl AuthorSession {
    #[must_use]
    pub fn new(author_pubkey: impl Into<String>) -> Self {
        Self {
            author_pubkey: author_pubkey.into(),
            keys: None,
        }
    }

    /// Log in with a secret key (`nsec1...` or hex).
    ///
    /// Keys that do not belong to the author are rejected and the session
    /// stays logged out.
    pub fn login(&mut self, secret: &str) -> FeedResult<()> {
        let keys = Keys::parse(secret.trim()).map_err(|e| FeedError::InvalidKey(e.to_string()))?;
        let pubkey = keys.public_key().to_hex();

        if !is_author(Some(&pubkey), &self.author_pubkey) {
            warn!("Rejected login for non-author key {pubkey}");
            self.keys = None;
            return Err(FeedError::Validation(ACCESS_DENIED.to_string()));
        }

        info!("Author logged in");
        self.keys = Some(keys);
        Ok(())
    }

    pub fn logout(&mut self) {
        self.keys = None;
    }

    /// Public key of the logged-in user, hex.
    #[must_use]
    pub fn current_pubkey(&self) -> Option<String> {
        self.keys.as_ref().map(|k| k.public_key().to_hex())
    }

    #[must_use]
    pub fn is_author(&self) -> bool {
        is_author(self.current_pubkey().as_deref(), &self.author_pubkey)
    }

    /// Signing keys, available only while the author is logged in.
    #[must_use]
    pub fn keys(&self) -> Option<&Keys> {
        self.keys.as_ref().filter(|_| self.is_author())
    }

    #[must_use]
    pub fn author_pubkey(&self) -> &str {
        &self.author_pubkey
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nostr_sdk::nips::nip19::ToBech32;

    #[test]
    fn test_is_author_predicate() {
        let author = "ab".repeat(32);
        assert!(is_author(Some(&author), &author));
        assert!(is_author(Some(&author.to_uppercase()), &author));
        assert!(!is_author(None, &author));
        assert!(!is_author(Some(&"cd".repeat(32)), &author));
        assert!(!is_author(Some(""), ""));
    }

    #[test]
    fn test_author_login_with_nsec() {
        let keys = Keys::generate();
        let mut session = AuthorSession::new(keys.public_key().to_hex());
        let nsec = keys.secret_key().to_bech32().unwrap();

        session.login(&nsec).unwrap();
        assert!(session.is_author());
        assert!(session.keys().is_some());

        session.logout();
        assert!(!session.is_author());
        assert!(session.keys().is_none());
    }

    #[test]
    fn test_non_author_login_is_rejected() {
        let author = Keys::generate();
        let intruder = Keys::generate();
        let mut session = AuthorSession::new(author.public_key().to_hex());

        let err = session.login(&intruder.secret_key().to_secret_hex()).unwrap_err();
        assert_eq!(err.to_string(), ACCESS_DENIED);
        assert!(session.current_pubkey().is_none());
    }

    #[test]
    fn test_malformed_secret_is_invalid_key() {
        let mut session = AuthorSession::new("ab".repeat(32));
        assert!(matches!(session.login("nsec1nope"), Err(FeedError::InvalidKey(_))));
    }
}
