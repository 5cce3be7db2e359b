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

//! NIP-05 identifier verification via `/.well-known/nostr.json`.

use std::time::Duration;

use log::warn;
use serde_json::Value;

use crate::error::FeedResult;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// A `local@domain` identifier split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nip05Address<'a> {
    pub local: &'a str,
    pub domain: &'a str,
}

impl<'a> Nip05Address<'a> {
    /// Split an identifier; both parts must be non-empty.
    #[must_use]
    pub fn parse(nip05: &'a str) -> Option<Self> {
        let (local, domain) = nip05.trim().split_once('@')?;
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return None;
        }
        Some(Self { local, domain })
    }

    /// Well-known document URL for this identifier.
    #[must_use]
    pub fn lookup_url(&self) -> String {
        format!("https://{}/.well-known/nostr.json?name={}", self.domain, self.local)
    }
}

/// Check a well-known document for `names[local] == pubkey` (case-insensitive).
#[must_use]
pub fn names_match(document: &Value, local: &str, pubkey: &str) -> bool {
    document
        .get("names")
        .and_then(|names| names.get(local))
        .and_then(Value::as_str)
        .is_some_and(|found| found.eq_ignore_ascii_case(pubkey))
}

/// Verify that `nip05` resolves to `pubkey`.
///
/// Malformed identifiers, HTTP failures and unexpected documents all count as
/// unverified.
pub async fn verify(client: &reqwest::Client, nip05: &str, pubkey: &str) -> bool {
    let Some(address) = Nip05Address::parse(nip05) else {
        return false;
    };

    match lookup(client, &address).await {
        Ok(document) => names_match(&document, address.local, pubkey),
        Err(e) => {
            warn!("NIP-05 verification failed for {nip05}: {e}");
            false
        }
    }
}

async fn lookup(client: &reqwest::Client, address: &Nip05Address<'_>) -> FeedResult<Value> {
    let response = client
        .get(address.lookup_url())
        .timeout(LOOKUP_TIMEOUT)
        .send()
        .await?
        .error_for_status()?;
    Ok(response.json::<Value>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_and_lookup_url() {
        let address = Nip05Address::parse("bob@example.com").unwrap();
        assert_eq!(address.local, "bob");
        assert_eq!(address.domain, "example.com");
        assert_eq!(address.lookup_url(), "https://example.com/.well-known/nostr.json?name=bob");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Nip05Address::parse("example.com").is_none());
        assert!(Nip05Address::parse("@example.com").is_none());
        assert!(Nip05Address::parse("bob@").is_none());
        assert!(Nip05Address::parse("a@b@c").is_none());
    }

    #[test]
    fn test_names_match() {
        let doc = json!({ "names": { "bob": "ABCDEF" } });
        assert!(names_match(&doc, "bob", "abcdef"));
        assert!(!names_match(&doc, "bob", "123456"));
        assert!(!names_match(&doc, "alice", "abcdef"));
        assert!(!names_match(&json!({}), "bob", "abcdef"));
    }
}
