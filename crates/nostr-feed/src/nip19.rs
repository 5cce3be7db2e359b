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

//! NIP-19 identifier decoding for route segments.
//!
//! Bech32 handling is done by `nostr-sdk`; this module only maps the decoded
//! value onto the few shapes the viewer cares about.

use nostr_sdk::nips::nip01::Coordinate;
use nostr_sdk::nips::nip19::{FromBech32, Nip19, ToBech32};
use nostr_sdk::{Kind, PublicKey};

use crate::error::{FeedError, FeedResult};

/// Event kind of long-form articles (NIP-23).
pub const KIND_LONG_FORM: u16 = 30023;

/// Event kind of short text notes.
pub const KIND_TEXT_NOTE: u16 = 1;

/// Event kind of profile metadata.
pub const KIND_METADATA: u16 = 0;

/// Address of a parameterized replaceable event: kind, author and `d` tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArticleAddress {
    pub kind: u16,
    /// Author public key, lowercase hex.
    pub pubkey: String,
    pub identifier: String,
}

impl ArticleAddress {
    #[must_use]
    pub fn new(kind: u16, pubkey: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            kind,
            pubkey: pubkey.into(),
            identifier: identifier.into(),
        }
    }

    /// Encode as an `naddr1...` string.
    pub fn to_naddr(&self) -> FeedResult<String> {
        let public_key = PublicKey::from_hex(&self.pubkey).map_err(|e| FeedError::InvalidKey(e.to_string()))?;
        Coordinate::new(Kind::from(self.kind), public_key)
            .identifier(self.identifier.clone())
            .to_bech32()
            .map_err(|e| FeedError::Decode(e.to_string()))
    }
}

/// What a NIP-19 identifier refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nip19Target {
    /// `npub` or `nprofile`.
    Profile { pubkey: String },
    /// `note`.
    Note { id: String },
    /// `nevent`.
    Event { id: String },
    /// `naddr`.
    Address(ArticleAddress),
    /// Decodable, but nothing the viewer can show (secret keys and the like).
    Other,
}

/// Decode a bech32 NIP-19 identifier.
pub fn decode(identifier: &str) -> FeedResult<Nip19Target> {
    let decoded = Nip19::from_bech32(identifier.trim()).map_err(|e| FeedError::Decode(e.to_string()))?;

    let target = match decoded {
        Nip19::Pubkey(public_key) => Nip19Target::Profile {
            pubkey: public_key.to_hex(),
        },
        Nip19::Profile(profile) => Nip19Target::Profile {
            pubkey: profile.public_key.to_hex(),
        },
        Nip19::EventId(id) => Nip19Target::Note { id: id.to_hex() },
        Nip19::Event(event) => Nip19Target::Event {
            id: event.event_id.to_hex(),
        },
        Nip19::Coordinate(coordinate) => Nip19Target::Address(ArticleAddress {
            kind: coordinate.kind.as_u16(),
            pubkey: coordinate.public_key.to_hex(),
            identifier: coordinate.identifier,
        }),
        _ => Nip19Target::Other,
    };

    Ok(target)
}

/// Resolve a route segment to an article address.
///
/// Only `naddr` identifiers resolve; every other kind and any decode failure
/// yield `None`.
#[must_use]
pub fn article_address(identifier: &str) -> Option<ArticleAddress> {
    match decode(identifier) {
        Ok(Nip19Target::Address(address)) => Some(address),
        _ => None,
    }
}

/// Parse a public key given as `npub1...` or hex, returning lowercase hex.
pub fn pubkey_hex(key: &str) -> FeedResult<String> {
    PublicKey::parse(key.trim())
        .map(|pk| pk.to_hex())
        .map_err(|e| FeedError::InvalidKey(e.to_string()))
}

/// Encode a hex public key as `npub1...`.
pub fn npub(pubkey_hex: &str) -> FeedResult<String> {
    let public_key = PublicKey::from_hex(pubkey_hex).map_err(|e| FeedError::InvalidKey(e.to_string()))?;
    public_key.to_bech32().map_err(|e| FeedError::Decode(e.to_string()))
}
