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

use thiserror::Error;

/// Errors produced while fetching, decoding or publishing content.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("timed out after {0} ms")]
    Timeout(u64),

    #[error("relay error: {0}")]
    Relay(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("{0}")]
    Validation(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("decode error: {0}")]
    Decode(String),
}

pub type FeedResult<T> = Result<T, FeedError>;

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
