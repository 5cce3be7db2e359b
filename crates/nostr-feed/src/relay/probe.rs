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

//! Connection probes used by the relay health monitor.

use async_trait::async_trait;
use log::debug;
use tokio_tungstenite::connect_async;

use crate::error::{FeedError, FeedResult};

/// Opens a connection to a relay and closes it again.
///
/// Resolves once the connection is open (or has failed). No data is exchanged.
#[async_trait]
pub trait RelayProbe: Send + Sync {
    async fn open(&self, url: &str) -> FeedResult<()>;
}

/// Probe that performs a websocket handshake against the relay.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketProbe;

#[async_trait]
impl RelayProbe for WebSocketProbe {
    async fn open(&self, url: &str) -> FeedResult<()> {
        let (mut stream, _) = connect_async(url)
            .await
            .map_err(|e| FeedError::Relay(format!("{url}: {e}")))?;

        if let Err(e) = stream.close(None).await {
            debug!("Probe close for {url} failed: {e}");
        }
        Ok(())
    }
}
