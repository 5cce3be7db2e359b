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

//! Application configuration management.
//!
//! Configuration is persisted as TOML through `confy`. It holds the relay
//! list, the author whose content is shown, relay probe timing and window
//! preferences. Older files without a relay list are upgraded on load.

use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "nostr-blog-desktop";
const CONFIG_NAME: &str = "config";

/// Author shown when nothing else is configured.
pub const DEFAULT_AUTHOR_NPUB: &str = "npub17pdf8saz8fflz3dqyst8rhfzav4s922yv0truw85nr02jxyxqr3shkl0gr";

/// Relays used when none are configured.
pub const DEFAULT_RELAYS: [&str; 3] = ["wss://relay.damus.io", "wss://nos.lol", "wss://relay.primal.net"];

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// Configuration schema version for migrations
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// Relay URLs (wss://) queried for content and probed for health
    #[serde(default = "default_relays")]
    pub relays: Vec<String>,

    /// Author whose articles and notes are shown (npub or hex)
    #[serde(default = "default_author")]
    pub author: String,

    /// Seconds between relay probe cycles
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,

    /// Milliseconds before a relay probe is considered failed
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Path or URL of the CV document opened from the CV page
    #[serde(default = "default_cv_location")]
    pub cv_location: String,

    /// Initial window width in pixels
    #[serde(default = "default_window_width")]
    pub window_width: f32,

    /// Initial window height in pixels
    #[serde(default = "default_window_height")]
    pub window_height: f32,
}

fn default_config_version() -> u32 {
    2 // Current schema version
}

fn default_relays() -> Vec<String> {
    DEFAULT_RELAYS.iter().map(ToString::to_string).collect()
}

fn default_author() -> String {
    DEFAULT_AUTHOR_NPUB.to_string()
}

fn default_probe_interval_secs() -> u64 {
    5
}

fn default_probe_timeout_ms() -> u64 {
    3000
}

fn default_cv_location() -> String {
    "cv.pdf".to_string()
}

fn default_window_width() -> f32 {
    1100.0
}

fn default_window_height() -> f32 {
    800.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            relays: default_relays(),
            author: default_author(),
            probe_interval_secs: default_probe_interval_secs(),
            probe_timeout_ms: default_probe_timeout_ms(),
            cv_location: default_cv_location(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, upgrading older schema versions
    pub fn load() -> Result<Self, confy::ConfyError> {
        let mut config: AppConfig = confy::load(APP_NAME, CONFIG_NAME)?;

        if config.config_version < default_config_version() {
            info!("Upgrading configuration from version {}", config.config_version);
            config.migrate();
            config.save()?;
        }

        Ok(config)
    }

    /// Bring an older config up to the current schema
    fn migrate(&mut self) {
        // Version 1 allowed an empty relay list to mean "use defaults"
        if self.relays.is_empty() {
            self.relays = default_relays();
        }
        self.config_version = default_config_version();
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, CONFIG_NAME, self)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs.max(1))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms.max(1))
    }

    /// Replace the relay list, ignoring blanks and duplicates
    pub fn set_relays(&mut self, relays: &[String]) {
        let mut cleaned: Vec<String> = Vec::with_capacity(relays.len());
        for relay in relays.iter().map(|r| r.trim()).filter(|r| !r.is_empty()) {
            if !cleaned.iter().any(|r| r == relay) {
                cleaned.push(relay.to_string());
            }
        }
        if !cleaned.is_empty() {
            self.relays = cleaned;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: AppConfig = toml::from_str("author = \"npub1xyz\"").unwrap();
        assert_eq!(config.author, "npub1xyz");
        assert_eq!(config.relays.len(), DEFAULT_RELAYS.len());
        assert_eq!(config.probe_interval(), Duration::from_secs(5));
        assert_eq!(config.probe_timeout(), Duration::from_millis(3000));
    }

    #[test]
    fn test_migrate_restores_empty_relays() {
        let mut config = AppConfig {
            config_version: 1,
            relays: Vec::new(),
            ..Default::default()
        };
        config.migrate();
        assert_eq!(config.config_version, 2);
        assert_eq!(config.relays, default_relays());
    }

    #[test]
    fn test_set_relays_dedupes_and_ignores_blank() {
        let mut config = AppConfig::default();
        config.set_relays(&[
            "wss://a.example".to_string(),
            " ".to_string(),
            "wss://a.example".to_string(),
            "wss://b.example".to_string(),
        ]);
        assert_eq!(config.relays, vec!["wss://a.example", "wss://b.example"]);

        config.set_relays(&[]);
        assert_eq!(config.relays.len(), 2);
    }
}
