// Copyright 2025 jonefeewang@gmail.com
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

use std::path::Path;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::topic::TopicDefaults;

use super::{AppError, AppResult};

pub const DEFAULT_TOPIC_RETENTION_MS: u64 = 7 * 24 * 60 * 60 * 1000;
pub const DEFAULT_USE_SERVER_TIMESTAMP: bool = false;
pub const DEFAULT_MAX_MESSAGE_SIZE_BYTES: i32 = 1024 * 1024;

pub static GLOBAL_CONFIG: OnceCell<BrokerConfig> = OnceCell::new();
pub fn global_config() -> &'static BrokerConfig {
    GLOBAL_CONFIG.get().unwrap()
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct GeneralConfig {
    pub id: i32,
    /// Path of the metadata kv file. Empty keeps the registry in memory only.
    #[serde(default)]
    pub meta_db_path: String,
}

/// Process wide defaults applied to topics created without overrides.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TopicDefaultsConfig {
    pub retention_ms: u64,
    pub use_server_timestamp: bool,
    pub max_message_size_bytes: i32,
}

impl Default for TopicDefaultsConfig {
    fn default() -> Self {
        Self {
            retention_ms: DEFAULT_TOPIC_RETENTION_MS,
            use_server_timestamp: DEFAULT_USE_SERVER_TIMESTAMP,
            max_message_size_bytes: DEFAULT_MAX_MESSAGE_SIZE_BYTES,
        }
    }
}

impl From<&TopicDefaultsConfig> for TopicDefaults {
    fn from(value: &TopicDefaultsConfig) -> Self {
        TopicDefaults {
            retention_time: Duration::from_millis(value.retention_ms),
            use_server_timestamp: value.use_server_timestamp,
            max_message_size_bytes: value.max_message_size_bytes,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControllerConfig {
    pub leader: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self { leader: true }
    }
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct BrokerConfig {
    pub general: GeneralConfig,
    #[serde(default)]
    pub topic_defaults: TopicDefaultsConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
}

impl BrokerConfig {
    pub fn set_up_config<P: AsRef<Path>>(path: P) -> AppResult<BrokerConfig> {
        let path_str = path.as_ref().to_str().ok_or(AppError::InvalidValue(format!(
            "config file path: {}",
            path.as_ref().to_string_lossy()
        )))?;
        let config = config::Config::builder()
            .add_source(config::File::with_name(path_str))
            .build()?;

        let broker_config: BrokerConfig = config.try_deserialize()?;
        broker_config.validate()?;

        Ok(broker_config)
    }

    fn validate(&self) -> AppResult<()> {
        if self.topic_defaults.retention_ms == 0 {
            return Err(AppError::InvalidValue(
                "topic_defaults.retention_ms must be positive".to_string(),
            ));
        }
        if self.topic_defaults.max_message_size_bytes <= 0 {
            return Err(AppError::InvalidValue(format!(
                "topic_defaults.max_message_size_bytes: {}",
                self.topic_defaults.max_message_size_bytes
            )));
        }
        Ok(())
    }

    pub fn topic_defaults(&self) -> TopicDefaults {
        TopicDefaults::from(&self.topic_defaults)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::Builder;

    use super::*;

    fn write_conf(contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_full_config() {
        let file = write_conf(
            r#"
            [general]
            id = 3
            meta_db_path = "/tmp/meta.db"

            [topic_defaults]
            retention_ms = 1380000
            use_server_timestamp = true
            max_message_size_bytes = 123123123

            [controller]
            leader = false
            "#,
        );
        let config = BrokerConfig::set_up_config(file.path()).unwrap();
        assert_eq!(config.general.id, 3);
        assert_eq!(config.general.meta_db_path, "/tmp/meta.db");
        assert!(!config.controller.leader);

        let defaults = config.topic_defaults();
        assert_eq!(defaults.retention_time, Duration::from_secs(23 * 60));
        assert!(defaults.use_server_timestamp);
        assert_eq!(defaults.max_message_size_bytes, 123123123);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let file = write_conf(
            r#"
            [general]
            id = 1
            "#,
        );
        let config = BrokerConfig::set_up_config(file.path()).unwrap();
        assert!(config.general.meta_db_path.is_empty());
        assert!(config.controller.leader);
        let defaults = config.topic_defaults();
        assert_eq!(defaults.retention_time, Duration::from_secs(7 * 24 * 60 * 60));
        assert!(!defaults.use_server_timestamp);
        assert_eq!(defaults.max_message_size_bytes, DEFAULT_MAX_MESSAGE_SIZE_BYTES);
    }

    #[test]
    fn reject_non_positive_max_message_size() {
        let file = write_conf(
            r#"
            [general]
            id = 1

            [topic_defaults]
            retention_ms = 1000
            use_server_timestamp = false
            max_message_size_bytes = 0
            "#,
        );
        assert!(BrokerConfig::set_up_config(file.path()).is_err());
    }
}
