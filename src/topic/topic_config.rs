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

use std::time::Duration;

use crate::{AppError, AppResult};

use super::TopicDefaults;

pub const RETENTION_MS_CONFIG: &str = "retention.ms";
pub const MESSAGE_TIMESTAMP_TYPE_CONFIG: &str = "log.message.timestamp.type";
pub const MAX_MESSAGE_BYTES_CONFIG: &str = "max.message.bytes";
pub const CLEANUP_POLICY_CONFIG: &str = "cleanup.policy";

const LOG_APPEND_TIME: &str = "LogAppendTime";
const CREATE_TIME: &str = "CreateTime";
const CLEANUP_POLICY_COMPACT: &str = "compact";
const CLEANUP_POLICY_DELETE: &str = "delete";

/// One `key=value` override from a create topic request. Kafka allows a null
/// value, which is never valid for any of the keys understood here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicConfigEntry {
    pub name: String,
    pub value: Option<String>,
}

impl TopicConfigEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        TopicConfigEntry {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

/// Topic settings after applying overrides on top of the process defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTopicConfig {
    pub retention_time: Duration,
    pub use_server_timestamp: bool,
    pub max_message_size_bytes: i32,
    pub compacted: bool,
}

impl From<&TopicDefaults> for ResolvedTopicConfig {
    fn from(defaults: &TopicDefaults) -> Self {
        ResolvedTopicConfig {
            retention_time: defaults.retention_time,
            use_server_timestamp: defaults.use_server_timestamp,
            max_message_size_bytes: defaults.max_message_size_bytes,
            compacted: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TopicConfigKey {
    RetentionMs,
    MessageTimestampType,
    MaxMessageBytes,
    CleanupPolicy,
}

impl TopicConfigKey {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            RETENTION_MS_CONFIG => Some(TopicConfigKey::RetentionMs),
            MESSAGE_TIMESTAMP_TYPE_CONFIG => Some(TopicConfigKey::MessageTimestampType),
            MAX_MESSAGE_BYTES_CONFIG => Some(TopicConfigKey::MaxMessageBytes),
            CLEANUP_POLICY_CONFIG => Some(TopicConfigKey::CleanupPolicy),
            _ => None,
        }
    }

    /// Applies `value` to `config`, returning false when the value is not
    /// acceptable for this key.
    fn apply(self, value: &str, config: &mut ResolvedTopicConfig) -> bool {
        match self {
            TopicConfigKey::RetentionMs => parse_retention(value)
                .map(|retention| config.retention_time = retention)
                .is_some(),
            TopicConfigKey::MessageTimestampType => match value {
                LOG_APPEND_TIME => {
                    config.use_server_timestamp = true;
                    true
                }
                CREATE_TIME => {
                    config.use_server_timestamp = false;
                    true
                }
                _ => false,
            },
            TopicConfigKey::MaxMessageBytes => match value.parse::<i32>() {
                Ok(size) if size > 0 => {
                    config.max_message_size_bytes = size;
                    true
                }
                _ => false,
            },
            TopicConfigKey::CleanupPolicy => match value {
                CLEANUP_POLICY_COMPACT => {
                    config.compacted = true;
                    true
                }
                CLEANUP_POLICY_DELETE => {
                    config.compacted = false;
                    true
                }
                _ => false,
            },
        }
    }
}

/// Milliseconds as a plain decimal with no sign and no leading zeros,
/// strictly positive and within the range of a Kafka long.
fn parse_retention(value: &str) -> Option<Duration> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if value.len() > 1 && value.starts_with('0') {
        return None;
    }
    match value.parse::<i64>() {
        Ok(ms) if ms > 0 => Some(Duration::from_millis(ms as u64)),
        _ => None,
    }
}

/// Resolves the config overrides of one create topic request against the
/// process defaults. Entries are checked in request order and the first bad
/// one is reported.
pub fn resolve_topic_configs(
    configs: &[TopicConfigEntry],
    defaults: &TopicDefaults,
) -> AppResult<ResolvedTopicConfig> {
    let mut resolved = ResolvedTopicConfig::from(defaults);
    for entry in configs {
        let value = entry.value.as_deref().unwrap_or_default();
        let valid = TopicConfigKey::from_name(&entry.name)
            .map(|key| key.apply(value, &mut resolved))
            .unwrap_or(false);
        if !valid {
            return Err(AppError::InvalidTopicConfig {
                key: entry.name.clone(),
                value: value.to_string(),
            });
        }
    }
    Ok(resolved)
}
