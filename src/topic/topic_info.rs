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

use serde::{Deserialize, Serialize};

use crate::service::{
    DEFAULT_MAX_MESSAGE_SIZE_BYTES, DEFAULT_TOPIC_RETENTION_MS, DEFAULT_USE_SERVER_TIMESTAMP,
};

/// Durable definition of a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicInfo {
    pub id: i32,
    pub name: String,
    pub partition_count: i32,
    pub retention_time: Duration,
    /// true when the broker stamps records with receipt time (LogAppendTime)
    /// instead of keeping the producer's CreateTime
    pub use_server_timestamp: bool,
    pub max_message_size_bytes: i32,
    /// true for the compact cleanup policy, false for delete
    pub compacted: bool,
}

/// Process wide values used for any topic config a create request leaves out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicDefaults {
    pub retention_time: Duration,
    pub use_server_timestamp: bool,
    pub max_message_size_bytes: i32,
}

impl Default for TopicDefaults {
    fn default() -> Self {
        TopicDefaults {
            retention_time: Duration::from_millis(DEFAULT_TOPIC_RETENTION_MS),
            use_server_timestamp: DEFAULT_USE_SERVER_TIMESTAMP,
            max_message_size_bytes: DEFAULT_MAX_MESSAGE_SIZE_BYTES,
        }
    }
}
