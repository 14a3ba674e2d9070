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

//! Topic metadata: definitions, name and config validation, and the registry
//! that creates and deletes topics.

mod sequence;
mod topic_config;
mod topic_info;
mod topic_meta_store;
mod topic_name;

pub use sequence::{TopicIdSequence, FIRST_USER_TOPIC_ID};
pub use topic_config::{
    resolve_topic_configs, ResolvedTopicConfig, TopicConfigEntry, CLEANUP_POLICY_CONFIG,
    MAX_MESSAGE_BYTES_CONFIG, MESSAGE_TIMESTAMP_TYPE_CONFIG, RETENTION_MS_CONFIG,
};
pub use topic_info::{TopicDefaults, TopicInfo};
pub use topic_meta_store::{TopicListener, TopicMetaStore};
pub use topic_name::{validate_topic_name, MAX_TOPIC_NAME_LENGTH};
