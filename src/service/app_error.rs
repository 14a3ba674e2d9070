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

use crate::request::KafkaError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// general errors
    #[error("illegal state: {0}")]
    IllegalStateError(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("config file error: {0}")]
    ConfigFileError(#[from] config::ConfigError),

    /// topic metadata errors
    #[error("invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Invalid value for '{key}': '{value}'")]
    InvalidTopicConfig { key: String, value: String },

    #[error("topic already exists: {0}")]
    TopicAlreadyExists(String),

    #[error("unknown topic: {0}")]
    UnknownTopic(String),

    /// offset allocation errors
    #[error("empty infos")]
    EmptyInfos,

    #[error("not started")]
    NotStarted,

    #[error("unknown topic id: {0}")]
    UnknownTopicId(i32),

    #[error("unknown partition {partition} for topic id {topic_id}")]
    UnknownPartition { topic_id: i32, partition: i32 },

    #[error("partition offset out of range: topic id {topic_id}, partition {partition}")]
    PartitionOffsetOutOfRange { topic_id: i32, partition: i32 },

    #[error("corrupt value metadata trailer: {0}")]
    CorruptTrailer(String),

    /// controller role errors
    #[error("not controller: {0}")]
    NotController(String),

    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl From<AppError> for KafkaError {
    fn from(value: AppError) -> Self {
        match value {
            AppError::InvalidTopic(s) => KafkaError::InvalidTopic(s),
            e @ AppError::InvalidTopicConfig { .. } => KafkaError::InvalidTopic(e.to_string()),
            AppError::TopicAlreadyExists(s) => KafkaError::TopicAlreadyExists(s),
            AppError::UnknownTopic(s) => KafkaError::UnknownTopicOrPartition(s),
            e @ AppError::UnknownTopicId(_) => KafkaError::UnknownTopicOrPartition(e.to_string()),
            e @ AppError::UnknownPartition { .. } => {
                KafkaError::UnknownTopicOrPartition(e.to_string())
            }
            AppError::NotController(s) => KafkaError::NotController(s),
            AppError::Unavailable(s) => KafkaError::NotController(s),
            AppError::CorruptTrailer(s) => KafkaError::CorruptMessage(s),
            _ => KafkaError::Unknown(value.to_string()),
        }
    }
}
