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

use thiserror::Error;

/// Kafka protocol level errors surfaced by the admin handlers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KafkaError {
    #[error("")]
    None,

    #[error("The server experienced an unexpected error: {0}")]
    Unknown(String),

    #[error("Corrupt message: {0}")]
    CorruptMessage(String),

    #[error("Unknown topic or partition: {0}")]
    UnknownTopicOrPartition(String),

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Topic already exists: {0}")]
    TopicAlreadyExists(String),

    #[error("Not controller: {0}")]
    NotController(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl KafkaError {
    /// The detail text carried by the error, without the code prefix.
    /// This is what goes into a response's `error_message` field.
    pub fn message(&self) -> &str {
        match self {
            KafkaError::None => "",
            KafkaError::Unknown(s)
            | KafkaError::CorruptMessage(s)
            | KafkaError::UnknownTopicOrPartition(s)
            | KafkaError::InvalidTopic(s)
            | KafkaError::TopicAlreadyExists(s)
            | KafkaError::NotController(s)
            | KafkaError::InvalidRequest(s) => s,
        }
    }
}

/// Kafka error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum ErrorCode {
    Unknown = -1,
    None = 0,
    CorruptMessage = 2,
    UnknownTopicOrPartition = 3,
    InvalidTopic = 17,
    TopicAlreadyExists = 36,
    NotController = 41,
    InvalidRequest = 42,
}

impl ErrorCode {
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::Unknown => {
                "The server experienced an unexpected error when processing the request"
            }
            ErrorCode::None => "",
            ErrorCode::CorruptMessage => {
                "This message has failed its CRC checksum, exceeds the valid size, or is otherwise corrupt"
            }
            ErrorCode::UnknownTopicOrPartition => "This server does not host this topic-partition",
            ErrorCode::InvalidTopic => {
                "The request attempted to perform an operation on an invalid topic"
            }
            ErrorCode::TopicAlreadyExists => "Topic with this name already exists",
            ErrorCode::NotController => "This is not the correct controller for this cluster",
            ErrorCode::InvalidRequest => {
                "This most likely occurs because of a request being malformed by the client library or the message was sent to an incompatible broker"
            }
        }
    }

    pub fn from_code(code: i16) -> Self {
        match code {
            0 => ErrorCode::None,
            2 => ErrorCode::CorruptMessage,
            3 => ErrorCode::UnknownTopicOrPartition,
            17 => ErrorCode::InvalidTopic,
            36 => ErrorCode::TopicAlreadyExists,
            41 => ErrorCode::NotController,
            42 => ErrorCode::InvalidRequest,
            _ => ErrorCode::Unknown,
        }
    }
}

impl From<&KafkaError> for ErrorCode {
    fn from(error: &KafkaError) -> Self {
        match error {
            KafkaError::None => ErrorCode::None,
            KafkaError::Unknown(_) => ErrorCode::Unknown,
            KafkaError::CorruptMessage(_) => ErrorCode::CorruptMessage,
            KafkaError::UnknownTopicOrPartition(_) => ErrorCode::UnknownTopicOrPartition,
            KafkaError::InvalidTopic(_) => ErrorCode::InvalidTopic,
            KafkaError::TopicAlreadyExists(_) => ErrorCode::TopicAlreadyExists,
            KafkaError::NotController(_) => ErrorCode::NotController,
            KafkaError::InvalidRequest(_) => ErrorCode::InvalidRequest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_conversion() {
        let error = KafkaError::TopicAlreadyExists("t".to_string());
        assert_eq!(ErrorCode::from(&error), ErrorCode::TopicAlreadyExists);
        assert_eq!(ErrorCode::from(&KafkaError::None), ErrorCode::None);
        assert_eq!(ErrorCode::from(&error) as i16, 36);
    }

    #[test]
    fn test_error_messages() {
        let error = KafkaError::UnknownTopicOrPartition("orders".to_string());
        assert_eq!(error.to_string(), "Unknown topic or partition: orders");
        assert_eq!(error.message(), "orders");
        assert!(ErrorCode::UnknownTopicOrPartition
            .message()
            .contains("does not host this topic-partition"));
        assert_eq!(ErrorCode::None.message(), "");
    }

    #[test]
    fn test_from_code() {
        assert_eq!(ErrorCode::from_code(17), ErrorCode::InvalidTopic);
        assert_eq!(ErrorCode::from_code(36), ErrorCode::TopicAlreadyExists);
        assert_eq!(ErrorCode::from_code(-1), ErrorCode::Unknown);
        assert_eq!(ErrorCode::from_code(999), ErrorCode::Unknown);
    }
}
