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

use tracing::{debug, instrument};

use crate::request::errors::{ErrorCode, KafkaError};
use crate::request::RequestContext;
use crate::topic::TopicConfigEntry;
use crate::AppError;

use super::ApiHandler;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatableTopic {
    pub name: String,
    pub num_partitions: i32,
    pub configs: Vec<TopicConfigEntry>,
}

impl CreatableTopic {
    pub fn new(name: impl Into<String>, num_partitions: i32) -> Self {
        CreatableTopic {
            name: name.into(),
            num_partitions,
            configs: Vec::new(),
        }
    }

    pub fn with_config(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.configs.push(TopicConfigEntry::new(name, value));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTopicsRequest {
    pub topics: Vec<CreatableTopic>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatableTopicResult {
    pub name: String,
    pub num_partitions: i32,
    /// The accepted overrides, empty when the topic was not created.
    pub configs: Vec<TopicConfigEntry>,
    /**
     * Possible error codes:
     *
     * INVALID_TOPIC_EXCEPTION (17)
     * TOPIC_ALREADY_EXISTS (36)
     */
    pub error_code: i16,
    pub error_message: Option<String>,
}

impl CreatableTopicResult {
    fn created(topic: CreatableTopic) -> Self {
        CreatableTopicResult {
            name: topic.name,
            num_partitions: topic.num_partitions,
            configs: topic.configs,
            error_code: ErrorCode::None as i16,
            error_message: None,
        }
    }

    fn failed(topic: CreatableTopic, error: KafkaError) -> Self {
        CreatableTopicResult {
            name: topic.name,
            num_partitions: topic.num_partitions,
            configs: Vec::new(),
            error_code: ErrorCode::from(&error) as i16,
            error_message: Some(error.message().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTopicsResponse {
    pub topics: Vec<CreatableTopicResult>,
}

/// Clients only understand a create failing as an invalid topic, so losing
/// the controller role surfaces that way instead of as NOT_CONTROLLER.
fn create_error(error: AppError) -> KafkaError {
    match error {
        AppError::NotController(s) | AppError::Unavailable(s) => KafkaError::InvalidTopic(s),
        other => KafkaError::from(other),
    }
}

pub struct CreateTopicsRequestHandler;

impl ApiHandler for CreateTopicsRequestHandler {
    type Request = CreateTopicsRequest;
    type Response = CreateTopicsResponse;

    #[instrument(skip(self, request, context))]
    async fn handle_request(
        &self,
        request: CreateTopicsRequest,
        context: &RequestContext,
    ) -> CreateTopicsResponse {
        let topics = request
            .topics
            .into_iter()
            .map(|topic| {
                let result = context.controller.check_available().and_then(|_| {
                    context.topic_meta_store.create_topic(
                        &topic.name,
                        topic.num_partitions,
                        &topic.configs,
                    )
                });
                match result {
                    Ok(info) => {
                        debug!("created topic {} with id {}", info.name, info.id);
                        CreatableTopicResult::created(topic)
                    }
                    Err(e) => {
                        debug!("create topic {} failed: {}", topic.name, e);
                        CreatableTopicResult::failed(topic, create_error(e))
                    }
                }
            })
            .collect();
        CreateTopicsResponse { topics }
    }
}
