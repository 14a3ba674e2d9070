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

use super::ApiHandler;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTopicsRequest {
    pub topic_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletableTopicResult {
    pub name: String,
    /**
     * Possible error codes:
     *
     * UNKNOWN_TOPIC_OR_PARTITION (3)
     * NOT_CONTROLLER (41)
     */
    pub error_code: i16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTopicsResponse {
    pub responses: Vec<DeletableTopicResult>,
}

pub struct DeleteTopicsRequestHandler;

impl ApiHandler for DeleteTopicsRequestHandler {
    type Request = DeleteTopicsRequest;
    type Response = DeleteTopicsResponse;

    #[instrument(skip(self, request, context))]
    async fn handle_request(
        &self,
        request: DeleteTopicsRequest,
        context: &RequestContext,
    ) -> DeleteTopicsResponse {
        let responses = request
            .topic_names
            .into_iter()
            .map(|name| {
                let result = context
                    .controller
                    .check_available()
                    .and_then(|_| context.topic_meta_store.delete_topic(&name));
                let error = match result {
                    Ok(info) => {
                        debug!("deleted topic {} with id {}", info.name, info.id);
                        KafkaError::None
                    }
                    Err(e) => {
                        debug!("delete topic {} failed: {}", name, e);
                        KafkaError::from(e)
                    }
                };
                DeletableTopicResult {
                    name,
                    error_code: ErrorCode::from(&error) as i16,
                }
            })
            .collect();
        DeleteTopicsResponse { responses }
    }
}
