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

//! Admin requests served by the metadata node and their protocol errors.

mod api;
mod errors;
mod request_context;
mod request_processor;

pub use request_processor::RequestProcessor;

pub use errors::ErrorCode;
pub use errors::KafkaError;
pub use request_context::RequestContext;

pub use api::ApiHandler;
pub use api::{CreateTopicsRequest, CreateTopicsResponse};
pub use api::{DeleteTopicsRequest, DeleteTopicsResponse};
pub use api::{GetOffsetsRequest, GetOffsetsResponse};

pub use api::{CreatableTopic, CreatableTopicResult, DeletableTopicResult};

pub use api::{CreateTopicsRequestHandler, DeleteTopicsRequestHandler, GetOffsetsRequestHandler};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    CreateTopics(CreateTopicsRequest),
    DeleteTopics(DeleteTopicsRequest),
    GetOffsets(GetOffsetsRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    CreateTopics(CreateTopicsResponse),
    DeleteTopics(DeleteTopicsResponse),
    GetOffsets(GetOffsetsResponse),
}

impl From<CreateTopicsResponse> for ApiResponse {
    fn from(value: CreateTopicsResponse) -> Self {
        ApiResponse::CreateTopics(value)
    }
}

impl From<DeleteTopicsResponse> for ApiResponse {
    fn from(value: DeleteTopicsResponse) -> Self {
        ApiResponse::DeleteTopics(value)
    }
}

impl From<GetOffsetsResponse> for ApiResponse {
    fn from(value: GetOffsetsResponse) -> Self {
        ApiResponse::GetOffsets(value)
    }
}
