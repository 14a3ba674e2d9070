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

mod create_topics;
mod delete_topics;
mod get_offsets;
mod handler;

// request and response
pub use create_topics::CreateTopicsRequest;
pub use create_topics::CreateTopicsResponse;
pub use delete_topics::DeleteTopicsRequest;
pub use delete_topics::DeleteTopicsResponse;
pub use get_offsets::GetOffsetsRequest;
pub use get_offsets::GetOffsetsResponse;

// utility value object for request and response
pub use create_topics::CreatableTopic;
pub use create_topics::CreatableTopicResult;
pub use delete_topics::DeletableTopicResult;

// api handler
pub use create_topics::CreateTopicsRequestHandler;
pub use delete_topics::DeleteTopicsRequestHandler;
pub use get_offsets::GetOffsetsRequestHandler;
pub use handler::ApiHandler;
