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

use tracing::trace;

use crate::request::api::{
    ApiHandler, CreateTopicsRequestHandler, DeleteTopicsRequestHandler, GetOffsetsRequestHandler,
};
use crate::request::{ApiRequest, ApiResponse, RequestContext};

/// general async handler
async fn execute_handler<H>(handler: H, request: H::Request, context: &RequestContext) -> ApiResponse
where
    H: ApiHandler + Sync,
    H::Response: Into<ApiResponse>,
{
    handler.handle_request(request, context).await.into()
}

pub struct RequestProcessor;

impl RequestProcessor {
    pub async fn process_request(request: ApiRequest, context: &RequestContext) -> ApiResponse {
        trace!("Processing request: {:?}", request);
        match request {
            ApiRequest::CreateTopics(request) => {
                let handler = CreateTopicsRequestHandler;
                execute_handler(handler, request, context).await
            }
            ApiRequest::DeleteTopics(request) => {
                let handler = DeleteTopicsRequestHandler;
                execute_handler(handler, request, context).await
            }
            ApiRequest::GetOffsets(request) => {
                let handler = GetOffsetsRequestHandler;
                execute_handler(handler, request, context).await
            }
        }
    }
}
