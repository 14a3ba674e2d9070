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

use tracing::{instrument, trace};

use crate::offsets::GetOffsetInfo;
use crate::request::errors::{ErrorCode, KafkaError};
use crate::request::RequestContext;

use super::ApiHandler;

/// Internal request used by the write path to reserve offsets before a
/// batch is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetOffsetsRequest {
    pub infos: Vec<GetOffsetInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetOffsetsResponse {
    pub error_code: i16,
    pub error_message: Option<String>,
    /// Base offset of each reserved range, in request order. Empty on error.
    pub offsets: Vec<i64>,
}

impl GetOffsetsResponse {
    fn new(result: Result<Vec<i64>, KafkaError>) -> Self {
        match result {
            Ok(offsets) => GetOffsetsResponse {
                error_code: ErrorCode::None as i16,
                error_message: None,
                offsets,
            },
            Err(error) => GetOffsetsResponse {
                error_code: ErrorCode::from(&error) as i16,
                error_message: Some(error.message().to_string()),
                offsets: Vec::new(),
            },
        }
    }
}

fn validate(infos: &[GetOffsetInfo]) -> Result<(), KafkaError> {
    if infos.is_empty() {
        return Err(KafkaError::InvalidRequest("empty infos".to_string()));
    }
    if let Some(info) = infos.iter().find(|info| info.num_offsets < 1) {
        return Err(KafkaError::InvalidRequest(format!(
            "invalid value for num_offsets: {}",
            info.num_offsets
        )));
    }
    Ok(())
}

pub struct GetOffsetsRequestHandler;

impl ApiHandler for GetOffsetsRequestHandler {
    type Request = GetOffsetsRequest;
    type Response = GetOffsetsResponse;

    #[instrument(skip(self, request, context))]
    async fn handle_request(
        &self,
        request: GetOffsetsRequest,
        context: &RequestContext,
    ) -> GetOffsetsResponse {
        let result = validate(&request.infos).and_then(|_| {
            context
                .offsets_cache
                .get_offsets(&request.infos)
                .map_err(KafkaError::from)
        });
        trace!("get offsets {:?} -> {:?}", request.infos, result);
        GetOffsetsResponse::new(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MetaServer;

    fn info(topic_id: i32, partition_id: i32, num_offsets: i32) -> GetOffsetInfo {
        GetOffsetInfo {
            topic_id,
            partition_id,
            num_offsets,
        }
    }

    async fn get_offsets(server: &MetaServer, infos: Vec<GetOffsetInfo>) -> GetOffsetsResponse {
        GetOffsetsRequestHandler
            .handle_request(GetOffsetsRequest { infos }, &server.request_context())
            .await
    }

    #[tokio::test]
    async fn reserves_ranges_for_new_topic() {
        let server = MetaServer::in_memory().unwrap();
        let topic = server
            .topic_meta_store()
            .create_topic("orders", 2, &[])
            .unwrap();

        let response = get_offsets(&server, vec![info(topic.id, 0, 10), info(topic.id, 1, 3)]).await;
        assert_eq!(response.error_code, ErrorCode::None as i16);
        assert_eq!(response.offsets, vec![0, 0]);

        let response = get_offsets(&server, vec![info(topic.id, 0, 1)]).await;
        assert_eq!(response.offsets, vec![10]);
    }

    #[tokio::test]
    async fn bad_requests_are_rejected_without_panicking() {
        let server = MetaServer::in_memory().unwrap();
        let topic = server
            .topic_meta_store()
            .create_topic("orders", 1, &[])
            .unwrap();

        let response = get_offsets(&server, vec![]).await;
        assert_eq!(response.error_code, ErrorCode::InvalidRequest as i16);

        let response = get_offsets(&server, vec![info(topic.id, 0, 0)]).await;
        assert_eq!(response.error_code, ErrorCode::InvalidRequest as i16);
        assert!(response.offsets.is_empty());

        let response = get_offsets(&server, vec![info(topic.id, 5, 1)]).await;
        assert_eq!(response.error_code, ErrorCode::UnknownTopicOrPartition as i16);

        let response = get_offsets(&server, vec![info(4242, 0, 1)]).await;
        assert_eq!(response.error_code, ErrorCode::UnknownTopicOrPartition as i16);
    }
}
