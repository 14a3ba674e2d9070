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

use std::sync::Arc;

use bytes::BytesMut;
use tracing::{debug, info};

use crate::message::stamp_batch_offsets;
use crate::offsets::{GetOffsetInfo, InMemoryBatchStore, OffsetsCache, TrailerOffsetLoader};
use crate::request::{ApiRequest, ApiResponse, RequestContext, RequestProcessor};
use crate::topic::{TopicDefaults, TopicMetaStore};
use crate::utils::KvStore;

use super::{AppError, AppResult, BrokerConfig, ControllerRole};

/// Wires the topic registry, the offsets cache and the controller role
/// together and serves admin requests against them.
#[derive(Debug)]
pub struct MetaServer {
    topic_meta_store: Arc<TopicMetaStore>,
    offsets_cache: Arc<OffsetsCache>,
    batch_store: Arc<InMemoryBatchStore>,
    controller: Arc<ControllerRole>,
}

impl MetaServer {
    /// Opens the registry named by the config and recovers partition offsets
    /// from `batch_store`.
    pub fn start(config: &BrokerConfig, batch_store: Arc<InMemoryBatchStore>) -> AppResult<Self> {
        let kv_store = if config.general.meta_db_path.is_empty() {
            KvStore::in_memory()
        } else {
            KvStore::open(&config.general.meta_db_path)?
        };
        let controller = ControllerRole::new(config.general.id, config.controller.leader);
        Self::with_parts(kv_store, config.topic_defaults(), controller, batch_store)
    }

    /// A fresh node with no persisted state, acting as controller.
    pub fn in_memory() -> AppResult<Self> {
        Self::with_parts(
            KvStore::in_memory(),
            TopicDefaults::default(),
            ControllerRole::new(0, true),
            Arc::new(InMemoryBatchStore::new()),
        )
    }

    pub fn with_parts(
        kv_store: KvStore,
        defaults: TopicDefaults,
        controller: ControllerRole,
        batch_store: Arc<InMemoryBatchStore>,
    ) -> AppResult<Self> {
        let topic_meta_store = Arc::new(TopicMetaStore::load(kv_store, defaults)?);
        let loader = Arc::new(TrailerOffsetLoader::new(batch_store.clone()));
        let offsets_cache = Arc::new(OffsetsCache::new(topic_meta_store.clone(), loader));

        // subscribe before start so no create in between is missed
        topic_meta_store.register_listener(&offsets_cache);
        offsets_cache.start()?;

        info!(
            node_id = controller.node_id(),
            leader = controller.is_leader(),
            "meta server started"
        );
        Ok(MetaServer {
            topic_meta_store,
            offsets_cache,
            batch_store,
            controller: Arc::new(controller),
        })
    }

    pub fn request_context(&self) -> RequestContext {
        RequestContext::new(
            self.topic_meta_store.clone(),
            self.offsets_cache.clone(),
            self.controller.clone(),
        )
    }

    pub async fn process_request(&self, request: ApiRequest) -> ApiResponse {
        RequestProcessor::process_request(request, &self.request_context()).await
    }

    pub fn topic_meta_store(&self) -> &Arc<TopicMetaStore> {
        &self.topic_meta_store
    }

    pub fn offsets_cache(&self) -> &Arc<OffsetsCache> {
        &self.offsets_cache
    }

    pub fn batch_store(&self) -> &Arc<InMemoryBatchStore> {
        &self.batch_store
    }

    pub fn controller(&self) -> &Arc<ControllerRole> {
        &self.controller
    }

    /// Reserves offsets for a serialized batch of `num_records` records,
    /// stamps them into its trailer and stores it. Returns the base offset.
    pub fn write_batch(
        &self,
        topic_id: i32,
        partition_id: i32,
        mut batch: BytesMut,
        num_records: i32,
    ) -> AppResult<i64> {
        if num_records < 1 {
            return Err(AppError::InvalidValue(format!(
                "record count must be positive: {}",
                num_records
            )));
        }
        let base_offset = self.offsets_cache.get_offsets(&[GetOffsetInfo {
            topic_id,
            partition_id,
            num_offsets: num_records,
        }])?[0];
        stamp_batch_offsets(&mut batch, base_offset, num_records);
        self.batch_store
            .put_batch(topic_id, partition_id, batch.freeze())?;
        debug!(
            "stored batch for topic {} partition {} at offsets {}..{}",
            topic_id,
            partition_id,
            base_offset,
            base_offset + num_records as i64
        );
        Ok(base_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{read_batch_offsets, remove_value_metadata};

    #[test]
    fn write_batch_stamps_reserved_offsets() {
        let server = MetaServer::in_memory().unwrap();
        let topic = server
            .topic_meta_store()
            .create_topic("events", 1, &[])
            .unwrap();

        assert_eq!(
            server
                .write_batch(topic.id, 0, BytesMut::from(&b"first"[..]), 4)
                .unwrap(),
            0
        );
        assert_eq!(
            server
                .write_batch(topic.id, 0, BytesMut::from(&b"second"[..]), 2)
                .unwrap(),
            4
        );

        let stored = server.batch_store().last_batch(topic.id, 0).unwrap();
        let offsets = read_batch_offsets(&stored).unwrap();
        assert_eq!((offsets.base_offset, offsets.last_offset), (4, 5));
        assert_eq!(remove_value_metadata(&stored).unwrap(), b"second");
    }

    #[test]
    fn write_batch_rejects_bad_input() {
        let server = MetaServer::in_memory().unwrap();
        let topic = server
            .topic_meta_store()
            .create_topic("events", 1, &[])
            .unwrap();
        assert!(matches!(
            server.write_batch(topic.id, 0, BytesMut::new(), 0),
            Err(AppError::InvalidValue(_))
        ));
        assert!(matches!(
            server.write_batch(topic.id, 1, BytesMut::new(), 1),
            Err(AppError::UnknownPartition { .. })
        ));
        assert!(server.batch_store().last_batch(topic.id, 0).is_none());
    }

    #[test]
    fn deleted_topic_stops_taking_writes() {
        let server = MetaServer::in_memory().unwrap();
        let topic = server
            .topic_meta_store()
            .create_topic("events", 1, &[])
            .unwrap();
        server.topic_meta_store().delete_topic("events").unwrap();
        assert!(matches!(
            server.write_batch(topic.id, 0, BytesMut::new(), 1),
            Err(AppError::UnknownTopicId(_))
        ));
    }

    #[test]
    fn delete_racing_create_leaves_no_counters() {
        let server = Arc::new(MetaServer::in_memory().unwrap());
        for round in 0..500 {
            let creator = {
                let server = server.clone();
                std::thread::spawn(move || server.topic_meta_store().create_topic("t", 1, &[]))
            };
            let deleter = {
                let server = server.clone();
                std::thread::spawn(move || loop {
                    match server.topic_meta_store().delete_topic("t") {
                        Ok(info) => break info,
                        Err(_) => std::thread::yield_now(),
                    }
                })
            };
            let created = creator.join().unwrap().unwrap();
            let deleted = deleter.join().unwrap();
            assert_eq!(created.id, deleted.id);

            let result = server.offsets_cache().get_offsets(&[GetOffsetInfo {
                topic_id: deleted.id,
                partition_id: 0,
                num_offsets: 1,
            }]);
            assert!(
                matches!(result, Err(AppError::UnknownTopicId(id)) if id == deleted.id),
                "round {}: deleted topic {} still reserves offsets: {:?}",
                round,
                deleted.id,
                result
            );
        }
    }
}
