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

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, trace};

use crate::topic::{TopicInfo, TopicListener};
use crate::{AppError, AppResult};

use super::{GetOffsetInfo, PartitionOffsetLoader, TopicInfoProvider};

#[derive(Debug, Default)]
struct CacheState {
    started: bool,
    /// topic id -> next unassigned offset of each partition
    topic_offsets: HashMap<i32, Box<[AtomicI64]>>,
}

/// Hands out partition offsets to writers.
///
/// Before data for a partition is written to object storage the writer
/// reserves one offset per record here. The last offset of every stored batch
/// travels in the batch trailer, and `start` seeds the counters from there.
///
/// The map only changes shape on start and on topic add/delete, under the
/// write lock. Reservations take the read lock and bump one atomic counter, so
/// writers to different partitions never contend.
pub struct OffsetsCache {
    state: RwLock<CacheState>,
    topic_info_provider: Arc<dyn TopicInfoProvider>,
    partition_offset_loader: Arc<dyn PartitionOffsetLoader>,
}

impl std::fmt::Debug for OffsetsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("OffsetsCache")
            .field("started", &state.started)
            .field("topics", &state.topic_offsets.len())
            .finish()
    }
}

fn new_counters(partition_count: i32) -> Vec<i64> {
    vec![0; partition_count.max(0) as usize]
}

fn into_atomic(counters: Vec<i64>) -> Box<[AtomicI64]> {
    counters.into_iter().map(AtomicI64::new).collect()
}

impl OffsetsCache {
    pub fn new(
        topic_info_provider: Arc<dyn TopicInfoProvider>,
        partition_offset_loader: Arc<dyn PartitionOffsetLoader>,
    ) -> Self {
        OffsetsCache {
            state: RwLock::new(CacheState::default()),
            topic_info_provider,
            partition_offset_loader,
        }
    }

    /// Loads every topic and seeds its counters to one past the last stored
    /// offset. Calling it again after a success does nothing. On failure
    /// nothing is kept and the cache stays not started.
    pub fn start(&self) -> AppResult<()> {
        let mut state = self.state.write();
        if state.started {
            return Ok(());
        }
        let topic_infos = self.topic_info_provider.get_all_topics()?;
        let mut topic_offsets = HashMap::with_capacity(topic_infos.len());
        for topic_info in &topic_infos {
            let mut counters = new_counters(topic_info.partition_count);
            let stored_offsets = self
                .partition_offset_loader
                .load_offsets_for_topic(topic_info.id)?;
            for stored in stored_offsets {
                let index = usize::try_from(stored.partition_id)
                    .ok()
                    .filter(|index| *index < counters.len())
                    .ok_or(AppError::PartitionOffsetOutOfRange {
                        topic_id: topic_info.id,
                        partition: stored.partition_id,
                    })?;
                counters[index] = stored.offset + 1;
            }
            trace!(
                "topic {} seeded with next offsets {:?}",
                topic_info.id,
                counters
            );
            topic_offsets.insert(topic_info.id, into_atomic(counters));
        }
        state.topic_offsets = topic_offsets;
        state.started = true;
        info!("offsets cache started with {} topics", topic_infos.len());
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.state.read().started
    }

    /// Reserves offsets for each request, returning the base offset of each
    /// reserved range in request order. A request for `n` offsets owns
    /// `[base, base + n)`.
    ///
    /// Every request is checked before any counter moves, so a failed call
    /// reserves nothing.
    ///
    /// # Panics
    /// If a request asks for fewer than one offset.
    pub fn get_offsets(&self, infos: &[GetOffsetInfo]) -> AppResult<Vec<i64>> {
        if infos.is_empty() {
            return Err(AppError::EmptyInfos);
        }
        let state = self.state.read();
        if !state.started {
            return Err(AppError::NotStarted);
        }
        let counters = infos
            .iter()
            .map(|info| Self::counter(&state, info))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(counters
            .into_iter()
            .zip(infos)
            .map(|(counter, info)| {
                let num_offsets = info.num_offsets as i64;
                counter.fetch_add(num_offsets, Ordering::AcqRel)
            })
            .collect())
    }

    fn counter<'a>(state: &'a CacheState, info: &GetOffsetInfo) -> AppResult<&'a AtomicI64> {
        assert!(
            info.num_offsets >= 1,
            "invalid value for num_offsets: {}",
            info.num_offsets
        );
        let offsets = state
            .topic_offsets
            .get(&info.topic_id)
            .ok_or(AppError::UnknownTopicId(info.topic_id))?;
        usize::try_from(info.partition_id)
            .ok()
            .and_then(move |index| offsets.get(index))
            .ok_or(AppError::UnknownPartition {
                topic_id: info.topic_id,
                partition: info.partition_id,
            })
    }

    /// Starts tracking a new topic with every partition at offset zero. A
    /// topic that is already tracked keeps its counters.
    pub fn add_topic(&self, topic_id: i32, partition_count: i32) {
        let mut state = self.state.write();
        state
            .topic_offsets
            .entry(topic_id)
            .or_insert_with(|| into_atomic(new_counters(partition_count)));
        debug!(
            "offsets cache tracking topic {} with {} partitions",
            topic_id, partition_count
        );
    }

    pub fn remove_topic(&self, topic_id: i32) {
        let removed = self.state.write().topic_offsets.remove(&topic_id);
        if removed.is_some() {
            debug!("offsets cache dropped topic {}", topic_id);
        }
    }
}

impl TopicListener for OffsetsCache {
    fn topic_added(&self, info: &TopicInfo) {
        self.add_topic(info.id, info.partition_count);
    }

    fn topic_deleted(&self, info: &TopicInfo) {
        self.remove_topic(info.id);
    }
}
