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

use bytes::Bytes;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::trace;

use crate::message::read_batch_offsets;
use crate::AppResult;

use super::{PartitionOffsetLoader, StoredOffset};

/// Storage holding the stamped topic data batches.
pub trait BatchSource: Send + Sync {
    /// The batch with the highest offsets of every partition of `topic_id`
    /// that has data, as `(partition_id, batch)` pairs.
    fn last_batches_for_topic(&self, topic_id: i32) -> AppResult<Vec<(i32, Bytes)>>;
}

/// Recovers partition offsets from the trailers of the last stored batches.
pub struct TrailerOffsetLoader {
    source: Arc<dyn BatchSource>,
}

impl TrailerOffsetLoader {
    pub fn new(source: Arc<dyn BatchSource>) -> Self {
        TrailerOffsetLoader { source }
    }
}

impl PartitionOffsetLoader for TrailerOffsetLoader {
    fn load_offsets_for_topic(&self, topic_id: i32) -> AppResult<Vec<StoredOffset>> {
        self.source
            .last_batches_for_topic(topic_id)?
            .into_iter()
            .map(|(partition_id, batch)| {
                let offsets = read_batch_offsets(&batch)?;
                trace!(
                    "topic {} partition {} last stored offset {}",
                    topic_id,
                    partition_id,
                    offsets.last_offset
                );
                Ok(StoredOffset {
                    partition_id,
                    offset: offsets.last_offset,
                })
            })
            .collect()
    }
}

/// Keeps the newest batch of each partition in memory.
#[derive(Debug, Default)]
pub struct InMemoryBatchStore {
    batches: DashMap<(i32, i32), Bytes>,
}

impl InMemoryBatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a stamped batch. Writers may finish out of order, so a batch
    /// replaces the stored one only when its last offset is higher.
    pub fn put_batch(&self, topic_id: i32, partition_id: i32, batch: Bytes) -> AppResult<()> {
        let last_offset = read_batch_offsets(&batch)?.last_offset;
        match self.batches.entry((topic_id, partition_id)) {
            Entry::Vacant(vacant) => {
                vacant.insert(batch);
            }
            Entry::Occupied(mut occupied) => {
                if read_batch_offsets(occupied.get())?.last_offset < last_offset {
                    occupied.insert(batch);
                }
            }
        }
        Ok(())
    }

    pub fn last_batch(&self, topic_id: i32, partition_id: i32) -> Option<Bytes> {
        self.batches
            .get(&(topic_id, partition_id))
            .map(|batch| batch.value().clone())
    }
}

impl BatchSource for InMemoryBatchStore {
    fn last_batches_for_topic(&self, topic_id: i32) -> AppResult<Vec<(i32, Bytes)>> {
        let mut batches: Vec<(i32, Bytes)> = self
            .batches
            .iter()
            .filter(|entry| entry.key().0 == topic_id)
            .map(|entry| (entry.key().1, entry.value().clone()))
            .collect();
        batches.sort_by_key(|(partition_id, _)| *partition_id);
        Ok(batches)
    }
}
