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

//! Partition offset allocation for writers to object storage.

mod offset_loader;
mod offsets_cache;

pub use offset_loader::{BatchSource, InMemoryBatchStore, TrailerOffsetLoader};
pub use offsets_cache::OffsetsCache;

use crate::topic::TopicInfo;
use crate::AppResult;

/// A request to reserve `num_offsets` consecutive offsets of one partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetOffsetInfo {
    pub topic_id: i32,
    pub partition_id: i32,
    pub num_offsets: i32,
}

/// The last offset found in storage for one partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredOffset {
    pub partition_id: i32,
    pub offset: i64,
}

pub trait TopicInfoProvider: Send + Sync {
    fn get_all_topics(&self) -> AppResult<Vec<TopicInfo>>;
}

/// Reports the last stored offset of every partition of a topic that has
/// data. Partitions without data are left out.
pub trait PartitionOffsetLoader: Send + Sync {
    fn load_offsets_for_topic(&self, topic_id: i32) -> AppResult<Vec<StoredOffset>>;
}
