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

use std::sync::{Arc, Weak};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, trace};

use crate::offsets::TopicInfoProvider;
use crate::utils::KvStore;
use crate::{AppError, AppResult};

use super::sequence::{TopicIdSequence, FIRST_USER_TOPIC_ID};
use super::topic_config::{resolve_topic_configs, TopicConfigEntry};
use super::topic_name::validate_topic_name;
use super::{TopicDefaults, TopicInfo};

const TOPIC_KEY_PREFIX: &str = "topic/";
const TOPIC_ID_SEQUENCE_KEY: &str = "sequence/topic_id";

fn topic_key(name: &str) -> String {
    format!("{}{}", TOPIC_KEY_PREFIX, name)
}

/// Receives topology changes made through the store.
pub trait TopicListener: Send + Sync {
    fn topic_added(&self, info: &TopicInfo);
    fn topic_deleted(&self, info: &TopicInfo);
}

/// The registry of live topics.
///
/// Registration of a name (id assignment, persistence and insertion) happens
/// while holding that name's map entry, so of two racing creates for one name
/// exactly one wins and the other sees the topic as existing.
pub struct TopicMetaStore {
    topics: DashMap<String, TopicInfo>,
    sequence: TopicIdSequence,
    defaults: TopicDefaults,
    kv_store: Mutex<KvStore>,
    listeners: RwLock<Vec<Weak<dyn TopicListener>>>,
    /// Held from a registry change until its listeners have been told, so
    /// listeners see creates and deletes in the order they happened.
    topology: Mutex<()>,
}

impl std::fmt::Debug for TopicMetaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicMetaStore")
            .field("topics", &self.topics.len())
            .field("next_topic_id", &self.sequence.peek())
            .field("defaults", &self.defaults)
            .finish()
    }
}

impl TopicMetaStore {
    /// Restores the registry from `kv_store`.
    pub fn load(kv_store: KvStore, defaults: TopicDefaults) -> AppResult<Self> {
        let topics = DashMap::new();
        let mut next_id = FIRST_USER_TOPIC_ID;
        for (key, value) in kv_store.scan_prefix(TOPIC_KEY_PREFIX) {
            let info: TopicInfo = serde_json::from_str(value)?;
            if key[TOPIC_KEY_PREFIX.len()..] != info.name {
                return Err(AppError::IllegalStateError(format!(
                    "topic stored under key {} is named {}",
                    key, info.name
                )));
            }
            next_id = next_id.max(info.id + 1);
            trace!("loaded topic {:?}", info);
            topics.insert(info.name.clone(), info);
        }
        if let Some(persisted) = kv_store.get(TOPIC_ID_SEQUENCE_KEY) {
            let persisted = persisted.parse::<i32>().map_err(|_| {
                AppError::IllegalStateError(format!("topic id sequence value: {}", persisted))
            })?;
            next_id = next_id.max(persisted);
        }
        info!(
            "topic meta store loaded {} topics, next topic id {}",
            topics.len(),
            next_id
        );
        Ok(TopicMetaStore {
            topics,
            sequence: TopicIdSequence::starting_at(next_id),
            defaults,
            kv_store: Mutex::new(kv_store),
            listeners: RwLock::new(Vec::new()),
            topology: Mutex::new(()),
        })
    }

    pub fn in_memory(defaults: TopicDefaults) -> Self {
        TopicMetaStore {
            topics: DashMap::new(),
            sequence: TopicIdSequence::new(),
            defaults,
            kv_store: Mutex::new(KvStore::in_memory()),
            listeners: RwLock::new(Vec::new()),
            topology: Mutex::new(()),
        }
    }

    pub fn defaults(&self) -> &TopicDefaults {
        &self.defaults
    }

    /// Listeners are held weakly; one that has been dropped is skipped.
    pub fn register_listener<L: TopicListener + 'static>(&self, listener: &Arc<L>) {
        let listener = Arc::downgrade(listener);
        let listener: Weak<dyn TopicListener> = listener;
        self.listeners.write().push(listener);
    }

    pub fn create_topic(
        &self,
        name: &str,
        partition_count: i32,
        configs: &[TopicConfigEntry],
    ) -> AppResult<TopicInfo> {
        validate_topic_name(name)?;
        if partition_count <= 0 {
            return Err(AppError::InvalidTopic(format!(
                "invalid partition count {} for topic {}",
                partition_count, name
            )));
        }
        let resolved = resolve_topic_configs(configs, &self.defaults)?;

        // taken before the map entry: lock order is topology, map shard, listener locks
        let _topology = self.topology.lock();
        let info = match self.topics.entry(name.to_string()) {
            Entry::Occupied(_) => return Err(AppError::TopicAlreadyExists(name.to_string())),
            Entry::Vacant(vacant) => {
                let info = TopicInfo {
                    id: self.sequence.next_id(),
                    name: name.to_string(),
                    partition_count,
                    retention_time: resolved.retention_time,
                    use_server_timestamp: resolved.use_server_timestamp,
                    max_message_size_bytes: resolved.max_message_size_bytes,
                    compacted: resolved.compacted,
                };
                self.persist_topic(&info)?;
                vacant.insert(info.clone());
                info
            }
        };
        info!(
            topic = %info.name,
            topic_id = info.id,
            partitions = info.partition_count,
            "topic created"
        );
        // listeners may take their own locks, so call them with no map entry held
        self.notify(|listener| listener.topic_added(&info));
        Ok(info)
    }

    pub fn delete_topic(&self, name: &str) -> AppResult<TopicInfo> {
        let _topology = self.topology.lock();
        let info = match self.topics.entry(name.to_string()) {
            Entry::Vacant(_) => return Err(AppError::UnknownTopic(name.to_string())),
            Entry::Occupied(occupied) => {
                self.unpersist_topic(name)?;
                occupied.remove()
            }
        };
        info!(topic = %info.name, topic_id = info.id, "topic deleted");
        self.notify(|listener| listener.topic_deleted(&info));
        Ok(info)
    }

    pub fn get_topic_info(&self, name: &str) -> Option<TopicInfo> {
        self.topics.get(name).map(|entry| entry.value().clone())
    }

    /// All live topics ordered by id.
    pub fn get_all_topics(&self) -> Vec<TopicInfo> {
        let mut topics: Vec<TopicInfo> = self
            .topics
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        topics.sort_by_key(|info| info.id);
        topics
    }

    fn notify(&self, f: impl Fn(&dyn TopicListener)) {
        let listeners: Vec<_> = self
            .listeners
            .read()
            .iter()
            .filter_map(Weak::upgrade)
            .collect();
        for listener in listeners {
            f(listener.as_ref());
        }
    }

    fn persist_topic(&self, info: &TopicInfo) -> AppResult<()> {
        let key = topic_key(&info.name);
        let value = serde_json::to_string(info)?;
        let mut kv_store = self.kv_store.lock();
        kv_store.put(
            TOPIC_ID_SEQUENCE_KEY.to_string(),
            self.sequence.peek().to_string(),
        );
        kv_store.put(key.clone(), value);
        if let Err(e) = kv_store.save() {
            kv_store.delete(&key);
            return Err(e);
        }
        debug!("persisted topic {}", info.name);
        Ok(())
    }

    fn unpersist_topic(&self, name: &str) -> AppResult<()> {
        let key = topic_key(name);
        let mut kv_store = self.kv_store.lock();
        let previous = kv_store.delete(&key);
        if let Err(e) = kv_store.save() {
            if let Some(previous) = previous {
                kv_store.put(key, previous);
            }
            return Err(e);
        }
        debug!("removed persisted topic {}", name);
        Ok(())
    }
}

impl TopicInfoProvider for TopicMetaStore {
    fn get_all_topics(&self) -> AppResult<Vec<TopicInfo>> {
        Ok(TopicMetaStore::get_all_topics(self))
    }
}
