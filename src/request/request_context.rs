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

use crate::offsets::OffsetsCache;
use crate::service::ControllerRole;
use crate::topic::TopicMetaStore;

/// Shared state the admin handlers work against.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub topic_meta_store: Arc<TopicMetaStore>,
    pub offsets_cache: Arc<OffsetsCache>,
    pub controller: Arc<ControllerRole>,
}

impl RequestContext {
    pub fn new(
        topic_meta_store: Arc<TopicMetaStore>,
        offsets_cache: Arc<OffsetsCache>,
        controller: Arc<ControllerRole>,
    ) -> Self {
        RequestContext {
            topic_meta_store,
            offsets_cache,
            controller,
        }
    }
}
