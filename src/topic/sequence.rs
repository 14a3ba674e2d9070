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

use std::sync::atomic::{AtomicI32, Ordering};

/// Ids below this are reserved for system topics.
pub const FIRST_USER_TOPIC_ID: i32 = 1000;

/// Monotonic topic id generator. Ids are never handed out twice by one
/// sequence; the store persists `peek()` so a reloaded sequence resumes past
/// every id issued before.
#[derive(Debug)]
pub struct TopicIdSequence {
    next: AtomicI32,
}

impl TopicIdSequence {
    pub fn new() -> Self {
        Self::starting_at(FIRST_USER_TOPIC_ID)
    }

    /// Never starts below `FIRST_USER_TOPIC_ID`.
    pub fn starting_at(next: i32) -> Self {
        TopicIdSequence {
            next: AtomicI32::new(next.max(FIRST_USER_TOPIC_ID)),
        }
    }

    pub fn next_id(&self) -> i32 {
        self.next.fetch_add(1, Ordering::AcqRel)
    }

    pub fn peek(&self) -> i32 {
        self.next.load(Ordering::Acquire)
    }
}

impl Default for TopicIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    #[test]
    fn starts_at_reserved_base() {
        let sequence = TopicIdSequence::new();
        assert_eq!(sequence.next_id(), 1000);
        assert_eq!(sequence.next_id(), 1001);
        assert_eq!(sequence.peek(), 1002);
    }

    #[test]
    fn never_below_reserved_base() {
        let sequence = TopicIdSequence::starting_at(3);
        assert_eq!(sequence.next_id(), FIRST_USER_TOPIC_ID);
        let sequence = TopicIdSequence::starting_at(2000);
        assert_eq!(sequence.next_id(), 2000);
    }

    #[test]
    fn concurrent_ids_are_unique() {
        let sequence = Arc::new(TopicIdSequence::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let sequence = sequence.clone();
                std::thread::spawn(move || (0..100).map(|_| sequence.next_id()).collect::<Vec<_>>())
            })
            .collect();
        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {}", id);
            }
        }
        assert_eq!(seen.len(), 800);
        assert_eq!(sequence.peek(), FIRST_USER_TOPIC_ID + 800);
    }
}
