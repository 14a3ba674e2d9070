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

//! Stored Value Constants
//!
//! Layout constants for values written to object storage. Every stored value
//! ends with a value metadata trailer (see `value_metadata`). For topic data
//! batches the trailer carries:
//!
//! - Base offset (varint)
//! - Last offset (varint)
//! - Trailer length (1 byte)

/// Largest encoded size of the varints in one trailer; the length byte is a u8.
pub const MAX_VALUE_METADATA_SIZE: usize = u8::MAX as usize;

/// Number of values in a topic data batch trailer.
pub const BATCH_TRAILER_VALUES: usize = 2;
/// Position of the base offset in a topic data batch trailer.
pub const BATCH_BASE_OFFSET_INDEX: usize = 0;
/// Position of the last offset in a topic data batch trailer.
pub const BATCH_LAST_OFFSET_INDEX: usize = 1;

