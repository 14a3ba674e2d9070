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

pub mod constants;
mod stored_batch;
mod value_metadata;

pub use stored_batch::{read_batch_offsets, stamp_batch_offsets, BatchOffsets};
pub use value_metadata::{
    append_value_metadata, read_and_remove_value_metadata, read_value_metadata,
    remove_value_metadata,
};
