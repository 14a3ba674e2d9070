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

use bytes::BytesMut;

use crate::{AppError, AppResult};

use super::constants::{BATCH_BASE_OFFSET_INDEX, BATCH_LAST_OFFSET_INDEX, BATCH_TRAILER_VALUES};
use super::value_metadata::{append_value_metadata, read_value_metadata};

/// Offsets carried in the trailer of a stored topic data batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOffsets {
    pub base_offset: i64,
    pub last_offset: i64,
}

/// Stamps a serialized batch holding `num_records` records with the offsets
/// reserved for it, starting at `base_offset`.
///
/// # Panics
/// If `num_records` is not positive.
pub fn stamp_batch_offsets(batch: &mut BytesMut, base_offset: i64, num_records: i32) {
    assert!(num_records > 0, "invalid record count: {}", num_records);
    let last_offset = base_offset + num_records as i64 - 1;
    append_value_metadata(batch, &[base_offset, last_offset]);
}

pub fn read_batch_offsets(batch: &[u8]) -> AppResult<BatchOffsets> {
    let values = read_value_metadata(batch)?;
    if values.len() != BATCH_TRAILER_VALUES {
        return Err(AppError::CorruptTrailer(format!(
            "expected {} offsets in batch trailer, found {}",
            BATCH_TRAILER_VALUES,
            values.len()
        )));
    }
    Ok(BatchOffsets {
        base_offset: values[BATCH_BASE_OFFSET_INDEX],
        last_offset: values[BATCH_LAST_OFFSET_INDEX],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::remove_value_metadata;

    #[test]
    fn stamp_and_read() {
        let mut batch = BytesMut::from(&b"records"[..]);
        stamp_batch_offsets(&mut batch, 100, 10);
        let offsets = read_batch_offsets(&batch).unwrap();
        assert_eq!(
            offsets,
            BatchOffsets {
                base_offset: 100,
                last_offset: 109
            }
        );
        assert_eq!(remove_value_metadata(&batch).unwrap(), b"records");
    }

    #[test]
    fn single_record_batch() {
        let mut batch = BytesMut::new();
        stamp_batch_offsets(&mut batch, 0, 1);
        let offsets = read_batch_offsets(&batch).unwrap();
        assert_eq!(offsets.base_offset, 0);
        assert_eq!(offsets.last_offset, 0);
    }

    #[test]
    fn wrong_value_count_is_corrupt() {
        let mut batch = BytesMut::from(&b"records"[..]);
        append_value_metadata(&mut batch, &[1]);
        assert!(matches!(
            read_batch_offsets(&batch),
            Err(AppError::CorruptTrailer(_))
        ));
    }

    #[test]
    #[should_panic(expected = "invalid record count")]
    fn zero_records_panics() {
        let mut batch = BytesMut::new();
        stamp_batch_offsets(&mut batch, 0, 0);
    }
}
