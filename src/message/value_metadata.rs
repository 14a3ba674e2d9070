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

//! Value metadata trailer.
//!
//! A stored value may carry a few auxiliary integers after its payload:
//!
//! ```text
//! | payload ... | varint_0 | varint_1 | ... | varint_n | trailer_len (1 byte) |
//! ```
//!
//! `trailer_len` is the byte length of the encoded varints, not the number of
//! values, so the trailer can be read or stripped without knowing how many
//! values were packed. Values are zigzag varints.

use bytes::{BufMut, BytesMut};
use integer_encoding::VarInt;

use crate::{AppError, AppResult};

use super::constants::MAX_VALUE_METADATA_SIZE;

/// Appends `values` to `buffer` as a value metadata trailer.
///
/// # Panics
/// If the encoded values take more than 255 bytes. Callers choose what they
/// pack, so this is a bug at the call site.
pub fn append_value_metadata(buffer: &mut BytesMut, values: &[i64]) {
    let size: usize = values.iter().map(|v| v.required_space()).sum();
    assert!(
        size <= MAX_VALUE_METADATA_SIZE,
        "too many values to append to value metadata: {} bytes",
        size
    );
    buffer.reserve(size + 1);
    let mut scratch = [0u8; 10];
    for value in values {
        let written = value.encode_var(&mut scratch);
        buffer.put_slice(&scratch[..written]);
    }
    buffer.put_u8(size as u8);
}

/// Returns the position where the trailer starts.
fn trailer_start(buffer: &[u8]) -> AppResult<usize> {
    let len_byte = *buffer
        .last()
        .ok_or_else(|| AppError::CorruptTrailer("empty buffer".to_string()))?;
    let size = len_byte as usize;
    if size + 1 > buffer.len() {
        return Err(AppError::CorruptTrailer(format!(
            "trailer length {} exceeds buffer length {}",
            size,
            buffer.len()
        )));
    }
    Ok(buffer.len() - size - 1)
}

fn decode_values(encoded: &[u8]) -> AppResult<Vec<i64>> {
    let mut values = Vec::new();
    let mut pos = 0;
    while pos < encoded.len() {
        let (value, read) = i64::decode_var(&encoded[pos..]).ok_or_else(|| {
            AppError::CorruptTrailer(format!("truncated varint at trailer position {}", pos))
        })?;
        values.push(value);
        pos += read;
    }
    Ok(values)
}

/// Returns `buffer` with its trailer stripped.
pub fn remove_value_metadata(buffer: &[u8]) -> AppResult<&[u8]> {
    let start = trailer_start(buffer)?;
    Ok(&buffer[..start])
}

/// Decodes the trailer values in the order they were appended.
pub fn read_value_metadata(buffer: &[u8]) -> AppResult<Vec<i64>> {
    let start = trailer_start(buffer)?;
    decode_values(&buffer[start..buffer.len() - 1])
}

pub fn read_and_remove_value_metadata(buffer: &[u8]) -> AppResult<(Vec<i64>, &[u8])> {
    let start = trailer_start(buffer)?;
    let values = decode_values(&buffer[start..buffer.len() - 1])?;
    Ok((values, &buffer[..start]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> BytesMut {
        BytesMut::from(&b"some-serialized-batch"[..])
    }

    #[test]
    fn append_then_read_and_remove() {
        let values = vec![0, 1, -1, 23, i64::MAX, i64::MIN, 1 << 40, -(1 << 33)];
        let mut buffer = payload();
        append_value_metadata(&mut buffer, &values);

        assert_eq!(read_value_metadata(&buffer).unwrap(), values);
        assert_eq!(remove_value_metadata(&buffer).unwrap(), &payload()[..]);

        let (read, stripped) = read_and_remove_value_metadata(&buffer).unwrap();
        assert_eq!(read, values);
        assert_eq!(stripped, &payload()[..]);
    }

    #[test]
    fn no_values_costs_one_byte() {
        let mut buffer = payload();
        append_value_metadata(&mut buffer, &[]);
        assert_eq!(buffer.len(), payload().len() + 1);
        assert_eq!(buffer[buffer.len() - 1], 0);
        assert!(read_value_metadata(&buffer).unwrap().is_empty());
        assert_eq!(remove_value_metadata(&buffer).unwrap(), &payload()[..]);
    }

    #[test]
    fn length_byte_counts_bytes_not_values() {
        let mut buffer = BytesMut::new();
        // 300 zigzags to 600, which needs two varint bytes
        append_value_metadata(&mut buffer, &[300, 1]);
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer[3], 3);
    }

    #[test]
    fn empty_payload_round_trip() {
        let mut buffer = BytesMut::new();
        append_value_metadata(&mut buffer, &[42]);
        let (values, rest) = read_and_remove_value_metadata(&buffer).unwrap();
        assert_eq!(values, vec![42]);
        assert!(rest.is_empty());
    }

    #[test]
    fn stacked_trailers_unwrap_in_reverse() {
        let mut buffer = payload();
        append_value_metadata(&mut buffer, &[7]);
        append_value_metadata(&mut buffer, &[8, 9]);

        let (outer, rest) = read_and_remove_value_metadata(&buffer).unwrap();
        assert_eq!(outer, vec![8, 9]);
        let (inner, rest) = read_and_remove_value_metadata(rest).unwrap();
        assert_eq!(inner, vec![7]);
        assert_eq!(rest, &payload()[..]);
    }

    #[test]
    fn largest_trailer_fits() {
        // i64::MIN zigzags to u64::MAX, 10 bytes each: 25 values = 250 bytes
        let values = vec![i64::MIN; 25];
        let mut buffer = payload();
        append_value_metadata(&mut buffer, &values);
        assert_eq!(buffer[buffer.len() - 1], 250);
        assert_eq!(read_value_metadata(&buffer).unwrap(), values);
    }

    #[test]
    #[should_panic(expected = "too many values")]
    fn oversized_trailer_panics() {
        let values = vec![i64::MAX; 26];
        let mut buffer = payload();
        append_value_metadata(&mut buffer, &values);
    }

    #[test]
    fn empty_buffer_is_corrupt() {
        assert!(matches!(
            read_value_metadata(&[]),
            Err(AppError::CorruptTrailer(_))
        ));
        assert!(remove_value_metadata(&[]).is_err());
    }

    #[test]
    fn length_beyond_buffer_is_corrupt() {
        assert!(matches!(
            read_value_metadata(&[1, 2, 9]),
            Err(AppError::CorruptTrailer(_))
        ));
    }

    #[test]
    fn truncated_varint_is_corrupt() {
        // 0x80 has its continuation bit set but nothing follows
        assert!(matches!(
            read_value_metadata(&[0x80, 1]),
            Err(AppError::CorruptTrailer(_))
        ));
    }
}
