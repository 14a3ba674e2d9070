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

use crate::{AppError, AppResult};

pub const MAX_TOPIC_NAME_LENGTH: usize = 249;

/// Checks a topic name: ascii letters, digits, '.', '_' and '-' only, at most
/// `MAX_TOPIC_NAME_LENGTH` long, and not "." or ".." since names end up as
/// storage key path segments.
pub fn validate_topic_name(name: &str) -> AppResult<()> {
    if name.is_empty() {
        return Err(AppError::InvalidTopic("topic name is empty".to_string()));
    }
    if name == "." || name == ".." {
        return Err(AppError::InvalidTopic(format!(
            "topic name cannot be '{}'",
            name
        )));
    }
    if name.len() > MAX_TOPIC_NAME_LENGTH {
        return Err(AppError::InvalidTopic(format!(
            "topic name is longer than {} characters",
            MAX_TOPIC_NAME_LENGTH
        )));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(AppError::InvalidTopic(format!(
            "topic name '{}' contains illegal character '{}'",
            name, c
        )));
    }
    Ok(())
}
