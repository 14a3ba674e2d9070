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

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::AppResult;

/// A small json file backed key value store holding the cluster metadata.
///
/// Every mutation is kept in memory until `save` is called. A store opened
/// with `in_memory` never touches the disk.
#[derive(Debug)]
pub struct KvStore {
    path: Option<PathBuf>,
    store: BTreeMap<String, String>,
}

impl KvStore {
    /// Opens the store file and loads its content, creating an empty file if
    /// it does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> AppResult<KvStore> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let store = if contents.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&contents)?
        };
        Ok(KvStore {
            path: Some(path),
            store,
        })
    }

    pub fn in_memory() -> KvStore {
        KvStore {
            path: None,
            store: BTreeMap::new(),
        }
    }

    pub fn put(&mut self, key: String, value: String) {
        self.store.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.store.get(key).map(String::as_str)
    }

    pub fn delete(&mut self, key: &str) -> Option<String> {
        self.store.remove(key)
    }

    /// All entries whose key starts with `prefix`, in key order.
    pub fn scan_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.store
            .range(prefix.to_string()..)
            .take_while(move |(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Writes the whole store to a sibling temp file and renames it over the
    /// store file, so a crash leaves either the old or the new content.
    pub fn save(&self) -> AppResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut tmp_path = path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        let contents = serde_json::to_string_pretty(&self.store)?;
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_kv_store() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("kv.db");

        let mut kv_store = KvStore::open(&path).unwrap();
        kv_store.put("key1".to_owned(), "value1".to_owned());
        kv_store.put("key2".to_owned(), "value2".to_owned());

        assert_eq!(kv_store.get("key1"), Some("value1"));
        assert_eq!(kv_store.get("key2"), Some("value2"));

        assert_eq!(kv_store.delete("key1"), Some("value1".to_owned()));
        assert_eq!(kv_store.get("key1"), None);

        kv_store.save().unwrap();

        let store = KvStore::open(&path).unwrap();
        assert_eq!(store.get("key1"), None);
        assert_eq!(store.get("key2"), Some("value2"));
    }

    #[test]
    fn test_scan_prefix() {
        let mut kv_store = KvStore::in_memory();
        kv_store.put("topic/b".to_owned(), "2".to_owned());
        kv_store.put("topic/a".to_owned(), "1".to_owned());
        kv_store.put("sequence/topic_id".to_owned(), "1000".to_owned());
        kv_store.put("topics".to_owned(), "x".to_owned());

        let scanned: Vec<_> = kv_store.scan_prefix("topic/").collect();
        assert_eq!(scanned, vec![("topic/a", "1"), ("topic/b", "2")]);
    }

    #[test]
    fn test_in_memory_save_is_noop() {
        let mut kv_store = KvStore::in_memory();
        kv_store.put("k".to_owned(), "v".to_owned());
        kv_store.save().unwrap();
        assert_eq!(kv_store.get("k"), Some("v"));
    }

    #[test]
    fn test_save_overwrites_shorter_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("kv.db");

        let mut kv_store = KvStore::open(&path).unwrap();
        kv_store.put("long-key".to_owned(), "a-rather-long-value".to_owned());
        kv_store.save().unwrap();
        kv_store.delete("long-key");
        kv_store.save().unwrap();

        let store = KvStore::open(&path).unwrap();
        assert_eq!(store.get("long-key"), None);
    }
}
