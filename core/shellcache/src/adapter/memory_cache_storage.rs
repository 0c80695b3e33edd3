//! メモリ上の CacheStorage（テスト用）

use crate::domain::{CacheName, CachedEntry, ShellResponse};
use crate::ports::outbound::CacheStorage;
use common::error::Error;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    snapshots: Mutex<BTreeMap<String, Vec<CachedEntry>>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// スナップショットの全キー（テストの検証用）
    pub fn entry_keys(&self, name: &str) -> Vec<String> {
        self.lock()
            .map(|s| {
                s.get(name)
                    .map(|entries| entries.iter().map(|e| e.key.clone()).collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Vec<CachedEntry>>>, Error> {
        self.snapshots
            .lock()
            .map_err(|_| Error::io_msg("cache storage lock poisoned"))
    }
}

impl CacheStorage for MemoryCacheStorage {
    fn keys(&self) -> Result<Vec<String>, Error> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    fn has(&self, name: &CacheName) -> Result<bool, Error> {
        Ok(self.lock()?.contains_key(name.as_str()))
    }

    fn put_all(&self, name: &CacheName, entries: &[CachedEntry]) -> Result<(), Error> {
        self.lock()?.insert(name.to_string(), entries.to_vec());
        Ok(())
    }

    fn match_request(&self, name: &CacheName, key: &str) -> Result<Option<ShellResponse>, Error> {
        Ok(self.lock()?.get(name.as_str()).and_then(|entries| {
            entries
                .iter()
                .find(|e| e.key == key)
                .map(|e| e.response.clone())
        }))
    }

    fn delete(&self, name: &str) -> Result<bool, Error> {
        Ok(self.lock()?.remove(name).is_some())
    }
}
