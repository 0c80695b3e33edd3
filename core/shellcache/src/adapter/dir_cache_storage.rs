//! ディレクトリに 1 スナップショット = 1 JSON ファイルで保存する CacheStorage
//!
//! `<dir>/<cache-name>.json`。本文は base64。書き込みは一時ファイル + rename。

use crate::domain::{CacheName, CachedEntry, ShellResponse};
use crate::ports::outbound::CacheStorage;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use common::error::Error;
use common::ports::outbound::FileSystem;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const SNAPSHOT_EXT: &str = "json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredSnapshot {
    name: String,
    entries: Vec<StoredEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    status: u16,
    #[serde(default)]
    headers: Vec<(String, String)>,
    /// base64
    body: String,
}

impl StoredEntry {
    fn from_entry(entry: &CachedEntry) -> Self {
        Self {
            key: entry.key.clone(),
            status: entry.response.status,
            headers: entry.response.headers.clone(),
            body: STANDARD.encode(&entry.response.body),
        }
    }

    fn to_response(&self) -> Result<ShellResponse, Error> {
        let body = STANDARD
            .decode(&self.body)
            .map_err(|e| Error::json(format!("invalid body for '{}': {}", self.key, e)))?;
        Ok(ShellResponse {
            status: self.status,
            headers: self.headers.clone(),
            body,
        })
    }
}

pub struct DirCacheStorage {
    fs: Arc<dyn FileSystem>,
    dir: PathBuf,
}

impl DirCacheStorage {
    pub fn new(fs: Arc<dyn FileSystem>, dir: impl AsRef<Path>) -> Self {
        Self {
            fs,
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn snapshot_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, SNAPSHOT_EXT))
    }

    fn load(&self, name: &CacheName) -> Result<Option<StoredSnapshot>, Error> {
        let path = self.snapshot_path(name.as_str());
        if !self.fs.exists(&path) {
            return Ok(None);
        }
        let s = self.fs.read_to_string(&path)?;
        let snapshot: StoredSnapshot = serde_json::from_str(&s)
            .map_err(|e| Error::json(format!("{}: {}", path.display(), e)))?;
        Ok(Some(snapshot))
    }
}

impl CacheStorage for DirCacheStorage {
    fn keys(&self) -> Result<Vec<String>, Error> {
        if !self.fs.exists(&self.dir) {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = self
            .fs
            .read_dir(&self.dir)?
            .into_iter()
            .filter(|p| p.extension().map(|e| e == SNAPSHOT_EXT).unwrap_or(false))
            .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .filter(|name| !name.starts_with('.'))
            .collect();
        names.sort();
        Ok(names)
    }

    fn has(&self, name: &CacheName) -> Result<bool, Error> {
        Ok(self.fs.exists(&self.snapshot_path(name.as_str())))
    }

    fn put_all(&self, name: &CacheName, entries: &[CachedEntry]) -> Result<(), Error> {
        self.fs.create_dir_all(&self.dir)?;
        let snapshot = StoredSnapshot {
            name: name.to_string(),
            entries: entries.iter().map(StoredEntry::from_entry).collect(),
        };
        let json = serde_json::to_string(&snapshot)?;
        self.fs
            .write_atomic(&self.snapshot_path(name.as_str()), json.as_bytes())
    }

    fn match_request(&self, name: &CacheName, key: &str) -> Result<Option<ShellResponse>, Error> {
        let Some(snapshot) = self.load(name)? else {
            return Ok(None);
        };
        snapshot
            .entries
            .iter()
            .find(|e| e.key == key)
            .map(StoredEntry::to_response)
            .transpose()
    }

    fn delete(&self, name: &str) -> Result<bool, Error> {
        let path = self.snapshot_path(name);
        if !self.fs.exists(&path) {
            return Ok(false);
        }
        self.fs.remove_file(&path)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::adapter::{MemoryFileSystem, StdFileSystem};

    fn entry(key: &str, body: &[u8]) -> CachedEntry {
        CachedEntry {
            key: key.to_string(),
            response: ShellResponse::new(200, body).with_header("content-type", "text/html"),
        }
    }

    #[test]
    fn test_put_match_delete_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DirCacheStorage::new(Arc::new(StdFileSystem), dir.path().join("cache"));
        let v1 = CacheName::new("shell-v1").unwrap();
        assert!(storage.keys().unwrap().is_empty());
        assert!(!storage.has(&v1).unwrap());

        storage
            .put_all(&v1, &[entry("http://localhost/", b"<html>\x00\xff")])
            .unwrap();
        assert_eq!(storage.keys().unwrap(), vec!["shell-v1"]);
        let hit = storage.match_request(&v1, "http://localhost/").unwrap().unwrap();
        assert_eq!(hit.body, b"<html>\x00\xff".to_vec());
        assert_eq!(hit.header("Content-Type"), Some("text/html"));
        assert!(storage.match_request(&v1, "http://localhost/other").unwrap().is_none());

        assert!(storage.delete("shell-v1").unwrap());
        assert!(!storage.delete("shell-v1").unwrap());
        assert!(storage.keys().unwrap().is_empty());
    }

    #[test]
    fn test_keys_ignores_foreign_files() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.insert("/cache/shell-v1.json", r#"{"name":"shell-v1","entries":[]}"#);
        fs.insert("/cache/notes.txt", "x");
        fs.insert("/cache/.controller.json", r#"{"cacheName":"shell-v1"}"#);
        let storage = DirCacheStorage::new(fs, "/cache");
        assert_eq!(storage.keys().unwrap(), vec!["shell-v1"]);
    }

    #[test]
    fn test_corrupt_snapshot_is_error() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.insert("/cache/shell-v1.json", "{not json");
        let storage = DirCacheStorage::new(fs, "/cache");
        let v1 = CacheName::new("shell-v1").unwrap();
        assert_eq!(storage.match_request(&v1, "k").unwrap_err().exit_code(), 65);
    }
}
