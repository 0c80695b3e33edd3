//! 永続設定の実装（JSON ファイル / メモリ）

use crate::ports::outbound::{PreferenceStore, LAST_FILE_NAME_KEY};
use common::error::Error;
use common::ports::outbound::FileSystem;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// `preferences.json`（キー → 文字列のオブジェクト）に保存する
pub struct JsonPreferenceStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl JsonPreferenceStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load(&self) -> Result<Map<String, Value>, Error> {
        if !self.fs.exists(&self.path) {
            return Ok(Map::new());
        }
        let s = self.fs.read_to_string(&self.path)?;
        match serde_json::from_str::<Value>(&s)? {
            Value::Object(map) => Ok(map),
            _ => Err(Error::json(format!(
                "{}: expected a JSON object",
                self.path.display()
            ))),
        }
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn last_file_name(&self) -> Result<Option<String>, Error> {
        let map = self.load()?;
        Ok(map
            .get(LAST_FILE_NAME_KEY)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()))
    }

    fn set_last_file_name(&self, name: &str) -> Result<(), Error> {
        // 壊れた設定ファイルは作り直す（表示用ラベルしか入っていない）
        let mut map = self.load().unwrap_or_default();
        map.insert(LAST_FILE_NAME_KEY.to_string(), Value::String(name.to_string()));
        if let Some(parent) = self.path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&Value::Object(map))?;
        self.fs.write_atomic(&self.path, json.as_bytes())
    }
}

/// プロセス内だけの設定（テスト・ホーム未解決時）
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    last_file_name: Mutex<Option<String>>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn last_file_name(&self) -> Result<Option<String>, Error> {
        self.last_file_name
            .lock()
            .map(|v| v.clone())
            .map_err(|_| Error::io_msg("preference lock poisoned"))
    }

    fn set_last_file_name(&self, name: &str) -> Result<(), Error> {
        let mut guard = self
            .last_file_name
            .lock()
            .map_err(|_| Error::io_msg("preference lock poisoned"))?;
        *guard = Some(name.to_string());
        Ok(())
    }
}
