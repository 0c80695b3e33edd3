//! ClientRegistry の実装
//!
//! FileClientRegistry: スナップショットと同じディレクトリの `.controller.json` に制御中の版を書く。後から起動するプロセスはこれを読む。

use crate::domain::CacheName;
use crate::ports::outbound::ClientRegistry;
use chrono::NaiveDateTime;
use common::error::Error;
use common::ports::outbound::{Clock, FileSystem};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
#[cfg(test)]
use std::sync::Mutex;

pub const CONTROLLER_FILE_NAME: &str = ".controller.json";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ControllerClaim {
    cache_name: String,
    claimed_at: NaiveDateTime,
}

pub struct FileClientRegistry {
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
    path: PathBuf,
}

impl FileClientRegistry {
    pub fn new(fs: Arc<dyn FileSystem>, clock: Arc<dyn Clock>, path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            clock,
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ClientRegistry for FileClientRegistry {
    fn controller(&self) -> Result<Option<CacheName>, Error> {
        if !self.fs.exists(&self.path) {
            return Ok(None);
        }
        let s = self.fs.read_to_string(&self.path)?;
        // 壊れた記録は「制御されていない」として扱う（次の claim で上書きされる）
        let Ok(claim) = serde_json::from_str::<ControllerClaim>(&s) else {
            return Ok(None);
        };
        Ok(CacheName::new(claim.cache_name).ok())
    }

    fn claim(&self, name: &CacheName) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        let claim = ControllerClaim {
            cache_name: name.to_string(),
            claimed_at: self.clock.now_local(),
        };
        let json = serde_json::to_string_pretty(&claim)?;
        self.fs.write_atomic(&self.path, json.as_bytes())
    }
}

/// メモリ上の ClientRegistry（テスト用）
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryClientRegistry {
    current: Mutex<Option<CacheName>>,
}

#[cfg(test)]
impl ClientRegistry for MemoryClientRegistry {
    fn controller(&self) -> Result<Option<CacheName>, Error> {
        self.current
            .lock()
            .map(|c| c.clone())
            .map_err(|_| Error::io_msg("client registry lock poisoned"))
    }

    fn claim(&self, name: &CacheName) -> Result<(), Error> {
        let mut current = self
            .current
            .lock()
            .map_err(|_| Error::io_msg("client registry lock poisoned"))?;
        *current = Some(name.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use common::adapter::{FixedClock, MemoryFileSystem};

    fn registry(fs: Arc<MemoryFileSystem>) -> FileClientRegistry {
        let at = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 15, 30)
            .unwrap();
        FileClientRegistry::new(fs, Arc::new(FixedClock::new(at)), "/home/controller.json")
    }

    #[test]
    fn test_claim_is_visible_to_new_instance() {
        let fs = Arc::new(MemoryFileSystem::new());
        assert_eq!(registry(Arc::clone(&fs)).controller().unwrap(), None);

        let v2 = CacheName::new("shell-v2").unwrap();
        registry(Arc::clone(&fs)).claim(&v2).unwrap();
        assert_eq!(registry(Arc::clone(&fs)).controller().unwrap(), Some(v2));

        let stored = fs.contents(Path::new("/home/controller.json")).unwrap();
        assert!(stored.contains("\"cacheName\": \"shell-v2\""));
        assert!(stored.contains("\"claimedAt\": \"2024-06-01T09:15:30\""));
    }

    #[test]
    fn test_garbage_record_means_uncontrolled() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.insert("/home/controller.json", "garbage");
        assert_eq!(registry(fs).controller().unwrap(), None);
    }
}
