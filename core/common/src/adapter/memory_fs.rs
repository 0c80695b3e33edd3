//! メモリ上の FileSystem 実装（テスト用）
//!
//! 書き込み失敗を注入できる。失敗時は内容を一切変更しない。

use crate::error::Error;
use crate::ports::outbound::{FileMetadata, FileSystem};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

type Files = Arc<Mutex<BTreeMap<PathBuf, Vec<u8>>>>;

/// パス → バイト列のマップで表すファイルシステム
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Files,
    dirs: Mutex<BTreeSet<PathBuf>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// ファイルを直接置く（テストの前提条件用）。親ディレクトリも作られたものとする。
    pub fn insert(&self, path: impl Into<PathBuf>, contents: &str) {
        self.insert_bytes(path, contents.as_bytes());
    }

    /// UTF-8 でない内容も置ける版
    pub fn insert_bytes(&self, path: impl Into<PathBuf>, contents: &[u8]) {
        let path = path.into();
        if let (Some(parent), Ok(mut dirs)) = (path.parent(), self.dirs.lock()) {
            for ancestor in parent.ancestors() {
                if !ancestor.as_os_str().is_empty() {
                    dirs.insert(ancestor.to_path_buf());
                }
            }
        }
        if let Ok(mut files) = self.files.lock() {
            files.insert(path, contents.to_vec());
        }
    }

    /// 現在のバイト列
    pub fn bytes(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().ok()?.get(path).cloned()
    }

    /// 現在の内容（UTF-8 として）
    pub fn contents(&self, path: &Path) -> Option<String> {
        let files = self.files.lock().ok()?;
        files
            .get(path)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// 以降の書き込み系操作を失敗させる（権限剥奪・ディスクエラーの模擬）
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_write(&self, path: &Path) -> Result<(), Error> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::io_msg(format!(
                "Failed to write '{}': permission denied",
                path.display()
            )));
        }
        Ok(())
    }

    fn lock_files(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<PathBuf, Vec<u8>>>, Error> {
        self.files
            .lock()
            .map_err(|_| Error::io_msg("memory fs lock poisoned"))
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, Error> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::io_msg(format!(
                "Failed to read '{}': permission denied",
                path.display()
            )));
        }
        let files = self.lock_files()?;
        let bytes = files.get(path).ok_or_else(|| {
            Error::io_msg(format!("Failed to read '{}': not found", path.display()))
        })?;
        String::from_utf8(bytes.clone()).map_err(|e| {
            Error::io_msg(format!("Failed to read '{}': {}", path.display(), e))
        })
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, Error> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::io_msg(format!(
                "Failed to read '{}': permission denied",
                path.display()
            )));
        }
        self.lock_files()?.get(path).cloned().ok_or_else(|| {
            Error::io_msg(format!("Failed to read '{}': not found", path.display()))
        })
    }

    fn metadata(&self, path: &Path) -> Result<FileMetadata, Error> {
        if let Some(bytes) = self.lock_files()?.get(path) {
            return Ok(FileMetadata::new(bytes.len() as u64, true, false));
        }
        let is_dir = self
            .dirs
            .lock()
            .map(|d| d.contains(path))
            .unwrap_or(false);
        if is_dir {
            return Ok(FileMetadata::new(0, false, true));
        }
        Err(Error::io_msg(format!(
            "Failed to get metadata for '{}': not found",
            path.display()
        )))
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), Error> {
        self.check_write(path)?;
        if let Ok(mut dirs) = self.dirs.lock() {
            for ancestor in path.ancestors() {
                if !ancestor.as_os_str().is_empty() {
                    dirs.insert(ancestor.to_path_buf());
                }
            }
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<(), Error> {
        self.check_write(path)?;
        self.lock_files()?.remove(path).map(|_| ()).ok_or_else(|| {
            Error::io_msg(format!("Failed to remove file '{}': not found", path.display()))
        })
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, Error> {
        let files = self.lock_files()?;
        let mut paths: Vec<PathBuf> = files
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();
        if let Ok(dirs) = self.dirs.lock() {
            paths.extend(dirs.iter().filter(|d| d.parent() == Some(path)).cloned());
        }
        paths.sort();
        Ok(paths)
    }

    fn open_append(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>, Error> {
        self.check_write(path)?;
        self.lock_files()?.entry(path.to_path_buf()).or_default();
        Ok(Box::new(MemoryAppendWriter {
            files: Arc::clone(&self.files),
            path: path.to_path_buf(),
        }))
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<(), Error> {
        self.check_write(path)?;
        self.lock_files()?.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn touch(&self, path: &Path) -> Result<(), Error> {
        self.check_write(path)?;
        self.lock_files()?.entry(path.to_path_buf()).or_default();
        Ok(())
    }
}

struct MemoryAppendWriter {
    files: Files,
    path: PathBuf,
}

impl std::io::Write for MemoryAppendWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "lock poisoned"))?;
        files.entry(self.path.clone()).or_default().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_failed_write_leaves_contents() {
        let fs = MemoryFileSystem::new();
        let path = PathBuf::from("/memo.md");
        fs.insert(&path, "keep");
        fs.set_fail_writes(true);
        assert!(fs.write_atomic(&path, b"replaced").is_err());
        assert_eq!(fs.contents(&path).as_deref(), Some("keep"));
    }

    #[test]
    fn test_append_writer_and_metadata() {
        let fs = MemoryFileSystem::new();
        let path = PathBuf::from("/log/a.jsonl");
        fs.create_dir_all(Path::new("/log")).unwrap();
        assert!(fs.metadata(Path::new("/log")).unwrap().is_dir());
        let mut w = fs.open_append(&path).unwrap();
        w.write_all(b"line\n").unwrap();
        assert_eq!(fs.metadata(&path).unwrap().len(), 5);
        assert!(!fs.exists(Path::new("/missing")));
    }

    #[test]
    fn test_read_dir_and_remove() {
        let fs = MemoryFileSystem::new();
        fs.insert("/cache/a.json", "{}");
        fs.insert("/cache/b.json", "{}");
        fs.insert("/cache/nested/c.json", "{}");
        let listed = fs.read_dir(Path::new("/cache")).unwrap();
        assert_eq!(
            listed,
            vec![
                PathBuf::from("/cache/a.json"),
                PathBuf::from("/cache/b.json"),
                PathBuf::from("/cache/nested"),
            ]
        );
        fs.remove_file(Path::new("/cache/a.json")).unwrap();
        assert!(fs.remove_file(Path::new("/cache/a.json")).is_err());
        assert_eq!(fs.read_dir(Path::new("/cache")).unwrap().len(), 2);
    }
}
