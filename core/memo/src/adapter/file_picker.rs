//! ファイル選択の実装（CLI 境界）
//!
//! - PathFilePicker: `-f` で渡されたパスをそのまま選んだものとする（キャンセルしない）
//! - StdinFilePicker: stderr に問い合わせて stdin からパスを読む。空入力はキャンセル
//! - CancelledFilePicker: 非対話で `-f` も無いとき。常にキャンセル

use crate::domain::{BackingFile, ACCEPTED_EXTENSIONS, SUGGESTED_FILE_NAME};
use crate::ports::outbound::FilePicker;
use common::error::Error;
use common::ports::outbound::FileSystem;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 既存ファイルとして開けるか検証する
fn resolve_existing(fs: &dyn FileSystem, path: &Path) -> Result<BackingFile, Error> {
    let meta = fs
        .metadata(path)
        .map_err(|_| Error::io_msg(format!("File not found: '{}'", path.display())))?;
    if !meta.is_file() {
        return Err(Error::io_msg(format!("Not a regular file: '{}'", path.display())));
    }
    let file = BackingFile::new(path);
    if !file.has_accepted_extension() {
        return Err(Error::invalid_argument(format!(
            "Unsupported file type: '{}' (accepted: {})",
            path.display(),
            ACCEPTED_EXTENSIONS
                .iter()
                .map(|e| format!(".{}", e))
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }
    Ok(file)
}

/// 保存先を確定し、無ければ空ファイルを作る（既存内容は残す）
fn resolve_save_location(fs: &dyn FileSystem, path: &Path) -> Result<BackingFile, Error> {
    let mut target: PathBuf = path.to_path_buf();
    if fs.metadata(&target).map(|m| m.is_dir()).unwrap_or(false) {
        target = target.join(SUGGESTED_FILE_NAME);
    } else if target.extension().is_none() {
        target.set_extension("md");
    }
    fs.touch(&target)?;
    Ok(BackingFile::new(target))
}

/// コマンドラインで指定されたパスを使う FilePicker
pub struct PathFilePicker {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl PathFilePicker {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }
}

impl FilePicker for PathFilePicker {
    fn pick_existing(&self) -> Result<Option<BackingFile>, Error> {
        resolve_existing(self.fs.as_ref(), &self.path).map(Some)
    }

    fn pick_save_location(&self) -> Result<Option<BackingFile>, Error> {
        resolve_save_location(self.fs.as_ref(), &self.path).map(Some)
    }
}

/// 対話でパスを尋ねる FilePicker
pub struct StdinFilePicker {
    fs: Arc<dyn FileSystem>,
}

impl StdinFilePicker {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// None: 空入力または EOF（キャンセル）
    fn prompt(&self, label: &str) -> Result<Option<PathBuf>, Error> {
        eprint!("{} (empty to cancel): ", label);
        let _ = io::stderr().flush();
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| Error::io_msg(format!("Failed to read from stdin: {}", e)))?;
        let input = line.trim();
        if input.is_empty() {
            Ok(None)
        } else {
            Ok(Some(PathBuf::from(input)))
        }
    }
}

impl FilePicker for StdinFilePicker {
    fn pick_existing(&self) -> Result<Option<BackingFile>, Error> {
        match self.prompt("Memo file to open")? {
            Some(path) => resolve_existing(self.fs.as_ref(), &path).map(Some),
            None => Ok(None),
        }
    }

    fn pick_save_location(&self) -> Result<Option<BackingFile>, Error> {
        let label = format!("Save new memo file as (default name {})", SUGGESTED_FILE_NAME);
        match self.prompt(&label)? {
            Some(path) => resolve_save_location(self.fs.as_ref(), &path).map(Some),
            None => Ok(None),
        }
    }
}

/// 常にキャンセルする FilePicker（非対話用）
#[derive(Debug, Clone, Default)]
pub struct CancelledFilePicker;

impl FilePicker for CancelledFilePicker {
    fn pick_existing(&self) -> Result<Option<BackingFile>, Error> {
        Ok(None)
    }

    fn pick_save_location(&self) -> Result<Option<BackingFile>, Error> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::adapter::MemoryFileSystem;

    fn memory_fs() -> Arc<MemoryFileSystem> {
        Arc::new(MemoryFileSystem::new())
    }

    #[test]
    fn test_pick_existing_file() {
        let fs = memory_fs();
        fs.insert("/notes/memo.md", "");
        let picker = PathFilePicker::new(fs, "/notes/memo.md");
        let file = picker.pick_existing().unwrap().unwrap();
        assert_eq!(file.path(), Path::new("/notes/memo.md"));
    }

    #[test]
    fn test_pick_existing_missing_file_is_error() {
        let picker = PathFilePicker::new(memory_fs(), "/notes/missing.md");
        let err = picker.pick_existing().unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_pick_existing_rejects_directory_and_foreign_type() {
        let fs = memory_fs();
        fs.create_dir_all(Path::new("/notes")).unwrap();
        fs.insert("/notes/data.json", "{}");
        let dir = PathFilePicker::new(fs.clone(), "/notes");
        assert!(dir.pick_existing().unwrap_err().to_string().contains("Not a regular file"));
        let json = PathFilePicker::new(fs, "/notes/data.json");
        let err = json.pick_existing().unwrap_err();
        assert!(err.to_string().contains(".md, .markdown, .txt"));
    }

    #[test]
    fn test_pick_save_location_creates_without_truncating() {
        let fs = memory_fs();
        fs.insert("/notes/memo.md", "- 2024-06-01T09:15:30 Buy milk");
        let picker = PathFilePicker::new(fs.clone(), "/notes/memo.md");
        picker.pick_save_location().unwrap().unwrap();
        assert_eq!(
            fs.contents(Path::new("/notes/memo.md")).as_deref(),
            Some("- 2024-06-01T09:15:30 Buy milk")
        );

        let picker = PathFilePicker::new(fs.clone(), "/notes/fresh");
        let file = picker.pick_save_location().unwrap().unwrap();
        assert_eq!(file.path(), Path::new("/notes/fresh.md"));
        assert_eq!(fs.contents(Path::new("/notes/fresh.md")).as_deref(), Some(""));
    }

    #[test]
    fn test_pick_save_location_in_directory_uses_suggested_name() {
        let fs = memory_fs();
        fs.create_dir_all(Path::new("/notes")).unwrap();
        let picker = PathFilePicker::new(fs, "/notes");
        let file = picker.pick_save_location().unwrap().unwrap();
        assert_eq!(file.path(), Path::new("/notes/handy-memo.md"));
    }

    #[test]
    fn test_cancelled_picker() {
        assert!(CancelledFilePicker.pick_existing().unwrap().is_none());
        assert!(CancelledFilePicker.pick_save_location().unwrap().is_none());
    }
}
