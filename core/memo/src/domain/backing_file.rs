//! メモを保存する唯一のファイル（ユーザーがセッションごとに選ぶ）

use std::path::{Path, PathBuf};

/// 開くときに受け付ける拡張子
pub const ACCEPTED_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

/// 新規作成時、ディレクトリだけ指定されたときのファイル名
pub const SUGGESTED_FILE_NAME: &str = "handy-memo.md";

/// ユーザーが選んだファイルへの参照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackingFile {
    path: PathBuf,
}

impl BackingFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 表示名（ファイル名部分）。永続化されるのはこれだけ。
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    pub fn has_accepted_extension(&self) -> bool {
        self.path
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                ACCEPTED_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }
}
