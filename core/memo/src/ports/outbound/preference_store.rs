//! 永続設定の Outbound ポート
//!
//! 保存するのは最後に使ったファイルの表示名のみ。ファイルへのアクセス権は保存しない。

use common::error::Error;

/// 固定キー
pub const LAST_FILE_NAME_KEY: &str = "lastFileName";

pub trait PreferenceStore: Send + Sync {
    fn last_file_name(&self) -> Result<Option<String>, Error>;
    fn set_last_file_name(&self, name: &str) -> Result<(), Error>;
}
