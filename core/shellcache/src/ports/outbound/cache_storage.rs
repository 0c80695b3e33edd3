//! スナップショット保存の Outbound ポート
//!
//! 名前付きスナップショット（照合キー → 応答）の集合。

use crate::domain::{CacheName, CachedEntry, ShellResponse};
use common::error::Error;

pub trait CacheStorage: Send + Sync {
    /// 存在する全スナップショット名
    fn keys(&self) -> Result<Vec<String>, Error>;

    fn has(&self, name: &CacheName) -> Result<bool, Error>;

    /// スナップショットを丸ごと書く（同名があれば置き換える）。途中の状態は観測されない。
    fn put_all(&self, name: &CacheName, entries: &[CachedEntry]) -> Result<(), Error>;

    fn match_request(&self, name: &CacheName, key: &str) -> Result<Option<ShellResponse>, Error>;

    /// 削除した場合 true
    fn delete(&self, name: &str) -> Result<bool, Error>;
}
