//! ホーム配下のファイル配置
//!
//! EnvResolver::resolve_home_dir() の結果から、設定・ログ・キャッシュのパスを計算する。

use std::path::PathBuf;

/// 解決済みのホームディレクトリと、その配下の固定パス
#[derive(Debug, Clone)]
pub struct Dirs {
    home: PathBuf,
}

impl Dirs {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// 永続設定（最後に使ったファイル名）
    pub fn preferences_file(&self) -> PathBuf {
        self.home.join("preferences.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.home.join("log")
    }

    /// CacheSnapshot の格納ディレクトリ
    pub fn cache_dir(&self) -> PathBuf {
        self.home.join("cache")
    }
}
