//! 環境変数解決 Outbound ポート
//!
//! usecase / wiring はこの trait 経由でのみ環境変数にアクセスする。

use crate::domain::HomeDir;
use crate::error::Error;

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdEnvResolver` やテスト用のモックなど。
pub trait EnvResolver: Send + Sync {
    /// ホームディレクトリを環境変数から解決する
    ///
    /// 優先順位:
    /// 1. MEMO_HOME（設定されていれば）
    /// 2. $XDG_CONFIG_HOME/handy-memo（XDG_CONFIG_HOME が設定されていれば）
    /// 3. $HOME/.config/handy-memo
    fn resolve_home_dir(&self) -> Result<HomeDir, Error>;

    /// 空文字は未設定として扱う
    fn var(&self, name: &str) -> Option<String>;
}
