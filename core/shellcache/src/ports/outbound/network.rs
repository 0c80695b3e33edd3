//! ネットワーク取得の Outbound ポート

use crate::domain::{ShellRequest, ShellResponse};
use common::error::Error;

pub trait Network: Send + Sync {
    /// HTTP の応答が返れば Ok（4xx/5xx も含む）。接続失敗・DNS 失敗などは Err。
    fn fetch(&self, request: &ShellRequest) -> Result<ShellResponse, Error>;
}
