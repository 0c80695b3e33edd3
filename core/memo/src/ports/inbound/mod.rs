//! Inbound ポート: ドライバ（CLI）がアプリを呼び出すインターフェース

use crate::cli::Config;
use common::error::Error;

/// memo アプリケーションを実行する Inbound ポート
///
/// main はこの trait を実装した Runner の run を呼び出す。戻り値は終了コード。
pub trait UseCaseRunner {
    fn run(&mut self, config: Config) -> Result<i32, Error>;
}
