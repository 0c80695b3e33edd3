//! 時刻 Outbound ポート
//!
//! usecase はこの trait 経由で「現在時刻」を取得し、メモのタイムスタンプに使う。

use chrono::NaiveDateTime;

/// 時刻取得の抽象
///
/// 実装は `common::adapter::StdClock` やテスト用の固定時刻など。
pub trait Clock: Send + Sync {
    /// ローカル時計の現在時刻（秒精度、タイムゾーンなし）
    fn now_local(&self) -> NaiveDateTime;
}
