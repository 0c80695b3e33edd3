//! shellcache コマンドの enum（ライフサイクルイベントの発火）

use reqwest::Url;

#[derive(Debug, Clone, PartialEq)]
pub enum CacheCommand {
    Help,
    /// マニフェストを取得してスナップショットを作る
    Install,
    /// 古いスナップショットを消して制御を引き継ぐ
    Activate,
    /// install のあと、待たずに activate する
    Update,
    /// 1 件の要求を横取りして処理する
    Fetch { url: Url },
    Status,
}
