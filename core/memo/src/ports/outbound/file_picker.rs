//! ファイル選択の Outbound ポート
//!
//! ユーザーにファイルを選ばせる。キャンセルはエラーではなく `Ok(None)`。

use crate::domain::BackingFile;
use common::error::Error;

/// ファイルを選ばせる能力
pub trait FilePicker: Send + Sync {
    /// 既存ファイルを選ぶ
    fn pick_existing(&self) -> Result<Option<BackingFile>, Error>;

    /// 保存先を選ぶ。返すファイルは存在する（無ければ空で作られる）。
    fn pick_save_location(&self) -> Result<Option<BackingFile>, Error>;
}
