//! 開いているアプリインスタンスの制御を記録する Outbound ポート
//!
//! claim すると、以降に起動するインスタンスは再読み込み無しで新しい版に制御される。

use crate::domain::CacheName;
use common::error::Error;

pub trait ClientRegistry: Send + Sync {
    /// 現在制御している版
    fn controller(&self) -> Result<Option<CacheName>, Error>;

    fn claim(&self, name: &CacheName) -> Result<(), Error>;
}
