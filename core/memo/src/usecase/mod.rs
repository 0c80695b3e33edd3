//! ユースケース層（ポート経由でのみ I/O を行う）

pub mod append;
pub mod codec;
pub mod memo_store;
