//! handy-memo 共通ライブラリ
//!
//! `memo` と `shellcache` コマンドで共有される機能を提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（Newtype）
pub mod domain;

/// Outbound ポート（trait）
pub mod ports;

/// 標準アダプター（std / chrono / tempfile 実装）
pub mod adapter;
