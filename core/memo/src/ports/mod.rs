//! Ports & Adapters のポート定義
//!
//! - inbound: ドライバ（CLI）がアプリを呼び出すインターフェース
//! - outbound: アプリが外界（ファイル選択・設定保存）を使うための trait

pub mod inbound;
pub mod outbound;
