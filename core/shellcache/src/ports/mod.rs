//! Ports & Adapters のポート定義
//!
//! - inbound: main の Runner が実装するユースケースの入口
//! - outbound: コントローラが外界（スナップショット保存・ネットワーク・クライアント）を使うための trait

pub mod inbound;
pub mod outbound;
