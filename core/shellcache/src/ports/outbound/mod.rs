//! Outbound ポート: コントローラが外界を使うための trait

pub mod cache_storage;
pub mod client_registry;
pub mod network;

pub use cache_storage::CacheStorage;
pub use client_registry::ClientRegistry;
pub use network::Network;
