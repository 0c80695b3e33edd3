//! Outbound ポートの実装

pub mod client_registry;
pub mod dir_cache_storage;
#[cfg(test)]
pub mod memory_cache_storage;
pub mod reqwest_network;

#[cfg(test)]
pub use client_registry::MemoryClientRegistry;
pub use client_registry::{FileClientRegistry, CONTROLLER_FILE_NAME};
pub use dir_cache_storage::DirCacheStorage;
#[cfg(test)]
pub use memory_cache_storage::MemoryCacheStorage;
pub use reqwest_network::ReqwestNetwork;
