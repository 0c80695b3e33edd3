//! shellcache 固有のドメイン型（型と不変条件）

pub mod cache_name;
pub mod command;
pub mod manifest;
pub mod request;
pub mod state;

pub use cache_name::CacheName;
#[cfg(test)]
pub use cache_name::DEFAULT_CACHE_NAME;
pub use command::CacheCommand;
pub use manifest::ShellManifest;
pub use request::{CachedEntry, ShellRequest, ShellResponse};
pub use state::ControllerState;
