//! Outbound ポートの実装

pub mod file_picker;
pub mod preference_store;

pub use file_picker::{CancelledFilePicker, PathFilePicker, StdinFilePicker};
pub use preference_store::{JsonPreferenceStore, MemoryPreferenceStore};
