//! Outbound ポート: アプリが外界（ファイル選択・設定保存）を使うための trait

pub mod file_picker;
pub mod preference_store;

pub use file_picker::FilePicker;
pub use preference_store::{PreferenceStore, LAST_FILE_NAME_KEY};
