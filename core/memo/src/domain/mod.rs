//! memo 固有のドメイン型（型と不変条件）

pub mod backing_file;
pub mod command;
pub mod memo_collection;
pub mod memo_record;

pub use backing_file::{BackingFile, ACCEPTED_EXTENSIONS, SUGGESTED_FILE_NAME};
pub use command::MemoCommand;
pub use memo_collection::MemoCollection;
pub use memo_record::{decode_line, encode_record, LineOutcome, MemoRecord, MemoText};
