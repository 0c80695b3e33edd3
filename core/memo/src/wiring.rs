//! 配線: 標準アダプタで MemoStore を組み立てる

use std::path::PathBuf;
use std::sync::Arc;

use common::adapter::{
    FileJsonLog, NoopLog, StdClock, StdEnvResolver, StdFileSystem, StderrLog, TeeLog,
};
use common::ports::outbound::{EnvResolver, FileSystem, Log};

use crate::adapter::{
    CancelledFilePicker, JsonPreferenceStore, MemoryPreferenceStore, PathFilePicker,
    StdinFilePicker,
};
use crate::ports::outbound::{FilePicker, PreferenceStore};
use crate::usecase::memo_store::{MemoStore, MemoStoreDeps};

const LOG_FILE_NAME: &str = "memo.jsonl";

/// 配線済みのアプリ（main の Runner が保持する）
pub struct App {
    pub store: MemoStore,
    pub logger: Arc<dyn Log>,
}

/// ファイル選択の実装を決める: -f > 非対話（常にキャンセル）> stdin 問い合わせ
fn picker_for(fs: &Arc<dyn FileSystem>, file: Option<PathBuf>, non_interactive: bool) -> Arc<dyn FilePicker> {
    match file {
        Some(path) => Arc::new(PathFilePicker::new(Arc::clone(fs), path)),
        None if non_interactive => Arc::new(CancelledFilePicker),
        None => Arc::new(StdinFilePicker::new(Arc::clone(fs))),
    }
}

/// 配線: 標準アダプタで App を組み立てる。
/// ホームディレクトリが解決できないときは、ログ・設定を永続化せずに動く。
pub fn wire_memo(file: Option<PathBuf>, non_interactive: bool, verbose: bool) -> App {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let env_resolver = StdEnvResolver;

    let (file_log, preferences): (Arc<dyn Log>, Arc<dyn PreferenceStore>) =
        match env_resolver.resolve_home_dir() {
            Ok(home) => {
                let dirs = home.dirs();
                (
                    Arc::new(FileJsonLog::new(Arc::clone(&fs), dirs.logs_dir().join(LOG_FILE_NAME))),
                    Arc::new(JsonPreferenceStore::new(Arc::clone(&fs), dirs.preferences_file())),
                )
            }
            Err(_) => (Arc::new(NoopLog), Arc::new(MemoryPreferenceStore::default())),
        };
    let logger: Arc<dyn Log> = if verbose {
        Arc::new(TeeLog::new(vec![file_log, Arc::new(StderrLog::default())]))
    } else {
        file_log
    };

    let store = MemoStore::new(MemoStoreDeps {
        fs: Arc::clone(&fs),
        picker: picker_for(&fs, file, non_interactive),
        clock: Arc::new(StdClock),
        preferences,
        log: Arc::clone(&logger),
    });
    App { store, logger }
}
