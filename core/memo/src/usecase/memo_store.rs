//! メモストア（UI 層から呼ばれる操作の入口）
//!
//! アクティブなファイルとメモ一覧はこのインスタンスのフィールドとして持つ。
//! ファイル切り替え時は丸ごと置き換え、各操作は失敗時に操作前の状態を保つ。

use crate::domain::{encode_record, BackingFile, MemoCollection, MemoRecord, MemoText};
use crate::ports::outbound::{FilePicker, PreferenceStore};
use crate::usecase::append::append_line;
use crate::usecase::codec::decode_with_log;
use common::error::Error;
use common::ports::outbound::{Clock, FileSystem, Log, LogLevel, LogRecord};
use std::sync::Arc;

pub struct MemoStoreDeps {
    pub fs: Arc<dyn FileSystem>,
    pub picker: Arc<dyn FilePicker>,
    pub clock: Arc<dyn Clock>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub log: Arc<dyn Log>,
}

/// ファイル選択・作成の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelection {
    /// 選ばれたファイルの表示名
    Selected(String),
    /// ユーザーがキャンセルした（状態は変わらない）
    Cancelled,
}

/// 再読み込みの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// ファイル未選択（一覧は空になる）
    NoFileSelected,
    Loaded { count: usize, skipped: usize },
}

pub struct MemoStore {
    deps: MemoStoreDeps,
    active: Option<BackingFile>,
    memos: MemoCollection,
}

impl MemoStore {
    pub fn new(deps: MemoStoreDeps) -> Self {
        Self {
            deps,
            active: None,
            memos: MemoCollection::empty(),
        }
    }

    #[cfg(test)]
    pub fn active_file(&self) -> Option<&BackingFile> {
        self.active.as_ref()
    }

    /// ファイル上の順序
    #[cfg(test)]
    pub fn memos(&self) -> &MemoCollection {
        &self.memos
    }

    /// 表示用（新しい順）
    pub fn display_memos(&self) -> Vec<&MemoRecord> {
        self.memos.display_order()
    }

    /// 最後に使ったファイルの表示名（ラベル用。ファイルは開かない）
    pub fn last_file_name(&self) -> Option<String> {
        match self.deps.preferences.last_file_name() {
            Ok(name) => name,
            Err(e) => {
                self.log(LogLevel::Warn, "failed to read preferences", "preferences", Some(&e));
                None
            }
        }
    }

    /// 既存ファイルを選び、読み込んで一覧を置き換える。
    /// 読み込みに失敗したら以前のファイル・一覧のまま。
    pub fn select_existing_file(&mut self) -> Result<FileSelection, Error> {
        let Some(file) = self.deps.picker.pick_existing()? else {
            self.log(LogLevel::Info, "file selection aborted by user", "lifecycle", None);
            return Ok(FileSelection::Cancelled);
        };
        let report = self.read_file(&file)?;
        let name = file.display_name();
        self.active = Some(file);
        self.memos = report.memos;
        self.remember(&name);
        let _ = self.deps.log.log(
            &LogRecord::new(LogLevel::Info, "file selected")
                .layer("usecase")
                .kind("lifecycle")
                .field("file", name.clone())
                .field("count", self.memos.len()),
        );
        Ok(FileSelection::Selected(name))
    }

    /// 保存先を選び、そのファイルをアクティブにする。既存の内容は読まず、一覧は空にする。
    pub fn create_new_file(&mut self) -> Result<FileSelection, Error> {
        let Some(file) = self.deps.picker.pick_save_location()? else {
            self.log(LogLevel::Info, "file creation aborted by user", "lifecycle", None);
            return Ok(FileSelection::Cancelled);
        };
        let name = file.display_name();
        self.active = Some(file);
        self.memos = MemoCollection::empty();
        self.remember(&name);
        let _ = self.deps.log.log(
            &LogRecord::new(LogLevel::Info, "file created/selected for saving")
                .layer("usecase")
                .kind("lifecycle")
                .field("file", name.clone()),
        );
        Ok(FileSelection::Selected(name))
    }

    /// アクティブなファイルを全て読み直す。失敗時は以前の一覧を保つ。
    pub fn reload(&mut self) -> Result<ReloadOutcome, Error> {
        let Some(file) = self.active.clone() else {
            self.memos = MemoCollection::empty();
            return Ok(ReloadOutcome::NoFileSelected);
        };
        let report = self.read_file(&file)?;
        let outcome = ReloadOutcome::Loaded {
            count: report.memos.len(),
            skipped: report.skipped,
        };
        self.memos = report.memos;
        Ok(outcome)
    }

    /// メモを 1 件追記し、ファイルから読み直す。
    /// 追記に失敗したら一覧は変えない（楽観的に追加しない）。
    pub fn add_memo(&mut self, text: &str) -> Result<MemoRecord, Error> {
        let Some(file) = self.active.clone() else {
            return Err(Error::invalid_argument(
                "No file selected. Select or create a memo file first.",
            ));
        };
        let text = MemoText::new(text)?;
        let record = MemoRecord::new(self.deps.clock.now_local(), text);
        let line = encode_record(&record);
        append_line(self.deps.fs.as_ref(), self.deps.log.as_ref(), &file, &line)
            .map_err(|e| Error::io_msg(format!("Failed to save memo: {}", e)))?;
        self.reload().map_err(|e| {
            Error::io_msg(format!("Memo saved, but reloading the file failed: {}", e))
        })?;
        Ok(record)
    }

    fn read_file(&self, file: &BackingFile) -> Result<crate::usecase::codec::DecodeReport, Error> {
        let bytes = self.deps.fs.read(file.path()).map_err(|e| {
            self.log(LogLevel::Error, "failed to read memo file", "error", Some(&e));
            e
        })?;
        // 不正な UTF-8 は置換文字になり、その行はレコードとして一致しないだけ
        let content = String::from_utf8_lossy(&bytes);
        let report = decode_with_log(&content, self.deps.log.as_ref());
        let _ = self.deps.log.log(
            &LogRecord::new(LogLevel::Info, "memo file read")
                .layer("usecase")
                .kind("read")
                .field("file", file.display_name())
                .field("count", report.memos.len())
                .field("skipped", report.skipped),
        );
        Ok(report)
    }

    fn remember(&self, name: &str) {
        if let Err(e) = self.deps.preferences.set_last_file_name(name) {
            self.log(LogLevel::Warn, "failed to save preferences", "preferences", Some(&e));
        }
    }

    fn log(&self, level: LogLevel, message: &str, kind: &str, err: Option<&Error>) {
        let mut rec = LogRecord::new(level, message).layer("usecase").kind(kind);
        if let Some(e) = err {
            rec = rec.field("error", e.to_string());
        }
        let _ = self.deps.log.log(&rec);
    }
}
