//! 1 行追記プロトコル
//!
//! 既存の内容を壊さず、末尾に改行が無いファイルでも新しいレコードが独立した行になるように書く。
//! 書き込みは「既存バイト列 + 必要なら改行 + レコード」を一時ファイルに書いて rename で置き換える。
//! 途中で失敗しても、観測されるのは旧内容か新内容のどちらかだけ。

use crate::domain::BackingFile;
use common::error::Error;
use common::ports::outbound::{FileSystem, Log, LogLevel, LogRecord};

/// 追記結果（ログ・テスト用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendReport {
    /// レコード（先頭改行を含む）を書き始めたバイト位置 = 追記前のファイルサイズ
    pub offset: u64,
    /// 先頭に改行を補ったか
    pub leading_newline: bool,
    pub bytes_written: usize,
}

/// 追記後のファイル内容を組み立てる。既存のバイト列は UTF-8 でなくてもそのまま残す。
pub fn appended_contents(existing: &[u8], line: &str) -> (Vec<u8>, bool) {
    let leading_newline = existing.last().map(|&b| b != b'\n').unwrap_or(false);
    let mut out = Vec::with_capacity(existing.len() + line.len() + 1);
    out.extend_from_slice(existing);
    if leading_newline {
        out.push(b'\n');
    }
    out.extend_from_slice(line.as_bytes());
    (out, leading_newline)
}

/// `line`（改行を含まない符号化済みレコード）をファイル末尾に追記する。
/// 失敗時はファイル内容を変更しない。
pub fn append_line(
    fs: &dyn FileSystem,
    log: &dyn Log,
    file: &BackingFile,
    line: &str,
) -> Result<AppendReport, Error> {
    let result = write_appended(fs, file, line);
    match &result {
        Ok(report) => {
            let _ = log.log(
                &LogRecord::new(LogLevel::Info, "memo appended")
                    .layer("usecase")
                    .kind("append")
                    .field("file", file.display_name())
                    .field("offset", report.offset)
                    .field("bytes", report.bytes_written)
                    .field("leading_newline", report.leading_newline),
            );
        }
        Err(e) => {
            let _ = log.log(
                &LogRecord::new(LogLevel::Error, "append failed")
                    .layer("usecase")
                    .kind("append")
                    .field("file", file.display_name())
                    .field("error", e.to_string()),
            );
        }
    }
    result
}

fn write_appended(fs: &dyn FileSystem, file: &BackingFile, line: &str) -> Result<AppendReport, Error> {
    let path = file.path();
    let meta = fs.metadata(path)?;
    if !meta.is_file() {
        return Err(Error::io_msg(format!("Not a regular file: '{}'", path.display())));
    }
    let existing = if meta.is_empty() {
        Vec::new()
    } else {
        fs.read(path)?
    };
    let (contents, leading_newline) = appended_contents(&existing, line);
    fs.write_atomic(path, &contents)?;
    Ok(AppendReport {
        offset: existing.len() as u64,
        leading_newline,
        bytes_written: contents.len() - existing.len(),
    })
}
