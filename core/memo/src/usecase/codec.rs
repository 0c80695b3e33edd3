//! ファイル内容の復号（読み飛ばした行をログに残す）
//!
//! 行単位の判定は domain::decode_line。全体としての失敗はなく、一致しない行は数えて捨てる。

use crate::domain::{decode_line, LineOutcome, MemoCollection};
use common::ports::outbound::{Log, LogLevel, LogRecord};

/// 復号結果と、読み飛ばした行数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeReport {
    pub memos: MemoCollection,
    pub skipped: usize,
}

pub fn decode_with_log(content: &str, log: &dyn Log) -> DecodeReport {
    let mut records = Vec::new();
    let mut skipped = 0;
    for (idx, line) in content.split('\n').enumerate() {
        let line_no = idx + 1;
        match decode_line(line) {
            LineOutcome::Record(r) => records.push(r),
            LineOutcome::Blank => {}
            LineOutcome::NoMatch => {
                skipped += 1;
                let _ = log.log(
                    &LogRecord::new(LogLevel::Debug, "skipping line (does not match format)")
                        .layer("usecase")
                        .kind("codec")
                        .field("line_no", line_no),
                );
            }
            LineOutcome::InvalidTimestamp(ts) => {
                skipped += 1;
                let _ = log.log(
                    &LogRecord::new(LogLevel::Warn, "invalid date in memo line")
                        .layer("usecase")
                        .kind("codec")
                        .field("line_no", line_no)
                        .field("timestamp", ts),
                );
            }
        }
    }
    DecodeReport {
        memos: MemoCollection::new(records),
        skipped,
    }
}
