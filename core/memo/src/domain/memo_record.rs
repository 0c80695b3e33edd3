//! メモ 1 件と、その 1 行表現の相互変換
//!
//! 行の形式: `- YYYY-MM-DDTHH:MM:SS <text>`。タイムスタンプはローカル時計の値で、
//! タイムゾーンは持たない。

use chrono::{NaiveDateTime, Timelike};
use common::error::Error;
use regex::Regex;
use std::sync::OnceLock;

/// 行頭マーカー
pub const RECORD_MARKER: &str = "-";

/// 書き出し・読み込み共通のタイムスタンプ形式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// マーカーの後の空白は 0 or 1 個、タイムスタンプの後の空白は必須
const RECORD_PATTERN: &str = r"^- ?(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}) (.*)$";

fn record_pattern() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(RECORD_PATTERN).ok()).as_ref()
}

/// メモ本文（空でなく、改行を含まない 1 行）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoText(String);

impl MemoText {
    /// ユーザー入力から作る。前後の空白は除去する。
    ///
    /// 改行を含む入力は拒否する（1 レコード = 1 行の不変条件を守るため、黙って分割も結合もしない）。
    pub fn new(raw: &str) -> Result<Self, Error> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_argument("memo text is empty"));
        }
        if trimmed.contains(['\n', '\r']) {
            return Err(Error::invalid_argument(
                "memo text must be a single line (line breaks are not allowed)",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// ファイルから読んだ本文。行分割済みなので改行は含まない。
    fn from_line(text: &str) -> Option<Self> {
        if text.is_empty() {
            None
        } else {
            Some(Self(text.to_string()))
        }
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for MemoText {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for MemoText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// タイムスタンプ付きのメモ 1 件。生成後は変更しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoRecord {
    pub timestamp: NaiveDateTime,
    pub text: MemoText,
}

impl MemoRecord {
    pub fn new(timestamp: NaiveDateTime, text: MemoText) -> Self {
        Self { timestamp, text }
    }
}

/// `YYYY-MM-DDTHH:MM:SS`（ゼロ埋め・秒精度）
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// 暦として正しくない値（13 月、40 日など）は None。秒 60（うるう秒）も受け付けない。
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()
        .filter(|ts| ts.nanosecond() < 1_000_000_000)
}

/// 1 行に符号化する（末尾改行なし）
pub fn encode_record(record: &MemoRecord) -> String {
    format!(
        "{} {} {}",
        RECORD_MARKER,
        format_timestamp(&record.timestamp),
        record.text
    )
}

/// 1 行の解析結果。Record 以外は読み飛ばす対象で、エラーではない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Record(MemoRecord),
    /// 空行・空白のみの行
    Blank,
    /// マーカー・タイムスタンプの形に一致しない
    NoMatch,
    /// 形は一致したが暦として不正なタイムスタンプ
    InvalidTimestamp(String),
}

/// 1 行を復号する
pub fn decode_line(line: &str) -> LineOutcome {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineOutcome::Blank;
    }
    let Some(caps) = record_pattern().and_then(|re| re.captures(trimmed)) else {
        return LineOutcome::NoMatch;
    };
    let (Some(ts), Some(text)) = (caps.get(1), caps.get(2)) else {
        return LineOutcome::NoMatch;
    };
    let Some(timestamp) = parse_timestamp(ts.as_str()) else {
        return LineOutcome::InvalidTimestamp(ts.as_str().to_string());
    };
    match MemoText::from_line(text.as_str().trim_end()) {
        Some(text) => LineOutcome::Record(MemoRecord::new(timestamp, text)),
        None => LineOutcome::NoMatch,
    }
}
