//! 一覧・ラベルの表示整形（CLI 用）

use crate::domain::MemoRecord;

/// 表示用タイムスタンプ `YYYY/MM/DD HH:MM`
pub fn display_timestamp(record: &MemoRecord) -> String {
    record.timestamp.format("%Y/%m/%d %H:%M").to_string()
}

/// 新しい順に並んだメモを 1 件 1 行で整形する
pub fn render_memos(memos: &[&MemoRecord]) -> String {
    if memos.is_empty() {
        return "No memos.".to_string();
    }
    memos
        .iter()
        .map(|m| format!("{}  {}", display_timestamp(m), m.text))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_file_label(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("File: {}", name),
        None => "No file selected.".to_string(),
    }
}
