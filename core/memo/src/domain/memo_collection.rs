//! ファイル全体から再構築されるメモの並び
//!
//! 保持順は挿入順（追記なので古い順）。新しい順は表示用の派生ビューで、保持しない。

use super::memo_record::MemoRecord;

/// 読み込み 1 回分のメモ一覧
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoCollection {
    records: Vec<MemoRecord>,
}

impl MemoCollection {
    pub fn new(records: Vec<MemoRecord>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// ファイル上の順序
    #[cfg(test)]
    pub fn records(&self) -> &[MemoRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 表示用: タイムスタンプの新しい順。同時刻はファイル上の順序を保つ。
    pub fn display_order(&self) -> Vec<&MemoRecord> {
        let mut view: Vec<&MemoRecord> = self.records.iter().collect();
        view.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::codec::decode_with_log;
    use chrono::{NaiveDate, Timelike};
    use common::adapter::NoopLog;

    fn collection(content: &str) -> MemoCollection {
        decode_with_log(content, &NoopLog).memos
    }

    #[test]
    fn test_display_order_newest_first() {
        let memos = collection(
            "- 2024-06-01T09:00:00 nine\n- 2024-06-01T14:00:00 fourteen\n- 2024-06-01T11:00:00 eleven",
        );
        let hours: Vec<u32> = memos.display_order().iter().map(|r| r.timestamp.hour()).collect();
        assert_eq!(hours, vec![14, 11, 9]);
        // 保持順は変わらない
        assert_eq!(memos.records()[0].text.as_str(), "nine");
    }

    #[test]
    fn test_display_order_ties_keep_file_order() {
        let memos = collection("- 2024-06-01T09:00:00 first\n- 2024-06-01T09:00:00 second");
        let texts: Vec<&str> = memos.display_order().iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(
            memos.records()[0].timestamp,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_empty_collection() {
        assert!(MemoCollection::empty().is_empty());
        assert!(MemoCollection::empty().display_order().is_empty());
    }
}
