//! memo コマンドの enum（Command Pattern）
//!
//! UI 層からの操作（ファイル選択・作成・追加・一覧）を enum で明示する。

/// memo の実行モード
#[derive(Debug, Clone, PartialEq)]
pub enum MemoCommand {
    /// ヘルプ表示
    Help,
    /// 既存ファイルを選んで一覧表示
    Open,
    /// 保存先を選んで新規ファイルにする
    New,
    /// 選んだファイルの一覧を再読み込みして表示
    List,
    /// メモを 1 件追記し、再読み込みして表示
    Add { text: String },
    /// 最後に使ったファイル名を表示（ファイルは開かない）
    Last,
}
