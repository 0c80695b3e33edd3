//! エラーハンドリング
//!
//! 全レイヤーで共通のエラー型。終了コードは sysexits に合わせる。

/// エラー型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// コマンドライン・使い方の誤り（usage を表示する）
    #[error("{0}")]
    Usage(String),
    /// 引数不正（空のメモ、改行を含むメモ等）
    #[error("{0}")]
    InvalidArgument(String),
    /// ファイル I/O 失敗（権限・ディスク・ハンドル無効）
    #[error("{0}")]
    Io(String),
    /// JSON のシリアライズ・パース失敗
    #[error("JSON error: {0}")]
    Json(String),
    /// 環境変数・ホームディレクトリ解決の失敗
    #[error("{0}")]
    Env(String),
    /// ネットワーク取得の失敗
    #[error("{0}")]
    Http(String),
}

impl Error {
    pub fn usage(msg: impl Into<String>) -> Self {
        Error::Usage(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Error::Json(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Error::Env(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        Error::Http(msg.into())
    }

    /// usage を表示すべきエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(_))
    }

    /// プロセス終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(_) | Error::InvalidArgument(_) => 64,
            Error::Json(_) => 65,
            Error::Env(_) => 70,
            Error::Io(_) | Error::Http(_) => 74,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_helpers() {
        let err = Error::invalid_argument("test");
        assert_eq!(err.to_string(), "test");
        assert_eq!(err.exit_code(), 64);
        assert!(!err.is_usage());

        let err = Error::io_msg("disk full");
        assert_eq!(err.exit_code(), 74);

        let err = Error::usage("bad flag");
        assert!(err.is_usage());
        assert_eq!(err.exit_code(), 64);
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: Error = parse.unwrap_err().into();
        assert!(err.to_string().starts_with("JSON error:"));
        assert_eq!(err.exit_code(), 65);
    }
}
