//! キャッシュのバージョン識別子
//!
//! スナップショット名そのもの。これを変えて入れ直すことが古いシェルを消す唯一の手段。

use common::error::Error;

pub const DEFAULT_CACHE_NAME: &str = "handy-memo-cache-v1";

/// スナップショット名（英数字と `.` `_` `-` のみ。ファイル名にそのまま使う）
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheName(String);

impl CacheName {
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(Error::invalid_argument(format!(
                "Invalid cache name '{}': use letters, digits, '.', '_' or '-'",
                name
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CacheName {
    fn default() -> Self {
        Self(DEFAULT_CACHE_NAME.to_string())
    }
}

impl std::fmt::Display for CacheName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_name_validation() {
        assert_eq!(CacheName::new("handy-memo-cache-v2").unwrap().as_str(), "handy-memo-cache-v2");
        assert_eq!(CacheName::default().as_str(), DEFAULT_CACHE_NAME);
        assert!(CacheName::new("").is_err());
        assert!(CacheName::new("../escape").is_err());
        assert!(CacheName::new(".hidden").is_err());
        assert!(CacheName::new("a b").is_err());
    }
}
