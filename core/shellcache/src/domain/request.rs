//! 横取りするリソース要求と、その応答

use reqwest::Url;

/// 外向きのリソース要求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellRequest {
    pub method: String,
    pub url: Url,
    /// 中間キャッシュを通さずに取得する（インストール時は常に true）
    pub bypass_cache: bool,
}

impl ShellRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: "GET".to_string(),
            url,
            bypass_cache: false,
        }
    }

    pub fn reload(url: Url) -> Self {
        Self {
            bypass_cache: true,
            ..Self::get(url)
        }
    }

    /// スナップショットの照合キー（フラグメントを除いた絶対 URL）
    pub fn cache_key(&self) -> String {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url.to_string()
    }

    /// キャッシュ照合の対象になるのは GET のみ
    pub fn is_cacheable(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

#[cfg(test)]
impl ShellResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.to_string()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl ShellResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// スナップショット内の 1 件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedEntry {
    pub key: String,
    pub response: ShellResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_drops_fragment() {
        let req = ShellRequest::get(Url::parse("http://localhost:8080/index.html#top").unwrap());
        assert_eq!(req.cache_key(), "http://localhost:8080/index.html");
        assert!(!req.bypass_cache);
        assert!(ShellRequest::reload(req.url.clone()).bypass_cache);
    }

    #[test]
    fn test_only_get_is_cacheable() {
        let mut req = ShellRequest::get(Url::parse("http://localhost:8080/").unwrap());
        assert!(req.is_cacheable());
        req.method = "POST".to_string();
        assert!(!req.is_cacheable());
    }

    #[test]
    fn test_response_helpers() {
        let res = ShellResponse::new(200, "body").with_header("Content-Type", "text/css");
        assert!(res.is_success());
        assert_eq!(res.header("content-type"), Some("text/css"));
        assert!(!ShellResponse::new(404, "").is_success());
    }
}
