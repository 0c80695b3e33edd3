//! アプリケーションシェルの固定リソース一覧

use common::error::Error;
use reqwest::Url;

/// インストール時にそのまま保存するリソース（相対パスはスコープ URL から解決する）
pub const DEFAULT_SHELL_RESOURCES: &[&str] = &[
    "/",
    "index.html",
    "style.css",
    "app.js",
    "manifest.json",
    "https://fonts.googleapis.com/icon?family=Material+Icons+Outlined",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellManifest {
    resources: Vec<String>,
}

impl ShellManifest {
    pub fn new(resources: Vec<String>) -> Self {
        Self { resources }
    }

    /// スコープ URL に対して絶対 URL にする。重複は 1 つにまとめる。
    pub fn resolve(&self, scope: &Url) -> Result<Vec<Url>, Error> {
        let mut urls: Vec<Url> = Vec::with_capacity(self.resources.len());
        for resource in &self.resources {
            let url = scope.join(resource).map_err(|e| {
                Error::invalid_argument(format!("Invalid manifest entry '{}': {}", resource, e))
            })?;
            if !urls.contains(&url) {
                urls.push(url);
            }
        }
        Ok(urls)
    }
}

impl Default for ShellManifest {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL_RESOURCES.iter().map(|s| s.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_against_scope() {
        let scope = Url::parse("http://localhost:8080/memo/").unwrap();
        let urls: Vec<String> = ShellManifest::default()
            .resolve(&scope)
            .unwrap()
            .into_iter()
            .map(|u| u.to_string())
            .collect();
        assert_eq!(
            urls,
            vec![
                "http://localhost:8080/",
                "http://localhost:8080/memo/index.html",
                "http://localhost:8080/memo/style.css",
                "http://localhost:8080/memo/app.js",
                "http://localhost:8080/memo/manifest.json",
                "https://fonts.googleapis.com/icon?family=Material+Icons+Outlined",
            ]
        );
    }

    #[test]
    fn test_resolve_deduplicates() {
        let scope = Url::parse("http://localhost:8080/").unwrap();
        let manifest = ShellManifest::new(vec!["/".into(), "http://localhost:8080/".into()]);
        assert_eq!(manifest.resolve(&scope).unwrap().len(), 1);
    }
}
