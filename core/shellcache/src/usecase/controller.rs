//! オフラインキャッシュコントローラ
//!
//! 版（CacheName）ごとのスナップショットを install で作り、activate で古い版を消して
//! 制御を引き継ぎ、fetch ではキャッシュ優先で応答する。
//! 状態はプロセスを跨いで保存先とクライアント登録から復元する（resume）。

use crate::domain::{CacheName, CachedEntry, ControllerState, ShellManifest, ShellRequest, ShellResponse};
use crate::ports::outbound::{CacheStorage, ClientRegistry, Network};
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use reqwest::Url;
use std::sync::Arc;

pub struct CacheControllerDeps {
    pub storage: Arc<dyn CacheStorage>,
    pub network: Arc<dyn Network>,
    pub clients: Arc<dyn ClientRegistry>,
    pub log: Arc<dyn Log>,
}

/// 構築時に注入する設定（版・マニフェスト・スコープ）
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub cache_name: CacheName,
    pub manifest: ShellManifest,
    /// マニフェストの相対エントリを解決する基準 URL
    pub scope: Url,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub cache_name: CacheName,
    /// 保存したリソースの照合キー（マニフェスト順）
    pub stored: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivateReport {
    pub cache_name: CacheName,
    /// 削除した古いスナップショット名
    pub deleted: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchSource {
    Cache,
    Network,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub source: FetchSource,
    pub response: ShellResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub cache_name: CacheName,
    pub state: ControllerState,
    pub snapshots: Vec<String>,
    pub controller: Option<CacheName>,
}

pub struct OfflineCacheController {
    deps: CacheControllerDeps,
    config: ControllerConfig,
    state: ControllerState,
    skip_waiting: bool,
}

impl OfflineCacheController {
    pub fn new(deps: CacheControllerDeps, config: ControllerConfig) -> Self {
        Self {
            deps,
            config,
            state: ControllerState::Uninstalled,
            skip_waiting: false,
        }
    }

    pub fn cache_name(&self) -> &CacheName {
        &self.config.cache_name
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// install 成功後、待たずに activate してよいか
    #[cfg(test)]
    pub fn skip_waiting(&self) -> bool {
        self.skip_waiting
    }

    /// 保存済みの状態から復元する。
    /// 自分の版が制御中でスナップショットもあれば Active、スナップショットだけなら Waiting。
    pub fn resume(&mut self) -> Result<ControllerState, Error> {
        let name = &self.config.cache_name;
        let has_snapshot = self.deps.storage.has(name)?;
        let controlling = self.deps.clients.controller()?.as_ref() == Some(name);
        self.state = match (has_snapshot, controlling) {
            (true, true) => ControllerState::Active,
            (true, false) => ControllerState::Waiting,
            (false, _) => ControllerState::Uninstalled,
        };
        self.log(
            LogLevel::Debug,
            "controller resumed",
            vec![("state", self.state.as_str().into())],
        );
        Ok(self.state)
    }

    /// マニフェストの全リソースをキャッシュを通さずに取得し、全部揃ったときだけ保存する。
    /// 1 件でも失敗すれば何も書かずに Redundant になる。
    pub fn install(&mut self) -> Result<InstallReport, Error> {
        let previous = self.state;
        self.state = ControllerState::Installing;
        self.log(LogLevel::Info, "install started", vec![]);

        match self.fetch_manifest() {
            Ok(entries) => {
                if let Err(e) = self.deps.storage.put_all(&self.config.cache_name, &entries) {
                    return Err(self.install_failed(e));
                }
                // 既に制御中の版を入れ直した場合は Active のまま
                self.state = if previous == ControllerState::Active {
                    ControllerState::Active
                } else {
                    ControllerState::Waiting
                };
                self.skip_waiting = true;
                let stored: Vec<String> = entries.into_iter().map(|e| e.key).collect();
                self.log(
                    LogLevel::Info,
                    "install completed",
                    vec![("resources", stored.len().into())],
                );
                Ok(InstallReport {
                    cache_name: self.config.cache_name.clone(),
                    stored,
                })
            }
            Err(e) => Err(self.install_failed(e)),
        }
    }

    /// 現在の版以外のスナップショットを全て消し、開いているクライアントの制御を取る。
    pub fn activate(&mut self) -> Result<ActivateReport, Error> {
        let name = self.config.cache_name.clone();
        if !self.deps.storage.has(&name)? {
            return Err(Error::invalid_argument(format!(
                "Cache '{}' is not installed. Run install first.",
                name
            )));
        }

        let mut deleted = Vec::new();
        for key in self.deps.storage.keys()? {
            if key == name.as_str() {
                continue;
            }
            if self.deps.storage.delete(&key)? {
                self.log(
                    LogLevel::Info,
                    "stale snapshot deleted",
                    vec![("snapshot", key.clone().into())],
                );
                deleted.push(key);
            }
        }

        self.deps.clients.claim(&name)?;
        self.state = ControllerState::Active;
        self.log(
            LogLevel::Info,
            "controller activated",
            vec![("deleted", deleted.len().into())],
        );
        Ok(ActivateReport {
            cache_name: name,
            deleted,
        })
    }

    /// install し、成功して待機不要なら続けて activate する
    pub fn update(&mut self) -> Result<(InstallReport, Option<ActivateReport>), Error> {
        let installed = self.install()?;
        let activated = if self.skip_waiting {
            Some(self.activate()?)
        } else {
            None
        };
        Ok((installed, activated))
    }

    /// 要求を横取りする。Active かつ GET のときだけキャッシュを引き、
    /// ヒットすればネットワークに出ない。ミスはネットワークの結果をそのまま返す。
    pub fn handle_fetch(&self, request: &ShellRequest) -> Result<FetchOutcome, Error> {
        if self.state == ControllerState::Active && request.is_cacheable() {
            let key = request.cache_key();
            match self.deps.storage.match_request(&self.config.cache_name, &key) {
                Ok(Some(response)) => {
                    self.log(LogLevel::Debug, "cache hit", vec![("url", key.into())]);
                    return Ok(FetchOutcome {
                        source: FetchSource::Cache,
                        response,
                    });
                }
                Ok(None) => {
                    self.log(LogLevel::Debug, "cache miss", vec![("url", key.into())]);
                }
                Err(e) => {
                    self.log(
                        LogLevel::Warn,
                        "cache lookup failed",
                        vec![("url", key.into()), ("error", e.to_string().into())],
                    );
                }
            }
        }

        match self.deps.network.fetch(request) {
            Ok(response) => Ok(FetchOutcome {
                source: FetchSource::Network,
                response,
            }),
            Err(e) => {
                self.log(
                    LogLevel::Warn,
                    "network fetch failed",
                    vec![
                        ("url", request.url.to_string().into()),
                        ("error", e.to_string().into()),
                    ],
                );
                Err(e)
            }
        }
    }

    pub fn status(&self) -> Result<StatusReport, Error> {
        Ok(StatusReport {
            cache_name: self.config.cache_name.clone(),
            state: self.state,
            snapshots: self.deps.storage.keys()?,
            controller: self.deps.clients.controller()?,
        })
    }

    fn fetch_manifest(&self) -> Result<Vec<CachedEntry>, Error> {
        let urls = self.config.manifest.resolve(&self.config.scope)?;
        let mut entries = Vec::with_capacity(urls.len());
        let mut failures = Vec::new();
        for url in urls {
            let request = ShellRequest::reload(url);
            match self.deps.network.fetch(&request) {
                Ok(response) if response.is_success() => entries.push(CachedEntry {
                    key: request.cache_key(),
                    response,
                }),
                Ok(response) => {
                    failures.push(format!("{} (HTTP {})", request.url, response.status))
                }
                Err(e) => failures.push(format!("{} ({})", request.url, e)),
            }
        }
        if !failures.is_empty() {
            return Err(Error::http(format!(
                "{} of {} shell resources could not be fetched: {}",
                failures.len(),
                failures.len() + entries.len(),
                failures.join(", ")
            )));
        }
        Ok(entries)
    }

    fn install_failed(&mut self, e: Error) -> Error {
        self.state = ControllerState::Redundant;
        self.skip_waiting = false;
        self.log(
            LogLevel::Error,
            "install failed",
            vec![("error", e.to_string().into())],
        );
        e
    }

    fn log(&self, level: LogLevel, message: &str, fields: Vec<(&str, serde_json::Value)>) {
        let mut record = LogRecord::new(level, message)
            .layer("usecase")
            .kind("cache")
            .field("cache_name", self.config.cache_name.as_str());
        for (key, value) in fields {
            record = record.field(key, value);
        }
        let _ = self.deps.log.log(&record);
    }
}
