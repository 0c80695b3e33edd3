//! 配線: 標準アダプタで OfflineCacheController を組み立てる

use std::path::PathBuf;
use std::sync::Arc;

use common::adapter::{
    FileJsonLog, NoopLog, StdClock, StdEnvResolver, StdFileSystem, StderrLog, TeeLog,
};
use common::error::Error;
use common::ports::outbound::{EnvResolver, FileSystem, Log};

use crate::adapter::{DirCacheStorage, FileClientRegistry, ReqwestNetwork, CONTROLLER_FILE_NAME};
use crate::cli::args::{base_url, CACHE_NAME_ENV};
use crate::cli::Config;
use crate::domain::{CacheName, ShellManifest};
use crate::ports::outbound::Network;
use crate::usecase::controller::{CacheControllerDeps, ControllerConfig, OfflineCacheController};

const LOG_FILE_NAME: &str = "shellcache.jsonl";

pub struct App {
    pub controller: OfflineCacheController,
    pub logger: Arc<dyn Log>,
}

/// 版の決定: --cache-name > SHELLCACHE_NAME > 既定値
pub fn resolve_cache_name(config: &Config, env: &dyn EnvResolver) -> Result<CacheName, Error> {
    match config.cache_name.clone().or_else(|| env.var(CACHE_NAME_ENV)) {
        Some(name) => CacheName::new(name),
        None => Ok(CacheName::default()),
    }
}

/// 標準アダプタで App を組み立てる。ネットワークは差し替え可能（テストでは偽物を渡す）。
/// 保存先は --cache-dir、なければ <home>/cache。どちらも決まらなければ Env エラー。
pub fn wire_shellcache(config: &Config, network: Arc<dyn Network>) -> Result<App, Error> {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let env_resolver = StdEnvResolver;
    let home = env_resolver.resolve_home_dir();

    let cache_dir: PathBuf = match (&config.cache_dir, &home) {
        (Some(dir), _) => dir.clone(),
        (None, Ok(home)) => home.dirs().cache_dir(),
        (None, Err(e)) => return Err(e.clone()),
    };
    let file_log: Arc<dyn Log> = match &home {
        Ok(home) => Arc::new(FileJsonLog::new(
            Arc::clone(&fs),
            home.dirs().logs_dir().join(LOG_FILE_NAME),
        )),
        Err(_) => Arc::new(NoopLog),
    };
    let logger: Arc<dyn Log> = if config.verbose {
        Arc::new(TeeLog::new(vec![file_log, Arc::new(StderrLog::default())]))
    } else {
        file_log
    };

    let controller_config = ControllerConfig {
        cache_name: resolve_cache_name(config, &env_resolver)?,
        manifest: ShellManifest::default(),
        scope: base_url(config)?,
    };
    let deps = CacheControllerDeps {
        storage: Arc::new(DirCacheStorage::new(Arc::clone(&fs), &cache_dir)),
        network,
        clients: Arc::new(FileClientRegistry::new(
            Arc::clone(&fs),
            Arc::new(StdClock),
            cache_dir.join(CONTROLLER_FILE_NAME),
        )),
        log: Arc::clone(&logger),
    };
    let mut controller = OfflineCacheController::new(deps, controller_config);
    controller.resume()?;
    Ok(App { controller, logger })
}

/// 実ネットワークで組み立てる
pub fn wire_default(config: &Config) -> Result<App, Error> {
    wire_shellcache(config, Arc::new(ReqwestNetwork::new()))
}
